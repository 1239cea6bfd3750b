//! Employee entity, its branch reference and its payload rules.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Number;
use utoipa::ToSchema;

use super::document::{DocumentId, FieldFilter, FilterValue, numbers_equal};
use super::entity::Entity;
use super::validation::{FieldRule, PHONE_PATTERN, RuleSet, Validate};

/// Collection holding employee documents.
pub const EMPLOYEES: &str = "employees";

/// Field holding an employee's branch reference.
pub const BRANCH_ID_FIELD: &str = "branchId";

static EMPLOYEE_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::new(vec![
        FieldRule::string("name")
            .required()
            .length(2, 50)
            .messages("Name is required", "Name cannot be empty"),
        FieldRule::string("position")
            .required()
            .length(2, 50)
            .messages("Position is required", "Position cannot be empty"),
        FieldRule::string("department")
            .required()
            .length(2, 50)
            .messages("Department is required", "Department cannot be empty"),
        FieldRule::string("email")
            .required()
            .email()
            .messages("Email is required", "Email cannot be empty"),
        FieldRule::string("phone")
            .required()
            .pattern(&PHONE_PATTERN)
            .messages("Phone number is required", "Phone number cannot be empty"),
        FieldRule::string_or_number(BRANCH_ID_FIELD)
            .required()
            .required_message("Branch ID is required"),
    ])
});

static EMPLOYEE_PATCH_RULES: LazyLock<RuleSet> = LazyLock::new(|| EMPLOYEE_RULES.partial());

/// Soft reference to a branch, stored as the client sent it.
///
/// No referential integrity is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BranchRef {
    Number(Number),
    Text(String),
}

impl BranchRef {
    /// Whether this reference names the branch spelled `raw`.
    ///
    /// Text references match the same text. Numeric references match any
    /// spelling of the same number.
    ///
    /// # Examples
    /// ```
    /// use workforce::domain::BranchRef;
    ///
    /// assert!(BranchRef::Number(7.into()).matches("7"));
    /// assert!(BranchRef::Text("7".to_owned()).matches("7"));
    /// assert!(!BranchRef::Text("07".to_owned()).matches("7"));
    /// ```
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            Self::Number(number) => raw
                .parse::<Number>()
                .is_ok_and(|wanted| numbers_equal(number, &wanted)),
            Self::Text(text) => text == raw,
        }
    }

    /// Store filters matching every stored spelling of `raw`.
    pub fn filters_for(raw: &str) -> Vec<Vec<FieldFilter>> {
        let mut filters = vec![vec![FieldFilter::eq(BRANCH_ID_FIELD, raw)]];
        if let Ok(number) = raw.parse::<Number>() {
            filters.push(vec![FieldFilter::eq(
                BRANCH_ID_FIELD,
                FilterValue::Number(number),
            )]);
        }
        filters
    }
}

impl fmt::Display for BranchRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// A member of staff attached to a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[schema(value_type = String, example = "Qm3v9TzK2pLw8XcN0aRb")]
    pub id: DocumentId,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "Analyst")]
    pub position: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "+44 20 7946 0000")]
    pub phone: String,
    /// String or number.
    #[schema(value_type = String, example = "Jx81kPqL0aZbT3nVw2Ye")]
    pub branch_id: BranchRef,
}

impl Employee {
    /// Case-insensitive department comparison.
    pub fn in_department(&self, department: &str) -> bool {
        self.department.to_lowercase() == department.to_lowercase()
    }
}

/// Payload creating an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub name: String,
    pub position: String,
    pub department: String,
    pub email: String,
    pub phone: String,
    #[schema(value_type = String)]
    pub branch_id: BranchRef,
}

/// Partial update of an employee; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub branch_id: Option<BranchRef>,
}

impl Entity for Employee {
    const COLLECTION: &'static str = EMPLOYEES;
    type Draft = NewEmployee;
    type Patch = EmployeePatch;

    fn from_draft(id: DocumentId, draft: NewEmployee) -> Self {
        Self {
            id,
            name: draft.name,
            position: draft.position,
            department: draft.department,
            email: draft.email,
            phone: draft.phone,
            branch_id: draft.branch_id,
        }
    }
}

impl Validate for NewEmployee {
    fn rules() -> &'static RuleSet {
        &EMPLOYEE_RULES
    }
}

impl Validate for EmployeePatch {
    fn rules() -> &'static RuleSet {
        &EMPLOYEE_PATCH_RULES
    }
}
