//! Branch entity and its payload rules.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::document::DocumentId;
use super::entity::Entity;
use super::validation::{FieldRule, PHONE_PATTERN, RuleSet, Validate};

/// Collection holding branch documents.
pub const BRANCHES: &str = "branches";

static BRANCH_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::new(vec![
        FieldRule::string("name")
            .required()
            .length(2, 50)
            .messages("Branch name is required", "Branch name cannot be empty"),
        FieldRule::string("address")
            .required()
            .length(5, 100)
            .messages("Address is required", "Address cannot be empty"),
        FieldRule::string("phone")
            .required()
            .pattern(&PHONE_PATTERN)
            .messages("Phone number is required", "Phone number cannot be empty"),
    ])
});

static BRANCH_PATCH_RULES: LazyLock<RuleSet> = LazyLock::new(|| BRANCH_RULES.partial());

/// A physical branch of the organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    #[schema(value_type = String, example = "Jx81kPqL0aZbT3nVw2Ye")]
    pub id: DocumentId,
    #[schema(example = "Downtown")]
    pub name: String,
    #[schema(example = "12 Market Street")]
    pub address: String,
    #[schema(example = "+1 (555) 010-2000")]
    pub phone: String,
}

/// Payload creating a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBranch {
    pub name: String,
    pub address: String,
    pub phone: String,
}

/// Partial update of a branch; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Entity for Branch {
    const COLLECTION: &'static str = BRANCHES;
    type Draft = NewBranch;
    type Patch = BranchPatch;

    fn from_draft(id: DocumentId, draft: NewBranch) -> Self {
        let NewBranch {
            name,
            address,
            phone,
        } = draft;
        Self {
            id,
            name,
            address,
            phone,
        }
    }
}

impl Validate for NewBranch {
    fn rules() -> &'static RuleSet {
        &BRANCH_RULES
    }
}

impl Validate for BranchPatch {
    fn rules() -> &'static RuleSet {
        &BRANCH_PATCH_RULES
    }
}
