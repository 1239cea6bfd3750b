//! Internal Diesel row structs for the `documents` table.
//!
//! These types never leave the persistence layer.

use diesel::prelude::*;

use super::schema::documents;

/// Row read back from the documents table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DocumentRow {
    pub id: String,
    pub data: serde_json::Value,
    pub revision: i64,
}

/// Insertable row for creating or replacing a document.
///
/// `revision` is left to the column default, drawn from the revision
/// sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
pub(crate) struct NewDocumentRow<'a> {
    pub collection: &'a str,
    pub id: &'a str,
    pub data: serde_json::Value,
}
