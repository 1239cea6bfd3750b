//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`.

diesel::table! {
    /// Every document of every collection.
    ///
    /// Keyed by `(collection, id)`; `data` is always a JSON object.
    documents (collection, id) {
        /// Collection name, e.g. `branches`.
        collection -> Text,
        /// Identifier within the collection.
        id -> Text,
        /// Document fields.
        data -> Jsonb,
        /// Store-wide revision stamped on every write.
        revision -> Int8,
    }
}
