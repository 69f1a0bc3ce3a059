//! Database ID type definition.

/// Alias for the integer type used for mapping to database IDs.
///
/// SQLite hands out row IDs as 64 bit integers, see [rusqlite::Connection::last_insert_rowid].
pub type DatabaseId = i64;
