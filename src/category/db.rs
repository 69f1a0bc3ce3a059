//! Database operations for categories.
//!
//! Every query is scoped to the owning user. A category that belongs to
//! someone else is reported as [Error::CategoryNotFound], the same as one
//! that does not exist.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryId, CategoryName, NewCategory},
};

/// The most categories returned by [get_categories].
pub const CATEGORY_LIST_LIMIT: u32 = 100;

const CATEGORY_COLUMNS: &str = "id, name, notes, icon, user_id, created_at";

/// Create a category owned by `user_id` and return it with its generated ID
/// and creation timestamp.
pub fn insert_category(
    new_category: NewCategory,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection
        .prepare(&format!(
            "INSERT INTO category (name, notes, icon, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {CATEGORY_COLUMNS}"
        ))?
        .query_row(
            (
                new_category.name.as_ref(),
                new_category.notes,
                new_category.icon,
                user_id.as_i64(),
                created_at,
            ),
            map_category_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the category `category_id` owned by `user_id`.
///
/// # Errors
/// Returns [Error::CategoryNotFound] if there is no such category under the user.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category WHERE id = :id AND user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            map_category_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::CategoryNotFound,
            error => error.into(),
        })
}

/// Retrieve up to [CATEGORY_LIST_LIMIT] of the user's categories, newest first.
pub fn get_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category
             WHERE user_id = :user_id
             ORDER BY created_at DESC, id DESC
             LIMIT :limit"
        ))?
        .query_map(
            &[
                (":user_id", &user_id.as_i64()),
                (":limit", &i64::from(CATEGORY_LIST_LIMIT)),
            ],
            map_category_row,
        )?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Replace the name, notes and icon of the user's category.
///
/// # Errors
/// Returns [Error::CategoryNotFound] if there is no such category under the user.
pub fn update_category(
    category_id: CategoryId,
    user_id: UserID,
    category: NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(&format!(
            "UPDATE category SET name = ?1, notes = ?2, icon = ?3
             WHERE id = ?4 AND user_id = ?5
             RETURNING {CATEGORY_COLUMNS}"
        ))?
        .query_row(
            (
                category.name.as_ref(),
                category.notes,
                category.icon,
                category_id,
                user_id.as_i64(),
            ),
            map_category_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::CategoryNotFound,
            error => error.into(),
        })
}

/// Delete the user's category along with the user's transactions in it.
///
/// Both deletes happen in one SQL transaction, if either fails nothing is
/// deleted.
///
/// # Errors
/// Returns [Error::CategoryNotFound] if there is no such category under the user.
pub fn delete_category_and_transactions(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    // Using unchecked_transaction because we only have &Connection from the MutexGuard.
    let transaction = connection.unchecked_transaction()?;

    transaction.execute(
        "DELETE FROM \"transaction\" WHERE category_id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    let rows_affected = transaction.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        // Dropping the transaction rolls back the first delete.
        return Err(Error::CategoryNotFound);
    }

    transaction.commit()?;

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            notes TEXT,
            icon TEXT,
            user_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_created ON category(user_id, created_at);",
    )?;

    Ok(())
}

/// Map a database row to a [Category].
pub fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let notes = row.get(2)?;
    let icon = row.get(3)?;
    let user_id = UserID::new(row.get(4)?);
    let created_at = row.get(5)?;

    Ok(Category {
        id,
        name: CategoryName::new_unchecked(&raw_name),
        notes,
        icon,
        user_id,
        created_at,
    })
}
