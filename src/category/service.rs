//! Session-scoped category operations.
//!
//! Each operation checks for a session first, then validates its input, and
//! only then touches the database.

use rusqlite::Connection;

use crate::{
    Outcome, Status,
    auth::{Session, require_session},
    category::{
        Category, CategoryForm, CategoryId,
        db::{
            delete_category_and_transactions, get_categories, get_category as select_category,
            insert_category, update_category as update_category_row,
        },
    },
};

/// List the caller's categories, newest first.
pub fn list_categories(session: Option<&Session>, connection: &Connection) -> Outcome<Vec<Category>> {
    Outcome::from_result(
        require_session(session).and_then(|session| get_categories(session.user_id, connection)),
        Status::Ok,
        "success",
    )
}

/// Get one of the caller's categories.
pub fn get_category(
    session: Option<&Session>,
    category_id: CategoryId,
    connection: &Connection,
) -> Outcome<Category> {
    Outcome::from_result(
        require_session(session)
            .and_then(|session| select_category(category_id, session.user_id, connection)),
        Status::Ok,
        "success",
    )
}

/// Create a category owned by the caller.
pub fn create_category(
    session: Option<&Session>,
    form: CategoryForm,
    connection: &Connection,
) -> Outcome<Category> {
    let result = require_session(session).and_then(|session| {
        let new_category = form.validate()?;
        insert_category(new_category, session.user_id, connection)
    });

    Outcome::from_result(result, Status::Created, "Category created successfully")
}

/// Replace the name, notes and icon of one of the caller's categories.
pub fn update_category(
    session: Option<&Session>,
    category_id: CategoryId,
    form: CategoryForm,
    connection: &Connection,
) -> Outcome<Category> {
    let result = require_session(session).and_then(|session| {
        let category = form.validate()?;
        update_category_row(category_id, session.user_id, category, connection)
    });

    Outcome::from_result(result, Status::Ok, "Category updated successfully")
}

/// Delete one of the caller's categories and every transaction the caller
/// filed under it.
pub fn delete_category(
    session: Option<&Session>,
    category_id: CategoryId,
    connection: &Connection,
) -> Outcome<()> {
    let result = require_session(session).and_then(|session| {
        delete_category_and_transactions(category_id, session.user_id, connection)
    });

    match result {
        Ok(()) => Outcome::without_data(Status::Ok, "Category deleted successfully"),
        Err(error) => error.into(),
    }
}
