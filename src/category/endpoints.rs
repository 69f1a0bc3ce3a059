//! JSON endpoints for categories.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use rusqlite::Connection;

use crate::{
    AppState, Outcome,
    auth::CurrentSession,
    category::{
        Category, CategoryForm, CategoryId, create_category, delete_category, get_category,
        list_categories, update_category,
    },
    outcome::{lock_error, rejected_body, rejected_path},
};

/// The state needed for the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryEndpointState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the caller's categories.
pub async fn get_categories_endpoint(
    State(state): State<CategoryEndpointState>,
    CurrentSession(session): CurrentSession,
) -> Outcome<Vec<Category>> {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => return lock_error(error),
    };

    list_categories(session.as_ref(), &connection)
}

/// Get a single category.
pub async fn get_category_endpoint(
    State(state): State<CategoryEndpointState>,
    CurrentSession(session): CurrentSession,
    path: Result<Path<CategoryId>, PathRejection>,
) -> Outcome<Category> {
    let category_id = match path {
        Ok(Path(category_id)) => category_id,
        Err(rejection) => return rejected_path(session.as_ref(), rejection),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => return lock_error(error),
    };

    get_category(session.as_ref(), category_id, &connection)
}

/// Create a category from a JSON [CategoryForm].
pub async fn create_category_endpoint(
    State(state): State<CategoryEndpointState>,
    CurrentSession(session): CurrentSession,
    payload: Result<Json<CategoryForm>, JsonRejection>,
) -> Outcome<Category> {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => return rejected_body(session.as_ref(), rejection),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => return lock_error(error),
    };

    create_category(session.as_ref(), form, &connection)
}

/// Update a category from a JSON [CategoryForm].
pub async fn update_category_endpoint(
    State(state): State<CategoryEndpointState>,
    CurrentSession(session): CurrentSession,
    path: Result<Path<CategoryId>, PathRejection>,
    payload: Result<Json<CategoryForm>, JsonRejection>,
) -> Outcome<Category> {
    let category_id = match path {
        Ok(Path(category_id)) => category_id,
        Err(rejection) => return rejected_path(session.as_ref(), rejection),
    };

    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => return rejected_body(session.as_ref(), rejection),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => return lock_error(error),
    };

    update_category(session.as_ref(), category_id, form, &connection)
}

/// Delete a category and the transactions filed under it.
pub async fn delete_category_endpoint(
    State(state): State<CategoryEndpointState>,
    CurrentSession(session): CurrentSession,
    path: Result<Path<CategoryId>, PathRejection>,
) -> Outcome<()> {
    let category_id = match path {
        Ok(Path(category_id)) => category_id,
        Err(rejection) => return rejected_path(session.as_ref(), rejection),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => return lock_error(error),
    };

    delete_category(session.as_ref(), category_id, &connection)
}
