//! Handles requests to create a new account.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, Outcome, PasswordHash, Status, ValidatedPassword,
    auth::{
        User,
        user::{NewUser, create_user},
    },
    outcome::lock_error,
};

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct SignUpState {
    /// The database connection for storing new users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SignUpState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The details submitted to create an account.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SignUpForm {
    /// The name to show for the user.
    #[serde(default)]
    pub name: String,
    /// The email address to sign in with.
    #[serde(default)]
    pub email: String,
    /// The plain text password, checked for strength before hashing.
    #[serde(default)]
    pub password: String,
}

/// Create an account.
///
/// Answers with a 201 outcome holding the new user. The caller still has to
/// sign in afterwards.
pub async fn post_sign_up(
    State(state): State<SignUpState>,
    payload: Result<Json<SignUpForm>, JsonRejection>,
) -> Outcome<User> {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => return Error::InvalidRequestBody(rejection.body_text()).into(),
    };

    let result = ValidatedPassword::new(&form.password)
        .and_then(|password| PasswordHash::new(password, PasswordHash::DEFAULT_COST))
        .and_then(|password_hash| NewUser::new(&form.name, &form.email, password_hash));

    let new_user = match result {
        Ok(new_user) => new_user,
        Err(error) => return error.into(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => return lock_error(error),
    };

    Outcome::from_result(
        create_user(new_user, &connection),
        Status::Created,
        "Account created successfully",
    )
}
