//! Handles signing in, signing out and looking up the signed-in user.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error, Outcome, Status,
    auth::{
        CurrentSession, User,
        cookie::{invalidate_auth_cookie, set_auth_cookie},
        session::require_session,
        user::{get_user_by_email, get_user_by_id},
    },
    outcome::lock_error,
};

/// How long the auth cookie should last if the user selects "remember me" at sign-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// The state needed to sign a user in.
#[derive(Debug, Clone)]
pub struct SignInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SignInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<SignInState> for Key {
    fn from_ref(state: &SignInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The credentials submitted to sign in.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInForm {
    /// The email address the user signed up with.
    #[serde(default)]
    pub email: String,
    /// The plain text password to check against the stored hash.
    #[serde(default)]
    pub password: String,
    /// Keep the user signed in for a week instead of the usual session duration.
    #[serde(default, alias = "remember_me")]
    pub remember_me: bool,
}

/// Check `email` and `password` against the registered users.
///
/// Unknown email addresses and wrong passwords are both reported as
/// [Error::InvalidCredentials] so the response does not reveal which
/// addresses have an account.
fn verify_credentials(email: &str, password: &str, connection: &Connection) -> Result<User, Error> {
    let user = match get_user_by_email(email, connection) {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(Error::InvalidCredentials),
        Err(error) => return Err(error),
    };

    if user.password_hash.verify(password)? {
        Ok(user)
    } else {
        Err(Error::InvalidCredentials)
    }
}

/// Handler for sign-in requests.
///
/// On success the auth cookie is set and the outcome holds the signed-in user.
pub async fn post_sign_in(
    State(state): State<SignInState>,
    jar: PrivateCookieJar,
    payload: Result<Json<SignInForm>, JsonRejection>,
) -> Response {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => {
            return Outcome::<User>::from(Error::InvalidRequestBody(rejection.body_text()))
                .into_response();
        }
    };

    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => return lock_error::<User>(error).into_response(),
        };

        match verify_credentials(&form.email, &form.password, &connection) {
            Ok(user) => user,
            Err(error) => return Outcome::<User>::from(error).into_response(),
        }
    };

    let cookie_duration = if form.remember_me {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    match set_auth_cookie(jar, user.id, cookie_duration) {
        Ok(jar) => (jar, Outcome::ok(user, "Signed in successfully")).into_response(),
        Err(error) => {
            tracing::error!("An error occurred while setting the auth cookie: {error}");
            Outcome::<User>::from(error).into_response()
        }
    }
}

/// Sign the caller out by invalidating the auth cookie.
///
/// Always succeeds, signing out without a session is a no-op.
pub async fn post_sign_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_auth_cookie(jar);

    (
        jar,
        Outcome::<()>::without_data(Status::Ok, "Signed out successfully"),
    )
        .into_response()
}

/// The state needed to look up the signed-in user.
#[derive(Debug, Clone)]
pub struct CurrentUserState {
    /// The database connection for looking up the signed-in user.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CurrentUserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Get the user the caller is signed in as.
pub async fn get_current_user(
    State(state): State<CurrentUserState>,
    CurrentSession(session): CurrentSession,
) -> Outcome<User> {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => return lock_error(error),
    };

    let result = require_session(session.as_ref()).and_then(|session| {
        // The account may have been removed while the cookie was still live.
        get_user_by_id(session.user_id, &connection).map_err(|error| match error {
            Error::NotFound => Error::Unauthorized,
            error => error,
        })
    });

    Outcome::from_result(result, Status::Ok, "success")
}
