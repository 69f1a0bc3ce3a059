//! Session middleware that decodes the auth cookie and extends it on use.

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        Session,
        cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
    },
};

/// The state needed for the session middleware.
#[derive(Clone)]
pub struct SessionState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How long a session lasts after the latest request.
    pub cookie_duration: Duration,
}

impl FromRef<AppState> for SessionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<SessionState> for Key {
    fn from_ref(state: &SessionState) -> Self {
        state.cookie_key.clone()
    }
}

/// Resolve the caller's [Session] from the auth cookie.
///
/// A valid cookie puts a [Session] into the request extensions and slides the
/// cookie's expiry forward on the response. Requests without a valid cookie
/// are passed on untouched, leaving it to the services to answer with an
/// unauthorized outcome.
///
/// **Note**: Route handlers can use [crate::auth::CurrentSession] to receive the session.
pub async fn resolve_session(
    State(state): State<SessionState>,
    jar: PrivateCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let session = match get_token_from_cookies(&jar) {
        Ok(token) => Session::new(token.user_id),
        Err(Error::CookieMissing) => return next.run(request).await,
        Err(error) => {
            tracing::warn!("Rejected auth cookie: {error}");
            return next.run(request).await;
        }
    };

    request.extensions_mut().insert(session);
    let response = next.run(request).await;

    match extend_auth_cookie_duration_if_needed(jar, state.cookie_duration) {
        Ok(jar) => (jar, response).into_response(),
        Err(error) => {
            tracing::error!("Error extending cookie duration: {error}. Leaving cookie as is.");
            response
        }
    }
}
