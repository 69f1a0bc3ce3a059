//! The caller's identity, passed explicitly into every service call.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{Error, auth::UserID};

/// A signed-in user.
///
/// Produced by [crate::auth::resolve_session] and consumed by the category
/// and transaction services, which scope every query to [Session::user_id].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// The user the session belongs to.
    pub user_id: UserID,
}

impl Session {
    /// Create a session for `user_id`.
    pub fn new(user_id: UserID) -> Self {
        Self { user_id }
    }
}

/// Unwrap the session, or fail with [Error::Unauthorized].
pub(crate) fn require_session(session: Option<&Session>) -> Result<&Session, Error> {
    session.ok_or(Error::Unauthorized)
}

/// Extractor for the session placed in the request extensions by the
/// session middleware.
///
/// Never rejects: a request without a session extracts `CurrentSession(None)`
/// and the service decides what that means.
#[derive(Debug, Clone, Copy)]
pub struct CurrentSession(pub Option<Session>);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Session>().copied()))
    }
}
