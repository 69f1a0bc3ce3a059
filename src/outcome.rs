//! The tagged result returned by every category and transaction operation.
//!
//! An [Outcome] always carries a status and a message so the caller can render
//! a deterministic state, plus the data on success. Errors are folded into an
//! outcome by [From<Error>], which is the only place that decides which errors
//! the user gets to see.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::Session};

/// The generic message shown for failures the user cannot fix.
pub(crate) const SERVER_ERROR_MESSAGE: &str = "Something went wrong!";

/// HTTP-like status of an [Outcome].
///
/// Serialized as its numeric code, e.g. `Status::NotFound` is `404`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Status {
    /// 200, the operation succeeded.
    Ok,
    /// 201, a new record was persisted.
    Created,
    /// 400, the input failed validation.
    BadRequest,
    /// 401, there is no session.
    Unauthorized,
    /// 404, the record does not exist under the caller's account.
    NotFound,
    /// 418, the server will not brew coffee.
    ImATeapot,
    /// 500, persistence or some other unexpected failure.
    InternalServerError,
}

impl Status {
    /// The numeric status code.
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::BadRequest => 400,
            Status::Unauthorized => 401,
            Status::NotFound => 404,
            Status::ImATeapot => 418,
            Status::InternalServerError => 500,
        }
    }

    /// Whether the status is a 2xx code.
    pub fn is_success(self) -> bool {
        matches!(self, Status::Ok | Status::Created)
    }
}

impl From<Status> for u16 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl TryFrom<u16> for Status {
    type Error = String;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            200 => Ok(Status::Ok),
            201 => Ok(Status::Created),
            400 => Ok(Status::BadRequest),
            401 => Ok(Status::Unauthorized),
            404 => Ok(Status::NotFound),
            418 => Ok(Status::ImATeapot),
            500 => Ok(Status::InternalServerError),
            other => Err(format!("unsupported status code {other}")),
        }
    }
}

/// The result of a service operation: `{ status, message, data? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<T> {
    /// What happened.
    pub status: Status,
    /// A message that can be shown to the user as is.
    pub message: String,
    /// The record(s) produced by a successful operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Outcome<T> {
    /// A 200 outcome carrying `data`.
    pub fn ok(data: T, message: &str) -> Self {
        Self {
            status: Status::Ok,
            message: message.to_owned(),
            data: Some(data),
        }
    }

    /// A 201 outcome carrying the newly persisted `data`.
    pub fn created(data: T, message: &str) -> Self {
        Self {
            status: Status::Created,
            message: message.to_owned(),
            data: Some(data),
        }
    }

    /// An outcome with only a status and a message.
    pub fn without_data(status: Status, message: &str) -> Self {
        Self {
            status,
            message: message.to_owned(),
            data: None,
        }
    }

    /// Build an outcome from the result of a service body.
    ///
    /// On success the outcome has `status` and `message`, on failure the error
    /// decides both.
    pub fn from_result(result: Result<T, Error>, status: Status, message: &str) -> Self {
        match result {
            Ok(data) => Self {
                status,
                message: message.to_owned(),
                data: Some(data),
            },
            Err(error) => error.into(),
        }
    }

    /// The HTTP status code matching [Outcome::status].
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Take the data out of the outcome, if there is any.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl<T> From<Error> for Outcome<T> {
    fn from(error: Error) -> Self {
        let status = match &error {
            Error::Unauthorized | Error::InvalidCredentials => Status::Unauthorized,
            Error::TooWeak(_)
            | Error::InvalidEmail(_)
            | Error::EmptyUserName
            | Error::DuplicateEmail
            | Error::CategoryNameTooShort
            | Error::TransactionNameTooShort
            | Error::EmptyAmount
            | Error::InvalidTransactionType(_)
            | Error::InvalidTransactionDate(_)
            | Error::MissingCategoryId
            | Error::InvalidRequestBody(_)
            | Error::NoCategoryFound => Status::BadRequest,
            Error::CategoryNotFound | Error::TransactionNotFound | Error::NotFound => {
                Status::NotFound
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            _ => Status::InternalServerError,
        };

        if status == Status::InternalServerError {
            tracing::error!("An unexpected error occurred: {error}");
            return Self::without_data(status, SERVER_ERROR_MESSAGE);
        }

        let message = match error {
            Error::NotFound => "Not found".to_owned(),
            error => error.to_string(),
        };

        Self {
            status,
            message,
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Outcome<T> {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Turn a JSON body that could not be read into an outcome.
///
/// Callers without a session are told they are unauthorized rather than
/// that their input was wrong.
pub(crate) fn rejected_body<T>(session: Option<&Session>, rejection: JsonRejection) -> Outcome<T> {
    if session.is_none() {
        return Error::Unauthorized.into();
    }

    Error::InvalidRequestBody(rejection.body_text()).into()
}

/// Turn a path that could not be read, e.g. a non-numeric ID, into an outcome.
///
/// An ID that cannot be parsed cannot name a record, so the caller is told
/// the record was not found.
pub(crate) fn rejected_path<T>(session: Option<&Session>, rejection: PathRejection) -> Outcome<T> {
    if session.is_none() {
        return Error::Unauthorized.into();
    }

    tracing::debug!("Rejected path: {}", rejection.body_text());
    Error::NotFound.into()
}

/// Turn a query string that could not be read, e.g. an unknown window, into an outcome.
pub(crate) fn rejected_query<T>(session: Option<&Session>, rejection: QueryRejection) -> Outcome<T> {
    if session.is_none() {
        return Error::Unauthorized.into();
    }

    Error::InvalidRequestBody(rejection.body_text()).into()
}

/// Report a poisoned database lock as a server error.
pub(crate) fn lock_error<T>(error: impl std::fmt::Display) -> Outcome<T> {
    tracing::error!("could not acquire database lock: {error}");
    Error::DatabaseLockError.into()
}
