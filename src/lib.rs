//! Finance tracker is a web service for keeping track of personal income and expenses.
//!
//! Users sort their transactions into categories they define themselves and
//! get back the totals, daily cash flow and per-category breakdowns that the
//! dashboard charts are drawn from.
//!
//! This library provides a JSON API. Every category and transaction operation
//! is scoped to the signed-in user and reports its result as an [Outcome].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod outcome;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    DEFAULT_COOKIE_DURATION, PasswordHash, Session, User, UserID, ValidatedPassword,
};
pub use category::{
    Category, CategoryForm, CategoryId, CategoryName, create_category, delete_category,
    get_category, list_categories, update_category,
};
pub use dashboard::{
    CategoryTotal, ChartTransaction, DailyTotals, DashboardReport, Totals, UNCATEGORIZED_LABEL,
    category_breakdown, daily_series, get_dashboard_report, totals,
};
pub use database_id::DatabaseId;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use outcome::{Outcome, Status};
pub use routing::build_router;
pub use transaction::{
    Transaction, TransactionForm, TransactionId, TransactionType, TransactionWindow,
    TransactionWithCategory, create_transaction, delete_transaction, get_transaction,
    list_transactions, update_transaction,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// Service functions never return these directly, they are converted into an
/// [Outcome] which decides the status code and the message shown to the user.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry a valid session.
    #[error("Unauthorized!")]
    Unauthorized,

    /// The email and password combination did not match a registered user.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no auth cookie in the cookie jar")]
    CookieMissing,

    /// The auth cookie could not be decoded, or it has expired.
    #[error("the auth token is invalid or has expired")]
    InvalidToken,

    /// The user provided a password that is too easy to guess.
    #[error("Password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email address given at sign-up is not a valid email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// An empty string was used as the name of a new user.
    #[error("Please enter your name")]
    EmptyUserName,

    /// An account already uses the email address.
    #[error("An account with this email address already exists")]
    DuplicateEmail,

    /// A category name had fewer than two characters after trimming.
    #[error("Category must be at least 2 characters.")]
    CategoryNameTooShort,

    /// A transaction name had fewer than two characters after trimming.
    #[error("Name must be at least 2 characters.")]
    TransactionNameTooShort,

    /// The transaction amount was empty.
    #[error("Please enter an amount")]
    EmptyAmount,

    /// The transaction type was neither `INCOME` nor `EXPENSE`.
    #[error("\"{0}\" is not a valid transaction type, expected INCOME or EXPENSE")]
    InvalidTransactionType(String),

    /// The transaction date could not be parsed as a calendar date.
    #[error("\"{0}\" is not a valid date")]
    InvalidTransactionDate(String),

    /// The transaction form did not name a category.
    #[error("Please select a category")]
    MissingCategoryId,

    /// The request body or query string could not be read as the expected form.
    #[error("Invalid input data: {0}")]
    InvalidRequestBody(String),

    /// The category referenced by a transaction does not exist or belongs to someone else.
    #[error("No category found")]
    NoCategoryFound,

    /// The category does not exist under the caller's account.
    #[error("Category not found")]
    CategoryNotFound,

    /// The transaction does not exist under the caller's account.
    #[error("Transaction not found")]
    TransactionNotFound,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
