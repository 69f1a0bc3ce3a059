//! Session-scoped transaction operations.

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error, Outcome, Status,
    auth::{Session, UserID, require_session},
    category::{CategoryId, get_category_for_user},
    transaction::{
        NewTransaction, Transaction, TransactionForm, TransactionId, TransactionWindow,
        TransactionWithCategory,
        db::{
            delete_transaction as delete_transaction_row, get_transaction as select_transaction,
            get_transactions, insert_transaction, update_transaction as update_transaction_row,
        },
    },
};

/// List the caller's transactions with their categories, latest first.
///
/// Only transactions dated on or after the window's cutoff relative to `now`
/// are listed. Without a window, [TransactionWindow::OneMonth] is used.
pub fn list_transactions(
    session: Option<&Session>,
    window: Option<TransactionWindow>,
    now: OffsetDateTime,
    connection: &Connection,
) -> Outcome<Vec<TransactionWithCategory>> {
    let since = window.unwrap_or_default().cutoff(now);

    Outcome::from_result(
        require_session(session)
            .and_then(|session| get_transactions(session.user_id, Some(since), connection)),
        Status::Ok,
        "success",
    )
}

/// Get one of the caller's transactions.
pub fn get_transaction(
    session: Option<&Session>,
    transaction_id: TransactionId,
    connection: &Connection,
) -> Outcome<Transaction> {
    Outcome::from_result(
        require_session(session)
            .and_then(|session| select_transaction(transaction_id, session.user_id, connection)),
        Status::Ok,
        "success",
    )
}

/// Check that the category named by a transaction belongs to the caller.
fn ensure_category_owned(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    match get_category_for_user(category_id, user_id, connection) {
        Ok(_) => Ok(()),
        Err(Error::CategoryNotFound) => Err(Error::NoCategoryFound),
        Err(error) => Err(error),
    }
}

/// Validate `form` and check its category, in that order.
fn validate_for_user(
    form: TransactionForm,
    user_id: UserID,
    connection: &Connection,
) -> Result<NewTransaction, Error> {
    let transaction = form.validate()?;
    ensure_category_owned(transaction.category_id, user_id, connection)?;

    Ok(transaction)
}

/// Record a transaction for the caller under one of the caller's categories.
pub fn create_transaction(
    session: Option<&Session>,
    form: TransactionForm,
    connection: &Connection,
) -> Outcome<Transaction> {
    let result = require_session(session).and_then(|session| {
        let transaction = validate_for_user(form, session.user_id, connection)?;
        insert_transaction(transaction, session.user_id, connection)
    });

    Outcome::from_result(result, Status::Created, "Transaction created successfully")
}

/// Replace the editable fields of one of the caller's transactions.
pub fn update_transaction(
    session: Option<&Session>,
    transaction_id: TransactionId,
    form: TransactionForm,
    connection: &Connection,
) -> Outcome<Transaction> {
    let result = require_session(session).and_then(|session| {
        let transaction = validate_for_user(form, session.user_id, connection)?;
        update_transaction_row(transaction_id, session.user_id, transaction, connection)
    });

    Outcome::from_result(result, Status::Ok, "Transaction updated successfully")
}

/// Delete one of the caller's transactions.
pub fn delete_transaction(
    session: Option<&Session>,
    transaction_id: TransactionId,
    connection: &Connection,
) -> Outcome<()> {
    let result = require_session(session).and_then(|session| {
        delete_transaction_row(transaction_id, session.user_id, connection)
    });

    match result {
        Ok(()) => Outcome::without_data(Status::Ok, "Transaction deleted successfully"),
        Err(error) => error.into(),
    }
}
