//! Core transaction domain types and input validation.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::{DatabaseId, Error, auth::UserID, category::Category, category::CategoryId};

/// Database identifier for a transaction.
pub type TransactionId = DatabaseId;

/// The fewest characters a transaction name may have once trimmed.
const MIN_NAME_LENGTH: usize = 2;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The name used on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An income or expense recorded by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A short description of the transaction.
    pub name: String,
    /// A decimal amount kept as the text the user entered.
    pub amount: String,
    /// Free text notes about the transaction.
    pub notes: Option<String>,
    /// Whether the amount was earned or spent.
    pub transaction_type: TransactionType,
    /// When the transaction happened, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub transaction_date: OffsetDateTime,
    /// The user who recorded the transaction.
    pub user_id: UserID,
    /// The category the transaction is filed under.
    pub category_id: CategoryId,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A transaction together with the category it is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionWithCategory {
    /// The transaction itself.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The category, if it still exists.
    pub category: Option<Category>,
}

/// Form data for transaction creation and editing.
///
/// Every field is optional at this stage, [TransactionForm::validate] decides
/// what is acceptable.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionForm {
    /// A short description, at least two characters once trimmed.
    #[serde(default)]
    pub name: String,
    /// A decimal amount as text.
    #[serde(default)]
    pub amount: String,
    /// Free text notes about the transaction.
    #[serde(default)]
    pub notes: Option<String>,
    /// Either `INCOME` or `EXPENSE`.
    #[serde(default)]
    pub transaction_type: String,
    /// A calendar date (`2025-03-31`) or an RFC 3339 timestamp.
    #[serde(default)]
    pub transaction_date: String,
    /// The ID of one of the user's categories.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// The validated fields of a [TransactionForm].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The trimmed name.
    pub name: String,
    /// The trimmed amount.
    pub amount: String,
    /// Free text notes about the transaction.
    pub notes: Option<String>,
    /// Whether the amount was earned or spent.
    pub transaction_type: TransactionType,
    /// The transaction date in UTC.
    pub transaction_date: OffsetDateTime,
    /// The category the transaction is filed under.
    pub category_id: CategoryId,
}

impl TransactionForm {
    /// Check the form.
    ///
    /// Whether the category exists is not checked here, that needs the database.
    ///
    /// # Errors
    ///
    /// Returns the first of these that applies:
    /// - [Error::TransactionNameTooShort] if the trimmed name has fewer than two characters,
    /// - [Error::EmptyAmount] if the amount is blank,
    /// - [Error::InvalidTransactionType] if the type is not `INCOME` or `EXPENSE`,
    /// - [Error::InvalidTransactionDate] if the date cannot be parsed,
    /// - [Error::MissingCategoryId] if no category was given.
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let name = self.name.trim();
        if name.chars().count() < MIN_NAME_LENGTH {
            return Err(Error::TransactionNameTooShort);
        }

        let amount = self.amount.trim();
        if amount.is_empty() {
            return Err(Error::EmptyAmount);
        }

        let transaction_type = self.transaction_type.parse()?;
        let transaction_date = parse_transaction_date(&self.transaction_date)?;
        let category_id = self.category_id.ok_or(Error::MissingCategoryId)?;

        Ok(NewTransaction {
            name: name.to_owned(),
            amount: amount.to_owned(),
            notes: self.notes,
            transaction_type,
            transaction_date,
            category_id,
        })
    }
}

/// Parse a user supplied date into a UTC instant.
///
/// A plain calendar date becomes midnight UTC on that day. A full timestamp
/// keeps its instant but is converted to UTC.
pub fn parse_transaction_date(raw_date: &str) -> Result<OffsetDateTime, Error> {
    let raw_date = raw_date.trim();

    if let Ok(date) = Date::parse(raw_date, format_description!("[year]-[month]-[day]")) {
        return Ok(date.midnight().assume_utc());
    }

    OffsetDateTime::parse(raw_date, &Rfc3339)
        .ok()
        .and_then(|date_time| date_time.checked_to_offset(UtcOffset::UTC))
        .ok_or_else(|| Error::InvalidTransactionDate(raw_date.to_owned()))
}
