//! Transaction data aggregation for the dashboard charts.
//!
//! Every function here is pure: it takes the transactions to summarise and
//! returns the numbers a chart needs. Amounts are stored as text, so they are
//! parsed here and anything that is not a finite number counts as zero.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, UtcOffset};

use crate::transaction::{TransactionType, TransactionWithCategory};

/// The category name used for transactions without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// The parts of a transaction the charts are drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartTransaction {
    /// The amount as entered, parsed when aggregated.
    pub amount: String,
    /// Whether the amount counts as income or expense.
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub transaction_date: OffsetDateTime,
    /// The name of the transaction's category, if it has one.
    pub category: Option<String>,
}

impl From<&TransactionWithCategory> for ChartTransaction {
    fn from(value: &TransactionWithCategory) -> Self {
        Self {
            amount: value.transaction.amount.clone(),
            transaction_type: value.transaction.transaction_type,
            transaction_date: value.transaction.transaction_date,
            category: value
                .category
                .as_ref()
                .map(|category| category.name.to_string()),
        }
    }
}

/// Total income, total expenses and what is left over.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expense: f64,
    /// Income minus expenses.
    pub profit: f64,
}

/// Income and expenses for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    /// The UTC date of the bucket.
    pub date: Date,
    /// Income on this date.
    pub income: f64,
    /// Expenses on this date.
    pub expense: f64,
}

/// The summed amount of every transaction in a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category name, or "Uncategorized".
    pub name: String,
    /// The summed amount for the category.
    pub amount: f64,
}

fn parse_amount(amount: &str) -> f64 {
    match amount.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Sum income and expenses.
pub fn totals(transactions: &[ChartTransaction]) -> Totals {
    let (total_income, total_expense) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(income, expense), transaction| {
                let amount = parse_amount(&transaction.amount);

                match transaction.transaction_type {
                    TransactionType::Income => (income + amount, expense),
                    TransactionType::Expense => (income, expense + amount),
                }
            });

    Totals {
        total_income,
        total_expense,
        profit: total_income - total_expense,
    }
}

/// Group income and expenses by the UTC calendar date of each transaction.
///
/// # Returns
/// One entry per day that has transactions, in ascending date order.
pub fn daily_series(transactions: &[ChartTransaction]) -> Vec<DailyTotals> {
    let mut days: BTreeMap<Date, DailyTotals> = BTreeMap::new();

    for transaction in transactions {
        let date = transaction.transaction_date.to_offset(UtcOffset::UTC).date();
        let amount = parse_amount(&transaction.amount);
        let day = days.entry(date).or_insert(DailyTotals {
            date,
            income: 0.0,
            expense: 0.0,
        });

        match transaction.transaction_type {
            TransactionType::Income => day.income += amount,
            TransactionType::Expense => day.expense += amount,
        }
    }

    days.into_values().collect()
}

/// Sum amounts by category name regardless of transaction type.
///
/// Callers that want separate income and expense breakdowns should filter the
/// transactions first.
///
/// # Returns
/// One entry per category in the order each category is first seen.
pub fn category_breakdown(transactions: &[ChartTransaction]) -> Vec<CategoryTotal> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut breakdown: Vec<CategoryTotal> = Vec::new();

    for transaction in transactions {
        let name = transaction
            .category
            .as_deref()
            .unwrap_or(UNCATEGORIZED_LABEL);
        let amount = parse_amount(&transaction.amount);

        match positions.get(name) {
            Some(&index) => breakdown[index].amount += amount,
            None => {
                positions.insert(name, breakdown.len());
                breakdown.push(CategoryTotal {
                    name: name.to_owned(),
                    amount,
                });
            }
        }
    }

    breakdown
}
