//! The dashboard report: every chart's data for one window of transactions.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Outcome, Session,
    dashboard::aggregation::{
        CategoryTotal, ChartTransaction, DailyTotals, Totals, category_breakdown, daily_series,
        totals,
    },
    transaction::{TransactionType, TransactionWindow, list_transactions},
};

/// Summary figures and chart series for the caller's recent transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    /// The window the report covers.
    pub window: TransactionWindow,
    /// Income, expense and profit over the window.
    pub totals: Totals,
    /// Income and expense per day, oldest first.
    pub daily: Vec<DailyTotals>,
    /// Income summed per category.
    pub income_by_category: Vec<CategoryTotal>,
    /// Expenses summed per category.
    pub expense_by_category: Vec<CategoryTotal>,
}

impl DashboardReport {
    /// Aggregate `transactions` into a report for `window`.
    pub fn new(window: TransactionWindow, transactions: &[ChartTransaction]) -> Self {
        let (income, expenses): (Vec<ChartTransaction>, Vec<ChartTransaction>) = transactions
            .iter()
            .cloned()
            .partition(|transaction| transaction.transaction_type == TransactionType::Income);

        Self {
            window,
            totals: totals(transactions),
            daily: daily_series(transactions),
            income_by_category: category_breakdown(&income),
            expense_by_category: category_breakdown(&expenses),
        }
    }
}

/// Build the dashboard report for the caller's transactions in `window`.
pub fn get_dashboard_report(
    session: Option<&Session>,
    window: TransactionWindow,
    now: OffsetDateTime,
    connection: &Connection,
) -> Outcome<DashboardReport> {
    let outcome = list_transactions(session, Some(window), now, connection);

    if !outcome.status.is_success() {
        return Outcome::without_data(outcome.status, &outcome.message);
    }

    let transactions: Vec<ChartTransaction> = outcome
        .into_data()
        .unwrap_or_default()
        .iter()
        .map(ChartTransaction::from)
        .collect();

    Outcome::ok(DashboardReport::new(window, &transactions), "success")
}

#[cfg(test)]
mod dashboard_report_tests {
    use time::macros::{date, datetime};

    use crate::{
        Session, Status, TransactionForm, TransactionWindow, create_transaction,
        dashboard::{
            aggregation::{CategoryTotal, Totals},
            report::get_dashboard_report,
        },
        test_utils::{create_test_category, create_test_user, get_test_connection},
    };

    fn form(category_id: i64, amount: &str, transaction_type: &str, date: &str) -> TransactionForm {
        TransactionForm {
            name: "Test".to_owned(),
            amount: amount.to_owned(),
            notes: None,
            transaction_type: transaction_type.to_owned(),
            transaction_date: date.to_owned(),
            category_id: Some(category_id),
        }
    }

    #[test]
    fn report_requires_session() {
        let connection = get_test_connection();

        let outcome = get_dashboard_report(
            None,
            TransactionWindow::OneMonth,
            datetime!(2025-03-31 00:00 UTC),
            &connection,
        );

        assert_eq!(outcome.status, Status::Unauthorized);
        assert_eq!(outcome.data, None);
    }

    #[test]
    fn report_aggregates_window() {
        let connection = get_test_connection();
        let user = create_test_user(&connection);
        let session = Session::new(user.id);
        let salary = create_test_category(&connection, user.id, "Salary");
        let food = create_test_category(&connection, user.id, "Food");
        for transaction in [
            form(salary.id, "100", "INCOME", "2025-03-20"),
            form(food.id, "40", "EXPENSE", "2025-03-20"),
            form(food.id, "10", "EXPENSE", "2025-03-25"),
            // Outside the window.
            form(food.id, "1000", "EXPENSE", "2025-01-01"),
        ] {
            create_transaction(Some(&session), transaction, &connection);
        }

        let report = get_dashboard_report(
            Some(&session),
            TransactionWindow::OneMonth,
            datetime!(2025-03-31 00:00 UTC),
            &connection,
        )
        .into_data()
        .unwrap();

        assert_eq!(
            report.totals,
            Totals {
                total_income: 100.0,
                total_expense: 50.0,
                profit: 50.0,
            }
        );
        let days: Vec<_> = report.daily.iter().map(|day| day.date).collect();
        assert_eq!(days, [date!(2025 - 03 - 20), date!(2025 - 03 - 25)]);
        assert_eq!(
            report.income_by_category,
            [CategoryTotal {
                name: "Salary".to_owned(),
                amount: 100.0,
            }]
        );
        assert_eq!(
            report.expense_by_category,
            [CategoryTotal {
                name: "Food".to_owned(),
                amount: 50.0,
            }]
        );
    }
}
