//! Dashboard module
//!
//! Turns a user's transactions into the totals, daily cash flow and
//! per-category breakdowns shown on the dashboard.

mod aggregation;
mod handlers;
mod report;

pub use aggregation::{
    CategoryTotal, ChartTransaction, DailyTotals, Totals, UNCATEGORIZED_LABEL,
    category_breakdown, daily_series, totals,
};
pub use handlers::get_dashboard;
pub use report::{DashboardReport, get_dashboard_report};
