//! HTTP handler for the dashboard report.

use std::sync::{Arc, Mutex};

use axum::extract::{FromRef, Query, State, rejection::QueryRejection};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Outcome,
    auth::CurrentSession,
    dashboard::report::{DashboardReport, get_dashboard_report},
    outcome::{lock_error, rejected_query},
    transaction::TransactionWindow,
};

/// The state needed for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string accepted by the dashboard, the window defaults to one month.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Defaults to [TransactionWindow::OneMonth] when omitted.
    #[serde(default)]
    pub window: TransactionWindow,
}

/// Get the dashboard report for the caller.
pub async fn get_dashboard(
    State(state): State<DashboardState>,
    CurrentSession(session): CurrentSession,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Outcome<DashboardReport> {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return rejected_query(session.as_ref(), rejection),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => return lock_error(error),
    };

    get_dashboard_report(
        session.as_ref(),
        query.window,
        OffsetDateTime::now_utc(),
        &connection,
    )
}
