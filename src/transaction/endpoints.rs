//! JSON endpoints for transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Outcome,
    auth::CurrentSession,
    outcome::{lock_error, rejected_body, rejected_path, rejected_query},
    transaction::{
        Transaction, TransactionForm, TransactionId, TransactionWindow, TransactionWithCategory,
        create_transaction, delete_transaction, get_transaction, list_transactions,
        update_transaction,
    },
};

/// The state needed for the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionEndpointState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string accepted when listing transactions, e.g. `?window=WEEK`.
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    /// Defaults to [TransactionWindow::OneMonth] when omitted.
    #[serde(default)]
    pub window: TransactionWindow,
}

/// List the caller's transactions in a window.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionEndpointState>,
    CurrentSession(session): CurrentSession,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Outcome<Vec<TransactionWithCategory>> {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return rejected_query(session.as_ref(), rejection),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => return lock_error(error),
    };

    list_transactions(
        session.as_ref(),
        Some(query.window),
        OffsetDateTime::now_utc(),
        &connection,
    )
}

/// Get a single transaction.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionEndpointState>,
    CurrentSession(session): CurrentSession,
    path: Result<Path<TransactionId>, PathRejection>,
) -> Outcome<Transaction> {
    let transaction_id = match path {
        Ok(Path(transaction_id)) => transaction_id,
        Err(rejection) => return rejected_path(session.as_ref(), rejection),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => return lock_error(error),
    };

    get_transaction(session.as_ref(), transaction_id, &connection)
}

/// Create a transaction from a JSON [TransactionForm].
pub async fn create_transaction_endpoint(
    State(state): State<TransactionEndpointState>,
    CurrentSession(session): CurrentSession,
    payload: Result<Json<TransactionForm>, JsonRejection>,
) -> Outcome<Transaction> {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => return rejected_body(session.as_ref(), rejection),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => return lock_error(error),
    };

    create_transaction(session.as_ref(), form, &connection)
}

/// Update a transaction from a JSON [TransactionForm].
pub async fn update_transaction_endpoint(
    State(state): State<TransactionEndpointState>,
    CurrentSession(session): CurrentSession,
    path: Result<Path<TransactionId>, PathRejection>,
    payload: Result<Json<TransactionForm>, JsonRejection>,
) -> Outcome<Transaction> {
    let transaction_id = match path {
        Ok(Path(transaction_id)) => transaction_id,
        Err(rejection) => return rejected_path(session.as_ref(), rejection),
    };

    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => return rejected_body(session.as_ref(), rejection),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => return lock_error(error),
    };

    update_transaction(session.as_ref(), transaction_id, form, &connection)
}

/// Delete a transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionEndpointState>,
    CurrentSession(session): CurrentSession,
    path: Result<Path<TransactionId>, PathRejection>,
) -> Outcome<()> {
    let transaction_id = match path {
        Ok(Path(transaction_id)) => transaction_id,
        Err(rejection) => return rejected_path(session.as_ref(), rejection),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => return lock_error(error),
    };

    delete_transaction(session.as_ref(), transaction_id, &connection)
}

#[cfg(test)]
mod transaction_endpoint_tests {
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use time::{Duration, OffsetDateTime};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_signed_in_test_server, get_test_server_with_user},
    };

    async fn create_category(server: &TestServer, cookie: &Cookie<'static>) -> i64 {
        let body: Value = server
            .post(endpoints::CATEGORIES)
            .add_cookie(cookie.clone())
            .json(&json!({ "name": "Food" }))
            .await
            .json();

        body["data"]["id"].as_i64().unwrap()
    }

    fn transaction_json(category_id: i64, date: &str) -> Value {
        json!({
            "name": "Groceries",
            "amount": "42.50",
            "transactionType": "EXPENSE",
            "transactionDate": date,
            "categoryId": category_id,
        })
    }

    #[tokio::test]
    async fn create_and_list_transactions() {
        let (server, cookie) = get_signed_in_test_server().await;
        let category_id = create_category(&server, &cookie).await;
        let today = OffsetDateTime::now_utc().date().to_string();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&transaction_json(category_id, &today))
            .await;

        response.assert_status(StatusCode::CREATED);
        let created: Value = response.json();
        assert_eq!(created["data"]["transactionType"], "EXPENSE");
        assert_eq!(created["data"]["categoryId"], category_id);

        let listed: Value = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("window", "WEEK")
            .add_cookie(cookie)
            .await
            .json();
        assert_eq!(listed["status"], 200);
        assert_eq!(listed["data"][0]["name"], "Groceries");
        assert_eq!(listed["data"][0]["category"]["name"], "Food");
    }

    #[tokio::test]
    async fn window_filters_old_transactions() {
        let (server, cookie) = get_signed_in_test_server().await;
        let category_id = create_category(&server, &cookie).await;
        let old = (OffsetDateTime::now_utc() - Duration::days(30)).date().to_string();
        server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&transaction_json(category_id, &old))
            .await
            .assert_status(StatusCode::CREATED);

        let week: Value = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("window", "WEEK")
            .add_cookie(cookie.clone())
            .await
            .json();
        let three_months: Value = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("window", "THREE_MONTH")
            .add_cookie(cookie)
            .await
            .json();

        assert_eq!(week["data"].as_array().unwrap().len(), 0);
        assert_eq!(three_months["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn listing_defaults_to_one_month() {
        let (server, cookie) = get_signed_in_test_server().await;
        let category_id = create_category(&server, &cookie).await;
        let now = OffsetDateTime::now_utc();
        for date in [now - Duration::days(40), now - Duration::days(1)] {
            server
                .post(endpoints::TRANSACTIONS)
                .add_cookie(cookie.clone())
                .json(&transaction_json(category_id, &date.date().to_string()))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let listed: Value = server
            .get(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .await
            .json();

        let listed = listed["data"].as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(
            listed[0]["transactionDate"],
            format!("{}T00:00:00Z", (now - Duration::days(1)).date())
        );
    }

    #[tokio::test]
    async fn out_of_range_date_is_bad_request_and_server_keeps_working() {
        let (server, cookie) = get_signed_in_test_server().await;
        let category_id = create_category(&server, &cookie).await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&transaction_json(category_id, "9999-12-31T23:59:59-01:00"))
            .await;

        response.assert_status_bad_request();
        server
            .get(endpoints::CATEGORIES)
            .add_cookie(cookie)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn unknown_window_is_bad_request() {
        let (server, cookie) = get_signed_in_test_server().await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("window", "FORTNIGHT")
            .add_cookie(cookie)
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn create_with_unknown_category_is_bad_request() {
        let (server, cookie) = get_signed_in_test_server().await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .json(&transaction_json(999, "2025-01-01"))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["message"], "No category found");
    }

    #[tokio::test]
    async fn list_without_session_is_unauthorized() {
        let server = get_test_server_with_user();

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn update_and_delete_transaction() {
        let (server, cookie) = get_signed_in_test_server().await;
        let category_id = create_category(&server, &cookie).await;
        let created: Value = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&transaction_json(category_id, "2025-01-01"))
            .await
            .json();
        let path = format_endpoint(
            endpoints::TRANSACTION,
            created["data"]["id"].as_i64().unwrap(),
        );

        let mut changed = transaction_json(category_id, "2025-01-02");
        changed["amount"] = json!("50");
        let response = server
            .put(&path)
            .add_cookie(cookie.clone())
            .json(&changed)
            .await;
        response.assert_status_ok();
        let updated: Value = server.get(&path).add_cookie(cookie.clone()).await.json();
        assert_eq!(updated["data"]["amount"], "50");

        server
            .delete(&path)
            .add_cookie(cookie.clone())
            .await
            .assert_status_ok();
        server
            .get(&path)
            .add_cookie(cookie)
            .await
            .assert_status_not_found();
    }
}
