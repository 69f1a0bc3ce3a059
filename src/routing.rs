//! Application router configuration with session-aware and public route definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState, Error, Outcome, Status,
    auth::{get_current_user, post_sign_in, post_sign_out, post_sign_up, resolve_session},
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        get_category_endpoint, update_category_endpoint,
    },
    dashboard::get_dashboard,
    endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Routes that work on a user's data see the session resolved from the auth
/// cookie. The account routes set or clear the cookie themselves and sit
/// outside the session middleware.
pub fn build_router(state: AppState) -> Router {
    let session_routes = Router::new()
        .route(endpoints::SESSION, get(get_current_user))
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .put(update_category_endpoint)
                .delete(delete_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::DASHBOARD, get(get_dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_session,
        ));

    let account_routes = Router::new()
        .route(endpoints::SIGN_UP, post(post_sign_up))
        .route(endpoints::SIGN_IN, post(post_sign_in))
        .route(endpoints::SIGN_OUT, post(post_sign_out))
        .route(endpoints::COFFEE, get(get_coffee));

    session_routes
        .merge(account_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Outcome<()> {
    Outcome::without_data(Status::ImATeapot, "I'm a teapot")
}

async fn get_404_not_found() -> Outcome<()> {
    Error::NotFound.into()
}
