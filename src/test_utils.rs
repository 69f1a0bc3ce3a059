//! Helpers shared by the unit tests.

#![allow(missing_docs)]

use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Category, PasswordHash, User, UserID, ValidatedPassword, build_router,
    auth::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, NewUser, create_user},
    category::{CategoryName, NewCategory, insert_category},
    db::initialize,
    endpoints,
};

pub(crate) const TEST_EMAIL: &str = "test@test.com";
pub(crate) const TEST_PASSWORD: &str = "averysafeandsecurepassword";

const SECOND_TEST_EMAIL: &str = "other@test.com";

/// Get an in-memory database with every table created.
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");

    connection
}

fn insert_user(name: &str, email: &str, connection: &Connection) -> User {
    // The lowest cost bcrypt accepts keeps the tests fast.
    let password_hash = PasswordHash::new(ValidatedPassword::new_unchecked(TEST_PASSWORD), 4)
        .expect("Could not hash password");
    let new_user = NewUser::new(name, email, password_hash).expect("Could not create new user");

    create_user(new_user, connection).expect("Could not create test user")
}

/// Create the user that signs in with [TEST_EMAIL] and [TEST_PASSWORD].
pub(crate) fn create_test_user(connection: &Connection) -> User {
    insert_user("Test User", TEST_EMAIL, connection)
}

/// Create a user other than the test user, for checking that data is scoped per user.
pub(crate) fn create_second_test_user(connection: &Connection) -> User {
    insert_user("Other User", SECOND_TEST_EMAIL, connection)
}

pub(crate) fn create_test_category(connection: &Connection, user_id: UserID, name: &str) -> Category {
    let new_category = NewCategory {
        name: CategoryName::new_unchecked(name),
        notes: None,
        icon: None,
    };

    insert_category(new_category, user_id, connection)
        .expect("Could not create test category")
}

/// Get a server running the full router over a database holding the test user.
pub(crate) fn get_test_server_with_user() -> TestServer {
    let connection = get_test_connection();
    create_test_user(&connection);
    let state = AppState::new(connection, "42", DEFAULT_COOKIE_DURATION)
        .expect("Could not create app state.");

    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

/// Get a server and the auth cookie of the test user after signing in.
pub(crate) async fn get_signed_in_test_server() -> (TestServer, Cookie<'static>) {
    let server = get_test_server_with_user();

    let response = server
        .post(endpoints::SIGN_IN)
        .json(&json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD }))
        .await;
    response.assert_status_ok();
    let cookie = response.cookie(COOKIE_TOKEN);

    (server, cookie)
}
