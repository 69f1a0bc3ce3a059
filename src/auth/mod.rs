//! Accounts, password hashing and cookie-backed sessions.

mod cookie;
mod middleware;
mod password;
mod session;
mod sign_in;
mod sign_up;
mod token;
mod user;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub use middleware::{SessionState, resolve_session};
pub use password::{PasswordHash, ValidatedPassword};
pub use session::{CurrentSession, Session};
pub(crate) use session::require_session;
pub use sign_in::{get_current_user, post_sign_in, post_sign_out};
pub use sign_up::post_sign_up;
pub use user::{User, UserID, create_user_table};
pub(crate) use user::{NewUser, create_user};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
