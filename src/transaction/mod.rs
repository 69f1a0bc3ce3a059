//! Transaction management.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the form used to create and edit one
//! - Database functions for storing and querying a user's transactions
//! - The preset windows used to list recent transactions
//! - The session-scoped service functions and their JSON endpoints

mod db;
mod domain;
mod endpoints;
mod service;
mod window;

pub use db::create_transaction_table;
pub use domain::{
    NewTransaction, Transaction, TransactionForm, TransactionId, TransactionType,
    TransactionWithCategory,
};
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
    get_transactions_endpoint, update_transaction_endpoint,
};
pub use service::{
    create_transaction, delete_transaction, get_transaction, list_transactions,
    update_transaction,
};
pub use window::TransactionWindow;
