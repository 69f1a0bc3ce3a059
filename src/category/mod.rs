//! Categories that users sort their transactions into.

mod db;
mod domain;
mod endpoints;
mod service;

pub use db::create_category_table;
pub(crate) use db::get_category as get_category_for_user;
#[cfg(test)]
pub(crate) use db::insert_category;
pub use domain::{Category, CategoryForm, CategoryId, CategoryName, NewCategory};
pub use endpoints::{
    create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
    get_category_endpoint, update_category_endpoint,
};
pub use service::{create_category, delete_category, get_category, list_categories, update_category};
