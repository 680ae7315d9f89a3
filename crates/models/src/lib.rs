//! Persisted data model: the whole-store snapshot and its two collections.

pub mod errors;
pub mod id;
pub mod database;
pub mod product;
pub mod user;

pub use database::Database;
pub use product::Product;
pub use user::{NewUser, User};
