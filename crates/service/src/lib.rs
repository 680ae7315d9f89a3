//! Service layer: product, user and auth workflows over a whole-snapshot store.
//! - Every operation loads the full snapshot, works on a copy and saves it back when it mutates.
//! - Storage sits behind the `StateStore` port so tests can swap in memory.
//! - Errors are typed per concern and mapped to HTTP statuses by the server crate.

pub mod errors;
pub mod storage;
pub mod product_service;
pub mod user_service;
pub mod auth;
#[cfg(test)]
pub mod test_support;

pub use product_service::ProductService;
pub use user_service::UserService;
