//! Auth module: login against stored users and HS256 bearer tokens.
//!
//! Token issue and verification live here so the HTTP middleware stays a thin
//! header parser.

pub mod domain;
pub mod errors;
pub mod service;

pub use service::{AuthConfig, AuthService};
