//! External service integrations.

pub mod auth;
pub mod chain;

#[allow(unused_imports)] // Used in routes
pub use auth::AuthService;
#[allow(unused_imports)] // Used in routes
pub use chain::{ChainService, MintOutcome};
