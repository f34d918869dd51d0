//! Domain models

pub mod auth;
pub mod identity;

pub use auth::*;
pub use identity::{Identity, IdentityId};
