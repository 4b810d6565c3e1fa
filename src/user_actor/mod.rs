//! User registry: registration rules and the identities behind order actors.

pub mod entity;
pub mod error;

pub use error::*;
