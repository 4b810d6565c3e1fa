//! Order storage rules. State changes come from the lifecycle engine and are
//! written back with a versioned replace.

pub mod entity;
pub mod error;

pub use error::*;
