//! Order lifecycle engine.
//!
//! ```text
//! pending  --assign(rider)--> assigned --pick--> picked --deliver--> delivered
//!    |                           |                 |
//!    +---------cancel------------+------cancel-----+----> cancelled
//! ```
//!
//! `delivered` and `cancelled` are terminal. The engine is stateless: callers
//! pass in the current snapshot and persist whatever comes back.

pub mod engine;
pub mod error;
pub mod transition;

pub use engine::{apply, assign, cancel, deliver, pick};
pub use error::LifecycleError;
pub use transition::{Actor, Transition, TransitionKind};
