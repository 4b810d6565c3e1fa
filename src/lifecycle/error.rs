use thiserror::Error;

use super::TransitionKind;
use crate::domain::{OrderStatus, RiderId, Role, UserId};

/// Why the engine refused a transition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LifecycleError {
    #[error("Invalid transition: cannot {transition} an order that is {from}")]
    InvalidTransition {
        from: OrderStatus,
        transition: TransitionKind,
    },
    #[error("Unauthorized: {role} {actor} may not {transition} this order")]
    Unauthorized {
        actor: UserId,
        role: Role,
        transition: TransitionKind,
    },
    #[error("Invalid assignment of rider '{rider}': {reason}")]
    InvalidAssignment { rider: RiderId, reason: &'static str },
}
