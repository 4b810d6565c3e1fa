use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{OrderStatus, RiderId, Role, UserId};

/// A requested change to an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Assign { rider: RiderId },
    Pick,
    Deliver,
    Cancel,
}

impl Transition {
    pub fn kind(&self) -> TransitionKind {
        match self {
            Transition::Assign { .. } => TransitionKind::Assign,
            Transition::Pick => TransitionKind::Pick,
            Transition::Deliver => TransitionKind::Deliver,
            Transition::Cancel => TransitionKind::Cancel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Assign,
    Pick,
    Deliver,
    Cancel,
}

/// Every edge of the order state machine. Anything not listed is illegal.
const TRANSITIONS: &[(OrderStatus, TransitionKind, OrderStatus)] = &[
    (OrderStatus::Pending, TransitionKind::Assign, OrderStatus::Assigned),
    (OrderStatus::Assigned, TransitionKind::Pick, OrderStatus::Picked),
    (OrderStatus::Picked, TransitionKind::Deliver, OrderStatus::Delivered),
    (OrderStatus::Pending, TransitionKind::Cancel, OrderStatus::Cancelled),
    (OrderStatus::Assigned, TransitionKind::Cancel, OrderStatus::Cancelled),
    (OrderStatus::Picked, TransitionKind::Cancel, OrderStatus::Cancelled),
];

impl TransitionKind {
    pub const ALL: [TransitionKind; 4] = [
        TransitionKind::Assign,
        TransitionKind::Pick,
        TransitionKind::Deliver,
        TransitionKind::Cancel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Assign => "assign",
            TransitionKind::Pick => "pick",
            TransitionKind::Deliver => "deliver",
            TransitionKind::Cancel => "cancel",
        }
    }

    /// The status this transition leads to from `from`, if the edge exists.
    pub fn target(self, from: OrderStatus) -> Option<OrderStatus> {
        TRANSITIONS
            .iter()
            .find(|(source, kind, _)| *source == from && *kind == self)
            .map(|(_, _, to)| *to)
    }

    /// Roles allowed to request this transition.
    ///
    /// `Pick` and `Deliver` additionally require the acting rider to be the
    /// one assigned to the order. Buyers and sellers may only `Assign` or
    /// `Cancel` orders they are party to.
    pub fn permitted_roles(self) -> &'static [Role] {
        match self {
            TransitionKind::Assign => &[Role::Seller, Role::Admin],
            TransitionKind::Pick | TransitionKind::Deliver => &[Role::Rider],
            TransitionKind::Cancel => &[Role::Buyer, Role::Seller, Role::Admin],
        }
    }

    pub fn permits(self, role: Role) -> bool {
        self.permitted_roles().contains(&role)
    }

    /// Transitions with an edge out of `from`.
    pub fn available_from(from: OrderStatus) -> Vec<TransitionKind> {
        Self::ALL
            .into_iter()
            .filter(|kind| kind.target(from).is_some())
            .collect()
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated caller of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<UserId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

#[cfg(test)]
impl Actor {
    pub fn buyer(id: &str) -> Self {
        Self::new(id, Role::Buyer)
    }

    pub fn seller(id: &str) -> Self {
        Self::new(id, Role::Seller)
    }

    pub fn rider(id: &str) -> Self {
        Self::new(id, Role::Rider)
    }

    pub fn admin(id: &str) -> Self {
        Self::new(id, Role::Admin)
    }
}
