//! Opaque identifier types.
//!
//! Each entity reference gets its own newtype so a buyer id cannot be handed
//! to something expecting a rider id. The wrapped string is never parsed.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        #[allow(dead_code)]
        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True for an empty or whitespace-only identifier.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

/// References a user acting in a specific role on an order.
macro_rules! role_ref {
    ($($name:ident),+) => {
        $(
            impl $name {
                /// Whether this reference points at the given user.
                pub fn is_user(&self, user: &UserId) -> bool {
                    self.0 == user.0
                }

                pub fn user_id(&self) -> UserId {
                    UserId(self.0.clone())
                }
            }

            impl From<UserId> for $name {
                fn from(user: UserId) -> Self {
                    Self(user.0)
                }
            }
        )+
    };
}

define_id!(
    /// Identity of a registered user, whatever their role.
    UserId
);
define_id!(OrderId);
define_id!(ProductId);
define_id!(
    /// The user who purchased an order.
    BuyerId
);
define_id!(
    /// The user selling the ordered product.
    SellerId
);
define_id!(
    /// The user carrying the order.
    RiderId
);

role_ref!(BuyerId, SellerId, RiderId);

impl RiderId {
    pub fn same_user_as_buyer(&self, buyer: &BuyerId) -> bool {
        self.0 == buyer.0
    }

    pub fn same_user_as_seller(&self, seller: &SellerId) -> bool {
        self.0 == seller.0
    }
}
