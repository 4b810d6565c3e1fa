use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::{BuyerId, OrderId, ProductId, RiderId, SellerId};

/// How the order travels from seller to buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    Local,
    Interstate,
}

/// The lifecycle status of an order, without any attached data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Assigned,
    Picked,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Assigned,
        OrderStatus::Picked,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Assigned => "assigned",
            OrderStatus::Picked => "picked",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status together with the data that only exists in that status.
///
/// A rider is carried exactly by the states that have one, so an order can
/// never be pending with a rider or in transit without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OrderState {
    Pending,
    Assigned { rider: RiderId },
    Picked { rider: RiderId },
    Delivered { rider: RiderId },
    Cancelled,
}

impl OrderState {
    pub fn status(&self) -> OrderStatus {
        match self {
            OrderState::Pending => OrderStatus::Pending,
            OrderState::Assigned { .. } => OrderStatus::Assigned,
            OrderState::Picked { .. } => OrderStatus::Picked,
            OrderState::Delivered { .. } => OrderStatus::Delivered,
            OrderState::Cancelled => OrderStatus::Cancelled,
        }
    }

    pub fn rider(&self) -> Option<&RiderId> {
        match self {
            OrderState::Assigned { rider }
            | OrderState::Picked { rider }
            | OrderState::Delivered { rider } => Some(rider),
            OrderState::Pending | OrderState::Cancelled => None,
        }
    }
}

/// Represents a customer order.
///
/// Fields are read-only outside this module: the only way to move an order
/// forward is [`Order::advance`], which the lifecycle engine calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OrderRecord")]
pub struct Order {
    id: OrderId,
    buyer: BuyerId,
    seller: SellerId,
    product: ProductId,
    quantity: u32,
    total: Decimal,
    delivery_mode: DeliveryMode,
    #[serde(flatten)]
    state: OrderState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Serialized form of an [`Order`]. Decoding goes through [`Order::new`] so a
/// stored order is held to the same rules as a fresh one.
#[derive(Deserialize)]
struct OrderRecord {
    id: OrderId,
    buyer: BuyerId,
    seller: SellerId,
    product: ProductId,
    quantity: u32,
    total: Decimal,
    delivery_mode: DeliveryMode,
    #[serde(flatten)]
    state: OrderState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRecord> for Order {
    type Error = String;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        if record.updated_at < record.created_at {
            return Err("Order updated_at precedes created_at".to_string());
        }
        let order = Order::new(
            record.id,
            OrderCreate {
                buyer: record.buyer,
                seller: record.seller,
                product: record.product,
                quantity: record.quantity,
                total: record.total,
                delivery_mode: record.delivery_mode,
            },
            record.created_at,
        )?;
        Ok(order.advance(record.state, record.updated_at))
    }
}

/// Payload for storing a freshly purchased order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub buyer: BuyerId,
    pub seller: SellerId,
    pub product: ProductId,
    pub quantity: u32,
    pub total: Decimal,
    pub delivery_mode: DeliveryMode,
}

/// A buyer's intent to purchase; priced into an [`OrderCreate`] by the order client.
#[derive(Debug, Clone)]
pub struct PurchaseRequest {
    pub buyer: BuyerId,
    pub product: ProductId,
    pub quantity: u32,
    pub delivery_mode: DeliveryMode,
}

impl Order {
    /// Creates a pending order. Both timestamps are set to `created_at`.
    pub fn new(id: OrderId, params: OrderCreate, created_at: DateTime<Utc>) -> Result<Self, String> {
        if params.quantity == 0 {
            return Err("Order quantity must be at least 1".to_string());
        }
        if params.total.is_sign_negative() && !params.total.is_zero() {
            return Err(format!("Order total must not be negative: {}", params.total));
        }
        if params.buyer.is_blank() || params.seller.is_blank() || params.product.is_blank() {
            return Err("Order requires buyer, seller and product".to_string());
        }
        Ok(Self {
            id,
            buyer: params.buyer,
            seller: params.seller,
            product: params.product,
            quantity: params.quantity,
            total: params.total,
            delivery_mode: params.delivery_mode,
            state: OrderState::Pending,
            created_at,
            updated_at: created_at,
        })
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn buyer(&self) -> &BuyerId {
        &self.buyer
    }

    pub fn seller(&self) -> &SellerId {
        &self.seller
    }

    pub fn product(&self) -> &ProductId {
        &self.product
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn delivery_mode(&self) -> DeliveryMode {
        self.delivery_mode
    }

    pub fn status(&self) -> OrderStatus {
        self.state.status()
    }

    pub fn rider(&self) -> Option<&RiderId> {
        self.state.rider()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns a copy of this order in `state`, stamped at `at`.
    pub(crate) fn advance(&self, state: OrderState, at: DateTime<Utc>) -> Self {
        Self {
            state,
            updated_at: at,
            ..self.clone()
        }
    }

    /// Listing order: newest `created_at` first.
    ///
    /// Orders created in the same instant fall back to their ids, latest
    /// issued first. Sequential ids share a prefix, so a longer id was issued
    /// later (`order_10` after `order_9`).
    pub fn newest_first(a: &Order, b: &Order) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.as_str().len().cmp(&a.id.as_str().len()))
            .then_with(|| b.id.cmp(&a.id))
    }

    /// Whether `other` differs from this order only in state and `updated_at`.
    pub fn same_terms(&self, other: &Order) -> bool {
        self.id == other.id
            && self.buyer == other.buyer
            && self.seller == other.seller
            && self.product == other.product
            && self.quantity == other.quantity
            && self.total == other.total
            && self.delivery_mode == other.delivery_mode
            && self.created_at == other.created_at
    }
}

/// Selects orders for listing. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub buyer: Option<BuyerId>,
    pub seller: Option<SellerId>,
    pub rider: Option<RiderId>,
}

impl OrderFilter {
    pub fn with_status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.status.map_or(true, |s| order.status() == s)
            && self.buyer.as_ref().map_or(true, |b| order.buyer() == b)
            && self.seller.as_ref().map_or(true, |s| order.seller() == s)
            && self.rider.as_ref().map_or(true, |r| order.rider() == Some(r))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn new_order_is_pending_without_rider() {
        let order = pending_order();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert!(order.rider().is_none());
        assert_eq!(order.created_at(), order.updated_at());
    }

    #[test]
    fn rejects_zero_quantity_and_negative_total() {
        let base = OrderCreate {
            buyer: BuyerId::new("B1"),
            seller: SellerId::new("S1"),
            product: ProductId::new("p"),
            quantity: 0,
            total: Decimal::ZERO,
            delivery_mode: DeliveryMode::Interstate,
        };
        assert!(Order::new(OrderId::new("o"), base.clone(), t0()).is_err());

        let negative = OrderCreate {
            quantity: 1,
            total: Decimal::new(-5, 0),
            ..base
        };
        assert!(Order::new(OrderId::new("o"), negative, t0())
            .unwrap_err()
            .contains("negative"));
    }

    #[test]
    fn serializes_status_next_to_rider() {
        let order = pending_order().advance(
            OrderState::Assigned {
                rider: RiderId::new("R1"),
            },
            t0(),
        );
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "assigned");
        assert_eq!(json["rider"], "R1");
        assert_eq!(json["delivery_mode"], "local");
    }

    #[test]
    fn decoding_applies_creation_rules() {
        let order = pending_order().advance(
            OrderState::Picked {
                rider: RiderId::new("R1"),
            },
            t0() + chrono::Duration::minutes(2),
        );
        let mut json = serde_json::to_value(&order).unwrap();
        let decoded: Order = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(decoded, order);

        json["quantity"] = serde_json::json!(0);
        let err = serde_json::from_value::<Order>(json.clone()).unwrap_err();
        assert!(err.to_string().contains("quantity"));

        json["quantity"] = serde_json::json!(2);
        json["total"] = serde_json::json!("-1");
        assert!(serde_json::from_value::<Order>(json.clone()).is_err());

        json["total"] = serde_json::json!("1600");
        json["updated_at"] = serde_json::json!("2024-01-01T00:00:00Z");
        assert!(serde_json::from_value::<Order>(json).is_err());
    }

    #[test]
    fn newest_first_breaks_ties_by_latest_issued_id() {
        let at = |id: &str, minutes: i64| {
            let mut order = pending_order();
            order.id = OrderId::new(id);
            order.created_at = t0() + chrono::Duration::minutes(minutes);
            order
        };
        let mut orders = vec![at("order_1", 0), at("order_2", 0), at("order_10", 0), at("order_3", 5)];
        orders.sort_by(Order::newest_first);

        let ids: Vec<&str> = orders.iter().map(|o| o.id().as_str()).collect();
        assert_eq!(ids, ["order_3", "order_10", "order_2", "order_1"]);
    }

    #[test]
    fn filter_matches_on_every_set_field() {
        let order = pending_order().advance(
            OrderState::Picked {
                rider: RiderId::new("R1"),
            },
            t0(),
        );
        assert!(OrderFilter::default().matches(&order));
        assert!(OrderFilter::with_status(OrderStatus::Picked).matches(&order));
        assert!(!OrderFilter::with_status(OrderStatus::Pending).matches(&order));

        let by_rider = OrderFilter {
            rider: Some(RiderId::new("R2")),
            ..OrderFilter::default()
        };
        assert!(!by_rider.matches(&order));

        let by_parties = OrderFilter {
            buyer: Some(BuyerId::new("B1")),
            seller: Some(SellerId::new("S1")),
            ..OrderFilter::default()
        };
        assert!(by_parties.matches(&order));
    }

    #[test]
    fn same_terms_ignores_state() {
        let order = pending_order();
        let moved = order.advance(OrderState::Cancelled, t0() + chrono::Duration::minutes(5));
        assert!(order.same_terms(&moved));
    }
}
