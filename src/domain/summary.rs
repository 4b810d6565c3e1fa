use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::{Order, OrderStatus};

/// Headline order figures for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub total_orders: usize,
    pub by_status: BTreeMap<OrderStatus, usize>,
    /// Sum of totals over delivered orders, capped at `Decimal::MAX`.
    pub delivered_revenue: Decimal,
}

impl OrderSummary {
    pub fn from_orders<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        let mut by_status: BTreeMap<OrderStatus, usize> =
            OrderStatus::ALL.iter().map(|s| (*s, 0)).collect();
        let mut total_orders = 0;
        let mut delivered_revenue = Decimal::ZERO;

        for order in orders {
            total_orders += 1;
            *by_status.entry(order.status()).or_default() += 1;
            if order.status() == OrderStatus::Delivered {
                delivered_revenue = delivered_revenue.saturating_add(order.total());
            }
        }

        Self {
            total_orders,
            by_status,
            delivered_revenue,
        }
    }

    pub fn count(&self, status: OrderStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::fixtures::{pending_order, t0};
    use crate::domain::{BuyerId, DeliveryMode, OrderCreate, OrderId, OrderState, ProductId, RiderId, SellerId};

    #[test]
    fn counts_statuses_and_delivered_revenue() {
        let pending = pending_order();
        let delivered = pending.advance(
            OrderState::Delivered {
                rider: RiderId::new("R1"),
            },
            t0(),
        );
        let cancelled = pending.advance(OrderState::Cancelled, t0());

        let summary = OrderSummary::from_orders([&pending, &delivered, &delivered, &cancelled]);
        assert_eq!(summary.total_orders, 4);
        assert_eq!(summary.count(OrderStatus::Pending), 1);
        assert_eq!(summary.count(OrderStatus::Delivered), 2);
        assert_eq!(summary.count(OrderStatus::Cancelled), 1);
        assert_eq!(summary.count(OrderStatus::Picked), 0);
        assert_eq!(summary.delivered_revenue, Decimal::new(3200, 0));
    }

    #[test]
    fn revenue_saturates_instead_of_overflowing() {
        let huge = Order::new(
            OrderId::new("order_9"),
            OrderCreate {
                buyer: BuyerId::new("B1"),
                seller: SellerId::new("S1"),
                product: ProductId::new("product_1"),
                quantity: 1,
                total: Decimal::MAX,
                delivery_mode: DeliveryMode::Local,
            },
            t0(),
        )
        .unwrap()
        .advance(OrderState::Delivered { rider: RiderId::new("R1") }, t0());

        let summary = OrderSummary::from_orders([&huge, &huge]);
        assert_eq!(summary.count(OrderStatus::Delivered), 2);
        assert_eq!(summary.delivered_revenue, Decimal::MAX);
    }

    #[test]
    fn empty_summary_lists_every_status() {
        let summary = OrderSummary::from_orders(std::iter::empty());
        assert_eq!(summary.by_status.len(), OrderStatus::ALL.len());
        assert_eq!(summary.delivered_revenue, Decimal::ZERO);
    }
}
