use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderId};

impl Entity for Order {
    const KIND: &'static str = "order";

    type Id = OrderId;
    type CreateParams = OrderCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();

    /// Creates a pending order stamped with the current time.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, String> {
        Order::new(id, params, Utc::now())
    }

    /// Orders are never patched; status changes go through `replace`.
    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Orders change only through lifecycle transitions".to_string())
    }

    /// Orders are retained; archival is handled outside the store.
    fn on_delete(&self) -> Result<(), String> {
        Err(format!("Order {} cannot be deleted", self.id()))
    }

    /// Only status, rider and `updated_at` may differ from the stored order.
    fn on_replace(&self, next: &Self) -> Result<(), String> {
        if self.same_terms(next) {
            Ok(())
        } else {
            Err(format!("Order {} terms are immutable", self.id()))
        }
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
