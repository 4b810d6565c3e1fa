use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info};

use super::{SystemConfig, SystemError};
use crate::actor_framework::ResourceActor;
use crate::clients::{OrderClient, ProductClient, UserClient};
use crate::domain::{Order, OrderId, Product, ProductId, User, UserId};

/// The main application system that orchestrates all actors.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct OrderSystem {
    pub order_client: OrderClient,
    pub user_client: UserClient,
    pub product_client: ProductClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

/// Id generator producing `prefix_1`, `prefix_2`, ...
fn sequential_ids<I: From<String>>(prefix: &'static str) -> impl Fn() -> I + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || {
        let id = counter.fetch_add(1, Ordering::SeqCst);
        I::from(format!("{}_{}", prefix, id))
    }
}

impl OrderSystem {
    /// Starts all actors. Must be called from within a tokio runtime.
    pub fn new(config: &SystemConfig) -> Self {
        let mailbox = config.actors.mailbox_size;
        info!(mailbox, "Starting order system");

        // 1. Setup User Service
        let (user_actor, user_resource_client) =
            ResourceActor::<User>::new(mailbox, sequential_ids::<UserId>("user"));
        let user_client = UserClient::new(user_resource_client);
        let user_handle = tokio::spawn(user_actor.run());

        // 2. Setup Product Service
        let (product_actor, product_resource_client) =
            ResourceActor::<Product>::new(mailbox, sequential_ids::<ProductId>("product"));
        let product_client = ProductClient::new(product_resource_client);
        let product_handle = tokio::spawn(product_actor.run());

        // 3. Setup Order Service
        let (order_actor, order_resource_client) =
            ResourceActor::<Order>::new(mailbox, sequential_ids::<OrderId>("order"));
        let order_client = OrderClient::new(
            order_resource_client,
            user_client.clone(),
            product_client.clone(),
            config.orders.max_transition_attempts,
        );
        let order_handle = tokio::spawn(order_actor.run());

        Self {
            order_client,
            user_client,
            product_client,
            handles: vec![user_handle, product_handle, order_handle],
        }
    }

    /// Drops the clients, which closes every actor channel, and waits for the actors to finish.
    ///
    /// Clones of the clients held elsewhere keep their actors alive, so drop them first.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        drop(self.order_client);
        drop(self.user_client);
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::ActorTask(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
