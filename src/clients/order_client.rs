use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::clients::{ProductClient, UserClient};
use crate::domain::{
    Order, OrderCreate, OrderFilter, OrderId, OrderSummary, ProductId, PurchaseRequest, RiderId, Role,
};
use crate::lifecycle::{self, Actor, Transition, TransitionKind};
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;

/// Client for interacting with the Order actor.
///
/// Purchases are validated against the user and product registries before an
/// order is stored. Status changes run the lifecycle engine on a fresh
/// snapshot and are written back only if nobody else wrote in between.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    user_client: UserClient,
    product_client: ProductClient,
    max_attempts: u32,
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        user_client: UserClient,
        product_client: ProductClient,
        max_attempts: u32,
    ) -> Self {
        Self {
            inner,
            user_client,
            product_client,
            max_attempts,
        }
    }

    #[instrument(skip(self), fields(buyer = %purchase.buyer, product = %purchase.product))]
    pub async fn place_order(&self, purchase: PurchaseRequest) -> Result<OrderId, OrderError> {
        info!("Processing place_order request");

        // Step 1: Validate buyer
        match self.user_client.get_user(purchase.buyer.user_id()).await {
            Ok(Some(user)) if user.role == Role::Buyer => {
                info!(user_name = %user.name, "Buyer validation successful")
            }
            Ok(Some(user)) => {
                error!(role = %user.role, "User is not a buyer");
                return Err(OrderError::InvalidUser(format!("{} is a {}, not a buyer", user.id, user.role)));
            }
            Ok(None) => {
                error!("Buyer not found");
                return Err(OrderError::InvalidUser(purchase.buyer.to_string()));
            }
            Err(e) => {
                error!(error = %e, "Buyer validation failed");
                return Err(OrderError::InvalidUser(format!("Buyer validation failed: {}", e)));
            }
        }

        // Step 2: Validate product
        let product = match self.product_client.get_product(purchase.product.clone()).await {
            Ok(Some(product)) => {
                info!(product_name = %product.name, "Product validation successful");
                product
            }
            Ok(None) => {
                error!("Product not found");
                return Err(OrderError::InvalidProduct(purchase.product.to_string()));
            }
            Err(e) => {
                error!(error = %e, "Product validation failed");
                return Err(OrderError::InvalidProduct(format!("Product validation failed: {}", e)));
            }
        };

        // Step 3: Price the order at the current product price
        let total = product
            .price
            .checked_mul(Decimal::from(purchase.quantity))
            .ok_or_else(|| {
                error!(price = %product.price, quantity = purchase.quantity, "Order total overflows");
                OrderError::ValidationError("Order total overflows".to_string())
            })?;

        // Step 4: Reserve stock
        if let Err(e) = self.product_client.reserve_stock(product.id.clone(), purchase.quantity).await {
            error!(error = %e, "Stock reservation failed");
            return Err(match e {
                ProductError::InvalidQuantity(quantity) => {
                    OrderError::ValidationError(format!("Invalid quantity: {}", quantity))
                }
                other => OrderError::InsufficientStock(format!("Stock reservation failed: {}", other)),
            });
        }
        info!("Stock reserved successfully");

        // Step 5: Store the pending order
        let params = OrderCreate {
            buyer: purchase.buyer,
            seller: product.seller.clone(),
            product: product.id.clone(),
            quantity: purchase.quantity,
            total,
            delivery_mode: purchase.delivery_mode,
        };
        match self.inner.create(params).await {
            Ok(id) => {
                info!(order_id = %id, "Order created successfully");
                Ok(id)
            }
            Err(e) => {
                error!(error = %e, "Order creation failed, releasing stock");
                self.restock(&product.id, purchase.quantity).await;
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self, actor), fields(actor = %actor.id, role = %actor.role))]
    pub async fn assign_rider(&self, id: OrderId, rider: RiderId, actor: &Actor) -> Result<Order, OrderError> {
        self.commit_transition(id, Transition::Assign { rider }, actor).await
    }

    #[instrument(skip(self, actor), fields(actor = %actor.id, role = %actor.role))]
    pub async fn pick_up(&self, id: OrderId, actor: &Actor) -> Result<Order, OrderError> {
        self.commit_transition(id, Transition::Pick, actor).await
    }

    #[instrument(skip(self, actor), fields(actor = %actor.id, role = %actor.role))]
    pub async fn deliver(&self, id: OrderId, actor: &Actor) -> Result<Order, OrderError> {
        self.commit_transition(id, Transition::Deliver, actor).await
    }

    /// Cancels the order and returns its units to the product's stock.
    #[instrument(skip(self, actor), fields(actor = %actor.id, role = %actor.role))]
    pub async fn cancel(&self, id: OrderId, actor: &Actor) -> Result<Order, OrderError> {
        let order = self.commit_transition(id, Transition::Cancel, actor).await?;
        self.restock(order.product(), order.quantity()).await;
        Ok(order)
    }

    /// Orders matching `filter`, newest first.
    #[instrument(skip(self))]
    pub async fn find_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, OrderError> {
        let mut orders: Vec<Order> = self
            .list_orders()
            .await?
            .into_iter()
            .filter(|order| filter.matches(order))
            .collect();
        orders.sort_by(Order::newest_first);
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn summary(&self) -> Result<OrderSummary, OrderError> {
        let orders = self.list_orders().await?;
        Ok(OrderSummary::from_orders(&orders))
    }

    /// Reads the order, runs the engine, and writes the result conditionally
    /// on the version it read. A concurrent write triggers a fresh read and
    /// another engine run, up to `max_attempts` times.
    async fn commit_transition(
        &self,
        id: OrderId,
        transition: Transition,
        actor: &Actor,
    ) -> Result<Order, OrderError> {
        let mut rider_verified = false;

        for attempt in 1..=self.max_attempts {
            let snapshot = self
                .inner
                .get(id.clone())
                .await?
                .ok_or_else(|| OrderError::NotFound(id.to_string()))?;
            let from = snapshot.item.status();

            let next = lifecycle::apply(&snapshot.item, &transition, actor, Utc::now()).map_err(|e| {
                warn!(
                    error = %e,
                    %from,
                    terminal = from.is_terminal(),
                    available = ?TransitionKind::available_from(from),
                    "Transition rejected"
                );
                e
            })?;

            if let Transition::Assign { rider } = &transition {
                if !rider_verified {
                    self.verify_rider(rider).await?;
                    rider_verified = true;
                }
            }

            match self.inner.replace(id.clone(), snapshot.version, next).await {
                Ok(committed) => {
                    info!(
                        order_id = %id,
                        transition = %transition.kind(),
                        %from,
                        to = %committed.item.status(),
                        version = committed.version,
                        "Transition committed"
                    );
                    return Ok(committed.item);
                }
                Err(FrameworkError::Conflict { expected, actual, .. }) => {
                    warn!(attempt, expected, actual, "Order changed concurrently, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        error!(attempts = self.max_attempts, "Giving up after repeated conflicts");
        Err(OrderError::ConflictRetryable {
            id: id.to_string(),
            attempts: self.max_attempts,
        })
    }

    async fn verify_rider(&self, rider: &RiderId) -> Result<(), OrderError> {
        match self.user_client.get_user(rider.user_id()).await {
            Ok(Some(user)) if user.role == Role::Rider => Ok(()),
            Ok(Some(user)) => Err(OrderError::InvalidRider(format!("{} is a {}, not a rider", user.id, user.role))),
            Ok(None) => Err(OrderError::InvalidRider(format!("{} is not registered", rider))),
            Err(e) => Err(OrderError::InvalidRider(format!("Rider validation failed: {}", e))),
        }
    }

    async fn restock(&self, product: &ProductId, quantity: u32) {
        match self.product_client.release_stock(product.clone(), quantity).await {
            Ok(stock) => info!(product_id = %product, stock, "Stock released"),
            Err(e) => error!(product_id = %product, error = %e, "Stock release failed"),
        }
    }
}

impl_client_methods!(OrderClient, Order, OrderId, OrderError, order);
