use tracing::{debug, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{Product, ProductCreate, ProductId, ProductPatch};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductId, ProductError, product);

impl ProductClient {
    #[instrument(skip(self), fields(product_name = %params.name))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        Ok(self.inner.create(params).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product, ProductError> {
        debug!("Sending request");
        Ok(self.inner.update(id, patch).await?.item)
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: ProductId) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await? {
            ProductActionResult::StockLevel(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Takes `quantity` units out of stock, returning what is left.
    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: ProductId, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        if quantity == 0 {
            return Err(ProductError::InvalidQuantity(quantity));
        }
        match self.inner.perform_action(id, ProductAction::ReserveStock(quantity)).await? {
            ProductActionResult::Reserved { remaining } => Ok(remaining),
            ProductActionResult::Insufficient { available } => {
                warn!(available, requested = quantity, "Insufficient stock");
                Err(ProductError::InsufficientStock { requested: quantity, available })
            }
            other => Err(unexpected(other)),
        }
    }

    /// Returns `quantity` units to stock, returning the new level.
    #[instrument(skip(self))]
    pub async fn release_stock(&self, id: ProductId, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        if quantity == 0 {
            return Err(ProductError::InvalidQuantity(quantity));
        }
        match self.inner.perform_action(id, ProductAction::ReleaseStock(quantity)).await? {
            ProductActionResult::Released { stock } => Ok(stock),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("Unexpected result: {:?}", result))
}
