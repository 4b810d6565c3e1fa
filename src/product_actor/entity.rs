use crate::actor_framework::Entity;
use crate::domain::{product::validate_price, Product, ProductCreate, ProductId, ProductPatch};
use super::actions::{ProductAction, ProductActionResult};

impl Entity for Product {
    const KIND: &'static str = "product";

    type Id = ProductId;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, String> {
        params.validate()?;
        Ok(Self {
            id,
            seller: params.seller,
            name: params.name,
            category: params.category,
            price: params.price,
            stock: params.stock,
            location: params.location,
        })
    }

    /// Updates the product's price and/or stock.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), String> {
        if let Some(price) = patch.price {
            validate_price(price)?;
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        Ok(())
    }

    /// Handles product-specific actions.
    ///
    /// # Errors
    /// Returns an error for zero-unit reservations or releases, and when a
    /// release would overflow the stock counter.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, String> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::StockLevel(self.stock)),
            ProductAction::ReserveStock(0) | ProductAction::ReleaseStock(0) => {
                Err("Invalid quantity: 0".to_string())
            }
            ProductAction::ReserveStock(amount) => {
                if self.stock >= amount {
                    self.stock -= amount;
                    Ok(ProductActionResult::Reserved { remaining: self.stock })
                } else {
                    Ok(ProductActionResult::Insufficient { available: self.stock })
                }
            }
            ProductAction::ReleaseStock(amount) => {
                self.stock = self
                    .stock
                    .checked_add(amount)
                    .ok_or_else(|| format!("Stock overflow releasing {} units", amount))?;
                Ok(ProductActionResult::Released { stock: self.stock })
            }
        }
    }
}
