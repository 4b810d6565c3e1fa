use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ProductId, SellerId};

/// Represents a product listed by a seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub seller: SellerId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub stock: u32,
    pub location: Option<String>,
}

/// Payload for listing a new product.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub seller: SellerId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub stock: u32,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
}

impl ProductCreate {
    pub fn new(
        seller: SellerId,
        name: impl Into<String>,
        category: impl Into<String>,
        price: Decimal,
        stock: u32,
    ) -> Self {
        Self {
            seller,
            name: name.into(),
            category: category.into(),
            price,
            stock,
            location: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Product name is required".to_string());
        }
        if self.seller.is_blank() {
            return Err("Product seller is required".to_string());
        }
        validate_price(self.price)
    }
}

pub(crate) fn validate_price(price: Decimal) -> Result<(), String> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(format!("Price must not be negative: {}", price));
    }
    Ok(())
}
