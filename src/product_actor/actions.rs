/// Custom actions for Product entities.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductAction {
    /// Checks the current stock level without modifying it.
    CheckStock,
    /// Takes units out of stock for a new order.
    ///
    /// A shortage is reported as [`ProductActionResult::Insufficient`] and
    /// leaves stock unchanged.
    ReserveStock(u32),
    /// Puts units back, e.g. when their order is cancelled.
    ReleaseStock(u32),
}

/// Results from ProductActions
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    StockLevel(u32),
    Reserved { remaining: u32 },
    Insufficient { available: u32 },
    Released { stock: u32 },
}
