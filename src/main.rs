mod domain;
mod clients;
mod lifecycle;

mod app_system;

#[cfg(test)]
mod mock_framework;

mod actor_framework;
mod user_actor;
mod product_actor;
mod order_actor;

use std::path::PathBuf;

use clap::Parser;
use rust_decimal::Decimal;
use tracing::{error, info, Instrument};

use crate::app_system::{setup_tracing, OrderSystem, SystemConfig, SystemError};
use crate::domain::{
    BuyerId, DeliveryMode, OrderFilter, OrderStatus, ProductCreate, ProductPatch, PurchaseRequest, RiderId, Role,
    SellerId, UserCreate, UserPatch,
};

/// Runs the order system against a seeded marketplace.
#[derive(Parser, Debug)]
#[command(name = "smartlink_orders", version, about)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "SMARTLINK_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset, e.g. "debug" or "smartlink_orders=trace"
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SystemConfig::from_file(path)?,
        None => SystemConfig::default(),
    };
    if let Some(level) = args.log_level {
        config.logging.filter = level;
    }

    // Setup tracing once for the entire application
    setup_tracing(&config.logging.filter);

    info!(config = ?args.config, "Starting order system");
    let system = OrderSystem::new(&config);

    // Seed the registries
    let span = tracing::info_span!("seed");
    let (buyer, seller, rider, admin, products) = async {
        let users = &system.user_client;
        let buyer = users
            .create_user(
                UserCreate::new("Adebayo Johnson", "adebayo@email.com", "08012345678", Role::Buyer)
                    .with_location("Lagos, Nigeria"),
            )
            .await?;
        let seller = users
            .create_user(
                UserCreate::new("Test Seller", "seller@test.com", "08023456789", Role::Seller)
                    .with_location("Lagos, Nigeria"),
            )
            .await?;
        let rider = users
            .create_user(
                UserCreate::new("Ibrahim Musa", "ibrahim@email.com", "08034567890", Role::Rider)
                    .with_location("Abuja, Nigeria"),
            )
            .await?;
        let admin = users
            .create_user(UserCreate::new("Amina Sani", "admin@smartlink.ng", "08045678901", Role::Admin))
            .await?;
        users
            .update_user(rider.clone(), UserPatch { verified: Some(true), ..UserPatch::default() })
            .await?;

        let catalogue = [
            ("Fresh Tomatoes (1kg)", "food", Decimal::new(800, 0), 50),
            ("Samsung Galaxy A54", "electronics", Decimal::new(285000, 0), 15),
            ("LG 32-inch Smart TV", "electronics", Decimal::new(125000, 0), 8),
            ("Men's Sneakers", "fashion", Decimal::new(15000, 0), 40),
        ];
        let mut products = Vec::with_capacity(catalogue.len());
        for (name, category, price, stock) in catalogue {
            let params = ProductCreate::new(SellerId::from(seller.clone()), name, category, price, stock);
            products.push(system.product_client.create_product(params).await?);
        }
        info!(users = 4, products = products.len(), "Marketplace seeded");

        Ok::<_, SystemError>((buyer, seller, rider, admin, products))
    }
    .instrument(span)
    .await?;

    let buyer_actor = system.user_client.actor_for(buyer.clone()).await?;
    let seller_actor = system.user_client.actor_for(seller).await?;
    let rider_actor = system.user_client.actor_for(rider.clone()).await?;
    let admin_actor = system.user_client.actor_for(admin).await?;

    // One order walks the happy path from purchase to delivery
    let span = tracing::info_span!("delivery");
    let delivered = async {
        let order_id = system
            .order_client
            .place_order(PurchaseRequest {
                buyer: BuyerId::from(buyer.clone()),
                product: products[0].clone(),
                quantity: 2,
                delivery_mode: DeliveryMode::Local,
            })
            .await?;

        system
            .order_client
            .assign_rider(order_id.clone(), RiderId::from(rider.clone()), &seller_actor)
            .await?;
        system.order_client.pick_up(order_id.clone(), &rider_actor).await?;
        let order = system.order_client.deliver(order_id, &rider_actor).await?;
        Ok::<_, SystemError>(order)
    }
    .instrument(span)
    .await?;
    info!(order = %serde_json::to_string(&delivered)?, "Order delivered");

    // Another is repriced before purchase and then cancelled by the buyer
    let span = tracing::info_span!("cancellation");
    async {
        system
            .product_client
            .update_product(
                products[3].clone(),
                ProductPatch { price: Some(Decimal::new(14500, 0)), ..ProductPatch::default() },
            )
            .await?;
        let order_id = system
            .order_client
            .place_order(PurchaseRequest {
                buyer: BuyerId::from(buyer.clone()),
                product: products[3].clone(),
                quantity: 3,
                delivery_mode: DeliveryMode::Interstate,
            })
            .await?;
        system.order_client.cancel(order_id, &buyer_actor).await?;
        let stock = system.product_client.check_stock(products[3].clone()).await?;
        info!(stock, "Stock restored after cancellation");
        Ok::<_, SystemError>(())
    }
    .instrument(span)
    .await?;

    // A rejected transition is reported, not fatal
    if let Err(e) = system.order_client.cancel(delivered.id().clone(), &admin_actor).await {
        error!(error = %e, "Cancellation refused");
    }

    let cancelled = system
        .order_client
        .find_orders(&OrderFilter::with_status(OrderStatus::Cancelled))
        .await?;
    info!(cancelled = cancelled.len(), "Cancelled orders");

    let summary = system.order_client.summary().await?;
    info!(
        delivered = summary.count(OrderStatus::Delivered),
        summary = %serde_json::to_string(&summary)?,
        "Order summary"
    );

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
