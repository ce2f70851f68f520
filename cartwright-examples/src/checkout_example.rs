//! Checkout example application
//!
//! This example walks a cart through a full purchase:
//! - Filling the cart from a small catalog
//! - Staging a payment intent and completing checkout
//! - Converting the cart into an order
//! - Settling payment and fulfilling the order

use anyhow::Result;
use cartwright::{Cart, LineItem, Money, Order, OrderId, PaymentIntentId, Quantity, UserId};
use cartwright_examples::catalog::demo_catalog;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting checkout example");

    let catalog = demo_catalog()?;
    let shopper = UserId::new();
    let mut cart = Cart::new(shopper);

    // Two keyboards and a desk mat
    info!("Filling the cart");
    cart.add_item(LineItem::new(
        catalog[0].product_id,
        Quantity::new(2)?,
        catalog[0].unit_price.clone(),
    ))?;
    cart.add_item(LineItem::new(
        catalog[2].product_id,
        Quantity::new(1)?,
        catalog[2].unit_price.clone(),
    ))?;
    info!("Cart total: {}", cart.total());

    // Items priced in another currency are rejected
    let foreign = LineItem::new(
        catalog[3].product_id,
        Quantity::new(1)?,
        Money::from_minor(800, "EUR")?,
    );
    match cart.add_item(foreign) {
        Ok(()) => panic!("Mixed-currency add should have failed"),
        Err(e) => info!("Mixed-currency add correctly rejected: {}", e),
    }

    // The payment gateway hands us an intent to charge against
    info!("Beginning checkout");
    let intent = PaymentIntentId::try_new("pi_example_checkout")?;
    cart.begin_checkout(intent.clone())?;
    cart.mark_ordered()?;

    info!("Creating the order");
    let mut order = Order::from_cart(OrderId::new(), &cart)?;
    info!("Order {} total: {}", order.id(), order.total());

    order.ensure_can_checkout()?;
    order.mark_paid(intent)?;
    info!("Payment settled at version {}", order.version());

    order.mark_shipped()?;
    order.mark_delivered()?;
    info!("Order delivered with status {}", order.status());

    // Delivered orders are immutable
    match order.remove_item(catalog[0].product_id) {
        Ok(()) => panic!("Editing a delivered order should have failed"),
        Err(e) => info!("Late edit correctly rejected: {}", e),
    }

    info!("Stored form:\n{}", serde_json::to_string_pretty(&order)?);
    info!("Checkout example completed successfully");
    Ok(())
}
