//! Webhook replay example
//!
//! Payment gateways deliver confirmation webhooks at least once. This
//! example shows an order absorbing a duplicated confirmation without
//! changing state, and refusing a confirmation for some other charge.

use anyhow::Result;
use cartwright::testing::prelude::*;
use cartwright::{LineItem, Money, PaymentIntentId, ProductId, Quantity};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting webhook replay example");

    let intent = PaymentIntentId::try_new("pi_gateway_charge_42")?;
    let mut order = OrderBuilder::new()
        .item(LineItem::new(
            ProductId::new(),
            Quantity::new(1)?,
            Money::from_minor(12_900, "USD")?,
        ))
        .staged_intent(intent.clone())
        .build();

    info!("Order awaiting payment at version {}", order.version());

    // First delivery settles the payment
    order.mark_paid(intent.clone())?;
    info!("Payment settled at version {}", order.version());

    // The gateway retries; the replay changes nothing
    order.mark_paid(intent)?;
    info!("Replay absorbed, still at version {}", order.version());
    assert_order_consistent(&order);

    // A confirmation for a different charge is refused
    let other = PaymentIntentId::try_new("pi_gateway_charge_43")?;
    match order.mark_paid(other) {
        Ok(()) => panic!("Mismatched confirmation should have failed"),
        Err(e) => info!("Mismatched confirmation correctly rejected: {}", e),
    }

    info!("Webhook replay example completed successfully");
    Ok(())
}
