use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopcore::{
  application::order::{GetOrderSummaryCommand, GetOrderSummaryUseCase},
  domain::order::{Order, OrderService},
  infrastructure::{config::Config, persistence::memory::InMemoryOrderRepository},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  let config = Config::load().context("Failed to load configuration")?;

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.filter.clone().into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  tracing::info!("Configuration loaded successfully");

  let snapshot_path = std::env::args()
    .nth(1)
    .context("Usage: shopcore <order-snapshot.json>")?;

  let raw = tokio::fs::read_to_string(&snapshot_path)
    .await
    .with_context(|| format!("Failed to read order snapshot {}", snapshot_path))?;
  let order: Order = serde_json::from_str(&raw)
    .with_context(|| format!("Invalid order snapshot {}", snapshot_path))?;
  tracing::debug!("Parsed order snapshot {}", snapshot_path);

  let defaults = config
    .order
    .to_defaults()
    .context("Invalid order configuration")?;
  let order_service = Arc::new(OrderService::new(
    Arc::new(InMemoryOrderRepository::new()),
    defaults,
  ));

  let order = order_service.import_order(order).await?;
  let summary = GetOrderSummaryUseCase::new(order_service.clone())
    .execute(GetOrderSummaryCommand {
      order_id: order.id(),
    })
    .await?;

  println!("{}", serde_json::to_string_pretty(&summary)?);
  Ok(())
}
