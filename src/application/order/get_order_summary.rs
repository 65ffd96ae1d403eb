use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::order::{Address, Order, OrderError, OrderService, PromotionSubject};

#[derive(Debug, Deserialize)]
pub struct GetOrderSummaryCommand {
  pub order_id: Uuid,
}

/// All amounts are in the order currency's minor unit.
#[derive(Debug, Serialize)]
pub struct OrderSummaryResponse {
  pub id: Uuid,
  pub number: Option<String>,
  pub currency: Option<String>,
  pub customer_email: Option<String>,
  /// Printable shipping address, one field group per line.
  pub shipping_address: Option<String>,
  pub item_count: usize,
  pub total_quantity: u64,
  pub items_total: i64,
  pub tax_total: i64,
  pub promotion_total: i64,
  pub shipping_total: i64,
  pub adjustments_total: i64,
  pub total: i64,
  pub shipment_count: usize,
  pub inventory_unit_count: usize,
  pub completed: bool,
}

impl From<&Order> for OrderSummaryResponse {
  fn from(order: &Order) -> Self {
    Self {
      id: order.id(),
      number: order.number().map(|n| n.value().to_string()),
      currency: order.currency().map(|c| c.as_str().to_string()),
      customer_email: order.user().map(|u| u.email.as_str().to_string()),
      shipping_address: order.shipping_address().map(Address::format_multiline),
      item_count: order.promotion_subject_item_count(),
      total_quantity: order.total_quantity(),
      items_total: order.items_total(),
      tax_total: order.tax_total(),
      promotion_total: order.promotion_total(),
      shipping_total: order.shipping_total(),
      adjustments_total: order.adjustments_total(),
      total: order.total(),
      shipment_count: order.shipments().len(),
      inventory_unit_count: order.inventory_units().len(),
      completed: order.is_completed(),
    }
  }
}

pub struct GetOrderSummaryUseCase {
  order_service: Arc<OrderService>,
}

impl GetOrderSummaryUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  pub async fn execute(
    &self,
    command: GetOrderSummaryCommand,
  ) -> Result<OrderSummaryResponse, OrderError> {
    let order = self.order_service.get_order(command.order_id).await?;
    Ok(OrderSummaryResponse::from(&order))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::order::{
    Adjustment, AdjustmentLabel, CurrencyCode, InventoryUnit, OrderDefaults, OrderItem, Shipment,
  };
  use crate::infrastructure::persistence::memory::InMemoryOrderRepository;

  fn service() -> Arc<OrderService> {
    Arc::new(OrderService::new(
      Arc::new(InMemoryOrderRepository::new()),
      OrderDefaults {
        currency: CurrencyCode::new("USD").unwrap(),
        number_padding: 9,
      },
    ))
  }

  #[tokio::test]
  async fn test_summary_totals() {
    let service = service();
    let mut order = Order::new();
    order.add_item(OrderItem::new("MUG", 2, 1500).unwrap()).unwrap();
    order
      .add_adjustment(Adjustment::new(AdjustmentLabel::Tax, 500))
      .add_adjustment(Adjustment::new(AdjustmentLabel::Tax, 200))
      .add_adjustment(Adjustment::new(AdjustmentLabel::Shipping, 1000));
    order.add_shipment(Shipment::new());
    order.add_inventory_unit(InventoryUnit::new("MUG"));
    order.add_inventory_unit(InventoryUnit::new("MUG"));
    let order = service.import_order(order).await.unwrap();

    let summary = GetOrderSummaryUseCase::new(service)
      .execute(GetOrderSummaryCommand {
        order_id: order.id(),
      })
      .await
      .unwrap();

    assert_eq!(summary.currency.as_deref(), Some("USD"));
    assert!(summary.shipping_address.is_none());
    assert_eq!(summary.item_count, 1);
    assert_eq!(summary.total_quantity, 2);
    assert_eq!(summary.items_total, 3000);
    assert_eq!(summary.tax_total, 700);
    assert_eq!(summary.shipping_total, 1000);
    assert_eq!(summary.promotion_total, 0);
    assert_eq!(summary.adjustments_total, 1700);
    assert_eq!(summary.total, 4700);
    assert_eq!(summary.shipment_count, 1);
    assert_eq!(summary.inventory_unit_count, 2);
    assert!(!summary.completed);
  }

  #[tokio::test]
  async fn test_summary_for_missing_order() {
    let result = GetOrderSummaryUseCase::new(service())
      .execute(GetOrderSummaryCommand {
        order_id: Uuid::new_v4(),
      })
      .await;
    assert!(matches!(result, Err(OrderError::OrderNotFound(_))));
  }
}
