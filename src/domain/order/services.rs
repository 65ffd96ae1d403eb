use std::sync::Arc;
use uuid::Uuid;

use super::entities::{Adjustment, Order, OrderItem, Shipment};
use super::errors::OrderError;
use super::ports::OrderRepository;
use super::value_objects::{AdjustmentLabel, CurrencyCode, OrderNumber};
use crate::domain::user::User;

/// Values applied to orders created without explicit settings.
#[derive(Debug, Clone)]
pub struct OrderDefaults {
  pub currency: CurrencyCode,
  pub number_padding: usize,
}

pub struct OrderService {
  order_repo: Arc<dyn OrderRepository>,
  defaults: OrderDefaults,
}

impl OrderService {
  pub fn new(order_repo: Arc<dyn OrderRepository>, defaults: OrderDefaults) -> Self {
    Self {
      order_repo,
      defaults,
    }
  }

  pub async fn create_order(
    &self,
    user: Option<User>,
    currency: Option<CurrencyCode>,
  ) -> Result<Order, OrderError> {
    let sequence = self.order_repo.next_sequence().await?;
    let number = OrderNumber::sequential(sequence, self.defaults.number_padding);

    let mut order = Order::new();
    order
      .set_number(number)
      .set_currency(currency.unwrap_or_else(|| self.defaults.currency.clone()));
    if let Some(user) = user {
      order.set_user(user);
    }

    let order = self.order_repo.save(order).await?;
    tracing::info!(
      "Created order {} ({})",
      order.id(),
      order.number().map(OrderNumber::value).unwrap_or_default()
    );
    Ok(order)
  }

  /// Stores an order built elsewhere, e.g. from a snapshot.
  pub async fn import_order(&self, order: Order) -> Result<Order, OrderError> {
    let mut order = order;
    if order.currency().is_none() {
      tracing::debug!(
        "Order {} has no currency, using default {}",
        order.id(),
        self.defaults.currency
      );
      order.set_currency(self.defaults.currency.clone());
    }
    let order = self.order_repo.save(order).await?;
    tracing::info!("Imported order {}", order.id());
    Ok(order)
  }

  pub async fn get_order(&self, order_id: Uuid) -> Result<Order, OrderError> {
    self
      .order_repo
      .find_by_id(order_id)
      .await?
      .ok_or_else(|| {
        tracing::warn!("Order {} not found", order_id);
        OrderError::OrderNotFound(order_id)
      })
  }

  pub async fn add_item(
    &self,
    order_id: Uuid,
    sku: String,
    quantity: u32,
    unit_price: i64,
  ) -> Result<Order, OrderError> {
    let mut order = self.get_order(order_id).await?;
    let item = OrderItem::new(sku, quantity, unit_price)?;
    order.add_item(item)?;
    self.order_repo.save(order).await
  }

  /// Drops every adjustment with `label`, then attaches `adjustments` under that label.
  pub async fn replace_adjustments(
    &self,
    order_id: Uuid,
    label: AdjustmentLabel,
    adjustments: Vec<Adjustment>,
  ) -> Result<Order, OrderError> {
    let mut order = self.get_order(order_id).await?;

    match &label {
      AdjustmentLabel::Tax => order.remove_tax_adjustments(),
      AdjustmentLabel::Promotion => order.remove_promotion_adjustments(),
      AdjustmentLabel::Shipping => order.remove_shipping_adjustments(),
      other => order.remove_adjustments_labelled(other),
    };

    let count = adjustments.len();
    for mut adjustment in adjustments {
      adjustment.label = label.clone();
      order.add_adjustment(adjustment);
    }

    tracing::info!(
      "Replaced {} adjustments on order {} with {} new",
      label,
      order_id,
      count
    );
    self.order_repo.save(order).await
  }

  pub async fn add_shipment(
    &self,
    order_id: Uuid,
    shipment: Shipment,
  ) -> Result<Order, OrderError> {
    let mut order = self.get_order(order_id).await?;
    order.add_shipment(shipment);
    self.order_repo.save(order).await
  }

  pub async fn remove_shipment(
    &self,
    order_id: Uuid,
    shipment_id: Uuid,
  ) -> Result<(Order, Shipment), OrderError> {
    let mut order = self.get_order(order_id).await?;
    let detached = order
      .remove_shipment_by_id(shipment_id)
      .ok_or(OrderError::ShipmentNotFound(shipment_id))?;
    let order = self.order_repo.save(order).await?;
    Ok((order, detached))
  }

  pub async fn complete_order(&self, order_id: Uuid) -> Result<Order, OrderError> {
    let mut order = self.get_order(order_id).await?;
    order.complete()?;
    tracing::info!("Completed order {} with total {}", order_id, order.total());
    self.order_repo.save(order).await
  }

  pub async fn delete_order(&self, order_id: Uuid) -> Result<(), OrderError> {
    self.order_repo.delete(order_id).await?;
    tracing::info!("Deleted order {}", order_id);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::user::{Email, Username};
  use crate::infrastructure::persistence::memory::InMemoryOrderRepository;

  fn service() -> OrderService {
    OrderService::new(
      Arc::new(InMemoryOrderRepository::new()),
      OrderDefaults {
        currency: CurrencyCode::new("USD").unwrap(),
        number_padding: 9,
      },
    )
  }

  #[tokio::test]
  async fn test_create_order_assigns_sequential_numbers() {
    let service = service();

    let first = service.create_order(None, None).await.unwrap();
    let second = service
      .create_order(None, Some(CurrencyCode::new("EUR").unwrap()))
      .await
      .unwrap();

    assert_eq!(first.number().unwrap().value(), "000000001");
    assert_eq!(second.number().unwrap().value(), "000000002");
    assert_eq!(first.currency().unwrap().as_str(), "USD");
    assert_eq!(second.currency().unwrap().as_str(), "EUR");
  }

  #[tokio::test]
  async fn test_order_numbers_are_not_reused_after_delete() {
    let service = service();

    let first = service.create_order(None, None).await.unwrap();
    let second = service.create_order(None, None).await.unwrap();
    service.delete_order(first.id()).await.unwrap();
    let third = service.create_order(None, None).await.unwrap();

    assert_eq!(second.number().unwrap().value(), "000000002");
    assert_eq!(third.number().unwrap().value(), "000000003");
    assert!(matches!(
      service.get_order(first.id()).await,
      Err(OrderError::OrderNotFound(_))
    ));
  }

  #[tokio::test]
  async fn test_concurrent_creates_get_distinct_numbers() {
    let service = Arc::new(service());

    let handles: Vec<_> = (0..16)
      .map(|_| {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.create_order(None, None).await.unwrap() })
      })
      .collect();

    let mut numbers = Vec::new();
    for handle in handles {
      let order = handle.await.unwrap();
      numbers.push(order.number().unwrap().value().to_string());
    }
    numbers.sort();
    numbers.dedup();
    assert_eq!(numbers.len(), 16);
  }

  #[tokio::test]
  async fn test_create_order_with_user() {
    let service = service();
    let user = User::new(
      Email::new("jane@example.com").unwrap(),
      Username::new("jane").unwrap(),
    );

    let order = service.create_order(Some(user.clone()), None).await.unwrap();
    let stored = service.get_order(order.id()).await.unwrap();
    assert_eq!(stored.user(), Some(&user));
  }

  #[tokio::test]
  async fn test_get_missing_order() {
    let service = service();
    let id = Uuid::new_v4();
    assert!(matches!(
      service.get_order(id).await,
      Err(OrderError::OrderNotFound(missing)) if missing == id
    ));
  }

  #[tokio::test]
  async fn test_add_item_persists() {
    let service = service();
    let order = service.create_order(None, None).await.unwrap();

    service
      .add_item(order.id(), "MUG".to_string(), 2, 900)
      .await
      .unwrap();
    let order = service
      .add_item(order.id(), "MUG".to_string(), 1, 900)
      .await
      .unwrap();

    assert_eq!(order.items().len(), 1);
    assert_eq!(order.total(), 2700);
    assert!(
      service
        .add_item(order.id(), "MUG".to_string(), 0, 900)
        .await
        .is_err()
    );
  }

  #[tokio::test]
  async fn test_add_item_overflow_leaves_order_unchanged() {
    let service = service();
    let order = service.create_order(None, None).await.unwrap();

    service
      .add_item(order.id(), "PEN".to_string(), u32::MAX, 1)
      .await
      .unwrap();
    let result = service
      .add_item(order.id(), "PEN".to_string(), 1, 1)
      .await;

    assert!(matches!(result, Err(OrderError::Validation(_))));
    let stored = service.get_order(order.id()).await.unwrap();
    assert_eq!(stored.total_quantity(), u64::from(u32::MAX));
  }

  #[tokio::test]
  async fn test_replace_adjustments_only_touches_label() {
    let service = service();
    let order = service.create_order(None, None).await.unwrap();

    service
      .replace_adjustments(
        order.id(),
        AdjustmentLabel::Tax,
        vec![Adjustment::new("tax", 500), Adjustment::new("tax", 200)],
      )
      .await
      .unwrap();
    service
      .replace_adjustments(
        order.id(),
        AdjustmentLabel::Shipping,
        vec![Adjustment::new("shipping", 1000)],
      )
      .await
      .unwrap();
    let order = service
      .replace_adjustments(
        order.id(),
        AdjustmentLabel::Tax,
        vec![Adjustment::new("anything", 90)],
      )
      .await
      .unwrap();

    assert_eq!(order.tax_total(), 90);
    assert_eq!(order.shipping_total(), 1000);
    assert_eq!(order.promotion_total(), 0);

    let order = service
      .replace_adjustments(
        order.id(),
        AdjustmentLabel::from("shipping".to_string()),
        vec![Adjustment::new("flat rate", 400)],
      )
      .await
      .unwrap();
    assert_eq!(order.shipping_total(), 400);
    assert_eq!(order.shipping_adjustments().count(), 1);
  }

  #[tokio::test]
  async fn test_shipment_lifecycle() {
    let service = service();
    let order = service.create_order(None, None).await.unwrap();
    let shipment = Shipment::new();

    let order = service
      .add_shipment(order.id(), shipment.clone())
      .await
      .unwrap();
    assert!(order.has_shipment(&shipment));

    let (order, detached) = service
      .remove_shipment(order.id(), shipment.id)
      .await
      .unwrap();
    assert!(order.shipments().is_empty());
    assert_eq!(detached.order_id(), None);

    assert!(matches!(
      service.remove_shipment(order.id(), shipment.id).await,
      Err(OrderError::ShipmentNotFound(_))
    ));
  }

  #[tokio::test]
  async fn test_complete_order_twice_fails() {
    let service = service();
    let order = service.create_order(None, None).await.unwrap();

    let completed = service.complete_order(order.id()).await.unwrap();
    assert!(completed.is_completed());
    assert!(matches!(
      service.complete_order(order.id()).await,
      Err(OrderError::AlreadyCompleted(_))
    ));
  }

  #[tokio::test]
  async fn test_import_order_fills_default_currency() {
    let service = service();
    let imported = service.import_order(Order::new()).await.unwrap();
    assert_eq!(imported.currency().unwrap().as_str(), "USD");
  }
}
