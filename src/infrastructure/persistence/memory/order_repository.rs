use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::order::{Order, OrderError, OrderRepository};

/// Process-local order store, last write wins.
#[derive(Default)]
pub struct InMemoryOrderRepository {
  orders: RwLock<HashMap<Uuid, Order>>,
  sequence: AtomicU64,
}

impl InMemoryOrderRepository {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
  async fn save(&self, order: Order) -> Result<Order, OrderError> {
    let mut orders = self.orders.write().await;
    orders.insert(order.id(), order.clone());
    Ok(order)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, OrderError> {
    let orders = self.orders.read().await;
    Ok(orders.get(&id).cloned())
  }

  async fn next_sequence(&self) -> Result<u64, OrderError> {
    Ok(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
  }

  async fn delete(&self, id: Uuid) -> Result<(), OrderError> {
    let mut orders = self.orders.write().await;
    if orders.remove(&id).is_none() {
      tracing::warn!("Order {} not found for deletion", id);
      return Err(OrderError::OrderNotFound(id));
    }
    Ok(())
  }
}
