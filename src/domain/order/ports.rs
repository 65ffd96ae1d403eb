use async_trait::async_trait;
use uuid::Uuid;

use super::entities::Order;
use super::errors::OrderError;

#[async_trait]
pub trait OrderRepository: Send + Sync {
  /// Inserts or replaces the order by id.
  async fn save(&self, order: Order) -> Result<Order, OrderError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, OrderError>;
  /// Next value of the order number sequence. Never repeats, even after deletes.
  async fn next_sequence(&self) -> Result<u64, OrderError>;
  async fn delete(&self, id: Uuid) -> Result<(), OrderError>;
}
