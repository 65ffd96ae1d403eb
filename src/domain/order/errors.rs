use super::value_objects::ValueObjectError;
use crate::domain::user::ValueObjectError as UserValueObjectError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum OrderError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("User validation error: {0}")]
  UserValidation(#[from] UserValueObjectError),

  #[error("Order not found: {0}")]
  OrderNotFound(Uuid),

  #[error("Shipment not found: {0}")]
  ShipmentNotFound(Uuid),

  #[error("Order {0} is already completed")]
  AlreadyCompleted(Uuid),
}
