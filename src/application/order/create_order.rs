use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::order::{CurrencyCode, OrderError, OrderService};
use crate::domain::user::{Email, User, Username};

#[derive(Debug, Deserialize)]
pub struct CreateOrderUserDto {
  pub id: Option<Uuid>,
  pub email: String,
  pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderCommand {
  pub user: Option<CreateOrderUserDto>,
  pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
  pub order_id: Uuid,
  pub number: String,
  pub currency: String,
}

pub struct CreateOrderUseCase {
  order_service: Arc<OrderService>,
}

impl CreateOrderUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  pub async fn execute(
    &self,
    command: CreateOrderCommand,
  ) -> Result<CreateOrderResponse, OrderError> {
    let currency = command.currency.map(CurrencyCode::new).transpose()?;

    let user = match command.user {
      Some(dto) => {
        let email = Email::new(dto.email)?;
        let username = Username::new(dto.username)?;
        Some(match dto.id {
          Some(id) => User::from_parts(id, email, username, chrono::Utc::now()),
          None => User::new(email, username),
        })
      }
      None => None,
    };

    let order = self.order_service.create_order(user, currency).await?;

    Ok(CreateOrderResponse {
      order_id: order.id(),
      number: order
        .number()
        .map(|n| n.value().to_string())
        .unwrap_or_default(),
      currency: order
        .currency()
        .map(|c| c.as_str().to_string())
        .unwrap_or_default(),
    })
  }
}
