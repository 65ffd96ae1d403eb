use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{Email, Username};

/// Customer account an order can be attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  /// Unique identifier for the user
  pub id: Uuid,
  pub email: Email,
  pub username: Username,
  pub created_at: DateTime<Utc>,
}

impl User {
  pub fn new(email: Email, username: Username) -> Self {
    Self {
      id: Uuid::new_v4(),
      email,
      username,
      created_at: Utc::now(),
    }
  }

  /// Reconstruct a known user
  pub fn from_parts(
    id: Uuid,
    email: Email,
    username: Username,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      email,
      username,
      created_at,
    }
  }
}
