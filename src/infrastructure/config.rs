use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::domain::order::{CurrencyCode, OrderDefaults, ValueObjectError};

fn default_currency() -> String {
  "USD".to_string()
}

fn default_number_padding() -> usize {
  9
}

fn default_log_filter() -> String {
  "shopcore=info".to_string()
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub order: OrderConfig,
  #[serde(default)]
  pub logging: LoggingConfig,
}

/// Defaults applied to new orders
#[derive(Debug, Clone, Deserialize)]
pub struct OrderConfig {
  /// ISO 4217 code used when an order is created without one
  #[serde(default = "default_currency")]
  pub default_currency: String,
  /// Width of zero-padded sequential order numbers
  #[serde(default = "default_number_padding")]
  pub number_padding: usize,
}

impl Default for OrderConfig {
  fn default() -> Self {
    Self {
      default_currency: default_currency(),
      number_padding: default_number_padding(),
    }
  }
}

impl OrderConfig {
  pub fn to_defaults(&self) -> Result<OrderDefaults, ValueObjectError> {
    Ok(OrderDefaults {
      currency: CurrencyCode::new(self.default_currency.as_str())?,
      number_padding: self.number_padding,
    })
  }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
  /// `EnvFilter` directive used when `RUST_LOG` is not set
  #[serde(default = "default_log_filter")]
  pub filter: String,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      filter: default_log_filter(),
    }
  }
}

impl Config {
  /// Load configuration from files and environment variables
  ///
  /// Later sources override earlier ones:
  /// 1. config/default.toml
  /// 2. config/local.toml (if exists)
  /// 3. config/{RUN_MODE}.toml (if exists)
  /// 4. Environment variables with SHOPCORE_ prefix
  ///
  /// # Environment Variables
  ///
  /// Sections are separated by double underscores:
  /// - `SHOPCORE_ORDER__DEFAULT_CURRENCY=EUR`
  /// - `SHOPCORE_ORDER__NUMBER_PADDING=6`
  /// - `SHOPCORE_LOGGING__FILTER=shopcore=debug`
  pub fn load() -> Result<Self, ConfigError> {
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    let config = ConfigBuilder::builder()
      .add_source(File::with_name("config/default").required(true))
      .add_source(File::with_name("config/local").required(false))
      .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
      .add_source(
        Environment::with_prefix("SHOPCORE")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;

    config.try_deserialize()
  }
}
