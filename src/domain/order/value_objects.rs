use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid currency code: {0}")]
  InvalidCurrency(String),
  #[error("Invalid order number: {0}")]
  InvalidOrderNumber(String),
  #[error("Invalid address: {0}")]
  InvalidAddress(String),
  #[error("Invalid quantity: {0}")]
  InvalidQuantity(String),
  #[error("Invalid SKU: {0}")]
  InvalidSku(String),
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
  #[error("Invalid coupon code: {0}")]
  InvalidCouponCode(String),
}

// Currency Code - ISO 4217, three letters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
  pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
      return Err(ValueObjectError::InvalidCurrency(format!(
        "Currency code must be three letters, got '{}'",
        value
      )));
    }
    Ok(Self(trimmed.to_ascii_uppercase()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl FromStr for CurrencyCode {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::new(s)
  }
}

impl TryFrom<String> for CurrencyCode {
  type Error = ValueObjectError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::new(value)
  }
}

impl From<CurrencyCode> for String {
  fn from(code: CurrencyCode) -> Self {
    code.0
  }
}

impl fmt::Display for CurrencyCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Order Number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderNumber(String);

impl OrderNumber {
  pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidOrderNumber(
        "Order number cannot be empty".to_string(),
      ));
    }
    if trimmed.len() > 255 {
      return Err(ValueObjectError::InvalidOrderNumber(
        "Order number cannot exceed 255 characters".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  /// Zero-padded sequential number, e.g. `000000042`.
  pub fn sequential(sequence: u64, padding: usize) -> Self {
    Self(format!("{:0width$}", sequence, width = padding))
  }

  pub fn value(&self) -> &str {
    &self.0
  }
}

impl TryFrom<String> for OrderNumber {
  type Error = ValueObjectError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::new(value)
  }
}

impl From<OrderNumber> for String {
  fn from(number: OrderNumber) -> Self {
    number.0
  }
}

impl fmt::Display for OrderNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Adjustment Label
//
// Labels are only built from strings, and a reserved tag always maps to its own
// variant, so `Other` never holds a reserved tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AdjustmentLabel {
  Tax,
  Promotion,
  Shipping,
  Other(CustomLabel),
}

/// Free-form label outside the reserved tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomLabel(String);

impl CustomLabel {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl AdjustmentLabel {
  pub const TAX: &'static str = "tax";
  pub const PROMOTION: &'static str = "promotion";
  pub const SHIPPING: &'static str = "shipping";

  pub fn as_str(&self) -> &str {
    match self {
      AdjustmentLabel::Tax => Self::TAX,
      AdjustmentLabel::Promotion => Self::PROMOTION,
      AdjustmentLabel::Shipping => Self::SHIPPING,
      AdjustmentLabel::Other(label) => label.as_str(),
    }
  }
}

impl From<&str> for AdjustmentLabel {
  fn from(value: &str) -> Self {
    match value {
      Self::TAX => AdjustmentLabel::Tax,
      Self::PROMOTION => AdjustmentLabel::Promotion,
      Self::SHIPPING => AdjustmentLabel::Shipping,
      other => AdjustmentLabel::Other(CustomLabel(other.to_string())),
    }
  }
}

impl From<String> for AdjustmentLabel {
  fn from(value: String) -> Self {
    AdjustmentLabel::from(value.as_str())
  }
}

impl From<AdjustmentLabel> for String {
  fn from(label: AdjustmentLabel) -> Self {
    match label {
      AdjustmentLabel::Other(label) => label.0,
      known => known.as_str().to_string(),
    }
  }
}

impl fmt::Display for AdjustmentLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

// Shipment State
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipmentState {
  Checkout,
  Onhold,
  Pending,
  Ready,
  Backordered,
  Shipped,
  Returned,
  Cancelled,
}

// Inventory State
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryState {
  Checkout,
  Onhold,
  Sold,
  Backordered,
  Returned,
}

// Promotion Coupon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionCoupon {
  code: String,
}

impl PromotionCoupon {
  pub fn new(code: impl Into<String>) -> Result<Self, ValueObjectError> {
    let code = code.into();
    let trimmed = code.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidCouponCode(
        "Coupon code cannot be empty".to_string(),
      ));
    }
    Ok(Self {
      code: trimmed.to_string(),
    })
  }

  pub fn code(&self) -> &str {
    &self.code
  }
}

// Address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  pub first_name: String,
  pub last_name: String,
  pub company: Option<String>,
  pub street: String,
  pub city: String,
  pub postcode: String,
  pub country_code: String,
  pub province: Option<String>,
  pub phone: Option<String>,
}

/// Required address fields, in the order `Address::new` takes them.
pub struct AddressFields {
  pub first_name: String,
  pub last_name: String,
  pub street: String,
  pub city: String,
  pub postcode: String,
  pub country_code: String,
}

impl Address {
  pub fn new(fields: AddressFields) -> Result<Self, ValueObjectError> {
    let required = [
      ("first name", &fields.first_name),
      ("last name", &fields.last_name),
      ("street", &fields.street),
      ("city", &fields.city),
      ("postcode", &fields.postcode),
    ];
    for (name, value) in required {
      if value.trim().is_empty() {
        return Err(ValueObjectError::InvalidAddress(format!(
          "{} cannot be empty",
          name
        )));
      }
    }

    let country_code = fields.country_code.trim();
    if country_code.len() != 2 || !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
      return Err(ValueObjectError::InvalidAddress(format!(
        "Country code must be two letters, got '{}'",
        fields.country_code
      )));
    }

    Ok(Self {
      first_name: fields.first_name.trim().to_string(),
      last_name: fields.last_name.trim().to_string(),
      company: None,
      street: fields.street.trim().to_string(),
      city: fields.city.trim().to_string(),
      postcode: fields.postcode.trim().to_string(),
      country_code: country_code.to_ascii_uppercase(),
      province: None,
      phone: None,
    })
  }

  pub fn with_company(mut self, company: impl Into<String>) -> Self {
    self.company = Some(company.into());
    self
  }

  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }

  pub fn format_multiline(&self) -> String {
    let mut lines = vec![self.full_name()];
    if let Some(company) = &self.company {
      if !company.trim().is_empty() {
        lines.push(company.clone());
      }
    }
    lines.push(self.street.clone());

    let mut city_line = vec![self.postcode.clone(), self.city.clone()];
    if let Some(province) = &self.province {
      if !province.trim().is_empty() {
        city_line.push(province.clone());
      }
    }
    lines.push(city_line.join(" "));
    lines.push(self.country_code.clone());
    lines.join("\n")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fields() -> AddressFields {
    AddressFields {
      first_name: "Jane".to_string(),
      last_name: "Doe".to_string(),
      street: "Main St 1".to_string(),
      city: "Warsaw".to_string(),
      postcode: "00-001".to_string(),
      country_code: "pl".to_string(),
    }
  }

  #[test]
  fn test_currency_code() {
    assert_eq!(CurrencyCode::new("eur").unwrap().as_str(), "EUR");
    assert_eq!(CurrencyCode::from_str(" usd ").unwrap().to_string(), "USD");
    assert!(CurrencyCode::new("EURO").is_err());
    assert!(CurrencyCode::new("E1R").is_err());
    assert!(CurrencyCode::new("").is_err());
  }

  #[test]
  fn test_order_number() {
    assert!(OrderNumber::new("".to_string()).is_err());
    assert!(OrderNumber::new("x".repeat(256)).is_err());
    assert_eq!(OrderNumber::new(" 000123 ").unwrap().value(), "000123");
    assert_eq!(OrderNumber::sequential(42, 9).value(), "000000042");
  }

  #[test]
  fn test_adjustment_label_mapping() {
    assert_eq!(AdjustmentLabel::from("tax"), AdjustmentLabel::Tax);
    assert_eq!(AdjustmentLabel::from("promotion"), AdjustmentLabel::Promotion);
    assert_eq!(AdjustmentLabel::from("shipping"), AdjustmentLabel::Shipping);
    assert!(matches!(
      AdjustmentLabel::from("Tax"),
      AdjustmentLabel::Other(ref label) if label.as_str() == "Tax"
    ));
    assert_eq!(String::from(AdjustmentLabel::Shipping), "shipping");
    assert_eq!(String::from(AdjustmentLabel::from("handling")), "handling");
  }

  #[test]
  fn test_reserved_tags_never_become_custom_labels() {
    for (tag, expected) in [
      ("tax", AdjustmentLabel::Tax),
      ("promotion", AdjustmentLabel::Promotion),
      ("shipping", AdjustmentLabel::Shipping),
    ] {
      assert_eq!(AdjustmentLabel::from(tag), expected);
      assert_eq!(AdjustmentLabel::from(tag.to_string()), expected);
      let parsed: AdjustmentLabel = serde_json::from_value(serde_json::json!(tag)).unwrap();
      assert_eq!(parsed, expected);
      assert!(!matches!(parsed, AdjustmentLabel::Other(_)));
    }
  }

  #[test]
  fn test_adjustment_label_serde() {
    let json = serde_json::to_string(&AdjustmentLabel::Promotion).unwrap();
    assert_eq!(json, "\"promotion\"");
    let label: AdjustmentLabel = serde_json::from_str("\"gift-wrap\"").unwrap();
    assert_eq!(label, AdjustmentLabel::from("gift-wrap"));
    assert_eq!(label.as_str(), "gift-wrap");
  }

  #[test]
  fn test_states_serde() {
    let state: ShipmentState = serde_json::from_str("\"shipped\"").unwrap();
    assert_eq!(state, ShipmentState::Shipped);
    assert!(serde_json::from_str::<ShipmentState>("\"lost\"").is_err());
    assert_eq!(
      serde_json::to_string(&InventoryState::Backordered).unwrap(),
      "\"backordered\""
    );
  }

  #[test]
  fn test_coupon() {
    assert!(PromotionCoupon::new("  ").is_err());
    assert_eq!(PromotionCoupon::new("SPRING").unwrap().code(), "SPRING");
  }

  #[test]
  fn test_address() {
    let address = Address::new(fields()).unwrap().with_company("Acme");
    assert_eq!(address.country_code, "PL");
    assert_eq!(address.full_name(), "Jane Doe");
    assert_eq!(
      address.format_multiline(),
      "Jane Doe\nAcme\nMain St 1\n00-001 Warsaw\nPL"
    );
  }

  #[test]
  fn test_address_rejects_blank_and_bad_country() {
    let mut blank = fields();
    blank.city = "  ".to_string();
    assert!(Address::new(blank).is_err());

    let mut bad_country = fields();
    bad_country.country_code = "POL".to_string();
    assert!(Address::new(bad_country).is_err());
  }
}
