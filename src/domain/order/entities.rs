use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::OrderError;
use super::value_objects::{
  Address, AdjustmentLabel, CurrencyCode, InventoryState, OrderNumber, ShipmentState,
  ValueObjectError,
};
use crate::domain::user::User;

// Adjustment - Labelled monetary delta in minor units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
  #[serde(default = "Uuid::new_v4")]
  pub id: Uuid,
  pub label: AdjustmentLabel,
  #[serde(default)]
  pub description: Option<String>,
  pub amount: i64,
  #[serde(default = "Utc::now")]
  pub created_at: DateTime<Utc>,
}

impl Adjustment {
  pub fn new(label: impl Into<AdjustmentLabel>, amount: i64) -> Self {
    Self {
      id: Uuid::new_v4(),
      label: label.into(),
      description: None,
      amount,
      created_at: Utc::now(),
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }
}

// Sums saturate at the i64 bounds instead of wrapping.
fn sum_amounts<'a>(adjustments: impl Iterator<Item = &'a Adjustment>) -> i64 {
  adjustments
    .map(|adjustment| adjustment.amount)
    .fold(0, i64::saturating_add)
}

fn checked_subtotal(quantity: u32, unit_price: i64) -> Result<i64, ValueObjectError> {
  i64::from(quantity).checked_mul(unit_price).ok_or_else(|| {
    ValueObjectError::InvalidAmount(format!(
      "{} x {} does not fit in a line subtotal",
      quantity, unit_price
    ))
  })
}

// Order Item - One line of the order
//
// A line always has a non-blank SKU, a quantity of at least one and a subtotal
// that fits in an i64. Deserialization goes through the same checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OrderItemRecord")]
pub struct OrderItem {
  pub id: Uuid,
  sku: String,
  quantity: u32,
  unit_price: i64,
  adjustments: Vec<Adjustment>,
  /// Ids of items folded into this line by `Order::add_item`.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  merged_ids: Vec<Uuid>,
}

impl OrderItem {
  pub fn new(
    sku: impl Into<String>,
    quantity: u32,
    unit_price: i64,
  ) -> Result<Self, ValueObjectError> {
    let sku = sku.into();
    let trimmed = sku.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidSku("SKU cannot be empty".to_string()));
    }
    if quantity == 0 {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity must be at least 1".to_string(),
      ));
    }
    checked_subtotal(quantity, unit_price)?;

    Ok(Self {
      id: Uuid::new_v4(),
      sku: trimmed.to_string(),
      quantity,
      unit_price,
      adjustments: Vec::new(),
      merged_ids: Vec::new(),
    })
  }

  pub fn sku(&self) -> &str {
    &self.sku
  }

  pub fn quantity(&self) -> u32 {
    self.quantity
  }

  pub fn set_quantity(&mut self, quantity: u32) -> Result<(), ValueObjectError> {
    if quantity == 0 {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity must be at least 1".to_string(),
      ));
    }
    checked_subtotal(quantity, self.unit_price)?;
    self.quantity = quantity;
    Ok(())
  }

  pub fn unit_price(&self) -> i64 {
    self.unit_price
  }

  pub fn adjustments(&self) -> &[Adjustment] {
    &self.adjustments
  }

  pub fn add_adjustment(&mut self, adjustment: Adjustment) {
    if !self.adjustments.iter().any(|a| a.id == adjustment.id) {
      self.adjustments.push(adjustment);
    }
  }

  pub fn remove_adjustment(&mut self, adjustment_id: Uuid) -> Option<Adjustment> {
    let index = self.adjustments.iter().position(|a| a.id == adjustment_id)?;
    Some(self.adjustments.remove(index))
  }

  pub fn adjustments_total(&self) -> i64 {
    sum_amounts(self.adjustments.iter())
  }

  pub fn subtotal(&self) -> i64 {
    i64::from(self.quantity).saturating_mul(self.unit_price)
  }

  /// Subtotal plus item adjustments, never below zero.
  pub fn total(&self) -> i64 {
    self
      .subtotal()
      .saturating_add(self.adjustments_total())
      .max(0)
  }

  /// Two lines are merged when they sell the same SKU at the same price.
  pub fn is_same_line(&self, other: &OrderItem) -> bool {
    self.sku == other.sku && self.unit_price == other.unit_price
  }

  /// True when `item_id` is this line or was merged into it.
  fn holds(&self, item_id: Uuid) -> bool {
    self.id == item_id || self.merged_ids.contains(&item_id)
  }

  fn merge(&mut self, other: OrderItem) -> Result<(), ValueObjectError> {
    let quantity = self.quantity.checked_add(other.quantity).ok_or_else(|| {
      ValueObjectError::InvalidQuantity(format!(
        "Merging {} into {} units of {} overflows",
        other.quantity, self.quantity, self.sku
      ))
    })?;
    checked_subtotal(quantity, self.unit_price)?;

    self.quantity = quantity;
    self.merged_ids.push(other.id);
    self.merged_ids.extend(other.merged_ids);
    for adjustment in other.adjustments {
      self.add_adjustment(adjustment);
    }
    Ok(())
  }
}

#[derive(Deserialize)]
struct OrderItemRecord {
  #[serde(default = "Uuid::new_v4")]
  id: Uuid,
  sku: String,
  quantity: u32,
  unit_price: i64,
  #[serde(default)]
  adjustments: Vec<Adjustment>,
  #[serde(default)]
  merged_ids: Vec<Uuid>,
}

impl TryFrom<OrderItemRecord> for OrderItem {
  type Error = ValueObjectError;

  fn try_from(record: OrderItemRecord) -> Result<Self, Self::Error> {
    let mut item = OrderItem::new(record.sku, record.quantity, record.unit_price)?;
    item.id = record.id;
    item.merged_ids = record.merged_ids;
    for adjustment in record.adjustments {
      item.add_adjustment(adjustment);
    }
    Ok(item)
  }
}

// Shipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
  #[serde(default = "Uuid::new_v4")]
  pub id: Uuid,
  pub state: ShipmentState,
  #[serde(default)]
  pub method: Option<String>,
  #[serde(default)]
  pub tracking: Option<String>,
  #[serde(default)]
  order_id: Option<Uuid>,
}

impl Shipment {
  pub fn new() -> Self {
    Self {
      id: Uuid::new_v4(),
      state: ShipmentState::Checkout,
      method: None,
      tracking: None,
      order_id: None,
    }
  }

  pub fn with_method(mut self, method: impl Into<String>) -> Self {
    self.method = Some(method.into());
    self
  }

  /// The order this shipment belongs to; only `Order` maintains it.
  pub fn order_id(&self) -> Option<Uuid> {
    self.order_id
  }

  pub(crate) fn set_order(&mut self, order_id: Option<Uuid>) {
    self.order_id = order_id;
  }
}

impl Default for Shipment {
  fn default() -> Self {
    Self::new()
  }
}

// Inventory Unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryUnit {
  #[serde(default = "Uuid::new_v4")]
  pub id: Uuid,
  pub sku: String,
  pub inventory_state: InventoryState,
  pub shipping_state: ShipmentState,
  #[serde(default)]
  order_id: Option<Uuid>,
  #[serde(default = "Utc::now")]
  pub created_at: DateTime<Utc>,
}

impl InventoryUnit {
  pub fn new(sku: impl Into<String>) -> Self {
    Self {
      id: Uuid::new_v4(),
      sku: sku.into(),
      inventory_state: InventoryState::Checkout,
      shipping_state: ShipmentState::Checkout,
      order_id: None,
      created_at: Utc::now(),
    }
  }

  pub fn order_id(&self) -> Option<Uuid> {
    self.order_id
  }

  pub fn is_sold(&self) -> bool {
    self.inventory_state == InventoryState::Sold
  }

  pub fn is_backordered(&self) -> bool {
    self.inventory_state == InventoryState::Backordered
  }

  pub(crate) fn set_order(&mut self, order_id: Option<Uuid>) {
    self.order_id = order_id;
  }
}

// Order - Aggregate root
//
// Shipments and inventory units carry a back-reference to the order. It is
// written only by the add/remove methods below and re-linked on
// deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OrderRecord")]
pub struct Order {
  id: Uuid,
  number: Option<OrderNumber>,
  currency: Option<CurrencyCode>,
  user: Option<User>,
  shipping_address: Option<Address>,
  billing_address: Option<Address>,
  items: Vec<OrderItem>,
  adjustments: Vec<Adjustment>,
  shipments: Vec<Shipment>,
  inventory_units: Vec<InventoryUnit>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
  completed_at: Option<DateTime<Utc>>,
}

impl Order {
  pub fn new() -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      number: None,
      currency: None,
      user: None,
      shipping_address: None,
      billing_address: None,
      items: Vec::new(),
      adjustments: Vec::new(),
      shipments: Vec::new(),
      inventory_units: Vec::new(),
      created_at: now,
      updated_at: now,
      completed_at: None,
    }
  }

  fn touch(&mut self) {
    self.updated_at = Utc::now();
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn number(&self) -> Option<&OrderNumber> {
    self.number.as_ref()
  }

  pub fn set_number(&mut self, number: OrderNumber) -> &mut Self {
    self.number = Some(number);
    self.touch();
    self
  }

  pub fn currency(&self) -> Option<&CurrencyCode> {
    self.currency.as_ref()
  }

  pub fn set_currency(&mut self, currency: CurrencyCode) -> &mut Self {
    self.currency = Some(currency);
    self.touch();
    self
  }

  pub fn user(&self) -> Option<&User> {
    self.user.as_ref()
  }

  pub fn set_user(&mut self, user: User) -> &mut Self {
    self.user = Some(user);
    self.touch();
    self
  }

  pub fn shipping_address(&self) -> Option<&Address> {
    self.shipping_address.as_ref()
  }

  pub fn set_shipping_address(&mut self, address: Address) {
    self.shipping_address = Some(address);
    self.touch();
  }

  pub fn billing_address(&self) -> Option<&Address> {
    self.billing_address.as_ref()
  }

  pub fn set_billing_address(&mut self, address: Address) {
    self.billing_address = Some(address);
    self.touch();
  }

  pub fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }

  /// Overwrites the creation timestamp as given, without touching `updated_at`.
  pub fn set_created_at(&mut self, created_at: DateTime<Utc>) {
    self.created_at = created_at;
  }

  pub fn updated_at(&self) -> DateTime<Utc> {
    self.updated_at
  }

  pub fn completed_at(&self) -> Option<DateTime<Utc>> {
    self.completed_at
  }

  pub fn is_completed(&self) -> bool {
    self.completed_at.is_some()
  }

  pub fn complete(&mut self) -> Result<(), OrderError> {
    if self.is_completed() {
      return Err(OrderError::AlreadyCompleted(self.id));
    }
    let now = Utc::now();
    self.completed_at = Some(now);
    self.updated_at = now;
    Ok(())
  }

  // Items

  pub fn items(&self) -> &[OrderItem] {
    &self.items
  }

  /// Adds a line, merging it into an existing line for the same SKU and price.
  ///
  /// An item whose id the order already holds, as a line or merged into one,
  /// is ignored. Fails without changing the order when the merged quantity or
  /// subtotal would overflow.
  pub fn add_item(&mut self, item: OrderItem) -> Result<&mut Self, OrderError> {
    if self.has_item(item.id) {
      return Ok(self);
    }
    match self.items.iter_mut().find(|existing| existing.is_same_line(&item)) {
      Some(existing) => existing.merge(item)?,
      None => self.items.push(item),
    }
    self.touch();
    Ok(self)
  }

  /// Removes the line holding `item_id`, together with anything merged into it.
  pub fn remove_item(&mut self, item_id: Uuid) -> Option<OrderItem> {
    let index = self.items.iter().position(|item| item.holds(item_id))?;
    self.touch();
    Some(self.items.remove(index))
  }

  pub fn has_item(&self, item_id: Uuid) -> bool {
    self.items.iter().any(|item| item.holds(item_id))
  }

  pub fn clear_items(&mut self) -> &mut Self {
    self.items.clear();
    self.touch();
    self
  }

  pub fn total_quantity(&self) -> u64 {
    self.items.iter().map(|item| u64::from(item.quantity)).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn items_total(&self) -> i64 {
    self
      .items
      .iter()
      .map(OrderItem::total)
      .fold(0, i64::saturating_add)
  }

  // Adjustments

  pub fn adjustments(&self) -> &[Adjustment] {
    &self.adjustments
  }

  pub fn add_adjustment(&mut self, adjustment: Adjustment) -> &mut Self {
    if !self.has_adjustment(adjustment.id) {
      self.adjustments.push(adjustment);
      self.touch();
    }
    self
  }

  pub fn remove_adjustment(&mut self, adjustment_id: Uuid) -> Option<Adjustment> {
    let index = self.adjustments.iter().position(|a| a.id == adjustment_id)?;
    self.touch();
    Some(self.adjustments.remove(index))
  }

  pub fn has_adjustment(&self, adjustment_id: Uuid) -> bool {
    self.adjustments.iter().any(|a| a.id == adjustment_id)
  }

  pub fn clear_adjustments(&mut self) -> &mut Self {
    self.adjustments.clear();
    self.touch();
    self
  }

  pub fn adjustments_total(&self) -> i64 {
    sum_amounts(self.adjustments.iter())
  }

  /// Fresh view over the adjustments carrying `label`, in collection order.
  pub fn adjustments_labelled<'a>(
    &'a self,
    label: &'a AdjustmentLabel,
  ) -> impl Iterator<Item = &'a Adjustment> + 'a {
    self.adjustments.iter().filter(move |a| &a.label == label)
  }

  pub fn adjustments_labelled_total(&self, label: &AdjustmentLabel) -> i64 {
    sum_amounts(self.adjustments_labelled(label))
  }

  pub fn remove_adjustments_labelled(&mut self, label: &AdjustmentLabel) -> &mut Self {
    let before = self.adjustments.len();
    self.adjustments.retain(|a| &a.label != label);
    if self.adjustments.len() != before {
      self.touch();
    }
    self
  }

  pub fn tax_adjustments(&self) -> impl Iterator<Item = &Adjustment> + '_ {
    self
      .adjustments
      .iter()
      .filter(|a| a.label == AdjustmentLabel::Tax)
  }

  pub fn tax_total(&self) -> i64 {
    sum_amounts(self.tax_adjustments())
  }

  pub fn remove_tax_adjustments(&mut self) -> &mut Self {
    self.remove_adjustments_labelled(&AdjustmentLabel::Tax)
  }

  pub fn promotion_adjustments(&self) -> impl Iterator<Item = &Adjustment> + '_ {
    self
      .adjustments
      .iter()
      .filter(|a| a.label == AdjustmentLabel::Promotion)
  }

  pub fn promotion_total(&self) -> i64 {
    sum_amounts(self.promotion_adjustments())
  }

  pub fn remove_promotion_adjustments(&mut self) -> &mut Self {
    self.remove_adjustments_labelled(&AdjustmentLabel::Promotion)
  }

  pub fn shipping_adjustments(&self) -> impl Iterator<Item = &Adjustment> + '_ {
    self
      .adjustments
      .iter()
      .filter(|a| a.label == AdjustmentLabel::Shipping)
  }

  pub fn shipping_total(&self) -> i64 {
    sum_amounts(self.shipping_adjustments())
  }

  pub fn remove_shipping_adjustments(&mut self) -> &mut Self {
    self.remove_adjustments_labelled(&AdjustmentLabel::Shipping)
  }

  /// Items total plus order adjustments, never below zero.
  pub fn total(&self) -> i64 {
    self
      .items_total()
      .saturating_add(self.adjustments_total())
      .max(0)
  }

  // Shipments

  pub fn shipments(&self) -> &[Shipment] {
    &self.shipments
  }

  pub fn has_shipment(&self, shipment: &Shipment) -> bool {
    self.shipments.iter().any(|s| s.id == shipment.id)
  }

  pub fn add_shipment(&mut self, mut shipment: Shipment) -> &mut Self {
    if !self.has_shipment(&shipment) {
      shipment.set_order(Some(self.id));
      self.shipments.push(shipment);
      self.touch();
    }
    self
  }

  /// Detaches the shipment, returning it with its back-reference cleared.
  pub fn remove_shipment(&mut self, shipment: &Shipment) -> Option<Shipment> {
    self.remove_shipment_by_id(shipment.id)
  }

  pub fn remove_shipment_by_id(&mut self, shipment_id: Uuid) -> Option<Shipment> {
    let index = self.shipments.iter().position(|s| s.id == shipment_id)?;
    let mut removed = self.shipments.remove(index);
    removed.set_order(None);
    self.touch();
    Some(removed)
  }

  // Inventory units

  pub fn inventory_units(&self) -> &[InventoryUnit] {
    &self.inventory_units
  }

  pub fn add_inventory_unit(&mut self, mut unit: InventoryUnit) -> &mut Self {
    if !self.inventory_units.iter().any(|u| u.id == unit.id) {
      unit.set_order(Some(self.id));
      self.inventory_units.push(unit);
      self.touch();
    }
    self
  }

  pub fn remove_inventory_unit(&mut self, unit: &InventoryUnit) -> Option<InventoryUnit> {
    let index = self.inventory_units.iter().position(|u| u.id == unit.id)?;
    let mut removed = self.inventory_units.remove(index);
    removed.set_order(None);
    self.touch();
    Some(removed)
  }
}

impl Default for Order {
  fn default() -> Self {
    Self::new()
  }
}

// Wire shape of `Order`; converting re-links every back-reference.
#[derive(Deserialize)]
struct OrderRecord {
  #[serde(default = "Uuid::new_v4")]
  id: Uuid,
  #[serde(default)]
  number: Option<OrderNumber>,
  #[serde(default)]
  currency: Option<CurrencyCode>,
  #[serde(default)]
  user: Option<User>,
  #[serde(default)]
  shipping_address: Option<Address>,
  #[serde(default)]
  billing_address: Option<Address>,
  #[serde(default)]
  items: Vec<OrderItem>,
  #[serde(default)]
  adjustments: Vec<Adjustment>,
  #[serde(default)]
  shipments: Vec<Shipment>,
  #[serde(default)]
  inventory_units: Vec<InventoryUnit>,
  #[serde(default = "Utc::now")]
  created_at: DateTime<Utc>,
  #[serde(default = "Utc::now")]
  updated_at: DateTime<Utc>,
  #[serde(default)]
  completed_at: Option<DateTime<Utc>>,
}

impl From<OrderRecord> for Order {
  fn from(record: OrderRecord) -> Self {
    let mut order = Order {
      id: record.id,
      number: record.number,
      currency: record.currency,
      user: record.user,
      shipping_address: record.shipping_address,
      billing_address: record.billing_address,
      items: Vec::with_capacity(record.items.len()),
      adjustments: Vec::with_capacity(record.adjustments.len()),
      shipments: Vec::with_capacity(record.shipments.len()),
      inventory_units: Vec::with_capacity(record.inventory_units.len()),
      created_at: record.created_at,
      updated_at: record.updated_at,
      completed_at: record.completed_at,
    };

    // Stored lines are kept as they are; merging only applies to new items.
    for item in record.items {
      if !order.has_item(item.id) {
        order.items.push(item);
      }
    }
    for adjustment in record.adjustments {
      order.add_adjustment(adjustment);
    }
    for shipment in record.shipments {
      order.add_shipment(shipment);
    }
    for unit in record.inventory_units {
      order.add_inventory_unit(unit);
    }
    // Replaying the collections must not count as a modification.
    order.updated_at = record.updated_at;
    order
  }
}
