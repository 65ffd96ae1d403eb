pub mod entities;
pub mod errors;
pub mod ports;
pub mod promotion;
pub mod services;
pub mod value_objects;

pub use entities::{Adjustment, InventoryUnit, Order, OrderItem, Shipment};
pub use errors::OrderError;
pub use ports::OrderRepository;
pub use promotion::PromotionSubject;
pub use services::{OrderDefaults, OrderService};
pub use value_objects::{
  Address, AddressFields, AdjustmentLabel, CurrencyCode, CustomLabel, InventoryState,
  OrderNumber, PromotionCoupon, ShipmentState, ValueObjectError,
};
