pub mod create_order;
pub mod get_order_summary;

pub use create_order::{
  CreateOrderCommand, CreateOrderResponse, CreateOrderUseCase, CreateOrderUserDto,
};
pub use get_order_summary::{
  GetOrderSummaryCommand, GetOrderSummaryUseCase, OrderSummaryResponse,
};
