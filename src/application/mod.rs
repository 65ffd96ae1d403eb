//! Application layer
//!
//! Use cases that turn commands into calls on domain services and shape the
//! results into response DTOs.

pub mod order;
