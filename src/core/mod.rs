//! Core Module - Shipment Lifecycle & Tracking Engine
//!
//! Identifier generation, the status/progress engine, receipt composition,
//! route mapping, creation notifications and the lifecycle service that
//! ties them together.

pub mod identifier;
pub mod lifecycle;
pub mod notify;
pub mod receipt;
pub mod route;
pub mod status;

pub use identifier::*;
pub use lifecycle::*;
pub use notify::*;
pub use receipt::*;
pub use route::*;
pub use status::*;
