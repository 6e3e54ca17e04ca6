//! Shiptrack HTTP API Module
//! Public tracking surface plus the API-key guarded admin surface.

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use middleware::start_cleanup_task;
pub use routes::create_router;
pub use types::*;
