pub mod builder;
pub mod handler;
pub mod response;

pub use builder::{serve_listener, ServerBuilder};
pub use handler::{StatusHandler, DEFAULT_HEALTH_PATH};
