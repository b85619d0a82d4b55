//! HTTP request handlers.

pub mod dispatch;
pub mod health;
pub mod metrics;

pub use dispatch::dispatch_page;
pub use health::health_check;
pub use metrics::metrics;
