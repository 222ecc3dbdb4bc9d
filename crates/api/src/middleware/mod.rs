//! HTTP middleware components.

pub mod logging;
pub mod metrics;
pub mod request_log;

pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use request_log::{request_log, RequestId, REQUEST_ID_HEADER};
