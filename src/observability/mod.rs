pub mod health;
pub mod logging;
pub mod metrics;

pub use health::{EngineHealth, HealthChecker, HealthStatus};
pub use logging::{init_logging, mask_customer_id, mask_sensitive, LogConfig, LogFormat};
pub use metrics::{get_metrics, init_metrics, LatencyTimer, Metrics, METRICS};
