use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Health status of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Point-in-time health report for the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineHealth {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    /// Account slots tracked by the registry (locks persist across deletes).
    pub tracked_accounts: usize,
}

/// Health checker for the engine. The ledger has no external dependencies
/// to probe, so liveness and readiness reduce to the process being up.
#[derive(Debug)]
pub struct HealthChecker {
    start_time: Instant,
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthChecker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn report(&self, tracked_accounts: usize) -> EngineHealth {
        EngineHealth {
            status: HealthStatus::Healthy,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.uptime_seconds(),
            tracked_accounts,
        }
    }

    pub fn is_alive(&self) -> bool {
        true
    }

    pub fn is_ready(&self) -> bool {
        true
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status() {
        assert!(HealthStatus::Healthy.is_healthy());
        assert!(!HealthStatus::Unhealthy.is_healthy());
    }

    #[test]
    fn test_report_contents() {
        let checker = HealthChecker::new();
        let report = checker.report(3);

        assert_eq!(report.status, HealthStatus::Healthy);
        assert_eq!(report.tracked_accounts, 3);
        assert_eq!(report.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_liveness_and_readiness() {
        let checker = HealthChecker::new();
        assert!(checker.is_alive());
        assert!(checker.is_ready());
    }
}
