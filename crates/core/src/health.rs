//! Composite health reporting
//!
//! A report is "healthy" only if every sub-check is healthy; otherwise it
//! is "degraded" and keeps the failing sub-checks for diagnostics. Health
//! endpoints never fail the whole request because one dependency is down.

use serde::{Deserialize, Serialize};

/// Status of one sub-check or the aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// One named sub-check inside a composite report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HealthCheck {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Healthy,
            detail: None,
        }
    }

    pub fn unhealthy(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Unhealthy,
            detail: Some(detail.into()),
        }
    }
}

/// Aggregated health over a set of sub-checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub checks: Vec<HealthCheck>,
}

impl HealthReport {
    /// Aggregate sub-checks: healthy only if all are healthy.
    pub fn aggregate(checks: Vec<HealthCheck>) -> Self {
        let status = if checks.iter().all(|c| c.status.is_healthy()) {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        };
        Self { status, checks }
    }

    /// Names of the sub-checks that are not healthy
    pub fn failing(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| !c.status.is_healthy())
            .map(|c| c.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_healthy_aggregates_healthy() {
        let report = HealthReport::aggregate(vec![
            HealthCheck::healthy("collections"),
            HealthCheck::healthy("points"),
        ]);
        assert_eq!(report.status, HealthStatus::Healthy);
        assert!(report.failing().is_empty());
    }

    #[test]
    fn test_one_failure_degrades_and_is_retained() {
        let report = HealthReport::aggregate(vec![
            HealthCheck::healthy("collections"),
            HealthCheck::unhealthy("search", "timeout"),
        ]);
        assert_eq!(report.status, HealthStatus::Degraded);
        assert_eq!(report.failing(), vec!["search"]);
    }
}
