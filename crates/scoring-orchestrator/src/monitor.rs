//! Operation timing and slow-operation alerts.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use scoring_core::{Instrumentation, OperationKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStats {
    pub count: u64,
    pub failures: u64,
    pub total_duration_ms: f64,
    pub max_duration_ms: f64,
    pub alerts: u64,
}

impl OperationStats {
    pub fn average_duration_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_duration_ms / self.count as f64
        }
    }
}

/// Collects per-operation durations and logs an alert when an operation
/// runs longer than the threshold for its kind
pub struct PerformanceMonitor {
    operations: DashMap<String, OperationStats>,
    pillar_threshold: Duration,
    evaluation_threshold: Duration,
    total_alerts: AtomicU64,
}

impl PerformanceMonitor {
    pub fn new(pillar_threshold: Duration, evaluation_threshold: Duration) -> Self {
        Self {
            operations: DashMap::new(),
            pillar_threshold,
            evaluation_threshold,
            total_alerts: AtomicU64::new(0),
        }
    }

    fn threshold(&self, kind: OperationKind) -> Duration {
        match kind {
            OperationKind::Pillar => self.pillar_threshold,
            OperationKind::Evaluation => self.evaluation_threshold,
        }
    }

    pub fn stats(&self, operation: &str) -> Option<OperationStats> {
        self.operations.get(operation).map(|s| s.value().clone())
    }

    /// Copy of every operation's stats, sorted by name
    pub fn snapshot(&self) -> Vec<(String, OperationStats)> {
        let mut all: Vec<(String, OperationStats)> = self
            .operations
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    pub fn total_alerts(&self) -> u64 {
        self.total_alerts.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.operations.clear();
        self.total_alerts.store(0, Ordering::Relaxed);
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new(Duration::from_millis(250), Duration::from_millis(2000))
    }
}

impl Instrumentation for PerformanceMonitor {
    fn record(&self, operation: &str, kind: OperationKind, elapsed: Duration, success: bool) {
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        let threshold = self.threshold(kind);
        let slow = elapsed > threshold;

        {
            let mut stats = self.operations.entry(operation.to_string()).or_default();
            stats.count += 1;
            if !success {
                stats.failures += 1;
            }
            stats.total_duration_ms += elapsed_ms;
            stats.max_duration_ms = stats.max_duration_ms.max(elapsed_ms);
            if slow {
                stats.alerts += 1;
            }
        }

        if slow {
            self.total_alerts.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                "Slow {:?} operation {}: {:.1}ms exceeds {}ms threshold",
                kind,
                operation,
                elapsed_ms,
                threshold.as_millis()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring_core::measure;

    #[test]
    fn test_record_accumulates() {
        let monitor = PerformanceMonitor::default();
        monitor.record("pillar.assetQuality", OperationKind::Pillar, Duration::from_millis(10), true);
        monitor.record("pillar.assetQuality", OperationKind::Pillar, Duration::from_millis(30), false);

        let stats = monitor.stats("pillar.assetQuality").unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.failures, 1);
        assert!((stats.max_duration_ms - 30.0).abs() < 1e-9);
        assert!((stats.average_duration_ms() - 20.0).abs() < 1e-9);
        assert_eq!(monitor.total_alerts(), 0);
    }

    #[test]
    fn test_alert_thresholds_per_kind() {
        let monitor = PerformanceMonitor::new(Duration::from_millis(5), Duration::from_millis(50));
        monitor.record("pillar.marketOutlook", OperationKind::Pillar, Duration::from_millis(10), true);
        monitor.record("evaluate", OperationKind::Evaluation, Duration::from_millis(10), true);

        assert_eq!(monitor.total_alerts(), 1);
        assert_eq!(monitor.stats("pillar.marketOutlook").unwrap().alerts, 1);
        assert_eq!(monitor.stats("evaluate").unwrap().alerts, 0);
    }

    #[test]
    fn test_measure_passes_result_through() {
        let monitor = PerformanceMonitor::default();
        let ok: Result<u32, String> = measure(&monitor, "op", OperationKind::Pillar, || Ok(7));
        let err: Result<u32, String> =
            measure(&monitor, "op", OperationKind::Pillar, || Err("boom".to_string()));

        assert_eq!(ok, Ok(7));
        assert_eq!(err, Err("boom".to_string()));
        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].1.count, 2);
        assert_eq!(snapshot[0].1.failures, 1);
    }
}
