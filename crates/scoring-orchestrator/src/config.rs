use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Runtime settings for [`crate::ScoringOrchestrator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub cache_ttl: Duration,              // 30 minutes
    pub cache_max_entries: usize,         // 1000
    pub model_accuracy: f64,              // 0.75, historical backtest accuracy
    pub batch_concurrency: usize,         // 4 companies in flight
    pub pillar_alert_threshold: Duration, // 250ms
    pub evaluation_alert_threshold: Duration, // 2s
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(1800),
            cache_max_entries: 1000,
            model_accuracy: 0.75,
            batch_concurrency: 4,
            pillar_alert_threshold: Duration::from_millis(250),
            evaluation_alert_threshold: Duration::from_millis(2000),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}

impl OrchestratorConfig {
    /// Read `SCORING_*` environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            cache_ttl: Duration::from_secs(parse_or(
                &lookup,
                "SCORING_CACHE_TTL_SECS",
                defaults.cache_ttl.as_secs(),
            )?),
            cache_max_entries: parse_or(&lookup, "SCORING_CACHE_MAX_ENTRIES", defaults.cache_max_entries)?,
            model_accuracy: parse_or(&lookup, "SCORING_MODEL_ACCURACY", defaults.model_accuracy)?,
            batch_concurrency: parse_or(&lookup, "SCORING_BATCH_CONCURRENCY", defaults.batch_concurrency)?,
            pillar_alert_threshold: Duration::from_millis(parse_or(
                &lookup,
                "SCORING_PILLAR_ALERT_MS",
                defaults.pillar_alert_threshold.as_millis() as u64,
            )?),
            evaluation_alert_threshold: Duration::from_millis(parse_or(
                &lookup,
                "SCORING_EVALUATION_ALERT_MS",
                defaults.evaluation_alert_threshold.as_millis() as u64,
            )?),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.model_accuracy) {
            bail!("SCORING_MODEL_ACCURACY must be between 0 and 1, got {}", self.model_accuracy);
        }
        if self.batch_concurrency == 0 {
            bail!("SCORING_BATCH_CONCURRENCY must be at least 1");
        }
        if self.cache_max_entries == 0 {
            bail!("SCORING_CACHE_MAX_ENTRIES must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = OrchestratorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, OrchestratorConfig::default());
        assert_eq!(config.cache_ttl, Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_overrides() {
        let config = OrchestratorConfig::from_lookup(lookup(&[
            ("SCORING_CACHE_TTL_SECS", "60"),
            ("SCORING_MODEL_ACCURACY", "0.9"),
            ("SCORING_BATCH_CONCURRENCY", " 8 "),
        ]))
        .unwrap();
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.model_accuracy, 0.9);
        assert_eq!(config.batch_concurrency, 8);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = OrchestratorConfig::from_lookup(lookup(&[("SCORING_CACHE_TTL_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("SCORING_CACHE_TTL_SECS"));

        assert!(OrchestratorConfig::from_lookup(lookup(&[("SCORING_MODEL_ACCURACY", "1.5")])).is_err());
        assert!(OrchestratorConfig::from_lookup(lookup(&[("SCORING_BATCH_CONCURRENCY", "0")])).is_err());
    }
}
