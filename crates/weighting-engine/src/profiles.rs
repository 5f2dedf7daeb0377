//! Named weight profiles
//!
//! Built-in presets are seeded at construction and cannot be replaced or
//! removed; user profiles are stored normalized.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use scoring_core::{ScoringError, WeightConfig};

use crate::weights::normalize_weights;

/// A stored weight vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightProfile {
    pub name: String,
    pub description: String,
    pub weights: WeightConfig,
    pub built_in: bool,
    pub created_at: DateTime<Utc>,
}

impl WeightProfile {
    fn preset(name: &str, description: &str, weights: [f64; 6]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            weights: WeightConfig::from_array(weights),
            built_in: true,
            created_at: Utc::now(),
        }
    }
}

fn presets() -> Vec<WeightProfile> {
    vec![
        WeightProfile::preset(
            "balanced",
            "Default weighting across all six pillars",
            WeightConfig::default().as_array(),
        ),
        WeightProfile::preset(
            "growth",
            "Favors pipeline quality and market upside",
            [0.30, 0.25, 0.10, 0.15, 0.10, 0.10],
        ),
        WeightProfile::preset(
            "conservative",
            "Favors balance-sheet strength and lower regulatory risk",
            [0.20, 0.15, 0.15, 0.10, 0.25, 0.15],
        ),
    ]
}

/// Thread-safe store of named weight profiles
pub struct ProfileStore {
    profiles: DashMap<String, WeightProfile>,
}

impl ProfileStore {
    /// Create a store seeded with the `balanced`, `growth` and `conservative` presets
    pub fn new() -> Self {
        let profiles = DashMap::new();
        for preset in presets() {
            profiles.insert(preset.name.clone(), preset);
        }
        Self { profiles }
    }

    /// Save a user profile. Weights must each lie in [0, 1] and not all be
    /// zero; the stored vector is normalized to sum to 1.0.
    pub fn save_profile(
        &self,
        name: &str,
        weights: &WeightConfig,
        description: Option<&str>,
    ) -> Result<WeightProfile, ScoringError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScoringError::ConfigurationError(
                "profile name cannot be empty".to_string(),
            ));
        }
        if let Some(existing) = self.profiles.get(name) {
            if existing.built_in {
                return Err(ScoringError::ConfigurationError(format!(
                    "built-in profile '{}' cannot be overwritten",
                    name
                )));
            }
        }
        if let Some(bad) = weights
            .as_array()
            .iter()
            .find(|w| !w.is_finite() || **w < 0.0 || **w > 1.0)
        {
            return Err(ScoringError::ConfigurationError(format!(
                "profile '{}' has weight {} outside [0, 1]",
                name, bad
            )));
        }
        if weights.sum() == 0.0 {
            return Err(ScoringError::ConfigurationError(
                "all weights cannot be zero".to_string(),
            ));
        }

        let profile = WeightProfile {
            name: name.to_string(),
            description: description.unwrap_or_default().to_string(),
            weights: normalize_weights(weights),
            built_in: false,
            created_at: Utc::now(),
        };
        self.profiles.insert(profile.name.clone(), profile.clone());
        tracing::info!("Saved weight profile '{}'", profile.name);
        Ok(profile)
    }

    pub fn load_profile(&self, name: &str) -> Option<WeightProfile> {
        self.profiles.get(name).map(|entry| entry.value().clone())
    }

    /// Remove a user profile. Returns false when absent or built in.
    pub fn delete_profile(&self, name: &str) -> bool {
        self.profiles
            .remove_if(name, |_, profile| !profile.built_in)
            .is_some()
    }

    /// Profile names, sorted
    pub fn list_profiles(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}
