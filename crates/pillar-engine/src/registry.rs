use std::sync::Arc;

use scoring_core::{Pillar, PillarName, ScoringError};

use crate::{
    AssetQualityPillar, CapitalIntensityPillar, FinancialReadinessPillar, MarketOutlookPillar,
    RegulatoryRiskPillar, StrategicFitPillar,
};

/// Exactly one pillar per [`PillarName`], held in canonical order
#[derive(Clone)]
pub struct PillarRegistry {
    pillars: Vec<Arc<dyn Pillar>>,
}

impl PillarRegistry {
    /// The six built-in pillars
    pub fn standard() -> Self {
        Self {
            pillars: vec![
                Arc::new(AssetQualityPillar::new()),
                Arc::new(MarketOutlookPillar::new()),
                Arc::new(CapitalIntensityPillar::new()),
                Arc::new(StrategicFitPillar::new()),
                Arc::new(FinancialReadinessPillar::new()),
                Arc::new(RegulatoryRiskPillar::new()),
            ],
        }
    }

    /// Build a registry from custom implementations. Every pillar name must
    /// appear exactly once; input order does not matter.
    pub fn new(pillars: Vec<Arc<dyn Pillar>>) -> Result<Self, ScoringError> {
        let mut slots: Vec<Option<Arc<dyn Pillar>>> = vec![None; PillarName::ALL.len()];

        for pillar in pillars {
            let name = pillar.name();
            let slot = &mut slots[name.index()];
            if slot.is_some() {
                return Err(ScoringError::ConfigurationError(format!(
                    "pillar {} registered more than once",
                    name
                )));
            }
            *slot = Some(pillar);
        }

        let missing: Vec<&str> = PillarName::ALL
            .iter()
            .filter(|name| slots[name.index()].is_none())
            .map(|name| name.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(ScoringError::ConfigurationError(format!(
                "missing pillar(s): {}",
                missing.join(", ")
            )));
        }

        tracing::debug!("Pillar registry built with custom implementations");
        Ok(Self {
            pillars: slots.into_iter().flatten().collect(),
        })
    }

    pub fn get(&self, name: PillarName) -> &Arc<dyn Pillar> {
        &self.pillars[name.index()]
    }

    /// Pillars in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Pillar>> {
        self.pillars.iter()
    }

    pub fn len(&self) -> usize {
        self.pillars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pillars.is_empty()
    }
}

impl Default for PillarRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
