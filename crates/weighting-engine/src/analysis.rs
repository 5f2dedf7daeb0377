use serde::{Deserialize, Serialize};

use scoring_core::stats::clamp_unit;
use scoring_core::{PillarName, PillarScores, WeightConfig};

use crate::weights::{apply_weights, effective_weights, normalize_weights};

/// Contribution change above which a pillar counts as significantly moved
const SIGNIFICANT_CHANGE: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarDelta {
    pub pillar: PillarName,
    pub old_weight: f64,
    pub new_weight: f64,
    pub old_contribution: f64,
    pub new_contribution: f64,
    pub contribution_change: f64,
}

/// Effect of swapping one weight vector for another on a fixed set of pillar scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightImpact {
    pub old_total: f64,
    pub new_total: f64,
    pub total_score_difference: f64,
    /// Relative change in percent; 0 when the old total is 0
    pub percentage_change: f64,
    pub pillar_deltas: Vec<PillarDelta>,
    pub significant_changes: Vec<PillarName>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub pillar: PillarName,
    pub raw_score: f64,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedScore {
    pub score: f64,
    pub breakdown: Vec<ScoreComponent>,
    pub confidence: f64,
}

pub fn calculate_impact(
    scores: &PillarScores,
    old_weights: &WeightConfig,
    new_weights: &WeightConfig,
) -> WeightImpact {
    let old = apply_weights(scores, old_weights);
    let new = apply_weights(scores, new_weights);
    let old_effective = effective_weights(old_weights);
    let new_effective = effective_weights(new_weights);

    let pillar_deltas: Vec<PillarDelta> = PillarName::ALL
        .iter()
        .map(|&pillar| PillarDelta {
            pillar,
            old_weight: old_effective.get(pillar),
            new_weight: new_effective.get(pillar),
            old_contribution: old.get(pillar),
            new_contribution: new.get(pillar),
            contribution_change: new.get(pillar) - old.get(pillar),
        })
        .collect();

    let significant_changes = pillar_deltas
        .iter()
        .filter(|d| d.contribution_change.abs() > SIGNIFICANT_CHANGE)
        .map(|d| d.pillar)
        .collect();

    let difference = new.total - old.total;
    let percentage_change = if old.total != 0.0 {
        difference / old.total * 100.0
    } else {
        0.0
    };

    WeightImpact {
        old_total: old.total,
        new_total: new.total,
        total_score_difference: difference,
        percentage_change,
        pillar_deltas,
        significant_changes,
    }
}

/// Weighted total with a per-pillar breakdown.
///
/// Confidence is the mean of pillar confidences weighted by the normalized weights.
pub fn calculate_weighted_score(scores: &PillarScores, weights: &WeightConfig) -> WeightedScore {
    let applied = apply_weights(scores, weights);
    let effective = effective_weights(weights);
    let normalized = normalize_weights(weights);

    let breakdown = scores
        .iter()
        .map(|(pillar, score)| ScoreComponent {
            pillar,
            raw_score: score.raw_score,
            weight: effective.get(pillar),
            contribution: applied.get(pillar),
        })
        .collect();

    let confidence = scores
        .iter()
        .map(|(pillar, score)| normalized.get(pillar) * score.confidence)
        .sum::<f64>();

    WeightedScore {
        score: applied.total,
        breakdown,
        confidence: clamp_unit(confidence),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring_core::fixtures::{pillar_score, pillar_scores};

    #[test]
    fn test_identical_weights_have_no_impact() {
        let scores = pillar_scores([4.0, 3.0, 2.0, 5.0, 4.0, 3.0], 0.8);
        let impact = calculate_impact(&scores, &WeightConfig::default(), &WeightConfig::default());
        assert_eq!(impact.total_score_difference, 0.0);
        assert_eq!(impact.percentage_change, 0.0);
        assert!(impact.significant_changes.is_empty());
        assert_eq!(impact.pillar_deltas.len(), 6);
    }

    #[test]
    fn test_shift_to_strong_pillar() {
        let scores = pillar_scores([5.0, 1.0, 3.0, 3.0, 3.0, 3.0], 0.8);
        let old = WeightConfig::from_array([0.1, 0.4, 0.125, 0.125, 0.125, 0.125]);
        let new = WeightConfig::from_array([0.4, 0.1, 0.125, 0.125, 0.125, 0.125]);
        let impact = calculate_impact(&scores, &old, &new);

        // +1.5 from asset quality, -0.3 from market outlook
        assert!((impact.total_score_difference - 1.2).abs() < 1e-9);
        assert!((impact.percentage_change - 1.2 / impact.old_total * 100.0).abs() < 1e-9);
        assert_eq!(
            impact.significant_changes,
            vec![PillarName::AssetQuality, PillarName::MarketOutlook]
        );
    }

    #[test]
    fn test_weighted_score_breakdown_and_confidence() {
        let mut scores = pillar_scores([4.0; 6], 0.5);
        scores.asset_quality = pillar_score(5.0, 1.0);

        let weights = WeightConfig::from_array([0.5, 0.1, 0.1, 0.1, 0.1, 0.1]);
        let weighted = calculate_weighted_score(&scores, &weights);

        assert!((weighted.score - (2.5 + 0.5 * 4.0)).abs() < 1e-9);
        assert_eq!(weighted.breakdown.len(), 6);
        assert_eq!(weighted.breakdown[0].pillar, PillarName::AssetQuality);
        assert!((weighted.breakdown[0].contribution - 2.5).abs() < 1e-12);
        assert!((weighted.confidence - (0.5 * 1.0 + 0.5 * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_uses_normalized_weights() {
        let scores = pillar_scores([3.0; 6], 0.6);
        let weighted = calculate_weighted_score(&scores, &WeightConfig::uniform(0.3));
        assert!((weighted.confidence - 0.6).abs() < 1e-9);
        assert!((weighted.score - 5.4).abs() < 1e-9);
    }
}
