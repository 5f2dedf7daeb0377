use scoring_core::{PillarName, PillarScores, ValidationResult, WeightConfig, WeightedScores};

/// Allowed deviation of the weight sum from 1.0 before a warning is raised
pub const SUM_TOLERANCE: f64 = 0.001;

fn field(pillar: PillarName) -> String {
    format!("weights.{}", pillar.as_str())
}

/// Check each weight lies in [0, 1] and that the set is usable.
///
/// A sum away from 1.0 is only a warning; zero weights are allowed but flagged.
pub fn validate_weights(weights: &WeightConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    for pillar in PillarName::ALL {
        let weight = weights.get(pillar);
        let path = field(pillar);
        if !weight.is_finite() {
            result.critical(&path, format!("{} weight is not a finite number", pillar.label()));
        } else if weight < 0.0 {
            result.critical(&path, format!("{} weight {} is negative", pillar.label(), weight));
        } else if weight > 1.0 {
            result.critical(&path, format!("{} weight {} exceeds 1.0", pillar.label(), weight));
        } else if weight == 0.0 {
            result.warn(
                &path,
                format!("{} weight is zero; the pillar will not affect the score", pillar.label()),
                None,
            );
        }
    }

    let sum = weights.sum();
    if sum == 0.0 {
        result.critical("weights", "all weights cannot be zero");
    } else if sum.is_finite() && (sum - 1.0).abs() > SUM_TOLERANCE {
        result.warn(
            "weights",
            format!("Weights sum to {:.3} instead of 1.0", sum),
            Some("Normalize the weights so the overall score stays on the 1-5 scale"),
        );
    }

    result
}

/// Scale weights to sum to 1.0.
///
/// Negative and non-finite weights count as zero. An all-zero set becomes
/// the uniform 1/6 split.
pub fn normalize_weights(weights: &WeightConfig) -> WeightConfig {
    let cleaned = weights
        .as_array()
        .map(|w| if w.is_finite() && w > 0.0 { w } else { 0.0 });
    let sum: f64 = cleaned.iter().sum();

    if sum <= 0.0 || !sum.is_finite() {
        return WeightConfig::uniform(1.0 / PillarName::ALL.len() as f64);
    }
    WeightConfig::from_array(cleaned.map(|w| w / sum))
}

/// Multiply each raw pillar score by its weight.
///
/// Weights that pass validation are applied exactly as given, even when
/// they do not sum to 1.0; invalid weights are normalized first.
pub fn apply_weights(scores: &PillarScores, weights: &WeightConfig) -> WeightedScores {
    let effective = effective_weights(weights);
    WeightedScores::from_contributions(
        PillarName::ALL.map(|pillar| scores.get(pillar).raw_score * effective.get(pillar)),
    )
}

/// The weights `apply_weights` actually uses for `weights`
pub(crate) fn effective_weights(weights: &WeightConfig) -> WeightConfig {
    if validate_weights(weights).is_valid {
        *weights
    } else {
        tracing::debug!("Invalid weights supplied; normalizing before applying");
        normalize_weights(weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring_core::fixtures::pillar_scores;
    use scoring_core::Severity;

    #[test]
    fn test_default_weights_are_clean() {
        let result = validate_weights(&WeightConfig::default());
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_out_of_range_weights_are_critical() {
        let weights = WeightConfig::from_array([-0.1, 1.2, f64::NAN, 0.2, 0.2, 0.2]);
        let result = validate_weights(&weights);
        assert!(!result.is_valid);
        let critical: Vec<&str> = result.critical_errors().map(|e| e.field.as_str()).collect();
        assert!(critical.contains(&"weights.assetQuality"));
        assert!(critical.contains(&"weights.marketOutlook"));
        assert!(critical.contains(&"weights.capitalIntensity"));
    }

    #[test]
    fn test_all_zero_weights() {
        let result = validate_weights(&WeightConfig::uniform(0.0));
        assert!(result
            .errors
            .iter()
            .any(|e| e.message == "all weights cannot be zero" && e.severity == Severity::Critical));
        assert_eq!(result.warnings.len(), 6);

        let normalized = normalize_weights(&WeightConfig::uniform(0.0));
        for w in normalized.as_array() {
            assert!((w - 1.0 / 6.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sum_mismatch_is_warning_only() {
        let weights = WeightConfig::uniform(0.3);
        let result = validate_weights(&weights);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("1.800"));
    }

    #[test]
    fn test_normalize_sums_to_one() {
        let normalized = normalize_weights(&WeightConfig::from_array([2.0, 1.0, 1.0, 0.5, 0.5, 0.0]));
        assert!((normalized.sum() - 1.0).abs() < 1e-12);
        assert!((normalized.asset_quality - 0.4).abs() < 1e-12);

        let with_negative = normalize_weights(&WeightConfig::from_array([-1.0, 1.0, 1.0, 0.0, 0.0, 0.0]));
        assert_eq!(with_negative.asset_quality, 0.0);
        assert!((with_negative.market_outlook - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_apply_valid_weights_unnormalized() {
        let scores = pillar_scores([4.0; 6], 0.8);
        let weighted = apply_weights(&scores, &WeightConfig::uniform(0.3));
        // sum 1.8 is applied as-is
        assert!((weighted.total - 7.2).abs() < 1e-9);
    }

    #[test]
    fn test_apply_invalid_weights_normalizes() {
        let scores = pillar_scores([1.0, 2.0, 3.0, 4.0, 5.0, 3.0], 0.8);
        let weighted = apply_weights(&scores, &WeightConfig::from_array([2.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
        assert!((weighted.asset_quality - 1.0).abs() < 1e-12);
        assert!((weighted.total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_apply_default_weights() {
        let scores = pillar_scores([4.0, 3.0, 2.0, 5.0, 4.0, 3.0], 0.8);
        let weighted = apply_weights(&scores, &WeightConfig::default());
        let expected = 4.0 * 0.25 + 3.0 * 0.20 + 2.0 * 0.10 + 5.0 * 0.15 + 4.0 * 0.15 + 3.0 * 0.15;
        assert!((weighted.total - expected).abs() < 1e-9);
    }
}
