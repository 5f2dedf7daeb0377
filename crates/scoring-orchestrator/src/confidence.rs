use scoring_core::stats::{clamp_unit, mean};
use scoring_core::{CompanyData, ConfidenceMetrics, DataField, MarketContext, PillarScores};

/// Company-wide completeness checklist; a group counts when any of its fields is present
const COMPLETENESS_GROUPS: [&[DataField]; 10] = [
    &[DataField::Name],
    &[DataField::Sector],
    &[DataField::TherapeuticAreas],
    &[DataField::Programs],
    &[DataField::ProgramMechanisms, DataField::ProgramDifferentiators],
    &[DataField::CashPosition],
    &[DataField::BurnRate],
    &[DataField::AddressableMarket],
    &[DataField::Competitors, DataField::GrowthRate],
    &[DataField::ClinicalTrials, DataField::RegulatoryStrategy],
];

/// Fraction of the ten checklist groups the company fills
pub fn data_completeness(data: &CompanyData) -> f64 {
    let present = COMPLETENESS_GROUPS
        .iter()
        .filter(|group| group.iter().any(|field| field.is_present(data)))
        .count();
    present as f64 / COMPLETENESS_GROUPS.len() as f64
}

/// Quality of the peer set, bucketed by comparable count
pub fn comparable_quality(comparables: usize) -> f64 {
    match comparables {
        n if n >= 10 => 0.9,
        n if n >= 5 => 0.7,
        n if n >= 2 => 0.5,
        _ => 0.3,
    }
}

pub fn calculate_confidence(
    scores: &PillarScores,
    data: &CompanyData,
    context: &MarketContext,
    model_accuracy: f64,
) -> ConfidenceMetrics {
    ConfidenceMetrics {
        overall: clamp_unit(mean(&scores.confidences())),
        data_completeness: data_completeness(data),
        model_accuracy: clamp_unit(model_accuracy),
        comparable_quality: comparable_quality(context.comparable_companies.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring_core::fixtures;

    #[test]
    fn test_comparable_buckets() {
        assert_eq!(comparable_quality(0), 0.3);
        assert_eq!(comparable_quality(1), 0.3);
        assert_eq!(comparable_quality(2), 0.5);
        assert_eq!(comparable_quality(5), 0.7);
        assert_eq!(comparable_quality(9), 0.7);
        assert_eq!(comparable_quality(10), 0.9);
    }

    #[test]
    fn test_data_completeness() {
        assert_eq!(data_completeness(&fixtures::sample_company()), 1.0);
        // no sector, mechanisms, competitors, growth, trials or strategy
        assert!((data_completeness(&fixtures::minimal_company()) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_overall_is_mean_of_pillar_confidences() {
        let mut scores = fixtures::pillar_scores([3.0; 6], 0.6);
        scores.regulatory_risk.confidence = 1.2;
        let metrics = calculate_confidence(
            &scores,
            &fixtures::sample_company(),
            &fixtures::sample_context(6),
            0.75,
        );
        assert!((metrics.overall - (0.6 * 5.0 + 1.2) / 6.0).abs() < 1e-12);
        assert_eq!(metrics.comparable_quality, 0.7);
        assert_eq!(metrics.model_accuracy, 0.75);
    }
}
