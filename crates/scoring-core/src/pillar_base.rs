//! Shared helpers behind the provided methods of [`crate::Pillar`].

use crate::score::{FactorContribution, PillarName, ScoringFactor};
use crate::stats::clamp_unit;

pub const COMPLETENESS_WEIGHT: f64 = 0.4;
pub const DATA_QUALITY_WEIGHT: f64 = 0.3;
pub const RELIABILITY_WEIGHT: f64 = 0.3;

const LOW_CONFIDENCE: f64 = 0.3;
const LOW_COMPLETENESS: f64 = 0.5;
const WEAK_SCORE: f64 = 2.0;

/// Pillar confidence from completeness, data quality and methodology reliability
pub fn confidence(completeness: f64, data_quality: f64, reliability: f64) -> f64 {
    clamp_unit(
        COMPLETENESS_WEIGHT * clamp_unit(completeness)
            + DATA_QUALITY_WEIGHT * clamp_unit(data_quality)
            + RELIABILITY_WEIGHT * clamp_unit(reliability),
    )
}

/// Warnings every pillar emits regardless of its own heuristics
pub fn standard_warnings(
    pillar: PillarName,
    raw_score: f64,
    confidence: f64,
    completeness: f64,
) -> Vec<String> {
    let mut warnings = Vec::new();
    if confidence < LOW_CONFIDENCE {
        warnings.push(format!(
            "Low confidence in {} score ({:.0}%)",
            pillar.label(),
            confidence * 100.0
        ));
    }
    if completeness < LOW_COMPLETENESS {
        warnings.push(format!(
            "Limited data for {}: only {:.0}% of inputs available",
            pillar.label(),
            completeness * 100.0
        ));
    }
    if raw_score <= WEAK_SCORE {
        warnings.push(format!("Weak {} score ({:.2})", pillar.label(), raw_score));
    }
    warnings
}

pub fn band(score: f64) -> &'static str {
    if score >= 4.0 {
        "strong"
    } else if score >= 3.0 {
        "moderate"
    } else if score >= 2.0 {
        "weak"
    } else {
        "poor"
    }
}

/// One-line summary naming the strongest and weakest factors
pub fn summary(pillar: PillarName, raw_score: f64, factors: &[ScoringFactor]) -> String {
    let by_score = |a: &&ScoringFactor, b: &&ScoringFactor| {
        a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal)
    };
    let strongest = factors.iter().max_by(by_score);
    let weakest = factors.iter().min_by(by_score);

    match (strongest, weakest) {
        (Some(top), Some(low)) if top.name != low.name => format!(
            "{} is {} at {:.2}/5; strongest factor {} ({:.1}), weakest {} ({:.1})",
            pillar.label(),
            band(raw_score),
            raw_score,
            top.name,
            top.score,
            low.name,
            low.score
        ),
        _ => format!("{} is {} at {:.2}/5", pillar.label(), band(raw_score), raw_score),
    }
}

pub fn contributions(factors: &[ScoringFactor]) -> Vec<FactorContribution> {
    factors
        .iter()
        .map(|f| FactorContribution {
            factor: f.name.clone(),
            weight: f.weight,
            score: f.score,
            contribution: f.contribution(),
        })
        .collect()
}
