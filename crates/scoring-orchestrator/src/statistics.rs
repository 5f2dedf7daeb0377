use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

use scoring_core::ScoringResult;

pub const SCORE_BUCKETS: [&str; 4] = ["1.0-2.0", "2.0-3.0", "3.0-4.0", "4.0-5.0"];

/// Aggregate view over a set of evaluations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringStatistics {
    pub count: usize,
    pub average_score: f64,
    /// Sample standard deviation; 0 for fewer than two results
    pub score_std_dev: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub score_distribution: BTreeMap<String, usize>,
    pub average_confidence: f64,
    pub recommendation_distribution: BTreeMap<String, usize>,
}

/// Bucket label for an overall score. Scores outside 1-5 land in the edge buckets.
pub fn score_bucket(score: f64) -> &'static str {
    if score < 2.0 {
        SCORE_BUCKETS[0]
    } else if score < 3.0 {
        SCORE_BUCKETS[1]
    } else if score < 4.0 {
        SCORE_BUCKETS[2]
    } else {
        SCORE_BUCKETS[3]
    }
}

fn or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub fn get_scoring_statistics(results: &[ScoringResult]) -> ScoringStatistics {
    let scores: Vec<f64> = results.iter().map(|r| r.overall_score).collect();
    let confidences: Vec<f64> = results.iter().map(|r| r.confidence.overall).collect();

    let mut score_distribution: BTreeMap<String, usize> =
        SCORE_BUCKETS.iter().map(|b| (b.to_string(), 0)).collect();
    let mut recommendation_distribution = BTreeMap::new();
    for result in results {
        *score_distribution
            .entry(score_bucket(result.overall_score).to_string())
            .or_insert(0) += 1;
        *recommendation_distribution
            .entry(result.investment_recommendation.as_str().to_string())
            .or_insert(0) += 1;
    }

    let score_std_dev = if scores.len() < 2 {
        0.0
    } else {
        or_zero(scores.as_slice().std_dev())
    };

    ScoringStatistics {
        count: results.len(),
        average_score: or_zero(scores.as_slice().mean()),
        score_std_dev,
        min_score: or_zero(scores.as_slice().min()),
        max_score: or_zero(scores.as_slice().max()),
        score_distribution,
        average_confidence: or_zero(confidences.as_slice().mean()),
        recommendation_distribution,
    }
}
