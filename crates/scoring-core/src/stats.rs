//! Numeric helpers shared by the pillars and the aggregation layer.
//!
//! Pillar heuristics are expressed as design-time lookup tables: threshold
//! brackets (`value >= threshold → score`, scanned top-down) and keyword
//! tables (`text contains keyword → score`). All functions here are total,
//! including for NaN input.

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;
pub const NEUTRAL_SCORE: f64 = 3.0;

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Clamp into the 1–5 scoring range. NaN maps to the neutral score.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return NEUTRAL_SCORE;
    }
    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// Clamp into [0, 1]. NaN maps to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Look up `value` in a descending threshold table.
/// Returns the score of the first bracket whose threshold is <= value,
/// or `floor` when the value is below every threshold (or NaN).
pub fn bracket(value: f64, table: &[(f64, f64)], floor: f64) -> f64 {
    if value.is_nan() {
        return floor;
    }
    table
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(_, score)| *score)
        .unwrap_or(floor)
}

/// Look up `value` in an ascending ceiling table (value <= ceiling → score),
/// for metrics where smaller is better.
pub fn ceiling(value: f64, table: &[(f64, f64)], above: f64) -> f64 {
    if value.is_nan() {
        return above;
    }
    table
        .iter()
        .find(|(limit, _)| value <= *limit)
        .map(|(_, score)| *score)
        .unwrap_or(above)
}

/// First keyword contained (case-insensitively) in `text`, with its score.
pub fn keyword_match<'a>(text: &str, table: &'a [(&'a str, f64)]) -> Option<(&'a str, f64)> {
    let lower = text.to_lowercase();
    table
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(keyword, score)| (*keyword, *score))
}

/// Weighted sum of (weight, score) pairs clamped into the scoring range.
pub fn weighted_score(pairs: impl IntoIterator<Item = (f64, f64)>) -> f64 {
    clamp_score(pairs.into_iter().map(|(w, s)| w * s).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: &[(f64, f64)] = &[(10.0, 5.0), (5.0, 4.5), (1.0, 3.5)];

    #[test]
    fn test_bracket_lookup() {
        assert_eq!(bracket(12.0, SIZE, 1.5), 5.0);
        assert_eq!(bracket(10.0, SIZE, 1.5), 5.0);
        assert_eq!(bracket(7.0, SIZE, 1.5), 4.5);
        assert_eq!(bracket(0.2, SIZE, 1.5), 1.5);
        assert_eq!(bracket(f64::NAN, SIZE, 1.5), 1.5);
    }

    #[test]
    fn test_ceiling_lookup() {
        let burn = &[(2.0, 5.0), (5.0, 4.0)];
        assert_eq!(ceiling(1.0, burn, 2.0), 5.0);
        assert_eq!(ceiling(4.0, burn, 2.0), 4.0);
        assert_eq!(ceiling(40.0, burn, 2.0), 2.0);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let table = &[("gene therapy", 4.5), ("antibody", 3.0)];
        assert_eq!(keyword_match("AAV Gene Therapy", table), Some(("gene therapy", 4.5)));
        assert_eq!(keyword_match("small molecule", table), None);
    }

    #[test]
    fn test_clamps() {
        assert_eq!(clamp_score(7.3), 5.0);
        assert_eq!(clamp_score(-1.0), 1.0);
        assert_eq!(clamp_score(f64::NAN), NEUTRAL_SCORE);
        assert_eq!(clamp_unit(1.4), 1.0);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }

    #[test]
    fn test_weighted_score() {
        let score = weighted_score([(0.5, 4.0), (0.5, 2.0)]);
        assert!((score - 3.0).abs() < 1e-12);
        assert_eq!(weighted_score([(1.0, 9.0)]), 5.0);
        assert!((mean(&[1.0, 2.0, 3.0]) - 2.0).abs() < 1e-12);
        assert_eq!(mean(&[]), 0.0);
    }
}
