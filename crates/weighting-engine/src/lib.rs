//! Weighting Engine
//!
//! Validates, normalizes and applies pillar weights, keeps named weight
//! profiles, and measures how a weight change moves the overall score.

pub mod analysis;
pub mod profiles;
pub mod weights;

pub use analysis::{
    calculate_impact, calculate_weighted_score, PillarDelta, ScoreComponent, WeightImpact,
    WeightedScore,
};
pub use profiles::{ProfileStore, WeightProfile};
pub use weights::{apply_weights, normalize_weights, validate_weights, SUM_TOLERANCE};
