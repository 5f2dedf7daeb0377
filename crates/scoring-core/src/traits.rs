use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::validation::{completeness, DataField, ValidationResult};
use crate::{
    pillar_base, stats, CompanyData, MarketContext, PillarExplanation, PillarName, PillarScore,
    ScoringError, ScoringFactor, ScoringResult,
};

/// Scoring strategy for one investability dimension.
///
/// Implementors supply the data-driven hooks (declared fields, factor
/// computation, data quality); `validate`, `score` and `explain` are
/// provided on top of them and normally not overridden.
pub trait Pillar: Send + Sync {
    fn name(&self) -> PillarName;

    /// Fields whose absence is a critical validation failure
    fn required_fields(&self) -> &'static [DataField];

    /// Fields that only lower completeness when absent
    fn optional_fields(&self) -> &'static [DataField];

    /// Fixed trust in the heuristic, 0.75–0.90
    fn methodology_reliability(&self) -> f64;

    fn methodology(&self) -> &'static str;

    fn limitations(&self) -> &'static [&'static str];

    /// Pillar-specific validation on top of the declared-field checks
    fn check(&self, _data: &CompanyData, _result: &mut ValidationResult) {}

    /// Named factors whose weights sum to 1.0
    fn factors(&self, data: &CompanyData, context: &MarketContext) -> Vec<ScoringFactor>;

    /// Pillar-specific data quality in [0, 1]
    fn data_quality(&self, data: &CompanyData, context: &MarketContext) -> f64;

    fn pillar_warnings(&self, _data: &CompanyData, _context: &MarketContext) -> Vec<String> {
        Vec::new()
    }

    fn validate(&self, data: &CompanyData) -> ValidationResult {
        let mut result = ValidationResult::default();
        let label = self.name().label();

        for field in self.required_fields() {
            if !field.is_present(data) {
                result.critical(field.path(), format!("{} is required for {}", field.path(), label));
            }
        }
        for field in self.optional_fields() {
            if !field.is_present(data) {
                result.warn(
                    field.path(),
                    format!("{} is missing", field.path()),
                    Some("Provide this field to improve scoring confidence"),
                );
            }
        }

        self.check(data, &mut result);

        let declared: Vec<DataField> = self
            .required_fields()
            .iter()
            .chain(self.optional_fields())
            .copied()
            .collect();
        result.completeness = completeness(data, &declared);
        result
    }

    fn score(&self, data: &CompanyData, context: &MarketContext) -> Result<PillarScore, ScoringError> {
        let validation = self.validate(data);
        if validation.has_critical() {
            return Err(ScoringError::InvalidData(format!(
                "{}: {}",
                self.name().label(),
                validation.critical_summary()
            )));
        }

        let factors = self.factors(data, context);
        let raw_score = stats::weighted_score(factors.iter().map(|f| (f.weight, f.score)));
        let data_quality = stats::clamp_unit(self.data_quality(data, context));
        let confidence = pillar_base::confidence(
            validation.completeness,
            data_quality,
            self.methodology_reliability(),
        );

        let mut warnings =
            pillar_base::standard_warnings(self.name(), raw_score, confidence, validation.completeness);
        warnings.extend(self.pillar_warnings(data, context));

        let explanation = pillar_base::summary(self.name(), raw_score, &factors);

        Ok(PillarScore {
            raw_score,
            confidence,
            factors,
            warnings,
            explanation: Some(explanation),
        })
    }

    fn explain(&self, score: &PillarScore) -> PillarExplanation {
        PillarExplanation {
            summary: score
                .explanation
                .clone()
                .unwrap_or_else(|| pillar_base::summary(self.name(), score.raw_score, &score.factors)),
            contributions: pillar_base::contributions(&score.factors),
            methodology: self.methodology().to_string(),
            limitations: self.limitations().iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Company-wide data validation service
pub trait CompanyValidator: Send + Sync {
    fn validate_company_data(&self, data: &CompanyData) -> ValidationResult;
}

/// Supplies the market snapshot used as auxiliary scoring input
#[async_trait]
pub trait MarketContextProvider: Send + Sync {
    async fn market_context(&self, data: &CompanyData) -> MarketContext;
}

/// Namespaced key/value store with per-entry TTL
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn get(&self, key: &str, namespace: &str) -> Option<ScoringResult>;
    async fn set(&self, key: &str, value: ScoringResult, ttl: Duration, namespace: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Pillar,
    Evaluation,
}

/// Observes operation durations; never aborts the operation
pub trait Instrumentation: Send + Sync {
    fn record(&self, operation: &str, kind: OperationKind, elapsed: Duration, success: bool);
}

/// Run `op`, report its duration and outcome, and pass its result through unchanged.
pub fn measure<T, E>(
    instrumentation: &dyn Instrumentation,
    operation: &str,
    kind: OperationKind,
    op: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    let started = Instant::now();
    let result = op();
    instrumentation.record(operation, kind, started.elapsed(), result.is_ok());
    result
}
