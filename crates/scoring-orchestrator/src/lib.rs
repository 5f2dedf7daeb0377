use chrono::Utc;
use futures_util::future::join_all;
use futures_util::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use pillar_engine::PillarRegistry;
use scoring_core::{
    measure, CompanyData, CompanyValidator, ConfidenceMetrics, Instrumentation, MarketContext,
    MarketContextProvider, OperationKind, PillarName, PillarScores, ResultCache, ScoringConfig,
    ScoringError, ScoringResult, WeightConfig,
};
use weighting_engine::{apply_weights, validate_weights, ProfileStore, WeightedScore};

pub mod cache;
pub mod confidence;
pub mod config;
pub mod context;
pub mod monitor;
pub mod recommendation;
pub mod statistics;
pub mod validation;

#[cfg(test)]
mod tests;

pub use cache::{cache_key, TtlCache, SCORING_NAMESPACE};
pub use config::OrchestratorConfig;
pub use context::StaticMarketContext;
pub use monitor::{OperationStats, PerformanceMonitor};
pub use statistics::{get_scoring_statistics, ScoringStatistics};
pub use validation::BasicValidator;

/// Runs the six pillars for a company, aggregates them and caches the outcome
pub struct ScoringOrchestrator {
    pillars: PillarRegistry,
    profiles: ProfileStore,
    cache: Arc<dyn ResultCache>,
    validator: Arc<dyn CompanyValidator>,
    context_provider: Arc<dyn MarketContextProvider>,
    instrumentation: Arc<dyn Instrumentation>,
    config: OrchestratorConfig,
}

impl ScoringOrchestrator {
    pub fn new(config: OrchestratorConfig) -> Self {
        Self {
            pillars: PillarRegistry::standard(),
            profiles: ProfileStore::new(),
            cache: Arc::new(TtlCache::new(config.cache_max_entries)),
            validator: Arc::new(BasicValidator),
            context_provider: Arc::new(StaticMarketContext::default()),
            instrumentation: Arc::new(PerformanceMonitor::new(
                config.pillar_alert_threshold,
                config.evaluation_alert_threshold,
            )),
            config,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn CompanyValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_context_provider(mut self, provider: Arc<dyn MarketContextProvider>) -> Self {
        self.context_provider = provider;
        self
    }

    pub fn with_instrumentation(mut self, instrumentation: Arc<dyn Instrumentation>) -> Self {
        self.instrumentation = instrumentation;
        self
    }

    pub fn with_pillars(mut self, pillars: PillarRegistry) -> Self {
        self.pillars = pillars;
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    /// Scoring configuration built from a stored weight profile
    pub fn config_for_profile(&self, name: &str) -> Result<ScoringConfig, ScoringError> {
        self.profiles
            .load_profile(name)
            .map(|profile| ScoringConfig::with_weights(profile.weights))
            .ok_or_else(|| ScoringError::ConfigurationError(format!("unknown weight profile '{}'", name)))
    }

    /// Evaluate one company. Fails fast: no partial results are returned.
    pub async fn evaluate_company(
        &self,
        data: &CompanyData,
        config: &ScoringConfig,
    ) -> Result<ScoringResult, ScoringError> {
        let started = Instant::now();
        let result = self.run_evaluation(data, config).await;
        self.instrumentation.record(
            "evaluateCompany",
            OperationKind::Evaluation,
            started.elapsed(),
            result.is_ok(),
        );
        result
    }

    async fn run_evaluation(
        &self,
        data: &CompanyData,
        config: &ScoringConfig,
    ) -> Result<ScoringResult, ScoringError> {
        let key = cache_key(&data.id, config);
        if let Some(cached) = self.cache.get(&key, SCORING_NAMESPACE).await {
            tracing::debug!("Cache hit for {}", key);
            return Ok(cached);
        }

        tracing::info!("Evaluating company {}", data.id);

        let validation = self.validator.validate_company_data(data);
        if validation.has_critical() {
            return Err(ScoringError::InvalidData(validation.critical_summary()));
        }

        let weight_validation = validate_weights(&config.weights);
        if weight_validation.has_critical() {
            return Err(ScoringError::ConfigurationError(weight_validation.critical_summary()));
        }
        for warning in &weight_validation.warnings {
            tracing::debug!("Weight warning for {}: {}", data.id, warning.message);
        }

        let context = self.context_provider.market_context(data).await;
        let pillar_scores = self.score_pillars(data, &context).await?;

        let weighted_scores = apply_weights(&pillar_scores, &config.weights);
        let overall_score = weighted_scores.total;
        let confidence = confidence::calculate_confidence(
            &pillar_scores,
            data,
            &context,
            self.config.model_accuracy,
        );
        let recommendations = recommendation::recommendations(overall_score, &pillar_scores, &confidence);
        let investment_recommendation =
            recommendation::investment_recommendation(overall_score, &confidence);
        let risk_level = recommendation::risk_level(&pillar_scores, &confidence);

        let result = ScoringResult {
            company_id: data.id.clone(),
            overall_score,
            pillar_scores,
            weighted_scores,
            confidence,
            recommendations,
            timestamp: Utc::now(),
            investment_recommendation,
            risk_level,
        };

        self.cache
            .set(&key, result.clone(), self.config.cache_ttl, SCORING_NAMESPACE)
            .await;

        tracing::info!(
            "Scored {}: {:.2} ({}, {} risk, confidence {:.2})",
            data.id,
            result.overall_score,
            result.investment_recommendation.to_label(),
            result.risk_level.as_str(),
            result.confidence.overall
        );
        Ok(result)
    }

    /// Score every pillar on the blocking pool against one shared snapshot.
    /// All tasks are joined; the first failure in canonical order is returned.
    async fn score_pillars(
        &self,
        data: &CompanyData,
        context: &MarketContext,
    ) -> Result<PillarScores, ScoringError> {
        let snapshot = Arc::new((data.clone(), context.clone()));

        let tasks = self.pillars.iter().map(|pillar| {
            let pillar = Arc::clone(pillar);
            let snapshot = Arc::clone(&snapshot);
            let instrumentation = Arc::clone(&self.instrumentation);
            tokio::task::spawn_blocking(move || {
                let (data, context) = &*snapshot;
                let operation = format!("pillar.{}", pillar.name().as_str());
                measure(instrumentation.as_ref(), &operation, OperationKind::Pillar, || {
                    pillar.score(data, context)
                })
            })
        });
        let outcomes = join_all(tasks).await;

        let mut scores = Vec::with_capacity(outcomes.len());
        for (pillar, outcome) in self.pillars.iter().zip(outcomes) {
            let name = pillar.name();
            match outcome {
                Ok(Ok(score)) => {
                    tracing::debug!(
                        "{} for {}: {:.2} (confidence {:.2})",
                        name.label(),
                        data.id,
                        score.raw_score,
                        score.confidence
                    );
                    scores.push(score);
                }
                Ok(Err(e)) => return Err(e),
                Err(e) => {
                    return Err(ScoringError::TaskFailed(format!("{} task failed: {}", name.label(), e)))
                }
            }
        }

        PillarScores::from_ordered(scores)
    }

    /// Best-effort batch evaluation. Failures are logged and skipped; results
    /// keep the input order of the companies that succeeded.
    pub async fn evaluate_companies(
        &self,
        companies: &[CompanyData],
        config: &ScoringConfig,
    ) -> Vec<ScoringResult> {
        let total = companies.len();
        let results: Vec<ScoringResult> = stream::iter(companies)
            .map(|company| async move { (company, self.evaluate_company(company, config).await) })
            .buffered(self.config.batch_concurrency.max(1))
            .filter_map(|(company, outcome)| async move {
                match outcome {
                    Ok(result) => Some(result),
                    Err(e) => {
                        tracing::warn!("Skipping {} in batch: {}", company.id, e);
                        None
                    }
                }
            })
            .collect()
            .await;

        tracing::info!("Batch scored {}/{} companies", results.len(), total);
        results
    }

    pub fn calculate_weighted_score(&self, scores: &PillarScores, weights: &WeightConfig) -> WeightedScore {
        weighting_engine::calculate_weighted_score(scores, weights)
    }

    pub async fn calculate_confidence(&self, scores: &PillarScores, data: &CompanyData) -> ConfidenceMetrics {
        let context = self.context_provider.market_context(data).await;
        confidence::calculate_confidence(scores, data, &context, self.config.model_accuracy)
    }

    /// One-line summary per pillar; pillars that cannot score explain why
    pub async fn get_pillar_insights(&self, data: &CompanyData) -> BTreeMap<PillarName, String> {
        let context = self.context_provider.market_context(data).await;
        self.pillars
            .iter()
            .map(|pillar| {
                let insight = match pillar.score(data, &context) {
                    Ok(score) => pillar.explain(&score).summary,
                    Err(e) => format!("{} could not be scored: {}", pillar.name().label(), e),
                };
                (pillar.name(), insight)
            })
            .collect()
    }

    pub fn get_scoring_statistics(&self, results: &[ScoringResult]) -> ScoringStatistics {
        get_scoring_statistics(results)
    }
}

impl Default for ScoringOrchestrator {
    fn default() -> Self {
        Self::new(OrchestratorConfig::default())
    }
}
