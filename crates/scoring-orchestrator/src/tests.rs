use std::sync::Arc;
use std::time::Duration;

use pillar_engine::{
    CapitalIntensityPillar, FinancialReadinessPillar, MarketOutlookPillar, PillarRegistry,
    RegulatoryRiskPillar, StrategicFitPillar,
};
use scoring_core::fixtures;
use scoring_core::{
    CompanyData, CompanyValidator, ConfidenceMetrics, DataField, InvestmentRecommendation,
    MarketContext, Pillar, PillarName, RiskLevel, ScoringConfig, ScoringError, ScoringFactor,
    ScoringResult, ValidationResult, WeightConfig,
};

use crate::{
    OrchestratorConfig, PerformanceMonitor, ScoringOrchestrator, StaticMarketContext,
};

/// A finished result with fixed values, for cache and statistics tests
pub(crate) fn sample_result() -> ScoringResult {
    let pillar_scores = fixtures::pillar_scores([3.5, 4.0, 3.0, 3.5, 4.0, 3.0], 0.8);
    let weighted_scores = weighting_engine::apply_weights(&pillar_scores, &WeightConfig::default());
    ScoringResult {
        company_id: "helix-therapeutics".to_string(),
        overall_score: weighted_scores.total,
        pillar_scores,
        weighted_scores,
        confidence: ConfidenceMetrics {
            overall: 0.8,
            data_completeness: 1.0,
            model_accuracy: 0.75,
            comparable_quality: 0.5,
        },
        recommendations: vec![],
        timestamp: fixtures::reference_date(),
        investment_recommendation: InvestmentRecommendation::Hold,
        risk_level: RiskLevel::Medium,
    }
}

fn monitored(config: OrchestratorConfig) -> (ScoringOrchestrator, Arc<PerformanceMonitor>) {
    let monitor = Arc::new(PerformanceMonitor::default());
    let orchestrator = ScoringOrchestrator::new(config)
        .with_context_provider(Arc::new(StaticMarketContext::new(fixtures::sample_context(5))))
        .with_instrumentation(monitor.clone());
    (orchestrator, monitor)
}

fn pillar_runs(monitor: &PerformanceMonitor) -> u64 {
    monitor
        .snapshot()
        .iter()
        .filter(|(name, _)| name.starts_with("pillar."))
        .map(|(_, stats)| stats.count)
        .sum()
}

fn factor_score(result: &ScoringResult, pillar: PillarName, name: &str) -> f64 {
    result
        .pillar_scores
        .get(pillar)
        .factors
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.score)
        .unwrap_or_else(|| panic!("no factor {} on {}", name, pillar))
}

struct RejectAll;

impl CompanyValidator for RejectAll {
    fn validate_company_data(&self, _data: &CompanyData) -> ValidationResult {
        let mut result = ValidationResult::default();
        result.critical("basicInfo.name", "name is on the exclusion list");
        result
    }
}

struct PanickingAssetQuality;

impl Pillar for PanickingAssetQuality {
    fn name(&self) -> PillarName {
        PillarName::AssetQuality
    }

    fn required_fields(&self) -> &'static [DataField] {
        &[]
    }

    fn optional_fields(&self) -> &'static [DataField] {
        &[]
    }

    fn methodology_reliability(&self) -> f64 {
        0.8
    }

    fn methodology(&self) -> &'static str {
        "panics"
    }

    fn limitations(&self) -> &'static [&'static str] {
        &[]
    }

    fn factors(&self, _data: &CompanyData, _context: &MarketContext) -> Vec<ScoringFactor> {
        panic!("factor computation blew up")
    }

    fn data_quality(&self, _data: &CompanyData, _context: &MarketContext) -> f64 {
        0.0
    }
}

#[tokio::test]
async fn test_evaluate_sample_company() {
    let (orchestrator, monitor) = monitored(OrchestratorConfig::default());
    let company = fixtures::sample_company();

    let result = orchestrator
        .evaluate_company(&company, &ScoringConfig::default())
        .await
        .unwrap();

    assert_eq!(result.company_id, "helix-therapeutics");
    for (_, score) in result.pillar_scores.iter() {
        assert!((1.0..=5.0).contains(&score.raw_score));
        assert!((0.0..=1.0).contains(&score.confidence));
    }
    assert!((result.overall_score - result.weighted_scores.total).abs() < 1e-12);
    assert_eq!(result.confidence.model_accuracy, 0.75);
    assert_eq!(result.confidence.comparable_quality, 0.7);
    assert_eq!(pillar_runs(&monitor), 6);
    assert_eq!(monitor.stats("evaluateCompany").unwrap().count, 1);
}

#[tokio::test]
async fn test_cache_hit_returns_identical_result() {
    let (orchestrator, monitor) = monitored(OrchestratorConfig::default());
    let company = fixtures::sample_company();
    let config = ScoringConfig::default();

    let first = orchestrator.evaluate_company(&company, &config).await.unwrap();
    let second = orchestrator.evaluate_company(&company, &config).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(pillar_runs(&monitor), 6);
}

#[tokio::test]
async fn test_different_weights_miss_the_cache() {
    let (orchestrator, monitor) = monitored(OrchestratorConfig::default());
    let company = fixtures::sample_company();

    orchestrator
        .evaluate_company(&company, &ScoringConfig::default())
        .await
        .unwrap();
    orchestrator
        .evaluate_company(&company, &ScoringConfig::with_weights(WeightConfig::uniform(1.0 / 6.0)))
        .await
        .unwrap();

    assert_eq!(pillar_runs(&monitor), 12);
}

#[tokio::test]
async fn test_expired_entry_is_recomputed() {
    let config = OrchestratorConfig {
        cache_ttl: Duration::from_millis(20),
        ..OrchestratorConfig::default()
    };
    let (orchestrator, monitor) = monitored(config);
    let company = fixtures::sample_company();
    let scoring = ScoringConfig::default();

    let first = orchestrator.evaluate_company(&company, &scoring).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = orchestrator.evaluate_company(&company, &scoring).await.unwrap();

    assert_eq!(pillar_runs(&monitor), 12);
    assert_eq!(first.overall_score, second.overall_score);
    assert_eq!(first.pillar_scores, second.pillar_scores);
    assert!(second.timestamp >= first.timestamp);
}

#[tokio::test]
async fn test_company_without_programs_is_invalid() {
    let (orchestrator, monitor) = monitored(OrchestratorConfig::default());
    let mut company = fixtures::sample_company();
    company.pipeline.programs.clear();

    let err = orchestrator
        .evaluate_company(&company, &ScoringConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ScoringError::InvalidData(_)));
    assert!(err.to_string().contains("pipeline.programs"));
    assert_eq!(pillar_runs(&monitor), 0);
    assert_eq!(monitor.stats("evaluateCompany").unwrap().failures, 1);
}

#[tokio::test]
async fn test_injected_validator_is_used() {
    let orchestrator = ScoringOrchestrator::default().with_validator(Arc::new(RejectAll));
    let err = orchestrator
        .evaluate_company(&fixtures::sample_company(), &ScoringConfig::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ScoringError::InvalidData("basicInfo.name: name is on the exclusion list".to_string())
    );
}

#[tokio::test]
async fn test_zero_weights_fail_before_any_pillar_runs() {
    let (orchestrator, monitor) = monitored(OrchestratorConfig::default());
    let err = orchestrator
        .evaluate_company(
            &fixtures::sample_company(),
            &ScoringConfig::with_weights(WeightConfig::uniform(0.0)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ScoringError::ConfigurationError(_)));
    assert!(err.to_string().contains("all weights cannot be zero"));
    assert_eq!(pillar_runs(&monitor), 0);
}

#[tokio::test]
async fn test_unnormalized_weights_apply_as_given() {
    let orchestrator = ScoringOrchestrator::default();
    let result = orchestrator
        .evaluate_company(
            &fixtures::sample_company(),
            &ScoringConfig::with_weights(WeightConfig::uniform(0.3)),
        )
        .await
        .unwrap();

    let raw_total: f64 = result.pillar_scores.raw_scores().iter().sum();
    assert!((result.overall_score - 0.3 * raw_total).abs() < 1e-9);
}

#[tokio::test]
async fn test_late_stage_company_scores() {
    let (orchestrator, _) = monitored(OrchestratorConfig::default());
    let result = orchestrator
        .evaluate_company(&fixtures::phase3_company(), &ScoringConfig::default())
        .await
        .unwrap();

    assert_eq!(factor_score(&result, PillarName::MarketOutlook, "Market Size"), 5.0);
    assert_eq!(factor_score(&result, PillarName::MarketOutlook, "Competitive Landscape"), 5.0);
    assert!(result.pillar_scores.financial_readiness.raw_score >= 4.0);
}

#[tokio::test]
async fn test_panicking_pillar_is_task_failure() {
    let registry = PillarRegistry::new(vec![
        Arc::new(PanickingAssetQuality),
        Arc::new(MarketOutlookPillar::new()),
        Arc::new(CapitalIntensityPillar::new()),
        Arc::new(StrategicFitPillar::new()),
        Arc::new(FinancialReadinessPillar::new()),
        Arc::new(RegulatoryRiskPillar::new()),
    ])
    .unwrap();
    let orchestrator = ScoringOrchestrator::default().with_pillars(registry);

    let err = orchestrator
        .evaluate_company(&fixtures::sample_company(), &ScoringConfig::default())
        .await
        .unwrap_err();

    match err {
        ScoringError::TaskFailed(message) => assert!(message.starts_with("Asset Quality")),
        other => panic!("expected task failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_batch_skips_failures_and_keeps_order() {
    let orchestrator = ScoringOrchestrator::default();
    let mut broken = fixtures::sample_company();
    broken.id = "broken".to_string();
    broken.pipeline.programs.clear();

    let companies = vec![fixtures::sample_company(), broken, fixtures::phase3_company()];
    let results = orchestrator
        .evaluate_companies(&companies, &ScoringConfig::default())
        .await;

    let ids: Vec<&str> = results.iter().map(|r| r.company_id.as_str()).collect();
    assert_eq!(ids, vec!["helix-therapeutics", "orion-bio"]);

    let stats = orchestrator.get_scoring_statistics(&results);
    assert_eq!(stats.count, 2);
}

#[tokio::test]
async fn test_profile_weights() {
    let orchestrator = ScoringOrchestrator::default();
    let growth = orchestrator.config_for_profile("growth").unwrap();
    assert!((growth.weights.asset_quality - 0.30).abs() < 1e-9);

    let err = orchestrator.config_for_profile("nonexistent").unwrap_err();
    assert!(matches!(err, ScoringError::ConfigurationError(_)));

    let result = orchestrator
        .evaluate_company(&fixtures::sample_company(), &growth)
        .await
        .unwrap();
    let expected = orchestrator
        .calculate_weighted_score(&result.pillar_scores, &growth.weights)
        .score;
    assert!((result.overall_score - expected).abs() < 1e-12);
}

#[tokio::test]
async fn test_pillar_insights_cover_every_pillar() {
    let orchestrator = ScoringOrchestrator::default();
    let insights = orchestrator.get_pillar_insights(&fixtures::sample_company()).await;
    assert_eq!(insights.len(), 6);
    assert!(insights.values().all(|summary| !summary.is_empty()));

    let mut company = fixtures::sample_company();
    company.financials.burn_rate = None;
    let insights = orchestrator.get_pillar_insights(&company).await;
    assert!(insights[&PillarName::CapitalIntensity].contains("could not be scored"));
}

#[tokio::test]
async fn test_confidence_uses_provider_context() {
    let orchestrator = ScoringOrchestrator::default()
        .with_context_provider(Arc::new(StaticMarketContext::new(fixtures::sample_context(12))));
    let scores = fixtures::pillar_scores([3.0; 6], 0.6);
    let confidence = orchestrator
        .calculate_confidence(&scores, &fixtures::sample_company())
        .await;

    assert!((confidence.overall - 0.6).abs() < 1e-9);
    assert_eq!(confidence.comparable_quality, 0.9);
    assert_eq!(confidence.data_completeness, 1.0);
}
