use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::ScoringError;

/// The six scoring dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PillarName {
    AssetQuality,
    MarketOutlook,
    CapitalIntensity,
    StrategicFit,
    FinancialReadiness,
    RegulatoryRisk,
}

impl PillarName {
    /// Canonical order used for aggregation and display
    pub const ALL: [PillarName; 6] = [
        PillarName::AssetQuality,
        PillarName::MarketOutlook,
        PillarName::CapitalIntensity,
        PillarName::StrategicFit,
        PillarName::FinancialReadiness,
        PillarName::RegulatoryRisk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PillarName::AssetQuality => "assetQuality",
            PillarName::MarketOutlook => "marketOutlook",
            PillarName::CapitalIntensity => "capitalIntensity",
            PillarName::StrategicFit => "strategicFit",
            PillarName::FinancialReadiness => "financialReadiness",
            PillarName::RegulatoryRisk => "regulatoryRisk",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PillarName::AssetQuality => "Asset Quality",
            PillarName::MarketOutlook => "Market Outlook",
            PillarName::CapitalIntensity => "Capital Intensity",
            PillarName::StrategicFit => "Strategic Fit",
            PillarName::FinancialReadiness => "Financial Readiness",
            PillarName::RegulatoryRisk => "Regulatory Risk",
        }
    }

    /// Position in the canonical order
    pub fn index(&self) -> usize {
        match self {
            PillarName::AssetQuality => 0,
            PillarName::MarketOutlook => 1,
            PillarName::CapitalIntensity => 2,
            PillarName::StrategicFit => 3,
            PillarName::FinancialReadiness => 4,
            PillarName::RegulatoryRisk => 5,
        }
    }
}

impl fmt::Display for PillarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single named, weighted sub-computation inside a pillar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringFactor {
    pub name: String,
    pub weight: f64,
    pub score: f64,
    pub rationale: String,
}

impl ScoringFactor {
    pub fn new(name: &str, weight: f64, score: f64, rationale: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            weight,
            score: crate::stats::clamp_score(score),
            rationale: rationale.into(),
        }
    }

    pub fn contribution(&self) -> f64 {
        self.weight * self.score
    }
}

/// Output of one pillar evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarScore {
    pub raw_score: f64,
    pub confidence: f64,
    pub factors: Vec<ScoringFactor>,
    pub warnings: Vec<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// One score per pillar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarScores {
    pub asset_quality: PillarScore,
    pub market_outlook: PillarScore,
    pub capital_intensity: PillarScore,
    pub strategic_fit: PillarScore,
    pub financial_readiness: PillarScore,
    pub regulatory_risk: PillarScore,
}

impl PillarScores {
    /// Build from scores listed in canonical order
    pub fn from_ordered(scores: Vec<PillarScore>) -> Result<Self, ScoringError> {
        let found = scores.len();
        let [asset_quality, market_outlook, capital_intensity, strategic_fit, financial_readiness, regulatory_risk]: [PillarScore; 6] =
            scores.try_into().map_err(|_| {
                ScoringError::InvalidData(format!("expected 6 pillar scores, got {}", found))
            })?;

        Ok(Self {
            asset_quality,
            market_outlook,
            capital_intensity,
            strategic_fit,
            financial_readiness,
            regulatory_risk,
        })
    }

    pub fn get(&self, pillar: PillarName) -> &PillarScore {
        match pillar {
            PillarName::AssetQuality => &self.asset_quality,
            PillarName::MarketOutlook => &self.market_outlook,
            PillarName::CapitalIntensity => &self.capital_intensity,
            PillarName::StrategicFit => &self.strategic_fit,
            PillarName::FinancialReadiness => &self.financial_readiness,
            PillarName::RegulatoryRisk => &self.regulatory_risk,
        }
    }

    /// Iterate in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (PillarName, &PillarScore)> + '_ {
        PillarName::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    pub fn raw_scores(&self) -> [f64; 6] {
        PillarName::ALL.map(|p| self.get(p).raw_score)
    }

    pub fn confidences(&self) -> [f64; 6] {
        PillarName::ALL.map(|p| self.get(p).confidence)
    }
}

/// Six-dimensional weight vector, one weight per pillar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightConfig {
    pub asset_quality: f64,
    pub market_outlook: f64,
    pub capital_intensity: f64,
    pub strategic_fit: f64,
    pub financial_readiness: f64,
    pub regulatory_risk: f64,
}

impl Default for WeightConfig {
    /// Balanced profile
    fn default() -> Self {
        Self {
            asset_quality: 0.25,
            market_outlook: 0.20,
            capital_intensity: 0.10,
            strategic_fit: 0.15,
            financial_readiness: 0.15,
            regulatory_risk: 0.15,
        }
    }
}

impl WeightConfig {
    pub fn uniform(value: f64) -> Self {
        Self::from_array([value; 6])
    }

    pub fn from_array(values: [f64; 6]) -> Self {
        Self {
            asset_quality: values[0],
            market_outlook: values[1],
            capital_intensity: values[2],
            strategic_fit: values[3],
            financial_readiness: values[4],
            regulatory_risk: values[5],
        }
    }

    /// Weights in canonical pillar order
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.asset_quality,
            self.market_outlook,
            self.capital_intensity,
            self.strategic_fit,
            self.financial_readiness,
            self.regulatory_risk,
        ]
    }

    pub fn get(&self, pillar: PillarName) -> f64 {
        self.as_array()[pillar.index()]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// Caller-supplied configuration for one evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    pub weights: WeightConfig,
    #[serde(default)]
    pub custom_parameters: BTreeMap<String, serde_json::Value>,
}

impl ScoringConfig {
    pub fn with_weights(weights: WeightConfig) -> Self {
        Self {
            weights,
            custom_parameters: BTreeMap::new(),
        }
    }
}

/// Per-pillar contributions (raw score × weight) and their sum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedScores {
    pub asset_quality: f64,
    pub market_outlook: f64,
    pub capital_intensity: f64,
    pub strategic_fit: f64,
    pub financial_readiness: f64,
    pub regulatory_risk: f64,
    pub total: f64,
}

impl WeightedScores {
    pub fn from_contributions(contributions: [f64; 6]) -> Self {
        Self {
            asset_quality: contributions[0],
            market_outlook: contributions[1],
            capital_intensity: contributions[2],
            strategic_fit: contributions[3],
            financial_readiness: contributions[4],
            regulatory_risk: contributions[5],
            total: contributions.iter().sum(),
        }
    }

    pub fn get(&self, pillar: PillarName) -> f64 {
        match pillar {
            PillarName::AssetQuality => self.asset_quality,
            PillarName::MarketOutlook => self.market_outlook,
            PillarName::CapitalIntensity => self.capital_intensity,
            PillarName::StrategicFit => self.strategic_fit,
            PillarName::FinancialReadiness => self.financial_readiness,
            PillarName::RegulatoryRisk => self.regulatory_risk,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceMetrics {
    /// Mean of the six pillar confidences
    pub overall: f64,
    pub data_completeness: f64,
    pub model_accuracy: f64,
    pub comparable_quality: f64,
}

/// Five-level investment call
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InvestmentRecommendation {
    StrongSell,
    Sell,
    Hold,
    Buy,
    StrongBuy,
}

impl InvestmentRecommendation {
    /// Classify a confidence-adjusted score (overall score × overall confidence)
    pub fn from_adjusted_score(score: f64) -> Self {
        match score {
            s if s >= 4.0 => InvestmentRecommendation::StrongBuy,
            s if s >= 3.5 => InvestmentRecommendation::Buy,
            s if s >= 2.5 => InvestmentRecommendation::Hold,
            s if s >= 2.0 => InvestmentRecommendation::Sell,
            _ => InvestmentRecommendation::StrongSell,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentRecommendation::StrongSell => "strongSell",
            InvestmentRecommendation::Sell => "sell",
            InvestmentRecommendation::Hold => "hold",
            InvestmentRecommendation::Buy => "buy",
            InvestmentRecommendation::StrongBuy => "strongBuy",
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            InvestmentRecommendation::StrongSell => "Strong Sell",
            InvestmentRecommendation::Sell => "Sell",
            InvestmentRecommendation::Hold => "Hold",
            InvestmentRecommendation::Buy => "Buy",
            InvestmentRecommendation::StrongBuy => "Strong Buy",
        }
    }
}

/// Four-level risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    /// Classify an average inverted-score risk on the 0–5 scale
    pub fn from_average_risk(risk: f64) -> Self {
        match risk {
            r if r >= 3.5 => RiskLevel::VeryHigh,
            r if r >= 2.5 => RiskLevel::High,
            r if r >= 1.5 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "veryHigh",
        }
    }
}

/// Complete outcome of one company evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    pub company_id: String,
    pub overall_score: f64,
    pub pillar_scores: PillarScores,
    pub weighted_scores: WeightedScores,
    pub confidence: ConfidenceMetrics,
    pub recommendations: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub investment_recommendation: InvestmentRecommendation,
    pub risk_level: RiskLevel,
}

/// Per-factor share of a pillar's raw score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorContribution {
    pub factor: String,
    pub weight: f64,
    pub score: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarExplanation {
    pub summary: String,
    pub contributions: Vec<FactorContribution>,
    pub methodology: String,
    pub limitations: Vec<String>,
}
