use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Clinical development stage of a company or a single program
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevelopmentStage {
    Preclinical,
    Phase1,
    Phase2,
    Phase3,
    Approved,
    Marketed,
}

impl DevelopmentStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DevelopmentStage::Preclinical => "preclinical",
            DevelopmentStage::Phase1 => "phase1",
            DevelopmentStage::Phase2 => "phase2",
            DevelopmentStage::Phase3 => "phase3",
            DevelopmentStage::Approved => "approved",
            DevelopmentStage::Marketed => "marketed",
        }
    }

    /// Human-readable label for the stage
    pub fn to_label(&self) -> &'static str {
        match self {
            DevelopmentStage::Preclinical => "Preclinical",
            DevelopmentStage::Phase1 => "Phase 1",
            DevelopmentStage::Phase2 => "Phase 2",
            DevelopmentStage::Phase3 => "Phase 3",
            DevelopmentStage::Approved => "Approved",
            DevelopmentStage::Marketed => "Marketed",
        }
    }

    /// Approved or marketed products generate (or are about to generate) revenue
    pub fn is_commercial(&self) -> bool {
        matches!(self, DevelopmentStage::Approved | DevelopmentStage::Marketed)
    }
}

/// Company identity and focus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub name: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub therapeutic_areas: Vec<String>,
    pub development_stage: DevelopmentStage,
}

/// A single drug development program
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub name: String,
    #[serde(default)]
    pub indication: String,
    #[serde(default)]
    pub mechanism: String,
    pub stage: DevelopmentStage,
    #[serde(default)]
    pub differentiators: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    #[serde(default)]
    pub programs: Vec<Program>,
}

impl Pipeline {
    /// Most advanced stage across all programs
    pub fn lead_stage(&self) -> Option<DevelopmentStage> {
        self.programs.iter().map(|p| p.stage).max()
    }
}

/// Most recent financing event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingEvent {
    pub round_type: String,
    /// Amount raised in $M
    pub amount: f64,
    pub date: DateTime<Utc>,
}

/// Cash position and burn, all monetary values in $M
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    #[serde(default)]
    pub cash_position: Option<f64>,
    /// Monthly burn in $M
    #[serde(default)]
    pub burn_rate: Option<f64>,
    /// Runway in months; derived from cash and burn when not supplied
    #[serde(default)]
    pub runway: Option<f64>,
    #[serde(default)]
    pub last_funding: Option<FundingEvent>,
}

impl Financials {
    /// Runway in months: the supplied value, or cash / burn.
    /// A zero burn with positive cash is treated as an unbounded runway.
    pub fn runway_months(&self) -> Option<f64> {
        if let Some(runway) = self.runway {
            return Some(runway.max(0.0));
        }
        match (self.cash_position, self.burn_rate) {
            (Some(cash), Some(burn)) if burn > 0.0 => Some((cash / burn).max(0.0)),
            (Some(cash), Some(_)) if cash > 0.0 => Some(f64::INFINITY),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub name: String,
    #[serde(default)]
    pub stage: Option<DevelopmentStage>,
    #[serde(default)]
    pub market_share: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReimbursementCategory {
    Favorable,
    Moderate,
    Challenging,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDynamics {
    /// Annual growth as a fraction (0.12 = 12%)
    #[serde(default)]
    pub growth_rate: Option<f64>,
    #[serde(default)]
    pub drivers: Vec<String>,
    #[serde(default)]
    pub barriers: Vec<String>,
    #[serde(default)]
    pub reimbursement: ReimbursementCategory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    /// Addressable market in $B
    #[serde(default)]
    pub addressable_market: Option<f64>,
    #[serde(default)]
    pub competitors: Vec<Competitor>,
    #[serde(default)]
    pub market_dynamics: MarketDynamics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub indication: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrialStatus {
    Planned,
    Recruiting,
    Active,
    Completed,
    Suspended,
    Terminated,
    Withdrawn,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TrialStatus {
    pub fn is_ongoing(&self) -> bool {
        matches!(self, TrialStatus::Planned | TrialStatus::Recruiting | TrialStatus::Active)
    }

    pub fn is_halted(&self) -> bool {
        matches!(self, TrialStatus::Suspended | TrialStatus::Terminated | TrialStatus::Withdrawn)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalTrial {
    pub id: String,
    pub phase: DevelopmentStage,
    #[serde(default)]
    pub indication: String,
    #[serde(default)]
    pub status: TrialStatus,
    #[serde(default)]
    pub enrollment: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegulatoryPathway {
    Standard,
    Accelerated,
    BreakthroughTherapy,
    FastTrack,
    OrphanDrug,
    PriorityReview,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegulatoryStrategy {
    #[serde(default)]
    pub pathway: RegulatoryPathway,
    /// Expected months to approval
    #[serde(default)]
    pub timeline: Option<f64>,
    #[serde(default)]
    pub risks: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Regulatory {
    #[serde(default)]
    pub approvals: Vec<Approval>,
    #[serde(default)]
    pub clinical_trials: Vec<ClinicalTrial>,
    #[serde(default)]
    pub regulatory_strategy: Option<RegulatoryStrategy>,
}

/// Company snapshot supplied per evaluation call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyData {
    pub id: String,
    pub basic_info: BasicInfo,
    #[serde(default)]
    pub pipeline: Pipeline,
    #[serde(default)]
    pub financials: Financials,
    #[serde(default)]
    pub market: Market,
    #[serde(default)]
    pub regulatory: Regulatory,
    /// Reference date for recency heuristics (funding age)
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl CompanyData {
    /// Reference instant for time-based heuristics
    pub fn as_of(&self) -> DateTime<Utc> {
        self.last_updated.unwrap_or_else(Utc::now)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparableCompany {
    pub name: String,
    #[serde(default)]
    pub therapeutic_areas: Vec<String>,
    #[serde(default)]
    pub stage: Option<DevelopmentStage>,
    /// Valuation in $M
    #[serde(default)]
    pub valuation: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkData {
    #[serde(default)]
    pub average_runway_months: Option<f64>,
    #[serde(default)]
    pub median_valuation: Option<f64>,
    #[serde(default)]
    pub sector_growth_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarketSentiment {
    Bullish,
    Bearish,
    #[default]
    #[serde(other)]
    Neutral,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FundingEnvironment {
    Favorable,
    Challenging,
    #[default]
    #[serde(other)]
    Neutral,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketConditions {
    #[serde(default)]
    pub sentiment: MarketSentiment,
    #[serde(default)]
    pub funding_environment: FundingEnvironment,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryMetrics {
    #[serde(default)]
    pub average_time_to_approval_months: Option<f64>,
    /// Probability of advancing out of each stage
    #[serde(default)]
    pub phase_success_rates: BTreeMap<DevelopmentStage, f64>,
}

/// Externally supplied market snapshot, read-only per evaluation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketContext {
    #[serde(default)]
    pub comparable_companies: Vec<ComparableCompany>,
    #[serde(default)]
    pub benchmark_data: BenchmarkData,
    #[serde(default)]
    pub market_conditions: MarketConditions,
    #[serde(default)]
    pub industry_metrics: IndustryMetrics,
}
