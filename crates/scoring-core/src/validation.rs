use serde::{Deserialize, Serialize};

use crate::types::{CompanyData, ReimbursementCategory, RegulatoryPathway};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// Blocks scoring
    Critical,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    #[serde(default)]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub completeness: f64,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            completeness: 1.0,
        }
    }
}

impl ValidationResult {
    pub fn critical(&mut self, field: &str, message: impl Into<String>) {
        self.push_error(field, message.into(), Severity::Critical);
    }

    pub fn error(&mut self, field: &str, message: impl Into<String>) {
        self.push_error(field, message.into(), Severity::Error);
    }

    fn push_error(&mut self, field: &str, message: String, severity: Severity) {
        self.errors.push(ValidationError {
            field: field.to_string(),
            message,
            severity,
        });
        self.is_valid = false;
    }

    pub fn warn(&mut self, field: &str, message: impl Into<String>, suggestion: Option<&str>) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.into(),
            suggestion: suggestion.map(str::to_string),
        });
    }

    pub fn has_critical(&self) -> bool {
        self.errors.iter().any(|e| e.severity == Severity::Critical)
    }

    pub fn critical_errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(|e| e.severity == Severity::Critical)
    }

    /// "field: message" pairs of all critical errors joined with "; "
    pub fn critical_summary(&self) -> String {
        self.critical_errors()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Field paths a pillar can declare as required or optional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataField {
    Name,
    Sector,
    TherapeuticAreas,
    DevelopmentStage,
    Programs,
    ProgramDifferentiators,
    ProgramMechanisms,
    CashPosition,
    BurnRate,
    Runway,
    LastFunding,
    AddressableMarket,
    Competitors,
    GrowthRate,
    MarketDrivers,
    MarketBarriers,
    Reimbursement,
    Approvals,
    ClinicalTrials,
    RegulatoryStrategy,
    RegulatoryPathway,
    RegulatoryTimeline,
    RegulatoryRisks,
}

impl DataField {
    pub fn path(&self) -> &'static str {
        match self {
            DataField::Name => "basicInfo.name",
            DataField::Sector => "basicInfo.sector",
            DataField::TherapeuticAreas => "basicInfo.therapeuticAreas",
            DataField::DevelopmentStage => "basicInfo.developmentStage",
            DataField::Programs => "pipeline.programs",
            DataField::ProgramDifferentiators => "pipeline.programs.differentiators",
            DataField::ProgramMechanisms => "pipeline.programs.mechanism",
            DataField::CashPosition => "financials.cashPosition",
            DataField::BurnRate => "financials.burnRate",
            DataField::Runway => "financials.runway",
            DataField::LastFunding => "financials.lastFunding",
            DataField::AddressableMarket => "market.addressableMarket",
            DataField::Competitors => "market.competitors",
            DataField::GrowthRate => "market.marketDynamics.growthRate",
            DataField::MarketDrivers => "market.marketDynamics.drivers",
            DataField::MarketBarriers => "market.marketDynamics.barriers",
            DataField::Reimbursement => "market.marketDynamics.reimbursement",
            DataField::Approvals => "regulatory.approvals",
            DataField::ClinicalTrials => "regulatory.clinicalTrials",
            DataField::RegulatoryStrategy => "regulatory.regulatoryStrategy",
            DataField::RegulatoryPathway => "regulatory.regulatoryStrategy.pathway",
            DataField::RegulatoryTimeline => "regulatory.regulatoryStrategy.timeline",
            DataField::RegulatoryRisks => "regulatory.regulatoryStrategy.risks",
        }
    }

    /// Whether the company snapshot carries a usable value for this field
    pub fn is_present(&self, data: &CompanyData) -> bool {
        let strategy = data.regulatory.regulatory_strategy.as_ref();
        match self {
            DataField::Name => !data.basic_info.name.trim().is_empty(),
            DataField::Sector => !data.basic_info.sector.trim().is_empty(),
            DataField::TherapeuticAreas => data
                .basic_info
                .therapeutic_areas
                .iter()
                .any(|a| !a.trim().is_empty()),
            DataField::DevelopmentStage => true,
            DataField::Programs => !data.pipeline.programs.is_empty(),
            DataField::ProgramDifferentiators => data
                .pipeline
                .programs
                .iter()
                .any(|p| !p.differentiators.is_empty()),
            DataField::ProgramMechanisms => data
                .pipeline
                .programs
                .iter()
                .any(|p| !p.mechanism.trim().is_empty()),
            DataField::CashPosition => finite(data.financials.cash_position),
            DataField::BurnRate => finite(data.financials.burn_rate),
            DataField::Runway => data.financials.runway_months().is_some(),
            DataField::LastFunding => data.financials.last_funding.is_some(),
            DataField::AddressableMarket => data
                .market
                .addressable_market
                .map_or(false, |m| m.is_finite() && m > 0.0),
            DataField::Competitors => !data.market.competitors.is_empty(),
            DataField::GrowthRate => finite(data.market.market_dynamics.growth_rate),
            DataField::MarketDrivers => !data.market.market_dynamics.drivers.is_empty(),
            DataField::MarketBarriers => !data.market.market_dynamics.barriers.is_empty(),
            DataField::Reimbursement => {
                data.market.market_dynamics.reimbursement != ReimbursementCategory::Unknown
            }
            DataField::Approvals => !data.regulatory.approvals.is_empty(),
            DataField::ClinicalTrials => !data.regulatory.clinical_trials.is_empty(),
            DataField::RegulatoryStrategy => strategy.is_some(),
            DataField::RegulatoryPathway => {
                strategy.map_or(false, |s| s.pathway != RegulatoryPathway::Unknown)
            }
            DataField::RegulatoryTimeline => strategy.map_or(false, |s| finite(s.timeline)),
            DataField::RegulatoryRisks => strategy.map_or(false, |s| !s.risks.is_empty()),
        }
    }
}

fn finite(value: Option<f64>) -> bool {
    value.map_or(false, f64::is_finite)
}

/// Fraction of `fields` present in `data`; 1.0 for an empty declaration
pub fn completeness(data: &CompanyData, fields: &[DataField]) -> f64 {
    if fields.is_empty() {
        return 1.0;
    }
    let present = fields.iter().filter(|f| f.is_present(data)).count();
    present as f64 / fields.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_validation_result_tracks_validity() {
        let mut result = ValidationResult::default();
        assert!(result.is_valid);

        result.warn("market.competitors", "No competitors listed", Some("Add known competitors"));
        assert!(result.is_valid);

        result.error("financials.burnRate", "Burn rate is negative");
        assert!(!result.is_valid);
        assert!(!result.has_critical());

        result.critical("pipeline.programs", "Pipeline has no programs");
        assert!(result.has_critical());
        assert_eq!(result.critical_summary(), "pipeline.programs: Pipeline has no programs");
    }

    #[test]
    fn test_field_presence() {
        let mut company = fixtures::sample_company();
        assert!(DataField::Programs.is_present(&company));
        assert!(DataField::Runway.is_present(&company));

        company.pipeline.programs.clear();
        company.market.addressable_market = Some(0.0);
        assert!(!DataField::Programs.is_present(&company));
        assert!(!DataField::ProgramDifferentiators.is_present(&company));
        assert!(!DataField::AddressableMarket.is_present(&company));
    }

    #[test]
    fn test_completeness_ratio() {
        let mut company = fixtures::sample_company();
        company.financials.last_funding = None;
        let fields = [DataField::CashPosition, DataField::BurnRate, DataField::LastFunding, DataField::Runway];
        assert!((completeness(&company, &fields) - 0.75).abs() < 1e-9);
        assert_eq!(completeness(&company, &[]), 1.0);
    }
}
