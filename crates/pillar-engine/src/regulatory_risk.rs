use scoring_core::stats::{ceiling, mean, NEUTRAL_SCORE};
use scoring_core::{
    CompanyData, DataField, MarketContext, Pillar, PillarName, RegulatoryPathway, ScoringFactor,
    TrialStatus, ValidationResult,
};

const REQUIRED: &[DataField] = &[DataField::DevelopmentStage, DataField::TherapeuticAreas];
const OPTIONAL: &[DataField] = &[
    DataField::ClinicalTrials,
    DataField::Approvals,
    DataField::RegulatoryPathway,
    DataField::RegulatoryTimeline,
    DataField::RegulatoryRisks,
];

/// Months to expected approval
const TIMELINE: &[(f64, f64)] = &[(12.0, 4.5), (24.0, 4.0), (36.0, 3.0), (60.0, 2.0)];

const SEVERE_RISK_TERMS: &[&str] = &["safety", "clinical hold"];

fn pathway_score(pathway: RegulatoryPathway) -> f64 {
    match pathway {
        RegulatoryPathway::BreakthroughTherapy => 5.0,
        RegulatoryPathway::Accelerated => 4.5,
        RegulatoryPathway::OrphanDrug => 4.5,
        RegulatoryPathway::FastTrack => 4.0,
        RegulatoryPathway::PriorityReview => 4.0,
        RegulatoryPathway::Standard => 3.0,
        RegulatoryPathway::Unknown => NEUTRAL_SCORE,
    }
}

fn severe(risk: &str) -> bool {
    let lower = risk.to_lowercase();
    SEVERE_RISK_TERMS.iter().any(|t| lower.contains(t))
}

/// Likelihood and speed of regulatory approval; higher scores mean lower risk
pub struct RegulatoryRiskPillar;

impl RegulatoryRiskPillar {
    pub fn new() -> Self {
        Self
    }

    fn approval_history(&self, data: &CompanyData) -> ScoringFactor {
        let approvals = data.regulatory.approvals.len();
        let (score, rationale) = match approvals {
            0 if data.basic_info.development_stage.is_commercial() => {
                (4.0, "Commercial-stage company without itemised approvals".to_string())
            }
            0 => (2.5, "No prior regulatory approvals".to_string()),
            1 => (4.0, "One prior approval".to_string()),
            n => (5.0, format!("{} prior approvals", n)),
        };
        ScoringFactor::new("Approval Track Record", 0.25, score, rationale)
    }

    fn pathway(&self, data: &CompanyData) -> ScoringFactor {
        let pathway = data
            .regulatory
            .regulatory_strategy
            .as_ref()
            .map_or(RegulatoryPathway::Unknown, |s| s.pathway);
        ScoringFactor::new(
            "Regulatory Pathway",
            0.25,
            pathway_score(pathway),
            format!("{:?} pathway", pathway),
        )
    }

    fn trial_execution(&self, data: &CompanyData) -> ScoringFactor {
        let trials = &data.regulatory.clinical_trials;
        if trials.is_empty() {
            return ScoringFactor::new("Trial Execution", 0.20, NEUTRAL_SCORE, "No clinical trials reported");
        }

        let halted = trials.iter().filter(|t| t.status.is_halted()).count();
        let completed = trials
            .iter()
            .filter(|t| t.status == TrialStatus::Completed)
            .count();
        let score = 3.5 - 0.75 * halted as f64 + (0.25 * completed as f64).min(1.0);

        ScoringFactor::new(
            "Trial Execution",
            0.20,
            score,
            format!("{} trial(s): {} completed, {} halted", trials.len(), completed, halted),
        )
    }

    fn timeline(&self, data: &CompanyData, context: &MarketContext) -> ScoringFactor {
        let months = data
            .regulatory
            .regulatory_strategy
            .as_ref()
            .and_then(|s| s.timeline)
            .filter(|t| t.is_finite() && *t >= 0.0);

        let Some(months) = months else {
            return ScoringFactor::new("Timeline", 0.15, NEUTRAL_SCORE, "No approval timeline provided");
        };

        let mut score = ceiling(months, TIMELINE, 1.5);
        let mut rationale = format!("{:.0} months to expected approval", months);
        if let Some(average) = context.industry_metrics.average_time_to_approval_months {
            if months < average {
                score += 0.25;
                rationale.push_str(&format!(", faster than the {:.0}-month industry average", average));
            }
        }

        ScoringFactor::new("Timeline", 0.15, score, rationale)
    }

    fn identified_risks(&self, data: &CompanyData) -> ScoringFactor {
        let Some(strategy) = &data.regulatory.regulatory_strategy else {
            return ScoringFactor::new("Identified Risks", 0.15, NEUTRAL_SCORE, "No regulatory strategy disclosed");
        };

        let mut score = 5.0 - 0.5 * strategy.risks.len() as f64;
        let severe_count = strategy.risks.iter().filter(|r| severe(r)).count();
        if severe_count > 0 {
            score -= 0.5;
        }

        ScoringFactor::new(
            "Identified Risks",
            0.15,
            score,
            format!("{} disclosed risk(s), {} safety-related", strategy.risks.len(), severe_count),
        )
    }
}

impl Pillar for RegulatoryRiskPillar {
    fn name(&self) -> PillarName {
        PillarName::RegulatoryRisk
    }

    fn required_fields(&self) -> &'static [DataField] {
        REQUIRED
    }

    fn optional_fields(&self) -> &'static [DataField] {
        OPTIONAL
    }

    fn methodology_reliability(&self) -> f64 {
        0.80
    }

    fn methodology(&self) -> &'static str {
        "Approval track record and expedited pathway designations combined with trial \
         execution history, timeline versus industry norms and disclosed regulatory risks"
    }

    fn limitations(&self) -> &'static [&'static str] {
        &[
            "Regional regulatory differences are not distinguished",
            "Disclosed risks are counted, not weighted by likelihood",
        ]
    }

    fn check(&self, data: &CompanyData, result: &mut ValidationResult) {
        for (i, trial) in data.regulatory.clinical_trials.iter().enumerate() {
            if trial.id.trim().is_empty() {
                result.error(&format!("regulatory.clinicalTrials[{}].id", i), "Trial id is empty");
            }
        }
        if let Some(timeline) = data.regulatory.regulatory_strategy.as_ref().and_then(|s| s.timeline) {
            if timeline < 0.0 {
                result.error("regulatory.regulatoryStrategy.timeline", "Timeline cannot be negative");
            }
        }
    }

    fn factors(&self, data: &CompanyData, context: &MarketContext) -> Vec<ScoringFactor> {
        vec![
            self.approval_history(data),
            self.pathway(data),
            self.trial_execution(data),
            self.timeline(data, context),
            self.identified_risks(data),
        ]
    }

    fn data_quality(&self, data: &CompanyData, context: &MarketContext) -> f64 {
        let trials = &data.regulatory.clinical_trials;
        let trial_detail = if trials.is_empty() {
            0.0
        } else {
            trials
                .iter()
                .filter(|t| t.status != TrialStatus::Unknown)
                .count() as f64
                / trials.len() as f64
        };
        let strategy = if data.regulatory.regulatory_strategy.is_some() { 1.0 } else { 0.0 };
        let industry = if context.industry_metrics.average_time_to_approval_months.is_some() {
            1.0
        } else {
            0.5
        };
        mean(&[trial_detail, strategy, industry])
    }

    fn pillar_warnings(&self, data: &CompanyData, _context: &MarketContext) -> Vec<String> {
        let mut warnings = Vec::new();
        let halted: Vec<&str> = data
            .regulatory
            .clinical_trials
            .iter()
            .filter(|t| t.status.is_halted())
            .map(|t| t.id.as_str())
            .collect();
        if !halted.is_empty() {
            warnings.push(format!("Halted clinical trials: {}", halted.join(", ")));
        }
        let on_hold = data
            .regulatory
            .regulatory_strategy
            .as_ref()
            .map_or(false, |s| s.risks.iter().any(|r| r.to_lowercase().contains("clinical hold")));
        if on_hold {
            warnings.push("Clinical hold disclosed among regulatory risks".to_string());
        }
        warnings
    }
}

impl Default for RegulatoryRiskPillar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring_core::fixtures::{self, trial};
    use scoring_core::DevelopmentStage;

    #[test]
    fn test_sample_company_factors() {
        let company = fixtures::sample_company();
        let context = fixtures::sample_context(3);
        let pillar = RegulatoryRiskPillar::new();

        assert_eq!(pillar.approval_history(&company).score, 2.5);
        assert_eq!(pillar.pathway(&company).score, 4.0);
        assert_eq!(pillar.trial_execution(&company).score, 3.75);
        // 30 months, faster than the 36-month average
        assert_eq!(pillar.timeline(&company, &context).score, 3.25);
        assert_eq!(pillar.identified_risks(&company).score, 4.5);
    }

    #[test]
    fn test_halted_trials_and_clinical_hold() {
        let mut company = fixtures::sample_company();
        company.regulatory.clinical_trials = vec![
            trial("NCT-A", DevelopmentStage::Phase2, TrialStatus::Terminated),
            trial("NCT-B", DevelopmentStage::Phase1, TrialStatus::Suspended),
        ];
        if let Some(strategy) = company.regulatory.regulatory_strategy.as_mut() {
            strategy.risks.push("FDA clinical hold on HX-101".to_string());
        }

        let pillar = RegulatoryRiskPillar::new();
        assert_eq!(pillar.trial_execution(&company).score, 2.0);
        // two risks, one severe
        assert_eq!(pillar.identified_risks(&company).score, 3.5);

        let score = pillar.score(&company, &MarketContext::default()).unwrap();
        assert!(score.warnings.iter().any(|w| w.contains("NCT-A, NCT-B")));
        assert!(score.warnings.iter().any(|w| w.starts_with("Clinical hold")));
    }

    #[test]
    fn test_commercial_company_without_listed_approvals() {
        let mut company = fixtures::sample_company();
        company.basic_info.development_stage = DevelopmentStage::Marketed;
        assert_eq!(RegulatoryRiskPillar::new().approval_history(&company).score, 4.0);
    }

    #[test]
    fn test_missing_strategy_is_neutral() {
        let company = fixtures::minimal_company();
        let context = MarketContext::default();
        let pillar = RegulatoryRiskPillar::new();
        let factors = pillar.factors(&company, &context);
        assert!(factors[1..].iter().all(|f| f.score == NEUTRAL_SCORE));

        let validation = pillar.validate(&company);
        assert!(validation.is_valid);
        assert!(validation.completeness < 0.5);
    }
}
