use scoring_core::stats::{ceiling, keyword_match, mean, NEUTRAL_SCORE};
use scoring_core::{
    CompanyData, DataField, DevelopmentStage, MarketContext, Pillar, PillarName, ScoringFactor,
    ValidationResult,
};

const REQUIRED: &[DataField] = &[DataField::DevelopmentStage, DataField::BurnRate];
const OPTIONAL: &[DataField] = &[
    DataField::Programs,
    DataField::ClinicalTrials,
    DataField::CashPosition,
];

/// Monthly burn in $M, smaller is better
const BURN_RATE: &[(f64, f64)] = &[(2.0, 5.0), (5.0, 4.0), (10.0, 3.0), (20.0, 2.0)];

/// Ongoing trial count, fewer is cheaper
const TRIAL_COUNT: &[(f64, f64)] = &[(0.0, 4.0), (2.0, 3.5), (5.0, 2.5)];

/// Burn per program in $M/month
const BURN_PER_PROGRAM: &[(f64, f64)] = &[(1.0, 4.5), (3.0, 3.5), (6.0, 2.5)];

const MODALITY_COST: &[(&str, f64)] = &[
    ("cell therapy", 2.0),
    ("car-t", 2.0),
    ("gene therapy", 2.0),
    ("gene editing", 2.0),
    ("crispr", 2.0),
    ("antibody", 3.0),
    ("biologic", 3.0),
    ("protein", 3.0),
    ("vaccine", 3.0),
    ("small molecule", 4.0),
    ("oral", 4.0),
];

const HEAVY_BURN: f64 = 20.0;
const PHASE3_TRIAL_PENALTY: f64 = 0.25;

fn stage_score(stage: DevelopmentStage) -> f64 {
    match stage {
        DevelopmentStage::Preclinical => 2.0,
        DevelopmentStage::Phase1 => 2.5,
        DevelopmentStage::Phase2 => 2.5,
        DevelopmentStage::Phase3 => 2.0,
        DevelopmentStage::Approved => 4.0,
        DevelopmentStage::Marketed => 4.5,
    }
}

/// How much capital the company needs to reach its next value inflection.
/// Higher scores mean lighter capital requirements.
pub struct CapitalIntensityPillar;

impl CapitalIntensityPillar {
    pub fn new() -> Self {
        Self
    }

    fn burn_rate(data: &CompanyData) -> f64 {
        data.financials.burn_rate.filter(|b| b.is_finite()).unwrap_or(0.0).max(0.0)
    }

    fn phase3_trials(data: &CompanyData) -> usize {
        data.regulatory
            .clinical_trials
            .iter()
            .filter(|t| t.phase == DevelopmentStage::Phase3 && t.status.is_ongoing())
            .count()
    }

    fn development_stage(&self, data: &CompanyData) -> ScoringFactor {
        let stage = data.basic_info.development_stage;
        ScoringFactor::new(
            "Stage Capital Requirements",
            0.30,
            stage_score(stage),
            format!("{} programs carry a {} cost profile", stage.to_label(), match stage {
                DevelopmentStage::Approved | DevelopmentStage::Marketed => "self-funding",
                DevelopmentStage::Phase3 => "peak",
                _ => "rising",
            }),
        )
    }

    fn burn(&self, data: &CompanyData) -> ScoringFactor {
        let burn = Self::burn_rate(data);
        ScoringFactor::new(
            "Burn Efficiency",
            0.25,
            ceiling(burn, BURN_RATE, 1.5),
            format!("Burning ${:.1}M per month", burn),
        )
    }

    fn modality(&self, data: &CompanyData) -> ScoringFactor {
        let scores: Vec<f64> = data
            .pipeline
            .programs
            .iter()
            .filter_map(|p| keyword_match(&p.mechanism, MODALITY_COST).map(|(_, s)| s))
            .collect();

        if scores.is_empty() {
            return ScoringFactor::new(
                "Modality Cost",
                0.20,
                NEUTRAL_SCORE,
                "Modality not identifiable from program mechanisms",
            );
        }

        ScoringFactor::new(
            "Modality Cost",
            0.20,
            mean(&scores),
            format!("{} of {} program(s) with a recognised modality", scores.len(), data.pipeline.programs.len()),
        )
    }

    fn trial_footprint(&self, data: &CompanyData) -> ScoringFactor {
        let ongoing = data
            .regulatory
            .clinical_trials
            .iter()
            .filter(|t| t.status.is_ongoing())
            .count();
        let phase3 = Self::phase3_trials(data);
        let score = ceiling(ongoing as f64, TRIAL_COUNT, 2.0) - PHASE3_TRIAL_PENALTY * phase3 as f64;

        ScoringFactor::new(
            "Trial Footprint",
            0.15,
            score,
            format!("{} ongoing trial(s), {} in Phase 3", ongoing, phase3),
        )
    }

    fn program_burden(&self, data: &CompanyData) -> ScoringFactor {
        let programs = data.pipeline.programs.len();
        if programs == 0 {
            return ScoringFactor::new("Program Burden", 0.10, NEUTRAL_SCORE, "No programs to allocate burn across");
        }
        let per_program = Self::burn_rate(data) / programs as f64;
        ScoringFactor::new(
            "Program Burden",
            0.10,
            ceiling(per_program, BURN_PER_PROGRAM, 1.5),
            format!("${:.2}M monthly burn per program", per_program),
        )
    }
}

impl Pillar for CapitalIntensityPillar {
    fn name(&self) -> PillarName {
        PillarName::CapitalIntensity
    }

    fn required_fields(&self) -> &'static [DataField] {
        REQUIRED
    }

    fn optional_fields(&self) -> &'static [DataField] {
        OPTIONAL
    }

    fn methodology_reliability(&self) -> f64 {
        0.75
    }

    fn methodology(&self) -> &'static str {
        "Stage cost profile and monthly burn, adjusted for modality manufacturing cost, \
         concurrent trial load and burn spread across the pipeline"
    }

    fn limitations(&self) -> &'static [&'static str] {
        &[
            "Modality costs are inferred from mechanism keywords",
            "Trial cost ignores enrollment size and geography",
            "Partnership cost-sharing is not modelled",
        ]
    }

    fn check(&self, data: &CompanyData, result: &mut ValidationResult) {
        if data.financials.burn_rate.map_or(false, |b| b < 0.0) {
            result.error("financials.burnRate", "Burn rate cannot be negative");
        }
    }

    fn factors(&self, data: &CompanyData, _context: &MarketContext) -> Vec<ScoringFactor> {
        vec![
            self.development_stage(data),
            self.burn(data),
            self.modality(data),
            self.trial_footprint(data),
            self.program_burden(data),
        ]
    }

    fn data_quality(&self, data: &CompanyData, _context: &MarketContext) -> f64 {
        let programs = &data.pipeline.programs;
        let mechanisms = if programs.is_empty() {
            0.0
        } else {
            programs.iter().filter(|p| !p.mechanism.trim().is_empty()).count() as f64 / programs.len() as f64
        };
        let trials = &data.regulatory.clinical_trials;
        let enrollment = if trials.is_empty() {
            0.5
        } else {
            trials.iter().filter(|t| t.enrollment.is_some()).count() as f64 / trials.len() as f64
        };
        let cash = if data.financials.cash_position.is_some() { 1.0 } else { 0.0 };
        mean(&[mechanisms, enrollment, cash])
    }

    fn pillar_warnings(&self, data: &CompanyData, _context: &MarketContext) -> Vec<String> {
        let mut warnings = Vec::new();
        let burn = Self::burn_rate(data);
        if burn > HEAVY_BURN {
            warnings.push(format!("Heavy burn of ${:.1}M per month", burn));
        }
        let phase3 = Self::phase3_trials(data);
        if phase3 >= 2 {
            warnings.push(format!("{} concurrent Phase 3 trials drive capital needs", phase3));
        }
        warnings
    }
}

impl Default for CapitalIntensityPillar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring_core::fixtures::{self, trial};
    use scoring_core::TrialStatus;

    #[test]
    fn test_sample_company_factors() {
        let company = fixtures::sample_company();
        let pillar = CapitalIntensityPillar::new();

        assert_eq!(pillar.development_stage(&company).score, 2.5);
        assert_eq!(pillar.burn(&company).score, 3.0);
        // antibody, antibody-drug conjugate, small molecule
        assert!((pillar.modality(&company).score - 10.0 / 3.0).abs() < 1e-9);
        assert_eq!(pillar.trial_footprint(&company).score, 3.5);
        assert_eq!(pillar.program_burden(&company).score, 3.5);
    }

    #[test]
    fn test_phase3_trials_raise_intensity() {
        let mut company = fixtures::sample_company();
        company.regulatory.clinical_trials = vec![
            trial("P3-A", DevelopmentStage::Phase3, TrialStatus::Active),
            trial("P3-B", DevelopmentStage::Phase3, TrialStatus::Recruiting),
        ];
        let pillar = CapitalIntensityPillar::new();
        assert_eq!(pillar.trial_footprint(&company).score, 3.0);

        let score = pillar.score(&company, &MarketContext::default()).unwrap();
        assert!(score.warnings.iter().any(|w| w.contains("concurrent Phase 3")));
    }

    #[test]
    fn test_heavy_burn_warning() {
        let mut company = fixtures::sample_company();
        company.financials.burn_rate = Some(25.0);
        let score = CapitalIntensityPillar::new()
            .score(&company, &MarketContext::default())
            .unwrap();
        assert_eq!(score.factors[1].score, 1.5);
        assert!(score.warnings.iter().any(|w| w.starts_with("Heavy burn")));
    }

    #[test]
    fn test_missing_burn_rate_fails() {
        let mut company = fixtures::sample_company();
        company.financials.burn_rate = None;
        let err = CapitalIntensityPillar::new()
            .score(&company, &MarketContext::default())
            .unwrap_err();
        assert!(err.to_string().contains("financials.burnRate"));
    }

    #[test]
    fn test_unknown_modality_is_neutral() {
        let company = fixtures::minimal_company();
        let factor = CapitalIntensityPillar::new().modality(&company);
        assert_eq!(factor.score, NEUTRAL_SCORE);
    }
}
