use scoring_core::stats::{bracket, keyword_match, mean, NEUTRAL_SCORE};
use scoring_core::{
    CompanyData, DataField, DevelopmentStage, MarketContext, Pillar, PillarName, ScoringFactor,
    ValidationResult,
};
use std::collections::BTreeSet;

const REQUIRED: &[DataField] = &[
    DataField::TherapeuticAreas,
    DataField::DevelopmentStage,
    DataField::Programs,
];
const OPTIONAL: &[DataField] = &[
    DataField::ProgramDifferentiators,
    DataField::ProgramMechanisms,
    DataField::ClinicalTrials,
    DataField::Approvals,
];

const PROGRAM_COUNT: &[(f64, f64)] = &[(8.0, 4.5), (5.0, 4.0), (3.0, 3.5), (2.0, 3.0), (1.0, 2.0)];

const DIFFERENTIATOR_BONUS: &[(&str, f64)] = &[
    ("first-in-class", 0.5),
    ("best-in-class", 0.3),
    ("oral", 0.2),
    ("once-weekly", 0.2),
    ("safety", 0.2),
    ("biomarker", 0.2),
];

const MECHANISM_NOVELTY: &[(&str, f64)] = &[
    ("gene editing", 5.0),
    ("crispr", 5.0),
    ("protac", 4.5),
    ("degrader", 4.5),
    ("gene therapy", 4.5),
    ("cell therapy", 4.5),
    ("car-t", 4.5),
    ("mrna", 4.5),
    ("bispecific", 4.0),
    ("antibody-drug conjugate", 4.0),
    ("rnai", 4.0),
    ("antisense", 4.0),
    ("radioligand", 4.0),
    ("antibody", 3.0),
    ("small molecule", 3.0),
    ("vaccine", 3.0),
    ("peptide", 3.0),
];

const AREA_ATTRACTIVENESS: &[(&str, f64)] = &[
    ("oncology", 4.5),
    ("cancer", 4.5),
    ("rare", 4.5),
    ("orphan", 4.5),
    ("neuro", 4.0),
    ("immuno", 4.0),
    ("autoimmune", 4.0),
    ("ophthalm", 3.5),
    ("cardio", 3.5),
    ("metabolic", 3.5),
    ("infectious", 3.0),
    ("dermatology", 3.0),
];

fn stage_score(stage: DevelopmentStage) -> f64 {
    match stage {
        DevelopmentStage::Preclinical => 1.5,
        DevelopmentStage::Phase1 => 2.0,
        DevelopmentStage::Phase2 => 3.0,
        DevelopmentStage::Phase3 => 4.0,
        DevelopmentStage::Approved => 4.5,
        DevelopmentStage::Marketed => 5.0,
    }
}

/// Sum of differentiator bonuses, capped at one full point
fn keyword_bonus(matched: &[&str]) -> f64 {
    DIFFERENTIATOR_BONUS
        .iter()
        .filter(|(keyword, _)| matched.contains(keyword))
        .map(|(_, bonus)| bonus)
        .sum::<f64>()
        .min(1.0)
}

/// Quality and maturity of the drug pipeline
pub struct AssetQualityPillar;

impl AssetQualityPillar {
    pub fn new() -> Self {
        Self
    }

    fn development_stage(&self, data: &CompanyData) -> ScoringFactor {
        let company_stage = data.basic_info.development_stage;
        let lead = data.pipeline.lead_stage().unwrap_or(company_stage);
        let stage = company_stage.max(lead);
        ScoringFactor::new(
            "Development Stage",
            0.30,
            stage_score(stage),
            format!("Most advanced asset is at {}", stage.to_label()),
        )
    }

    fn pipeline_breadth(&self, data: &CompanyData) -> ScoringFactor {
        let programs = &data.pipeline.programs;
        let mut score = bracket(programs.len() as f64, PROGRAM_COUNT, 1.0);

        let stages: BTreeSet<DevelopmentStage> = programs.iter().map(|p| p.stage).collect();
        let diversified = stages.len() >= 2;
        if diversified {
            score += 0.5;
        }

        ScoringFactor::new(
            "Pipeline Breadth",
            0.20,
            score,
            format!(
                "{} program(s) across {} development stage(s){}",
                programs.len(),
                stages.len(),
                if diversified { ", staggered risk" } else { "" }
            ),
        )
    }

    fn differentiation(&self, data: &CompanyData) -> ScoringFactor {
        let programs = &data.pipeline.programs;
        let with_differentiators = programs.iter().filter(|p| !p.differentiators.is_empty()).count();
        let fraction = if programs.is_empty() {
            0.0
        } else {
            with_differentiators as f64 / programs.len() as f64
        };

        let all_text = programs
            .iter()
            .flat_map(|p| p.differentiators.iter())
            .map(|d| d.to_lowercase())
            .collect::<Vec<_>>()
            .join(" | ");
        let matched: Vec<&str> = DIFFERENTIATOR_BONUS
            .iter()
            .filter(|(keyword, _)| all_text.contains(keyword))
            .map(|(keyword, _)| *keyword)
            .collect();
        let bonus = keyword_bonus(&matched);

        let mut rationale = format!(
            "{} of {} program(s) document differentiators",
            with_differentiators,
            programs.len()
        );
        if !matched.is_empty() {
            rationale.push_str(&format!(" ({})", matched.join(", ")));
        }

        ScoringFactor::new("Differentiation", 0.20, 1.5 + 3.0 * fraction + bonus, rationale)
    }

    fn mechanism_novelty(&self, data: &CompanyData) -> ScoringFactor {
        let scores: Vec<f64> = data
            .pipeline
            .programs
            .iter()
            .filter(|p| !p.mechanism.trim().is_empty())
            .map(|p| keyword_match(&p.mechanism, MECHANISM_NOVELTY).map_or(NEUTRAL_SCORE, |(_, s)| s))
            .collect();

        if scores.is_empty() {
            return ScoringFactor::new(
                "Mechanism Novelty",
                0.15,
                NEUTRAL_SCORE,
                "No mechanisms documented; neutral assumption",
            );
        }

        ScoringFactor::new(
            "Mechanism Novelty",
            0.15,
            mean(&scores),
            format!("Average modality novelty across {} documented mechanism(s)", scores.len()),
        )
    }

    fn therapeutic_area(&self, data: &CompanyData) -> ScoringFactor {
        let scores: Vec<f64> = data
            .basic_info
            .therapeutic_areas
            .iter()
            .filter(|a| !a.trim().is_empty())
            .map(|a| keyword_match(a, AREA_ATTRACTIVENESS).map_or(NEUTRAL_SCORE, |(_, s)| s))
            .collect();
        let score = if scores.is_empty() { NEUTRAL_SCORE } else { mean(&scores) };

        ScoringFactor::new(
            "Therapeutic Area Attractiveness",
            0.15,
            score,
            format!("Focus areas: {}", data.basic_info.therapeutic_areas.join(", ")),
        )
    }
}

impl Pillar for AssetQualityPillar {
    fn name(&self) -> PillarName {
        PillarName::AssetQuality
    }

    fn required_fields(&self) -> &'static [DataField] {
        REQUIRED
    }

    fn optional_fields(&self) -> &'static [DataField] {
        OPTIONAL
    }

    fn methodology_reliability(&self) -> f64 {
        0.85
    }

    fn methodology(&self) -> &'static str {
        "Stage-weighted pipeline assessment: development stage, breadth, differentiation, \
         modality novelty and therapeutic-area attractiveness from fixed lookup tables"
    }

    fn limitations(&self) -> &'static [&'static str] {
        &[
            "Differentiator and mechanism keywords are matched textually, not clinically verified",
            "Does not weigh individual program probability of success",
        ]
    }

    fn check(&self, data: &CompanyData, result: &mut ValidationResult) {
        for (i, program) in data.pipeline.programs.iter().enumerate() {
            if program.name.trim().is_empty() {
                result.error(&format!("pipeline.programs[{}].name", i), "Program name is empty");
            }
            if program.indication.trim().is_empty() {
                result.error(
                    &format!("pipeline.programs[{}].indication", i),
                    "Program indication is empty",
                );
            }
        }
    }

    fn factors(&self, data: &CompanyData, _context: &MarketContext) -> Vec<ScoringFactor> {
        vec![
            self.development_stage(data),
            self.pipeline_breadth(data),
            self.differentiation(data),
            self.mechanism_novelty(data),
            self.therapeutic_area(data),
        ]
    }

    fn data_quality(&self, data: &CompanyData, _context: &MarketContext) -> f64 {
        let per_program: Vec<f64> = data
            .pipeline
            .programs
            .iter()
            .map(|p| {
                let differentiators = match p.differentiators.len() {
                    0 => 0.0,
                    1 => 0.25,
                    _ => 0.5,
                };
                let mechanism = if p.mechanism.trim().is_empty() { 0.0 } else { 0.3 };
                let indication = if p.indication.trim().is_empty() { 0.0 } else { 0.2 };
                differentiators + mechanism + indication
            })
            .collect();
        mean(&per_program)
    }

    fn pillar_warnings(&self, data: &CompanyData, _context: &MarketContext) -> Vec<String> {
        let mut warnings = Vec::new();
        let programs = &data.pipeline.programs;
        if programs.len() == 1 {
            warnings.push(format!(
                "Single-program dependency: {} carries the entire pipeline",
                programs[0].name
            ));
        }
        if data.pipeline.lead_stage() == Some(DevelopmentStage::Preclinical) {
            warnings.push("Pipeline has no clinical-stage program".to_string());
        }
        warnings
    }
}

impl Default for AssetQualityPillar {
    fn default() -> Self {
        Self::new()
    }
}
