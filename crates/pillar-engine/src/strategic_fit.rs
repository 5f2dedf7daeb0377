use scoring_core::stats::{ceiling, keyword_match, NEUTRAL_SCORE};
use scoring_core::{
    CompanyData, DataField, DevelopmentStage, MarketContext, Pillar, PillarName, ScoringFactor,
};

const REQUIRED: &[DataField] = &[DataField::TherapeuticAreas, DataField::Programs];
const OPTIONAL: &[DataField] = &[
    DataField::Sector,
    DataField::MarketDrivers,
    DataField::Approvals,
];

/// Number of therapeutic areas, fewer means sharper focus
const FOCUS: &[(f64, f64)] = &[(1.0, 4.5), (2.0, 4.0), (3.0, 3.0)];

const SECTOR_FIT: &[(&str, f64)] = &[
    ("biotech", 4.0),
    ("biopharma", 4.0),
    ("pharma", 3.5),
    ("medtech", 3.0),
    ("medical device", 3.0),
    ("diagnostic", 3.0),
];

const BROAD_FOCUS: usize = 4;
const LOW_COHERENCE: f64 = 0.5;

fn partnership_score(stage: DevelopmentStage) -> f64 {
    match stage {
        DevelopmentStage::Preclinical => 2.5,
        DevelopmentStage::Phase1 => 3.0,
        DevelopmentStage::Phase2 => 4.0,
        DevelopmentStage::Phase3 => 4.5,
        DevelopmentStage::Approved => 4.0,
        DevelopmentStage::Marketed => 3.5,
    }
}

fn areas(data: &CompanyData) -> Vec<String> {
    data.basic_info
        .therapeutic_areas
        .iter()
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect()
}

/// Fraction of programs whose indication names one of the company's therapeutic areas
fn coherence(data: &CompanyData) -> f64 {
    let programs = &data.pipeline.programs;
    if programs.is_empty() {
        return 0.0;
    }
    let areas = areas(data);
    let aligned = programs
        .iter()
        .filter(|p| {
            let indication = p.indication.to_lowercase();
            areas.iter().any(|a| indication.contains(a.as_str()))
        })
        .count();
    aligned as f64 / programs.len() as f64
}

/// Alignment of the portfolio with partner and acquirer appetite
pub struct StrategicFitPillar;

impl StrategicFitPillar {
    pub fn new() -> Self {
        Self
    }

    fn focus(&self, data: &CompanyData) -> ScoringFactor {
        let count = areas(data).len();
        ScoringFactor::new(
            "Therapeutic Focus",
            0.25,
            ceiling(count as f64, FOCUS, 2.0),
            format!("{} therapeutic area(s)", count),
        )
    }

    fn portfolio_coherence(&self, data: &CompanyData) -> ScoringFactor {
        let fraction = coherence(data);
        ScoringFactor::new(
            "Pipeline Coherence",
            0.20,
            1.5 + 3.5 * fraction,
            format!("{:.0}% of programs fall inside the stated therapeutic areas", fraction * 100.0),
        )
    }

    fn partnership_potential(&self, data: &CompanyData) -> ScoringFactor {
        let stage = data
            .pipeline
            .lead_stage()
            .unwrap_or(data.basic_info.development_stage);
        let first_in_class = data
            .pipeline
            .programs
            .iter()
            .flat_map(|p| p.differentiators.iter())
            .any(|d| d.to_lowercase().contains("first-in-class"));

        let mut score = partnership_score(stage);
        let mut rationale = format!("{} lead asset", stage.to_label());
        if first_in_class {
            score += 0.5;
            rationale.push_str(" with first-in-class positioning");
        }

        ScoringFactor::new("Partnership Appeal", 0.20, score, rationale)
    }

    fn comparables(&self, data: &CompanyData, context: &MarketContext) -> ScoringFactor {
        let areas = areas(data);
        let peers = context
            .comparable_companies
            .iter()
            .filter(|c| {
                c.therapeutic_areas
                    .iter()
                    .any(|a| areas.contains(&a.trim().to_lowercase()))
            })
            .count();

        let score = match peers {
            0 => NEUTRAL_SCORE,
            1..=3 => 3.5,
            4..=9 => 4.0,
            _ => 3.5,
        };

        ScoringFactor::new(
            "Comparable Positioning",
            0.20,
            score,
            format!("{} comparable compan(ies) in the same therapeutic areas", peers),
        )
    }

    fn sector(&self, data: &CompanyData) -> ScoringFactor {
        let sector = data.basic_info.sector.trim();
        let (score, rationale) = match keyword_match(sector, SECTOR_FIT) {
            Some((_, score)) => (score, format!("{} sector", sector)),
            None if sector.is_empty() => (NEUTRAL_SCORE, "Sector not reported".to_string()),
            None => (NEUTRAL_SCORE, format!("Unrecognised sector '{}'", sector)),
        };
        ScoringFactor::new("Sector Alignment", 0.15, score, rationale)
    }
}

impl Pillar for StrategicFitPillar {
    fn name(&self) -> PillarName {
        PillarName::StrategicFit
    }

    fn required_fields(&self) -> &'static [DataField] {
        REQUIRED
    }

    fn optional_fields(&self) -> &'static [DataField] {
        OPTIONAL
    }

    fn methodology_reliability(&self) -> f64 {
        0.78
    }

    fn methodology(&self) -> &'static str {
        "Therapeutic focus and pipeline coherence combined with stage-driven partnership \
         appeal, peer activity in the same areas and sector alignment"
    }

    fn limitations(&self) -> &'static [&'static str] {
        &[
            "Coherence relies on indication text naming the therapeutic area",
            "Acquirer appetite is approximated by comparable company counts",
        ]
    }

    fn factors(&self, data: &CompanyData, context: &MarketContext) -> Vec<ScoringFactor> {
        vec![
            self.focus(data),
            self.portfolio_coherence(data),
            self.partnership_potential(data),
            self.comparables(data, context),
            self.sector(data),
        ]
    }

    fn data_quality(&self, data: &CompanyData, context: &MarketContext) -> f64 {
        let programs = &data.pipeline.programs;
        let indications = if programs.is_empty() {
            0.0
        } else {
            programs.iter().filter(|p| !p.indication.trim().is_empty()).count() as f64 / programs.len() as f64
        };
        let sector = if data.basic_info.sector.trim().is_empty() { 0.0 } else { 1.0 };
        let peers = if context.comparable_companies.is_empty() { 0.0 } else { 1.0 };
        0.5 * indications + 0.25 * sector + 0.25 * peers
    }

    fn pillar_warnings(&self, data: &CompanyData, _context: &MarketContext) -> Vec<String> {
        let mut warnings = Vec::new();
        let count = areas(data).len();
        if count >= BROAD_FOCUS {
            warnings.push(format!("Diffuse strategy across {} therapeutic areas", count));
        }
        let fraction = coherence(data);
        if !data.pipeline.programs.is_empty() && fraction < LOW_COHERENCE {
            warnings.push(format!(
                "Only {:.0}% of programs align with the stated therapeutic areas",
                fraction * 100.0
            ));
        }
        warnings
    }
}

impl Default for StrategicFitPillar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring_core::fixtures;

    #[test]
    fn test_focused_coherent_company() {
        let company = fixtures::sample_company();
        let context = fixtures::sample_context(5);
        let pillar = StrategicFitPillar::new();

        assert_eq!(pillar.focus(&company).score, 4.5);
        assert_eq!(pillar.portfolio_coherence(&company).score, 5.0);
        // phase2 lead with a first-in-class program
        assert_eq!(pillar.partnership_potential(&company).score, 4.5);
        assert_eq!(pillar.comparables(&company, &context).score, 4.0);
        assert_eq!(pillar.sector(&company).score, 4.0);

        let score = pillar.score(&company, &context).unwrap();
        assert!(score.warnings.is_empty());
    }

    #[test]
    fn test_comparable_buckets() {
        let company = fixtures::sample_company();
        let pillar = StrategicFitPillar::new();
        assert_eq!(pillar.comparables(&company, &fixtures::sample_context(0)).score, NEUTRAL_SCORE);
        assert_eq!(pillar.comparables(&company, &fixtures::sample_context(2)).score, 3.5);
        assert_eq!(pillar.comparables(&company, &fixtures::sample_context(12)).score, 3.5);
    }

    #[test]
    fn test_diffuse_incoherent_company_warns() {
        let mut company = fixtures::sample_company();
        company.basic_info.therapeutic_areas = vec![
            "Neurology".to_string(),
            "Cardiology".to_string(),
            "Dermatology".to_string(),
            "Ophthalmology".to_string(),
        ];
        let score = StrategicFitPillar::new()
            .score(&company, &MarketContext::default())
            .unwrap();

        assert_eq!(score.factors[0].score, 2.0);
        assert_eq!(score.factors[1].score, 1.5);
        assert!(score.warnings.iter().any(|w| w.starts_with("Diffuse strategy")));
        assert!(score.warnings.iter().any(|w| w.contains("align")));
    }

    #[test]
    fn test_missing_sector_is_neutral() {
        let company = fixtures::minimal_company();
        let factor = StrategicFitPillar::new().sector(&company);
        assert_eq!(factor.score, NEUTRAL_SCORE);
        assert_eq!(factor.rationale, "Sector not reported");
    }
}
