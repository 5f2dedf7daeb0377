use scoring_core::stats::{bracket, ceiling, mean, NEUTRAL_SCORE};
use scoring_core::{
    CompanyData, DataField, MarketContext, MarketSentiment, Pillar, PillarName,
    ReimbursementCategory, ScoringFactor, ValidationResult,
};

const REQUIRED: &[DataField] = &[DataField::AddressableMarket, DataField::TherapeuticAreas];
const OPTIONAL: &[DataField] = &[
    DataField::Competitors,
    DataField::GrowthRate,
    DataField::MarketDrivers,
    DataField::MarketBarriers,
    DataField::Reimbursement,
];

/// Addressable market in $B
const MARKET_SIZE: &[(f64, f64)] = &[
    (10.0, 5.0),
    (5.0, 4.5),
    (2.0, 4.0),
    (1.0, 3.5),
    (0.5, 3.0),
    (0.1, 2.0),
];

/// Competitor count ceilings
const COMPETITOR_COUNT: &[(f64, f64)] = &[(2.0, 4.0), (5.0, 3.0), (10.0, 2.0)];

const GROWTH_RATE: &[(f64, f64)] = &[(0.20, 5.0), (0.10, 4.0), (0.05, 3.0), (0.0, 2.5)];

const CROWDED_MARKET: usize = 10;
const SMALL_MARKET_B: f64 = 0.5;

fn reimbursement_score(category: ReimbursementCategory) -> f64 {
    match category {
        ReimbursementCategory::Favorable => 4.5,
        ReimbursementCategory::Moderate => 3.5,
        ReimbursementCategory::Challenging => 2.0,
        ReimbursementCategory::Unknown => NEUTRAL_SCORE,
    }
}

/// Size, growth and competitive structure of the target market
pub struct MarketOutlookPillar;

impl MarketOutlookPillar {
    pub fn new() -> Self {
        Self
    }

    fn market_size(&self, data: &CompanyData) -> ScoringFactor {
        match data.market.addressable_market {
            Some(size) if size.is_finite() => ScoringFactor::new(
                "Market Size",
                0.30,
                bracket(size, MARKET_SIZE, 1.5),
                format!("Addressable market of ${:.1}B", size),
            ),
            _ => ScoringFactor::new("Market Size", 0.30, NEUTRAL_SCORE, "Market size unavailable"),
        }
    }

    fn competitive_landscape(&self, data: &CompanyData) -> ScoringFactor {
        let competitors = &data.market.competitors;
        if competitors.is_empty() {
            return ScoringFactor::new(
                "Competitive Landscape",
                0.25,
                5.0,
                "No direct competitors identified",
            );
        }

        let mut score = ceiling(competitors.len() as f64, COMPETITOR_COUNT, 1.5);
        let commercial = competitors
            .iter()
            .filter(|c| c.stage.map_or(false, |s| s.is_commercial()))
            .count();
        if commercial > 0 {
            score -= 0.5;
        }

        ScoringFactor::new(
            "Competitive Landscape",
            0.25,
            score,
            format!(
                "{} competitor(s), {} with approved or marketed products",
                competitors.len(),
                commercial
            ),
        )
    }

    fn market_growth(&self, data: &CompanyData, context: &MarketContext) -> ScoringFactor {
        let supplied = data.market.market_dynamics.growth_rate.filter(|g| g.is_finite());
        let benchmark = context.benchmark_data.sector_growth_rate.filter(|g| g.is_finite());

        let (mut score, mut rationale) = match (supplied, benchmark) {
            (Some(g), _) => (
                bracket(g, GROWTH_RATE, 1.5),
                format!("Market growing {:.1}% per year", g * 100.0),
            ),
            (None, Some(g)) => (
                bracket(g, GROWTH_RATE, 1.5),
                format!("Sector benchmark growth of {:.1}% per year", g * 100.0),
            ),
            (None, None) => (NEUTRAL_SCORE, "Growth rate unavailable; neutral assumption".to_string()),
        };

        match context.market_conditions.sentiment {
            MarketSentiment::Bullish => {
                score += 0.25;
                rationale.push_str(", bullish market conditions");
            }
            MarketSentiment::Bearish => {
                score -= 0.25;
                rationale.push_str(", bearish market conditions");
            }
            MarketSentiment::Neutral => {}
        }

        ScoringFactor::new("Market Growth", 0.20, score, rationale)
    }

    fn reimbursement(&self, data: &CompanyData) -> ScoringFactor {
        let category = data.market.market_dynamics.reimbursement;
        ScoringFactor::new(
            "Reimbursement",
            0.15,
            reimbursement_score(category),
            format!("Reimbursement outlook: {:?}", category).to_lowercase(),
        )
    }

    fn market_dynamics(&self, data: &CompanyData) -> ScoringFactor {
        let dynamics = &data.market.market_dynamics;
        let drivers = dynamics.drivers.len().min(4) as f64;
        let barriers = dynamics.barriers.len().min(4) as f64;
        ScoringFactor::new(
            "Market Dynamics",
            0.10,
            NEUTRAL_SCORE + 0.25 * drivers - 0.25 * barriers,
            format!(
                "{} growth driver(s) against {} barrier(s)",
                dynamics.drivers.len(),
                dynamics.barriers.len()
            ),
        )
    }
}

impl Pillar for MarketOutlookPillar {
    fn name(&self) -> PillarName {
        PillarName::MarketOutlook
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
        "Bracketed market sizing and competitor counts combined with growth, reimbursement \
         and driver/barrier balance, adjusted for prevailing market sentiment"
    }

    fn limitations(&self) -> &'static [&'static str] {
        &[
            "Market size is taken as supplied; no bottom-up validation",
            "Competitor relevance is not weighted by indication overlap",
        ]
    }

    fn check(&self, data: &CompanyData, result: &mut ValidationResult) {
        if let Some(size) = data.market.addressable_market {
            if size < 0.0 {
                result.error("market.addressableMarket", "Addressable market cannot be negative");
            } else if size > 1000.0 {
                result.warn(
                    "market.addressableMarket",
                    format!("Addressable market of ${:.0}B is implausibly large", size),
                    Some("Express the addressable market in billions of dollars"),
                );
            }
        }
        if let Some(growth) = data.market.market_dynamics.growth_rate {
            if growth.abs() > 1.0 {
                result.warn(
                    "market.marketDynamics.growthRate",
                    format!("Growth rate {} looks like a percentage", growth),
                    Some("Express growth as a fraction, e.g. 0.12 for 12%"),
                );
            }
        }
        for (i, competitor) in data.market.competitors.iter().enumerate() {
            if let Some(share) = competitor.market_share {
                if !(0.0..=1.0).contains(&share) {
                    result.error(
                        &format!("market.competitors[{}].marketShare", i),
                        "Market share must be between 0 and 1",
                    );
                }
            }
        }
    }

    fn factors(&self, data: &CompanyData, context: &MarketContext) -> Vec<ScoringFactor> {
        vec![
            self.market_size(data),
            self.competitive_landscape(data),
            self.market_growth(data, context),
            self.reimbursement(data),
            self.market_dynamics(data),
        ]
    }

    fn data_quality(&self, data: &CompanyData, _context: &MarketContext) -> f64 {
        let dynamics = &data.market.market_dynamics;
        let competitors = &data.market.competitors;
        let competitor_detail = if competitors.is_empty() {
            1.0
        } else {
            competitors.iter().filter(|c| c.stage.is_some()).count() as f64 / competitors.len() as f64
        };
        let signals = [
            if dynamics.growth_rate.is_some() { 1.0 } else { 0.0 },
            if dynamics.drivers.is_empty() { 0.0 } else { 1.0 },
            if dynamics.barriers.is_empty() { 0.0 } else { 1.0 },
            if dynamics.reimbursement == ReimbursementCategory::Unknown { 0.0 } else { 1.0 },
            competitor_detail,
        ];
        mean(&signals)
    }

    fn pillar_warnings(&self, data: &CompanyData, _context: &MarketContext) -> Vec<String> {
        let mut warnings = Vec::new();
        let competitors = data.market.competitors.len();
        if competitors > CROWDED_MARKET {
            warnings.push(format!("Crowded market: {} competitors identified", competitors));
        }
        if let Some(size) = data.market.addressable_market {
            if size < SMALL_MARKET_B {
                warnings.push(format!("Small addressable market (${:.2}B)", size));
            }
        }
        if data.market.market_dynamics.growth_rate.map_or(false, |g| g < 0.0) {
            warnings.push("Addressable market is contracting".to_string());
        }
        warnings
    }
}

impl Default for MarketOutlookPillar {
    fn default() -> Self {
        Self::new()
    }
}
