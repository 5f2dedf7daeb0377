use chrono::{DateTime, Utc};
use scoring_core::stats::{bracket, ceiling, mean};
use scoring_core::{
    CompanyData, DataField, FundingEnvironment, MarketContext, Pillar, PillarName, ScoringFactor,
    ValidationResult,
};

const REQUIRED: &[DataField] = &[DataField::CashPosition, DataField::BurnRate];
const OPTIONAL: &[DataField] = &[DataField::Runway, DataField::LastFunding];

/// Runway in months
const RUNWAY: &[(f64, f64)] = &[(24.0, 5.0), (18.0, 4.0), (12.0, 3.0), (6.0, 2.0)];

/// Cash position in $M
const CASH: &[(f64, f64)] = &[
    (500.0, 5.0),
    (200.0, 4.5),
    (100.0, 4.0),
    (50.0, 3.0),
    (20.0, 2.0),
];

/// Months since the last round
const FUNDING_AGE: &[(f64, f64)] = &[(6.0, 4.5), (12.0, 4.0), (24.0, 3.0)];

/// Monthly burn as a fraction of cash
const BURN_SHARE: &[(f64, f64)] = &[(0.02, 5.0), (0.04, 4.0), (0.06, 3.0), (0.10, 2.0)];

const LARGE_ROUND_M: f64 = 100.0;
const SHORT_RUNWAY_MONTHS: f64 = 12.0;
const DAYS_PER_MONTH: f64 = 30.44;

fn months_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    ((later - earlier).num_days() as f64 / DAYS_PER_MONTH).max(0.0)
}

fn environment_score(environment: FundingEnvironment) -> f64 {
    match environment {
        FundingEnvironment::Favorable => 4.5,
        FundingEnvironment::Challenging => 2.0,
        FundingEnvironment::Neutral => 3.0,
    }
}

/// Balance-sheet strength and access to capital
pub struct FinancialReadinessPillar;

impl FinancialReadinessPillar {
    pub fn new() -> Self {
        Self
    }

    fn runway_months(data: &CompanyData) -> f64 {
        data.financials.runway_months().unwrap_or(0.0)
    }

    fn runway(&self, data: &CompanyData) -> ScoringFactor {
        let months = Self::runway_months(data);
        let rationale = if months.is_infinite() {
            "No cash burn; runway is unbounded".to_string()
        } else {
            format!("{:.1} months of runway", months)
        };
        ScoringFactor::new("Cash Runway", 0.35, bracket(months, RUNWAY, 1.0), rationale)
    }

    fn cash_position(&self, data: &CompanyData) -> ScoringFactor {
        let cash = data.financials.cash_position.unwrap_or(0.0);
        ScoringFactor::new(
            "Cash Position",
            0.20,
            bracket(cash, CASH, 1.5),
            format!("${:.0}M in cash", cash),
        )
    }

    fn funding_recency(&self, data: &CompanyData) -> ScoringFactor {
        let Some(funding) = &data.financials.last_funding else {
            return ScoringFactor::new("Funding Recency", 0.20, 2.5, "No financing history reported");
        };

        let age = months_between(funding.date, data.as_of());
        let mut score = ceiling(age, FUNDING_AGE, 2.0);
        let mut rationale = format!(
            "{} of ${:.0}M closed {:.0} months ago",
            funding.round_type, funding.amount, age
        );
        if funding.amount >= LARGE_ROUND_M {
            score += 0.5;
            rationale.push_str(", a large round");
        }

        ScoringFactor::new("Funding Recency", 0.20, score, rationale)
    }

    fn burn_discipline(&self, data: &CompanyData) -> ScoringFactor {
        let burn = data.financials.burn_rate.unwrap_or(0.0);
        let cash = data.financials.cash_position.unwrap_or(0.0);

        let (score, rationale) = if burn <= 0.0 {
            (5.0, "No net cash burn".to_string())
        } else if cash <= 0.0 {
            (1.0, "Burning cash with no reserves".to_string())
        } else {
            let share = burn / cash;
            (
                ceiling(share, BURN_SHARE, 1.0),
                format!("Monthly burn is {:.1}% of cash", share * 100.0),
            )
        };

        ScoringFactor::new("Burn Discipline", 0.15, score, rationale)
    }

    fn funding_environment(&self, context: &MarketContext) -> ScoringFactor {
        let environment = context.market_conditions.funding_environment;
        ScoringFactor::new(
            "Funding Environment",
            0.10,
            environment_score(environment),
            format!("{:?} funding environment", environment),
        )
    }
}

impl Pillar for FinancialReadinessPillar {
    fn name(&self) -> PillarName {
        PillarName::FinancialReadiness
    }

    fn required_fields(&self) -> &'static [DataField] {
        REQUIRED
    }

    fn optional_fields(&self) -> &'static [DataField] {
        OPTIONAL
    }

    fn methodology_reliability(&self) -> f64 {
        0.88
    }

    fn methodology(&self) -> &'static str {
        "Runway and cash brackets combined with financing recency, burn relative to cash \
         and the prevailing funding environment"
    }

    fn limitations(&self) -> &'static [&'static str] {
        &[
            "Burn is assumed constant over the runway",
            "Debt, royalties and milestone income are not modelled",
        ]
    }

    fn check(&self, data: &CompanyData, result: &mut ValidationResult) {
        let financials = &data.financials;
        if financials.cash_position.map_or(false, |c| c < 0.0) {
            result.error("financials.cashPosition", "Cash position cannot be negative");
        }
        if let Some(funding) = &financials.last_funding {
            if funding.amount < 0.0 {
                result.error("financials.lastFunding.amount", "Funding amount cannot be negative");
            }
            if funding.date > data.as_of() {
                result.warn(
                    "financials.lastFunding.date",
                    "Last funding is dated after the snapshot",
                    Some("Check the funding date or lastUpdated"),
                );
            }
        }
        if let (Some(supplied), Some(cash), Some(burn)) =
            (financials.runway, financials.cash_position, financials.burn_rate)
        {
            if burn > 0.0 && supplied > 0.0 {
                let derived = cash / burn;
                if (supplied - derived).abs() / supplied > 0.5 {
                    result.warn(
                        "financials.runway",
                        format!(
                            "Reported runway of {:.0} months disagrees with cash/burn ({:.0} months)",
                            supplied, derived
                        ),
                        None,
                    );
                }
            }
        }
    }

    fn factors(&self, data: &CompanyData, context: &MarketContext) -> Vec<ScoringFactor> {
        vec![
            self.runway(data),
            self.cash_position(data),
            self.funding_recency(data),
            self.burn_discipline(data),
            self.funding_environment(context),
        ]
    }

    fn data_quality(&self, data: &CompanyData, context: &MarketContext) -> f64 {
        let runway = if data.financials.runway.is_some() { 1.0 } else { 0.7 };
        let funding = if data.financials.last_funding.is_some() { 1.0 } else { 0.0 };
        let benchmark = if context.benchmark_data.average_runway_months.is_some() { 1.0 } else { 0.5 };
        mean(&[runway, funding, benchmark])
    }

    fn pillar_warnings(&self, data: &CompanyData, context: &MarketContext) -> Vec<String> {
        let mut warnings = Vec::new();
        let months = Self::runway_months(data);
        if months < SHORT_RUNWAY_MONTHS {
            warnings.push(format!("Short runway: {:.1} months of cash remaining", months));
        } else if let Some(average) = context.benchmark_data.average_runway_months {
            if months < average {
                warnings.push(format!(
                    "Runway of {:.1} months is below the sector average of {:.0}",
                    months, average
                ));
            }
        }
        warnings
    }
}

impl Default for FinancialReadinessPillar {
    fn default() -> Self {
        Self::new()
    }
}
