//! Deterministic company snapshots and market contexts for tests.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;

use crate::types::*;
use crate::{PillarScore, PillarScores};

pub fn reference_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn months_before_reference(months: i64) -> DateTime<Utc> {
    reference_date() - chrono::Duration::days(months * 30)
}

pub fn program(name: &str, indication: &str, mechanism: &str, stage: DevelopmentStage, differentiators: &[&str]) -> Program {
    Program {
        name: name.to_string(),
        indication: indication.to_string(),
        mechanism: mechanism.to_string(),
        stage,
        differentiators: differentiators.iter().map(|d| d.to_string()).collect(),
    }
}

pub fn trial(id: &str, phase: DevelopmentStage, status: TrialStatus) -> ClinicalTrial {
    ClinicalTrial {
        id: id.to_string(),
        phase,
        indication: "solid tumors".to_string(),
        status,
        enrollment: Some(120),
    }
}

/// A well-documented mid-stage oncology company
pub fn sample_company() -> CompanyData {
    CompanyData {
        id: "helix-therapeutics".to_string(),
        basic_info: BasicInfo {
            name: "Helix Therapeutics".to_string(),
            sector: "Biotechnology".to_string(),
            therapeutic_areas: vec!["Oncology".to_string()],
            development_stage: DevelopmentStage::Phase2,
        },
        pipeline: Pipeline {
            programs: vec![
                program(
                    "HX-101",
                    "Oncology: non-small cell lung cancer",
                    "Bispecific antibody",
                    DevelopmentStage::Phase2,
                    &["First-in-class target", "Oral dosing"],
                ),
                program(
                    "HX-202",
                    "Oncology: colorectal cancer",
                    "Antibody-drug conjugate",
                    DevelopmentStage::Phase1,
                    &["Improved safety profile"],
                ),
                program("HX-303", "Oncology: pancreatic cancer", "Small molecule", DevelopmentStage::Preclinical, &[]),
            ],
        },
        financials: Financials {
            cash_position: Some(120.0),
            burn_rate: Some(6.0),
            runway: None,
            last_funding: Some(FundingEvent {
                round_type: "Series C".to_string(),
                amount: 80.0,
                date: months_before_reference(10),
            }),
        },
        market: Market {
            addressable_market: Some(4.5),
            competitors: vec![
                Competitor { name: "Apex Bio".to_string(), stage: Some(DevelopmentStage::Phase3), market_share: None },
                Competitor { name: "Norda Pharma".to_string(), stage: Some(DevelopmentStage::Phase2), market_share: None },
                Competitor { name: "Kestrel Oncology".to_string(), stage: Some(DevelopmentStage::Phase1), market_share: None },
                Competitor { name: "Vireo".to_string(), stage: None, market_share: None },
            ],
            market_dynamics: MarketDynamics {
                growth_rate: Some(0.08),
                drivers: vec!["Aging population".to_string(), "Biomarker-driven therapy adoption".to_string()],
                barriers: vec!["Pricing pressure".to_string()],
                reimbursement: ReimbursementCategory::Moderate,
            },
        },
        regulatory: Regulatory {
            approvals: vec![],
            clinical_trials: vec![
                trial("NCT0001", DevelopmentStage::Phase2, TrialStatus::Active),
                trial("NCT0002", DevelopmentStage::Phase1, TrialStatus::Recruiting),
                trial("NCT0003", DevelopmentStage::Phase1, TrialStatus::Completed),
            ],
            regulatory_strategy: Some(RegulatoryStrategy {
                pathway: RegulatoryPathway::FastTrack,
                timeline: Some(30.0),
                risks: vec!["Competitive enrollment".to_string()],
            }),
        },
        last_updated: Some(reference_date()),
    }
}

/// Late-stage company with a large uncontested market and a 24-month runway
pub fn phase3_company() -> CompanyData {
    let mut company = sample_company();
    company.id = "orion-bio".to_string();
    company.basic_info.name = "Orion Bio".to_string();
    company.basic_info.development_stage = DevelopmentStage::Phase3;
    company.pipeline.programs[0].stage = DevelopmentStage::Phase3;
    company.market.addressable_market = Some(12.0);
    company.market.competitors.clear();
    company.financials = Financials {
        cash_position: Some(240.0),
        burn_rate: Some(10.0),
        runway: Some(24.0),
        last_funding: Some(FundingEvent {
            round_type: "Series D".to_string(),
            amount: 150.0,
            date: months_before_reference(6),
        }),
    };
    company
}

/// Company with only the fields every pillar strictly requires
pub fn minimal_company() -> CompanyData {
    CompanyData {
        id: "minimal".to_string(),
        basic_info: BasicInfo {
            name: "Minimal Co".to_string(),
            sector: String::new(),
            therapeutic_areas: vec!["Neurology".to_string()],
            development_stage: DevelopmentStage::Preclinical,
        },
        pipeline: Pipeline {
            programs: vec![program("MC-1", "Neurology: ALS", "", DevelopmentStage::Preclinical, &[])],
        },
        financials: Financials {
            cash_position: Some(8.0),
            burn_rate: Some(2.0),
            runway: None,
            last_funding: None,
        },
        market: Market {
            addressable_market: Some(0.3),
            ..Market::default()
        },
        regulatory: Regulatory::default(),
        last_updated: Some(reference_date()),
    }
}

pub fn comparable(name: &str, area: &str) -> ComparableCompany {
    ComparableCompany {
        name: name.to_string(),
        therapeutic_areas: vec![area.to_string()],
        stage: Some(DevelopmentStage::Phase2),
        valuation: Some(450.0),
    }
}

/// Neutral context with `comparables` oncology peers
pub fn sample_context(comparables: usize) -> MarketContext {
    let mut phase_success_rates = BTreeMap::new();
    phase_success_rates.insert(DevelopmentStage::Phase1, 0.52);
    phase_success_rates.insert(DevelopmentStage::Phase2, 0.29);
    phase_success_rates.insert(DevelopmentStage::Phase3, 0.58);

    MarketContext {
        comparable_companies: (0..comparables)
            .map(|i| comparable(&format!("Peer {}", i + 1), "Oncology"))
            .collect(),
        benchmark_data: BenchmarkData {
            average_runway_months: Some(18.0),
            median_valuation: Some(400.0),
            sector_growth_rate: Some(0.07),
        },
        market_conditions: MarketConditions::default(),
        industry_metrics: IndustryMetrics {
            average_time_to_approval_months: Some(36.0),
            phase_success_rates,
        },
    }
}

pub fn pillar_score(raw_score: f64, confidence: f64) -> PillarScore {
    PillarScore {
        raw_score,
        confidence,
        factors: vec![],
        warnings: vec![],
        explanation: None,
    }
}

/// PillarScores from raw scores in canonical order, all at `confidence`
pub fn pillar_scores(raw: [f64; 6], confidence: f64) -> PillarScores {
    PillarScores::from_ordered(raw.iter().map(|r| pillar_score(*r, confidence)).collect()).unwrap()
}
