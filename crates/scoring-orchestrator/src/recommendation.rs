//! Rule-based recommendation text, investment call and risk level.

use scoring_core::{ConfidenceMetrics, InvestmentRecommendation, PillarScores, RiskLevel};

const STRONG_PILLAR: f64 = 4.0;
const WEAK_PILLAR: f64 = 2.5;
const LOW_CONFIDENCE: f64 = 0.6;
const LOW_COMPLETENESS: f64 = 0.7;

/// Ordered advisory strings. Overall score first, then pillars in canonical order,
/// then confidence caveats.
pub fn recommendations(
    overall_score: f64,
    scores: &PillarScores,
    confidence: &ConfidenceMetrics,
) -> Vec<String> {
    let mut out = Vec::new();

    if overall_score >= 4.0 {
        out.push(format!(
            "Strong investment candidate with an overall score of {:.2}",
            overall_score
        ));
    } else if overall_score >= 3.0 {
        out.push(format!(
            "Solid profile ({:.2}); monitor upcoming milestones before committing",
            overall_score
        ));
    } else if overall_score < 2.5 {
        out.push(format!(
            "Significant weaknesses across pillars ({:.2}); investment not advised without major changes",
            overall_score
        ));
    }

    let asset = scores.asset_quality.raw_score;
    if asset >= STRONG_PILLAR {
        out.push("High-quality pipeline assets support the investment case".to_string());
    } else if asset < WEAK_PILLAR {
        out.push("Pipeline quality is a concern; look for differentiated or later-stage assets".to_string());
    }

    let market = scores.market_outlook.raw_score;
    if market >= STRONG_PILLAR {
        out.push("Attractive market opportunity with room for commercial upside".to_string());
    } else if market < WEAK_PILLAR {
        out.push("Limited market opportunity; validate addressable market and competition".to_string());
    }

    if scores.capital_intensity.raw_score < WEAK_PILLAR {
        out.push("Capital-intensive development path; expect dilution or partnering needs".to_string());
    }

    if scores.strategic_fit.raw_score >= STRONG_PILLAR {
        out.push("Strong strategic fit makes partnership or acquisition plausible".to_string());
    }

    let financial = scores.financial_readiness.raw_score;
    if financial >= STRONG_PILLAR {
        out.push("Well funded through the next value inflection point".to_string());
    } else if financial < WEAK_PILLAR {
        out.push("Financing risk: secure additional capital before the next milestone".to_string());
    }

    if scores.regulatory_risk.raw_score < WEAK_PILLAR {
        out.push("Elevated regulatory risk; review trial history and approval pathway".to_string());
    }

    if confidence.overall < LOW_CONFIDENCE {
        out.push(format!(
            "Low scoring confidence ({:.0}%); gather more data before deciding",
            confidence.overall * 100.0
        ));
    }
    if confidence.data_completeness < LOW_COMPLETENESS {
        out.push(format!(
            "Company data is only {:.0}% complete; fill the missing fields to firm up the score",
            confidence.data_completeness * 100.0
        ));
    }

    out
}

/// overall score × overall confidence
pub fn confidence_adjusted_score(overall_score: f64, confidence: &ConfidenceMetrics) -> f64 {
    overall_score * confidence.overall
}

pub fn investment_recommendation(
    overall_score: f64,
    confidence: &ConfidenceMetrics,
) -> InvestmentRecommendation {
    InvestmentRecommendation::from_adjusted_score(confidence_adjusted_score(overall_score, confidence))
}

/// Mean of the inverted regulatory, financial and market scores plus a
/// confidence penalty, on the 0-5 scale
pub fn average_risk(scores: &PillarScores, confidence: &ConfidenceMetrics) -> f64 {
    ((5.0 - scores.regulatory_risk.raw_score)
        + (5.0 - scores.financial_readiness.raw_score)
        + (5.0 - scores.market_outlook.raw_score)
        + 4.0 * (1.0 - confidence.overall))
        / 4.0
}

pub fn risk_level(scores: &PillarScores, confidence: &ConfidenceMetrics) -> RiskLevel {
    RiskLevel::from_average_risk(average_risk(scores, confidence))
}
