//! The six investability pillars and the registry that holds them.

mod asset_quality;
mod capital_intensity;
mod financial_readiness;
mod market_outlook;
mod registry;
mod regulatory_risk;
mod strategic_fit;

pub use asset_quality::AssetQualityPillar;
pub use capital_intensity::CapitalIntensityPillar;
pub use financial_readiness::FinancialReadinessPillar;
pub use market_outlook::MarketOutlookPillar;
pub use registry::PillarRegistry;
pub use regulatory_risk::RegulatoryRiskPillar;
pub use strategic_fit::StrategicFitPillar;
