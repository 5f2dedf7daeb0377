use async_trait::async_trait;

use scoring_core::{CompanyData, MarketContext, MarketContextProvider};

/// Serves the same market snapshot for every company
#[derive(Debug, Clone, Default)]
pub struct StaticMarketContext {
    context: MarketContext,
}

impl StaticMarketContext {
    pub fn new(context: MarketContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl MarketContextProvider for StaticMarketContext {
    async fn market_context(&self, _data: &CompanyData) -> MarketContext {
        self.context.clone()
    }
}
