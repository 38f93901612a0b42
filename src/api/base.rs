use crate::errors::Result;
use crate::models::stock::EodResponse;
use async_trait::async_trait;

/// Base trait for end-of-day market data sources
#[async_trait]
pub trait StockApi {
    /// Name of the provider, used in logs
    fn provider_name(&self) -> &'static str;

    /// Fetch recent daily records for one symbol, newest first
    async fn fetch_eod(&self, symbol: &str) -> Result<EodResponse>;
}
