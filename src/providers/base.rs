use crate::models::quote::ProviderQuote;
use crate::errors::Result;
use async_trait::async_trait;

/// Base trait for market data providers
#[async_trait]
pub trait QuoteProvider {
    /// Get the code identifying this provider in logs
    fn provider_code(&self) -> &'static str;

    /// Fetch last price and previous close for one provider symbol
    async fn fetch_quote(&self, symbol: &str) -> Result<ProviderQuote>;
}
