//! Exchange rate provider abstraction

use super::currency::{CurrencyCode, CurrencyInfo, RateTable};
use super::error::ServiceError;
use async_trait::async_trait;

/// One outbound request per call; implementations must not cache or retry.
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// All rates quoted against `base`.
    async fn latest_rates(&self, base: &CurrencyCode) -> Result<RateTable, ServiceError>;

    /// Units of `target` for one unit of `base`.
    async fn pair_rate(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<f64, ServiceError>;

    /// `amount` of `base` converted into `target` by the provider.
    async fn pair_conversion(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
        amount: f64,
    ) -> Result<f64, ServiceError>;

    async fn supported_codes(&self) -> Result<Vec<CurrencyInfo>, ServiceError>;
}
