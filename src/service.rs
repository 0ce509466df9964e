//! Conversion service: the single entry point the CLI talks to.
//!
//! Every operation is one provider round trip. Nothing is cached between
//! calls and failures are returned to the caller as [`ServiceError`] without
//! retrying.

use tracing::{debug, info, warn};

use crate::core::config::RateSource;
use crate::core::currency::validate_amount;
use crate::core::{
    ConversionRequest, ConversionResult, CurrencyCatalog, CurrencyCode, ExchangeRateProvider,
    RateTable, ServiceError,
};

pub struct ConversionService<P> {
    provider: P,
    rate_source: RateSource,
}

impl<P: ExchangeRateProvider> ConversionService<P> {
    pub fn new(provider: P, rate_source: RateSource) -> Self {
        Self {
            provider,
            rate_source,
        }
    }

    /// Units of `target` for one unit of `base`.
    pub async fn fetch_rate(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<f64, ServiceError> {
        self.provider.pair_rate(base, target).await
    }

    pub async fn fetch_rate_table(&self, base: &CurrencyCode) -> Result<RateTable, ServiceError> {
        self.provider.latest_rates(base).await
    }

    /// Supported currencies, or an empty catalog when they cannot be fetched.
    pub async fn fetch_catalog(&self) -> CurrencyCatalog {
        match self.try_fetch_catalog().await {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, "Currency catalog unavailable");
                CurrencyCatalog::default()
            }
        }
    }

    /// Like [`fetch_catalog`](Self::fetch_catalog) but keeps the failure.
    pub async fn try_fetch_catalog(&self) -> Result<CurrencyCatalog, ServiceError> {
        let entries = self.provider.supported_codes().await?;
        debug!(count = entries.len(), "Fetched currency catalog");
        Ok(CurrencyCatalog::new(entries))
    }

    pub async fn convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResult, ServiceError> {
        validate_amount(request.amount)?;

        let converted_amount = match self.rate_source {
            RateSource::Latest => {
                let table = self.fetch_rate_table(&request.base).await?;
                let rate = table
                    .rate_for(&request.target)
                    .ok_or_else(|| ServiceError::UnknownCurrency(request.target.clone()))?;
                debug!(rate, "Resolved rate from table");
                request.amount * rate
            }
            RateSource::Pair => {
                self.provider
                    .pair_conversion(&request.base, &request.target, request.amount)
                    .await?
            }
        };

        info!(
            base = %request.base,
            target = %request.target,
            amount = request.amount,
            converted_amount,
            "Converted amount"
        );

        Ok(ConversionResult {
            amount: request.amount,
            base: request.base.clone(),
            target: request.target.clone(),
            converted_amount,
        })
    }

    /// Parses raw user input and converts it. Invalid input fails before any
    /// request is made.
    pub async fn convert_input(
        &self,
        base: &str,
        target: &str,
        amount: &str,
    ) -> Result<ConversionResult, ServiceError> {
        let request = ConversionRequest::parse(base, target, amount)?;
        self.convert(&request).await
    }
}
