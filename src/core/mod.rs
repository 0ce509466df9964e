//! Core domain types and abstractions

pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod provider;

// Re-export main types for cleaner imports
pub use currency::{
    ConversionRequest, ConversionResult, CurrencyCatalog, CurrencyCode, CurrencyInfo, RateTable,
};
pub use error::ServiceError;
pub use provider::ExchangeRateProvider;
