//! Currency domain types shared by the service, providers and CLI.

use super::error::ServiceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A three-letter uppercase currency code such as `USD`.
///
/// Only the shape is checked here; whether the code is actually supported
/// is decided by the rate provider.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn parse(input: &str) -> Result<Self, ServiceError> {
        let code = input.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ServiceError::InvalidInput(format!(
                "'{code}' is not a three-letter currency code"
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// For compile-time known codes only; skips validation.
    pub(crate) fn from_static(code: &'static str) -> Self {
        debug_assert!(code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()));
        Self(code.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ServiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// Parses a user supplied amount. Zero is allowed, negative and non-finite
/// values are not.
pub fn parse_amount(input: &str) -> Result<f64, ServiceError> {
    let amount: f64 = input
        .trim()
        .parse()
        .map_err(|_| ServiceError::InvalidInput("The amount must be a valid number".to_string()))?;
    validate_amount(amount)?;
    Ok(amount)
}

pub(crate) fn validate_amount(amount: f64) -> Result<(), ServiceError> {
    if !amount.is_finite() {
        return Err(ServiceError::InvalidInput(
            "The amount must be a finite number".to_string(),
        ));
    }
    if amount < 0.0 {
        return Err(ServiceError::InvalidInput(
            "The amount must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    pub amount: f64,
}

impl ConversionRequest {
    pub fn new(base: CurrencyCode, target: CurrencyCode, amount: f64) -> Self {
        Self {
            base,
            target,
            amount,
        }
    }

    /// Builds a request from raw text input. Nothing here touches the network.
    pub fn parse(base: &str, target: &str, amount: &str) -> Result<Self, ServiceError> {
        Ok(Self::new(
            CurrencyCode::parse(base)?,
            CurrencyCode::parse(target)?,
            parse_amount(amount)?,
        ))
    }
}

/// Outcome of a successful conversion. `converted_amount` is kept unrounded;
/// the `Display` impl rounds to two decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub amount: f64,
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    pub converted_amount: f64,
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} = {:.2} {}",
            self.amount, self.base, self.converted_amount, self.target
        )
    }
}

/// Rates for one base currency, keyed by target code.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub base: CurrencyCode,
    pub rates: BTreeMap<CurrencyCode, f64>,
}

impl RateTable {
    pub fn rate_for(&self, target: &CurrencyCode) -> Option<f64> {
        self.rates.get(target).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub code: CurrencyCode,
    pub name: String,
}

/// Currencies supported by the provider, sorted by code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyCatalog {
    entries: Vec<CurrencyInfo>,
}

impl CurrencyCatalog {
    pub fn new(mut entries: Vec<CurrencyInfo>) -> Self {
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        entries.dedup_by(|a, b| a.code == b.code);
        Self { entries }
    }

    pub fn entries(&self) -> &[CurrencyInfo] {
        &self.entries
    }

    pub fn codes(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.entries.iter().map(|e| &e.code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
