use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::core::{CurrencyCode, CurrencyInfo, ExchangeRateProvider, RateTable, ServiceError};

const SUCCESS: &str = "success";
const UNKNOWN_ERROR: &str = "unknown-error";

/// Client for the ExchangeRate-API v6 endpoints. The API key is sent as a
/// path segment, so it is redacted from everything this type logs.
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("xconv/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    fn redacted_url(&self, endpoint: &str) -> String {
        format!("{}/***/{}", self.base_url, endpoint)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ServiceError> {
        let url = format!("{}/{}/{}", self.base_url, self.api_key, endpoint);
        debug!("Requesting exchange rate data from {}", self.redacted_url(endpoint));

        // reqwest errors embed the request URL, which carries the key
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::from(e.without_url()))?;

        let status = response.status();
        debug!(%status, "Received exchange rate response");

        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::from(e.without_url()))?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<ResultEnvelope>(&body) {
                if envelope.result != SUCCESS {
                    return Err(envelope.rejection());
                }
            }
            warn!(%status, endpoint = %self.redacted_url(endpoint), "Provider returned HTTP error");
            return Err(ServiceError::NetworkFailure(format!("HTTP error: {status}")));
        }

        decode(&body)
    }
}

/// Fields common to every provider response.
#[derive(Deserialize, Debug)]
struct ResultEnvelope {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

impl ResultEnvelope {
    fn rejection(self) -> ServiceError {
        ServiceError::ProviderRejected(self.error_type.unwrap_or_else(|| UNKNOWN_ERROR.to_string()))
    }
}

#[derive(Deserialize, Debug)]
struct LatestResponse {
    base_code: Option<String>,
    conversion_rates: HashMap<String, f64>,
}

#[derive(Deserialize, Debug)]
struct PairRateResponse {
    conversion_rate: f64,
}

#[derive(Deserialize, Debug)]
struct PairConversionResponse {
    conversion_result: f64,
}

#[derive(Deserialize, Debug)]
struct CodesResponse {
    supported_codes: Vec<(String, String)>,
}

/// Checks the `result` field first so a rejection is never reported as a
/// schema mismatch, then parses the endpoint specific payload.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ServiceError> {
    let envelope: ResultEnvelope = serde_json::from_str(body)?;
    if envelope.result != SUCCESS {
        return Err(envelope.rejection());
    }
    Ok(serde_json::from_str(body)?)
}

fn to_code(raw: &str) -> Result<CurrencyCode, ServiceError> {
    CurrencyCode::parse(raw).map_err(|_| {
        ServiceError::MalformedResponse(format!("unexpected currency code '{raw}'"))
    })
}

#[async_trait]
impl ExchangeRateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateLatest", skip_all, fields(base = %base))]
    async fn latest_rates(&self, base: &CurrencyCode) -> Result<RateTable, ServiceError> {
        let data: LatestResponse = self.get(&format!("latest/{base}")).await?;

        if let Some(returned) = data.base_code.as_deref() {
            if !returned.eq_ignore_ascii_case(base.as_str()) {
                return Err(ServiceError::MalformedResponse(format!(
                    "requested rates for {base} but received {returned}"
                )));
            }
        }

        let rates: BTreeMap<CurrencyCode, f64> = data
            .conversion_rates
            .iter()
            .map(|(code, rate)| Ok((to_code(code)?, *rate)))
            .collect::<Result<_, ServiceError>>()?;

        Ok(RateTable {
            base: base.clone(),
            rates,
        })
    }

    #[instrument(name = "ExchangeRatePair", skip_all, fields(base = %base, target = %target))]
    async fn pair_rate(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<f64, ServiceError> {
        let data: PairRateResponse = self.get(&format!("pair/{base}/{target}")).await?;
        Ok(data.conversion_rate)
    }

    #[instrument(
        name = "ExchangeRatePairConversion",
        skip_all,
        fields(base = %base, target = %target, amount = amount)
    )]
    async fn pair_conversion(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
        amount: f64,
    ) -> Result<f64, ServiceError> {
        let data: PairConversionResponse =
            self.get(&format!("pair/{base}/{target}/{amount}")).await?;
        Ok(data.conversion_result)
    }

    #[instrument(name = "ExchangeRateCodes", skip_all)]
    async fn supported_codes(&self) -> Result<Vec<CurrencyInfo>, ServiceError> {
        let data: CodesResponse = self.get("codes").await?;
        data.supported_codes
            .into_iter()
            .map(|(code, name)| {
                Ok(CurrencyInfo {
                    code: to_code(&code)?,
                    name,
                })
            })
            .collect()
    }
}
