//! HTTP client for the price prediction endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::cache::Cache;
use crate::selection::Selection;
use crate::valuation::{ValuationError, ValuationProvider};

// Matches the original upload form's implicit defaults.
const DEFAULT_ENGINE_SIZE: u32 = 1500;

pub struct HttpValuationOracle {
    base_url: String,
    cache: Arc<Cache<String, f64>>,
}

impl HttpValuationOracle {
    pub fn new(base_url: &str, cache: Arc<Cache<String, f64>>) -> Self {
        HttpValuationOracle {
            base_url: base_url.to_string(),
            cache,
        }
    }
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    registration_year: u16,
    manufacture_year: u16,
    maker: &'a str,
    car_name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    chassis_id: &'a str,
    fuel_type: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    colour: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    condition: Option<f64>,
    engine_size: u32,
    odometer: u32,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    predicted_price: Option<f64>,
}

fn cache_key(selection: &Selection, year: u16) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}|{}|{}",
        selection.maker,
        selection.model,
        selection.chassis_id,
        selection.fuel_type,
        selection.colour,
        selection.engine_size.unwrap_or(DEFAULT_ENGINE_SIZE),
        selection.odometer.unwrap_or(0),
        year
    )
}

#[async_trait]
impl ValuationProvider for HttpValuationOracle {
    async fn predict(&self, selection: &Selection, year: u16) -> Result<f64, ValuationError> {
        let key = cache_key(selection, year);
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let url = format!("{}/api/predict/", self.base_url);
        let request = PredictRequest {
            registration_year: year,
            manufacture_year: year,
            maker: &selection.maker,
            car_name: &selection.model,
            chassis_id: &selection.chassis_id,
            fuel_type: &selection.fuel_type,
            colour: &selection.colour,
            condition: selection.condition,
            engine_size: selection.engine_size.unwrap_or(DEFAULT_ENGINE_SIZE),
            odometer: selection.odometer.unwrap_or(0),
        };
        debug!("Requesting valuation from {} for year {}", url, year);

        let client = reqwest::Client::builder()
            .user_agent("mashin/1.0")
            .build()
            .map_err(|e| ValuationError::Unreachable(e.to_string()))?;
        let response = client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ValuationError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ValuationError::Invalid(format!(
                "HTTP error: {} from {}",
                response.status(),
                url
            )));
        }

        let body = response
            .json::<PredictResponse>()
            .await
            .map_err(|e| ValuationError::Invalid(format!("Failed to parse response: {e}")))?;

        let price = body
            .predicted_price
            .ok_or_else(|| ValuationError::Invalid("Response has no predicted_price".to_string()))?;
        if !price.is_finite() || price < 0.0 {
            return Err(ValuationError::Invalid(format!(
                "Predicted price is not a usable number: {price}"
            )));
        }

        self.cache.put(key, price).await;
        Ok(price)
    }
}
