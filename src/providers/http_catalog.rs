//! HTTP client for the model-info metadata endpoint.

use anyhow::anyhow;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::cache::Cache;
use crate::catalog::{CatalogError, CatalogProvider, CatalogSet};

pub struct HttpCatalogProvider {
    base_url: String,
    cache: Arc<Cache<String, CatalogSet>>,
}

impl HttpCatalogProvider {
    pub fn new(base_url: &str, cache: Arc<Cache<String, CatalogSet>>) -> Self {
        HttpCatalogProvider {
            base_url: base_url.to_string(),
            cache,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelInfoResponse {
    #[serde(default)]
    allowed_makers: Vec<String>,
    #[serde(default)]
    allowed_car_names: Vec<String>,
    #[serde(default)]
    allowed_chassis_ids: Vec<String>,
    #[serde(default)]
    allowed_fuel_types: Vec<String>,
    #[serde(default)]
    allowed_colours: Vec<String>,
    #[serde(default)]
    allowed_years: Vec<String>,
}

impl From<ModelInfoResponse> for CatalogSet {
    fn from(info: ModelInfoResponse) -> Self {
        CatalogSet {
            makers: info.allowed_makers,
            models: info.allowed_car_names,
            chassis_ids: info.allowed_chassis_ids,
            fuels: info.allowed_fuel_types,
            colours: info.allowed_colours,
            years: info.allowed_years,
        }
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalogProvider {
    async fn fetch_catalog(&self, maker: Option<&str>) -> Result<CatalogSet, CatalogError> {
        let cache_key = maker.unwrap_or("").to_string();
        if let Some(cached) = self.cache.get(&cache_key).await {
            return Ok(cached);
        }

        let url = match maker {
            Some(maker) => format!("{}/api/model-info/?maker={maker}", self.base_url),
            None => format!("{}/api/model-info/", self.base_url),
        };
        debug!("Requesting catalog from {}", url);

        let result: Result<CatalogSet, anyhow::Error> = async {
            let client = reqwest::Client::builder().user_agent("mashin/1.0").build()?;
            let response = client.get(&url).send().await?;

            if !response.status().is_success() {
                return Err(anyhow!("HTTP error: {} from {}", response.status(), url));
            }

            let info = response.json::<ModelInfoResponse>().await?;
            Ok(CatalogSet::from(info))
        }
        .await;

        let catalog = result.map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        self.cache.put(cache_key, catalog.clone()).await;
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOP_LEVEL_RESPONSE: &str = r#"{
        "allowed_makers": ["Toyota", "Honda"],
        "allowed_car_names": ["Camry", "Corolla"],
        "allowed_chassis_ids": ["AXVH70"],
        "allowed_fuel_types": ["Petrol", "Hybrid"],
        "allowed_colours": ["White"],
        "allowed_years": ["2022", "2021"]
    }"#;

    #[tokio::test]
    async fn test_successful_top_level_fetch() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/model-info/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TOP_LEVEL_RESPONSE))
            .mount(&mock_server)
            .await;

        let cache = Arc::new(Cache::new());
        let provider = HttpCatalogProvider::new(&mock_server.uri(), cache);
        let catalog = provider.fetch_catalog(None).await.unwrap();

        assert_eq!(catalog.makers, vec!["Toyota", "Honda"]);
        assert_eq!(catalog.models, vec!["Camry", "Corolla"]);
        assert_eq!(catalog.fuels, vec!["Petrol", "Hybrid"]);
        assert_eq!(catalog.years, vec!["2022", "2021"]);
    }

    #[tokio::test]
    async fn test_scoped_fetch_passes_maker_query() {
        let mock_server = MockServer::start().await;
        let scoped_response = r#"{
            "allowed_makers": ["Honda"],
            "allowed_car_names": ["Accord", "Civic"],
            "allowed_fuel_types": ["Petrol"]
        }"#;
        Mock::given(method("GET"))
            .and(path("/api/model-info/"))
            .and(query_param("maker", "Honda"))
            .respond_with(ResponseTemplate::new(200).set_body_string(scoped_response))
            .mount(&mock_server)
            .await;

        let cache = Arc::new(Cache::new());
        let provider = HttpCatalogProvider::new(&mock_server.uri(), cache);
        let catalog = provider.fetch_catalog(Some("Honda")).await.unwrap();

        assert_eq!(catalog.models, vec!["Accord", "Civic"]);
        // Levels the endpoint omits come back empty.
        assert!(catalog.colours.is_empty());
        assert!(catalog.years.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_unavailable() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/model-info/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let cache = Arc::new(Cache::new());
        let provider = HttpCatalogProvider::new(&mock_server.uri(), cache);
        let result = provider.fetch_catalog(None).await;

        assert!(matches!(result, Err(CatalogError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_unavailable() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/model-info/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let cache = Arc::new(Cache::new());
        let provider = HttpCatalogProvider::new(&mock_server.uri(), cache);
        let result = provider.fetch_catalog(None).await;

        assert!(matches!(result, Err(CatalogError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_catalog_is_cached_per_maker() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/model-info/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TOP_LEVEL_RESPONSE))
            .expect(1)
            .mount(&mock_server)
            .await;

        let cache = Arc::new(Cache::new());
        let provider = HttpCatalogProvider::new(&mock_server.uri(), cache);

        let first = provider.fetch_catalog(None).await.unwrap();
        let second = provider.fetch_catalog(None).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failed_fetch_does_not_poison_cache() {
        let mock_server = MockServer::start().await;
        let cache = Arc::new(Cache::new());
        let provider = HttpCatalogProvider::new(&mock_server.uri(), Arc::clone(&cache));

        // No mock mounted: the first call fails.
        let result = provider.fetch_catalog(None).await;
        assert!(result.is_err());
        assert!(cache.get(&String::new()).await.is_none());
    }
}
