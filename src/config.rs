use crate::breakdown::Rates;
use crate::selection::Selection;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_CATALOG_BASE_URL: &str = "http://103.50.205.42:8000";
pub const DEFAULT_ORACLE_BASE_URL: &str = "http://103.50.205.42:8000";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OracleProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub catalog: Option<CatalogProviderConfig>,
    pub oracle: Option<OracleProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            catalog: Some(CatalogProviderConfig {
                base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            }),
            oracle: Some(OracleProviderConfig {
                base_url: DEFAULT_ORACLE_BASE_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Vehicle attributes; repaired against the live catalog on every run.
    #[serde(default)]
    pub vehicle: Selection,
    /// Conversion rates and fee constants; missing fields take defaults.
    #[serde(default)]
    pub rates: Rates,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "mashin", "mashin")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn catalog_base_url(&self) -> &str {
        self.providers
            .catalog
            .as_ref()
            .map_or(DEFAULT_CATALOG_BASE_URL, |p| &p.base_url)
    }

    pub fn oracle_base_url(&self) -> &str {
        self.providers
            .oracle
            .as_ref()
            .map_or(DEFAULT_ORACLE_BASE_URL, |p| &p.base_url)
    }
}
