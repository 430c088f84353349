use crate::adapters::DEFAULT_ROUTES_ENDPOINT;
use crate::core::enrichment::DEFAULT_CONCURRENCY;
use crate::core::ConfigProvider;
use crate::domain::ports::{ColumnNames, RoutesConfig};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub routes: RoutesSection,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub columns: ColumnNames,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub status_column: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutesSection {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    pub concurrency: Option<usize>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GOOGLE_API_KEY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn timeout_seconds(&self) -> u64 {
        self.routes.timeout_seconds.unwrap_or(20)
    }

    /// 未替換的 `${VAR}` 視為沒有設定金鑰
    fn api_key(&self) -> Option<String> {
        self.routes
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !k.starts_with("${"))
            .map(str::to_string)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn concurrency(&self) -> usize {
        self.enrichment.concurrency.unwrap_or(DEFAULT_CONCURRENCY)
    }

    fn routes_config(&self) -> RoutesConfig {
        RoutesConfig {
            endpoint: self
                .routes
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ROUTES_ENDPOINT.to_string()),
            api_key: self.api_key(),
            timeout: Duration::from_secs(self.timeout_seconds()),
        }
    }

    fn columns(&self) -> &ColumnNames {
        &self.columns
    }

    fn include_status_column(&self) -> bool {
        self.output.status_column.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_csv_path("input.path", &self.input.path)?;
        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_at_least("enrichment.concurrency", self.concurrency() as u64, 1)?;
        validation::validate_at_least("routes.timeout_seconds", self.timeout_seconds(), 1)?;
        validation::validate_url("routes.endpoint", &self.routes_config().endpoint)?;
        validation::validate_columns(&self.columns)
    }
}
