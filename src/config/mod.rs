pub mod cli;
pub mod toml_config;

use crate::adapters::DEFAULT_ROUTES_ENDPOINT;
use crate::core::enrichment::DEFAULT_CONCURRENCY;
use crate::core::ConfigProvider;
use crate::domain::ports::{ColumnNames, RoutesConfig};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "mexico-miles")]
#[command(about = "Adds Mexico leg road miles to a shipment sheet exported as CSV")]
pub struct CliConfig {
    #[arg(long, help = "Shipment sheet (CSV)", required_unless_present = "config")]
    pub input: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, help = "Maximum lookups in flight")]
    pub concurrency: usize,

    #[arg(long, default_value = "20", help = "Per-lookup timeout")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = DEFAULT_ROUTES_ENDPOINT)]
    pub routes_endpoint: String,

    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    #[arg(long, help = "Also write a status column (distance / no_leg / lookup_failed)")]
    pub status_column: bool,

    #[arg(long, help = "TOML configuration file; replaces the other run options")]
    pub config: Option<String>,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(skip)]
    #[serde(default)]
    pub columns: ColumnNames,
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        self.input.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn concurrency(&self) -> usize {
        self.concurrency
    }

    fn routes_config(&self) -> RoutesConfig {
        RoutesConfig {
            endpoint: self.routes_endpoint.clone(),
            api_key: self.api_key.clone().filter(|k| !k.trim().is_empty()),
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }

    fn columns(&self) -> &ColumnNames {
        &self.columns
    }

    fn include_status_column(&self) -> bool {
        self.status_column
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let input = validation::validate_required_field("input", &self.input)?;
        validation::validate_csv_path("input", input)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_at_least("concurrency", self.concurrency as u64, 1)?;
        validation::validate_at_least("timeout_seconds", self.timeout_seconds, 1)?;
        validation::validate_url("routes_endpoint", &self.routes_endpoint)?;
        validation::validate_columns(&self.columns)
    }
}
