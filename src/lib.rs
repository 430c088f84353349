pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::RoutesClient;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};
pub use crate::core::{
    enrichment::{compute_mexico_miles, MileageEnricher, DEFAULT_CONCURRENCY},
    etl::EtlEngine,
    pipeline::MileagePipeline,
};
pub use crate::domain::model::{AddressPair, MileageOutcome, RoutingRule, ShipmentRecord};
pub use crate::domain::ports::{DistanceProvider, RoutesConfig};
pub use crate::utils::error::{EtlError, Result};
