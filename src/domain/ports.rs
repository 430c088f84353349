use crate::domain::model::{AddressPair, Dataset, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Header names of the columns the classifier reads.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub mexico_origin_city_state: String,
    pub mexico_dest_city_state: String,
    pub origin_city: String,
    pub origin_state: String,
    pub origin_zip: String,
    pub dest_city: String,
    pub dest_state: String,
    pub dest_zip: String,
    pub miles: String,
    pub status: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            mexico_origin_city_state: "Mexico Origin City and State".to_string(),
            mexico_dest_city_state: "Mexico Dest City and State".to_string(),
            origin_city: "Origin City".to_string(),
            origin_state: "Origin State".to_string(),
            origin_zip: "Origin Zip".to_string(),
            dest_city: "Destination City".to_string(),
            dest_state: "Destination State".to_string(),
            dest_zip: "Destination Zip".to_string(),
            miles: "Mexico Miles".to_string(),
            status: "Mexico Miles Status".to_string(),
        }
    }
}

impl ColumnNames {
    /// Input columns in sheet-validation order.
    pub fn required(&self) -> [&str; 8] {
        [
            self.mexico_origin_city_state.as_str(),
            self.mexico_dest_city_state.as_str(),
            self.origin_city.as_str(),
            self.origin_state.as_str(),
            self.origin_zip.as_str(),
            self.dest_city.as_str(),
            self.dest_state.as_str(),
            self.dest_zip.as_str(),
        ]
    }
}

/// Connection settings for the routing provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutesConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn concurrency(&self) -> usize;
    fn routes_config(&self) -> RoutesConfig;
    fn columns(&self) -> &ColumnNames;
    fn include_status_column(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, data: Dataset) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}

/// Maps an address pair to a driving distance in miles.
///
/// Implementations never fail: every provider, transport or decoding problem
/// comes back as `None` so that one bad lookup cannot abort a batch.
#[async_trait]
pub trait DistanceProvider: Send + Sync {
    async fn distance_miles(&self, pair: &AddressPair) -> Option<f64>;
}
