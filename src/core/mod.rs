pub mod address;
pub mod classifier;
pub mod enrichment;
pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{Dataset, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
