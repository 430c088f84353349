use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting Mexico mileage run...");

        // Extract
        let dataset = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} rows", dataset.rows.len());

        // Transform
        let result = self.pipeline.transform(dataset).await?;
        let summary = &result.summary;
        tracing::info!(
            "🔄 Enriched {} rows: {} with a Mexico leg, {} resolved, {} without distance",
            summary.total,
            summary.with_leg,
            summary.resolved,
            summary.failed
        );

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("📁 Output saved to: {} ({:?})", output_path, started.elapsed());

        Ok(output_path)
    }
}
