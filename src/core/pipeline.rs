use crate::core::address::{normalize_field, normalize_zip};
use crate::core::enrichment::MileageEnricher;
use crate::core::{ConfigProvider, Dataset, Pipeline, Storage, TransformResult};
use crate::domain::model::{EnrichmentSummary, ShipmentRecord};
use crate::domain::ports::{ColumnNames, DistanceProvider};
use crate::utils::error::{EtlError, Result};
use std::path::Path;
use std::sync::Arc;

/// Positions of the classifier's input columns within a sheet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    mexico_origin_city_state: usize,
    mexico_dest_city_state: usize,
    origin_city: usize,
    origin_state: usize,
    origin_zip: usize,
    dest_city: usize,
    dest_state: usize,
    dest_zip: usize,
}

impl ColumnIndex {
    /// Resolves every required column, reporting all missing names at once.
    pub fn resolve(headers: &[String], names: &ColumnNames) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = names
            .required()
            .iter()
            .filter(|&&name| position(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(EtlError::MissingColumns { columns: missing });
        }

        let find = |name: &str| {
            position(name).ok_or_else(|| EtlError::MissingColumns {
                columns: vec![name.to_string()],
            })
        };

        Ok(Self {
            mexico_origin_city_state: find(names.mexico_origin_city_state.as_str())?,
            mexico_dest_city_state: find(names.mexico_dest_city_state.as_str())?,
            origin_city: find(names.origin_city.as_str())?,
            origin_state: find(names.origin_state.as_str())?,
            origin_zip: find(names.origin_zip.as_str())?,
            dest_city: find(names.dest_city.as_str())?,
            dest_state: find(names.dest_state.as_str())?,
            dest_zip: find(names.dest_zip.as_str())?,
        })
    }

    /// Short rows (ragged CSV) read as absent fields.
    pub fn record(&self, row: &[String]) -> ShipmentRecord {
        let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("");

        ShipmentRecord {
            mexico_origin_city_state: normalize_field(cell(self.mexico_origin_city_state)),
            mexico_dest_city_state: normalize_field(cell(self.mexico_dest_city_state)),
            origin_city: normalize_field(cell(self.origin_city)),
            origin_state: normalize_field(cell(self.origin_state)),
            origin_zip: normalize_zip(cell(self.origin_zip)),
            dest_city: normalize_field(cell(self.dest_city)),
            dest_state: normalize_field(cell(self.dest_state)),
            dest_zip: normalize_zip(cell(self.dest_zip)),
        }
    }
}

pub fn parse_csv(data: &[u8]) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(data);

    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Dataset { headers, rows })
}

pub fn write_csv(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(&dataset.headers)?;
    for row in &dataset.rows {
        writer.write_record(row)?;
    }

    writer.into_inner().map_err(|e| EtlError::IoError(e.into_error()))
}

/// Position of an output column, appending the header only when the sheet
/// does not already carry it. Existing values in that column are overwritten.
fn output_column(headers: &mut Vec<String>, name: &str) -> usize {
    match headers.iter().position(|h| h.trim() == name) {
        Some(at) => at,
        None => {
            headers.push(name.to_string());
            headers.len() - 1
        }
    }
}

/// Output file name for an input sheet: `mexico_miles_<name>`.
pub fn output_file_name(input_path: &str) -> String {
    let name = Path::new(input_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("shipments.csv");
    format!("mexico_miles_{}", name)
}

pub struct MileagePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    enricher: MileageEnricher,
}

impl<S: Storage, C: ConfigProvider> MileagePipeline<S, C> {
    pub fn new(storage: S, config: C, provider: Arc<dyn DistanceProvider>) -> Self {
        let enricher = MileageEnricher::new(provider, config.concurrency());
        Self {
            storage,
            config,
            enricher,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for MileagePipeline<S, C> {
    async fn extract(&self) -> Result<Dataset> {
        let input = self.config.input_path();
        tracing::debug!("Reading shipment sheet from: {}", input);

        let bytes = self.storage.read_file(input).await?;
        let dataset = parse_csv(&bytes)?;

        // 欄位檢查必須在任何路線查詢之前完成
        ColumnIndex::resolve(&dataset.headers, self.config.columns())?;

        tracing::debug!(
            "Sheet has {} columns and {} rows",
            dataset.headers.len(),
            dataset.rows.len()
        );
        Ok(dataset)
    }

    async fn transform(&self, mut data: Dataset) -> Result<TransformResult> {
        let columns = self.config.columns();
        let index = ColumnIndex::resolve(&data.headers, columns)?;
        let records: Vec<ShipmentRecord> = data.rows.iter().map(|row| index.record(row)).collect();

        let outcomes = self.enricher.enrich(&records).await;
        if outcomes.len() != data.rows.len() {
            return Err(EtlError::ProcessingError {
                message: format!(
                    "enrichment returned {} results for {} rows",
                    outcomes.len(),
                    data.rows.len()
                ),
            });
        }

        let miles_at = output_column(&mut data.headers, &columns.miles);
        let status_at = self
            .config
            .include_status_column()
            .then(|| output_column(&mut data.headers, &columns.status));

        // Pad ragged rows so the output columns line up under their headers.
        let width = data.headers.len();
        for (row, outcome) in data.rows.iter_mut().zip(&outcomes) {
            if row.len() < width {
                row.resize(width, String::new());
            }
            row[miles_at] = outcome.miles().map(|m| format!("{:.1}", m)).unwrap_or_default();
            if let Some(at) = status_at {
                row[at] = outcome.status().to_string();
            }
        }

        let summary = EnrichmentSummary::from_outcomes(&outcomes);
        Ok(TransformResult {
            dataset: data,
            outcomes,
            summary,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let file_name = output_file_name(self.config.input_path());
        let output_path = format!("{}/{}", self.config.output_path(), file_name);

        let bytes = write_csv(&result.dataset)?;
        tracing::debug!("Writing {} bytes to storage as {}", bytes.len(), file_name);
        self.storage.write_file(&file_name, &bytes).await?;

        Ok(output_path)
    }
}
