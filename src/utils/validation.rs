use crate::domain::ports::ColumnNames;
use crate::utils::error::{EtlError, Result};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> EtlError {
    EtlError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// The routing endpoint must be an absolute http(s) URL.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

/// The sheet must be a CSV export; spreadsheet binaries are rejected up front.
pub fn validate_csv_path(field_name: &str, path: &str) -> Result<()> {
    validate_path(field_name, path)?;

    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("csv") => Ok(()),
        Some(ext) => Err(invalid(
            field_name,
            path,
            format!("Unsupported file extension: {}. Export the sheet as .csv", ext),
        )),
        None => Err(invalid(field_name, path, "File has no .csv extension")),
    }
}

pub fn validate_at_least(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| EtlError::MissingConfigError {
        field: field_name.to_string(),
    })
}

/// Header names must be non-blank, and the written columns must not
/// clobber an input column or each other since they are overwritten in place.
pub fn validate_columns(columns: &ColumnNames) -> Result<()> {
    let inputs = [
        ("columns.mexico_origin_city_state", &columns.mexico_origin_city_state),
        ("columns.mexico_dest_city_state", &columns.mexico_dest_city_state),
        ("columns.origin_city", &columns.origin_city),
        ("columns.origin_state", &columns.origin_state),
        ("columns.origin_zip", &columns.origin_zip),
        ("columns.dest_city", &columns.dest_city),
        ("columns.dest_state", &columns.dest_state),
        ("columns.dest_zip", &columns.dest_zip),
    ];
    let outputs = [
        ("columns.miles", &columns.miles),
        ("columns.status", &columns.status),
    ];

    for (field, name) in inputs.iter().chain(outputs.iter()) {
        if name.trim().is_empty() {
            return Err(invalid(field, name, "Column name cannot be empty"));
        }
    }

    for (field, name) in outputs {
        if let Some((input_field, _)) = inputs
            .iter()
            .find(|(_, input)| input.trim() == name.trim())
        {
            return Err(invalid(
                field,
                name,
                format!("Would overwrite input column {}", input_field),
            ));
        }
    }
    if columns.miles.trim() == columns.status.trim() {
        return Err(invalid(
            "columns.status",
            &columns.status,
            "Must differ from columns.miles",
        ));
    }
    Ok(())
}
