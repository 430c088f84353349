//! Address normalization for both sides of the border.
//!
//! Inputs come straight from spreadsheet cells, so every value goes through
//! [`normalize_field`] before it is trusted as present.

const MEXICO: &str = "Mexico";
const USA: &str = "USA";

/// Spreadsheet tokens that mean "no value".
const NULL_TOKENS: [&str; 5] = ["nan", "null", "none", "n/a", "#n/a"];

/// Trims a raw cell value; blank and null-like cells become `None`.
pub fn normalize_field(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if NULL_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
    {
        return None;
    }
    Some(trimmed.to_string())
}

/// Like [`normalize_field`], but also undoes the float rendering spreadsheets
/// apply to numeric zip codes (`92101.0` -> `92101`).
pub fn normalize_zip(raw: &str) -> Option<String> {
    let value = normalize_field(raw)?;
    if let Some((digits, fraction)) = value.split_once('.') {
        let numeric = !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit());
        if numeric && !fraction.is_empty() && fraction.chars().all(|c| c == '0') {
            return Some(digits.to_string());
        }
    }
    Some(value)
}

/// Builds `"City, ST[, zip], Mexico"` from a comma-joined `"City,ST"` token.
/// Returns `None` only for a blank token.
pub fn build_mexico_address(city_state: Option<&str>, zip: Option<&str>) -> Option<String> {
    let city_state = city_state.map(str::trim).filter(|s| !s.is_empty())?;

    let mut parts: Vec<&str> = city_state
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    // A present token always yields an address, even one made only of commas.
    if parts.is_empty() {
        parts.push(city_state);
    }
    if let Some(zip) = zip.map(str::trim).filter(|z| !z.is_empty()) {
        parts.push(zip);
    }
    parts.push(MEXICO);
    Some(parts.join(", "))
}

/// Builds `"City, ST[, zip], USA"`. City and state are both required.
pub fn build_us_address(city: Option<&str>, state: Option<&str>, zip: Option<&str>) -> Option<String> {
    let city = city.map(str::trim).filter(|s| !s.is_empty())?;
    let state = state.map(str::trim).filter(|s| !s.is_empty())?;

    let mut parts = vec![city, state];
    if let Some(zip) = zip.map(str::trim).filter(|z| !z.is_empty()) {
        parts.push(zip);
    }
    parts.push(USA);
    Some(parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mexico_address_inserts_space_after_comma() {
        assert_eq!(
            build_mexico_address(Some("JUAREZ,NL"), None).as_deref(),
            Some("JUAREZ, NL, Mexico")
        );
    }

    #[test]
    fn test_mexico_address_with_zip() {
        assert_eq!(
            build_mexico_address(Some("JUAREZ,NL"), Some("32000")).as_deref(),
            Some("JUAREZ, NL, 32000, Mexico")
        );
    }

    #[test]
    fn test_mexico_address_already_spaced() {
        assert_eq!(
            build_mexico_address(Some(" CHIHUAHUA, CH "), None).as_deref(),
            Some("CHIHUAHUA, CH, Mexico")
        );
    }

    #[test]
    fn test_mexico_address_absent_when_blank() {
        assert_eq!(build_mexico_address(None, None), None);
        assert_eq!(build_mexico_address(Some("   "), Some("32000")), None);
    }

    #[test]
    fn test_mexico_address_keeps_comma_only_token() {
        assert_eq!(
            build_mexico_address(Some(" , "), None).as_deref(),
            Some(",, Mexico")
        );
    }

    #[test]
    fn test_us_address() {
        assert_eq!(
            build_us_address(Some(" San Diego "), Some("CA"), Some("92101")).as_deref(),
            Some("San Diego, CA, 92101, USA")
        );
        assert_eq!(
            build_us_address(Some("Laredo"), Some("TX"), None).as_deref(),
            Some("Laredo, TX, USA")
        );
    }

    #[test]
    fn test_us_address_requires_city_and_state() {
        assert_eq!(build_us_address(None, Some("TX"), Some("78040")), None);
        assert_eq!(build_us_address(Some("Laredo"), Some("  "), None), None);
    }

    #[test]
    fn test_normalize_field_null_tokens() {
        assert_eq!(normalize_field(""), None);
        assert_eq!(normalize_field("   "), None);
        assert_eq!(normalize_field("NaN"), None);
        assert_eq!(normalize_field("null"), None);
        assert_eq!(normalize_field("#N/A"), None);
        assert_eq!(normalize_field("  El Paso "), Some("El Paso".to_string()));
    }

    #[test]
    fn test_normalize_zip_strips_float_suffix() {
        assert_eq!(normalize_zip("92101.0"), Some("92101".to_string()));
        assert_eq!(normalize_zip("78040"), Some("78040".to_string()));
        assert_eq!(normalize_zip("78040-1234"), Some("78040-1234".to_string()));
        assert_eq!(normalize_zip("nan"), None);
    }
}
