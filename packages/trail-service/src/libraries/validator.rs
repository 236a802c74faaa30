use tracing::warn;

use crate::models::{
    validate_coordinates, LocationValidationError, RawRecord, TrailLocation, REQUIRED_FIELDS,
};

/// A record that failed validation, with its 1-based data row number.
#[derive(Debug, Clone)]
pub struct RowRejection {
    pub row: usize,
    pub reason: LocationValidationError,
}

impl std::fmt::Display for RowRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row {} {}", self.row, self.reason)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub valid: Vec<TrailLocation>,
    pub rejected: Vec<RowRejection>,
}

/// Keep only records with every required field and in-range numeric
/// coordinates. Each rejected row is logged at WARN.
pub fn validate_location_data(records: Vec<RawRecord>) -> Vec<TrailLocation> {
    validate_with_report(records).valid
}

pub fn validate_with_report(records: Vec<RawRecord>) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (index, record) in records.into_iter().enumerate() {
        match validate_record(record) {
            Ok(location) => report.valid.push(location),
            Err(reason) => {
                let rejection = RowRejection {
                    row: index + 1,
                    reason,
                };
                warn!("{}", rejection);
                report.rejected.push(rejection);
            }
        }
    }

    report
}

pub fn validate_record(mut record: RawRecord) -> Result<TrailLocation, LocationValidationError> {
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| record.get(**field).map_or(true, |v| v.is_empty()))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LocationValidationError::MissingFields(missing));
    }

    let raw_lat = record.remove("latitude").unwrap_or_default();
    let raw_lng = record.remove("longitude").unwrap_or_default();

    let (latitude, longitude) = match (parse_float(&raw_lat), parse_float(&raw_lng)) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => {
            return Err(LocationValidationError::InvalidCoordinates {
                latitude: raw_lat,
                longitude: raw_lng,
            })
        }
    };

    if !validate_coordinates(latitude, longitude) {
        return Err(LocationValidationError::OutOfRange {
            latitude,
            longitude,
        });
    }

    let name = record.remove("name").unwrap_or_default();
    Ok(TrailLocation {
        name,
        latitude,
        longitude,
        fields: record,
    })
}

/// Parse the longest leading decimal number, ignoring trailing garbage
/// (`"40.5N"` is 40.5). Returns None when there is no numeric prefix.
pub fn parse_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return s[..end + "Infinity".len()].parse::<f64>().ok();
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return None;
    }

    // exponent only counts if at least one digit follows
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_float_prefixes() {
        assert_eq!(parse_float("40.0244751"), Some(40.0244751));
        assert_eq!(parse_float("  -75.23"), Some(-75.23));
        assert_eq!(parse_float("40.5N"), Some(40.5));
        assert_eq!(parse_float(".5"), Some(0.5));
        assert_eq!(parse_float("5."), Some(5.0));
        assert_eq!(parse_float("+12"), Some(12.0));
        assert_eq!(parse_float("1e2"), Some(100.0));
        assert_eq!(parse_float("1e"), Some(1.0));
        assert_eq!(parse_float("2E-1x"), Some(0.2));
        assert_eq!(parse_float("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_parse_float_rejects_non_numeric() {
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_float("."), None);
        assert_eq!(parse_float("-"), None);
        assert_eq!(parse_float("N40"), None);
        assert_eq!(parse_float("inf"), None);
    }

    #[test]
    fn test_valid_record_keeps_extra_fields() {
        let location = validate_record(record(&[
            ("name", "Valley Green"),
            ("latitude", "40.0559"),
            ("longitude", "-75.2185"),
            ("difficulty", "2"),
        ]))
        .unwrap();

        assert_eq!(location.name, "Valley Green");
        assert_eq!(location.latitude, 40.0559);
        assert_eq!(location.longitude, -75.2185);
        assert_eq!(location.fields.get("difficulty").unwrap(), "2");
        assert!(!location.fields.contains_key("latitude"));
    }

    #[test]
    fn test_missing_and_empty_fields() {
        let err = validate_record(record(&[("name", ""), ("latitude", "40")])).unwrap_err();
        assert_eq!(
            err,
            LocationValidationError::MissingFields(vec![
                "name".to_string(),
                "longitude".to_string()
            ])
        );
    }

    #[test]
    fn test_invalid_coordinates() {
        let err = validate_record(record(&[
            ("name", "A"),
            ("latitude", "north"),
            ("longitude", "-75"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            LocationValidationError::InvalidCoordinates { ref latitude, .. } if latitude == "north"
        ));
    }

    #[test]
    fn test_out_of_range_boundaries() {
        assert!(validate_record(record(&[
            ("name", "Pole"),
            ("latitude", "90"),
            ("longitude", "-180"),
        ]))
        .is_ok());

        let err = validate_record(record(&[
            ("name", "Too far"),
            ("latitude", "90.0001"),
            ("longitude", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, LocationValidationError::OutOfRange { .. }));

        let err = validate_record(record(&[
            ("name", "Infinite"),
            ("latitude", "Infinity"),
            ("longitude", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, LocationValidationError::OutOfRange { .. }));
    }

    #[test]
    fn test_report_numbers_rows_from_one() {
        let report = validate_with_report(vec![
            record(&[("name", "A"), ("latitude", "1"), ("longitude", "2")]),
            record(&[("name", "B"), ("latitude", "x"), ("longitude", "2")]),
            record(&[("name", "C"), ("latitude", "3"), ("longitude", "200")]),
            record(&[("name", "D"), ("latitude", "4"), ("longitude", "5")]),
        ]);

        assert_eq!(report.valid.len(), 2);
        assert_eq!(report.valid[0].name, "A");
        assert_eq!(report.valid[1].name, "D");

        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].row, 2);
        assert_eq!(
            report.rejected[0].to_string(),
            "Row 2 has invalid coordinates: lat=x, lng=2"
        );
        assert_eq!(
            report.rejected[1].to_string(),
            "Row 3 has out-of-range coordinates: lat=3, lng=200"
        );
    }

    #[test]
    fn test_rejection_prints_infinite_and_huge_coordinates() {
        let report = validate_with_report(vec![
            record(&[("name", "A"), ("latitude", "Infinity"), ("longitude", "0")]),
            record(&[("name", "B"), ("latitude", "1e21"), ("longitude", "-75")]),
        ]);
        assert!(report.valid.is_empty());
        assert_eq!(
            report.rejected[0].to_string(),
            "Row 1 has out-of-range coordinates: lat=Infinity, lng=0"
        );
        assert_eq!(
            report.rejected[1].to_string(),
            "Row 2 has out-of-range coordinates: lat=1e+21, lng=-75"
        );
    }

    #[test]
    fn test_validate_location_data_returns_only_valid() {
        let valid = validate_location_data(vec![
            record(&[("latitude", "1"), ("longitude", "2")]),
            record(&[("name", "Ok"), ("latitude", "1"), ("longitude", "2")]),
        ]);
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].name, "Ok");
    }
}
