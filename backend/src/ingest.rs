//! Uploaded data file parsing.
//!
//! The upstream ARGO pipeline distributes NetCDF; what reaches this service
//! is the flattened per-level export of the same variables, as CSV or a JSON
//! record array. Column names are accepted in both the export spelling
//! (`latitude`, `depth`, ...) and the raw ARGO variable spelling (`LATITUDE`,
//! `PRES`, ...).

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// One depth level of one profile, ready for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRecord {
    pub latitude: f64,
    pub longitude: f64,
    /// Normalized to `YYYY-MM-DD HH:MM:SS`.
    pub time: String,
    pub depth: f64,
    pub temperature: f64,
    pub salinity: Option<f64>,
    /// Chlorophyll-a; only BGC floats carry it.
    pub chla: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("unsupported or empty data file")]
    Unrecognized,
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("no usable rows in data file")]
    Empty,
    #[error("invalid JSON records: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse an uploaded data file, autodetecting JSON record arrays and CSV.
///
/// Rows missing any of position, time, depth, or temperature are skipped,
/// matching how fill values are dropped when flattening NetCDF. A file with
/// no usable rows at all is an error.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<ProfileRecord>, IngestError> {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim_start();

    let records = if trimmed.starts_with('[') {
        parse_json(trimmed)?
    } else if trimmed.contains(',') {
        parse_csv(&text)?
    } else {
        return Err(IngestError::Unrecognized);
    };

    if records.is_empty() {
        return Err(IngestError::Empty);
    }
    Ok(records)
}

/// Permissive row shape: every field optional so partial rows can be skipped
/// instead of failing the whole batch.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(alias = "LATITUDE")]
    latitude: Option<f64>,
    #[serde(alias = "LONGITUDE")]
    longitude: Option<f64>,
    #[serde(alias = "JULD")]
    time: Option<String>,
    #[serde(alias = "PRES")]
    depth: Option<f64>,
    #[serde(alias = "TEMP")]
    temperature: Option<f64>,
    #[serde(alias = "PSAL")]
    salinity: Option<f64>,
    #[serde(alias = "CHLA")]
    chla: Option<f64>,
}

impl RawRecord {
    fn finish(self) -> Option<ProfileRecord> {
        let time = self.time.filter(|value| !value.trim().is_empty())?;
        Some(ProfileRecord {
            latitude: finite(self.latitude)?,
            longitude: finite(self.longitude)?,
            time: normalize_time(time.trim()),
            depth: finite(self.depth)?,
            temperature: finite(self.temperature)?,
            salinity: finite(self.salinity),
            chla: finite(self.chla),
        })
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn parse_json(text: &str) -> Result<Vec<ProfileRecord>, IngestError> {
    let raw: Vec<RawRecord> = serde_json::from_str(text)?;
    Ok(raw.into_iter().filter_map(RawRecord::finish).collect())
}

fn parse_csv(text: &str) -> Result<Vec<ProfileRecord>, IngestError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let header = lines.next().ok_or(IngestError::Unrecognized)?;
    let columns: Vec<String> = header
        .split(',')
        .map(|name| name.trim().to_ascii_lowercase())
        .collect();

    let find = |names: &[&str]| columns.iter().position(|c| names.contains(&c.as_str()));
    let latitude = find(&["latitude", "lat"]).ok_or(IngestError::MissingColumn("latitude"))?;
    let longitude = find(&["longitude", "lon"]).ok_or(IngestError::MissingColumn("longitude"))?;
    let time = find(&["time", "juld"]).ok_or(IngestError::MissingColumn("time"))?;
    let depth = find(&["depth", "pres"]).ok_or(IngestError::MissingColumn("depth"))?;
    let temperature =
        find(&["temperature", "temp"]).ok_or(IngestError::MissingColumn("temperature"))?;
    let salinity = find(&["salinity", "psal"]);
    let chla = find(&["chla", "chlorophyll"]);

    let mut records = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let number = |index: usize| fields.get(index).and_then(|raw| parse_number(raw));

        let raw = RawRecord {
            latitude: number(latitude),
            longitude: number(longitude),
            time: fields.get(time).map(|value| value.to_string()),
            depth: number(depth),
            temperature: number(temperature),
            salinity: salinity.and_then(number),
            chla: chla.and_then(number),
        };
        if let Some(record) = raw.finish() {
            records.push(record);
        }
    }
    Ok(records)
}

/// Empty cells and NaN markers count as missing, like NetCDF fill values.
fn parse_number(raw: &str) -> Option<f64> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return None;
    }
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Normalize assorted timestamp spellings to `YYYY-MM-DD HH:MM:SS`.
/// Unparseable values pass through untouched rather than dropping the row.
fn normalize_time(raw: &str) -> String {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for format in FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return parsed.format("%Y-%m-%d %H:%M:%S").to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return datetime.format("%Y-%m-%d %H:%M:%S").to_string();
        }
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_with_argo_headers_parses() {
        let data = b"LATITUDE,LONGITUDE,JULD,PRES,TEMP,PSAL,CHLA\n\
                     -12.5,45.0,2023-01-15T10:30:00Z,5.2,28.1,35.2,0.4\n\
                     -12.5,45.0,2023-01-15T10:30:00Z,100.0,14.8,35.0,\n";
        let records = parse_records(data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].latitude, -12.5);
        assert_eq!(records[0].time, "2023-01-15 10:30:00");
        assert_eq!(records[0].chla, Some(0.4));
        assert_eq!(records[1].chla, None);
    }

    #[test]
    fn csv_rows_with_missing_depth_or_temperature_are_skipped() {
        let data = b"latitude,longitude,time,depth,temperature,salinity\n\
                     -12.5,45.0,2023-01-15 10:30:00,5.2,28.1,35.2\n\
                     -12.5,45.0,2023-01-15 10:30:00,NaN,14.8,35.0\n\
                     -12.5,45.0,2023-01-15 10:30:00,200.0,nan,34.9\n";
        let records = parse_records(data).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].depth, 5.2);
    }

    #[test]
    fn csv_without_a_required_column_is_rejected() {
        let data = b"latitude,longitude,time,depth\n-12.5,45.0,2023-01-15,5.2\n";
        match parse_records(data) {
            Err(IngestError::MissingColumn(name)) => assert_eq!(name, "temperature"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn json_record_array_parses() {
        let data = br#"[
            {"latitude": -12.5, "longitude": 45.0, "time": "2023-01-15 10:30:00",
             "depth": 5.2, "temperature": 28.1, "salinity": 35.2},
            {"LATITUDE": -13.0, "LONGITUDE": 46.0, "JULD": "2023-01-16",
             "PRES": 10.0, "TEMP": 27.0}
        ]"#;
        let records = parse_records(data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].time, "2023-01-16 00:00:00");
        assert_eq!(records[1].salinity, None);
    }

    #[test]
    fn json_rows_missing_temperature_are_skipped_not_fatal() {
        let data = br#"[
            {"latitude": -12.5, "longitude": 45.0, "time": "2023-01-15", "depth": 5.2},
            {"latitude": -12.5, "longitude": 45.0, "time": "2023-01-15",
             "depth": 6.0, "temperature": 27.9}
        ]"#;
        let records = parse_records(data).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].temperature, 27.9);
    }

    #[test]
    fn file_with_no_usable_rows_is_an_error() {
        let data = b"latitude,longitude,time,depth,temperature\n-1.0,2.0,2023-01-15,NaN,NaN\n";
        assert!(matches!(parse_records(data), Err(IngestError::Empty)));
    }

    #[test]
    fn binary_garbage_is_unrecognized() {
        assert!(matches!(
            parse_records(&[0x89, 0x48, 0x44, 0x46]),
            Err(IngestError::Unrecognized)
        ));
    }

    #[test]
    fn timestamps_normalize_to_one_format() {
        assert_eq!(normalize_time("2023-01-15T10:30:00Z"), "2023-01-15 10:30:00");
        assert_eq!(
            normalize_time("2023-01-15T10:30:00.500Z"),
            "2023-01-15 10:30:00"
        );
        assert_eq!(normalize_time("2023-01-15"), "2023-01-15 00:00:00");
        assert_eq!(normalize_time("cycle 42"), "cycle 42");
    }
}
