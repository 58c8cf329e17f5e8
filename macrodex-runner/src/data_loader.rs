//! Series loading for the runner.
//!
//! Each source is a two-column CSV file (`date,value`) with a header row.
//! Column names are ignored so FRED exports (`observation_date,WALCL`) load
//! unchanged. The date column accepts `YYYY-MM-DD` or an RFC 3339 timestamp;
//! intraday rows are collapsed to the last observation of each day for the
//! index computation and kept at full resolution for display merging.
//!
//! Rows whose value is empty or `.` (FRED's missing marker) are skipped and
//! counted rather than failing the load.

use chrono::{DateTime, NaiveDate, Utc};
use macrodex_core::clock::start_of_day;
use macrodex_core::domain::{DailySeries, IntradaySeries};
use macrodex_core::SourceSeries;
use std::io::Read;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::{SourceFile, SourcesConfig};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: expected at least 2 columns, found {found}")]
    MissingColumn { line: u64, found: usize },

    #[error("line {line}: unrecognised date '{value}'")]
    BadDate { line: u64, value: String },

    #[error("line {line}: invalid number '{value}'")]
    BadValue { line: u64, value: String },

    #[error("'{path}' contains no observations")]
    Empty { path: PathBuf },
}

/// One parsed CSV file.
#[derive(Debug, Clone, Default)]
pub struct ParsedSeries {
    pub series: IntradaySeries,
    /// Rows skipped because of a missing-value marker.
    pub skipped: usize,
}

/// Result of loading every source, including provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    /// Daily histories consumed by the index computation.
    pub sources: SourceSeries,
    /// Price observations at their original resolution.
    pub price_intraday: IntradaySeries,
    /// Dataset hash for fingerprinting (BLAKE3 over all observations).
    pub dataset_hash: String,
    /// Total rows skipped across all files.
    pub skipped_rows: usize,
    /// Whether the data was generated rather than read from files.
    pub synthetic: bool,
}

/// Parse `date,value` CSV content.
pub fn parse_series<R: Read>(reader: R) -> Result<ParsedSeries, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut parsed = ParsedSeries::default();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.len() < 2 {
            return Err(LoadError::MissingColumn {
                line,
                found: record.len(),
            });
        }

        let raw_value = &record[1];
        if raw_value.is_empty() || raw_value == "." {
            parsed.skipped += 1;
            continue;
        }

        let timestamp = parse_timestamp(&record[0]).ok_or_else(|| LoadError::BadDate {
            line,
            value: record[0].to_string(),
        })?;
        let value: f64 = raw_value.parse().map_err(|_| LoadError::BadValue {
            line,
            value: raw_value.to_string(),
        })?;
        if !value.is_finite() {
            return Err(LoadError::BadValue {
                line,
                value: raw_value.to_string(),
            });
        }
        parsed.series.insert(timestamp, value);
    }
    Ok(parsed)
}

/// `YYYY-MM-DD` (midnight UTC) or RFC 3339.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(start_of_day(date));
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Read and parse one configured source file, applying its scale.
pub fn load_file(source: &SourceFile) -> Result<ParsedSeries, LoadError> {
    let file = std::fs::File::open(&source.path).map_err(|e| LoadError::Open {
        path: source.path.clone(),
        source: e,
    })?;
    let mut parsed = parse_series(file)?;
    if parsed.series.is_empty() {
        return Err(LoadError::Empty {
            path: source.path.clone(),
        });
    }
    if source.scale != 1.0 {
        parsed.series = parsed.series.scaled(source.scale);
    }
    if parsed.skipped > 0 {
        tracing::warn!(
            path = %source.path.display(),
            skipped = parsed.skipped,
            "skipped rows with missing values"
        );
    }
    tracing::info!(
        path = %source.path.display(),
        observations = parsed.series.len(),
        "loaded series"
    );
    Ok(parsed)
}

/// Load all five configured sources.
pub fn load_sources(config: &SourcesConfig) -> Result<LoadedData, LoadError> {
    let fed = load_file(&config.fed_balance_sheet)?;
    let tga = load_file(&config.treasury_account)?;
    let rrp = load_file(&config.reverse_repo)?;
    let pmi = load_file(&config.pmi)?;
    let price = load_file(&config.price)?;

    let skipped_rows = fed.skipped + tga.skipped + rrp.skipped + pmi.skipped + price.skipped;
    let sources = SourceSeries {
        fed_balance_sheet: fed.series.to_daily(),
        treasury_account: tga.series.to_daily(),
        reverse_repo: rrp.series.to_daily(),
        pmi: pmi.series.to_daily(),
        price: price.series.to_daily(),
        pmi_note: config.pmi.note.clone(),
    };

    Ok(LoadedData::from_sources(sources, price.series, skipped_rows, false))
}

impl LoadedData {
    pub fn from_sources(
        sources: SourceSeries,
        price_intraday: IntradaySeries,
        skipped_rows: usize,
        synthetic: bool,
    ) -> Self {
        let dataset_hash = compute_dataset_hash(&sources, &price_intraday);
        Self {
            sources,
            price_intraday,
            dataset_hash,
            skipped_rows,
            synthetic,
        }
    }
}

/// Compute a deterministic BLAKE3 hash over every observation.
///
/// Sources are hashed in a fixed order with a name prefix, so the hash is
/// identical for identical inputs regardless of file layout. The price is
/// hashed at full resolution; its daily collapse is derived from it.
pub fn compute_dataset_hash(sources: &SourceSeries, price_intraday: &IntradaySeries) -> String {
    let mut hasher = blake3::Hasher::new();

    let named: [(&str, &DailySeries); 4] = [
        ("fed_balance_sheet", &sources.fed_balance_sheet),
        ("treasury_account", &sources.treasury_account),
        ("reverse_repo", &sources.reverse_repo),
        ("pmi", &sources.pmi),
    ];
    for (name, series) in named {
        hasher.update(name.as_bytes());
        for point in series.iter() {
            hasher.update(point.date.to_string().as_bytes());
            hasher.update(&point.value.to_le_bytes());
        }
    }

    hasher.update(b"price");
    for point in price_intraday.iter() {
        hasher.update(point.date.to_rfc3339().as_bytes());
        hasher.update(&point.value.to_le_bytes());
    }

    hasher.update(b"pmi_note");
    match &sources.pmi_note {
        Some(note) => {
            hasher.update(&[1]);
            hasher.update(note.as_bytes());
        }
        None => {
            hasher.update(&[0]);
        }
    }

    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn parses_fred_style_csv() {
        let csv = "observation_date,WALCL\n2024-01-03,7713.1\n2024-01-10,.\n2024-01-17,7681.5\n";
        let parsed = parse_series(csv.as_bytes()).unwrap();
        assert_eq!(parsed.series.len(), 2);
        assert_eq!(parsed.skipped, 1);
        let daily = parsed.series.to_daily();
        assert_eq!(daily.get(d("2024-01-17")), Some(7681.5));
    }

    #[test]
    fn parses_rfc3339_timestamps() {
        let csv = "timestamp,price\n2024-01-01T10:00:00Z,42000.5\n2024-01-01T22:00:00+02:00,42100\n";
        let parsed = parse_series(csv.as_bytes()).unwrap();
        assert_eq!(parsed.series.len(), 2);
        // 22:00+02:00 is 20:00 UTC on the same day; last of day wins.
        assert_eq!(parsed.series.to_daily().get(d("2024-01-01")), Some(42100.0));
    }

    #[test]
    fn bad_date_reports_line() {
        let csv = "date,value\n2024-01-01,1\nnot-a-date,2\n";
        let err = parse_series(csv.as_bytes()).unwrap_err();
        match err {
            LoadError::BadDate { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_value_is_rejected() {
        let csv = "date,value\n2024-01-01,abc\n";
        assert!(matches!(
            parse_series(csv.as_bytes()),
            Err(LoadError::BadValue { .. })
        ));
        let csv = "date,value\n2024-01-01,NaN\n";
        assert!(matches!(
            parse_series(csv.as_bytes()),
            Err(LoadError::BadValue { .. })
        ));
    }

    #[test]
    fn single_column_is_rejected() {
        let csv = "date\n2024-01-01\n";
        assert!(matches!(
            parse_series(csv.as_bytes()),
            Err(LoadError::MissingColumn { found: 1, .. })
        ));
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn dataset_hash_is_deterministic_and_sensitive() {
        let mut sources = SourceSeries::default();
        sources.pmi.insert(d("2024-01-01"), 50.5);
        let mut prices = IntradaySeries::new();
        prices.insert(at("2024-01-01T00:00:00Z"), 100.0);
        let a = compute_dataset_hash(&sources, &prices);
        assert_eq!(a, compute_dataset_hash(&sources.clone(), &prices.clone()));

        prices.insert(at("2024-01-01T00:00:00Z"), 100.5);
        assert_ne!(a, compute_dataset_hash(&sources, &prices));
    }

    #[test]
    fn dataset_hash_covers_intraday_prices() {
        let sources = SourceSeries::default();
        let mut morning = IntradaySeries::new();
        morning.insert(at("2024-01-01T09:00:00Z"), 90.0);
        morning.insert(at("2024-01-01T23:00:00Z"), 100.0);
        let mut evening = IntradaySeries::new();
        evening.insert(at("2024-01-01T12:00:00Z"), 95.0);
        evening.insert(at("2024-01-01T23:00:00Z"), 100.0);

        // Both collapse to the same daily close.
        assert_eq!(morning.to_daily(), evening.to_daily());
        assert_ne!(
            compute_dataset_hash(&sources, &morning),
            compute_dataset_hash(&sources, &evening)
        );
    }

    #[test]
    fn dataset_hash_covers_pmi_note() {
        let prices = IntradaySeries::new();
        let mut sources = SourceSeries::default();
        let none = compute_dataset_hash(&sources, &prices);
        sources.pmi_note = Some(String::new());
        let empty = compute_dataset_hash(&sources, &prices);
        sources.pmi_note = Some("ISM manufacturing".into());
        let ism = compute_dataset_hash(&sources, &prices);

        assert_ne!(none, empty);
        assert_ne!(empty, ism);
        assert_ne!(none, ism);
    }
}
