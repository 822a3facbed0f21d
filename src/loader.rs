use crate::error::Result;
use crate::insight::AiPayload;
use crate::normalizer::normalize_counted;
use crate::types::{CanonicalRecord, RawRecord};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Rows whose shape could not be read at all.
    pub parse_errors: usize,
    /// Present fields that were unparseable and became zero.
    pub defaulted_fields: usize,
}

/// What the DMR endpoint returns: `{"data": [...]}`, or a bare array when the
/// feed was saved by hand. An object whose `data` is null or absent is an
/// empty feed.
#[derive(Deserialize)]
#[serde(untagged)]
enum Feed {
    Rows(Vec<serde_json::Value>),
    Envelope {
        #[serde(default)]
        data: Option<Vec<serde_json::Value>>,
    },
}

/// Load a record collection, keeping the file's row order (newest-first by
/// backend contract). `.json` files are read as the API feed, anything else
/// as CSV with the backend's column names.
pub fn load_records(path: impl AsRef<Path>) -> Result<(Vec<CanonicalRecord>, LoadReport)> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let text = std::fs::read_to_string(path)?;
    let (records, report) = if is_json {
        records_from_json(&text)?
    } else {
        records_from_csv(&text)?
    };
    info!(
        path = %path.display(),
        total = report.total_rows,
        loaded = report.loaded_rows,
        parse_errors = report.parse_errors,
        defaulted = report.defaulted_fields,
        "loaded DMR records"
    );
    Ok((records, report))
}

fn collect<I>(rows: I) -> (Vec<CanonicalRecord>, LoadReport)
where
    I: IntoIterator<Item = Option<RawRecord>>,
{
    let mut report = LoadReport::default();
    let mut records = Vec::new();
    for row in rows {
        report.total_rows += 1;
        let Some(raw) = row else {
            report.parse_errors += 1;
            continue;
        };
        let (rec, defaulted) = normalize_counted(&raw);
        report.defaulted_fields += defaulted;
        records.push(rec);
    }
    report.loaded_rows = records.len();
    if report.parse_errors > 0 {
        warn!(skipped = report.parse_errors, "skipped unreadable rows");
    }
    (records, report)
}

pub fn records_from_json(text: &str) -> Result<(Vec<CanonicalRecord>, LoadReport)> {
    let rows = match serde_json::from_str::<Feed>(text)? {
        Feed::Rows(rows) => rows,
        Feed::Envelope { data } => data.unwrap_or_default(),
    };
    Ok(collect(
        rows.into_iter()
            .map(|v| serde_json::from_value::<RawRecord>(v).ok()),
    ))
}

pub fn records_from_csv(text: &str) -> Result<(Vec<CanonicalRecord>, LoadReport)> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let rows: Vec<Option<RawRecord>> = rdr
        .deserialize::<RawRecord>()
        .map(|r| r.ok())
        .collect();
    Ok(collect(rows))
}

pub fn load_analysis(path: impl AsRef<Path>) -> Result<AiPayload> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let payload = AiPayload::from_json(&text)?;
    info!(path = %path.display(), status = %payload.status, "loaded AI analysis");
    Ok(payload)
}
