use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// A loosely typed field as the DMR backend emits it: a JSON number, a
/// numeric string, or something else entirely.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawField {
    /// Stringified form, mirroring how the field would be printed as-is.
    pub fn as_text(&self) -> String {
        match self {
            RawField::Number(n) => n.to_string(),
            RawField::Text(s) => s.clone(),
            RawField::Other(v) => v.to_string(),
        }
    }
}

impl From<f64> for RawField {
    fn from(n: f64) -> Self {
        RawField::Number(n)
    }
}

impl From<&str> for RawField {
    fn from(s: &str) -> Self {
        RawField::Text(s.to_string())
    }
}

/// One daily manufacturing report row, exactly as received.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRecord {
    #[serde(rename = "dcrush_date", default)]
    pub crush_date: Option<RawField>,
    #[serde(rename = "nday_gross_cane", default)]
    pub gross_cane: Option<RawField>,
    #[serde(rename = "total_sugar", default)]
    pub total_sugar: Option<RawField>,
    #[serde(rename = "nexpected_recovery_prc_cane", default)]
    pub recovery_pct: Option<RawField>,
    #[serde(rename = "nworking_hrs", default)]
    pub working_hours: Option<RawField>,
    #[serde(rename = "nbagasse_prc_cane", default)]
    pub bagasse_pct: Option<RawField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub crush_date: String,
    /// `crush_date` as a calendar date, when it parses as `YYYY-MM-DD`.
    pub crush_day: Option<NaiveDate>,
    pub gross_cane: f64,
    pub total_sugar: f64,
    pub recovery_pct: f64,
    pub working_hours: f64,
    pub bagasse_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct TrendPoint {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Crushing")]
    pub crushing: f64,
    #[tabled(rename = "Sugar")]
    pub sugar: f64,
    #[tabled(rename = "Recovery")]
    pub recovery: f64,
}

/// A report table row as shown on screen.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ReportRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "Cane Crushed")]
    #[tabled(rename = "Cane Crushed")]
    pub cane_crushed: String,
    #[serde(rename = "Sugar Produced")]
    #[tabled(rename = "Sugar Produced")]
    pub sugar_produced: String,
    #[serde(rename = "Recovery %")]
    #[tabled(rename = "Recovery %")]
    pub recovery: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
}

/// The four-column export format.
#[derive(Debug, Serialize, Clone)]
pub struct ExportRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Cane Crushed")]
    pub cane_crushed: String,
    #[serde(rename = "Sugar Produced")]
    pub sugar_produced: String,
    #[serde(rename = "Recovery %")]
    pub recovery: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct KpiRow {
    #[tabled(rename = "KPI")]
    pub kpi: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Unit")]
    pub unit: String,
}
