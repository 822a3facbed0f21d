// Upload body for a new daily manufacturing report.
use crate::error::{DmrError, Result};
use crate::normalizer::normalize;
use crate::types::{RawField, RawRecord};
use serde::Serialize;

pub const DEFAULT_FACTORY_ID: &str = "FACTORY_001";

/// Form inputs exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub crush_date: String,
    pub gross_cane: String,
    pub total_sugar: String,
    pub recovery_pct: String,
    pub working_hours: String,
    pub bagasse_pct: String,
    pub factory_id: Option<String>,
}

/// JSON body the backend's upload endpoint accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DmrSubmission {
    pub dcrush_date: String,
    pub nday_gross_cane: f64,
    pub total_sugar: f64,
    pub nexpected_recovery_prc_cane: f64,
    pub nworking_hrs: f64,
    pub nbagasse_prc_cane: f64,
    pub factory_id: String,
}

fn field(s: &str) -> Option<RawField> {
    Some(RawField::Text(s.to_string()))
}

impl SubmissionForm {
    /// Validate and coerce. Only the crush date is mandatory; numbers follow
    /// the normaliser's rules.
    pub fn build(&self) -> Result<DmrSubmission> {
        if self.crush_date.trim().is_empty() {
            return Err(DmrError::MissingCrushDate);
        }
        let rec = normalize(&RawRecord {
            crush_date: field(&self.crush_date),
            gross_cane: field(&self.gross_cane),
            total_sugar: field(&self.total_sugar),
            recovery_pct: field(&self.recovery_pct),
            working_hours: field(&self.working_hours),
            bagasse_pct: field(&self.bagasse_pct),
        });
        let factory_id = self
            .factory_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_FACTORY_ID)
            .to_string();
        Ok(DmrSubmission {
            dcrush_date: rec.crush_date,
            nday_gross_cane: rec.gross_cane,
            total_sugar: rec.total_sugar,
            nexpected_recovery_prc_cane: rec.recovery_pct,
            nworking_hrs: rec.working_hours,
            nbagasse_prc_cane: rec.bagasse_pct,
            factory_id,
        })
    }
}

impl DmrSubmission {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_is_required() {
        let form = SubmissionForm {
            gross_cane: "4520".into(),
            ..SubmissionForm::default()
        };
        assert!(matches!(form.build(), Err(DmrError::MissingCrushDate)));
    }

    #[test]
    fn builds_backend_body() {
        let form = SubmissionForm {
            crush_date: "2024-12-30".into(),
            gross_cane: "4520".into(),
            total_sugar: "485".into(),
            recovery_pct: "10.8".into(),
            working_hours: "".into(),
            bagasse_pct: "abc".into(),
            factory_id: None,
        };
        let body = form.build().unwrap();
        assert_eq!(body.nday_gross_cane, 4520.0);
        assert_eq!(body.nworking_hrs, 0.0);
        assert_eq!(body.nbagasse_prc_cane, 0.0);
        assert_eq!(body.factory_id, DEFAULT_FACTORY_ID);

        let json: serde_json::Value = serde_json::from_str(&body.to_json().unwrap()).unwrap();
        assert_eq!(json["dcrush_date"], "2024-12-30");
        assert_eq!(json["nexpected_recovery_prc_cane"], 10.8);
        assert_eq!(json["factory_id"], "FACTORY_001");
    }

    #[test]
    fn explicit_factory_id_is_kept() {
        let form = SubmissionForm {
            crush_date: "2024-12-30".into(),
            factory_id: Some("VSI001".into()),
            ..SubmissionForm::default()
        };
        assert_eq!(form.build().unwrap().factory_id, "VSI001");
    }
}
