use thiserror::Error;

/// Errors surfaced by the file layer and the AI insight interpreter.
///
/// The derivation engine itself never fails; malformed numbers are
/// defaulted to zero during normalisation instead of being reported here.
#[derive(Error, Debug)]
pub enum DmrError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("AI analysis unavailable (status={status})")]
    AnalysisUnavailable { status: String },

    #[error("malformed AI analysis: {0}")]
    MalformedAnalysis(String),

    #[error("crush date is required")]
    MissingCrushDate,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, DmrError>;
