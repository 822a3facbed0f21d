//! Production analytics for daily sugar-factory manufacturing reports (DMR).
//!
//! Raw daily records are normalised into numeric records, then turned into
//! derived tonnage, efficiency badges, chronological trend series, report
//! pages with CSV export, and a display view of the AI analysis payload.

pub mod config;
pub mod efficiency;
pub mod error;
pub mod insight;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod normalizer;
pub mod output;
pub mod report;
pub mod session;
pub mod submission;
pub mod trend;
pub mod types;
pub mod util;

pub use config::DomainConstants;
pub use efficiency::{classify, EfficiencyStatus};
pub use error::{DmrError, Result};
pub use insight::{interpret, AiInsight, AiPayload};
pub use metrics::{derive, DerivedMetrics};
pub use normalizer::normalize;
pub use report::{filter, paginate, to_csv, ReportQuery};
pub use session::{Language, Session};
pub use trend::{build_series, rolling_stats};
pub use types::{CanonicalRecord, RawRecord, TrendPoint};
