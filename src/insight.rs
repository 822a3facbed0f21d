// AI analysis payload and the display-ready view derived from it.
//
// The payload's own `difference` field is never shown. The displayed
// difference is always recomputed as actual minus predicted.
use crate::error::{DmrError, Result};
use crate::trend::TrendDirection;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const SUCCESS_STATUS: &str = "success";
pub const NORMAL_ANOMALY_STATUS: &str = "Normal";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiPayload {
    pub status: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub recovery_analysis: Option<RecoveryAnalysis>,
    #[serde(default)]
    pub recovery_confidence: Option<RecoveryConfidence>,
    #[serde(default)]
    pub recovery_trend: Option<RecoveryTrend>,
    #[serde(default)]
    pub anomaly_detection: Option<AnomalyDetection>,
    #[serde(default)]
    pub alerts: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub bagasse_optimization: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecoveryAnalysis {
    pub actual: f64,
    pub predicted: f64,
    #[serde(default)]
    pub difference: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RecoveryConfidence {
    pub level: String,
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RecoveryTrend {
    pub avg_7d: f64,
    pub trend: Option<String>,
    pub difference: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AnomalyDetection {
    pub status: String,
    pub issues: Vec<String>,
}

impl AiPayload {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    Good,
    Bad,
}

impl Highlight {
    fn of(value: f64) -> Self {
        if value >= 0.0 {
            Highlight::Good
        } else {
            Highlight::Bad
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Highlight::Good => "good",
            Highlight::Bad => "bad",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendArrow {
    Up,
    Down,
    Neutral,
}

impl TrendArrow {
    pub fn for_direction(direction: Option<TrendDirection>) -> Self {
        match direction {
            Some(TrendDirection::Improving) => TrendArrow::Up,
            Some(TrendDirection::Declining) => TrendArrow::Down,
            Some(TrendDirection::Stable) | None => TrendArrow::Neutral,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            TrendArrow::Up => "↑",
            TrendArrow::Down => "↓",
            TrendArrow::Neutral => "→",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Badge {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceView {
    pub level: String,
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendView {
    pub avg_7d: f64,
    pub deviation: f64,
    pub deviation_highlight: Highlight,
    /// `None` when the payload's trend label is missing or unknown.
    pub direction: Option<TrendDirection>,
    pub arrow: TrendArrow,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyView {
    pub status: String,
    pub badge: Badge,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiInsight {
    pub date: Option<String>,
    pub actual: f64,
    pub predicted: f64,
    pub display_difference: f64,
    pub highlight: Highlight,
    pub summary: &'static str,
    pub confidence: Option<ConfidenceView>,
    pub trend: Option<TrendView>,
    pub anomaly: Option<AnomalyView>,
    pub alerts: Vec<String>,
    pub recommendations: Vec<String>,
    pub bagasse_optimization: Option<serde_json::Value>,
}

impl AiInsight {
    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }
}

fn parse_direction(label: Option<&str>) -> Option<TrendDirection> {
    match label.map(str::trim) {
        Some("Improving") => Some(TrendDirection::Improving),
        Some("Declining") => Some(TrendDirection::Declining),
        Some("Stable") => Some(TrendDirection::Stable),
        _ => None,
    }
}

/// Build the insight view. A payload whose status is not `success` yields
/// `AnalysisUnavailable` and no derived values.
pub fn interpret(payload: &AiPayload) -> Result<AiInsight> {
    if payload.status != SUCCESS_STATUS {
        warn!(status = %payload.status, "AI analysis reported failure");
        return Err(DmrError::AnalysisUnavailable {
            status: payload.status.clone(),
        });
    }
    let analysis = payload
        .recovery_analysis
        .as_ref()
        .ok_or_else(|| DmrError::MalformedAnalysis("recovery_analysis is missing".to_string()))?;

    let display_difference = analysis.actual - analysis.predicted;
    if let Some(reported) = analysis.difference {
        if (reported - display_difference).abs() > 1e-6 {
            debug!(reported, display_difference, "payload difference disagrees with actual - predicted");
        }
    }
    let highlight = Highlight::of(display_difference);
    let summary = match highlight {
        Highlight::Good => {
            "Recovery performance is better than AI prediction. Process efficiency is optimal."
        }
        Highlight::Bad => "Recovery is below AI prediction. Operational tuning is recommended.",
    };

    let confidence = payload.recovery_confidence.as_ref().map(|c| ConfidenceView {
        level: c.level.clone(),
        score: c.score,
        reason: c.reason.clone(),
    });

    let trend = payload.recovery_trend.as_ref().map(|t| {
        let direction = parse_direction(t.trend.as_deref());
        TrendView {
            avg_7d: t.avg_7d,
            deviation: t.difference,
            deviation_highlight: Highlight::of(t.difference),
            direction,
            arrow: TrendArrow::for_direction(direction),
            label: t.trend.clone().unwrap_or_default(),
        }
    });

    let anomaly = payload.anomaly_detection.as_ref().map(|a| AnomalyView {
        status: a.status.clone(),
        badge: if a.status == NORMAL_ANOMALY_STATUS {
            Badge::Positive
        } else {
            Badge::Negative
        },
        issues: a.issues.clone(),
    });

    Ok(AiInsight {
        date: payload.date.clone(),
        actual: analysis.actual,
        predicted: analysis.predicted,
        display_difference,
        highlight,
        summary,
        confidence,
        trend,
        anomaly,
        alerts: payload.alerts.clone(),
        recommendations: payload.recommendations.clone(),
        bagasse_optimization: payload.bagasse_optimization.clone(),
    })
}
