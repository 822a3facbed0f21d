// Chronological trend series and rolling recovery statistics.
//
// The backend hands records over newest-first. The series is built by
// reversing that order and then sorting by the parsed crush date, so a
// shuffled feed still charts left to right in time.
use crate::config::DomainConstants;
use crate::types::{CanonicalRecord, TrendPoint};
use crate::util::{mean, suppress_noise};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendDirection::Improving => "Improving",
            TrendDirection::Declining => "Declining",
            TrendDirection::Stable => "Stable",
        };
        f.write_str(s)
    }
}

/// Records oldest to newest.
///
/// When every crush date parses, a stable date sort follows the reversal;
/// otherwise the reversed fetch order is kept as-is.
pub fn chronological(records: &[CanonicalRecord]) -> Vec<&CanonicalRecord> {
    let mut ordered: Vec<&CanonicalRecord> = records.iter().rev().collect();
    if ordered.iter().all(|r| r.crush_day.is_some()) {
        ordered.sort_by_key(|r| r.crush_day);
    } else {
        let unparsed = ordered.iter().filter(|r| r.crush_day.is_none()).count();
        warn!(unparsed, "crush dates did not parse, keeping reversed fetch order");
    }
    ordered
}

pub fn build_series(records: &[CanonicalRecord]) -> Vec<TrendPoint> {
    let series: Vec<TrendPoint> = chronological(records)
        .into_iter()
        .map(|r| TrendPoint {
            date: r.crush_date.clone(),
            crushing: r.gross_cane,
            sugar: r.total_sugar,
            recovery: r.recovery_pct,
        })
        .collect();
    debug!(points = series.len(), "built trend series");
    series
}

/// The newest record by the same ordering the series uses.
pub fn latest_record(records: &[CanonicalRecord]) -> Option<&CanonicalRecord> {
    chronological(records).last().copied()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingStats {
    /// How many points the window actually covered.
    pub points: usize,
    pub avg_recovery: Option<f64>,
    pub current_recovery: Option<f64>,
    /// Current minus window average.
    pub deviation: Option<f64>,
    pub direction: Option<TrendDirection>,
}

impl RollingStats {
    pub fn has_data(&self) -> bool {
        self.points > 0
    }
}

/// Recovery statistics over the last `window` points of an ascending series.
/// Short series use every point available; an empty series reports no data.
/// A zero `window` is treated as one point.
pub fn rolling_stats(series: &[TrendPoint], window: usize, noise_floor: f64) -> RollingStats {
    let start = series.len().saturating_sub(window.max(1));
    let tail: Vec<f64> = series[start..].iter().map(|p| p.recovery).collect();

    let Some(avg) = mean(&tail) else {
        return RollingStats {
            points: 0,
            avg_recovery: None,
            current_recovery: None,
            deviation: None,
            direction: None,
        };
    };
    let current = tail[tail.len() - 1];
    let deviation = suppress_noise(current - avg, noise_floor);
    let direction = if deviation > 0.0 {
        TrendDirection::Improving
    } else if deviation < 0.0 {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };
    RollingStats {
        points: tail.len(),
        avg_recovery: Some(avg),
        current_recovery: Some(current),
        deviation: Some(deviation),
        direction: Some(direction),
    }
}

pub fn rolling_stats_with(series: &[TrendPoint], constants: &DomainConstants) -> RollingStats {
    rolling_stats(series, constants.trend_window, constants.loss_noise_floor)
}
