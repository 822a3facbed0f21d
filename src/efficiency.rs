use crate::config::{DomainConstants, HIGH_RECOVERY, MEDIUM_RECOVERY};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EfficiencyStatus {
    High,
    Medium,
    Low,
}

/// Colour family a badge is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    Success,
    Warning,
    Destructive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: &'static str,
    pub tone: Tone,
}

impl EfficiencyStatus {
    pub fn badge(self) -> StatusBadge {
        match self {
            EfficiencyStatus::High => StatusBadge { label: "Excellent", tone: Tone::Success },
            EfficiencyStatus::Medium => StatusBadge { label: "Average", tone: Tone::Warning },
            EfficiencyStatus::Low => StatusBadge { label: "Below Target", tone: Tone::Destructive },
        }
    }
}

impl fmt::Display for EfficiencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EfficiencyStatus::High => "High",
            EfficiencyStatus::Medium => "Medium",
            EfficiencyStatus::Low => "Low",
        };
        f.write_str(s)
    }
}

/// Classify a recovery percentage with the default thresholds.
pub fn classify(recovery_pct: f64) -> EfficiencyStatus {
    classify_between(recovery_pct, HIGH_RECOVERY, MEDIUM_RECOVERY)
}

pub fn classify_with(recovery_pct: f64, constants: &DomainConstants) -> EfficiencyStatus {
    classify_between(recovery_pct, constants.high_recovery, constants.medium_recovery)
}

// NaN compares false everywhere and lands in Low.
fn classify_between(recovery_pct: f64, high: f64, medium: f64) -> EfficiencyStatus {
    if recovery_pct >= high {
        EfficiencyStatus::High
    } else if recovery_pct >= medium {
        EfficiencyStatus::Medium
    } else {
        EfficiencyStatus::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_exact() {
        assert_eq!(classify(10.8), EfficiencyStatus::High);
        assert_eq!(classify(10.79999), EfficiencyStatus::Medium);
        assert_eq!(classify(10.2), EfficiencyStatus::Medium);
        assert_eq!(classify(10.19999), EfficiencyStatus::Low);
    }

    #[test]
    fn implausible_inputs_fall_through_to_low() {
        assert_eq!(classify(-4.0), EfficiencyStatus::Low);
        assert_eq!(classify(f64::NAN), EfficiencyStatus::Low);
        assert_eq!(classify(250.0), EfficiencyStatus::High);
    }

    #[test]
    fn overridden_thresholds() {
        let c = DomainConstants {
            high_recovery: 11.0,
            medium_recovery: 10.5,
            ..DomainConstants::default()
        };
        assert_eq!(classify_with(10.8, &c), EfficiencyStatus::Medium);
        assert_eq!(classify_with(10.4, &c), EfficiencyStatus::Low);
    }

    #[test]
    fn badges() {
        assert_eq!(EfficiencyStatus::High.badge().label, "Excellent");
        assert_eq!(EfficiencyStatus::Medium.badge().tone, Tone::Warning);
        assert_eq!(EfficiencyStatus::Low.badge().label, "Below Target");
        assert_eq!(EfficiencyStatus::Low.to_string(), "Low");
    }
}
