// Domain constants for the derivation engine.
//
// Every ratio and threshold the engine applies lives here under a name, so a
// factory can override them from a JSON file without touching the code.
use crate::error::{DmrError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Molasses tonnage as a fraction of sugar produced.
pub const MOLASSES_RATIO: f64 = 0.045;
/// Recovery at or above this is `High`.
pub const HIGH_RECOVERY: f64 = 10.8;
/// Recovery at or above this (and below `HIGH_RECOVERY`) is `Medium`.
pub const MEDIUM_RECOVERY: f64 = 10.2;
/// Sugar-loss magnitudes below this are reported as exactly zero.
pub const LOSS_NOISE_FLOOR: f64 = 0.01;
pub const TREND_WINDOW: usize = 7;
pub const PAGE_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConstants {
    pub molasses_ratio: f64,
    pub high_recovery: f64,
    pub medium_recovery: f64,
    pub loss_noise_floor: f64,
    pub trend_window: usize,
    pub page_size: usize,
}

impl Default for DomainConstants {
    fn default() -> Self {
        Self {
            molasses_ratio: MOLASSES_RATIO,
            high_recovery: HIGH_RECOVERY,
            medium_recovery: MEDIUM_RECOVERY,
            loss_noise_floor: LOSS_NOISE_FLOOR,
            trend_window: TREND_WINDOW,
            page_size: PAGE_SIZE,
        }
    }
}

impl DomainConstants {
    /// Load overrides from a JSON file. Fields absent from the file keep
    /// their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let constants: DomainConstants = serde_json::from_str(&text)?;
        constants.validate()?;
        info!(path = %path.display(), ?constants, "loaded domain constants");
        Ok(constants)
    }

    /// `load` when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.medium_recovery > self.high_recovery {
            return Err(DmrError::InvalidConfig(format!(
                "medium_recovery ({}) exceeds high_recovery ({})",
                self.medium_recovery, self.high_recovery
            )));
        }
        if self.trend_window == 0 || self.page_size == 0 {
            return Err(DmrError::InvalidConfig(
                "trend_window and page_size must be positive".to_string(),
            ));
        }
        if !self.molasses_ratio.is_finite() || !self.loss_noise_floor.is_finite() {
            return Err(DmrError::InvalidConfig(
                "ratios must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_named_constants() {
        let c = DomainConstants::default();
        assert_eq!(c.molasses_ratio, 0.045);
        assert_eq!(c.high_recovery, 10.8);
        assert_eq!(c.medium_recovery, 10.2);
        assert_eq!(c.page_size, 8);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"high_recovery": 11.0, "page_size": 10}}"#).unwrap();
        let c = DomainConstants::load(f.path()).unwrap();
        assert_eq!(c.high_recovery, 11.0);
        assert_eq!(c.page_size, 10);
        assert_eq!(c.medium_recovery, MEDIUM_RECOVERY);
        assert_eq!(c.trend_window, TREND_WINDOW);
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let c = DomainConstants {
            medium_recovery: 11.5,
            ..DomainConstants::default()
        };
        assert!(matches!(c.validate(), Err(DmrError::InvalidConfig(_))));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let c = DomainConstants {
            page_size: 0,
            ..DomainConstants::default()
        };
        assert!(c.validate().is_err());
    }
}
