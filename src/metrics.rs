// Per-record derived quantities: by-product tonnage and AI-expected sugar.
//
// Values are returned at full precision; rounding is left to whoever renders
// them.
use crate::config::DomainConstants;
use crate::efficiency::{classify_with, EfficiencyStatus};
use crate::types::{CanonicalRecord, KpiRow};
use crate::util::{format_number, suppress_noise};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub bagasse_tons: f64,
    pub molasses_tons: f64,
    pub expected_sugar: f64,
    /// Expected minus actual sugar; negative means output beat expectation.
    pub sugar_loss: f64,
}

pub fn derive(record: &CanonicalRecord, constants: &DomainConstants) -> DerivedMetrics {
    let bagasse_tons = (record.bagasse_pct * record.gross_cane) / 100.0;
    let molasses_tons = record.total_sugar * constants.molasses_ratio;
    let expected_sugar = (record.gross_cane * record.recovery_pct) / 100.0;
    let sugar_loss = suppress_noise(expected_sugar - record.total_sugar, constants.loss_noise_floor);
    debug!(date = %record.crush_date, bagasse_tons, molasses_tons, expected_sugar, sugar_loss, "derived metrics");
    DerivedMetrics {
        bagasse_tons,
        molasses_tons,
        expected_sugar,
        sugar_loss,
    }
}

/// Headline figures for the dashboard cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub crush_date: String,
    pub cane_crushed: f64,
    pub sugar_produced: f64,
    pub recovery_pct: f64,
    pub metrics: DerivedMetrics,
    pub status: EfficiencyStatus,
}

pub fn kpi_snapshot(record: &CanonicalRecord, constants: &DomainConstants) -> KpiSnapshot {
    KpiSnapshot {
        crush_date: record.crush_date.clone(),
        cane_crushed: record.gross_cane,
        sugar_produced: record.total_sugar,
        recovery_pct: record.recovery_pct,
        metrics: derive(record, constants),
        status: classify_with(record.recovery_pct, constants),
    }
}

impl KpiSnapshot {
    /// Display rows in card order; tonnage rounded the way the cards show it.
    pub fn rows(&self) -> Vec<KpiRow> {
        let row = |kpi: &str, value: String, unit: &str| KpiRow {
            kpi: kpi.to_string(),
            value,
            unit: unit.to_string(),
        };
        vec![
            row("Cane Crushed", format_number(self.cane_crushed, 0), "Tons"),
            row("Sugar Produced", format_number(self.sugar_produced, 0), "Tons"),
            row("Recovery", format!("{:.2}", self.recovery_pct), "%"),
            row("Bagasse", format_number(self.metrics.bagasse_tons, 0), "Tons"),
            row("Molasses", format_number(self.metrics.molasses_tons, 0), "Tons"),
            row("AI Expected Sugar", format_number(self.metrics.expected_sugar, 2), "Tons"),
            row("Sugar Loss", format_number(self.metrics.sugar_loss, 2), "Tons"),
            row("Efficiency", self.status.badge().label.to_string(), ""),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceShare {
    pub name: &'static str,
    pub tons: f64,
}

/// Sugar, bagasse and molasses tonnage for one record, in chart order.
pub fn resource_distribution(record: &CanonicalRecord, constants: &DomainConstants) -> Vec<ResourceShare> {
    let m = derive(record, constants);
    vec![
        ResourceShare { name: "Sugar", tons: record.total_sugar },
        ResourceShare { name: "Bagasse", tons: m.bagasse_tons },
        ResourceShare { name: "Molasses", tons: m.molasses_tons },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cane: f64, sugar: f64, recovery: f64, bagasse: f64) -> CanonicalRecord {
        CanonicalRecord {
            crush_date: "2024-12-30".to_string(),
            crush_day: None,
            gross_cane: cane,
            total_sugar: sugar,
            recovery_pct: recovery,
            working_hours: 22.0,
            bagasse_pct: bagasse,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn derives_industry_quantities() {
        let m = derive(&record(4520.0, 485.0, 10.8, 30.0), &DomainConstants::default());
        assert!(close(m.bagasse_tons, 1356.0));
        assert!(close(m.molasses_tons, 21.825));
        assert!(close(m.expected_sugar, 488.16));
        assert!(close(m.sugar_loss, 3.16));
    }

    #[test]
    fn zero_cane_reads_as_full_gain() {
        let m = derive(&record(0.0, 120.0, 10.5, 30.0), &DomainConstants::default());
        assert_eq!(m.bagasse_tons, 0.0);
        assert_eq!(m.expected_sugar, 0.0);
        assert!(close(m.sugar_loss, -120.0));
    }

    #[test]
    fn tiny_loss_is_exactly_zero() {
        let m = derive(&record(1000.0, 99.996, 10.0, 0.0), &DomainConstants::default());
        assert_eq!(m.sugar_loss, 0.0);

        let m = derive(&record(1000.0, 100.004, 10.0, 0.0), &DomainConstants::default());
        assert_eq!(m.sugar_loss, 0.0);
    }

    #[test]
    fn derivation_is_repeatable() {
        let r = record(4380.0, 472.0, 10.8, 29.5);
        let c = DomainConstants::default();
        assert_eq!(derive(&r, &c), derive(&r, &c));
    }

    #[test]
    fn bagasse_never_negative_for_non_negative_inputs() {
        let c = DomainConstants::default();
        for (cane, pct) in [(0.0, 0.0), (4520.0, 0.0), (0.0, 31.0), (1.5, 140.0)] {
            assert!(derive(&record(cane, 0.0, 0.0, pct), &c).bagasse_tons >= 0.0);
        }
    }

    #[test]
    fn overridden_molasses_ratio() {
        let c = DomainConstants {
            molasses_ratio: 0.05,
            ..DomainConstants::default()
        };
        assert!(close(derive(&record(0.0, 200.0, 0.0, 0.0), &c).molasses_tons, 10.0));
    }

    #[test]
    fn snapshot_and_distribution() {
        let r = record(4520.0, 485.0, 10.8, 30.0);
        let c = DomainConstants::default();
        let kpi = kpi_snapshot(&r, &c);
        assert_eq!(kpi.status, EfficiencyStatus::High);
        let rows = kpi.rows();
        assert_eq!(rows[0].value, "4,520");
        assert_eq!(rows[2].value, "10.80");
        assert_eq!(rows[3].value, "1,356");
        assert_eq!(rows.last().map(|r| r.value.as_str()), Some("Excellent"));

        let dist = resource_distribution(&r, &c);
        let names: Vec<_> = dist.iter().map(|s| s.name).collect();
        assert_eq!(names, ["Sugar", "Bagasse", "Molasses"]);
        assert_eq!(dist[0].tons, 485.0);
    }
}
