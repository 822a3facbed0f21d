use dmr_analytics::config::DomainConstants;
use dmr_analytics::efficiency::EfficiencyStatus;
use dmr_analytics::insight::Highlight;
use dmr_analytics::loader::records_from_json;
use dmr_analytics::metrics::kpi_snapshot;
use dmr_analytics::report::{filter, paginate, to_csv};
use dmr_analytics::trend::{build_series, latest_record, rolling_stats_with};
use dmr_analytics::{interpret, logging, AiPayload, DmrError};

const FEED: &str = r#"{"data": [
    {"dcrush_date":"2024-12-30","nday_gross_cane":"4520","total_sugar":"485","nexpected_recovery_prc_cane":"10.8","nworking_hrs":"24","nbagasse_prc_cane":"30"},
    {"dcrush_date":"2024-12-29","nday_gross_cane":4420,"total_sugar":478,"nexpected_recovery_prc_cane":10.8,"nworking_hrs":24,"nbagasse_prc_cane":29.5},
    {"dcrush_date":"2024-12-28","nday_gross_cane":4500,"total_sugar":490,"nexpected_recovery_prc_cane":10.9,"nworking_hrs":24,"nbagasse_prc_cane":30},
    {"dcrush_date":"2024-12-27","nday_gross_cane":4100,"total_sugar":438,"nexpected_recovery_prc_cane":10.7,"nworking_hrs":23,"nbagasse_prc_cane":31},
    {"dcrush_date":"2024-12-26","nday_gross_cane":4350,"total_sugar":468,"nexpected_recovery_prc_cane":10.8,"nworking_hrs":24,"nbagasse_prc_cane":30},
    {"dcrush_date":"2024-12-25","nday_gross_cane":4200,"total_sugar":450,"nexpected_recovery_prc_cane":10.7,"nworking_hrs":22,"nbagasse_prc_cane":30},
    {"dcrush_date":"2024-12-24","nday_gross_cane":4150,"total_sugar":445,"nexpected_recovery_prc_cane":10.7,"nworking_hrs":22,"nbagasse_prc_cane":30},
    {"dcrush_date":"2024-12-23","nday_gross_cane":4300,"total_sugar":462,"nexpected_recovery_prc_cane":10.1,"nworking_hrs":21,"nbagasse_prc_cane":30},
    {"dcrush_date":"2024-12-22","nday_gross_cane":4450,"total_sugar":480,"nexpected_recovery_prc_cane":10.8,"nworking_hrs":24,"nbagasse_prc_cane":30},
    {"dcrush_date":"2024-12-21","nday_gross_cane":4380,"total_sugar":472,"nexpected_recovery_prc_cane":10.8,"nworking_hrs":24,"nbagasse_prc_cane":30}
]}"#;

#[test]
fn dashboard_flow_over_api_feed() {
    logging::init_test();
    let constants = DomainConstants::default();
    let (records, report) = records_from_json(FEED).unwrap();
    assert_eq!(report.loaded_rows, 10);
    assert_eq!(report.defaulted_fields, 0);

    let latest = latest_record(&records).unwrap();
    assert_eq!(latest.crush_date, "2024-12-30");
    let kpi = kpi_snapshot(latest, &constants);
    assert_eq!(kpi.status, EfficiencyStatus::High);
    assert!((kpi.metrics.bagasse_tons - 1356.0).abs() < 1e-9);

    let series = build_series(&records);
    assert_eq!(series.len(), 10);
    assert_eq!(series.first().map(|p| p.date.as_str()), Some("2024-12-21"));
    assert_eq!(series.last().map(|p| p.date.as_str()), Some("2024-12-30"));
    assert!(series.windows(2).all(|w| w[0].date < w[1].date));

    let stats = rolling_stats_with(&series, &constants);
    assert_eq!(stats.points, 7);
    // 2024-12-24 through 2024-12-30.
    assert!((stats.avg_recovery.unwrap() - 75.4 / 7.0).abs() < 1e-9);
    assert_eq!(stats.current_recovery, Some(10.8));
}

#[test]
fn report_flow_filters_pages_and_exports() {
    let (records, _) = records_from_json(FEED).unwrap();

    let all = filter(&records, None, None);
    let first = paginate(&all, 1, 8);
    let second = paginate(&all, 2, 8);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.rows.len(), 8);
    assert_eq!(second.rows.len(), 2);

    let hit = filter(&records, None, Some("4520"));
    assert_eq!(hit.len(), 1);
    assert_eq!(hit[0].crush_date, "2024-12-30");
    assert_eq!(filter(&records, Some("2024-12-29"), None)[0].gross_cane, 4420.0);
    assert!(filter(&records, Some("2025-01-01"), Some("4520")).is_empty());

    let csv = to_csv(&records[..2]).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| l.split(',').count() == 4));
}

#[test]
fn ai_flow_success_and_failure() {
    let ok: AiPayload = serde_json::from_str(
        r#"{"status":"success","date":"2024-12-30",
            "recovery_analysis":{"actual":10.5,"predicted":10.2,"difference":-0.3},
            "alerts":[],"recommendations":["Maintain imbibition rate"]}"#,
    )
    .unwrap();
    let insight = interpret(&ok).unwrap();
    assert!((insight.display_difference - 0.3).abs() < 1e-9);
    assert_eq!(insight.highlight, Highlight::Good);
    assert!(!insight.has_alerts());

    let failed: AiPayload = serde_json::from_str(r#"{"status":"failed"}"#).unwrap();
    assert!(matches!(
        interpret(&failed),
        Err(DmrError::AnalysisUnavailable { .. })
    ));
}
