// Entry point and interactive menu.
//
// - [1] loads the DMR record file and prints load diagnostics.
// - [2] shows the dashboard: KPI cards, resource split and the trend series.
// - [3] opens the report table with date/search filters, paging and export.
// - [4] interprets the AI analysis payload.
// - [5] builds an upload body for a new DMR entry.
// - [6] switches the display language stored in the session.
// - [7] toggles the session's sign-in flag.
use clap::Parser;
use dmr_analytics::config::DomainConstants;
use dmr_analytics::efficiency::classify_with;
use dmr_analytics::error::Result;
use dmr_analytics::insight::{interpret, Badge};
use dmr_analytics::metrics::{kpi_snapshot, resource_distribution};
use dmr_analytics::report::{report_rows, to_csv, ReportQuery};
use dmr_analytics::session::{Language, Session};
use dmr_analytics::submission::SubmissionForm;
use dmr_analytics::trend::{build_series, latest_record, rolling_stats_with};
use dmr_analytics::types::CanonicalRecord;
use dmr_analytics::util::{format_int, format_number, format_signed_percent};
use dmr_analytics::{loader, logging, output};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "dmr-analytics", about = "Sugar factory DMR analytics")]
struct Cli {
    /// DMR records (.json API feed or .csv)
    #[arg(long, default_value = "dmr_data.json")]
    data: PathBuf,

    /// AI analysis payload (.json)
    #[arg(long, default_value = "ai_analysis.json")]
    analysis: PathBuf,

    /// Optional JSON file overriding domain constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Session file holding language preference and sign-in flag
    #[arg(long, default_value = "session.json")]
    session: PathBuf,
}

/// Everything the menu handlers share, passed explicitly.
struct App {
    cli: Cli,
    constants: DomainConstants,
    session: Session,
    records: Option<Vec<CanonicalRecord>>,
}

/// One trimmed line, or `None` once the input is closed or unreadable.
fn read_line_from<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut buf = String::new();
    match reader.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Print `label` and read one trimmed line from stdin.
fn prompt(label: &str) -> Option<String> {
    print!("{}", label);
    let _ = io::stdout().flush();
    read_line_from(&mut io::stdin().lock())
}

fn read_choice() -> Option<String> {
    prompt("Enter choice: ")
}

impl App {
    fn records(&self) -> Option<&[CanonicalRecord]> {
        match &self.records {
            Some(r) => Some(r.as_slice()),
            None => {
                println!("Error: No data loaded. Please load the DMR file first (option 1).\n");
                None
            }
        }
    }

    fn handle_load(&mut self) {
        match loader::load_records(&self.cli.data) {
            Ok((data, report)) => {
                println!(
                    "Processing dataset... ({} rows read, {} loaded)",
                    format_int(report.total_rows as u64),
                    format_int(report.loaded_rows as u64)
                );
                if report.parse_errors > 0 {
                    println!(
                        "Note: {} rows skipped due to parse errors.",
                        format_int(report.parse_errors as u64)
                    );
                }
                if report.defaulted_fields > 0 {
                    println!(
                        "Info: {} malformed values defaulted to 0.",
                        format_int(report.defaulted_fields as u64)
                    );
                }
                println!();
                self.records = Some(data);
            }
            Err(e) => {
                error!(error = %e, "load failed");
                eprintln!("Data unavailable: {}\n", e);
            }
        }
    }

    fn handle_dashboard(&self) {
        let Some(records) = self.records() else { return };
        let Some(latest) = latest_record(records) else {
            println!("No data.\n");
            return;
        };

        let kpi = kpi_snapshot(latest, &self.constants);
        println!("Dashboard ({})\n", kpi.crush_date);
        output::preview_table_rows(&kpi.rows(), 16);

        println!("Resource Distribution");
        for share in resource_distribution(latest, &self.constants) {
            println!("  {:<9} {} Tons", share.name, format_number(share.tons, 0));
        }
        println!();

        let series = build_series(records);
        println!("Daily Crushing vs Sugar / Recovery Trend");
        output::preview_table_rows(&series, series.len());

        let stats = rolling_stats_with(&series, &self.constants);
        match (stats.avg_recovery, stats.deviation, stats.direction) {
            (Some(avg), Some(dev), Some(dir)) => println!(
                "{}-day avg recovery: {:.2} %  deviation: {}  trend: {}\n",
                stats.points,
                avg,
                format_signed_percent(dev),
                dir
            ),
            _ => println!("Recovery trend: no data\n"),
        }
    }

    fn handle_reports(&self) {
        let Some(records) = self.records() else { return };
        let mut query = ReportQuery::new(self.constants.page_size);
        loop {
            let page = query.run(records);
            let rows = report_rows(&page.rows, &self.constants);
            output::preview_table_rows(&rows, rows.len());
            println!("Page {} of {}", page.page, page.display_total());
            println!("[n] Next  [p] Prev  [d] Date filter  [s] Search  [e] Export CSV  [b] Back");
            let Some(choice) = read_choice() else { break };
            match choice.as_str() {
                "n" => query.next_page(records),
                "p" => query.prev_page(),
                "d" => match prompt("Date (YYYY-MM-DD, empty to clear): ") {
                    Some(date) => query.set_date_filter(&date),
                    None => break,
                },
                "s" => match prompt("Search cane, sugar, recovery: ") {
                    Some(term) => query.set_search_term(&term),
                    None => break,
                },
                "e" => self.export(&query.filtered(records)),
                "b" => break,
                _ => println!("Invalid choice."),
            }
            println!();
        }
    }

    fn export(&self, records: &[CanonicalRecord]) {
        let file = "dmr_report.csv";
        match to_csv(records).and_then(|csv| output::write_text(file, &csv)) {
            Ok(()) => println!("(Exported {} rows to {})", records.len(), file),
            Err(e) => eprintln!("Write error: {}", e),
        }
    }

    fn handle_analysis(&self) {
        let insight = match loader::load_analysis(&self.cli.analysis).and_then(|p| interpret(&p)) {
            Ok(i) => i,
            Err(e) => {
                error!(error = %e, "AI analysis failed");
                println!("Failed to load AI Analysis\n");
                return;
            }
        };

        println!("AI Analysis - DMR Optimization\n");
        if let Some(c) = &insight.confidence {
            println!("Recovery Confidence: {} ({} %) - {}", c.level, c.score, c.reason);
        }
        println!(
            "Actual {:.2} %  Predicted {:.2} %  Difference {} [{}]",
            insight.actual,
            insight.predicted,
            format_signed_percent(insight.display_difference),
            insight.highlight.as_str()
        );
        println!("{}", insight.summary);
        if let Some(t) = &insight.trend {
            println!(
                "Recovery Trend (7 Days) {} avg {} deviation {} [{}] {}",
                t.arrow.glyph(),
                t.avg_7d,
                t.deviation,
                t.deviation_highlight.as_str(),
                t.label
            );
        }
        if let Some(a) = &insight.anomaly {
            let badge = if a.badge == Badge::Positive { "ok" } else { "!!" };
            println!("Anomaly Detection [{}] {}", badge, a.status);
            for issue in &a.issues {
                println!("  - {}", issue);
            }
        }
        if insight.has_alerts() {
            for alert in &insight.alerts {
                println!("Warning: {}", alert);
            }
        } else {
            println!("No critical alerts");
        }
        for r in &insight.recommendations {
            println!("Action: {}", r);
        }
        println!();
    }

    fn handle_upload(&self) -> Result<()> {
        // Closed input leaves the remaining fields empty; the date check
        // below rejects a form without a crush date.
        let ask = |label: &str| prompt(label).unwrap_or_default();
        let form = SubmissionForm {
            crush_date: ask("Crush date (YYYY-MM-DD): "),
            gross_cane: ask("Gross Cane (Tons): "),
            total_sugar: ask("Total Sugar (Tons): "),
            recovery_pct: ask("Expected Recovery (%): "),
            working_hours: ask("Working Hours: "),
            bagasse_pct: ask("Bagasse (%): "),
            factory_id: None,
        };
        let body = form.build()?;
        let status = classify_with(body.nexpected_recovery_prc_cane, &self.constants);
        let file = "dmr_upload.json";
        output::write_json(file, &body)?;
        println!("Upload body saved to {} (efficiency: {})\n", file, status);
        Ok(())
    }

    fn handle_language(&mut self) -> Result<()> {
        for (i, lang) in Language::ALL.iter().enumerate() {
            println!("[{}] {}", i + 1, lang.display_name());
        }
        let picked = read_choice()
            .and_then(|c| c.parse::<usize>().ok())
            .and_then(|i| Language::ALL.get(i.wrapping_sub(1)).copied());
        match picked {
            Some(lang) => {
                self.session.set_language(lang);
                self.session.save_if_dirty(&self.cli.session)?;
                println!("Language: {}\n", lang.display_name());
            }
            None => println!("Invalid choice.\n"),
        }
        Ok(())
    }

    fn handle_sign_in_out(&mut self) -> Result<()> {
        if self.session.authenticated {
            self.session.sign_out();
            println!("Signed out.\n");
        } else {
            self.session.sign_in();
            println!("Signed in.\n");
        }
        self.session.save_if_dirty(&self.cli.session)?;
        Ok(())
    }
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    let constants = match DomainConstants::load_or_default(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    let session = Session::load(&cli.session).unwrap_or_else(|e| {
        error!(error = %e, "session unreadable, starting fresh");
        Session::default()
    });

    let mut app = App {
        cli,
        constants,
        session,
        records: None,
    };

    loop {
        let who = if app.session.authenticated { "signed in" } else { "signed out" };
        println!("DMR Analytics ({}, {})", app.session.language.display_name(), who);
        println!("[1] Load DMR data");
        println!("[2] Dashboard");
        println!("[3] Reports");
        println!("[4] AI Analysis");
        println!("[5] Upload DMR");
        println!("[6] Language");
        println!("[7] Sign in / Sign out");
        println!("[0] Exit\n");
        let Some(choice) = read_choice() else {
            println!("\nInput closed. Exiting the program.");
            break;
        };
        let result = match choice.as_str() {
            "1" => {
                app.handle_load();
                Ok(())
            }
            "2" => {
                app.handle_dashboard();
                Ok(())
            }
            "3" => {
                app.handle_reports();
                Ok(())
            }
            "4" => {
                app.handle_analysis();
                Ok(())
            }
            "5" => app.handle_upload(),
            "6" => app.handle_language(),
            "7" => app.handle_sign_in_out(),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => {
                println!("Invalid choice. Please enter 0-7.\n");
                Ok(())
            }
        };
        if let Err(e) = result {
            eprintln!("Error: {}\n", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn lines_are_trimmed() {
        let mut input = Cursor::new("  2 \nb\n");
        assert_eq!(read_line_from(&mut input).as_deref(), Some("2"));
        assert_eq!(read_line_from(&mut input).as_deref(), Some("b"));
    }

    #[test]
    fn blank_line_is_not_end_of_input() {
        let mut input = Cursor::new("\n");
        assert_eq!(read_line_from(&mut input).as_deref(), Some(""));
        assert_eq!(read_line_from(&mut input), None);
    }

    #[test]
    fn closed_input_reads_none() {
        let mut input = Cursor::new("");
        assert_eq!(read_line_from(&mut input), None);
        assert_eq!(read_line_from(&mut input), None);
    }

    #[test]
    fn unterminated_last_line_is_returned() {
        let mut input = Cursor::new("0");
        assert_eq!(read_line_from(&mut input).as_deref(), Some("0"));
        assert_eq!(read_line_from(&mut input), None);
    }
}
