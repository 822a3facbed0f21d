// Report table: date/text filtering, paging and the flat CSV export.
use crate::config::DomainConstants;
use crate::efficiency::classify_with;
use crate::error::Result;
use crate::types::{CanonicalRecord, ExportRow, ReportRow};
use crate::util::format_plain;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::debug;

/// Keep records whose crush date equals `date_filter` (when given) and whose
/// cane, sugar or recovery value contains the trimmed `search_term`.
pub fn filter(
    records: &[CanonicalRecord],
    date_filter: Option<&str>,
    search_term: Option<&str>,
) -> Vec<CanonicalRecord> {
    let date = date_filter.unwrap_or("");
    let search = search_term.unwrap_or("").trim();
    let out: Vec<CanonicalRecord> = records
        .iter()
        .filter(|r| date.is_empty() || r.crush_date == date)
        .filter(|r| {
            search.is_empty()
                || [r.gross_cane, r.total_sugar, r.recovery_pct]
                    .iter()
                    .any(|v| format_plain(*v).contains(search))
        })
        .cloned()
        .collect();
    debug!(input = records.len(), output = out.len(), date, search, "filtered records");
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    /// 1-based page actually served.
    pub page: usize,
    /// `ceil(count / page_size)`; zero when there is nothing to show.
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Page count as displayed ("Page 1 of 1" for an empty table).
    pub fn display_total(&self) -> usize {
        self.total_pages.max(1)
    }
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Slice out one page. Pages below 1 are served as page 1; pages past the end
/// come back empty.
pub fn paginate<T: Clone>(records: &[T], page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let total = total_pages(records.len(), page_size);
    let start = (page - 1).saturating_mul(page_size);
    let rows = records
        .iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect();
    Page {
        rows,
        page,
        total_pages: total,
    }
}

fn export_row(r: &CanonicalRecord) -> ExportRow {
    ExportRow {
        date: r.crush_date.clone(),
        cane_crushed: format_plain(r.gross_cane),
        sugar_produced: format_plain(r.total_sugar),
        recovery: format_plain(r.recovery_pct),
    }
}

/// One header line plus one unquoted four-column line per record, joined
/// with `\n` and no trailing newline.
pub fn to_csv(records: &[CanonicalRecord]) -> Result<String> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(["Date", "Cane Crushed", "Sugar Produced", "Recovery %"])?;
    for r in records {
        wtr.serialize(export_row(r))?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

pub fn report_rows(records: &[CanonicalRecord], constants: &DomainConstants) -> Vec<ReportRow> {
    records
        .iter()
        .map(|r| ReportRow {
            date: r.crush_date.clone(),
            cane_crushed: format_plain(r.gross_cane),
            sugar_produced: format_plain(r.total_sugar),
            recovery: format_plain(r.recovery_pct),
            status: classify_with(r.recovery_pct, constants).to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Idle,
    Filtering,
    Paginated,
}

/// Filter and paging inputs for the report table. Changing either filter
/// input sends the view back to page 1.
#[derive(Debug, Clone)]
pub struct ReportQuery {
    date_filter: String,
    search_term: String,
    page: usize,
    page_size: usize,
    state: QueryState,
}

impl ReportQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            date_filter: String::new(),
            search_term: String::new(),
            page: 1,
            page_size: page_size.max(1),
            state: QueryState::Idle,
        }
    }

    pub fn state(&self) -> QueryState {
        self.state
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn date_filter(&self) -> &str {
        &self.date_filter
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_date_filter(&mut self, date: &str) {
        self.date_filter = date.trim().to_string();
        self.page = 1;
        self.state = QueryState::Filtering;
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.page = 1;
        self.state = QueryState::Filtering;
    }

    pub fn filtered(&self, records: &[CanonicalRecord]) -> Vec<CanonicalRecord> {
        filter(records, Some(&self.date_filter), Some(&self.search_term))
    }

    /// Apply the filters and serve the current page.
    pub fn run(&mut self, records: &[CanonicalRecord]) -> Page<CanonicalRecord> {
        let filtered = self.filtered(records);
        self.state = QueryState::Paginated;
        paginate(&filtered, self.page, self.page_size)
    }

    /// Advance one page, never past the last one.
    pub fn next_page(&mut self, records: &[CanonicalRecord]) {
        let last = total_pages(self.filtered(records).len(), self.page_size).max(1);
        self.page = (self.page + 1).min(last);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }
}
