use crate::types::{CanonicalRecord, RawField, RawRecord};
use crate::util::{parse_date_safe, parse_f64_safe};
use tracing::debug;

/// Coerce one raw field to a finite, non-negative number. Anything missing,
/// unparseable, non-finite or negative becomes `0.0`.
///
/// The second value reports whether a present field had to be defaulted.
fn coerce(field: Option<&RawField>) -> (f64, bool) {
    let parsed = match field {
        None => return (0.0, false),
        Some(RawField::Number(n)) => Some(*n).filter(|v| v.is_finite()),
        Some(RawField::Text(s)) => parse_f64_safe(Some(s.as_str())),
        Some(RawField::Other(serde_json::Value::Null)) => return (0.0, false),
        Some(RawField::Other(_)) => None,
    };
    match parsed {
        Some(v) if v >= 0.0 => (v, false),
        _ => (0.0, true),
    }
}

/// Normalise a raw record. Never fails; the worst case is an all-zero record
/// with an empty crush date.
pub fn normalize(raw: &RawRecord) -> CanonicalRecord {
    normalize_counted(raw).0
}

/// `normalize`, also returning how many present fields were defaulted to zero.
pub fn normalize_counted(raw: &RawRecord) -> (CanonicalRecord, usize) {
    let crush_date = raw
        .crush_date
        .as_ref()
        .map(|f| f.as_text().trim().to_string())
        .unwrap_or_default();
    let crush_day = parse_date_safe(Some(crush_date.as_str()));

    let fields = [
        coerce(raw.gross_cane.as_ref()),
        coerce(raw.total_sugar.as_ref()),
        coerce(raw.recovery_pct.as_ref()),
        coerce(raw.working_hours.as_ref()),
        coerce(raw.bagasse_pct.as_ref()),
    ];
    let defaulted = fields.iter().filter(|(_, d)| *d).count();
    if defaulted > 0 {
        debug!(%crush_date, defaulted, "defaulted malformed fields to zero");
    }

    let record = CanonicalRecord {
        crush_date,
        crush_day,
        gross_cane: fields[0].0,
        total_sugar: fields[1].0,
        recovery_pct: fields[2].0,
        working_hours: fields[3].0,
        bagasse_pct: fields[4].0,
    };
    (record, defaulted)
}
