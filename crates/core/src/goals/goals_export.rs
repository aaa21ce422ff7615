//! CSV export of a goal's failure logs.
//!
//! Pure presentation artifact: carries no state, reads are newest-first as
//! delivered by the store.

use chrono::Local;
use csv::{QuoteStyle, WriterBuilder};

use super::goals_model::FailureLog;
use crate::errors::{Error, Result};

/// Header row of the export.
pub const EXPORT_HEADERS: [&str; 3] = ["Date", "What Happened", "What I Learned"];

/// Renders `logs` as CSV with every field double-quoted and internal quotes
/// doubled (standard CSV escaping). Dates are formatted as local time in the
/// same `M/D/YYYY, h:MM:SS AM/PM` shape the UI shows.
pub fn export_logs_csv(logs: &[FailureLog]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADERS)?;
    for log in logs {
        let date = log
            .created_at
            .with_timezone(&Local)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string();
        writer.write_record([date.as_str(), &log.description, &log.learned_from])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Unexpected(format!("CSV writer flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Unexpected(e.to_string()))
}
