//! CSV export of patrol records.

use chrono::NaiveDate;

use crate::checkpoint::Checklist;
use crate::geo::whole_meters;
use crate::store::PatrolRecord;

/// Header row of the patrol export.
pub const PATROL_CSV_HEADER: [&str; 7] = [
    "Date/Time",
    "Guard",
    "Location",
    "Latitude",
    "Longitude",
    "Distance (m)",
    "Checklist",
];

/// Download file name for one day's export.
pub fn patrol_csv_filename(date: NaiveDate) -> String {
    format!("patrols-{}.csv", date.format("%Y-%m-%d"))
}

/// Escape a value for CSV output.
///
/// Wraps in double-quotes if the value contains a comma, quote, or newline.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// `"Door locked: Yes; Lights off: No"`.
fn checklist_summary(checklist: &Checklist) -> String {
    checklist
        .iter()
        .map(|(item, done)| format!("{item}: {}", if *done { "Yes" } else { "No" }))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Build the CSV body for a list of records, in the given order.
///
/// Coordinates are written to six decimal places and distances in whole
/// meters.
pub fn build_patrol_csv(records: &[PatrolRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(PATROL_CSV_HEADER.join(","));

    for record in records {
        let row = [
            record.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            csv_escape(&record.guard_name),
            csv_escape(&record.checkpoint_name),
            format!("{:.6}", record.latitude),
            format!("{:.6}", record.longitude),
            whole_meters(record.distance_m).to_string(),
            csv_escape(&checklist_summary(&record.checklist)),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}
