//! Weekly report export
//!
//! CSV carries one column per checklist stage, text mirrors the history
//! screen, and "email" logs the delivery instead of speaking SMTP.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use pmtrack_types::{PM_STAGES, PmRecord};
use pmtrack_util::{format_datetime_compact, format_datetime_full};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const FIXED_HEADERS: [&str; 5] = [
    "Timestamp",
    "User",
    "Zone",
    "TAG Number",
    "Equipment Description",
];

fn report_path(output_dir: &Path, extension: &str, now: DateTime<Local>) -> PathBuf {
    output_dir.join(format!(
        "PM_Report_Weekly_{}.{extension}",
        format_datetime_compact(&now)
    ))
}

/// Export the record set as a CSV report. Returns the written path.
pub fn export_csv(
    records: &[PmRecord],
    output_dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf> {
    let path = report_path(output_dir, "csv", now);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;

    let mut headers: Vec<&str> = FIXED_HEADERS.to_vec();
    headers.extend(PM_STAGES.iter().map(|def| def.name));
    writer.write_record(&headers)?;

    for record in records {
        let mut row = vec![
            format_datetime_full(&record.timestamp),
            record.user.clone(),
            record.zone.to_string(),
            record.tag.to_string(),
            record.description.clone(),
        ];
        for def in PM_STAGES {
            row.push(record.results.get(def.name).unwrap_or("N/A").to_string());
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    info!(path = %path.display(), records = records.len(), "CSV report exported");
    Ok(path)
}

/// Export the record set as a plain-text report. Returns the written path.
pub fn export_text(
    records: &[PmRecord],
    output_dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf> {
    let path = report_path(output_dir, "txt", now);
    let mut file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;

    writeln!(file, "Factory PM Maintenance Weekly Report")?;
    writeln!(file, "Generated on: {}\n", format_datetime_full(&now))?;

    if records.is_empty() {
        writeln!(file, "No PM history available for this period.")?;
    }
    for record in records {
        writeln!(file, "--- PM Record ---")?;
        writeln!(file, "Date/Time: {}", format_datetime_full(&record.timestamp))?;
        writeln!(file, "User: {}", record.user)?;
        writeln!(file, "Zone: {}", record.zone)?;
        writeln!(file, "TAG: {}", record.tag)?;
        writeln!(file, "Description: {}", record.description)?;
        writeln!(file, "PM Data:")?;
        for (stage, value) in record.results.ordered() {
            writeln!(file, "  - {}: {}", stage, value.unwrap_or("N/A"))?;
        }
        writeln!(file, "-------------------\n")?;
    }

    info!(path = %path.display(), records = records.len(), "Text report exported");
    Ok(path)
}

/// Simulated email delivery: exports the CSV and logs where it would go.
/// No SMTP involved.
pub fn email_report(
    records: &[PmRecord],
    output_dir: &Path,
    address: &str,
    now: DateTime<Local>,
) -> Result<PathBuf> {
    let path = export_csv(records, output_dir, now)?;
    info!(
        to = address,
        attachment = %path.display(),
        "Weekly report email simulated"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pmtrack_types::{CHOICE_CHECK_MARK, StageKind, StageResults, Zone};
    use pmtrack_util::EquipmentTag;
    use tempfile::TempDir;

    fn record_at(hour: u32) -> PmRecord {
        let mut results = StageResults::new();
        for def in PM_STAGES {
            match def.kind {
                StageKind::Choice { .. } => results.insert(def.name, CHOICE_CHECK_MARK),
                StageKind::Text => results.insert(def.name, "all good"),
            }
        }
        PmRecord {
            user: "User1".into(),
            zone: Zone::Compaction,
            tag: EquipmentTag::new("CMP-03"),
            description: "Roller compactor".into(),
            timestamp: Local.with_ymd_and_hms(2026, 8, 25, hour, 0, 0).unwrap(),
            results,
        }
    }

    #[test]
    fn csv_report_has_stage_columns() {
        let dir = TempDir::new().unwrap();
        let now = Local.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap();

        let path = export_csv(&[record_at(9)], dir.path(), now).unwrap();
        assert_eq!(path.extension().unwrap(), "csv");

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("Timestamp,User,Zone,TAG Number,Equipment Description"));
        assert!(header.ends_with("Sound,Vibration,Heat,Motor umbrella,Status,Note"));

        let row = lines.next().unwrap();
        assert!(row.contains("CMP-03"));
        assert!(row.contains("COMPACTION"));
        assert!(row.contains("2026-08-25 09:00:00"));
    }

    #[test]
    fn missing_stage_answer_becomes_na() {
        let dir = TempDir::new().unwrap();
        let now = Local.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap();

        // A record persisted before a stage was added to the checklist
        let mut record = record_at(9);
        record.results = record
            .results
            .ordered()
            .filter(|(stage, _)| *stage != "Note")
            .filter_map(|(stage, value)| value.map(|v| (stage.to_string(), v.to_string())))
            .collect();

        let path = export_csv(&[record], dir.path(), now).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.lines().nth(1).unwrap().ends_with("N/A"));
    }

    #[test]
    fn text_report_lists_records() {
        let dir = TempDir::new().unwrap();
        let now = Local.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap();

        let path = export_text(&[record_at(9), record_at(14)], dir.path(), now).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();

        assert!(content.starts_with("Factory PM Maintenance Weekly Report"));
        assert_eq!(content.matches("--- PM Record ---").count(), 2);
        assert!(content.contains("  - Status: Check mark"));
    }

    #[test]
    fn empty_text_report_says_so() {
        let dir = TempDir::new().unwrap();
        let now = Local.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap();

        let path = export_text(&[], dir.path(), now).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("No PM history available"));
    }

    #[test]
    fn email_report_writes_the_attachment() {
        let dir = TempDir::new().unwrap();
        let now = Local.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap();

        let path =
            email_report(&[record_at(9)], dir.path(), "maintenance@example.com", now).unwrap();
        assert!(path.exists());
    }
}
