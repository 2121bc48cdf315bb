//! Rendering and export of a classified acta.
//!
//! Supports a colored terminal table, JSON, and CSV for spreadsheets.

use anyhow::{Context, Result};
use colored::Colorize;
use csv::WriterBuilder;
use std::path::Path;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{debug, info};

use crate::grading::types::{Average, ClassifiedRow, PASSING_GRADE, SLOT_COUNT, SlotValue, Status};
use crate::pipeline::ActaReport;

/// Column headers shared by the table and the CSV export.
pub fn headers() -> Vec<String> {
    let mut headers = vec![
        "Given name".to_string(),
        "Family name".to_string(),
        "Identity".to_string(),
    ];
    headers.extend((1..=SLOT_COUNT).map(|i| format!("C{i}")));
    headers.extend(
        ["Average", "Status", "Observation", "Email"]
            .iter()
            .map(|h| h.to_string()),
    );
    headers
}

fn slot_display(value: &SlotValue) -> String {
    match value {
        SlotValue::Numeric(v) if *v < PASSING_GRADE => value.label().red().to_string(),
        _ => value.label(),
    }
}

fn status_display(status: Status) -> String {
    match status {
        Status::Approved => status.label().green().to_string(),
        Status::Failed => status.label().red().to_string(),
        _ => status.label().to_string(),
    }
}

/// Renders the acta as a terminal table with status and grade coloring.
pub fn render_table(report: &ActaReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers());

    for row in &report.rows {
        let mut cells = vec![
            row.given_name.clone(),
            row.family_name.clone(),
            row.identity.clone(),
        ];
        cells.extend(row.slots.iter().map(slot_display));
        cells.push(row.average.label());
        cells.push(status_display(row.status));
        cells.push(row.observation.label().to_string());
        cells.push(row.email.clone());
        builder.push_record(cells);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    format!(
        "{}\n{} ({})\n{}",
        report.program_version.bold(),
        report.cohort,
        report.rows.len(),
        table
    )
}

fn slot_cell(value: &SlotValue) -> String {
    match value {
        SlotValue::Numeric(v) => v.to_string(),
        other => other.label(),
    }
}

fn average_cell(value: &Average) -> String {
    match value {
        Average::Numeric(v) => v.to_string(),
        Average::Uncalculated => value.label(),
    }
}

/// Spreadsheet cells for one row; numeric values are written unformatted.
pub fn csv_record(row: &ClassifiedRow) -> Vec<String> {
    let mut cells = vec![
        row.given_name.clone(),
        row.family_name.clone(),
        row.identity.clone(),
    ];
    cells.extend(row.slots.iter().map(slot_cell));
    cells.push(average_cell(&row.average));
    cells.push(row.status.label().to_string());
    cells.push(row.observation.label().to_string());
    cells.push(row.email.clone());
    cells
}

/// Writes the acta as CSV to `path`, replacing any existing file.
pub fn write_csv(path: &Path, report: &ActaReport) -> Result<()> {
    debug!(path = %path.display(), rows = report.rows.len(), "Writing CSV export");

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writer.write_record(headers())?;
    for row in &report.rows {
        writer.write_record(csv_record(row))?;
    }
    writer.flush()?;

    Ok(())
}

/// Serializes the whole report as pretty-printed JSON.
pub fn to_json(report: &ActaReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Logs how many students fell in each status.
pub fn log_summary(report: &ActaReport) {
    for (status, count) in report.status_counts() {
        info!(status = status.label(), count, "Status summary");
    }
    info!(
        cohort = %report.cohort,
        students = report.rows.len(),
        file = %report.suggested_filename(),
        "Acta ready"
    );
}
