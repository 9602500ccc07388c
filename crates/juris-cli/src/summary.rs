//! Terminal summary tables.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use juris_model::{
    DetectedSheet, PublishResult, Severity, SheetModel, ValidationResult, Version, VersionId,
    VersionStatus,
};

pub fn print_validation(sheets: &[DetectedSheet], result: &ValidationResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Model"),
        header_cell("Rows"),
        header_cell("Lists"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for sheet in sheets {
        table.add_row(vec![
            Cell::new(&sheet.name),
            model_cell(sheet.model),
            Cell::new(sheet.row_count),
            Cell::new(if sheet.has_list_column { "yes" } else { "-" }),
        ]);
    }
    println!("{table}");

    let summary = &result.summary;
    println!(
        "Analyzed: {}  Valid: {}  Errors: {}  Warnings: {}  Infos: {}",
        summary.analyzed, summary.valid, summary.errors, summary.warnings, summary.infos
    );

    print_issue_table(result);
    print_correction_table(result);
}

fn print_issue_table(result: &ValidationResult) {
    if result.issues.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Row"),
        header_cell("Column"),
        header_cell("Severity"),
        header_cell("Rule"),
        header_cell("Value"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for issue in &result.issues {
        table.add_row(vec![
            Cell::new(&issue.sheet),
            Cell::new(issue.row),
            Cell::new(&issue.column),
            severity_cell(issue.severity),
            Cell::new(&issue.rule),
            Cell::new(truncate(&issue.value, 40)),
        ]);
    }
    println!("{table}");
}

fn print_correction_table(result: &ValidationResult) {
    if result.corrections.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Row"),
        header_cell("Field"),
        header_cell("Original"),
        header_cell("Suggested"),
        header_cell("Confidence"),
        header_cell("Reason"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for suggestion in &result.corrections {
        table.add_row(vec![
            Cell::new(&suggestion.row.sheet),
            Cell::new(suggestion.row.row),
            Cell::new(&suggestion.field),
            Cell::new(truncate(&suggestion.original_value, 30)),
            Cell::new(truncate(&suggestion.corrected_value, 30)),
            Cell::new(format!("{:.0}%", suggestion.confidence * 100.0)),
            Cell::new(&suggestion.reason),
        ]);
    }
    println!("{table}");
}

pub fn print_publish(result: &PublishResult) {
    println!(
        "Published version {} with {} records at {}",
        result.version_number,
        result.imported_count,
        result.published_at.to_rfc3339()
    );
}

pub fn print_versions(versions: &[Version], active: Option<&VersionId>) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Version"),
        header_cell("Number"),
        header_cell("Status"),
        header_cell("Created"),
        header_cell("Published"),
        header_cell("Active"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    for version in versions {
        let is_active = active == Some(&version.id);
        table.add_row(vec![
            Cell::new(version.id.as_str()),
            Cell::new(version.number),
            status_cell(version.status),
            Cell::new(version.created_at.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(
                version
                    .published_at
                    .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            if is_active {
                Cell::new("*").fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                Cell::new("")
            },
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn model_cell(model: SheetModel) -> Cell {
    match model {
        SheetModel::Processo => Cell::new("processo").fg(Color::Blue),
        SheetModel::Testemunha => Cell::new("testemunha").fg(Color::Magenta),
        SheetModel::Ambiguous => Cell::new("ambiguous").fg(Color::Yellow),
    }
}

fn severity_cell(severity: Severity) -> Cell {
    let cell = Cell::new(severity.label());
    match severity {
        Severity::Error => cell.fg(Color::Red),
        Severity::Warning => cell.fg(Color::Yellow),
        Severity::Info => cell.fg(Color::Grey),
    }
}

fn status_cell(status: VersionStatus) -> Cell {
    let cell = Cell::new(status.label());
    match status {
        VersionStatus::Published => cell.fg(Color::Green),
        VersionStatus::Staged => cell.fg(Color::Cyan),
        VersionStatus::Draft => cell.fg(Color::Grey),
        VersionStatus::Retired => cell.fg(Color::DarkGrey),
        VersionStatus::Failed => cell.fg(Color::Red),
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let head: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
