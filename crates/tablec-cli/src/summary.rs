//! Terminal tables for command results.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use tablec_ingest::{FailedFile, ImportOutcome, SkippedFile};
use tablec_model::RawTable;

use crate::commands::ValidatorInfo;

/// Line drawing of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// Solid inner borders, for the imported tables.
    Boxed,
    /// Condensed rows, for listings and diagnostics.
    Condensed,
}

fn new_table(layout: Layout, headers: &[&str]) -> Table {
    let mut table = Table::new();
    match layout {
        Layout::Boxed => {
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_SOLID_INNER_BORDERS);
        }
        Layout::Condensed => {
            table.load_preset(UTF8_FULL_CONDENSED);
        }
    }
    table
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140)
        .set_header(headers.iter().map(|label| {
            Cell::new(label)
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold)
        }));
    table
}

fn name_cell(name: impl ToString) -> Cell {
    Cell::new(name).fg(Color::Blue).add_attribute(Attribute::Bold)
}

fn muted(value: impl ToString) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

pub fn print_import_summary(outcome: &ImportOutcome) {
    println!("{}", tables_table(&outcome.tables));
    println!(
        "{} table(s), {} skipped, {} failed",
        outcome.tables.len(),
        outcome.skipped.len(),
        outcome.failed.len()
    );
    if !outcome.skipped.is_empty() {
        println!();
        println!("Skipped:");
        println!("{}", skipped_table(&outcome.skipped));
    }
    if !outcome.failed.is_empty() {
        eprintln!();
        eprintln!("Failed:");
        eprintln!("{}", failed_table(&outcome.failed));
    }
}

pub fn print_validators(validators: &[ValidatorInfo]) {
    let mut table = new_table(Layout::Condensed, &["Tag", "Description"]);
    for info in validators {
        table.add_row(vec![name_cell(info.tag), Cell::new(info.description)]);
    }
    println!("{table}");
}

/// Imported tables, one row per table, in import order.
pub fn tables_table(tables: &[RawTable]) -> Table {
    let mut table = new_table(Layout::Boxed, &["Table", "Value Type", "Mode", "Input"]);
    if let Some(mode) = table.column_mut(2) {
        mode.set_cell_alignment(CellAlignment::Center);
    }
    for raw in tables {
        table.add_row(vec![
            name_cell(raw.full_name()),
            Cell::new(&raw.value_type),
            muted(raw.mode),
            Cell::new(raw.input_files.join(", ")),
        ]);
    }
    table
}

/// Files (or single sheets) that produced no table, and why.
pub fn skipped_table(skipped: &[SkippedFile]) -> Table {
    let mut table = new_table(Layout::Condensed, &["File", "Sheet", "Reason"]);
    for entry in skipped {
        table.add_row(vec![
            Cell::new(entry.path.display()),
            entry.sub_unit.as_deref().map_or_else(|| muted("-"), Cell::new),
            muted(entry.reason.as_str()),
        ]);
    }
    table
}

/// Files and directories whose import failed.
pub fn failed_table(failed: &[FailedFile]) -> Table {
    let mut table = new_table(Layout::Condensed, &["Path", "Error"]);
    for entry in failed {
        table.add_row(vec![
            Cell::new(entry.path.display()),
            Cell::new(&entry.error).fg(Color::Red),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use tablec_ingest::SkipReason;

    #[test]
    fn one_row_per_table() {
        let tables = vec![
            RawTable {
                namespace: "item".to_string(),
                name: "TbWeapon".to_string(),
                value_type: "item.Weapon".to_string(),
                input_files: vec!["item/Weapon.xlsx".to_string()],
                ..RawTable::default()
            },
            RawTable {
                name: "TbHero".to_string(),
                value_type: "Hero".to_string(),
                input_files: vec!["Hero.csv".to_string()],
                ..RawTable::default()
            },
        ];
        let table = tables_table(&tables);
        assert_eq!(table.row_count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("item.TbWeapon"));
        assert!(rendered.contains("item/Weapon.xlsx"));
        assert!(rendered.contains("TbHero"));
    }

    #[test]
    fn skipped_sheets_show_their_name() {
        let skipped = vec![
            SkippedFile::new("Notes.xlsx", SkipReason::NameMismatch),
            SkippedFile {
                sub_unit: Some("Draft".to_string()),
                ..SkippedFile::new("items.xlsx", SkipReason::NameMismatch)
            },
        ];
        let rendered = skipped_table(&skipped).to_string();
        assert!(rendered.contains("Draft"));
        assert!(rendered.contains("name does not match pattern"));
    }

    #[test]
    fn failures_list_path_and_error() {
        let failed = vec![FailedFile {
            path: PathBuf::from("data/locked"),
            error: "failed to read directory data/locked".to_string(),
        }];
        let table = failed_table(&failed);
        assert_eq!(table.row_count(), 1);
        assert!(table.to_string().contains("data/locked"));
    }
}
