//! Terminal rendering of the converter: two currency buttons, their pick
//! lists, the result label and the info label.

use super::ui;
use crate::core::currency::CurrencyRecord;
use crate::core::refresh::AppState;
use crate::core::selection::Side;
use anyhow::{Result, anyhow};
use comfy_table::{Cell, Table};
use std::fmt::Display;

/// One row of a pick list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEntry {
    Item {
        index: usize,
        label: String,
        record: CurrencyRecord,
    },
    Divider,
}

/// Builds a pick list: one item per record, with a divider right after the
/// home currency at index 0.
pub fn fill_list(records: &[CurrencyRecord]) -> Vec<ListEntry> {
    let mut entries = Vec::with_capacity(records.len() + 1);
    for (index, record) in records.iter().enumerate() {
        if index == 1 {
            entries.push(ListEntry::Divider);
        }
        entries.push(ListEntry::Item {
            index,
            label: record.display_label(),
            record: record.clone(),
        });
    }
    entries
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    pub left_button: String,
    pub right_button: String,
    pub left_list: Vec<ListEntry>,
    pub right_list: Vec<ListEntry>,
    pub result: String,
    pub info: String,
    pub updated_at: Option<String>,
}

impl View {
    pub fn render(state: &AppState) -> Self {
        let selection = state.selection();
        let result = match state.result() {
            Some(result) => result.to_string(),
            None if state.is_initialized() => "N/A".to_string(),
            None => String::new(),
        };

        Self {
            left_button: selection.left.label.clone(),
            right_button: selection.right.label.clone(),
            left_list: fill_list(state.currencies()),
            right_list: fill_list(state.currencies()),
            result,
            info: state.info().unwrap_or_default().to_string(),
            updated_at: state
                .last_updated()
                .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    pub fn list(&self, side: Side) -> &[ListEntry] {
        match side {
            Side::Left => &self.left_list,
            Side::Right => &self.right_list,
        }
    }

    /// Activates the item shown at `index` in the list for `side`, handing
    /// its record straight to the state.
    pub fn activate(&self, state: &mut AppState, side: Side, index: usize) -> Result<()> {
        let record = self
            .list(side)
            .iter()
            .find_map(|entry| match entry {
                ListEntry::Item {
                    index: i, record, ..
                } if *i == index => Some(record),
                _ => None,
            })
            .ok_or_else(|| anyhow!("No currency at index {} in the {} list", index, side))?;
        state.select(side, record)
    }

    /// Table of the pick list for `side`.
    pub fn list_table(&self, side: Side) -> Table {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("#"),
            ui::header_cell("Currency"),
            ui::header_cell("Code"),
            ui::header_cell("Ratio"),
        ]);

        for entry in self.list(side) {
            match entry {
                ListEntry::Item { index, record, .. } => {
                    table.add_row(vec![
                        ui::number_cell(&index.to_string()),
                        Cell::new(&record.name),
                        Cell::new(&record.char_code),
                        ui::number_cell(&record.ratio),
                    ]);
                }
                ListEntry::Divider => {
                    table.add_row(vec![
                        ui::divider_cell(),
                        ui::divider_cell(),
                        ui::divider_cell(),
                        ui::divider_cell(),
                    ]);
                }
            }
        }
        table
    }

    /// Table with both buttons and the result between them.
    pub fn converter_table(&self) -> Table {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Left"),
            ui::header_cell("Ratio"),
            ui::header_cell("Right"),
        ]);
        let result = match self.result.as_str() {
            "N/A" => None,
            result => Some(result),
        };
        table.add_row(vec![
            Cell::new(&self.left_button),
            ui::result_cell(result),
            Cell::new(&self.right_button),
        ]);
        table
    }
}

impl Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.converter_table())?;
        if !self.info.is_empty() {
            writeln!(f, "{}", ui::style_text(&self.info, ui::StyleType::Error))?;
        }
        if let Some(updated_at) = &self.updated_at {
            writeln!(
                f,
                "{}",
                ui::style_text(&format!("Rates updated at {updated_at}"), ui::StyleType::Subtle)
            )?;
        }
        Ok(())
    }
}
