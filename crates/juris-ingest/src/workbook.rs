//! The decoder boundary: raw sheets of string cells.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One decoded sheet: a header row plus data rows of string cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawSheet {
    /// Cell at `(row, column-name)`, matching the header case-insensitively.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self
            .headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(column))?;
        self.rows.get(row)?.get(idx).map(String::as_str)
    }
}

/// A fully decoded workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<RawSheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&RawSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Turns file bytes into named sheets of rows of cells.
///
/// The xlsx/xls decoders live outside this workspace; the shipped
/// implementation is [`crate::CsvDecoder`].
pub trait WorkbookDecoder {
    fn decode(&self, path: &std::path::Path) -> Result<Workbook>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_lookup_is_case_insensitive() {
        let sheet = RawSheet {
            name: "s".to_string(),
            headers: vec!["CNJ".to_string(), "Reu_Nome".to_string()],
            rows: vec![vec!["123".to_string(), "Empresa X".to_string()]],
        };
        assert_eq!(sheet.cell(0, "cnj"), Some("123"));
        assert_eq!(sheet.cell(0, "reu_nome"), Some("Empresa X"));
        assert_eq!(sheet.cell(1, "cnj"), None);
        assert_eq!(sheet.cell(0, "missing"), None);
    }
}
