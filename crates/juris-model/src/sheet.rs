//! Sheet classification and import session types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical record shape a spreadsheet tab represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetModel {
    Processo,
    Testemunha,
    /// Matched both header sets, or neither. The caller must resolve the
    /// model manually before normalization.
    Ambiguous,
}

impl SheetModel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Processo => "processo",
            Self::Testemunha => "testemunha",
            Self::Ambiguous => "ambiguous",
        }
    }
}

impl std::fmt::Display for SheetModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified sheet. Immutable after detection; an ambiguous sheet is
/// resolved by building a copy via [`DetectedSheet::with_model`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedSheet {
    pub name: String,
    pub model: SheetModel,
    /// Header row in original order, canonicalized (trimmed, lower-cased).
    pub headers: Vec<String>,
    pub row_count: usize,
    pub has_list_column: bool,
}

impl DetectedSheet {
    /// Returns a copy with the model resolved externally.
    ///
    /// Used for ambiguous sheets; detection is not re-run.
    #[must_use]
    pub fn with_model(&self, model: SheetModel) -> Self {
        Self {
            model,
            ..self.clone()
        }
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }
}

/// Provenance for one uploaded workbook. Created once per file and never
/// mutated; `session_id` doubles as the staging dedup token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSession {
    pub file_name: String,
    pub file_size: u64,
    pub sheets: Vec<DetectedSheet>,
    pub uploaded_at: DateTime<Utc>,
    /// Hex SHA-256 over the workbook content, see `juris-publish::checksum`.
    pub session_id: String,
}

impl ImportSession {
    pub fn sheet(&self, name: &str) -> Option<&DetectedSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_model_overrides_without_touching_headers() {
        let sheet = DetectedSheet {
            name: "Por Processo".to_string(),
            model: SheetModel::Ambiguous,
            headers: vec!["cnj".to_string(), "reu_nome".to_string()],
            row_count: 3,
            has_list_column: false,
        };
        let resolved = sheet.with_model(SheetModel::Processo);
        assert_eq!(resolved.model, SheetModel::Processo);
        assert_eq!(resolved.headers, sheet.headers);
        assert_eq!(resolved.row_count, 3);
    }
}
