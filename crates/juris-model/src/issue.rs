//! Validation findings, correction suggestions, and result aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{NormalizedBatch, RowRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    /// The only severity that blocks publish.
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// A single validation finding, cell-addressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub sheet: String,
    /// Zero-based data row index.
    pub row: usize,
    pub column: String,
    pub severity: Severity,
    /// Stable rule identifier, e.g. `cnj_invalido`.
    pub rule: String,
    /// Offending cell value as seen after normalization.
    pub value: String,
    /// True when the cell was filled from a caller-supplied default.
    pub autofilled: bool,
}

impl Issue {
    /// Deterministic ordering key used by the final reducer.
    pub fn sort_key(&self) -> (&str, usize, &str, &str) {
        (&self.sheet, self.row, &self.column, &self.rule)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionType {
    /// Strip formatting characters from a CNJ whose digits already validate.
    StripFormatting,
    /// Recompute the check-digit pair of a 20-digit CNJ.
    RecomputeCheckDigits,
    /// Fill a missing party name from the configured default.
    FillDefaultReu,
}

/// A proposed fix for a specific finding. Never applied implicitly; the
/// caller passes accepted suggestions to `apply_corrections`, which produces
/// a fresh batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionSuggestion {
    pub row: RowRef,
    pub field: String,
    pub original_value: String,
    pub corrected_value: String,
    pub correction_type: CorrectionType,
    pub reason: String,
    /// Opaque score in `[0, 1]`. Identical input yields an identical score.
    pub confidence: f64,
}

/// Per-run counts. `valid` counts rows, the severity fields count issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub analyzed: usize,
    /// Rows carrying no error-severity issue.
    pub valid: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

/// Outcome of one evaluation pass. Recomputed wholesale on every pass, never
/// patched in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub summary: ValidationSummary,
    pub issues: Vec<Issue>,
    pub corrections: Vec<CorrectionSuggestion>,
    pub batch: NormalizedBatch,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// Whether the batch may be staged and published as-is.
    pub fn publishable(&self) -> bool {
        self.summary.valid > 0
    }
}

/// The only publish-side shape downstream consumers depend on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishResult {
    pub version_number: u64,
    pub imported_count: usize,
    pub published_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Error).unwrap();
        assert_eq!(json, "\"error\"");
    }

    #[test]
    fn issue_sort_key_orders_by_cell_then_rule() {
        let a = Issue {
            sheet: "s".to_string(),
            row: 1,
            column: "cnj".to_string(),
            severity: Severity::Error,
            rule: "cnj_invalido".to_string(),
            value: "x".to_string(),
            autofilled: false,
        };
        let mut b = a.clone();
        b.row = 0;
        assert!(b.sort_key() < a.sort_key());
    }
}
