pub mod columns;
pub mod error;
pub mod issue;
pub mod options;
pub mod record;
pub mod sheet;
pub mod version;

pub use error::{ModelError, Result};
pub use issue::{
    CorrectionSuggestion, CorrectionType, Issue, PublishResult, Severity, ValidationResult,
    ValidationSummary,
};
pub use options::ImportOptions;
pub use record::{NormalizedBatch, NormalizedRecord, ProcessoRecord, RowRef, TestemunhaRecord};
pub use sheet::{DetectedSheet, ImportSession, SheetModel};
pub use version::{Version, VersionId, VersionStatus};
