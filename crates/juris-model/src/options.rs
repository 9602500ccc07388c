//! Caller-supplied options for normalization and evaluation.

use serde::{Deserialize, Serialize};

/// Options recognized by the normalizer and the issue engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Emit one record per list element instead of one record holding the
    /// whole array.
    pub explode_lists: bool,

    /// Strip all non-digit characters from process-number fields.
    pub standardize_cnj: bool,

    /// Fill a missing defendant name from `default_reu_name`.
    pub apply_default_reu: bool,

    /// Run the correction-suggestion pass alongside evaluation.
    pub intelligent_corrections: bool,

    /// Fallback defendant name used when `apply_default_reu` is set.
    pub default_reu_name: Option<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            explode_lists: true,
            standardize_cnj: true,
            apply_default_reu: false,
            intelligent_corrections: false,
            default_reu_name: None,
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_explode_lists(mut self, enable: bool) -> Self {
        self.explode_lists = enable;
        self
    }

    #[must_use]
    pub fn with_standardize_cnj(mut self, enable: bool) -> Self {
        self.standardize_cnj = enable;
        self
    }

    #[must_use]
    pub fn with_default_reu(mut self, name: impl Into<String>) -> Self {
        self.apply_default_reu = true;
        self.default_reu_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_intelligent_corrections(mut self, enable: bool) -> Self {
        self.intelligent_corrections = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_corrections_off() {
        let opts = ImportOptions::default();
        assert!(opts.explode_lists);
        assert!(opts.standardize_cnj);
        assert!(!opts.apply_default_reu);
        assert!(!opts.intelligent_corrections);
    }

    #[test]
    fn with_default_reu_enables_the_flag() {
        let opts = ImportOptions::new().with_default_reu("Reu Desconhecido");
        assert!(opts.apply_default_reu);
        assert_eq!(opts.default_reu_name.as_deref(), Some("Reu Desconhecido"));
    }
}
