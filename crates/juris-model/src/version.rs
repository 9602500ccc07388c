//! Dataset version state machine.
//!
//! `Draft -> Staged -> Published` is one-way. `Failed` is reachable from
//! Draft or Staged; a superseded published version moves to `Retired` and is
//! kept for audit, never deleted by the pipeline.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Opaque version identifier allocated by the store.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct VersionId(String);

impl VersionId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidVersionId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    Draft,
    Staged,
    Published,
    /// Previously published, superseded by a newer publish.
    Retired,
    Failed,
}

impl VersionStatus {
    /// Legal transitions of the one-way machine.
    pub fn can_transition(self, to: VersionStatus) -> bool {
        use VersionStatus as S;
        matches!(
            (self, to),
            (S::Draft, S::Staged)
                | (S::Staged, S::Published)
                | (S::Published, S::Retired)
                | (S::Draft, S::Failed)
                | (S::Staged, S::Failed)
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Staged => "staged",
            Self::Published => "published",
            Self::Retired => "retired",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub id: VersionId,
    /// Monotonically increasing per store.
    pub number: u64,
    pub status: VersionStatus,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Version {
    /// Validates and applies a status transition.
    pub fn transition(&mut self, to: VersionStatus) -> Result<(), ModelError> {
        if !self.status.can_transition(to) {
            return Err(ModelError::InvalidTransition {
                from: self.status.label().to_string(),
                to: to.label().to_string(),
            });
        }
        self.status = to;
        if to == VersionStatus::Published {
            self.published_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Version {
        Version {
            id: VersionId::new("v-1").unwrap(),
            number: 1,
            status: VersionStatus::Draft,
            created_at: Utc::now(),
            published_at: None,
        }
    }

    #[test]
    fn happy_path_transitions() {
        let mut v = draft();
        v.transition(VersionStatus::Staged).unwrap();
        v.transition(VersionStatus::Published).unwrap();
        assert!(v.published_at.is_some());
        v.transition(VersionStatus::Retired).unwrap();
    }

    #[test]
    fn published_is_immutable_except_retire() {
        let mut v = draft();
        v.transition(VersionStatus::Staged).unwrap();
        v.transition(VersionStatus::Published).unwrap();
        assert!(v.transition(VersionStatus::Draft).is_err());
        assert!(v.transition(VersionStatus::Failed).is_err());
    }

    #[test]
    fn draft_cannot_skip_to_published() {
        let mut v = draft();
        assert!(v.transition(VersionStatus::Published).is_err());
    }

    #[test]
    fn failed_is_reachable_from_both_phases() {
        let mut v = draft();
        assert!(v.status.can_transition(VersionStatus::Failed));
        v.transition(VersionStatus::Staged).unwrap();
        v.transition(VersionStatus::Failed).unwrap();
    }

    #[test]
    fn empty_version_id_rejected() {
        assert!(VersionId::new("  ").is_err());
    }
}
