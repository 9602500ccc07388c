//! Canonical normalized records.
//!
//! The two record shapes are closed: the detector decides once which shape a
//! sheet yields, and nothing downstream re-infers fields per cell.

use serde::{Deserialize, Serialize};

/// Back-reference to the source cell grid, kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowRef {
    pub sheet: String,
    /// Zero-based data row index (header row excluded).
    pub row: usize,
}

/// One legal proceeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessoRecord {
    pub cnj: String,
    pub reclamante_limpo: String,
    pub reu_nome: String,
    #[serde(default)]
    pub testemunhas_ativo: Vec<String>,
    #[serde(default)]
    pub testemunhas_passivo: Vec<String>,
    /// True when `reu_nome` was filled from the caller-supplied default.
    #[serde(default)]
    pub reu_autofilled: bool,
    pub source: RowRef,
}

/// One witness, with the CNJs they appear in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestemunhaRecord {
    pub nome_testemunha: String,
    /// One element per CNJ. In exploded mode each record holds exactly one.
    pub cnjs_como_testemunha: Vec<String>,
    pub source: RowRef,
}

/// Tagged union over the two canonical shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NormalizedRecord {
    Processo(ProcessoRecord),
    Testemunha(TestemunhaRecord),
}

impl NormalizedRecord {
    pub fn source(&self) -> &RowRef {
        match self {
            Self::Processo(r) => &r.source,
            Self::Testemunha(r) => &r.source,
        }
    }
}

/// Output of the normalizer: rows partitioned by canonical shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBatch {
    pub processos: Vec<ProcessoRecord>,
    pub testemunhas: Vec<TestemunhaRecord>,
}

impl NormalizedBatch {
    pub fn is_empty(&self) -> bool {
        self.processos.is_empty() && self.testemunhas.is_empty()
    }

    /// Total number of normalized rows across both shapes.
    pub fn len(&self) -> usize {
        self.processos.len() + self.testemunhas.len()
    }

    pub fn merge(&mut self, other: NormalizedBatch) {
        self.processos.extend(other.processos);
        self.testemunhas.extend(other.testemunhas);
    }

    /// Flattens the batch into tagged records, processos first. The order is
    /// deterministic so staging chunks are stable across retries.
    pub fn to_records(&self) -> Vec<NormalizedRecord> {
        let mut records = Vec::with_capacity(self.len());
        records.extend(
            self.processos
                .iter()
                .cloned()
                .map(NormalizedRecord::Processo),
        );
        records.extend(
            self.testemunhas
                .iter()
                .cloned()
                .map(NormalizedRecord::Testemunha),
        );
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_union_serializes_with_kind() {
        let record = NormalizedRecord::Testemunha(TestemunhaRecord {
            nome_testemunha: "Maria Souza".to_string(),
            cnjs_como_testemunha: vec!["00012345620245010001".to_string()],
            source: RowRef {
                sheet: "Por Testemunha".to_string(),
                row: 0,
            },
        });
        let json = serde_json::to_string(&record).expect("serialize record");
        assert!(json.contains("\"kind\":\"testemunha\""));
    }

    #[test]
    fn batch_len_counts_both_partitions() {
        let mut batch = NormalizedBatch::default();
        batch.testemunhas.push(TestemunhaRecord {
            nome_testemunha: "A".to_string(),
            cnjs_como_testemunha: vec![],
            source: RowRef {
                sheet: "s".to_string(),
                row: 0,
            },
        });
        assert_eq!(batch.len(), 1);
        assert!(!batch.is_empty());
    }
}
