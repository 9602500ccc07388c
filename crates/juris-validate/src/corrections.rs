//! Best-effort correction suggestions.
//!
//! Suggestions never mutate the evaluated batch. Confidence is an opaque
//! score; it is a fixed constant per correction type so identical input
//! always produces the identical suggestion.

use juris_model::columns;
use juris_model::{
    CorrectionSuggestion, CorrectionType, ImportOptions, NormalizedBatch, RowRef,
};

use crate::cnj;

/// Confidence for stripping formatting from an already-valid number.
const CONFIDENCE_STRIP: f64 = 0.95;
/// Confidence for recomputing a bad check-digit pair.
const CONFIDENCE_RECHECK: f64 = 0.60;
/// Confidence for filling a missing party name from the default.
const CONFIDENCE_FILL: f64 = 0.50;

/// Scans a batch for recoverable problems and proposes fixes.
pub fn suggest_corrections(
    batch: &NormalizedBatch,
    options: &ImportOptions,
) -> Vec<CorrectionSuggestion> {
    let mut suggestions = Vec::new();

    for record in &batch.processos {
        if !record.cnj.is_empty() {
            if let Some(s) = suggest_cnj_fix(&record.source, columns::CNJ, &record.cnj) {
                suggestions.push(s);
            }
        }

        if record.reu_nome.is_empty() {
            if let Some(default) = &options.default_reu_name {
                suggestions.push(CorrectionSuggestion {
                    row: record.source.clone(),
                    field: columns::REU_NOME.to_string(),
                    original_value: String::new(),
                    corrected_value: default.clone(),
                    correction_type: CorrectionType::FillDefaultReu,
                    reason: "campo vazio; preenchido com o reu padrao configurado".to_string(),
                    confidence: CONFIDENCE_FILL,
                });
            }
        }
    }

    for record in &batch.testemunhas {
        for element in &record.cnjs_como_testemunha {
            if !element.is_empty() {
                if let Some(s) =
                    suggest_cnj_fix(&record.source, columns::CNJS_COMO_TESTEMUNHA, element)
                {
                    suggestions.push(s);
                }
            }
        }
    }

    suggestions.sort_by(|a, b| {
        (&a.row, &a.field, &a.original_value).cmp(&(&b.row, &b.field, &b.original_value))
    });
    suggestions.dedup_by(|a, b| {
        a.row == b.row && a.field == b.field && a.original_value == b.original_value
    });
    suggestions
}

/// A fix for a malformed-but-salvageable process number, when one exists.
///
/// Returns `None` when the value is already canonical and valid, or when it
/// is too mangled to fix deterministically.
fn suggest_cnj_fix(row: &RowRef, field: &str, value: &str) -> Option<CorrectionSuggestion> {
    let digits = cnj::canonical_digits(value);
    if digits.len() != cnj::CNJ_LEN {
        return None;
    }

    if cnj::is_valid(&digits) {
        if digits == value {
            return None;
        }
        // The digits are fine; only formatting characters are in the way.
        return Some(CorrectionSuggestion {
            row: row.clone(),
            field: field.to_string(),
            original_value: value.to_string(),
            corrected_value: digits,
            correction_type: CorrectionType::StripFormatting,
            reason: "numero valido apos remover formatacao".to_string(),
            confidence: CONFIDENCE_STRIP,
        });
    }

    let body = cnj::body_of(&digits);
    let check = cnj::check_digits(&body)?;
    Some(CorrectionSuggestion {
        row: row.clone(),
        field: field.to_string(),
        original_value: value.to_string(),
        corrected_value: cnj::assemble(&body, &check),
        correction_type: CorrectionType::RecomputeCheckDigits,
        reason: "digito verificador recalculado".to_string(),
        confidence: CONFIDENCE_RECHECK,
    })
}

/// Applies accepted suggestions, producing a fresh batch.
///
/// The input batch is untouched; callers re-run `evaluate` on the result.
#[must_use]
pub fn apply_corrections(
    batch: &NormalizedBatch,
    accepted: &[CorrectionSuggestion],
) -> NormalizedBatch {
    let mut out = batch.clone();

    for suggestion in accepted {
        match suggestion.field.as_str() {
            columns::CNJ => {
                for record in &mut out.processos {
                    if record.source == suggestion.row && record.cnj == suggestion.original_value {
                        record.cnj = suggestion.corrected_value.clone();
                    }
                }
            }
            columns::REU_NOME => {
                for record in &mut out.processos {
                    if record.source == suggestion.row && record.reu_nome.is_empty() {
                        record.reu_nome = suggestion.corrected_value.clone();
                    }
                }
            }
            columns::CNJS_COMO_TESTEMUNHA => {
                for record in &mut out.testemunhas {
                    if record.source != suggestion.row {
                        continue;
                    }
                    for element in &mut record.cnjs_como_testemunha {
                        if *element == suggestion.original_value {
                            *element = suggestion.corrected_value.clone();
                        }
                    }
                }
            }
            other => {
                tracing::warn!(field = other, "ignoring correction for unknown field");
            }
        }
    }
    out
}
