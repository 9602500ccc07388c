//! The issue engine: per-row rule execution and deterministic aggregation.
//!
//! Every rule runs for every row; nothing short-circuits. Malformed cells
//! degrade to error issues and evaluation continues. Only the sheet-level
//! column pre-check aborts the run.

use juris_model::columns;
use juris_model::{
    DetectedSheet, ImportOptions, Issue, NormalizedBatch, ProcessoRecord, Severity, SheetModel,
    TestemunhaRecord, ValidationResult, ValidationSummary,
};

use crate::cnj;
use crate::corrections::suggest_corrections;
use crate::error::{Result, ValidateError};
use crate::rules;

/// Evaluates a normalized batch against the row-level rule set.
///
/// The result is recomputed wholesale; running twice on identical input
/// produces identical issues and summary.
pub fn evaluate(
    sheets: &[DetectedSheet],
    batch: &NormalizedBatch,
    options: &ImportOptions,
) -> Result<ValidationResult> {
    check_sheet_columns(sheets)?;

    let mut issues = Vec::new();
    let mut invalid_records = 0usize;

    for record in &batch.processos {
        let before = issues.len();
        evaluate_processo(record, &mut issues);
        if has_error(&issues[before..]) {
            invalid_records += 1;
        }
    }
    for record in &batch.testemunhas {
        let before = issues.len();
        evaluate_testemunha(record, &mut issues);
        if has_error(&issues[before..]) {
            invalid_records += 1;
        }
    }

    // Single deterministic reducer: discovery order never leaks into the
    // result.
    issues.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let analyzed = batch.len();
    let summary = ValidationSummary {
        analyzed,
        valid: analyzed - invalid_records,
        errors: count(&issues, Severity::Error),
        warnings: count(&issues, Severity::Warning),
        infos: count(&issues, Severity::Info),
    };

    let corrections = if options.intelligent_corrections {
        suggest_corrections(batch, options)
    } else {
        Vec::new()
    };

    tracing::info!(
        analyzed = summary.analyzed,
        valid = summary.valid,
        errors = summary.errors,
        warnings = summary.warnings,
        "evaluated batch"
    );

    Ok(ValidationResult {
        summary,
        issues,
        corrections,
        batch: batch.clone(),
    })
}

/// Filters a batch down to the rows the publisher may stage.
///
/// Uses the same per-record rules as [`evaluate`], so the filtered row count
/// always equals the summary's `valid` count.
#[must_use]
pub fn publishable(batch: &NormalizedBatch) -> NormalizedBatch {
    let mut scratch = Vec::new();
    let mut out = NormalizedBatch::default();

    for record in &batch.processos {
        scratch.clear();
        evaluate_processo(record, &mut scratch);
        if !has_error(&scratch) {
            out.processos.push(record.clone());
        }
    }
    for record in &batch.testemunhas {
        scratch.clear();
        evaluate_testemunha(record, &mut scratch);
        if !has_error(&scratch) {
            out.testemunhas.push(record.clone());
        }
    }
    out
}

/// Header-set pre-check against the declared model. Runs before any per-row
/// rule; a mismatch aborts the run naming the missing columns.
fn check_sheet_columns(sheets: &[DetectedSheet]) -> Result<()> {
    for sheet in sheets {
        let required: &[&str] = match sheet.model {
            SheetModel::Processo => columns::PROCESSO_HEADER_SET,
            SheetModel::Testemunha => columns::TESTEMUNHA_HEADER_SET,
            SheetModel::Ambiguous => continue,
        };
        let missing: Vec<String> = required
            .iter()
            .filter(|c| !sheet.has_header(c))
            .map(|c| (*c).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ValidateError::MissingColumns {
                sheet: sheet.name.clone(),
                columns: missing,
            });
        }
    }
    Ok(())
}

fn evaluate_processo(record: &ProcessoRecord, issues: &mut Vec<Issue>) {
    if record.cnj.is_empty() {
        issues.push(issue(
            record,
            columns::CNJ,
            Severity::Error,
            rules::CAMPO_OBRIGATORIO,
            "",
            false,
        ));
    } else if !cnj::is_valid(&record.cnj) {
        issues.push(issue(
            record,
            columns::CNJ,
            Severity::Error,
            rules::CNJ_INVALIDO,
            &record.cnj,
            false,
        ));
    }

    if record.reclamante_limpo.is_empty() {
        issues.push(issue(
            record,
            columns::RECLAMANTE_LIMPO,
            Severity::Error,
            rules::CAMPO_OBRIGATORIO,
            "",
            false,
        ));
    }

    if record.reu_nome.is_empty() {
        issues.push(issue(
            record,
            columns::REU_NOME,
            Severity::Error,
            rules::CAMPO_OBRIGATORIO,
            "",
            false,
        ));
    } else if record.reu_autofilled {
        issues.push(issue(
            record,
            columns::REU_NOME,
            Severity::Info,
            rules::REU_PREENCHIDO_PADRAO,
            &record.reu_nome,
            true,
        ));
    }
}

fn evaluate_testemunha(record: &TestemunhaRecord, issues: &mut Vec<Issue>) {
    if record.nome_testemunha.is_empty() {
        issues.push(witness_issue(
            record,
            columns::NOME_TESTEMUNHA,
            Severity::Error,
            rules::CAMPO_OBRIGATORIO,
            "",
        ));
    }

    if record.cnjs_como_testemunha.is_empty() {
        issues.push(witness_issue(
            record,
            columns::CNJS_COMO_TESTEMUNHA,
            Severity::Error,
            rules::LISTA_CNJ_VAZIA,
            "",
        ));
        return;
    }

    let canonical = record
        .cnjs_como_testemunha
        .iter()
        .any(|c| cnj::canonical_digits(c).len() == cnj::CNJ_LEN);
    if !canonical {
        issues.push(witness_issue(
            record,
            columns::CNJS_COMO_TESTEMUNHA,
            Severity::Error,
            rules::LISTA_SEM_CNJ_CANONICO,
            &record.cnjs_como_testemunha.join(";"),
        ));
        return;
    }

    for element in &record.cnjs_como_testemunha {
        if cnj::canonical_digits(element).len() == cnj::CNJ_LEN && !cnj::is_valid(element) {
            issues.push(witness_issue(
                record,
                columns::CNJS_COMO_TESTEMUNHA,
                Severity::Warning,
                rules::CNJ_DIGITO_VERIFICADOR,
                element,
            ));
        }
    }
}

fn issue(
    record: &ProcessoRecord,
    column: &str,
    severity: Severity,
    rule: &str,
    value: &str,
    autofilled: bool,
) -> Issue {
    Issue {
        sheet: record.source.sheet.clone(),
        row: record.source.row,
        column: column.to_string(),
        severity,
        rule: rule.to_string(),
        value: value.to_string(),
        autofilled,
    }
}

fn witness_issue(
    record: &TestemunhaRecord,
    column: &str,
    severity: Severity,
    rule: &str,
    value: &str,
) -> Issue {
    Issue {
        sheet: record.source.sheet.clone(),
        row: record.source.row,
        column: column.to_string(),
        severity,
        rule: rule.to_string(),
        value: value.to_string(),
        autofilled: false,
    }
}

fn has_error(issues: &[Issue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

fn count(issues: &[Issue], severity: Severity) -> usize {
    issues.iter().filter(|i| i.severity == severity).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use juris_model::RowRef;

    fn processo_sheet() -> DetectedSheet {
        DetectedSheet {
            name: "p".to_string(),
            model: SheetModel::Processo,
            headers: columns::PROCESSO_HEADER_SET
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
            row_count: 0,
            has_list_column: false,
        }
    }

    fn processo(row: usize, cnj_value: &str) -> ProcessoRecord {
        ProcessoRecord {
            cnj: cnj_value.to_string(),
            reclamante_limpo: "Joao".to_string(),
            reu_nome: "Empresa X".to_string(),
            testemunhas_ativo: vec![],
            testemunhas_passivo: vec![],
            reu_autofilled: false,
            source: RowRef {
                sheet: "p".to_string(),
                row,
            },
        }
    }

    fn valid_cnj() -> String {
        let body = "000123420245010001";
        crate::cnj::assemble(body, &crate::cnj::check_digits(body).unwrap())
    }

    fn testemunha(row: usize, cnjs: &[&str]) -> TestemunhaRecord {
        TestemunhaRecord {
            nome_testemunha: "Maria".to_string(),
            cnjs_como_testemunha: cnjs.iter().map(|c| (*c).to_string()).collect(),
            source: RowRef {
                sheet: "t".to_string(),
                row,
            },
        }
    }

    #[test]
    fn invalid_check_digits_yield_one_error_on_cnj() {
        let batch = NormalizedBatch {
            processos: vec![processo(0, "00012345620245010001")],
            testemunhas: vec![],
        };
        let result = evaluate(&[processo_sheet()], &batch, &ImportOptions::default()).unwrap();

        assert_eq!(result.summary.analyzed, 1);
        assert_eq!(result.summary.valid, 0);
        assert_eq!(result.summary.errors, 1);
        assert_eq!(result.issues[0].column, columns::CNJ);
        assert_eq!(result.issues[0].rule, rules::CNJ_INVALIDO);
    }

    #[test]
    fn valid_rows_count_as_valid() {
        let batch = NormalizedBatch {
            processos: vec![processo(0, &valid_cnj()), processo(1, "bad")],
            testemunhas: vec![],
        };
        let result = evaluate(&[processo_sheet()], &batch, &ImportOptions::default()).unwrap();

        assert_eq!(result.summary.analyzed, 2);
        assert_eq!(result.summary.valid, 1);
    }

    #[test]
    fn partition_completeness_holds_with_mixed_severities() {
        let mut autofilled = processo(2, &valid_cnj());
        autofilled.reu_autofilled = true;
        let batch = NormalizedBatch {
            processos: vec![processo(0, "bad"), processo(1, &valid_cnj()), autofilled],
            testemunhas: vec![testemunha(0, &[]), testemunha(1, &["A", "B"])],
        };
        let result = evaluate(&[processo_sheet()], &batch, &ImportOptions::default()).unwrap();

        let error_rows = result.summary.analyzed - result.summary.valid;
        assert_eq!(result.summary.analyzed, error_rows + result.summary.valid);
        // bad cnj, empty list, list without canonical element
        assert_eq!(error_rows, 3);
        assert_eq!(result.summary.infos, 1);
    }

    #[test]
    fn empty_required_list_is_an_error() {
        let batch = NormalizedBatch {
            processos: vec![],
            testemunhas: vec![testemunha(0, &[])],
        };
        let result = evaluate(&[], &batch, &ImportOptions::default()).unwrap();
        assert_eq!(result.issues[0].rule, rules::LISTA_CNJ_VAZIA);
        assert_eq!(result.summary.valid, 0);
    }

    #[test]
    fn list_without_canonical_element_is_an_error() {
        let batch = NormalizedBatch {
            processos: vec![],
            testemunhas: vec![testemunha(0, &["123", "456"])],
        };
        let result = evaluate(&[], &batch, &ImportOptions::default()).unwrap();
        assert_eq!(result.issues[0].rule, rules::LISTA_SEM_CNJ_CANONICO);
    }

    #[test]
    fn twenty_digit_element_with_bad_check_is_a_warning() {
        let batch = NormalizedBatch {
            processos: vec![],
            testemunhas: vec![testemunha(0, &["00012345620245010001"])],
        };
        let result = evaluate(&[], &batch, &ImportOptions::default()).unwrap();
        assert_eq!(result.summary.errors, 0);
        assert_eq!(result.summary.warnings, 1);
        assert_eq!(result.summary.valid, 1);
    }

    #[test]
    fn missing_required_column_aborts_before_rows() {
        let sheet = DetectedSheet {
            name: "p".to_string(),
            model: SheetModel::Processo,
            headers: vec![columns::CNJ.to_string()],
            row_count: 1,
            has_list_column: false,
        };
        let result = evaluate(&[sheet], &NormalizedBatch::default(), &ImportOptions::default());
        match result {
            Err(ValidateError::MissingColumns { sheet, columns }) => {
                assert_eq!(sheet, "p");
                assert_eq!(
                    columns,
                    vec!["reclamante_limpo".to_string(), "reu_nome".to_string()]
                );
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn publishable_rows_match_valid_count() {
        let batch = NormalizedBatch {
            processos: vec![processo(0, "bad"), processo(1, &valid_cnj())],
            testemunhas: vec![testemunha(0, &[]), testemunha(1, &["x", "y"])],
        };
        let result = evaluate(&[processo_sheet()], &batch, &ImportOptions::default()).unwrap();
        let filtered = publishable(&batch);
        assert_eq!(filtered.len(), result.summary.valid);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let batch = NormalizedBatch {
            processos: vec![processo(1, "bad"), processo(0, &valid_cnj())],
            testemunhas: vec![testemunha(0, &["x"])],
        };
        let options = ImportOptions::default().with_intelligent_corrections(true);
        let first = evaluate(&[processo_sheet()], &batch, &options).unwrap();
        let second = evaluate(&[processo_sheet()], &batch, &options).unwrap();
        assert_eq!(first, second);
    }
}
