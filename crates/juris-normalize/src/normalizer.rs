//! Raw rows to canonical records.

use juris_ingest::{RawSheet, Workbook};
use juris_model::columns;
use juris_model::{
    DetectedSheet, ImportOptions, NormalizedBatch, ProcessoRecord, RowRef, SheetModel,
    TestemunhaRecord,
};

use crate::error::{NormalizeError, Result};
use crate::lists::parse_list;

/// Normalizes every detected sheet of a workbook into canonical records.
///
/// Row-level problems never fail the batch here; they surface later as
/// issues from the rule engine. The only structural failures are an
/// unresolved ambiguous sheet and a detected sheet missing from the
/// workbook.
pub fn normalize(
    sheets: &[DetectedSheet],
    workbook: &Workbook,
    options: &ImportOptions,
) -> Result<NormalizedBatch> {
    let mut batch = NormalizedBatch::default();

    for detected in sheets {
        let raw = workbook
            .sheet(&detected.name)
            .ok_or_else(|| NormalizeError::MissingSheet {
                sheet: detected.name.clone(),
            })?;

        match detected.model {
            SheetModel::Processo => {
                batch
                    .processos
                    .extend(normalize_processos(detected, raw, options));
                // An overlapping header set yields both shapes.
                if has_all(detected, columns::TESTEMUNHA_HEADER_SET) {
                    batch
                        .testemunhas
                        .extend(normalize_testemunhas(detected, raw, options));
                }
            }
            SheetModel::Testemunha => {
                batch
                    .testemunhas
                    .extend(normalize_testemunhas(detected, raw, options));
                if has_all(detected, columns::PROCESSO_HEADER_SET) {
                    batch
                        .processos
                        .extend(normalize_processos(detected, raw, options));
                }
            }
            SheetModel::Ambiguous => {
                return Err(NormalizeError::AmbiguousSheet {
                    sheet: detected.name.clone(),
                });
            }
        }
    }

    tracing::info!(
        processos = batch.processos.len(),
        testemunhas = batch.testemunhas.len(),
        "normalized workbook"
    );
    Ok(batch)
}

fn has_all(sheet: &DetectedSheet, required: &[&str]) -> bool {
    required.iter().all(|c| sheet.has_header(c))
}

fn normalize_processos(
    detected: &DetectedSheet,
    raw: &RawSheet,
    options: &ImportOptions,
) -> Vec<ProcessoRecord> {
    let mut records = Vec::with_capacity(raw.rows.len());

    for row in 0..raw.rows.len() {
        let cnj = identifier_cell(raw, row, columns::CNJ, options);
        let reclamante_limpo = string_cell(raw, row, columns::RECLAMANTE_LIMPO);
        let mut reu_nome = string_cell(raw, row, columns::REU_NOME);

        let mut reu_autofilled = false;
        if reu_nome.is_empty() && options.apply_default_reu {
            if let Some(default) = &options.default_reu_name {
                reu_nome = default.clone();
                reu_autofilled = true;
            }
        }

        records.push(ProcessoRecord {
            cnj,
            reclamante_limpo,
            reu_nome,
            testemunhas_ativo: list_cell(raw, row, columns::TESTEMUNHAS_ATIVO),
            testemunhas_passivo: list_cell(raw, row, columns::TESTEMUNHAS_PASSIVO),
            reu_autofilled,
            source: RowRef {
                sheet: detected.name.clone(),
                row,
            },
        });
    }
    records
}

fn normalize_testemunhas(
    detected: &DetectedSheet,
    raw: &RawSheet,
    options: &ImportOptions,
) -> Vec<TestemunhaRecord> {
    let mut records = Vec::with_capacity(raw.rows.len());

    for row in 0..raw.rows.len() {
        let nome_testemunha = string_cell(raw, row, columns::NOME_TESTEMUNHA);
        let cnjs: Vec<String> = list_cell(raw, row, columns::CNJS_COMO_TESTEMUNHA)
            .into_iter()
            .map(|cnj| standardize(&cnj, options))
            .collect();

        let source = RowRef {
            sheet: detected.name.clone(),
            row,
        };

        if options.explode_lists && !cnjs.is_empty() {
            // One record per list element; each keeps the shared name.
            for cnj in cnjs {
                records.push(TestemunhaRecord {
                    nome_testemunha: nome_testemunha.clone(),
                    cnjs_como_testemunha: vec![cnj],
                    source: source.clone(),
                });
            }
        } else {
            records.push(TestemunhaRecord {
                nome_testemunha,
                cnjs_como_testemunha: cnjs,
                source,
            });
        }
    }
    records
}

/// All string fields are trimmed unconditionally, options or not.
fn string_cell(raw: &RawSheet, row: usize, column: &str) -> String {
    raw.cell(row, column).unwrap_or_default().trim().to_string()
}

fn list_cell(raw: &RawSheet, row: usize, column: &str) -> Vec<String> {
    parse_list(raw.cell(row, column).unwrap_or_default())
}

fn identifier_cell(raw: &RawSheet, row: usize, column: &str, options: &ImportOptions) -> String {
    standardize(&string_cell(raw, row, column), options)
}

/// Strips non-digits from a process number, keeping at most 20 digits.
fn standardize(value: &str, options: &ImportOptions) -> String {
    if !options.standardize_cnj {
        return value.trim().to_string();
    }
    value.chars().filter(char::is_ascii_digit).take(20).collect()
}
