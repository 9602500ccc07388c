//! Sheet-structure detection.
//!
//! Classification reads only the header row. A sheet matching exactly one of
//! the fixed header sets gets that model; matching both or neither yields
//! `Ambiguous`, which the caller resolves manually via
//! [`DetectedSheet::with_model`].

use juris_model::columns;
use juris_model::{DetectedSheet, SheetModel};

use crate::error::{IngestError, Result};
use crate::workbook::Workbook;

/// Classifies every sheet of a decoded workbook.
///
/// Pure; the workbook is not modified and no I/O happens here. A workbook
/// with zero sheets is a structural error.
pub fn detect(workbook: &Workbook) -> Result<Vec<DetectedSheet>> {
    if workbook.sheets.is_empty() {
        return Err(IngestError::EmptyWorkbook);
    }

    let mut detected = Vec::with_capacity(workbook.sheets.len());
    for sheet in &workbook.sheets {
        let headers: Vec<String> = sheet
            .headers
            .iter()
            .map(|h| columns::canonical_header(h))
            .collect();

        let model = classify(&headers);
        let has_list_column = columns::LIST_COLUMNS
            .iter()
            .any(|c| headers.iter().any(|h| h == c));

        tracing::debug!(sheet = %sheet.name, model = model.label(), "classified sheet");

        detected.push(DetectedSheet {
            name: sheet.name.clone(),
            model,
            headers,
            row_count: sheet.rows.len(),
            has_list_column,
        });
    }
    Ok(detected)
}

/// Superset match against the fixed header sets; extra headers are allowed.
fn classify(headers: &[String]) -> SheetModel {
    let is_processo = contains_all(headers, columns::PROCESSO_HEADER_SET);
    let is_testemunha = contains_all(headers, columns::TESTEMUNHA_HEADER_SET);

    match (is_processo, is_testemunha) {
        (true, false) => SheetModel::Processo,
        (false, true) => SheetModel::Testemunha,
        _ => SheetModel::Ambiguous,
    }
}

fn contains_all(headers: &[String], required: &[&str]) -> bool {
    required.iter().all(|r| headers.iter().any(|h| h == r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::RawSheet;

    fn sheet(name: &str, headers: &[&str]) -> RawSheet {
        RawSheet {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: vec![vec![String::new(); headers.len()]],
        }
    }

    #[test]
    fn processo_headers_classify_processo() {
        let workbook = Workbook {
            sheets: vec![sheet("p", &["CNJ", "Reclamante_Limpo", "Reu_Nome"])],
        };
        let detected = detect(&workbook).unwrap();
        assert_eq!(detected[0].model, SheetModel::Processo);
        assert_eq!(detected[0].row_count, 1);
    }

    #[test]
    fn testemunha_headers_classify_testemunha() {
        let workbook = Workbook {
            sheets: vec![sheet("t", &["Nome_Testemunha", "CNJs_Como_Testemunha"])],
        };
        let detected = detect(&workbook).unwrap();
        assert_eq!(detected[0].model, SheetModel::Testemunha);
        assert!(detected[0].has_list_column);
    }

    #[test]
    fn extra_headers_are_allowed() {
        let workbook = Workbook {
            sheets: vec![sheet(
                "p",
                &["CNJ", "Reclamante_Limpo", "Reu_Nome", "Comarca", "UF"],
            )],
        };
        let detected = detect(&workbook).unwrap();
        assert_eq!(detected[0].model, SheetModel::Processo);
    }

    #[test]
    fn matching_both_sets_is_ambiguous() {
        let workbook = Workbook {
            sheets: vec![sheet(
                "mixed",
                &[
                    "CNJ",
                    "Reclamante_Limpo",
                    "Reu_Nome",
                    "Nome_Testemunha",
                    "CNJs_Como_Testemunha",
                ],
            )],
        };
        let detected = detect(&workbook).unwrap();
        assert_eq!(detected[0].model, SheetModel::Ambiguous);
    }

    #[test]
    fn matching_neither_set_is_ambiguous() {
        let workbook = Workbook {
            sheets: vec![sheet("other", &["Foo", "Bar"])],
        };
        let detected = detect(&workbook).unwrap();
        assert_eq!(detected[0].model, SheetModel::Ambiguous);
    }

    #[test]
    fn header_matching_ignores_case_and_whitespace() {
        let workbook = Workbook {
            sheets: vec![sheet("p", &[" cnj ", "RECLAMANTE_LIMPO", "reu_nome"])],
        };
        let detected = detect(&workbook).unwrap();
        assert_eq!(detected[0].model, SheetModel::Processo);
    }

    #[test]
    fn empty_workbook_is_a_hard_error() {
        let result = detect(&Workbook::default());
        assert!(matches!(result, Err(IngestError::EmptyWorkbook)));
    }
}
