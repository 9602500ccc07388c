//! Canonical column names shared by the detector, normalizer and rule engine.
//!
//! Header matching is always performed on the lower-cased, trimmed form.

/// Witness name column.
pub const NOME_TESTEMUNHA: &str = "nome_testemunha";
/// List of CNJs in which the witness appears.
pub const CNJS_COMO_TESTEMUNHA: &str = "cnjs_como_testemunha";
/// Process number column.
pub const CNJ: &str = "cnj";
/// Cleaned claimant name column.
pub const RECLAMANTE_LIMPO: &str = "reclamante_limpo";
/// Defendant name column.
pub const REU_NOME: &str = "reu_nome";
/// Witness list for the active pole of a processo.
pub const TESTEMUNHAS_ATIVO: &str = "testemunhas_ativo";
/// Witness list for the passive pole of a processo.
pub const TESTEMUNHAS_PASSIVO: &str = "testemunhas_passivo";

/// Headers whose presence marks a sheet as a testemunha sheet.
pub const TESTEMUNHA_HEADER_SET: &[&str] = &[NOME_TESTEMUNHA, CNJS_COMO_TESTEMUNHA];

/// Headers whose presence marks a sheet as a processo sheet.
pub const PROCESSO_HEADER_SET: &[&str] = &[CNJ, RECLAMANTE_LIMPO, REU_NOME];

/// Columns holding delimited or JSON-encoded lists.
pub const LIST_COLUMNS: &[&str] = &[CNJS_COMO_TESTEMUNHA, TESTEMUNHAS_ATIVO, TESTEMUNHAS_PASSIVO];

/// Normalizes a raw header for matching: trimmed and lower-cased.
pub fn canonical_header(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_header_trims_and_lowercases() {
        assert_eq!(canonical_header("  CNJ "), "cnj");
        assert_eq!(canonical_header("Nome_Testemunha"), "nome_testemunha");
    }
}
