//! Rule identifiers emitted by the engine.
//!
//! Stable strings: they end up in serialized results and in the dedup key of
//! an issue, so renaming one is a breaking change for consumers.

pub const CAMPO_OBRIGATORIO: &str = "campo_obrigatorio";
pub const CNJ_INVALIDO: &str = "cnj_invalido";
pub const LISTA_CNJ_VAZIA: &str = "lista_cnj_vazia";
pub const LISTA_SEM_CNJ_CANONICO: &str = "lista_sem_cnj_canonico";
pub const CNJ_DIGITO_VERIFICADOR: &str = "cnj_digito_verificador";
pub const REU_PREENCHIDO_PADRAO: &str = "reu_preenchido_padrao";
