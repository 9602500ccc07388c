pub mod cnj;
pub mod corrections;
pub mod engine;
pub mod error;
pub mod rules;

pub use cnj::{canonical_digits, check_digits, format_cnj, is_valid};
pub use corrections::{apply_corrections, suggest_corrections};
pub use engine::{evaluate, publishable};
pub use error::{Result, ValidateError};
