pub mod csv;
pub mod detect;
pub mod error;
pub mod workbook;

pub use csv::CsvDecoder;
pub use detect::detect;
pub use error::{IngestError, Result};
pub use workbook::{RawSheet, Workbook, WorkbookDecoder};
