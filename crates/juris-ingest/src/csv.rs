//! CSV workbook decoding.
//!
//! One CSV file decodes to a single-sheet workbook named after the file stem.
//! A directory decodes to one workbook with a sheet per CSV file, sorted by
//! filename so detection order is stable.

use std::path::Path;

use crate::error::{IngestError, Result};
use crate::workbook::{RawSheet, Workbook, WorkbookDecoder};

/// CSV implementation of the decoder boundary. UTF-8 only.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvDecoder;

impl WorkbookDecoder for CsvDecoder {
    fn decode(&self, path: &Path) -> Result<Workbook> {
        if path.is_dir() {
            decode_directory(path)
        } else {
            let sheet = decode_file(path)?;
            Ok(Workbook {
                sheets: vec![sheet],
            })
        }
    }
}

fn decode_directory(dir: &Path) -> Result<Workbook> {
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::FileRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IngestError::FileRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if path.is_file() && is_csv {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut sheets = Vec::with_capacity(paths.len());
    for path in paths {
        sheets.push(decode_file(&path)?);
    }
    Ok(Workbook { sheets })
}

fn decode_file(path: &Path) -> Result<RawSheet> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let content = strip_bom(path, &bytes)?;
    let name = sheet_name(path);

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::NoHeaderRow { sheet: name });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    tracing::debug!(sheet = %name, rows = rows.len(), "decoded csv sheet");

    Ok(RawSheet {
        name,
        headers,
        rows,
    })
}

/// Rejects UTF-16 input and skips a UTF-8 BOM when present.
fn strip_bom<'a>(path: &Path, bytes: &'a [u8]) -> Result<&'a [u8]> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 BE",
        });
    }
    Ok(bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes))
}

fn sheet_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|v| v.to_str())
        .unwrap_or("sheet")
        .to_string()
}
