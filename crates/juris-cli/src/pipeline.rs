//! Import pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Decode**: Read the workbook from a CSV file or directory
//! 2. **Detect**: Classify each sheet by its header set
//! 3. **Normalize**: Produce canonical records per the import options
//! 4. **Validate**: Issue/correction engine and summary counts
//! 5. **Publish**: Create, stage, and atomically publish a version
//!
//! Each stage takes the output of the previous stage and returns typed
//! results, so intermediate state stays inspectable.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use juris_ingest::{CsvDecoder, Workbook, WorkbookDecoder, detect};
use juris_model::{ImportOptions, ImportSession, PublishResult, SheetModel, ValidationResult};
use juris_normalize::normalize;
use juris_publish::{JsonStore, Publisher, PublisherConfig, batch_checksum, bytes_checksum};
use juris_validate::{apply_corrections, evaluate, publishable, suggest_corrections};

/// Result of the decode + detect stages.
pub struct LoadedWorkbook {
    pub workbook: Workbook,
    pub session: ImportSession,
}

/// Decode the workbook and detect sheet structure.
///
/// When `model_override` is set, ambiguous sheets are resolved to that model
/// instead of carrying the ambiguity forward.
pub fn load(path: &Path, model_override: Option<SheetModel>) -> Result<LoadedWorkbook> {
    let start = Instant::now();
    let decoder = CsvDecoder;
    let workbook = decoder
        .decode(path)
        .with_context(|| format!("decode {}", path.display()))?;

    let mut sheets = detect(&workbook).context("detect sheet structure")?;
    if let Some(model) = model_override {
        for sheet in &mut sheets {
            if sheet.model == SheetModel::Ambiguous {
                info!(sheet = %sheet.name, model = model.label(), "resolving ambiguous sheet");
                *sheet = sheet.with_model(model);
            }
        }
    }
    for sheet in &sheets {
        if sheet.model == SheetModel::Ambiguous {
            warn!(sheet = %sheet.name, "sheet structure is ambiguous, pass --model to resolve");
        }
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("workbook")
        .to_string();
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("stat {}", path.display()))?;
    let (file_size, session_id) = if metadata.is_file() {
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        (metadata.len(), bytes_checksum(&bytes))
    } else {
        // Directory import: derive the dedup token from the sheet inventory.
        let mut inventory = String::new();
        for sheet in &workbook.sheets {
            inventory.push_str(&sheet.name);
            inventory.push('\n');
            inventory.push_str(&sheet.rows.len().to_string());
            inventory.push('\n');
        }
        (0, bytes_checksum(inventory.as_bytes()))
    };

    info!(
        file = %file_name,
        sheets = sheets.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "workbook loaded"
    );

    Ok(LoadedWorkbook {
        workbook,
        session: ImportSession {
            file_name,
            file_size,
            sheets,
            uploaded_at: Utc::now(),
            session_id,
        },
    })
}

/// Normalize and validate the loaded workbook.
///
/// With `apply` set, suggested corrections are applied and the corrected
/// batch is re-validated, so the reported summary always describes the batch
/// that would be staged.
pub fn run_validation(
    loaded: &LoadedWorkbook,
    options: &ImportOptions,
    apply: bool,
) -> Result<ValidationResult> {
    let start = Instant::now();
    let batch = normalize(&loaded.session.sheets, &loaded.workbook, options)
        .context("normalize records")?;
    let mut result =
        evaluate(&loaded.session.sheets, &batch, options).context("validate records")?;

    if apply {
        let suggestions = suggest_corrections(&result.batch, options);
        if !suggestions.is_empty() {
            info!(count = suggestions.len(), "applying correction suggestions");
            let corrected = apply_corrections(&result.batch, &suggestions);
            result = evaluate(&loaded.session.sheets, &corrected, options)
                .context("re-validate corrected records")?;
        }
    }

    info!(
        analyzed = result.summary.analyzed,
        valid = result.summary.valid,
        errors = result.summary.errors,
        warnings = result.summary.warnings,
        duration_ms = start.elapsed().as_millis() as u64,
        "validation complete"
    );
    Ok(result)
}

/// Create, stage, and publish a version holding the valid records.
///
/// Records with errors are excluded; the publish step cross-checks the
/// staged row count against the validation summary before the swap.
pub async fn run_publish(
    store_dir: &Path,
    loaded: &LoadedWorkbook,
    result: &ValidationResult,
    chunk_size: usize,
) -> Result<PublishResult> {
    let store = JsonStore::open(store_dir)
        .with_context(|| format!("open version store {}", store_dir.display()))?;
    let publisher = Publisher::new(
        store,
        PublisherConfig {
            chunk_size,
            ..PublisherConfig::default()
        },
    );

    let clean = publishable(&result.batch);
    let checksum = batch_checksum(&loaded.session.file_name, &clean);

    let version = publisher.create_version().await?;
    let staged = publisher.stage(&version.id, &clean, &checksum).await?;
    info!(version = %version.id, staged, "batch staged");

    let published = publisher.publish(&version.id, result.summary.valid).await?;
    Ok(published)
}
