use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use juris_model::ImportOptions;
use juris_publish::{JsonStore, VersionStore};

use juris_cli::pipeline::{load, run_publish, run_validation};

use crate::cli::{ImportArgs, PipelineArgs, ValidateArgs, VersionsArgs};
use crate::summary::{print_publish, print_validation, print_versions};

/// Outcome of `juris validate`, used to pick the exit code.
pub struct ValidateOutcome {
    pub has_errors: bool,
}

pub fn run_validate(args: &ValidateArgs) -> Result<ValidateOutcome> {
    let options = import_options(&args.pipeline);
    let loaded = load(&args.path, args.pipeline.model.map(|m| m.to_model()))?;
    let result = run_validation(&loaded, &options, args.pipeline.apply_corrections)?;

    print_validation(&loaded.session.sheets, &result);

    if let Some(report) = &args.report {
        let body = serde_json::to_vec_pretty(&result).context("serialize validation result")?;
        fs::write(report, body).with_context(|| format!("write {}", report.display()))?;
        info!(path = %report.display(), "validation report written");
    }

    Ok(ValidateOutcome {
        has_errors: result.has_errors(),
    })
}

pub fn run_import(args: &ImportArgs) -> Result<()> {
    let options = import_options(&args.pipeline);
    let loaded = load(&args.path, args.pipeline.model.map(|m| m.to_model()))?;
    let result = run_validation(&loaded, &options, args.pipeline.apply_corrections)?;

    print_validation(&loaded.session.sheets, &result);

    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    let published =
        runtime.block_on(run_publish(&args.store, &loaded, &result, args.chunk_size))?;
    print_publish(&published);
    Ok(())
}

pub fn run_versions(args: &VersionsArgs) -> Result<()> {
    let store = JsonStore::open(&args.store)
        .with_context(|| format!("open version store {}", args.store.display()))?;
    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    let (versions, active) = runtime.block_on(async {
        let versions = store.versions().await?;
        let active = store.active_version().await?;
        Ok::<_, juris_publish::PublishError>((versions, active))
    })?;
    print_versions(&versions, active.as_ref().map(|v| &v.id));
    Ok(())
}

fn import_options(args: &PipelineArgs) -> ImportOptions {
    let mut options = ImportOptions::new()
        .with_explode_lists(!args.no_explode_lists)
        .with_standardize_cnj(!args.no_standardize_cnj)
        .with_intelligent_corrections(args.corrections || args.apply_corrections);
    if let Some(name) = &args.default_reu {
        options = options.with_default_reu(name);
    }
    options
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn parse(args: &[&str]) -> PipelineArgs {
        let mut argv = vec!["juris"];
        argv.extend_from_slice(args);
        PipelineArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn flags_map_onto_import_options() {
        let options = import_options(&parse(&["--no-explode-lists", "--corrections"]));
        assert!(!options.explode_lists);
        assert!(options.standardize_cnj);
        assert!(options.intelligent_corrections);
        assert!(!options.apply_default_reu);
    }

    #[test]
    fn apply_corrections_implies_corrections() {
        let options = import_options(&parse(&["--apply-corrections"]));
        assert!(options.intelligent_corrections);
    }

    #[test]
    fn default_reu_enables_the_fill() {
        let options = import_options(&parse(&["--default-reu", "Não informado"]));
        assert!(options.apply_default_reu);
        assert_eq!(options.default_reu_name.as_deref(), Some("Não informado"));
    }
}
