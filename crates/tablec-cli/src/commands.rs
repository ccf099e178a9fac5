//! Command implementations behind the `tablec` subcommands.

use anyhow::{Context, Result};
use serde::Serialize;
use tablec_ingest::{
    EnvOptions, IMPORTER_NAMESPACE, ImportConfig, ImportOutcome, KEY_IMPORTER_NAME,
    create_importer,
};
use tablec_validate::default_registry;
use tracing::{info, info_span};

use crate::cli::ImportArgs;

/// Merge the options file, `-x` pairs and `--importer`, in that order.
pub fn build_import_config(args: &ImportArgs) -> Result<ImportConfig> {
    let mut options = match &args.config {
        Some(path) => EnvOptions::load_toml(path)
            .with_context(|| format!("load options file {}", path.display()))?,
        None => EnvOptions::new(),
    };
    let overrides = EnvOptions::from_pairs(&args.options).context("parse -x options")?;
    options.merge(overrides);
    if let Some(name) = &args.importer {
        options.set(format!("{IMPORTER_NAMESPACE}.{KEY_IMPORTER_NAME}"), name.clone());
    }
    Ok(ImportConfig::new(&args.data_dir).with_options(options))
}

pub fn run_import(args: &ImportArgs) -> Result<ImportOutcome> {
    let config = build_import_config(args)?;
    let span = info_span!(
        "import",
        data_root = %config.data_root.display(),
        importer = config.importer_name()
    );
    let _guard = span.enter();

    let importer = create_importer(&config).context("configure table importer")?;
    let outcome = importer
        .import()
        .with_context(|| format!("import tables from {}", config.data_root.display()))?;
    info!(
        tables = outcome.tables.len(),
        skipped = outcome.skipped.len(),
        failed = outcome.failed.len(),
        "import finished"
    );
    Ok(outcome)
}

pub fn outcome_to_json(outcome: &ImportOutcome) -> Result<String> {
    serde_json::to_string_pretty(outcome).context("serialize import outcome")
}

/// One row of the `validators` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatorInfo {
    pub tag: &'static str,
    pub description: &'static str,
}

pub fn run_validators() -> Vec<ValidatorInfo> {
    default_registry()
        .factories()
        .map(|factory| ValidatorInfo {
            tag: factory.tag(),
            description: factory.description(),
        })
        .collect()
}
