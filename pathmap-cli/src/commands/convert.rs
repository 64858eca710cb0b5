use anyhow::{Context, Result};
use tracing::info;

use pathmap_core::services::{to_backend, to_ui};
use pathmap_core::MappingConfig;

use super::{emit, load_config, load_string_list, ToBackendArgs, ToUiArgs};

pub fn run_to_backend(args: &ToBackendArgs) -> Result<()> {
    let backend = backend_form(args)?;
    emit(&backend, args.output.as_deref())
}

pub fn run_to_ui(args: &ToUiArgs) -> Result<()> {
    let ui = ui_form(args)?;
    emit(&ui, args.output.as_deref())
}

fn backend_form(args: &ToBackendArgs) -> Result<MappingConfig> {
    let config = load_config(&args.config)?;
    let backend = to_backend(&config).context("Failed to build persisted form")?;
    info!(
        "Converted {} entity mappings to persisted form",
        backend.entity_mappings.len()
    );
    Ok(backend)
}

fn ui_form(args: &ToUiArgs) -> Result<MappingConfig> {
    let config = load_config(&args.config)?;
    let none_mapping_fields = load_string_list(args.none_mapping_fields.as_deref())?;
    Ok(to_ui(&config, &none_mapping_fields))
}
