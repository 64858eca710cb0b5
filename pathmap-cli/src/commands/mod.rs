use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use pathmap_core::content::{ContentParser, DefaultContentParser};
use pathmap_core::services::to_ui;
use pathmap_core::{EngineConfig, MappingConfig};

pub mod check;
pub mod convert;
pub mod polymorphic;
pub mod relations;

#[derive(Args, Debug)]
pub struct RelationsArgs {
    /// Mapping configuration (editor or persisted form)
    #[clap(short, long)]
    pub config: PathBuf,
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[clap(short, long)]
    pub config: PathBuf,
    /// Persisted id or numeric ui id of the entity mapping
    #[clap(short, long)]
    pub entity: String,
    /// Sample document; defaults to the configuration's sampleContent
    #[clap(short, long)]
    pub sample: Option<PathBuf>,
    /// JSON array of destination paths missing from the target model
    #[clap(long)]
    pub missing_dst: Option<PathBuf>,
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PolymorphicArgs {
    #[clap(short, long)]
    pub config: PathBuf,
    #[clap(short, long)]
    pub entity: String,
    #[clap(long, conflicts_with = "disable", required_unless_present = "disable")]
    pub enable: bool,
    #[clap(long)]
    pub disable: bool,
    #[clap(short, long)]
    pub sample: Option<PathBuf>,
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ToBackendArgs {
    #[clap(short, long)]
    pub config: PathBuf,
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ToUiArgs {
    #[clap(short, long)]
    pub config: PathBuf,
    /// JSON array of target model paths without a textual mapping
    #[clap(long)]
    pub none_mapping_fields: Option<PathBuf>,
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn load_config(path: &Path) -> Result<MappingConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read mapping config {}", path.display()))?;
    MappingConfig::from_json_str(&raw)
        .with_context(|| format!("Failed to parse mapping config {}", path.display()))
}

/// Loads a configuration in editor form, replaying persisted metadata.
pub(crate) fn load_editor_config(path: &Path) -> Result<MappingConfig> {
    let config = load_config(path)?;
    if config.metadata.is_some() {
        info!("Replaying persisted metadata of {}", path.display());
        return Ok(to_ui(&config, &[]));
    }
    Ok(config)
}

pub(crate) fn load_sample(
    config: &MappingConfig,
    sample: Option<&Path>,
    engine: &EngineConfig,
) -> Result<Value> {
    let parser = DefaultContentParser::new(engine.clone());
    match sample {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read sample {}", path.display()))?;
            parser
                .parse(config.data_type, &raw)
                .with_context(|| format!("Failed to parse sample {}", path.display()))
        }
        None => parser
            .parse_sample(config)
            .context("Failed to parse sampleContent of the mapping config"),
    }
}

pub(crate) fn load_string_list(path: Option<&Path>) -> Result<Vec<String>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of strings", path.display()))
}

pub(crate) fn emit<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};

    use serde::de::DeserializeOwned;

    pub fn config_fixture(name: &str) -> PathBuf {
        pathmap_test_utils::config_path(name)
    }

    pub fn read_json<T: DeserializeOwned>(path: &Path) -> T {
        let raw = std::fs::read_to_string(path).expect("output written");
        serde_json::from_str(&raw).expect("output is JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_list_file_is_empty() {
        assert!(load_string_list(None).unwrap().is_empty());
    }

    #[test]
    fn reads_string_lists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fields.json");
        fs::write(&path, r#"["a", "b.c"]"#).unwrap();
        assert_eq!(load_string_list(Some(path.as_path())).unwrap(), vec!["a", "b.c"]);
    }

    #[test]
    fn emit_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        emit(&vec![1, 2], Some(path.as_path())).unwrap();
        let written: Vec<u32> = test_support::read_json(&path);
        assert_eq!(written, vec![1, 2]);
    }

    #[test]
    fn unreadable_config_has_context() {
        let err = load_config(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read mapping config"));
    }
}
