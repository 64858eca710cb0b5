use anyhow::Result;

use pathmap_core::relations::change_is_polymorphic_list;
use pathmap_core::{EngineConfig, MappingConfig};

use super::{emit, load_editor_config, load_sample, PolymorphicArgs};

pub fn run(args: &PolymorphicArgs) -> Result<()> {
    let config = toggle(args, &EngineConfig::from_env())?;
    emit(&config, args.output.as_deref())
}

fn toggle(args: &PolymorphicArgs, engine: &EngineConfig) -> Result<MappingConfig> {
    let mut config = load_editor_config(&args.config)?;
    let index = config.entity_index_by_key(&args.entity)?;
    let sample = load_sample(&config, args.sample.as_deref(), engine)?;
    change_is_polymorphic_list(&mut config, index, args.enable && !args.disable, &sample, engine);
    Ok(config)
}
