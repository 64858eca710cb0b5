use anyhow::Result;
use tracing::{info, warn};

use pathmap_core::relations::{collect, find_problems, CollectContext, ProblemRelation};
use pathmap_core::EngineConfig;

use super::{emit, load_editor_config, load_sample, load_string_list, CheckArgs};

pub fn run(args: &CheckArgs) -> Result<()> {
    let problems = check(args, &EngineConfig::from_env())?;
    emit(&problems, args.output.as_deref())
}

fn check(args: &CheckArgs, engine: &EngineConfig) -> Result<Vec<ProblemRelation>> {
    let mut config = load_editor_config(&args.config)?;
    let index = config.entity_index_by_key(&args.entity)?;
    let sample = load_sample(&config, args.sample.as_deref(), engine)?;
    let missing_dst = load_string_list(args.missing_dst.as_deref())?;

    let relations = collect(&mut config, &CollectContext::default());
    let entity = &config.entity_mappings[index];
    let problems = find_problems(&relations, &sample, entity, &config, &missing_dst);

    if problems.is_empty() {
        info!("Entity mapping {} has no problem relations", entity.id);
    } else {
        warn!(
            "Entity mapping {} has {} problem relations",
            entity.id,
            problems.len()
        );
    }
    Ok(problems)
}
