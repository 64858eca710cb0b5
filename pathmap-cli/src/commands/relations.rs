use anyhow::Result;
use tracing::info;

use pathmap_core::relations::{collect, CollectContext};
use pathmap_core::Relation;

use super::{emit, load_editor_config, RelationsArgs};

pub fn run(args: &RelationsArgs) -> Result<()> {
    let relations = list(args)?;
    emit(&relations, args.output.as_deref())
}

fn list(args: &RelationsArgs) -> Result<Vec<Relation>> {
    let mut config = load_editor_config(&args.config)?;
    let relations = collect(&mut config, &CollectContext::default());
    info!(
        "Collected {} relations from {} entity mappings",
        relations.len(),
        config.entity_mappings.len()
    );
    Ok(relations)
}
