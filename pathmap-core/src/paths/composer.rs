use std::collections::HashSet;

use tracing::warn;

use super::notation::join;
use crate::model::{EntityMapping, MappingConfig};

/// Absolute root path of `entity`, composed by walking its parent chain.
///
/// A parent that cannot be resolved is treated as absent and the entity's own
/// path is used unqualified.
pub fn full_path(entity: &EntityMapping, config: &MappingConfig) -> String {
    let mut visited = HashSet::new();
    compose(entity, config, &mut visited)
}

fn compose(entity: &EntityMapping, config: &MappingConfig, visited: &mut HashSet<usize>) -> String {
    let own = relative_path(entity);

    let Some(parent_id) = entity.parent_id() else {
        return own.to_string();
    };

    let Some(parent_index) = config.entity_index(parent_id) else {
        warn!(
            "Entity mapping {} references missing parent {}, treating it as a root",
            entity.id, parent_id
        );
        return own.to_string();
    };

    if !visited.insert(parent_index) {
        warn!(
            "Entity mapping {} is part of a parent cycle, stopping path composition",
            entity.id
        );
        return own.to_string();
    }

    let parent_path = compose(&config.entity_mappings[parent_index], config, visited);
    join(&parent_path, own)
}

fn relative_path(entity: &EntityMapping) -> &str {
    entity
        .root_relation()
        .map(|relation| relation.src_relative_root_path.as_str())
        .unwrap_or_default()
}
