//! Conversion between the editor shape of a mapping configuration and the
//! shape persisted by the backend.
//!
//! The backend schema has no fields for the editor's companion state (pointer
//! cache, display flags), so it travels in the `metadata` string:
//!
//! ```text
//! {"entityMappingsMetaDatas":[{"uiId":1,"cobiPathsRelations":[...],
//!   "isShowNoneMappingFields":false,"isPolymorphicList":false}]}
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{MappingError, MappingResult};
use crate::model::{
    default_entity_filter, EntityMapping, MappingConfig, PathPointer, Script, Transformer,
    TransformerKind,
};
use crate::relations::collector::{collect_entity, CollectContext};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MappingMetaData {
    #[serde(default)]
    pub entity_mappings_meta_datas: Vec<EntityMappingMetaData>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntityMappingMetaData {
    pub ui_id: u64,
    #[serde(default)]
    pub cobi_paths_relations: Vec<PathPointer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_show_none_mapping_fields: Option<bool>,
    #[serde(default)]
    pub is_polymorphic_list: bool,
}

impl MappingMetaData {
    pub fn parse(raw: &str) -> MappingResult<Self> {
        serde_json::from_str(raw).map_err(|err| MappingError::InvalidMetadata(err.to_string()))
    }
}

/// Backend shape of `config`.
///
/// Pointer caches gain entries for relations not resolved yet and are moved
/// into the metadata blob keyed by the ui id each entity receives on reload
/// (its 1-based position), and every editor-only field is removed.
pub fn to_backend(config: &MappingConfig) -> MappingResult<MappingConfig> {
    let mut backend = config.clone();
    let ctx = CollectContext::default();
    let mut metas = Vec::with_capacity(backend.entity_mappings.len());

    for (index, entity) in backend.entity_mappings.iter_mut().enumerate() {
        // Entries of relations removed since they were resolved are kept:
        // they are the only record of the element chosen for a pattern.
        collect_entity(entity, &ctx);

        metas.push(EntityMappingMetaData {
            ui_id: index as u64 + 1,
            cobi_paths_relations: std::mem::take(&mut entity.cobi_paths_relations),
            is_show_none_mapping_fields: entity.is_show_none_mapping_fields.take(),
            is_polymorphic_list: std::mem::take(&mut entity.is_polymorphic_list),
        });

        strip_ui_fields(entity);
        for column in entity.columns.iter_mut() {
            column.transformer = column.transformer.take().map(normalize_transformer);
        }
    }

    backend.metadata = Some(serde_json::to_string(&MappingMetaData {
        entity_mappings_meta_datas: metas,
    })?);
    debug!(
        "Prepared {} entity mappings for persistence",
        backend.entity_mappings.len()
    );
    Ok(backend)
}

/// Editor shape of a persisted `config`.
///
/// `none_mapping_fields` lists destination paths of the target model that
/// have no textual mapping; it drives `isShowNoneMappingFields` when the
/// metadata does not carry the flag.
pub fn to_ui(config: &MappingConfig, none_mapping_fields: &[String]) -> MappingConfig {
    let mut ui = config.clone();
    assign_ui_ids(&mut ui.entity_mappings);

    if let Some(raw) = ui.metadata.take().filter(|raw| !raw.trim().is_empty()) {
        match MappingMetaData::parse(&raw) {
            Ok(metadata) => apply_metadata(&mut ui.entity_mappings, metadata),
            Err(err) => warn!("Ignoring mapping metadata: {}", err),
        }
    }

    let none_mapping: HashSet<&str> = none_mapping_fields.iter().map(String::as_str).collect();
    for entity in ui.entity_mappings.iter_mut() {
        if entity.is_show_none_mapping_fields.is_none() {
            entity.is_show_none_mapping_fields = Some(targets_any(entity, &none_mapping));
        }
        entity.script.get_or_insert_with(Script::default);
        entity.entity_filter.get_or_insert_with(default_entity_filter);
    }

    relink_parents(&mut ui.entity_mappings);
    ui
}

fn strip_ui_fields(entity: &mut EntityMapping) {
    entity.id.ui_id = None;
    entity.is_virtual = None;
    for relation in entity.entity_relation_configs.iter_mut() {
        if let Some(parent) = relation.parent_id.as_mut() {
            parent.ui_id = None;
        }
        if relation.parent_id.as_ref().is_some_and(|parent| parent.is_empty()) {
            relation.parent_id = None;
        }
    }
}

/// An untyped wrapper around a single child is dropped in favour of the
/// child; untyped groups become composites.
fn normalize_transformer(mut transformer: Transformer) -> Transformer {
    transformer.children = transformer
        .children
        .into_iter()
        .map(normalize_transformer)
        .collect();

    if transformer.kind.is_none() && transformer.transformer_key.is_none() {
        match transformer.children.len() {
            1 => return transformer.children.remove(0),
            n if n > 1 => transformer.kind = Some(TransformerKind::Composite),
            _ => {}
        }
    }
    transformer
}

fn assign_ui_ids(entities: &mut [EntityMapping]) {
    let mut used: HashSet<u64> = entities.iter().filter_map(|e| e.id.ui_id).collect();
    let mut next = 1;
    for entity in entities.iter_mut().filter(|e| e.id.ui_id.is_none()) {
        while used.contains(&next) {
            next += 1;
        }
        entity.id.ui_id = Some(next);
        used.insert(next);
    }
}

fn apply_metadata(entities: &mut [EntityMapping], metadata: MappingMetaData) {
    for meta in metadata.entity_mappings_meta_datas {
        let Some(entity) = entities.iter_mut().find(|e| e.id.ui_id == Some(meta.ui_id)) else {
            warn!("Metadata for unknown entity mapping ui {}", meta.ui_id);
            continue;
        };
        entity.cobi_paths_relations = meta.cobi_paths_relations;
        entity.is_polymorphic_list = meta.is_polymorphic_list;
        if meta.is_show_none_mapping_fields.is_some() {
            entity.is_show_none_mapping_fields = meta.is_show_none_mapping_fields;
        }
    }
}

fn targets_any(entity: &EntityMapping, fields: &HashSet<&str>) -> bool {
    entity
        .columns
        .iter()
        .any(|column| fields.contains(column.dst_cyoda_column_path.as_str()))
        || entity
            .functional_mappings
            .iter()
            .any(|functional| fields.contains(functional.dst_path.as_str()))
}

fn relink_parents(entities: &mut [EntityMapping]) {
    let ui_ids: HashMap<String, u64> = entities
        .iter()
        .filter_map(|e| Some((e.id.id.clone()?, e.id.ui_id?)))
        .collect();

    for entity in entities.iter_mut() {
        for relation in entity.entity_relation_configs.iter_mut() {
            if let Some(parent) = relation.parent_id.as_mut() {
                if let Some(ui_id) = parent.id.as_ref().and_then(|id| ui_ids.get(id)) {
                    parent.ui_id = Some(*ui_id);
                }
            }
        }
    }
}
