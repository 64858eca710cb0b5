//! Flattens the nested mapping configuration into a uniform list of relations.

use serde::{Deserialize, Serialize};

use super::pointer_cache;
use crate::model::{
    EntityMapping, EntityMappingId, MappingConfig, Relation, RelationColumn, RelationType,
};

/// Editor state threaded through a collection pass.
#[derive(Debug, Clone, Default)]
pub struct CollectContext {
    /// Relation currently being drawn, not yet stored in the configuration.
    pub active_relation: Option<ActiveRelation>,
    /// Relation currently being re-pointed by dragging one of its ends.
    pub reassign: Option<ReassignRelation>,
}

#[derive(Debug, Clone)]
pub struct ActiveRelation {
    /// Entity mapping the relation is being drawn in.
    pub entity: EntityMappingId,
    pub relation_type: RelationType,
    pub column: RelationColumn,
    pub not_exist_relation: bool,
}

#[derive(Debug, Clone)]
pub struct ReassignRelation {
    pub src_column_path: String,
    pub dst_column_path: String,
    pub drag_from: DragSide,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DragSide {
    Source,
    Target,
}

impl ReassignRelation {
    /// Whether a stored column is the relation being re-pointed and must be
    /// left out while the drag is in progress.
    fn excludes(&self, src: &str, dst: &str) -> bool {
        match self.drag_from {
            DragSide::Target => src == self.src_column_path,
            DragSide::Source => dst == self.dst_column_path,
        }
    }
}

/// Relations of every entity mapping, in configuration order. Pointers of
/// document-backed relations are resolved through each entity's cache, which
/// is populated as a side effect.
pub fn collect(config: &mut MappingConfig, ctx: &CollectContext) -> Vec<Relation> {
    config
        .entity_mappings
        .iter_mut()
        .flat_map(|entity| collect_entity(entity, ctx))
        .collect()
}

/// Relations of a single entity mapping with pointers of stored relations
/// resolved. The active relation is appended as supplied.
pub fn collect_entity(entity: &mut EntityMapping, ctx: &CollectContext) -> Vec<Relation> {
    let mut relations = stored_relations(entity, ctx);
    for relation in relations.iter_mut() {
        if relation.relation_type.has_source_path() && relation.column.json_path.is_none() {
            relation.column.json_path = Some(pointer_cache::resolve(
                &mut entity.cobi_paths_relations,
                &relation.column.src_column_path,
                &relation.column.dst_column_path,
            ));
        }
    }
    relations.extend(active_relation(entity, ctx));
    relations
}

/// Relations of a single entity mapping, without touching its cache.
///
/// Order: column mappings, functional mappings (sources, then `SET_DST_VALUE`
/// statements), core metadata, script inputs, then the active relation.
pub fn entity_relations(entity: &EntityMapping, ctx: &CollectContext) -> Vec<Relation> {
    let mut relations = stored_relations(entity, ctx);
    relations.extend(active_relation(entity, ctx));
    relations
}

fn stored_relations(entity: &EntityMapping, ctx: &CollectContext) -> Vec<Relation> {
    let mut relations = Vec::new();
    let make = |relation_type: RelationType, src: &str, dst: &str| Relation {
        entity_class: entity.entity_class.clone(),
        entity_mapping_id: entity.id.clone(),
        relation_type,
        column: RelationColumn {
            src_column_path: src.to_string(),
            dst_column_path: dst.to_string(),
            json_path: None,
        },
    };

    for column in &entity.columns {
        let src = column.src_column_path.as_str();
        let dst = column.dst_cyoda_column_path.as_str();
        if src.is_empty() || dst.is_empty() {
            continue;
        }
        if ctx
            .reassign
            .as_ref()
            .is_some_and(|reassign| reassign.excludes(src, dst))
        {
            continue;
        }
        relations.push(make(RelationType::ColumnMapping, src, dst));
    }

    for functional in &entity.functional_mappings {
        for src in &functional.src_paths {
            relations.push(make(RelationType::FunctionalMapping, src, &functional.dst_path));
        }
        let name = functional.name.as_deref().unwrap_or_default();
        for statement in functional.statements.iter().filter(|s| s.sets_dst_value()) {
            relations.push(make(
                RelationType::FunctionalMappingInner,
                name,
                statement.dst_path.as_deref().unwrap_or_default(),
            ));
        }
    }

    for metadata in &entity.cobi_core_metadata {
        relations.push(make(
            RelationType::CoreMetadata,
            &metadata.name,
            &metadata.dst_cyoda_column_path,
        ));
    }

    for src in entity.script_input_paths() {
        relations.push(make(RelationType::ScriptPath, src, ""));
    }

    relations
}

fn active_relation(entity: &EntityMapping, ctx: &CollectContext) -> Option<Relation> {
    ctx.active_relation
        .as_ref()
        .filter(|active| !active.not_exist_relation && entity.id.same_entity(&active.entity))
        .map(|active| Relation {
            entity_class: entity.entity_class.clone(),
            entity_mapping_id: entity.id.clone(),
            relation_type: active.relation_type,
            column: active.column.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ColumnMapping, CoreMetadataMapping, FunctionalMapping, PathPointer, Script, Statement,
        SET_DST_VALUE,
    };

    fn column(src: &str, dst: &str) -> ColumnMapping {
        ColumnMapping {
            src_column_path: src.to_string(),
            dst_cyoda_column_path: dst.to_string(),
            ..Default::default()
        }
    }

    fn order_entity() -> EntityMapping {
        EntityMapping {
            id: EntityMappingId::transient(1),
            entity_class: "com.example.Order".to_string(),
            columns: vec![
                column("id", "id"),
                column("", "ignored"),
                column("lines/*/price", "lines.[*].price"),
            ],
            functional_mappings: vec![FunctionalMapping {
                name: Some("total".to_string()),
                src_paths: vec!["lines/*/qty".to_string(), "lines/*/price".to_string()],
                dst_path: "total".to_string(),
                statements: vec![
                    Statement {
                        kind: Some(SET_DST_VALUE.to_string()),
                        dst_path: Some("total".to_string()),
                        ..Default::default()
                    },
                    Statement {
                        kind: Some("DECLARE_VAR".to_string()),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }],
            cobi_core_metadata: vec![CoreMetadataMapping {
                name: "fileName".to_string(),
                dst_cyoda_column_path: "source".to_string(),
                ..Default::default()
            }],
            script: Some(Script {
                input_src_paths: vec!["customer/name".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn kinds(relations: &[Relation]) -> Vec<RelationType> {
        relations.iter().map(|r| r.relation_type).collect()
    }

    #[test]
    fn emits_relations_in_fixed_order() {
        let relations = entity_relations(&order_entity(), &CollectContext::default());
        assert_eq!(
            kinds(&relations),
            vec![
                RelationType::ColumnMapping,
                RelationType::ColumnMapping,
                RelationType::FunctionalMapping,
                RelationType::FunctionalMapping,
                RelationType::FunctionalMappingInner,
                RelationType::CoreMetadata,
                RelationType::ScriptPath,
            ]
        );
        assert_eq!(relations[4].src(), "total");
        assert_eq!(relations[4].dst(), "total");
        assert_eq!(relations[5].src(), "fileName");
        assert!(relations.iter().all(|r| r.entity_class == "com.example.Order"));
    }

    #[test]
    fn collect_populates_cache_for_document_paths_only() {
        let mut config = MappingConfig {
            entity_mappings: vec![order_entity()],
            ..Default::default()
        };
        let relations = collect(&mut config, &CollectContext::default());

        assert_eq!(relations[1].json_path(), Some("lines/0/price"));
        assert_eq!(relations[4].json_path(), None);
        assert_eq!(relations[5].json_path(), None);
        assert_eq!(relations[6].json_path(), Some("customer/name"));
        assert_eq!(config.entity_mappings[0].cobi_paths_relations.len(), 5);
    }

    #[test]
    fn collect_reuses_cached_choice() {
        let mut entity = order_entity();
        entity.cobi_paths_relations = vec![PathPointer::new(
            "lines/4/price",
            "lines/*/price",
            "lines.[*].price",
        )];
        let relations = collect_entity(&mut entity, &CollectContext::default());
        assert_eq!(relations[1].json_path(), Some("lines/4/price"));
    }

    #[test]
    fn reassign_from_target_excludes_by_source() {
        let ctx = CollectContext {
            reassign: Some(ReassignRelation {
                src_column_path: "id".to_string(),
                dst_column_path: "somewhere".to_string(),
                drag_from: DragSide::Target,
            }),
            ..Default::default()
        };
        let relations = entity_relations(&order_entity(), &ctx);
        assert!(!relations
            .iter()
            .any(|r| r.relation_type == RelationType::ColumnMapping && r.src() == "id"));
        assert_eq!(relations.len(), 6);
    }

    #[test]
    fn reassign_from_source_excludes_by_destination() {
        let ctx = CollectContext {
            reassign: Some(ReassignRelation {
                src_column_path: "unrelated".to_string(),
                dst_column_path: "lines.[*].price".to_string(),
                drag_from: DragSide::Source,
            }),
            ..Default::default()
        };
        let relations = entity_relations(&order_entity(), &ctx);
        let columns: Vec<_> = relations
            .iter()
            .filter(|r| r.relation_type == RelationType::ColumnMapping)
            .map(|r| r.dst())
            .collect();
        assert_eq!(columns, vec!["id"]);
    }

    #[test]
    fn active_relation_is_appended_to_its_entity() {
        let mut other = order_entity();
        other.id = EntityMappingId::transient(2);
        other.entity_class = "com.example.Other".to_string();
        let config = MappingConfig {
            entity_mappings: vec![order_entity(), other],
            ..Default::default()
        };

        let ctx = CollectContext {
            active_relation: Some(ActiveRelation {
                entity: EntityMappingId::transient(1),
                relation_type: RelationType::ColumnMapping,
                column: RelationColumn {
                    src_column_path: "customer/id".to_string(),
                    dst_column_path: "customerId".to_string(),
                    json_path: None,
                },
                not_exist_relation: false,
            }),
            ..Default::default()
        };

        let first = entity_relations(&config.entity_mappings[0], &ctx);
        let second = entity_relations(&config.entity_mappings[1], &ctx);
        assert_eq!(first.len(), 8);
        let last = first.last().unwrap();
        assert_eq!(last.src(), "customer/id");
        assert_eq!(last.entity_class, "com.example.Order");
        assert_eq!(last.entity_mapping_id, EntityMappingId::transient(1));
        assert_eq!(second.len(), 7);
    }

    #[test]
    fn active_relation_is_not_cached() {
        let mut entity = order_entity();
        let ctx = CollectContext {
            active_relation: Some(ActiveRelation {
                entity: EntityMappingId::transient(1),
                relation_type: RelationType::ColumnMapping,
                column: RelationColumn {
                    src_column_path: "customer/*/id".to_string(),
                    dst_column_path: "customerId".to_string(),
                    json_path: None,
                },
                not_exist_relation: false,
            }),
            ..Default::default()
        };

        let relations = collect_entity(&mut entity, &ctx);
        let last = relations.last().unwrap();
        assert_eq!(last.src(), "customer/*/id");
        assert_eq!(last.json_path(), None);
        assert!(!entity
            .cobi_paths_relations
            .iter()
            .any(|entry| entry.src_column_path == "customer/*/id"));
        assert_eq!(entity.cobi_paths_relations.len(), 5);
    }

    #[test]
    fn not_exist_active_relation_is_skipped() {
        let ctx = CollectContext {
            active_relation: Some(ActiveRelation {
                entity: EntityMappingId::transient(1),
                relation_type: RelationType::ColumnMapping,
                column: RelationColumn::default(),
                not_exist_relation: true,
            }),
            ..Default::default()
        };
        assert_eq!(entity_relations(&order_entity(), &ctx).len(), 7);
    }
}
