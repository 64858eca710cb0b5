//! Classification of relations that no longer line up with the sample
//! document or the target entity model. Problems are reported as data for
//! highlighting, never as errors.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::pointer_cache::cached;
use crate::model::{
    DataType, EntityMapping, MappingConfig, Relation, RelationColumn, RelationType,
};
use crate::paths::full_path;
use crate::paths::lookup::{lookup_csv_record, lookup_path};
use crate::paths::notation::{count_wildcards, first_element_pointer, join};

pub const REASON_NOT_EXIST_SRC: &str = "Path not exist in source";
pub const REASON_NOT_EXIST_DST: &str = "Path not exist in destination";
pub const REASON_NOT_EXIST_SCRIPT_PATH: &str = "Not exist script path";
pub const REASON_NUMBER_STAR: &str = "Number of stars in source and destination paths differs";

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProblemKind {
    NotExist,
    NotExistScriptPaths,
    NumberStar,
}

/// A relation flagged by [`find_problems`], serialized flat over the relation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRelation {
    #[serde(flatten)]
    pub relation: Relation,
    pub is_not_exist_src: bool,
    pub type_error: ProblemKind,
    pub reason: String,
}

impl ProblemRelation {
    fn new(relation: Relation, is_not_exist_src: bool, type_error: ProblemKind, reason: &str) -> Self {
        Self {
            relation,
            is_not_exist_src,
            type_error,
            reason: reason.to_string(),
        }
    }

    fn dedup_key(&self) -> (String, String) {
        (
            self.relation.json_path().unwrap_or_default().to_string(),
            self.relation.dst().to_string(),
        )
    }
}

/// Problems of `entity`'s relations among `all_relations`.
///
/// The union of missing script paths, missing source paths, destinations
/// listed in `missing_dst_paths` and wildcard count mismatches, deduplicated
/// by `(jsonPath, dstColumnPath)` with the first report kept.
pub fn find_problems(
    all_relations: &[Relation],
    sample_doc: &Value,
    entity: &EntityMapping,
    config: &MappingConfig,
    missing_dst_paths: &[String],
) -> Vec<ProblemRelation> {
    let relations: Vec<&Relation> = all_relations
        .iter()
        .filter(|relation| relation.entity_mapping_id.same_entity(&entity.id))
        .collect();
    let probe = SourceProbe::new(sample_doc, entity, config);

    let script_problems = entity
        .script_input_paths()
        .iter()
        .filter_map(|src| {
            let pointer = cached(&entity.cobi_paths_relations, src, "")
                .map(str::to_string)
                .unwrap_or_else(|| first_element_pointer(src));
            if probe.exists(&pointer) {
                return None;
            }
            let relation = Relation {
                entity_class: entity.entity_class.clone(),
                entity_mapping_id: entity.id.clone(),
                relation_type: RelationType::ScriptPath,
                column: RelationColumn {
                    src_column_path: src.clone(),
                    dst_column_path: String::new(),
                    json_path: Some(pointer),
                },
            };
            Some(ProblemRelation::new(
                relation,
                true,
                ProblemKind::NotExistScriptPaths,
                REASON_NOT_EXIST_SCRIPT_PATH,
            ))
        });

    let src_problems = relations
        .iter()
        .filter(|relation| {
            !matches!(
                relation.relation_type,
                RelationType::FunctionalMappingInner | RelationType::CoreMetadata
            )
        })
        .filter(|relation| !probe.exists(&pointer_of(relation)))
        .map(|relation| {
            ProblemRelation::new(
                (*relation).clone(),
                true,
                ProblemKind::NotExist,
                REASON_NOT_EXIST_SRC,
            )
        });

    let missing_dst: HashSet<&str> = missing_dst_paths.iter().map(String::as_str).collect();
    let dst_problems = relations
        .iter()
        .filter(|relation| missing_dst.contains(relation.dst()))
        .map(|relation| {
            ProblemRelation::new(
                (*relation).clone(),
                false,
                ProblemKind::NotExist,
                REASON_NOT_EXIST_DST,
            )
        });

    let star_problems = relations
        .iter()
        .filter(|relation| relation.relation_type == RelationType::ColumnMapping)
        .filter(|relation| count_wildcards(relation.src()) != count_wildcards(relation.dst()))
        .map(|relation| {
            ProblemRelation::new(
                (*relation).clone(),
                false,
                ProblemKind::NumberStar,
                REASON_NUMBER_STAR,
            )
        });

    let mut seen = HashSet::new();
    let problems: Vec<ProblemRelation> = script_problems
        .chain(src_problems)
        .chain(dst_problems)
        .chain(star_problems)
        .filter(|problem| seen.insert(problem.dedup_key()))
        .collect();

    debug!(
        "Entity mapping {} has {} problem relations",
        entity.id,
        problems.len()
    );
    problems
}

fn pointer_of(relation: &Relation) -> String {
    relation
        .json_path()
        .map(str::to_string)
        .unwrap_or_else(|| first_element_pointer(relation.src()))
}

/// Existence checks of pointers relative to an entity's root in the sample.
struct SourceProbe<'a> {
    doc: &'a Value,
    data_type: DataType,
    root: String,
}

impl<'a> SourceProbe<'a> {
    fn new(doc: &'a Value, entity: &EntityMapping, config: &MappingConfig) -> Self {
        Self {
            doc,
            data_type: config.data_type,
            root: full_path(entity, config),
        }
    }

    fn exists(&self, pointer: &str) -> bool {
        match self.data_type {
            DataType::Csv => lookup_csv_record(self.doc, pointer).is_some(),
            _ => lookup_path(self.doc, &join(&self.root, pointer)).is_some(),
        }
    }
}
