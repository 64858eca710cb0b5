//! Pointer resolution for entity mappings over polymorphic lists.
//!
//! Elements of a polymorphic list do not share one shape, so picking element
//! `0` for every wildcard would point many relations at fields that only
//! exist in other elements. Instead every concrete location matching a
//! relation's source pattern is enumerated, and relations are grouped onto
//! the same element whenever their wildcard choices agree.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::collector::{entity_relations, CollectContext};
use crate::config::EngineConfig;
use crate::model::{DataType, EntityMapping, MappingConfig, PathPointer};
use crate::paths::full_path;
use crate::paths::lookup::{lookup, step};
use crate::paths::notation::{
    first_element_pointer, generalize_indices, strip_root, substitute_wildcards, to_access_path,
    WILDCARD,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SearchError {
    #[error("Entity root '{0}' does not exist in the sample document")]
    RootNotFound(String),
    #[error("More than {0} matches for '{1}'")]
    TooManyMatches(usize, String),
}

/// One concrete location matching a source pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub pointer: String,
    /// Element chosen at each wildcard, in pattern order.
    pub choices: Vec<String>,
}

/// Fresh pointer cache for a polymorphic entity mapping. Relations are
/// resolved in collection order and the result replaces the entity's cache.
pub fn resolve_for_polymorphic_entity(
    entity: &EntityMapping,
    config: &MappingConfig,
    sample_doc: &Value,
    engine: &EngineConfig,
) -> Vec<PathPointer> {
    let root = full_path(entity, config);
    let mut chosen: Vec<Vec<String>> = Vec::new();
    let mut resolved: Vec<PathPointer> = Vec::new();

    let relations = entity_relations(entity, &CollectContext::default());
    for relation in relations
        .iter()
        .filter(|relation| relation.relation_type.has_source_path())
    {
        let (src, dst) = (relation.src(), relation.dst());
        if resolved.iter().any(|entry| entry.is_for(src, dst)) {
            continue;
        }

        let candidates = match search(sample_doc, config.data_type, &root, src, engine) {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!("Search for '{}' failed, using first elements: {}", src, err);
                Vec::new()
            }
        };

        let pointer = match select_candidate(&candidates, &chosen) {
            Some(candidate) => {
                chosen.push(candidate.choices.clone());
                candidate.pointer.clone()
            }
            None => first_element_pointer(src),
        };
        debug!("Resolved {} -> {} to {}", src, dst, pointer);
        resolved.push(PathPointer::new(pointer, src, dst));
    }

    resolved
}

/// Switches an entity mapping in or out of polymorphic mode.
///
/// Enabling re-resolves every pointer against the sample. Disabling collapses
/// the pointers of each source pattern onto the first one seen and rewrites
/// source references in the entity that named a discarded pointer. Disabling
/// cannot be undone.
pub fn change_is_polymorphic_list(
    config: &mut MappingConfig,
    entity_index: usize,
    enabled: bool,
    sample_doc: &Value,
    engine: &EngineConfig,
) {
    let Some(entity) = config.entity_mappings.get(entity_index) else {
        warn!("No entity mapping at index {}", entity_index);
        return;
    };

    if enabled {
        let pointers = resolve_for_polymorphic_entity(entity, config, sample_doc, engine);
        let entity = &mut config.entity_mappings[entity_index];
        info!(
            "Entity mapping {} is now a polymorphic list ({} pointers)",
            entity.id,
            pointers.len()
        );
        entity.is_polymorphic_list = true;
        entity.cobi_paths_relations = pointers;
    } else {
        let entity = &mut config.entity_mappings[entity_index];
        entity.is_polymorphic_list = false;
        let rewritten = collapse_to_canonical(entity);
        info!(
            "Entity mapping {} is no longer a polymorphic list ({} pointers collapsed)",
            entity.id, rewritten
        );
    }
}

/// Every location under the entity root matching `src`, in document order.
pub fn search(
    sample_doc: &Value,
    data_type: DataType,
    root: &str,
    src: &str,
    engine: &EngineConfig,
) -> Result<Vec<Candidate>, SearchError> {
    let base = match data_type {
        DataType::Csv => match sample_doc {
            Value::Array(records) => records.first(),
            other => Some(other),
        },
        _ => lookup(sample_doc, &to_access_path(root)),
    }
    .ok_or_else(|| SearchError::RootNotFound(root.to_string()))?;

    let pattern = pattern_segments(src);
    let mut matches = Vec::new();
    let mut choices = Vec::new();
    walk(base, &pattern, &mut choices, &mut matches, engine.max_search_matches, src)?;

    let mut seen = HashSet::new();
    Ok(matches
        .into_iter()
        .map(|choices| Candidate {
            pointer: substitute_wildcards(src, &choices),
            choices,
        })
        .filter(|candidate| seen.insert(candidate.pointer.clone()))
        .collect())
}

/// Prefers a candidate on an element some other relation already uses, then
/// one on an element not used yet, then the first one.
fn select_candidate<'a>(candidates: &'a [Candidate], chosen: &[Vec<String>]) -> Option<&'a Candidate> {
    candidates
        .iter()
        .find(|candidate| chosen.iter().any(|prev| compatible(prev, &candidate.choices)))
        .or_else(|| {
            candidates
                .iter()
                .find(|candidate| !chosen.contains(&candidate.choices))
        })
        .or_else(|| candidates.first())
}

/// Same number of wildcards and the same element at each of them.
fn compatible(previous: &[String], choices: &[String]) -> bool {
    !choices.is_empty() && previous == choices
}

fn collapse_to_canonical(entity: &mut EntityMapping) -> usize {
    let mut canonical: IndexMap<String, String> = IndexMap::new();
    for entry in &entity.cobi_paths_relations {
        let key = generalize_indices(&entry.json_path, &entry.src_column_path);
        canonical.entry(key).or_insert_with(|| entry.json_path.clone());
    }

    let mut replaced: Vec<(String, String)> = Vec::new();
    for entry in entity.cobi_paths_relations.iter_mut() {
        let key = generalize_indices(&entry.json_path, &entry.src_column_path);
        if let Some(target) = canonical.get(&key) {
            if *target != entry.json_path {
                replaced.push((entry.json_path.clone(), target.clone()));
                entry.json_path = target.clone();
            }
        }
    }

    for (old, new) in &replaced {
        rewrite_references(entity, old, new);
    }
    replaced.len()
}

fn rewrite_references(entity: &mut EntityMapping, old: &str, new: &str) {
    let rewrite = |path: &mut String| {
        if path.as_str() == old {
            *path = new.to_string();
        }
    };

    entity
        .columns
        .iter_mut()
        .for_each(|column| rewrite(&mut column.src_column_path));
    entity
        .functional_mappings
        .iter_mut()
        .flat_map(|functional| functional.src_paths.iter_mut())
        .for_each(rewrite);
    if let Some(script) = entity.script.as_mut() {
        script.input_src_paths.iter_mut().for_each(rewrite);
    }
    entity
        .cobi_paths_relations
        .iter_mut()
        .for_each(|entry| rewrite(&mut entry.src_column_path));
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternSegment {
    /// Literal key; `implied` counts wildcards embedded in the key, each of
    /// which is pinned to element `0`.
    Key { name: String, implied: usize },
    Any,
}

fn pattern_segments(src: &str) -> Vec<PatternSegment> {
    let mut segments = Vec::new();
    for raw in strip_root(src).split('/') {
        let trimmed = raw.trim_end_matches('.');
        if trimmed.is_empty() {
            continue;
        }
        let name = trimmed.trim_end_matches(WILDCARD);
        let trailing = trimmed.len() - name.len();
        if !name.is_empty() {
            segments.push(PatternSegment::Key {
                name: first_element_pointer(name),
                implied: name.matches(WILDCARD).count(),
            });
        }
        segments.extend(std::iter::repeat(PatternSegment::Any).take(trailing));
    }
    segments
}

fn walk(
    node: &Value,
    pattern: &[PatternSegment],
    choices: &mut Vec<String>,
    matches: &mut Vec<Vec<String>>,
    limit: usize,
    src: &str,
) -> Result<(), SearchError> {
    let Some((head, rest)) = pattern.split_first() else {
        if matches.len() >= limit {
            return Err(SearchError::TooManyMatches(limit, src.to_string()));
        }
        matches.push(choices.clone());
        return Ok(());
    };

    match head {
        PatternSegment::Key { name, implied } => {
            if let Some(child) = step(node, name) {
                let depth = choices.len();
                choices.extend(std::iter::repeat("0".to_string()).take(*implied));
                walk(child, rest, choices, matches, limit, src)?;
                choices.truncate(depth);
            }
        }
        PatternSegment::Any => match node {
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    choices.push(index.to_string());
                    walk(child, rest, choices, matches, limit, src)?;
                    choices.pop();
                }
            }
            Value::Object(map) => {
                for (key, child) in map {
                    choices.push(key.clone());
                    walk(child, rest, choices, matches, limit, src)?;
                    choices.pop();
                }
            }
            _ => {}
        },
    }
    Ok(())
}
