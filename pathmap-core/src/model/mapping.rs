use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::ids::{EntityMappingId, EntityRef};
use super::relation::PathPointer;
use crate::errors::{MappingError, MappingResult};

/// ## Structure
/// Mapping configuration as exchanged with the backend and the editor.
/// Fields the engine does not interpret are kept in `extra` and written back
/// unchanged.
///
/// ```text
/// MappingConfig
///   ├── dataType: JSON | XML | CSV | BINARY_DOC
///   ├── sampleContent: String
///   ├── metadata: Option<String>            (backend only)
///   └── entityMappings: Vec<EntityMapping>
///       ├── id: { id, uiId }
///       ├── entityRelationConfigs: [{ parentId, srcRelativeRootPath }]
///       ├── columns: [{ srcColumnPath, dstCyodaColumnPath, transformer }]
///       ├── functionalMappings: [{ srcPaths, dstPath, statements }]
///       ├── cobiCoreMetadata: [{ name, dstCyodaColumnPath }]
///       ├── script: { inputSrcPaths }
///       ├── entityFilter
///       └── cobiPathsRelations, isPolymorphicList,
///           isShowNoneMappingFields, virtual          (editor only)
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MappingConfig {
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default)]
    pub sample_content: String,
    #[serde(default)]
    pub entity_mappings: Vec<EntityMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl MappingConfig {
    pub fn from_json_str(raw: &str) -> MappingResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json_string_pretty(&self) -> MappingResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Position of the entity mapping `target` designates. Persisted ids are
    /// compared across the whole configuration before transient ones.
    pub fn entity_index(&self, target: &EntityMappingId) -> Option<usize> {
        target
            .refs()
            .iter()
            .find_map(|reference| self.entity_index_by_ref(reference))
    }

    pub fn entity_index_by_ref(&self, reference: &EntityRef) -> Option<usize> {
        self.entity_mappings
            .iter()
            .position(|entity| entity.id.matches(reference))
    }

    pub fn find_entity(&self, target: &EntityMappingId) -> Option<&EntityMapping> {
        self.entity_index(target)
            .map(|index| &self.entity_mappings[index])
    }

    /// Resolves a textual reference: a persisted id when one matches,
    /// otherwise a numeric ui id.
    pub fn entity_index_by_key(&self, key: &str) -> MappingResult<usize> {
        let key = key.trim();
        if key.is_empty() {
            return Err(MappingError::InvalidEntityRef(
                "Entity reference cannot be empty".to_string(),
            ));
        }
        if let Some(index) = self.entity_index_by_ref(&EntityRef::Persisted(key.to_string())) {
            return Ok(index);
        }
        key.parse::<u64>()
            .ok()
            .and_then(|ui_id| self.entity_index_by_ref(&EntityRef::Transient(ui_id)))
            .ok_or_else(|| MappingError::EntityNotFound(key.to_string()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    #[default]
    Json,
    Xml,
    Csv,
    BinaryDoc,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Json => "JSON",
            DataType::Xml => "XML",
            DataType::Csv => "CSV",
            DataType::BinaryDoc => "BINARY_DOC",
        }
    }
}

/// One extraction rule producing instances of a target entity.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntityMapping {
    #[serde(default)]
    pub id: EntityMappingId,
    #[serde(default)]
    pub entity_class: String,
    #[serde(default)]
    pub entity_relation_configs: Vec<EntityRelationConfig>,
    #[serde(default)]
    pub columns: Vec<ColumnMapping>,
    #[serde(default)]
    pub functional_mappings: Vec<FunctionalMapping>,
    #[serde(default)]
    pub cobi_core_metadata: Vec<CoreMetadataMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<Script>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_filter: Option<Value>,

    // Editor-only companion state, carried in the metadata blob when persisted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cobi_paths_relations: Vec<PathPointer>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_polymorphic_list: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_show_none_mapping_fields: Option<bool>,
    #[serde(default, rename = "virtual", skip_serializing_if = "Option::is_none")]
    pub is_virtual: Option<bool>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl EntityMapping {
    /// The relation config describing where this entity sits in the document.
    pub fn root_relation(&self) -> Option<&EntityRelationConfig> {
        self.entity_relation_configs.first()
    }

    pub fn parent_id(&self) -> Option<&EntityMappingId> {
        self.root_relation()
            .and_then(|relation| relation.parent_id.as_ref())
            .filter(|parent| !parent.is_empty())
    }

    pub fn script_input_paths(&self) -> &[String] {
        self.script
            .as_ref()
            .map(|script| script.input_src_paths.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntityRelationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityMappingId>,
    #[serde(default)]
    pub src_relative_root_path: String,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    #[serde(default)]
    pub src_column_path: String,
    #[serde(default)]
    pub dst_cyoda_column_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformer: Option<Transformer>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Value transformer chain applied to a column. Either a leaf carrying a
/// `transformerKey` or a group of children.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transformer {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransformerKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformer_key: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Transformer>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformerKind {
    Single,
    Composite,
}

pub const SET_DST_VALUE: &str = "SET_DST_VALUE";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionalMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub src_paths: Vec<String>,
    #[serde(default)]
    pub dst_path: String,
    #[serde(default)]
    pub statements: Vec<Statement>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst_path: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Statement {
    pub fn sets_dst_value(&self) -> bool {
        self.kind.as_deref() == Some(SET_DST_VALUE)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoreMetadataMapping {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dst_cyoda_column_path: String,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    #[serde(default)]
    pub input_src_paths: Vec<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Filter group used when an entity mapping carries none.
pub fn default_entity_filter() -> Value {
    json!({
        "@bean": "com.cyoda.core.conditions.GroupCondition",
        "operator": "AND",
        "conditions": []
    })
}

fn is_false(value: &bool) -> bool {
    !*value
}
