use serde::{Deserialize, Serialize};

use super::ids::EntityMappingId;

/// Derived link between a destination column path and a source path. Never
/// persisted directly.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    #[serde(default)]
    pub entity_class: String,
    #[serde(default)]
    pub entity_mapping_id: EntityMappingId,
    #[serde(rename = "type")]
    pub relation_type: RelationType,
    pub column: RelationColumn,
}

impl Relation {
    pub fn src(&self) -> &str {
        &self.column.src_column_path
    }

    pub fn dst(&self) -> &str {
        &self.column.dst_column_path
    }

    pub fn json_path(&self) -> Option<&str> {
        self.column.json_path.as_deref()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RelationColumn {
    pub src_column_path: String,
    pub dst_column_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_path: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationType {
    #[serde(rename = "columnMapping")]
    ColumnMapping,
    #[serde(rename = "functionalMapping")]
    FunctionalMapping,
    #[serde(rename = "functionalMappingInner")]
    FunctionalMappingInner,
    #[serde(rename = "cobiCoreMetadata")]
    CoreMetadata,
    #[serde(rename = "cobiJsPaths")]
    ScriptPath,
}

impl RelationType {
    /// Whether the relation's source side is a path into the sample document.
    pub fn has_source_path(&self) -> bool {
        matches!(
            self,
            RelationType::ColumnMapping | RelationType::FunctionalMapping | RelationType::ScriptPath
        )
    }
}

/// Memoized resolution of a wildcarded source path to a concrete pointer.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PathPointer {
    #[serde(default)]
    pub json_path: String,
    #[serde(default)]
    pub src_column_path: String,
    #[serde(default)]
    pub dst_column_path: String,
}

impl PathPointer {
    pub fn new(
        json_path: impl Into<String>,
        src_column_path: impl Into<String>,
        dst_column_path: impl Into<String>,
    ) -> Self {
        Self {
            json_path: json_path.into(),
            src_column_path: src_column_path.into(),
            dst_column_path: dst_column_path.into(),
        }
    }

    pub fn is_for(&self, src: &str, dst: &str) -> bool {
        self.src_column_path == src && self.dst_column_path == dst
    }
}
