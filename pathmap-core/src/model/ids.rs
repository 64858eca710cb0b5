use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Identity of an entity mapping as it travels in the configuration: a
/// persisted backend id, a transient UI id, or both.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct EntityMappingId {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_id: Option<u64>,
}

impl EntityMappingId {
    pub fn persisted(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ui_id: None,
        }
    }

    pub fn transient(ui_id: u64) -> Self {
        Self {
            id: None,
            ui_id: Some(ui_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.persisted_ref().is_none() && self.ui_id.is_none()
    }

    fn persisted_ref(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// References to try when resolving this id, persisted first.
    pub fn refs(&self) -> Vec<EntityRef> {
        let mut refs = Vec::with_capacity(2);
        if let Some(id) = self.persisted_ref() {
            refs.push(EntityRef::Persisted(id.to_string()));
        }
        if let Some(ui_id) = self.ui_id {
            refs.push(EntityRef::Transient(ui_id));
        }
        refs
    }

    pub fn matches(&self, reference: &EntityRef) -> bool {
        match reference {
            EntityRef::Persisted(id) => self.persisted_ref() == Some(id.as_str()),
            EntityRef::Transient(ui_id) => self.ui_id == Some(*ui_id),
        }
    }

    /// True when both ids point at the same entity mapping.
    pub fn same_entity(&self, other: &EntityMappingId) -> bool {
        other.refs().iter().any(|reference| self.matches(reference))
    }
}

impl Display for EntityMappingId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.persisted_ref(), self.ui_id) {
            (Some(id), Some(ui_id)) => write!(f, "{} (ui {})", id, ui_id),
            (Some(id), None) => write!(f, "{}", id),
            (None, Some(ui_id)) => write!(f, "ui {}", ui_id),
            (None, None) => write!(f, "<unidentified>"),
        }
    }
}

/// A single way of addressing an entity mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Persisted(String),
    Transient(u64),
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityRef::Persisted(id) => write!(f, "{}", id),
            EntityRef::Transient(ui_id) => write!(f, "ui {}", ui_id),
        }
    }
}
