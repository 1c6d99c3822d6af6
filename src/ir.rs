// Inferred class model handed from the builder to the renderer.
// Owned strings only; no serde_json::Value past this point.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

/// One JSON key and the generated field it maps onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMapping {
    pub external_key: String,
    pub internal_key: String,
    pub value_kind: ValueKind,
    /// Kind of element 0, only for `ValueKind::Array`.
    pub element_kind: Option<ValueKind>,
    /// Set iff the field holds a custom class, directly or as collection element.
    pub referenced_class_name: Option<String>,
    pub is_collection: bool,
}

impl FieldMapping {
    pub fn primitive(external_key: &str, kind: ValueKind) -> Self {
        Self {
            external_key: external_key.to_string(),
            internal_key: crate::naming::to_ivar_name(external_key),
            value_kind: kind,
            element_kind: None,
            referenced_class_name: None,
            is_collection: false,
        }
    }

    pub fn object(external_key: &str, class_name: String) -> Self {
        Self {
            referenced_class_name: Some(class_name),
            ..Self::primitive(external_key, ValueKind::Object)
        }
    }

    pub fn array_of(external_key: &str, element_kind: ValueKind, class_name: Option<String>) -> Self {
        Self {
            element_kind: Some(element_kind),
            referenced_class_name: class_name,
            is_collection: true,
            ..Self::primitive(external_key, ValueKind::Array)
        }
    }

    pub fn is_custom(&self) -> bool {
        self.referenced_class_name.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDescription {
    pub name: String,
    pub fields: Vec<FieldMapping>,
    /// Nested custom classes, first-seen order.
    pub referenced_class_names: IndexSet<String>,
}

impl ClassDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            referenced_class_names: IndexSet::new(),
        }
    }

    pub fn push_field(&mut self, field: FieldMapping) {
        if let Some(class_name) = &field.referenced_class_name {
            self.referenced_class_names.insert(class_name.clone());
        }
        self.fields.push(field);
    }

    pub fn field(&self, external_key: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|f| f.external_key == external_key)
    }
}

/// Two JSON paths that derived the same class name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub name: String,
    pub path: String,
}

/// Class name → description, in first-encounter (pre-order) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultModel {
    classes: IndexMap<String, ClassDescription>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    collisions: Vec<Collision>,
}

impl ResultModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ClassDescription> {
        self.classes.get(name)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDescription> {
        self.classes.values()
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Insert or replace by name. A replaced entry keeps its position.
    pub fn insert(&mut self, description: ClassDescription) {
        self.classes.insert(description.name.clone(), description);
    }

    pub(crate) fn record_collision(&mut self, collision: Collision) {
        self.collisions.push(collision);
    }
}
