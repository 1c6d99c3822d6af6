//! JSON → class model inference.
//!
//! Walk a sample document depth-first and derive one [`ClassDescription`] per
//! object node reached through object-valued or array-of-object fields.
//!
//! Rules:
//! - Object fields name their class `prefix + Camel(key)`; array-of-object
//!   fields use the singular of the key (the class is one element).
//! - A class is registered when its node is entered, so model order is
//!   pre-order, and nested classes exist before the parent references them.
//! - Arrays are typed from element 0 only. Heterogeneous arrays are not
//!   merged; empty arrays and `null` values are rejected.
//! - Shape-identical objects under different keys stay distinct classes.
//!   Two paths deriving the same name are a collision, resolved by
//!   [`CollisionPolicy`].
pub mod arr;
pub mod obj;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::BuildError;
use crate::ir::{ClassDescription, Collision, FieldMapping, ResultModel, ValueKind};
use crate::naming;

/// Root class name used when the caller passes an empty one.
pub const DEFAULT_ROOT_NAME: &str = "root";

// ------------------------------- Policy ---------------------------------- //

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// The class whose walk completes last replaces the earlier one.
    #[default]
    Overwrite,
    /// The first registered class is kept; later ones are dropped.
    KeepFirst,
    /// Abort the build.
    Error,
}

#[derive(Clone, Debug, Default)]
pub struct BuildOptions {
    pub prefix: String,
    pub collision_policy: CollisionPolicy,
}

impl BuildOptions {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), ..Self::default() }
    }
}

// ------------------------------- Walker ---------------------------------- //

/// One build pass over one document.
pub(crate) struct Walker<'a> {
    options: &'a BuildOptions,
    model: &'a mut ResultModel,
}

impl<'a> Walker<'a> {
    fn new(options: &'a BuildOptions, model: &'a mut ResultModel) -> Self {
        Self { options, model }
    }

    fn class_name(&self, key: &str) -> String {
        naming::to_class_name(key, &self.options.prefix)
    }

    fn is_registrar(&self, name: &str) -> bool {
        name == naming::registrar_name(&self.options.prefix)
    }

    /// Claim `name` for the node at `path`. Returns whether this node owns the
    /// slot; a collision is recorded, or fails the build under `Error`.
    /// The registrar name is always taken.
    fn reserve(&mut self, name: &str, path: &str) -> Result<bool, BuildError> {
        if !self.is_registrar(name) && !self.model.contains(name) {
            self.model.insert(ClassDescription::new(name));
            return Ok(true);
        }
        if self.options.collision_policy == CollisionPolicy::Error {
            return Err(BuildError::NameCollision { name: name.to_string(), path: path.to_string() });
        }
        warn!(class = name, path, policy = ?self.options.collision_policy, "class name collision");
        self.model.record_collision(Collision { name: name.to_string(), path: path.to_string() });
        Ok(false)
    }

    /// Store a finished class according to the collision policy. A class named
    /// like the registrar is never stored; the registrar keeps its files.
    fn complete(&mut self, description: ClassDescription, owner: bool) {
        let overwrite = self.options.collision_policy == CollisionPolicy::Overwrite
            && !self.is_registrar(&description.name);
        if owner || overwrite {
            self.model.insert(description);
        }
    }

    fn field_for_value(&mut self, key: &str, value: &Value, path: &str) -> Result<FieldMapping, BuildError> {
        match value {
            Value::Null => Err(BuildError::NullValue { path: path.to_string() }),
            Value::Object(map) => {
                let name = self.class_name(key);
                let class_name = self.describe_object(name, map, path)?;
                Ok(FieldMapping::object(key, class_name))
            }
            Value::Array(items) => self.field_for_array(key, items, path),
            Value::Bool(_) => Ok(FieldMapping::primitive(key, ValueKind::Boolean)),
            Value::Number(_) => Ok(FieldMapping::primitive(key, ValueKind::Number)),
            Value::String(_) => Ok(FieldMapping::primitive(key, ValueKind::String)),
        }
    }
}

fn describe_root(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an empty object",
    }
}

// ------------------------------- Front API -------------------------------- //

/// Accumulates classes from one or more documents into a single model.
///
/// A document that fails leaves the accumulated model untouched.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    options: BuildOptions,
    model: ResultModel,
}

impl ModelBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options, model: ResultModel::new() }
    }

    /// Continue accumulating into an existing model.
    pub fn with_model(options: BuildOptions, model: ResultModel) -> Self {
        Self { options, model }
    }

    /// Add the classes of `root` and return the root class name.
    pub fn observe_document(&mut self, root: &Value, root_name: &str) -> Result<String, BuildError> {
        let map = match root {
            Value::Object(map) if !map.is_empty() => map,
            other => return Err(BuildError::InvalidRoot { found: describe_root(other) }),
        };
        let root_name = if root_name.is_empty() { DEFAULT_ROOT_NAME } else { root_name };

        let mut scratch = self.model.clone();
        let mut walker = Walker::new(&self.options, &mut scratch);
        let root_class = walker.class_name(root_name);
        let root_class = walker.describe_object(root_class, map, "$")?;
        self.model = scratch;
        Ok(root_class)
    }

    pub fn observe_str(&mut self, text: &str, root_name: &str) -> Result<String, BuildError> {
        let root = parse_document(text)?;
        self.observe_document(&root, root_name)
    }

    pub fn model(&self) -> &ResultModel {
        &self.model
    }

    pub fn finish(self) -> ResultModel {
        self.model
    }
}

pub fn parse_document(text: &str) -> Result<Value, BuildError> {
    Ok(serde_json::from_str(text)?)
}

/// Build a fresh model from one document.
pub fn build(root: &Value, root_name: &str, prefix: &str) -> Result<ResultModel, BuildError> {
    let mut builder = ModelBuilder::new(BuildOptions::with_prefix(prefix));
    builder.observe_document(root, root_name)?;
    Ok(builder.finish())
}

pub fn build_from_str(text: &str, root_name: &str, prefix: &str) -> Result<ResultModel, BuildError> {
    build(&parse_document(text)?, root_name, prefix)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(model: &ResultModel) -> Vec<&str> {
        model.class_names().collect()
    }

    #[test]
    fn pets_scenario() {
        let model = build_from_str(r#"{"name":"Alice","pets":[{"species":"cat"}]}"#, "root", "NS").unwrap();
        assert_eq!(names(&model), ["NSRoot", "NSPet"]);

        let root = model.get("NSRoot").unwrap();
        assert_eq!(root.fields.len(), 2);
        assert_eq!(root.fields[0].value_kind, ValueKind::String);
        let pets = &root.fields[1];
        assert_eq!(pets.value_kind, ValueKind::Array);
        assert_eq!(pets.element_kind, Some(ValueKind::Object));
        assert!(pets.is_collection);
        assert_eq!(pets.referenced_class_name.as_deref(), Some("NSPet"));
        assert_eq!(root.referenced_class_names.iter().collect::<Vec<_>>(), ["NSPet"]);

        let pet = model.get("NSPet").unwrap();
        assert_eq!(pet.fields.len(), 1);
        assert_eq!(pet.fields[0].external_key, "species");
        assert_eq!(pet.fields[0].value_kind, ValueKind::String);
    }

    #[test]
    fn primitive_kinds() {
        let model = build(&json!({"ok": true, "n": 1.5, "s": "x", "nums": [1, 2, 3]}), "root", "").unwrap();
        let root = model.get("Root").unwrap();
        assert_eq!(root.field("ok").unwrap().value_kind, ValueKind::Boolean);
        assert_eq!(root.field("n").unwrap().value_kind, ValueKind::Number);
        assert_eq!(root.field("s").unwrap().value_kind, ValueKind::String);

        let nums = root.field("nums").unwrap();
        assert_eq!(nums.value_kind, ValueKind::Array);
        assert_eq!(nums.element_kind, Some(ValueKind::Number));
        assert!(nums.is_collection);
        assert_eq!(nums.referenced_class_name, None);
        assert!(root.referenced_class_names.is_empty());
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn array_of_objects_creates_singular_class() {
        let model = build(&json!({"entries": [{"a": 1}]}), "root", "").unwrap();
        let entry = model.get("Entry").unwrap();
        assert_eq!(entry.fields.len(), 1);
        assert_eq!(entry.fields[0].internal_key, "a");
        assert_eq!(entry.fields[0].value_kind, ValueKind::Number);
        assert_eq!(
            model.get("Root").unwrap().field("entries").unwrap().referenced_class_name.as_deref(),
            Some("Entry")
        );
    }

    #[test]
    fn nested_objects_are_registered_in_pre_order() {
        let doc = json!({
            "user_profile": {
                "home_address": { "street": "Main", "zip_code": "123" },
                "tags": ["a", "b"]
            },
            "order_items": [{ "sku": "X1", "price": 9.5 }],
            "active": false
        });
        let model = build(&doc, "response", "AB").unwrap();
        assert_eq!(names(&model), ["ABResponse", "ABUserProfile", "ABHomeAddress", "ABOrderItem"]);

        let profile = model.get("ABUserProfile").unwrap();
        let address = profile.field("home_address").unwrap();
        assert_eq!(address.internal_key, "homeAddress");
        assert_eq!(address.value_kind, ValueKind::Object);
        assert!(!address.is_collection);
        assert_eq!(address.referenced_class_name.as_deref(), Some("ABHomeAddress"));

        let root = model.get("ABResponse").unwrap();
        let keys: Vec<&str> = root.fields.iter().map(|f| f.external_key.as_str()).collect();
        assert_eq!(keys, ["user_profile", "order_items", "active"]);
        let refs: Vec<&str> = root.referenced_class_names.iter().map(String::as_str).collect();
        assert_eq!(refs, ["ABUserProfile", "ABOrderItem"]);
    }

    #[test]
    fn only_the_first_array_element_is_inspected() {
        let model = build(&json!({"rows": [{"a": 1}, {"b": "x"}, 3]}), "root", "").unwrap();
        let row = model.get("Row").unwrap();
        assert_eq!(row.fields.len(), 1);
        assert_eq!(row.fields[0].external_key, "a");
    }

    #[test]
    fn nested_arrays_are_opaque() {
        let model = build(&json!({"matrix": [[1, 2], [3, 4]]}), "root", "").unwrap();
        let matrix = model.get("Root").unwrap().field("matrix").unwrap();
        assert_eq!(matrix.element_kind, Some(ValueKind::Array));
        assert_eq!(matrix.referenced_class_name, None);
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn same_shape_under_different_keys_gives_distinct_classes() {
        let model = build(&json!({"billing": {"city": "A"}, "shipping": {"city": "B"}}), "root", "").unwrap();
        assert_eq!(names(&model), ["Root", "Billing", "Shipping"]);
        assert!(model.collisions().is_empty());
    }

    #[test]
    fn empty_root_name_falls_back_to_default() {
        let model = build(&json!({"a": 1}), "", "NS").unwrap();
        assert_eq!(names(&model), ["NSRoot"]);
    }

    #[test]
    fn invalid_roots_are_rejected() {
        for text in ["[1,2,3]", "{}", "\"x\"", "null", "1"] {
            let err = build_from_str(text, "root", "").unwrap_err();
            assert!(matches!(err, BuildError::InvalidRoot { .. }), "{text}: {err}");
        }
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        let err = build_from_str("{", "root", "").unwrap_err();
        assert!(matches!(err, BuildError::InputParse(_)));
    }

    #[test]
    fn empty_arrays_fail_at_their_path() {
        let err = build_from_str(r#"{"tags":[]}"#, "root", "").unwrap_err();
        match err {
            BuildError::EmptyArray { path } => assert_eq!(path, "$.tags"),
            other => panic!("unexpected {other}"),
        }

        let err = build(&json!({"a": {"b": [{"c": []}]}}), "root", "").unwrap_err();
        match err {
            BuildError::EmptyArray { path } => assert_eq!(path, "$.a.b[0].c"),
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn null_values_fail_at_their_path() {
        let err = build(&json!({"a": 1, "b": null}), "root", "").unwrap_err();
        assert!(matches!(err, BuildError::NullValue { ref path } if path == "$.b"));

        let err = build(&json!({"list": [null, 1]}), "root", "").unwrap_err();
        assert!(matches!(err, BuildError::NullValue { ref path } if path == "$.list[0]"));
    }

    #[test]
    fn building_twice_is_idempotent() {
        let doc = json!({"name": "x", "owner": {"id": 1}, "items": [{"id": 2, "tags": ["t"]}]});
        let a = build(&doc, "root", "NS").unwrap();
        let b = build(&doc, "root", "NS").unwrap();
        assert_eq!(a, b);
        assert_eq!(names(&a), names(&b));
        for (x, y) in a.classes().zip(b.classes()) {
            assert_eq!(x, y);
        }
    }

    #[test]
    fn every_walked_object_gets_exactly_one_class() {
        let doc = json!({
            "a": {"b": {"c": {"d": 1}}},
            "lists": [{"inner": [{"leaf": true}]}],
            "prims": [1, 2],
            "s": "x"
        });
        let model = build(&doc, "root", "").unwrap();
        assert_eq!(names(&model), ["Root", "A", "B", "C", "List", "Inner"]);
    }

    #[test]
    fn collision_overwrite_keeps_last_completed() {
        // `item` (object) and `items` (array of objects) both derive `Item`
        let doc = json!({"item": {"a": 1}, "items": [{"b": "x"}]});
        let model = build(&doc, "root", "").unwrap();
        assert_eq!(names(&model), ["Root", "Item"]);
        assert_eq!(model.get("Item").unwrap().fields[0].external_key, "b");
        assert_eq!(model.collisions().len(), 1);
        assert_eq!(model.collisions()[0].name, "Item");
        assert_eq!(model.collisions()[0].path, "$.items[0]");
    }

    #[test]
    fn collision_keep_first() {
        let doc = json!({"item": {"a": 1}, "items": [{"b": "x"}]});
        let options = BuildOptions { prefix: String::new(), collision_policy: CollisionPolicy::KeepFirst };
        let mut builder = ModelBuilder::new(options);
        builder.observe_document(&doc, "root").unwrap();
        let model = builder.finish();
        assert_eq!(model.get("Item").unwrap().fields[0].external_key, "a");
        assert_eq!(model.collisions().len(), 1);
    }

    #[test]
    fn collision_error_aborts() {
        let doc = json!({"item": {"a": 1}, "items": [{"b": "x"}]});
        let options = BuildOptions { prefix: String::new(), collision_policy: CollisionPolicy::Error };
        let err = ModelBuilder::new(options).observe_document(&doc, "root").unwrap_err();
        assert!(matches!(err, BuildError::NameCollision { ref name, .. } if name == "Item"));
    }

    #[test]
    fn registrar_name_is_reserved() {
        let doc = json!({"mapper": {"id": 1}, "x": 2});
        for policy in [CollisionPolicy::Overwrite, CollisionPolicy::KeepFirst] {
            let options = BuildOptions { prefix: "NS".into(), collision_policy: policy };
            let mut builder = ModelBuilder::new(options);
            builder.observe_document(&doc, "root").unwrap();
            let model = builder.finish();
            assert_eq!(names(&model), ["NSRoot"], "{policy:?}");
            assert_eq!(model.collisions().len(), 1);
            assert_eq!(model.collisions()[0].name, "NSMapper");
            assert_eq!(model.collisions()[0].path, "$.mapper");
        }

        let options = BuildOptions { prefix: "NS".into(), collision_policy: CollisionPolicy::Error };
        let err = ModelBuilder::new(options).observe_document(&doc, "root").unwrap_err();
        assert!(matches!(err, BuildError::NameCollision { ref name, .. } if name == "NSMapper"));

        // root named like the registrar
        let model = build(&json!({"a": 1}), "mapper", "NS").unwrap();
        assert!(model.is_empty());
        assert_eq!(model.collisions()[0].path, "$");
    }

    #[test]
    fn child_reusing_an_ancestor_name_loses_to_the_ancestor() {
        let doc = json!({"root": {"leaf": 1}, "other": 2});
        let model = build(&doc, "root", "").unwrap();
        assert_eq!(names(&model), ["Root"]);
        let root = model.get("Root").unwrap();
        assert_eq!(root.fields.len(), 2);
        assert_eq!(root.field("root").unwrap().referenced_class_name.as_deref(), Some("Root"));
        assert_eq!(model.collisions().len(), 1);
    }

    #[test]
    fn builder_accumulates_documents() {
        let mut builder = ModelBuilder::new(BuildOptions::with_prefix("NS"));
        let first = builder.observe_document(&json!({"user": {"id": 1}}), "login").unwrap();
        let second = builder.observe_document(&json!({"posts": [{"title": "t"}]}), "feed").unwrap();
        assert_eq!(first, "NSLogin");
        assert_eq!(second, "NSFeed");
        assert_eq!(names(builder.model()), ["NSLogin", "NSUser", "NSFeed", "NSPost"]);
    }

    #[test]
    fn observe_str_reports_parse_errors() {
        let mut builder = ModelBuilder::new(BuildOptions::with_prefix("NS"));
        assert_eq!(builder.observe_str(r#"{"id": 1}"#, "user").unwrap(), "NSUser");
        assert!(matches!(builder.observe_str("{\"id\":", "user"), Err(BuildError::InputParse(_))));
        assert_eq!(builder.model().len(), 1);
    }

    #[test]
    fn failed_document_leaves_model_untouched() {
        let mut builder = ModelBuilder::new(BuildOptions::default());
        builder.observe_document(&json!({"a": 1}), "first").unwrap();
        let before = builder.model().clone();
        let err = builder.observe_document(&json!({"x": {"y": []}}), "second").unwrap_err();
        assert!(matches!(err, BuildError::EmptyArray { .. }));
        assert_eq!(builder.model(), &before);
        assert_eq!(names(builder.model()), ["First"]);
    }

    #[test]
    fn seeded_model_collides_with_repeated_root() {
        let seed = build(&json!({"a": 1}), "root", "").unwrap();
        let mut builder = ModelBuilder::with_model(BuildOptions::default(), seed);
        builder.observe_document(&json!({"b": "x"}), "root").unwrap();
        let model = builder.finish();
        assert_eq!(model.len(), 1);
        assert_eq!(model.get("Root").unwrap().fields[0].external_key, "b");
        assert_eq!(model.collisions()[0].path, "$");
    }
}
