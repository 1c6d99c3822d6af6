//! Infer EFDataMappingKit model classes from a sample JSON document.
//!
//! The pipeline is `inference` (JSON → [`ir::ResultModel`]) → `lower`
//! (field → Objective-C property shape) → `codegen` (model → named text
//! files) → `bundle` (files → directory or zip archive).
pub mod bundle;
pub mod codegen;
pub mod config;
pub mod error;
pub mod inference;
pub mod ir;
pub mod jq_exec;
pub mod lower;
pub mod naming;
pub mod path_de;

pub use error::{BuildError, BundleError, ConfigError};
pub use inference::{build, build_from_str, CollisionPolicy, ModelBuilder};
pub use ir::{ClassDescription, FieldMapping, ResultModel, ValueKind};
