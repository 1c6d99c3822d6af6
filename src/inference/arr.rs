use std::mem::discriminant;

use serde_json::Value;
use tracing::debug;

use super::Walker;
use crate::error::BuildError;
use crate::ir::{FieldMapping, ValueKind};
use crate::naming;

impl Walker<'_> {
    /// Type an array field from its first element. The rest are not inspected.
    pub(super) fn field_for_array(
        &mut self,
        key: &str,
        items: &[Value],
        path: &str,
    ) -> Result<FieldMapping, BuildError> {
        let Some(first) = items.first() else {
            return Err(BuildError::EmptyArray { path: path.to_string() });
        };
        if items[1..].iter().any(|v| discriminant(v) != discriminant(first)) {
            debug!(path, "heterogeneous array, typed from element 0");
        }

        let element_path = format!("{path}[0]");
        match first {
            Value::Null => Err(BuildError::NullValue { path: element_path }),
            Value::Object(map) => {
                let name = self.class_name(&naming::singularize(key));
                let class_name = self.describe_object(name, map, &element_path)?;
                Ok(FieldMapping::array_of(key, ValueKind::Object, Some(class_name)))
            }
            Value::Array(_) => Ok(FieldMapping::array_of(key, ValueKind::Array, None)),
            Value::Bool(_) => Ok(FieldMapping::array_of(key, ValueKind::Boolean, None)),
            Value::Number(_) => Ok(FieldMapping::array_of(key, ValueKind::Number, None)),
            Value::String(_) => Ok(FieldMapping::array_of(key, ValueKind::String, None)),
        }
    }
}
