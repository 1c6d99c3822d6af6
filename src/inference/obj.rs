use serde_json::{Map, Value};
use tracing::debug;

use super::Walker;
use crate::error::BuildError;
use crate::ir::ClassDescription;

impl Walker<'_> {
    /// Describe the object at `path` as class `name`; returns the name under
    /// which the parent should reference it.
    pub(super) fn describe_object(
        &mut self,
        name: String,
        map: &Map<String, Value>,
        path: &str,
    ) -> Result<String, BuildError> {
        let owner = self.reserve(&name, path)?;

        let mut description = ClassDescription::new(name.clone());
        for (key, value) in map {
            let field_path = format!("{path}.{key}");
            // nested classes register before this field references them
            let field = self.field_for_value(key, value, &field_path)?;
            description.push_field(field);
        }

        debug!(class = %name, path, fields = description.fields.len(), "described class");
        self.complete(description, owner);
        Ok(name)
    }
}
