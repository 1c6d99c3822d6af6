// Lower inferred field mappings to Objective-C property shapes.

use crate::ir::{FieldMapping, ValueKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjcProperty {
    /// Declared type, pointer star included (`NSString *`, `BOOL `).
    pub type_decl: String,
    /// Memory attribute (`copy`, `strong`, `assign`).
    pub attribute: &'static str,
    /// Class handed to EFMapping as `internalClass`.
    pub internal_class: String,
    /// Registered with `mappingForArray:` instead of `mapping:`.
    pub collection: bool,
}

/// Lower one field.
///
/// Fields built by inference always carry `referenced_class_name` when they
/// are (or hold) objects, and `element_kind` when they are arrays. A
/// hand-built field missing either lowers to an untyped `NSDictionary`.
pub fn lower_field(field: &FieldMapping) -> ObjcProperty {
    match field.value_kind {
        ValueKind::Array => ObjcProperty {
            type_decl: "NSArray *".to_string(),
            attribute: "copy",
            internal_class: element_class(field),
            collection: true,
        },
        kind => {
            let (type_decl, attribute) = scalar_decl(kind, field.referenced_class_name.as_deref());
            ObjcProperty {
                type_decl,
                attribute,
                internal_class: internal_class(kind, field.referenced_class_name.as_deref()),
                collection: false,
            }
        }
    }
}

fn scalar_decl(kind: ValueKind, class_name: Option<&str>) -> (String, &'static str) {
    match kind {
        ValueKind::String => ("NSString *".to_string(), "copy"),
        ValueKind::Number => ("NSNumber *".to_string(), "strong"),
        ValueKind::Boolean => ("BOOL ".to_string(), "assign"),
        ValueKind::Array => ("NSArray *".to_string(), "copy"),
        ValueKind::Object => (format!("{} *", object_class(class_name)), "strong"),
    }
}

// booleans box as NSNumber on the mapping side
fn internal_class(kind: ValueKind, class_name: Option<&str>) -> String {
    match kind {
        ValueKind::String => "NSString".to_string(),
        ValueKind::Number | ValueKind::Boolean => "NSNumber".to_string(),
        ValueKind::Array => "NSArray".to_string(),
        ValueKind::Object => object_class(class_name).to_string(),
    }
}

fn object_class(class_name: Option<&str>) -> &str {
    class_name.unwrap_or(UNTYPED_OBJECT)
}

const UNTYPED_OBJECT: &str = "NSDictionary";

// Nested arrays stay an opaque NSArray; the innermost element class is not
// carried through.
fn element_class(field: &FieldMapping) -> String {
    match field.element_kind {
        Some(element) => internal_class(element, field.referenced_class_name.as_deref()),
        None => UNTYPED_OBJECT.to_string(),
    }
}
