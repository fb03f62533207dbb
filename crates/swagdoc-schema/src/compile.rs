//! # Field Compiler
//!
//! Turns one [`FieldDescriptor`] into the [`SchemaFragment`] published under
//! its name in a model's `properties`, or into nothing when the field must
//! not be published at all.
//!
//! ## Rules, in order
//!
//! 1. Help text that is present but empty hides the field.
//! 2. Non-empty help text becomes the trimmed `description`.
//! 3. A nested shape compiles to `{type: object, $ref}` and stops there;
//!    write-only nesting points at the `Write` variant.
//! 4. Otherwise the declared kind gives `(type, format)`.
//! 5. `hidden` fields are dropped.
//! 6. Arrays compile their item (a model reference, or the child field
//!    through these same rules).
//! 7. Enum-capable kinds publish their choice keys and take their type from
//!    the first key.
//! 8. `format` is only published when it differs from `type`.
//! 9. A non-null default is published.
//! 10. Numeric types publish `minimum` and `maximum`, each when declared.
//! 11. Length bounds are published for any type.

use swagdoc_core::naming::write_model_name;
use swagdoc_core::{
    definition_ref, primitive_type, ArrayItem, DataType, FieldDescriptor, Nested, SchemaFragment,
};

/// Compile one field. `None` means the field is omitted from the model.
pub fn compile_field(field: &FieldDescriptor) -> Option<SchemaFragment> {
    let mut fragment = SchemaFragment::default();

    match field.help_text.as_deref() {
        Some("") => return None,
        Some(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                fragment.description = Some(trimmed.to_string());
            }
        }
        None => {}
    }

    if let Nested::Object(schema) = &field.nested {
        let name = if field.write_only {
            write_model_name(schema.model_name())
        } else {
            schema.model_name().to_string()
        };
        fragment.schema_type = Some("object".to_string());
        fragment.ref_path = Some(definition_ref(&name));
        return Some(fragment);
    }

    let mut data_type = field.data_type();
    if data_type.data_type == "hidden" {
        return None;
    }

    if data_type.data_type == "array" {
        fragment.items = Some(Box::new(compile_item(&field.nested)));
        data_type.data_format = data_type.data_type.clone();
    } else if data_type.is_enum_capable() {
        let keys = field
            .choices
            .as_ref()
            .map(|choices| choices.keys())
            .unwrap_or_default();
        match keys.first() {
            Some(first) => {
                data_type = primitive_type(first);
                fragment.enum_values = Some(keys);
            }
            // A choice kind without choices has nothing to enumerate.
            None => data_type = DataType::string(),
        }
    }

    if data_type.data_format != data_type.data_type {
        fragment.format = Some(data_type.data_format.clone());
    }
    fragment.schema_type = Some(data_type.data_type.clone());

    if let Some(default) = field.default.as_ref().filter(|v| !v.is_null()) {
        fragment.default = Some(default.clone());
    }

    if data_type.is_numeric() {
        fragment.minimum = field.min_value.clone();
        fragment.maximum = field.max_value.clone();
    }

    fragment.min_length = field.min_length;
    fragment.max_length = field.max_length;

    Some(fragment)
}

/// Compile the item schema of an array field.
fn compile_item(nested: &Nested) -> SchemaFragment {
    match nested {
        Nested::ArrayOf(ArrayItem::Object(schema)) => SchemaFragment::reference(schema.model_name()),
        Nested::ArrayOf(ArrayItem::Field(child)) => {
            compile_field(child).unwrap_or_else(|| SchemaFragment::typed("string"))
        }
        // A nested object behind an array kind is still a list of that shape.
        Nested::Object(schema) => SchemaFragment::reference(schema.model_name()),
        Nested::None => SchemaFragment::typed("string"),
    }
}
