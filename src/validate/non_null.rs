use hashbrown::HashSet;
use serde_json::{Map as JSMap, Value as JSValue};

use crate::error::{Error, ErrorKind, Result};
use crate::schema::{Schema, SchemaField, SchemaFields, SchemaInterfaces, SchemaType};

/// Checks that a payload object carries a non-null value for every non-null
/// field of a type, except for one excluded field name.
///
/// Fields are checked in schema declaration order and the first violation is
/// reported, naming the type and the field. For object types, fields inherited
/// from implemented interfaces are checked after the type's own fields. Types
/// without fields, and type names the schema doesn't know, pass trivially.
///
/// The exclusion covers mutations that supply one field out-of-band, e.g. an
/// identifier taken from the request path rather than the payload.
pub fn ensure_non_nulls(
    schema: &Schema<'_>,
    type_name: &str,
    object: &JSMap<String, JSValue>,
    excluded_field: &str,
) -> Result<()> {
    let typ = match schema.get_type(type_name) {
        Some(typ) => typ,
        None => return Ok(()),
    };

    match typ {
        SchemaType::Object(object_type) => {
            let mut checked: HashSet<&str> = HashSet::new();
            for field in object_type.get_fields() {
                require(object_type.name, field, object, excluded_field)?;
                checked.insert(field.name);
            }
            for interface_name in object_type.get_interfaces() {
                let interface = match schema.get_type(interface_name).and_then(SchemaType::interface)
                {
                    Some(interface) => interface,
                    None => continue,
                };
                for field in interface.get_fields() {
                    if checked.insert(field.name) {
                        require(object_type.name, field, object, excluded_field)?;
                    }
                }
            }
            Ok(())
        }
        SchemaType::Interface(interface) => {
            for field in interface.get_fields() {
                require(interface.name, field, object, excluded_field)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn require(
    type_name: &str,
    field: &SchemaField<'_>,
    object: &JSMap<String, JSValue>,
    excluded_field: &str,
) -> Result<()> {
    if !field.output_type.is_required() || field.name == excluded_field {
        return Ok(());
    }

    match object.get(field.name) {
        Some(value) if !value.is_null() => Ok(()),
        _ => Err(Error::new(ErrorKind::MissingField {
            type_name: type_name.to_string(),
            field_name: field.name.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ASTContext;
    use crate::schema::sdl::parser::ParseSdl;
    use indoc::indoc;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> JSMap<String, JSValue> {
        value.as_object().unwrap().clone()
    }

    fn test_schema(ctx: &ASTContext) -> &Schema<'_> {
        Schema::parse(
            ctx,
            indoc! {"
                type T {
                    req: String!
                    notReq: String
                    alsoReq: String!
                }
            "},
        )
        .unwrap()
    }

    #[test]
    fn all_present() {
        let ctx = ASTContext::new();
        let schema = test_schema(&ctx);
        let object = payload(json!({"req": "here", "notReq": "here", "alsoReq": "here"}));
        assert!(ensure_non_nulls(schema, "T", &object, "").is_ok());
    }

    #[test]
    fn only_non_null_present() {
        let ctx = ASTContext::new();
        let schema = test_schema(&ctx);
        let object = payload(json!({"req": "here", "alsoReq": "here"}));
        assert!(ensure_non_nulls(schema, "T", &object, "").is_ok());
    }

    #[test]
    fn missing_non_null() {
        let ctx = ASTContext::new();
        let schema = test_schema(&ctx);
        let object = payload(json!({"req": "here", "notReq": "here"}));

        let error = ensure_non_nulls(schema, "T", &object, "").unwrap_err();
        assert_eq!(
            error.message(),
            "type T requires a value for field alsoReq, but no value present"
        );
    }

    #[test]
    fn missing_all_non_null_reports_first_in_declaration_order() {
        let ctx = ASTContext::new();
        let schema = test_schema(&ctx);
        let object = payload(json!({"notReq": "here"}));

        let error = ensure_non_nulls(schema, "T", &object, "").unwrap_err();
        assert_eq!(
            error.message(),
            "type T requires a value for field req, but no value present"
        );
    }

    #[test]
    fn excluded_field_may_be_missing() {
        let ctx = ASTContext::new();
        let schema = test_schema(&ctx);
        let object = payload(json!({"req": "here", "notReq": "here"}));
        assert!(ensure_non_nulls(schema, "T", &object, "alsoReq").is_ok());
    }

    #[test]
    fn explicit_null_counts_as_missing() {
        let ctx = ASTContext::new();
        let schema = test_schema(&ctx);
        let object = payload(json!({"req": null, "alsoReq": "here"}));

        let error = ensure_non_nulls(schema, "T", &object, "").unwrap_err();
        assert_eq!(
            error.message(),
            "type T requires a value for field req, but no value present"
        );
    }

    #[test]
    fn inherited_non_null_fields_are_checked() {
        let ctx = ASTContext::new();
        let schema = Schema::parse(
            &ctx,
            indoc! {"
                interface Character {
                    name: String!
                }

                type Droid implements Character {
                    primaryFunction: String!
                }
            "},
        )
        .unwrap();

        let object = payload(json!({"primaryFunction": "protocol"}));
        let error = ensure_non_nulls(schema, "Droid", &object, "").unwrap_err();
        assert_eq!(
            error.message(),
            "type Droid requires a value for field name, but no value present"
        );
    }

    #[test]
    fn unknown_type_passes() {
        let ctx = ASTContext::new();
        let schema = test_schema(&ctx);
        let object = payload(json!({}));
        assert!(ensure_non_nulls(schema, "Unknown", &object, "").is_ok());
    }
}
