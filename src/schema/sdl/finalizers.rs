use bumpalo::collections::Vec;
use hashbrown::HashMap;

use super::parse_ast::*;
use crate::context::ASTContext;
use crate::schema::{
    SchemaField, SchemaInputField, SchemaInterface, SchemaObject, SchemaType, TypeRef,
};

fn convert_to_schema_field<'a>(
    ctx: &'a ASTContext,
    field: &'a SchemaFieldPlaceholder<'a>,
) -> SchemaField<'a> {
    let mut arguments = HashMap::new_in(&ctx.arena);
    for (name, argument) in field.arguments.arguments.iter() {
        arguments.insert(
            *name,
            SchemaInputField {
                name: *name,
                input_type: map_type(ctx, argument.input_type),
            },
        );
    }

    SchemaField {
        name: field.name,
        arguments,
        output_type: map_type(ctx, field.output_type),
        directives: field.directives.clone(),
    }
}

fn map_type<'a>(ctx: &'a ASTContext, wrapper: &'a TypeWrapper<'a>) -> &'a TypeRef<'a> {
    match wrapper {
        TypeWrapper::NonNull(inner) => ctx.alloc(TypeRef::NonNullType(map_type(ctx, inner))),
        TypeWrapper::List(inner) => ctx.alloc(TypeRef::ListType(map_type(ctx, inner))),
        TypeWrapper::Named(name) => ctx.alloc(TypeRef::Type(name)),
    }
}

/// Converts a raw TypeDefinition into its final schema type.
///
/// Type references are resolved lazily by name, so definitions may freely refer
/// to types that appear later in the source text or to each other.
pub(super) fn initialize_type_definition<'a>(
    ctx: &'a ASTContext,
    typ: &'a TypeDefinition<'a>,
) -> &'a SchemaType<'a> {
    match typ {
        TypeDefinition::ObjectTypeDefinition(obj) => {
            let mut fields = Vec::new_in(&ctx.arena);
            for field in obj.fields.fields.iter() {
                fields.push(convert_to_schema_field(ctx, field));
            }

            let mut interfaces = Vec::new_in(&ctx.arena);
            for interface in obj.interfaces.iter() {
                interfaces.push(*interface)
            }

            ctx.arena.alloc(SchemaType::Object(ctx.arena.alloc(SchemaObject {
                name: obj.name,
                fields,
                interfaces,
                directives: obj.directives.clone(),
            })))
        }
        TypeDefinition::InterfaceTypeDefinition(interface) => {
            let mut fields = Vec::new_in(&ctx.arena);
            for field in interface.fields.fields.iter() {
                fields.push(convert_to_schema_field(ctx, field));
            }

            let mut interfaces = Vec::new_in(&ctx.arena);
            for implemented in interface.interfaces.iter() {
                interfaces.push(*implemented)
            }

            let mut possible_types = Vec::new_in(&ctx.arena);
            for possible_type in interface.possible_types.iter() {
                possible_types.push(*possible_type)
            }

            ctx.arena
                .alloc(SchemaType::Interface(ctx.arena.alloc(SchemaInterface {
                    name: interface.name,
                    fields,
                    interfaces,
                    possible_types,
                    directives: interface.directives.clone(),
                })))
        }
        TypeDefinition::EnumTypeDefinition(e) => ctx.arena.alloc(SchemaType::Enum(e)),
        TypeDefinition::ScalarTypeDefinition(s) => ctx.arena.alloc(SchemaType::Scalar(s)),
    }
}
