use bumpalo::{collections::Vec, Bump};
use hashbrown::{hash_map::DefaultHashBuilder, HashMap};

use crate::context::DefaultIn;
use crate::schema::{SchemaDirectives, SchemaEnum, SchemaScalar};

#[derive(Debug, Clone, Copy)]
pub(super) struct SchemaDefinition<'a> {
    pub(super) query_root_type_name: Option<&'a str>,
    pub(super) mutation_root_type_name: Option<&'a str>,
    pub(super) subscription_root_type_name: Option<&'a str>,
}

/// https://github.com/graphql/graphql-spec/blob/main/spec/Section%203%20--%20Type%20System.md#types
#[derive(Debug, Clone)]
pub(super) enum TypeDefinition<'a> {
    ObjectTypeDefinition(SchemaObjectPlaceholder<'a>),
    EnumTypeDefinition(SchemaEnum<'a>),
    ScalarTypeDefinition(SchemaScalar<'a>),
    InterfaceTypeDefinition(SchemaInterfacePlaceholder<'a>),
}

impl<'a> TypeDefinition<'a> {
    pub(crate) fn name(&self) -> &'a str {
        match self {
            TypeDefinition::ObjectTypeDefinition(obj) => obj.name,
            TypeDefinition::EnumTypeDefinition(e) => e.name,
            TypeDefinition::ScalarTypeDefinition(s) => s.name,
            TypeDefinition::InterfaceTypeDefinition(i) => i.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct SchemaObjectPlaceholder<'a> {
    pub name: &'a str,
    pub fields: FieldDefinitions<'a>,
    pub(crate) interfaces: Vec<'a, &'a str>,
    pub directives: SchemaDirectives<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct SchemaInterfacePlaceholder<'a> {
    pub name: &'a str,
    pub fields: FieldDefinitions<'a>,
    pub(crate) interfaces: Vec<'a, &'a str>,
    pub(crate) possible_types: Vec<'a, &'a str>,
    pub directives: SchemaDirectives<'a>,
}

impl<'a> SchemaInterfacePlaceholder<'a> {
    pub fn add_possible_type(&mut self, possible_type: &'a str) {
        self.possible_types.push(possible_type);
    }
}

/// A sequence of schema fields enclosed by braces, as found on object types
/// and interfaces. Declaration order is preserved.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct FieldDefinitions<'a> {
    pub fields: Vec<'a, SchemaFieldPlaceholder<'a>>,
}

impl<'a> DefaultIn<'a> for FieldDefinitions<'a> {
    fn default_in(arena: &'a Bump) -> Self {
        Self {
            fields: Vec::new_in(arena),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct ArgumentList<'a> {
    pub arguments: HashMap<&'a str, SchemaInputFieldPlaceholder<'a>, DefaultHashBuilder, &'a Bump>,
}

impl<'a> DefaultIn<'a> for ArgumentList<'a> {
    fn default_in(arena: &'a Bump) -> Self {
        Self {
            arguments: HashMap::new_in(arena),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct SchemaFieldPlaceholder<'a> {
    pub name: &'a str,
    pub arguments: ArgumentList<'a>,
    pub output_type: &'a TypeWrapper<'a>,
    pub directives: SchemaDirectives<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct SchemaInputFieldPlaceholder<'a> {
    pub name: &'a str,
    pub input_type: &'a TypeWrapper<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum TypeWrapper<'a> {
    NonNull(&'a TypeWrapper<'a>),
    List(&'a TypeWrapper<'a>),
    Named(&'a str),
}
