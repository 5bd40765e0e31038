use crate::context::{ASTContext, DefaultIn};
use bumpalo::collections::Vec;
use bumpalo::Bump;
use hashbrown::hash_map::DefaultHashBuilder;
use hashbrown::{HashMap, HashSet};

/// Schema Definition
///
/// A schema is created from root types for each kind of operation and is then
/// used to compile the storage predicate map and to check mutation payloads.
/// In this library the schema is never executable and serves only for metadata
/// and type information.
/// [Reference](https://spec.graphql.org/October2021/#sec-Schema)
#[derive(Debug, Clone, PartialEq)]
pub struct Schema<'a> {
    pub(crate) query_type: Option<&'a SchemaObject<'a>>,
    pub(crate) mutation_type: Option<&'a SchemaObject<'a>>,
    pub(crate) subscription_type: Option<&'a SchemaObject<'a>>,
    pub(crate) types:
        hashbrown::HashMap<&'a str, &'a SchemaType<'a>, DefaultHashBuilder, &'a bumpalo::Bump>,
}

impl<'a> DefaultIn<'a> for Schema<'a> {
    fn default_in(arena: &'a Bump) -> Self {
        Schema {
            query_type: None,
            mutation_type: None,
            subscription_type: None,
            types: HashMap::new_in(arena),
        }
    }
}

impl<'a> Schema<'a> {
    /// Returns whether the schema is a default, empty schema
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
            && self.query_type.is_none()
            && self.mutation_type.is_none()
            && self.subscription_type.is_none()
    }

    /// Returns the root object type for query operations
    #[inline]
    pub fn query_type(&self) -> Option<&'a SchemaObject<'a>> {
        self.query_type
    }

    /// Returns the root object type for mutation operations
    #[inline]
    pub fn mutation_type(&self) -> Option<&'a SchemaObject<'a>> {
        self.mutation_type
    }

    /// Returns the root object type for subscription operations
    #[inline]
    pub fn subscription_type(&self) -> Option<&'a SchemaObject<'a>> {
        self.subscription_type
    }

    /// Retrieves a type by name from known schema types.
    #[inline]
    pub fn get_type(&self, name: &str) -> Option<&'a SchemaType<'a>> {
        self.types.get(name).copied()
    }

    /// Returns whether the given type name is one of the schema's root
    /// operation types.
    pub(crate) fn is_root_type(&self, name: &str) -> bool {
        self.query_type.map_or(false, |obj| obj.name == name)
            || self.mutation_type.map_or(false, |obj| obj.name == name)
            || self.subscription_type.map_or(false, |obj| obj.name == name)
    }
}

/// Generic trait for any schema type that carries fields
pub trait SchemaFields<'a>: Sized {
    /// Add a new [SchemaField] to the list of fields
    fn add_field(&mut self, field: SchemaField<'a>);

    /// Get the fields in schema declaration order
    fn get_fields(&self) -> &[SchemaField<'a>];

    /// Get a known field by name
    fn get_field(&self, name: &str) -> Option<&SchemaField<'a>> {
        self.get_fields().iter().find(|field| field.name == name)
    }
}

/// Generic trait for any schema type that implements interfaces
pub trait SchemaInterfaces<'a>: Sized {
    /// Add a new interface name to the list of implemented interfaces
    fn add_interface(&mut self, interface: &'a str);

    /// Get the implemented interface names in declaration order
    fn get_interfaces(&self) -> &[&'a str];

    /// Checks whether the given interface is implemented
    #[inline]
    fn implements_interface(&self, schema_interface: &SchemaInterface<'a>) -> bool {
        self.get_interfaces()
            .iter()
            .any(|interface| *interface == schema_interface.name)
    }
}

/// Generic trait for any schema type that tracks its possible object types
pub trait SchemaPossibleTypes<'a>: Sized {
    /// Add a new [SchemaObject] name to the list of possible types
    fn add_possible_type(&mut self, object: &'a str);

    /// Get the list of possible [SchemaObject] type names
    fn get_possible_types(&self) -> &[&'a str];

    /// Checks whether the given [SchemaObject] is a possible subtype
    #[inline]
    fn is_possible_type(&self, schema_object: &SchemaObject<'a>) -> bool {
        self.get_possible_types()
            .iter()
            .any(|possible_type| *possible_type == schema_object.name)
    }
}

/// An Object type definition.
///
/// Most types in GraphQL are objects and define a set of fields, the interfaces
/// they implement, and the directives applied to them. Fields keep their schema
/// declaration order, which is observable through payload validation.
/// [Reference](https://spec.graphql.org/October2021/#sec-Objects)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaObject<'a> {
    pub name: &'a str,
    pub(crate) fields: Vec<'a, SchemaField<'a>>,
    pub(crate) interfaces: Vec<'a, &'a str>,
    pub directives: SchemaDirectives<'a>,
}

impl<'a> SchemaObject<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str) -> Self {
        SchemaObject {
            name,
            fields: Vec::new_in(&ctx.arena),
            interfaces: Vec::new_in(&ctx.arena),
            directives: SchemaDirectives::default_in(&ctx.arena),
        }
    }
}

impl<'a> SchemaFields<'a> for SchemaObject<'a> {
    fn add_field(&mut self, field: SchemaField<'a>) {
        self.fields.push(field);
    }

    #[inline]
    fn get_fields(&self) -> &[SchemaField<'a>] {
        &self.fields
    }
}

impl<'a> SchemaInterfaces<'a> for SchemaObject<'a> {
    fn add_interface(&mut self, interface: &'a str) {
        self.interfaces.push(interface);
    }

    #[inline]
    fn get_interfaces(&self) -> &[&'a str] {
        &self.interfaces
    }
}

/// An Interface type definition.
///
/// Any object or other interface may implement one or more interfaces and must
/// then adhere to the definition of this interface. Fields declared on an
/// interface map to a single storage predicate shared by every implementing
/// type.
/// [Reference](https://spec.graphql.org/October2021/#sec-Interfaces)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaInterface<'a> {
    pub name: &'a str,
    pub(crate) fields: Vec<'a, SchemaField<'a>>,
    pub(crate) interfaces: Vec<'a, &'a str>,
    pub(crate) possible_types: Vec<'a, &'a str>,
    pub directives: SchemaDirectives<'a>,
}

impl<'a> SchemaInterface<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str) -> Self {
        SchemaInterface {
            name,
            fields: Vec::new_in(&ctx.arena),
            interfaces: Vec::new_in(&ctx.arena),
            possible_types: Vec::new_in(&ctx.arena),
            directives: SchemaDirectives::default_in(&ctx.arena),
        }
    }
}

impl<'a> SchemaFields<'a> for SchemaInterface<'a> {
    fn add_field(&mut self, field: SchemaField<'a>) {
        self.fields.push(field);
    }

    #[inline]
    fn get_fields(&self) -> &[SchemaField<'a>] {
        &self.fields
    }
}

impl<'a> SchemaInterfaces<'a> for SchemaInterface<'a> {
    fn add_interface(&mut self, interface: &'a str) {
        self.interfaces.push(interface);
    }

    #[inline]
    fn get_interfaces(&self) -> &[&'a str] {
        &self.interfaces
    }
}

impl<'a> SchemaPossibleTypes<'a> for SchemaInterface<'a> {
    fn add_possible_type(&mut self, object: &'a str) {
        self.possible_types.push(object);
    }

    #[inline]
    fn get_possible_types(&self) -> &[&'a str] {
        &self.possible_types
    }
}

/// An object Field type definition.
///
/// A field is like a function that given its arguments as input values produces
/// an output value. The directives applied to a field steer how it maps onto a
/// storage predicate.
/// [Reference](https://spec.graphql.org/October2021/#FieldsDefinition)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField<'a> {
    pub name: &'a str,
    pub arguments: HashMap<&'a str, SchemaInputField<'a>, DefaultHashBuilder, &'a bumpalo::Bump>,
    pub output_type: &'a TypeRef<'a>,
    pub directives: SchemaDirectives<'a>,
}

impl<'a> SchemaField<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str, output_type: &'a TypeRef<'a>) -> Self {
        SchemaField {
            name,
            arguments: HashMap::new_in(&ctx.arena),
            output_type,
            directives: SchemaDirectives::default_in(&ctx.arena),
        }
    }

    pub fn add_argument(&mut self, arg: SchemaInputField<'a>) {
        self.arguments.insert(arg.name, arg);
    }

    #[inline]
    pub fn get_argument(&self, name: &str) -> Option<&SchemaInputField<'a>> {
        self.arguments.get(name)
    }

    /// Whether this field is an identifier field, i.e. its named type is `ID`.
    #[inline]
    pub fn is_id(&self) -> bool {
        self.output_type.name() == "ID"
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SchemaInputField<'a> {
    pub name: &'a str,
    pub input_type: &'a TypeRef<'a>,
}

impl<'a> SchemaInputField<'a> {
    #[inline]
    pub fn new(name: &'a str, input_type: &'a TypeRef<'a>) -> Self {
        SchemaInputField { name, input_type }
    }
}

/// A Scalar type definition.
///
/// Scalars represent primitive leaf values that are represented with a specific
/// serializer and deserializer.
/// [Reference](https://spec.graphql.org/October2021/#sec-Scalars)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaScalar<'a> {
    pub name: &'a str,
}

impl<'a> SchemaScalar<'a> {
    #[inline]
    pub fn new(name: &'a str) -> Self {
        SchemaScalar { name }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct SchemaEnum<'a> {
    pub name: &'a str,
    pub values: HashSet<&'a str, DefaultHashBuilder, &'a bumpalo::Bump>,
}

impl<'a> SchemaEnum<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str) -> Self {
        SchemaEnum {
            name,
            values: HashSet::new_in(&ctx.arena),
        }
    }

    pub fn add_value(&mut self, value: &'a str) {
        self.values.insert(value);
    }
}

/// A directive applied to a type, interface, or field definition.
///
/// Directives on schema definitions carry the storage-level naming overrides
/// and index annotations this library consumes, e.g. `@dgraph(pred: "name")`
/// or `@search(by: [hash])`.
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Directives)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDirective<'a> {
    pub name: &'a str,
    pub arguments: Vec<'a, DirectiveArgument<'a>>,
}

impl<'a> SchemaDirective<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str) -> Self {
        SchemaDirective {
            name,
            arguments: Vec::new_in(&ctx.arena),
        }
    }

    pub fn add_argument(&mut self, argument: DirectiveArgument<'a>) {
        self.arguments.push(argument);
    }

    /// Get a directive argument's value by name
    pub fn argument(&self, name: &str) -> Option<&DirectiveValue<'a>> {
        self.arguments
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }

    /// Get a directive argument's string value by name, if it is a string
    pub fn string_argument(&self, name: &str) -> Option<&'a str> {
        self.argument(name).and_then(DirectiveValue::as_str)
    }
}

/// A named argument of an applied directive.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveArgument<'a> {
    pub name: &'a str,
    pub value: DirectiveValue<'a>,
}

/// The value of a directive argument.
///
/// Directive arguments in schema definitions are constant values, so variables
/// and objects don't occur here.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveValue<'a> {
    String(&'a str),
    Name(&'a str),
    Boolean(bool),
    Int(&'a str),
    Float(&'a str),
    List(Vec<'a, DirectiveValue<'a>>),
}

impl<'a> DirectiveValue<'a> {
    /// Returns the contained string value, if this value is a string literal
    #[inline]
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            DirectiveValue::String(value) => Some(value),
            _ => None,
        }
    }
}

/// The list of directives applied to a type, interface, or field definition.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDirectives<'a> {
    pub children: Vec<'a, SchemaDirective<'a>>,
}

impl<'a> DefaultIn<'a> for SchemaDirectives<'a> {
    fn default_in(arena: &'a Bump) -> Self {
        SchemaDirectives {
            children: Vec::new_in(arena),
        }
    }
}

impl<'a> SchemaDirectives<'a> {
    /// Checks whether this list of directives contains any values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Get an applied directive by name
    pub fn get(&self, name: &str) -> Option<&SchemaDirective<'a>> {
        self.children
            .iter()
            .find(|directive| directive.name == name)
    }

    pub fn add_directive(&mut self, directive: SchemaDirective<'a>) {
        self.children.push(directive);
    }
}

/// A named type enum that represents all schema definition types this library
/// models.
///
/// User-authored storage schemas consist of objects, interfaces, enums, and
/// scalars; unions and input objects only occur in generated schemas, which
/// are outside this library's scope.
/// [Reference](https://spec.graphql.org/October2021/#sec-Types)
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SchemaType<'a> {
    Object(&'a SchemaObject<'a>),
    Interface(&'a SchemaInterface<'a>),
    Enum(&'a SchemaEnum<'a>),
    Scalar(&'a SchemaScalar<'a>),
}

impl<'a> SchemaType<'a> {
    #[inline]
    pub fn name(&self) -> &'a str {
        match self {
            SchemaType::Object(x) => x.name,
            SchemaType::Interface(x) => x.name,
            SchemaType::Enum(x) => x.name,
            SchemaType::Scalar(x) => x.name,
        }
    }

    pub fn object(&self) -> Option<&'a SchemaObject<'a>> {
        match self {
            SchemaType::Object(x) => Some(x),
            _ => None,
        }
    }

    pub fn interface(&self) -> Option<&'a SchemaInterface<'a>> {
        match self {
            SchemaType::Interface(x) => Some(x),
            _ => None,
        }
    }

    pub fn enum_type(&self) -> Option<&'a SchemaEnum<'a>> {
        match self {
            SchemaType::Enum(x) => Some(x),
            _ => None,
        }
    }

    pub fn scalar(&self) -> Option<&'a SchemaScalar<'a>> {
        match self {
            SchemaType::Scalar(x) => Some(x),
            _ => None,
        }
    }
}

impl<'a> From<&'a SchemaObject<'a>> for SchemaType<'a> {
    #[inline]
    fn from(schema_object: &'a SchemaObject<'a>) -> Self {
        SchemaType::Object(schema_object)
    }
}

impl<'a> From<&'a SchemaInterface<'a>> for SchemaType<'a> {
    #[inline]
    fn from(schema_interface: &'a SchemaInterface<'a>) -> Self {
        SchemaType::Interface(schema_interface)
    }
}

#[derive(Clone, Copy)]
pub enum TypeRef<'a> {
    Type(&'a str),
    ListType(&'a TypeRef<'a>),
    NonNullType(&'a TypeRef<'a>),
}

impl<'a> TypeRef<'a> {
    /// Returns the innermost named type this reference points at.
    #[inline]
    pub fn name(&self) -> &'a str {
        match self {
            TypeRef::Type(name) => name,
            TypeRef::ListType(of_type) => of_type.name(),
            TypeRef::NonNullType(of_type) => of_type.name(),
        }
    }

    /// Whether a value for this type reference must be present, i.e. whether
    /// the outermost wrapper is non-null.
    #[inline]
    pub fn is_required(&self) -> bool {
        matches!(self, TypeRef::NonNullType(_))
    }
}

/// This implementation is necessary to circuit break circular types.
/// Without this impl, `Debug` would print on and on, overflowing the stack as it's bouncing between types over and over.
impl<'a> std::fmt::Debug for TypeRef<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type(arg0) => f.debug_tuple("Type").field(&arg0).finish(),
            Self::ListType(arg0) => f.debug_tuple("ListType").field(arg0).finish(),
            Self::NonNullType(arg0) => f.debug_tuple("NonNullType").field(arg0).finish(),
        }
    }
}

/// This implementation is necessary to circuit break circular types.
/// Without this impl, `PartialEq` would never stop comparing types referencing each other.
/// We achieve this by only ever comparing type names, which is all we need for comparing references.
impl<'a> PartialEq for TypeRef<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Type(left), Self::Type(right)) => left == right,
            (Self::ListType(left), Self::ListType(right)) => left == right,
            (Self::NonNullType(left), Self::NonNullType(right)) => left == right,
            _ => false,
        }
    }
}
