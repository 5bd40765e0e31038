use super::{
    parse_ast::{
        ArgumentList, FieldDefinitions, SchemaFieldPlaceholder, SchemaInputFieldPlaceholder,
        SchemaObjectPlaceholder, TypeWrapper,
    },
    parser::ParseSdl,
};
use crate::{
    context::{ASTContext, DefaultIn},
    error::ErrorKind,
    schema::{
        DirectiveValue, Schema, SchemaDirectives, SchemaEnum, SchemaField, SchemaFields,
        SchemaInterface, SchemaInterfaces, SchemaObject, SchemaPossibleTypes, SchemaScalar,
        SchemaType, TypeRef,
    },
};
use bumpalo::collections::Vec;
use hashbrown::{HashMap, HashSet};
use indoc::indoc;

const DEFAULT_SCALARS: [&str; 7] = ["ID", "String", "Int", "Int64", "Float", "Boolean", "DateTime"];

fn assert_parse<'a, T: 'a>(ctx: &'a ASTContext, source: &'a str, expected: T)
where
    T: ParseSdl<'a> + std::fmt::Debug + PartialEq,
{
    assert_eq!(*T::parse(ctx, source).unwrap(), expected);
}

#[test]
fn empty_schema() {
    let ctx = ASTContext::new();
    let mut types = HashMap::new_in(&ctx.arena);
    for scalar in DEFAULT_SCALARS.iter() {
        types.insert(
            *scalar,
            ctx.alloc(SchemaType::Scalar(ctx.alloc(SchemaScalar { name: scalar }))),
        );
    }

    assert_parse(
        &ctx,
        "",
        Schema {
            query_type: None,
            mutation_type: None,
            subscription_type: None,
            types,
        },
    );
}

#[test]
fn schema_definition() {
    let ctx = ASTContext::new();
    let source = indoc! {"
        schema {
            query: Foo
            mutation: Bar
        }

        type Foo {
          foo: String
        }

        type Bar {
          bar: String
        }
    "};

    let foo_field_type = TypeRef::Type("String");
    let foo_field = SchemaField::new(&ctx, "foo", &foo_field_type);
    let mut foo = SchemaObject::new(&ctx, "Foo");
    foo.add_field(foo_field);

    let bar_field_type = TypeRef::Type("String");
    let bar_field = SchemaField::new(&ctx, "bar", &bar_field_type);
    let mut bar = SchemaObject::new(&ctx, "Bar");
    bar.add_field(bar_field);

    let foo_type = SchemaType::Object(&foo);
    let bar_type = SchemaType::Object(&bar);
    let mut types = HashMap::new_in(&ctx.arena);
    types.insert("Foo", &foo_type);
    types.insert("Bar", &bar_type);

    for scalar in DEFAULT_SCALARS.iter() {
        types.insert(
            *scalar,
            ctx.alloc(SchemaType::Scalar(ctx.alloc(SchemaScalar { name: scalar }))),
        );
    }

    assert_parse(
        &ctx,
        source,
        Schema {
            query_type: Some(&foo),
            mutation_type: Some(&bar),
            subscription_type: None,
            types,
        },
    );
}

#[test]
fn schema_definition_repeated() {
    let ctx = ASTContext::new();
    let source = indoc! {"
        schema {
            query: Foo
        }

        schema {
            query: Bar
        }

        type Foo {
          foo: String
        }

        type Bar {
          bar: String
        }
    "};

    assert_eq!(
        *Schema::parse(&ctx, source).unwrap_err().kind(),
        ErrorKind::Syntax("Must not specify more than one Schema Definition.".to_string())
    );
}

#[test]
fn schema_definition_non_object_type() {
    let ctx = ASTContext::new();
    let source = indoc! {"
        schema {
            query: Foo
        }

        scalar Foo
    "};

    assert_eq!(
        *Schema::parse(&ctx, source).unwrap_err().kind(),
        ErrorKind::Syntax("Query root type `Foo` must be an object type.".to_string())
    );
}

#[test]
fn object_type_definition() {
    let ctx = ASTContext::new();
    let source = indoc! {"
        type MyType {
            fieldA: String
            fieldB: Int
        }
    "};

    let fields = Vec::from_iter_in(
        [
            SchemaFieldPlaceholder {
                name: "fieldA",
                arguments: ArgumentList::default_in(&ctx.arena),
                output_type: &TypeWrapper::Named("String"),
                directives: SchemaDirectives::default_in(&ctx.arena),
            },
            SchemaFieldPlaceholder {
                name: "fieldB",
                arguments: ArgumentList::default_in(&ctx.arena),
                output_type: &TypeWrapper::Named("Int"),
                directives: SchemaDirectives::default_in(&ctx.arena),
            },
        ],
        &ctx.arena,
    );

    assert_parse(
        &ctx,
        source,
        SchemaObjectPlaceholder {
            name: "MyType",
            fields: FieldDefinitions { fields },
            interfaces: Vec::new_in(&ctx.arena),
            directives: SchemaDirectives::default_in(&ctx.arena),
        },
    );
}

#[test]
fn objects_implementing_interfaces() {
    let ctx = ASTContext::new();
    let source = indoc! {"
        type MyType implements MyInt1 & MyInt2 {
            fieldA: String
            fieldB: Int
        }

        interface MyInt1 {
            fieldA: String
        }

        interface MyInt2 {
            fieldB: Int
        }
    "};

    let field_a_type = TypeRef::Type("String");
    let field_a = SchemaField::new(&ctx, "fieldA", &field_a_type);
    let field_b_type = TypeRef::Type("Int");
    let field_b = SchemaField::new(&ctx, "fieldB", &field_b_type);

    let mut interface1 = SchemaInterface::new(&ctx, "MyInt1");
    interface1.add_field(field_a.clone());

    let mut interface2 = SchemaInterface::new(&ctx, "MyInt2");
    interface2.add_field(field_b.clone());

    let mut obj = SchemaObject::new(&ctx, "MyType");
    obj.add_field(field_a);
    obj.add_field(field_b);
    obj.add_interface("MyInt1");
    obj.add_interface("MyInt2");

    interface1.add_possible_type("MyType");
    interface2.add_possible_type("MyType");

    let obj = SchemaType::Object(&obj);
    let interface1 = SchemaType::Interface(&interface1);
    let interface2 = SchemaType::Interface(&interface2);
    let mut types = HashMap::new_in(&ctx.arena);
    types.insert("MyType", &obj);
    types.insert("MyInt1", &interface1);
    types.insert("MyInt2", &interface2);

    for scalar in DEFAULT_SCALARS.iter() {
        types.insert(
            *scalar,
            ctx.alloc(SchemaType::Scalar(ctx.alloc(SchemaScalar { name: scalar }))),
        );
    }

    assert_parse(
        &ctx,
        source,
        Schema {
            query_type: None,
            mutation_type: None,
            subscription_type: None,
            types,
        },
    );
}

#[test]
fn type_directives() {
    let ctx = ASTContext::new();
    let source = indoc! {r#"
        type Author @dgraph(type: "dgraph.author") {
            id: ID!
            name: String
        }
    "#};

    let schema = Schema::parse(&ctx, source).unwrap();
    let author = schema.get_type("Author").unwrap().object().unwrap();
    let directive = author.directives.get("dgraph").unwrap();
    assert_eq!(directive.string_argument("type"), Some("dgraph.author"));
    assert_eq!(directive.string_argument("pred"), None);
}

#[test]
fn directives_after_implements_clause() {
    let ctx = ASTContext::new();
    let source = indoc! {r#"
        interface Character {
            id: ID!
        }

        type Droid implements Character @dgraph(type: "roboDroid") {
            primaryFunction: String
        }
    "#};

    let schema = Schema::parse(&ctx, source).unwrap();
    let droid = schema.get_type("Droid").unwrap().object().unwrap();
    assert_eq!(droid.get_interfaces(), &["Character"]);
    assert_eq!(
        droid.directives.get("dgraph").unwrap().string_argument("type"),
        Some("roboDroid")
    );
}

#[test]
fn field_directives() {
    let ctx = ASTContext::new();
    let source = indoc! {r#"
        type Post {
            postID: ID!
            postType: String @search @dgraph(pred: "dgraph.post_type")
            author: String @hasInverse(field: posts)
            name: String @search(by: [hash, trigram])
        }
    "#};

    let schema = Schema::parse(&ctx, source).unwrap();
    let post = schema.get_type("Post").unwrap().object().unwrap();

    let post_type = post.get_field("postType").unwrap();
    assert!(post_type.directives.get("search").unwrap().arguments.is_empty());
    assert_eq!(
        post_type.directives.get("dgraph").unwrap().string_argument("pred"),
        Some("dgraph.post_type")
    );

    let author = post.get_field("author").unwrap();
    assert_eq!(
        author.directives.get("hasInverse").unwrap().argument("field"),
        Some(&DirectiveValue::Name("posts"))
    );

    let name = post.get_field("name").unwrap();
    let by = name.directives.get("search").unwrap().argument("by").unwrap();
    let expected = Vec::from_iter_in(
        [DirectiveValue::Name("hash"), DirectiveValue::Name("trigram")],
        &ctx.arena,
    );
    assert_eq!(by, &DirectiveValue::List(expected));
}

#[test]
fn directive_definitions_are_skipped() {
    let ctx = ASTContext::new();
    let source = indoc! {r#"
        directive @search(by: [String]) on FIELD_DEFINITION
        directive @dgraph(type: String, pred: String) on OBJECT | INTERFACE | FIELD_DEFINITION

        type Post {
            postID: ID!
            title: String @dgraph(pred: "dgraph.title")
        }
    "#};

    let schema = Schema::parse(&ctx, source).unwrap();
    assert!(schema.get_type("Post").is_some());
}

#[test]
fn interface_type_definition_with_fields_in_order() {
    let ctx = ASTContext::new();
    let source = indoc! {"
        interface Character {
            id: ID!
            name: String!
            appearsIn: [Episode!]
        }

        enum Episode {
            NEWHOPE
            EMPIRE
            JEDI
        }
    "};

    let schema = Schema::parse(&ctx, source).unwrap();
    let character = schema.get_type("Character").unwrap().interface().unwrap();
    let names: std::vec::Vec<&str> = character
        .get_fields()
        .iter()
        .map(|field| field.name)
        .collect();
    assert_eq!(names, ["id", "name", "appearsIn"]);
    assert!(character.get_field("id").unwrap().is_id());
    assert!(character.get_field("name").unwrap().output_type.is_required());
    assert!(!character.get_field("appearsIn").unwrap().is_id());
}

#[test]
fn enum_type_definition() {
    let ctx = ASTContext::new();
    let source = indoc! {"
        enum MyEnum {
            FOO
            BAR
        }
    "};

    let mut values = HashSet::new_in(&ctx.arena);
    values.insert("FOO");
    values.insert("BAR");

    assert_parse(&ctx, source, SchemaEnum { name: "MyEnum", values });
}

#[test]
fn scalar_type_definition() {
    let ctx = ASTContext::new();
    let source = indoc! {"
        scalar MyScalar
    "};

    assert_parse(&ctx, source, SchemaScalar { name: "MyScalar" });
}

#[test]
fn field_definition() {
    let ctx = ASTContext::new();
    let source = indoc! {"
        fieldA(arg1: Int, arg2: SomeType): String
    "};

    let mut arguments = HashMap::new_in(&ctx.arena);
    arguments.insert(
        "arg1",
        SchemaInputFieldPlaceholder {
            name: "arg1",
            input_type: &TypeWrapper::Named("Int"),
        },
    );
    arguments.insert(
        "arg2",
        SchemaInputFieldPlaceholder {
            name: "arg2",
            input_type: &TypeWrapper::Named("SomeType"),
        },
    );

    let arguments = ArgumentList { arguments };

    assert_parse(
        &ctx,
        source,
        SchemaFieldPlaceholder {
            name: "fieldA",
            arguments,
            output_type: &TypeWrapper::Named("String"),
            directives: SchemaDirectives::default_in(&ctx.arena),
        },
    );
}

#[test]
fn input_output_type() {
    let ctx = ASTContext::new();
    let source = indoc! {"
        String
    "};

    assert_parse(&ctx, source, TypeWrapper::Named("String"));

    let source = indoc! {"
        String!
    "};

    assert_parse(
        &ctx,
        source,
        TypeWrapper::NonNull(&TypeWrapper::Named("String")),
    );

    let source = indoc! {"
        [String]
    "};

    assert_parse(
        &ctx,
        source,
        TypeWrapper::List(&TypeWrapper::Named("String")),
    );

    let source = indoc! {"
        [String]!
    "};

    assert_parse(
        &ctx,
        source,
        TypeWrapper::NonNull(&TypeWrapper::List(&TypeWrapper::Named("String"))),
    );

    let source = indoc! {"
        [String!]
    "};

    assert_parse(
        &ctx,
        source,
        TypeWrapper::List(&TypeWrapper::NonNull(&TypeWrapper::Named("String"))),
    );

    let source = indoc! {"
        [[String!]!]!
    "};

    assert_parse(
        &ctx,
        source,
        TypeWrapper::NonNull(&TypeWrapper::List(&TypeWrapper::NonNull(
            &TypeWrapper::List(&TypeWrapper::NonNull(&TypeWrapper::Named("String"))),
        ))),
    );
}

#[test]
fn unknown_field_type_fails_validation() {
    let ctx = ASTContext::new();
    let source = indoc! {"
        type Post {
            author: Author
        }
    "};

    assert_eq!(
        *Schema::parse(&ctx, source).unwrap_err().kind(),
        ErrorKind::Validation("Field `author` of type `Post` has an invalid type.".to_string())
    );
}

#[test]
fn unknown_interface_fails_validation() {
    let ctx = ASTContext::new();
    let source = indoc! {"
        type Post implements Node {
            title: String
        }
    "};

    assert_eq!(
        *Schema::parse(&ctx, source).unwrap_err().kind(),
        ErrorKind::Validation("Interface `Node` on object `Post` does not exist.".to_string())
    );
}

#[test]
fn implementing_a_non_interface_fails_validation() {
    let ctx = ASTContext::new();
    let source = indoc! {"
        type Node {
            id: ID!
        }

        type Post implements Node {
            title: String
        }
    "};

    assert_eq!(
        *Schema::parse(&ctx, source).unwrap_err().kind(),
        ErrorKind::Validation("Type `Node` implemented by `Post` is not an interface.".to_string())
    );
}

#[test]
fn unions_are_rejected() {
    let ctx = ASTContext::new();
    let source = indoc! {"
        union Media = Post | Author
    "};

    assert_eq!(
        *Schema::parse(&ctx, source).unwrap_err().kind(),
        ErrorKind::Syntax("`union` definitions do not occur in storage schemas.".to_string())
    );
}
