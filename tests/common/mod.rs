//! User/Post fixture shared by the integration tests.

#![allow(dead_code)]

use pngc::schema::{
    DatamodelEnum, Document, EnumValue, Field, FieldKind, FieldLocation, InputType, Model, OutputType, SchemaArg,
    SchemaEnum, SchemaField, TypeRef,
};
use pngc::{Config, RawConfig};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn config(entries: &[(&str, &str)]) -> Config {
    let raw: RawConfig = entries.iter().map(|(k, v)| (k.to_string(), (*v).into())).collect();
    Config::from_raw(&raw).expect("fixture config")
}

pub fn scalar(type_name: &str) -> TypeRef {
    TypeRef::new(type_name, FieldLocation::Scalar)
}

pub fn input_ref(type_name: &str) -> TypeRef {
    TypeRef::new(type_name, FieldLocation::InputObjectTypes)
}

pub fn arg(name: &str, required: bool, input_types: Vec<TypeRef>) -> SchemaArg {
    SchemaArg {
        name: name.into(),
        input_types,
        is_required: required,
        is_nullable: !required,
    }
}

pub fn input(name: &str, fields: Vec<SchemaArg>) -> InputType {
    InputType {
        name: name.into(),
        fields,
    }
}

fn output_field(name: &str, output_type: TypeRef, is_nullable: bool) -> SchemaField {
    SchemaField {
        name: name.into(),
        output_type,
        args: Vec::new(),
        is_nullable,
    }
}

fn operation(name: &str, output: &str, args: Vec<SchemaArg>) -> SchemaField {
    SchemaField {
        name: name.into(),
        output_type: TypeRef::new(output, FieldLocation::OutputObjectTypes).in_namespace("model"),
        args,
        is_nullable: true,
    }
}

pub fn models() -> Vec<Model> {
    let user = Model::new(
        "User",
        vec![
            Field {
                is_id: true,
                ..Field::scalar("id", "Int")
            },
            Field::scalar("email", "String").documented("User's email"),
            Field::scalar("name", "String").optional(),
            Field::scalar("secret", "String").documented("@HideField({ output: true, input: false })"),
            Field {
                kind: FieldKind::Enum,
                ..Field::scalar("role", "Role")
            },
            Field::object("posts", "Post").list(),
        ],
    );
    let post = Model::new(
        "Post",
        vec![
            Field {
                is_id: true,
                ..Field::scalar("id", "Int")
            },
            Field::scalar("title", "String"),
            Field::object("author", "User"),
            Field::scalar("authorId", "Int"),
        ],
    );
    vec![user, post]
}

pub fn document() -> Document {
    let mut document = Document::default();
    document.datamodel.models = models();
    document.datamodel.enums.push(DatamodelEnum {
        name: "Role".into(),
        values: vec![
            EnumValue {
                name: "ADMIN".into(),
                documentation: Some(serde_json::json!("Full access")),
            },
            EnumValue {
                name: "USER".into(),
                documentation: None,
            },
        ],
        documentation: None,
    });

    let schema = &mut document.schema;
    schema.enum_types.model.push(SchemaEnum {
        name: "Role".into(),
        values: vec!["ADMIN".into(), "USER".into()],
    });
    schema.enum_types.prisma.push(SchemaEnum {
        name: "SortOrder".into(),
        values: vec!["asc".into(), "desc".into()],
    });

    schema.output_object_types.model = vec![
        OutputType {
            name: "User".into(),
            fields: vec![
                output_field("id", scalar("Int"), false),
                output_field("email", scalar("String"), false),
                output_field("name", scalar("String"), true),
                output_field("secret", scalar("String"), false),
                output_field("role", TypeRef::new("Role", FieldLocation::EnumTypes), false),
                output_field(
                    "posts",
                    TypeRef::new("Post", FieldLocation::OutputObjectTypes).list().in_namespace("model"),
                    false,
                ),
                output_field(
                    "_count",
                    TypeRef::new("UserCountOutputType", FieldLocation::OutputObjectTypes),
                    false,
                ),
            ],
        },
        OutputType {
            name: "Post".into(),
            fields: vec![
                output_field("id", scalar("Int"), false),
                output_field("title", scalar("String"), false),
                output_field(
                    "author",
                    TypeRef::new("User", FieldLocation::OutputObjectTypes).in_namespace("model"),
                    false,
                ),
                output_field("authorId", scalar("Int"), false),
            ],
        },
    ];
    schema.output_object_types.prisma = vec![
        OutputType {
            name: "Query".into(),
            fields: vec![
                operation("findManyUser", "User", vec![arg("where", false, vec![input_ref("UserWhereInput")])]),
                operation(
                    "findUniqueUser",
                    "User",
                    vec![arg("where", true, vec![input_ref("UserWhereUniqueInput")])],
                ),
            ],
        },
        OutputType {
            name: "Mutation".into(),
            fields: vec![operation(
                "createOneUser",
                "User",
                vec![arg("data", true, vec![input_ref("UserCreateInput")])],
            )],
        },
        OutputType {
            name: "UserCountOutputType".into(),
            fields: vec![output_field("posts", scalar("Int"), false)],
        },
    ];

    schema.input_object_types.prisma = vec![
        input(
            "UserWhereInput",
            vec![
                arg("id", false, vec![input_ref("IntFilter"), scalar("Int")]),
                arg("name", false, vec![input_ref("StringNullableFilter"), scalar("String"), scalar("Null")]),
                arg("secret", false, vec![input_ref("StringFilter"), scalar("String")]),
                arg("posts", false, vec![input_ref("PostListRelationFilter")]),
            ],
        ),
        input(
            "PostWhereInput",
            vec![
                arg("title", false, vec![input_ref("StringFilter"), scalar("String")]),
                arg("author", false, vec![input_ref("UserRelationFilter"), input_ref("UserWhereInput")]),
            ],
        ),
        input("PostListRelationFilter", vec![arg("some", false, vec![input_ref("PostWhereInput")])]),
        input("UserRelationFilter", vec![arg("is", false, vec![input_ref("UserWhereInput")])]),
        input("IntFilter", vec![arg("equals", false, vec![scalar("Int")])]),
        input("StringFilter", vec![arg("equals", false, vec![scalar("String")])]),
        input(
            "StringNullableFilter",
            vec![
                arg("equals", false, vec![scalar("String"), scalar("Null")]),
                arg("not", false, vec![input_ref("NestedStringNullableFilter"), scalar("String")]),
            ],
        ),
        input("NestedStringNullableFilter", vec![arg("equals", false, vec![scalar("String")])]),
        input("UserWhereUniqueInput", vec![arg("id", false, vec![scalar("Int")])]),
        input(
            "UserCreateInput",
            vec![
                arg("email", true, vec![scalar("String")]),
                arg("name", false, vec![scalar("String"), scalar("Null")]),
                arg("secret", true, vec![scalar("String")]),
                arg("role", true, vec![TypeRef::new("Role", FieldLocation::EnumTypes)]),
            ],
        ),
    ];
    document
}
