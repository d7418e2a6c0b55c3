//! # Schema Document
//!
//! serde model of the already-normalized schema description the generator
//! consumes: the data model (models, composite types, enums) and the derived
//! input/output/enum shapes a query layer needs. Field names follow the
//! camelCase wire format of the upstream document.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub datamodel: Datamodel,
    pub schema: Schema,
}

impl Document {
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datamodel {
    #[serde(default)]
    pub models: Vec<Model>,
    #[serde(default)]
    pub enums: Vec<DatamodelEnum>,
    /// Composite types. Generated like models.
    #[serde(default)]
    pub types: Vec<Model>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub primary_key: Option<PrimaryKey>,
    #[serde(default)]
    pub unique_indexes: Vec<UniqueIndex>,
    #[serde(default)]
    pub documentation: Option<String>,
}

impl Model {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            ..Default::default()
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Keys accepted by `Prisma.AtLeast` for this model's where-unique input.
    pub fn where_unique_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .fields
            .iter()
            .filter(|f| f.is_id || f.is_unique)
            .map(|f| f.name.clone())
            .collect();
        if let Some(pk) = &self.primary_key {
            keys.push(pk.name.clone().unwrap_or_else(|| pk.fields.join("_")));
        }
        for index in &self.unique_indexes {
            keys.push(index.name.clone().unwrap_or_else(|| index.fields.join("_")));
        }
        keys
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrimaryKey {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniqueIndex {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Scalar,
    Object,
    Enum,
    Unsupported,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub is_list: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_id: bool,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

impl Field {
    pub fn scalar(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Scalar,
            type_name: type_name.into(),
            is_required: true,
            ..Default::default()
        }
    }

    pub fn object(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Object,
            ..Self::scalar(name, type_name)
        }
    }

    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_required = false;
        self
    }

    pub fn documented(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatamodelEnum {
    pub name: String,
    #[serde(default)]
    pub values: Vec<EnumValue>,
    #[serde(default)]
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    /// Upstream occasionally carries non-string docs; those are ignored.
    #[serde(default)]
    pub documentation: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default)]
    pub input_object_types: Namespaced<InputType>,
    #[serde(default)]
    pub output_object_types: Namespaced<OutputType>,
    #[serde(default)]
    pub enum_types: Namespaced<SchemaEnum>,
}

/// `prisma` (engine-derived) and `model` (user-declared) entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Namespaced<T> {
    #[serde(default = "Vec::new")]
    pub prisma: Vec<T>,
    #[serde(default = "Vec::new")]
    pub model: Vec<T>,
}

impl<T> Default for Namespaced<T> {
    fn default() -> Self {
        Self {
            prisma: Vec::new(),
            model: Vec::new(),
        }
    }
}

impl<T> Namespaced<T> {
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.prisma.iter().chain(self.model.iter())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaEnum {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputType {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<SchemaArg>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaArg {
    pub name: String,
    #[serde(default)]
    pub input_types: Vec<TypeRef>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_nullable: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputType {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<SchemaField>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    pub name: String,
    pub output_type: TypeRef,
    #[serde(default)]
    pub args: Vec<SchemaArg>,
    #[serde(default)]
    pub is_nullable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldLocation {
    #[default]
    Scalar,
    InputObjectTypes,
    OutputObjectTypes,
    EnumTypes,
    FieldRefTypes,
}

impl FieldLocation {
    pub fn is_object(self) -> bool {
        matches!(self, FieldLocation::InputObjectTypes | FieldLocation::OutputObjectTypes)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldLocation::Scalar => "scalar",
            FieldLocation::InputObjectTypes => "inputObjectTypes",
            FieldLocation::OutputObjectTypes => "outputObjectTypes",
            FieldLocation::EnumTypes => "enumTypes",
            FieldLocation::FieldRefTypes => "fieldRefTypes",
        }
    }
}

/// A reference to a schema type from an input argument or output field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    #[serde(rename = "type")]
    pub type_name: String,
    pub location: FieldLocation,
    #[serde(default)]
    pub is_list: bool,
    #[serde(default)]
    pub namespace: Option<String>,
}

impl TypeRef {
    pub fn new(type_name: impl Into<String>, location: FieldLocation) -> Self {
        Self {
            type_name: type_name.into(),
            location,
            ..Default::default()
        }
    }

    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    pub fn in_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_document() {
        let doc = Document::from_json(
            r#"{
                "datamodel": {
                    "models": [{
                        "name": "User",
                        "fields": [
                            {"name": "id", "kind": "scalar", "type": "Int", "isId": true, "isRequired": true},
                            {"name": "posts", "kind": "object", "type": "Post", "isList": true}
                        ]
                    }],
                    "enums": [{"name": "Role", "values": [{"name": "ADMIN", "documentation": 42}]}]
                },
                "schema": {
                    "inputObjectTypes": {"prisma": [{
                        "name": "UserWhereInput",
                        "fields": [{"name": "id", "isRequired": false, "inputTypes": [
                            {"type": "IntFilter", "location": "inputObjectTypes", "isList": false}
                        ]}]
                    }]},
                    "outputObjectTypes": {"prisma": [], "model": []},
                    "enumTypes": {"prisma": [{"name": "SortOrder", "values": ["asc", "desc"]}]}
                }
            }"#,
        )
        .unwrap();

        let user = &doc.datamodel.models[0];
        assert_eq!(user.fields[1].kind, FieldKind::Object);
        assert!(user.fields[1].is_list);
        assert_eq!(user.where_unique_keys(), vec!["id".to_string()]);
        let input = &doc.schema.input_object_types.prisma[0];
        assert_eq!(input.fields[0].input_types[0].location, FieldLocation::InputObjectTypes);
        assert_eq!(doc.schema.enum_types.prisma[0].values, vec!["asc", "desc"]);
        assert!(doc.schema.input_object_types.model.is_empty());
    }

    #[test]
    fn test_where_unique_keys_compound() {
        let mut model = Model::new("Like", vec![Field::scalar("userId", "Int"), Field::scalar("postId", "Int")]);
        model.primary_key = Some(PrimaryKey {
            name: None,
            fields: vec!["userId".into(), "postId".into()],
        });
        model.unique_indexes.push(UniqueIndex {
            name: Some("byPost".into()),
            fields: vec!["postId".into()],
        });
        assert_eq!(model.where_unique_keys(), vec!["userId_postId", "byPost"]);
    }
}
