//! Naming rules shared by every handler: which model a derived type belongs
//! to, generated file names, module specifiers and type-name normalization.

use crate::schema::FieldLocation;
use heck::{ToKebabCase, ToUpperCamelCase};

const SPLIT_KEYWORDS: &[&str] = &[
    "CreateInput",
    "CreateMany",
    "CreateNested",
    "CreateOneWithout",
    "CreateOrConnect",
    "CreateWithout",
    "DistinctField",
    "Filter",
    "ManyWithout",
    "OrderByInput",
    "RelationFilter",
    "NullableRelationFilter",
    "ListRelationFilter",
    "ScalarWhereInput",
    "UpdateInput",
    "UpdateMany",
    "UpdateOneRequiredWithout",
    "UpdateOneWithout",
    "UpdateWith",
    "UpsertWith",
    "UpsertWithout",
    "WhereInput",
    "WhereUniqueInput",
    "AvgAggregate",
    "SumAggregate",
    "MinAggregate",
    "MaxAggregate",
    "CountAggregate",
    "ScalarField",
    "GroupBy",
    "OrderBy",
    "UncheckedUpdate",
    "UncheckedCreate",
    "ScalarWhere",
    "CountOutputType",
    "CountOrderBy",
    "SumOrderBy",
    "MinOrderBy",
    "MaxOrderBy",
    "AvgOrderBy",
    "Create",
    "Update",
    "ScalarRelationFilter",
    "NullableScalarRelationFilter",
];

const END_KEYWORDS: &[&str] = &[
    "Aggregate",
    "GroupBy",
    "CreateOne",
    "CreateMany",
    "DeleteMany",
    "DeleteOne",
    "FindMany",
    "FindOne",
    "FindUnique",
    "UpdateMany",
    "UpdateOne",
    "UpsertOne",
];

const MIDDLE_KEYWORDS: &[(&str, &str)] = &[
    ("FindFirst", "OrThrowArgs"),
    ("FindUnique", "OrThrowArgs"),
    ("Aggregate", "Args"),
    ("CreateOne", "Args"),
    ("CreateMany", "Args"),
    ("DeleteMany", "Args"),
    ("DeleteOne", "Args"),
    ("FindMany", "Args"),
    ("FindFirst", "Args"),
    ("FindOne", "Args"),
    ("FindUnique", "Args"),
    ("UpdateMany", "Args"),
    ("UpdateOne", "Args"),
    ("UpsertOne", "Args"),
    ("GroupBy", "Args"),
    ("OrderBy", "Args"),
];

/// Maps a derived type name (`UserCreateInput`, `FindManyPostArgs`) back to
/// the model it was derived from.
#[derive(Debug, Clone, Default)]
pub struct ModelClassifier {
    model_names: Vec<String>,
    split_keywords: Vec<&'static str>,
}

impl ModelClassifier {
    pub fn new<I, S>(model_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut split_keywords = SPLIT_KEYWORDS.to_vec();
        split_keywords.sort_by(|a, b| b.len().cmp(&a.len()));
        Self {
            model_names: model_names.into_iter().map(Into::into).collect(),
            split_keywords,
        }
    }

    fn is_model(&self, name: &str) -> bool {
        self.model_names.iter().any(|m| m == name)
    }

    pub fn model_name(&self, name: &str) -> Option<&str> {
        if name.is_empty() {
            return None;
        }
        for keyword in &self.split_keywords {
            let head = name.split(keyword).next().unwrap_or(name);
            if let Some(model) = self.find(head) {
                return Some(model);
            }
        }
        for keyword in END_KEYWORDS {
            let tail = name.rsplit(keyword).next().unwrap_or(name);
            if let Some(model) = self.find(tail) {
                return Some(model);
            }
        }
        for (start, end) in MIDDLE_KEYWORDS {
            if name.starts_with(start) && name.ends_with(end) && name.len() > start.len() + end.len() {
                let middle = &name[start.len()..name.len() - end.len()];
                if let Some(model) = self.find(middle) {
                    return Some(model);
                }
            }
            let suffix = format!("{start}{end}");
            if let Some(head) = name.strip_suffix(&suffix) {
                if let Some(model) = self.find(head) {
                    return Some(model);
                }
            }
        }
        if let Some(head) = name.strip_suffix("CompoundUniqueInput") {
            return self
                .model_names
                .iter()
                .filter(|m| head.starts_with(m.as_str()))
                .max_by_key(|m| m.len())
                .map(String::as_str);
        }
        if let Some(head) = name.strip_suffix("Count") {
            return self.find(head);
        }
        None
    }

    fn find(&self, candidate: &str) -> Option<&str> {
        if self.is_model(candidate) {
            self.model_names.iter().find(|m| *m == candidate).map(String::as_str)
        } else {
            None
        }
    }
}

/// `UserOutputType` -> `User`, `AggregateUserOutput` -> `AggregateUser`.
pub fn output_type_name(name: &str) -> String {
    name.strip_suffix("OutputType")
        .or_else(|| name.strip_suffix("Output"))
        .unwrap_or(name)
        .to_string()
}

/// Enum name from an enum property type: `` `${Role}` `` -> `Role`.
pub fn enum_name(property_type: &str) -> Option<&str> {
    property_type.strip_prefix("`${")?.strip_suffix("}`")
}

pub fn pascal_case(name: &str) -> String {
    name.to_upper_camel_case()
}

pub fn kebab_case(name: &str) -> String {
    name.to_kebab_case()
}

pub fn is_where_unique_input(name: &str) -> bool {
    name.ends_with("WhereUniqueInput")
}

/// `createManyUserAndReturn`, `UpdateManyPostAndReturnOutputType`, any case.
pub fn is_many_and_return(name: &str) -> bool {
    let lower = name.to_lowercase();
    let body = lower.strip_suffix("outputtype").unwrap_or(&lower);
    let Some(body) = body.strip_suffix("andreturn") else {
        return false;
    };
    ["createmany", "updatemany"]
        .iter()
        .any(|op| body.find(op).map(|i| body.len() > i + op.len()).unwrap_or(false))
}

/// File category for a referenced type.
pub fn file_type_by_location(location: FieldLocation) -> &'static str {
    match location {
        FieldLocation::InputObjectTypes => "input",
        FieldLocation::OutputObjectTypes => "output",
        FieldLocation::EnumTypes => "enum",
        _ => "object",
    }
}

pub fn pluralize(word: &str) -> String {
    if word.ends_with('s') {
        word.to_string()
    } else if let Some(stem) = word.strip_suffix('y') {
        format!("{stem}ies")
    } else {
        format!("{word}s")
    }
}

/// Replace `{key}` placeholders. Unknown keys are left untouched.
pub fn interpolate<F>(template: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) if is_placeholder(&after[..end]) => {
                let key = &after[..end];
                match lookup(key) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_placeholder(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}

/// Make one path segment safe as a file name.
pub fn sanitize_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut leading = true;
    for c in segment.chars() {
        let reserved = matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control();
        let relative = leading && c == '.';
        if reserved || relative {
            if !out.ends_with('-') {
                out.push('-');
            }
        } else {
            out.push(c);
        }
        if c != '.' {
            leading = false;
        }
    }
    if out.len() > 1 {
        out.trim_matches('-').to_string()
    } else {
        out
    }
}

/// Output path of a generated type, relative to the output root.
pub fn generate_file_name(template: &str, name: &str, file_type: &str, classifier: &ModelClassifier) -> String {
    let raw = interpolate(template, |key| match key {
        "model" => Some(kebab_case(classifier.model_name(name).unwrap_or("prisma"))),
        "name" => {
            let mut result = kebab_case(name);
            for suffix in ["input", "args", "enum"] {
                let ending = format!("-{suffix}");
                if file_type == suffix && result.ends_with(&ending) {
                    result.truncate(result.len() - ending.len());
                }
            }
            Some(result)
        }
        "type" => Some(file_type.to_string()),
        "plural.type" => Some(pluralize(file_type)),
        _ => None,
    });
    raw.split('/').map(sanitize_segment).collect::<Vec<_>>().join("/")
}

/// Module specifier from one generated file to another, without `.ts`.
pub fn relative_path(from: &str, to: &str) -> String {
    let from_parts: Vec<&str> = from.split('/').filter(|p| !p.is_empty() && *p != ".").collect();
    let to_parts: Vec<&str> = to.split('/').filter(|p| !p.is_empty() && *p != ".").collect();
    let from_dir = &from_parts[..from_parts.len().saturating_sub(1)];

    let common = from_dir
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let ups = from_dir.len() - common;
    let rest = to_parts[common..].join("/");
    let rest = rest.strip_suffix(".ts").unwrap_or(&rest).to_string();

    if ups == 0 {
        format!("./{rest}")
    } else {
        format!("{}{rest}", "../".repeat(ups))
    }
}

/// Filter-type names carrying a redundant `Nullable`/`Nested` fragment.
pub fn is_contain_bogus(name: &str) -> bool {
    name.starts_with("Nested") || (name.contains("Nullable") && name.ends_with("Filter")) || name.ends_with("NullableFilter")
}

pub fn replace_bogus(name: &str) -> String {
    name.replace("Nullable", "").replace("Nested", "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classifier() -> ModelClassifier {
        ModelClassifier::new(["User", "Post", "Comment", "Category", "Profile"])
    }

    #[test]
    fn test_model_name_from_derived_types() {
        let c = classifier();
        for (name, model) in [
            ("UserCreateInput", "User"),
            ("CommentWhereInput", "Comment"),
            ("ProfileWhereUniqueInput", "Profile"),
            ("PostRelationFilter", "Post"),
            ("CommentNullableRelationFilter", "Comment"),
            ("CategoryMaxAggregate", "Category"),
            ("PostCreateNestedManyWithoutUserInput", "Post"),
            ("UserCreateWithoutPostsInput", "User"),
            ("PostUncheckedUpdateInput", "Post"),
            ("AggregateUser", "User"),
            ("FindManyUserArgs", "User"),
            ("FindFirstUserOrThrowArgs", "User"),
            ("FindUniquePostOrThrowArgs", "Post"),
            ("GroupByPostArgs", "Post"),
            ("UserEmailNameCompoundUniqueInput", "User"),
            ("PostCount", "Post"),
            ("UserCountOutputType", "User"),
        ] {
            assert_eq!(c.model_name(name), Some(model), "{name}");
        }
        assert_eq!(c.model_name("SomeRandomType"), None);
        assert_eq!(c.model_name(""), None);
    }

    #[test]
    fn test_output_type_name() {
        assert_eq!(output_type_name("CommentCountOutputType"), "CommentCount");
        assert_eq!(output_type_name("AggregateUserOutput"), "AggregateUser");
        assert_eq!(output_type_name("OutputTypeUser"), "OutputTypeUser");
        assert_eq!(output_type_name("Useroutput"), "Useroutput");
        assert_eq!(output_type_name("Output"), "");
    }

    #[test]
    fn test_enum_name() {
        assert_eq!(enum_name("`${USER_ROLE}`"), Some("USER_ROLE"));
        assert_eq!(enum_name("string"), None);
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("UPPER"), "Upper");
        assert_eq!(pascal_case("findManyUserArgs"), "FindManyUserArgs");
        assert_eq!(pascal_case("aggregateUserArgs"), "AggregateUserArgs");
    }

    #[test]
    fn test_many_and_return() {
        assert!(is_many_and_return("CreateManyUserAndReturnOutputType"));
        assert!(is_many_and_return("updateManyPostAndReturn"));
        assert!(is_many_and_return("CREATEMANYUSERANDRETURNOUTPUTTYPE"));
        assert!(!is_many_and_return("DeleteManyUserAndReturn"));
        assert!(!is_many_and_return("CreateMany"));
        assert!(!is_many_and_return("AndReturnOutputType"));
        assert!(!is_many_and_return("CreateManyAndReturn"));
    }

    #[test]
    fn test_generate_file_name() {
        let c = classifier();
        let default = "{model}/{name}.{type}.ts";
        assert_eq!(generate_file_name(default, "UserCreateInput", "input", &c), "user/user-create.input.ts");
        assert_eq!(generate_file_name(default, "UserFindManyArgs", "args", &c), "user/user-find-many.args.ts");
        assert_eq!(
            generate_file_name(default, "SomeUnknownTypeInput", "input", &c),
            "prisma/some-unknown-type.input.ts"
        );
        assert_eq!(
            generate_file_name("{plural.type}/{name}.{type}.ts", "UserCreateInput", "input", &c),
            "inputs/user-create.input.ts"
        );
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path("/src/user.ts", "/src/post.ts"), "./post");
        assert_eq!(relative_path("src/user.ts", "src/post.ts"), "./post");
        assert_eq!(relative_path("/src/index.ts", "/src/a/b/c/deep.ts"), "./a/b/c/deep");
        assert_eq!(relative_path("/src/a/b/c/deep.ts", "/src/index.ts"), "../../../index");
        assert_eq!(relative_path("/src/models/user.ts", "/src/inputs/create.ts"), "../inputs/create");
        assert_eq!(relative_path("/src/a.ts", "/src/b.js"), "./b.js");
        assert_eq!(relative_path("/src/user.ts", "/src/user.ts"), "./user");
        assert_eq!(relative_path("/a.ts", "/b.ts"), "./b");
    }

    #[test]
    fn test_interpolate_leaves_unknown_and_braces() {
        let out = interpolate("{a}-{b}-{ x }", |k| (k == "a").then(|| "1".to_string()));
        assert_eq!(out, "1-{b}-{ x }");
    }

    #[test]
    fn test_bogus_names() {
        assert!(is_contain_bogus("UserNullableFilter"));
        assert!(is_contain_bogus("NestedIntFilter"));
        assert!(is_contain_bogus("IntNullableWithAggregatesFilter"));
        assert!(!is_contain_bogus("IntFilter"));
        assert_eq!(replace_bogus("NestedIntNullableFilter"), "IntFilter");
    }

    #[test]
    fn test_sanitize_segment() {
        assert_eq!(sanitize_segment("{name}:{type}.ts"), "{name}-{type}.ts");
        assert_eq!(sanitize_segment("a**b"), "a-b");
        assert_eq!(sanitize_segment("user"), "user");
    }
}
