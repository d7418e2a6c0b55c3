//! # TypeScript Writer
//!
//! Renders statement structures as TypeScript source: single quoted module
//! specifiers, four space indentation, one decorator per line.

use crate::emitter::{ClassDeclaration, Decorator, EnumDeclaration, ImportDeclaration, Property, Statement};

const INDENT: &str = "    ";

/// Render a whole file. Consecutive imports are grouped; every other
/// statement is separated by a blank line.
pub fn render_statements(statements: &[Statement]) -> String {
    let mut code = String::new();
    let mut previous_was_import = false;

    for (i, statement) in statements.iter().enumerate() {
        let is_import = matches!(statement, Statement::Import(_));
        if i > 0 && !(is_import && previous_was_import) {
            code.push('\n');
        }
        match statement {
            Statement::Import(import) => code.push_str(&render_import(import)),
            Statement::Class(class) => code.push_str(&render_class(class)),
            Statement::Enum(declaration) => code.push_str(&render_enum(declaration)),
            Statement::Raw(text) => {
                code.push_str(text);
                if !text.ends_with('\n') {
                    code.push('\n');
                }
            }
        }
        previous_was_import = is_import;
    }

    code
}

pub fn render_import(import: &ImportDeclaration) -> String {
    let mut clauses = Vec::new();
    if let Some(default) = &import.default_import {
        clauses.push(default.clone());
    }
    if let Some(namespace) = &import.namespace_import {
        clauses.push(format!("* as {namespace}"));
    }
    if !import.named_imports.is_empty() {
        let names: Vec<String> = import
            .named_imports
            .iter()
            .map(|n| match &n.alias {
                Some(alias) => format!("{} as {alias}", n.name),
                None => n.name.clone(),
            })
            .collect();
        clauses.push(format!("{{ {} }}", names.join(", ")));
    }

    let keyword = if import.type_only { "import type" } else { "import" };
    if clauses.is_empty() {
        return format!("import '{}';\n", import.module_specifier);
    }
    format!("{keyword} {} from '{}';\n", clauses.join(", "), import.module_specifier)
}

pub fn render_decorator(decorator: &Decorator) -> String {
    format!("@{}({})", decorator.name, decorator.arguments.join(", "))
}

pub fn render_class(class: &ClassDeclaration) -> String {
    let mut code = String::new();

    if let Some(docs) = &class.docs {
        code.push_str(docs);
        code.push('\n');
    }
    for decorator in &class.decorators {
        code.push_str(&render_decorator(decorator));
        code.push('\n');
    }

    if class.properties.is_empty() {
        code.push_str(&format!("export class {} {{}}\n", class.name));
        return code;
    }

    code.push_str(&format!("export class {} {{\n", class.name));
    for (i, property) in class.properties.iter().enumerate() {
        if i > 0 {
            code.push('\n');
        }
        code.push_str(&render_property(property));
    }
    code.push_str("}\n");
    code
}

fn render_property(property: &Property) -> String {
    let mut code = String::new();

    if let Some(docs) = &property.docs {
        for line in docs.lines() {
            code.push_str(&format!("{INDENT}{line}\n"));
        }
    }
    for decorator in &property.decorators {
        code.push_str(&format!("{INDENT}{}\n", render_decorator(decorator)));
    }

    let token = if property.has_question_token {
        "?"
    } else if property.has_exclamation_token {
        "!"
    } else {
        ""
    };
    code.push_str(&format!("{INDENT}{}{token}: {};\n", property.name, property.type_text));
    code
}

pub fn render_enum(declaration: &EnumDeclaration) -> String {
    let mut code = String::new();

    if let Some(docs) = &declaration.docs {
        code.push_str(docs);
        code.push('\n');
    }
    code.push_str(&format!("export enum {} {{\n", declaration.name));
    for member in &declaration.members {
        code.push_str(&format!("{INDENT}{} = {},\n", member.name, member.value));
    }
    code.push_str("}\n");
    code
}
