//! JSDoc blocks for documented models and fields.

use crate::directives::{Literal, ObjectSettings};

/// `/** ... */` block for `documentation`, with `@deprecated` when the
/// settings carry a deprecation reason.
pub fn create_comment(documentation: &str, settings: Option<&ObjectSettings>) -> String {
    let mut code = String::from("/**\n");
    for line in documentation.split('\n') {
        code.push_str(&format!(" * {line}\n"));
    }
    let reason = settings
        .and_then(ObjectSettings::field_arguments)
        .and_then(|args| args.get("deprecationReason"))
        .and_then(Literal::as_str);
    if let Some(reason) = reason {
        code.push_str(&format!(" * @deprecated {reason}\n"));
    }
    code.push_str(" */");
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::directives::parse_directives;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_multi_line() {
        assert_eq!(
            create_comment("First line\nSecond line", None),
            "/**\n * First line\n * Second line\n */"
        );
        assert_eq!(create_comment("", None), "/**\n * \n */");
    }

    #[test]
    fn test_deprecation() {
        let parsed = parse_directives("Old name\n@deprecated Use fullName", &Config::default()).unwrap();
        let comment = create_comment(&parsed.documentation, Some(&parsed.settings));
        assert!(comment.contains(" * Old name\n"));
        assert!(comment.contains(" * @deprecated Use fullName\n"));

        let parsed = parse_directives("Plain", &Config::default()).unwrap();
        assert!(!create_comment(&parsed.documentation, Some(&parsed.settings)).contains("@deprecated"));
    }
}
