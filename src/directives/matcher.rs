//! Name matching for `match` options and decorate rules.

use crate::error::Result;
use glob::Pattern;

/// A glob over type or field names.
///
/// On top of `glob` syntax this accepts `{a,b}` and `@(a|b)` alternation.
/// A leading `!` makes a pattern exclude names. A name matches when it hits
/// an including pattern (or there is none) and no excluding pattern.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    sources: Vec<String>,
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl NameMatcher {
    pub fn new(source: &str) -> Result<Self> {
        Self::from_sources(&[source])
    }

    pub fn from_sources<S: AsRef<str>>(sources: &[S]) -> Result<Self> {
        let mut matcher = NameMatcher {
            sources: Vec::new(),
            include: Vec::new(),
            exclude: Vec::new(),
        };
        for source in sources {
            let source = source.as_ref();
            let (negated, body) = match source.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, source),
            };
            for expanded in expand_alternatives(body) {
                let pattern = Pattern::new(&expanded)?;
                if negated {
                    matcher.exclude.push(pattern);
                } else {
                    matcher.include.push(pattern);
                }
            }
            matcher.sources.push(source.to_string());
        }
        Ok(matcher)
    }

    pub fn is_match(&self, name: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|p| p.matches(name));
        included && !self.exclude.iter().any(|p| p.matches(name))
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }
}

impl PartialEq for NameMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.sources == other.sources
    }
}

fn expand_alternatives(pattern: &str) -> Vec<String> {
    if let Some((prefix, options, suffix)) = find_group(pattern) {
        let mut out = Vec::new();
        for option in options {
            for tail in expand_alternatives(&format!("{option}{suffix}")) {
                out.push(format!("{prefix}{tail}"));
            }
        }
        return out;
    }
    vec![pattern.to_string()]
}

/// First `{a,b}` or `@(a|b)` group: (text before, alternatives, text after).
fn find_group(pattern: &str) -> Option<(&str, Vec<&str>, &str)> {
    let brace = pattern.find('{').map(|i| (i, 1, '}', ','));
    let extglob = pattern.find("@(").map(|i| (i, 2, ')', '|'));
    let (start, open_len, close, separator) = match (brace, extglob) {
        (Some(b), Some(e)) => {
            if b.0 < e.0 {
                b
            } else {
                e
            }
        }
        (Some(b), None) => b,
        (None, Some(e)) => e,
        (None, None) => return None,
    };
    let body_start = start + open_len;
    let end = body_start + pattern[body_start..].find(close)?;
    let options = pattern[body_start..end].split(separator).collect();
    Some((&pattern[..start], options, &pattern[end + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_glob() {
        let m = NameMatcher::new("*CreateInput").unwrap();
        assert!(m.is_match("UserCreateInput"));
        assert!(!m.is_match("UserUpdateInput"));
    }

    #[test]
    fn test_alternation() {
        let m = NameMatcher::new("@(User|Comment)Create*Input").unwrap();
        assert!(m.is_match("UserCreateInput"));
        assert!(m.is_match("CommentCreateManyInput"));
        assert!(!m.is_match("PostCreateInput"));

        let m = NameMatcher::new("{first,last}Name").unwrap();
        assert!(m.is_match("lastName"));
        assert!(!m.is_match("middleName"));
    }

    #[test]
    fn test_negation() {
        let m = NameMatcher::new("!password").unwrap();
        assert!(m.is_match("email"));
        assert!(!m.is_match("password"));

        let m = NameMatcher::from_sources(&["*Input", "!*WhereInput"]).unwrap();
        assert!(m.is_match("UserCreateInput"));
        assert!(!m.is_match("UserWhereInput"));
        assert!(!m.is_match("UserArgs"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(NameMatcher::new("[abc").is_err());
    }
}
