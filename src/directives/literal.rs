//! Literal values found in directive arguments and decorate rules.
//!
//! Accepts the relaxed object-literal syntax people write in doc comments
//! (unquoted keys, single or double quotes, trailing commas). Anything that is
//! not a plain literal, such as a regex or an identifier expression, is kept
//! verbatim as [`Literal::Raw`].

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, take_while1},
    character::complete::{char, digit1, multispace0, none_of, one_of},
    combinator::{all_consuming, map, opt, recognize, value},
    error::ParseError as NomParseError,
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    /// Numbers keep their source spelling.
    Number(String),
    String(String),
    Array(Vec<Literal>),
    Object(Vec<(String, Literal)>),
    Raw(String),
}

impl Literal {
    pub fn object() -> Self {
        Literal::Object(Vec::new())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Literal::String(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Literal> {
        match self {
            Literal::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Insert or replace `key`, keeping first-insertion order.
    pub fn set(&mut self, key: &str, literal: Literal) {
        if let Literal::Object(entries) = self {
            match entries.iter_mut().find(|(k, _)| k == key) {
                Some(entry) => entry.1 = literal,
                None => entries.push((key.to_string(), literal)),
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Literal> {
        match self {
            Literal::Object(entries) => {
                let index = entries.iter().position(|(k, _)| k == key)?;
                Some(entries.remove(index).1)
            }
            _ => None,
        }
    }

    /// Shallow merge of another object's entries into this one.
    pub fn merge(&mut self, other: &Literal) {
        if let Literal::Object(entries) = other {
            for (key, literal) in entries {
                self.set(key, literal.clone());
            }
        }
    }

    pub fn is_empty_object(&self) -> bool {
        matches!(self, Literal::Object(entries) if entries.is_empty())
    }

    /// Source text used when this literal is a decorator argument.
    /// Strings are emitted bare, matching how directive arguments were written.
    pub fn to_source(&self) -> String {
        match self {
            Literal::Raw(raw) => raw.clone(),
            other => other.to_string(),
        }
    }
}

/// Compact object-literal rendering: `{nullable:false,description:'Name'}`.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Number(n) => write!(f, "{n}"),
            Literal::String(s) => write!(f, "{}", quote(s)),
            Literal::Raw(raw) => write!(f, "{raw}"),
            Literal::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Literal::Object(entries) => {
                write!(f, "{{")?;
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    if is_identifier(key) {
                        write!(f, "{key}:{item}")?;
                    } else {
                        write!(f, "{}:{item}", quote(key))?;
                    }
                }
                write!(f, "}}")
            }
        }
    }
}

/// Single quotes unless the text has more single than double quotes.
pub fn quote(text: &str) -> String {
    let singles = text.matches('\'').count();
    let doubles = text.matches('"').count();
    let q = if singles > doubles { '"' } else { '\'' };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(q);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == q => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(q);
    out
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// ============================================================================
// Public API
// ============================================================================

/// Parse one complete literal.
pub fn parse_literal(input: &str) -> Result<Literal, String> {
    match all_consuming(delimited(multispace0, literal::<nom::error::Error<&str>>, multispace0))(input) {
        Ok((_, lit)) => Ok(lit),
        Err(e) => Err(format!("cannot parse literal '{input}': {e}")),
    }
}

/// Parse directive call arguments: a single literal, or a comma separated
/// list of literals. Empty text gives an empty list.
pub fn parse_args(input: &str) -> Result<Vec<Literal>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let list = all_consuming(delimited(
        multispace0,
        terminated(
            separated_list0(
                delimited(multispace0, char(','), multispace0),
                literal::<nom::error::Error<&str>>,
            ),
            opt(preceded(multispace0, char(','))),
        ),
        multispace0,
    ))(trimmed);
    match list {
        Ok((_, items)) => Ok(items),
        Err(e) => Err(format!("cannot parse arguments '{trimmed}': {e}")),
    }
}

/// Split argument text on top-level commas, keeping each piece as source.
/// Commas inside brackets, braces, parentheses, strings and regexes are kept.
pub fn split_arguments(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut in_regex = false;
    let mut escaped = false;
    let mut current = String::new();
    let mut previous_significant: Option<char> = None;

    for c in input.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        if let Some(q) = quote {
            current.push(c);
            match c {
                '\\' => escaped = true,
                c if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        if in_regex {
            current.push(c);
            match c {
                '\\' => escaped = true,
                '/' => in_regex = false,
                _ => {}
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '/' if matches!(previous_significant, None | Some(',') | Some('(') | Some('[') | Some(':')) => {
                in_regex = true
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                let part = current.trim();
                if !part.is_empty() {
                    parts.push(part.to_string());
                }
                current.clear();
                previous_significant = Some(',');
                continue;
            }
            _ => {}
        }
        if !c.is_whitespace() {
            previous_significant = Some(c);
        }
        current.push(c);
    }
    let part = current.trim();
    if !part.is_empty() {
        parts.push(part.to_string());
    }
    parts
}

// ============================================================================
// Internal Parsers
// ============================================================================

fn literal<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Literal, E> {
    alt((
        map(string_literal, Literal::String),
        map(number_literal, |n: &str| Literal::Number(n.to_string())),
        array_literal,
        object_literal,
        regex_literal,
        keyword_or_expression,
    ))(input)
}

fn string_literal<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, String, E> {
    alt((quoted('"'), quoted('\'')))(input)
}

fn quoted<'a, E: NomParseError<&'a str>>(q: char) -> impl FnMut(&'a str) -> IResult<&'a str, String, E> {
    move |input: &'a str| {
        let forbidden: &'static str = if q == '"' { "\"\\" } else { "'\\" };
        let (rest, _) = char(q)(input)?;
        // escaped_transform fails on an empty body.
        if let Ok((rest, _)) = char::<_, E>(q)(rest) {
            return Ok((rest, String::new()));
        }
        let (rest, body) = escaped_transform(
            none_of(forbidden),
            '\\',
            alt((
                value('\n', char('n')),
                value('\r', char('r')),
                value('\t', char('t')),
                value('\\', char('\\')),
                value('\'', char('\'')),
                value('"', char('"')),
                value('/', char('/')),
            )),
        )(rest)?;
        let (rest, _) = char(q)(rest)?;
        Ok((rest, body))
    }
}

fn number_literal<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    let (rest, number) = recognize(tuple((
        opt(one_of("+-")),
        digit1,
        opt(pair(char('.'), digit1)),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)?;
    // `1abc` is an expression, not a number.
    if rest.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err(nom::Err::Error(E::from_error_kind(input, nom::error::ErrorKind::Digit)));
    }
    Ok((rest, number))
}

fn array_literal<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Literal, E> {
    let (input, _) = pair(char('['), multispace0)(input)?;
    let (input, items) = separated_list0(delimited(multispace0, char(','), multispace0), literal)(input)?;
    let (input, _) = tuple((multispace0, opt(char(',')), multispace0, char(']')))(input)?;
    Ok((input, Literal::Array(items)))
}

fn object_literal<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Literal, E> {
    let (input, _) = pair(char('{'), multispace0)(input)?;
    let (input, entries) = separated_list0(
        delimited(multispace0, char(','), multispace0),
        pair(
            terminated(object_key, tuple((multispace0, char(':'), multispace0))),
            literal,
        ),
    )(input)?;
    let (input, _) = tuple((multispace0, opt(char(',')), multispace0, char('}')))(input)?;
    Ok((input, Literal::Object(entries)))
}

fn object_key<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, String, E> {
    alt((
        string_literal,
        map(take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$'), String::from),
    ))(input)
}

fn regex_literal<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Literal, E> {
    let (rest, source) = recognize(tuple((
        char('/'),
        many0(alt((recognize(pair(char('\\'), nom::character::complete::anychar)), recognize(none_of("/\\\n"))))),
        char('/'),
        opt(take_while1(|c: char| c.is_ascii_alphabetic())),
    )))(input)?;
    Ok((rest, Literal::Raw(source.to_string())))
}

/// `true`, `false`, `null`, `undefined`, or a dotted identifier expression
/// optionally followed by a call, e.g. `Number.MAX_SAFE_INTEGER` or
/// `Date.now()`.
fn keyword_or_expression<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Literal, E> {
    let (rest, word) = recognize(pair(
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.'),
        opt(balanced_parens),
    ))(input)?;
    let literal = match word {
        "true" => Literal::Bool(true),
        "false" => Literal::Bool(false),
        "null" | "undefined" => Literal::Null,
        expr => Literal::Raw(expr.to_string()),
    };
    Ok((rest, literal))
}

fn balanced_parens<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    if !input.starts_with('(') {
        return Err(nom::Err::Error(E::from_error_kind(input, nom::error::ErrorKind::Char)));
    }
    let mut depth = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[i + 1..], &input[..=i]));
                }
            }
            _ => {}
        }
    }
    Err(nom::Err::Error(E::from_error_kind(input, nom::error::ErrorKind::Eof)))
}
