//! Line grammar for documentation-comment directives.
//!
//! ```text
//! line       := call | deprecated | complexity
//! call       := '@' name ('.' name)? '(' balanced-args ')' prose?
//! deprecated := '@deprecated' (ws prose)?
//! complexity := '@complexity' (ws prose)?
//! ```

use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::char,
    combinator::{opt, recognize},
    error::ParseError as NomParseError,
    sequence::pair,
    IResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveLine<'a> {
    Call {
        /// Full name, possibly dotted: `Validator.MaxLength`.
        name: &'a str,
        args: &'a str,
        trailing: &'a str,
    },
    Deprecated(&'a str),
    Complexity(&'a str),
}

/// Classify one comment line. `None` means the line is plain documentation.
pub fn parse_line(line: &str) -> Option<DirectiveLine<'_>> {
    let line = line.trim();
    if let Some(rest) = annotation(line, "deprecated") {
        return Some(DirectiveLine::Deprecated(rest));
    }
    if let Some(rest) = annotation(line, "complexity") {
        return Some(DirectiveLine::Complexity(rest));
    }
    match call::<nom::error::Error<&str>>(line) {
        Ok((trailing, (name, args))) => Some(DirectiveLine::Call {
            name,
            args: args.trim(),
            trailing: trailing.trim(),
        }),
        Err(_) => None,
    }
}

fn annotation<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix('@')?.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

fn word<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

fn directive_name<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    recognize(pair(word, opt(pair(char('.'), word))))(input)
}

fn call<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, (&'a str, &'a str), E> {
    let (input, _) = tag("@")(input)?;
    let (input, name) = directive_name(input)?;
    let (input, args) = parenthesized(input)?;
    Ok((input, (name, args)))
}

/// Text between a `(` and its matching `)`, skipping over quoted strings.
fn parenthesized<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    let (body, _) = char('(')(input)?;
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if let Some(q) = quote {
            match c {
                '\\' => escaped = true,
                c if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '\\' => escaped = true,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&body[i + 1..], &body[..i]));
                }
            }
            _ => {}
        }
    }
    Err(nom::Err::Error(E::from_error_kind(input, nom::error::ErrorKind::Char)))
}
