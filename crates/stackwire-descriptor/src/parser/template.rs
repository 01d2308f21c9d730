//! `${...}` interpolation inside string literals.
//!
//! Recognized forms are `${stage}`, `${app}`, `${secret.NAME}` and
//! `${target.attribute}`. `$$` produces a literal `$`.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::char,
    combinator::{map, opt, value},
    sequence::{delimited, pair, preceded},
};
use stackwire_common::error::{Result, StackwireError};

use super::ast::{Reference, Segment, Value};

/// Names that cannot be used as resource names because they mean something
/// inside an interpolation.
pub const RESERVED_NAMES: [&str; 3] = ["stage", "app", "secret"];

#[derive(Debug, Clone, Copy)]
enum Piece<'a> {
    Text(&'a str),
    Path(&'a str, Option<&'a str>),
}

fn path_part(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(input)
}

fn interpolation(input: &str) -> IResult<&str, Piece<'_>> {
    map(
        delimited(
            tag("${"),
            pair(path_part, opt(preceded(char('.'), path_part))),
            char('}'),
        ),
        |(head, tail)| Piece::Path(head, tail),
    )
    .parse(input)
}

/// A `$` that does not start an interpolation. An unterminated `${` is a
/// hard failure rather than text.
fn lone_dollar(input: &str) -> IResult<&str, Piece<'_>> {
    let (rest, _) = char('$')(input)?;
    if rest.starts_with('{') {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }
    Ok((rest, Piece::Text("$")))
}

fn piece(input: &str) -> IResult<&str, Piece<'_>> {
    alt((
        value(Piece::Text("$"), tag("$$")),
        interpolation,
        map(take_while1(|c: char| c != '$'), Piece::Text),
        lone_dollar,
    ))
    .parse(input)
}

fn classify(head: &str, tail: Option<&str>, source: &str) -> Result<Segment> {
    match (head, tail) {
        ("stage", None) => Ok(Segment::Stage),
        ("app", None) => Ok(Segment::App),
        ("secret", Some(name)) => Ok(Segment::Secret(name.to_owned())),
        ("secret", None) => Err(StackwireError::malformed(format!(
            "\"{source}\": ${{secret}} must name a variable, e.g. ${{secret.LOG_LEVEL}}"
        ))),
        ("stage" | "app", Some(attr)) => Err(StackwireError::malformed(format!(
            "\"{source}\": ${{{head}}} has no attribute \"{attr}\""
        ))),
        (target, Some(attribute)) => Ok(Segment::Reference(Reference::new(target, attribute))),
        (target, None) => Err(StackwireError::malformed(format!(
            "\"{source}\": reference to \"{target}\" must name an attribute"
        ))),
    }
}

/// Parses the contents of a string literal into a [`Value`].
///
/// Adjacent text is merged into a single literal segment.
///
/// # Errors
///
/// Returns a malformed-descriptor error for unterminated or unknown
/// interpolations.
pub fn parse_template(source: &str) -> Result<Value> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut remaining = source;

    while !remaining.is_empty() {
        let (rest, found) = piece(remaining).map_err(|_| {
            StackwireError::malformed(format!("\"{source}\": unterminated or invalid interpolation"))
        })?;
        match found {
            Piece::Text(text) => {
                if let Some(Segment::Literal(last)) = segments.last_mut() {
                    last.push_str(text);
                } else {
                    segments.push(Segment::Literal(text.to_owned()));
                }
            }
            Piece::Path(head, tail) => segments.push(classify(head, tail, source)?),
        }
        remaining = rest;
    }

    Ok(Value { segments })
}
