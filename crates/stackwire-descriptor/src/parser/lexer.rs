//! Tokenization of `.stk` source text using `nom`.
//!
//! Produces a stream of [`Token`]s from raw input for the parser to consume.
//! Whitespace and `//` line comments are discarded between tokens.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, multispace1, not_line_ending},
    combinator::value,
    multi::many0,
    sequence::preceded,
};
use stackwire_common::error::{Result, StackwireError};

/// A token in the `.stk` language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `APP` keyword.
    App,
    /// `ENVIRONMENT` keyword.
    Environment,
    /// `RESOURCE` keyword.
    Resource,
    /// `OUTPUT` keyword.
    Output,
    /// Boolean literal `true`.
    True,
    /// Boolean literal `false`.
    False,
    /// An identifier (resource name, kind, property name, attribute).
    Identifier(String),
    /// A double-quoted string literal. `${...}` interpolations are kept
    /// verbatim and parsed later as a template.
    StringLiteral(String),
    /// An integer literal.
    Integer(i64),
    /// `{` opening brace.
    BraceOpen,
    /// `}` closing brace.
    BraceClose,
    /// `[` opening bracket.
    BracketOpen,
    /// `]` closing bracket.
    BracketClose,
    /// `.` separating a reference target from its attribute.
    Dot,
    /// `=` assignment.
    Equals,
    /// `,` comma separator.
    Comma,
}

fn skip_trivia(input: &str) -> IResult<&str, ()> {
    let comment = value((), preceded(tag("//"), not_line_ending));
    let ws = value((), multispace1);
    let (input, _) = many0(alt((ws, comment))).parse(input)?;
    Ok((input, ()))
}

/// Parses a double-quoted string literal with basic escape support.
fn string_literal(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('"')(input)?;
    let mut result = String::new();
    let mut chars = input.char_indices();
    loop {
        match chars.next() {
            Some((idx, '"')) => {
                return Ok((&input[idx + 1..], Token::StringLiteral(result)));
            }
            Some((_, '\\')) => match chars.next() {
                Some((_, 'n')) => result.push('\n'),
                Some((_, 't')) => result.push('\t'),
                Some((_, '\\')) => result.push('\\'),
                Some((_, '"')) => result.push('"'),
                Some((_, c)) => {
                    result.push('\\');
                    result.push(c);
                }
                None => return Err(unterminated(input)),
            },
            Some((_, '\n')) | None => return Err(unterminated(input)),
            Some((_, c)) => result.push(c),
        }
    }
}

fn unterminated(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Failure(nom::error::Error::new(input, nom::error::ErrorKind::Char))
}

fn integer_literal(input: &str) -> IResult<&str, Token> {
    let (rest, digits) = digit1(input)?;
    let val: i64 = digits.parse().map_err(|_| {
        nom::Err::Failure(nom::error::Error::new(input, nom::error::ErrorKind::Digit))
    })?;
    Ok((rest, Token::Integer(val)))
}

const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

const fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn identifier_or_keyword(input: &str) -> IResult<&str, Token> {
    let (input, first) = take_while1(is_ident_start)(input)?;
    let (input, rest) = take_while(is_ident_continue)(input)?;
    let word = format!("{first}{rest}");
    let token = match word.as_str() {
        "APP" => Token::App,
        "ENVIRONMENT" => Token::Environment,
        "RESOURCE" => Token::Resource,
        "OUTPUT" => Token::Output,
        "true" => Token::True,
        "false" => Token::False,
        _ => Token::Identifier(word),
    };
    Ok((input, token))
}

fn symbol(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::BraceOpen, char('{')),
        value(Token::BraceClose, char('}')),
        value(Token::BracketOpen, char('[')),
        value(Token::BracketClose, char(']')),
        value(Token::Dot, char('.')),
        value(Token::Equals, char('=')),
        value(Token::Comma, char(',')),
    ))
    .parse(input)
}

fn single_token(input: &str) -> IResult<&str, Token> {
    alt((
        string_literal,
        symbol,
        integer_literal,
        identifier_or_keyword,
    ))
    .parse(input)
}

/// Tokenizes a `.stk` source string into a vector of tokens.
///
/// # Errors
///
/// Returns a malformed-descriptor error if the input contains characters
/// that cannot be tokenized or an unterminated string literal.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, ()) = skip_trivia(remaining)
            .map_err(|e| StackwireError::malformed(format!("lexer error skipping whitespace: {e}")))?;
        remaining = rest;

        if remaining.is_empty() {
            break;
        }

        let (rest, token) = single_token(remaining).map_err(|e| {
            let snippet: String = remaining.chars().take(20).collect();
            StackwireError::malformed(format!("unexpected input at: \"{snippet}\" ({e})"))
        })?;
        tokens.push(token);
        remaining = rest;
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Token {
        Token::Identifier(s.into())
    }

    #[test]
    fn tokenize_keywords() {
        let tokens =
            tokenize("APP ENVIRONMENT RESOURCE OUTPUT true false").expect("should tokenize");
        assert_eq!(
            tokens,
            vec![
                Token::App,
                Token::Environment,
                Token::Resource,
                Token::Output,
                Token::True,
                Token::False,
            ]
        );
    }

    #[test]
    fn kinds_are_plain_identifiers() {
        let tokens = tokenize("BUCKET QUEUE").expect("should tokenize");
        assert_eq!(tokens, vec![ident("BUCKET"), ident("QUEUE")]);
    }

    #[test]
    fn tokenize_reference() {
        let tokens = tokenize("auth_table.name").expect("should tokenize");
        assert_eq!(tokens, vec![ident("auth_table"), Token::Dot, ident("name")]);
    }

    #[test]
    fn hyphenated_app_name_is_one_identifier() {
        let tokens = tokenize("APP pixel-collector-api {}").expect("should tokenize");
        assert_eq!(
            tokens,
            vec![
                Token::App,
                ident("pixel-collector-api"),
                Token::BraceOpen,
                Token::BraceClose,
            ]
        );
    }

    #[test]
    fn interpolation_stays_inside_string() {
        let tokens = tokenize(r#""${stage}.example.com""#).expect("should tokenize");
        assert_eq!(
            tokens,
            vec![Token::StringLiteral("${stage}.example.com".into())]
        );
    }

    #[test]
    fn tokenize_string_with_escapes() {
        let tokens = tokenize(r#""a\"b\\c""#).expect("should tokenize");
        assert_eq!(tokens, vec![Token::StringLiteral("a\"b\\c".into())]);
    }

    #[test]
    fn tokenize_skips_comments() {
        let input = "RESOURCE assets BUCKET // storage\n{ }";
        let tokens = tokenize(input).expect("should tokenize");
        assert_eq!(
            tokens,
            vec![
                Token::Resource,
                ident("assets"),
                ident("BUCKET"),
                Token::BraceOpen,
                Token::BraceClose,
            ]
        );
    }

    #[test]
    fn tokenize_map_with_commas() {
        let tokens = tokenize("{ id = \"string\", n = 512 }").expect("should tokenize");
        assert_eq!(
            tokens,
            vec![
                Token::BraceOpen,
                ident("id"),
                Token::Equals,
                Token::StringLiteral("string".into()),
                Token::Comma,
                ident("n"),
                Token::Equals,
                Token::Integer(512),
                Token::BraceClose,
            ]
        );
    }

    #[test]
    fn tokenize_empty_and_comment_only() {
        assert!(tokenize("").expect("should tokenize").is_empty());
        assert!(tokenize("// nothing here\n").expect("should tokenize").is_empty());
    }

    #[test]
    fn unterminated_string_fails() {
        assert!(tokenize("\"never closed").is_err());
        assert!(tokenize("\"split\nline\"").is_err());
    }

    #[test]
    fn invalid_character_fails() {
        let err = tokenize("RESOURCE @x BUCKET").unwrap_err();
        assert!(err.to_string().contains("unexpected input"), "got: {err}");
    }
}
