use crate::core::QueryError;
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::map,
    multi::{many0, many1},
    sequence::{delimited, preceded},
};

/// Stand-in for spaces inside quoted literals, so a multi-word literal
/// survives whitespace tokenization as a single token. U+001F cannot occur
/// in typed input; the command parser restores it to a space.
pub const SPACE_PLACEHOLDER: char = '\u{1F}';

fn enclose(quote: char, inner: &str) -> String {
    let normalized = inner.replace(' ', &SPACE_PLACEHOLDER.to_string());
    format!("{quote}{normalized}{quote}")
}

fn quoted(input: &str) -> IResult<&str, String> {
    alt((
        map(
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            |s: &str| enclose('\'', s),
        ),
        map(
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
            |s: &str| enclose('"', s),
        ),
    ))(input)
}

fn bare(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| !c.is_whitespace() && c != '\'' && c != '"'),
        str::to_string,
    )(input)
}

// A token interleaves bare and quoted segments with no space between
// them, e.g. `('John Smith',` is one token.
fn token(input: &str) -> IResult<&str, String> {
    map(many1(alt((quoted, bare))), |parts| parts.concat())(input)
}

/// Split a raw command line into tokens, keeping quoted literals intact.
pub fn tokenize(line: &str) -> Result<Vec<String>, QueryError> {
    let (rest, tokens) = many0(preceded(multispace0, token))(line)
        .map_err(|_| QueryError::Syntax(format!("unreadable input: {line}")))?;
    if rest.trim().is_empty() {
        Ok(tokens)
    } else {
        Err(QueryError::Syntax(format!("unreadable input near: {rest}")))
    }
}
