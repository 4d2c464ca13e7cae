// Lexical helpers shared by the selection parsers

use nom::{
    bytes::complete::{take_till, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{map, map_res, opt, recognize},
    sequence::{delimited, pair},
    IResult,
};

/// Wrap a parser so it skips surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Bare word: letters, digits, `_` and `-` (e.g. `Sci-Fi`, `Krimi`)
pub fn identifier(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-'),
        |s: &str| s.to_string(),
    )(input)
}

/// Double-quoted string without escapes
pub fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('"'), take_till(|c| c == '"'), char('"')),
        |s: &str| s.to_string(),
    )(input)
}

/// Non-negative decimal such as `85` or `85.5`. A lone trailing dot is left
/// unconsumed so `85..90` splits into two numbers.
pub fn number_literal(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(pair(digit1, opt(pair(char('.'), digit1)))),
        |s: &str| s.parse::<f64>(),
    )(input)
}

/// Non-negative integer
pub fn integer_literal(input: &str) -> IResult<&str, u64> {
    nom::character::complete::u64(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("Sci-Fi)"), Ok((")", "Sci-Fi".to_string())));
        assert_eq!(identifier("Dobrodružný,"), Ok((",", "Dobrodružný".to_string())));
        assert!(identifier("(").is_err());
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(
            string_literal(r#""Film noir" rest"#),
            Ok((" rest", "Film noir".to_string()))
        );
        assert!(string_literal(r#""unterminated"#).is_err());
    }

    #[test]
    fn test_number_stops_before_range_dots() {
        assert_eq!(number_literal("85..90"), Ok(("..90", 85.0)));
        assert_eq!(number_literal("85.5.."), Ok(("..", 85.5)));
    }

    #[test]
    fn test_ws() {
        assert_eq!(ws(identifier)("  Drama  |"), Ok(("|", "Drama".to_string())));
    }
}
