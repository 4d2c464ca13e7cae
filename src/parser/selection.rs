// Clause parsers for the selection expression language

use super::lexer::{identifier, integer_literal, number_literal, string_literal, ws};
use crate::state::Interaction;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::opt,
    multi::separated_list0,
    sequence::{delimited, separated_pair},
    IResult,
};

/// Parse a genre set
/// Format: genres(Drama, "Film noir") or genres() to clear
pub fn parse_genres(input: &str) -> IResult<&str, Interaction> {
    let (input, _) = ws(tag("genres"))(input)?;
    let (input, genres) = delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), ws(alt((string_literal, identifier)))),
        ws(char(')')),
    )(input)?;

    Ok((input, Interaction::SetGenres(genres)))
}

/// Parse the select-all / clear toggle
/// Format: toggle_genres()
pub fn parse_toggle_genres(input: &str) -> IResult<&str, Interaction> {
    let (input, _) = ws(tag("toggle_genres"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, _) = ws(char(')'))(input)?;

    Ok((input, Interaction::ToggleGenres))
}

/// Parse a rating range; either bound may be omitted
/// Format: rating(85..95), rating(85..), rating(..90)
pub fn parse_rating(input: &str) -> IResult<&str, Interaction> {
    let (input, _) = ws(tag("rating"))(input)?;
    let (input, (min, max)) = delimited(
        ws(char('(')),
        separated_pair(opt(ws(number_literal)), tag(".."), opt(ws(number_literal))),
        ws(char(')')),
    )(input)?;

    Ok((input, Interaction::SetRating { min, max }))
}

/// Parse a vote-count range; either bound may be omitted
/// Format: votes(10000..50000), votes(..50000)
pub fn parse_votes(input: &str) -> IResult<&str, Interaction> {
    let (input, _) = ws(tag("votes"))(input)?;
    let (input, (min, max)) = delimited(
        ws(char('(')),
        separated_pair(opt(ws(integer_literal)), tag(".."), opt(ws(integer_literal))),
        ws(char(')')),
    )(input)?;

    Ok((input, Interaction::SetVotes { min, max }))
}

/// Parse any clause
pub fn parse_clause(input: &str) -> IResult<&str, Interaction> {
    alt((parse_toggle_genres, parse_genres, parse_rating, parse_votes))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_genres() {
        let (rest, clause) = parse_genres(r#"genres(Drama, "Film noir", Sci-Fi)"#).unwrap();
        assert_eq!(rest, "");
        assert_eq!(
            clause,
            Interaction::SetGenres(vec![
                "Drama".to_string(),
                "Film noir".to_string(),
                "Sci-Fi".to_string()
            ])
        );
    }

    #[test]
    fn test_parse_empty_genres() {
        let (_, clause) = parse_genres("genres( )").unwrap();
        assert_eq!(clause, Interaction::SetGenres(vec![]));
    }

    #[test]
    fn test_parse_toggle() {
        assert_eq!(
            parse_clause("toggle_genres()").unwrap().1,
            Interaction::ToggleGenres
        );
    }

    #[test]
    fn test_parse_rating_bounds() {
        assert_eq!(
            parse_rating("rating(85..92.5)").unwrap().1,
            Interaction::SetRating {
                min: Some(85.0),
                max: Some(92.5)
            }
        );
        assert_eq!(
            parse_rating("rating( 85 .. )").unwrap().1,
            Interaction::SetRating {
                min: Some(85.0),
                max: None
            }
        );
        assert_eq!(
            parse_rating("rating(..)").unwrap().1,
            Interaction::SetRating { min: None, max: None }
        );
    }

    #[test]
    fn test_parse_votes() {
        assert_eq!(
            parse_clause("votes(..50000)").unwrap().1,
            Interaction::SetVotes {
                min: None,
                max: Some(50000)
            }
        );
        assert!(parse_votes("votes(1.5..2)").is_err());
    }

    #[test]
    fn test_parse_rating_missing_dots() {
        assert!(parse_rating("rating(85)").is_err());
        assert!(parse_rating("rating(85..90").is_err());
    }
}
