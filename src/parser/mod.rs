// Selection expression parser
//
// clause ('|' clause)*, each clause one interaction applied left to right:
//   genres(Drama, "Film noir") | rating(85..) | votes(..50000) | toggle_genres()

pub mod lexer;
pub mod selection;

use crate::error::{DashResult, DashboardError};
use crate::state::Interaction;
use lexer::ws;
use nom::{
    bytes::complete::tag,
    character::complete::multispace0,
    combinator::all_consuming,
    multi::separated_list0,
    sequence::delimited,
    Finish,
};
use selection::parse_clause;

/// Parse a whole selection expression. Blank input yields no interactions.
pub fn parse_selection(input: &str) -> DashResult<Vec<Interaction>> {
    let result = all_consuming(delimited(
        multispace0,
        separated_list0(ws(tag("|")), parse_clause),
        multispace0,
    ))(input)
    .finish();

    match result {
        Ok((_, clauses)) => Ok(clauses),
        Err(e) => Err(DashboardError::Parse(format!(
            "unexpected input at '{}'",
            e.input.trim()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pipeline() {
        let clauses =
            parse_selection(r#"genres(Drama, "Film noir") | rating(85..) | votes(..50000)"#)
                .unwrap();
        assert_eq!(clauses.len(), 3);
        assert_eq!(
            clauses[1],
            Interaction::SetRating {
                min: Some(85.0),
                max: None
            }
        );
    }

    #[test]
    fn test_blank_expression() {
        assert!(parse_selection("").unwrap().is_empty());
        assert!(parse_selection("   ").unwrap().is_empty());
    }

    #[test]
    fn test_trailing_garbage() {
        let err = parse_selection("rating(85..) | bogus(1)").unwrap_err();
        assert!(matches!(err, DashboardError::Parse(_)));
        assert!(err.to_string().contains("bogus(1)"));
    }

    #[test]
    fn test_dangling_pipe() {
        assert!(parse_selection("toggle_genres() |").is_err());
    }
}
