// Filter engine: genre facets and numeric ranges over the movie table

use crate::data::{Dataset, Movie};
use crate::error::{DashResult, DashboardError};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Inclusive numeric range, as picked on a range slider
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy + std::fmt::Display> NumericRange<T> {
    pub fn new(min: T, max: T) -> DashResult<Self> {
        if min > max {
            return Err(DashboardError::InvalidRange {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Which rows are visible. Replaced as a whole on every interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub genres: BTreeSet<String>,
    pub rating: NumericRange<f64>,
    pub votes: NumericRange<u64>,
}

impl Selection {
    /// All genres, full slider extents
    pub fn defaults(dataset: &Dataset) -> Self {
        let (rating_min, rating_max) = dataset.rating_bounds();
        let (votes_min, votes_max) = dataset.votes_bounds();
        Self {
            genres: dataset.genre_facets().into_iter().collect(),
            rating: NumericRange {
                min: rating_min,
                max: rating_max,
            },
            votes: NumericRange {
                min: votes_min,
                max: votes_max,
            },
        }
    }

    /// The "reset" button: a full selection is cleared, anything else becomes full.
    pub fn toggle_genres(self, all_genres: &[String]) -> Self {
        let genres = if self.genres.len() == all_genres.len() {
            BTreeSet::new()
        } else {
            all_genres.iter().cloned().collect()
        };
        Self { genres, ..self }
    }

    /// Whether a single movie passes all three predicates
    pub fn matches(&self, movie: &Movie) -> bool {
        self.rating.contains(movie.rating_avg)
            && self.votes.contains(movie.rating_total)
            && movie.genres.iter().any(|g| self.genres.contains(g))
    }
}

/// Apply a selection, keeping the original row order.
///
/// Genres use OR semantics: a movie passes when any of its genres is
/// selected, so an empty genre set yields an empty result.
pub fn filter_movies<'a>(dataset: &'a Dataset, selection: &Selection) -> Vec<&'a Movie> {
    let rows: Vec<&Movie> = dataset
        .movies()
        .iter()
        .filter(|m| selection.matches(m))
        .collect();
    debug!(total = dataset.len(), shown = rows.len(), "Applied selection");
    rows
}
