use crate::error::{DashResult, DashboardError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// One row of the top-movies table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub no: u32,
    pub title: String,
    /// Percentage, 0-100
    pub rating_avg: f64,
    pub rating_total: u64,
    pub year: i32,
    pub countries: Vec<String>,
    pub genres: Vec<String>,
    /// Minutes
    pub duration: u32,
    pub directors: Vec<String>,
    pub actors: Vec<String>,
}

/// Single-valued numeric columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    No,
    RatingAvg,
    RatingTotal,
    Year,
    Duration,
}

impl NumericField {
    pub fn key(self) -> &'static str {
        match self {
            NumericField::No => "no",
            NumericField::RatingAvg => "rating_avg",
            NumericField::RatingTotal => "rating_total",
            NumericField::Year => "year",
            NumericField::Duration => "duration",
        }
    }
}

/// Columns holding several values per movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiField {
    Genres,
    Directors,
    Countries,
    Actors,
}

impl MultiField {
    pub fn key(self) -> &'static str {
        match self {
            MultiField::Genres => "genres",
            MultiField::Directors => "directors",
            MultiField::Countries => "countries",
            MultiField::Actors => "actors",
        }
    }
}

impl Movie {
    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::No => self.no as f64,
            NumericField::RatingAvg => self.rating_avg,
            NumericField::RatingTotal => self.rating_total as f64,
            NumericField::Year => self.year as f64,
            NumericField::Duration => self.duration as f64,
        }
    }

    pub fn values(&self, field: MultiField) -> &[String] {
        match field {
            MultiField::Genres => &self.genres,
            MultiField::Directors => &self.directors,
            MultiField::Countries => &self.countries,
            MultiField::Actors => &self.actors,
        }
    }

    fn validate(&self, index: usize) -> DashResult<()> {
        let reason = if !self.rating_avg.is_finite() || !(0.0..=100.0).contains(&self.rating_avg) {
            Some(format!("rating_avg {} is outside 0-100", self.rating_avg))
        } else if self.duration == 0 {
            Some("duration must be positive".to_string())
        } else if self.genres.is_empty() {
            Some("genres must not be empty".to_string())
        } else if self.directors.is_empty() {
            Some("directors must not be empty".to_string())
        } else {
            None
        };

        match reason {
            Some(reason) => Err(DashboardError::InvalidRecord {
                index,
                title: self.title.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// The immutable movie table every view reads from.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    movies: Vec<Movie>,
}

impl Dataset {
    /// Build a dataset from already parsed records, validating every row.
    pub fn new(movies: Vec<Movie>) -> DashResult<Self> {
        for (index, movie) in movies.iter().enumerate() {
            movie.validate(index)?;
        }
        Ok(Self { movies })
    }

    /// Load the bundled JSON file (an array of movie objects)
    pub fn load(path: impl AsRef<Path>) -> DashResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DashboardError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dataset = Self::from_reader(BufReader::new(file))?;
        info!(path = %path.display(), movies = dataset.len(), "Loaded dataset");
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> DashResult<Self> {
        let movies: Vec<Movie> = serde_json::from_reader(reader)?;
        Self::new(movies)
    }

    pub fn from_json_str(json: &str) -> DashResult<Self> {
        let movies: Vec<Movie> = serde_json::from_str(json)?;
        Self::new(movies)
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Sorted distinct genre labels
    pub fn genre_facets(&self) -> Vec<String> {
        let facets: BTreeSet<&String> = self.movies.iter().flat_map(|m| m.genres.iter()).collect();
        debug!(facets = facets.len(), "Collected genre facets");
        facets.into_iter().cloned().collect()
    }

    /// Observed (min, max) of a numeric column, None when the table is empty.
    pub fn min_max(&self, field: NumericField) -> Option<(f64, f64)> {
        min_max(self.movies.iter().map(|m| m.numeric(field)))
    }

    /// Slider bounds for the average rating: whole percentages enclosing the data.
    pub fn rating_bounds(&self) -> (f64, f64) {
        self.min_max(NumericField::RatingAvg)
            .map(|(min, max)| (min.floor(), max.ceil()))
            .unwrap_or((0.0, 100.0))
    }

    pub fn votes_bounds(&self) -> (u64, u64) {
        let min = self.movies.iter().map(|m| m.rating_total).min();
        let max = self.movies.iter().map(|m| m.rating_total).max();
        match (min, max) {
            (Some(min), Some(max)) => (min, max),
            _ => (0, 0),
        }
    }
}

pub(crate) fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn movie(no: u32, title: &str, genres: &[&str], rating_avg: f64, rating_total: u64) -> Movie {
        Movie {
            no,
            title: title.to_string(),
            rating_avg,
            rating_total,
            year: 1990 + no as i32,
            countries: vec!["USA".to_string()],
            genres: genres.iter().map(|g| g.to_string()).collect(),
            duration: 90 + no * 10,
            directors: vec![format!("Director {}", no)],
            actors: vec![],
        }
    }

    /// The three-movie table used throughout the tests
    pub fn three_movies() -> Dataset {
        Dataset::new(vec![
            movie(1, "First", &["Drama"], 90.0, 1000),
            movie(2, "Second", &["Comedy", "Drama"], 85.0, 500),
            movie(3, "Third", &["Action"], 95.0, 2000),
        ])
        .unwrap()
    }
}
