// Closed sets of metric keys offered by each analytical view

use crate::aggregate::Aggregate;
use crate::data::{MultiField, NumericField};
use crate::error::{DashResult, DashboardError};
use serde::Serialize;
use std::fmt::Debug;

/// A metric picker option: a stable key, a display label and the rule computing it.
pub trait Metric: Copy + Eq + Debug + 'static {
    /// Options in the order they are offered; the first one is the default.
    const ALL: &'static [Self];
    /// Used in "unknown key" errors
    const KIND: &'static str;

    fn key(self) -> &'static str;
    fn label(self) -> &'static str;
    fn rule(self) -> Aggregate;

    fn from_key(key: &str) -> DashResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.key() == key)
            .ok_or_else(|| DashboardError::unknown(Self::KIND, key))
    }

    fn default_metric() -> Self {
        Self::ALL[0]
    }
}

/// Per-genre averages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenreMetric {
    AvgRating,
    AvgVotes,
    AvgDuration,
}

impl Metric for GenreMetric {
    const ALL: &'static [Self] = &[
        GenreMetric::AvgRating,
        GenreMetric::AvgVotes,
        GenreMetric::AvgDuration,
    ];
    const KIND: &'static str = "genre metric";

    fn key(self) -> &'static str {
        match self {
            GenreMetric::AvgRating => "avg_rating",
            GenreMetric::AvgVotes => "avg_votes",
            GenreMetric::AvgDuration => "avg_duration",
        }
    }

    fn label(self) -> &'static str {
        match self {
            GenreMetric::AvgRating => "Rating (%)",
            GenreMetric::AvgVotes => "Number of ratings",
            GenreMetric::AvgDuration => "Movie length (min)",
        }
    }

    fn rule(self) -> Aggregate {
        match self {
            GenreMetric::AvgRating => Aggregate::Mean(NumericField::RatingAvg),
            GenreMetric::AvgVotes => Aggregate::Mean(NumericField::RatingTotal),
            GenreMetric::AvgDuration => Aggregate::Mean(NumericField::Duration),
        }
    }
}

/// Per-director summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectorMetric {
    AvgRating,
    TotalVotes,
    CountMovies,
    AvgFootage,
    CountGenres,
}

impl Metric for DirectorMetric {
    const ALL: &'static [Self] = &[
        DirectorMetric::AvgRating,
        DirectorMetric::TotalVotes,
        DirectorMetric::CountMovies,
        DirectorMetric::AvgFootage,
        DirectorMetric::CountGenres,
    ];
    const KIND: &'static str = "director metric";

    fn key(self) -> &'static str {
        match self {
            DirectorMetric::AvgRating => "avg_rating",
            DirectorMetric::TotalVotes => "total_votes",
            DirectorMetric::CountMovies => "count_movies",
            DirectorMetric::AvgFootage => "avg_footage",
            DirectorMetric::CountGenres => "count_genres",
        }
    }

    fn label(self) -> &'static str {
        match self {
            DirectorMetric::AvgRating => "Rating (%)",
            DirectorMetric::TotalVotes => "Number of ratings",
            DirectorMetric::CountMovies => "Number of movies",
            DirectorMetric::AvgFootage => "Movie length (min)",
            DirectorMetric::CountGenres => "Number of genres",
        }
    }

    fn rule(self) -> Aggregate {
        match self {
            DirectorMetric::AvgRating => Aggregate::Mean(NumericField::RatingAvg),
            DirectorMetric::TotalVotes => Aggregate::Sum(NumericField::RatingTotal),
            DirectorMetric::CountMovies => Aggregate::Count,
            DirectorMetric::AvgFootage => Aggregate::Mean(NumericField::Duration),
            DirectorMetric::CountGenres => Aggregate::DistinctCount(MultiField::Genres),
        }
    }
}

/// Columns the histogram can be drawn over. The aggregation rule is the bin count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistogramField {
    RatingAvg,
    RatingTotal,
    Duration,
    Year,
}

impl HistogramField {
    pub fn field(self) -> NumericField {
        match self {
            HistogramField::RatingAvg => NumericField::RatingAvg,
            HistogramField::RatingTotal => NumericField::RatingTotal,
            HistogramField::Duration => NumericField::Duration,
            HistogramField::Year => NumericField::Year,
        }
    }

    /// Bin width used when the configuration does not override it
    pub fn default_step(self) -> f64 {
        match self {
            HistogramField::RatingAvg => 1.0,
            HistogramField::RatingTotal => 10_000.0,
            HistogramField::Duration => 15.0,
            HistogramField::Year => 5.0,
        }
    }
}

impl Metric for HistogramField {
    const ALL: &'static [Self] = &[
        HistogramField::RatingAvg,
        HistogramField::RatingTotal,
        HistogramField::Duration,
        HistogramField::Year,
    ];
    const KIND: &'static str = "histogram field";

    fn key(self) -> &'static str {
        self.field().key()
    }

    fn label(self) -> &'static str {
        match self {
            HistogramField::RatingAvg => "Rating (%)",
            HistogramField::RatingTotal => "Number of ratings",
            HistogramField::Duration => "Movie length (min)",
            HistogramField::Year => "Release year",
        }
    }

    fn rule(self) -> Aggregate {
        Aggregate::Count
    }
}
