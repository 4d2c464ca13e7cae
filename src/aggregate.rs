// Aggregation engine: explode multi-valued columns, group, rank

use crate::data::{Movie, MultiField, NumericField};
use crate::error::{DashResult, DashboardError};
use crate::metric::{DirectorMetric, GenreMetric, Metric};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// One movie tagged with one value of a multi-valued column.
#[derive(Debug, Clone, Copy)]
pub struct Exploded<'a> {
    pub key: &'a str,
    pub movie: &'a Movie,
}

/// Summary rule applied to the movies sharing a group key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate {
    Mean(NumericField),
    Sum(NumericField),
    Count,
    DistinctCount(MultiField),
}

impl Aggregate {
    fn evaluate(&self, movies: &[&Movie]) -> f64 {
        match self {
            Aggregate::Mean(field) => {
                if movies.is_empty() {
                    return 0.0;
                }
                let sum: f64 = movies.iter().map(|m| m.numeric(*field)).sum();
                sum / movies.len() as f64
            }
            Aggregate::Sum(field) => movies.iter().map(|m| m.numeric(*field)).sum(),
            Aggregate::Count => movies.len() as f64,
            Aggregate::DistinctCount(field) => {
                let distinct: BTreeSet<&str> = movies
                    .iter()
                    .flat_map(|m| m.values(*field).iter().map(String::as_str))
                    .collect();
                distinct.len() as f64
            }
        }
    }
}

/// One aggregate row: a group key and the value of every metric of the view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow<M: Metric> {
    pub key: String,
    pub values: Vec<(M, f64)>,
}

impl<M: Metric> GroupRow<M> {
    /// Value of one metric; a metric the row was not computed with is an unknown key.
    pub fn value(&self, metric: M) -> DashResult<f64> {
        self.values
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, v)| *v)
            .ok_or_else(|| DashboardError::unknown(M::KIND, metric.key()))
    }
}

/// Expand every row into one entry per value of `field`.
pub fn explode<'a>(rows: &[&'a Movie], field: MultiField) -> Vec<Exploded<'a>> {
    rows.iter()
        .flat_map(|&movie| {
            movie
                .values(field)
                .iter()
                .map(move |key| Exploded { key: key.as_str(), movie })
        })
        .collect()
}

/// Group exploded rows by key and compute every metric of `M`.
/// Rows come back ordered by key.
pub fn group_by<M: Metric>(exploded: &[Exploded<'_>]) -> Vec<GroupRow<M>> {
    let mut groups: BTreeMap<&str, Vec<&Movie>> = BTreeMap::new();
    for row in exploded {
        groups.entry(row.key).or_default().push(row.movie);
    }

    groups
        .into_iter()
        .map(|(key, movies)| GroupRow {
            key: key.to_string(),
            values: M::ALL
                .iter()
                .map(|m| (*m, m.rule().evaluate(&movies)))
                .collect(),
        })
        .collect()
}

/// Averages per genre. A movie counts once towards each of its genres.
pub fn genre_stats(rows: &[&Movie]) -> Vec<GroupRow<GenreMetric>> {
    let stats = group_by(&explode(rows, MultiField::Genres));
    debug!(groups = stats.len(), "Computed genre stats");
    stats
}

/// Summaries per director.
///
/// Rows are exploded on directors only: every movie contributes its votes and
/// its count exactly once per director, and `count_genres` is the number of
/// distinct genres across the director's movies.
pub fn director_stats(rows: &[&Movie]) -> Vec<GroupRow<DirectorMetric>> {
    let stats = group_by(&explode(rows, MultiField::Directors));
    debug!(groups = stats.len(), "Computed director stats");
    stats
}

/// Keep the `n` best groups by `metric` and return them alphabetically.
///
/// The descending sort is stable, so ties keep the incoming (alphabetical) order.
pub fn top_n<M: Metric>(
    rows: Vec<GroupRow<M>>,
    metric: M,
    n: usize,
) -> DashResult<Vec<GroupRow<M>>> {
    let mut scored = rows
        .into_iter()
        .map(|row| -> DashResult<(f64, GroupRow<M>)> { Ok((row.value(metric)?, row)) })
        .collect::<DashResult<Vec<(f64, GroupRow<M>)>>>()?;
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored.truncate(n);

    let mut top: Vec<GroupRow<M>> = scored.into_iter().map(|(_, row)| row).collect();
    top.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(top)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{movie, three_movies};
    use crate::data::Dataset;

    fn all(dataset: &Dataset) -> Vec<&Movie> {
        dataset.movies().iter().collect()
    }

    fn lookup<M: Metric>(rows: &[GroupRow<M>], key: &str, metric: M) -> f64 {
        rows.iter().find(|r| r.key == key).unwrap().value(metric).unwrap()
    }

    #[test]
    fn test_explode_duplicates_rows() {
        let dataset = three_movies();
        let exploded = explode(&all(&dataset), MultiField::Genres);
        let keys: Vec<&str> = exploded.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["Drama", "Comedy", "Drama", "Action"]);
        assert_eq!(exploded[1].movie.title, exploded[2].movie.title);
    }

    #[test]
    fn test_mean_rating_by_genre() {
        let dataset = three_movies();
        let stats = genre_stats(&all(&dataset));
        let keys: Vec<&str> = stats.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["Action", "Comedy", "Drama"]);
        assert_eq!(lookup(&stats, "Drama", GenreMetric::AvgRating), 87.5);
        assert_eq!(lookup(&stats, "Comedy", GenreMetric::AvgRating), 85.0);
        assert_eq!(lookup(&stats, "Action", GenreMetric::AvgRating), 95.0);
        assert_eq!(lookup(&stats, "Drama", GenreMetric::AvgVotes), 750.0);
    }

    #[test]
    fn test_grouping_ignores_row_order() {
        let dataset = three_movies();
        let forward = all(&dataset);
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(genre_stats(&forward), genre_stats(&reversed));
        assert_eq!(director_stats(&forward), director_stats(&reversed));
    }

    #[test]
    fn test_empty_input() {
        assert!(genre_stats(&[]).is_empty());
        assert!(director_stats(&[]).is_empty());
    }

    #[test]
    fn test_director_stats_count_each_movie_once() {
        // One director, two movies, four genre labels in total
        let mut a = movie(1, "A", &["Drama", "Crime", "Thriller"], 90.0, 1000);
        let mut b = movie(2, "B", &["Drama"], 80.0, 500);
        a.directors = vec!["Nolan".to_string()];
        b.directors = vec!["Nolan".to_string()];
        let dataset = Dataset::new(vec![a, b]).unwrap();

        let stats = director_stats(&all(&dataset));
        assert_eq!(stats.len(), 1);
        let nolan = &stats[0];
        assert_eq!(nolan.value(DirectorMetric::TotalVotes).unwrap(), 1500.0);
        assert_eq!(nolan.value(DirectorMetric::CountMovies).unwrap(), 2.0);
        assert_eq!(nolan.value(DirectorMetric::AvgRating).unwrap(), 85.0);
        assert_eq!(nolan.value(DirectorMetric::AvgFootage).unwrap(), 105.0);
        assert_eq!(nolan.value(DirectorMetric::CountGenres).unwrap(), 3.0);
    }

    #[test]
    fn test_co_directed_movie_counts_for_both() {
        let mut m = movie(1, "Matrix", &["Sci-Fi", "Action"], 89.0, 800);
        m.directors = vec!["Lana".to_string(), "Lilly".to_string()];
        let dataset = Dataset::new(vec![m]).unwrap();
        let stats = director_stats(&all(&dataset));
        assert_eq!(stats.len(), 2);
        for row in &stats {
            assert_eq!(row.value(DirectorMetric::TotalVotes).unwrap(), 800.0);
            assert_eq!(row.value(DirectorMetric::CountGenres).unwrap(), 2.0);
        }
    }

    fn ranked_rows() -> Vec<GroupRow<GenreMetric>> {
        [("Drama", 80.0), ("Action", 95.0), ("Western", 70.0), ("Comedy", 95.0), ("Horror", 60.0)]
            .iter()
            .map(|(key, v)| GroupRow {
                key: key.to_string(),
                values: vec![(GenreMetric::AvgRating, *v)],
            })
            .collect()
    }

    #[test]
    fn test_top_n_selection() {
        let top = top_n(ranked_rows(), GenreMetric::AvgRating, 3).unwrap();
        let keys: Vec<&str> = top.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["Action", "Comedy", "Drama"]);

        let worst_kept = top
            .iter()
            .map(|r| r.value(GenreMetric::AvgRating).unwrap())
            .fold(f64::INFINITY, f64::min);
        for excluded in ["Western", "Horror"] {
            let v = lookup(&ranked_rows(), excluded, GenreMetric::AvgRating);
            assert!(worst_kept >= v);
        }
    }

    #[test]
    fn test_top_n_larger_than_groups() {
        let top = top_n(ranked_rows(), GenreMetric::AvgRating, 10).unwrap();
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].key, "Action");
        assert_eq!(top[4].key, "Western");
    }

    #[test]
    fn test_top_n_ties_keep_incoming_order() {
        let mut rows = ranked_rows();
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        // Action and Comedy tie at 95; only one slot is available
        let top = top_n(rows, GenreMetric::AvgRating, 1).unwrap();
        assert_eq!(top[0].key, "Action");
    }

    #[test]
    fn test_missing_metric_is_unknown_key() {
        // Rows carrying only the rating cannot be ranked by votes
        let err = top_n(ranked_rows(), GenreMetric::AvgVotes, 1).unwrap_err();
        assert_eq!(err.to_string(), "Unknown genre metric key 'avg_votes'");

        let rows = ranked_rows();
        assert!(matches!(
            rows[0].value(GenreMetric::AvgDuration),
            Err(DashboardError::UnknownKey { .. })
        ));
    }
}
