// Session state: the selection plus the metric picked on each analytical view

use crate::data::Dataset;
use crate::error::{DashResult, DashboardError};
use crate::filter::{NumericRange, Selection};
use crate::metric::{DirectorMetric, GenreMetric, HistogramField};
use serde::Serialize;
use tracing::debug;

/// Named outputs of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Dataset,
    Ratings,
    Genres,
    Directors,
    Scatter,
    Histogram,
}

impl View {
    pub const ALL: &'static [View] = &[
        View::Dataset,
        View::Ratings,
        View::Genres,
        View::Directors,
        View::Scatter,
        View::Histogram,
    ];

    pub fn key(self) -> &'static str {
        match self {
            View::Dataset => "dataset",
            View::Ratings => "ratings",
            View::Genres => "genres",
            View::Directors => "directors",
            View::Scatter => "scatter",
            View::Histogram => "histogram",
        }
    }

    pub fn from_key(key: &str) -> DashResult<Self> {
        View::ALL
            .iter()
            .copied()
            .find(|v| v.key() == key)
            .ok_or_else(|| DashboardError::unknown("view", key))
    }
}

/// One user action. Open range bounds fall back to the dataset extent.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    SetGenres(Vec<String>),
    ToggleGenres,
    SetRating { min: Option<f64>, max: Option<f64> },
    SetVotes { min: Option<u64>, max: Option<u64> },
    SetGenreMetric(GenreMetric),
    SetDirectorMetric(DirectorMetric),
    SetHistogramField(HistogramField),
}

/// Everything a session has picked. `None` metrics mean "first option".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub selection: Selection,
    pub genre_metric: Option<GenreMetric>,
    pub director_metric: Option<DirectorMetric>,
    pub histogram_field: Option<HistogramField>,
}

impl ViewState {
    pub fn new(dataset: &Dataset) -> Self {
        ViewState {
            selection: Selection::defaults(dataset),
            genre_metric: None,
            director_metric: None,
            histogram_field: None,
        }
    }

    /// Produce the state that follows `interaction`. The current state is
    /// consumed; on error nothing is replaced.
    pub fn apply(self, dataset: &Dataset, interaction: Interaction) -> DashResult<Self> {
        debug!(?interaction, "Applying interaction");
        let state = match interaction {
            Interaction::SetGenres(genres) => {
                let facets = dataset.genre_facets();
                if let Some(unknown) = genres.iter().find(|g| !facets.contains(g)) {
                    return Err(DashboardError::unknown("genre", unknown.as_str()));
                }
                let selection = Selection {
                    genres: genres.into_iter().collect(),
                    ..self.selection
                };
                ViewState { selection, ..self }
            }
            Interaction::ToggleGenres => {
                let selection = self.selection.toggle_genres(&dataset.genre_facets());
                ViewState { selection, ..self }
            }
            Interaction::SetRating { min, max } => {
                let (lo, hi) = dataset.rating_bounds();
                let rating = NumericRange::new(min.unwrap_or(lo), max.unwrap_or(hi))?;
                let selection = Selection {
                    rating,
                    ..self.selection
                };
                ViewState { selection, ..self }
            }
            Interaction::SetVotes { min, max } => {
                let (lo, hi) = dataset.votes_bounds();
                let votes = NumericRange::new(min.unwrap_or(lo), max.unwrap_or(hi))?;
                let selection = Selection {
                    votes,
                    ..self.selection
                };
                ViewState { selection, ..self }
            }
            Interaction::SetGenreMetric(metric) => ViewState {
                genre_metric: Some(metric),
                ..self
            },
            Interaction::SetDirectorMetric(metric) => ViewState {
                director_metric: Some(metric),
                ..self
            },
            Interaction::SetHistogramField(field) => ViewState {
                histogram_field: Some(field),
                ..self
            },
        };
        Ok(state)
    }

    /// Apply interactions left to right, stopping at the first failure
    pub fn apply_all(
        self,
        dataset: &Dataset,
        interactions: impl IntoIterator<Item = Interaction>,
    ) -> DashResult<Self> {
        interactions
            .into_iter()
            .try_fold(self, |state, interaction| state.apply(dataset, interaction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::three_movies;
    use crate::filter::filter_movies;

    #[test]
    fn test_initial_state_is_identity() {
        let dataset = three_movies();
        let state = ViewState::new(&dataset);
        assert_eq!(filter_movies(&dataset, &state.selection).len(), 3);
        assert_eq!(state.genre_metric, None);
        assert_eq!(state.histogram_field, None);
    }

    #[test]
    fn test_set_genres_replaces_selection() {
        let dataset = three_movies();
        let state = ViewState::new(&dataset)
            .apply(&dataset, Interaction::SetGenres(vec!["Drama".to_string()]))
            .unwrap();
        let titles: Vec<&str> = filter_movies(&dataset, &state.selection)
            .iter()
            .map(|m| m.title.as_str())
            .collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn test_unknown_genre_rejected() {
        let dataset = three_movies();
        let err = ViewState::new(&dataset)
            .apply(&dataset, Interaction::SetGenres(vec!["Western".to_string()]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown genre key 'Western'");
    }

    #[test]
    fn test_open_bounds_use_dataset_extent() {
        let dataset = three_movies();
        let state = ViewState::new(&dataset)
            .apply(
                &dataset,
                Interaction::SetRating {
                    min: Some(88.0),
                    max: None,
                },
            )
            .unwrap();
        assert_eq!(state.selection.rating.min, 88.0);
        assert_eq!(state.selection.rating.max, 95.0);
        assert_eq!(filter_movies(&dataset, &state.selection).len(), 2);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let dataset = three_movies();
        let result = ViewState::new(&dataset).apply(
            &dataset,
            Interaction::SetVotes {
                min: Some(2000),
                max: Some(10),
            },
        );
        assert!(matches!(result, Err(DashboardError::InvalidRange { .. })));
    }

    #[test]
    fn test_toggle_twice_restores_all() {
        let dataset = three_movies();
        let start = ViewState::new(&dataset);
        let cleared = start
            .clone()
            .apply(&dataset, Interaction::ToggleGenres)
            .unwrap();
        assert!(cleared.selection.genres.is_empty());
        assert!(filter_movies(&dataset, &cleared.selection).is_empty());
        let restored = cleared.apply(&dataset, Interaction::ToggleGenres).unwrap();
        assert_eq!(restored, start);
    }

    #[test]
    fn test_apply_all_in_order() {
        let dataset = three_movies();
        let state = ViewState::new(&dataset)
            .apply_all(
                &dataset,
                vec![
                    Interaction::ToggleGenres,
                    Interaction::SetGenres(vec!["Action".to_string()]),
                    Interaction::SetDirectorMetric(DirectorMetric::TotalVotes),
                ],
            )
            .unwrap();
        assert_eq!(state.selection.genres.len(), 1);
        assert_eq!(state.director_metric, Some(DirectorMetric::TotalVotes));
    }

    #[test]
    fn test_view_keys() {
        assert_eq!(View::from_key("scatter").unwrap(), View::Scatter);
        assert!(View::from_key("map").is_err());
    }
}
