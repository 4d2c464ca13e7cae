// Runtime: renders one named view for a session state

use crate::aggregate::{director_stats, genre_stats, top_n};
use crate::binder::{bind_histogram, bind_ranked_bar, bind_rating_trend, bind_scatter};
use crate::config::DashboardConfig;
use crate::data::{Dataset, Movie, MultiField};
use crate::filter::filter_movies;
use crate::graph;
use crate::ir::ChartSpec;
use crate::metric::{DirectorMetric, HistogramField, Metric};
use crate::state::{View, ViewState};
use crate::table;
use crate::OutputFormat;
use anyhow::{bail, Context, Result};
use tracing::{info, warn};

/// Render a view to bytes in the configured output format.
///
/// The dataset view is a table (CSV, or JSON rows for `json`); every other
/// view is a chart rendered as PNG, SVG or a JSON chart description.
pub fn render_view(
    dataset: &Dataset,
    state: &ViewState,
    view: View,
    config: &DashboardConfig,
) -> Result<Vec<u8>> {
    let rows = filter_movies(dataset, &state.selection);
    info!(view = view.key(), rows = rows.len(), "Rendering view");
    if rows.is_empty() {
        warn!(view = view.key(), "Selection matches no movies, rendering an empty view");
    }

    let format = config.render.format;
    if view == View::Dataset {
        return match format {
            OutputFormat::Json => table::write_json(&rows),
            _ => table::write_csv(&rows),
        };
    }

    let spec = bind_view(dataset, &rows, state, view, config)?;
    let (width, height) = (config.render.width, config.render.height);
    match format {
        OutputFormat::Png => graph::render_png(&spec, width, height)
            .with_context(|| format!("Failed to render '{}' as PNG", view.key())),
        OutputFormat::Svg => graph::render_svg(&spec, width, height)
            .map(String::into_bytes)
            .with_context(|| format!("Failed to render '{}' as SVG", view.key())),
        OutputFormat::Json => {
            serde_json::to_vec_pretty(&spec).context("Failed to serialize chart description")
        }
    }
}

/// Build the chart description of a chart view from the visible rows
pub fn bind_view(
    dataset: &Dataset,
    rows: &[&Movie],
    state: &ViewState,
    view: View,
    config: &DashboardConfig,
) -> Result<ChartSpec> {
    let spec = match view {
        View::Dataset => bail!("The dataset view is a table, not a chart"),
        View::Ratings => bind_rating_trend(rows, config.rating_trend_domain),
        View::Genres => bind_ranked_bar(
            "Genre statistics",
            MultiField::Genres,
            &genre_stats(rows),
            state.genre_metric,
        )?,
        View::Directors => {
            let metric = state.director_metric.unwrap_or_else(DirectorMetric::default_metric);
            let ranked = top_n(director_stats(rows), metric, config.top_directors)?;
            bind_ranked_bar(
                &format!("Top {} directors", config.top_directors),
                MultiField::Directors,
                &ranked,
                Some(metric),
            )?
        }
        View::Scatter => bind_scatter(rows, dataset),
        View::Histogram => {
            let field = state.histogram_field.unwrap_or_else(HistogramField::default_metric);
            bind_histogram(rows, Some(field), Some(config.bin_steps.step_for(field)))?
        }
    };
    Ok(spec)
}
