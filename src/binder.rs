// Chart binder: turns rows or aggregates plus a chosen metric into a ChartSpec

use crate::aggregate::GroupRow;
use crate::data::{Dataset, Movie, MultiField, NumericField};
use crate::error::DashResult;
use crate::graph::{BarStyle, LineStyle, PointStyle};
use crate::ir::{Axis, AxisSide, ChartKind, ChartSpec, DrawCommand, TooltipField, ValueFormat};
use crate::metric::{HistogramField, Metric};
use crate::scale::{pad_range, Scale};
use crate::transform::{bin_fixed_step, regression_line};
use anyhow::{Context, Result};
use std::cmp::Ordering;
use tracing::debug;

/// Half the thickness of a horizontal bar, in category slots
const BAR_HALF_WIDTH: f64 = 0.4;

/// Average rating and vote count along the ranking, on independent y-axes.
///
/// The rating axis is pinned to `rating_domain`; the vote axis follows the data.
pub fn bind_rating_trend(rows: &[&Movie], rating_domain: (f64, f64)) -> ChartSpec {
    let mut ordered: Vec<&Movie> = rows.to_vec();
    ordered.sort_by_key(|m| m.no);

    let rating_points: Vec<(f64, f64)> = ordered
        .iter()
        .map(|m| (m.no as f64, m.rating_avg))
        .collect();
    let votes_points: Vec<(f64, f64)> = ordered
        .iter()
        .map(|m| (m.no as f64, m.rating_total as f64))
        .collect();

    let x = Axis::new(
        NumericField::No.key(),
        "Rank",
        Scale::auto(ordered.iter().map(|m| m.no as f64), false),
    );
    let y = Axis::new(
        NumericField::RatingAvg.key(),
        "Average rating (%)",
        Scale::fixed(rating_domain.0, rating_domain.1),
    );
    let y_secondary = Axis::new(
        NumericField::RatingTotal.key(),
        "Number of ratings",
        Scale::auto(votes_points.iter().map(|(_, v)| *v), true),
    );

    let commands = vec![
        DrawCommand::DrawLine {
            points: rating_points,
            style: LineStyle {
                color: Some("orangered".to_string()),
                width: Some(2.0),
                alpha: None,
            },
            axis: AxisSide::Primary,
            legend: Some("Average rating".to_string()),
        },
        DrawCommand::DrawLine {
            points: votes_points,
            style: LineStyle {
                color: Some("steelblue".to_string()),
                width: Some(2.0),
                alpha: Some(0.8),
            },
            axis: AxisSide::Secondary,
            legend: Some("Number of ratings".to_string()),
        },
    ];

    ChartSpec {
        kind: ChartKind::DualLine,
        title: "Average rating and number of ratings by rank".to_string(),
        x,
        y,
        y_secondary: Some(y_secondary),
        commands,
        tooltip: vec![
            TooltipField::new(NumericField::No.key(), "Rank"),
            TooltipField::new("title", "Title"),
            TooltipField::new(NumericField::RatingAvg.key(), "Average"),
            TooltipField::new(NumericField::RatingTotal.key(), "Votes"),
        ],
    }
}

/// One horizontal bar per group, largest value on top.
///
/// Categories on the y scale are listed bottom to top, so the last category is
/// the group with the highest value. Ties keep the incoming order top-down.
/// A row without a value for `metric` is an unknown-key error.
pub fn bind_ranked_bar<M: Metric>(
    title: &str,
    group: MultiField,
    rows: &[GroupRow<M>],
    metric: Option<M>,
) -> Result<ChartSpec> {
    let metric = metric.unwrap_or_else(|| {
        debug!(default = metric_key::<M>(), "No metric chosen, using default");
        M::default_metric()
    });

    let mut ranked = rows
        .iter()
        .map(|row| -> DashResult<(&GroupRow<M>, f64)> { Ok((row, row.value(metric)?)) })
        .collect::<DashResult<Vec<_>>>()
        .with_context(|| format!("Failed to rank {} by '{}'", group.key(), metric.key()))?;
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    // Bottom-to-top positions
    ranked.reverse();

    let label_format = ValueFormat::Fixed(2);
    let commands: Vec<DrawCommand> = ranked
        .iter()
        .enumerate()
        .map(|(i, &(_, v))| {
            let y = i as f64;
            DrawCommand::DrawRect {
                tl: (0.0, y + BAR_HALF_WIDTH),
                br: (v, y - BAR_HALF_WIDTH),
                style: BarStyle {
                    color: Some("steelblue".to_string()),
                    alpha: None,
                },
                label: Some(label_format.apply(v)),
            }
        })
        .collect();

    let categories: Vec<String> = ranked.iter().map(|(r, _)| r.key.clone()).collect();
    let x = Axis::new(
        metric.key(),
        metric.label(),
        Scale::auto(ranked.iter().map(|&(_, v)| v), true),
    );
    let y = Axis::new(group.key(), group_title(group), Scale::categorical(categories));

    Ok(ChartSpec {
        kind: ChartKind::RankedBar,
        title: title.to_string(),
        x,
        y,
        y_secondary: None,
        commands,
        tooltip: vec![
            TooltipField::new(group.key(), group_title(group)),
            TooltipField::new(metric.key(), metric.label()).with_format(label_format),
        ],
    })
}

/// Duration against rating with a least-squares trend line.
///
/// Both axes are pinned to the extent of the full dataset so the frame does
/// not jump while filtering; the points and the fit use `rows`.
pub fn bind_scatter(rows: &[&Movie], full: &Dataset) -> ChartSpec {
    let points: Vec<(f64, f64)> = rows
        .iter()
        .map(|m| (m.duration as f64, m.rating_avg))
        .collect();

    let mut commands = vec![DrawCommand::DrawPoint {
        points: points.clone(),
        style: PointStyle {
            color: Some("steelblue".to_string()),
            size: Some(5.0),
            alpha: Some(0.7),
        },
    }];

    if let Some(line) = regression_line(&points) {
        commands.push(DrawCommand::DrawLine {
            points: line,
            style: LineStyle {
                color: Some("dodgerblue".to_string()),
                width: Some(2.0),
                alpha: None,
            },
            axis: AxisSide::Primary,
            legend: Some("Linear fit".to_string()),
        });
    }

    ChartSpec {
        kind: ChartKind::ScatterRegression,
        title: "Effect of movie length on rating".to_string(),
        x: Axis::new(
            NumericField::Duration.key(),
            "Movie length (min)",
            observed_scale(full, NumericField::Duration),
        ),
        y: Axis::new(
            NumericField::RatingAvg.key(),
            "Average rating (%)",
            observed_scale(full, NumericField::RatingAvg),
        ),
        y_secondary: None,
        commands,
        tooltip: vec![
            TooltipField::new("title", "Title"),
            TooltipField::new(NumericField::Duration.key(), "Length (min)"),
            TooltipField::new(NumericField::RatingAvg.key(), "Rating (%)")
                .with_format(ValueFormat::Fixed(1)),
        ],
    }
}

/// Count of movies per fixed-width bin of `field`.
///
/// `step` overrides the field's default bin width.
pub fn bind_histogram(
    rows: &[&Movie],
    field: Option<HistogramField>,
    step: Option<f64>,
) -> Result<ChartSpec> {
    let field = field.unwrap_or_else(HistogramField::default_metric);
    let step = step.unwrap_or_else(|| field.default_step());

    let values: Vec<f64> = rows.iter().map(|m| m.numeric(field.field())).collect();
    let bins = bin_fixed_step(&values, step)
        .with_context(|| format!("Failed to bin '{}'", field.key()))?;

    let commands: Vec<DrawCommand> = bins
        .iter()
        .filter(|b| b.count > 0)
        .map(|b| DrawCommand::DrawRect {
            tl: (b.start, b.count as f64),
            br: (b.end, 0.0),
            style: BarStyle {
                color: Some("steelblue".to_string()),
                alpha: None,
            },
            label: None,
        })
        .collect();

    let mut x = Axis::new(
        field.key(),
        field.label(),
        Scale::auto(bins.iter().flat_map(|b| [b.start, b.end]), false),
    );
    x.bin_step = Some(step);
    let y = Axis::new(
        "count",
        "Number of movies",
        Scale::auto(bins.iter().map(|b| b.count as f64), true),
    );

    Ok(ChartSpec {
        kind: ChartKind::Histogram,
        title: "Distribution of movies".to_string(),
        x,
        y,
        y_secondary: None,
        commands,
        tooltip: vec![
            TooltipField::new(field.key(), field.label()),
            TooltipField::new("count", "Number of movies"),
        ],
    })
}

/// Pinned to the observed extent of the whole dataset
fn observed_scale(full: &Dataset, field: NumericField) -> Scale {
    match full.min_max(field) {
        Some((min, max)) if min < max => Scale::fixed(min, max),
        Some((min, max)) => {
            let (lo, hi) = pad_range(min, max);
            Scale::fixed(lo, hi)
        }
        None => Scale::auto(std::iter::empty(), false),
    }
}

fn group_title(group: MultiField) -> &'static str {
    match group {
        MultiField::Genres => "Genre",
        MultiField::Directors => "Director",
        MultiField::Countries => "Country",
        MultiField::Actors => "Actor",
    }
}

fn metric_key<M: Metric>() -> &'static str {
    M::default_metric().key()
}
