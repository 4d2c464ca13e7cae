use crate::ir::{AxisSide, ChartSpec, DrawCommand};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::Serialize;
use std::ops::Range;

/// Style configuration for line layers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: Option<String>,
    pub width: Option<f64>,
    pub alpha: Option<f64>,
}

/// Style configuration for point layers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointStyle {
    pub color: Option<String>,
    pub size: Option<f64>,
    pub alpha: Option<f64>,
}

/// Style configuration for bar layers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BarStyle {
    pub color: Option<String>,
    pub alpha: Option<f64>,
}

type Plane<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Render a chart description to PNG bytes
pub fn render_png(spec: &ChartSpec, width: u32, height: u32) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_chart(&root, spec)?;
        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

/// Render a chart description to an SVG document
pub fn render_svg(spec: &ChartSpec, width: u32, height: u32) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        draw_chart(&root, spec)?;
        root.present().context("Failed to present drawing")?;
    }
    Ok(svg)
}

fn draw_chart<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    let x_range = to_range(spec.x.scale.domain);
    let y_range = to_range(spec.y.scale.domain);
    let y_label_area = if spec.y.scale.is_categorical { 140 } else { 60 };

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(10)
        .caption(&spec.title, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(y_label_area);

    let y_labels = if spec.y.scale.is_categorical {
        spec.y.scale.categories.len().max(1)
    } else {
        10
    };

    if let Some(secondary) = &spec.y_secondary {
        builder.right_y_label_area_size(70);
        let mut chart = builder
            .build_cartesian_2d(x_range.clone(), y_range)
            .context("Failed to build chart")?
            .set_secondary_coord(x_range, to_range(secondary.scale.domain));

        chart
            .configure_mesh()
            .x_desc(spec.x.title.as_str())
            .y_desc(spec.y.title.as_str())
            .x_label_formatter(&|x| spec.x.scale.tick_label(*x))
            .y_label_formatter(&|y| spec.y.scale.tick_label(*y))
            .draw()
            .context("Failed to draw mesh")?;
        chart
            .configure_secondary_axes()
            .y_desc(secondary.title.as_str())
            .y_label_formatter(&|y| secondary.scale.tick_label(*y))
            .draw()
            .context("Failed to draw secondary axis")?;

        for cmd in &spec.commands {
            match cmd {
                DrawCommand::DrawLine {
                    points,
                    style,
                    axis: AxisSide::Secondary,
                    legend,
                } => {
                    let shape = line_shape(style);
                    let anno = chart
                        .draw_secondary_series(LineSeries::new(points.iter().copied(), shape))
                        .context("Failed to draw secondary line series")?;
                    if let Some(legend) = legend {
                        anno.label(legend.as_str()).legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], shape)
                        });
                    }
                }
                other => draw_command(&mut chart, other)?,
            }
        }
        draw_legend(&mut chart, spec)?;
    } else {
        let mut chart = builder
            .build_cartesian_2d(x_range, y_range)
            .context("Failed to build chart")?;

        chart
            .configure_mesh()
            .x_desc(spec.x.title.as_str())
            .y_desc(spec.y.title.as_str())
            .y_labels(y_labels)
            .x_label_formatter(&|x| spec.x.scale.tick_label(*x))
            .y_label_formatter(&|y| spec.y.scale.tick_label(*y))
            .draw()
            .context("Failed to draw mesh")?;

        for cmd in &spec.commands {
            draw_command(&mut chart, cmd)?;
        }
        draw_legend(&mut chart, spec)?;
    }

    Ok(())
}

/// Draw one primitive on the primary coordinate system
fn draw_command<'a, DB: DrawingBackend + 'a>(chart: &mut Plane<'a, DB>, cmd: &DrawCommand) -> Result<()>
where
    DB::ErrorType: 'static,
{
    match cmd {
        DrawCommand::DrawLine { points, style, legend, .. } => {
            let shape = line_shape(style);
            let anno = chart
                .draw_series(LineSeries::new(points.iter().copied(), shape))
                .context("Failed to draw line series")?;
            if let Some(legend) = legend {
                anno.label(legend.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], shape));
            }
        }
        DrawCommand::DrawPoint { points, style } => {
            let color = parse_color(&style.color).mix(style.alpha.unwrap_or(1.0));
            let size = style.size.unwrap_or(3.0) as i32;
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), size, color.filled())),
                )
                .context("Failed to draw point series")?;
        }
        DrawCommand::DrawRect { tl, br, style, label } => {
            let color = parse_color(&style.color).mix(style.alpha.unwrap_or(1.0));
            chart
                .draw_series(std::iter::once(Rectangle::new([*tl, *br], color.filled())))
                .context("Failed to draw bar")?;
            if let Some(label) = label {
                let anchor = (tl.0.max(br.0), (tl.1 + br.1) / 2.0);
                chart
                    .draw_series(std::iter::once(Text::new(
                        format!(" {}", label),
                        anchor,
                        ("sans-serif", 12).into_font(),
                    )))
                    .context("Failed to draw bar label")?;
            }
        }
    }
    Ok(())
}

fn draw_legend<'a, DB: DrawingBackend + 'a>(chart: &mut Plane<'a, DB>, spec: &ChartSpec) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let has_legend = spec
        .commands
        .iter()
        .any(|c| matches!(c, DrawCommand::DrawLine { legend: Some(_), .. }));
    if has_legend {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .context("Failed to draw legend")?;
    }
    Ok(())
}

fn line_shape(style: &LineStyle) -> ShapeStyle {
    parse_color(&style.color)
        .mix(style.alpha.unwrap_or(1.0))
        .stroke_width(style.width.unwrap_or(1.0) as u32)
}

fn to_range(domain: (f64, f64)) -> Range<f64> {
    domain.0..domain.1
}

/// Parse color string to RGBColor
fn parse_color(color_str: &Option<String>) -> RGBColor {
    match color_str.as_deref() {
        Some("red") => RED,
        Some("green") => GREEN,
        Some("blue") => BLUE,
        Some("black") => BLACK,
        Some("yellow") => YELLOW,
        Some("cyan") => CYAN,
        Some("magenta") => MAGENTA,
        Some("white") => WHITE,
        Some("orangered") => RGBColor(255, 69, 0),
        Some("dodgerblue") => RGBColor(30, 144, 255),
        Some("steelblue") => RGBColor(70, 130, 180),
        _ => BLUE, // default
    }
}
