use crate::graph::{BarStyle, LineStyle, PointStyle};
use crate::scale::Scale;
use serde::Serialize;

// =============================================================================
// Chart description
// =============================================================================

/// Renderable description of one chart. Produced by the binder, consumed by
/// the plotters backend or serialized as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x: Axis,
    pub y: Axis,
    /// Independent right-hand axis (dual-line charts only)
    pub y_secondary: Option<Axis>,
    pub commands: Vec<DrawCommand>,
    pub tooltip: Vec<TooltipField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    DualLine,
    RankedBar,
    ScatterRegression,
    Histogram,
}

/// One positional encoding: which field, how it is titled and scaled.
#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub field: String,
    pub title: String,
    pub scale: Scale,
    /// Bin width when the field is binned
    pub bin_step: Option<f64>,
}

impl Axis {
    pub fn new(field: impl Into<String>, title: impl Into<String>, scale: Scale) -> Self {
        Axis {
            field: field.into(),
            title: title.into(),
            scale,
            bin_step: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AxisSide {
    #[default]
    Primary,
    Secondary,
}

/// Primitive drawing commands in data coordinates.
/// The backend executes these blindly.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawCommand {
    DrawLine {
        points: Vec<(f64, f64)>,
        style: LineStyle,
        axis: AxisSide,
        legend: Option<String>,
    },
    DrawPoint {
        points: Vec<(f64, f64)>,
        style: PointStyle,
    },
    DrawRect {
        // Top-Left, Bottom-Right
        tl: (f64, f64),
        br: (f64, f64),
        style: BarStyle,
        /// Value label drawn next to the bar end
        label: Option<String>,
    },
}

// =============================================================================
// Tooltips
// =============================================================================

/// Field shown when hovering a mark in an interactive frontend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipField {
    pub field: String,
    pub title: String,
    pub format: Option<ValueFormat>,
}

impl TooltipField {
    pub fn new(field: &str, title: &str) -> Self {
        TooltipField {
            field: field.to_string(),
            title: title.to_string(),
            format: None,
        }
    }

    pub fn with_format(mut self, format: ValueFormat) -> Self {
        self.format = Some(format);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// Fixed number of decimals
    Fixed(usize),
}

impl ValueFormat {
    pub fn apply(&self, value: f64) -> String {
        match self {
            ValueFormat::Fixed(decimals) => format!("{:.*}", decimals, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_format() {
        assert_eq!(ValueFormat::Fixed(2).apply(87.5), "87.50");
        assert_eq!(ValueFormat::Fixed(1).apply(91.26), "91.3");
    }

    #[test]
    fn test_draw_command_serializes_tagged() {
        let cmd = DrawCommand::DrawPoint {
            points: vec![(1.0, 2.0)],
            style: PointStyle::default(),
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "draw_point");
        assert_eq!(json["points"][0][1], 2.0);
    }
}
