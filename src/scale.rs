use crate::data::min_max;
use serde::Serialize;

/// Axis scale: a numeric domain, or a list of categories laid out at
/// integer positions `0..n`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scale {
    pub domain: (f64, f64),
    /// True when the domain was pinned rather than derived from the data
    pub fixed: bool,
    pub is_categorical: bool,
    pub categories: Vec<String>,
}

impl Scale {
    /// A pinned domain, independent of the data drawn on it
    pub fn fixed(min: f64, max: f64) -> Self {
        Scale {
            domain: (min, max),
            fixed: true,
            is_categorical: false,
            categories: Vec::new(),
        }
    }

    /// A domain fitted to the values with 5% padding. Quantities such as
    /// counts and sums pass `include_zero` so their baseline stays visible.
    pub fn auto(values: impl Iterator<Item = f64>, include_zero: bool) -> Self {
        let domain = match min_max(values) {
            None => (0.0, 1.0),
            Some((min, max)) if include_zero => {
                let (lo, hi) = (min.min(0.0), max.max(0.0));
                if lo == hi {
                    (0.0, 1.0)
                } else {
                    // Pad away from the data only, never below the zero baseline
                    let (padded_lo, padded_hi) = pad_range(lo, hi);
                    (
                        if lo == 0.0 { 0.0 } else { padded_lo },
                        if hi == 0.0 { 0.0 } else { padded_hi },
                    )
                }
            }
            Some((min, max)) => pad_range(min, max),
        };
        Scale {
            domain,
            fixed: false,
            is_categorical: false,
            categories: Vec::new(),
        }
    }

    /// Categories centred on integer positions, half a slot of margin on each side.
    pub fn categorical(categories: Vec<String>) -> Self {
        let n = categories.len().max(1) as f64;
        Scale {
            domain: (-0.5, n - 0.5),
            fixed: false,
            is_categorical: true,
            categories,
        }
    }

    /// Label for an axis tick; categorical axes only label integer positions.
    pub fn tick_label(&self, value: f64) -> String {
        if !self.is_categorical {
            return format_tick(value);
        }
        let rounded = value.round();
        if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        self.categories
            .get(rounded as usize)
            .cloned()
            .unwrap_or_default()
    }
}

fn format_tick(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

pub fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding, max + padding)
    }
}
