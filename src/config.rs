// Dashboard configuration loaded from an optional JSON file

use crate::error::{DashResult, DashboardError};
use crate::metric::HistogramField;
use crate::RenderOptions;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub render: RenderOptions,
    /// Number of directors kept on the ranking chart
    pub top_directors: usize,
    /// Pinned y domain of the rating line on the trend chart
    pub rating_trend_domain: (f64, f64),
    pub bin_steps: BinSteps,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            top_directors: 10,
            rating_trend_domain: (80.0, 100.0),
            bin_steps: BinSteps::default(),
        }
    }
}

impl DashboardConfig {
    pub fn load(path: impl AsRef<Path>) -> DashResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DashboardError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: DashboardConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> DashResult<()> {
        let (lo, hi) = self.rating_trend_domain;
        if !(lo < hi) {
            return Err(DashboardError::InvalidRange {
                min: lo.to_string(),
                max: hi.to_string(),
            });
        }
        Ok(())
    }
}

/// Histogram bin width per field
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BinSteps {
    pub rating_avg: f64,
    pub rating_total: f64,
    pub duration: f64,
    pub year: f64,
}

impl Default for BinSteps {
    fn default() -> Self {
        Self {
            rating_avg: HistogramField::RatingAvg.default_step(),
            rating_total: HistogramField::RatingTotal.default_step(),
            duration: HistogramField::Duration.default_step(),
            year: HistogramField::Year.default_step(),
        }
    }
}

impl BinSteps {
    pub fn step_for(&self, field: HistogramField) -> f64 {
        match field {
            HistogramField::RatingAvg => self.rating_avg,
            HistogramField::RatingTotal => self.rating_total,
            HistogramField::Duration => self.duration,
            HistogramField::Year => self.year,
        }
    }

    pub fn set(&mut self, field: HistogramField, step: f64) {
        match field {
            HistogramField::RatingAvg => self.rating_avg = step,
            HistogramField::RatingTotal => self.rating_total = step,
            HistogramField::Duration => self.duration = step,
            HistogramField::Year => self.year = step,
        }
    }
}
