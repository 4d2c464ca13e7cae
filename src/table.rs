// The "Dataset" view: filtered rows as CSV or JSON

use crate::data::Movie;
use anyhow::{Context, Result};

/// Column order of the table view
pub const COLUMNS: [&str; 10] = [
    "no",
    "title",
    "rating_avg",
    "rating_total",
    "duration",
    "year",
    "countries",
    "genres",
    "directors",
    "actors",
];

const LIST_SEPARATOR: &str = ", ";

/// Write rows as CSV with a header line
pub fn write_csv(rows: &[&Movie]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(COLUMNS)
        .context("Failed to write CSV header")?;

    for movie in rows {
        writer
            .write_record(record(movie))
            .with_context(|| format!("Failed to write row for '{}'", movie.title))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))
}

/// Write rows as a pretty-printed JSON array of movie records
pub fn write_json(rows: &[&Movie]) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(rows).context("Failed to serialize rows")
}

fn record(movie: &Movie) -> [String; 10] {
    [
        movie.no.to_string(),
        movie.title.clone(),
        movie.rating_avg.to_string(),
        movie.rating_total.to_string(),
        movie.duration.to_string(),
        movie.year.to_string(),
        movie.countries.join(LIST_SEPARATOR),
        movie.genres.join(LIST_SEPARATOR),
        movie.directors.join(LIST_SEPARATOR),
        movie.actors.join(LIST_SEPARATOR),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::three_movies;

    #[test]
    fn test_csv_header_and_lists() {
        let dataset = three_movies();
        let rows: Vec<&Movie> = dataset.movies().iter().collect();
        let out = String::from_utf8(write_csv(&rows).unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "no,title,rating_avg,rating_total,duration,year,countries,genres,directors,actors"
        );
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "2,Second,85,500,110,1992,USA,\"Comedy, Drama\",Director 2,");
    }

    #[test]
    fn test_csv_empty_selection_has_header_only() {
        let out = write_csv(&[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_json_rows() {
        let dataset = three_movies();
        let rows: Vec<&Movie> = dataset.movies().iter().take(1).collect();
        let value: serde_json::Value = serde_json::from_slice(&write_json(&rows).unwrap()).unwrap();
        assert_eq!(value[0]["title"], "First");
        assert_eq!(value.as_array().unwrap().len(), 1);
    }
}
