//! Chart sources backed by exported data files.
//!
//! The vendor fetch layer exports charts either as JSON (the `Chart` model
//! as-is) or as a long-format CSV with one reading per row.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::chart::{Chart, Reading, SubjectSeries};
use crate::error::{Result, StatsError};

/// Supplies charts for comparison.
#[async_trait]
pub trait ChartSource: Send + Sync {
    async fn load_charts(&self) -> Result<Vec<Chart>>;
    fn describe(&self) -> String;
}

/// Picks a source based on the file extension.
///
/// # Errors
///
/// Returns `StatsError::UnsupportedInput` for anything but `.json` or `.csv`.
pub fn source_for_path(path: impl AsRef<Path>) -> Result<Box<dyn ChartSource>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => Ok(Box::new(JsonChartSource::new(path))),
        Some("csv") => Ok(Box::new(CsvChartSource::new(path))),
        _ => Err(StatsError::unsupported_input(path)),
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| StatsError::io(path, e))
}

/// Accepts either `{ "charts": [...] }` or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ChartDocument {
    Wrapped { charts: Vec<Chart> },
    Bare(Vec<Chart>),
}

/// Loads charts from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonChartSource {
    path: PathBuf,
}

impl JsonChartSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ChartSource for JsonChartSource {
    async fn load_charts(&self) -> Result<Vec<Chart>> {
        let bytes = read_file(&self.path).await?;
        let charts = match serde_json::from_slice(&bytes)? {
            ChartDocument::Wrapped { charts } | ChartDocument::Bare(charts) => charts,
        };
        tracing::info!(path = %self.path.display(), charts = charts.len(), "Loaded JSON charts");
        Ok(charts)
    }

    fn describe(&self) -> String {
        format!("JSON file {}", self.path.display())
    }
}

/// One row of the long-format CSV export.
#[derive(Debug, Deserialize)]
struct CsvRow {
    measurement: String,
    #[serde(default)]
    unit: Option<String>,
    group: String,
    subject: String,
    at: DateTime<Utc>,
    value: Option<f64>,
}

/// Loads charts from a long-format CSV file.
///
/// Expected header: `measurement,unit,group,subject,at,value`. An empty
/// `value` cell is a missing reading.
#[derive(Debug, Clone)]
pub struct CsvChartSource {
    path: PathBuf,
}

impl CsvChartSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Folds rows into charts by measurement and into series by (group, subject).
    fn fold_rows(rows: Vec<CsvRow>) -> Vec<Chart> {
        let mut charts: Vec<Chart> = Vec::new();

        for row in rows {
            let chart_idx = match charts.iter().position(|c| c.measurement == row.measurement) {
                Some(idx) => idx,
                None => {
                    charts.push(Chart::new(row.measurement.clone()));
                    charts.len() - 1
                }
            };
            let chart = &mut charts[chart_idx];
            if chart.unit.is_none() {
                chart.unit = row.unit.filter(|u| !u.is_empty());
            }

            let series_idx = match chart
                .series
                .iter()
                .position(|s| s.group == row.group && s.subject == row.subject)
            {
                Some(idx) => idx,
                None => {
                    chart.series.push(SubjectSeries {
                        group: row.group,
                        subject: row.subject,
                        readings: Vec::new(),
                    });
                    chart.series.len() - 1
                }
            };
            chart.series[series_idx]
                .readings
                .push(Reading::new(row.at, row.value));
        }

        charts
    }
}

#[async_trait]
impl ChartSource for CsvChartSource {
    async fn load_charts(&self) -> Result<Vec<Chart>> {
        let bytes = read_file(&self.path).await?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(bytes.as_slice());

        let rows = reader
            .deserialize::<CsvRow>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let row_count = rows.len();
        let charts = Self::fold_rows(rows);

        tracing::info!(
            path = %self.path.display(),
            rows = row_count,
            charts = charts.len(),
            "Loaded CSV charts"
        );
        Ok(charts)
    }

    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }
}
