//! Chart data model and reshaping into per-group observations.
//!
//! A chart is one measurement (body weight, tumour volume, ...) recorded as
//! per-subject time series, each subject tagged with its experimental
//! group. Reshaping pools every finite reading of a group across subjects
//! and time points for significance testing, and averages readings per time
//! point for plotting.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::anova::ObservationGroup;

/// One reading of a subject at a time point. `None` means not recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub at: DateTime<Utc>,
    pub value: Option<f64>,
}

impl Reading {
    #[must_use]
    pub fn new(at: DateTime<Utc>, value: Option<f64>) -> Self {
        Self { at, value }
    }

    /// The value if present and finite.
    #[must_use]
    pub fn finite_value(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite())
    }
}

/// Time series of one subject within an experimental group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSeries {
    pub group: String,
    pub subject: String,
    #[serde(default)]
    pub readings: Vec<Reading>,
}

/// All series recorded for one measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub measurement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub series: Vec<SubjectSeries>,
}

impl Chart {
    #[must_use]
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            unit: None,
            series: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: SubjectSeries) -> Self {
        self.series.push(series);
        self
    }

    /// Distinct group labels in order of first appearance.
    #[must_use]
    pub fn group_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for series in &self.series {
            if !labels.contains(&series.group.as_str()) {
                labels.push(series.group.as_str());
            }
        }
        labels
    }

    fn series_in<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a SubjectSeries> + 'a {
        self.series.iter().filter(move |s| s.group == label)
    }

    /// Pools the finite readings of each group across subjects and time points.
    ///
    /// Groups keep their first-appearance order; a group whose readings are
    /// all missing yields an empty `ObservationGroup`.
    #[must_use]
    pub fn observation_groups(&self) -> Vec<(String, ObservationGroup)> {
        self.group_labels()
            .into_iter()
            .map(|label| {
                let group = ObservationGroup::from_readings(
                    self.series_in(label)
                        .flat_map(|s| s.readings.iter().map(|r| r.value)),
                );
                (label.to_string(), group)
            })
            .collect()
    }

    /// Descriptive statistics for each group.
    #[must_use]
    pub fn group_summaries(&self) -> Vec<GroupSummary> {
        self.observation_groups()
            .iter()
            .map(|(label, group)| GroupSummary::from_group(label.clone(), group))
            .collect()
    }

    /// Per-time-point group means, for plotting group curves.
    #[must_use]
    pub fn group_trends(&self) -> Vec<GroupTrend> {
        self.group_labels()
            .into_iter()
            .map(|label| {
                let mut buckets: BTreeMap<DateTime<Utc>, (f64, usize)> = BTreeMap::new();
                for reading in self.series_in(label).flat_map(|s| s.readings.iter()) {
                    if let Some(value) = reading.finite_value() {
                        let bucket = buckets.entry(reading.at).or_insert((0.0, 0));
                        bucket.0 += value;
                        bucket.1 += 1;
                    }
                }

                GroupTrend {
                    label: label.to_string(),
                    points: buckets
                        .into_iter()
                        .map(|(at, (sum, count))| TrendPoint {
                            at,
                            mean: sum / count as f64,
                            count,
                        })
                        .collect(),
                }
            })
            .collect()
    }
}

/// Descriptive statistics of one group's pooled observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub label: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: Option<f64>,
    /// Standard error of the mean.
    pub sem: Option<f64>,
}

impl GroupSummary {
    #[must_use]
    pub fn from_group(label: impl Into<String>, group: &ObservationGroup) -> Self {
        let count = group.len();
        let mean = group.mean();

        let std_dev = match mean {
            Some(mean) if count >= 2 => {
                let ss: f64 = group.values().iter().map(|v| (v - mean).powi(2)).sum();
                Some((ss / (count - 1) as f64).sqrt())
            }
            _ => None,
        };
        let sem = std_dev.map(|sd| sd / (count as f64).sqrt());

        Self {
            label: label.into(),
            count,
            mean,
            std_dev,
            sem,
        }
    }
}

/// Mean of a group's readings at one time point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub at: DateTime<Utc>,
    pub mean: f64,
    pub count: usize,
}

/// Time-ordered group means for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTrend {
    pub label: String,
    pub points: Vec<TrendPoint>,
}
