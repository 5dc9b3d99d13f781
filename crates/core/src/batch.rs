//! Batch comparison of many charts.
//!
//! Each chart is independent, so comparisons run on blocking worker tasks
//! with a semaphore bounding how many are in flight. Results come back in
//! input order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::anova::{one_way_anova, AnovaResult, ObservationGroup};
use crate::chart::{Chart, GroupSummary};
use crate::config::BatchConfig;
use crate::error::{Result, StatsError};
use crate::significance::Significance;

/// Significance test outcome for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartComparison {
    pub measurement: String,
    pub unit: Option<String>,
    pub groups: Vec<GroupSummary>,
    /// `None` when there is not enough data for a significance test.
    pub anova: Option<AnovaResult>,
}

impl ChartComparison {
    /// Significance tier, if a test result exists.
    #[must_use]
    pub fn significance(&self) -> Option<Significance> {
        self.anova.map(|r| Significance::from_p_value(r.p_value))
    }

    #[must_use]
    pub fn is_significant_at(&self, alpha: f64) -> bool {
        self.anova.is_some_and(|r| r.is_significant_at(alpha))
    }
}

/// Runs group comparisons for charts.
#[derive(Debug, Clone)]
pub struct ChartComparator {
    max_concurrency: usize,
}

impl Default for ChartComparator {
    fn default() -> Self {
        Self::new(&BatchConfig::default())
    }
}

impl ChartComparator {
    #[must_use]
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            max_concurrency: config.max_concurrency.max(1),
        }
    }

    /// Compares the groups of a single chart.
    #[must_use]
    pub fn compare(chart: &Chart) -> ChartComparison {
        let pooled = chart.observation_groups();
        let groups: Vec<GroupSummary> = pooled
            .iter()
            .map(|(label, group)| GroupSummary::from_group(label.clone(), group))
            .collect();
        let observations: Vec<ObservationGroup> = pooled.into_iter().map(|(_, g)| g).collect();
        let anova = one_way_anova(&observations);

        match &anova {
            Some(result) => tracing::debug!(
                measurement = %chart.measurement,
                f = result.f_statistic,
                p = result.p_value,
                "Chart compared"
            ),
            None => tracing::debug!(
                measurement = %chart.measurement,
                "Insufficient data for a significance test"
            ),
        }

        ChartComparison {
            measurement: chart.measurement.clone(),
            unit: chart.unit.clone(),
            groups,
            anova,
        }
    }

    /// Compares every chart, fanning the work out across blocking tasks.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Worker` if a comparison task panics.
    pub async fn compare_all(&self, charts: Vec<Chart>) -> Result<Vec<ChartComparison>> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let total = charts.len();

        let mut handles = Vec::with_capacity(total);
        for chart in charts {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| StatsError::Worker(e.to_string()))?;
            handles.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                Self::compare(&chart)
            }));
        }

        let mut comparisons = Vec::with_capacity(total);
        for handle in handles {
            comparisons.push(handle.await?);
        }

        let undefined = comparisons.iter().filter(|c| c.anova.is_none()).count();
        tracing::info!(
            charts = total,
            undefined,
            max_concurrency = self.max_concurrency,
            "Batch comparison complete"
        );
        Ok(comparisons)
    }
}
