//! One-way analysis of variance across experimental groups.
//!
//! Partitions the variation of one measurement into between-group and
//! within-group components and reports the F-statistic with its upper-tail
//! p-value. Configurations where the test is undefined yield `None`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::significance::{format_f_statistic, format_p_value, Significance};
use crate::special::f_survival;

/// Pooled finite observations for one experimental group.
///
/// Non-finite values are dropped on construction, never coerced to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f64>", into = "Vec<f64>")]
pub struct ObservationGroup {
    values: Vec<f64>,
}

impl ObservationGroup {
    /// Creates a group from raw values, discarding NaN and infinities.
    #[must_use]
    pub fn new(mut values: Vec<f64>) -> Self {
        values.retain(|v| v.is_finite());
        Self { values }
    }

    /// Creates a group from possibly-missing readings.
    ///
    /// Absent readings and non-finite values are skipped.
    pub fn from_readings<I>(readings: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self {
            values: readings
                .into_iter()
                .flatten()
                .filter(|v| v.is_finite())
                .collect(),
        }
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arithmetic mean, or `None` for an empty group.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Sum of squared deviations from the group mean.
    fn sum_of_squares(&self, mean: f64) -> f64 {
        self.values.iter().map(|v| (v - mean).powi(2)).sum()
    }
}

impl From<Vec<f64>> for ObservationGroup {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl From<ObservationGroup> for Vec<f64> {
    fn from(group: ObservationGroup) -> Self {
        group.values
    }
}

impl FromIterator<f64> for ObservationGroup {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Outcome of a one-way ANOVA.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnovaResult {
    /// Ratio of between-group to within-group mean squares (>= 0).
    pub f_statistic: f64,
    /// Upper-tail probability of the F-distribution, in `[0, 1]`.
    pub p_value: f64,
    /// Numerator degrees of freedom (k - 1).
    pub df_between: usize,
    /// Denominator degrees of freedom (N - k).
    pub df_within: usize,
}

impl AnovaResult {
    /// Returns true if the p-value is below `alpha`.
    #[must_use]
    pub fn is_significant_at(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Renders `F(d1, d2) = F, p = p` followed by the significance marker, if any.
impl fmt::Display for AnovaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "F({}, {}) = {}, p = {}",
            self.df_between,
            self.df_within,
            format_f_statistic(self.f_statistic),
            format_p_value(self.p_value)
        )?;
        let marker = Significance::from_p_value(self.p_value).marker();
        if !marker.is_empty() {
            write!(f, " {marker}")?;
        }
        Ok(())
    }
}

/// Performs a one-way ANOVA over the supplied groups.
///
/// Empty groups are ignored. Returns `None` when fewer than two groups have
/// observations, when there are no within-group degrees of freedom, or when
/// every group is constant (zero within-group variance). Callers should
/// treat all three the same way: not enough data for a significance test.
///
/// # Examples
/// ```
/// use capable_stats_core::anova::{one_way_anova, ObservationGroup};
///
/// let groups = vec![
///     ObservationGroup::new(vec![1.0, 2.0, 3.0, 4.0, 5.0]),
///     ObservationGroup::new(vec![6.0, 7.0, 8.0, 9.0, 10.0]),
///     ObservationGroup::new(vec![2.0, 3.0, 4.0, 5.0, 6.0]),
/// ];
/// let result = one_way_anova(&groups).unwrap();
/// assert!((result.f_statistic - 14.0).abs() < 1e-9);
/// assert!(result.p_value < 0.001);
///
/// assert!(one_way_anova(&groups[..1]).is_none());
/// ```
#[must_use]
pub fn one_way_anova(groups: &[ObservationGroup]) -> Option<AnovaResult> {
    let groups: Vec<&ObservationGroup> = groups.iter().filter(|g| !g.is_empty()).collect();

    let k = groups.len();
    if k < 2 {
        tracing::debug!(groups = k, "ANOVA undefined: too few groups");
        return None;
    }

    let n: usize = groups.iter().map(|g| g.len()).sum();
    if n <= k {
        tracing::debug!(
            groups = k,
            observations = n,
            "ANOVA undefined: no within-group degrees of freedom"
        );
        return None;
    }

    // F is scale invariant; working in [-1, 1] keeps the sums of squares finite
    let scale = groups
        .iter()
        .copied()
        .flat_map(ObservationGroup::values)
        .fold(0.0_f64, |max, v| max.max(v.abs()));
    if scale == 0.0 {
        tracing::debug!(groups = k, "ANOVA undefined: zero within-group variance");
        return None;
    }
    let groups: Vec<ObservationGroup> = groups
        .iter()
        .map(|g| ObservationGroup {
            values: g.values.iter().map(|v| v / scale).collect(),
        })
        .collect();

    let grand_mean = groups
        .iter()
        .flat_map(ObservationGroup::values)
        .sum::<f64>()
        / n as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in &groups {
        let mean = group.values().iter().sum::<f64>() / group.len() as f64;
        ss_between += group.len() as f64 * (mean - grand_mean).powi(2);
        ss_within += group.sum_of_squares(mean);
    }

    if ss_within == 0.0 {
        tracing::debug!(groups = k, "ANOVA undefined: zero within-group variance");
        return None;
    }

    let df_between = k - 1;
    let df_within = n - k;

    // (ss_between / df_between) / (ss_within / df_within), arranged so a
    // subnormal ss_within cannot round to zero. F may overflow to +inf.
    let f_statistic = (ss_between * df_within as f64) / (ss_within * df_between as f64);
    let p_value = f_survival(f_statistic, df_between as f64, df_within as f64);

    Some(AnovaResult {
        f_statistic,
        p_value,
        df_between,
        df_within,
    })
}
