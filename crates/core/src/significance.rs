//! Significance markers and display formatting for test results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Significance tier of a p-value, rendered as asterisks next to a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Significance {
    /// p < 0.001
    VeryStrong,
    /// p < 0.01
    Strong,
    /// p < 0.05
    Moderate,
    /// p >= 0.05
    NotSignificant,
}

impl Significance {
    /// Classifies a p-value into its tier.
    #[must_use]
    pub fn from_p_value(p_value: f64) -> Self {
        if p_value < 0.001 {
            Self::VeryStrong
        } else if p_value < 0.01 {
            Self::Strong
        } else if p_value < 0.05 {
            Self::Moderate
        } else {
            Self::NotSignificant
        }
    }

    /// Asterisk marker for the tier; empty when not significant.
    #[must_use]
    pub fn marker(&self) -> &'static str {
        match self {
            Self::VeryStrong => "***",
            Self::Strong => "**",
            Self::Moderate => "*",
            Self::NotSignificant => "",
        }
    }

    #[must_use]
    pub fn is_significant(&self) -> bool {
        !matches!(self, Self::NotSignificant)
    }
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Formats a p-value for display.
///
/// Values below 0.001 render as `"< 0.001"`, values below 0.01 with four
/// decimals, everything else with three.
///
/// # Examples
/// ```
/// use capable_stats_core::significance::format_p_value;
///
/// assert_eq!(format_p_value(0.0004), "< 0.001");
/// assert_eq!(format_p_value(0.00729), "0.0073");
/// assert_eq!(format_p_value(0.26), "0.260");
/// ```
#[must_use]
pub fn format_p_value(p_value: f64) -> String {
    if p_value < 0.001 {
        "< 0.001".to_string()
    } else if p_value < 0.01 {
        format!("{p_value:.4}")
    } else {
        format!("{p_value:.3}")
    }
}

/// Formats an F-statistic with two decimals.
#[must_use]
pub fn format_f_statistic(f_statistic: f64) -> String {
    format!("{f_statistic:.2}")
}
