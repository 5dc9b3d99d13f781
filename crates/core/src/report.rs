#![allow(clippy::format_push_string)]

use serde::Serialize;

use crate::batch::ChartComparison;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::significance::format_p_value;

/// Caption shown when a chart cannot be tested.
pub const INSUFFICIENT_DATA: &str = "insufficient data for a significance test";

/// Renders comparisons, judging significance against a fixed alpha.
#[derive(Debug, Clone, Copy)]
pub struct ReportFormatter {
    alpha: f64,
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    #[serde(flatten)]
    comparison: &'a ChartComparison,
    significance: Option<&'static str>,
    p_value_display: Option<String>,
    alpha: f64,
    significant: bool,
}

impl ReportFormatter {
    #[must_use]
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            alpha: config.alpha,
        }
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[must_use]
    pub fn format_text(&self, comparisons: &[ChartComparison]) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                  GROUP COMPARISON RESULTS                     \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");

        for comparison in comparisons {
            output.push('\n');
            match &comparison.unit {
                Some(unit) => output.push_str(&format!("{} ({unit})\n", comparison.measurement)),
                None => output.push_str(&format!("{}\n", comparison.measurement)),
            }
            output.push_str("───────────────────────────────────────────────────────────────\n");
            output.push_str(&format!(
                "{:<20} {:>6} {:>12} {:>10} {:>10}\n",
                "Group", "n", "Mean", "SD", "SEM"
            ));
            for group in &comparison.groups {
                output.push_str(&format!(
                    "{:<20} {:>6} {:>12} {:>10} {:>10}\n",
                    group.label,
                    group.count,
                    optional(group.mean, 3),
                    optional(group.std_dev, 3),
                    optional(group.sem, 3),
                ));
            }

            match comparison.anova {
                Some(result) => output.push_str(&format!("{result}\n")),
                None => {
                    output.push_str(INSUFFICIENT_DATA);
                    output.push('\n');
                }
            }
        }

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");

        let significant: Vec<&str> = comparisons
            .iter()
            .filter(|c| c.is_significant_at(self.alpha))
            .map(|c| c.measurement.as_str())
            .collect();
        output.push_str(&format!(
            "Charts: {}   Significant (p < {}): {}\n",
            comparisons.len(),
            self.alpha,
            significant.len()
        ));
        if !significant.is_empty() {
            output.push_str(&format!("Significant charts: {}\n", significant.join(", ")));
        }

        if comparisons.is_empty() {
            output.push_str("\nNo charts were found in the input.\n");
        }

        output
    }

    /// Serializes comparisons as pretty JSON with display fields attached.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn format_json(&self, comparisons: &[ChartComparison]) -> Result<String> {
        let entries: Vec<JsonEntry<'_>> = comparisons
            .iter()
            .map(|comparison| JsonEntry {
                comparison,
                significance: comparison.significance().map(|s| s.marker()),
                p_value_display: comparison.anova.map(|r| format_p_value(r.p_value)),
                alpha: self.alpha,
                significant: comparison.is_significant_at(self.alpha),
            })
            .collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }
}

fn optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.decimals$}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anova::AnovaResult;
    use crate::chart::GroupSummary;

    fn summary(label: &str, count: usize, mean: f64) -> GroupSummary {
        GroupSummary {
            label: label.to_string(),
            count,
            mean: Some(mean),
            std_dev: Some(1.0),
            sem: Some(0.5),
        }
    }

    fn tested() -> ChartComparison {
        ChartComparison {
            measurement: "body_weight".to_string(),
            unit: Some("g".to_string()),
            groups: vec![summary("vehicle", 4, 22.0), summary("treated", 4, 18.25)],
            anova: Some(AnovaResult {
                f_statistic: 14.0,
                p_value: 0.000_729,
                df_between: 2,
                df_within: 12,
            }),
        }
    }

    fn untested() -> ChartComparison {
        ChartComparison {
            measurement: "score".to_string(),
            unit: None,
            groups: vec![summary("a", 1, 3.0)],
            anova: None,
        }
    }

    #[test]
    fn text_report_shows_result_line() {
        let text = ReportFormatter::default().format_text(&[tested()]);
        assert!(text.contains("body_weight (g)"));
        assert!(text.contains("F(2, 12) = 14.00, p = < 0.001 ***"));
        assert!(text.contains("18.250"));
        assert!(text.contains("Significant (p < 0.05): 1"));
    }

    #[test]
    fn text_report_captions_untested_charts() {
        let text = ReportFormatter::default().format_text(&[untested()]);
        assert!(text.contains(INSUFFICIENT_DATA));
        assert!(text.contains("Significant (p < 0.05): 0"));
    }

    #[test]
    fn text_report_has_no_trailing_marker_space() {
        let mut comparison = tested();
        if let Some(result) = comparison.anova.as_mut() {
            result.p_value = 0.26;
        }
        let text = ReportFormatter::default().format_text(&[comparison]);
        assert!(text.contains("p = 0.260\n"));
    }

    #[test]
    fn text_report_empty_input() {
        let text = ReportFormatter::default().format_text(&[]);
        assert!(text.contains("No charts were found"));
    }

    #[test]
    fn json_report_includes_markers() {
        let json = ReportFormatter::default().format_json(&[tested(), untested()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["measurement"], "body_weight");
        assert_eq!(value[0]["significance"], "***");
        assert_eq!(value[0]["p_value_display"], "< 0.001");
        assert_eq!(value[0]["anova"]["df_within"], 12);
        assert!(value[1]["anova"].is_null());
        assert!(value[1]["significance"].is_null());
        assert_eq!(value[0]["significant"], true);
        assert_eq!(value[1]["significant"], false);
    }

    #[test]
    fn configured_alpha_drives_both_formats() {
        let mut comparison = tested();
        if let Some(result) = comparison.anova.as_mut() {
            result.p_value = 0.03;
        }
        let strict = ReportFormatter::new(&AnalysisConfig { alpha: 0.01 });
        let loose = ReportFormatter::default();

        let text = strict.format_text(std::slice::from_ref(&comparison));
        assert!(text.contains("Significant (p < 0.01): 0"));
        assert!(!text.contains("Significant charts"));
        let text = loose.format_text(std::slice::from_ref(&comparison));
        assert!(text.contains("Significant (p < 0.05): 1"));
        assert!(text.contains("Significant charts: body_weight"));

        let json = strict.format_json(std::slice::from_ref(&comparison)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["alpha"], 0.01);
        assert_eq!(value[0]["significant"], false);
        // The marker still reflects the fixed tiers
        assert_eq!(value[0]["significance"], "*");
    }
}
