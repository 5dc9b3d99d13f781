//! Ad-hoc ANOVA over groups passed as comma-separated values.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use capable_stats_core::report::INSUFFICIENT_DATA;
use capable_stats_core::{one_way_anova, AnovaResult, ObservationGroup, OutputFormat, Significance};

/// Arguments for the anova command.
#[derive(Args, Debug, Clone)]
pub struct AnovaArgs {
    /// One group of observations, e.g. --group "1.2,3.4,2.2" (repeat per group)
    #[arg(short, long = "group", required = true)]
    pub groups: Vec<String>,

    /// Output format: text, json
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(Serialize)]
struct AnovaOutput {
    groups: usize,
    result: Option<AnovaResult>,
    significance: Option<&'static str>,
}

/// Parses a comma-separated list of numbers into a group.
///
/// Blank entries are skipped; `NaN` is accepted and dropped like any other
/// non-finite reading.
pub fn parse_group(raw: &str) -> Result<ObservationGroup> {
    let values = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .with_context(|| format!("Invalid number '{s}' in group '{raw}'"))
        })
        .collect::<Result<Vec<f64>>>()?;
    Ok(ObservationGroup::new(values))
}

/// Text line for a result, or the insufficient-data caption.
pub fn describe(result: Option<AnovaResult>) -> String {
    result.map_or_else(|| INSUFFICIENT_DATA.to_string(), |r| r.to_string())
}

/// Runs the anova command.
pub fn run_anova(args: &AnovaArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;
    let groups = args
        .groups
        .iter()
        .map(|g| parse_group(g))
        .collect::<Result<Vec<_>>>()?;

    let result = one_way_anova(&groups);
    tracing::debug!(groups = groups.len(), ?result, "ANOVA computed");

    match format {
        OutputFormat::Text => println!("{}", describe(result)),
        OutputFormat::Json => {
            let output = AnovaOutput {
                groups: groups.len(),
                result,
                significance: result.map(|r| Significance::from_p_value(r.p_value).marker()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
