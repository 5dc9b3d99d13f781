//! Compare CLI command.
//!
//! Loads exported charts, runs the group comparison for each one and prints
//! a report.

use anyhow::{Context, Result};
use clap::Args;

use capable_stats_core::{
    source_for_path, AppConfig, ChartComparator, ChartComparison, ConfigLoader, OutputFormat,
    ReportFormatter,
};

/// Arguments for the compare command.
#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// Chart export to read (.json or .csv)
    #[arg(short, long)]
    pub input: String,

    /// Output format: text, json (defaults to the configured format)
    #[arg(long)]
    pub format: Option<String>,

    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Maximum charts compared concurrently (overrides config)
    #[arg(long)]
    pub max_concurrency: Option<usize>,
}

/// Resolves the effective settings from config and command-line overrides.
pub fn resolve_settings(args: &CompareArgs, mut config: AppConfig) -> Result<AppConfig> {
    if let Some(format) = &args.format {
        config.output.format = OutputFormat::parse(format)?;
    }
    if let Some(max_concurrency) = args.max_concurrency {
        config.batch.max_concurrency = max_concurrency;
    }
    Ok(config)
}

/// Renders comparisons in the requested format.
pub fn render(comparisons: &[ChartComparison], config: &AppConfig) -> Result<String> {
    let formatter = ReportFormatter::new(&config.analysis);
    match config.output.format {
        OutputFormat::Text => Ok(formatter.format_text(comparisons)),
        OutputFormat::Json => Ok(formatter.format_json(comparisons)?),
    }
}

/// Runs the compare command.
pub async fn run_compare(args: CompareArgs) -> Result<()> {
    let config = ConfigLoader::load_from(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;
    let config = resolve_settings(&args, config)?;

    let source = source_for_path(&args.input)?;
    tracing::info!("Loading charts from {}", source.describe());
    let charts = source
        .load_charts()
        .await
        .with_context(|| format!("Failed to load charts from {}", args.input))?;

    let comparator = ChartComparator::new(&config.batch);
    let comparisons = comparator.compare_all(charts).await?;

    println!("{}", render(&comparisons, &config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(format: Option<&str>) -> CompareArgs {
        CompareArgs {
            input: "charts.json".to_string(),
            format: format.map(str::to_string),
            config: "config/Config.toml".to_string(),
            max_concurrency: Some(2),
        }
    }

    #[test]
    fn overrides_replace_config_values() {
        let config = resolve_settings(&args(Some("json")), AppConfig::default()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.batch.max_concurrency, 2);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(resolve_settings(&args(Some("yaml")), AppConfig::default()).is_err());
    }

    #[test]
    fn render_uses_configured_alpha() {
        let mut config = AppConfig::default();
        config.analysis.alpha = 0.1;
        config.output.format = OutputFormat::Json;
        let json = render(&[], &config).unwrap();
        assert_eq!(json.trim(), "[]");

        config.output.format = OutputFormat::Text;
        let text = render(&[], &config).unwrap();
        assert!(text.contains("Significant (p < 0.1): 0"));
    }

    #[test]
    fn render_empty_text_report() {
        let text = render(&[], &AppConfig::default()).unwrap();
        assert!(text.contains("Charts: 0"));
        assert!(text.contains("Significant (p < 0.05): 0"));
    }
}
