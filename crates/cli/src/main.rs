use clap::{Parser, Subcommand};

mod commands;

use commands::{AnovaArgs, CompareArgs, FTestArgs};

#[derive(Parser)]
#[command(name = "capable-stats")]
#[command(about = "Significance testing for experiment group measurements", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the groups of every chart in a JSON or CSV export
    Compare(CompareArgs),
    /// Run a one-way ANOVA on groups given on the command line
    Anova(AnovaArgs),
    /// Upper-tail p-value of an F-statistic
    FTest(FTestArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Compare(args) => {
            commands::run_compare(args).await?;
        }
        Commands::Anova(args) => {
            commands::run_anova(&args)?;
        }
        Commands::FTest(args) => {
            commands::run_f_test(&args)?;
        }
    }

    Ok(())
}
