/// Timbre - offline audio processing from the command line
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use timbre_cli::{analyze, process, resample_file, TimbreConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "timbre")]
#[command(about = "Decode, process and analyze audio files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured pipeline over a file
    Process {
        /// Input audio file
        #[arg(short, long)]
        input: PathBuf,
        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,
        /// Configuration file path
        #[arg(short, long, env = "TIMBRE_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Print metrics for a file
    Analyze {
        /// Input audio file
        input: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change the sample rate of a file
    Resample {
        /// Input audio file
        #[arg(short, long)]
        input: PathBuf,
        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,
        /// Target sample rate in Hz
        #[arg(short, long)]
        rate: u32,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timbre=info,timbre_cli=info,timbre_audio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process { input, output, config } => {
            let config = TimbreConfig::load(config.as_deref())?;
            let report = process(&input, &output, &config)?;
            println!("before: {}", report.before);
            println!("after:  {}", report.after);
        }
        Commands::Analyze { input, json } => {
            let metrics = analyze(&input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                println!("{}", metrics);
            }
        }
        Commands::Resample { input, output, rate } => {
            let metrics = resample_file(&input, &output, rate)?;
            println!("{}", metrics);
        }
    }

    Ok(())
}
