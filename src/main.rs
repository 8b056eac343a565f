use std::collections::HashSet;
use std::io::{Write, stdout};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use gpu_clean::cleaner::{ClearRequest, clear_gpu_memory};
use gpu_clean::config::{Config, load_config, load_config_from_path};
use gpu_clean::logging;
use gpu_clean::smi::{NvidiaSmi, SmiRunner};
use gpu_clean::status::display_status;
use gpu_clean::system::kill::SysinfoSignaller;

const EXAMPLES: &str = "\
Examples:
  gpu-clean --status                    # Show GPU status
  gpu-clean --clear                     # Clear all GPU processes
  gpu-clean --clear --force             # Force kill all GPU processes
  gpu-clean --clear --gpu 0,1           # Clear processes on GPU 0 and 1
  gpu-clean --clear --exclude 1234,5678 # Clear all except PIDs 1234,5678
  gpu-clean --clear --dry-run           # Show what would be cleared";

#[derive(Parser)]
#[command(
    name = "gpu-clean",
    about = "Clear NVIDIA GPU memory by terminating processes",
    after_help = EXAMPLES
)]
struct Cli {
    /// Show current GPU memory status and processes
    #[arg(short, long)]
    status: bool,

    /// Clear GPU memory by terminating processes
    #[arg(short, long)]
    clear: bool,

    /// Use SIGKILL instead of SIGTERM (more forceful)
    #[arg(short, long)]
    force: bool,

    /// Comma-separated list of GPU IDs to target (e.g., "0,1")
    #[arg(short, long, value_name = "GPU_IDS", value_delimiter = ',')]
    gpu: Vec<String>,

    /// Comma-separated list of PIDs to exclude from termination
    #[arg(short, long, value_name = "PIDS", value_delimiter = ',')]
    exclude: Vec<String>,

    /// Show what would be done without actually doing it
    #[arg(short, long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    if cli.verbose {
        logging::init_tracing(config.logging.format)?;
    }

    let result = tokio::select! {
        result = run(&cli, &config) => result,
        _ = tokio::signal::ctrl_c() => {
            println!("\nOperation cancelled by user.");
            return Ok(ExitCode::FAILURE);
        }
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            println!("Error: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(cli: &Cli, config: &Config) -> Result<()> {
    let smi = NvidiaSmi::new(SmiRunner::from_config(&config.nvidia_smi));
    let mut out = stdout();

    if wants_status(cli) {
        display_status(&smi, &mut out).await?;
    }

    if cli.clear {
        let request = ClearRequest {
            devices: csv_set(&cli.gpu),
            exclude_pids: csv_set(&cli.exclude),
            force: cli.force,
            dry_run: cli.dry_run,
            settle_delay: config.clear.settle_delay(),
        };
        let mut signaller = SysinfoSignaller::new();
        let outcome = clear_gpu_memory(&smi, &mut signaller, &request, &mut out).await?;

        if cli.dry_run {
            writeln!(
                out,
                "\nDry run complete. Found {} processes to terminate.",
                outcome.found
            )?;
        } else {
            writeln!(
                out,
                "\nCleared {}/{} GPU processes.",
                outcome.terminated, outcome.found
            )?;
            if outcome.terminated > 0 {
                writeln!(out, "\nUpdated GPU status:")?;
                display_status(&smi, &mut out).await?;
            }
        }
    }

    Ok(())
}

/// Status is the default action when neither `--status` nor `--clear` is given.
fn wants_status(cli: &Cli) -> bool {
    cli.status || !cli.clear
}

fn load_config_for_cli(cli: &Cli) -> Config {
    match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    }
}

fn csv_set(values: &[String]) -> HashSet<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
