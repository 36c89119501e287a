//! repairflow - drive the analysis / AI-repair service end to end
//!
//! ## Commands
//!
//! - `run`: analysis, repair of the first finding, consolidated report, verdict
//! - `analyze`: analysis only, prints the findings

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};

use repairflow_core::{
    init_tracing, render_fatal, render_findings, render_outcome, sample_request, write_report,
    AnalysisRequest, ClientConfig, ResilientSender, RetryPolicy, Verdict, WorkflowOutcome,
    WorkflowRunner, DEFAULT_BASE_URL, SAMPLE_FILENAME,
};

const EXIT_OK: u8 = 0;
const EXIT_FATAL: u8 = 1;
/// The report's repair status is not `Validation Success`.
const EXIT_VALIDATION_FAILED: u8 = 2;

#[derive(Parser)]
#[command(name = "repairflow")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "End-to-end client for the analysis and AI repair service", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Base URL of the analysis service
    #[arg(long, global = true, env = "REPAIRFLOW_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Total attempts per request
    #[arg(long, global = true, default_value = "3")]
    attempts: u32,

    /// Fixed delay between attempts, in seconds
    #[arg(long, global = true, default_value = "2")]
    retry_delay_secs: u64,

    /// Per-request timeout in seconds (default: none)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// Source file to submit (default: built-in buggy_div.c sample)
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Filename reported to the service (default: the source file's name)
    #[arg(short, long)]
    filename: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run analysis, repair and report, then check the repair verdict
    Run {
        #[command(flatten)]
        source: SourceArgs,

        /// Also save the final report JSON to this path
        #[arg(long)]
        save_report: Option<PathBuf>,
    },

    /// Submit source for analysis only and list the findings
    Analyze {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    let result = dispatch(cli).await;
    if let Err(e) = &result {
        eprintln!("\n{}", render_fatal(&format!("{:#}", e)));
    }
    ExitCode::from(exit_status(&result))
}

/// Map a command result to the process exit status.
///
/// `Ok(None)` covers runs without a verdict (no findings, `analyze`).
fn exit_status(result: &Result<Option<Verdict>>) -> u8 {
    match result {
        Err(_) => EXIT_FATAL,
        Ok(Some(verdict)) if !verdict.is_verified() => EXIT_VALIDATION_FAILED,
        Ok(_) => EXIT_OK,
    }
}

async fn dispatch(cli: Cli) -> Result<Option<Verdict>> {
    let config = client_config(&cli);
    let sender = ResilientSender::from_config(&config).context("Failed to build service client")?;
    let runner = WorkflowRunner::new(sender);

    match cli.command {
        Commands::Run {
            source,
            save_report,
        } => cmd_run(&runner, &source, save_report.as_deref()).await,
        Commands::Analyze { source } => cmd_analyze(&runner, &source).await,
    }
}

fn client_config(cli: &Cli) -> ClientConfig {
    let retry = RetryPolicy::new(cli.attempts, Duration::from_secs(cli.retry_delay_secs));
    let config = ClientConfig::new(&cli.base_url).with_retry(retry);
    match cli.timeout_secs {
        Some(secs) => config.with_timeout(Duration::from_secs(secs)),
        None => config,
    }
}

fn load_request(args: &SourceArgs) -> Result<AnalysisRequest> {
    let Some(path) = &args.source else {
        let mut request = sample_request();
        if let Some(name) = &args.filename {
            request.filename = name.clone();
        }
        return Ok(request);
    };

    let code = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file {:?}", path))?;
    let filename = match &args.filename {
        Some(name) => name.clone(),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| SAMPLE_FILENAME.to_string()),
    };
    Ok(AnalysisRequest::new(filename, code))
}

async fn cmd_run(
    runner: &WorkflowRunner,
    source: &SourceArgs,
    save_report: Option<&Path>,
) -> Result<Option<Verdict>> {
    let request = load_request(source)?;
    let run = runner.run(&request).await?;

    println!("\n{}", render_outcome(&run));

    if let (Some(path), WorkflowOutcome::Completed { report, .. }) = (save_report, &run.outcome) {
        write_report(path, report)
            .with_context(|| format!("Failed to write report to {:?}", path))?;
        info!(path = %path.display(), "Report saved");
    }

    Ok(run.verdict().cloned())
}

async fn cmd_analyze(runner: &WorkflowRunner, source: &SourceArgs) -> Result<Option<Verdict>> {
    let request = load_request(source)?;
    let (analysis, _) = runner.analyze(&request).await?;

    println!("\n{}", render_findings(&analysis));
    Ok(None)
}
