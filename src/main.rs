//! netlib-regress - cpp-netlib regression runner
//!
//! Downloads a tarball or zip file of a cpp-netlib branch, unpacks it, runs
//! bjam (including all unit tests) and writes `cpp_netlib_regression.txt`
//! with the build output and the details needed to evaluate failures.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use netlib_regress::cli::{CliArgs, CONTACT_ADDRESS, USAGE_EXIT_CODE};
use netlib_regress::environment::EnvironmentProbe;
use netlib_regress::error::ConfigError;
use netlib_regress::orchestrator::Orchestrator;
use netlib_regress::package::{create_package, HttpClient};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => return usage_error(e),
    };

    init_tracing(args.log_filter());

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Print a parse error with the usage text and pick the exit status
fn usage_error(err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        _ => {
            let _ = err.print();
            eprintln!();
            let _ = CliArgs::command().print_help();
            ExitCode::from(USAGE_EXIT_CODE)
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if !args.work_dir.is_dir() {
        return Err(ConfigError::InvalidWorkDir {
            path: args.work_dir.clone(),
            message: "not a directory".to_string(),
        }
        .into());
    }

    if args.has_partial_proxy() {
        warn!("both --proxy-user and --proxy-password are needed; ignoring proxy credentials");
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        package = %args.package,
        branch = %args.branch,
        work_dir = %args.work_dir.display(),
        "starting regression run"
    );

    let client = HttpClient::new()?;
    let package = create_package(args.package, client, &args.repo_root);
    let probe = EnvironmentProbe::new(args.boost_root.clone());
    let orchestrator =
        Orchestrator::new(package, probe, &args.work_dir).with_progress(!args.quiet);

    let outcome = orchestrator.run(&args.run_request()).await?;

    if args.verbose {
        eprintln!("Sources: {}", outcome.source_dir.display());
        eprintln!("Commit: {}", outcome.metadata.commit);
        eprintln!("Build status: {}", outcome.build_status);
    }

    println!(
        "The regression results are found in `{}`.",
        outcome.report_path.display().to_string().bold()
    );
    println!(
        "Please e-mail this to the project administrators at `{}`",
        CONTACT_ADDRESS.cyan()
    );

    Ok(ExitCode::SUCCESS)
}
