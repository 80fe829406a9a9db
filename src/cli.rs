//! CLI argument parsing module for netlib-regress

use crate::domain::{PackageKind, ProxyCredentials};
use crate::environment::BOOST_ROOT_VAR;
use crate::orchestrator::RunRequest;
use crate::package::DEFAULT_REPO_ROOT;
use clap::Parser;
use std::path::PathBuf;

/// Exit status for usage errors: -1 as reported by the shell
pub const USAGE_EXIT_CODE: u8 = 255;

/// Project address printed after a successful run
pub const CONTACT_ADDRESS: &str = "cpp.netlib@gmail.com";

/// Download a cpp-netlib branch, build it with bjam and record a regression report
#[derive(Parser, Debug, Clone)]
#[command(name = "netlib-regress", version, about = "cpp-netlib regression runner")]
pub struct CliArgs {
    /// A real name to identify the test runner
    #[arg(long, value_name = "RUNNER")]
    pub runner: String,

    /// Package to download: 'zip' for the zip file, 'tar' for the tarball
    #[arg(long, value_enum, value_name = "ZIP/TAR")]
    pub package: PackageKind,

    /// The Git branch to check
    #[arg(long, value_name = "BRANCH")]
    pub branch: String,

    /// The path to the bjam binary if it's not in the system path
    #[arg(long, value_name = "PATH")]
    pub bjam: Option<String>,

    /// The user-config file to use
    #[arg(long, value_name = "FILE")]
    pub user_config: Option<PathBuf>,

    /// The proxy user name
    #[arg(long, value_name = "USER")]
    pub proxy_user: Option<String>,

    /// The proxy password
    #[arg(long, value_name = "PASS")]
    pub proxy_password: Option<String>,

    // Environment
    /// Boost installation root
    #[arg(long, env = BOOST_ROOT_VAR, value_name = "PATH")]
    pub boost_root: Option<PathBuf>,

    /// Repository the packages are downloaded from
    #[arg(long, env = "NETLIB_REPO_ROOT", default_value = DEFAULT_REPO_ROOT, value_name = "URL")]
    pub repo_root: String,

    /// Directory for the report, the package and the extracted sources
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub work_dir: PathBuf,

    // Output options
    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - no progress display
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Proxy credentials, present only when both user and password are given
    pub fn proxy(&self) -> Option<ProxyCredentials> {
        ProxyCredentials::from_parts(self.proxy_user.clone(), self.proxy_password.clone())
    }

    /// Check if only one half of the proxy credentials was given
    pub fn has_partial_proxy(&self) -> bool {
        self.proxy_user.is_some() != self.proxy_password.is_some()
    }

    /// Build the run request for the orchestrator
    pub fn run_request(&self) -> RunRequest {
        RunRequest {
            runner: self.runner.clone(),
            branch: self.branch.clone(),
            proxy: self.proxy(),
            build_tool: self.bjam.clone(),
            user_config: self.user_config.clone(),
        }
    }

    /// Default log filter when RUST_LOG is not set
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}
