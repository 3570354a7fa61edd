use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hardena")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Audit Kubernetes clusters for security misconfigurations")]
#[command(long_about = "HardenaK8s audits the workloads of a live Kubernetes cluster for security misconfigurations and provides actionable hardening recommendations in text, JSON, YAML or HTML form.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file (default: ~/.hardena.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (text, json, yaml, html)
    #[arg(short, long, global = true, env = "HARDENA_OUTPUT")]
    pub output: Option<String>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the cluster for security issues
    Scan {
        /// Scan a specific namespace
        #[arg(short, long, env = "HARDENA_NAMESPACE")]
        namespace: Option<String>,

        /// Scan all namespaces (overrides --namespace)
        #[arg(short = 'A', long)]
        all_namespaces: bool,

        /// Kubeconfig context to use (default: current context)
        #[arg(long, env = "HARDENA_CONTEXT")]
        context: Option<String>,

        /// Abort the scan after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Directory for the scan-results file (non-text formats)
        #[arg(long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,
    },

    /// Generate a report from saved scan results
    Report {
        /// JSON scan results produced by `scan -o json`
        #[arg(long, value_name = "FILE", default_value = "scan-results.json")]
        input: PathBuf,

        /// Directory to save the generated report (default from config)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Show the remediation for each finding (changes are applied manually)
    Fix {
        /// JSON scan results produced by `scan -o json`
        #[arg(long, value_name = "FILE", default_value = "scan-results.json")]
        input: PathBuf,

        /// Show what would be changed without applying
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        dry_run: bool,
    },
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
