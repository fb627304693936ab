//! Clap derive structures for the `vcoctl` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// vcoctl -- SD-WAN orchestrator automation
#[derive(Debug, Parser)]
#[command(
    name = "vcoctl",
    version,
    about = "Audit link bandwidth and provision branch edges on an SD-WAN orchestrator",
    long_about = "Automation for an SD-WAN orchestrator.\n\n\
        `audit` finds links stuck in slow-start bandwidth measurement and pins\n\
        them to STATIC. `provision` creates a branch edge and pushes its\n\
        device settings, WAN overlay and optional ZScaler configuration.\n\n\
        Connection details come from VCO and VCO_TOKEN, read from ./.env and\n\
        the process environment.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VCOCTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides the policy file)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Environment file to load instead of ./.env
    #[arg(long, value_name = "FILE", global = true)]
    pub env_file: Option<PathBuf>,

    /// Policy file to load instead of the user and working-directory vcoctl.toml
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find slow-start links in the burst band and pin them to STATIC
    Audit(AuditArgs),

    /// Create and configure a branch edge from a branch file
    #[command(alias = "prov")]
    Provision(ProvisionArgs),

    /// View enterprise edges
    #[command(alias = "e")]
    Edges(EdgesArgs),

    /// View edge licenses
    Licenses(LicensesArgs),

    /// Inspect configuration modules
    Modules(ModulesArgs),

    /// Poll the status of an asynchronous portal operation
    AsyncStatus(AsyncStatusArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Audit ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Push corrected WAN modules (default: report only)
    #[arg(long)]
    pub apply: bool,

    /// CSV report path (overrides audit.report_path)
    #[arg(long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Telemetry window in minutes (overrides audit.lookback_mins)
    #[arg(long, value_name = "MINUTES")]
    pub lookback: Option<u64>,
}

// ── Provision ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProvisionArgs {
    /// Branch specification (.toml, .yaml, .yml or .json)
    pub branch_file: PathBuf,

    /// Print the patch batch and WAN overlay without contacting the orchestrator
    #[arg(long, requires = "device_settings")]
    pub plan: bool,

    /// Saved deviceSettings module data to plan against (with --plan)
    #[arg(long, value_name = "FILE")]
    pub device_settings: Option<PathBuf>,

    /// Configure ZScaler in this run; the edge must already be activated and online.
    /// Without it the step is skipped. `--yes` does not enable it.
    #[arg(long, conflicts_with = "plan")]
    pub zscaler_now: bool,
}

// ── Edges ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EdgesArgs {
    #[command(subcommand)]
    pub command: EdgesCommand,
}

#[derive(Debug, Subcommand)]
pub enum EdgesCommand {
    /// List edges in the enterprise
    #[command(alias = "ls")]
    List,
}

// ── Licenses ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LicensesArgs {
    #[command(subcommand)]
    pub command: LicensesCommand,
}

#[derive(Debug, Subcommand)]
pub enum LicensesCommand {
    /// List edge licenses available to the enterprise
    #[command(alias = "ls")]
    List,
}

// ── Modules ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ModulesArgs {
    #[command(subcommand)]
    pub command: ModulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ModulesCommand {
    /// Dump a device-scope module's data as JSON
    Dump {
        /// Numeric edge id
        #[arg(long)]
        edge_id: i64,

        /// Module name
        #[arg(long, default_value = "deviceSettings")]
        module: String,

        /// Write to a file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

// ── Async status ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AsyncStatusArgs {
    /// API token returned by an asynchronous call
    pub token: String,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
