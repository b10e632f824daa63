//! Clap derive structures for the `subsman` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Also compiled by `build.rs` for man page generation, so it must only
//! depend on clap and clap_complete.

use std::fmt;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// subsman -- manage proxy subscriptions and nodes from the command line
#[derive(Debug, Parser)]
#[command(
    name = "subsman",
    version,
    about = "Manage SubsManager subscriptions and proxy nodes from the command line",
    long_about = "Import and merge proxy subscriptions, test and filter their nodes,\n\
        and publish the best ones as a generated subscription.\n\n\
        Talks to a running SubsManager backend (default http://localhost:3355).",
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
    /// Backend URL (overrides config file)
    #[arg(long, short = 'u', env = "SUBSMAN_URL", global = true)]
    pub url: Option<String>,

    /// Request timeout in seconds (overrides config file)
    #[arg(long, env = "SUBSMAN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format (defaults to the config file's `defaults.output`)
    #[arg(long, short = 'o', env = "SUBSMAN_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show node counts, served subscription URLs and history
    #[command(alias = "st")]
    Status,

    /// Manage imported subscriptions
    #[command(alias = "sub")]
    Subs(SubsArgs),

    /// Import, test and select proxy nodes
    #[command(alias = "n")]
    Nodes(NodesArgs),

    /// View and change scheduled tasks
    Settings(SettingsArgs),

    /// View and clear the operation log
    Logs(LogsArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Subscriptions ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SubsArgs {
    #[command(subcommand)]
    pub command: SubsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubsCommand {
    /// List imported subscriptions
    #[command(alias = "ls")]
    List,

    /// Import a subscription by URL
    Import {
        /// Display name
        name: String,
        /// Subscription URL
        url: String,
    },

    /// Merge subscriptions into the served merged subscription
    Merge {
        /// Subscription IDs
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Delete subscriptions
    #[command(alias = "rm")]
    Delete {
        /// Subscription IDs
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
}

// ── Nodes ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NodesArgs {
    #[command(subcommand)]
    pub command: NodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum NodesCommand {
    /// List nodes with their latest measurements
    #[command(alias = "ls")]
    List,

    /// Pull nodes out of the merged subscription
    Import,

    /// Run a delay and speed test across all nodes
    Test,

    /// Select nodes by delay and speed thresholds
    Filter {
        /// Maximum delay in ms (defaults to config `defaults.max_delay`)
        #[arg(long)]
        max_delay: Option<u32>,

        /// Minimum speed in MB/s (defaults to config `defaults.min_speed`)
        #[arg(long, value_parser = parse_speed)]
        min_speed: Option<f64>,
    },

    /// Generate the final subscription from the last filter result
    Generate,
}

/// Speeds must be finite and non-negative. `nan` and `inf` parse as `f64`
/// but serialize to `null` in the filter request.
fn parse_speed(s: &str) -> Result<f64, String> {
    let speed: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid speed '{s}'"))?;
    if speed.is_finite() && speed >= 0.0 {
        Ok(speed)
    } else {
        Err(format!("speed must be a finite number >= 0, got '{s}'"))
    }
}

// ── Settings ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show the current scheduled tasks
    Show,

    /// Change scheduled tasks (unspecified fields keep their value)
    Set(SettingsSetArgs),
}

#[derive(Debug, Args)]
pub struct SettingsSetArgs {
    /// Enable or disable all scheduled tasks
    #[arg(long)]
    pub enabled: Option<bool>,

    /// Subscription update cadence
    #[arg(long)]
    pub schedule: Option<Schedule>,

    /// Day of week for weekly updates (0 = Sunday .. 6 = Saturday)
    #[arg(long)]
    pub weekday: Option<u8>,

    /// Time of day for subscription updates, as HH:MM
    #[arg(long, value_parser = parse_clock_time)]
    pub at: Option<ClockTime>,

    /// Minutes between node checks
    #[arg(long)]
    pub check_interval: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Schedule {
    Daily,
    Weekly,
}

/// `HH:MM` as typed on the command line. Range checks happen later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

fn parse_clock_time(s: &str) -> Result<ClockTime, String> {
    let (hour, minute) = s
        .split_once(':')
        .ok_or_else(|| format!("expected HH:MM, got '{s}'"))?;
    let hour = hour
        .trim()
        .parse()
        .map_err(|_| format!("invalid hour in '{s}'"))?;
    let minute = minute
        .trim()
        .parse()
        .map_err(|_| format!("invalid minute in '{s}'"))?;
    Ok(ClockTime { hour, minute })
}

// ── Logs ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// Show one page of the operation log
    #[command(alias = "ls")]
    List {
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: u32,

        /// Entries per page (defaults to config `defaults.page_size`)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Delete every log entry
    Clear,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_parser_accepts_plain_numbers() {
        assert_eq!(parse_speed("2.5"), Ok(2.5));
        assert_eq!(parse_speed("0"), Ok(0.0));
    }

    #[test]
    fn speed_parser_rejects_non_finite_and_negative() {
        for bad in ["nan", "inf", "-inf", "infinity", "-1", "fast"] {
            assert!(parse_speed(bad).is_err(), "{bad} should be rejected");
        }
    }
}
