//! Command dispatch: bridges CLI args -> dashboard actions -> output formatting.

pub mod config_cmd;
pub mod logs;
pub mod nodes;
pub mod settings;
pub mod status;
pub mod subs;
pub mod util;

use subsman_config::Defaults;
use subsman_core::Dashboard;

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

/// Resolved per-invocation output settings, plus the config-file defaults
/// that fill in omitted command flags.
#[derive(Debug, Clone)]
pub struct Context {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
    pub defaults: Defaults,
}

impl Context {
    pub fn new(global: &GlobalOpts, cfg: &Config) -> Self {
        Self {
            format: config::resolve_output(global, cfg),
            color: output::should_color(global.color),
            quiet: global.quiet,
            yes: global.yes,
            defaults: cfg.defaults.clone(),
        }
    }

    /// Tables and detail views are for humans; everything else is for scripts.
    pub fn is_table(&self) -> bool {
        self.format == OutputFormat::Table
    }
}

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, dashboard: &Dashboard, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(dashboard, ctx).await,
        Command::Subs(args) => subs::handle(dashboard, args, ctx).await,
        Command::Nodes(args) => nodes::handle(dashboard, args, ctx).await,
        Command::Settings(args) => settings::handle(dashboard, args, ctx).await,
        Command::Logs(args) => logs::handle(dashboard, args, ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
