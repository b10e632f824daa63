//! CLI configuration: thin wrapper around `subsman_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects the
//! `GlobalOpts` flag overrides (--url, --timeout, --output).

use clap::ValueEnum;

use subsman_core::ClientConfig;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use subsman_config::{Config, config_path, load_config, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Build the runtime client config. Flags (and their env vars) beat the file.
pub fn resolve_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let mut cfg = cfg.clone();
    if let Some(url) = &global.url {
        cfg.backend.url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.backend.timeout = timeout;
    }
    Ok(cfg.client_config()?)
}

/// Output format: `--output` flag, else `defaults.output`, else table.
pub fn resolve_output(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&cfg.defaults.output, true).unwrap_or(OutputFormat::Table)
    })
}
