//! Config subcommand handlers.

use std::io::{self, IsTerminal};

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const OUTPUT_CHOICES: [&str; 4] = ["table", "json", "yaml", "plain"];

/// Walk through the backend settings, starting from `base`.
fn prompt_config(base: Config) -> Result<Config, CliError> {
    let mut cfg = base;

    cfg.backend.url = Input::new()
        .with_prompt("Backend URL")
        .default(cfg.backend.url.clone())
        .interact_text()
        .map_err(prompt_err)?;

    cfg.backend.timeout = Input::new()
        .with_prompt("Request timeout (seconds)")
        .default(cfg.backend.timeout)
        .interact_text()
        .map_err(prompt_err)?;

    let current = OUTPUT_CHOICES
        .iter()
        .position(|c| *c == cfg.defaults.output)
        .unwrap_or(0);
    let selection = Select::new()
        .with_prompt("Default output format")
        .items(&OUTPUT_CHOICES)
        .default(current)
        .interact()
        .map_err(prompt_err)?;
    cfg.defaults.output = OUTPUT_CHOICES[selection].into();

    Ok(cfg)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let quiet = global.quiet;
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let mut base = cfg.clone();
            if let Some(url) = &global.url {
                base.backend.url.clone_from(url);
            }
            if let Some(timeout) = global.timeout {
                base.backend.timeout = timeout;
            }

            // --yes or no terminal: write the flags and defaults as they are
            let new_cfg = if global.yes || !io::stdin().is_terminal() {
                base
            } else {
                output::print_status(
                    &format!("Config path: {}\n", config::config_path().display()),
                    quiet,
                );
                prompt_config(base)?
            };

            // Reject values the client would refuse before writing them
            new_cfg.client_config()?;
            let path = config::save_config(&new_cfg)?;

            output::print_status(&format!("Configuration written to {}", path.display()), quiet);
            output::print_status("Test it: subsman status", quiet);
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let format = config::resolve_output(global, &cfg);
            let out = output::render_single(
                format,
                &cfg,
                |c| {
                    toml::to_string_pretty(c)
                        .unwrap_or_else(|e| format!("error: serialization failed: {e}"))
                },
                |c| c.backend.url.clone(),
            );
            output::print_output(out.trim_end(), quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), quiet);
            Ok(())
        }
    }
}
