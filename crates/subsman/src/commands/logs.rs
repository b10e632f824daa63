//! Operation log handlers.

use tabled::Tabled;

use subsman_core::{Dashboard, Log};

use crate::cli::{LogsArgs, LogsCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Operation")]
    operation: String,
}

impl From<&Log> for LogRow {
    fn from(l: &Log) -> Self {
        Self {
            time: l.time.clone(),
            operation: l.operation.clone(),
        }
    }
}

/// Number of pages needed for `total` entries, never less than one.
fn page_count(total: u64, page_size: u32) -> u64 {
    total.div_ceil(u64::from(page_size.max(1))).max(1)
}

pub async fn handle(dashboard: &Dashboard, args: LogsArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        LogsCommand::List { page, page_size } => {
            let page_size = page_size.unwrap_or(ctx.defaults.page_size);
            if page == 0 || page_size == 0 {
                return Err(CliError::Validation {
                    field: if page == 0 { "page" } else { "page-size" }.into(),
                    reason: "must be at least 1".into(),
                });
            }

            let result = dashboard.fetch_logs(page, page_size).await?;
            let out = output::render_list(
                ctx.format,
                &result.logs,
                |l| LogRow::from(l),
                |l| format!("{}\t{}", l.time, l.operation),
            );
            output::print_output(&out, ctx.quiet);
            if ctx.is_table() {
                output::print_status(
                    &format!(
                        "Page {page} of {}, {} entries total",
                        page_count(result.total, page_size),
                        result.total
                    ),
                    ctx.quiet,
                );
            }
            Ok(())
        }

        LogsCommand::Clear => {
            if !util::confirm("Delete every log entry?", ctx.yes, "logs clear")? {
                return Ok(());
            }
            dashboard.clear_logs().await?;
            output::print_status("Logs cleared", ctx.quiet);
            Ok(())
        }
    }
}
