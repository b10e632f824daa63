//! `subsman status`: node health counts, served URLs and history.

use std::fmt::Write;

use tabled::{Table, Tabled, settings::Style};

use subsman_core::{Dashboard, HistoryEntry, SystemStatus};

use crate::error::CliError;
use crate::output;

use super::Context;

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Generated")]
    time: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(h: &HistoryEntry) -> Self {
        Self {
            time: h.time.clone(),
            url: h.url.clone(),
        }
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

fn detail(status: &SystemStatus, color: bool) -> String {
    let stats = &status.node_stats;
    let current = &status.current_status;
    let mut out = String::new();

    let _ = writeln!(out, "{}", output::label("Nodes", color));
    let _ = writeln!(out, "  Total:    {}", stats.total);
    let _ = writeln!(out, "  Healthy:  {}", stats.current);
    let _ = writeln!(out, "  Slow:     {}", stats.slow);
    let _ = writeln!(out, "  Failed:   {}", stats.failed);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", output::label("Subscriptions", color));
    let _ = writeln!(out, "  Merged:   {}", or_dash(&current.merged_subscription));
    let _ = write!(out, "  Final:    {}", or_dash(&current.final_subscription));

    if !status.history.is_empty() {
        let rows: Vec<HistoryRow> = status.history.iter().map(HistoryRow::from).collect();
        let _ = writeln!(out);
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", output::label("History", color));
        let _ = write!(out, "{}", Table::new(rows).with(Style::rounded()));
    }
    out
}

pub async fn handle(dashboard: &Dashboard, ctx: &Context) -> Result<(), CliError> {
    dashboard.fetch_system_status().await?;
    let snap = dashboard.store().system_status_snapshot();
    let Some(status) = snap.as_ref() else {
        return Err(CliError::Internal("status missing after fetch".into()));
    };

    let out = output::render_single(
        ctx.format,
        status,
        |s| detail(s, ctx.color),
        |s| s.current_status.final_subscription.clone(),
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use subsman_core::{CurrentStatus, NodeStats};

    use super::*;

    #[test]
    fn detail_shows_counts_and_dashes_for_missing_urls() {
        let status = SystemStatus {
            node_stats: NodeStats {
                total: 12,
                current: 9,
                slow: 2,
                failed: 1,
            },
            current_status: CurrentStatus {
                final_subscription: String::new(),
                merged_subscription: "http://localhost:3355/sub/merged".into(),
            },
            history: vec![],
        };
        let text = detail(&status, false);
        assert!(text.contains("Total:    12"));
        assert!(text.contains("Final:    -"));
        assert!(text.contains("/sub/merged"));
        assert!(!text.contains("History"));
    }
}
