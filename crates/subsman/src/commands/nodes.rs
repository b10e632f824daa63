//! Node command handlers: import, test, filter, generate.

use std::fmt::Write;

use tabled::Tabled;

use subsman_core::{Dashboard, GeneratedSubscription, Node};

use crate::cli::{NodesArgs, NodesCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Alias")]
    alias: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Delay")]
    delay: String,
    #[tabled(rename = "Speed")]
    speed: String,
}

impl NodeRow {
    fn new(n: &Node, color: bool) -> Self {
        Self {
            id: n.id.clone(),
            alias: n.alias.clone(),
            kind: n.kind.clone(),
            address: format!("{}:{}", n.address, n.port),
            group: n.group.clone(),
            delay: output::paint_delay(n.delay, color),
            speed: output::format_speed(n.speed),
        }
    }
}

fn render_nodes(nodes: &[Node], ctx: &Context) -> String {
    output::render_list(ctx.format, nodes, |n| NodeRow::new(n, ctx.color), |n| n.id.clone())
}

fn generated_detail(g: &GeneratedSubscription, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", output::label("URL:  ", color), g.url);
    let _ = write!(out, "{}  {}", output::label("Nodes:", color), g.node_count);
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(dashboard: &Dashboard, args: NodesArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        NodesCommand::List => {
            dashboard.fetch_nodes().await?;
            let snap = dashboard.store().nodes_snapshot();
            output::print_output(&render_nodes(&snap, ctx), ctx.quiet);
            Ok(())
        }

        NodesCommand::Import => {
            let pb = util::spinner("Importing nodes from the merged subscription", ctx.quiet);
            let result = dashboard.import_nodes().await;
            pb.finish_and_clear();
            result?;
            let count = dashboard.store().nodes_snapshot().len();
            output::print_status(&format!("Imported {count} node(s)"), ctx.quiet);
            Ok(())
        }

        NodesCommand::Test => {
            let pb = util::spinner("Testing nodes", ctx.quiet);
            let result = dashboard.test_nodes().await;
            pb.finish_and_clear();
            result?;
            let snap = dashboard.store().nodes_snapshot();
            let reachable = snap.iter().filter(|n| n.delay.is_some()).count();
            output::print_status(
                &format!("Tested {} node(s), {reachable} reachable", snap.len()),
                ctx.quiet,
            );
            output::print_output(&render_nodes(&snap, ctx), ctx.quiet);
            Ok(())
        }

        NodesCommand::Filter {
            max_delay,
            min_speed,
        } => {
            let max_delay = max_delay.unwrap_or(ctx.defaults.max_delay);
            let min_speed = min_speed.unwrap_or(ctx.defaults.min_speed);
            let filtered = dashboard.filter_nodes(max_delay, min_speed).await?;

            if ctx.is_table() {
                output::print_status(
                    &format!(
                        "{} of {} node(s) within {max_delay} ms and above {min_speed} MB/s",
                        filtered.nodes.len(),
                        filtered.total_nodes
                    ),
                    ctx.quiet,
                );
                output::print_output(&render_nodes(&filtered.nodes, ctx), ctx.quiet);
            } else {
                let out = output::render_single(
                    ctx.format,
                    &filtered,
                    |_| String::new(),
                    |f| {
                        f.nodes
                            .iter()
                            .map(|n| n.id.as_str())
                            .collect::<Vec<_>>()
                            .join("\n")
                    },
                );
                output::print_output(&out, ctx.quiet);
            }
            Ok(())
        }

        NodesCommand::Generate => {
            let generated = dashboard.generate_subscription().await?;
            let out = output::render_single(
                ctx.format,
                &generated,
                |g| generated_detail(g, ctx.color),
                |g| g.url.clone(),
            );
            output::print_output(&out, ctx.quiet);
            Ok(())
        }
    }
}
