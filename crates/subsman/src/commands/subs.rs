//! Subscription command handlers.

use tabled::Tabled;

use subsman_core::{Dashboard, Subscription};

use crate::cli::{SubsArgs, SubsCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SubscriptionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Nodes")]
    nodes: u32,
    #[tabled(rename = "Imported")]
    imported: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&Subscription> for SubscriptionRow {
    fn from(s: &Subscription) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            kind: s.kind.clone(),
            nodes: s.node_count,
            imported: s.import_time.clone(),
            url: s.url.clone(),
        }
    }
}

fn print_list(dashboard: &Dashboard, ctx: &Context) {
    let snap = dashboard.store().subscriptions_snapshot();
    let out = output::render_list(
        ctx.format,
        snap.as_slice(),
        |s| SubscriptionRow::from(s),
        |s| s.id.clone(),
    );
    output::print_output(&out, ctx.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(dashboard: &Dashboard, args: SubsArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        SubsCommand::List => {
            dashboard.fetch_subscriptions().await?;
            print_list(dashboard, ctx);
            Ok(())
        }

        SubsCommand::Import { name, url } => {
            let pb = util::spinner(&format!("Importing '{name}'"), ctx.quiet);
            let result = dashboard.import_subscription(&name, &url).await;
            pb.finish_and_clear();
            result?;
            output::print_status(&format!("Subscription '{name}' imported"), ctx.quiet);
            print_list(dashboard, ctx);
            Ok(())
        }

        SubsCommand::Merge { ids } => {
            dashboard.merge_subscriptions(&ids).await?;
            let snap = dashboard.store().system_status_snapshot();
            let merged = snap
                .as_ref()
                .as_ref()
                .map(|s| s.current_status.merged_subscription.clone())
                .unwrap_or_default();
            output::print_status(&format!("Merged {} subscription(s)", ids.len()), ctx.quiet);
            output::print_output(&merged, ctx.quiet);
            Ok(())
        }

        SubsCommand::Delete { ids } => {
            let prompt = format!("Delete {} subscription(s): {}?", ids.len(), ids.join(", "));
            if !util::confirm(&prompt, ctx.yes, "subs delete")? {
                return Ok(());
            }
            dashboard.delete_subscriptions(&ids).await?;
            let remaining = dashboard.store().subscriptions_snapshot().len();
            output::print_status(
                &format!("Deleted {} subscription(s), {remaining} remaining", ids.len()),
                ctx.quiet,
            );
            Ok(())
        }
    }
}
