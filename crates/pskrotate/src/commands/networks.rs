//! Network command handlers.

use tabled::Tabled;

use pskrotate_core::{GuestPolicy, Network, NetworkManager};

use super::{Context, credentials, util};
use crate::cli::{NetworksArgs, NetworksCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Products")]
    products: String,
    /// SSIDs the tagged rotation would touch.
    #[tabled(rename = "Guest SSIDs")]
    guest: String,
}

fn row(n: &Network, policy: &GuestPolicy) -> NetworkRow {
    let guest = policy
        .targets(n)
        .into_iter()
        .map(|(kind, number)| format!("{kind} #{number}"))
        .collect::<Vec<_>>();
    NetworkRow {
        id: n.id.clone(),
        name: n.name.clone(),
        tags: n.tags.join(", "),
        products: n.product_types.join(", "),
        guest: if guest.is_empty() {
            "-".into()
        } else {
            guest.join(", ")
        },
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &mut Context, args: NetworksArgs) -> Result<(), CliError> {
    match args.command {
        NetworksCommand::List { org_id, tag } => {
            let dashboard = credentials::dashboard(ctx).await?;
            let org = util::select_org(ctx, &dashboard, org_id.as_deref()).await?;
            let mut networks = NetworkManager::list_networks(&dashboard, &org.id).await?;
            if let Some(ref tag) = tag {
                networks.retain(|n| n.has_tag(tag));
            }

            let policy = ctx.config.guest_policy();
            let out = output::render_list(
                ctx.output,
                &networks,
                |n| row(n, &policy),
                |n| n.id.clone(),
            );
            ctx.print(&out);
            Ok(())
        }
    }
}
