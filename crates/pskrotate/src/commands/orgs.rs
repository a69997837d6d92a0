//! Organization command handlers.

use tabled::Tabled;

use pskrotate_core::{NetworkManager, Organization};

use super::{Context, credentials};
use crate::cli::{OrgsArgs, OrgsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct OrgRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Organization> for OrgRow {
    fn from(o: &Organization) -> Self {
        Self {
            id: o.id.clone(),
            name: o.name.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &mut Context, args: OrgsArgs) -> Result<(), CliError> {
    match args.command {
        OrgsCommand::List => {
            let dashboard = credentials::dashboard(ctx).await?;
            let orgs = NetworkManager::list_organizations(&dashboard).await?;
            let out = output::render_list(ctx.output, &orgs, |o| OrgRow::from(o), |o| o.id.clone());
            ctx.print(&out);
            Ok(())
        }
    }
}
