//! SSID command handlers: listing and single-SSID / by-name PSK updates.

use serde::Serialize;
use tabled::Tabled;

use pskrotate_core::{
    NetworkManager, Ssid, SsidKind, SsidUpdate, update_psk_by_name, update_psk_by_name_across,
    update_psk_by_number,
};

use super::{Context, credentials, util};
use crate::cli::{SsidScope, SsidsArgs, SsidsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

/// An SSID tagged with its family, for listings that span both.
#[derive(Serialize)]
struct ListedSsid {
    kind: SsidKind,
    #[serde(flatten)]
    ssid: Ssid,
}

#[derive(Tabled)]
struct SsidRow {
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "#")]
    number: u8,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Auth")]
    auth: String,
}

impl From<&ListedSsid> for SsidRow {
    fn from(l: &ListedSsid) -> Self {
        let s = &l.ssid;
        Self {
            kind: l.kind.to_string(),
            number: s.number,
            name: s.name.clone(),
            enabled: if s.enabled { "yes" } else { "no" }.into(),
            auth: s.auth_mode.clone().unwrap_or_else(|| "-".into()),
        }
    }
}

impl SsidScope {
    fn kinds(self) -> &'static [SsidKind] {
        match self {
            Self::Wireless => &[SsidKind::Wireless],
            Self::Appliance => &[SsidKind::Appliance],
            Self::Both => &[SsidKind::Wireless, SsidKind::Appliance],
        }
    }
}

fn detail(u: &SsidUpdate) -> String {
    [
        u.confirmation.clone(),
        format!("Network:  {}", u.network_id),
        format!("Type:     {}", u.kind),
        format!("Number:   {}", u.ssid.number),
        format!("Name:     {}", u.ssid.name),
        format!("Enabled:  {}", u.ssid.enabled),
        format!("Auth:     {}", u.ssid.auth_mode.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &mut Context, args: SsidsArgs) -> Result<(), CliError> {
    match args.command {
        SsidsCommand::List {
            network_id,
            network_type,
        } => {
            let dashboard = credentials::dashboard(ctx).await?;
            let mut listed = Vec::new();
            for &kind in network_type.kinds() {
                let ssids = dashboard.list_ssids(&network_id, kind).await?;
                listed.extend(ssids.into_iter().map(|ssid| ListedSsid { kind, ssid }));
            }
            let out = output::render_list(
                ctx.output,
                &listed,
                |l| SsidRow::from(l),
                |l| format!("{}\t{}\t{}", l.kind, l.ssid.number, l.ssid.name),
            );
            ctx.print(&out);
            Ok(())
        }

        SsidsCommand::Update {
            network_id,
            name,
            number,
            psk,
            network_type,
        } => {
            let psk = util::resolve_psk(ctx, psk.as_deref())?;
            let kind = SsidKind::from(network_type);
            let dashboard = credentials::dashboard(ctx).await?;

            // A slot number wins over a name when both are given.
            let update = match (number, name) {
                (Some(number), _) => {
                    update_psk_by_number(&dashboard, &network_id, number, psk.expose(), kind)
                        .await?
                }
                (None, Some(name)) => {
                    update_psk_by_name(&dashboard, &network_id, &name, psk.expose(), kind).await?
                }
                (None, None) => {
                    return Err(CliError::Validation {
                        field: "ssid".into(),
                        reason: "pass --name or --number".into(),
                    });
                }
            };

            let out = output::render_single(ctx.output, &update, detail, |u| {
                format!("{}\t{}", u.ssid.number, u.ssid.name)
            });
            ctx.print(&out);
            Ok(())
        }

        SsidsCommand::UpdateAll {
            name,
            psk,
            network_type,
            org_id,
        } => {
            let psk = util::resolve_psk(ctx, psk.as_deref())?;
            let kind = SsidKind::from(network_type);
            let dashboard = credentials::dashboard(ctx).await?;
            let org = util::select_org(ctx, &dashboard, org_id.as_deref()).await?;

            if !util::confirm(
                ctx,
                &format!(
                    "Update the PSK of {kind} SSID '{name}' on every network in '{}'?",
                    org.name
                ),
                "ssids update-all",
            )? {
                ctx.status("Aborted.");
                return Ok(());
            }

            let networks = NetworkManager::list_networks(&dashboard, &org.id).await?;
            let spinner = util::spinner(ctx, &format!("Updating '{name}'..."));
            let result =
                update_psk_by_name_across(&dashboard, &networks, &name, psk.expose(), kind).await;
            spinner.finish_and_clear();

            util::print_outcomes(ctx, &result.outcomes);
            if result.name_found_nowhere() {
                ctx.status(&output::warn(
                    &format!("No network in '{}' has a {kind} SSID named '{name}'", org.name),
                    ctx.color,
                ));
            } else if !result.skipped.is_empty() {
                ctx.status(&format!(
                    "Skipped {} network(s) without '{name}'",
                    result.skipped.len()
                ));
            }
            util::fail_on_failures(&result.outcomes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_scope_lists_wireless_first() {
        assert_eq!(
            SsidScope::Both.kinds(),
            &[SsidKind::Wireless, SsidKind::Appliance]
        );
        assert_eq!(SsidScope::Appliance.kinds(), &[SsidKind::Appliance]);
    }

    #[test]
    fn listed_ssid_serializes_flat_with_kind() {
        let listed = ListedSsid {
            kind: SsidKind::Appliance,
            ssid: Ssid {
                number: 2,
                name: "Guest".into(),
                enabled: true,
                auth_mode: None,
            },
        };
        let json = serde_json::to_value(&listed).unwrap_or_else(|e| panic!("serialize: {e}"));
        assert_eq!(json["kind"], "appliance");
        assert_eq!(json["number"], 2);
        assert_eq!(json["name"], "Guest");

        let row = SsidRow::from(&listed);
        assert_eq!(row.kind, "appliance");
        assert_eq!(row.auth, "-");
    }
}
