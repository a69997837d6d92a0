//! Shared helpers for command handlers.

use std::time::Duration;

use dialoguer::{Confirm, Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;

use pskrotate_core::{NetworkManager, Organization, Psk, RunOutcomes, SsidKind, UpdateOutcome};

use super::Context;
use crate::cli::NetworkType;
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

impl From<NetworkType> for SsidKind {
    fn from(t: NetworkType) -> Self {
        match t {
            NetworkType::Wireless => SsidKind::Wireless,
            NetworkType::Appliance => SsidKind::Appliance,
        }
    }
}

// ── Prompts ─────────────────────────────────────────────────────────

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(ctx: &Context, message: &str, action: &str) -> Result<bool, CliError> {
    if ctx.global.yes {
        return Ok(true);
    }
    if !ctx.interactive {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Free-text prompt; non-interactive runs take `default`.
pub fn prompt_text(ctx: &Context, prompt: &str, default: &str) -> Result<String, CliError> {
    if !ctx.interactive {
        return Ok(default.to_owned());
    }
    Input::new()
        .with_prompt(prompt)
        .default(default.to_owned())
        .interact_text()
        .map_err(prompt_err)
}

/// The new PSK from `--psk`, or a hidden prompt that re-asks until the
/// passphrase policy is met.
pub fn resolve_psk(ctx: &Context, flag: Option<&str>) -> Result<Psk, CliError> {
    if let Some(raw) = flag {
        return Psk::parse(raw).map_err(|e| CliError::Validation {
            field: "psk".into(),
            reason: e.to_string(),
        });
    }
    if !ctx.interactive {
        return Err(CliError::Validation {
            field: "psk".into(),
            reason: "--psk is required when not running interactively".into(),
        });
    }

    loop {
        let raw = Password::new()
            .with_prompt("New PSK")
            .with_confirmation("Confirm PSK", "The PSKs do not match")
            .interact()
            .map_err(prompt_err)?;
        match Psk::parse(&raw) {
            Ok(psk) => return Ok(psk),
            Err(e) => eprintln!("{}", output::bad(&e.to_string(), ctx.color)),
        }
    }
}

/// Pick the organization to work on.
///
/// An explicit id must exist. Otherwise a single organization is used
/// directly and several are offered in a picker.
pub async fn select_org<M: NetworkManager>(
    ctx: &Context,
    manager: &M,
    org_id: Option<&str>,
) -> Result<Organization, CliError> {
    let orgs = manager.list_organizations().await?;

    if let Some(id) = org_id {
        return orgs
            .into_iter()
            .find(|o| o.id == id)
            .ok_or_else(|| CliError::NotFound {
                resource_type: "organization".into(),
                identifier: id.into(),
                list_command: "orgs list".into(),
            });
    }

    match orgs.len() {
        0 => Err(CliError::NotFound {
            resource_type: "organization".into(),
            identifier: "(any)".into(),
            list_command: "orgs list".into(),
        }),
        1 => {
            let org = orgs.into_iter().next().ok_or_else(|| {
                CliError::Internal("organization list changed while reading".into())
            })?;
            ctx.status(&format!("Using organization '{}' ({})", org.name, org.id));
            Ok(org)
        }
        _ if !ctx.interactive => Err(CliError::Validation {
            field: "org-id".into(),
            reason: format!(
                "{} organizations are visible; pass --org-id (one of: {})",
                orgs.len(),
                orgs.iter().map(|o| o.id.as_str()).collect::<Vec<_>>().join(", ")
            ),
        }),
        _ => {
            let names: Vec<&str> = orgs.iter().map(|o| o.name.as_str()).collect();
            let selection = Select::new()
                .with_prompt("Select an organization")
                .items(&names)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            orgs.into_iter()
                .nth(selection)
                .ok_or_else(|| CliError::Internal("selection out of range".into()))
        }
    }
}

/// Spinner on stderr for interactive runs; hidden otherwise.
pub fn spinner(ctx: &Context, message: &str) -> ProgressBar {
    if !ctx.interactive || ctx.global.quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

// ── Outcome rendering ───────────────────────────────────────────────

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "Network ID")]
    network_id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "SSID #")]
    number: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

fn outcome_row(o: &UpdateOutcome, color: bool) -> OutcomeRow {
    OutcomeRow {
        status: if o.is_success() {
            output::ok("updated", color)
        } else {
            output::bad("failed", color)
        },
        network: o.network_name.clone(),
        network_id: o.network_id.clone(),
        kind: o.kind.to_string(),
        number: o.ssid_number.map_or_else(|| "-".into(), |n| n.to_string()),
        detail: if o.is_success() {
            String::new()
        } else {
            o.message.clone()
        },
    }
}

/// Every outcome (successes first) in the chosen format, then a totals line
/// on stderr.
pub fn print_outcomes(ctx: &Context, outcomes: &RunOutcomes) {
    let all: Vec<&UpdateOutcome> = outcomes.iter().collect();
    if !all.is_empty() {
        let rendered = output::render_list(
            ctx.output,
            &all,
            |o| outcome_row(o, ctx.color),
            |o| format!("{}\t{}\t{}", o.status, o.network_id, o.kind),
        );
        ctx.print(&rendered);
    }

    let totals = format!(
        "{} updated, {} failed",
        outcomes.successes.len(),
        outcomes.failures.len()
    );
    if outcomes.failures.is_empty() {
        ctx.status(&output::ok(&totals, ctx.color));
    } else {
        ctx.status(&output::bad(&totals, ctx.color));
    }
}

/// Fail with an exit status when any update failed.
pub fn fail_on_failures(outcomes: &RunOutcomes) -> Result<(), CliError> {
    if outcomes.failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::PartialFailure {
            failed: outcomes.failures.len(),
            total: outcomes.total(),
        })
    }
}
