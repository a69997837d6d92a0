//! `update-tagged`: rotate the guest PSK across every tagged network,
//! write the reports, and optionally post them to Webex.

use pskrotate_api::MessagingClient;
use pskrotate_config::keys;
use pskrotate_core::notify::{ReportRoom, ensure_room, send_report};
use pskrotate_core::{Delivery, GuestPolicy, RoomChoice, update_tagged_networks, write_report};

use super::{Context, credentials, util};
use crate::cli::UpdateTaggedArgs;
use crate::error::CliError;
use crate::output;

/// Config policy with per-run flag overrides.
fn policy(ctx: &Context, args: &UpdateTaggedArgs) -> GuestPolicy {
    let mut policy = ctx.config.guest_policy();
    if let Some(ref tag) = args.wireless_tag {
        policy.wireless_tag.clone_from(tag);
    }
    if let Some(ref tag) = args.appliance_tag {
        policy.appliance_tag.clone_from(tag);
    }
    if let Some(number) = args.wireless_number {
        policy.wireless_number = number;
    }
    if let Some(number) = args.appliance_number {
        policy.appliance_number = number;
    }
    policy
}

pub async fn handle(ctx: &mut Context, args: UpdateTaggedArgs) -> Result<(), CliError> {
    let psk = util::resolve_psk(ctx, args.psk.as_deref())?;
    let policy = policy(ctx, &args);

    let dashboard = credentials::dashboard(ctx).await?;
    let org = util::select_org(ctx, &dashboard, args.org_id.as_deref()).await?;

    let notifier = if args.notify {
        Some(prepare_notification(ctx, args.room_name.as_deref()).await?)
    } else {
        None
    };

    if !util::confirm(
        ctx,
        &format!(
            "Rotate the guest PSK on networks tagged '{}' (MR #{}) or '{}' (MX #{}) in '{}'?",
            policy.wireless_tag,
            policy.wireless_number,
            policy.appliance_tag,
            policy.appliance_number,
            org.name
        ),
        "update-tagged",
    )? {
        ctx.status("Aborted.");
        return Ok(());
    }

    let spinner = util::spinner(ctx, "Rotating guest PSKs...");
    let outcomes = update_tagged_networks(&dashboard, &org.id, psk.expose(), &policy).await?;
    spinner.finish_and_clear();

    // Printed before the report so it survives a write failure.
    util::print_outcomes(ctx, &outcomes);
    if outcomes.is_empty() {
        ctx.status(&output::warn(
            &format!(
                "No network in '{}' carries '{}' or '{}'",
                org.name, policy.wireless_tag, policy.appliance_tag
            ),
            ctx.color,
        ));
    }

    let paths = write_report(&ctx.report_dir(), &outcomes.successes, &outcomes.failures)?;
    for path in paths.written() {
        ctx.status(&format!("Report written: {}", path.display()));
    }

    if let Some((bot, room)) = notifier {
        let title = &ctx.config.messaging.report_title;
        match send_report(&bot, &room.room_id, title, &paths).await {
            Delivery::Sent { attachments } => ctx.status(&format!(
                "Report posted to Webex ({attachments} attachment(s))"
            )),
            Delivery::Failed { reason } => ctx.status(&output::warn(
                &format!("Could not post the report to Webex: {reason}"),
                ctx.color,
            )),
        }
    }

    util::fail_on_failures(&outcomes)
}

/// Validate both Webex credentials and settle the report room before any
/// PSK changes.
async fn prepare_notification(
    ctx: &mut Context,
    room_name: Option<&str>,
) -> Result<(MessagingClient, ReportRoom), CliError> {
    let bot = credentials::bot(ctx).await?;
    let user_id = credentials::operator_id(ctx).await?;

    let choice = match (room_name, ctx.store.get(keys::WEBEX_ROOM_ID)) {
        (Some(name), _) => RoomChoice::Create(name.to_owned()),
        (None, Some(id)) => RoomChoice::Existing(id.to_owned()),
        (None, None) => {
            let default = ctx.config.messaging.report_title.clone();
            RoomChoice::Create(util::prompt_text(ctx, "Room name for reports", &default)?)
        }
    };

    let room = ensure_room(&bot, choice, &user_id).await?;
    if room.created {
        ctx.store.set(keys::WEBEX_ROOM_ID, &room.room_id)?;
    }
    Ok((bot, room))
}
