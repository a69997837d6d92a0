//! Webex room command handlers.

use tabled::Tabled;

use pskrotate_core::{Messenger, Room};

use super::{Context, credentials, util};
use crate::cli::{RoomsArgs, RoomsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Room> for RoomRow {
    fn from(r: &Room) -> Self {
        Self {
            id: r.id.clone(),
            title: r.title.clone(),
            created: r.created.clone().unwrap_or_else(|| "-".into()),
        }
    }
}

pub async fn handle(ctx: &mut Context, args: RoomsArgs) -> Result<(), CliError> {
    let bot = credentials::bot(ctx).await?;

    match args.command {
        RoomsCommand::List => {
            let rooms = Messenger::list_rooms(&bot).await?;
            let out = output::render_list(ctx.output, &rooms, |r| RoomRow::from(r), |r| r.id.clone());
            ctx.print(&out);
            Ok(())
        }

        RoomsCommand::Create { title } => {
            let room = Messenger::create_room(&bot, &title).await?;
            let out = output::render_single(
                ctx.output,
                &room,
                |r| format!("Created room '{}' ({})", r.title, r.id),
                |r| r.id.clone(),
            );
            ctx.print(&out);
            Ok(())
        }

        RoomsCommand::Delete { room_id } => {
            if !util::confirm(ctx, &format!("Delete room {room_id}?"), "rooms delete")? {
                ctx.status("Aborted.");
                return Ok(());
            }
            if !Messenger::delete_room(&bot, &room_id).await? {
                return Err(CliError::NotFound {
                    resource_type: "room".into(),
                    identifier: room_id,
                    list_command: "rooms list".into(),
                });
            }
            ctx.status(&output::ok(&format!("Deleted room {room_id}"), ctx.color));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_creation_time_renders_dash() {
        let room = Room {
            id: "R1".into(),
            title: "PSK Change Report".into(),
            created: None,
        };
        let row = RoomRow::from(&room);
        assert_eq!(row.created, "-");
        assert_eq!(row.title, "PSK Change Report");
    }
}
