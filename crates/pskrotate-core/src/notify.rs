// ── Report notification ──
//
// Posting the report is best-effort: failures are logged and returned as
// `Delivery::Failed`, never as an error, so they cannot be mistaken for a
// failed PSK update.

use std::future::Future;
use std::path::Path;

use pskrotate_api::MessagingClient;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::Room;
use crate::report::ReportPaths;

/// Operations the notification flow needs from the messaging API.
pub trait Messenger {
    /// `Some(user_id)` when the token is accepted, `None` when rejected.
    fn validate_token(&self) -> impl Future<Output = Result<Option<String>, CoreError>> + Send;

    fn create_room(&self, title: &str) -> impl Future<Output = Result<Room, CoreError>> + Send;

    /// `false` when the room did not exist.
    fn delete_room(&self, room_id: &str) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn list_rooms(&self) -> impl Future<Output = Result<Vec<Room>, CoreError>> + Send;

    /// Post `text`, then each attachment as its own message.
    fn send_message(
        &self,
        room_id: &str,
        text: &str,
        attachments: &[&Path],
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn add_member(
        &self,
        room_id: &str,
        user_id: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn is_member(
        &self,
        room_id: &str,
        user_id: &str,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;
}

/// Text sent with each attached report file.
const ATTACHMENT_TEXT: &str = "Attached file";

impl Messenger for MessagingClient {
    async fn validate_token(&self) -> Result<Option<String>, CoreError> {
        match self.get_me().await {
            Ok(person) => Ok(Some(person.id)),
            Err(e) if e.is_auth() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_room(&self, title: &str) -> Result<Room, CoreError> {
        Ok(MessagingClient::create_room(self, title).await?.into())
    }

    async fn delete_room(&self, room_id: &str) -> Result<bool, CoreError> {
        match MessagingClient::delete_room(self, room_id).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, CoreError> {
        let rooms = MessagingClient::list_rooms(self).await?;
        Ok(rooms.into_iter().map(Room::from).collect())
    }

    async fn send_message(
        &self,
        room_id: &str,
        text: &str,
        attachments: &[&Path],
    ) -> Result<(), CoreError> {
        MessagingClient::send_message(self, room_id, text).await?;
        for path in attachments {
            self.send_file(room_id, ATTACHMENT_TEXT, path).await?;
        }
        Ok(())
    }

    async fn add_member(&self, room_id: &str, user_id: &str) -> Result<(), CoreError> {
        self.create_membership(room_id, user_id).await?;
        Ok(())
    }

    async fn is_member(&self, room_id: &str, user_id: &str) -> Result<bool, CoreError> {
        let members = self.list_memberships(room_id).await?;
        Ok(members.iter().any(|m| m.person_id == user_id))
    }
}

// ── Room setup ───────────────────────────────────────────────────────

/// Where the report should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomChoice {
    /// A previously stored room id.
    Existing(String),
    /// Create a new room with this title.
    Create(String),
}

/// The room the report will be posted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRoom {
    pub room_id: String,
    /// `true` when the room was created by this call and its id should be
    /// persisted.
    pub created: bool,
}

/// Resolve the report room and make sure `user_id` is a member of it.
pub async fn ensure_room<M: Messenger>(
    messenger: &M,
    choice: RoomChoice,
    user_id: &str,
) -> Result<ReportRoom, CoreError> {
    let (room_id, created) = match choice {
        RoomChoice::Existing(id) => (id, false),
        RoomChoice::Create(title) => {
            let room = messenger.create_room(&title).await?;
            info!(room = %room.title, id = %room.id, "created room");
            (room.id, true)
        }
    };

    if messenger.is_member(&room_id, user_id).await? {
        debug!(room_id, "operator already in room");
    } else {
        messenger.add_member(&room_id, user_id).await?;
        info!(room_id, "added operator to room");
    }

    Ok(ReportRoom { room_id, created })
}

// ── Report delivery ──────────────────────────────────────────────────

/// What happened when posting a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent { attachments: usize },
    Failed { reason: String },
}

/// Post `title` plus every report file that exists on disk.
///
/// Missing files are logged and skipped. Never returns an error.
pub async fn send_report<M: Messenger>(
    messenger: &M,
    room_id: &str,
    title: &str,
    paths: &ReportPaths,
) -> Delivery {
    let attachments: Vec<&Path> = paths
        .written()
        .filter(|path| {
            let exists = path.is_file();
            if !exists {
                warn!(path = %path.display(), "report file missing, not attaching");
            }
            exists
        })
        .collect();

    match messenger.send_message(room_id, title, &attachments).await {
        Ok(()) => {
            info!(room_id, attachments = attachments.len(), "report sent");
            Delivery::Sent {
                attachments: attachments.len(),
            }
        }
        Err(e) => {
            warn!(room_id, error = %e, "failed to send report");
            Delivery::Failed {
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::{FakeMessenger, MessengerCall};

    #[tokio::test]
    async fn new_room_is_created_and_operator_added() {
        let messenger = FakeMessenger::default();

        let room = ensure_room(&messenger, RoomChoice::Create("PSK Reports".into()), "U1")
            .await
            .unwrap();

        assert_eq!(
            room,
            ReportRoom {
                room_id: "room-PSK Reports".into(),
                created: true,
            }
        );
        assert_eq!(
            messenger.calls(),
            vec![
                MessengerCall::CreateRoom("PSK Reports".into()),
                MessengerCall::AddMember("room-PSK Reports".into(), "U1".into()),
            ]
        );
    }

    #[tokio::test]
    async fn existing_member_is_not_re_added() {
        let messenger = FakeMessenger {
            members: vec![("R1".into(), "U1".into())],
            ..FakeMessenger::default()
        };

        let room = ensure_room(&messenger, RoomChoice::Existing("R1".into()), "U1")
            .await
            .unwrap();

        assert!(!room.created);
        assert!(messenger.calls().is_empty());
    }

    #[tokio::test]
    async fn report_attaches_only_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let written = dir.path().join("successful_psk_changes_1.json");
        std::fs::write(&written, "[]").unwrap();
        let paths = ReportPaths {
            successes: Some(written.clone()),
            failures: Some(dir.path().join("gone.json")),
        };
        let messenger = FakeMessenger::default();

        let delivery = send_report(&messenger, "R1", "PSK Change Report", &paths).await;

        assert_eq!(delivery, Delivery::Sent { attachments: 1 });
        assert_eq!(
            messenger.calls(),
            vec![MessengerCall::Send {
                room_id: "R1".into(),
                text: "PSK Change Report".into(),
                attachments: vec![written],
            }]
        );
    }

    #[tokio::test]
    async fn send_failure_is_reported_not_raised() {
        let messenger = FakeMessenger {
            fail_sends: true,
            ..FakeMessenger::default()
        };

        let delivery = send_report(&messenger, "R1", "PSK Change Report", &ReportPaths::default()).await;

        assert!(matches!(delivery, Delivery::Failed { ref reason } if reason.contains("offline")));
    }

    #[tokio::test]
    async fn empty_report_still_sends_title() {
        let messenger = FakeMessenger::default();

        let delivery = send_report(&messenger, "R1", "PSK Change Report", &ReportPaths::default()).await;

        assert_eq!(delivery, Delivery::Sent { attachments: 0 });
        let calls = messenger.calls();
        assert!(matches!(
            &calls[..],
            [MessengerCall::Send { attachments, .. }] if attachments == &Vec::<PathBuf>::new()
        ));
    }
}
