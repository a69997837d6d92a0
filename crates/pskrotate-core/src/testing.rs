// In-memory capability fakes for unit tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::CoreError;
use crate::manager::NetworkManager;
use crate::model::{Network, Organization, Room, Ssid, SsidKind};
use crate::notify::Messenger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    ListNetworks(String),
    ListSsids(String, SsidKind),
    GetSsid(String, u8, SsidKind),
    Update {
        network_id: String,
        number: u8,
        psk: String,
        kind: SsidKind,
    },
}

pub(crate) fn network(id: &str, tags: &[&str]) -> Network {
    Network {
        id: id.into(),
        name: format!("Network {id}"),
        tags: tags.iter().map(ToString::to_string).collect(),
        product_types: Vec::new(),
    }
}

pub(crate) fn ssid(number: u8, name: &str) -> Ssid {
    Ssid {
        number,
        name: name.into(),
        enabled: true,
        auth_mode: Some("psk".into()),
    }
}

#[derive(Default)]
pub(crate) struct FakeManager {
    pub orgs: Vec<Organization>,
    pub networks: Vec<Network>,
    pub ssids: HashMap<(String, SsidKind), Vec<Ssid>>,
    /// Network ids whose update calls fail.
    pub failing: HashSet<String>,
    /// Network ids whose SSID listing fails, with the HTTP status to report.
    pub listing_errors: HashMap<String, u16>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeManager {
    pub fn with_networks(networks: Vec<Network>) -> Self {
        Self {
            networks,
            ..Self::default()
        }
    }

    pub fn with_ssids(mut self, network_id: &str, kind: SsidKind, ssids: Vec<Ssid>) -> Self {
        self.ssids.insert((network_id.into(), kind), ssids);
        self
    }

    pub fn failing_on(mut self, network_id: &str) -> Self {
        self.failing.insert(network_id.into());
        self
    }

    pub fn listing_fails_on(mut self, network_id: &str, status: u16) -> Self {
        self.listing_errors.insert(network_id.into(), status);
        self
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn updates(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Update { .. }))
            .collect()
    }
}

impl NetworkManager for FakeManager {
    async fn list_organizations(&self) -> Result<Vec<Organization>, CoreError> {
        Ok(self.orgs.clone())
    }

    async fn list_networks(&self, org_id: &str) -> Result<Vec<Network>, CoreError> {
        self.record(Call::ListNetworks(org_id.into()));
        Ok(self.networks.clone())
    }

    async fn list_ssids(&self, network_id: &str, kind: SsidKind) -> Result<Vec<Ssid>, CoreError> {
        self.record(Call::ListSsids(network_id.into(), kind));
        match self.listing_errors.get(network_id).copied() {
            Some(404) => {
                return Err(CoreError::NotFound {
                    entity_type: "network".into(),
                    identifier: network_id.into(),
                });
            }
            Some(status) => {
                return Err(CoreError::Api {
                    message: "simulated listing outage".into(),
                    status: Some(status),
                });
            }
            None => {}
        }
        Ok(self
            .ssids
            .get(&(network_id.to_owned(), kind))
            .cloned()
            .unwrap_or_default())
    }

    async fn get_ssid(&self, network_id: &str, number: u8, kind: SsidKind) -> Result<Ssid, CoreError> {
        self.record(Call::GetSsid(network_id.into(), number, kind));
        self.ssids
            .get(&(network_id.to_owned(), kind))
            .and_then(|list| list.iter().find(|s| s.number == number))
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity_type: "ssid".into(),
                identifier: format!("{network_id}/{number}"),
            })
    }

    async fn update_ssid_psk(
        &self,
        network_id: &str,
        number: u8,
        psk: &str,
        kind: SsidKind,
    ) -> Result<(), CoreError> {
        self.record(Call::Update {
            network_id: network_id.into(),
            number,
            psk: psk.into(),
            kind,
        });
        if self.failing.contains(network_id) {
            return Err(CoreError::Api {
                message: "simulated outage".into(),
                status: Some(500),
            });
        }
        Ok(())
    }
}

// ── Messaging ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MessengerCall {
    CreateRoom(String),
    AddMember(String, String),
    Send {
        room_id: String,
        text: String,
        attachments: Vec<PathBuf>,
    },
}

#[derive(Default)]
pub(crate) struct FakeMessenger {
    pub user_id: Option<String>,
    pub members: Vec<(String, String)>,
    pub fail_sends: bool,
    pub calls: Mutex<Vec<MessengerCall>>,
}

impl FakeMessenger {
    fn record(&self, call: MessengerCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    pub fn calls(&self) -> Vec<MessengerCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Messenger for FakeMessenger {
    async fn validate_token(&self) -> Result<Option<String>, CoreError> {
        Ok(self.user_id.clone())
    }

    async fn create_room(&self, title: &str) -> Result<Room, CoreError> {
        self.record(MessengerCall::CreateRoom(title.into()));
        Ok(Room {
            id: format!("room-{title}"),
            title: title.into(),
            created: None,
        })
    }

    async fn delete_room(&self, _room_id: &str) -> Result<bool, CoreError> {
        Ok(true)
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, CoreError> {
        Ok(Vec::new())
    }

    async fn send_message(
        &self,
        room_id: &str,
        text: &str,
        attachments: &[&Path],
    ) -> Result<(), CoreError> {
        self.record(MessengerCall::Send {
            room_id: room_id.into(),
            text: text.into(),
            attachments: attachments.iter().map(|p| p.to_path_buf()).collect(),
        });
        if self.fail_sends {
            return Err(CoreError::ConnectionFailed {
                url: "fake".into(),
                reason: "offline".into(),
            });
        }
        Ok(())
    }

    async fn add_member(&self, room_id: &str, user_id: &str) -> Result<(), CoreError> {
        self.record(MessengerCall::AddMember(room_id.into(), user_id.into()));
        Ok(())
    }

    async fn is_member(&self, room_id: &str, user_id: &str) -> Result<bool, CoreError> {
        Ok(self
            .members
            .iter()
            .any(|(r, u)| r == room_id && u == user_id))
    }
}
