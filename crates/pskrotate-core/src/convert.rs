// ── API → domain conversions ──

use pskrotate_api::dashboard_types::{
    ApplianceSsidResponse, NetworkResponse, OrganizationResponse, WirelessSsidResponse,
};
use pskrotate_api::messaging_types::RoomResponse;

use crate::model::{Network, Organization, Room, Ssid};

impl From<OrganizationResponse> for Organization {
    fn from(org: OrganizationResponse) -> Self {
        Self {
            id: org.id,
            name: org.name,
        }
    }
}

impl From<NetworkResponse> for Network {
    fn from(net: NetworkResponse) -> Self {
        Self {
            id: net.id,
            name: net.name,
            tags: net.tags,
            product_types: net.product_types,
        }
    }
}

impl From<WirelessSsidResponse> for Ssid {
    fn from(ssid: WirelessSsidResponse) -> Self {
        Self {
            number: ssid.number,
            name: ssid.name,
            enabled: ssid.enabled,
            auth_mode: ssid.auth_mode,
        }
    }
}

impl From<ApplianceSsidResponse> for Ssid {
    fn from(ssid: ApplianceSsidResponse) -> Self {
        Self {
            number: ssid.number,
            name: ssid.name,
            enabled: ssid.enabled,
            auth_mode: ssid.auth_mode,
        }
    }
}

impl From<RoomResponse> for Room {
    fn from(room: RoomResponse) -> Self {
        Self {
            id: room.id,
            title: room.title,
            created: room.created,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn network_keeps_tag_order() {
        let raw: NetworkResponse = serde_json::from_value(serde_json::json!({
            "id": "N_1",
            "name": "Store 1",
            "organizationId": "O1",
            "productTypes": ["appliance", "wireless"],
            "tags": ["MXW-GuestPSK", "MX-GuestPSK"],
            "timeZone": "America/Chicago"
        }))
        .unwrap();

        let net = Network::from(raw);
        assert_eq!(net.tags, vec!["MXW-GuestPSK", "MX-GuestPSK"]);
        assert_eq!(net.product_types, vec!["appliance", "wireless"]);
    }

    #[test]
    fn appliance_ssid_maps_number_and_name() {
        let raw: ApplianceSsidResponse = serde_json::from_value(serde_json::json!({
            "number": 2,
            "name": "Guest",
            "enabled": true,
            "authMode": "psk",
            "wpaEncryptionMode": "WPA2 only"
        }))
        .unwrap();

        let ssid = Ssid::from(raw);
        assert_eq!(ssid.number, 2);
        assert_eq!(ssid.name, "Guest");
        assert_eq!(ssid.auth_mode.as_deref(), Some("psk"));
    }
}
