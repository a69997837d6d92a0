// ── Single-network SSID operations ──
//
// Unlike the fleet-wide by-name path, a missing SSID name here is a hard
// error.

use tracing::info;

use crate::error::CoreError;
use crate::manager::NetworkManager;
use crate::model::{SsidKind, SsidUpdate};

/// Set the PSK of SSID slot `number` and read the SSID back.
pub async fn update_psk_by_number<M: NetworkManager>(
    manager: &M,
    network_id: &str,
    number: u8,
    psk: &str,
    kind: SsidKind,
) -> Result<SsidUpdate, CoreError> {
    manager.update_ssid_psk(network_id, number, psk, kind).await?;
    let ssid = manager.get_ssid(network_id, number, kind).await?;

    let confirmation = format!(
        "Updated PSK for {} SSID '{}' (number {}) in network {network_id}",
        kind.label(),
        ssid.name,
        ssid.number
    );
    info!("{confirmation}");

    Ok(SsidUpdate {
        network_id: network_id.to_owned(),
        kind,
        ssid,
        confirmation,
    })
}

/// Resolve `ssid_name` to its slot number by exact match, then update it.
///
/// Fails with [`CoreError::SsidNotFound`] before any mutating call when the
/// network has no SSID with that name.
pub async fn update_psk_by_name<M: NetworkManager>(
    manager: &M,
    network_id: &str,
    ssid_name: &str,
    psk: &str,
    kind: SsidKind,
) -> Result<SsidUpdate, CoreError> {
    let number = resolve_ssid_number(manager, network_id, ssid_name, kind).await?;
    update_psk_by_number(manager, network_id, number, psk, kind).await
}

/// Slot number of the SSID named `ssid_name` in one network.
pub async fn resolve_ssid_number<M: NetworkManager>(
    manager: &M,
    network_id: &str,
    ssid_name: &str,
    kind: SsidKind,
) -> Result<u8, CoreError> {
    manager
        .list_ssids(network_id, kind)
        .await?
        .into_iter()
        .find(|s| s.name == ssid_name)
        .map(|s| s.number)
        .ok_or_else(|| CoreError::SsidNotFound {
            network_id: network_id.to_owned(),
            name: ssid_name.to_owned(),
        })
}
