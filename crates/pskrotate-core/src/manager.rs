// ── Network management capability ──
//
// The workflow is generic over `NetworkManager` so it can run against the
// real dashboard client or an in-memory fake.

use std::future::Future;

use pskrotate_api::DashboardClient;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{Network, Organization, Ssid, SsidKind};

/// Operations the PSK workflows need from the network management API.
pub trait NetworkManager {
    fn list_organizations(&self)
    -> impl Future<Output = Result<Vec<Organization>, CoreError>> + Send;

    /// Every network in the organization (pagination handled below this layer).
    fn list_networks(
        &self,
        org_id: &str,
    ) -> impl Future<Output = Result<Vec<Network>, CoreError>> + Send;

    fn list_ssids(
        &self,
        network_id: &str,
        kind: SsidKind,
    ) -> impl Future<Output = Result<Vec<Ssid>, CoreError>> + Send;

    fn get_ssid(
        &self,
        network_id: &str,
        number: u8,
        kind: SsidKind,
    ) -> impl Future<Output = Result<Ssid, CoreError>> + Send;

    fn update_ssid_psk(
        &self,
        network_id: &str,
        number: u8,
        psk: &str,
        kind: SsidKind,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl NetworkManager for DashboardClient {
    async fn list_organizations(&self) -> Result<Vec<Organization>, CoreError> {
        let orgs = DashboardClient::list_organizations(self).await?;
        Ok(orgs.into_iter().map(Organization::from).collect())
    }

    async fn list_networks(&self, org_id: &str) -> Result<Vec<Network>, CoreError> {
        let networks = DashboardClient::list_networks(self, org_id).await?;
        debug!(org_id, count = networks.len(), "listed networks");
        Ok(networks.into_iter().map(Network::from).collect())
    }

    async fn list_ssids(&self, network_id: &str, kind: SsidKind) -> Result<Vec<Ssid>, CoreError> {
        let ssids = match kind {
            SsidKind::Wireless => self
                .list_wireless_ssids(network_id)
                .await?
                .into_iter()
                .map(Ssid::from)
                .collect(),
            SsidKind::Appliance => self
                .list_appliance_ssids(network_id)
                .await?
                .into_iter()
                .map(Ssid::from)
                .collect(),
        };
        Ok(ssids)
    }

    async fn get_ssid(&self, network_id: &str, number: u8, kind: SsidKind) -> Result<Ssid, CoreError> {
        let ssid: Ssid = match kind {
            SsidKind::Wireless => self.get_wireless_ssid(network_id, number).await?.into(),
            SsidKind::Appliance => self.get_appliance_ssid(network_id, number).await?.into(),
        };
        Ok(ssid)
    }

    async fn update_ssid_psk(
        &self,
        network_id: &str,
        number: u8,
        psk: &str,
        kind: SsidKind,
    ) -> Result<(), CoreError> {
        match kind {
            SsidKind::Wireless => {
                self.update_wireless_ssid_psk(network_id, number, psk).await?;
            }
            SsidKind::Appliance => {
                self.update_appliance_ssid_psk(network_id, number, psk).await?;
            }
        }
        Ok(())
    }
}
