// ── Bulk PSK rotation ──
//
// Networks are visited one at a time in enumeration order. A failed update
// becomes a Failure outcome for that network only; the run always visits
// every network.

use tracing::{info, warn};

use crate::config::GuestPolicy;
use crate::error::CoreError;
use crate::manager::NetworkManager;
use crate::model::{Network, RunOutcomes, SsidKind, UpdateOutcome};

/// Rotate the guest PSK on every network carrying a guest tag.
///
/// Only listing the organization's networks can fail the whole call; every
/// per-network error is captured as a Failure outcome. A network tagged for
/// both families yields two independent outcomes.
pub async fn update_tagged_networks<M: NetworkManager>(
    manager: &M,
    org_id: &str,
    psk: &str,
    policy: &GuestPolicy,
) -> Result<RunOutcomes, CoreError> {
    let networks = manager.list_networks(org_id).await?;
    info!(org_id, networks = networks.len(), "starting tagged PSK rotation");

    let mut outcomes = RunOutcomes::default();
    for network in &networks {
        for (kind, number) in policy.targets(network) {
            let outcome = match manager.update_ssid_psk(&network.id, number, psk, kind).await {
                Ok(()) => {
                    let outcome = UpdateOutcome::success(network, kind, number);
                    info!("{outcome}");
                    outcome
                }
                Err(e) => {
                    let outcome = UpdateOutcome::failure(network, kind, number, &e);
                    warn!("{outcome}");
                    outcome
                }
            };
            outcomes.push(outcome);
        }
    }

    Ok(outcomes)
}

/// Outcomes of a fleet-wide update by SSID name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByNameOutcomes {
    pub outcomes: RunOutcomes,
    /// Networks that have no SSID with the requested name.
    pub skipped: Vec<Network>,
    /// Networks where the name was found and an update was attempted.
    pub matched: usize,
}

impl ByNameOutcomes {
    /// `true` when no network had an SSID with the requested name. Networks
    /// whose listing failed count as not having it.
    pub fn name_found_nowhere(&self) -> bool {
        self.matched == 0
    }
}

/// Rotate the PSK of the SSID called `ssid_name` in every network that has
/// one.
///
/// Networks lacking the name are skipped rather than failed. Networks whose
/// product types rule out `kind` are not queried at all.
pub async fn update_psk_by_name_across<M: NetworkManager>(
    manager: &M,
    networks: &[Network],
    ssid_name: &str,
    psk: &str,
    kind: SsidKind,
) -> ByNameOutcomes {
    let mut result = ByNameOutcomes::default();

    for network in networks.iter().filter(|n| n.supports(kind)) {
        let number = match manager.list_ssids(&network.id, kind).await {
            Ok(ssids) => ssids.into_iter().find(|s| s.name == ssid_name).map(|s| s.number),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                let outcome = UpdateOutcome::lookup_failure(network, kind, &e);
                warn!("{outcome}");
                result.outcomes.push(outcome);
                continue;
            }
        };

        let Some(number) = number else {
            info!(network = %network.name, ssid = ssid_name, "SSID not present, skipping");
            result.skipped.push(network.clone());
            continue;
        };

        result.matched += 1;
        let outcome = match manager.update_ssid_psk(&network.id, number, psk, kind).await {
            Ok(()) => UpdateOutcome::success(network, kind, number),
            Err(e) => UpdateOutcome::failure(network, kind, number, &e),
        };
        info!("{outcome}");
        result.outcomes.push(outcome);
    }

    if result.name_found_nowhere() {
        warn!(ssid = ssid_name, "SSID name not found in any network");
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::OutcomeStatus;
    use crate::testing::{Call, FakeManager, network, ssid};

    const PSK: &str = "Summer2024!";

    #[tokio::test]
    async fn only_tagged_networks_produce_outcomes() {
        let manager = FakeManager::with_networks(vec![
            network("A", &["Corp"]),
            network("B", &["MX-GuestPSK"]),
            network("C", &[]),
            network("D", &["Test", "mx-guestpsk"]),
        ]);

        let run = update_tagged_networks(&manager, "O1", PSK, &GuestPolicy::default())
            .await
            .unwrap();

        assert_eq!(run.total(), 1);
        assert!(run.iter().all(|o| o.network_id == "B"));
        assert_eq!(manager.updates().len(), 1);
    }

    #[tokio::test]
    async fn both_tags_produce_two_outcomes() {
        let manager =
            FakeManager::with_networks(vec![network("N1", &["MXW-GuestPSK", "MX-GuestPSK"])]);

        let run = update_tagged_networks(&manager, "O1", PSK, &GuestPolicy::default())
            .await
            .unwrap();

        assert_eq!(run.successes.len(), 2);
        assert_eq!(run.successes[0].kind, SsidKind::Wireless);
        assert_eq!(run.successes[1].kind, SsidKind::Appliance);
    }

    #[tokio::test]
    async fn one_failure_does_not_affect_other_networks() {
        let manager = FakeManager::with_networks(vec![
            network("N1", &["MX-GuestPSK"]),
            network("N2", &["MX-GuestPSK"]),
            network("N3", &["MXW-GuestPSK"]),
        ])
        .failing_on("N2");

        let run = update_tagged_networks(&manager, "O1", PSK, &GuestPolicy::default())
            .await
            .unwrap();

        let ok: Vec<_> = run.successes.iter().map(|o| o.network_id.as_str()).collect();
        assert_eq!(ok, vec!["N1", "N3"]);
        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].network_id, "N2");
        assert_eq!(run.failures[0].status, OutcomeStatus::Failure);
        assert!(run.failures[0].message.contains("simulated outage"));
        // N3 was still attempted after N2 failed.
        assert_eq!(manager.updates().len(), 3);
    }

    #[tokio::test]
    async fn guest_scenario_updates_slot_two_per_family() {
        let manager = FakeManager::with_networks(vec![
            network("N1", &["MX-GuestPSK"]),
            network("N2", &["MXW-GuestPSK"]),
            network("N3", &[]),
        ]);

        let run = update_tagged_networks(&manager, "O1", PSK, &GuestPolicy::default())
            .await
            .unwrap();

        assert!(run.failures.is_empty());
        let got: Vec<_> = run
            .successes
            .iter()
            .map(|o| (o.network_id.as_str(), o.kind, o.ssid_number))
            .collect();
        assert_eq!(
            got,
            vec![("N1", SsidKind::Wireless, Some(2)), ("N2", SsidKind::Appliance, Some(2))]
        );
        assert!(run.iter().all(|o| o.network_id != "N3"));
        assert_eq!(
            manager.calls(),
            vec![
                Call::ListNetworks("O1".into()),
                Call::Update {
                    network_id: "N1".into(),
                    number: 2,
                    psk: PSK.into(),
                    kind: SsidKind::Wireless,
                },
                Call::Update {
                    network_id: "N2".into(),
                    number: 2,
                    psk: PSK.into(),
                    kind: SsidKind::Appliance,
                },
            ]
        );
    }

    #[tokio::test]
    async fn custom_policy_changes_tags_and_slots() {
        let manager = FakeManager::with_networks(vec![network("N1", &["guest-mr"])]);
        let policy = GuestPolicy {
            wireless_tag: "guest-mr".into(),
            appliance_tag: "guest-mx".into(),
            wireless_number: 4,
            appliance_number: 3,
        };

        let run = update_tagged_networks(&manager, "O1", PSK, &policy)
            .await
            .unwrap();

        assert_eq!(run.successes[0].ssid_number, Some(4));
    }

    #[tokio::test]
    async fn by_name_across_skips_networks_without_the_name() {
        let manager = FakeManager::with_networks(Vec::new())
            .with_ssids("N1", SsidKind::Wireless, vec![ssid(0, "Corp"), ssid(3, "Guest")])
            .with_ssids("N2", SsidKind::Wireless, vec![ssid(0, "Corp")]);
        let networks = vec![network("N1", &[]), network("N2", &[])];

        let result =
            update_psk_by_name_across(&manager, &networks, "Guest", PSK, SsidKind::Wireless).await;

        assert_eq!(result.outcomes.successes.len(), 1);
        assert_eq!(result.outcomes.successes[0].ssid_number, Some(3));
        assert!(result.outcomes.failures.is_empty());
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].id, "N2");
        assert!(!result.name_found_nowhere());
    }

    #[tokio::test]
    async fn by_name_across_reports_name_found_nowhere() {
        let manager = FakeManager::with_networks(Vec::new());
        let networks = vec![network("N1", &[])];

        let result =
            update_psk_by_name_across(&manager, &networks, "Guest", PSK, SsidKind::Appliance).await;

        assert!(result.name_found_nowhere());
        assert!(manager.updates().is_empty());
    }

    #[tokio::test]
    async fn by_name_across_ignores_networks_without_the_product() {
        let manager = FakeManager::with_networks(Vec::new())
            .with_ssids("N1", SsidKind::Appliance, vec![ssid(2, "Guest")]);
        let mut switch_only = network("N1", &[]);
        switch_only.product_types = vec!["switch".into()];

        let result = update_psk_by_name_across(
            &manager,
            &[switch_only],
            "Guest",
            PSK,
            SsidKind::Appliance,
        )
        .await;

        assert!(result.outcomes.is_empty());
        assert!(result.skipped.is_empty());
        assert!(manager.calls().is_empty());
    }

    #[tokio::test]
    async fn by_name_across_skips_networks_that_are_gone() {
        let manager = FakeManager::with_networks(Vec::new())
            .with_ssids("N2", SsidKind::Wireless, vec![ssid(1, "Guest")])
            .listing_fails_on("N1", 404);
        let networks = vec![network("N1", &[]), network("N2", &[])];

        let result =
            update_psk_by_name_across(&manager, &networks, "Guest", PSK, SsidKind::Wireless).await;

        assert!(result.outcomes.failures.is_empty());
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].id, "N1");
        assert_eq!(result.matched, 1);
        assert_eq!(manager.updates().len(), 1);
    }

    #[tokio::test]
    async fn by_name_across_listing_error_is_a_failure_without_slot() {
        let manager = FakeManager::with_networks(Vec::new())
            .with_ssids("N2", SsidKind::Wireless, vec![ssid(1, "Guest")])
            .listing_fails_on("N1", 500);
        let networks = vec![network("N1", &[]), network("N2", &[])];

        let result =
            update_psk_by_name_across(&manager, &networks, "Guest", PSK, SsidKind::Wireless).await;

        assert_eq!(result.outcomes.failures.len(), 1);
        let failure = &result.outcomes.failures[0];
        assert_eq!(failure.network_id, "N1");
        assert_eq!(failure.ssid_number, None);
        assert!(failure.message.contains("simulated listing outage"));
        assert!(!failure.message.contains("SSID number"));
        // N2 was still updated after N1's listing failed.
        assert_eq!(result.outcomes.successes.len(), 1);
        assert!(result.skipped.is_empty());
        assert!(!result.name_found_nowhere());
    }

    #[tokio::test]
    async fn by_name_across_all_listings_failing_means_name_found_nowhere() {
        let manager = FakeManager::with_networks(Vec::new())
            .listing_fails_on("N1", 500)
            .listing_fails_on("N2", 503);
        let networks = vec![network("N1", &[]), network("N2", &[])];

        let result =
            update_psk_by_name_across(&manager, &networks, "Guest", PSK, SsidKind::Wireless).await;

        assert_eq!(result.outcomes.failures.len(), 2);
        assert!(result.name_found_nowhere());
        assert!(manager.updates().is_empty());
    }
}
