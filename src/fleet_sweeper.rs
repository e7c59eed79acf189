use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    client::{Connector, StorageClient},
    confirm::Confirm,
    regions::RegionSet,
    report::{RegionOutcome, RegionReport, SweepReport, VaultOutcome, VaultReport},
    types::{Credentials, Region, Vault},
    vault_purger::{Deletions, PurgeSettings, VaultPurger}};

/// Walks regions and vaults one at a time and purges every vault the operator confirms.
///
/// Failures never leave the unit of work they occur in: a broken region is skipped, a broken
/// vault is reported and the sweep moves on to the next one.
pub struct FleetSweeper<C, P> {
    connector: C,
    credentials: Credentials,
    confirm: P,
    settings: PurgeSettings,
    cancel: CancellationToken,
}

impl<C: Connector, P: Confirm> FleetSweeper<C, P> {
    pub fn new(connector: C, credentials: Credentials, confirm: P, settings: PurgeSettings, cancel: CancellationToken) -> Self {
        Self {
            connector,
            credentials,
            confirm,
            settings,
            cancel,
        }
    }

    pub async fn sweep(&mut self, regions: &RegionSet) -> SweepReport {
        let mut report = SweepReport::default();

        for region in regions.regions() {
            if self.cancel.is_cancelled() {
                break;
            }
            let outcome = self.sweep_region(&region).await;
            report.regions.push(RegionReport { region, outcome });
        }

        report.cancelled = self.cancel.is_cancelled();
        report
    }

    async fn sweep_region(&mut self, region: &Region) -> RegionOutcome {
        println!("Scanning for Glacier Vaults in region {}", region.to_string().green().bold());

        // one client per region, dropped when the region is done
        let client = match self.connector.connect(region, &self.credentials).await {
            Ok(client) => client,
            Err(err) => {
                warn!("Skipping region {region}: {err}");
                return RegionOutcome::Skipped(err);
            }
        };

        let vaults = match client.list_vaults().await {
            Ok(vaults) => vaults,
            Err(err) => {
                warn!("Skipping region {region}: {err}");
                return RegionOutcome::Skipped(err);
            }
        };
        if vaults.is_empty() {
            info!("No vaults found in region {}", client.region());
        }

        let mut reports = Vec::with_capacity(vaults.len());
        for vault in vaults {
            let answer = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                confirmed = self.confirm.confirm(&vault) => Some(confirmed),
            };
            let Some(confirmed) = answer else {
                break;
            };

            if !confirmed {
                info!("Keeping vault {vault}");
                reports.push(VaultReport {
                    vault,
                    outcome: VaultOutcome::Declined,
                });
                continue;
            }

            println!("{}", format!("Vault {} in region {} marked for deletion.", vault.name, vault.region).green());
            let outcome = self.purge_vault(client.as_ref(), &vault).await;
            reports.push(VaultReport { vault, outcome });
        }

        RegionOutcome::Scanned(reports)
    }

    async fn purge_vault(&self, client: &dyn StorageClient, vault: &Vault) -> VaultOutcome {
        let purger = VaultPurger::new(client, self.settings.clone(), self.cancel.clone());
        match purger.purge(vault).await {
            Ok(Deletions::Complete(outcomes)) => VaultOutcome::Purged(outcomes),
            Ok(Deletions::Interrupted(outcomes)) => VaultOutcome::Interrupted(outcomes),
            Err(err) => {
                warn!("Purge of vault {vault} aborted: {err}");
                VaultOutcome::Failed(err)
            }
        }
    }
}
