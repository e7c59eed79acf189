use colored::Colorize;

use crate::{
    error::SweepError,
    types::{DeletionOutcome, Region, Vault}};

#[derive(Debug)]
pub enum VaultOutcome {
    /// the operator did not answer "y"
    Declined,
    Purged(Vec<DeletionOutcome>),
    /// cancelled while deleting, holds the outcomes of the archives attempted so far
    Interrupted(Vec<DeletionOutcome>),
    Failed(SweepError),
}

#[derive(Debug)]
pub struct VaultReport {
    pub vault: Vault,
    pub outcome: VaultOutcome,
}

#[derive(Debug)]
pub enum RegionOutcome {
    Skipped(SweepError),
    Scanned(Vec<VaultReport>),
}

#[derive(Debug)]
pub struct RegionReport {
    pub region: Region,
    pub outcome: RegionOutcome,
}

/// Everything a sweep did, region by region and vault by vault.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub regions: Vec<RegionReport>,
    pub cancelled: bool,
}

impl SweepReport {
    pub fn vaults(&self) -> impl Iterator<Item = &VaultReport> {
        self.regions.iter().flat_map(|region| match &region.outcome {
            RegionOutcome::Scanned(vaults) => vaults.as_slice(),
            RegionOutcome::Skipped(_) => &[][..],
        })
    }

    fn outcomes(&self) -> impl Iterator<Item = &DeletionOutcome> {
        self.vaults().flat_map(|vault| match &vault.outcome {
            VaultOutcome::Purged(outcomes) | VaultOutcome::Interrupted(outcomes) => outcomes.as_slice(),
            VaultOutcome::Declined | VaultOutcome::Failed(_) => &[][..],
        })
    }

    pub fn skipped_regions(&self) -> usize {
        self.regions
            .iter()
            .filter(|r| matches!(r.outcome, RegionOutcome::Skipped(_)))
            .count()
    }

    pub fn failed_vaults(&self) -> usize {
        self.vaults()
            .filter(|v| matches!(&v.outcome, VaultOutcome::Failed(err) if !err.is_cancelled()))
            .count()
    }

    pub fn purged_vaults(&self) -> usize {
        self.vaults()
            .filter(|v| matches!(v.outcome, VaultOutcome::Purged(_)))
            .count()
    }

    pub fn interrupted_vaults(&self) -> usize {
        self.vaults()
            .filter(|v| matches!(v.outcome, VaultOutcome::Interrupted(_)))
            .count()
    }

    pub fn deleted_archives(&self) -> usize {
        self.outcomes().filter(|o| o.success).count()
    }

    pub fn failed_deletions(&self) -> usize {
        self.outcomes().filter(|o| !o.success).count()
    }

    /// bytes freed, as far as the inventories reported sizes
    pub fn reclaimed_bytes(&self) -> u64 {
        self.outcomes().filter(|o| o.success).filter_map(|o| o.size).sum()
    }

    /// Skipped regions do not count as failures.
    pub fn has_failures(&self) -> bool {
        self.failed_vaults() > 0 || self.failed_deletions() > 0
    }
}

/// Print the per-vault results followed by the totals.
pub fn print_summary(report: &SweepReport) {
    println!("\n{}", "Sweep summary".bold());

    for region in &report.regions {
        match &region.outcome {
            RegionOutcome::Skipped(err) => {
                println!("{}", format!("  {}: skipped ({err})", region.region).yellow());
            }
            RegionOutcome::Scanned(vaults) if vaults.is_empty() => {
                println!("  {}: no vaults", region.region);
            }
            RegionOutcome::Scanned(vaults) => {
                println!("  {}:", region.region.to_string().green().bold());
                for vault in vaults {
                    print_vault(vault);
                }
            }
        }
    }

    println!(
        "\n  {} vault(s) purged, {} archive(s) deleted ({} bytes), {} deletion(s) failed, {} vault(s) failed, {} region(s) skipped",
        report.purged_vaults(),
        report.deleted_archives(),
        report.reclaimed_bytes(),
        report.failed_deletions(),
        report.failed_vaults(),
        report.skipped_regions()
    );
    if report.cancelled {
        println!("{}", "  Sweep was interrupted before all regions were processed.".yellow().bold());
        if report.interrupted_vaults() > 0 {
            println!("{}", format!("  {} vault(s) are only partially emptied.", report.interrupted_vaults()).yellow());
        }
    }
}

fn print_vault(vault: &VaultReport) {
    let name = &vault.vault.name;
    match &vault.outcome {
        VaultOutcome::Declined => println!("    {name}: kept"),
        VaultOutcome::Failed(err) => println!("    {}", format!("{name}: {err}").red()),
        VaultOutcome::Purged(outcomes) | VaultOutcome::Interrupted(outcomes) => {
            let failed: Vec<_> = outcomes.iter().filter(|o| !o.success).collect();
            let deleted = outcomes.len() - failed.len();
            if matches!(vault.outcome, VaultOutcome::Interrupted(_)) {
                println!("    {}", format!("{name}: interrupted, {deleted} archive(s) deleted before the stop").yellow());
            } else {
                println!("    {name}: {deleted} of {} archive(s) deleted", outcomes.len());
            }
            for outcome in failed {
                println!(
                    "      {}",
                    format!(
                        "{}: {}",
                        outcome.archive_id,
                        outcome.error_detail.as_deref().unwrap_or("unknown error")
                    )
                    .red()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArchiveRef;

    fn archive(vault: &Vault, id: &str, size: Option<u64>) -> ArchiveRef {
        ArchiveRef {
            vault: vault.clone(),
            archive_id: id.to_string(),
            size,
        }
    }

    fn sample() -> SweepReport {
        let east = Region::new("us-east-1");
        let photos = Vault::new(east.clone(), "photos");
        let logs = Vault::new(east.clone(), "logs");
        let scratch = Vault::new(east.clone(), "scratch");

        SweepReport {
            regions: vec![
                RegionReport {
                    region: Region::new("me-south-1"),
                    outcome: RegionOutcome::Skipped(SweepError::RegionUnavailable {
                        region: Region::new("me-south-1"),
                        reason: "opt-in region".into(),
                    }),
                },
                RegionReport {
                    region: east,
                    outcome: RegionOutcome::Scanned(vec![
                        VaultReport {
                            outcome: VaultOutcome::Purged(vec![
                                DeletionOutcome::succeeded(&archive(&photos, "p1", Some(100))),
                                DeletionOutcome::failed(&archive(&photos, "p2", Some(50)), "throttled"),
                                DeletionOutcome::succeeded(&archive(&photos, "p3", None)),
                            ]),
                            vault: photos,
                        },
                        VaultReport {
                            outcome: VaultOutcome::Failed(SweepError::JobInitiation {
                                vault: logs.clone(),
                                reason: "ResourceNotFoundException".into(),
                            }),
                            vault: logs,
                        },
                        VaultReport {
                            vault: scratch,
                            outcome: VaultOutcome::Declined,
                        },
                    ]),
                },
            ],
            cancelled: false,
        }
    }

    #[test]
    fn totals_count_every_unit_of_work() {
        let report = sample();

        assert_eq!(report.skipped_regions(), 1);
        assert_eq!(report.vaults().count(), 3);
        assert_eq!(report.purged_vaults(), 1);
        assert_eq!(report.failed_vaults(), 1);
        assert_eq!(report.deleted_archives(), 2);
        assert_eq!(report.failed_deletions(), 1);
        assert_eq!(report.reclaimed_bytes(), 100);
        assert!(report.has_failures());
    }

    #[test]
    fn declined_vaults_are_not_failures() {
        let region = Region::new("eu-west-3");
        let report = SweepReport {
            regions: vec![RegionReport {
                region: region.clone(),
                outcome: RegionOutcome::Scanned(vec![VaultReport {
                    vault: Vault::new(region, "keep-me"),
                    outcome: VaultOutcome::Declined,
                }]),
            }],
            cancelled: false,
        };

        assert!(!report.has_failures());
        assert_eq!(report.purged_vaults(), 0);
    }

    #[test]
    fn interrupted_vault_still_counts_its_deletions() {
        let region = Region::new("eu-north-1");
        let vault = Vault::new(region.clone(), "half-done");
        let report = SweepReport {
            regions: vec![RegionReport {
                region,
                outcome: RegionOutcome::Scanned(vec![VaultReport {
                    outcome: VaultOutcome::Interrupted(vec![
                        DeletionOutcome::succeeded(&archive(&vault, "h1", Some(4096))),
                        DeletionOutcome::succeeded(&archive(&vault, "h2", Some(1024))),
                    ]),
                    vault,
                }]),
            }],
            cancelled: true,
        };

        assert_eq!(report.interrupted_vaults(), 1);
        assert_eq!(report.deleted_archives(), 2);
        assert_eq!(report.reclaimed_bytes(), 5120);
        assert_eq!(report.purged_vaults(), 0);
        assert_eq!(report.failed_vaults(), 0);
        assert!(!report.has_failures());
    }

    #[test]
    fn skipped_region_alone_is_not_a_failure() {
        let region = Region::new("af-south-1");
        let report = SweepReport {
            regions: vec![RegionReport {
                region: region.clone(),
                outcome: RegionOutcome::Skipped(SweepError::RegionUnavailable {
                    region,
                    reason: "UnrecognizedClientException".into(),
                }),
            }],
            cancelled: false,
        };

        assert_eq!(report.skipped_regions(), 1);
        assert!(!report.has_failures());
    }
}
