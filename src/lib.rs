//! Tear down AWS Glacier vaults across regions.
//!
//! For every vault the operator confirms, an inventory retrieval job is started, polled until
//! AWS finishes it (this typically takes hours), and every archive in the resulting listing is
//! deleted. Regions, vaults and archives are independent units of work: a failure in one of them
//! is reported and the sweep continues with the next.

pub mod archive_lister;
pub mod client;
pub mod config;
pub mod confirm;
pub mod error;
pub mod fleet_sweeper;
pub mod glacier_aux;
pub mod regions;
pub mod report;
pub mod retrieval_job;
pub mod types;
pub mod vault_purger;

#[cfg(test)]
mod testing;

pub use client::{get_region_client, Connector, GlacierClient, GlacierConnector, StorageClient};
pub use config::SweepConfig;
pub use confirm::{Confirm, StdinConfirm};
pub use error::SweepError;
pub use fleet_sweeper::FleetSweeper;
pub use regions::{RegionSet, REGION_CATALOG};
pub use report::{print_summary, SweepReport};
pub use retrieval_job::{JobState, RetrievalJob};
pub use types::{ArchiveRef, Credentials, DeletionOutcome, JobId, JobStatus, Region, Vault};
pub use vault_purger::{PurgeSettings, VaultPurger};
