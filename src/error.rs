use thiserror::Error;

use crate::types::{JobId, Region, Vault};

/// Everything that can go wrong while sweeping.
///
/// The variants are grouped by the unit of work they abort:
/// - region: `Auth`, `Network`, `RegionUnavailable`
/// - vault: `JobInitiation`, `JobQuery`, `JobFailed`, `JobOutput`, `MalformedOutput`, `JobNotCompleted`
/// - archive: `Deletion`
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("authentication failed for region {region}: {reason}")]
    Auth { region: Region, reason: String },

    #[error("cannot reach region {region}: {reason}")]
    Network { region: Region, reason: String },

    #[error("region {region} is unavailable: {reason}")]
    RegionUnavailable { region: Region, reason: String },

    #[error("failed to initiate inventory retrieval job for vault {vault}: {reason}")]
    JobInitiation { vault: Vault, reason: String },

    #[error("failed to describe job {job_id} of vault {vault}: {reason}")]
    JobQuery {
        vault: Vault,
        job_id: JobId,
        reason: String,
    },

    #[error("inventory retrieval job {job_id} of vault {vault} failed: {reason}")]
    JobFailed {
        vault: Vault,
        job_id: JobId,
        reason: String,
    },

    #[error("failed to get output of job {job_id} of vault {vault}: {reason}")]
    JobOutput {
        vault: Vault,
        job_id: JobId,
        reason: String,
    },

    #[error("inventory of vault {vault} could not be decoded: {source}")]
    MalformedOutput {
        vault: Vault,
        #[source]
        source: serde_json::Error,
    },

    #[error("job {job_id} of vault {vault} has not completed")]
    JobNotCompleted { vault: Vault, job_id: JobId },

    #[error("failed to delete archive {archive_id} from vault {vault}: {reason}")]
    Deletion {
        vault: Vault,
        archive_id: String,
        reason: String,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SweepError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SweepError::Cancelled)
    }
}

impl From<figment::Error> for SweepError {
    fn from(err: figment::Error) -> Self {
        SweepError::Config(err.to_string())
    }
}
