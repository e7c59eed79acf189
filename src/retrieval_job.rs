use tracing::debug;

use crate::{
    archive_lister,
    client::StorageClient,
    error::SweepError,
    types::{ArchiveRef, JobId, Vault}};

/// Lifecycle of an inventory retrieval job.
///
/// `Requested` -> (poll) -> `Pending` | `Completed` | `Failed`.
/// `Completed` and `Failed` are terminal, a terminal job is never polled again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Requested,
    Pending,
    Completed,
    Failed(String),
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed(_))
    }
}

/// One in-flight "build an inventory" request for a single vault. Lives in memory only.
#[derive(Debug)]
pub struct RetrievalJob {
    vault: Vault,
    job_id: JobId,
    state: JobState,
    polls: u32,
}

impl RetrievalJob {
    /// Ask the service to start an inventory of `vault`.
    pub async fn initiate(client: &dyn StorageClient, vault: &Vault) -> Result<Self, SweepError> {
        let job_id = client.start_inventory_job(vault).await?;
        Ok(Self {
            vault: vault.clone(),
            job_id,
            state: JobState::Requested,
            polls: 0,
        })
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    /// number of status queries sent so far
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Query the job status once and move the state machine along.
    pub async fn poll(&mut self, client: &dyn StorageClient) -> Result<&JobState, SweepError> {
        if self.state.is_terminal() {
            return Ok(&self.state);
        }

        let status = client.poll_job_status(&self.job_id, &self.vault).await?;
        self.polls += 1;

        self.state = match (status.completed, status.failure) {
            (_, Some(message)) => JobState::Failed(message),
            (true, None) => JobState::Completed,
            (false, None) => JobState::Pending,
        };
        debug!("Job {} of vault {} is {:?} after {} poll(s)", self.job_id, self.vault, self.state, self.polls);

        Ok(&self.state)
    }

    /// Fetch and decode the inventory. Consumes the job, so the output is fetched at most once.
    pub async fn into_archives(self, client: &dyn StorageClient) -> Result<Vec<ArchiveRef>, SweepError> {
        match self.state {
            JobState::Completed => {}
            JobState::Failed(reason) => {
                return Err(SweepError::JobFailed {
                    vault: self.vault,
                    job_id: self.job_id,
                    reason,
                })
            }
            JobState::Requested | JobState::Pending => {
                return Err(SweepError::JobNotCompleted {
                    vault: self.vault,
                    job_id: self.job_id,
                })
            }
        }

        let raw = client.fetch_job_output(&self.job_id, &self.vault).await?;
        archive_lister::decode(&raw, &self.vault)
    }
}
