use std::time::Duration;

use futures::{stream, StreamExt};
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    client::StorageClient,
    config::SweepConfig,
    error::SweepError,
    retrieval_job::{JobState, RetrievalJob},
    types::{ArchiveRef, DeletionOutcome, Vault}};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeSettings {
    /// wait between two status queries of the inventory job
    pub poll_interval: Duration,
    /// number of DeleteArchive calls in flight, 1 deletes strictly one after another
    pub delete_concurrency: usize,
}

impl Default for PurgeSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            delete_concurrency: 1,
        }
    }
}

impl From<&SweepConfig> for PurgeSettings {
    fn from(config: &SweepConfig) -> Self {
        Self {
            poll_interval: config.poll_interval,
            delete_concurrency: config.delete_concurrency,
        }
    }
}

/// The deletions of one purge.
#[derive(Debug)]
pub enum Deletions {
    /// every listed archive was attempted
    Complete(Vec<DeletionOutcome>),
    /// cancelled between two deletions, archives never attempted have no outcome
    Interrupted(Vec<DeletionOutcome>),
}

impl Deletions {
    pub fn outcomes(&self) -> &[DeletionOutcome] {
        match self {
            Deletions::Complete(outcomes) | Deletions::Interrupted(outcomes) => outcomes,
        }
    }

    pub fn into_outcomes(self) -> Vec<DeletionOutcome> {
        match self {
            Deletions::Complete(outcomes) | Deletions::Interrupted(outcomes) => outcomes,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, Deletions::Interrupted(_))
    }
}

/// Empties one vault: inventory job, wait for it, then delete every archive it lists.
pub struct VaultPurger<'a> {
    client: &'a dyn StorageClient,
    settings: PurgeSettings,
    cancel: CancellationToken,
}

impl<'a> VaultPurger<'a> {
    pub fn new(client: &'a dyn StorageClient, settings: PurgeSettings, cancel: CancellationToken) -> Self {
        Self { client, settings, cancel }
    }

    /// Returns one outcome per attempted archive, in listing order.
    ///
    /// Failing to start, poll, fetch or decode the inventory aborts the purge of this vault.
    /// A failed deletion is only recorded in its outcome. There is no timeout on the job,
    /// the wait only ends on completion or when the cancellation token fires.
    pub async fn purge(&self, vault: &Vault) -> Result<Deletions, SweepError> {
        let mut job = RetrievalJob::initiate(self.client, vault).await?;
        info!("Inventory retrieval job initiated for vault {vault}, job ID: {}", job.job_id());
        info!("This operation will likely take a number of hours to complete. Please wait while AWS generates a list of archives for this vault.");

        self.await_completion(&mut job).await?;

        let archives = job.into_archives(self.client).await?;
        info!("Vault {vault} lists {} archive(s)", archives.len());

        let deletions = self.delete_archives(vault, &archives).await;
        let outcomes = deletions.outcomes();
        let failed = outcomes.iter().filter(|o| !o.success).count();
        if deletions.is_interrupted() {
            warn!("Purge of vault {vault} interrupted after {} of {} archive(s)", outcomes.len(), archives.len());
        } else if failed > 0 {
            warn!("Vault {vault}: {failed} of {} archive deletion(s) failed", outcomes.len());
        } else {
            info!("Vault {vault}: all {} archive(s) deleted", outcomes.len());
        }
        Ok(deletions)
    }

    async fn await_completion(&self, job: &mut RetrievalJob) -> Result<(), SweepError> {
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    warn!("Stopped waiting for job {} of vault {}", job.job_id(), job.vault());
                    return Err(SweepError::Cancelled);
                }
                _ = time::sleep(self.settings.poll_interval) => {}
            }

            let state = job.poll(self.client).await?.clone();
            match state {
                JobState::Completed => {
                    info!("Inventory retrieval job {} completed", job.job_id());
                    return Ok(());
                }
                // into_archives turns this into a JobFailed error
                JobState::Failed(reason) => {
                    warn!("Inventory retrieval job {} failed: {reason}", job.job_id());
                    return Ok(());
                }
                JobState::Requested | JobState::Pending => {
                    info!(
                        "Waiting for inventory retrieval job {} of vault {} to complete (poll {})",
                        job.job_id(),
                        job.vault(),
                        job.polls()
                    );
                }
            }
        }
    }

    async fn delete_archives(&self, vault: &Vault, archives: &[ArchiveRef]) -> Deletions {
        let total = archives.len();
        // buffered keeps the listing order, whatever order the requests finish in
        let attempts: Vec<Option<DeletionOutcome>> = stream::iter(archives.iter().enumerate())
            .map(|(idx, archive)| self.delete_unless_cancelled(idx + 1, total, archive))
            .buffered(self.settings.delete_concurrency.max(1))
            .collect()
            .await;

        let interrupted = attempts.iter().any(Option::is_none);
        let outcomes: Vec<DeletionOutcome> = attempts.into_iter().flatten().collect();
        if interrupted {
            debug!("Vault {vault}: {} archive(s) left untouched", total - outcomes.len());
            Deletions::Interrupted(outcomes)
        } else {
            Deletions::Complete(outcomes)
        }
    }

    /// A request that has been sent is always awaited, so every remote deletion gets its outcome.
    async fn delete_unless_cancelled(&self, nr: usize, total: usize, archive: &ArchiveRef) -> Option<DeletionOutcome> {
        if self.cancel.is_cancelled() {
            return None;
        }
        Some(self.delete_one(nr, total, archive).await)
    }

    async fn delete_one(&self, nr: usize, total: usize, archive: &ArchiveRef) -> DeletionOutcome {
        match self.client.delete_archive(&archive.vault, &archive.archive_id).await {
            Ok(()) => {
                info!("[{nr}/{total}] Archive {} successfully deleted from vault {}", archive.archive_id, archive.vault);
                DeletionOutcome::succeeded(archive)
            }
            Err(err) => {
                warn!("[{nr}/{total}] {err}");
                DeletionOutcome::failed(archive, err.to_string())
            }
        }
    }
}
