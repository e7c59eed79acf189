use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region as AwsRegion};
use aws_sdk_glacier::{
    config::Credentials as AwsCredentials,
    error::DisplayErrorContext,
    types::StatusCode,
    Client};
use bytes::Bytes;
use tracing::debug;

use crate::{
    error::SweepError,
    glacier_aux,
    types::{Credentials, JobId, JobStatus, Region, Vault}};

const PROVIDER_NAME: &str = "glacier-purge";

/// The remote operations the purge workflow needs, bound to a single region.
#[async_trait]
pub trait StorageClient: Send + Sync {
    fn region(&self) -> &Region;

    /// An empty region yields an empty list, an inaccessible region an error.
    async fn list_vaults(&self) -> Result<Vec<Vault>, SweepError>;

    async fn start_inventory_job(&self, vault: &Vault) -> Result<JobId, SweepError>;

    async fn poll_job_status(&self, job_id: &JobId, vault: &Vault) -> Result<JobStatus, SweepError>;

    /// Read the complete job output. The underlying body is drained and released before returning.
    async fn fetch_job_output(&self, job_id: &JobId, vault: &Vault) -> Result<Bytes, SweepError>;

    async fn delete_archive(&self, vault: &Vault, archive_id: &str) -> Result<(), SweepError>;
}

/// Builds one region-bound client.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, region: &Region, credentials: &Credentials) -> Result<Box<dyn StorageClient>, SweepError>;
}

/// get a client for the region, authenticating with the static key-pair
pub async fn get_region_client(region: &Region, credentials: &Credentials) -> Client {
    let credentials = AwsCredentials::new(
        credentials.access_key_id.clone(),
        credentials.secret_access_key().to_owned(),
        None,
        None,
        PROVIDER_NAME);

    let shared_config = aws_config::defaults(BehaviorVersion::latest())
        .region(AwsRegion::new(region.as_str().to_owned()))
        .credentials_provider(credentials)
        .load()
        .await;
    Client::new(&shared_config)
}

fn reason(err: &aws_sdk_glacier::Error) -> String {
    format!("{}", DisplayErrorContext(err))
}

/// StorageClient backed by the AWS Glacier service.
#[derive(Debug, Clone)]
pub struct GlacierClient {
    client: Client,
    region: Region,
    account_id: String,
}

impl GlacierClient {
    pub fn new(client: Client, region: Region, account_id: String) -> Self {
        Self { client, region, account_id }
    }
}

#[async_trait]
impl StorageClient for GlacierClient {
    fn region(&self) -> &Region {
        &self.region
    }

    async fn list_vaults(&self) -> Result<Vec<Vault>, SweepError> {
        let names = glacier_aux::list_vaults(&self.client, &self.account_id)
            .await
            .map_err(|err| SweepError::RegionUnavailable {
                region: self.region.clone(),
                reason: reason(&err),
            })?;
        debug!("Region {} holds {} vault(s)", self.region, names.len());

        Ok(names
            .into_iter()
            .map(|name| Vault::new(self.region.clone(), name))
            .collect())
    }

    async fn start_inventory_job(&self, vault: &Vault) -> Result<JobId, SweepError> {
        let job_id = glacier_aux::initiate_inventory_job(&self.client, &self.account_id, &vault.name)
            .await
            .map_err(|err| SweepError::JobInitiation {
                vault: vault.clone(),
                reason: reason(&err),
            })?;

        match job_id {
            Some(job_id) if !job_id.is_empty() => Ok(JobId::new(job_id)),
            _ => Err(SweepError::JobInitiation {
                vault: vault.clone(),
                reason: "service returned no job id".to_string(),
            }),
        }
    }

    async fn poll_job_status(&self, job_id: &JobId, vault: &Vault) -> Result<JobStatus, SweepError> {
        let description = glacier_aux::describe_job(&self.client, &self.account_id, &vault.name, job_id.as_str())
            .await
            .map_err(|err| SweepError::JobQuery {
                vault: vault.clone(),
                job_id: job_id.clone(),
                reason: reason(&err),
            })?;

        if let Some(StatusCode::Failed) = description.status_code {
            let message = description
                .status_message
                .unwrap_or_else(|| "no status message".to_string());
            return Ok(JobStatus::failed(message));
        }

        Ok(JobStatus {
            completed: description.completed,
            failure: None,
        })
    }

    async fn fetch_job_output(&self, job_id: &JobId, vault: &Vault) -> Result<Bytes, SweepError> {
        let to_error = |reason: String| SweepError::JobOutput {
            vault: vault.clone(),
            job_id: job_id.clone(),
            reason,
        };

        let body = glacier_aux::get_job_output(&self.client, &self.account_id, &vault.name, job_id.as_str())
            .await
            .map_err(|err| to_error(reason(&err)))?;
        // collect consumes the stream, so the connection is released once this returns
        let aggregated = body
            .collect()
            .await
            .map_err(|err| to_error(format!("{}", DisplayErrorContext(&err))))?;

        Ok(aggregated.into_bytes())
    }

    async fn delete_archive(&self, vault: &Vault, archive_id: &str) -> Result<(), SweepError> {
        glacier_aux::delete_archive(&self.client, &self.account_id, &vault.name, archive_id)
            .await
            .map_err(|err| SweepError::Deletion {
                vault: vault.clone(),
                archive_id: archive_id.to_owned(),
                reason: reason(&err),
            })
    }
}

/// Connector that builds a `GlacierClient` per region.
#[derive(Debug, Clone)]
pub struct GlacierConnector {
    account_id: String,
}

impl GlacierConnector {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self { account_id: account_id.into() }
    }
}

/// Reject what can be rejected before the SDK is involved. The SDK itself connects lazily.
fn check_connect_args(region: &Region, credentials: &Credentials) -> Result<(), SweepError> {
    let name = region.as_str();
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(SweepError::Network {
            region: region.clone(),
            reason: "no endpoint can be resolved for this region identifier".to_string(),
        });
    }
    if !credentials.is_complete() {
        return Err(SweepError::Auth {
            region: region.clone(),
            reason: "access key id and secret access key are required".to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl Connector for GlacierConnector {
    async fn connect(&self, region: &Region, credentials: &Credentials) -> Result<Box<dyn StorageClient>, SweepError> {
        check_connect_args(region, credentials)?;
        let client = get_region_client(region, credentials).await;
        Ok(Box::new(GlacierClient::new(client, region.clone(), self.account_id.clone())))
    }
}
