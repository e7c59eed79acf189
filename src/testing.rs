//! Scripted stand-ins for the async seams, used by the unit tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex}};

use async_trait::async_trait;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::{
    client::{Connector, StorageClient},
    confirm::Confirm,
    error::SweepError,
    types::{Credentials, JobId, JobStatus, Region, Vault}};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListVaults,
    StartJob(String),
    Poll(String),
    Fetch(String),
    Delete(String),
}

struct Script {
    vaults: Result<Vec<String>, String>,
    pending_polls: usize,
    job_failure: Option<String>,
    failing_job_starts: HashSet<String>,
    inventory: Bytes,
    failing_deletes: HashSet<String>,
    cancel_after_delete: Option<(String, CancellationToken)>,
    polls_left: HashMap<String, usize>,
    next_job: usize,
    calls: Vec<Call>,
}

/// In-memory Glacier for a single region. Clones share their script and call log.
#[derive(Clone)]
pub struct FakeGlacier {
    region: Region,
    script: Arc<Mutex<Script>>,
}

impl FakeGlacier {
    pub fn new(region: &str) -> Self {
        let script = Script {
            vaults: Ok(Vec::new()),
            pending_polls: 0,
            job_failure: None,
            failing_job_starts: HashSet::new(),
            inventory: Bytes::from_static(br#"{"ArchiveList":[]}"#),
            failing_deletes: HashSet::new(),
            cancel_after_delete: None,
            polls_left: HashMap::new(),
            next_job: 0,
            calls: Vec::new(),
        };
        Self {
            region: Region::new(region),
            script: Arc::new(Mutex::new(script)),
        }
    }

    pub fn with_vaults(self, names: &[&str]) -> Self {
        self.script.lock().unwrap().vaults = Ok(names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn unavailable(self, reason: &str) -> Self {
        self.script.lock().unwrap().vaults = Err(reason.to_string());
        self
    }

    /// number of polls answering "not completed" before the job completes
    pub fn with_pending_polls(self, polls: usize) -> Self {
        self.script.lock().unwrap().pending_polls = polls;
        self
    }

    pub fn with_failed_job(self, message: &str) -> Self {
        self.script.lock().unwrap().job_failure = Some(message.to_string());
        self
    }

    pub fn with_failing_job_start(self, vault_name: &str) -> Self {
        self.script.lock().unwrap().failing_job_starts.insert(vault_name.to_string());
        self
    }

    pub fn with_inventory(self, json: &str) -> Self {
        self.script.lock().unwrap().inventory = Bytes::from(json.to_owned());
        self
    }

    pub fn with_failing_delete(self, archive_id: &str) -> Self {
        self.script.lock().unwrap().failing_deletes.insert(archive_id.to_string());
        self
    }

    /// Fire `cancel` once the deletion of `archive_id` has gone through, like Ctrl+C between two requests.
    pub fn cancelling_after_delete(self, archive_id: &str, cancel: CancellationToken) -> Self {
        self.script.lock().unwrap().cancel_after_delete = Some((archive_id.to_string(), cancel));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Delete(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.script.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl StorageClient for FakeGlacier {
    fn region(&self) -> &Region {
        &self.region
    }

    async fn list_vaults(&self) -> Result<Vec<Vault>, SweepError> {
        self.record(Call::ListVaults);
        let script = self.script.lock().unwrap();
        match &script.vaults {
            Ok(names) => Ok(names.iter().map(|n| Vault::new(self.region.clone(), n.as_str())).collect()),
            Err(reason) => Err(SweepError::RegionUnavailable {
                region: self.region.clone(),
                reason: reason.clone(),
            }),
        }
    }

    async fn start_inventory_job(&self, vault: &Vault) -> Result<JobId, SweepError> {
        self.record(Call::StartJob(vault.name.clone()));
        let mut script = self.script.lock().unwrap();
        if script.failing_job_starts.contains(&vault.name) {
            return Err(SweepError::JobInitiation {
                vault: vault.clone(),
                reason: "ResourceNotFoundException".to_string(),
            });
        }
        script.next_job += 1;
        let job_id = format!("job-{}", script.next_job);
        let pending = script.pending_polls;
        script.polls_left.insert(job_id.clone(), pending);
        Ok(JobId::new(job_id))
    }

    async fn poll_job_status(&self, job_id: &JobId, _vault: &Vault) -> Result<JobStatus, SweepError> {
        self.record(Call::Poll(job_id.to_string()));
        let mut script = self.script.lock().unwrap();
        let failure = script.job_failure.clone();
        let left = script.polls_left.entry(job_id.to_string()).or_insert(0);
        if *left > 0 {
            *left -= 1;
            return Ok(JobStatus::in_progress());
        }
        Ok(match failure {
            Some(message) => JobStatus::failed(message),
            None => JobStatus::succeeded(),
        })
    }

    async fn fetch_job_output(&self, job_id: &JobId, _vault: &Vault) -> Result<Bytes, SweepError> {
        self.record(Call::Fetch(job_id.to_string()));
        Ok(self.script.lock().unwrap().inventory.clone())
    }

    async fn delete_archive(&self, vault: &Vault, archive_id: &str) -> Result<(), SweepError> {
        self.record(Call::Delete(archive_id.to_string()));
        let script = self.script.lock().unwrap();
        if let Some((id, cancel)) = &script.cancel_after_delete {
            if id == archive_id {
                cancel.cancel();
            }
        }
        if script.failing_deletes.contains(archive_id) {
            return Err(SweepError::Deletion {
                vault: vault.clone(),
                archive_id: archive_id.to_string(),
                reason: "ResourceNotFoundException: Archive not found".to_string(),
            });
        }
        Ok(())
    }
}

/// Hands out the registered fake per region; unknown regions fail to connect.
#[derive(Clone, Default)]
pub struct FakeConnector {
    regions: HashMap<Region, FakeGlacier>,
    connects: Arc<Mutex<Vec<Region>>>,
}

impl FakeConnector {
    pub fn with_region(mut self, fake: FakeGlacier) -> Self {
        self.regions.insert(fake.region.clone(), fake);
        self
    }

    pub fn connects(&self) -> Vec<Region> {
        self.connects.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(&self, region: &Region, _credentials: &Credentials) -> Result<Box<dyn StorageClient>, SweepError> {
        self.connects.lock().unwrap().push(region.clone());
        match self.regions.get(region) {
            Some(fake) => Ok(Box::new(fake.clone())),
            None => Err(SweepError::Auth {
                region: region.clone(),
                reason: "UnrecognizedClientException".to_string(),
            }),
        }
    }
}

/// Answers "y" for the listed vault names and "N" for everything else.
#[derive(Clone, Default)]
pub struct ScriptedConfirm {
    accept: HashSet<String>,
    asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConfirm {
    pub fn accepting(names: &[&str]) -> Self {
        Self {
            accept: names.iter().map(|n| n.to_string()).collect(),
            asked: Arc::default(),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl Confirm for ScriptedConfirm {
    async fn confirm(&mut self, vault: &Vault) -> bool {
        self.asked.lock().unwrap().push(vault.name.clone());
        self.accept.contains(&vault.name)
    }
}

pub fn credentials() -> Credentials {
    Credentials::new("AKIDEXAMPLE", "secret")
}
