use std::fmt;

/// Identifier of an AWS region, e.g. `eu-central-1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Region(String);

impl Region {
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Region {
    fn from(region: &str) -> Self {
        Self::new(region)
    }
}

/// Static access-key pair, presented once per region client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    secret_access_key: String,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// both halves of the pair must be present
    pub fn is_complete(&self) -> bool {
        !self.access_key_id.trim().is_empty() && !self.secret_access_key.trim().is_empty()
    }
}

// never print the secret, not even in debug logging
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

/// A named container of archives. Identity is `(region, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vault {
    pub region: Region,
    pub name: String,
}

impl Vault {
    pub fn new(region: Region, name: impl Into<String>) -> Self {
        Self {
            region,
            name: name.into(),
        }
    }
}

impl fmt::Display for Vault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.region, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self(job_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Answer of a single DescribeJob call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobStatus {
    pub completed: bool,
    /// set when the service finished the job with status code `Failed`
    pub failure: Option<String>,
}

impl JobStatus {
    pub fn in_progress() -> Self {
        Self::default()
    }

    pub fn succeeded() -> Self {
        Self {
            completed: true,
            failure: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            completed: true,
            failure: Some(message.into()),
        }
    }
}

/// An archive listed by a completed inventory job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRef {
    pub vault: Vault,
    pub archive_id: String,
    pub size: Option<u64>,
}

/// Result of one delete attempt. Never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub archive_id: String,
    pub success: bool,
    pub error_detail: Option<String>,
    pub size: Option<u64>,
}

impl DeletionOutcome {
    pub fn succeeded(archive: &ArchiveRef) -> Self {
        Self {
            archive_id: archive.archive_id.clone(),
            success: true,
            error_detail: None,
            size: archive.size,
        }
    }

    pub fn failed(archive: &ArchiveRef, detail: impl Into<String>) -> Self {
        Self {
            archive_id: archive.archive_id.clone(),
            success: false,
            error_detail: Some(detail.into()),
            size: archive.size,
        }
    }
}
