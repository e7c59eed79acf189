use std::{
    path::Path,
    time::Duration};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::SweepError,
    regions::RegionSet,
    types::Region};

pub const CONFIG_FILE: &str = "glacier-purge.toml";
pub const ENV_PREFIX: &str = "GLACIER_PURGE__";

/// Tunables of a sweep. Credentials are deliberately not part of it; they only come from the command line
/// or the standard AWS environment variables.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SweepConfig {
    /// Account that owns the vaults, "-" is the account of the credentials.
    pub account_id: String,
    /// Time between two DescribeJob calls.
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Number of DeleteArchive requests in flight per vault.
    pub delete_concurrency: usize,
    /// Restrict the sweep to these regions. `None` scans the full catalog.
    pub regions: Option<Vec<String>>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            account_id: "-".to_string(),
            poll_interval: Duration::from_secs(60),
            delete_concurrency: 1,
            regions: None,
        }
    }
}

impl SweepConfig {
    pub fn load() -> Result<Self, SweepError> {
        Self::from_figment(Self::figment(Toml::file(CONFIG_FILE)))
    }

    pub fn load_from_path(path: &Path) -> Result<Self, SweepError> {
        if !path.exists() {
            return Err(SweepError::Config(format!("config file {} does not exist", path.display())));
        }
        Self::from_figment(Self::figment(Toml::file(path)))
    }

    fn figment(file: figment::providers::Data<Toml>) -> Figment {
        Figment::from(Serialized::defaults(SweepConfig::default()))
            .merge(file)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn from_figment(figment: Figment) -> Result<Self, SweepError> {
        let config: SweepConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SweepError> {
        if self.poll_interval.is_zero() {
            return Err(SweepError::Config("poll_interval must be larger than zero".into()));
        }
        if self.delete_concurrency == 0 {
            return Err(SweepError::Config("delete_concurrency must be at least 1".into()));
        }
        if self.account_id.trim().is_empty() {
            return Err(SweepError::Config("account_id cannot be empty".into()));
        }
        if let Some(regions) = &self.regions {
            if regions.is_empty() {
                return Err(SweepError::Config("regions is set but lists no region".into()));
            }
        }
        Ok(())
    }

    /// The regions to visit. A region given on the command line wins over the configured list.
    pub fn region_set(&self, restrict_to: Option<&str>) -> RegionSet {
        match (restrict_to, &self.regions) {
            (Some(region), _) => RegionSet::single(region),
            (None, Some(regions)) => RegionSet::Only(regions.iter().map(|r| Region::new(r.as_str())).collect()),
            (None, None) => RegionSet::Catalog,
        }
    }
}
