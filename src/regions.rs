use crate::types::Region;

/// All regions that are scanned when the sweep is not restricted.
pub const REGION_CATALOG: &[&str] = &[
    "us-east-2",
    "us-east-1",
    "us-west-1",
    "us-west-2",
    "af-south-1",
    "ap-east-1",
    "ap-southeast-3",
    "ap-south-1",
    "ap-northeast-3",
    "ap-northeast-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "ca-central-1",
    "eu-central-1",
    "eu-west-1",
    "eu-west-2",
    "eu-south-1",
    "eu-west-3",
    "eu-north-1",
    "me-south-1",
    "sa-east-1",
    "us-gov-east-1",
    "us-gov-west-1",
];

/// The regions a sweep visits, in visiting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionSet {
    Catalog,
    Only(Vec<Region>),
}

impl RegionSet {
    pub fn single(region: impl Into<String>) -> Self {
        RegionSet::Only(vec![Region::new(region)])
    }

    pub fn regions(&self) -> Vec<Region> {
        match self {
            RegionSet::Catalog => REGION_CATALOG.iter().map(|r| Region::new(*r)).collect(),
            RegionSet::Only(regions) => regions.clone(),
        }
    }
}

impl Default for RegionSet {
    fn default() -> Self {
        RegionSet::Catalog
    }
}
