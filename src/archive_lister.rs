use serde::Deserialize;

use crate::{
    error::SweepError,
    types::{ArchiveRef, Vault}};

// Only the fields needed for the purge are mapped, everything else in the inventory
// (VaultARN, InventoryDate, ArchiveDescription, CreationDate, SHA256TreeHash) is skipped.
#[derive(Deserialize)]
struct InventoryJobOutput {
    #[serde(rename = "ArchiveList")]
    archive_list: Vec<InventoryEntry>,
}

#[derive(Deserialize)]
struct InventoryEntry {
    #[serde(rename = "ArchiveId")]
    archive_id: String,
    #[serde(rename = "Size", default)]
    size: Option<u64>,
}

/// Decode the body of an inventory retrieval job into the archives of `vault`, in listing order.
pub fn decode(raw: &[u8], vault: &Vault) -> Result<Vec<ArchiveRef>, SweepError> {
    let output: InventoryJobOutput = serde_json::from_slice(raw).map_err(|source| SweepError::MalformedOutput {
        vault: vault.clone(),
        source,
    })?;

    Ok(output
        .archive_list
        .into_iter()
        .map(|entry| ArchiveRef {
            vault: vault.clone(),
            archive_id: entry.archive_id,
            size: entry.size,
        })
        .collect())
}
