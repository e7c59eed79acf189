// Thin wrappers around the Glacier operations used by the sweep.
// Each function performs a single (paginated) API call and hands back the raw SDK result.

use aws_sdk_glacier::{
    operation::{describe_job::DescribeJobOutput, get_job_output::GetJobOutputOutput},
    primitives::ByteStream,
    types::JobParameters,
    Client, Error,
};

pub const INVENTORY_RETRIEVAL: &str = "inventory-retrieval";
pub const INVENTORY_FORMAT: &str = "JSON";

/// List the names of all vaults of the account, following the `Marker` until the listing is exhausted.
pub async fn list_vaults(client: &Client, account_id: &str) -> Result<Vec<String>, Error> {
    let mut vault_names = Vec::new();
    let mut marker: Option<String> = None;

    loop {
        let output = client
            .list_vaults()
            .account_id(account_id)
            .set_marker(marker.take())
            .send()
            .await?;

        vault_names.extend(
            output
                .vault_list
                .unwrap_or_default()
                .into_iter()
                .filter_map(|vault| vault.vault_name),
        );

        match output.marker {
            Some(next) if !next.is_empty() => marker = Some(next),
            _ => break,
        }
    }

    Ok(vault_names)
}

/// Start an inventory retrieval job. Returns the job-id, if the service handed one out.
pub async fn initiate_inventory_job(client: &Client, account_id: &str, vault_name: &str) -> Result<Option<String>, Error> {
    let params = JobParameters::builder()
        .r#type(INVENTORY_RETRIEVAL)
        .format(INVENTORY_FORMAT)
        .build();

    let output = client
        .initiate_job()
        .account_id(account_id)
        .vault_name(vault_name)
        .job_parameters(params)
        .send()
        .await?;

    Ok(output.job_id)
}

pub async fn describe_job(client: &Client, account_id: &str, vault_name: &str, job_id: &str) -> Result<DescribeJobOutput, Error> {
    let output = client
        .describe_job()
        .account_id(account_id)
        .vault_name(vault_name)
        .job_id(job_id)
        .send()
        .await?;
    Ok(output)
}

/// Get the body of a finished job. The caller is responsible for draining the stream.
pub async fn get_job_output(client: &Client, account_id: &str, vault_name: &str, job_id: &str) -> Result<ByteStream, Error> {
    let output: GetJobOutputOutput = client
        .get_job_output()
        .account_id(account_id)
        .vault_name(vault_name)
        .job_id(job_id)
        .send()
        .await?;
    Ok(output.body)
}

pub async fn delete_archive(client: &Client, account_id: &str, vault_name: &str, archive_id: &str) -> Result<(), Error> {
    client
        .delete_archive()
        .account_id(account_id)
        .vault_name(vault_name)
        .archive_id(archive_id)
        .send()
        .await?;
    Ok(())
}
