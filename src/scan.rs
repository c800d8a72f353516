// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! End-to-end scan: list, classify, and emit reports.

use tracing::info;

use crate::{
    classify::{ScanOptions, find_inactive_repositories},
    client::{ListingScope, RepositoryClient},
    config::Config,
    error::Error,
    output::PipelineOutput,
    report::{ReportPaths, write_reports},
};

/// Runs a complete scan with `client` according to `config`.
///
/// Returns the artifact locations, or `None` when no stale repository was
/// found, in which case no artifact is written.
///
/// # Errors
///
/// Returns [`Error::Service`] when listing repositories or fetching topics
/// fails and [`Error::Io`] / [`Error::Serialize`] when artifacts cannot be
/// written.
pub async fn run_scan<C: RepositoryClient,>(
    client: &C,
    config: &Config,
) -> Result<Option<ReportPaths,>, Error,>
{
    if config.organization.is_none() {
        info!(
            "ORGANIZATION environment variable not set, searching all repos owned by token owner"
        );
    }
    if !config.exempt_topics.is_empty() {
        info!("Exempt topics: {:?}", config.exempt_topics);
    }
    if !config.exempt_repos.is_empty() {
        info!("Exempt repos: {:?}", config.exempt_repos);
    }

    let scope = ListingScope::from_organization(config.organization.as_deref(),);
    let repositories = client.list_repositories(&scope,).await?;

    let options = ScanOptions::from_config(config,);
    let records = find_inactive_repositories(client, repositories, &options,).await?;

    if records.is_empty() {
        info!("No stale repos found");
        return Ok(None,);
    }

    let pipeline = config.github_output.as_deref().map(PipelineOutput::new,);
    let paths = write_reports(&config.output_dir, &records, config.inactive_days, pipeline.as_ref(),)?;

    Ok(Some(paths,),)
}
