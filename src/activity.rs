// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Resolution of the instant a repository was last active.

use chrono::{DateTime, FixedOffset};
use tracing::{debug, warn};

use crate::{client::RepositoryClient, config::ActivityMethod, repository::Repository};

/// Resolves the activity date of `repository` using `method`.
///
/// Returns `None` when the repository was never pushed to or when the date
/// cannot be resolved. Resolution failures are logged with the repository
/// URL and never abort the scan.
pub async fn get_active_date<C: RepositoryClient,>(
    client: &C,
    repository: &Repository,
    method: ActivityMethod,
) -> Option<DateTime<FixedOffset,>,>
{
    let resolved = match method {
        ActivityMethod::Pushed => {
            let pushed_at = repository.pushed_at.as_deref()?;
            DateTime::parse_from_rfc3339(pushed_at,)
                .map_err(|e| format!("invalid pushed_at '{pushed_at}': {e}"),)
        }
        ActivityMethod::DefaultBranchUpdated => match repository.default_branch.as_deref() {
            Some(branch,) => client
                .fetch_branch_commit_date(repository, branch,)
                .await
                .map_err(|e| e.to_string(),),
            None => Err("repository has no default branch".to_owned(),),
        },
    };

    match resolved {
        Ok(date,) => Some(date,),
        Err(reason,) => {
            warn!("{} had an exception trying to get the activity date.", repository.html_url);
            debug!("Activity date failure for {}: {}", repository.html_url, reason);
            None
        }
    }
}
