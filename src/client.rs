// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// GitHub API access for the stale repository scan.
///
/// [`RepositoryClient`] is the seam consumed by the exemption filter, the
/// activity resolver and the classifier. [`GitHubClient`] implements it on top
/// of an authenticated Octocrab instance.
use std::future::Future;

use chrono::{DateTime, FixedOffset};
use masterror::AppError;
use octocrab::{
    Octocrab, Page,
    models::{AppId, InstallationId},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::{Config, Credentials},
    error::Error,
    repository::Repository,
};

const PAGE_SIZE: u8 = 100;
const ENTERPRISE_API_SUFFIX: &str = "/api/v3";

/// Which repositories a scan lists.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub enum ListingScope
{
    /// Every repository of the named organization.
    Organization(String,),
    /// Repositories owned by the authenticated identity.
    Owner,
}

impl ListingScope
{
    /// Derives the scope from the configured organization name.
    pub fn from_organization(organization: Option<&str,>,) -> Self
    {
        match organization {
            Some(name,) => Self::Organization(name.to_owned(),),
            None => Self::Owner,
        }
    }
}

/// Outcome of a topic lookup.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub enum TopicLookup
{
    /// Topic labels attached to the repository.
    Labels(Vec<String,>,),
    /// Topics are not available for the repository (HTTP 404), which is
    /// typical for private temporary forks.
    Unavailable,
}

/// Repository operations required by the scan.
pub trait RepositoryClient
{
    /// Lists every repository in `scope`, following pagination.
    fn list_repositories(
        &self,
        scope: &ListingScope,
    ) -> impl Future<Output = Result<Vec<Repository,>, AppError,>,> + Send;

    /// Fetches the topic labels of `repository`.
    fn fetch_topics(
        &self,
        repository: &Repository,
    ) -> impl Future<Output = Result<TopicLookup, AppError,>,> + Send;

    /// Returns the committer date of the latest commit on `branch`.
    fn fetch_branch_commit_date(
        &self,
        repository: &Repository,
        branch: &str,
    ) -> impl Future<Output = Result<DateTime<FixedOffset,>, AppError,>,> + Send;
}

/// Octocrab-backed [`RepositoryClient`].
#[derive(Debug, Clone,)]
pub struct GitHubClient
{
    octocrab: Octocrab,
}

#[derive(Debug, Serialize,)]
struct ListParams
{
    per_page: u8,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind:     Option<&'static str,>,
}

#[derive(Debug, Deserialize,)]
struct TopicsResponse
{
    #[serde(default)]
    names: Vec<String,>,
}

#[derive(Debug, Deserialize,)]
struct BranchResponse
{
    commit: BranchCommit,
}

#[derive(Debug, Deserialize,)]
struct BranchCommit
{
    commit: CommitDetails,
}

#[derive(Debug, Deserialize,)]
struct CommitDetails
{
    committer: Option<CommitSignature,>,
}

#[derive(Debug, Deserialize,)]
struct CommitSignature
{
    date: Option<String,>,
}

impl GitHubClient
{
    /// Wraps an already configured Octocrab instance.
    pub fn new(octocrab: Octocrab,) -> Self
    {
        Self {
            octocrab,
        }
    }

    /// Authenticates against GitHub.com or GitHub Enterprise.
    ///
    /// Token credentials are used directly; app credentials are exchanged for
    /// an installation token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] when the client cannot be built, the
    /// private key is not valid PEM, or the installation token cannot be
    /// obtained.
    pub async fn connect(config: &Config,) -> Result<Self, Error,>
    {
        let mut builder = Octocrab::builder();

        if let Some(url,) = config.enterprise_url.as_deref() {
            let api_url = enterprise_api_url(url,);
            debug!("Using GitHub Enterprise API at {}", api_url);
            builder = builder.base_uri(api_url.as_str(),).map_err(|e| {
                Error::authentication(format!("invalid enterprise URL {api_url}: {e}"),)
            },)?;
        }

        let octocrab = match &config.credentials {
            Credentials::Token(token,) => builder
                .personal_token(token.clone(),)
                .build()
                .map_err(|e| Error::authentication(format!("failed to initialize client: {e}"),),)?,
            Credentials::App {
                app_id,
                private_key,
                installation_id,
            } => {
                let key = jsonwebtoken::EncodingKey::from_rsa_pem(private_key.as_bytes(),)
                    .map_err(|e| Error::authentication(format!("invalid app private key: {e}"),),)?;
                let app = builder.app(AppId(*app_id,), key,).build().map_err(|e| {
                    Error::authentication(format!("failed to initialize app client: {e}"),)
                },)?;
                let (installation, _token,) = app
                    .installation_and_token(InstallationId(*installation_id,),)
                    .await
                    .map_err(|e| {
                        Error::authentication(format!(
                            "failed to obtain installation token for {installation_id}: {e}"
                        ),)
                    },)?;
                installation
            }
        };

        Ok(Self::new(octocrab,),)
    }
}

impl RepositoryClient for GitHubClient
{
    async fn list_repositories(
        &self,
        scope: &ListingScope,
    ) -> Result<Vec<Repository,>, AppError,>
    {
        let (route, params,) = match scope {
            ListingScope::Organization(name,) => (
                format!("/orgs/{name}/repos"),
                ListParams {
                    per_page: PAGE_SIZE, kind: None,
                },
            ),
            ListingScope::Owner => (
                "/user/repos".to_owned(),
                ListParams {
                    per_page: PAGE_SIZE, kind: Some("owner",),
                },
            ),
        };

        let mut page: Page<Repository,> = self
            .octocrab
            .get(&route, Some(&params,),)
            .await
            .map_err(|e| AppError::service(format!("failed to list repositories: {e}"),),)?;

        let mut repositories = Vec::with_capacity(page.items.len(),);
        loop {
            repositories.append(&mut page.items,);
            let next = self
                .octocrab
                .get_page::<Repository>(&page.next,)
                .await
                .map_err(|e| AppError::service(format!("failed to list repositories: {e}"),),)?;
            match next {
                Some(next_page,) => page = next_page,
                None => break,
            }
        }

        debug!("Listed {} repositories", repositories.len());
        Ok(repositories,)
    }

    async fn fetch_topics(&self, repository: &Repository,) -> Result<TopicLookup, AppError,>
    {
        let route = format!("/repos/{}/topics", repository.full_name);
        match self.octocrab.get::<TopicsResponse, _, _>(&route, None::<&(),>,).await {
            Ok(response,) => Ok(TopicLookup::Labels(response.names,),),
            Err(error,) if is_not_found(&error,) => Ok(TopicLookup::Unavailable,),
            Err(error,) => Err(AppError::service(format!(
                "failed to fetch topics for {}: {error}",
                repository.full_name
            ),),),
        }
    }

    async fn fetch_branch_commit_date(
        &self,
        repository: &Repository,
        branch: &str,
    ) -> Result<DateTime<FixedOffset,>, AppError,>
    {
        let route = format!("/repos/{}/branches/{branch}", repository.full_name);
        let response: BranchResponse =
            self.octocrab.get(&route, None::<&(),>,).await.map_err(|e| {
                AppError::service(format!(
                    "failed to fetch branch {branch} of {}: {e}",
                    repository.full_name
                ),)
            },)?;

        let date = response
            .commit
            .commit
            .committer
            .and_then(|committer| committer.date,)
            .ok_or_else(|| {
                AppError::validation(format!("branch {branch} has no committer date"),)
            },)?;

        DateTime::parse_from_rfc3339(&date,)
            .map_err(|e| AppError::validation(format!("invalid committer date '{date}': {e}"),),)
    }
}

fn is_not_found(error: &octocrab::Error,) -> bool
{
    matches!(error, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404)
}

fn enterprise_api_url(base: &str,) -> String
{
    let trimmed = base.trim_end_matches('/',);
    if trimmed.ends_with(ENTERPRISE_API_SUFFIX,) {
        trimmed.to_owned()
    } else {
        format!("{trimmed}{ENTERPRISE_API_SUFFIX}")
    }
}
