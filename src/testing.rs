// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! In-memory [`RepositoryClient`] used by unit tests.

use std::{
    collections::{HashMap, HashSet},
    sync::atomic::{AtomicUsize, Ordering},
};

use chrono::{DateTime, FixedOffset};
use masterror::AppError;

use crate::{
    client::{ListingScope, RepositoryClient, TopicLookup},
    repository::Repository,
};

/// Builds an unarchived public repository of `octo-org` that was never pushed.
pub(crate) fn repository(name: &str,) -> Repository
{
    Repository {
        name:           name.to_owned(),
        full_name:      format!("octo-org/{name}"),
        html_url:       format!("https://github.com/octo-org/{name}"),
        archived:       false,
        private:        false,
        default_branch: Some("main".to_owned(),),
        pushed_at:      None,
    }
}

#[derive(Debug, Default,)]
pub(crate) struct FakeClient
{
    repositories:   Vec<Repository,>,
    topics:         HashMap<String, TopicLookup,>,
    failing_topics: HashSet<String,>,
    branch_dates:   HashMap<String, String,>,
    topic_requests: AtomicUsize,
}

impl FakeClient
{
    pub(crate) fn with_repositories(mut self, repositories: Vec<Repository,>,) -> Self
    {
        self.repositories = repositories;
        self
    }

    pub(crate) fn with_topics(mut self, name: &str, lookup: TopicLookup,) -> Self
    {
        self.topics.insert(name.to_owned(), lookup,);
        self
    }

    pub(crate) fn failing_topics(mut self, name: &str,) -> Self
    {
        self.failing_topics.insert(name.to_owned(),);
        self
    }

    pub(crate) fn with_branch_date(mut self, name: &str, date: &str,) -> Self
    {
        self.branch_dates.insert(name.to_owned(), date.to_owned(),);
        self
    }

    pub(crate) fn topic_requests(&self,) -> usize
    {
        self.topic_requests.load(Ordering::SeqCst,)
    }
}

impl RepositoryClient for FakeClient
{
    async fn list_repositories(
        &self,
        _scope: &ListingScope,
    ) -> Result<Vec<Repository,>, AppError,>
    {
        Ok(self.repositories.clone(),)
    }

    async fn fetch_topics(&self, repository: &Repository,) -> Result<TopicLookup, AppError,>
    {
        self.topic_requests.fetch_add(1, Ordering::SeqCst,);
        if self.failing_topics.contains(&repository.name,) {
            return Err(AppError::service(format!("topics unavailable for {}", repository.name),),);
        }
        Ok(self
            .topics
            .get(&repository.name,)
            .cloned()
            .unwrap_or_else(|| TopicLookup::Labels(Vec::new(),),),)
    }

    async fn fetch_branch_commit_date(
        &self,
        repository: &Repository,
        branch: &str,
    ) -> Result<DateTime<FixedOffset,>, AppError,>
    {
        let date = self.branch_dates.get(&repository.name,).ok_or_else(|| {
            AppError::service(format!("branch {branch} not found for {}", repository.name),)
        },)?;
        DateTime::parse_from_rfc3339(date,)
            .map_err(|e| AppError::validation(format!("invalid date: {e}"),),)
    }
}
