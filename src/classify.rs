// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Classification of repositories into the ordered list of stale ones.
//!
//! Repositories are processed sequentially in listing order. Each one is
//! checked against the exemptions, its activity date is resolved, and a
//! record is produced when the whole days elapsed strictly exceed the
//! threshold and the repository is not archived. The final list is sorted by
//! inactivity, most inactive first, keeping listing order among ties.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::{
    activity::get_active_date,
    client::RepositoryClient,
    config::{ActivityMethod, Config},
    error::Error,
    exempt::{Exemptions, is_exempt},
    repository::{InactivityRecord, Repository},
};

/// Parameters of a classification run.
#[derive(Debug, Clone,)]
pub struct ScanOptions
{
    /// Repositories inactive for strictly more days are stale.
    pub inactive_days:   u64,
    /// Organization named in the summary line.
    pub organization:    Option<String,>,
    /// Name and topic exemptions.
    pub exemptions:      Exemptions,
    /// Activity resolution strategy.
    pub activity_method: ActivityMethod,
}

impl ScanOptions
{
    /// Derives scan options from the run configuration.
    pub fn from_config(config: &Config,) -> Self
    {
        Self {
            inactive_days:   config.inactive_days,
            organization:    config.organization.clone(),
            exemptions:      Exemptions::new(&config.exempt_repos, &config.exempt_topics,),
            activity_method: config.activity_method,
        }
    }
}

/// Classifies `repositories` against the current wall-clock time.
///
/// # Errors
///
/// Propagates topic lookup failures raised by the exemption filter.
pub async fn find_inactive_repositories<C: RepositoryClient,>(
    client: &C,
    repositories: impl IntoIterator<Item = Repository,>,
    options: &ScanOptions,
) -> Result<Vec<InactivityRecord,>, Error,>
{
    classify_at(client, repositories, options, Utc::now(),).await
}

/// Classifies `repositories` relative to `now`.
///
/// Inactivity is the elapsed duration truncated to whole days.
///
/// # Errors
///
/// Propagates topic lookup failures raised by the exemption filter.
pub async fn classify_at<C: RepositoryClient,>(
    client: &C,
    repositories: impl IntoIterator<Item = Repository,>,
    options: &ScanOptions,
    now: DateTime<Utc,>,
) -> Result<Vec<InactivityRecord,>, Error,>
{
    let mut records = Vec::new();

    for repository in repositories {
        if is_exempt(client, &repository, &options.exemptions,).await? {
            continue;
        }

        let Some(active_date,) =
            get_active_date(client, &repository, options.activity_method,).await
        else {
            continue;
        };

        let elapsed_days = now.signed_duration_since(active_date,).num_days();
        let Ok(days_inactive,) = u64::try_from(elapsed_days,) else {
            continue;
        };

        if days_inactive > options.inactive_days && !repository.archived {
            info!("{}: {} days inactive", repository.html_url, days_inactive);
            records.push(InactivityRecord {
                visibility: repository.visibility(),
                url: repository.html_url,
                days_inactive,
                last_push_date: active_date.date_naive().to_string(),
            },);
        }
    }

    sort_by_inactivity(&mut records,);

    match options.organization.as_deref() {
        Some(organization,) => {
            info!("Found {} stale repos in {}", records.len(), organization)
        }
        None => info!("Found {} stale repos", records.len()),
    }

    Ok(records,)
}

/// Orders records by `days_inactive`, most inactive first.
///
/// The sort is stable so records with equal inactivity keep their order.
pub fn sort_by_inactivity(records: &mut [InactivityRecord],)
{
    records.sort_by(|a, b| b.days_inactive.cmp(&a.days_inactive,),);
}

#[cfg(test)]
mod tests
{
    use chrono::{DateTime, Duration, Utc};
    use proptest::prelude::*;

    use super::{ScanOptions, classify_at, sort_by_inactivity};
    use crate::{
        client::TopicLookup,
        config::ActivityMethod,
        exempt::Exemptions,
        repository::{InactivityRecord, Repository, Visibility},
        testing::{FakeClient, repository},
    };

    fn now() -> DateTime<Utc,>
    {
        DateTime::parse_from_rfc3339("2024-06-15T12:00:00Z",)
            .expect("valid timestamp",)
            .with_timezone(&Utc,)
    }

    fn pushed_days_ago(name: &str, days: i64,) -> Repository
    {
        let mut repo = repository(name,);
        repo.pushed_at = Some((now() - Duration::days(days,)).to_rfc3339(),);
        repo
    }

    fn options(inactive_days: u64,) -> ScanOptions
    {
        ScanOptions {
            inactive_days,
            organization: Some("octo-org".to_owned(),),
            exemptions: Exemptions::default(),
            activity_method: ActivityMethod::Pushed,
        }
    }

    #[tokio::test]
    async fn only_unarchived_repositories_past_threshold_are_reported()
    {
        let mut archived = pushed_days_ago("r3", 40,);
        archived.archived = true;
        let repositories = vec![pushed_days_ago("r1", 20,), pushed_days_ago("r2", 40,), archived];

        let records = classify_at(&FakeClient::default(), repositories, &options(30,), now(),)
            .await
            .expect("expected classification to succeed",);

        assert_eq!(
            records,
            vec![InactivityRecord {
                url:            "https://github.com/octo-org/r2".to_owned(),
                days_inactive:  40,
                last_push_date: "2024-05-06".to_owned(),
                visibility:     Visibility::Public,
            }]
        );
    }

    #[tokio::test]
    async fn threshold_is_exclusive()
    {
        let repositories = vec![pushed_days_ago("edge", 30,), pushed_days_ago("past", 31,)];

        let records = classify_at(&FakeClient::default(), repositories, &options(30,), now(),)
            .await
            .expect("expected classification to succeed",);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://github.com/octo-org/past");
    }

    #[tokio::test]
    async fn partial_days_are_truncated()
    {
        let mut repo = repository("almost",);
        repo.pushed_at =
            Some((now() - Duration::days(31,) + Duration::hours(1,)).to_rfc3339(),);

        let records = classify_at(&FakeClient::default(), vec![repo], &options(30,), now(),)
            .await
            .expect("expected classification to succeed",);

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn never_pushed_repository_is_ignored()
    {
        let repositories = vec![repository("fresh",), pushed_days_ago("old", 90,)];

        let records = classify_at(&FakeClient::default(), repositories, &options(30,), now(),)
            .await
            .expect("expected classification to succeed",);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].days_inactive, 90);
    }

    #[tokio::test]
    async fn future_push_dates_are_not_stale()
    {
        let repositories = vec![pushed_days_ago("time-traveller", -5,)];

        let records = classify_at(&FakeClient::default(), repositories, &options(1,), now(),)
            .await
            .expect("expected classification to succeed",);

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn exempt_repositories_are_skipped()
    {
        let client = FakeClient::default()
            .with_topics("tagged", TopicLookup::Labels(vec!["keep".to_owned()],),)
            .with_topics("fork", TopicLookup::Unavailable,);
        let repositories = vec![
            pushed_days_ago("data-lake", 100,),
            pushed_days_ago("tagged", 100,),
            pushed_days_ago("fork", 100,),
        ];
        let scan = ScanOptions {
            exemptions: Exemptions::new(&["data-*"], &["keep"],),
            ..options(30,)
        };

        let records = classify_at(&client, repositories, &scan, now(),)
            .await
            .expect("expected classification to succeed",);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://github.com/octo-org/fork");
    }

    #[tokio::test]
    async fn results_are_sorted_by_inactivity_descending()
    {
        let mut private = pushed_days_ago("b", 200,);
        private.private = true;
        let repositories = vec![
            pushed_days_ago("a", 50,),
            private,
            pushed_days_ago("c", 50,),
            pushed_days_ago("d", 365,),
        ];

        let records = classify_at(&FakeClient::default(), repositories, &options(30,), now(),)
            .await
            .expect("expected classification to succeed",);

        let urls: Vec<&str,> = records.iter().map(|record| record.url.as_str(),).collect();
        assert_eq!(
            urls,
            vec![
                "https://github.com/octo-org/d",
                "https://github.com/octo-org/b",
                "https://github.com/octo-org/a",
                "https://github.com/octo-org/c",
            ]
        );
        assert_eq!(records[1].visibility, Visibility::Private);
    }

    #[tokio::test]
    async fn default_branch_method_reports_commit_date()
    {
        let client = FakeClient::default().with_branch_date("branchy", "2024-01-01T08:00:00Z",);
        let mut repo = pushed_days_ago("branchy", 1,);
        repo.default_branch = Some("trunk".to_owned(),);
        let scan = ScanOptions {
            activity_method: ActivityMethod::DefaultBranchUpdated,
            ..options(30,)
        };

        let records = classify_at(&client, vec![repo], &scan, now(),)
            .await
            .expect("expected classification to succeed",);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].days_inactive, 166);
        assert_eq!(records[0].last_push_date, "2024-01-01");
    }

    #[tokio::test]
    async fn topic_failures_abort_classification()
    {
        let client = FakeClient::default().failing_topics("broken",);
        let scan = ScanOptions {
            exemptions: Exemptions::new(&[], &["keep"],),
            ..options(30,)
        };

        let result = classify_at(&client, vec![pushed_days_ago("broken", 90,)], &scan, now(),).await;
        assert!(result.is_err());
    }

    fn record(url: String, days_inactive: u64,) -> InactivityRecord
    {
        InactivityRecord {
            url,
            days_inactive,
            last_push_date: "2024-01-01".to_owned(),
            visibility: Visibility::Public,
        }
    }

    proptest! {
        #[test]
        fn sorted_records_are_non_increasing_and_stable(days in proptest::collection::vec(0u64..50, 0..40)) {
            let mut records: Vec<InactivityRecord> = days
                .iter()
                .enumerate()
                .map(|(index, days)| record(index.to_string(), *days))
                .collect();

            sort_by_inactivity(&mut records);

            for pair in records.windows(2) {
                prop_assert!(pair[0].days_inactive >= pair[1].days_inactive);
                if pair[0].days_inactive == pair[1].days_inactive {
                    let first: usize = pair[0].url.parse().unwrap();
                    let second: usize = pair[1].url.parse().unwrap();
                    prop_assert!(first < second);
                }
            }
        }
    }
}
