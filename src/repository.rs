// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Read-only view of a GitHub repository and the inactivity record produced
//! for stale ones.
//!
//! [`Repository`] deserializes directly from the REST payloads returned by the
//! organization and user listing endpoints, keeping only the attributes the
//! scanner consumes. [`InactivityRecord`] is the immutable value emitted by
//! the classifier and serialized verbatim into the JSON report.

use serde::{Deserialize, Serialize};

/// Repository attributes consumed by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize,)]
pub struct Repository
{
    /// Short repository name matched against exemption patterns.
    pub name:           String,
    /// `owner/name` identifier used to address repository routes.
    pub full_name:      String,
    /// Public URL reported in logs and artifacts.
    pub html_url:       String,
    /// Whether the repository is archived.
    #[serde(default)]
    pub archived:       bool,
    /// Whether the repository is private.
    #[serde(default)]
    pub private:        bool,
    /// Name of the default branch, when the repository has one.
    #[serde(default)]
    pub default_branch: Option<String,>,
    /// RFC 3339 timestamp of the last push; `None` for never-pushed
    /// repositories.
    #[serde(default)]
    pub pushed_at:      Option<String,>,
}

impl Repository
{
    /// Visibility derived from the `private` flag.
    pub fn visibility(&self,) -> Visibility
    {
        if self.private { Visibility::Private } else { Visibility::Public }
    }
}

/// Repository visibility as reported in the generated artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,)]
#[serde(rename_all = "snake_case")]
pub enum Visibility
{
    /// Visible to everyone.
    Public,
    /// Restricted to collaborators.
    Private,
}

impl Visibility
{
    /// Lowercase label used in the Markdown table.
    pub fn as_str(self,) -> &'static str
    {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl std::fmt::Display for Visibility
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_,>,) -> std::fmt::Result
    {
        f.write_str(self.as_str(),)
    }
}

/// Stale repository entry emitted by the classifier.
///
/// # Examples
///
/// ```
/// use stale_repos::{InactivityRecord, Visibility};
///
/// let record = InactivityRecord {
///     url:            "https://github.com/octo/old".to_owned(),
///     days_inactive:  400,
///     last_push_date: "2024-01-01".to_owned(),
///     visibility:     Visibility::Public,
/// };
/// let json = serde_json::to_string(&record,).expect("serializable record",);
/// assert!(json.contains("\"daysInactive\":400"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct InactivityRecord
{
    /// Public repository URL.
    pub url:            String,
    /// Whole days elapsed since the activity date.
    pub days_inactive:  u64,
    /// Calendar date of the activity instant in `YYYY-MM-DD` form.
    pub last_push_date: String,
    /// Repository visibility.
    pub visibility:     Visibility,
}
