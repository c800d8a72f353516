//! Detection of stale repositories in a GitHub organization.
//!
//! The library lists repositories through a [`RepositoryClient`], drops the
//! ones exempted by name pattern or topic, resolves each repository's last
//! activity date, and reports every unarchived repository whose inactivity
//! exceeds the configured threshold. Results are rendered as a JSON array and
//! a Markdown table and can be published as GitHub Actions step outputs.

mod activity;
mod classify;
mod client;
mod config;
mod error;
mod exempt;
mod output;
mod report;
mod repository;
mod scan;
#[cfg(test)]
mod testing;

pub use activity::get_active_date;
pub use classify::{ScanOptions, classify_at, find_inactive_repositories, sort_by_inactivity};
pub use client::{GitHubClient, ListingScope, RepositoryClient, TopicLookup};
pub use config::{ActivityMethod, Config, ConfigInput, Credentials};
pub use error::{Error, io_error};
pub use exempt::{Exemptions, NamePatterns, is_exempt};
pub use output::PipelineOutput;
pub use report::{
    JSON_OUTPUT_KEY, JSON_REPORT_FILE, MARKDOWN_OUTPUT_KEY, MARKDOWN_REPORT_FILE, ReportPaths,
    render_json, render_markdown, write_json_report, write_markdown_report, write_reports,
};
pub use repository::{InactivityRecord, Repository, Visibility};
pub use scan::run_scan;
