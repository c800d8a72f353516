// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Startup configuration for the stale repository scan.
//!
//! Raw values arrive as optional strings (the CLI maps every flag onto an
//! environment variable) and are validated exactly once by
//! [`Config::resolve`]. The resulting [`Config`] is passed by reference to the
//! rest of the crate; nothing below the CLI reads the environment.

use std::{fmt, path::PathBuf, str::FromStr};

use crate::error::Error;

/// Default artifact directory used when no prefix is configured.
const DEFAULT_OUTPUT_DIR: &str = ".";

/// Strategy used to determine when a repository was last active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default,)]
pub enum ActivityMethod
{
    /// Use the repository's last push timestamp.
    #[default]
    Pushed,
    /// Use the committer date of the default branch tip.
    DefaultBranchUpdated,
}

impl ActivityMethod
{
    /// Canonical configuration value for the method.
    pub fn as_str(self,) -> &'static str
    {
        match self {
            Self::Pushed => "pushed",
            Self::DefaultBranchUpdated => "default_branch_updated",
        }
    }
}

impl fmt::Display for ActivityMethod
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str(self.as_str(),)
    }
}

impl FromStr for ActivityMethod
{
    type Err = Error;

    /// Parses a method name case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use stale_repos::ActivityMethod;
    ///
    /// let method: ActivityMethod = "Default_Branch_Updated".parse()?;
    /// assert_eq!(method, ActivityMethod::DefaultBranchUpdated);
    /// assert!("created".parse::<ActivityMethod>().is_err());
    /// # Ok::<(), stale_repos::Error>(())
    /// ```
    fn from_str(value: &str,) -> Result<Self, Self::Err,>
    {
        match value.trim().to_lowercase().as_str() {
            "pushed" => Ok(Self::Pushed,),
            "default_branch_updated" => Ok(Self::DefaultBranchUpdated,),
            _ => Err(Error::configuration(format!(
                "ACTIVITY_METHOD environment variable has unsupported value: '{value}'. Allowed \
                 values are: 'pushed' and 'default_branch_updated'"
            ),),),
        }
    }
}

/// Credentials used to authenticate against the GitHub API.
#[derive(Clone, PartialEq, Eq,)]
pub enum Credentials
{
    /// Personal access or workflow token.
    Token(String,),
    /// GitHub App installation credentials.
    App
    {
        /// Numeric application identifier.
        app_id:          u64,
        /// PEM-encoded RSA private key of the application.
        private_key:     String,
        /// Installation the token is minted for.
        installation_id: u64,
    },
}

impl fmt::Debug for Credentials
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        match self {
            Self::Token(_,) => f.debug_tuple("Token",).field(&"<redacted>",).finish(),
            Self::App {
                app_id,
                installation_id,
                ..
            } => f
                .debug_struct("App",)
                .field("app_id", app_id,)
                .field("private_key", &"<redacted>",)
                .field("installation_id", installation_id,)
                .finish(),
        }
    }
}

/// Unvalidated configuration values as supplied by flags or environment.
///
/// Blank strings are treated the same as absent values.
#[derive(Debug, Clone, Default,)]
pub struct ConfigInput
{
    pub token:           Option<String,>,
    pub inactive_days:   Option<String,>,
    pub organization:    Option<String,>,
    pub activity_method: Option<String,>,
    pub exempt_topics:   Option<String,>,
    pub exempt_repos:    Option<String,>,
    pub enterprise_url:  Option<String,>,
    pub app_id:          Option<String,>,
    pub app_private_key: Option<String,>,
    pub installation_id: Option<String,>,
    pub github_output:   Option<PathBuf,>,
    pub output_dir:      Option<PathBuf,>,
}

/// Validated, process-wide configuration resolved at startup.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct Config
{
    /// Repositories inactive for strictly more days than this are stale.
    pub inactive_days:   u64,
    /// Organization to scan; `None` scans repositories owned by the
    /// authenticated identity.
    pub organization:    Option<String,>,
    /// Glob patterns matched against repository names.
    pub exempt_repos:    Vec<String,>,
    /// Topic labels that exempt a repository.
    pub exempt_topics:   Vec<String,>,
    /// Strategy used to resolve activity dates.
    pub activity_method: ActivityMethod,
    /// Credentials used to authenticate.
    pub credentials:     Credentials,
    /// GitHub Enterprise base URL, when targeting an enterprise server.
    pub enterprise_url:  Option<String,>,
    /// Pipeline output file receiving `key=value` assignments.
    pub github_output:   Option<PathBuf,>,
    /// Directory that receives the report artifacts.
    pub output_dir:      PathBuf,
}

impl Config
{
    /// Validates raw input and produces the run configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when no credential is available, the
    /// threshold is missing or not a positive integer, the activity method is
    /// unsupported, or the app credential triple is incomplete.
    ///
    /// # Examples
    ///
    /// ```
    /// use stale_repos::{ActivityMethod, Config, ConfigInput};
    ///
    /// let config = Config::resolve(ConfigInput {
    ///     token: Some("ghp_example".to_owned(),),
    ///     inactive_days: Some("30".to_owned(),),
    ///     exempt_repos: Some("data-*, conf-*".to_owned(),),
    ///     ..ConfigInput::default()
    /// },)?;
    /// assert_eq!(config.inactive_days, 30);
    /// assert_eq!(config.exempt_repos, vec!["data-*", "conf-*"]);
    /// assert_eq!(config.activity_method, ActivityMethod::Pushed);
    /// # Ok::<(), stale_repos::Error>(())
    /// ```
    pub fn resolve(input: ConfigInput,) -> Result<Self, Error,>
    {
        let credentials = resolve_credentials(&input,)?;

        let inactive_days = non_blank(input.inactive_days.as_deref(),)
            .ok_or_else(|| Error::configuration("INACTIVE_DAYS environment variable not set",),)
            .and_then(parse_threshold,)?;

        let activity_method = match non_blank(input.activity_method.as_deref(),) {
            Some(value,) => value.parse()?,
            None => ActivityMethod::default(),
        };

        Ok(Self {
            inactive_days,
            organization: non_blank(input.organization.as_deref(),).map(str::to_owned,),
            exempt_repos: split_list(input.exempt_repos.as_deref(),),
            exempt_topics: split_list(input.exempt_topics.as_deref(),),
            activity_method,
            credentials,
            enterprise_url: non_blank(input.enterprise_url.as_deref(),)
                .map(|url| url.trim_end_matches('/',).to_owned(),),
            github_output: input.github_output.filter(|path| !path.as_os_str().is_empty(),),
            output_dir: input
                .output_dir
                .filter(|path| !path.as_os_str().is_empty(),)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR,),),
        },)
    }
}

fn resolve_credentials(input: &ConfigInput,) -> Result<Credentials, Error,>
{
    let app_id = non_blank(input.app_id.as_deref(),);
    let private_key = non_blank(input.app_private_key.as_deref(),);
    let installation_id = non_blank(input.installation_id.as_deref(),);

    match (app_id, private_key, installation_id,) {
        (Some(app_id,), Some(private_key,), Some(installation_id,),) => Ok(Credentials::App {
            app_id:          parse_id("GH_APP_ID", app_id,)?,
            private_key:     private_key.to_owned(),
            installation_id: parse_id("GH_APP_INSTALLATION_ID", installation_id,)?,
        },),
        (None, None, None,) => non_blank(input.token.as_deref(),)
            .map(|token| Credentials::Token(token.to_owned(),),)
            .ok_or_else(|| Error::configuration("GH_TOKEN environment variable not set",),),
        _ => match non_blank(input.token.as_deref(),) {
            Some(token,) => Ok(Credentials::Token(token.to_owned(),),),
            None => Err(Error::configuration(
                "GH_APP_ID, GH_APP_PRIVATE_KEY and GH_APP_INSTALLATION_ID must all be set to \
                 authenticate as a GitHub App",
            ),),
        },
    }
}

fn parse_threshold(value: &str,) -> Result<u64, Error,>
{
    match value.parse::<u64>() {
        Ok(days,) if days > 0 => Ok(days,),
        _ => Err(Error::configuration(format!(
            "INACTIVE_DAYS must be a positive integer, got '{value}'"
        ),),),
    }
}

fn parse_id(name: &str, value: &str,) -> Result<u64, Error,>
{
    value
        .parse::<u64>()
        .map_err(|_| Error::configuration(format!("{name} must be a numeric identifier"),),)
}

fn non_blank(value: Option<&str,>,) -> Option<&str,>
{
    value.map(str::trim,).filter(|value| !value.is_empty(),)
}

fn split_list(value: Option<&str,>,) -> Vec<String,>
{
    non_blank(value,)
        .map(|raw| {
            raw.split(',',)
                .map(str::trim,)
                .filter(|entry| !entry.is_empty(),)
                .map(str::to_owned,)
                .collect()
        },)
        .unwrap_or_default()
}
