//! Command-line interface for the stale repository scanner.
//!
//! Every option can be supplied as a flag or through the environment variable
//! a GitHub Actions workflow would set, so the binary runs unchanged as a
//! workflow step or from a shell. A `.env` file in the working directory is
//! loaded first; variables already present in the environment win.

use std::{
    path::{Path, PathBuf},
    process,
};

use clap::Parser;
use stale_repos::{Config, ConfigInput, Error, GitHubClient, run_scan};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Find repositories that have been inactive for longer than a threshold.
#[derive(Debug, Parser,)]
#[command(name = "stale-repos", version, about = "Report inactive GitHub repositories")]
struct Cli
{
    /// Personal access token used to authenticate.
    #[arg(long = "token", env = "GH_TOKEN", hide_env_values = true)]
    token: Option<String,>,

    /// Repositories inactive for more days than this are reported.
    #[arg(long = "inactive-days", value_name = "DAYS", env = "INACTIVE_DAYS")]
    inactive_days: Option<String,>,

    /// Organization to scan; defaults to repositories owned by the token owner.
    #[arg(long = "organization", value_name = "ORG", env = "ORGANIZATION")]
    organization: Option<String,>,

    /// Activity measure: `pushed` or `default_branch_updated`.
    #[arg(long = "activity-method", value_name = "METHOD", env = "ACTIVITY_METHOD")]
    activity_method: Option<String,>,

    /// Comma-separated topics that exempt a repository.
    #[arg(long = "exempt-topics", value_name = "TOPICS", env = "EXEMPT_TOPICS")]
    exempt_topics: Option<String,>,

    /// Comma-separated glob patterns of repository names to exempt.
    #[arg(long = "exempt-repos", value_name = "PATTERNS", env = "EXEMPT_REPOS")]
    exempt_repos: Option<String,>,

    /// Base URL of a GitHub Enterprise server.
    #[arg(long = "enterprise-url", value_name = "URL", env = "GH_ENTERPRISE_URL")]
    enterprise_url: Option<String,>,

    /// GitHub App identifier.
    #[arg(long = "app-id", env = "GH_APP_ID")]
    app_id: Option<String,>,

    /// GitHub App private key in PEM format.
    #[arg(long = "app-private-key", env = "GH_APP_PRIVATE_KEY", hide_env_values = true)]
    app_private_key: Option<String,>,

    /// GitHub App installation identifier.
    #[arg(long = "installation-id", env = "GH_APP_INSTALLATION_ID")]
    installation_id: Option<String,>,

    /// File receiving workflow step outputs.
    #[arg(long = "github-output", value_name = "PATH", env = "GITHUB_OUTPUT")]
    github_output: Option<PathBuf,>,

    /// Directory receiving `stale_repos.json` and `stale_repos.md`.
    #[arg(long = "output-dir", value_name = "DIR", env = "STALE_REPOS_OUTPUT_DIR")]
    output_dir: Option<PathBuf,>,
}

impl From<Cli,> for ConfigInput
{
    fn from(cli: Cli,) -> Self
    {
        Self {
            token:           cli.token,
            inactive_days:   cli.inactive_days,
            organization:    cli.organization,
            activity_method: cli.activity_method,
            exempt_topics:   cli.exempt_topics,
            exempt_repos:    cli.exempt_repos,
            enterprise_url:  cli.enterprise_url,
            app_id:          cli.app_id,
            app_private_key: cli.app_private_key,
            installation_id: cli.installation_id,
            github_output:   cli.github_output,
            output_dir:      cli.output_dir,
        }
    }
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main()
{
    if let Err(error,) = load_env_file(None,) {
        exit_with(error,);
    }

    init_tracing();

    if let Err(error,) = run(Cli::parse(),).await {
        exit_with(error,);
    }
}

fn exit_with(error: Error,) -> !
{
    eprintln!("{}", error.to_display_string());
    process::exit(1,);
}

/// Loads `path`, or `.env` from the working directory, into the process
/// environment before flags and environment fallbacks are parsed.
///
/// # Errors
///
/// Returns [`Error::Configuration`] when the file exists but cannot be read
/// or parsed. A missing file is not an error.
fn load_env_file(path: Option<&Path,>,) -> Result<(), Error,>
{
    let loaded = match path {
        Some(path,) => dotenvy::from_path(path,),
        None => dotenvy::dotenv().map(|_| (),),
    };

    match loaded {
        Ok((),) => Ok((),),
        Err(error,) if error.not_found() => Ok((),),
        Err(error,) => Err(Error::configuration(format!("failed to load .env file: {error}"),),),
    }
}

fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),);
    tracing_subscriber::fmt()
        .with_env_filter(filter,)
        .with_target(false,)
        .without_time()
        .with_writer(std::io::stdout,)
        .init();
}

/// Resolves configuration, authenticates, and runs the scan.
///
/// # Errors
///
/// Propagates configuration, authentication, API, and artifact errors.
async fn run(cli: Cli,) -> Result<(), Error,>
{
    info!("Starting stale repo search...");

    let config = Config::resolve(cli.into(),)?;
    let client = GitHubClient::connect(&config,).await?;

    run_scan(&client, &config,).await?;

    Ok((),)
}
