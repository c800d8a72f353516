// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! JSON and Markdown renderings of the stale repository list.
//!
//! Both emitters write to any [`Write`] sink so they can be exercised against
//! in-memory buffers. [`write_reports`] is the default sink: it creates or
//! overwrites `stale_repos.json` and `stale_repos.md` inside the configured
//! output directory. When a [`PipelineOutput`] is supplied the rendered text is
//! also published as step outputs.

use std::{
    fmt::Write as _,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    error::{self, Error},
    output::PipelineOutput,
    repository::InactivityRecord,
};

/// File name of the JSON artifact.
pub const JSON_REPORT_FILE: &str = "stale_repos.json";
/// File name of the Markdown artifact.
pub const MARKDOWN_REPORT_FILE: &str = "stale_repos.md";
/// Output variable receiving the JSON report.
pub const JSON_OUTPUT_KEY: &str = "inactiveRepos";
/// Output variable receiving the Markdown report.
pub const MARKDOWN_OUTPUT_KEY: &str = "staleReposMarkdown";

/// Locations of the artifacts produced by [`write_reports`].
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct ReportPaths
{
    /// Path of the JSON artifact.
    pub json:     PathBuf,
    /// Path of the Markdown artifact.
    pub markdown: PathBuf,
}

/// Serializes records as a compact JSON array, preserving their order.
///
/// # Errors
///
/// Returns [`Error::Serialize`] when encoding fails.
///
/// # Examples
///
/// ```
/// use stale_repos::{InactivityRecord, Visibility, render_json};
///
/// let json = render_json(&[InactivityRecord {
///     url:            "https://github.com/octo/old".to_owned(),
///     days_inactive:  31,
///     last_push_date: "2024-01-01".to_owned(),
///     visibility:     Visibility::Private,
/// }],)?;
/// assert_eq!(
///     json,
///     r#"[{"url":"https://github.com/octo/old","daysInactive":31,"lastPushDate":"2024-01-01","visibility":"private"}]"#
/// );
/// # Ok::<(), stale_repos::Error>(())
/// ```
pub fn render_json(records: &[InactivityRecord],) -> Result<String, Error,>
{
    Ok(serde_json::to_string(records,)?,)
}

/// Renders the Markdown report naming `inactive_days` as the threshold.
pub fn render_markdown(records: &[InactivityRecord], inactive_days: u64,) -> String
{
    let mut markdown = String::with_capacity(160 + records.len() * 96,);
    markdown.push_str("# Inactive Repositories\n\n",);
    let _ = write!(
        markdown,
        "The following repos have not had a push event for more than {inactive_days} days:\n\n"
    );
    markdown.push_str("| Repository URL | Days Inactive | Last Push Date | Visibility |\n",);
    markdown.push_str("| --- | --- | ---: | --- |\n",);
    for record in records {
        let _ = writeln!(
            markdown,
            "| {} | {} | {} | {} |",
            record.url, record.days_inactive, record.last_push_date, record.visibility
        );
    }
    markdown
}

/// Writes the JSON report to `writer` and returns the rendered text.
///
/// # Errors
///
/// Returns [`Error::Serialize`] when encoding fails and [`Error::Io`] when the
/// sink or the pipeline output cannot be written.
pub fn write_json_report<W: Write,>(
    writer: &mut W,
    records: &[InactivityRecord],
    pipeline: Option<&PipelineOutput,>,
) -> Result<String, Error,>
{
    emit_json(writer, Path::new(JSON_REPORT_FILE,), records, pipeline,)
}

fn emit_json<W: Write,>(
    writer: &mut W,
    path: &Path,
    records: &[InactivityRecord],
    pipeline: Option<&PipelineOutput,>,
) -> Result<String, Error,>
{
    let json = render_json(records,)?;
    write_text(writer, path, &json,)?;

    if let Some(output,) = pipeline {
        output.set(JSON_OUTPUT_KEY, &json,)?;
    }

    Ok(json,)
}

/// Writes the Markdown report to `writer` and returns the rendered text.
///
/// # Errors
///
/// Returns [`Error::Io`] when the sink or the pipeline output cannot be
/// written.
pub fn write_markdown_report<W: Write,>(
    writer: &mut W,
    records: &[InactivityRecord],
    inactive_days: u64,
    pipeline: Option<&PipelineOutput,>,
) -> Result<String, Error,>
{
    emit_markdown(writer, Path::new(MARKDOWN_REPORT_FILE,), records, inactive_days, pipeline,)
}

fn emit_markdown<W: Write,>(
    writer: &mut W,
    path: &Path,
    records: &[InactivityRecord],
    inactive_days: u64,
    pipeline: Option<&PipelineOutput,>,
) -> Result<String, Error,>
{
    let markdown = render_markdown(records, inactive_days,);
    write_text(writer, path, &markdown,)?;

    if let Some(output,) = pipeline {
        output.set(MARKDOWN_OUTPUT_KEY, &markdown,)?;
    }

    Ok(markdown,)
}

/// Writes `text` and flushes; failures are attributed to `path`.
fn write_text<W: Write,>(writer: &mut W, path: &Path, text: &str,) -> Result<(), Error,>
{
    writer
        .write_all(text.as_bytes(),)
        .and_then(|()| writer.flush(),)
        .map_err(|source| error::io_error(path, source,),)
}

/// Creates or overwrites both artifacts inside `output_dir`.
///
/// # Errors
///
/// Returns [`Error::Io`] when the directory or files cannot be written and
/// [`Error::Serialize`] when JSON encoding fails.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use stale_repos::write_reports;
///
/// # fn example() -> Result<(), stale_repos::Error> {
/// let paths = write_reports(Path::new("."), &[], 30, None,)?;
/// println!("JSON: {}", paths.json.display());
/// # Ok(())
/// # }
/// ```
pub fn write_reports(
    output_dir: &Path,
    records: &[InactivityRecord],
    inactive_days: u64,
    pipeline: Option<&PipelineOutput,>,
) -> Result<ReportPaths, Error,>
{
    fs::create_dir_all(output_dir,).map_err(|source| error::io_error(output_dir, source,),)?;

    let json_path = output_dir.join(JSON_REPORT_FILE,);
    let mut json_file = create_file(&json_path,)?;
    emit_json(&mut json_file, &json_path, records, pipeline,)?;
    info!("Wrote stale repos to {}", json_path.display());

    let markdown_path = output_dir.join(MARKDOWN_REPORT_FILE,);
    let mut markdown_file = create_file(&markdown_path,)?;
    emit_markdown(&mut markdown_file, &markdown_path, records, inactive_days, pipeline,)?;
    info!("Wrote stale repos to {}", markdown_path.display());

    Ok(ReportPaths {
        json:     json_path,
        markdown: markdown_path,
    },)
}

fn create_file(path: &Path,) -> Result<BufWriter<File,>, Error,>
{
    File::create(path,).map(BufWriter::new,).map_err(|source| error::io_error(path, source,),)
}
