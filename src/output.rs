// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Publishing of step outputs through the GitHub Actions output file.
///
/// Values are appended to the file named by `GITHUB_OUTPUT`. Single-line
/// values use `key=value`; multi-line values use the heredoc delimiter form
/// understood by the Actions runner.
use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::{self, Error};

const DELIMITER_PREFIX: &str = "STALE_REPOS_EOF";

/// Handle to the pipeline output file.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct PipelineOutput
{
    path: PathBuf,
}

impl PipelineOutput
{
    /// Creates a handle for the output file at `path`.
    pub fn new(path: impl Into<PathBuf,>,) -> Self
    {
        Self {
            path: path.into(),
        }
    }

    /// Location of the output file.
    pub fn path(&self,) -> &Path
    {
        &self.path
    }

    /// Appends the assignment `key=value`, creating the file when missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be opened or written.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use stale_repos::PipelineOutput;
    ///
    /// # fn example() -> Result<(), stale_repos::Error> {
    /// let output = PipelineOutput::new("/github/output",);
    /// output.set("inactiveRepos", "[]",)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn set(&self, key: &str, value: &str,) -> Result<(), Error,>
    {
        let mut file = OpenOptions::new()
            .create(true,)
            .append(true,)
            .open(&self.path,)
            .map_err(|source| error::io_error(&self.path, source,),)?;

        let entry = format_assignment(key, value,);
        file.write_all(entry.as_bytes(),).map_err(|source| error::io_error(&self.path, source,),)
    }
}

fn format_assignment(key: &str, value: &str,) -> String
{
    if !value.contains('\n',) && !value.contains('\r',) {
        return format!("{key}={value}\n");
    }

    let mut delimiter = DELIMITER_PREFIX.to_owned();
    let mut suffix = 0u32;
    while value.contains(&delimiter,) {
        suffix += 1;
        delimiter = format!("{DELIMITER_PREFIX}_{suffix}");
    }

    let separator = if value.ends_with('\n',) { "" } else { "\n" };
    format!("{key}<<{delimiter}\n{value}{separator}{delimiter}\n")
}
