//! Check command handler

use std::path::{Path, PathBuf};

use pagekit::{ObjectRepository, Platform};

use crate::commands::CheckArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::Reporter;

/// Problems found in one repository file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Checked file
    pub path: PathBuf,
    /// Distinct elements in the file, zero when it failed to load
    pub elements: usize,
    /// One message per problem
    pub problems: Vec<String>,
}

impl FileReport {
    /// Whether the file is clean
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Load `path` and validate every element for every platform in `platforms`
#[must_use]
pub fn check_file(path: &Path, platforms: &[Platform]) -> FileReport {
    let load_platform = platforms.first().copied().unwrap_or(Platform::Web);
    match ObjectRepository::load(path, load_platform) {
        Ok(repo) => FileReport {
            path: path.to_path_buf(),
            elements: repo.len(),
            problems: repo
                .validate(platforms)
                .iter()
                .map(ToString::to_string)
                .collect(),
        },
        Err(e) => FileReport {
            path: path.to_path_buf(),
            elements: 0,
            problems: vec![e.to_string()],
        },
    }
}

/// Execute the check command
pub fn execute_check(config: &CliConfig, args: &CheckArgs, reporter: &Reporter) -> CliResult<()> {
    let platforms: Vec<Platform> = if args.platform.is_empty() {
        Platform::ALL.to_vec()
    } else {
        args.platform.iter().map(|&p| p.into()).collect()
    };
    tracing::info!(files = args.files.len(), ?platforms, "checking repositories");

    let mut problems = 0;
    let mut failed_files = 0;
    for path in &args.files {
        let report = check_file(path, &platforms);
        if report.is_ok() {
            reporter.success(&format!(
                "{} ({} elements)",
                report.path.display(),
                report.elements
            ));
            continue;
        }
        failed_files += 1;
        problems += report.problems.len();
        for problem in &report.problems {
            reporter.failure(problem);
        }
    }

    if problems > 0 {
        return Err(CliError::ValidationFailed {
            problems,
            files: failed_files,
        });
    }
    if !config.verbosity.is_quiet() {
        reporter.line(&reporter.dim(&format!(
            "{} file(s) checked, no problems",
            args.files.len()
        )));
    }
    Ok(())
}
