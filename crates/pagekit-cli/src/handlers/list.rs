//! List command handler

use pagekit::{ObjectRepository, Platform};

use crate::commands::ListArgs;
use crate::error::CliResult;
use crate::output::Reporter;

/// One element and the platforms it declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSummary {
    /// Element name
    pub name: String,
    /// Declared platforms, in document order
    pub platforms: Vec<Platform>,
    /// Whether the name is defined more than once
    pub duplicated: bool,
}

/// Summarize every distinct element of `repo`
#[must_use]
pub fn summarize(repo: &ObjectRepository) -> Vec<ElementSummary> {
    repo.element_names()
        .into_iter()
        .filter_map(|name| repo.descriptor(name))
        .map(|descriptor| ElementSummary {
            name: descriptor.name().to_string(),
            platforms: descriptor.platforms().collect(),
            duplicated: repo.duplicates().iter().any(|d| d == descriptor.name()),
        })
        .collect()
}

/// Execute the list command.
///
/// Element lines are the command's result and print even in quiet mode;
/// only the header is suppressed.
pub fn execute_list(args: &ListArgs, reporter: &Reporter) -> CliResult<()> {
    let repo = ObjectRepository::load(&args.file, Platform::Web)?;
    let summaries = summarize(&repo);
    let width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(0);

    reporter.header(&format!("{} ({} elements)", args.file.display(), summaries.len()));
    for summary in &summaries {
        let platforms = summary
            .platforms
            .iter()
            .map(|p| p.tag())
            .collect::<Vec<_>>()
            .join(", ");
        let marker = if summary.duplicated { " (duplicate)" } else { "" };
        reporter.line(&format!(
            "{:width$}  {}{marker}",
            summary.name,
            reporter.dim(&platforms)
        ));
    }
    Ok(())
}
