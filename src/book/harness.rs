//! Test harness for the cookbook pages
//!
//! Each page becomes a binary of a generated cargo project. Running the
//! harness executes every binary and checks its stdout against the output
//! block documented on the page.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::book::config::CookbookConfig;
use crate::book::snippets::{Page, SnippetUnit};
use crate::book::tasks::capture_command;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Passed,
    Failed(String),
    /// Page has no rust code
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub name: String,
    pub outcome: PageOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarnessReport {
    pub pages: Vec<PageReport>,
}

impl HarnessReport {
    pub fn passed(&self) -> impl Iterator<Item = &PageReport> {
        self.pages
            .iter()
            .filter(|page| page.outcome == PageOutcome::Passed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &PageReport> {
        self.pages
            .iter()
            .filter(|page| matches!(page.outcome, PageOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> impl Iterator<Item = &PageReport> {
        self.pages
            .iter()
            .filter(|page| page.outcome == PageOutcome::Skipped)
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }

    pub fn log_summary(&self) {
        for page in self.failed() {
            if let PageOutcome::Failed(reason) = &page.outcome {
                warn!(page = %page.name, %reason, "page failed");
            }
        }
        info!(
            passed = self.passed().count(),
            failed = self.failed().count(),
            skipped = self.skipped().count(),
            "cookbook test finished"
        );
    }
}

/// Markdown pages of the book, sorted by file name within each directory,
/// without `SUMMARY.md`
pub fn discover_pages(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().is_some_and(|ext| ext == "md")
            && entry.file_name() != "SUMMARY.md"
        {
            pages.push(path.to_path_buf());
        }
    }
    Ok(pages)
}

fn manifest(library_version: &str) -> String {
    format!(
        r#"[package]
name = "cookbook-tests"
version = "0.0.0"
edition = "2021"
publish = false

[dependencies]
bitcoin = {{ version = "={library_version}", features = ["rand-std", "base64"] }}

[workspace]
"#
    )
}

/// Pages parsed from the book; pages without code are reported as skipped
fn load_units(config: &CookbookConfig) -> Result<(Vec<SnippetUnit>, Vec<PageReport>)> {
    let mut units = Vec::new();
    let mut skipped = Vec::new();

    for path in discover_pages(&config.pages_dir())? {
        let page = Page::from_file(&path)?;
        match page.assemble() {
            Some(unit) => units.push(unit),
            None => {
                warn!(page = %page.name, "no rust code, skipping");
                skipped.push(PageReport {
                    name: page.name,
                    outcome: PageOutcome::Skipped,
                });
            }
        }
    }

    Ok((units, skipped))
}

/// Write the test project: one binary per page with code
pub fn generate(config: &CookbookConfig) -> Result<Vec<SnippetUnit>> {
    let (units, _) = load_units(config)?;
    write_project(config, &units)?;
    Ok(units)
}

fn write_project(config: &CookbookConfig, units: &[SnippetUnit]) -> Result<()> {
    let bin_dir = config.tests_dir.join("src").join("bin");
    if bin_dir.exists() {
        fs::remove_dir_all(&bin_dir)?;
    }
    fs::create_dir_all(&bin_dir)?;

    fs::write(
        config.tests_dir.join("Cargo.toml"),
        manifest(&config.library_version),
    )?;

    let mut names: Vec<&str> = Vec::with_capacity(units.len());
    for unit in units {
        if names.contains(&unit.name.as_str()) {
            return Err(Error::Snippet {
                path: config.pages_dir(),
                message: format!("two pages are named `{}`", unit.name),
            });
        }
        names.push(&unit.name);
        fs::write(bin_dir.join(format!("{}.rs", unit.name)), &unit.source)?;
    }

    info!(tests_dir = ?config.tests_dir, units = units.len(), "generated test project");
    Ok(())
}

fn normalize(output: &str) -> String {
    output.replace("\r\n", "\n").trim().to_owned()
}

/// Compare program output with the documented output, ignoring surrounding
/// whitespace and line ending style
pub fn outputs_match(expected: &str, actual: &str) -> bool {
    normalize(expected) == normalize(actual)
}

fn run_unit(config: &CookbookConfig, unit: &SnippetUnit) -> Result<PageOutcome> {
    let action = if unit.no_run { "build" } else { "run" };
    let output = capture_command(
        Command::new("cargo")
            .args([action, "--quiet", "--bin", unit.name.as_str()])
            .current_dir(&config.tests_dir),
    )?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Ok(PageOutcome::Failed(format!(
            "cargo {action} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    if unit.no_run {
        return Ok(PageOutcome::Passed);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(check_output(unit, &stdout))
}

fn check_output(unit: &SnippetUnit, stdout: &str) -> PageOutcome {
    match &unit.expected_output {
        Some(expected) if !outputs_match(expected, stdout) => PageOutcome::Failed(format!(
            "output mismatch\nexpected:\n{}\nactual:\n{}",
            normalize(expected),
            normalize(stdout)
        )),
        _ => PageOutcome::Passed,
    }
}

/// Generate the test project and run every page
pub fn run(config: &CookbookConfig) -> Result<HarnessReport> {
    let (units, skipped) = load_units(config)?;
    write_project(config, &units)?;

    let mut report = HarnessReport { pages: skipped };
    for unit in &units {
        let outcome = run_unit(config, unit)?;
        match &outcome {
            PageOutcome::Passed => info!(page = %unit.name, "page passed"),
            PageOutcome::Failed(_) => warn!(page = %unit.name, "page failed"),
            PageOutcome::Skipped => {}
        }
        report.pages.push(PageReport {
            name: unit.name.clone(),
            outcome,
        });
    }

    Ok(report)
}
