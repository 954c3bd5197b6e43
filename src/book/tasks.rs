//! Build, serve, test and deploy actions for the cookbook

use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tracing::info;
use walkdir::WalkDir;

use crate::book::config::CookbookConfig;
use crate::book::harness;
use crate::error::{Error, Result};

/// An action of the `cookbook` binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Render the book with mdBook and the landing site with zola
    Build,
    /// Serve the book locally with live reload
    Serve,
    /// Run every page's code and compare it with the documented output
    Test,
    /// Build and collect outputs; `publish` also commits and pushes them
    Deploy { publish: bool },
}

fn program_name(command: &Command) -> String {
    command.get_program().to_string_lossy().into_owned()
}

/// Run a command with inherited stdio, failing on a non-zero exit status
pub fn run_command(command: &mut Command) -> Result<()> {
    let program = program_name(command);
    info!(command = ?command, "running");

    let status = command.status().map_err(|e| Error::CommandFailed {
        program: program.clone(),
        status: e.to_string(),
    })?;

    if !status.success() {
        return Err(Error::CommandFailed {
            program,
            status: status.to_string(),
        });
    }
    Ok(())
}

/// Run a command and capture its output; the exit status is left to the caller
pub fn capture_command(command: &mut Command) -> Result<Output> {
    let program = program_name(command);
    command.output().map_err(|e| Error::CommandFailed {
        program,
        status: e.to_string(),
    })
}

fn command<I, S>(program: &str, args: I, dir: Option<&Path>) -> Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = dir {
        command.current_dir(dir);
    }
    command
}

impl Task {
    pub fn run(self, config: &CookbookConfig) -> Result<()> {
        match self {
            Task::Build => build(config),
            Task::Serve => serve(config),
            Task::Test => test(config),
            Task::Deploy { publish } => deploy(config, publish),
        }
    }
}

fn build(config: &CookbookConfig) -> Result<()> {
    run_command(&mut command(
        "mdbook",
        [OsStr::new("build"), config.book_dir.as_os_str()],
        None,
    ))?;
    run_command(&mut command("zola", ["build"], Some(config.site_dir.as_path())))?;
    info!("build finished");
    Ok(())
}

fn serve(config: &CookbookConfig) -> Result<()> {
    run_command(&mut command(
        "mdbook",
        [OsStr::new("serve"), config.book_dir.as_os_str()],
        None,
    ))
}

fn test(config: &CookbookConfig) -> Result<()> {
    let report = harness::run(config)?;
    report.log_summary();
    if report.is_success() {
        Ok(())
    } else {
        Err(Error::CommandFailed {
            program: "cookbook test".to_owned(),
            status: format!("{} page(s) failed", report.failed().count()),
        })
    }
}

/// Copy a directory tree, overwriting files that already exist
pub fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(std::io::Error::other)?;
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

/// Lay out the rendered site and book in the output directory
///
/// The site goes at the root and the book under `book/`.
pub fn collect_outputs(config: &CookbookConfig) -> Result<()> {
    let output_dir = &config.deploy.output_dir;
    if output_dir.exists() {
        fs::remove_dir_all(output_dir)?;
    }
    copy_dir(&config.site_output_dir(), output_dir)?;
    copy_dir(&config.book_output_dir(), &output_dir.join("book"))?;
    info!(?output_dir, "collected outputs");
    Ok(())
}

fn deploy(config: &CookbookConfig, publish: bool) -> Result<()> {
    build(config)?;
    collect_outputs(config)?;

    if !publish {
        info!("outputs collected, pass --deploy to publish");
        return Ok(());
    }

    let output_dir = config.deploy.output_dir.as_path();
    let deploy = &config.deploy;
    run_command(&mut command("git", ["init", "--quiet"], Some(output_dir)))?;
    run_command(&mut command("git", ["add", "--all"], Some(output_dir)))?;
    run_command(&mut command(
        "git",
        ["commit", "--quiet", "-m", "Deploy cookbook"],
        Some(output_dir),
    ))?;
    run_command(&mut command(
        "git",
        [
            "push".to_owned(),
            "--force".to_owned(),
            deploy.remote.clone(),
            format!("HEAD:{}", deploy.branch),
        ],
        Some(output_dir),
    ))?;
    info!(remote = %deploy.remote, branch = %deploy.branch, "published");
    Ok(())
}
