//! # Command Line Interface
//!
//! Arguments of the `cookbook` binary, parsed with `clap`.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::book::Task;

/// Build, serve, test and deploy the Bitcoin transaction cookbook
#[derive(Parser, Debug, Clone)]
#[command(name = "cookbook", version, about, long_about = None)]
pub struct Args {
    /// TOML formatted configuration file
    #[arg(long, default_value = "cookbook.toml")]
    pub config: PathBuf,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Render the book and the landing site
    Build,
    /// Serve the book locally
    Serve,
    /// Run the code of every page and check its output
    Test,
    /// Build and collect the rendered outputs
    Deploy {
        /// Also commit and push the outputs
        #[arg(long)]
        deploy: bool,
    },
}

impl Commands {
    pub fn task(&self) -> Task {
        match self {
            Commands::Build => Task::Build,
            Commands::Serve => Task::Serve,
            Commands::Test => Task::Test,
            Commands::Deploy { deploy } => Task::Deploy { publish: *deploy },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_from(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(args)
    }

    #[test]
    fn parse_test_task() {
        let args = parse_from(&["cookbook", "test"]).unwrap();
        assert_eq!(args.command.task(), Task::Test);
        assert_eq!(args.config, PathBuf::from("cookbook.toml"));
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn parse_deploy_flag() {
        let args = parse_from(&["cookbook", "deploy"]).unwrap();
        assert_eq!(args.command.task(), Task::Deploy { publish: false });

        let args = parse_from(&["cookbook", "deploy", "--deploy"]).unwrap();
        assert_eq!(args.command.task(), Task::Deploy { publish: true });
    }

    #[test]
    fn parse_global_options() {
        let args = parse_from(&["cookbook", "--config", "alt.toml", "-vv", "build"]).unwrap();
        assert_eq!(args.config, PathBuf::from("alt.toml"));
        assert_eq!(args.verbose, 2);
        assert_eq!(args.command.task(), Task::Build);
    }

    #[test]
    fn unknown_task() {
        assert!(parse_from(&["cookbook", "publish"]).is_err());
        assert!(parse_from(&["cookbook"]).is_err());
        assert!(parse_from(&["cookbook", "build", "--deploy"]).is_err());
    }
}
