//! Tooling that builds, serves, tests and deploys the cookbook

pub mod config;
pub mod harness;
pub mod snippets;
pub mod tasks;

pub use config::{CookbookConfig, DeployConfig};
pub use harness::{HarnessReport, PageOutcome, PageReport};
pub use snippets::{CodeBlock, Page, SnippetUnit};
pub use tasks::Task;
