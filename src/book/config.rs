//! Cookbook tooling configuration
//!
//! Read from `cookbook.toml` at the repository root. Every field is optional.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Where the book, site and generated tests live
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CookbookConfig {
    /// mdBook root holding `book.toml` and `src/`
    pub book_dir: PathBuf,
    /// Landing site built with zola
    pub site_dir: PathBuf,
    /// Generated test project, one binary per page
    pub tests_dir: PathBuf,
    /// `bitcoin` version the generated tests depend on
    pub library_version: String,
    pub deploy: DeployConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub remote: String,
    pub branch: String,
    /// Directory the built book and site are copied into before publishing
    pub output_dir: PathBuf,
}

impl Default for CookbookConfig {
    fn default() -> Self {
        Self {
            book_dir: PathBuf::from("cookbook"),
            site_dir: PathBuf::from("site"),
            tests_dir: PathBuf::from("target/cookbook-tests"),
            library_version: "0.32.5".to_owned(),
            deploy: DeployConfig::default(),
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_owned(),
            branch: "gh-pages".to_owned(),
            output_dir: PathBuf::from("public"),
        }
    }
}

impl CookbookConfig {
    /// Load the configuration, falling back to defaults if `path` does not exist
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            Self::try_parse_file(path)?
        } else {
            tracing::debug!(?path, "no configuration file, using defaults");
            Self::default()
        };

        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn try_parse_file(path: &Path) -> Result<Self> {
        let mut contents = String::new();
        let mut file = File::open(path).map_err(|e| Error::Config(e.to_string()))?;
        file.read_to_string(&mut contents)
            .map_err(|e| Error::Config(e.to_string()))?;

        tracing::trace!("Using configuration file: {:?}", path);

        Self::try_parse_from(&contents)
    }

    /// Parse a TOML formatted string
    pub fn try_parse_from(input: &str) -> Result<Self> {
        toml::from_str::<CookbookConfig>(input).map_err(|e| Error::Config(e.to_string()))
    }

    /// Apply `COOKBOOK_BOOK_DIR` and `COOKBOOK_TESTS_DIR` as looked up by `var`
    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = var("COOKBOOK_BOOK_DIR") {
            self.book_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("COOKBOOK_TESTS_DIR") {
            self.tests_dir = PathBuf::from(dir);
        }
        self
    }

    /// Markdown sources of the book
    pub fn pages_dir(&self) -> PathBuf {
        self.book_dir.join("src")
    }

    /// Where `mdbook build` writes the rendered book
    pub fn book_output_dir(&self) -> PathBuf {
        self.book_dir.join("book")
    }

    /// Where `zola build` writes the rendered site
    pub fn site_output_dir(&self) -> PathBuf {
        self.site_dir.join("public")
    }
}
