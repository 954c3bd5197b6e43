//! Code block extraction from cookbook pages
//!
//! Every page is turned into a single program: its rust blocks run in
//! document order, and an optional `text,output` block holds what the
//! program must print.

use std::path::Path;

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag};

use crate::error::{Error, Result};

/// A rust code block kept for the page's program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Source with hidden lines revealed
    pub code: String,
    pub no_run: bool,
}

/// A parsed cookbook page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub name: String,
    pub blocks: Vec<CodeBlock>,
    pub expected_output: Option<String>,
}

/// One compilable program assembled from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetUnit {
    pub name: String,
    pub source: String,
    /// Compile only, never execute
    pub no_run: bool,
    pub expected_output: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fence {
    Rust { no_run: bool },
    Output,
    Skip,
}

fn classify(info: &str) -> Fence {
    let tokens: Vec<&str> = info
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    match tokens.first() {
        Some(&"rust") => {
            if tokens.iter().any(|t| *t == "ignore" || *t == "compile_fail") {
                Fence::Skip
            } else {
                Fence::Rust {
                    no_run: tokens.contains(&"no_run"),
                }
            }
        }
        Some(&"text") if tokens.contains(&"output") => Fence::Output,
        _ => Fence::Skip,
    }
}

/// Reveal rustdoc hidden lines: `# foo` becomes `foo` and `##` escapes a literal `#`
fn unhide(line: &str) -> &str {
    let trimmed = line.trim_start();
    if trimmed == "#" {
        ""
    } else if let Some(rest) = trimmed.strip_prefix("# ") {
        rest
    } else if trimmed.starts_with("##") {
        &trimmed[1..]
    } else {
        line
    }
}

impl Page {
    /// Collect the fenced blocks of a markdown document
    pub fn parse(name: impl Into<String>, markdown: &str) -> Self {
        let mut blocks = Vec::new();
        let mut outputs: Vec<String> = Vec::new();
        let mut current: Option<(Fence, String)> = None;

        for event in Parser::new(markdown) {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    current = Some((classify(&info), String::new()));
                }
                Event::Text(text) => {
                    if let Some((_, body)) = current.as_mut() {
                        body.push_str(&text);
                    }
                }
                Event::End(Tag::CodeBlock(_)) => match current.take() {
                    Some((Fence::Rust { no_run }, body)) => {
                        let code = body.lines().map(unhide).collect::<Vec<_>>().join("\n");
                        blocks.push(CodeBlock { code, no_run });
                    }
                    Some((Fence::Output, body)) => outputs.push(body),
                    _ => {}
                },
                _ => {}
            }
        }

        let expected_output = if outputs.is_empty() {
            None
        } else {
            Some(outputs.concat())
        };

        Self {
            name: name.into(),
            blocks,
            expected_output,
        }
    }

    /// Read and parse a page; its name is the file stem
    pub fn from_file(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| Error::Snippet {
                path: path.to_path_buf(),
                message: "page file name is not valid UTF-8".to_owned(),
            })?;
        let markdown = std::fs::read_to_string(path)?;
        Ok(Self::parse(name, &markdown))
    }

    /// Join the page's code blocks into one program
    ///
    /// Code without its own `fn main` is wrapped in one, the way rustdoc
    /// wraps doctests. Pages without rust blocks have no program.
    pub fn assemble(&self) -> Option<SnippetUnit> {
        if self.blocks.is_empty() {
            return None;
        }

        let code = self
            .blocks
            .iter()
            .map(|block| block.code.trim_end())
            .collect::<Vec<_>>()
            .join("\n\n");

        let has_main = code
            .lines()
            .any(|line| line.trim_start().starts_with("fn main("));

        let source = if has_main {
            format!("{code}\n")
        } else {
            // crate attributes cannot live inside a function
            let (attrs, body): (Vec<&str>, Vec<&str>) = code
                .lines()
                .partition(|line| line.trim_start().starts_with("#!["));
            let mut source = String::new();
            for attr in attrs {
                source.push_str(attr.trim_start());
                source.push('\n');
            }
            source.push_str("fn main() {\n");
            // lines are copied as written so multi-line literals keep their text
            for line in body {
                source.push_str(line);
                source.push('\n');
            }
            source.push_str("}\n");
            source
        };

        Some(SnippetUnit {
            name: self.name.clone(),
            source,
            no_run: self.blocks.iter().any(|block| block.no_run),
            expected_output: self.expected_output.clone(),
        })
    }
}
