//! Parser for the markdown report each student submits.
//!
//! The document carries a `## Task Summary` section describing the task and
//! model, followed by a `## Test Summary` section with one `### Test <n>:`
//! block per test case.

use anyhow::{Context, Result, bail};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::roster::Student;

pub const TASK_SUMMARY_MARKER: &str = "## Task Summary";
pub const TEST_SUMMARY_MARKER: &str = "## Test Summary";

static TEST_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"### Test [0-9]+:").expect("valid test heading pattern"));

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n+").expect("valid blank line pattern"));

/// Content extracted from one submission document.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Task summary section, marker heading included.
    pub summary: String,
    /// Raw text of each test block, in document order, headings stripped.
    pub tests: Vec<String>,
}

/// Splits a submission document into its summary and test blocks.
///
/// # Errors
///
/// Returns an error if the task summary marker is absent, or if the test
/// summary marker does not occur exactly once within the task section.
pub fn parse_submission(markdown: &str) -> Result<Submission> {
    let Some((_, after_task)) = markdown.split_once(TASK_SUMMARY_MARKER) else {
        bail!("document has no '{TASK_SUMMARY_MARKER}' section");
    };
    let section = after_task
        .split_once(TASK_SUMMARY_MARKER)
        .map_or(after_task, |(first, _)| first);

    let parts: Vec<&str> = section.split(TEST_SUMMARY_MARKER).collect();
    let [description, tests] = parts.as_slice() else {
        bail!(
            "expected exactly one '{TEST_SUMMARY_MARKER}' section, found {}",
            parts.len() - 1
        );
    };

    let tests = TEST_HEADING
        .split(tests)
        .skip(1)
        .map(str::to_string)
        .collect();

    Ok(Submission {
        summary: format!("{TASK_SUMMARY_MARKER}\n\n{description}"),
        tests,
    })
}

/// Strips emphasis markers and collapses runs of blank lines, since the
/// forms service renders descriptions as plain text.
pub fn clean_markdown(text: &str) -> String {
    let text = text.replace('*', "");
    BLANK_RUN.replace_all(&text, "\n\n").into_owned()
}

/// Finds the first markdown document in the student's extracted directory.
pub fn locate_document(submissions_dir: &Path, student: &Student) -> Result<PathBuf> {
    let dir = submissions_dir.join(student.dir_name());
    let entries =
        fs::read_dir(&dir).with_context(|| format!("no submission directory '{}'", dir.display()))?;

    let mut documents = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("md") {
            documents.push(path);
        }
    }
    documents.sort();

    documents
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("no .md document in '{}'", dir.display()))
}

/// Locates and parses the submission of `student`.
pub fn load_submission(submissions_dir: &Path, student: &Student) -> Result<Submission> {
    let path = locate_document(submissions_dir, student)?;
    let markdown = fs::read_to_string(&path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    parse_submission(&markdown).with_context(|| format!("malformed submission '{}'", path.display()))
}
