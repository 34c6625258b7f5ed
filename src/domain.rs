use serde::Deserialize;
use std::fmt;

/// Name of the marker file written into every folder this tool creates
pub const MARKER_FILE: &str = "info.txt";

/// Description line used when a repository has none
pub const NO_DESCRIPTION: &str = "No description available";

/// A repository as reported by the remote search
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoDescriptor {
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
}

impl RepoDescriptor {
    pub fn new(full_name: impl Into<String>, html_url: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            html_url: html_url.into(),
            description: None,
            fork: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn as_fork(mut self) -> Self {
        self.fork = true;
        self
    }

    /// Local folder name for this repository
    pub fn folder_name(&self) -> String {
        sanitize_name(&self.full_name)
    }
}

impl fmt::Display for RepoDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.full_name, self.html_url)
    }
}

/// Result of processing a single repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    SkippedFork,
    SkippedDuplicate,
    Created(String),
    Failed { full_name: String, reason: String },
}

impl Outcome {
    pub fn is_created(&self) -> bool {
        matches!(self, Outcome::Created(_))
    }
}

/// Map a qualified `owner/name` to a lowercase, directory-safe name.
///
/// Path separators and anything that is not alphanumeric become `_`. Distinct
/// names may collide (`a/b-c` and `a/b_c`); that is accepted.
pub fn sanitize_name(full_name: &str) -> String {
    full_name
        .replace(['/', '\\'], "_")
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Render the contents of the marker file.
///
/// The record is always exactly two lines; line breaks inside the description
/// become spaces.
pub fn render_info(url: &str, description: Option<&str>) -> String {
    let description = match description {
        Some(d) if !d.trim().is_empty() => d.replace(['\r', '\n'], " "),
        _ => NO_DESCRIPTION.to_string(),
    };
    format!("Repository URL: {url}\nDescription: {description}")
}
