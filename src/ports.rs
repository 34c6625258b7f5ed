//! Collaborator interfaces injected into the pipeline and the cleanup sweep.

use crate::domain::RepoDescriptor;
use crate::error::FetchError;
use std::ffi::OsString;
use std::io;
use std::path::Path;

/// Filter predicate sent to the remote search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub topics: Vec<String>,
    pub min_stars: u32,
}

impl SearchQuery {
    pub fn new(topics: Vec<String>, min_stars: u32) -> Self {
        Self { topics, min_stars }
    }

    /// Render the query string. Forks are always excluded here; the processor
    /// checks the fork flag again per repository.
    pub fn to_query_string(&self) -> String {
        let mut parts: Vec<String> = self.topics.iter().map(|t| format!("topic:{t}")).collect();
        parts.push(format!("stars:>{}", self.min_stars));
        parts.push("fork:false".to_string());
        parts.join(" ")
    }
}

/// Lazily paginated search results
pub type RepoIter<'a> = Box<dyn Iterator<Item = Result<RepoDescriptor, FetchError>> + 'a>;

/// Port for the remote repository search
pub trait SearchClient: Send + Sync {
    /// Run one query. Pages are fetched as the iterator is advanced.
    fn search(&self, query: &SearchQuery) -> RepoIter<'_>;
}

/// Port for the filesystem. Every path is relative to the working directory.
/// All calls are blocking.
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Non-recursive; fails if the entry already exists
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    fn write_file(&self, path: &Path, contents: &str) -> io::Result<()>;

    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Names of the immediate children of the working directory, unmodified
    fn list_dir(&self) -> io::Result<Vec<OsString>>;

    /// Absolute location of the working directory, for messages
    fn root(&self) -> &Path;
}
