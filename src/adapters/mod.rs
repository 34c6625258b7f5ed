pub mod fs;
pub mod github;

pub use fs::LocalFileSystem;
pub use github::GitHubSearchClient;
