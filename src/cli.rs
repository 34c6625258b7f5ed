use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, PartialEq)]
#[command(name = "topicharvest")]
#[command(about = "Create one metadata folder per GitHub repository matching a topic search")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<CliCommand>,

    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory that receives the repository folders (overrides config)
    #[arg(long, global = true)]
    pub work_dir: Option<PathBuf>,

    /// Number of worker threads (overrides config)
    #[arg(long, global = true)]
    pub workers: Option<usize>,

    /// Keep the search's own ordering instead of sampling at random
    #[arg(long, global = true)]
    pub no_shuffle: bool,

    /// Minimum star count (overrides config)
    #[arg(long, global = true)]
    pub min_stars: Option<u32>,

    /// Topic to search for; repeat for several (overrides config)
    #[arg(long = "topic", global = true)]
    pub topics: Vec<String>,
}

/// Without a subcommand the interactive menu is shown
#[derive(Subcommand, Debug, PartialEq, Clone)]
pub enum CliCommand {
    /// Search and create folders
    Process {
        /// Maximum number of repositories to process
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Remove every folder previously created
    Clean,
    /// Remove existing folders, then process new repositories
    CleanProcess {
        #[arg(long)]
        limit: Option<usize>,
    },
}
