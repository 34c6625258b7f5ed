//! Fetch the candidate set and fan processing out to a bounded worker pool.

use crate::domain::{Outcome, RepoDescriptor};
use crate::error::FetchError;
use crate::ports::{FileSystem, SearchClient, SearchQuery};
use crate::processor::process_repository;
use rand::Rng;
use rand::seq::SliceRandom;
use rayon::ThreadPoolBuilder;
use thiserror::Error;
use tracing::{debug, error, info};

/// Worker count used when none is configured
pub const DEFAULT_WORKERS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Maximum number of candidates to dispatch. `None` or `Some(0)` means all.
    pub limit: Option<usize>,
    /// Shuffle the full result set before truncating to `limit`
    pub shuffle: bool,
    /// Size of the worker pool, at least 1
    pub workers: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            limit: None,
            shuffle: true,
            workers: DEFAULT_WORKERS,
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Outcomes of one run, in completion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub candidates: usize,
    pub outcomes: Vec<Outcome>,
}

impl PipelineReport {
    /// Number of folders created in this run
    pub fn processed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_created()).count()
    }

    pub fn skipped_forks(&self) -> usize {
        self.count(|o| matches!(o, Outcome::SkippedFork))
    }

    pub fn skipped_duplicates(&self) -> usize {
        self.count(|o| matches!(o, Outcome::SkippedDuplicate))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }

    /// Qualified names of the created repositories
    pub fn created_names(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                Outcome::Created(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Collect the candidate set. Any page error aborts; no partial list is used.
fn fetch_candidates<R: Rng + ?Sized>(
    search: &dyn SearchClient,
    query: &SearchQuery,
    options: &PipelineOptions,
    rng: &mut R,
) -> Result<Vec<RepoDescriptor>, FetchError> {
    let limit = options.limit.filter(|&n| n > 0);
    let results = search.search(query);

    let mut candidates: Vec<RepoDescriptor> = match limit {
        // Without shuffling only the first `limit` are ever used, so stop paging early
        Some(n) if !options.shuffle => results.take(n).collect::<Result<_, _>>()?,
        _ => results.collect::<Result<_, _>>()?,
    };
    debug!("Fetched {} candidates", candidates.len());

    if options.shuffle {
        candidates.shuffle(rng);
    }
    if let Some(n) = limit {
        candidates.truncate(n);
    }
    Ok(candidates)
}

/// Run one search and materialize every candidate.
pub fn run_pipeline<R: Rng + ?Sized>(
    search: &dyn SearchClient,
    fs: &dyn FileSystem,
    query: &SearchQuery,
    options: &PipelineOptions,
    rng: &mut R,
) -> Result<PipelineReport, PipelineError> {
    info!("Searching: {}", query.to_query_string());

    let candidates = fetch_candidates(search, query, options, rng).map_err(|e| {
        error!("An error occurred: {}", e);
        e
    })?;

    let total = candidates.len();
    info!("Starting to process {} repositories...", total);

    let pool = ThreadPoolBuilder::new()
        .num_threads(options.workers.max(1))
        .thread_name(|i| format!("topicharvest-worker-{i}"))
        .build()?;

    let (tx, rx) = crossbeam_channel::unbounded();
    let candidates = &candidates;

    let outcomes = pool.in_place_scope(move |scope| {
        for repo in candidates {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let _ = tx.send(process_repository(fs, repo));
            });
        }
        drop(tx);

        let mut outcomes = Vec::with_capacity(total);
        for outcome in rx.iter() {
            outcomes.push(outcome);
            debug!("[{}/{}] done", outcomes.len(), total);
        }
        outcomes
    });

    let report = PipelineReport {
        candidates: total,
        outcomes,
    };
    info!(
        "Total repositories processed: {} (forks skipped: {}, duplicates skipped: {}, failed: {})",
        report.processed(),
        report.skipped_forks(),
        report.skipped_duplicates(),
        report.failed()
    );
    Ok(report)
}
