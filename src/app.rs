use crate::adapters::{GitHubSearchClient, LocalFileSystem};
use crate::cleanup::{CleanupReport, sweep};
use crate::cli::{CliArgs, CliCommand};
use crate::config::{Config, token_from_env};
use crate::menu::prompt_operation;
use crate::pipeline::{PipelineOptions, PipelineReport, run_pipeline};
use crate::ports::{FileSystem, SearchClient, SearchQuery};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::info;

/// What a run should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Process { limit: Option<usize> },
    Clean,
    CleanThenProcess { limit: Option<usize> },
}

impl Operation {
    pub fn needs_search(&self) -> bool {
        !matches!(self, Operation::Clean)
    }
}

impl From<CliCommand> for Operation {
    fn from(command: CliCommand) -> Self {
        match command {
            CliCommand::Process { limit } => Operation::Process { limit },
            CliCommand::Clean => Operation::Clean,
            CliCommand::CleanProcess { limit } => Operation::CleanThenProcess { limit },
        }
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub cleanup: Option<CleanupReport>,
    pub pipeline: Option<PipelineReport>,
}

/// Wires the injected collaborators to the selected operation
pub struct App {
    search: Option<Arc<dyn SearchClient>>,
    fs: Arc<dyn FileSystem>,
    query: SearchQuery,
    options: PipelineOptions,
}

impl App {
    pub fn new(
        search: Option<Arc<dyn SearchClient>>,
        fs: Arc<dyn FileSystem>,
        query: SearchQuery,
        options: PipelineOptions,
    ) -> Self {
        Self {
            search,
            fs,
            query,
            options,
        }
    }

    pub fn run(&self, operation: Operation) -> Result<RunSummary> {
        info!("Running {:?} in {}", operation, self.fs.root().display());
        let mut summary = RunSummary::default();

        let limit = match operation {
            Operation::Clean => {
                summary.cleanup = Some(self.clean()?);
                return Ok(summary);
            }
            Operation::CleanThenProcess { limit } => {
                summary.cleanup = Some(self.clean()?);
                limit
            }
            Operation::Process { limit } => limit,
        };

        summary.pipeline = Some(self.process(limit)?);
        Ok(summary)
    }

    fn clean(&self) -> Result<CleanupReport> {
        Ok(sweep(self.fs.as_ref())?)
    }

    fn process(&self, limit: Option<usize>) -> Result<PipelineReport> {
        let search = self
            .search
            .as_deref()
            .context("No search client configured")?;
        let options = PipelineOptions {
            limit,
            ..self.options.clone()
        };

        let report = run_pipeline(
            search,
            self.fs.as_ref(),
            &self.query,
            &options,
            &mut rand::thread_rng(),
        )?;
        Ok(report)
    }
}

/// Select the operation, then load config and build the real adapters.
///
/// The operation comes first so a bad menu answer never touches the config
/// file or the network.
pub fn launch<R: BufRead, W: Write>(
    cli_args: &CliArgs,
    input: &mut R,
    output: &mut W,
) -> Result<RunSummary> {
    let operation = match cli_args.command.clone() {
        Some(command) => Operation::from(command),
        None => prompt_operation(input, output)?,
    };

    let config = Config::from_cli_and_file(cli_args).context("Failed to load configuration")?;

    let search: Option<Arc<dyn SearchClient>> = if operation.needs_search() {
        let token = token_from_env()?;
        let client = GitHubSearchClient::new(&config.search.api_url, token, config.timeout())?
            .with_per_page(config.search.per_page);
        Some(Arc::new(client))
    } else {
        None
    };

    let fs = Arc::new(LocalFileSystem::new(&config.work_dir));
    let app = App::new(search, fs, config.query(), config.pipeline_options(None));
    app.run(operation)
}
