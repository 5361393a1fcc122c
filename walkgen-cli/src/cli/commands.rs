//! Command implementations and argument parsing for the walkgen CLI.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;
use tracing::{Span, field, info, instrument};
use walkgen_core::{
    DEFAULT_MAX_ATTEMPTS, GenerateError, Graph, GraphError, QueryGeneratorBuilder, QueryWriter,
    RunSummary, SamplerError, SamplingPolicy, Stream, StreamError, SyntheticError, VerifyError,
    Weighting,
    synthetic::{self, DEFAULT_ALPHABET, RandomGraph},
    verify_streams,
};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "walkgen",
    about = "Generate fixed-length query workloads by walking a labelled graph."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Sample queries by random walks over a graph.
    Sample(SampleCommand),
    /// Write a synthetic graph.
    Generate(GenerateCommand),
    /// Check emitted path and query streams against a graph.
    Verify(VerifyCommand),
}

/// Options accepted by the `sample` command.
#[derive(Debug, Args, Clone)]
pub struct SampleCommand {
    /// Graph file with `V` and `E` records.
    pub graph: PathBuf,

    /// Length of every query.
    pub length: usize,

    /// Number of queries to generate.
    pub count: usize,

    /// Destination of the path and offset records.
    pub output: PathBuf,

    /// Seed of the random source; drawn from OS entropy when omitted.
    pub seed: Option<u64>,

    /// Destination of the query strings (defaults to stdout).
    #[arg(long)]
    pub queries: Option<PathBuf>,

    /// How start vertices are weighted.
    #[arg(long, value_enum, default_value_t = PolicyArg::Uniform)]
    pub policy: PolicyArg,

    /// Characters that must not appear in any query.
    #[arg(long, default_value = "")]
    pub forbid: String,

    /// Attempts allowed per query before giving up; 0 retries forever.
    #[arg(long = "max-attempts", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,
}

/// Start-vertex weighting selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Every vertex is equally likely.
    Uniform,
    /// Vertices are weighted by label length.
    Length,
    /// Vertices are weighted by the reciprocal of label length.
    Inverse,
    /// Length-weighted first half, inverse-length-weighted second half.
    Split,
}

impl PolicyArg {
    fn policy(self) -> SamplingPolicy {
        match self {
            Self::Uniform => SamplingPolicy::Fixed(Weighting::Uniform),
            Self::Length => SamplingPolicy::Fixed(Weighting::LengthWeighted),
            Self::Inverse => SamplingPolicy::Fixed(Weighting::InverseLengthWeighted),
            Self::Split => SamplingPolicy::HALF_AND_HALF,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Length => "length",
            Self::Inverse => "inverse",
            Self::Split => "split",
        }
    }
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Destination of the graph (defaults to stdout).
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Graph shape.
    #[command(subcommand)]
    pub shape: GraphShape,
}

/// Synthetic graph shapes.
#[derive(Debug, Subcommand, Clone)]
pub enum GraphShape {
    /// Every ordered pair of distinct vertices joined; vertex `i` labelled `A` x (i+1).
    Connected {
        /// Number of vertices.
        vertices: usize,
    },
    /// Edges from the first half of the vertices to the second half.
    Bipartite {
        /// Number of vertices; must be even.
        vertices: usize,
    },
    /// Random labels and distinct random edges.
    Random(RandomArgs),
}

/// Options of the random graph shape.
#[derive(Debug, Args, Clone)]
pub struct RandomArgs {
    /// Number of vertices.
    pub vertices: usize,

    /// Number of distinct directed edges.
    pub edges: usize,

    /// Length of every label.
    pub label_length: usize,

    /// Seed of the random source; drawn from OS entropy when omitted.
    pub seed: Option<u64>,

    /// Characters labels are drawn from.
    #[arg(long, default_value = DEFAULT_ALPHABET)]
    pub alphabet: String,
}

/// Options accepted by the `verify` command.
#[derive(Debug, Args, Clone)]
pub struct VerifyCommand {
    /// Graph the samples were drawn from.
    pub graph: PathBuf,

    /// Path and offset records.
    pub paths: PathBuf,

    /// Query strings, one per line.
    pub queries: PathBuf,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Opening, reading or writing a file failed.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Writing to standard output failed.
    #[error("failed to write to stdout: {source}")]
    Stdout {
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The graph file could not be parsed.
    #[error("invalid graph `{path}`: {error}")]
    Graph {
        /// Graph file.
        path: PathBuf,
        /// Parse failure.
        #[source]
        error: GraphError,
    },
    /// The sampler configuration was rejected.
    #[error(transparent)]
    Sampler(#[from] SamplerError),
    /// Sampling or writing samples failed.
    #[error(transparent)]
    Generate(#[from] GenerateError),
    /// Synthetic graph parameters were rejected.
    #[error(transparent)]
    Synthetic(#[from] SyntheticError),
    /// Emitted samples do not match the graph.
    #[error(transparent)]
    Verify(#[from] VerifyError),
}

impl CliError {
    /// Most specific stable code available for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "CLI_IO",
            Self::Stdout { .. } => "CLI_STDOUT",
            Self::Graph { error, .. } => error
                .format_code()
                .map_or_else(|| error.code().as_str(), |code| code.as_str()),
            Self::Sampler(error) => error.code().as_str(),
            Self::Generate(error) => error
                .sampler_code()
                .map_or_else(|| error.code().as_str(), |code| code.as_str()),
            Self::Synthetic(error) => error.code().as_str(),
            Self::Verify(error) => error.code().as_str(),
        }
    }
}

/// Outcome of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Queries were sampled.
    Sampled {
        /// Run counters.
        summary: RunSummary,
        /// Whether the queries went to stdout.
        queries_on_stdout: bool,
    },
    /// A synthetic graph was written.
    Generated {
        /// Vertices written.
        vertices: usize,
        /// Edges written.
        edges: usize,
        /// Whether the graph went to stdout.
        graph_on_stdout: bool,
    },
    /// Samples were verified.
    Verified {
        /// Samples checked.
        samples: usize,
    },
}

impl CommandOutcome {
    /// Whether the command already wrote its payload to stdout, in which case
    /// no summary should be printed there.
    #[must_use]
    pub fn wrote_stdout(&self) -> bool {
        match self {
            Self::Sampled {
                queries_on_stdout, ..
            } => *queries_on_stdout,
            Self::Generated {
                graph_on_stdout, ..
            } => *graph_on_stdout,
            Self::Verified { .. } => false,
        }
    }
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when configuration, input, sampling or output fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use walkgen_cli::cli::{Cli, Command, CommandOutcome, GenerateCommand, GraphShape, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let cli = Cli {
///     command: Command::Generate(GenerateCommand {
///         output: Some(dir.path().join("graph.txt")),
///         shape: GraphShape::Connected { vertices: 3 },
///     }),
/// };
/// let outcome = run_cli(cli)?;
/// assert!(matches!(outcome, CommandOutcome::Generated { vertices: 3, edges: 6, .. }));
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<CommandOutcome, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Sample(command) => {
            span.record("command", field::display("sample"));
            run_sample(command)
        }
        Command::Generate(command) => {
            span.record("command", field::display("generate"));
            run_generate(command)
        }
        Command::Verify(command) => {
            span.record("command", field::display("verify"));
            run_verify(&command)
        }
    }
}

#[instrument(
    name = "cli.sample",
    err,
    skip(command),
    fields(
        graph = %command.graph.display(),
        length = command.length,
        count = command.count,
        policy = command.policy.label(),
    ),
)]
fn run_sample(command: SampleCommand) -> Result<CommandOutcome, CliError> {
    let SampleCommand {
        graph: graph_path,
        length,
        count,
        output,
        seed,
        queries,
        policy,
        forbid,
        max_attempts,
    } = command;

    let mut builder = QueryGeneratorBuilder::new()
        .with_target_length(length)
        .with_sample_count(count)
        .with_policy(policy.policy())
        .with_forbidden(forbid.chars());
    builder = match max_attempts {
        0 => builder.without_attempt_limit(),
        cap => builder.with_max_attempts(cap),
    };
    if let Some(value) = seed {
        builder = builder.with_seed(value);
    }
    let generator = builder.build()?;

    let graph = load_graph(&graph_path)?;
    let sinks = SampleSinks {
        paths: &output,
        queries: queries.as_deref(),
    };
    let paths = create_output(&output)?;
    let summary = if let Some(path) = sinks.queries {
        let mut writer = QueryWriter::new(paths, create_output(path)?);
        let run = generator
            .run(&graph, &mut writer)
            .map_err(|err| sinks.generate_error(err))?;
        writer.finish().map_err(|err| sinks.stream_error(err))?;
        run
    } else {
        let stdout = io::stdout();
        let mut writer = QueryWriter::new(paths, BufWriter::new(stdout.lock()));
        let run = generator
            .run(&graph, &mut writer)
            .map_err(|err| sinks.generate_error(err))?;
        writer.finish().map_err(|err| sinks.stream_error(err))?;
        run
    };

    Ok(CommandOutcome::Sampled {
        summary,
        queries_on_stdout: queries.is_none(),
    })
}

/// Destinations of the two streams of a sample run; `None` queries means
/// stdout.
#[derive(Clone, Copy, Debug)]
pub(super) struct SampleSinks<'a> {
    pub(super) paths: &'a Path,
    pub(super) queries: Option<&'a Path>,
}

impl SampleSinks<'_> {
    pub(super) fn stream_error(&self, err: StreamError) -> CliError {
        let StreamError { stream, source } = err;
        match (stream, self.queries) {
            (Stream::Paths, _) => CliError::Io {
                path: self.paths.to_path_buf(),
                source,
            },
            (Stream::Queries, Some(path)) => CliError::Io {
                path: path.to_path_buf(),
                source,
            },
            (Stream::Queries, None) => CliError::Stdout { source },
        }
    }

    fn generate_error(&self, err: GenerateError) -> CliError {
        match err {
            GenerateError::Output { stream, source, .. } => {
                self.stream_error(StreamError { stream, source })
            }
            other => CliError::Generate(other),
        }
    }
}

#[instrument(name = "cli.generate", err, skip(command), fields(shape = field::Empty))]
fn run_generate(command: GenerateCommand) -> Result<CommandOutcome, CliError> {
    let span = Span::current();
    let graph = match command.shape {
        GraphShape::Connected { vertices } => {
            span.record("shape", field::display("connected"));
            synthetic::connected(vertices)?
        }
        GraphShape::Bipartite { vertices } => {
            span.record("shape", field::display("bipartite"));
            synthetic::bipartite(vertices)?
        }
        GraphShape::Random(args) => {
            span.record("shape", field::display("random"));
            let seed = args.seed.unwrap_or_else(|| {
                let seed: u64 = SmallRng::from_entropy().r#gen();
                info!(seed, "no seed supplied; drew one from OS entropy");
                seed
            });
            RandomGraph::new(args.vertices, args.edges, args.label_length)
                .with_alphabet(args.alphabet)
                .generate(&mut SmallRng::seed_from_u64(seed))?
        }
    };

    match &command.output {
        Some(path) => {
            let mut sink = create_output(path)?;
            graph
                .write_to(&mut sink)
                .and_then(|()| sink.flush())
                .map_err(|source| CliError::Io {
                    path: path.clone(),
                    source,
                })?;
        }
        None => {
            let stdout = io::stdout();
            let mut sink = BufWriter::new(stdout.lock());
            graph
                .write_to(&mut sink)
                .and_then(|()| sink.flush())
                .map_err(|source| CliError::Stdout { source })?;
        }
    }

    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "graph written"
    );
    Ok(CommandOutcome::Generated {
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
        graph_on_stdout: command.output.is_none(),
    })
}

#[instrument(name = "cli.verify", err, skip(command))]
fn run_verify(command: &VerifyCommand) -> Result<CommandOutcome, CliError> {
    let graph = load_graph(&command.graph)?;
    let paths = open_input(&command.paths)?;
    let queries = open_input(&command.queries)?;
    let samples = verify_streams(&graph, paths, queries)?;
    Ok(CommandOutcome::Verified { samples })
}

fn load_graph(path: &Path) -> Result<Graph, CliError> {
    let reader = open_input(path)?;
    Graph::from_reader(reader).map_err(|error| CliError::Graph {
        path: path.to_path_buf(),
        error,
    })
}

#[instrument(name = "cli.open_input", err, fields(path = %path.display()))]
fn open_input(path: &Path) -> Result<BufReader<File>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

fn create_output(path: &Path) -> Result<BufWriter<File>, CliError> {
    let file = File::create(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

/// Renders `outcome` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use walkgen_cli::cli::{CommandOutcome, render_summary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let mut buffer = Vec::new();
/// render_summary(&CommandOutcome::Verified { samples: 12 }, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "verified: 12\n");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(outcome: &CommandOutcome, mut writer: impl Write) -> io::Result<()> {
    match outcome {
        CommandOutcome::Sampled { summary, .. } => {
            writeln!(writer, "samples: {}", summary.samples)?;
            writeln!(writer, "attempts: {}", summary.stats.attempts)?;
            writeln!(writer, "dead ends: {}", summary.stats.dead_ends)?;
            writeln!(writer, "rejections: {}", summary.stats.rejections)?;
            writeln!(writer, "seed: {}", summary.seed)?;
        }
        CommandOutcome::Generated {
            vertices, edges, ..
        } => {
            writeln!(writer, "vertices: {vertices}")?;
            writeln!(writer, "edges: {edges}")?;
        }
        CommandOutcome::Verified { samples } => {
            writeln!(writer, "verified: {samples}")?;
        }
    }
    Ok(())
}
