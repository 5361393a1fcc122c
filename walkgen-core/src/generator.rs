//! Run driver producing a batch of query samples.

use std::{
    fmt,
    io::Write,
    num::NonZeroUsize,
    sync::Arc,
};

use rand::{SeedableRng, rngs::SmallRng};
use tracing::{info, instrument};

use crate::{
    error::{GenerateError, SamplerError, StreamError},
    filter::{AttemptStats, RejectionFilter},
    graph::Graph,
    output::QueryWriter,
    policy::StrategyPolicy,
    sample::QuerySample,
    strategy::StartDistribution,
};

/// Outcome of a completed run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RunSummary {
    /// Samples produced.
    pub samples: usize,
    /// Attempt counters summed over every sample.
    pub stats: AttemptStats,
    /// Seed the run's random source was built from.
    pub seed: u64,
}

/// Generates fixed-length queries by walking a graph.
///
/// Each run rebuilds its random source from [`Self::seed`], so repeating a
/// run on the same graph yields the same samples.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use walkgen_core::{Graph, QueryGeneratorBuilder, QueryWriter};
///
/// let graph = Graph::from_reader(Cursor::new(
///     "V\t0\tACGT\nV\t1\tGGGG\nE\t0\t1\nE\t1\t0\n",
/// ))?;
/// let generator = QueryGeneratorBuilder::new()
///     .with_target_length(6)
///     .with_sample_count(4)
///     .with_seed(42)
///     .build()?;
/// let mut writer = QueryWriter::new(Vec::new(), Vec::new());
/// let summary = generator.run(&graph, &mut writer)?;
/// assert_eq!(summary.samples, 4);
///
/// let (_, queries) = writer.finish()?;
/// let queries = String::from_utf8(queries)?;
/// assert!(queries.lines().all(|query| query.len() == 6));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct QueryGenerator {
    filter: RejectionFilter,
    sample_count: usize,
    seed: u64,
    policy: Arc<dyn StrategyPolicy>,
}

impl fmt::Debug for QueryGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryGenerator")
            .field("filter", &self.filter)
            .field("sample_count", &self.sample_count)
            .field("seed", &self.seed)
            .field("policy", &self.policy)
            .finish()
    }
}

impl QueryGenerator {
    pub(crate) fn new(
        filter: RejectionFilter,
        sample_count: usize,
        seed: u64,
        policy: Arc<dyn StrategyPolicy>,
    ) -> Self {
        Self {
            filter,
            sample_count,
            seed,
            policy,
        }
    }

    /// Length of every generated query.
    #[must_use]
    pub fn target_length(&self) -> NonZeroUsize {
        self.filter.target_length()
    }

    /// Number of samples a run produces.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Seed of the run's random source.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Per-draw strategy policy.
    #[must_use]
    pub fn policy(&self) -> &dyn StrategyPolicy {
        self.policy.as_ref()
    }

    /// Rejection settings applied to every sample.
    #[must_use]
    pub fn filter(&self) -> &RejectionFilter {
        &self.filter
    }

    /// Generates every sample and writes each one as soon as it is accepted.
    ///
    /// The writer is not flushed; call [`QueryWriter::finish`] afterwards.
    ///
    /// # Errors
    /// Returns [`GenerateError::Sampler`] wrapping
    /// [`SamplerError::EmptyGraph`] before any sampling when a strategy of the
    /// policy finds no start candidate, [`SamplerError::InvalidStrategy`] when
    /// the policy chooses a strategy it does not list, or
    /// [`SamplerError::AttemptsExhausted`] when a sample hits the attempt cap.
    /// Returns [`GenerateError::Output`], naming the failing stream, when a
    /// write fails. Samples written before the failure are left in the sinks.
    #[instrument(
        name = "core.generate",
        err,
        skip(self, graph, writer),
        fields(
            samples = self.sample_count,
            target_length = self.target_length().get(),
            seed = self.seed,
        ),
    )]
    pub fn run<P, T>(
        &self,
        graph: &Graph,
        writer: &mut QueryWriter<P, T>,
    ) -> Result<RunSummary, GenerateError>
    where
        P: Write,
        T: Write,
    {
        self.drive(graph, |index, sample| {
            writer
                .write_sample(&sample)
                .map_err(|StreamError { stream, source }| GenerateError::Output {
                    index,
                    stream,
                    source,
                })
        })
    }

    /// Generates every sample and returns them in draw order.
    ///
    /// # Errors
    /// Fails under the same sampling conditions as [`Self::run`].
    pub fn collect(&self, graph: &Graph) -> Result<(Vec<QuerySample>, RunSummary), SamplerError> {
        let mut samples = Vec::with_capacity(self.sample_count);
        let summary = self.drive(graph, |_, sample| {
            samples.push(sample);
            Ok::<(), SamplerError>(())
        })?;
        Ok((samples, summary))
    }

    fn drive<E, F>(&self, graph: &Graph, mut emit: F) -> Result<RunSummary, E>
    where
        E: From<SamplerError>,
        F: FnMut(usize, QuerySample) -> Result<(), E>,
    {
        let distributions = self
            .policy
            .strategies()
            .into_iter()
            .map(|strategy| StartDistribution::new(graph, strategy))
            .collect::<Result<Vec<_>, SamplerError>>()?;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut stats = AttemptStats::default();
        for index in 0..self.sample_count {
            let choice = self.policy.strategy_for(index, self.sample_count);
            let starts = distributions
                .get(choice)
                .ok_or(SamplerError::InvalidStrategy {
                    index: choice,
                    available: distributions.len(),
                })?;
            let sample = self.filter.sample(graph, starts, &mut rng, &mut stats)?;
            emit(index, sample)?;
        }

        let summary = RunSummary {
            samples: self.sample_count,
            stats,
            seed: self.seed,
        };
        info!(
            samples = summary.samples,
            attempts = stats.attempts,
            dead_ends = stats.dead_ends,
            rejections = stats.rejections,
            seed = self.seed,
            "query generation finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use rstest::{fixture, rstest};

    use crate::{
        builder::QueryGeneratorBuilder,
        output::Stream,
        policy::SamplingPolicy,
    };

    #[fixture]
    fn cycle() -> Graph {
        Graph::from_reader(Cursor::new(
            "V\t0\tACGT\nV\t1\tG\nV\t2\tTTAAC\nE\t0\t1\nE\t1\t2\nE\t2\t0\nE\t2\t1\n",
        ))
        .expect("fixture graph must parse")
    }

    fn generator(seed: u64, count: usize) -> QueryGenerator {
        QueryGeneratorBuilder::new()
            .with_target_length(9)
            .with_sample_count(count)
            .with_seed(seed)
            .with_policy(SamplingPolicy::HALF_AND_HALF)
            .build()
            .expect("configuration is valid")
    }

    #[rstest]
    fn runs_are_reproducible(cycle: Graph) {
        let (first, first_summary) = generator(5, 40).collect(&cycle).expect("run succeeds");
        let (second, second_summary) = generator(5, 40).collect(&cycle).expect("run succeeds");
        assert_eq!(first, second);
        assert_eq!(first_summary, second_summary);
    }

    #[rstest]
    fn run_and_collect_agree(cycle: Graph) {
        let generator = generator(8, 10);
        let (samples, summary) = generator.collect(&cycle).expect("run succeeds");
        let mut writer = QueryWriter::new(Vec::new(), Vec::new());
        let written = generator.run(&cycle, &mut writer).expect("run succeeds");
        assert_eq!(summary, written);
        let (_, queries) = writer.finish().expect("flush");
        let expected: String = samples.iter().map(|s| format!("{}\n", s.text())).collect();
        assert_eq!(String::from_utf8(queries).expect("utf8"), expected);
    }

    #[rstest]
    fn empty_graph_fails_before_sampling() {
        let graph = Graph::builder().build().expect("empty graph builds");
        let err = generator(1, 0).collect(&graph).expect_err("no start candidate");
        assert_eq!(err, SamplerError::EmptyGraph { vertices: 0 });
    }

    #[rstest]
    fn zero_samples_produce_empty_output(cycle: Graph) {
        let (samples, summary) = generator(3, 0).collect(&cycle).expect("run succeeds");
        assert!(samples.is_empty());
        assert_eq!(summary.stats, AttemptStats::default());
    }

    #[rstest]
    fn write_failures_name_the_sample(cycle: Graph) {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let mut writer = QueryWriter::new(Broken, Vec::new());
        let err = generator(2, 3)
            .run(&cycle, &mut writer)
            .expect_err("writes must fail");
        assert!(
            matches!(
                err,
                GenerateError::Output {
                    index: 0,
                    stream: Stream::Paths,
                    ..
                }
            ),
            "{err:?}"
        );
        assert_eq!(err.code().as_str(), "GENERATE_OUTPUT");
    }
}
