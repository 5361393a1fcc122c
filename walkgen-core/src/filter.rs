//! Retry loop around walk attempts.

use std::{collections::BTreeSet, num::NonZeroUsize};

use rand::Rng;
use tracing::{debug, warn};

use crate::{
    error::{Result, SamplerError},
    graph::Graph,
    sample::QuerySample,
    strategy::StartDistribution,
    walk::{WalkOutcome, attempt},
};

/// Attempt counters accumulated over one or more samples.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AttemptStats {
    /// Walk attempts started.
    pub attempts: usize,
    /// Attempts that stopped at a vertex without successors.
    pub dead_ends: usize,
    /// Completed walks discarded for containing a forbidden character.
    pub rejections: usize,
}

impl AttemptStats {
    /// Attempts that produced an accepted sample.
    #[must_use]
    pub const fn accepted(&self) -> usize {
        self.attempts
            .saturating_sub(self.dead_ends)
            .saturating_sub(self.rejections)
    }
}

/// Draws start points and walks until a sample free of forbidden characters
/// is produced.
///
/// # Examples
/// ```
/// use std::{io::Cursor, num::NonZeroUsize};
/// use rand::{SeedableRng, rngs::SmallRng};
/// use walkgen_core::{AttemptStats, Graph, RejectionFilter, StartDistribution, Weighting};
///
/// let graph = Graph::from_reader(Cursor::new("V\t0\tNNNN\nV\t1\tACGT\nE\t0\t1\nE\t1\t0\n"))?;
/// let starts = StartDistribution::new(&graph, &Weighting::Uniform)?;
/// let length = NonZeroUsize::new(2).expect("non-zero");
/// let filter = RejectionFilter::new(length).with_forbidden("N".chars());
///
/// let mut rng = SmallRng::seed_from_u64(9);
/// let mut stats = AttemptStats::default();
/// let sample = filter.sample(&graph, &starts, &mut rng, &mut stats)?;
/// assert!(!sample.text().contains('N'));
/// assert_eq!(stats.accepted(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct RejectionFilter {
    target_length: NonZeroUsize,
    forbidden: BTreeSet<char>,
    max_attempts: Option<NonZeroUsize>,
}

impl RejectionFilter {
    /// Creates a filter with no forbidden characters and no attempt cap.
    #[must_use]
    pub const fn new(target_length: NonZeroUsize) -> Self {
        Self {
            target_length,
            forbidden: BTreeSet::new(),
            max_attempts: None,
        }
    }

    /// Rejects completed walks whose text contains any of `chars`.
    #[must_use]
    pub fn with_forbidden(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.forbidden.extend(chars);
        self
    }

    /// Caps the attempts spent on a single sample; `None` removes the cap.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: Option<NonZeroUsize>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Requested query length.
    #[must_use]
    pub const fn target_length(&self) -> NonZeroUsize {
        self.target_length
    }

    /// Characters that cause a completed walk to be discarded.
    pub fn forbidden(&self) -> impl Iterator<Item = char> + '_ {
        self.forbidden.iter().copied()
    }

    /// Attempt cap per sample, if any.
    #[must_use]
    pub const fn max_attempts(&self) -> Option<NonZeroUsize> {
        self.max_attempts
    }

    /// Returns whether `text` contains no forbidden character.
    #[must_use]
    pub fn accepts(&self, text: &str) -> bool {
        !text.chars().any(|c| self.forbidden.contains(&c))
    }

    /// Produces one accepted sample, drawing start points from `starts`.
    ///
    /// Dead ends and rejected texts are counted in `stats` and retried with a
    /// fresh start point.
    ///
    /// # Errors
    /// Returns [`SamplerError::AttemptsExhausted`] when the cap is reached
    /// without an accepted sample. Errors from [`attempt`] are propagated,
    /// although a distribution built from `graph` never yields an invalid
    /// start point.
    pub fn sample<R>(
        &self,
        graph: &Graph,
        starts: &StartDistribution,
        rng: &mut R,
        stats: &mut AttemptStats,
    ) -> Result<QuerySample>
    where
        R: Rng + ?Sized,
    {
        let mut spent = 0_usize;
        loop {
            if self.max_attempts.is_some_and(|cap| spent >= cap.get()) {
                warn!(
                    attempts = spent,
                    target_length = self.target_length.get(),
                    "attempt cap reached without an acceptable walk"
                );
                return Err(SamplerError::AttemptsExhausted {
                    attempts: spent,
                    target_length: self.target_length.get(),
                });
            }
            spent += 1;
            stats.attempts += 1;

            let start = starts.draw(rng);
            match attempt(graph, start, self.target_length.get(), rng)? {
                WalkOutcome::DeadEnd { .. } => stats.dead_ends += 1,
                WalkOutcome::Completed(sample) if self.accepts(sample.text()) => {
                    return Ok(sample);
                }
                WalkOutcome::Completed(sample) => {
                    debug!(text = sample.text(), "walk rejected for forbidden content");
                    stats.rejections += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    use crate::{graph::VertexId, strategy::Weighting};

    fn length(raw: usize) -> NonZeroUsize {
        NonZeroUsize::new(raw).expect("length must be non-zero")
    }

    fn parse(raw: &str) -> Graph {
        Graph::from_reader(Cursor::new(raw.to_owned())).expect("fixture graph must parse")
    }

    #[rstest]
    #[case::clean("ACGT", true)]
    #[case::forbidden("ACNT", false)]
    #[case::case_sensitive("acnt", true)]
    fn accepts_matches_forbidden_set(#[case] text: &str, #[case] expected: bool) {
        let filter = RejectionFilter::new(length(4)).with_forbidden("NX".chars());
        assert_eq!(filter.accepts(text), expected);
    }

    #[rstest]
    fn dead_ends_are_retried() {
        let graph = parse("V\t0\tA\nV\t1\tCCCC\nE\t0\t1\n");
        let starts = StartDistribution::new(&graph, &Weighting::Uniform).expect("builds");
        let filter = RejectionFilter::new(length(3)).with_max_attempts(NonZeroUsize::new(1_000));
        let mut rng = SmallRng::seed_from_u64(21);
        let mut stats = AttemptStats::default();
        for _ in 0..20 {
            let sample = filter
                .sample(&graph, &starts, &mut rng, &mut stats)
                .expect("a sample exists");
            assert_eq!(sample.text().len(), 3);
        }
        assert_eq!(stats.accepted(), 20);
        assert_eq!(stats.rejections, 0);
        assert!(stats.dead_ends > 0, "{stats:?}");
    }

    #[rstest]
    fn cap_is_reported_when_nothing_is_acceptable() {
        let graph = parse("V\t0\tNNN\n");
        let starts = StartDistribution::new(&graph, &Weighting::Uniform).expect("builds");
        let filter = RejectionFilter::new(length(2))
            .with_forbidden(['N'])
            .with_max_attempts(NonZeroUsize::new(25));
        let mut stats = AttemptStats::default();
        let err = filter
            .sample(&graph, &starts, &mut SmallRng::seed_from_u64(2), &mut stats)
            .expect_err("every walk is rejected");
        assert_eq!(
            err,
            SamplerError::AttemptsExhausted {
                attempts: 25,
                target_length: 2
            }
        );
        assert_eq!(stats.attempts, 25);
        assert_eq!(stats.rejections, 25);
    }

    #[rstest]
    fn unreachable_length_exhausts_on_dead_ends() {
        let graph = parse("V\t0\tAC\n");
        let starts = StartDistribution::new(&graph, &Weighting::Uniform).expect("builds");
        let filter = RejectionFilter::new(length(5)).with_max_attempts(NonZeroUsize::new(10));
        let mut stats = AttemptStats::default();
        let err = filter
            .sample(&graph, &starts, &mut SmallRng::seed_from_u64(4), &mut stats)
            .expect_err("no walk is long enough");
        assert_eq!(err.code().as_str(), "SAMPLER_ATTEMPTS_EXHAUSTED");
        assert_eq!(stats.dead_ends, 10);
    }

    #[rstest]
    fn empty_label_cycles_count_against_the_cap() {
        let mut builder = Graph::builder();
        builder.add_vertex(VertexId::new(0), "AC").expect("vertex 0");
        builder.add_vertex(VertexId::new(1), "").expect("vertex 1");
        builder
            .add_edge(VertexId::new(0), VertexId::new(1))
            .add_edge(VertexId::new(1), VertexId::new(1));
        let graph = builder.build().expect("graph builds");
        let starts = StartDistribution::new(&graph, &Weighting::Uniform).expect("builds");
        let filter = RejectionFilter::new(length(3)).with_max_attempts(NonZeroUsize::new(5));
        let mut stats = AttemptStats::default();
        let err = filter
            .sample(&graph, &starts, &mut SmallRng::seed_from_u64(9), &mut stats)
            .expect_err("the only successor loops on an empty label");
        assert_eq!(
            err,
            SamplerError::AttemptsExhausted {
                attempts: 5,
                target_length: 3
            }
        );
        assert_eq!(stats.dead_ends, 5);
    }
}
