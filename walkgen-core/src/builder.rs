//! Builder utilities for configuring query generation.
//!
//! Validates run parameters and resolves the seed before constructing a
//! [`QueryGenerator`].

use std::{fmt, num::NonZeroUsize, sync::Arc};

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::info;

use crate::{
    Result,
    error::SamplerError,
    filter::RejectionFilter,
    generator::QueryGenerator,
    policy::{SamplingPolicy, StrategyPolicy},
};

/// Attempt cap applied to every sample unless overridden.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100_000;

/// Configures and constructs [`QueryGenerator`] instances.
///
/// The target length has no default and must be set. Every other parameter
/// has one: zero samples, the uniform policy, no forbidden characters, an
/// attempt cap of [`DEFAULT_MAX_ATTEMPTS`], and a seed drawn from OS entropy.
///
/// # Examples
/// ```
/// use walkgen_core::{QueryGeneratorBuilder, SamplingPolicy};
///
/// let generator = QueryGeneratorBuilder::new()
///     .with_target_length(32)
///     .with_sample_count(1_000)
///     .with_seed(7)
///     .with_policy(SamplingPolicy::HALF_AND_HALF)
///     .with_forbidden("N".chars())
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(generator.target_length().get(), 32);
/// assert_eq!(generator.sample_count(), 1_000);
/// assert_eq!(generator.seed(), 7);
/// ```
#[derive(Clone)]
pub struct QueryGeneratorBuilder {
    target_length: usize,
    sample_count: usize,
    seed: Option<u64>,
    policy: Arc<dyn StrategyPolicy>,
    forbidden: Vec<char>,
    max_attempts: Option<usize>,
}

impl Default for QueryGeneratorBuilder {
    fn default() -> Self {
        Self {
            target_length: 0,
            sample_count: 0,
            seed: None,
            policy: Arc::new(SamplingPolicy::default()),
            forbidden: Vec::new(),
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
        }
    }
}

impl fmt::Debug for QueryGeneratorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryGeneratorBuilder")
            .field("target_length", &self.target_length)
            .field("sample_count", &self.sample_count)
            .field("seed", &self.seed)
            .field("policy", &self.policy)
            .field("forbidden", &self.forbidden)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl QueryGeneratorBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the length of every generated query.
    #[must_use]
    pub fn with_target_length(mut self, length: usize) -> Self {
        self.target_length = length;
        self
    }

    /// Returns the configured target length.
    #[must_use]
    pub fn target_length(&self) -> usize {
        self.target_length
    }

    /// Sets how many samples a run produces.
    #[must_use]
    pub fn with_sample_count(mut self, count: usize) -> Self {
        self.sample_count = count;
        self
    }

    /// Returns the configured sample count.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Fixes the seed of the run's random source.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the configured seed, if any.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Sets the per-draw weighting policy.
    #[must_use]
    pub fn with_policy<P>(mut self, policy: P) -> Self
    where
        P: StrategyPolicy + 'static,
    {
        self.policy = Arc::new(policy);
        self
    }

    /// Adds characters that must not appear in any query.
    #[must_use]
    pub fn with_forbidden(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.forbidden.extend(chars);
        self
    }

    /// Caps the attempts spent on a single sample.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Lets the rejection loop retry without bound.
    #[must_use]
    pub fn without_attempt_limit(mut self) -> Self {
        self.max_attempts = None;
        self
    }

    /// Returns the configured attempt cap; `None` when unbounded.
    #[must_use]
    pub fn max_attempts(&self) -> Option<usize> {
        self.max_attempts
    }

    /// Validates the configuration and constructs a [`QueryGenerator`].
    ///
    /// When no seed was set, one is drawn from OS entropy and logged so the
    /// run can be replayed with [`Self::with_seed`].
    ///
    /// # Errors
    /// Returns [`SamplerError::InvalidTargetLength`] when the target length
    /// is zero and [`SamplerError::InvalidMaxAttempts`] when a zero attempt
    /// cap was set.
    ///
    /// # Examples
    /// ```
    /// use walkgen_core::{QueryGeneratorBuilder, SamplerError};
    ///
    /// let err = QueryGeneratorBuilder::new().build().expect_err("length unset");
    /// assert_eq!(err, SamplerError::InvalidTargetLength { got: 0 });
    /// ```
    pub fn build(self) -> Result<QueryGenerator> {
        let target_length = NonZeroUsize::new(self.target_length).ok_or(
            SamplerError::InvalidTargetLength {
                got: self.target_length,
            },
        )?;
        let max_attempts = self
            .max_attempts
            .map(|cap| NonZeroUsize::new(cap).ok_or(SamplerError::InvalidMaxAttempts { got: cap }))
            .transpose()?;
        let seed = self.seed.unwrap_or_else(|| {
            let seed = SmallRng::from_entropy().r#gen();
            info!(seed, "no seed supplied; drew one from OS entropy");
            seed
        });
        let filter = RejectionFilter::new(target_length)
            .with_forbidden(self.forbidden)
            .with_max_attempts(max_attempts);
        Ok(QueryGenerator::new(
            filter,
            self.sample_count,
            seed,
            self.policy,
        ))
    }
}
