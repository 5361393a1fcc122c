//! Per-draw choice of start strategy.

use std::fmt::Debug;

use crate::strategy::{SamplingStrategy, Weighting};

/// Picks the [`SamplingStrategy`] used for each draw of a run.
///
/// A policy lists every strategy it can pick in [`Self::strategies`] and
/// answers each draw with a position in that list. The generator builds one
/// start distribution per listed strategy before the first draw, so every
/// listed strategy must give some start candidate a positive weight.
/// Implementations must be deterministic in `(draw, total)` so a seeded run
/// replays exactly.
pub trait StrategyPolicy: Debug + Send + Sync {
    /// Strategies this policy selects among, in a fixed order.
    fn strategies(&self) -> Vec<&dyn SamplingStrategy>;

    /// Position in [`Self::strategies`] of the strategy for draw `draw`
    /// (0-based) out of `total`.
    fn strategy_for(&self, draw: usize, total: usize) -> usize;
}

/// Built-in policies over the [`Weighting`] schemes.
///
/// # Examples
/// ```
/// use walkgen_core::{SamplingPolicy, StrategyPolicy, Weighting};
///
/// let policy = SamplingPolicy::Split {
///     first: Weighting::LengthWeighted,
///     second: Weighting::InverseLengthWeighted,
/// };
/// assert_eq!(policy.weighting_for(2, 5), Weighting::LengthWeighted);
/// assert_eq!(policy.weighting_for(3, 5), Weighting::InverseLengthWeighted);
/// assert_eq!(policy.strategies().len(), 2);
/// assert_eq!(policy.strategy_for(3, 5), 1);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SamplingPolicy {
    /// Every draw uses the same weighting.
    Fixed(Weighting),
    /// Draws in the first half of the run use `first`, the rest `second`.
    /// With an odd total the middle draw belongs to the first half.
    Split {
        /// Weighting for draws with `2 * draw < total`.
        first: Weighting,
        /// Weighting for the remaining draws.
        second: Weighting,
    },
}

impl SamplingPolicy {
    /// Length-weighted first half, inverse-length-weighted second half.
    pub const HALF_AND_HALF: Self = Self::Split {
        first: Weighting::LengthWeighted,
        second: Weighting::InverseLengthWeighted,
    };

    /// Weighting applied to draw `draw` out of `total`.
    #[must_use]
    pub const fn weighting_for(&self, draw: usize, total: usize) -> Weighting {
        match *self {
            Self::Fixed(weighting) => weighting,
            Self::Split { first, second } => {
                if in_first_half(draw, total) {
                    first
                } else {
                    second
                }
            }
        }
    }
}

const fn in_first_half(draw: usize, total: usize) -> bool {
    draw.saturating_mul(2) < total
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self::Fixed(Weighting::Uniform)
    }
}

impl StrategyPolicy for SamplingPolicy {
    fn strategies(&self) -> Vec<&dyn SamplingStrategy> {
        match self {
            Self::Fixed(weighting) => vec![weighting as &dyn SamplingStrategy],
            Self::Split { first, second } => vec![first as &dyn SamplingStrategy, second],
        }
    }

    fn strategy_for(&self, draw: usize, total: usize) -> usize {
        match self {
            Self::Fixed(_) => 0,
            Self::Split { .. } => usize::from(!in_first_half(draw, total)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::even(4, 2)]
    #[case::odd(5, 3)]
    #[case::single(1, 1)]
    #[case::empty(0, 0)]
    fn split_assigns_first_half(#[case] total: usize, #[case] expected_first: usize) {
        let policy = SamplingPolicy::HALF_AND_HALF;
        let first = (0..total)
            .filter(|&draw| policy.weighting_for(draw, total) == Weighting::LengthWeighted)
            .count();
        assert_eq!(first, expected_first);
        assert!(
            (expected_first..total)
                .all(|draw| policy.weighting_for(draw, total) == Weighting::InverseLengthWeighted)
        );
    }

    #[rstest]
    fn fixed_ignores_the_draw_index() {
        let policy = SamplingPolicy::Fixed(Weighting::InverseLengthWeighted);
        assert!((0..10).all(|draw| policy.weighting_for(draw, 10) == Weighting::InverseLengthWeighted));
        assert!((0..10).all(|draw| policy.strategy_for(draw, 10) == 0));
        assert_eq!(policy.strategies().len(), 1);
    }

    #[rstest]
    fn default_is_uniform() {
        assert_eq!(SamplingPolicy::default(), SamplingPolicy::Fixed(Weighting::Uniform));
    }

    #[rstest]
    #[case::even(4)]
    #[case::odd(5)]
    fn split_positions_match_weightings(#[case] total: usize) {
        let policy = SamplingPolicy::HALF_AND_HALF;
        let strategies = policy.strategies();
        let vertex = crate::graph::VertexId::new(0);
        for draw in 0..total {
            let chosen = strategies
                .get(policy.strategy_for(draw, total))
                .expect("position is listed");
            let expected = policy.weighting_for(draw, total);
            assert_eq!(chosen.weight(vertex, "ACGT"), expected.weight(vertex, "ACGT"));
        }
    }
}
