//! Start-point selection for walk attempts.
//!
//! A [`SamplingStrategy`] assigns a non-negative weight to each vertex. A
//! [`StartDistribution`] freezes those weights for one graph and draws start
//! vertices from them, then draws the start offset uniformly inside the
//! chosen label. Vertices with empty labels can never start a walk and are
//! left out regardless of strategy.

use rand::{
    Rng,
    distributions::{Distribution, WeightedIndex},
};

use crate::{
    error::{Result, SamplerError},
    graph::{Graph, VertexId},
};

/// Capability shared by start-vertex weighting schemes.
///
/// Weights need not be normalised; [`StartDistribution`] divides by their
/// sum. A weight of zero excludes the vertex.
pub trait SamplingStrategy {
    /// Returns the relative weight of `vertex`, whose label is `label`. Only
    /// called for non-empty labels.
    fn weight(&self, vertex: VertexId, label: &str) -> f64;
}

/// Built-in start-vertex weighting schemes.
///
/// # Examples
/// ```
/// use walkgen_core::{SamplingStrategy, VertexId, Weighting};
///
/// let vertex = VertexId::new(0);
/// assert_eq!(Weighting::Uniform.weight(vertex, "ACGTACG"), 1.0);
/// assert_eq!(Weighting::LengthWeighted.weight(vertex, "ACGT"), 4.0);
/// assert_eq!(Weighting::InverseLengthWeighted.weight(vertex, "ACGT"), 0.25);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Weighting {
    /// Every vertex is equally likely.
    Uniform,
    /// Vertices are weighted by label length, which makes every starting
    /// character equally likely.
    LengthWeighted,
    /// Vertices are weighted by the reciprocal of their label length,
    /// favouring short labels.
    InverseLengthWeighted,
}

impl Weighting {
    /// Every built-in weighting, in declaration order.
    pub const ALL: [Self; 3] = [
        Self::Uniform,
        Self::LengthWeighted,
        Self::InverseLengthWeighted,
    ];

    /// Stable lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::LengthWeighted => "length",
            Self::InverseLengthWeighted => "inverse-length",
        }
    }
}

impl SamplingStrategy for Weighting {
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "label lengths are far below 2^52 and weights are relative"
    )]
    fn weight(&self, _vertex: VertexId, label: &str) -> f64 {
        match self {
            Self::Uniform => 1.0,
            Self::LengthWeighted => label.len() as f64,
            Self::InverseLengthWeighted => 1.0 / label.len() as f64,
        }
    }
}

/// A start vertex together with the offset of the first character to take
/// from its label.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct StartPoint {
    /// Vertex the walk begins at.
    pub vertex: VertexId,
    /// 0-based offset into the vertex label.
    pub offset: usize,
}

impl StartPoint {
    /// Creates a start point.
    #[must_use]
    pub const fn new(vertex: VertexId, offset: usize) -> Self {
        Self { vertex, offset }
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    vertex: VertexId,
    label_len: usize,
}

/// Frozen start-vertex distribution for one graph and one strategy.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use rand::{SeedableRng, rngs::SmallRng};
/// use walkgen_core::{Graph, StartDistribution, Weighting};
///
/// let graph = Graph::from_reader(Cursor::new("V\t0\tA\nV\t1\tCCC\n"))?;
/// let starts = StartDistribution::new(&graph, &Weighting::LengthWeighted)?;
/// assert_eq!(starts.probabilities(), vec![0.25, 0.75]);
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let start = starts.draw(&mut rng);
/// let label = graph.label(start.vertex).expect("drawn vertex exists");
/// assert!(start.offset < label.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct StartDistribution {
    candidates: Vec<Candidate>,
    weights: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl StartDistribution {
    /// Freezes `strategy`'s weights over the non-empty labels of `graph`.
    ///
    /// # Errors
    /// Returns [`SamplerError::EmptyGraph`] when no vertex has a non-empty
    /// label or every candidate received a zero weight.
    pub fn new<S>(graph: &Graph, strategy: &S) -> Result<Self>
    where
        S: SamplingStrategy + ?Sized,
    {
        let (candidates, weights): (Vec<Candidate>, Vec<f64>) = graph
            .vertices()
            .filter(|(_, label)| !label.is_empty())
            .map(|(vertex, label)| {
                let candidate = Candidate {
                    vertex,
                    label_len: label.len(),
                };
                (candidate, strategy.weight(vertex, label))
            })
            .unzip();
        let index = WeightedIndex::new(&weights).map_err(|_| SamplerError::EmptyGraph {
            vertices: graph.vertex_count(),
        })?;
        Ok(Self {
            candidates,
            weights,
            index,
        })
    }

    /// Returns the number of vertices that can start a walk.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns whether no vertex can start a walk. Always `false` for a
    /// successfully constructed distribution.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Returns the start candidates in graph declaration order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.candidates.iter().map(|candidate| candidate.vertex)
    }

    /// Returns the normalised selection probability of every candidate, in
    /// the order of [`Self::vertices`].
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "normalising relative weights into probabilities"
    )]
    pub fn probabilities(&self) -> Vec<f64> {
        let total: f64 = self.weights.iter().sum();
        self.weights.iter().map(|weight| weight / total).collect()
    }

    /// Draws a start vertex, then a start offset uniform over its label.
    #[expect(
        clippy::indexing_slicing,
        reason = "WeightedIndex only yields indices inside the candidate list"
    )]
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> StartPoint {
        let candidate = self.candidates[self.index.sample(rng)];
        let offset = rng.gen_range(0..candidate.label_len);
        StartPoint::new(candidate.vertex, offset)
    }
}
