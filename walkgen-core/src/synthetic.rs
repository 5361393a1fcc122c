//! Synthetic graphs for benchmarking the search engine.
//!
//! Two shapes are fixed by their size alone: a complete digraph and a
//! one-directional complete bipartite graph, both labelled with runs of `A`
//! so their label lengths are known. The third shape draws labels and edges
//! from a seeded random source.

use std::collections::HashSet;

use rand::{
    Rng,
    seq::{SliceRandom, index},
};
use tracing::debug;

use crate::{
    error::SyntheticError,
    graph::{Graph, VertexId},
};

/// Alphabet used for random labels unless another one is supplied.
pub const DEFAULT_ALPHABET: &str = "ACGT";

/// Builds a complete digraph on `vertices` vertices.
///
/// Vertex `i` is labelled with `i + 1` copies of `A`, and every pair of
/// distinct vertices is joined in both directions.
///
/// # Errors
/// Returns [`SyntheticError::ZeroVertices`] for an empty request and
/// [`SyntheticError::Overflow`] when ids would not fit in an `i64`.
///
/// # Examples
/// ```
/// use walkgen_core::{VertexId, synthetic};
///
/// let graph = synthetic::connected(3)?;
/// assert_eq!(graph.label(VertexId::new(2)), Some("AAA"));
/// assert_eq!(graph.edge_count(), 6);
/// # Ok::<(), walkgen_core::SyntheticError>(())
/// ```
pub fn connected(vertices: usize) -> Result<Graph, SyntheticError> {
    let ids = dense_ids(vertices)?;
    let labels = (0..vertices).map(|index| "A".repeat(index + 1)).collect();
    let successors = (0..vertices)
        .map(|from| {
            ids.iter()
                .enumerate()
                .filter(|(to, _)| *to != from)
                .map(|(_, id)| *id)
                .collect()
        })
        .collect();
    Ok(Graph::from_parts(ids, labels, successors))
}

/// Builds a complete bipartite graph with edges from the first half of the
/// vertices to the second half.
///
/// Vertex `i` is labelled with `i mod (vertices / 2) + 1` copies of `A`, so
/// both halves carry the same label lengths.
///
/// # Errors
/// Returns [`SyntheticError::ZeroVertices`] for an empty request,
/// [`SyntheticError::OddBipartite`] when `vertices` is odd, and
/// [`SyntheticError::Overflow`] when ids would not fit in an `i64`.
pub fn bipartite(vertices: usize) -> Result<Graph, SyntheticError> {
    let ids = dense_ids(vertices)?;
    if !vertices.is_multiple_of(2) {
        return Err(SyntheticError::OddBipartite { vertices });
    }
    let half = vertices / 2;
    let labels = (0..vertices).map(|index| "A".repeat(index % half + 1)).collect();
    let right = ids.get(half..).unwrap_or_default().to_vec();
    let successors = (0..vertices)
        .map(|from| if from < half { right.clone() } else { Vec::new() })
        .collect();
    Ok(Graph::from_parts(ids, labels, successors))
}

/// Parameters of a random graph.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use walkgen_core::synthetic::RandomGraph;
///
/// let shape = RandomGraph::new(10, 12, 5);
/// let graph = shape.generate(&mut SmallRng::seed_from_u64(3))?;
/// assert_eq!(graph.vertex_count(), 10);
/// assert_eq!(graph.edge_count(), 12);
/// assert!(graph.vertices().all(|(_, label)| label.len() == 5));
/// # Ok::<(), walkgen_core::SyntheticError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RandomGraph {
    vertices: usize,
    edges: usize,
    label_length: usize,
    alphabet: String,
}

impl RandomGraph {
    /// Describes a graph of `vertices` vertices with `label_length`-character
    /// labels over [`DEFAULT_ALPHABET`] and `edges` distinct directed edges.
    #[must_use]
    pub fn new(vertices: usize, edges: usize, label_length: usize) -> Self {
        Self {
            vertices,
            edges,
            label_length,
            alphabet: DEFAULT_ALPHABET.to_owned(),
        }
    }

    /// Replaces the label alphabet.
    #[must_use]
    pub fn with_alphabet(mut self, alphabet: impl Into<String>) -> Self {
        self.alphabet = alphabet.into();
        self
    }

    /// Largest edge count accepted for `vertices` vertices.
    #[must_use]
    pub fn max_edges(vertices: usize) -> usize {
        vertices.saturating_mul(vertices.saturating_sub(1)) / 2
    }

    /// Draws labels then edges from `rng`.
    ///
    /// Every edge joins two distinct vertices and no ordered pair repeats.
    ///
    /// # Errors
    /// Returns a [`SyntheticError`] when the parameters are out of range.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Graph, SyntheticError> {
        let ids = self.validate()?;
        let alphabet: Vec<char> = self.alphabet.chars().collect();
        let labels: Vec<String> = (0..self.vertices)
            .map(|_| {
                (0..self.label_length)
                    .filter_map(|_| alphabet.choose(&mut *rng))
                    .collect()
            })
            .collect();

        let mut successors = vec![Vec::new(); self.vertices];
        let mut seen = HashSet::with_capacity(self.edges);
        while seen.len() < self.edges {
            let pair = index::sample(rng, self.vertices, 2);
            let (from, to) = (pair.index(0), pair.index(1));
            if seen.insert((from, to))
                && let (Some(targets), Some(target)) = (successors.get_mut(from), ids.get(to))
            {
                targets.push(*target);
            }
        }
        debug!(
            vertices = self.vertices,
            edges = self.edges,
            label_length = self.label_length,
            "random graph generated"
        );
        Ok(Graph::from_parts(ids, labels, successors))
    }

    fn validate(&self) -> Result<Vec<VertexId>, SyntheticError> {
        let ids = dense_ids(self.vertices)?;
        if self.label_length == 0 {
            return Err(SyntheticError::ZeroLabelLength);
        }
        if self.alphabet.is_empty() {
            return Err(SyntheticError::EmptyAlphabet);
        }
        if !self.alphabet.is_ascii() {
            return Err(SyntheticError::NonAsciiAlphabet);
        }
        let max = Self::max_edges(self.vertices);
        if self.edges > max {
            return Err(SyntheticError::TooManyEdges {
                edges: self.edges,
                vertices: self.vertices,
                max,
            });
        }
        Ok(ids)
    }
}

fn dense_ids(vertices: usize) -> Result<Vec<VertexId>, SyntheticError> {
    if vertices == 0 {
        return Err(SyntheticError::ZeroVertices);
    }
    (0..vertices)
        .map(|index| {
            i64::try_from(index)
                .map(VertexId::new)
                .map_err(|_| SyntheticError::Overflow)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    fn vid(raw: i64) -> VertexId {
        VertexId::new(raw)
    }

    #[rstest]
    fn connected_joins_every_ordered_pair() {
        let graph = connected(4).expect("valid size");
        assert_eq!(graph.edge_count(), 12);
        for from in 0..4 {
            for to in 0..4 {
                assert_eq!(graph.has_edge(vid(from), vid(to)), from != to);
            }
        }
        assert_eq!(graph.label(vid(0)), Some("A"));
        assert_eq!(graph.label(vid(3)), Some("AAAA"));
    }

    #[rstest]
    fn bipartite_points_from_left_to_right() {
        let graph = bipartite(6).expect("valid size");
        assert_eq!(graph.edge_count(), 9);
        assert_eq!(graph.out_edges(vid(0)), &[vid(3), vid(4), vid(5)]);
        assert!(graph.out_edges(vid(4)).is_empty());
        assert_eq!(graph.label(vid(2)), Some("AAA"));
        assert_eq!(graph.label(vid(5)), Some("AAA"));
    }

    #[rstest]
    #[case::connected_empty(connected(0), SyntheticError::ZeroVertices)]
    #[case::bipartite_empty(bipartite(0), SyntheticError::ZeroVertices)]
    #[case::bipartite_odd(bipartite(5), SyntheticError::OddBipartite { vertices: 5 })]
    fn fixed_shapes_validate_size(
        #[case] result: Result<Graph, SyntheticError>,
        #[case] expected: SyntheticError,
    ) {
        assert_eq!(result.expect_err("size must be rejected"), expected);
    }

    #[rstest]
    #[case::too_many_edges(RandomGraph::new(4, 7, 3), SyntheticError::TooManyEdges { edges: 7, vertices: 4, max: 6 })]
    #[case::zero_label(RandomGraph::new(4, 2, 0), SyntheticError::ZeroLabelLength)]
    #[case::empty_alphabet(RandomGraph::new(4, 2, 3).with_alphabet(""), SyntheticError::EmptyAlphabet)]
    #[case::non_ascii(RandomGraph::new(4, 2, 3).with_alphabet("AÇ"), SyntheticError::NonAsciiAlphabet)]
    #[case::no_vertices(RandomGraph::new(0, 0, 3), SyntheticError::ZeroVertices)]
    fn random_shape_validates_parameters(#[case] shape: RandomGraph, #[case] expected: SyntheticError) {
        let err = shape
            .generate(&mut SmallRng::seed_from_u64(0))
            .expect_err("parameters must be rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn random_edges_are_distinct_and_loop_free() {
        let graph = RandomGraph::new(6, 15, 4)
            .with_alphabet("ACGTN")
            .generate(&mut SmallRng::seed_from_u64(77))
            .expect("valid parameters");
        let mut pairs = HashSet::new();
        for &from in graph.vertex_ids() {
            for &to in graph.out_edges(from) {
                assert_ne!(from, to);
                assert!(pairs.insert((from, to)), "duplicate edge {from} -> {to}");
            }
        }
        assert_eq!(pairs.len(), 15);
        assert!(
            graph
                .vertices()
                .all(|(_, label)| label.chars().all(|c| "ACGTN".contains(c)))
        );
    }

    #[rstest]
    fn random_graphs_are_reproducible() {
        let shape = RandomGraph::new(8, 10, 6);
        let first = shape.generate(&mut SmallRng::seed_from_u64(12)).expect("valid");
        let second = shape.generate(&mut SmallRng::seed_from_u64(12)).expect("valid");
        assert_eq!(first, second);
    }
}
