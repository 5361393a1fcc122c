//! Immutable labelled directed graph consumed by the sampler.
//!
//! A [`Graph`] is built once, through [`GraphBuilder`] or
//! [`Graph::from_reader`], and then shared read-only by every walk attempt.
//! Successor lists keep the order in which edges were declared and keep
//! duplicate edges: a repeated edge makes that successor proportionally more
//! likely to be chosen during a walk.

use std::{
    collections::HashMap,
    fmt,
    io::{self, Write},
    num::ParseIntError,
    str::FromStr,
};

use crate::error::{FormatError, GraphError};

/// Identifier of a graph vertex as it appears in the graph file.
///
/// # Examples
/// ```
/// use walkgen_core::VertexId;
///
/// let id: VertexId = "42".parse().expect("integer ids parse");
/// assert_eq!(id, VertexId::new(42));
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VertexId(i64);

impl VertexId {
    /// Wraps a raw vertex id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw vertex id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VertexId {
    type Err = ParseIntError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.parse().map(Self)
    }
}

impl From<i64> for VertexId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Read-only view of vertex labels and adjacency.
///
/// # Examples
/// ```
/// use walkgen_core::{Graph, VertexId};
///
/// let mut builder = Graph::builder();
/// builder.add_vertex(VertexId::new(0), "ACGT")?;
/// builder.add_vertex(VertexId::new(1), "GGGG")?;
/// builder.add_edge(VertexId::new(0), VertexId::new(1));
/// let graph = builder.build()?;
///
/// assert_eq!(graph.label(VertexId::new(0)), Some("ACGT"));
/// assert_eq!(graph.out_edges(VertexId::new(0)), &[VertexId::new(1)]);
/// assert!(graph.out_edges(VertexId::new(1)).is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    ids: Vec<VertexId>,
    labels: Vec<String>,
    successors: Vec<Vec<VertexId>>,
    positions: HashMap<VertexId, usize>,
}

impl Graph {
    /// Starts building a graph.
    #[must_use]
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.ids.len()
    }

    /// Returns the number of edges, counting duplicates.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    /// Returns whether the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the vertex ids in the order they were declared.
    #[must_use]
    pub fn vertex_ids(&self) -> &[VertexId] {
        &self.ids
    }

    /// Iterates over `(id, label)` pairs in declaration order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &str)> + '_ {
        self.ids
            .iter()
            .copied()
            .zip(self.labels.iter().map(String::as_str))
    }

    /// Returns whether `id` is a vertex of this graph.
    #[must_use]
    pub fn contains(&self, id: VertexId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Returns the label of `id`, or `None` if the vertex does not exist.
    #[must_use]
    pub fn label(&self, id: VertexId) -> Option<&str> {
        let position = *self.positions.get(&id)?;
        self.labels.get(position).map(String::as_str)
    }

    /// Returns the successors of `id` in declaration order, duplicates
    /// included. Unknown vertices and sinks both yield an empty slice.
    #[must_use]
    pub fn out_edges(&self, id: VertexId) -> &[VertexId] {
        self.positions
            .get(&id)
            .and_then(|&position| self.successors.get(position))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns whether the graph has at least one edge `from -> to`.
    #[must_use]
    pub fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.out_edges(from).contains(&to)
    }

    /// Assembles a graph from parallel vertex, label and successor lists.
    ///
    /// Callers guarantee unique ids, ASCII labels and known successors.
    pub(crate) fn from_parts(
        ids: Vec<VertexId>,
        labels: Vec<String>,
        successors: Vec<Vec<VertexId>>,
    ) -> Self {
        let positions = ids.iter().enumerate().map(|(index, id)| (*id, index)).collect();
        Self {
            ids,
            labels,
            successors,
            positions,
        }
    }

    /// Writes the graph as `V` records in declaration order followed by `E`
    /// records grouped by source vertex.
    ///
    /// The output parses back into an identical graph.
    ///
    /// # Errors
    /// Returns any [`io::Error`] raised by `writer`.
    pub fn write_to(&self, mut writer: impl Write) -> io::Result<()> {
        for (id, label) in self.vertices() {
            writeln!(writer, "V\t{id}\t{label}")?;
        }
        for (from, targets) in self.ids.iter().zip(&self.successors) {
            for to in targets {
                writeln!(writer, "E\t{from}\t{to}")?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingEdge {
    from: VertexId,
    to: VertexId,
    line: Option<usize>,
}

/// Accumulates vertices and edges before freezing them into a [`Graph`].
///
/// Edges may be added before their endpoints; endpoints are resolved when
/// [`GraphBuilder::build`] runs.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    ids: Vec<VertexId>,
    labels: Vec<String>,
    positions: HashMap<VertexId, usize>,
    edges: Vec<PendingEdge>,
}

impl GraphBuilder {
    /// Declares a vertex.
    ///
    /// # Errors
    /// Returns [`FormatError::DuplicateVertex`] when `id` was already declared
    /// and [`FormatError::NonAsciiLabel`] when `label` is not ASCII.
    pub fn add_vertex(
        &mut self,
        id: VertexId,
        label: impl Into<String>,
    ) -> Result<&mut Self, FormatError> {
        let label = label.into();
        if !label.is_ascii() {
            return Err(FormatError::NonAsciiLabel { id });
        }
        if self.positions.contains_key(&id) {
            return Err(FormatError::DuplicateVertex { id });
        }
        self.positions.insert(id, self.ids.len());
        self.ids.push(id);
        self.labels.push(label);
        Ok(self)
    }

    /// Declares a directed edge. Repeating an edge adds another copy.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) -> &mut Self {
        self.edges.push(PendingEdge {
            from,
            to,
            line: None,
        });
        self
    }

    pub(crate) fn add_edge_on_line(&mut self, from: VertexId, to: VertexId, line: usize) {
        self.edges.push(PendingEdge {
            from,
            to,
            line: Some(line),
        });
    }

    /// Returns the number of vertices declared so far.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.ids.len()
    }

    /// Resolves edge endpoints and freezes the graph.
    ///
    /// # Errors
    /// Returns [`GraphError::Format`] wrapping [`FormatError::UnknownVertex`]
    /// for the first edge whose endpoint was never declared.
    pub fn build(self) -> Result<Graph, GraphError> {
        let Self {
            ids,
            labels,
            positions,
            edges,
        } = self;
        let mut successors = vec![Vec::new(); ids.len()];
        for edge in edges {
            let source = positions.get(&edge.from).copied();
            let missing = match (source, positions.contains_key(&edge.to)) {
                (Some(_), true) => None,
                (None, _) => Some(edge.from),
                (Some(_), false) => Some(edge.to),
            };
            if let Some(missing) = missing {
                return Err(GraphError::format(
                    edge.line,
                    FormatError::UnknownVertex {
                        from: edge.from,
                        to: edge.to,
                        missing,
                    },
                ));
            }
            if let Some(targets) = source.and_then(|position| successors.get_mut(position)) {
                targets.push(edge.to);
            }
        }
        Ok(Graph {
            ids,
            labels,
            successors,
            positions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn vid(raw: i64) -> VertexId {
        VertexId::new(raw)
    }

    #[rstest]
    fn duplicate_edges_are_preserved() {
        let mut builder = Graph::builder();
        builder.add_vertex(vid(0), "A").expect("vertex 0");
        builder.add_vertex(vid(1), "C").expect("vertex 1");
        builder.add_vertex(vid(2), "G").expect("vertex 2");
        builder
            .add_edge(vid(0), vid(1))
            .add_edge(vid(0), vid(2))
            .add_edge(vid(0), vid(1));
        let graph = builder.build().expect("graph must build");
        assert_eq!(graph.out_edges(vid(0)), &[vid(1), vid(2), vid(1)]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[rstest]
    fn edges_may_precede_vertices() {
        let mut builder = Graph::builder();
        builder.add_edge(vid(7), vid(3));
        builder.add_vertex(vid(3), "T").expect("vertex 3");
        builder.add_vertex(vid(7), "A").expect("vertex 7");
        let graph = builder.build().expect("graph must build");
        assert!(graph.has_edge(vid(7), vid(3)));
        assert_eq!(graph.vertex_ids(), &[vid(3), vid(7)]);
    }

    #[rstest]
    #[case::missing_target(vid(0), vid(9), vid(9))]
    #[case::missing_source(vid(9), vid(0), vid(9))]
    fn dangling_edges_are_rejected(
        #[case] from: VertexId,
        #[case] to: VertexId,
        #[case] expected: VertexId,
    ) {
        let mut builder = Graph::builder();
        builder.add_vertex(vid(0), "A").expect("vertex 0");
        builder.add_edge(from, to);
        let err = builder.build().expect_err("dangling edge must fail");
        match err {
            GraphError::Format {
                line: None,
                error: FormatError::UnknownVertex { missing, .. },
            } => assert_eq!(missing, expected),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    fn duplicate_vertices_are_rejected() {
        let mut builder = Graph::builder();
        builder.add_vertex(vid(1), "A").expect("first declaration");
        let err = builder
            .add_vertex(vid(1), "C")
            .expect_err("second declaration must fail");
        assert_eq!(err, FormatError::DuplicateVertex { id: vid(1) });
    }

    #[rstest]
    fn non_ascii_labels_are_rejected() {
        let mut builder = Graph::builder();
        let err = builder
            .add_vertex(vid(1), "AÇGT")
            .expect_err("non-ASCII label must fail");
        assert_eq!(err, FormatError::NonAsciiLabel { id: vid(1) });
    }

    #[rstest]
    fn unknown_vertices_have_no_label_or_edges() {
        let graph = Graph::builder().build().expect("empty graph builds");
        assert!(graph.is_empty());
        assert_eq!(graph.label(vid(4)), None);
        assert!(graph.out_edges(vid(4)).is_empty());
    }

    #[rstest]
    fn write_to_emits_vertices_then_edges() {
        let mut builder = Graph::builder();
        builder.add_vertex(vid(0), "AC").expect("vertex 0");
        builder.add_vertex(vid(1), "GT").expect("vertex 1");
        builder.add_edge(vid(1), vid(0)).add_edge(vid(0), vid(1));
        let graph = builder.build().expect("graph must build");
        let mut buffer = Vec::new();
        graph.write_to(&mut buffer).expect("write must succeed");
        let text = String::from_utf8(buffer).expect("output is UTF-8");
        assert_eq!(text, "V\t0\tAC\nV\t1\tGT\nE\t0\t1\nE\t1\t0\n");
    }
}
