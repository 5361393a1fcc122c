//! Accepted query samples and their provenance.

use crate::{
    error::PathError,
    graph::{Graph, VertexId},
};

/// Provenance of a query: the walked path and the offsets bounding the text
/// inside its first and last labels.
///
/// `first_offset` is the index of the first character taken from the first
/// label; `last_offset` is the index of the last character taken from the
/// final label. Every label in between is taken whole.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PathRecord {
    path: Vec<VertexId>,
    first_offset: usize,
    last_offset: usize,
}

impl PathRecord {
    /// Creates a record without checking it against any graph.
    #[must_use]
    pub const fn new(path: Vec<VertexId>, first_offset: usize, last_offset: usize) -> Self {
        Self {
            path,
            first_offset,
            last_offset,
        }
    }

    /// Vertices visited, in walk order.
    #[must_use]
    pub fn path(&self) -> &[VertexId] {
        &self.path
    }

    /// Offset of the first character inside the first label.
    #[must_use]
    pub const fn first_offset(&self) -> usize {
        self.first_offset
    }

    /// Offset of the last character inside the final label.
    #[must_use]
    pub const fn last_offset(&self) -> usize {
        self.last_offset
    }

    /// Spells the text this record describes by slicing labels along the
    /// path.
    ///
    /// # Errors
    /// Returns [`PathError`] when the path is empty, visits an unknown vertex,
    /// steps along a missing edge, or carries offsets outside their labels.
    ///
    /// # Examples
    /// ```
    /// use std::io::Cursor;
    /// use walkgen_core::{Graph, PathRecord, VertexId};
    ///
    /// let graph = Graph::from_reader(Cursor::new("V\t0\tACGT\nV\t1\tGGGG\nE\t0\t1\n"))?;
    /// let record = PathRecord::new(vec![VertexId::new(0), VertexId::new(1)], 1, 1);
    /// assert_eq!(record.reconstruct(&graph)?, "CGTGG");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn reconstruct(&self, graph: &Graph) -> Result<String, PathError> {
        let (first, rest) = self.path.split_first().ok_or(PathError::EmptyPath)?;
        let first_label = label_of(graph, *first)?;
        check_offset(*first, self.first_offset, first_label)?;

        let Some((last, middle)) = rest.split_last() else {
            if self.last_offset < self.first_offset {
                return Err(PathError::InvertedOffsets {
                    first: self.first_offset,
                    last: self.last_offset,
                });
            }
            check_offset(*first, self.last_offset, first_label)?;
            return Ok(slice(first_label, self.first_offset, self.last_offset + 1).to_owned());
        };

        let mut text = String::from(slice(first_label, self.first_offset, first_label.len()));
        let mut previous = *first;
        for &vertex in middle {
            check_edge(graph, previous, vertex)?;
            text.push_str(label_of(graph, vertex)?);
            previous = vertex;
        }
        check_edge(graph, previous, *last)?;
        let last_label = label_of(graph, *last)?;
        check_offset(*last, self.last_offset, last_label)?;
        text.push_str(slice(last_label, 0, self.last_offset + 1));
        Ok(text)
    }
}

/// A query string of the requested length together with its provenance.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct QuerySample {
    record: PathRecord,
    text: String,
}

impl QuerySample {
    /// Pairs a record with the text it spells.
    #[must_use]
    pub const fn new(record: PathRecord, text: String) -> Self {
        Self { record, text }
    }

    /// Provenance of the query.
    #[must_use]
    pub const fn record(&self) -> &PathRecord {
        &self.record
    }

    /// Vertices visited, in walk order.
    #[must_use]
    pub fn path(&self) -> &[VertexId] {
        self.record.path()
    }

    /// Offset of the first character inside the first label.
    #[must_use]
    pub const fn first_offset(&self) -> usize {
        self.record.first_offset()
    }

    /// Offset of the last character inside the final label.
    #[must_use]
    pub const fn last_offset(&self) -> usize {
        self.record.last_offset()
    }

    /// The query text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Splits the sample into its record and text.
    #[must_use]
    pub fn into_parts(self) -> (PathRecord, String) {
        (self.record, self.text)
    }
}

fn label_of(graph: &Graph, id: VertexId) -> Result<&str, PathError> {
    graph.label(id).ok_or(PathError::UnknownVertex { id })
}

fn check_edge(graph: &Graph, from: VertexId, to: VertexId) -> Result<(), PathError> {
    if graph.has_edge(from, to) {
        Ok(())
    } else {
        Err(PathError::MissingEdge { from, to })
    }
}

fn check_offset(id: VertexId, offset: usize, label: &str) -> Result<(), PathError> {
    if offset < label.len() {
        Ok(())
    } else {
        Err(PathError::OffsetOutOfRange {
            id,
            offset,
            label_len: label.len(),
        })
    }
}

// Labels are ASCII and offsets are checked, so `get` never misses.
fn slice(label: &str, start: usize, end: usize) -> &str {
    label.get(start..end).unwrap_or_default()
}
