//! Line-oriented graph reader.
//!
//! Accepts two record shapes, `V\t<id>\t<label>` and `E\t<from>\t<to>`.
//! Blank lines are skipped and trailing whitespace is ignored. Every other
//! deviation is a [`FormatError`] tagged with its 1-based line number.

use std::io::BufRead;

use tracing::{debug, instrument};

use crate::{
    error::{FormatError, GraphError},
    graph::{Graph, GraphBuilder, VertexId},
};

impl Graph {
    /// Parses a graph from line-oriented `V`/`E` records.
    ///
    /// # Errors
    /// Returns [`GraphError::Io`] when reading fails and
    /// [`GraphError::Format`] for the first malformed or inconsistent record.
    ///
    /// # Examples
    /// ```
    /// use std::io::Cursor;
    /// use walkgen_core::{Graph, VertexId};
    ///
    /// let graph = Graph::from_reader(Cursor::new("V\t0\tACGT\nV\t1\tGGGG\nE\t0\t1\n"))?;
    /// assert_eq!(graph.vertex_count(), 2);
    /// assert!(graph.has_edge(VertexId::new(0), VertexId::new(1)));
    /// # Ok::<(), walkgen_core::GraphError>(())
    /// ```
    #[instrument(name = "core.parse_graph", err, skip(reader))]
    pub fn from_reader(reader: impl BufRead) -> Result<Self, GraphError> {
        let mut builder = GraphBuilder::default();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| GraphError::Io { source })?;
            let number = index + 1;
            parse_record(&mut builder, &line, number)
                .map_err(|error| GraphError::format(Some(number), error))?;
        }
        let graph = builder.build()?;
        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "graph parsed"
        );
        Ok(graph)
    }
}

fn parse_record(builder: &mut GraphBuilder, line: &str, number: usize) -> Result<(), FormatError> {
    let record = line.trim_end();
    if record.trim_start().is_empty() {
        return Ok(());
    }
    let fields: Vec<&str> = record.split('\t').collect();
    let [kind, first, second] = fields.as_slice() else {
        return Err(FormatError::FieldCount {
            found: fields.len(),
        });
    };
    match *kind {
        "V" => {
            let id = parse_id(first, "vertex id")?;
            builder.add_vertex(id, *second)?;
        }
        "E" => {
            let from = parse_id(first, "edge source")?;
            let to = parse_id(second, "edge target")?;
            builder.add_edge_on_line(from, to, number);
        }
        other => {
            return Err(FormatError::UnknownRecordKind {
                kind: other.to_owned(),
            });
        }
    }
    Ok(())
}

fn parse_id(raw: &str, field: &'static str) -> Result<VertexId, FormatError> {
    raw.trim().parse().map_err(|_| FormatError::InvalidId {
        field,
        value: raw.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use rstest::rstest;

    fn parse(raw: &str) -> Result<Graph, GraphError> {
        Graph::from_reader(Cursor::new(raw.to_owned()))
    }

    fn format_error(raw: &str) -> (Option<usize>, FormatError) {
        match parse(raw) {
            Err(GraphError::Format { line, error }) => (line, error),
            other => panic!("expected a format error, got {other:?}"),
        }
    }

    #[rstest]
    fn parses_vertices_and_edges_in_order() {
        let graph = parse("V\t2\tAC\nV\t0\tGT\nE\t2\t0\nE\t2\t0\n").expect("graph must parse");
        assert_eq!(
            graph.vertex_ids(),
            &[VertexId::new(2), VertexId::new(0)]
        );
        assert_eq!(graph.out_edges(VertexId::new(2)).len(), 2);
    }

    #[rstest]
    #[case::blank_lines("V\t0\tA\n\n   \nV\t1\tC\n")]
    #[case::crlf("V\t0\tA\r\nV\t1\tC\r\n")]
    #[case::no_trailing_newline("V\t0\tA\nV\t1\tC")]
    fn tolerates_whitespace_variants(#[case] raw: &str) {
        let graph = parse(raw).expect("graph must parse");
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.label(VertexId::new(1)), Some("C"));
    }

    #[rstest]
    #[case::unknown_kind("V\t0\tA\nX\t1\t2\n", 2, "GRAPH_FORMAT_UNKNOWN_RECORD_KIND")]
    #[case::too_few_fields("V\t0\n", 1, "GRAPH_FORMAT_FIELD_COUNT")]
    #[case::too_many_fields("V\t0\tA\tB\n", 1, "GRAPH_FORMAT_FIELD_COUNT")]
    #[case::space_separated("V 0 A\n", 1, "GRAPH_FORMAT_FIELD_COUNT")]
    #[case::bad_vertex_id("V\tzero\tA\n", 1, "GRAPH_FORMAT_INVALID_ID")]
    #[case::bad_edge_target("V\t0\tA\nE\t0\t1.5\n", 2, "GRAPH_FORMAT_INVALID_ID")]
    #[case::duplicate_vertex("V\t0\tA\nV\t0\tC\n", 2, "GRAPH_FORMAT_DUPLICATE_VERTEX")]
    #[case::dangling_edge("V\t0\tA\nE\t0\t5\nV\t1\tC\n", 2, "GRAPH_FORMAT_UNKNOWN_VERTEX")]
    fn reports_offending_line(#[case] raw: &str, #[case] line: usize, #[case] code: &str) {
        let (reported, error) = format_error(raw);
        assert_eq!(reported, Some(line));
        assert_eq!(error.code().as_str(), code);
    }

    #[rstest]
    fn trailing_tab_does_not_declare_an_empty_label() {
        let (_, error) = format_error("V\t0\t\n");
        assert_eq!(error, FormatError::FieldCount { found: 2 });
    }

    #[rstest]
    fn error_message_names_the_line() {
        let err = parse("V\t0\tA\nQ\t0\t0\n").expect_err("unknown kind must fail");
        assert_eq!(
            err.to_string(),
            "line 2: unknown record kind `Q`; expected `V` or `E`"
        );
    }

    #[rstest]
    fn written_graph_parses_back() {
        let original = parse("V\t5\tACGT\nV\t-3\tN\nE\t5\t-3\nE\t-3\t5\nE\t5\t-3\n")
            .expect("graph must parse");
        let mut buffer = Vec::new();
        original.write_to(&mut buffer).expect("write must succeed");
        let reparsed = Graph::from_reader(Cursor::new(buffer)).expect("output must parse");
        assert_eq!(reparsed, original);
    }
}
