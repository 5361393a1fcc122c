use std::io::Cursor;

use proptest::{collection, prelude::Strategy};
use walkgen_core::{Graph, VertexId};

#[must_use]
pub fn parse(raw: &str) -> Graph {
    Graph::from_reader(Cursor::new(raw.to_owned())).expect("fixture graph must parse")
}

#[must_use]
pub fn vid(raw: i64) -> VertexId {
    VertexId::new(raw)
}

/// Small graphs over `ACGTN` labels. Vertex `0` always carries a non-empty
/// label so every graph has a start candidate; other labels may be empty.
pub fn graph_strategy() -> impl Strategy<Value = Graph> {
    (1_usize..8)
        .prop_flat_map(|vertices| {
            (
                "[ACGT]{1,6}",
                collection::vec("[ACGTN]{0,6}", vertices - 1),
                collection::vec((0..vertices, 0..vertices), 0..vertices * 3),
            )
        })
        .prop_map(|(first, rest, edges)| {
            let mut builder = Graph::builder();
            for (index, label) in std::iter::once(first).chain(rest).enumerate() {
                builder
                    .add_vertex(index_id(index), label)
                    .expect("generated ids are unique");
            }
            for (from, to) in edges {
                builder.add_edge(index_id(from), index_id(to));
            }
            builder.build().expect("generated edges reference declared vertices")
        })
}

/// Copies `graph` and adds an empty-label vertex `-1` with a self-loop,
/// reachable from vertex `0`.
#[must_use]
pub fn with_empty_loop(graph: &Graph) -> Graph {
    let trap = VertexId::new(-1);
    let mut builder = Graph::builder();
    for (id, label) in graph.vertices() {
        builder.add_vertex(id, label).expect("source ids are unique");
    }
    builder.add_vertex(trap, "").expect("-1 is never generated");
    for &from in graph.vertex_ids() {
        for &to in graph.out_edges(from) {
            builder.add_edge(from, to);
        }
    }
    builder.add_edge(VertexId::new(0), trap).add_edge(trap, trap);
    builder.build().expect("every edge references a declared vertex")
}

fn index_id(index: usize) -> VertexId {
    VertexId::new(i64::try_from(index).expect("small index fits in i64"))
}
