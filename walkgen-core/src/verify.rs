//! Consistency check of emitted samples against the graph they came from.

use std::io::BufRead;

use tracing::{info, instrument};

use crate::{error::VerifyError, graph::Graph, output::Stream, sample::PathRecord};

/// Checks that every path record walks `graph` and spells the query on the
/// same line.
///
/// Returns the number of verified samples.
///
/// # Errors
/// Returns the first [`VerifyError`] found, tagged with its 1-based line
/// number, or [`VerifyError::LengthMismatch`] when one stream runs out
/// before the other.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use walkgen_core::{Graph, verify_streams};
///
/// let graph = Graph::from_reader(Cursor::new("V\t0\tACGT\nV\t1\tGGGG\nE\t0\t1\n"))?;
/// let paths = Cursor::new("0\t1 ,0\t1\n0 ,0\t3\n");
/// let queries = Cursor::new("ACGTGG\nACGT\n");
/// assert_eq!(verify_streams(&graph, paths, queries)?, 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(name = "core.verify", err, skip_all)]
pub fn verify_streams(
    graph: &Graph,
    paths: impl BufRead,
    queries: impl BufRead,
) -> Result<usize, VerifyError> {
    let mut paths = paths.lines();
    let mut queries = queries.lines();
    let mut checked = 0_usize;
    loop {
        let line = checked + 1;
        match (paths.next(), queries.next()) {
            (None, None) => break,
            (Some(path), Some(query)) => {
                let path = path.map_err(|source| VerifyError::Io {
                    stream: Stream::Paths,
                    source,
                })?;
                let query = query.map_err(|source| VerifyError::Io {
                    stream: Stream::Queries,
                    source,
                })?;
                let record: PathRecord = path
                    .parse()
                    .map_err(|error| VerifyError::Decode { line, error })?;
                let expected = record
                    .reconstruct(graph)
                    .map_err(|error| VerifyError::Path { line, error })?;
                let found = query.trim_end_matches('\r');
                if expected != found {
                    return Err(VerifyError::TextMismatch {
                        line,
                        expected,
                        found: found.to_owned(),
                    });
                }
                checked = line;
            }
            (Some(_), None) => {
                return Err(VerifyError::LengthMismatch {
                    paths: line + paths.count(),
                    queries: checked,
                });
            }
            (None, Some(_)) => {
                return Err(VerifyError::LengthMismatch {
                    paths: checked,
                    queries: line + queries.count(),
                });
            }
        }
    }
    info!(samples = checked, "samples verified");
    Ok(checked)
}
