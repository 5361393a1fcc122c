//! Single walk attempts.
//!
//! An attempt takes the start label from the start offset onwards and keeps
//! stepping to a uniformly chosen successor until the text reaches the
//! target length. Reaching a vertex without successors before then is a
//! [`WalkOutcome::DeadEnd`], which callers recover from by drawing a new
//! start point. So is a run of more than `vertex_count` consecutive empty
//! labels, which can only happen while circling an empty-label cycle.

use rand::{Rng, seq::SliceRandom};
use tracing::trace;

use crate::{
    error::{Result, SamplerError},
    graph::{Graph, VertexId},
    sample::{PathRecord, QuerySample},
    strategy::StartPoint,
};

/// Result of one walk attempt.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WalkOutcome {
    /// The walk produced a text of exactly the target length.
    Completed(QuerySample),
    /// The walk could not be extended to the target length: it reached a
    /// vertex without successors, or kept stepping through empty labels.
    DeadEnd {
        /// Vertex the walk stopped at.
        vertex: VertexId,
        /// Characters collected before the walk stalled.
        collected: usize,
    },
}

impl WalkOutcome {
    /// Returns the sample when the walk completed.
    #[must_use]
    pub fn completed(self) -> Option<QuerySample> {
        match self {
            Self::Completed(sample) => Some(sample),
            Self::DeadEnd { .. } => None,
        }
    }
}

/// Walks from `start` until `target_length` characters have been collected.
///
/// Successors are chosen uniformly from the declared out-edges, so duplicate
/// edges make a successor proportionally more likely. The random source is
/// consulted once per step and never when the start label alone is long
/// enough.
///
/// # Errors
/// Returns [`SamplerError::InvalidTargetLength`] for a zero target,
/// [`SamplerError::UnknownVertex`] when `start.vertex` is not in `graph`, and
/// [`SamplerError::OffsetOutOfRange`] when `start.offset` does not index a
/// character of the start label.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use rand::{SeedableRng, rngs::SmallRng};
/// use walkgen_core::{Graph, StartPoint, VertexId, WalkOutcome, attempt};
///
/// let graph = Graph::from_reader(Cursor::new("V\t0\tACGT\nV\t1\tGGGG\nE\t0\t1\n"))?;
/// let mut rng = SmallRng::seed_from_u64(1);
/// let start = StartPoint::new(VertexId::new(0), 0);
/// let WalkOutcome::Completed(sample) = attempt(&graph, start, 6, &mut rng)? else {
///     panic!("vertex 0 has a successor");
/// };
/// assert_eq!(sample.text(), "ACGTGG");
/// assert_eq!(sample.path(), &[VertexId::new(0), VertexId::new(1)]);
/// assert_eq!((sample.first_offset(), sample.last_offset()), (0, 1));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn attempt<R>(
    graph: &Graph,
    start: StartPoint,
    target_length: usize,
    rng: &mut R,
) -> Result<WalkOutcome>
where
    R: Rng + ?Sized,
{
    if target_length == 0 {
        return Err(SamplerError::InvalidTargetLength { got: 0 });
    }
    let label = graph
        .label(start.vertex)
        .ok_or(SamplerError::UnknownVertex { id: start.vertex })?;
    let head = label
        .get(start.offset..)
        .filter(|rest| !rest.is_empty())
        .ok_or(SamplerError::OffsetOutOfRange {
            id: start.vertex,
            offset: start.offset,
            label_len: label.len(),
        })?;

    let take = head.len().min(target_length);
    let mut text = String::with_capacity(target_length);
    text.push_str(head.get(..take).unwrap_or_default());
    let mut path = vec![start.vertex];
    let mut last_offset = start.offset + take - 1;
    let mut current = start.vertex;
    let stall_limit = graph.vertex_count();
    let mut idle_steps = 0_usize;

    while text.len() < target_length {
        let Some(&next) = graph.out_edges(current).choose(rng) else {
            trace!(vertex = %current, collected = text.len(), "walk reached a dead end");
            return Ok(WalkOutcome::DeadEnd {
                vertex: current,
                collected: text.len(),
            });
        };
        let needed = target_length - text.len();
        let next_label = graph.label(next).unwrap_or_default();
        let take = needed.min(next_label.len());
        text.push_str(next_label.get(..take).unwrap_or_default());
        path.push(next);
        current = next;
        if let Some(index) = take.checked_sub(1) {
            last_offset = index;
            idle_steps = 0;
        } else {
            idle_steps += 1;
            if idle_steps > stall_limit {
                trace!(vertex = %current, collected = text.len(), "walk stalled on empty labels");
                return Ok(WalkOutcome::DeadEnd {
                    vertex: current,
                    collected: text.len(),
                });
            }
        }
    }

    Ok(WalkOutcome::Completed(QuerySample::new(
        PathRecord::new(path, start.offset, last_offset),
        text,
    )))
}
