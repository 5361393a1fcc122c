//! Walkgen core library: random-walk query sampling over labelled graphs.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod error;
mod filter;
mod generator;
mod graph;
mod output;
mod parse;
mod policy;
mod sample;
mod strategy;
pub mod synthetic;
mod verify;
mod walk;

pub use crate::{
    builder::{DEFAULT_MAX_ATTEMPTS, QueryGeneratorBuilder},
    error::{
        FormatError, FormatErrorCode, GenerateError, GenerateErrorCode, GraphError,
        GraphErrorCode, PathError, PathErrorCode, RecordDecodeError, RecordDecodeErrorCode,
        Result, SamplerError, SamplerErrorCode, StreamError, SyntheticError, SyntheticErrorCode,
        VerifyError, VerifyErrorCode,
    },
    filter::{AttemptStats, RejectionFilter},
    generator::{QueryGenerator, RunSummary},
    graph::{Graph, GraphBuilder, VertexId},
    output::{QueryWriter, Stream},
    policy::{SamplingPolicy, StrategyPolicy},
    sample::{PathRecord, QuerySample},
    strategy::{SamplingStrategy, StartDistribution, StartPoint, Weighting},
    verify::verify_streams,
    walk::{WalkOutcome, attempt},
};
