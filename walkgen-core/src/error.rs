//! Error types for the walkgen core library.
//!
//! Every public error enum exposes a stable machine-readable code through
//! `code()`, so the CLI can log failures without matching on messages.

use std::{fmt, io};

use thiserror::Error;

use crate::{graph::VertexId, output::Stream};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// A graph record that is not one of the two recognised shapes, or a graph
/// whose records contradict each other.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum FormatError {
    /// The record kind was neither `V` nor `E`.
    #[error("unknown record kind `{kind}`; expected `V` or `E`")]
    UnknownRecordKind {
        /// Raw kind field.
        kind: String,
    },
    /// The record did not contain exactly three tab-separated fields.
    #[error("expected 3 tab-separated fields, found {found}")]
    FieldCount {
        /// Number of fields present on the line.
        found: usize,
    },
    /// A vertex id field was not an integer.
    #[error("invalid {field} `{value}`: expected an integer vertex id")]
    InvalidId {
        /// Which field was malformed.
        field: &'static str,
        /// Raw field contents.
        value: String,
    },
    /// A vertex label contained non-ASCII characters.
    #[error("label of vertex {id} contains non-ASCII characters")]
    NonAsciiLabel {
        /// Vertex carrying the label.
        id: VertexId,
    },
    /// A vertex id was declared twice.
    #[error("vertex {id} is declared more than once")]
    DuplicateVertex {
        /// Repeated vertex id.
        id: VertexId,
    },
    /// An edge referenced a vertex that was never declared.
    #[error("edge {from} -> {to} references undeclared vertex {missing}")]
    UnknownVertex {
        /// Source of the offending edge.
        from: VertexId,
        /// Target of the offending edge.
        to: VertexId,
        /// The endpoint that has no `V` record.
        missing: VertexId,
    },
}

define_error_codes! {
    /// Stable codes describing [`FormatError`] variants.
    enum FormatErrorCode for FormatError {
        /// The record kind was neither `V` nor `E`.
        UnknownRecordKind => UnknownRecordKind { .. } => "GRAPH_FORMAT_UNKNOWN_RECORD_KIND",
        /// The record did not contain exactly three fields.
        FieldCount => FieldCount { .. } => "GRAPH_FORMAT_FIELD_COUNT",
        /// A vertex id field was not an integer.
        InvalidId => InvalidId { .. } => "GRAPH_FORMAT_INVALID_ID",
        /// A vertex label contained non-ASCII characters.
        NonAsciiLabel => NonAsciiLabel { .. } => "GRAPH_FORMAT_NON_ASCII_LABEL",
        /// A vertex id was declared twice.
        DuplicateVertex => DuplicateVertex { .. } => "GRAPH_FORMAT_DUPLICATE_VERTEX",
        /// An edge referenced a vertex that was never declared.
        UnknownVertex => UnknownVertex { .. } => "GRAPH_FORMAT_UNKNOWN_VERTEX",
    }
}

/// Error produced while reading or building a [`crate::Graph`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GraphError {
    /// Reading the graph source failed.
    #[error("failed to read graph: {source}")]
    Io {
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A record was malformed or inconsistent with the rest of the graph.
    #[error("{}{error}", line_prefix(.line))]
    Format {
        /// 1-based line number of the offending record, when known.
        line: Option<usize>,
        /// What was wrong with the record.
        #[source]
        error: FormatError,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// Reading the graph source failed.
        Io => Io { .. } => "GRAPH_IO",
        /// A record was malformed or inconsistent with the rest of the graph.
        Format => Format { .. } => "GRAPH_FORMAT",
    }
}

impl GraphError {
    /// Retrieve the inner [`FormatErrorCode`] when the error is a format error.
    #[must_use]
    pub const fn format_code(&self) -> Option<FormatErrorCode> {
        match self {
            Self::Format { error, .. } => Some(error.code()),
            Self::Io { .. } => None,
        }
    }

    pub(crate) fn format(line: Option<usize>, error: FormatError) -> Self {
        Self::Format { line, error }
    }
}

fn line_prefix(line: &Option<usize>) -> String {
    line.map(|value| format!("line {value}: "))
        .unwrap_or_default()
}

/// Error produced while configuring or running the query sampler.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SamplerError {
    /// Target query length must be greater than zero.
    #[error("target length must be at least 1 (got {got})")]
    InvalidTargetLength {
        /// The invalid length supplied by the caller.
        got: usize,
    },
    /// The attempt cap must be greater than zero when set.
    #[error("max_attempts must be at least 1 (got {got})")]
    InvalidMaxAttempts {
        /// The invalid cap supplied by the caller.
        got: usize,
    },
    /// The graph offers no vertex with a non-empty label to start from.
    #[error("graph with {vertices} vertices has no non-empty label to start a walk from")]
    EmptyGraph {
        /// Number of vertices in the graph.
        vertices: usize,
    },
    /// A walk was requested from a vertex that is not in the graph.
    #[error("vertex {id} is not part of the graph")]
    UnknownVertex {
        /// The missing vertex.
        id: VertexId,
    },
    /// A walk was requested from an offset outside the start label.
    #[error("offset {offset} is outside the label of vertex {id} (length {label_len})")]
    OffsetOutOfRange {
        /// Start vertex.
        id: VertexId,
        /// Requested offset.
        offset: usize,
        /// Length of the start vertex label.
        label_len: usize,
    },
    /// A strategy policy chose a position outside its own strategy list.
    #[error("policy chose strategy {index} but lists only {available}")]
    InvalidStrategy {
        /// Position returned by the policy.
        index: usize,
        /// Number of strategies the policy lists.
        available: usize,
    },
    /// The rejection loop hit its attempt cap without an acceptable sample.
    #[error("no acceptable walk of length {target_length} after {attempts} attempts")]
    AttemptsExhausted {
        /// Number of attempts made for the failing sample.
        attempts: usize,
        /// Requested query length.
        target_length: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`SamplerError`] variants.
    enum SamplerErrorCode for SamplerError {
        /// Target query length must be greater than zero.
        InvalidTargetLength => InvalidTargetLength { .. } => "SAMPLER_INVALID_TARGET_LENGTH",
        /// The attempt cap must be greater than zero when set.
        InvalidMaxAttempts => InvalidMaxAttempts { .. } => "SAMPLER_INVALID_MAX_ATTEMPTS",
        /// The graph offers no start candidate.
        EmptyGraph => EmptyGraph { .. } => "SAMPLER_EMPTY_GRAPH",
        /// A walk was requested from an unknown vertex.
        UnknownVertex => UnknownVertex { .. } => "SAMPLER_UNKNOWN_VERTEX",
        /// A walk was requested from an out-of-range offset.
        OffsetOutOfRange => OffsetOutOfRange { .. } => "SAMPLER_OFFSET_OUT_OF_RANGE",
        /// A policy chose a strategy it does not list.
        InvalidStrategy => InvalidStrategy { .. } => "SAMPLER_INVALID_STRATEGY",
        /// The rejection loop hit its attempt cap.
        AttemptsExhausted => AttemptsExhausted { .. } => "SAMPLER_ATTEMPTS_EXHAUSTED",
    }
}

/// A path record that does not describe a walk through the graph.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PathError {
    /// The path contained no vertices.
    #[error("path is empty")]
    EmptyPath,
    /// The path visits a vertex that is not in the graph.
    #[error("path visits unknown vertex {id}")]
    UnknownVertex {
        /// The missing vertex.
        id: VertexId,
    },
    /// Two consecutive path vertices are not joined by an edge.
    #[error("path steps from {from} to {to} but the graph has no such edge")]
    MissingEdge {
        /// Step source.
        from: VertexId,
        /// Step target.
        to: VertexId,
    },
    /// An offset lies outside the label it indexes.
    #[error("offset {offset} is outside the label of vertex {id} (length {label_len})")]
    OffsetOutOfRange {
        /// Vertex whose label was indexed.
        id: VertexId,
        /// Offending offset.
        offset: usize,
        /// Length of the label.
        label_len: usize,
    },
    /// A single-vertex path ends before it starts.
    #[error("last offset {last} precedes first offset {first} on a single-vertex path")]
    InvertedOffsets {
        /// First offset.
        first: usize,
        /// Last offset.
        last: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`PathError`] variants.
    enum PathErrorCode for PathError {
        /// The path contained no vertices.
        EmptyPath => EmptyPath => "PATH_EMPTY",
        /// The path visits an unknown vertex.
        UnknownVertex => UnknownVertex { .. } => "PATH_UNKNOWN_VERTEX",
        /// Two consecutive vertices are not joined by an edge.
        MissingEdge => MissingEdge { .. } => "PATH_MISSING_EDGE",
        /// An offset lies outside its label.
        OffsetOutOfRange => OffsetOutOfRange { .. } => "PATH_OFFSET_OUT_OF_RANGE",
        /// A single-vertex path ends before it starts.
        InvertedOffsets => InvertedOffsets { .. } => "PATH_INVERTED_OFFSETS",
    }
}

/// A path-stream line that could not be decoded.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RecordDecodeError {
    /// The `" ,"` separator between path and offsets was missing.
    #[error("missing ` ,` separator between path and offsets")]
    MissingSeparator,
    /// The offsets section did not contain exactly two tab-separated values.
    #[error("expected `<first>\\t<last>` after the separator, found `{found}`")]
    OffsetFields {
        /// Raw offsets section.
        found: String,
    },
    /// A vertex id or offset was not a valid integer.
    #[error("invalid integer `{value}`")]
    InvalidNumber {
        /// Raw token.
        value: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`RecordDecodeError`] variants.
    enum RecordDecodeErrorCode for RecordDecodeError {
        /// The separator was missing.
        MissingSeparator => MissingSeparator => "RECORD_MISSING_SEPARATOR",
        /// The offsets section was malformed.
        OffsetFields => OffsetFields { .. } => "RECORD_OFFSET_FIELDS",
        /// A number failed to parse.
        InvalidNumber => InvalidNumber { .. } => "RECORD_INVALID_NUMBER",
    }
}

/// I/O failure on one of the two output streams.
#[derive(Debug, Error)]
#[error("{stream} stream: {source}")]
pub struct StreamError {
    /// Stream whose sink failed.
    pub stream: Stream,
    /// Underlying I/O failure.
    #[source]
    pub source: io::Error,
}

impl StreamError {
    pub(crate) fn on(stream: Stream) -> impl FnOnce(io::Error) -> Self {
        move |source| Self { stream, source }
    }
}

/// Error produced while running the generator against an output sink.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Sampling failed.
    #[error(transparent)]
    Sampler(#[from] SamplerError),
    /// Writing a sample failed.
    #[error("failed to write sample {index} to the {stream} stream: {source}")]
    Output {
        /// Zero-based index of the sample being written.
        index: usize,
        /// Stream whose sink failed.
        stream: Stream,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

define_error_codes! {
    /// Stable codes describing [`GenerateError`] variants.
    enum GenerateErrorCode for GenerateError {
        /// Sampling failed.
        Sampler => Sampler(..) => "GENERATE_SAMPLER",
        /// Writing a sample failed.
        Output => Output { .. } => "GENERATE_OUTPUT",
    }
}

impl GenerateError {
    /// Retrieve the inner [`SamplerErrorCode`] when sampling failed.
    #[must_use]
    pub const fn sampler_code(&self) -> Option<SamplerErrorCode> {
        match self {
            Self::Sampler(error) => Some(error.code()),
            Self::Output { .. } => None,
        }
    }
}

/// Error produced while checking emitted samples against a graph.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Reading one of the streams failed.
    #[error("failed to read {stream} stream: {source}")]
    Io {
        /// Stream that failed.
        stream: Stream,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A path record could not be decoded.
    #[error("line {line}: {error}")]
    Decode {
        /// 1-based line number in the path stream.
        line: usize,
        /// Decoding failure.
        #[source]
        error: RecordDecodeError,
    },
    /// A path record does not describe a walk through the graph.
    #[error("line {line}: {error}")]
    Path {
        /// 1-based line number in the path stream.
        line: usize,
        /// Walk failure.
        #[source]
        error: PathError,
    },
    /// The reconstructed text differs from the emitted query.
    #[error("line {line}: path spells `{expected}` but query is `{found}`")]
    TextMismatch {
        /// 1-based line number.
        line: usize,
        /// Text reconstructed from the graph.
        expected: String,
        /// Text read from the query stream.
        found: String,
    },
    /// The two streams contain different numbers of lines.
    #[error("path stream has {paths} records but query stream has {queries}")]
    LengthMismatch {
        /// Number of path records read.
        paths: usize,
        /// Number of query lines read.
        queries: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`VerifyError`] variants.
    enum VerifyErrorCode for VerifyError {
        /// Reading a stream failed.
        Io => Io { .. } => "VERIFY_IO",
        /// A path record could not be decoded.
        Decode => Decode { .. } => "VERIFY_DECODE",
        /// A path record does not describe a walk.
        Path => Path { .. } => "VERIFY_PATH",
        /// The reconstructed text differs from the query.
        TextMismatch => TextMismatch { .. } => "VERIFY_TEXT_MISMATCH",
        /// The streams have different lengths.
        LengthMismatch => LengthMismatch { .. } => "VERIFY_LENGTH_MISMATCH",
    }
}

/// Error produced while generating a synthetic graph.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SyntheticError {
    /// The requested vertex count was zero.
    #[error("vertex count must be greater than zero")]
    ZeroVertices,
    /// Bipartite graphs need an even vertex count.
    #[error("bipartite graphs need an even vertex count (got {vertices})")]
    OddBipartite {
        /// Requested vertex count.
        vertices: usize,
    },
    /// More edges were requested than the generator can place.
    #[error("cannot place {edges} edges among {vertices} vertices (at most {max})")]
    TooManyEdges {
        /// Requested edge count.
        edges: usize,
        /// Requested vertex count.
        vertices: usize,
        /// Largest admissible edge count.
        max: usize,
    },
    /// Random labels need a positive length.
    #[error("label length must be greater than zero")]
    ZeroLabelLength,
    /// The label alphabet was empty.
    #[error("label alphabet must not be empty")]
    EmptyAlphabet,
    /// The label alphabet contained non-ASCII characters.
    #[error("label alphabet must be ASCII")]
    NonAsciiAlphabet,
    /// The requested size does not fit the id or label space.
    #[error("requested graph size overflows")]
    Overflow,
}

define_error_codes! {
    /// Stable codes describing [`SyntheticError`] variants.
    enum SyntheticErrorCode for SyntheticError {
        /// The requested vertex count was zero.
        ZeroVertices => ZeroVertices => "SYNTHETIC_ZERO_VERTICES",
        /// Bipartite graphs need an even vertex count.
        OddBipartite => OddBipartite { .. } => "SYNTHETIC_ODD_BIPARTITE",
        /// More edges were requested than can be placed.
        TooManyEdges => TooManyEdges { .. } => "SYNTHETIC_TOO_MANY_EDGES",
        /// Random labels need a positive length.
        ZeroLabelLength => ZeroLabelLength => "SYNTHETIC_ZERO_LABEL_LENGTH",
        /// The label alphabet was empty.
        EmptyAlphabet => EmptyAlphabet => "SYNTHETIC_EMPTY_ALPHABET",
        /// The label alphabet was not ASCII.
        NonAsciiAlphabet => NonAsciiAlphabet => "SYNTHETIC_NON_ASCII_ALPHABET",
        /// The requested size overflows.
        Overflow => Overflow => "SYNTHETIC_OVERFLOW",
    }
}

/// Convenient alias for results returned by the sampling API.
pub type Result<T> = core::result::Result<T, SamplerError>;
