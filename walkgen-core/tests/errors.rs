use std::io;

use rstest::rstest;
use walkgen_core::{
    FormatError, FormatErrorCode, GenerateError, GenerateErrorCode, GraphError, GraphErrorCode,
    PathError, PathErrorCode, RecordDecodeError, SamplerError, SamplerErrorCode, SyntheticError,
    Stream, StreamError, SyntheticErrorCode, VertexId, VerifyError, VerifyErrorCode,
};

#[rstest]
#[case(SamplerError::InvalidTargetLength { got: 0 }, SamplerErrorCode::InvalidTargetLength)]
#[case(SamplerError::InvalidMaxAttempts { got: 0 }, SamplerErrorCode::InvalidMaxAttempts)]
#[case(SamplerError::EmptyGraph { vertices: 2 }, SamplerErrorCode::EmptyGraph)]
#[case(SamplerError::UnknownVertex { id: VertexId::new(4) }, SamplerErrorCode::UnknownVertex)]
#[case(
    SamplerError::OffsetOutOfRange { id: VertexId::new(1), offset: 9, label_len: 3 },
    SamplerErrorCode::OffsetOutOfRange,
)]
#[case(
    SamplerError::InvalidStrategy { index: 3, available: 2 },
    SamplerErrorCode::InvalidStrategy,
)]
#[case(
    SamplerError::AttemptsExhausted { attempts: 10, target_length: 4 },
    SamplerErrorCode::AttemptsExhausted,
)]
fn returns_expected_sampler_code(#[case] error: SamplerError, #[case] expected: SamplerErrorCode) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().to_string(), expected.as_str());
}

#[rstest]
#[case(
    GraphError::Io { source: io::Error::other("gone") },
    GraphErrorCode::Io,
    None,
)]
#[case(
    GraphError::Format { line: Some(3), error: FormatError::FieldCount { found: 2 } },
    GraphErrorCode::Format,
    Some(FormatErrorCode::FieldCount),
)]
fn returns_expected_graph_code(
    #[case] error: GraphError,
    #[case] expected: GraphErrorCode,
    #[case] format_code: Option<FormatErrorCode>,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.format_code(), format_code);
}

#[rstest]
fn graph_errors_without_a_line_have_no_prefix() {
    let error = GraphError::Format {
        line: None,
        error: FormatError::DuplicateVertex { id: VertexId::new(2) },
    };
    assert_eq!(error.to_string(), "vertex 2 is declared more than once");
}

#[rstest]
#[case(
    GenerateError::Sampler(SamplerError::EmptyGraph { vertices: 0 }),
    GenerateErrorCode::Sampler,
    Some(SamplerErrorCode::EmptyGraph),
)]
#[case(
    GenerateError::Output { index: 2, stream: Stream::Queries, source: io::Error::other("full") },
    GenerateErrorCode::Output,
    None,
)]
fn returns_expected_generate_code(
    #[case] error: GenerateError,
    #[case] expected: GenerateErrorCode,
    #[case] sampler_code: Option<SamplerErrorCode>,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.sampler_code(), sampler_code);
}

#[rstest]
#[case(PathError::EmptyPath, PathErrorCode::EmptyPath)]
#[case(
    PathError::MissingEdge { from: VertexId::new(0), to: VertexId::new(1) },
    PathErrorCode::MissingEdge,
)]
#[case(PathError::InvertedOffsets { first: 2, last: 1 }, PathErrorCode::InvertedOffsets)]
fn returns_expected_path_code(#[case] error: PathError, #[case] expected: PathErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case(
    VerifyError::Decode { line: 1, error: RecordDecodeError::MissingSeparator },
    VerifyErrorCode::Decode,
)]
#[case(VerifyError::LengthMismatch { paths: 2, queries: 1 }, VerifyErrorCode::LengthMismatch)]
#[case(
    VerifyError::TextMismatch { line: 4, expected: "AC".into(), found: "AG".into() },
    VerifyErrorCode::TextMismatch,
)]
fn returns_expected_verify_code(#[case] error: VerifyError, #[case] expected: VerifyErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case(SyntheticError::ZeroVertices, SyntheticErrorCode::ZeroVertices)]
#[case(SyntheticError::OddBipartite { vertices: 3 }, SyntheticErrorCode::OddBipartite)]
#[case(
    SyntheticError::TooManyEdges { edges: 9, vertices: 3, max: 3 },
    SyntheticErrorCode::TooManyEdges,
)]
fn returns_expected_synthetic_code(
    #[case] error: SyntheticError,
    #[case] expected: SyntheticErrorCode,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), expected.as_str());
}

#[rstest]
#[case(Stream::Paths, "failed to read paths stream: gone")]
#[case(Stream::Queries, "failed to read queries stream: gone")]
fn stream_errors_name_their_stream(#[case] stream: Stream, #[case] expected: &str) {
    let verify = VerifyError::Io { stream, source: io::Error::other("gone") };
    assert_eq!(verify.to_string(), expected);
    let write = StreamError { stream, source: io::Error::other("gone") };
    assert_eq!(write.to_string(), format!("{} stream: gone", stream.as_str()));
}
