//! Encoding of accepted samples into the path and query streams.
//!
//! The path stream carries one record per line: the visited vertex ids
//! joined by tabs, the literal `" ,"`, then the first and last offsets
//! separated by a tab. The query stream carries the matching text on the
//! same line number. Both layouts are consumed by external tooling and must
//! not change.

use std::{
    fmt,
    io::Write,
    str::FromStr,
};

use crate::{
    error::{RecordDecodeError, StreamError},
    graph::VertexId,
    sample::{PathRecord, QuerySample},
};

const OFFSET_SEPARATOR: &str = " ,";

/// One of the two output streams.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Stream {
    /// Path and offset records.
    Paths,
    /// Query text.
    Queries,
}

impl Stream {
    /// Stable lowercase name used in messages and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paths => "paths",
            Self::Queries => "queries",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PathRecord {
    /// Formats the record as a path-stream line without the newline.
    ///
    /// ```
    /// use walkgen_core::{PathRecord, VertexId};
    ///
    /// let record = PathRecord::new(vec![VertexId::new(3), VertexId::new(8)], 2, 0);
    /// assert_eq!(record.to_string(), "3\t8 ,2\t0");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids = self.path().iter();
        if let Some(first) = ids.next() {
            write!(f, "{first}")?;
            for id in ids {
                write!(f, "\t{id}")?;
            }
        }
        write!(
            f,
            "{OFFSET_SEPARATOR}{}\t{}",
            self.first_offset(),
            self.last_offset()
        )
    }
}

impl FromStr for PathRecord {
    type Err = RecordDecodeError;

    /// Decodes a path-stream line. A trailing line terminator is ignored.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (ids, offsets) = line
            .rsplit_once(OFFSET_SEPARATOR)
            .ok_or(RecordDecodeError::MissingSeparator)?;
        let path = if ids.is_empty() {
            Vec::new()
        } else {
            ids.split('\t')
                .map(parse_number::<VertexId>)
                .collect::<Result<Vec<_>, _>>()?
        };
        let (first, last) =
            offsets
                .split_once('\t')
                .ok_or_else(|| RecordDecodeError::OffsetFields {
                    found: offsets.to_owned(),
                })?;
        if last.contains('\t') {
            return Err(RecordDecodeError::OffsetFields {
                found: offsets.to_owned(),
            });
        }
        Ok(Self::new(path, parse_number(first)?, parse_number(last)?))
    }
}

fn parse_number<T: FromStr>(raw: &str) -> Result<T, RecordDecodeError> {
    raw.trim().parse().map_err(|_| RecordDecodeError::InvalidNumber {
        value: raw.to_owned(),
    })
}

/// Writes accepted samples to a path stream and a query stream in lockstep.
///
/// # Examples
/// ```
/// use walkgen_core::{PathRecord, QuerySample, QueryWriter, VertexId};
///
/// let mut writer = QueryWriter::new(Vec::new(), Vec::new());
/// let record = PathRecord::new(vec![VertexId::new(0), VertexId::new(1)], 0, 1);
/// writer.write_sample(&QuerySample::new(record, "ACGTGG".to_owned()))?;
/// let (paths, queries) = writer.finish()?;
/// assert_eq!(paths, b"0\t1 ,0\t1\n");
/// assert_eq!(queries, b"ACGTGG\n");
/// # Ok::<(), walkgen_core::StreamError>(())
/// ```
#[derive(Debug)]
pub struct QueryWriter<P: Write, T: Write> {
    paths: P,
    queries: T,
    written: usize,
}

impl<P: Write, T: Write> QueryWriter<P, T> {
    /// Wraps the two output sinks.
    pub const fn new(paths: P, queries: T) -> Self {
        Self {
            paths,
            queries,
            written: 0,
        }
    }

    /// Appends one sample to both streams.
    ///
    /// # Errors
    /// Returns a [`StreamError`] naming the sink that failed.
    pub fn write_sample(&mut self, sample: &QuerySample) -> Result<(), StreamError> {
        writeln!(self.paths, "{}", sample.record()).map_err(StreamError::on(Stream::Paths))?;
        writeln!(self.queries, "{}", sample.text()).map_err(StreamError::on(Stream::Queries))?;
        self.written += 1;
        Ok(())
    }

    /// Number of samples written so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Flushes both sinks, paths first.
    ///
    /// # Errors
    /// Returns a [`StreamError`] naming the first sink that failed to flush.
    pub fn flush(&mut self) -> Result<(), StreamError> {
        self.paths.flush().map_err(StreamError::on(Stream::Paths))?;
        self.queries.flush().map_err(StreamError::on(Stream::Queries))
    }

    /// Flushes and returns the sinks.
    ///
    /// # Errors
    /// Returns a [`StreamError`] naming the first sink that failed to flush.
    pub fn finish(mut self) -> Result<(P, T), StreamError> {
        self.flush()?;
        Ok((self.paths, self.queries))
    }
}
