//! JSON-lines decoding for streamed run output.

use super::types::StreamRecord;
use crate::models::Description;
use crate::{Error, Result};
use bytes::Buf;
use futures_util::{Stream, StreamExt};
use std::io;
use tokio_util::codec::{FramedRead, LinesCodec};
use tokio_util::io::StreamReader;

/// Upper bound on a single record line.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Lazily split a byte stream into parsed records.
///
/// Blank lines are skipped and a trailing line without a newline still counts.
/// The stream is forward-only and ends with the body.
pub fn records<S, B, E>(body: S) -> impl Stream<Item = Result<StreamRecord>>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: Buf,
    E: Into<io::Error>,
{
    FramedRead::new(
        StreamReader::new(body),
        LinesCodec::new_with_max_length(MAX_LINE_BYTES),
    )
    .filter_map(|line| async move {
        match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(parse_record(&line)),
            Err(e) => Some(Err(Error::Generation(format!(
                "Failed to read description stream: {}",
                e
            )))),
        }
    })
}

fn parse_record(line: &str) -> Result<StreamRecord> {
    serde_json::from_str(line).map_err(|e| {
        tracing::error!("Malformed stream record: {}\nLine: {}", e, line);
        Error::Generation(format!("Malformed stream record: {}", e))
    })
}

/// Concatenate chunk fragments in arrival order.
///
/// A stream with no chunk text is a generation failure.
pub async fn collect_description<S>(records: S) -> Result<Description>
where
    S: Stream<Item = Result<StreamRecord>>,
{
    let mut records = std::pin::pin!(records);
    let mut text = String::new();
    let mut chunks = 0usize;
    let mut seen = 0usize;

    while let Some(record) = records.next().await {
        let record = record?;
        seen += 1;
        if let Some(fragment) = record.chunk_text()? {
            text.push_str(fragment);
            chunks += 1;
        }
    }

    tracing::debug!("Description stream ended: {} records, {} chunks", seen, chunks);
    Description::new(text)
}
