//! Line-oriented JSONL reading.
//!
//! [`JsonlReader`] wraps any async reader, yields one logical line at a time
//! and tracks the 1-based number of the last physical line read so callers
//! can point at the exact place a record went wrong.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

const BYTE_ORDER_MARK: &[u8] = b"\xEF\xBB\xBF";

/// Async reader for JSONL (JSON Lines) data.
///
/// Blank lines (including lines holding only ASCII whitespace) are skipped but
/// still counted, so reported line numbers always match what an editor shows.
///
/// # Examples
///
/// ```no_run
/// use faultline_jsonl::JsonlReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("graph.jsonl").await?;
/// let mut reader = JsonlReader::new(file);
/// while let Some(value) = reader.read_value::<serde_json::Value>().await? {
///     println!("line {}: {value}", reader.line_number());
/// }
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    reader: BufReader<R>,
    /// 1-based number of the last line read; 0 before any read.
    line_number: usize,
    buffer: Vec<u8>,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given async reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buffer: Vec::new(),
        }
    }

    /// Returns the number of the last line read (0 before any read).
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next non-blank line, without its line terminator.
    ///
    /// Returns `Ok(None)` at end of input. A line that is not valid UTF-8 is
    /// consumed before the error is returned, so the next call moves on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUtf8`] naming the line when it cannot be
    /// decoded, or [`Error::Io`] if the underlying reader fails.
    pub async fn next_line(&mut self) -> Result<Option<&str>> {
        loop {
            self.buffer.clear();
            let read = self.reader.read_until(b'\n', &mut self.buffer).await?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            if self.line_number == 1 && self.buffer.starts_with(BYTE_ORDER_MARK) {
                self.buffer.drain(..BYTE_ORDER_MARK.len());
            }
            if self.buffer.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            let line_number = self.line_number;
            let line = std::str::from_utf8(&self.buffer)
                .map_err(|source| Error::InvalidUtf8 { line_number, source })?;
            return Ok(Some(line.trim_end_matches(['\n', '\r'])));
        }
    }

    /// Reads and deserializes the next record, failing on the first bad line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] naming the line number when a line
    /// cannot be deserialized into `T`, [`Error::InvalidUtf8`] when it cannot
    /// be decoded, or [`Error::Io`] on read failure.
    pub async fn read_value<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        let Some(line) = self.next_line().await? else {
            return Ok(None);
        };
        match serde_json::from_str(line) {
            Ok(value) => Ok(Some(value)),
            Err(e) => Err(Error::InvalidFormat(format!(
                "line {}: {e}",
                self.line_number
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
    }

    #[tokio::test]
    async fn new_reader_starts_at_line_zero() {
        let reader = JsonlReader::new(Cursor::new(b"".to_vec()));
        assert_eq!(reader.line_number(), 0);
    }

    #[tokio::test]
    async fn blank_lines_are_skipped_but_counted() {
        let data = "\n  \n{\"id\":1}\r\n\n{\"id\":2}";
        let mut reader = JsonlReader::new(Cursor::new(data.as_bytes().to_vec()));

        let first: Row = reader.read_value().await.unwrap().unwrap();
        assert_eq!(first, Row { id: 1 });
        assert_eq!(reader.line_number(), 3);

        let second: Row = reader.read_value().await.unwrap().unwrap();
        assert_eq!(second, Row { id: 2 });
        assert_eq!(reader.line_number(), 5);

        assert!(reader.read_value::<Row>().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn leading_byte_order_mark_is_ignored() {
        let data = "\u{feff}{\"id\":7}\n";
        let mut reader = JsonlReader::new(Cursor::new(data.as_bytes().to_vec()));
        let row: Row = reader.read_value().await.unwrap().unwrap();
        assert_eq!(row.id, 7);
    }

    #[tokio::test]
    async fn strict_read_reports_line_number() {
        let data = "{\"id\":1}\n{not json}\n";
        let mut reader = JsonlReader::new(Cursor::new(data.as_bytes().to_vec()));
        reader.read_value::<Row>().await.unwrap();

        let err = reader.read_value::<Row>().await.unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(ref msg) if msg.starts_with("line 2:")));
    }

    #[tokio::test]
    async fn undecodable_line_is_consumed_before_reporting() {
        let data = b"{\"id\":1}\n\xff\xfe\n{\"id\":3}\n".to_vec();
        let mut reader = JsonlReader::new(Cursor::new(data));
        reader.read_value::<Row>().await.unwrap();

        let err = reader.read_value::<Row>().await.unwrap_err();
        assert!(matches!(err, Error::InvalidUtf8 { line_number: 2, .. }));

        let row: Row = reader.read_value().await.unwrap().unwrap();
        assert_eq!(row, Row { id: 3 });
        assert_eq!(reader.line_number(), 3);
    }
}
