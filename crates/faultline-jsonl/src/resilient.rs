//! Resilient loading: keep every good record, report every bad line.

use crate::error::{Error, Result};
use crate::reader::JsonlReader;
use crate::warning::Warning;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncRead;

/// Reads every record from a JSONL file, skipping lines that fail to decode.
///
/// # Errors
///
/// Only I/O failures are errors. Malformed lines become [`Warning`]s.
///
/// # Examples
///
/// ```no_run
/// use faultline_jsonl::read_jsonl_resilient;
///
/// # async fn example() -> faultline_jsonl::Result<()> {
/// let (values, warnings) =
///     read_jsonl_resilient::<serde_json::Value, _>("graph.jsonl").await?;
/// for warning in &warnings {
///     eprintln!("{warning}");
/// }
/// println!("loaded {} records", values.len());
/// # Ok(())
/// # }
/// ```
pub async fn read_jsonl_resilient<T, P>(path: P) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "Reading JSONL file");
    let file = File::open(path).await?;
    read_resilient(file).await
}

/// Reads every record from an async reader, skipping lines that fail to decode.
///
/// Syntax errors and lines that are not valid UTF-8 produce
/// [`Warning::MalformedJson`]; well-formed JSON that does not match `T`
/// produces [`Warning::SkippedLine`].
///
/// # Errors
///
/// Returns an error only when the underlying reader fails.
pub async fn read_resilient<T, R>(reader: R) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    R: AsyncRead + Unpin,
{
    let mut reader = JsonlReader::new(reader);
    let mut values = Vec::new();
    let mut warnings = Vec::new();

    loop {
        let line = match reader.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(Error::InvalidUtf8 {
                line_number,
                source,
            }) => {
                let warning = Warning::MalformedJson {
                    line_number,
                    error: format!("invalid UTF-8: {source}"),
                };
                tracing::warn!("{warning}");
                warnings.push(warning);
                continue;
            }
            Err(e) => return Err(e),
        };
        match serde_json::from_str::<T>(line) {
            Ok(value) => values.push(value),
            Err(e) => {
                let line_number = reader.line_number();
                let warning = match e.classify() {
                    Category::Data => Warning::SkippedLine {
                        line_number,
                        reason: e.to_string(),
                    },
                    Category::Syntax | Category::Eof | Category::Io => Warning::MalformedJson {
                        line_number,
                        error: e.to_string(),
                    },
                };
                tracing::warn!("{warning}");
                warnings.push(warning);
            }
        }
    }

    tracing::debug!(
        records = values.len(),
        warnings = warnings.len(),
        "Finished resilient JSONL read"
    );
    Ok((values, warnings))
}
