//! Resilient JSON Lines reading for faultline graph snapshots.
//!
//! Snapshot and intent files are JSONL: one JSON document per line. This
//! crate reads them line by line, tracking line numbers so that a damaged
//! record can be skipped and reported instead of aborting the whole load.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod reader;
pub mod resilient;
pub mod warning;

pub use error::{Error, Result};
pub use reader::JsonlReader;
pub use resilient::{read_jsonl_resilient, read_resilient};
pub use warning::Warning;
