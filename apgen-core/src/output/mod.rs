//! Where generated files go.
//!
//! A run writes everything through one [`OutputSink`]. Nothing is durable
//! until [`OutputSink::finalize`] returns `Ok`. A file that fails on its own
//! comes back as a [`FailedWrite`] and does not stop the others.

mod archive;
mod folder;

use chrono::{DateTime, Datelike, Local, Timelike};
use serde::Serialize;
use serde_json::ser::{CompactFormatter, PrettyFormatter};
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::Result;

pub use archive::{ZipEntry, ZipSink, ARCHIVE_COMMENT};
pub use folder::FolderSink;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JsonStyle {
    /// Tab-indented, for documents people read.
    Pretty,
    Compact,
}

pub fn json_to_string(value: &Value, style: JsonStyle) -> Result<String> {
    let mut buf = Vec::new();
    match style {
        JsonStyle::Pretty => {
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
            value.serialize(&mut ser)?;
        }
        JsonStyle::Compact => {
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, CompactFormatter);
            value.serialize(&mut ser)?;
        }
    }
    // serde_json only ever writes UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// One queued file that `finalize` could not write.
#[derive(Debug, Error)]
#[error("couldn't write {}: {source}", .path.display())]
pub struct FailedWrite {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

pub trait OutputSink {
    /// Queues a generated text file.
    fn add_text(&mut self, path: &str, content: &str) -> Result<()>;

    /// Queues a copy of an existing file.
    fn add_file(&mut self, dest: &str, source: &Path) -> Result<()>;

    fn add_json(&mut self, path: &str, value: &Value, style: JsonStyle) -> Result<()> {
        let text = json_to_string(value, style)?;
        self.add_text(path, &text)
    }

    /// Makes every queued write durable.
    ///
    /// `Err` means the target itself is unusable. Files that failed
    /// individually are returned and everything else was still written.
    fn finalize(&mut self) -> Result<Vec<FailedWrite>>;

    /// Human-readable destination, for messages.
    fn output_label(&self) -> String;

    /// Whether the manifest should carry the archive version fields.
    fn includes_manifest_version(&self) -> bool;
}

/// MS-DOS `(time, date)` words: 2-second resolution, years from 1980.
pub fn dos_datetime(when: DateTime<Local>) -> (u16, u16) {
    let year = when.year().clamp(1980, 2107) as u32;
    let date = ((year - 1980) << 9) | (when.month() << 5) | when.day();
    let time = (when.hour() << 11) | (when.minute() << 5) | (when.second() / 2);
    (time as u16, date as u16)
}
