//! A minimal ZIP writer. Every entry is deflated on its own; the archive
//! is assembled in memory and only hits the disk in `finalize`.

use chrono::{DateTime, Local};
use flate2::{write::DeflateEncoder, Compression, Crc};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{dos_datetime, FailedWrite, OutputSink};
use crate::{GenError, Result};

pub const ARCHIVE_COMMENT: &str = "apworld created with apgen";

const LOCAL_HEADER_SIG: u32 = 0x0403_4b50;
const CENTRAL_HEADER_SIG: u32 = 0x0201_4b50;
const END_OF_CENTRAL_SIG: u32 = 0x0605_4b50;

/// "2.0": deflate and directories.
const ZIP_VERSION: u16 = 20;
const METHOD_STORED: u16 = 0;
const METHOD_DEFLATED: u16 = 8;
/// General purpose bits 1-2 = 01: maximum compression.
const FLAG_DEFLATE_MAX: u16 = 0x0002;
const ATTR_TEXT: u16 = 0x0001;

#[derive(Clone, Debug)]
pub struct ZipEntry {
    pub path: String,
    pub data: Vec<u8>,
    pub is_text: bool,
    pub modified: DateTime<Local>,
}

/// Bytes of one entry as they will be laid out in the archive.
struct Packed {
    method: u16,
    crc: u32,
    uncompressed: u32,
    payload: Vec<u8>,
}

fn deflate(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

fn to_u32(n: usize, what: &str) -> io::Result<u32> {
    u32::try_from(n).map_err(|_| io::Error::new(io::ErrorKind::InvalidData, format!("{what} exceeds 4 GiB")))
}

fn to_u16(n: usize, what: &str) -> io::Result<u16> {
    u16::try_from(n).map_err(|_| io::Error::new(io::ErrorKind::InvalidData, format!("too many {what}")))
}

fn pack(entry: &ZipEntry) -> io::Result<Packed> {
    let mut crc = Crc::new();
    crc.update(&entry.data);
    let uncompressed = to_u32(entry.data.len(), &entry.path)?;

    let (method, payload) = match deflate(&entry.data) {
        Ok(compressed) => (METHOD_DEFLATED, compressed),
        Err(e) => {
            warn!("{}: compression failed, storing instead: {e}", entry.path);
            (METHOD_STORED, entry.data.clone())
        }
    };

    Ok(Packed {
        method,
        crc: crc.sum(),
        uncompressed,
        payload,
    })
}

/// Serializes `entries` into a complete archive image.
pub fn build_archive(entries: &[ZipEntry], comment: &str) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut central = Vec::new();

    for entry in entries {
        let packed = pack(entry)?;
        let offset = to_u32(out.len(), "archive")?;
        let (time, date) = dos_datetime(entry.modified);
        let name = entry.path.as_bytes();
        let name_len = to_u16(name.len(), "bytes in file name")?;
        let compressed = to_u32(packed.payload.len(), &entry.path)?;
        let flags = if packed.method == METHOD_DEFLATED { FLAG_DEFLATE_MAX } else { 0 };

        out.extend_from_slice(&LOCAL_HEADER_SIG.to_le_bytes());
        out.extend_from_slice(&ZIP_VERSION.to_le_bytes());
        out.extend_from_slice(&flags.to_le_bytes());
        out.extend_from_slice(&packed.method.to_le_bytes());
        out.extend_from_slice(&time.to_le_bytes());
        out.extend_from_slice(&date.to_le_bytes());
        out.extend_from_slice(&packed.crc.to_le_bytes());
        out.extend_from_slice(&compressed.to_le_bytes());
        out.extend_from_slice(&packed.uncompressed.to_le_bytes());
        out.extend_from_slice(&name_len.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // extra field length
        out.extend_from_slice(name);
        out.extend_from_slice(&packed.payload);

        central.extend_from_slice(&CENTRAL_HEADER_SIG.to_le_bytes());
        central.extend_from_slice(&ZIP_VERSION.to_le_bytes()); // made by
        central.extend_from_slice(&ZIP_VERSION.to_le_bytes()); // needed
        central.extend_from_slice(&flags.to_le_bytes());
        central.extend_from_slice(&packed.method.to_le_bytes());
        central.extend_from_slice(&time.to_le_bytes());
        central.extend_from_slice(&date.to_le_bytes());
        central.extend_from_slice(&packed.crc.to_le_bytes());
        central.extend_from_slice(&compressed.to_le_bytes());
        central.extend_from_slice(&packed.uncompressed.to_le_bytes());
        central.extend_from_slice(&name_len.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes()); // extra
        central.extend_from_slice(&0u16.to_le_bytes()); // comment
        central.extend_from_slice(&0u16.to_le_bytes()); // disk number
        let internal = if entry.is_text { ATTR_TEXT } else { 0 };
        central.extend_from_slice(&internal.to_le_bytes());
        central.extend_from_slice(&0u32.to_le_bytes()); // external attributes
        central.extend_from_slice(&offset.to_le_bytes());
        central.extend_from_slice(name);
    }

    let count = to_u16(entries.len(), "entries")?;
    let central_offset = to_u32(out.len(), "archive")?;
    let central_size = to_u32(central.len(), "central directory")?;
    let comment = comment.as_bytes();
    out.extend_from_slice(&central);

    out.extend_from_slice(&END_OF_CENTRAL_SIG.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // this disk
    out.extend_from_slice(&0u16.to_le_bytes()); // disk with central directory
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&central_size.to_le_bytes());
    out.extend_from_slice(&central_offset.to_le_bytes());
    out.extend_from_slice(&to_u16(comment.len(), "comment bytes")?.to_le_bytes());
    out.extend_from_slice(comment);

    Ok(out)
}

/// Collects entries in memory and writes a single `.apworld` archive.
pub struct ZipSink {
    path: PathBuf,
    entries: Vec<ZipEntry>,
}

impl ZipSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[ZipEntry] {
        &self.entries
    }

    fn write_out(&self) -> io::Result<()> {
        let image = build_archive(&self.entries, ARCHIVE_COMMENT)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, &image)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        debug!("wrote {} bytes to {}", image.len(), self.path.display());
        Ok(())
    }
}

impl OutputSink for ZipSink {
    fn add_text(&mut self, path: &str, content: &str) -> Result<()> {
        self.entries.push(ZipEntry {
            path: path.to_string(),
            data: content.as_bytes().to_vec(),
            is_text: true,
            modified: Local::now(),
        });
        Ok(())
    }

    fn add_file(&mut self, dest: &str, source: &Path) -> Result<()> {
        let data = fs::read(source)?;
        let modified = fs::metadata(source)?
            .modified()
            .map(DateTime::<Local>::from)
            .unwrap_or_else(|_| Local::now());
        self.entries.push(ZipEntry {
            path: dest.to_string(),
            data,
            is_text: false,
            modified,
        });
        Ok(())
    }

    fn finalize(&mut self) -> Result<Vec<FailedWrite>> {
        self.write_out().map_err(|source| GenError::Finalize {
            label: self.output_label(),
            source,
        })?;
        self.entries.clear();
        Ok(Vec::new())
    }

    fn output_label(&self) -> String {
        self.path.display().to_string()
    }

    fn includes_manifest_version(&self) -> bool {
        true
    }
}
