//! BFB reader: walk a container buffer and yield one extraction per sub-image.
//!
//! The buffer is borrowed for the whole walk and never copied; payloads are
//! slices into it. Any malformed record ends the walk with an error.

use std::path::PathBuf;

use log::{debug, trace};
use thiserror::Error;

use crate::format::{align_up, BfbHeader, BFB_HEADER_MIN_LEN};
use crate::registry;

/// Errors produced while reading or unpacking a BFB container.
#[derive(Debug, Error)]
pub enum BfbError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("magic error at offset {offset}: found {found:#010x}")]
    InvalidMagic { offset: usize, found: u32 },
    #[error("bad header length at offset {offset}: {units} units")]
    BadHeaderLength { offset: usize, units: u8 },
    #[error("unknown image id {image_id} at offset {offset}")]
    UnknownImageType { offset: usize, image_id: u32 },
    #[error("truncated container at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

impl BfbError {
    /// Shift a header-relative offset to a container offset.
    fn rebase(self, base: usize) -> Self {
        match self {
            BfbError::InvalidMagic { offset, found } => BfbError::InvalidMagic {
                offset: offset + base,
                found,
            },
            BfbError::BadHeaderLength { offset, units } => BfbError::BadHeaderLength {
                offset: offset + base,
                units,
            },
            BfbError::Truncated {
                offset,
                needed,
                available,
            } => BfbError::Truncated {
                offset: offset + base,
                needed,
                available,
            },
            other => other,
        }
    }
}

/// One sub-image found in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<'a> {
    /// Position in walk order, starting at 0.
    pub index: usize,
    /// Container offset of the header.
    pub offset: usize,
    pub header: BfbHeader,
    /// Registry name of the image.
    pub name: &'static str,
    /// Payload bytes, borrowed from the container.
    pub payload: &'a [u8],
}

impl Extraction<'_> {
    /// Container offset of the first payload byte.
    #[must_use]
    pub fn payload_offset(&self) -> usize {
        self.offset + self.header.header_bytes()
    }
}

/// Single-pass cursor over a BFB container.
///
/// Yields `Ok` extractions in container order. After the first `Err` the
/// iterator is exhausted.
#[derive(Debug, Clone)]
pub struct BfbReader<'a> {
    buf: &'a [u8],
    offset: usize,
    index: usize,
    failed: bool,
}

impl<'a> BfbReader<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        BfbReader {
            buf,
            offset: 0,
            index: 0,
            failed: false,
        }
    }

    /// Current cursor. 8-byte aligned between records.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn next_record(&mut self) -> Result<Extraction<'a>, BfbError> {
        let start = self.offset;
        let len = self.buf.len();
        let rest = &self.buf[start..];

        if rest.len() < BFB_HEADER_MIN_LEN {
            return Err(BfbError::Truncated {
                offset: start,
                needed: BFB_HEADER_MIN_LEN,
                available: rest.len(),
            });
        }
        let header = BfbHeader::parse(rest).map_err(|e| e.rebase(start))?;

        let header_bytes = header.header_bytes();
        if header_bytes > rest.len() {
            return Err(BfbError::Truncated {
                offset: start,
                needed: header_bytes,
                available: rest.len(),
            });
        }
        let payload_start = start + header_bytes;

        let image_id = u32::from(header.image_id);
        let name = registry::image_name(image_id)
            .ok_or(BfbError::UnknownImageType { offset: start, image_id })?;

        let payload_len = header.payload_len();
        let payload_end = payload_start
            .checked_add(payload_len)
            .filter(|end| *end <= len)
            .ok_or(BfbError::Truncated {
                offset: payload_start,
                needed: payload_len,
                available: len - payload_start,
            })?;

        // Padding may run past the end of the last record; the walk then stops.
        self.offset = align_up(payload_end).unwrap_or(usize::MAX);
        trace!("record {} ends at {:#x}, next header at {:#x}", self.index, payload_end, self.offset);

        let extraction = Extraction {
            index: self.index,
            offset: start,
            header,
            name,
            payload: &self.buf[payload_start..payload_end],
        };
        self.index += 1;
        Ok(extraction)
    }
}

impl<'a> Iterator for BfbReader<'a> {
    type Item = Result<Extraction<'a>, BfbError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.buf.len() {
            return None;
        }
        let result = self.next_record();
        match &result {
            Ok(x) => debug!(
                "image {} (id {}) at {:#x}: {} bytes",
                x.name, x.header.image_id, x.offset, x.payload.len()
            ),
            Err(_) => self.failed = true,
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for BfbReader<'_> {}

/// Walk the whole container. Returns every extraction or the first error.
pub fn unpack(buf: &[u8]) -> Result<Vec<Extraction<'_>>, BfbError> {
    BfbReader::new(buf).collect()
}
