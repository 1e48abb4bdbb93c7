//! Describe the images in a container without writing anything.

use sha2::{Digest, Sha256};

use crate::reader::{BfbReader, BfbError, Extraction};

/// Summary of one sub-image, as printed by `bfb-unpack list`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImageInfo {
    pub index: usize,
    /// Container offset of the header.
    pub offset: usize,
    pub image_id: u8,
    pub name: String,
    /// Header length in bytes.
    pub header_len: usize,
    pub image_len: u32,
    pub image_crc: u32,
    pub major: u8,
    pub minor: u8,
    /// Lowercase hex SHA-256 of the payload.
    pub sha256: String,
}

impl From<&Extraction<'_>> for ImageInfo {
    fn from(x: &Extraction<'_>) -> Self {
        ImageInfo {
            index: x.index,
            offset: x.offset,
            image_id: x.header.image_id,
            name: x.name.to_string(),
            header_len: x.header.header_bytes(),
            image_len: x.header.image_len,
            image_crc: x.header.image_crc,
            major: x.header.major,
            minor: x.header.minor,
            sha256: sha256_hex(x.payload),
        }
    }
}

/// Describe every image in the container, or fail on the first bad record.
pub fn describe(buf: &[u8]) -> Result<Vec<ImageInfo>, BfbError> {
    BfbReader::new(buf)
        .map(|x| x.map(|x| ImageInfo::from(&x)))
        .collect()
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
