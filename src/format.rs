//! BFB binary format types and constants.
//!
//! Defines the sub-image header layout and the alignment rules of a BFB
//! (BlueField boot stream) container. All multi-byte fields are little-endian.

use crate::reader::BfbError;

/// Magic value at the start of every sub-image header: "Bf\x02\x13".
pub const BFB_IMGHDR_MAGIC: u32 = 0x1302_6642;

/// Header lengths are stored in units of this many bytes; records are padded to it.
pub const BFB_ALIGN: usize = 8;

/// Bytes needed to decode magic, packed word, image length and CRC.
pub const BFB_HEADER_MIN_LEN: usize = 16;

/// Header length written by the firmware build tools (three words).
pub const BFB_HEADER_LEN: usize = 24;

/// Number of padding bytes needed after `offset` to reach the next 8-byte boundary.
#[must_use]
pub const fn padding_for(offset: usize) -> usize {
    (BFB_ALIGN - offset % BFB_ALIGN) % BFB_ALIGN
}

/// Round `offset` up to the next 8-byte boundary, or `None` on overflow.
#[must_use]
pub fn align_up(offset: usize) -> Option<usize> {
    offset.checked_add(padding_for(offset))
}

/// Decoded sub-image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BfbHeader {
    /// Sentinel; equals [`BFB_IMGHDR_MAGIC`] for every header returned by [`BfbHeader::parse`].
    pub magic: u32,
    /// Header format major version.
    pub major: u8,
    /// Header format minor version.
    pub minor: u8,
    pub next_img_ver: u8,
    pub cur_img_ver: u8,
    /// Header length in 8-byte units.
    pub hdr_len: u8,
    /// Image type identifier (see `registry`).
    pub image_id: u8,
    /// Payload length in bytes, not counting padding.
    pub image_len: u32,
    /// CRC as written by the producer. Carried for display only.
    pub image_crc: u32,
    /// Bitmap of images following this one; absent in two-word headers.
    pub following_images: Option<u64>,
}

impl BfbHeader {
    /// Decode a header from the start of `bytes`.
    ///
    /// Checks the magic and the declared header length, but not that the
    /// declared header or payload fit in `bytes`; the walker does that
    /// against the whole container. Offsets in errors are relative to `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, BfbError> {
        if bytes.len() < BFB_HEADER_MIN_LEN {
            return Err(BfbError::Truncated {
                offset: 0,
                needed: BFB_HEADER_MIN_LEN,
                available: bytes.len(),
            });
        }

        let magic = read_u32(bytes, 0);
        if magic != BFB_IMGHDR_MAGIC {
            return Err(BfbError::InvalidMagic { offset: 0, found: magic });
        }

        let word = read_u32(bytes, 4);
        let nibble = |shift: u32| ((word >> shift) & 0xf) as u8;
        let hdr_len = nibble(20);
        if usize::from(hdr_len) * BFB_ALIGN < BFB_HEADER_MIN_LEN {
            return Err(BfbError::BadHeaderLength { offset: 0, units: hdr_len });
        }

        let following_images = if usize::from(hdr_len) * BFB_ALIGN >= BFB_HEADER_LEN
            && bytes.len() >= BFB_HEADER_LEN
        {
            Some(read_u64(bytes, 16))
        } else {
            None
        };

        Ok(BfbHeader {
            magic,
            major: nibble(0),
            minor: nibble(4),
            next_img_ver: nibble(12),
            cur_img_ver: nibble(16),
            hdr_len,
            image_id: (word >> 24) as u8,
            image_len: read_u32(bytes, 8),
            image_crc: read_u32(bytes, 12),
            following_images,
        })
    }

    /// Header length in bytes (`hdr_len * 8`).
    #[must_use]
    pub fn header_bytes(&self) -> usize {
        usize::from(self.hdr_len) * BFB_ALIGN
    }

    /// Payload length in bytes.
    #[must_use]
    pub fn payload_len(&self) -> usize {
        self.image_len as usize
    }
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(buf)
}

fn read_u64(bytes: &[u8], at: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(buf)
}
