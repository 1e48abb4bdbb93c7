//! Helpers to build BFB containers in memory for tests.

#![allow(dead_code)]

use bfb::{padding_for, BFB_IMGHDR_MAGIC};

/// Header bytes for one record: version 1.0, `units` 8-byte words long.
pub fn header(units: u8, image_id: u8, image_len: u32) -> Vec<u8> {
    let word: u32 = 1 | (u32::from(units) << 20) | (u32::from(image_id) << 24);
    let mut out = Vec::new();
    out.extend_from_slice(&BFB_IMGHDR_MAGIC.to_le_bytes());
    out.extend_from_slice(&word.to_le_bytes());
    out.extend_from_slice(&image_len.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.resize(usize::from(units) * 8, 0);
    out
}

/// Append one record (three-word header, payload, padding) to `buf`.
pub fn push_record(buf: &mut Vec<u8>, image_id: u8, payload: &[u8]) {
    buf.extend_from_slice(&header(3, image_id, payload.len() as u32));
    buf.extend_from_slice(payload);
    buf.resize(buf.len() + padding_for(buf.len()), 0);
}

/// Container with one record per `(image_id, payload)` pair.
pub fn container(records: &[(u8, &[u8])]) -> Vec<u8> {
    let mut buf = Vec::new();
    for (id, payload) in records {
        push_record(&mut buf, *id, payload);
    }
    buf
}
