//! Reader tests: walk in-memory containers and check extractions and errors.

mod common;

use bfb::{unpack, BfbError, BfbReader};
use common::{container, header, push_record};

/// One 16-byte header, 5 payload bytes, 3 bytes of padding.
#[test]
fn reader_single_two_word_record() {
    let mut buf = header(2, 1, 5);
    buf.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD, 0xEE]);
    buf.extend_from_slice(&[0, 0, 0]);
    assert_eq!(buf.len(), 24);

    let mut reader = BfbReader::new(&buf);
    let x = reader.next().unwrap().unwrap();
    assert_eq!(x.name, "bl2");
    assert_eq!(x.payload, &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE]);
    assert_eq!(x.offset, 0);
    assert_eq!(x.payload_offset(), 16);
    assert_eq!(reader.offset(), 24);
    assert!(reader.next().is_none());
}

/// Records come back in container order with the right names and bytes.
#[test]
fn reader_enumerates_records_in_order() {
    let buf = container(&[
        (1, b"bl2 stage"),
        (3, b"bl31"),
        (13, b""),
        (56, b"device tree blob"),
        (63, b"initramfs!"),
    ]);

    let images = unpack(&buf).unwrap();
    let names: Vec<&str> = images.iter().map(|x| x.name).collect();
    assert_eq!(names, ["bl2", "bl31", "bl31-cert", "boot-dtb", "initramfs"]);
    assert_eq!(images[0].payload, b"bl2 stage");
    assert_eq!(images[1].payload, b"bl31");
    assert!(images[2].payload.is_empty());
    assert_eq!(images[3].payload, b"device tree blob");
    assert_eq!(images[4].payload, b"initramfs!");
    for (i, x) in images.iter().enumerate() {
        assert_eq!(x.index, i);
        assert_eq!(x.offset % 8, 0);
    }
}

/// The cursor is 8-aligned after every record, whatever the payload length.
#[test]
fn reader_offset_stays_aligned() {
    for len in 0..1000usize {
        let payload = vec![0x5a; len];
        let mut buf = container(&[(5, &payload)]);
        push_record(&mut buf, 4, b"x");

        let mut reader = BfbReader::new(&buf);
        let first = reader.next().unwrap().unwrap();
        assert_eq!(first.payload.len(), len);
        assert_eq!(reader.offset() % 8, 0, "payload length {len}");
        assert_eq!(reader.offset(), 24 + len + bfb::padding_for(len));
        assert_eq!(reader.next().unwrap().unwrap().name, "bl32");
        assert!(reader.next().is_none());
    }
}

#[test]
fn reader_empty_container() {
    assert!(unpack(&[]).unwrap().is_empty());
    assert!(BfbReader::new(&[]).next().is_none());
}

/// Invalid magic → error naming the offset, no extractions.
#[test]
fn reader_invalid_magic() {
    let mut buf = container(&[(1, b"abc")]);
    buf[0] = b'X';

    let mut reader = BfbReader::new(&buf);
    match reader.next() {
        Some(Err(BfbError::InvalidMagic { offset: 0, .. })) => {}
        other => panic!("expected invalid magic, got {other:?}"),
    }
    assert!(reader.next().is_none());

    let msg = unpack(&buf).unwrap_err().to_string();
    assert!(msg.contains("magic") && msg.contains("offset 0"), "{msg}");
}

/// A corrupt second header is reported at its own offset.
#[test]
fn reader_invalid_magic_in_second_record() {
    let mut buf = container(&[(1, b"abc"), (2, b"def")]);
    buf[32] ^= 0xff;
    match unpack(&buf) {
        Err(BfbError::InvalidMagic { offset: 32, .. }) => {}
        other => panic!("expected invalid magic at 32, got {other:?}"),
    }
}

/// Unknown image id → error naming the id; the walk is all-or-nothing.
#[test]
fn reader_unknown_image_id() {
    let mut buf = container(&[(1, b"first")]);
    let bad_at = buf.len();
    buf.extend_from_slice(&header(3, 200, 0));

    match unpack(&buf) {
        Err(BfbError::UnknownImageType { offset, image_id: 200 }) => assert_eq!(offset, bad_at),
        other => panic!("expected unknown image id, got {other:?}"),
    }

    let mut reader = BfbReader::new(&buf);
    assert_eq!(reader.next().unwrap().unwrap().name, "bl2");
    assert!(reader.next().unwrap().is_err());
    assert!(reader.next().is_none());
}

/// Header length below two words is rejected rather than looping forever.
#[test]
fn reader_bad_header_length() {
    for units in [0u8, 1] {
        let mut buf = header(2, 1, 0);
        let word = u32::from_le_bytes(buf[4..8].try_into().unwrap());
        let word = (word & !(0xf << 20)) | (u32::from(units) << 20);
        buf[4..8].copy_from_slice(&word.to_le_bytes());

        match unpack(&buf) {
            Err(BfbError::BadHeaderLength { offset: 0, units: u }) => assert_eq!(u, units),
            other => panic!("expected bad header length, got {other:?}"),
        }
    }
}

/// Fewer bytes than a header at the cursor → truncation error.
#[test]
fn reader_truncated_header() {
    let buf = container(&[(1, b"abc")]);
    let mut short = buf.clone();
    short.extend_from_slice(&header(3, 2, 0)[..8]);

    match unpack(&short) {
        Err(BfbError::Truncated { offset, needed: 16, available: 8 }) => assert_eq!(offset, buf.len()),
        other => panic!("expected truncated header, got {other:?}"),
    }
}

/// Declared header longer than what is left in the buffer.
#[test]
fn reader_truncated_long_header() {
    let mut buf = header(3, 1, 0);
    let word = u32::from_le_bytes(buf[4..8].try_into().unwrap()) | (0xf << 20);
    buf[4..8].copy_from_slice(&word.to_le_bytes());

    match unpack(&buf) {
        Err(BfbError::Truncated { offset: 0, needed: 120, available: 24 }) => {}
        other => panic!("expected truncated header, got {other:?}"),
    }
}

/// Payload length past the end of the buffer.
#[test]
fn reader_truncated_payload() {
    let mut buf = header(3, 5, 100);
    buf.extend_from_slice(&[0u8; 40]);

    match unpack(&buf) {
        Err(BfbError::Truncated { offset: 24, needed: 100, available: 40 }) => {}
        other => panic!("expected truncated payload, got {other:?}"),
    }
}

/// A huge image_len must not overflow offset arithmetic.
#[test]
fn reader_huge_payload_length() {
    let buf = header(3, 5, u32::MAX);
    assert!(matches!(unpack(&buf), Err(BfbError::Truncated { offset: 24, .. })));
}

/// Missing padding after the last payload is tolerated.
#[test]
fn reader_last_record_without_padding() {
    let mut buf = header(3, 62, 3);
    buf.extend_from_slice(b"abc");

    let images = unpack(&buf).unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].name, "image");
    assert_eq!(images[0].payload, b"abc");
}
