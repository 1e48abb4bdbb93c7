#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for x in bfb::BfbReader::new(data) {
        match x {
            Ok(x) => {
                assert_eq!(x.offset % bfb::BFB_ALIGN, 0);
                assert!(x.payload_offset() + x.payload.len() <= data.len());
            }
            Err(_) => break,
        }
    }
    let _ = bfb::describe(data);
});
