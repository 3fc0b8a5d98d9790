#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let compressed = lzo1x::compress(data);
    assert!(compressed.len() <= lzo1x::compress_bound(data.len()));

    let recovered = lzo1x::decompress(&compressed).expect("valid stream must decode");
    assert_eq!(
        recovered,
        data,
        "block round-trip mismatch: {} compressed bytes",
        compressed.len()
    );

    // The exact-size caller buffer must also suffice.
    let mut dst = vec![0u8; data.len()];
    assert_eq!(lzo1x::decompress_into(&compressed, &mut dst), Ok(data.len()));
});
