#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes: errors are expected, panics are not.

    // Zero-length output buffer.
    let _ = lzo1x::decompress_into(data, &mut []);

    // 4 KiB output buffer.
    let mut dst = vec![0u8; 4096];
    let _ = lzo1x::decompress_into(data, &mut dst);

    // Growable output, capped so tiny inputs cannot claim huge output.
    let limit = data.len().saturating_mul(255).min(1 << 20);
    let _ = lzo1x::decompress_with_limit(data, limit);
});
