#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let expected = data.first().map(|&b| b as usize * 64);
    let _ = lzo1x::decode_block(data, expected, None);
});
