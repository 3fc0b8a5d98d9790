//! E2E Test Suite: error handling on malformed and hostile input.
//!
//! Every malformed stream must produce an `LzoError` (or status code) and
//! never panic, whatever the output mode.

use lzo1x::{
    compress, decompress, decompress_into, decompress_with_limit, decompress_with_status,
    LzoError,
};
use lzo1x::block::{status_code, LZO_E_INPUT_OVERRUN, LZO_E_LOOKBEHIND_OVERRUN, LZO_E_OK};

fn lcg_bytes(len: usize, mut state: u32) -> Vec<u8> {
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect()
}

#[test]
fn test_truncated_streams_report_input_overrun() {
    let compressed = compress(&b"truncate me please ".repeat(100));
    for cut in [0, 1, compressed.len() / 2, compressed.len() - 1] {
        let r = decompress(&compressed[..cut]);
        assert_eq!(r, Err(LzoError::InputOverrun), "cut {cut}");
        assert_eq!(status_code(&r), LZO_E_INPUT_OVERRUN);
    }
}

#[test]
fn test_lookbehind_before_start() {
    let (out, status) = decompress_with_status(&[18, b'x', 40, 4, 0, 17, 0, 0]);
    assert!(out.is_empty());
    assert_eq!(status, LZO_E_LOOKBEHIND_OVERRUN);
}

#[test]
fn test_random_garbage_never_panics() {
    for seed in 0..200u32 {
        let garbage = lcg_bytes(1 + (seed as usize * 37) % 2000, seed);
        let _ = decompress_with_limit(&garbage, 1 << 20);
        let mut dst = vec![0u8; 1024];
        let _ = decompress_into(&garbage, &mut dst);
    }
}

#[test]
fn test_bit_flips_never_panic() {
    let original = b"flip some bits in the stream and watch it fail gracefully. ".repeat(40);
    let compressed = compress(&original);
    for i in 0..compressed.len() {
        for bit in [0x01u8, 0x10, 0x80] {
            let mut damaged = compressed.clone();
            damaged[i] ^= bit;
            if let Ok(out) = decompress_with_limit(&damaged, original.len() * 2) {
                assert!(out.len() <= original.len() * 2);
            }
        }
    }
}

#[test]
fn test_small_output_buffer_reports_overrun() {
    let compressed = compress(&[1u8; 10_000]);
    for cap in [0usize, 1, 100, 9_999] {
        let mut dst = vec![0u8; cap];
        assert_eq!(
            decompress_into(&compressed, &mut dst),
            Err(LzoError::OutputOverrun),
            "capacity {cap}"
        );
    }
}

#[test]
fn test_valid_stream_status_ok() {
    let (out, status) = decompress_with_status(&compress(b"ok"));
    assert_eq!(status, LZO_E_OK);
    assert_eq!(out, b"ok");
}
