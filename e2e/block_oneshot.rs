//! E2E Test Suite 01: Block One-Shot API
//!
//! Drives the public block functions the way a library user would:
//! - compress / decompress round trips over assorted data shapes
//! - compress_into / decompress_into with caller-owned buffers
//! - decompress_with_limit with a known output size
//! - compress_bound as a sufficient destination size

extern crate lzo1x;

use lzo1x::{
    compress, compress_bound, compress_into, decompress, decompress_into, decompress_with_limit,
    LzoError,
};

fn lcg_bytes(len: usize, mut state: u32) -> Vec<u8> {
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: typical text
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_roundtrip_typical_text() {
    let original = b"The quick brown fox jumps over the lazy dog. ".repeat(20);
    let compressed = compress(&original);
    assert!(
        compressed.len() < original.len(),
        "compressed size {} should be less than original {}",
        compressed.len(),
        original.len()
    );
    assert_eq!(decompress(&compressed).unwrap(), original);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: data shapes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_roundtrip_data_shapes() {
    let shapes: Vec<(&str, Vec<u8>)> = vec![
        ("empty", Vec::new()),
        ("one byte", vec![0x42]),
        ("all zero 1 MiB", vec![0u8; 1 << 20]),
        ("random 256 KiB", lcg_bytes(256 * 1024, 1)),
        ("sawtooth", (0..300_000u32).map(|i| (i % 251) as u8).collect()),
        (
            "sparse",
            (0..100_000u32)
                .map(|i| if i % 1000 == 0 { (i / 1000) as u8 } else { 0 })
                .collect(),
        ),
    ];
    for (name, data) in shapes {
        let compressed = compress(&data);
        assert!(compressed.len() <= compress_bound(data.len()), "{name}");
        assert_eq!(decompress(&compressed).unwrap(), data, "{name}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: chunk boundaries
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_roundtrip_around_chunk_boundaries() {
    let base = lcg_bytes(7000, 9);
    for len in [49_151usize, 49_152, 49_153, 49_152 + 20, 49_152 + 21, 98_304 + 5] {
        let data: Vec<u8> = base.iter().cycle().take(len).copied().collect();
        assert_eq!(decompress(&compress(&data)).unwrap(), data, "len {len}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: caller-owned buffers
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_into_variants_roundtrip() {
    let original = lcg_bytes(5000, 3).repeat(4);
    let mut compressed = vec![0u8; compress_bound(original.len())];
    let n = compress_into(&original, &mut compressed).unwrap();

    let mut restored = vec![0u8; original.len()];
    let m = decompress_into(&compressed[..n], &mut restored).unwrap();
    assert_eq!(m, original.len());
    assert_eq!(restored, original);
}

#[test]
fn test_decompress_with_known_size() {
    let original = b"known size ".repeat(1000);
    let compressed = compress(&original);
    assert_eq!(
        decompress_with_limit(&compressed, original.len()).unwrap(),
        original
    );
    assert_eq!(
        decompress_with_limit(&compressed, 100),
        Err(LzoError::OutputOverrun)
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: stream embedded in a larger buffer
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_trailing_bytes_after_stream_are_ignored() {
    let original = b"embedded".repeat(50);
    let mut buf = compress(&original);
    buf.extend_from_slice(&lcg_bytes(100, 5));
    assert_eq!(decompress(&buf).unwrap(), original);
}
