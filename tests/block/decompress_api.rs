// Unit tests for block/decompress_api.rs: the three output modes and the
// status-code wrapper.

use lzo1x::block::{
    compress, decompress, decompress_into, decompress_with_limit, decompress_with_status,
    LzoError, LZO_E_INPUT_OVERRUN, LZO_E_LOOKBEHIND_OVERRUN, LZO_E_OK,
};

fn sample(len: usize) -> Vec<u8> {
    b"the quick brown fox jumps over the lazy dog; "
        .iter()
        .cycle()
        .take(len)
        .copied()
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// decompress
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn decompress_roundtrip() {
    let src = sample(10_000);
    assert_eq!(decompress(&compress(&src)).unwrap(), src);
}

#[test]
fn decompress_output_larger_than_initial_capacity() {
    // 100 KiB of one byte compresses to a few hundred bytes, so the output
    // buffer must grow many times past its first 4 KiB.
    let src = vec![0x5Au8; 100 * 1024];
    let packed = compress(&src);
    assert!(packed.len() < 4096);
    assert_eq!(decompress(&packed).unwrap(), src);
}

#[test]
fn decompress_empty_source_fails() {
    assert_eq!(decompress(&[]), Err(LzoError::InputOverrun));
}

#[test]
fn decompress_every_truncation_fails() {
    let packed = compress(&sample(500));
    for cut in 0..packed.len() {
        assert_eq!(
            decompress(&packed[..cut]),
            Err(LzoError::InputOverrun),
            "cut at {cut}"
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// decompress_with_limit
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn limit_equal_to_size_succeeds() {
    let src = sample(3000);
    let packed = compress(&src);
    assert_eq!(decompress_with_limit(&packed, src.len()).unwrap(), src);
}

#[test]
fn limit_one_short_is_output_overrun() {
    let src = sample(3000);
    let packed = compress(&src);
    assert_eq!(
        decompress_with_limit(&packed, src.len() - 1),
        Err(LzoError::OutputOverrun)
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// decompress_into
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn into_exact_capacity() {
    let src = sample(777);
    let packed = compress(&src);
    let mut dst = vec![0u8; src.len()];
    assert_eq!(decompress_into(&packed, &mut dst), Ok(src.len()));
    assert_eq!(dst, src);
}

#[test]
fn into_larger_capacity_reports_written_length() {
    let src = sample(100);
    let packed = compress(&src);
    let mut dst = vec![0xFFu8; 4096];
    let n = decompress_into(&packed, &mut dst).unwrap();
    assert_eq!(&dst[..n], &src[..]);
    assert!(dst[n..].iter().all(|&b| b == 0xFF));
}

#[test]
fn into_small_capacity_is_output_overrun() {
    let packed = compress(&[7u8; 1000]);
    let mut dst = [0u8; 10];
    assert_eq!(decompress_into(&packed, &mut dst), Err(LzoError::OutputOverrun));
}

// ─────────────────────────────────────────────────────────────────────────────
// decompress_with_status
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn status_ok() {
    let (out, status) = decompress_with_status(&compress(b"status"));
    assert_eq!(status, LZO_E_OK);
    assert_eq!(out, b"status");
}

#[test]
fn status_input_overrun() {
    let (out, status) = decompress_with_status(&[21, b'a']);
    assert_eq!(status, LZO_E_INPUT_OVERRUN);
    assert!(out.is_empty());
}

#[test]
fn status_lookbehind_overrun() {
    let (_, status) = decompress_with_status(&[18, b'x', 40, 4, 0, 17, 0, 0]);
    assert_eq!(status, LZO_E_LOOKBEHIND_OVERRUN);
}

// ─────────────────────────────────────────────────────────────────────────────
// Concurrency
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn concurrent_calls_are_independent() {
    let inputs: Vec<Vec<u8>> = (1..=8).map(|i| sample(i * 5000 + i)).collect();
    std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|src| s.spawn(move || decompress(&compress(src)).unwrap()))
            .collect();
        for (h, src) in handles.into_iter().zip(&inputs) {
            assert_eq!(&h.join().unwrap(), src);
        }
    });
}
