// Unit tests for block/buffer.rs: growable and fixed output sinks.

use lzo1x::block::buffer::{copy_within_overlapping, FixedBuffer, GrowableBuffer, OutputSink};
use lzo1x::block::LzoError;
use lzo1x::config::DEFAULT_GROWTH_BLOCK_SIZE;

// ─────────────────────────────────────────────────────────────────────────────
// GrowableBuffer
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn for_input_starts_at_rounded_source_length() {
    assert_eq!(GrowableBuffer::for_input(10).capacity(), 4096);
    assert_eq!(GrowableBuffer::for_input(4096).capacity(), 8192);
}

#[test]
fn growth_preserves_written_bytes() {
    let mut out = GrowableBuffer::for_input(0);
    let first: Vec<u8> = (0..=255u8).cycle().take(4000).collect();
    out.put_literals(&first).unwrap();
    out.put_match(4000, 4000).unwrap();
    assert_eq!(out.capacity(), 8192);
    let bytes = out.finalize();
    assert_eq!(bytes.len(), 8000);
    assert_eq!(&bytes[..4000], &first[..]);
    assert_eq!(&bytes[4000..], &first[..]);
}

#[test]
fn grows_by_configured_step() {
    let mut out = GrowableBuffer::for_input(0);
    let start = out.capacity();
    out.ensure_capacity(start + 1).unwrap();
    assert_eq!(out.capacity(), start + DEFAULT_GROWTH_BLOCK_SIZE);
    out.ensure_capacity(start + 2 * DEFAULT_GROWTH_BLOCK_SIZE + 1).unwrap();
    assert_eq!(out.capacity(), start + 3 * DEFAULT_GROWTH_BLOCK_SIZE);
}

#[test]
fn limit_caps_growth() {
    let mut out = GrowableBuffer::for_input(0).with_limit(5);
    out.put_literals(b"abc").unwrap();
    assert_eq!(out.put_match(1, 3), Err(LzoError::OutputOverrun));
    out.put_match(1, 2).unwrap();
    assert_eq!(out.as_slice(), b"abccc");
}

#[test]
fn match_before_start_is_lookbehind_overrun() {
    let mut out = GrowableBuffer::for_input(0);
    assert_eq!(out.put_match(1, 4), Err(LzoError::LookbehindOverrun));
    out.put_literals(b"xy").unwrap();
    assert_eq!(out.put_match(3, 1), Err(LzoError::LookbehindOverrun));
    assert_eq!(out.put_match(0, 1), Err(LzoError::LookbehindOverrun));
    assert_eq!(out.position(), 2);
}

// ─────────────────────────────────────────────────────────────────────────────
// FixedBuffer
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn fixed_buffer_fills_exactly() {
    let mut raw = [0u8; 6];
    let mut out: FixedBuffer = (&mut raw[..]).into();
    out.put_literals(b"ab").unwrap();
    out.put_match(2, 4).unwrap();
    assert_eq!(out.position(), 6);
    assert_eq!(out.as_slice(), b"ababab");
    assert_eq!(out.put_literals(b"c"), Err(LzoError::OutputOverrun));
}

#[test]
fn fixed_buffer_empty_slice() {
    let mut raw: [u8; 0] = [];
    let mut out: FixedBuffer = (&mut raw[..]).into();
    assert_eq!(out.ensure_capacity(0), Ok(()));
    assert_eq!(out.put_literals(b"a"), Err(LzoError::OutputOverrun));
}

// ─────────────────────────────────────────────────────────────────────────────
// Overlapping copy
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn distance_one_replicates_last_byte() {
    let mut buf = vec![0u8; 11];
    buf[0] = b'z';
    copy_within_overlapping(&mut buf, 1, 1, 10);
    assert_eq!(buf, vec![b'z'; 11]);
}

#[test]
fn short_distance_repeats_pattern() {
    let mut buf = vec![0u8; 10];
    buf[..3].copy_from_slice(b"abc");
    copy_within_overlapping(&mut buf, 3, 3, 7);
    assert_eq!(&buf, b"abcabcabca");
}
