//! E2E Test Suite: dictionary-file block decoding.
//!
//! Builds a small multi-block record section the way dictionary files lay it
//! out (blocks of mixed methods with known decompressed sizes), then decodes
//! it sequentially and in parallel.

use lzo1x::container::{adler32, BlockHeader, BlockRef, Decryptor};
use lzo1x::{decode_block, decode_blocks, encode_block, BlockMethod};

fn records(n: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..n {
        out.extend_from_slice(format!("word{i}\r\n<b>word{i}</b> meaning number {i}\0").as_bytes());
    }
    out
}

#[test]
fn test_record_section_sequential_and_parallel() {
    let methods = [BlockMethod::Lzo1x, BlockMethod::Deflate, BlockMethod::Stored];
    let plain: Vec<Vec<u8>> = (0..24).map(|i| records(50 + i * 13)).collect();
    let raws: Vec<Vec<u8>> = plain
        .iter()
        .enumerate()
        .map(|(i, p)| encode_block(p, methods[i % methods.len()]).unwrap())
        .collect();

    for (raw, p) in raws.iter().zip(&plain) {
        let decoded = decode_block(raw, Some(p.len()), None).unwrap();
        let (header, _) = BlockHeader::parse(raw).unwrap();
        assert!(header.verify(&decoded));
        assert_eq!(header.checksum_value(), adler32(p));
    }

    let refs: Vec<BlockRef<'_>> = raws
        .iter()
        .zip(&plain)
        .map(|(raw, p)| BlockRef { raw, expected_size: Some(p.len()) })
        .collect();
    assert_eq!(decode_blocks(&refs, 3, None).unwrap(), plain);
}

#[test]
fn test_encrypted_record_section() {
    // Simple keyed byte cipher standing in for the real one.
    fn cipher(data: &[u8], key: &[u8; 8]) -> Vec<u8> {
        let mut prev = 0x36u8;
        data.iter()
            .enumerate()
            .map(|(i, &b)| {
                let out = b ^ key[i % 8] ^ prev;
                prev = b;
                out
            })
            .collect()
    }
    fn decipher(data: &[u8], key: &[u8; 8]) -> Vec<u8> {
        let mut prev = 0x36u8;
        data.iter()
            .enumerate()
            .map(|(i, &b)| {
                let plain = b ^ key[i % 8] ^ prev;
                prev = plain;
                plain
            })
            .collect()
    }

    let plain = records(300);
    let mut raw = encode_block(&plain, BlockMethod::Lzo1x).unwrap();
    let (header, payload) = BlockHeader::parse(&raw).unwrap();
    let sealed = cipher(payload, &header.passkey());
    raw.truncate(8);
    raw.extend_from_slice(&sealed);

    let d: &dyn Decryptor = &decipher;
    assert_eq!(decode_block(&raw, Some(plain.len()), Some(d)).unwrap(), plain);
    assert!(decode_block(&raw, Some(plain.len()), None).is_err());
}
