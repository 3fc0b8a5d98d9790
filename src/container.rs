//! Dictionary-file (MDict) block envelope.
//!
//! Every compressed block of a dictionary file starts with an 8-byte header:
//!
//! | Offset | Size | Field                                                |
//! |--------|------|------------------------------------------------------|
//! | 0      | 4    | method tag, little-endian (0 stored, 1 LZO1X, 2 zlib) |
//! | 4      | 4    | Adler-32 of the uncompressed data, big-endian        |
//! | 8      | ..   | payload                                              |
//!
//! Compressed payloads may additionally be encrypted. The key is built from
//! the 4 checksum bytes followed by `95 36 00 00`; the cipher itself is
//! supplied by the caller through [`Decryptor`].
//!
//! Blocks are independent, so [`decode_blocks`] decodes them in parallel.

use std::fmt;
use std::io::{self, Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use rayon::prelude::*;

use crate::block::{compress, decompress_with_limit, LzoError};
use crate::displaylevel;

/// Size of the method tag plus checksum.
pub const BLOCK_HEADER_SIZE: usize = 8;

/// Fixed second half of the decryption key.
pub const PASSKEY_SUFFIX: [u8; 4] = [0x95, 0x36, 0x00, 0x00];

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned while unpacking a block envelope.
#[derive(Debug)]
pub enum ContainerError {
    /// Fewer than [`BLOCK_HEADER_SIZE`] bytes.
    Truncated,
    /// Method tag other than 0, 1 or 2.
    UnknownMethod(u32),
    /// The LZO1X payload is malformed.
    Lzo(LzoError),
    /// The zlib payload is malformed, or compressing one failed.
    Deflate(io::Error),
    /// The payload decoded to a different length than the caller expected.
    SizeMismatch { expected: usize, actual: usize },
    /// The worker pool could not be created.
    ThreadPool(String),
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::Truncated => write!(f, "block shorter than its header"),
            ContainerError::UnknownMethod(tag) => write!(f, "unknown compression method {tag}"),
            ContainerError::Lzo(e) => write!(f, "lzo1x payload: {e}"),
            ContainerError::Deflate(e) => write!(f, "zlib payload: {e}"),
            ContainerError::SizeMismatch { expected, actual } => write!(
                f,
                "decoded {actual} bytes, expected {expected}"
            ),
            ContainerError::ThreadPool(msg) => write!(f, "worker pool: {msg}"),
        }
    }
}

impl std::error::Error for ContainerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContainerError::Lzo(e) => Some(e),
            ContainerError::Deflate(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LzoError> for ContainerError {
    fn from(e: LzoError) -> Self {
        ContainerError::Lzo(e)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Header
// ─────────────────────────────────────────────────────────────────────────────

/// Compression method of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMethod {
    Stored,
    Lzo1x,
    Deflate,
}

impl BlockMethod {
    pub fn from_tag(tag: u32) -> Result<Self, ContainerError> {
        match tag {
            0 => Ok(BlockMethod::Stored),
            1 => Ok(BlockMethod::Lzo1x),
            2 => Ok(BlockMethod::Deflate),
            other => Err(ContainerError::UnknownMethod(other)),
        }
    }

    pub fn tag(self) -> u32 {
        match self {
            BlockMethod::Stored => 0,
            BlockMethod::Lzo1x => 1,
            BlockMethod::Deflate => 2,
        }
    }
}

/// Parsed block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub method: BlockMethod,
    /// Raw checksum bytes as stored (big-endian Adler-32).
    pub checksum: [u8; 4],
}

impl BlockHeader {
    /// Split `raw` into its header and payload.
    pub fn parse(raw: &[u8]) -> Result<(Self, &[u8]), ContainerError> {
        if raw.len() < BLOCK_HEADER_SIZE {
            return Err(ContainerError::Truncated);
        }
        let tag = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
        let method = BlockMethod::from_tag(tag)?;
        let checksum = [raw[4], raw[5], raw[6], raw[7]];
        Ok((Self { method, checksum }, &raw[BLOCK_HEADER_SIZE..]))
    }

    pub fn checksum_value(&self) -> u32 {
        u32::from_be_bytes(self.checksum)
    }

    /// Decryption key for this block's payload.
    pub fn passkey(&self) -> [u8; 8] {
        passkey(self.checksum)
    }

    /// Whether `data` matches the stored checksum.
    pub fn verify(&self, data: &[u8]) -> bool {
        adler32(data) == self.checksum_value()
    }
}

/// Build the 8-byte decryption key: checksum bytes, then [`PASSKEY_SUFFIX`].
pub fn passkey(checksum: [u8; 4]) -> [u8; 8] {
    let mut key = [0u8; 8];
    key[..4].copy_from_slice(&checksum);
    key[4..].copy_from_slice(&PASSKEY_SUFFIX);
    key
}

/// Adler-32 of `data`, the checksum convention of dictionary blocks.
pub fn adler32(data: &[u8]) -> u32 {
    let mut hasher = simd_adler32::Adler32::new();
    hasher.write(data);
    hasher.finish()
}

// ─────────────────────────────────────────────────────────────────────────────
// Decryption hook
// ─────────────────────────────────────────────────────────────────────────────

/// Payload decryption applied before decompression.
///
/// Implemented for any `Fn(&[u8], &[u8; 8]) -> Vec<u8> + Sync` closure.
pub trait Decryptor: Sync {
    fn decrypt(&self, data: &[u8], key: &[u8; 8]) -> Vec<u8>;
}

impl<F> Decryptor for F
where
    F: Fn(&[u8], &[u8; 8]) -> Vec<u8> + Sync,
{
    fn decrypt(&self, data: &[u8], key: &[u8; 8]) -> Vec<u8> {
        self(data, key)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decode / encode
// ─────────────────────────────────────────────────────────────────────────────

fn check_size(expected: Option<usize>, actual: usize) -> Result<(), ContainerError> {
    match expected {
        Some(expected) if expected != actual => {
            Err(ContainerError::SizeMismatch { expected, actual })
        }
        _ => Ok(()),
    }
}

/// Upper bound on the DEFLATE expansion ratio.
const MAX_DEFLATE_RATIO: usize = 1032;

fn inflate(payload: &[u8], expected_size: Option<usize>) -> Result<Vec<u8>, ContainerError> {
    // The expected size comes from the file; never preallocate more than
    // DEFLATE can expand this payload to.
    let ceiling = payload.len().saturating_mul(MAX_DEFLATE_RATIO);
    let mut out = Vec::with_capacity(
        expected_size.map_or(payload.len().saturating_mul(4), |n| n.min(ceiling)),
    );
    let mut decoder = ZlibDecoder::new(payload);
    match expected_size {
        // One byte past the expectation is enough to detect an oversize payload.
        Some(n) => decoder
            .by_ref()
            .take((n as u64).saturating_add(1))
            .read_to_end(&mut out),
        None => decoder.read_to_end(&mut out),
    }
    .map_err(ContainerError::Deflate)?;
    Ok(out)
}

/// Unpack one block: parse the header, decrypt compressed payloads when a
/// decryptor is given, then decompress by method.
///
/// `expected_size`, when known, bounds decompression and is checked against
/// the decoded length. The checksum is not verified here; see
/// [`BlockHeader::verify`].
pub fn decode_block(
    raw: &[u8],
    expected_size: Option<usize>,
    decryptor: Option<&dyn Decryptor>,
) -> Result<Vec<u8>, ContainerError> {
    let (header, payload) = BlockHeader::parse(raw)?;

    let data = match header.method {
        BlockMethod::Stored => payload.to_vec(),
        method => {
            let decrypted;
            let payload = match decryptor {
                Some(d) => {
                    decrypted = d.decrypt(payload, &header.passkey());
                    &decrypted[..]
                }
                None => payload,
            };
            if method == BlockMethod::Lzo1x {
                match expected_size {
                    Some(n) => decompress_with_limit(payload, n)?,
                    None => crate::block::decompress(payload)?,
                }
            } else {
                inflate(payload, expected_size)?
            }
        }
    };

    check_size(expected_size, data.len())?;
    displaylevel!(
        4,
        "block: {:?}, {} -> {} bytes\n",
        header.method,
        raw.len(),
        data.len()
    );
    Ok(data)
}

/// Pack `data` into a block envelope with the given method. The checksum is
/// the Adler-32 of `data`; no encryption is applied.
pub fn encode_block(data: &[u8], method: BlockMethod) -> Result<Vec<u8>, ContainerError> {
    let payload = match method {
        BlockMethod::Stored => data.to_vec(),
        BlockMethod::Lzo1x => compress(data),
        BlockMethod::Deflate => {
            let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
            enc.write_all(data).map_err(ContainerError::Deflate)?;
            enc.finish().map_err(ContainerError::Deflate)?
        }
    };

    let mut out = Vec::with_capacity(BLOCK_HEADER_SIZE + payload.len());
    out.extend_from_slice(&method.tag().to_le_bytes());
    out.extend_from_slice(&adler32(data).to_be_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// A block to decode together with its expected decompressed size.
#[derive(Debug, Clone, Copy)]
pub struct BlockRef<'a> {
    pub raw: &'a [u8],
    pub expected_size: Option<usize>,
}

/// Decode independent blocks on a pool of `nb_workers` threads
/// (0 = one per logical CPU). Results keep the input order; the first
/// failing block fails the whole batch.
pub fn decode_blocks(
    blocks: &[BlockRef<'_>],
    nb_workers: usize,
    decryptor: Option<&dyn Decryptor>,
) -> Result<Vec<Vec<u8>>, ContainerError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(nb_workers)
        .build()
        .map_err(|e| ContainerError::ThreadPool(e.to_string()))?;

    displaylevel!(
        3,
        "decoding {} blocks on {} workers\n",
        blocks.len(),
        pool.current_num_threads()
    );

    pool.install(|| {
        blocks
            .par_iter()
            .map(|b| decode_block(b.raw, b.expected_size, decryptor))
            .collect()
    })
}
