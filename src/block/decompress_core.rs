//! LZO1X block decompression core engine.
//!
//! The decoder is an explicit state machine over [`DecodeState`]; each step
//! consumes one instruction from an [`InputCursor`] and writes through an
//! [`OutputSink`]. All cursor state lives in locals of [`decompress_generic`],
//! so concurrent calls never share anything.
//!
//! # Security boundary
//!
//! This is the path that sees untrusted bytes. Every read is bounds-checked
//! by the cursor, every back-reference is checked against the write position
//! by the sink, and output growth is capped by the sink. Malformed input
//! returns an [`LzoError`]; it never panics.

use super::buffer::OutputSink;
use super::types::{
    InputCursor, LzoError, FIRST_LITERAL_BIAS, M2_MAX_OFFSET, M3_MAX_OFFSET,
};

/// What the next byte of the stream means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    /// Expect a literal-run opcode (`0..=15`) or a match (`16..=255`).
    Literal,
    /// A full literal run was just copied: `0..=15` is a 3-byte short match
    /// from the window past [`M2_MAX_OFFSET`].
    AfterLiteralRun,
    /// Decode the match instruction starting with this opcode.
    Match(u8),
    /// Copy this many (1..=3) trailing literals, then decode a match.
    TrailingLiterals(usize),
    /// End-of-stream marker seen.
    Done,
}

/// Interpret the first byte of a stream.
///
/// A first byte above 17 carries an initial literal run of `byte - 17` bytes
/// with no preceding match. Short runs behave like trailing literals; longer
/// runs are copied here and continue as if after an ordinary literal run.
pub fn decode_first<S: OutputSink>(
    ip: &mut InputCursor<'_>,
    out: &mut S,
) -> Result<DecodeState, LzoError> {
    let first = ip.peek()?;
    if first <= FIRST_LITERAL_BIAS {
        return Ok(DecodeState::Literal);
    }
    ip.read_u8()?;
    let t = (first - FIRST_LITERAL_BIAS) as usize;
    if t < 4 {
        return Ok(DecodeState::TrailingLiterals(t));
    }
    out.put_literals(ip.take(t)?)?;
    Ok(DecodeState::AfterLiteralRun)
}

/// Literal-run opcode: `1..=15` means `t + 3` literals; `0` extends the
/// length with a zero-byte chain (`15 + chain + 3`).
fn decode_literal_run<S: OutputSink>(
    t: u8,
    ip: &mut InputCursor<'_>,
    out: &mut S,
) -> Result<DecodeState, LzoError> {
    let len = if t == 0 { ip.read_zero_chain(15)? } else { t as usize } + 3;
    out.put_literals(ip.take(len)?)?;
    Ok(DecodeState::AfterLiteralRun)
}

#[inline]
fn after_match(trailing: usize) -> DecodeState {
    if trailing == 0 {
        DecodeState::Literal
    } else {
        DecodeState::TrailingLiterals(trailing)
    }
}

/// Decode one match instruction whose opcode `t` was already consumed.
///
/// `after_literal_run` selects the meaning of `0..=15`: a 3-byte copy from
/// beyond the near window right after a literal run, a 2-byte copy from the
/// near window otherwise.
pub fn decode_match<S: OutputSink>(
    t: u8,
    after_literal_run: bool,
    ip: &mut InputCursor<'_>,
    out: &mut S,
) -> Result<DecodeState, LzoError> {
    let tu = t as usize;
    let (distance, len, trailing) = match t {
        64..=255 => {
            let b = ip.read_u8()? as usize;
            let distance = ((tu >> 2) & 7) + (b << 3) + 1;
            (distance, (tu >> 5) + 1, tu & 3)
        }
        32..=63 => {
            let len = match tu & 31 {
                0 => ip.read_zero_chain(31)?,
                n => n,
            } + 2;
            let (field, trailing) = ip.read_distance14()?;
            (field + 1, len, trailing)
        }
        16..=31 => {
            let high = (tu & 8) << 11;
            let len = match tu & 7 {
                0 => ip.read_zero_chain(7)?,
                n => n,
            } + 2;
            let (field, trailing) = ip.read_distance14()?;
            if high + field == 0 {
                return Ok(DecodeState::Done);
            }
            (high + field + M3_MAX_OFFSET, len, trailing)
        }
        0..=15 => {
            let b = ip.read_u8()? as usize;
            let near = (tu >> 2) + (b << 2) + 1;
            if after_literal_run {
                (near + M2_MAX_OFFSET, 3, tu & 3)
            } else {
                (near, 2, tu & 3)
            }
        }
    };
    out.put_match(distance, len)?;
    Ok(after_match(trailing))
}

/// Advance the state machine by one instruction.
pub fn step<S: OutputSink>(
    state: DecodeState,
    ip: &mut InputCursor<'_>,
    out: &mut S,
) -> Result<DecodeState, LzoError> {
    match state {
        DecodeState::Literal => {
            let t = ip.read_u8()?;
            if t >= 16 {
                decode_match(t, false, ip, out)
            } else {
                decode_literal_run(t, ip, out)
            }
        }
        DecodeState::AfterLiteralRun => {
            let t = ip.read_u8()?;
            decode_match(t, true, ip, out)
        }
        DecodeState::Match(t) => decode_match(t, false, ip, out),
        DecodeState::TrailingLiterals(n) => {
            out.put_literals(ip.take(n)?)?;
            Ok(DecodeState::Match(ip.read_u8()?))
        }
        DecodeState::Done => Ok(DecodeState::Done),
    }
}

/// Core LZO1X decompression loop.
///
/// Runs until the end-of-stream marker; bytes after the marker are ignored.
/// Returns the number of source bytes consumed, including the marker.
pub fn decompress_generic<S: OutputSink>(src: &[u8], out: &mut S) -> Result<usize, LzoError> {
    let mut ip = InputCursor::new(src);
    let mut state = decode_first(&mut ip, out)?;
    while state != DecodeState::Done {
        state = step(state, &mut ip, out)?;
    }
    Ok(ip.position())
}
