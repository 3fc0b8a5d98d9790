//! C-ABI shims: the minilzo entry points, so the staticlib can be linked in
//! place of `minilzo.o`.
//!
//! Enabled with:
//!   cargo build --release --features c-abi
//!
//! Return values follow the LZO status convention (`LZO_E_*`); sizes are
//! reported through the `dst_len` in/out pointer.

use std::os::raw::{c_int, c_uchar, c_ulong};
use std::slice;

use crate::block::{
    compress_bound, compress_into, decompress_into, LzoError, LZO_E_INPUT_OVERRUN, LZO_E_OK,
    LZO_E_OUTPUT_OVERRUN,
};

// ─── helpers ─────────────────────────────────────────────────────────────────

/// Borrow `len` bytes at `ptr`; a null pointer is only valid for `len == 0`.
#[inline(always)]
unsafe fn src_slice<'a>(ptr: *const c_uchar, len: c_ulong) -> Option<&'a [u8]> {
    if ptr.is_null() {
        return if len == 0 { Some(&[]) } else { None };
    }
    Some(slice::from_raw_parts(ptr, len as usize))
}

#[inline(always)]
unsafe fn dst_slice<'a>(ptr: *mut c_uchar, len: c_ulong) -> Option<&'a mut [u8]> {
    if ptr.is_null() {
        return if len == 0 { Some(&mut []) } else { None };
    }
    Some(slice::from_raw_parts_mut(ptr, len as usize))
}

#[inline(always)]
fn finish(result: Result<usize, LzoError>, dst_len: *mut c_ulong) -> c_int {
    match result {
        Ok(n) => {
            // SAFETY: checked non-null by every caller before the call.
            unsafe { *dst_len = n as c_ulong };
            LZO_E_OK
        }
        Err(e) => e.code(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// lzo1x_1_compress  (minilzo.h)
//
// int lzo1x_1_compress(const lzo_bytep src, lzo_uint src_len,
//                      lzo_bytep dst, lzo_uintp dst_len, lzo_voidp wrkmem);
//
// `*dst_len` is the capacity of dst on entry and the stream length on return.
// The dictionary lives on the Rust heap, so `wrkmem` is accepted and ignored.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn lzo1x_1_compress(
    src: *const c_uchar,
    src_len: c_ulong,
    dst: *mut c_uchar,
    dst_len: *mut c_ulong,
    _wrkmem: *mut std::ffi::c_void,
) -> c_int {
    if dst_len.is_null() {
        return LZO_E_OUTPUT_OVERRUN;
    }
    let (Some(src), Some(dst)) = (src_slice(src, src_len), dst_slice(dst, *dst_len)) else {
        return LZO_E_INPUT_OVERRUN;
    };
    finish(compress_into(src, dst), dst_len)
}

// ─────────────────────────────────────────────────────────────────────────────
// lzo1x_decompress_safe  (minilzo.h)
//
// int lzo1x_decompress_safe(const lzo_bytep src, lzo_uint src_len,
//                           lzo_bytep dst, lzo_uintp dst_len, lzo_voidp wrkmem);
//
// `*dst_len` is the capacity of dst on entry and the decoded length on return.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn lzo1x_decompress_safe(
    src: *const c_uchar,
    src_len: c_ulong,
    dst: *mut c_uchar,
    dst_len: *mut c_ulong,
    _wrkmem: *mut std::ffi::c_void,
) -> c_int {
    if dst_len.is_null() {
        return LZO_E_OUTPUT_OVERRUN;
    }
    let Some(src) = src_slice(src, src_len) else {
        return LZO_E_INPUT_OVERRUN;
    };
    let Some(dst) = dst_slice(dst, *dst_len) else {
        return LZO_E_OUTPUT_OVERRUN;
    };
    finish(decompress_into(src, dst), dst_len)
}

/// Worst-case compressed size for `src_len` input bytes (`lzo1x_worst_compress`).
#[no_mangle]
pub extern "C" fn lzo1x_worst_compress(src_len: c_ulong) -> c_ulong {
    compress_bound(src_len as usize) as c_ulong
}
