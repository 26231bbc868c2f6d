//! Overlap-tolerant forward copy.
#![allow(unsafe_code)]

use crate::memcpy::fast_copy;
use crate::simd::SAFE_DISTANCE;

/// Copy `len` bytes from `from` to `out` with left-to-right byte semantics,
/// whatever the overlap. Returns `out + len`.
///
/// When the cursors are closer than [`SAFE_DISTANCE`] (16 with a vector
/// unit, 8 otherwise) the copy runs one byte at a time. Otherwise it goes
/// through [`fast_copy`], whose chunks advance low to high and never read a
/// chunk it has not yet finished writing at that distance.
///
/// This is not `memmove`: with `from < out` and overlap, source bytes are
/// read after being overwritten, which replicates the leading
/// `out - from` bytes (LZ match semantics).
///
/// # Safety
///
/// `from` must be readable and `out` writable for `len` bytes. The regions
/// may overlap in either direction.
#[inline(always)]
pub unsafe fn safe_copy(out: *mut u8, from: *const u8, len: usize) -> *mut u8 {
    let d = out as usize;
    let s = from as usize;

    unsafe {
        if d.abs_diff(s) < SAFE_DISTANCE {
            return copy_forward_bytewise(out, from, len);
        }

        fast_copy(out, from, len)
    }
}

#[inline(always)]
unsafe fn copy_forward_bytewise(mut out: *mut u8, mut from: *const u8, len: usize) -> *mut u8 {
    unsafe {
        for _ in 0..len {
            *out = *from;
            out = out.add(1);
            from = from.add(1);
        }
    }
    out
}
