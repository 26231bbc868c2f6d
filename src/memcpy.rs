//! Bulk chunk copies and the non-overlapping `fast_copy` entry point.
#![allow(unsafe_code)]

use crate::copy::copy_bytes;
use crate::simd::{Chunk, HAS_VECTOR128, Vector128, WORD};

/// Chunks per unrolled iteration.
pub(crate) const UNROLL: usize = 8;

/// Non-overlapping copy with automatic size-class dispatch.
///
/// - 0-7 bytes: fixed-width primitives
/// - 8-15 bytes: 8-byte chunk engine
/// - 16+ bytes: 16-byte chunk engine when a vector unit is available,
///   otherwise the 8-byte engine
///
/// Returns `out + len`.
///
/// # Safety
///
/// - `from` must be readable and `out` writable for `len` bytes
/// - The memory regions must not overlap
#[inline(always)]
pub unsafe fn fast_copy(out: *mut u8, from: *const u8, len: usize) -> *mut u8 {
    unsafe {
        if len < WORD {
            return copy_bytes(out, from, len);
        }

        if HAS_VECTOR128 && len >= Vector128::SIZE {
            return chunk_memcpy_16(out, from, len);
        }

        chunk_memcpy(out, from, len)
    }
}

/// Copy `len >= 8` bytes in 8-byte chunks. Returns `out + len`.
///
/// Writes proceed low to high one chunk at a time, so a destination lying at
/// least 8 bytes above the source sees the same bytes a left-to-right byte
/// loop would produce.
///
/// # Safety
///
/// - `len >= 8`
/// - `from` must be readable and `out` writable for `len` bytes
/// - `out - from` must be `>= 8` or the regions must not overlap
#[inline]
pub unsafe fn chunk_memcpy(out: *mut u8, from: *const u8, len: usize) -> *mut u8 {
    unsafe { chunk_memcpy_with::<u64>(out, from, len) }
}

/// Copy `len >= 16` bytes in 16-byte vector chunks. Returns `out + len`.
///
/// # Safety
///
/// - `len >= 16`
/// - `from` must be readable and `out` writable for `len` bytes
/// - `out - from` must be `>= 16` or the regions must not overlap
#[inline]
pub unsafe fn chunk_memcpy_16(out: *mut u8, from: *const u8, len: usize) -> *mut u8 {
    unsafe { chunk_memcpy_with::<Vector128>(out, from, len) }
}

// =============================================================================
// CHUNK ENGINE
// =============================================================================
//
// 1. One leading chunk store covers `len % SIZE`; both cursors then skip that
//    remainder so the rest is a whole number of chunks. The bytes in
//    [rem, SIZE) are written twice with the same values.
// 2. `chunks % UNROLL` single chunks, then full unrolled blocks.

#[inline(always)]
unsafe fn chunk_memcpy_with<C: Chunk>(mut out: *mut u8, mut from: *const u8, len: usize) -> *mut u8 {
    debug_assert!(len >= C::SIZE, "chunk_memcpy needs at least {} bytes, got {len}", C::SIZE);

    let rem = len % C::SIZE;
    let mut chunks = len / C::SIZE;

    unsafe {
        C::load(from).store(out);
        out = out.add(rem);
        from = from.add(rem);

        for _ in 0..chunks % UNROLL {
            C::load(from).store(out);
            out = out.add(C::SIZE);
            from = from.add(C::SIZE);
        }
        chunks -= chunks % UNROLL;

        while chunks != 0 {
            // Load and store in lock step: sources within one block may have
            // just been written when `out - from` is a single chunk.
            for k in 0..UNROLL {
                C::load(from.add(k * C::SIZE)).store(out.add(k * C::SIZE));
            }
            out = out.add(UNROLL * C::SIZE);
            from = from.add(UNROLL * C::SIZE);
            chunks -= UNROLL;
        }
    }

    out
}
