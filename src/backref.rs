//! LZ back-reference expansion: `out[i] = out[i - dist]`, left to right.
//!
//! Short distances are grown by doubling. After copying `dist` bytes the
//! region `[out - dist, out + dist)` is a valid pattern of period `dist`, so
//! the next step may copy at distance `2 * dist` from the same `from`. Once
//! the distance reaches a machine word the rest is an ordinary forward
//! chunk copy.
#![allow(unsafe_code)]

use crate::copy::{copy_8_bytes, copy_bytes};
use crate::memcpy::chunk_memcpy;
use crate::memset::byte_memset;
use crate::simd::WORD;

/// Expand a back-reference shorter than 8 bytes. Returns `out + len`.
///
/// - `dist >= len`: no overlap, plain short copy
/// - `dist == 1`: fill with `*from`
/// - otherwise: copy the `dist`-byte prefix, then continue at twice the
///   distance until the remainder no longer overlaps
///
/// # Safety
///
/// - `len < 8` and `dist >= 1`
/// - `from == out - dist`, readable for `dist` bytes
/// - `out` writable for `len` bytes
#[inline]
pub unsafe fn set_bytes(mut out: *mut u8, from: *const u8, mut dist: usize, mut len: usize) -> *mut u8 {
    debug_assert!(len < WORD, "set_bytes called with len {len}");
    debug_assert!(dist >= 1);

    unsafe {
        if dist >= len {
            return copy_bytes(out, from, len);
        }

        if dist == 1 {
            core::ptr::write_bytes(out, *from, len);
            return out.add(len);
        }

        // At most two rounds: dist 2 with len 7 copies 2, then 4, then 1.
        while dist < len {
            out = copy_bytes(out, from, dist);
            len -= dist;
            dist *= 2;
        }

        copy_bytes(out, from, len)
    }
}

/// Expand a back-reference with `len >= 8` and a short distance by pattern
/// doubling. Returns `out + len`.
///
/// # Safety
///
/// - `len >= 8` and `dist >= 1`
/// - `from == out - dist`, readable for `dist` bytes
/// - `out` writable for `len` bytes
#[inline]
pub unsafe fn chunk_memset(mut out: *mut u8, from: *const u8, mut dist: usize, mut len: usize) -> *mut u8 {
    debug_assert!(len >= WORD, "chunk_memset needs at least {WORD} bytes, got {len}");
    debug_assert!(dist >= 1);

    unsafe {
        if dist >= len {
            return chunk_memcpy(out, from, len);
        }

        while dist < len && dist < WORD {
            // Only the first `dist` bytes of this store are final; the rest is
            // rewritten by the next round.
            copy_8_bytes(out, from);

            out = out.add(dist);
            len -= dist;
            dist *= 2;

            if len < WORD {
                return set_bytes(out, from, dist, len);
            }
        }

        chunk_memcpy(out, from, len)
    }
}

/// Back-reference dispatcher. Returns `out + len`.
///
/// `dist == 0` means a plain non-overlapping copy from `from`; any other
/// value expands `out[i] = out[i - dist]` with `from == out - dist`.
///
/// # Safety
///
/// - `out` writable for `len` bytes
/// - `dist == 0`: `from` readable for `len` bytes and disjoint from `out`
/// - `dist >= 1`: `from == out - dist`, readable for `dist` bytes
#[inline]
pub unsafe fn chunk_copy(out: *mut u8, from: *const u8, dist: usize, len: usize) -> *mut u8 {
    unsafe {
        if len < WORD {
            if dist > 0 {
                return set_bytes(out, from, dist, len);
            }
            return copy_bytes(out, from, len);
        }

        match dist {
            0 => chunk_memcpy(out, from, len),
            1 => byte_memset(out, len),
            _ => chunk_memset(out, from, dist, len),
        }
    }
}
