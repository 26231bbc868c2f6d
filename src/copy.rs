//! Fixed-width copies of 1 to 8 and 16 bytes, and the short-copy dispatcher.
//!
//! Each primitive moves exactly `N` bytes with the widest unaligned integer
//! that divides `N`; odd widths compose two of them. All of them return
//! `out + N` so calls chain.
#![allow(unsafe_code)]

use crate::simd::{Chunk, Vector128};

#[inline(always)]
unsafe fn copy_word<T: Copy>(out: *mut u8, from: *const u8) -> *mut u8 {
    // SAFETY: caller guarantees `size_of::<T>()` readable bytes at `from` and
    // writable bytes at `out`; unaligned access is explicit.
    unsafe {
        let chunk = core::ptr::read_unaligned(from as *const T);
        core::ptr::write_unaligned(out as *mut T, chunk);
        out.add(core::mem::size_of::<T>())
    }
}

/// Copy 1 byte. Returns `out + 1`.
///
/// # Safety
///
/// `from` must be readable and `out` writable for 1 byte.
#[inline(always)]
pub unsafe fn copy_1_bytes(out: *mut u8, from: *const u8) -> *mut u8 {
    unsafe {
        *out = *from;
        out.add(1)
    }
}

/// Copy 2 bytes. Returns `out + 2`.
///
/// # Safety
///
/// `from` must be readable and `out` writable for 2 bytes.
#[inline(always)]
pub unsafe fn copy_2_bytes(out: *mut u8, from: *const u8) -> *mut u8 {
    unsafe { copy_word::<u16>(out, from) }
}

/// Copy 3 bytes (1 + 2). Returns `out + 3`.
///
/// # Safety
///
/// `from` must be readable and `out` writable for 3 bytes, non-overlapping.
#[inline(always)]
pub unsafe fn copy_3_bytes(out: *mut u8, from: *const u8) -> *mut u8 {
    unsafe {
        let out = copy_1_bytes(out, from);
        copy_2_bytes(out, from.add(1))
    }
}

/// Copy 4 bytes. Returns `out + 4`.
///
/// # Safety
///
/// `from` must be readable and `out` writable for 4 bytes.
#[inline(always)]
pub unsafe fn copy_4_bytes(out: *mut u8, from: *const u8) -> *mut u8 {
    unsafe { copy_word::<u32>(out, from) }
}

/// Copy 5 bytes (1 + 4). Returns `out + 5`.
///
/// # Safety
///
/// `from` must be readable and `out` writable for 5 bytes, non-overlapping.
#[inline(always)]
pub unsafe fn copy_5_bytes(out: *mut u8, from: *const u8) -> *mut u8 {
    unsafe {
        let out = copy_1_bytes(out, from);
        copy_4_bytes(out, from.add(1))
    }
}

/// Copy 6 bytes (2 + 4). Returns `out + 6`.
///
/// # Safety
///
/// `from` must be readable and `out` writable for 6 bytes, non-overlapping.
#[inline(always)]
pub unsafe fn copy_6_bytes(out: *mut u8, from: *const u8) -> *mut u8 {
    unsafe {
        let out = copy_2_bytes(out, from);
        copy_4_bytes(out, from.add(2))
    }
}

/// Copy 7 bytes (3 + 4). Returns `out + 7`.
///
/// # Safety
///
/// `from` must be readable and `out` writable for 7 bytes, non-overlapping.
#[inline(always)]
pub unsafe fn copy_7_bytes(out: *mut u8, from: *const u8) -> *mut u8 {
    unsafe {
        let out = copy_3_bytes(out, from);
        copy_4_bytes(out, from.add(3))
    }
}

/// Copy 8 bytes as one `u64`. Returns `out + 8`.
///
/// The load completes before the store, so `from` may overlap `out`.
///
/// # Safety
///
/// `from` must be readable and `out` writable for 8 bytes.
#[inline(always)]
pub unsafe fn copy_8_bytes(out: *mut u8, from: *const u8) -> *mut u8 {
    unsafe {
        u64::load(from).store(out);
        out.add(8)
    }
}

/// Copy 16 bytes as one vector register. Returns `out + 16`.
///
/// # Safety
///
/// `from` must be readable and `out` writable for 16 bytes.
#[inline(always)]
pub unsafe fn copy_16_bytes(out: *mut u8, from: *const u8) -> *mut u8 {
    unsafe {
        Vector128::load(from).store(out);
        out.add(16)
    }
}

/// Copy `len` (< 8) bytes from `from` into `out`. Returns `out + len`.
///
/// # Safety
///
/// - `len < 8`
/// - `from` must be readable and `out` writable for `len` bytes
/// - The regions must not overlap
#[inline(always)]
pub unsafe fn copy_bytes(out: *mut u8, from: *const u8, len: usize) -> *mut u8 {
    debug_assert!(len < 8, "copy_bytes called with len {len}");

    unsafe {
        match len {
            7 => copy_7_bytes(out, from),
            6 => copy_6_bytes(out, from),
            5 => copy_5_bytes(out, from),
            4 => copy_4_bytes(out, from),
            3 => copy_3_bytes(out, from),
            2 => copy_2_bytes(out, from),
            1 => copy_1_bytes(out, from),
            _ => out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Primitive = unsafe fn(*mut u8, *const u8) -> *mut u8;

    const PRIMITIVES: [(usize, Primitive); 9] = [
        (1, copy_1_bytes),
        (2, copy_2_bytes),
        (3, copy_3_bytes),
        (4, copy_4_bytes),
        (5, copy_5_bytes),
        (6, copy_6_bytes),
        (7, copy_7_bytes),
        (8, copy_8_bytes),
        (16, copy_16_bytes),
    ];

    #[test]
    fn test_fixed_width_exact_and_aligned() {
        let mut src = [0u8; 48];
        for (i, byte) in src.iter_mut().enumerate() {
            *byte = (i * 7 + 1) as u8;
        }

        for (n, copy) in PRIMITIVES {
            for src_off in 0..16 {
                for dst_off in 0..16 {
                    let mut dst = [0u8; 48];
                    let end = unsafe {
                        copy(dst.as_mut_ptr().add(dst_off), src.as_ptr().add(src_off))
                    };
                    assert_eq!(end, unsafe { dst.as_mut_ptr().add(dst_off + n) });
                    assert_eq!(
                        &dst[dst_off..dst_off + n],
                        &src[src_off..src_off + n],
                        "copy_{n}_bytes src_off={src_off} dst_off={dst_off}"
                    );
                    assert!(dst[..dst_off].iter().all(|&b| b == 0));
                    assert!(dst[dst_off + n..].iter().all(|&b| b == 0), "copy_{n}_bytes overran");
                }
            }
        }
    }

    #[test]
    fn test_copy_bytes_0_to_7() {
        let src = *b"ABCDEFG";
        for n in 0..8 {
            let mut dst = [b'.'; 8];
            let end = unsafe { copy_bytes(dst.as_mut_ptr(), src.as_ptr(), n) };
            assert_eq!(end, unsafe { dst.as_mut_ptr().add(n) });
            assert_eq!(&dst[..n], &src[..n]);
            assert!(dst[n..].iter().all(|&b| b == b'.'), "overwrote at len {n}");
        }
    }

    #[test]
    fn test_copy_bytes_zero_returns_out() {
        let mut dst = [0u8; 1];
        let out = dst.as_mut_ptr();
        assert_eq!(unsafe { copy_bytes(out, b"x".as_ptr(), 0) }, out);
        assert_eq!(dst, [0]);
    }
}
