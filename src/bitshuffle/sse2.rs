//! SSE2 bitshuffle.
//!
//! The bit transposes use `movemask`: it collects the top bit of each of 16
//! bytes, and a 16-bit left shift moves the next bit of every byte into the
//! top position. Eight rounds peel off the eight bit planes of 16 bytes.
//! Groups that do not fill a register fall back to the scalar 8x8 transpose.
#![allow(unsafe_code)]

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use crate::error::{Error, Result};
#[cfg(target_arch = "x86_64")]
use crate::simd::has_sse2;

use super::validate;

/// Forward bitshuffle, SSE2 variant. Returns `size * elem_size`.
///
/// # Errors
///
/// [`Error::MissingSse2`] when the host lacks SSE2, otherwise the same
/// conditions as [`super::trans_bit_elem`].
pub fn trans_bit_elem(
    input: &[u8],
    output: &mut [u8],
    size: usize,
    elem_size: usize,
    tmp: &mut [u8],
) -> Result<usize> {
    let nbyte = validate(input, output, tmp, size, elem_size)?;

    #[cfg(target_arch = "x86_64")]
    {
        if has_sse2() {
            let (output, tmp) = (&mut output[..nbyte], &mut tmp[..nbyte]);
            super::trans_byte_elem(input, output, size, elem_size);
            // SAFETY: SSE2 support was checked at runtime.
            unsafe { trans_bit_byte_sse2(output, tmp) };
            super::trans_bitrow_eight(tmp, output, size, elem_size);
            return Ok(nbyte);
        }
    }

    tracing::debug!("sse2 bitshuffle requested without sse2 ({} bytes)", nbyte);
    Err(Error::MissingSse2)
}

/// Inverse bitshuffle, SSE2 variant. Returns `size * elem_size`.
///
/// # Errors
///
/// Same conditions as [`trans_bit_elem`].
pub fn untrans_bit_elem(
    input: &[u8],
    output: &mut [u8],
    size: usize,
    elem_size: usize,
    tmp: &mut [u8],
) -> Result<usize> {
    let nbyte = validate(input, output, tmp, size, elem_size)?;

    #[cfg(target_arch = "x86_64")]
    {
        if has_sse2() {
            let (output, tmp) = (&mut output[..nbyte], &mut tmp[..nbyte]);
            super::trans_byte_bitrow(input, tmp, size, elem_size);
            // SAFETY: SSE2 support was checked at runtime.
            unsafe { shuffle_bit_eightelem_sse2(tmp, output, elem_size) };
            return Ok(nbyte);
        }
    }

    tracing::debug!("sse2 bitunshuffle requested without sse2 ({} bytes)", nbyte);
    Err(Error::MissingSse2)
}

/// Pull the eight bit planes out of 16 bytes, most significant first, and
/// hand each 16-bit mask to `sink(plane, mask)`.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
#[inline]
unsafe fn for_each_bitplane(src: *const u8, mut sink: impl FnMut(usize, u16)) {
    // SAFETY: caller guarantees 16 readable bytes; loadu has no alignment requirement.
    let mut xmm = unsafe { _mm_loadu_si128(src as *const __m128i) };
    for kk in 0..8 {
        let bt = _mm_movemask_epi8(xmm) as u16;
        xmm = _mm_slli_epi16(xmm, 1);
        sink(7 - kk, bt);
    }
}

/// SSE2 counterpart of `scalar::trans_bit_byte`.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn trans_bit_byte_sse2(input: &[u8], output: &mut [u8]) {
    let nbyte = input.len();
    let nbyte_bitrow = nbyte / 8;
    let mut ii = 0;

    while ii + 16 <= nbyte {
        // SAFETY: `ii + 16 <= input.len()`.
        unsafe {
            for_each_bitplane(input.as_ptr().add(ii), |plane, bt| {
                let at = plane * nbyte_bitrow + ii / 8;
                output[at..at + 2].copy_from_slice(&bt.to_le_bytes());
            });
        }
        ii += 16;
    }

    super::scalar::trans_bit_byte(input, output, ii / 8);
}

/// SSE2 counterpart of `scalar::shuffle_bit_eightelem`. Byte positions are
/// handled in pairs; an odd last position goes through the scalar step.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn shuffle_bit_eightelem_sse2(input: &[u8], output: &mut [u8], elem_size: usize) {
    let stride = 8 * elem_size;
    let paired = elem_size & !1;
    if stride == 0 {
        return;
    }

    for (i, block) in input.chunks_exact(stride).enumerate() {
        let base = i * stride;
        for jj in (0..paired).step_by(2) {
            // SAFETY: `jj + 2 <= elem_size`, so bytes `8 * jj..8 * jj + 16` lie in `block`.
            unsafe {
                for_each_bitplane(block.as_ptr().add(jj * 8), |elem, bt| {
                    let at = base + jj + elem * elem_size;
                    output[at..at + 2].copy_from_slice(&bt.to_le_bytes());
                });
            }
        }
    }

    if paired != elem_size {
        super::scalar::shuffle_bit_eightelem(input, output, elem_size, paired);
    }
}
