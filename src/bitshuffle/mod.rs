//! Bit transpose (bitshuffle) of typed arrays and its inverse.
//!
//! `size` elements of `elem_size` bytes form a bit matrix with one row per
//! element and `8 * elem_size` columns. The forward transform writes its
//! transpose: output bit `c * size + r` is bit `c` of element `r`, with bits
//! numbered least significant first inside each byte. Every bit plane thus
//! becomes a contiguous run of `size / 8` bytes.
//!
//! Forward pipeline: byte transpose, 8x8 bit transpose of each byte row,
//! regroup the bit rows. Inverse pipeline: byte-bitrow transpose, then an
//! 8x8 bit transpose per group of eight elements.
//!
//! The [`scalar`] and [`sse2`] modules expose each variant explicitly;
//! [`trans_bit_elem`] and [`untrans_bit_elem`] pick one from the cached
//! runtime SIMD level.

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::simd::has_sse2;

pub mod scalar;
pub mod sse2;

/// Forward bitshuffle with the best variant for this host.
///
/// Returns the number of bytes processed, `size * elem_size`.
///
/// # Errors
///
/// - [`Error::SizeNotMultipleOfEight`] when `size % 8 != 0`
/// - [`Error::BufferTooSmall`] when `input`, `output`, or `tmp` is shorter
///   than `size * elem_size`
pub fn trans_bit_elem(
    input: &[u8],
    output: &mut [u8],
    size: usize,
    elem_size: usize,
    tmp: &mut [u8],
) -> Result<usize> {
    if has_sse2() {
        trace!("bitshuffle: sse2, {} x {} bytes", size, elem_size);
        sse2::trans_bit_elem(input, output, size, elem_size, tmp)
    } else {
        trace!("bitshuffle: scalar, {} x {} bytes", size, elem_size);
        scalar::trans_bit_elem(input, output, size, elem_size, tmp)
    }
}

/// Inverse of [`trans_bit_elem`] with the best variant for this host.
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
    if has_sse2() {
        trace!("bitunshuffle: sse2, {} x {} bytes", size, elem_size);
        sse2::untrans_bit_elem(input, output, size, elem_size, tmp)
    } else {
        trace!("bitunshuffle: scalar, {} x {} bytes", size, elem_size);
        scalar::untrans_bit_elem(input, output, size, elem_size, tmp)
    }
}

/// Bitshuffle a whole block of `typesize`-byte elements.
///
/// Only the largest prefix holding a multiple of eight elements is
/// transposed; the leftover bytes are copied verbatim. Returns the block
/// size, `src.len()`.
///
/// # Errors
///
/// [`Error::BufferTooSmall`] when `dest` is shorter than `src` or `tmp` is
/// shorter than the transposed prefix.
pub fn bitshuffle(typesize: usize, src: &[u8], dest: &mut [u8], tmp: &mut [u8]) -> Result<usize> {
    block_transform(typesize, src, dest, tmp, trans_bit_elem)
}

/// Inverse of [`bitshuffle`].
///
/// # Errors
///
/// Same conditions as [`bitshuffle`].
pub fn bitunshuffle(typesize: usize, src: &[u8], dest: &mut [u8], tmp: &mut [u8]) -> Result<usize> {
    block_transform(typesize, src, dest, tmp, untrans_bit_elem)
}

type Transform = fn(&[u8], &mut [u8], usize, usize, &mut [u8]) -> Result<usize>;

fn block_transform(
    typesize: usize,
    src: &[u8],
    dest: &mut [u8],
    tmp: &mut [u8],
    transform: Transform,
) -> Result<usize> {
    let blocksize = src.len();
    check_len("output", dest.len(), blocksize)?;

    let mut size = if typesize == 0 { 0 } else { blocksize / typesize };
    size -= size % 8;

    transform(src, dest, size, typesize, tmp)?;

    let offset = size * typesize;
    crate::mem::copy(&mut dest[offset..blocksize], &src[offset..]);
    Ok(blocksize)
}

// =============================================================================
// SHARED BYTE-LEVEL STEPS
// =============================================================================

/// Check preconditions shared by every variant and return `size * elem_size`.
pub(crate) fn validate(
    input: &[u8],
    output: &[u8],
    tmp: &[u8],
    size: usize,
    elem_size: usize,
) -> Result<usize> {
    if size % 8 != 0 {
        debug!("bitshuffle rejected: element count {} not a multiple of 8", size);
        return Err(Error::SizeNotMultipleOfEight { size });
    }

    let nbyte = size.saturating_mul(elem_size);
    check_len("input", input.len(), nbyte)?;
    check_len("output", output.len(), nbyte)?;
    check_len("tmp", tmp.len(), nbyte)?;
    Ok(nbyte)
}

fn check_len(buffer: &'static str, provided: usize, required: usize) -> Result<()> {
    if provided < required {
        debug!(
            "bitshuffle rejected: {} buffer holds {} bytes, need {}",
            buffer, provided, required
        );
        return Err(Error::BufferTooSmall {
            buffer,
            required,
            provided,
        });
    }
    Ok(())
}

/// Byte transpose: `output[j * size + i] = input[i * elem_size + j]`.
pub(crate) fn trans_byte_elem(input: &[u8], output: &mut [u8], size: usize, elem_size: usize) {
    if elem_size == 0 {
        return;
    }

    if elem_size == 1 {
        crate::mem::copy(&mut output[..size], &input[..size]);
        return;
    }

    for (i, elem) in input[..size * elem_size].chunks_exact(elem_size).enumerate() {
        for (j, &byte) in elem.iter().enumerate() {
            output[j * size + i] = byte;
        }
    }
}

/// Transpose an `lda x ldb` matrix of `block`-byte blocks.
pub(crate) fn trans_elem(input: &[u8], output: &mut [u8], lda: usize, ldb: usize, block: usize) {
    for ii in 0..lda {
        for jj in 0..ldb {
            let from = (ii * ldb + jj) * block;
            let to = (jj * lda + ii) * block;
            crate::mem::copy(&mut output[to..to + block], &input[from..from + block]);
        }
    }
}

/// Regroup bit rows so bit plane `k` of byte `j` lands at row `j * 8 + k`.
pub(crate) fn trans_bitrow_eight(input: &[u8], output: &mut [u8], size: usize, elem_size: usize) {
    trans_elem(input, output, 8, elem_size, size / 8);
}

/// First inverse step: gather, for every group of eight elements, the
/// `8 * elem_size` bit-plane bytes that describe it.
pub(crate) fn trans_byte_bitrow(input: &[u8], output: &mut [u8], size: usize, elem_size: usize) {
    let nbyte_row = size / 8;

    for ii in 0..8 {
        for jj in 0..elem_size {
            let row = &input[(jj * 8 + ii) * nbyte_row..(jj * 8 + ii + 1) * nbyte_row];
            for (kk, &byte) in row.iter().enumerate() {
                output[kk * elem_size * 8 + jj * 8 + ii] = byte;
            }
        }
    }
}
