//! Portable bitshuffle built on an 8x8 bit transpose in a `u64`.

use crate::error::Result;

use super::{trans_bitrow_eight, trans_byte_bitrow, trans_byte_elem, validate};

/// Forward bitshuffle, scalar variant. Returns `size * elem_size`.
///
/// # Errors
///
/// See [`super::trans_bit_elem`].
pub fn trans_bit_elem(
    input: &[u8],
    output: &mut [u8],
    size: usize,
    elem_size: usize,
    tmp: &mut [u8],
) -> Result<usize> {
    let nbyte = validate(input, output, tmp, size, elem_size)?;
    let (output, tmp) = (&mut output[..nbyte], &mut tmp[..nbyte]);

    trans_byte_elem(input, output, size, elem_size);
    trans_bit_byte(output, tmp, 0);
    trans_bitrow_eight(tmp, output, size, elem_size);
    Ok(nbyte)
}

/// Inverse bitshuffle, scalar variant. Returns `size * elem_size`.
///
/// # Errors
///
/// See [`super::trans_bit_elem`].
pub fn untrans_bit_elem(
    input: &[u8],
    output: &mut [u8],
    size: usize,
    elem_size: usize,
    tmp: &mut [u8],
) -> Result<usize> {
    let nbyte = validate(input, output, tmp, size, elem_size)?;
    let (output, tmp) = (&mut output[..nbyte], &mut tmp[..nbyte]);

    trans_byte_bitrow(input, tmp, size, elem_size);
    shuffle_bit_eightelem(tmp, output, elem_size, 0);
    Ok(nbyte)
}

/// Transpose the 8x8 bit matrix held in `x`, byte `i` being row `i`.
#[inline]
pub(crate) fn trans_bit_8x8(mut x: u64) -> u64 {
    let mut t = (x ^ (x >> 7)) & 0x00AA_00AA_00AA_00AA;
    x ^= t ^ (t << 7);
    t = (x ^ (x >> 14)) & 0x0000_CCCC_0000_CCCC;
    x ^= t ^ (t << 14);
    t = (x ^ (x >> 28)) & 0x0000_0000_F0F0_F0F0;
    x ^ t ^ (t << 28)
}

/// Little-endian word of an 8-byte group.
#[inline(always)]
fn load_group(group: &[u8]) -> u64 {
    u64::from_le_bytes(core::array::from_fn(|k| group[k]))
}

/// Bit-transpose every 8-byte group of `input` from group `first` on: bit
/// `k` of the group's bytes becomes byte `group` of bit row `k`, each row
/// being `input.len() / 8` bytes long.
pub(crate) fn trans_bit_byte(input: &[u8], output: &mut [u8], first: usize) {
    let nbyte_bitrow = input.len() / 8;

    for (ii, group) in input.chunks_exact(8).enumerate().skip(first) {
        let x = trans_bit_8x8(load_group(group));
        for (kk, byte) in x.to_le_bytes().into_iter().enumerate() {
            output[kk * nbyte_bitrow + ii] = byte;
        }
    }
}

/// Second inverse step: every run of 8 bit-plane bytes describes one byte
/// position of eight consecutive elements; transpose it back into those
/// elements. Byte positions below `first` are left to the caller.
pub(crate) fn shuffle_bit_eightelem(input: &[u8], output: &mut [u8], elem_size: usize, first: usize) {
    let stride = 8 * elem_size;
    if stride == 0 {
        return;
    }

    for (i, block) in input.chunks_exact(stride).enumerate() {
        let base = i * stride;
        for (jj, group) in block.chunks_exact(8).enumerate().skip(first) {
            let x = trans_bit_8x8(load_group(group));
            for (kk, byte) in x.to_le_bytes().into_iter().enumerate() {
                output[base + jj + kk * elem_size] = byte;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitshuffle::tests::{pseudo_random, reference_bitshuffle};
    use crate::error::Error;

    #[test]
    fn test_trans_bit_8x8_identity_and_involution() {
        // The identity matrix is symmetric.
        let diag = 0x8040_2010_0804_0201u64;
        assert_eq!(trans_bit_8x8(diag), diag);

        // Row 0 full becomes column 0 full.
        assert_eq!(trans_bit_8x8(0xFF), 0x0101_0101_0101_0101);

        for seed in 1..200u64 {
            let x = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15);
            assert_eq!(trans_bit_8x8(trans_bit_8x8(x)), x);
        }
    }

    #[test]
    fn test_group_steps_start_at_first() {
        // Group 1 holds row 0 full; its transpose is column 0 full.
        let mut input = [0u8; 16];
        input[8] = 0xFF;

        let mut out = [0xEEu8; 16];
        trans_bit_byte(&input, &mut out, 1);
        for kk in 0..8 {
            assert_eq!(out[kk * 2], 0xEE, "group 0 touched at row {kk}");
            assert_eq!(out[kk * 2 + 1], 0x01, "group 1 wrong at row {kk}");
        }

        let mut out = [0xEEu8; 16];
        shuffle_bit_eightelem(&input, &mut out, 2, 1);
        for kk in 0..8 {
            assert_eq!(out[kk * 2], 0xEE, "byte 0 touched in element {kk}");
            assert_eq!(out[kk * 2 + 1], 0x01, "byte 1 wrong in element {kk}");
        }
    }

    #[test]
    fn test_scalar_matches_reference() {
        for elem_size in [1usize, 2, 3, 4, 7, 8, 12] {
            for size in [8usize, 16, 40, 128] {
                let nbyte = size * elem_size;
                let input = pseudo_random(nbyte, nbyte as u64);
                let mut out = vec![0u8; nbyte];
                let mut tmp = vec![0u8; nbyte];
                assert_eq!(trans_bit_elem(&input, &mut out, size, elem_size, &mut tmp), Ok(nbyte));
                assert_eq!(out, reference_bitshuffle(&input, size, elem_size));

                let mut back = vec![0u8; nbyte];
                assert_eq!(untrans_bit_elem(&out, &mut back, size, elem_size, &mut tmp), Ok(nbyte));
                assert_eq!(back, input, "size={size} elem_size={elem_size}");
            }
        }
    }

    #[test]
    fn test_scalar_leaves_bytes_past_nbyte() {
        let input = pseudo_random(16, 9);
        let mut out = vec![0xEEu8; 20];
        let mut tmp = vec![0u8; 16];
        assert_eq!(trans_bit_elem(&input, &mut out, 8, 2, &mut tmp), Ok(16));
        assert_eq!(&out[16..], &[0xEE; 4]);
    }

    #[test]
    fn test_scalar_rejects_odd_size() {
        let err = trans_bit_elem(&[0; 7], &mut [0; 7], 7, 1, &mut [0; 7]).unwrap_err();
        assert_eq!(err, Error::SizeNotMultipleOfEight { size: 7 });
    }
}
