//! Distance-1 back-reference: repeat the byte just before the cursor.
#![allow(unsafe_code)]

use crate::memcpy::UNROLL;
use crate::simd::{Chunk, WORD};

/// Fill `len` bytes at `out` with the byte at `out - 1`. Returns `out + len`.
///
/// The broadcast byte is stored in 8-byte strides: one leading store covers
/// `len % 8`, then whole words follow, unrolled by eight.
///
/// # Safety
///
/// - `len >= 8`
/// - `out - 1` must be readable and `out` writable for `len` bytes
#[inline]
pub unsafe fn byte_memset(out: *mut u8, len: usize) -> *mut u8 {
    debug_assert!(len >= WORD, "byte_memset needs at least {WORD} bytes, got {len}");

    unsafe {
        let byte = *out.sub(1);
        fill_with::<u64>(out, byte, len)
    }
}

#[inline(always)]
unsafe fn fill_with<C: Chunk>(mut out: *mut u8, byte: u8, len: usize) -> *mut u8 {
    let v = C::splat(byte);
    let rem = len % C::SIZE;
    let mut chunks = len / C::SIZE;

    unsafe {
        v.store(out);
        out = out.add(rem);

        // A zero tail is a no-op.
        for _ in 0..chunks % UNROLL {
            v.store(out);
            out = out.add(C::SIZE);
        }
        chunks -= chunks % UNROLL;

        while chunks != 0 {
            for k in 0..UNROLL {
                v.store(out.add(k * C::SIZE));
            }
            out = out.add(UNROLL * C::SIZE);
            chunks -= UNROLL;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_memset_8_to_1024() {
        let mut buf = [0u8; 1030];

        for n in 8..=1024 {
            buf.fill(0xFF);
            buf[0] = 0x42;
            let end = unsafe { byte_memset(buf.as_mut_ptr().add(1), n) };
            assert_eq!(end, unsafe { buf.as_mut_ptr().add(1 + n) });
            for (i, &byte) in buf[1..=n].iter().enumerate() {
                assert_eq!(byte, 0x42, "Failed at size {} index {}", n, i);
            }
            assert_eq!(buf[n + 1], 0xFF, "Overwrote at size {}", n);
        }
    }

    #[test]
    fn test_byte_memset_alignment() {
        let mut buf = [0u8; 300];

        for dst_off in 1..17 {
            for n in [8usize, 15, 16, 17, 63, 64, 65, 127, 128, 129, 255] {
                buf.fill(0);
                buf[dst_off - 1] = 0x5A;
                unsafe { byte_memset(buf.as_mut_ptr().add(dst_off), n) };
                assert!(
                    buf[dst_off..dst_off + n].iter().all(|&b| b == 0x5A),
                    "dst_off={dst_off} n={n}"
                );
                assert!(buf[dst_off + n..].iter().all(|&b| b == 0));
            }
        }
    }

    #[test]
    fn test_byte_memset_whole_unrolled_blocks() {
        // 64 and 128 bytes leave no single-chunk tail before the unrolled loop.
        for n in [64usize, 128, 512] {
            let mut buf = vec![0u8; n + 1];
            buf[0] = 7;
            unsafe { byte_memset(buf.as_mut_ptr().add(1), n) };
            assert!(buf.iter().all(|&b| b == 7), "n={n}");
        }
    }

    #[test]
    fn test_byte_memset_ten_bytes() {
        let mut buf = [0u8; 11];
        buf[0] = 0x5A;
        unsafe { byte_memset(buf.as_mut_ptr().add(1), 10) };
        assert_eq!(&buf[1..], &[0x5A; 10]);
    }
}
