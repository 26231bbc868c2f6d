//! Slice wrappers over the raw copy routines.
//!
//! Bounds are checked here once; the routines underneath run unchecked.
#![allow(unsafe_code)]

/// Copy bytes from `src` to `dest` (non-overlapping).
///
/// Copies `min(dest.len(), src.len())` bytes and returns that count.
///
/// # Examples
/// ```
/// use chunkcopy::mem::copy;
/// let mut dest = [0u8; 5];
/// assert_eq!(copy(&mut dest, b"hello"), 5);
/// assert_eq!(&dest, b"hello");
/// ```
pub fn copy(dest: &mut [u8], src: &[u8]) -> usize {
    let n = dest.len().min(src.len());

    // SAFETY: both slices hold at least `n` bytes, and a `&mut` cannot alias a `&`.
    unsafe { crate::memcpy::fast_copy(dest.as_mut_ptr(), src.as_ptr(), n) };
    n
}

/// Copy `len` bytes inside `buf` from offset `src` to offset `dest`, left to
/// right, and return `dest + len`.
///
/// Overlap is allowed in either direction. With `src < dest` the bytes are
/// replicated, not moved.
///
/// # Panics
///
/// Panics if either range falls outside `buf`.
///
/// # Examples
/// ```
/// use chunkcopy::mem::copy_within_forward;
/// let mut buf = *b"ABCDEFGHIJ";
/// assert_eq!(copy_within_forward(&mut buf, 1, 0, 9), 9);
/// assert_eq!(&buf, b"BCDEFGHIJJ");
/// ```
pub fn copy_within_forward(buf: &mut [u8], src: usize, dest: usize, len: usize) -> usize {
    let src_end = src.checked_add(len).expect("source range overflows usize");
    let dest_end = dest.checked_add(len).expect("destination range overflows usize");
    assert!(src_end <= buf.len(), "source range {src}..{src_end} out of bounds for length {}", buf.len());
    assert!(dest_end <= buf.len(), "destination range {dest}..{dest_end} out of bounds for length {}", buf.len());

    let base = buf.as_mut_ptr();
    // SAFETY: both ranges were checked against `buf`; safe_copy tolerates overlap.
    unsafe { crate::memmove::safe_copy(base.add(dest), base.add(src), len) };
    dest_end
}

/// Expand an LZ back-reference at cursor `pos`: `buf[pos + i] = buf[pos + i - dist]`
/// for `i` in `0..len`, left to right. Returns `pos + len`.
///
/// # Panics
///
/// Panics if `dist == 0`, `dist > pos`, or `pos + len > buf.len()`.
///
/// # Examples
/// ```
/// use chunkcopy::mem::copy_match;
/// let mut buf = *b"XYZ..........";
/// assert_eq!(copy_match(&mut buf, 3, 3, 10), 13);
/// assert_eq!(&buf, b"XYZXYZXYZXYZX");
/// ```
pub fn copy_match(buf: &mut [u8], pos: usize, dist: usize, len: usize) -> usize {
    assert!(dist != 0, "back-reference distance must be at least 1");
    assert!(dist <= pos, "back-reference distance {dist} reaches before buffer start (pos {pos})");
    let end = pos.checked_add(len).expect("match range overflows usize");
    assert!(end <= buf.len(), "match end {end} out of bounds for length {}", buf.len());

    // SAFETY: `[pos - dist, pos + len)` lies inside `buf`.
    unsafe {
        let out = buf.as_mut_ptr().add(pos);
        crate::backref::chunk_copy(out, out.sub(dist), dist, len);
    }
    end
}
