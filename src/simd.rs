//! Word and vector chunks used by the copy engines, plus runtime SIMD detection.
//!
//! Every bulk routine in this crate is written once over [`Chunk`] and
//! instantiated for the 8-byte machine word and the 16-byte vector.
//!
//! # Vector backends
//!
//! - x86_64 with `sse2`: `__m128i` through `_mm_loadu_si128`/`_mm_storeu_si128`
//! - aarch64 with `neon`: `uint8x16_t` through `vld1q_u8`/`vst1q_u8`
//! - anything else: `u128` through unaligned integer loads/stores

#![allow(unsafe_code)]

use std::sync::OnceLock;

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
use core::arch::aarch64::*;
#[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
use core::arch::x86_64::*;

/// Machine word width in bytes.
pub const WORD: usize = 8;

/// Vector register width in bytes.
pub const VECTOR: usize = 16;

/// Whether a 128-bit integer vector unit backs [`Vector128`] on this target.
pub const HAS_VECTOR128: bool = cfg!(any(
    all(target_arch = "x86_64", target_feature = "sse2"),
    all(target_arch = "aarch64", target_feature = "neon")
));

/// Minimum `|src - dest|` that `safe_copy` hands to the chunked engines.
pub const SAFE_DISTANCE: usize = if HAS_VECTOR128 { VECTOR } else { WORD };

// =============================================================================
// CHUNKS
// =============================================================================

/// A fixed-size unit moved with one unaligned load and one unaligned store.
pub trait Chunk: Copy {
    /// Width in bytes.
    const SIZE: usize;

    /// Load `SIZE` bytes from `src`.
    ///
    /// # Safety
    ///
    /// `src` must be readable for `SIZE` bytes. No alignment is required.
    unsafe fn load(src: *const u8) -> Self;

    /// Store `SIZE` bytes to `dest`.
    ///
    /// # Safety
    ///
    /// `dest` must be writable for `SIZE` bytes. No alignment is required.
    unsafe fn store(self, dest: *mut u8);

    /// Broadcast `byte` into every lane.
    fn splat(byte: u8) -> Self;
}

impl Chunk for u64 {
    const SIZE: usize = 8;

    #[inline(always)]
    unsafe fn load(src: *const u8) -> Self {
        // SAFETY: caller guarantees 8 readable bytes; read_unaligned allows any alignment.
        unsafe { core::ptr::read_unaligned(src as *const u64) }
    }

    #[inline(always)]
    unsafe fn store(self, dest: *mut u8) {
        // SAFETY: caller guarantees 8 writable bytes; write_unaligned allows any alignment.
        unsafe { core::ptr::write_unaligned(dest as *mut u64, self) }
    }

    #[inline(always)]
    fn splat(byte: u8) -> Self {
        (byte as u64) * 0x0101010101010101
    }
}

/// 16-byte vector chunk.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Vector128(Inner);

#[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
type Inner = __m128i;

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
type Inner = uint8x16_t;

#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "sse2"),
    all(target_arch = "aarch64", target_feature = "neon")
)))]
type Inner = u128;

impl Chunk for Vector128 {
    const SIZE: usize = 16;

    #[inline(always)]
    unsafe fn load(src: *const u8) -> Self {
        #[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
        {
            // SAFETY: loadu has no alignment requirement; caller guarantees 16 readable bytes.
            return unsafe { Vector128(_mm_loadu_si128(src as *const __m128i)) };
        }

        #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
        {
            // SAFETY: vld1q_u8 has no alignment requirement; caller guarantees 16 readable bytes.
            return unsafe { Vector128(vld1q_u8(src)) };
        }

        #[cfg(not(any(
            all(target_arch = "x86_64", target_feature = "sse2"),
            all(target_arch = "aarch64", target_feature = "neon")
        )))]
        {
            // SAFETY: caller guarantees 16 readable bytes.
            unsafe { Vector128(core::ptr::read_unaligned(src as *const u128)) }
        }
    }

    #[inline(always)]
    unsafe fn store(self, dest: *mut u8) {
        #[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
        {
            // SAFETY: storeu has no alignment requirement; caller guarantees 16 writable bytes.
            unsafe { _mm_storeu_si128(dest as *mut __m128i, self.0) }
        }

        #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
        {
            // SAFETY: vst1q_u8 has no alignment requirement; caller guarantees 16 writable bytes.
            unsafe { vst1q_u8(dest, self.0) }
        }

        #[cfg(not(any(
            all(target_arch = "x86_64", target_feature = "sse2"),
            all(target_arch = "aarch64", target_feature = "neon")
        )))]
        {
            // SAFETY: caller guarantees 16 writable bytes.
            unsafe { core::ptr::write_unaligned(dest as *mut u128, self.0) }
        }
    }

    #[inline(always)]
    fn splat(byte: u8) -> Self {
        #[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
        {
            // SAFETY: sse2 is enabled for this compilation target.
            return unsafe { Vector128(_mm_set1_epi8(byte as i8)) };
        }

        #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
        {
            // SAFETY: neon is enabled for this compilation target.
            return unsafe { Vector128(vdupq_n_u8(byte)) };
        }

        #[cfg(not(any(
            all(target_arch = "x86_64", target_feature = "sse2"),
            all(target_arch = "aarch64", target_feature = "neon")
        )))]
        {
            Vector128((byte as u128) * 0x0101_0101_0101_0101_0101_0101_0101_0101)
        }
    }
}

// =============================================================================
// RUNTIME DETECTION
// =============================================================================

/// SIMD feature level relevant to the bit transposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum SimdLevel {
    /// Scalar only.
    #[default]
    None,
    /// SSE2 (x86_64).
    Sse2,
    /// NEON (aarch64).
    Neon,
}

impl SimdLevel {
    /// Get string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SimdLevel::None => "none",
            SimdLevel::Sse2 => "sse2",
            SimdLevel::Neon => "neon",
        }
    }
}

/// Detect the SIMD level of the running host.
pub fn detect_simd() -> SimdLevel {
    #[cfg(target_arch = "x86_64")]
    {
        if std::is_x86_feature_detected!("sse2") {
            return SimdLevel::Sse2;
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if std::arch::is_aarch64_feature_detected!("neon") {
            return SimdLevel::Neon;
        }
    }

    SimdLevel::None
}

static SIMD_LEVEL: OnceLock<SimdLevel> = OnceLock::new();

/// Cached [`detect_simd`].
pub fn simd_level() -> SimdLevel {
    *SIMD_LEVEL.get_or_init(|| {
        let level = detect_simd();
        tracing::debug!("detected simd level: {}", level.as_str());
        level
    })
}

/// Whether the SSE2 bit transposes can run on this host.
#[inline]
pub fn has_sse2() -> bool {
    simd_level() == SimdLevel::Sse2
}
