// ---------------------------------------------------------------------------
// Byte-shuffling row kernels behind the direct-color fast paths.
//
// Architecture: #[rite] row functions contain the SIMD loops.
// #[arcane] wrappers are the incant! entry points; scalar twins always exist.
// Callers pass exactly matched runs: `src` and `dst` hold the same number of
// pixels.
// ---------------------------------------------------------------------------

use archmage::incant;

mod scalar;
use scalar::*;

#[cfg(target_arch = "x86_64")]
mod avx2;
#[cfg(target_arch = "x86_64")]
use avx2::*;

#[cfg(test)]
mod tests;

// ===========================================================================
// Per-pixel helpers (also the SIMD tails)
// ===========================================================================

#[inline(always)]
pub(crate) fn reverse_4bpp_px(s: &[u8], d: &mut [u8]) {
    d[0] = s[3];
    d[1] = s[2];
    d[2] = s[1];
    d[3] = s[0];
}

#[inline(always)]
pub(crate) fn swap_2bpp_px(s: &[u8], d: &mut [u8]) {
    d[0] = s[1];
    d[1] = s[0];
}

#[inline(always)]
pub(crate) fn bgr_to_0rgb_px(s: &[u8], d: &mut [u8]) {
    d[0] = 0;
    d[1] = s[2];
    d[2] = s[1];
    d[3] = s[0];
}

#[inline(always)]
fn reverse_4bpp_tail(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        reverse_4bpp_px(s, d);
    }
}

#[inline(always)]
fn swap_2bpp_tail(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(2).zip(dst.chunks_exact_mut(2)) {
        swap_2bpp_px(s, d);
    }
}

#[inline(always)]
fn bgr_to_0rgb_tail(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
        bgr_to_0rgb_px(s, d);
    }
}

// ===========================================================================
// Dispatched row operations
// ===========================================================================

/// Reverse the byte order of every 4-byte pixel (ABCD → DCBA).
pub(crate) fn reverse_4bpp(src: &[u8], dst: &mut [u8]) {
    debug_assert_eq!(src.len(), dst.len());
    incant!(reverse_4bpp_impl(src, dst), [v3, scalar]);
}

/// Swap the two bytes of every 2-byte pixel.
pub(crate) fn swap_2bpp(src: &[u8], dst: &mut [u8]) {
    debug_assert_eq!(src.len(), dst.len());
    incant!(swap_2bpp_impl(src, dst), [v3, scalar]);
}

/// 3-byte `[b, g, r]` → 4-byte `[0, r, g, b]`.
pub(crate) fn bgr_to_0rgb(src: &[u8], dst: &mut [u8]) {
    debug_assert_eq!(src.len() / 3, dst.len() / 4);
    incant!(bgr_to_0rgb_impl(src, dst), [v3, scalar]);
}
