use archmage::prelude::*;
use safe_unaligned_simd::x86_64::{_mm256_loadu_si256, _mm256_storeu_si256};

use super::{bgr_to_0rgb_tail, reverse_4bpp_tail, swap_2bpp_tail};

// ===========================================================================
// SIMD constants
// ===========================================================================

const REVERSE_4_SHUF_AVX: [i8; 32] = [
    3, 2, 1, 0, 7, 6, 5, 4, 11, 10, 9, 8, 15, 14, 13, 12, 3, 2, 1, 0, 7, 6, 5, 4, 11, 10, 9, 8, 15,
    14, 13, 12,
];

const SWAP_2_SHUF_AVX: [i8; 32] = [
    1, 0, 3, 2, 5, 4, 7, 6, 9, 8, 11, 10, 13, 12, 15, 14, 1, 0, 3, 2, 5, 4, 7, 6, 9, 8, 11, 10, 13,
    12, 15, 14,
];

// Spread 24 source bytes so each 128-bit lane starts on a pixel: dwords 0-3 low, 3-6 high.
const BGR_ALIGN_PERM_AVX: [i8; 32] = [
    0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 3, 0, 0, 0, 4, 0, 0, 0, 5, 0, 0, 0, 6, 0, 0, 0,
];

const BGR_TO_0RGB_SHUF_AVX: [i8; 32] = [
    -128, 2, 1, 0, -128, 5, 4, 3, -128, 8, 7, 6, -128, 11, 10, 9, -128, 2, 1, 0, -128, 5, 4, 3,
    -128, 8, 7, 6, -128, 11, 10, 9,
];

// ===========================================================================
// x86-64 AVX2 rite row implementations
// ===========================================================================

#[rite]
pub(super) fn reverse_4bpp_row_v3(_token: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let mask = _mm256_loadu_si256(&REVERSE_4_SHUF_AVX);
    let mut i = 0;
    while let (Some(s), Some(d)) = (
        src[i..].first_chunk::<32>(),
        dst[i..].first_chunk_mut::<32>(),
    ) {
        let v = _mm256_loadu_si256(s);
        _mm256_storeu_si256(d, _mm256_shuffle_epi8(v, mask));
        i += 32;
    }
    reverse_4bpp_tail(&src[i..], &mut dst[i..]);
}

#[rite]
pub(super) fn swap_2bpp_row_v3(_token: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let mask = _mm256_loadu_si256(&SWAP_2_SHUF_AVX);
    let mut i = 0;
    while let (Some(s), Some(d)) = (
        src[i..].first_chunk::<32>(),
        dst[i..].first_chunk_mut::<32>(),
    ) {
        let v = _mm256_loadu_si256(s);
        _mm256_storeu_si256(d, _mm256_shuffle_epi8(v, mask));
        i += 32;
    }
    swap_2bpp_tail(&src[i..], &mut dst[i..]);
}

// Loads 32 bytes per 24 consumed, so the loop stops while 8 spare bytes remain.
#[rite]
pub(super) fn bgr_to_0rgb_row_v3(_token: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let perm = _mm256_loadu_si256(&BGR_ALIGN_PERM_AVX);
    let shuf = _mm256_loadu_si256(&BGR_TO_0RGB_SHUF_AVX);
    let (mut is, mut id) = (0, 0);
    while let (Some(s), Some(d)) = (
        src[is..].first_chunk::<32>(),
        dst[id..].first_chunk_mut::<32>(),
    ) {
        let bgr = _mm256_loadu_si256(s);
        let aligned = _mm256_permutevar8x32_epi32(bgr, perm);
        _mm256_storeu_si256(d, _mm256_shuffle_epi8(aligned, shuf));
        is += 24;
        id += 32;
    }
    bgr_to_0rgb_tail(&src[is..], &mut dst[id..]);
}

// ===========================================================================
// x86-64 arcane wrappers
// ===========================================================================

#[arcane]
pub(super) fn reverse_4bpp_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    reverse_4bpp_row_v3(t, s, d);
}
#[arcane]
pub(super) fn swap_2bpp_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    swap_2bpp_row_v3(t, s, d);
}
#[arcane]
pub(super) fn bgr_to_0rgb_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    bgr_to_0rgb_row_v3(t, s, d);
}
