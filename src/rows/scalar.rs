use archmage::prelude::*;

use super::{bgr_to_0rgb_tail, reverse_4bpp_tail, swap_2bpp_tail};

// ===========================================================================
// Scalar row implementations
// ===========================================================================

pub(super) fn reverse_4bpp_row_scalar(_token: ScalarToken, src: &[u8], dst: &mut [u8]) {
    reverse_4bpp_tail(src, dst);
}

pub(super) fn swap_2bpp_row_scalar(_token: ScalarToken, src: &[u8], dst: &mut [u8]) {
    swap_2bpp_tail(src, dst);
}

pub(super) fn bgr_to_0rgb_row_scalar(_token: ScalarToken, src: &[u8], dst: &mut [u8]) {
    bgr_to_0rgb_tail(src, dst);
}

// ===========================================================================
// Scalar incant! entry points
// ===========================================================================

pub(super) fn reverse_4bpp_impl_scalar(t: ScalarToken, s: &[u8], d: &mut [u8]) {
    reverse_4bpp_row_scalar(t, s, d);
}
pub(super) fn swap_2bpp_impl_scalar(t: ScalarToken, s: &[u8], d: &mut [u8]) {
    swap_2bpp_row_scalar(t, s, d);
}
pub(super) fn bgr_to_0rgb_impl_scalar(t: ScalarToken, s: &[u8], d: &mut [u8]) {
    bgr_to_0rgb_row_scalar(t, s, d);
}
