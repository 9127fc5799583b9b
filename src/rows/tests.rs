extern crate alloc;
extern crate std;
use super::*;
use alloc::{vec, vec::Vec};
use archmage::testing::{CompileTimePolicy, for_each_token_permutation};

fn policy() -> CompileTimePolicy {
    if std::env::var_os("CI").is_some() {
        CompileTimePolicy::Fail
    } else {
        CompileTimePolicy::WarnStderr
    }
}

fn make_bytes(n_pixels: usize, bpp: usize) -> Vec<u8> {
    (0..n_pixels * bpp).map(|i| (i % 251) as u8).collect()
}

// --- Reference implementations, written per byte ---

fn ref_reverse_4bpp(src: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; src.len()];
    for (s, d) in src.chunks_exact(4).zip(out.chunks_exact_mut(4)) {
        d.copy_from_slice(&[s[3], s[2], s[1], s[0]]);
    }
    out
}

fn ref_swap_2bpp(src: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; src.len()];
    for (s, d) in src.chunks_exact(2).zip(out.chunks_exact_mut(2)) {
        d.copy_from_slice(&[s[1], s[0]]);
    }
    out
}

fn ref_bgr_to_0rgb(src: &[u8]) -> Vec<u8> {
    let n = src.len() / 3;
    let mut out = vec![0xEEu8; n * 4];
    for (s, d) in src.chunks_exact(3).zip(out.chunks_exact_mut(4)) {
        d.copy_from_slice(&[0, s[2], s[1], s[0]]);
    }
    out
}

// Small (tail only), around one vector, and several vectors.
const TEST_PIXEL_COUNTS: &[usize] = &[1, 2, 3, 7, 8, 9, 10, 11, 15, 16, 17, 31, 32, 33, 100];

#[test]
fn permutation_reverse_4bpp() {
    let report = for_each_token_permutation(policy(), |perm| {
        for &n in TEST_PIXEL_COUNTS {
            let src = make_bytes(n, 4);
            let expected = ref_reverse_4bpp(&src);
            let mut dst = vec![0u8; n * 4];
            reverse_4bpp(&src, &mut dst);
            assert_eq!(dst, expected, "reverse_4bpp n={n} tier={perm}");
        }
    });
    std::eprintln!("reverse_4bpp: {report}");
}

#[test]
fn permutation_swap_2bpp() {
    let report = for_each_token_permutation(policy(), |perm| {
        for &n in TEST_PIXEL_COUNTS {
            let src = make_bytes(n, 2);
            let expected = ref_swap_2bpp(&src);
            let mut dst = vec![0u8; n * 2];
            swap_2bpp(&src, &mut dst);
            assert_eq!(dst, expected, "swap_2bpp n={n} tier={perm}");
        }
    });
    std::eprintln!("swap_2bpp: {report}");
}

#[test]
fn permutation_bgr_to_0rgb() {
    let report = for_each_token_permutation(policy(), |perm| {
        for &n in TEST_PIXEL_COUNTS {
            let src = make_bytes(n, 3);
            let expected = ref_bgr_to_0rgb(&src);
            let mut dst = vec![0xEEu8; n * 4];
            bgr_to_0rgb(&src, &mut dst);
            assert_eq!(dst, expected, "bgr_to_0rgb n={n} tier={perm}");
        }
    });
    std::eprintln!("bgr_to_0rgb: {report}");
}

#[test]
fn kernels_only_touch_their_run() {
    let src = make_bytes(40, 4);
    let mut dst = vec![0x55u8; 40 * 4 + 8];
    reverse_4bpp(&src, &mut dst[4..4 + 160]);
    assert_eq!(&dst[..4], &[0x55; 4]);
    assert_eq!(&dst[164..], &[0x55; 4]);
    assert_eq!(&dst[4..164], ref_reverse_4bpp(&src).as_slice());
}
