//! Error diffusion for palette quantization, and the ordered-dither matrix.

use alloc::vec;
use alloc::vec::Vec;

use rgb::RGB8;

/// 8×8 ordered-dither thresholds, scaled to 24 bits (`0x000000..=0xFC0000`).
///
/// Shift right by a channel's bit count to get the threshold for that depth.
pub const DITHER_MATRIX: [[u32; 8]; 8] = [
    [0xfc0000, 0x7c0000, 0xdc0000, 0x5c0000, 0xf40000, 0x740000, 0xd40000, 0x540000],
    [0x3c0000, 0xbc0000, 0x1c0000, 0x9c0000, 0x340000, 0xb40000, 0x140000, 0x940000],
    [0xcc0000, 0x4c0000, 0xec0000, 0x6c0000, 0xc40000, 0x440000, 0xe40000, 0x640000],
    [0x0c0000, 0x8c0000, 0x2c0000, 0xac0000, 0x040000, 0x840000, 0x240000, 0xa40000],
    [0xf00000, 0x700000, 0xd00000, 0x500000, 0xf80000, 0x780000, 0xd80000, 0x580000],
    [0x300000, 0xb00000, 0x100000, 0x900000, 0x380000, 0xb80000, 0x180000, 0x980000],
    [0xc00000, 0x400000, 0xe00000, 0x600000, 0xc80000, 0x480000, 0xe80000, 0x680000],
    [0x000000, 0x800000, 0x200000, 0xa00000, 0x080000, 0x880000, 0x280000, 0xa80000],
];

/// Floyd–Steinberg error state for one blit.
///
/// Errors are kept in sixteenths. Slots are addressed by `width - column`,
/// so slot `e - 1` is the next pixel to the right and `e + 1` the previous
/// one; the two spare slots absorb spill at either edge. Per channel a
/// quantization error `d` adds `3d` behind, `5d` below, and `7d` ahead, and
/// `d` itself is carried into the next pixel's slot for the row below.
#[derive(Clone, Debug)]
pub struct ErrorDiffusion {
    width: usize,
    err: [Vec<i32>; 3],
    carry: [i32; 3],
}

impl ErrorDiffusion {
    /// Zeroed state for rows of `width` destination pixels.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            err: [vec![0; width + 2], vec![0; width + 2], vec![0; width + 2]],
            carry: [0; 3],
        }
    }

    #[inline]
    pub fn start_row(&mut self) {
        self.carry = [0; 3];
    }

    /// Fold the pending error into `rgb` for destination column `col`.
    ///
    /// Each channel is clamped to `0..=255`.
    #[inline]
    pub fn correct(&mut self, col: usize, rgb: [i32; 3]) -> [i32; 3] {
        let slot = self.width - col;
        let mut out = [0; 3];
        for c in 0..3 {
            out[c] = (rgb[c] + (self.err[c][slot] >> 4)).clamp(0, 255);
            self.err[c][slot] = self.carry[c];
        }
        out
    }

    /// Spread the difference between the corrected color and the `chosen`
    /// palette entry to the neighbors of column `col`.
    #[inline]
    pub fn diffuse(&mut self, col: usize, rgb: [i32; 3], chosen: RGB8) {
        let slot = self.width - col;
        let chosen = [chosen.r as i32, chosen.g as i32, chosen.b as i32];
        for c in 0..3 {
            let d = rgb[c] - chosen[c];
            let err = &mut self.err[c];
            let mut acc = d * 3;
            err[slot + 1] += acc;
            acc += d * 2;
            err[slot] += acc;
            err[slot - 1] += acc + d * 2;
            self.carry[c] = d;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_covers_every_level_once() {
        let mut seen = [false; 64];
        for row in DITHER_MATRIX {
            for v in row {
                assert_eq!(v & 0x3FFFF, 0);
                let level = (v >> 18) as usize;
                assert!(!seen[level]);
                seen[level] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn exact_colors_leave_no_error() {
        let mut fs = ErrorDiffusion::new(4);
        for _ in 0..3 {
            fs.start_row();
            for col in 0..4 {
                let c = fs.correct(col, [10, 20, 30]);
                assert_eq!(c, [10, 20, 30]);
                fs.diffuse(col, c, RGB8::new(10, 20, 30));
            }
        }
    }

    #[test]
    fn error_reaches_right_neighbor() {
        let mut fs = ErrorDiffusion::new(3);
        fs.start_row();
        let c = fs.correct(0, [100, 0, 0]);
        fs.diffuse(0, c, RGB8::new(84, 0, 0));
        // 7 * 16 sixteenths carried right.
        assert_eq!(fs.correct(1, [100, 0, 0]), [107, 0, 0]);
    }

    #[test]
    fn clamps_to_byte_range() {
        let mut fs = ErrorDiffusion::new(2);
        fs.start_row();
        let c = fs.correct(0, [250, 5, 128]);
        fs.diffuse(0, c, RGB8::new(0, 255, 128));
        assert_eq!(fs.correct(1, [250, 5, 128]), [255, 0, 128]);
    }
}
