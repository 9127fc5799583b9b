//! Nearest-neighbor coordinate stepping in 16.16 fixed point.
//!
//! A destination extent of `d` samples over a source extent of `s` uses the
//! step `((s << 16) - 1) / (d - 1)`. The first destination sample reads source
//! 0 and the last reads source `s - 1`; equal extents step by exactly one.
//! Flipping mirrors where samples land in the destination and never changes
//! the order the source is read in.

use alloc::vec::Vec;

use crate::buffer::Rect;

/// Fixed-point ratio of a source extent to a destination extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScaleStep(u64);

impl ScaleStep {
    /// Step for `dest_extent` samples over `src_extent`. Extents of 0 or 1 step by 0.
    pub fn new(src_extent: usize, dest_extent: usize) -> Self {
        if dest_extent > 1 {
            Self((((src_extent as u64) << 16).saturating_sub(1)) / (dest_extent as u64 - 1))
        } else {
            Self(0)
        }
    }

    /// The 16.16 step.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Source offsets for `count` destination samples.
    pub const fn offsets(self, count: usize) -> Scaler {
        Scaler {
            step: self.0,
            frac: self.0,
            pos: 0,
            remaining: count,
        }
    }
}

/// Iterator over the source offset of each destination sample.
#[derive(Clone, Debug)]
pub struct Scaler {
    step: u64,
    frac: u64,
    pos: usize,
    remaining: usize,
}

impl Iterator for Scaler {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let at = self.pos;
        self.pos += (self.frac >> 16) as usize;
        self.frac = (self.frac & 0xFFFF) + self.step;
        Some(at)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Scaler {}

/// A source coordinate paired with the destination coordinate it lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Tap {
    pub src: usize,
    pub dst: usize,
}

fn axis(src_origin: usize, src_extent: usize, dst_origin: usize, dst_extent: usize, flip: bool) -> Vec<Tap> {
    ScaleStep::new(src_extent, dst_extent)
        .offsets(dst_extent)
        .enumerate()
        .map(|(i, offset)| Tap {
            src: src_origin + offset,
            dst: if flip {
                dst_origin + dst_extent - 1 - i
            } else {
                dst_origin + i
            },
        })
        .collect()
}

/// Every column and row tap of one blit, computed once.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    pub cols: Vec<Tap>,
    pub rows: Vec<Tap>,
    /// Columns map one-to-one, left to right, so a row can move as a run.
    pub contiguous_x: bool,
}

impl Grid {
    pub fn new(src: &Rect, dst: &Rect, flip_x: bool, flip_y: bool) -> Self {
        Self {
            cols: axis(src.x, src.width, dst.x, dst.width, flip_x),
            rows: axis(src.y, src.height, dst.y, dst.height, flip_y),
            contiguous_x: src.width == dst.width && !flip_x,
        }
    }
}
