//! Where a blit's opacity comes from.
//!
//! Opacity is fixed-point 16.16: `0x10000` is fully opaque and 0 fully
//! transparent. A partially covered destination pixel is decoded and each
//! channel moves toward the source by `(src - dst) * alpha >> 16`.

use rgb::RGB8;

use crate::buffer::Rect;
use crate::channel::Channel;
use crate::error::{ArgumentError, BlitError};

pub(crate) const OPAQUE: i32 = 0x10000;

/// A borrowed plane of per-pixel alpha values.
///
/// `x` and `y` give the plane coordinate that lines up with the top-left
/// pixel of the source region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlphaPlane<'a> {
    data: &'a [u8],
    stride: usize,
    x: usize,
    y: usize,
}

impl<'a> AlphaPlane<'a> {
    /// A plane whose origin lines up with the source region's origin.
    pub const fn new(data: &'a [u8], stride: usize) -> Self {
        Self {
            data,
            stride,
            x: 0,
            y: 0,
        }
    }

    /// Shift the plane coordinate matched to the source region's origin.
    pub const fn at(mut self, x: usize, y: usize) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Byte offset of the last byte touched for a `width × height` region,
    /// where `bits` is 8 for byte planes and 1 for bit planes.
    fn last_byte(&self, width: usize, height: usize, bits: usize) -> Option<usize> {
        let col = self.x.checked_add(width.saturating_sub(1))?;
        let row = self.y.checked_add(height.saturating_sub(1))?;
        row.checked_mul(self.stride)?
            .checked_add(col.checked_mul(bits)? / 8)
    }

    fn covers(&self, width: usize, height: usize, bits: usize) -> Result<(), BlitError> {
        match self.last_byte(width, height, bits) {
            Some(last) if last < self.data.len() => Ok(()),
            _ => Err(ArgumentError::AlphaPlaneTooSmall.into()),
        }
    }

    #[inline]
    fn byte(&self, dx: usize, dy: usize) -> u8 {
        self.data[(self.y + dy) * self.stride + self.x + dx]
    }

    #[inline]
    fn bit(&self, dx: usize, dy: usize) -> bool {
        let col = self.x + dx;
        (self.data[(self.y + dy) * self.stride + (col >> 3)] >> (7 - (col & 7))) & 1 != 0
    }
}

/// How a blit decides the opacity of each source pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlphaSource<'a> {
    /// Every pixel overwrites the destination.
    #[default]
    Opaque,
    /// Nothing is drawn; the blit returns without touching the destination.
    Transparent,
    /// One level for every pixel, 0..=255.
    Constant(u8),
    /// One alpha byte per pixel.
    SeparateUnpacked(AlphaPlane<'a>),
    /// One bit per pixel, most significant bit first. A set bit is opaque.
    SeparatePacked(AlphaPlane<'a>),
    /// One byte per pixel; any nonzero byte is opaque.
    MaskUnpacked(AlphaPlane<'a>),
    /// Read from the alpha channel of a direct-color source.
    ChannelEmbedded,
    /// Indexed sources only: these palette indices are not drawn.
    MaskByIndex(&'a [u8]),
    /// These colors are not drawn.
    MaskByRgb(&'a [RGB8]),
}

/// Opacity decided for one source pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Coverage {
    Skip,
    Full,
    Partial(i32),
}

/// Source pixel kind an [`AlphaSource`] is resolved against.
#[derive(Clone, Copy, Debug)]
pub(crate) enum SourceKind {
    Indexed,
    Direct { alpha: Channel },
}

/// An [`AlphaSource`] validated against one blit's source region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct AlphaSampler<'a> {
    mode: Mode<'a>,
    origin_x: usize,
    origin_y: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Mode<'a> {
    Opaque,
    Constant(i32),
    Unpacked(AlphaPlane<'a>),
    Packed(AlphaPlane<'a>),
    Mask(AlphaPlane<'a>),
    Channel,
    Indices(&'a [u8]),
    Colors(&'a [RGB8]),
}

impl<'a> AlphaSource<'a> {
    /// Validate against the source and build the per-pixel sampler.
    ///
    /// `Ok(None)` means nothing will be drawn.
    pub(crate) fn sampler(
        &self,
        src: &Rect,
        kind: SourceKind,
    ) -> Result<Option<AlphaSampler<'a>>, BlitError> {
        let mode = match *self {
            Self::Opaque | Self::Constant(255) => Mode::Opaque,
            Self::Transparent | Self::Constant(0) => return Ok(None),
            Self::Constant(level) => Mode::Constant(((level as i32) << 16) / 255),
            Self::SeparateUnpacked(plane) => {
                plane.covers(src.width, src.height, 8)?;
                Mode::Unpacked(plane)
            }
            Self::SeparatePacked(plane) => {
                plane.covers(src.width, src.height, 1)?;
                Mode::Packed(plane)
            }
            Self::MaskUnpacked(plane) => {
                plane.covers(src.width, src.height, 8)?;
                Mode::Mask(plane)
            }
            Self::ChannelEmbedded => match kind {
                SourceKind::Direct { alpha } if alpha.is_present() => Mode::Channel,
                _ => return Err(ArgumentError::NoAlphaChannel.into()),
            },
            Self::MaskByIndex(indices) => match kind {
                SourceKind::Indexed => Mode::Indices(indices),
                SourceKind::Direct { .. } => return Err(ArgumentError::AlphaModeMismatch.into()),
            },
            Self::MaskByRgb(colors) => Mode::Colors(colors),
        };
        Ok(Some(AlphaSampler {
            mode,
            origin_x: src.x,
            origin_y: src.y,
        }))
    }
}

impl AlphaSampler<'_> {
    pub fn is_opaque(&self) -> bool {
        matches!(self.mode, Mode::Opaque)
    }

    /// True when every pixel is either fully drawn or skipped.
    pub fn is_all_or_nothing(&self) -> bool {
        matches!(
            self.mode,
            Mode::Opaque | Mode::Packed(_) | Mode::Mask(_) | Mode::Indices(_) | Mode::Colors(_)
        )
    }

    /// Opacity for the source pixel at `(sx, sy)`.
    ///
    /// `raw` is the source index or pixel bits and `rgba` its decoded color.
    #[inline]
    pub fn coverage(&self, sx: usize, sy: usize, raw: u32, rgba: [i32; 4]) -> Coverage {
        let level = match self.mode {
            Mode::Opaque => return Coverage::Full,
            Mode::Constant(level) => level,
            Mode::Unpacked(plane) => {
                ((plane.byte(sx - self.origin_x, sy - self.origin_y) as i32) << 16) / 255
            }
            Mode::Packed(plane) => {
                if plane.bit(sx - self.origin_x, sy - self.origin_y) {
                    OPAQUE
                } else {
                    0
                }
            }
            Mode::Mask(plane) => {
                if plane.byte(sx - self.origin_x, sy - self.origin_y) != 0 {
                    OPAQUE
                } else {
                    0
                }
            }
            Mode::Channel => (rgba[3] << 16) / 255,
            Mode::Indices(indices) => {
                if indices.iter().any(|&i| i as u32 == raw) {
                    return Coverage::Skip;
                }
                OPAQUE
            }
            Mode::Colors(colors) => {
                let hit = colors.iter().any(|c| {
                    c.r as i32 == rgba[0] && c.g as i32 == rgba[1] && c.b as i32 == rgba[2]
                });
                if hit {
                    return Coverage::Skip;
                }
                OPAQUE
            }
        };
        match level {
            0 => Coverage::Skip,
            OPAQUE => Coverage::Full,
            partial => Coverage::Partial(partial),
        }
    }
}

/// Move `dst` toward `src` by a 16.16 `alpha`.
#[inline]
pub(crate) fn blend(dst: i32, src: i32, alpha: i32) -> i32 {
    dst + (((src - dst) * alpha) >> 16)
}
