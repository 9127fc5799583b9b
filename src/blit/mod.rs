//! Region copies between pixel buffers, converting format on the way.
//!
//! [`blit`] picks one of four variants from the color models on either side:
//!
//! | source \ destination | direct | indexed |
//! |---|---|---|
//! | direct | [`direct_to_direct`] | [`direct_to_indexed`] |
//! | indexed | [`indexed_to_direct`] | [`indexed_to_indexed`] |
//!
//! Each variant validates everything before writing, then walks the
//! destination region row by row. Source coordinates come from a
//! nearest-neighbor [`ScaleStep`](crate::scale::ScaleStep), so source and
//! destination rectangles may differ in size. Flips mirror the destination.

use crate::alpha::{AlphaSampler, AlphaSource, SourceKind};
use crate::buffer::{PixelBuffer, Rect};
use crate::error::{ArgumentError, BlitError};
use crate::model::ColorModel;
use crate::scale::Grid;

mod direct;
mod expand;
mod indexed;
mod quantize;

pub use direct::direct_to_direct;
pub use expand::indexed_to_direct;
pub use indexed::indexed_to_indexed;
pub use quantize::direct_to_indexed;

/// Region, orientation, opacity and dithering for one blit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blit<'a> {
    src: Rect,
    dst: Rect,
    flip_x: bool,
    flip_y: bool,
    alpha: AlphaSource<'a>,
    dither: bool,
}

impl<'a> Blit<'a> {
    /// Copy `src` onto `dst`, stretching when the sizes differ.
    pub const fn new(src: Rect, dst: Rect) -> Self {
        Self {
            src,
            dst,
            flip_x: false,
            flip_y: false,
            alpha: AlphaSource::Opaque,
            dither: false,
        }
    }

    /// Copy a rectangle to the same place in the destination.
    pub const fn same_place(rect: Rect) -> Self {
        Self::new(rect, rect)
    }

    /// Mirror the result horizontally.
    pub const fn flip_x(mut self, flip: bool) -> Self {
        self.flip_x = flip;
        self
    }

    /// Mirror the result vertically.
    pub const fn flip_y(mut self, flip: bool) -> Self {
        self.flip_y = flip;
        self
    }

    /// Where each source pixel's opacity comes from.
    pub const fn alpha(mut self, alpha: AlphaSource<'a>) -> Self {
        self.alpha = alpha;
        self
    }

    /// Diffuse quantization error when an indexed destination cannot match
    /// the source colors exactly.
    pub const fn dither(mut self, dither: bool) -> Self {
        self.dither = dither;
        self
    }

    /// The source region.
    pub const fn src_rect(&self) -> Rect {
        self.src
    }

    /// The destination region.
    pub const fn dst_rect(&self) -> Rect {
        self.dst
    }
}

/// Copy a region from `src` to `dst`, converting between the two models.
///
/// # Errors
///
/// - [`BlitError::UnsupportedDepth`] when a buffer's depth does not suit its model.
/// - [`BlitError::InvalidArgument`] for masks that do not fit, regions outside
///   their buffers, an empty source region, or an alpha source that does not
///   fit the source.
///
/// An empty destination region or [`AlphaSource::Transparent`] returns `Ok`
/// without writing.
pub fn blit(
    src: &PixelBuffer,
    src_model: &ColorModel,
    dst: &mut PixelBuffer,
    dst_model: &ColorModel,
    op: &Blit<'_>,
) -> Result<(), BlitError> {
    match (src_model, dst_model) {
        (ColorModel::Direct(s), ColorModel::Direct(d)) => direct_to_direct(src, s, dst, d, op),
        (ColorModel::Indexed(s), ColorModel::Indexed(d)) => indexed_to_indexed(src, s, dst, d, op),
        (ColorModel::Indexed(s), ColorModel::Direct(d)) => indexed_to_direct(src, s, dst, d, op),
        (ColorModel::Direct(s), ColorModel::Indexed(d)) => direct_to_indexed(src, s, dst, d, op),
    }
}

/// Validated per-call state shared by the variants.
pub(crate) struct Plan<'a> {
    pub grid: Grid,
    pub alpha: AlphaSampler<'a>,
}

/// Check regions and alpha, then lay out the sample grid.
///
/// `Ok(None)` means the blit draws nothing. Formats are resolved by the
/// caller first, so depth errors take precedence over no-ops.
pub(crate) fn plan<'a>(
    src: &PixelBuffer,
    dst: &PixelBuffer,
    op: &Blit<'a>,
    kind: SourceKind,
) -> Result<Option<Plan<'a>>, BlitError> {
    if op.dst.is_empty() || matches!(op.alpha, AlphaSource::Transparent) {
        return Ok(None);
    }
    if op.src.is_empty() {
        return Err(ArgumentError::EmptySourceRegion.into());
    }
    src.check_rect(&op.src)?;
    dst.check_rect(&op.dst)?;
    let Some(alpha) = op.alpha.sampler(&op.src, kind)? else {
        return Ok(None);
    };
    Ok(Some(Plan {
        grid: Grid::new(&op.src, &op.dst, op.flip_x, op.flip_y),
        alpha,
    }))
}
