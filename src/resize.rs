//! Nearest-neighbor scaled copies of a whole buffer.

use crate::blit::{Blit, blit};
use crate::buffer::PixelBuffer;
use crate::error::{ArgumentError, BlitError};
use crate::model::ColorModel;

impl PixelBuffer {
    /// A copy stretched or shrunk to `width × height`.
    ///
    /// A negative extent mirrors that axis. The copy keeps this buffer's
    /// depth, byte order and scanline pad; `model` says how to read it.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::ZeroDimensions`] for a zero extent, or whatever
    /// [`blit`] reports for `model`.
    pub fn scaled_to(
        &self,
        model: &ColorModel,
        width: isize,
        height: isize,
    ) -> Result<PixelBuffer, BlitError> {
        self.scaled(
            model,
            width.unsigned_abs(),
            height.unsigned_abs(),
            width < 0,
            height < 0,
        )
    }

    /// A copy scaled by `fx` horizontally and `fy` vertically, rounding each
    /// extent to the nearest pixel. Negative factors mirror.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::NonFiniteScale`] for NaN or infinite results, and
    /// otherwise as [`scaled_to`](Self::scaled_to).
    pub fn scaled_by(&self, model: &ColorModel, fx: f32, fy: f32) -> Result<PixelBuffer, BlitError> {
        let (width, flip_x) = scaled_extent(self.width(), fx)?;
        let (height, flip_y) = scaled_extent(self.height(), fy)?;
        self.scaled(model, width, height, flip_x, flip_y)
    }

    fn scaled(
        &self,
        model: &ColorModel,
        width: usize,
        height: usize,
        flip_x: bool,
        flip_y: bool,
    ) -> Result<PixelBuffer, BlitError> {
        let mut dest = PixelBuffer::new(width, height, self.depth(), self.scanline_pad())?
            .with_byte_order(self.byte_order());
        let op = Blit::new(self.bounds(), dest.bounds())
            .flip_x(flip_x)
            .flip_y(flip_y);
        blit(self, model, &mut dest, model, &op)?;
        Ok(dest)
    }
}

fn scaled_extent(extent: usize, factor: f32) -> Result<(usize, bool), BlitError> {
    let scaled = extent as f32 * factor;
    if !scaled.is_finite() {
        return Err(ArgumentError::NonFiniteScale.into());
    }
    let flip = scaled < 0.0;
    let magnitude = if flip { -scaled } else { scaled };
    Ok(((magnitude + 0.5) as usize, flip))
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use crate::model::{DirectModel, Palette};
    use alloc::vec;

    fn indexed_row() -> (PixelBuffer, ColorModel) {
        let buf = PixelBuffer::from_vec(4, 1, 8, 4, vec![0, 1, 2, 3]).unwrap();
        let palette = Palette::from_rgb_bytes(&[0; 12]).unwrap();
        (buf, ColorModel::Indexed(palette))
    }

    #[test]
    fn doubles_and_mirrors() {
        let (buf, model) = indexed_row();
        let big = buf.scaled_to(&model, 8, 2).unwrap();
        assert_eq!(big.row(0), Some(&[0u8, 0, 1, 1, 2, 2, 3, 3][..]));
        assert_eq!(big.row(1), big.row(0));

        let mirrored = buf.scaled_to(&model, -4, 1).unwrap();
        assert_eq!(mirrored.data(), &[3, 2, 1, 0]);
    }

    #[test]
    fn keeps_layout() {
        let model = ColorModel::Direct(DirectModel::rgb(0xF800, 0x07E0, 0x001F));
        let buf = PixelBuffer::new(3, 3, 16, 4).unwrap();
        let half = buf.scaled_by(&model, 0.5, 0.5).unwrap();
        assert_eq!((half.width(), half.height()), (2, 2));
        assert_eq!(half.depth(), 16);
        assert_eq!(half.scanline_pad(), 4);
        assert_eq!(half.stride(), 4);
        assert_eq!(half.byte_order(), buf.byte_order());
    }

    #[test]
    fn rejects_degenerate_sizes() {
        let (buf, model) = indexed_row();
        assert_eq!(
            buf.scaled_to(&model, 0, 1),
            Err(BlitError::InvalidArgument(ArgumentError::ZeroDimensions))
        );
        assert_eq!(
            buf.scaled_by(&model, f32::NAN, 1.0),
            Err(BlitError::InvalidArgument(ArgumentError::NonFiniteScale))
        );
        assert_eq!(
            buf.scaled_by(&model, 0.1, 1.0),
            Err(BlitError::InvalidArgument(ArgumentError::ZeroDimensions))
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn huge_factors_fail_without_allocating() {
        let (buf, model) = indexed_row();
        assert_eq!(
            buf.scaled_by(&model, 1e9, 1e9),
            Err(BlitError::InvalidArgument(ArgumentError::TooLarge))
        );
    }
}
