//! One-bit transparency masks derived from a color key.

use rgb::RGB8;

use crate::buffer::PixelBuffer;
use crate::error::BlitError;
use crate::format::{ByteOrder, PixelFormat};
use crate::model::ColorModel;

/// Which source pixels a [`PixelBuffer::transparency_mask`] marks as transparent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransparencyKey {
    /// Pixels whose raw value (palette index or packed bits) equals this.
    Pixel(u32),
    /// Pixels that decode to this color.
    Color(RGB8),
}

/// Scanline pad of generated masks.
const MASK_PAD: usize = 2;

impl PixelBuffer {
    /// A 1-bit mask the size of this buffer: 0 where the pixel matches `key`,
    /// 1 everywhere else.
    ///
    /// Bits are most significant first and rows are padded to two bytes, so the
    /// mask can be handed straight to [`AlphaSource::SeparatePacked`].
    ///
    /// ```rust
    /// use tailor::{AlphaPlane, AlphaSource, Blit, ColorModel, Palette, PixelBuffer, TransparencyKey, blit};
    ///
    /// let model = ColorModel::Indexed(Palette::black_and_white());
    /// let src = PixelBuffer::from_vec(2, 1, 8, 2, vec![0, 1]).unwrap();
    /// let mask = src.transparency_mask(&model, TransparencyKey::Pixel(1)).unwrap();
    ///
    /// let mut dst = PixelBuffer::from_vec(2, 1, 8, 2, vec![1, 1]).unwrap();
    /// let op = Blit::same_place(src.bounds())
    ///     .alpha(AlphaSource::SeparatePacked(AlphaPlane::new(mask.data(), mask.stride())));
    /// blit(&src, &model, &mut dst, &model, &op).unwrap();
    /// assert_eq!(dst.data(), &[0, 1]);
    /// ```
    ///
    /// [`AlphaSource::SeparatePacked`]: crate::AlphaSource::SeparatePacked
    ///
    /// # Errors
    ///
    /// [`BlitError::UnsupportedDepth`] or [`ArgumentError::InvalidMask`] if
    /// `model` cannot describe this buffer.
    ///
    /// [`ArgumentError::InvalidMask`]: crate::ArgumentError::InvalidMask
    pub fn transparency_mask(
        &self,
        model: &ColorModel,
        key: TransparencyKey,
    ) -> Result<PixelBuffer, BlitError> {
        let read = model.format_of(self)?.reader();
        let mut mask = PixelBuffer::new(self.width(), self.height(), 1, MASK_PAD)?;
        let write = PixelFormat::Indexed1 {
            order: ByteOrder::MsbFirst,
        }
        .writer();

        let color = |raw: u32| match model {
            ColorModel::Direct(direct) => direct.color(raw),
            ColorModel::Indexed(palette) => palette.color(raw),
        };
        let keyed = |raw: u32| match key {
            TransparencyKey::Pixel(pixel) => raw == pixel,
            TransparencyKey::Color(c) => color(raw) == c,
        };

        let (src, src_stride) = (self.data(), self.stride());
        let mask_stride = mask.stride();
        let bits = mask.data_mut();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let opaque = !keyed(read(src, y * src_stride, x));
                write(bits, y * mask_stride, x, opaque as u32);
            }
        }
        Ok(mask)
    }
}
