//! Hand-off to and from [`imgref`] images of [`RGBA8`] pixels.
//!
//! ```rust
//! use imgref::ImgVec;
//! use rgb::RGBA8;
//! use tailor::img;
//!
//! let pixels = ImgVec::new(vec![RGBA8::new(255, 0, 128, 200); 6], 3, 2);
//! let (buffer, model) = img::from_rgba8(pixels.as_ref()).unwrap();
//! assert_eq!(buffer.depth(), 32);
//! let back = img::to_rgba8(&buffer, &model).unwrap();
//! assert_eq!(back.buf(), pixels.buf());
//! ```

use alloc::vec::Vec;

use imgref::{ImgRef, ImgVec};
use log::trace;
use rgb::RGBA8;

use crate::blit::{Blit, blit};
use crate::buffer::PixelBuffer;
use crate::error::BlitError;
use crate::model::{ColorModel, DirectModel};

/// `RGBA8` memory read as one 32-bit MSB-first pixel.
pub const RGBA8_MODEL: DirectModel =
    DirectModel::rgb(0xFF00_0000, 0xFF_0000, 0xFF00).with_alpha(0xFF);

/// Convert any buffer to packed RGBA.
///
/// Sources without alpha come out opaque.
///
/// # Errors
///
/// As [`blit`] for `src` and `model`.
pub fn to_rgba8(src: &PixelBuffer, model: &ColorModel) -> Result<ImgVec<RGBA8>, BlitError> {
    let (width, height) = (src.width(), src.height());
    let mut dst = PixelBuffer::new(width, height, 32, 1)?;
    let rgba = ColorModel::Direct(RGBA8_MODEL);
    blit(src, model, &mut dst, &rgba, &Blit::same_place(src.bounds()))?;
    let pixels = bytemuck::allocation::try_cast_vec(dst.into_data()).unwrap_or_else(|(_, data)| {
        trace!("to_rgba8: copying {} bytes to realign", data.len());
        bytemuck::cast_slice(&data).to_vec()
    });
    Ok(ImgVec::new(pixels, width, height))
}

/// Copy an RGBA image into a 32-bit buffer and its direct model.
///
/// # Errors
///
/// [`ArgumentError::ZeroDimensions`](crate::ArgumentError::ZeroDimensions)
/// for an empty image.
pub fn from_rgba8(img: ImgRef<'_, RGBA8>) -> Result<(PixelBuffer, ColorModel), BlitError> {
    let (width, height) = (img.width(), img.height());
    let mut data = Vec::with_capacity(width * height * 4);
    for row in img.rows() {
        data.extend_from_slice(bytemuck::cast_slice(row));
    }
    let buffer = PixelBuffer::from_vec(width, height, 32, width * 4, data)?;
    Ok((buffer, ColorModel::Direct(RGBA8_MODEL)))
}
