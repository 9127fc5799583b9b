//! Linear color gradients rendered as small bands, ready to tile.
//!
//! A band varies along one axis only. Displays with at least 8 bits per
//! channel get a precise band one pixel across. Shallower displays get an
//! ordered-dither band up to 8 pixels across, so the dither pattern survives
//! tiling. Palette displays (any channel count of 0) get a two-entry indexed
//! band dithered between the endpoints.

use alloc::vec;

use log::debug;
use rgb::RGB8;

use crate::blit::{Blit, blit};
use crate::buffer::{PixelBuffer, Rect};
use crate::dither::DITHER_MATRIX;
use crate::error::{ArgumentError, BlitError};
use crate::model::{ColorModel, DirectModel, Palette};

/// 32-bit layout of direct bands: blue, green, red, then an unused byte.
pub const BAND_MODEL: DirectModel = DirectModel::rgb(0xFF00, 0xFF_0000, 0xFF00_0000);

/// A rendered band and the model its pixels are in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradientBand {
    pub buffer: PixelBuffer,
    pub model: ColorModel,
}

/// Render a band for a `width × height` gradient from `from` to `to`.
///
/// `vertical` sweeps top to bottom, otherwise left to right. `bits` holds the
/// significant red, green and blue bits of the target; zeros select a
/// two-tone indexed band.
///
/// # Errors
///
/// [`ArgumentError::ZeroDimensions`] if either extent is zero.
pub fn gradient_band(
    width: usize,
    height: usize,
    vertical: bool,
    from: RGB8,
    to: RGB8,
    bits: [u8; 3],
) -> Result<GradientBand, BlitError> {
    if width == 0 || height == 0 {
        return Err(ArgumentError::ZeroDimensions.into());
    }
    let length = if vertical { height } else { width };
    let steps = if length > 1 { length as i32 - 1 } else { 1 };
    let narrow = |across: usize| {
        if vertical {
            (across, height)
        } else {
            (width, across)
        }
    };

    if bits.contains(&0) {
        let (w, h) = narrow(if vertical { width.min(8) } else { height.min(8) });
        debug!("gradient band {w}x{h}: two-tone");
        let mut buffer = PixelBuffer::new(w, h, 8, 4)?;
        two_tone(&mut buffer, vertical);
        let palette = Palette::new(vec![from, to])?;
        return Ok(GradientBand {
            buffer,
            model: ColorModel::Indexed(palette),
        });
    }

    let precise = bits.iter().all(|&b| b >= 8);
    let (w, h) = if precise {
        narrow(1)
    } else {
        narrow(if vertical { width.min(8) } else { height.min(8) })
    };
    debug!("gradient band {w}x{h}: bits={bits:?}, precise={precise}");
    let mut buffer = PixelBuffer::new(w, h, 32, 4)?;
    // Byte 0 is blue.
    let channels = [(2, from.r, to.r), (1, from.g, to.g), (0, from.b, to.b)];
    for ((byte, from, to), bits) in channels.into_iter().zip(bits) {
        let dither = (!precise).then_some(bits.min(8));
        fill_channel(&mut buffer, byte, from, to, steps, vertical, dither);
    }
    Ok(GradientBand {
        buffer,
        model: ColorModel::Direct(BAND_MODEL),
    })
}

fn fill_channel(
    band: &mut PixelBuffer,
    byte: usize,
    from: u8,
    to: u8,
    steps: i32,
    vertical: bool,
    dither: Option<u8>,
) {
    let start = (from as i32) << 16;
    let inc = (((to as i32) << 16) - start) / steps + 1;
    let (width, height, stride) = (band.width(), band.height(), band.stride());
    let data = band.data_mut();
    for y in 0..height {
        for x in 0..width {
            let along = if vertical { y } else { x };
            let val = start + inc * along as i32;
            data[y * stride + x * 4 + byte] = match dither {
                None => (val as u32 >> 16) as u8,
                Some(bits) => {
                    let temp = val + (DITHER_MATRIX[y & 7][x & 7] >> bits) as i32;
                    if temp > 0xFF_FFFF {
                        0xFF
                    } else {
                        (temp as u32 >> 16) as u8 & (0xFF00u32 >> bits) as u8
                    }
                }
            };
        }
    }
}

fn two_tone(band: &mut PixelBuffer, vertical: bool) {
    let length = if vertical { band.height() } else { band.width() };
    let blend_inc = if length > 1 {
        0x104_0000 / (length as u32 - 1) + 1
    } else {
        1
    };
    let (width, height, stride) = (band.width(), band.height(), band.stride());
    let data = band.data_mut();
    for y in 0..height {
        for x in 0..width {
            let along = if vertical { y } else { x };
            let level = blend_inc * along as u32 + DITHER_MATRIX[y & 7][x & 7];
            data[y * stride + x] = u8::from(level >= 0x100_0000);
        }
    }
}

/// Paint a gradient over `rect` of `dst` by tiling a band across it.
///
/// One-pixel bands are stretched over the whole rectangle in a single blit.
///
/// # Errors
///
/// As [`blit`] for the destination, including
/// [`ArgumentError::RegionOutOfBounds`] when `rect` leaves `dst`.
pub fn fill_gradient(
    dst: &mut PixelBuffer,
    dst_model: &ColorModel,
    rect: Rect,
    vertical: bool,
    from: RGB8,
    to: RGB8,
    bits: [u8; 3],
) -> Result<(), BlitError> {
    if rect.is_empty() {
        return Ok(());
    }
    let band = gradient_band(rect.width, rect.height, vertical, from, to, bits)?;
    let (bw, bh) = (band.buffer.width(), band.buffer.height());
    let paint = |dst: &mut PixelBuffer, src: Rect, at: Rect| {
        blit(&band.buffer, &band.model, dst, dst_model, &Blit::new(src, at))
    };
    if bw == 1 || bh == 1 {
        return paint(dst, band.buffer.bounds(), rect);
    }
    if vertical {
        for dx in (0..rect.width).step_by(bw) {
            let w = bw.min(rect.width - dx);
            paint(dst, Rect::sized(w, bh), Rect::new(rect.x + dx, rect.y, w, bh))?;
        }
    } else {
        for dy in (0..rect.height).step_by(bh) {
            let h = bh.min(rect.height - dy);
            paint(dst, Rect::sized(bw, h), Rect::new(rect.x, rect.y + dy, bw, h))?;
        }
    }
    Ok(())
}
