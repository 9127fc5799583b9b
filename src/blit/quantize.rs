use log::debug;

use super::{Blit, Plan, plan};
use crate::alpha::{Coverage, SourceKind, blend};
use crate::buffer::PixelBuffer;
use crate::dither::ErrorDiffusion;
use crate::error::BlitError;
use crate::format::PixelFormat;
use crate::model::{DirectCodec, DirectModel, Palette};

/// How source pixel values turn into color.
#[derive(Clone, Copy, Debug)]
pub(crate) enum SourceColors<'p> {
    Palette(&'p Palette),
    Direct(DirectCodec),
}

impl SourceColors<'_> {
    #[inline]
    fn decode(&self, raw: u32) -> [i32; 4] {
        match self {
            Self::Palette(palette) => {
                let c = palette.color(raw);
                [c.r as i32, c.g as i32, c.b as i32, 0xFF]
            }
            Self::Direct(codec) => codec.decode(raw),
        }
    }
}

/// Quantize every sampled source pixel to the nearest entry of `palette`.
///
/// Partial coverage blends against the destination's current palette color
/// first. With `dither`, quantization error is diffused Floyd–Steinberg
/// style across the destination region.
#[allow(clippy::too_many_arguments)]
pub(crate) fn quantize(
    src: &PixelBuffer,
    src_format: PixelFormat,
    colors: SourceColors<'_>,
    dst: &mut PixelBuffer,
    dst_format: PixelFormat,
    palette: &Palette,
    plan: &Plan<'_>,
    dither: bool,
) {
    let limit = palette.len().min(1 << dst_format.depth());
    let read = src_format.reader();
    let read_dst = dst_format.reader();
    let write = dst_format.writer();
    let mut diffusion = dither.then(|| ErrorDiffusion::new(plan.grid.cols.len()));

    let (src_data, src_stride) = (src.data(), src.stride());
    let dst_stride = dst.stride();
    let dst_data = dst.data_mut();
    let mut last: Option<[i32; 3]> = None;
    let mut index = 0;
    for row in &plan.grid.rows {
        let s_row = row.src * src_stride;
        let d_row = row.dst * dst_stride;
        if let Some(fs) = diffusion.as_mut() {
            fs.start_row();
        }
        for (col, tap) in plan.grid.cols.iter().enumerate() {
            let raw = read(src_data, s_row, tap.src);
            let rgba = colors.decode(raw);
            let mut rgb = [rgba[0], rgba[1], rgba[2]];
            match plan.alpha.coverage(tap.src, row.src, raw, rgba) {
                Coverage::Skip => continue,
                Coverage::Full => {}
                Coverage::Partial(alpha) => {
                    let under = palette.color(read_dst(dst_data, d_row, tap.dst));
                    let under = [under.r as i32, under.g as i32, under.b as i32];
                    for (v, q) in rgb.iter_mut().zip(under) {
                        *v = blend(q, *v, alpha);
                    }
                }
            }
            if let Some(fs) = diffusion.as_mut() {
                rgb = fs.correct(col, rgb);
            }
            if last != Some(rgb) {
                index = palette.nearest(rgb, limit).0;
                last = Some(rgb);
            }
            if let Some(fs) = diffusion.as_mut() {
                fs.diffuse(col, rgb, palette.color(index));
            }
            write(dst_data, d_row, tap.dst, index);
        }
    }
}

/// Blit a direct-color source into an indexed destination.
///
/// Each pixel maps to the nearest palette entry by squared RGB distance; a
/// color present in the palette always maps to its first exact entry. With
/// [`Blit::dither`] the residual error is diffused to later pixels.
///
/// # Errors
///
/// See [`blit`](super::blit). [`AlphaSource::MaskByIndex`](crate::AlphaSource::MaskByIndex)
/// is rejected because a direct source has no indices.
pub fn direct_to_indexed(
    src: &PixelBuffer,
    src_model: &DirectModel,
    dst: &mut PixelBuffer,
    dst_palette: &Palette,
    op: &Blit<'_>,
) -> Result<(), BlitError> {
    let src_format = PixelFormat::direct(src.depth(), src.byte_order())?;
    let dst_format = PixelFormat::indexed(dst.depth(), dst.byte_order())?;
    src_model.validate(src.depth())?;
    let codec = src_model.codec();
    let kind = SourceKind::Direct { alpha: codec.alpha };
    let Some(plan) = plan(src, dst, op, kind)? else {
        return Ok(());
    };
    debug!(
        "quantize blit {src_format:?} -> {dst_format:?} over {} colors, dither={}",
        dst_palette.len(),
        op.dither
    );
    quantize(
        src,
        src_format,
        SourceColors::Direct(codec),
        dst,
        dst_format,
        dst_palette,
        &plan,
        op.dither,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use crate::alpha::AlphaSource;
    use crate::buffer::Rect;
    use crate::error::ArgumentError;
    use alloc::vec;
    use rgb::RGB8;

    const RGB24: DirectModel = DirectModel::rgb(0xFF_0000, 0xFF00, 0xFF);

    fn gray_ramp(width: usize) -> PixelBuffer {
        let data = (0..width)
            .flat_map(|x| {
                let v = (x * 255 / (width - 1)) as u8;
                [v, v, v]
            })
            .collect();
        PixelBuffer::from_vec(width, 1, 24, width * 3, data).unwrap()
    }

    #[test]
    fn exact_colors_pick_exact_entries() {
        let palette = Palette::new(vec![
            RGB8::new(0, 0, 0),
            RGB8::new(10, 20, 30),
            RGB8::new(255, 255, 255),
        ])
        .unwrap();
        let src = PixelBuffer::from_vec(3, 1, 24, 9, vec![255, 255, 255, 10, 20, 30, 0, 0, 0])
            .unwrap();
        for dither in [false, true] {
            let mut dst = PixelBuffer::new(3, 1, 8, 1).unwrap();
            let op = Blit::same_place(Rect::sized(3, 1)).dither(dither);
            direct_to_indexed(&src, &RGB24, &mut dst, &palette, &op).unwrap();
            assert_eq!(dst.data(), &[2, 1, 0], "dither={dither}");
        }
    }

    #[test]
    fn undithered_ramp_thresholds_at_midpoint() {
        let src = gray_ramp(16);
        let mut dst = PixelBuffer::new(16, 1, 1, 1).unwrap();
        let op = Blit::same_place(Rect::sized(16, 1));
        direct_to_indexed(&src, &RGB24, &mut dst, &Palette::black_and_white(), &op).unwrap();
        let mut bits = [0u32; 16];
        dst.pixels(0, 0, &mut bits).unwrap();
        assert_eq!(bits, [0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn dithered_mid_gray_alternates() {
        let data = vec![128u8; 8 * 3];
        let src = PixelBuffer::from_vec(8, 1, 24, 24, data).unwrap();
        let mut dst = PixelBuffer::new(8, 1, 8, 1).unwrap();
        let op = Blit::same_place(Rect::sized(8, 1)).dither(true);
        direct_to_indexed(&src, &RGB24, &mut dst, &Palette::black_and_white(), &op).unwrap();
        let ones = dst.data().iter().filter(|&&v| v == 1).count();
        assert!((3..=5).contains(&ones), "{:?}", dst.data());
        assert!(dst.data().windows(3).all(|w| !(w[0] == w[1] && w[1] == w[2])));
    }

    #[test]
    fn color_key_skips_pixels() {
        let src = PixelBuffer::from_vec(2, 1, 24, 6, vec![255, 255, 255, 1, 2, 3]).unwrap();
        let mut dst = PixelBuffer::from_vec(2, 1, 8, 2, vec![7, 7]).unwrap();
        let key = [RGB8::new(1, 2, 3)];
        let op = Blit::same_place(Rect::sized(2, 1)).alpha(AlphaSource::MaskByRgb(&key));
        direct_to_indexed(&src, &RGB24, &mut dst, &Palette::black_and_white(), &op).unwrap();
        assert_eq!(dst.data(), &[1, 7]);
    }

    #[test]
    fn index_mask_rejected_for_direct_source() {
        let src = gray_ramp(2);
        let mut dst = PixelBuffer::new(2, 1, 8, 1).unwrap();
        let op = Blit::same_place(Rect::sized(2, 1)).alpha(AlphaSource::MaskByIndex(&[0]));
        assert_eq!(
            direct_to_indexed(&src, &RGB24, &mut dst, &Palette::black_and_white(), &op),
            Err(BlitError::InvalidArgument(ArgumentError::AlphaModeMismatch))
        );
        assert_eq!(dst.data(), &[0, 0]);
    }
}
