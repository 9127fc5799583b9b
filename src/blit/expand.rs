use alloc::vec::Vec;

use log::debug;

use super::{Blit, plan};
use crate::alpha::{Coverage, SourceKind, blend};
use crate::buffer::PixelBuffer;
use crate::error::BlitError;
use crate::format::PixelFormat;
use crate::model::{DirectModel, Palette};

/// Blit an indexed source into a direct-color destination.
///
/// Opaque blits encode each palette entry once and then only look pixels up.
/// Otherwise each pixel's palette color is blended over the decoded
/// destination and re-encoded.
///
/// # Errors
///
/// See [`blit`](super::blit).
pub fn indexed_to_direct(
    src: &PixelBuffer,
    src_palette: &Palette,
    dst: &mut PixelBuffer,
    dst_model: &DirectModel,
    op: &Blit<'_>,
) -> Result<(), BlitError> {
    let src_format = PixelFormat::indexed(src.depth(), src.byte_order())?;
    let dst_format = PixelFormat::direct(dst.depth(), dst.byte_order())?;
    dst_model.validate(dst.depth())?;
    let Some(plan) = plan(src, dst, op, SourceKind::Indexed)? else {
        return Ok(());
    };
    let codec = dst_model.codec();
    let read = src_format.reader();
    let write = dst_format.writer();
    let (src_data, src_stride) = (src.data(), src.stride());
    let dst_stride = dst.stride();

    if plan.alpha.is_opaque() {
        debug!("expand blit {src_format:?} -> {dst_format:?}: lookup table");
        let lut: Vec<u32> = (0..1u32 << src.depth())
            .map(|i| {
                let c = src_palette.color(i);
                codec.encode([c.r as i32, c.g as i32, c.b as i32, 0xFF])
            })
            .collect();
        let dst_data = dst.data_mut();
        for row in &plan.grid.rows {
            let s_row = row.src * src_stride;
            let d_row = row.dst * dst_stride;
            for tap in &plan.grid.cols {
                let index = read(src_data, s_row, tap.src);
                write(dst_data, d_row, tap.dst, lut[index as usize]);
            }
        }
        return Ok(());
    }

    debug!("expand blit {src_format:?} -> {dst_format:?}: blended");
    let read_dst = dst_format.reader();
    let dst_data = dst.data_mut();
    for row in &plan.grid.rows {
        let s_row = row.src * src_stride;
        let d_row = row.dst * dst_stride;
        for tap in &plan.grid.cols {
            let index = read(src_data, s_row, tap.src);
            let c = src_palette.color(index);
            let mut rgba = [c.r as i32, c.g as i32, c.b as i32, 0xFF];
            match plan.alpha.coverage(tap.src, row.src, index, rgba) {
                Coverage::Skip => continue,
                Coverage::Full => {}
                Coverage::Partial(alpha) => {
                    let under = codec.decode(read_dst(dst_data, d_row, tap.dst));
                    for (v, q) in rgba.iter_mut().zip(under) {
                        *v = blend(q, *v, alpha);
                    }
                }
            }
            write(dst_data, d_row, tap.dst, codec.encode(rgba));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use crate::alpha::{AlphaPlane, AlphaSource};
    use crate::buffer::Rect;
    use crate::error::ArgumentError;
    use alloc::vec;
    use rgb::RGB8;

    const RGB24: DirectModel = DirectModel::rgb(0xFF_0000, 0xFF00, 0xFF);

    fn palette() -> Palette {
        Palette::new(vec![
            RGB8::new(0, 0, 0),
            RGB8::new(255, 0, 0),
            RGB8::new(0, 255, 0),
            RGB8::new(0, 0, 255),
        ])
        .unwrap()
    }

    #[test]
    fn two_bit_source_expands_to_rgb() {
        let src = PixelBuffer::from_vec(4, 1, 2, 1, vec![0b00_01_10_11]).unwrap();
        let mut dst = PixelBuffer::new(4, 1, 24, 1).unwrap();
        indexed_to_direct(&src, &palette(), &mut dst, &RGB24, &Blit::same_place(Rect::sized(4, 1)))
            .unwrap();
        assert_eq!(dst.data(), &[0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn indices_past_palette_are_black() {
        let src = PixelBuffer::from_vec(1, 1, 8, 1, vec![200]).unwrap();
        let mut dst = PixelBuffer::from_vec(1, 1, 24, 3, vec![9, 9, 9]).unwrap();
        indexed_to_direct(&src, &palette(), &mut dst, &RGB24, &Blit::same_place(Rect::sized(1, 1)))
            .unwrap();
        assert_eq!(dst.data(), &[0, 0, 0]);
    }

    #[test]
    fn scaled_up_twice() {
        let src = PixelBuffer::from_vec(2, 1, 8, 2, vec![1, 3]).unwrap();
        let mut dst = PixelBuffer::new(4, 2, 24, 1).unwrap();
        let op = Blit::new(Rect::sized(2, 1), Rect::sized(4, 2));
        indexed_to_direct(&src, &palette(), &mut dst, &RGB24, &op).unwrap();
        let red = [255, 0, 0];
        let blue = [0, 0, 255];
        for y in 0..2 {
            let row = dst.row(y).unwrap();
            assert_eq!(&row[0..3], &red);
            assert_eq!(&row[3..6], &red);
            assert_eq!(&row[6..9], &blue);
            assert_eq!(&row[9..12], &blue);
        }
    }

    #[test]
    fn alpha_plane_blends_and_writes_alpha() {
        let argb = RGB24.with_alpha(0xFF00_0000);
        let src = PixelBuffer::from_vec(2, 1, 8, 2, vec![1, 1]).unwrap();
        let mut dst = PixelBuffer::new(2, 1, 32, 1).unwrap();
        let plane = [0, 255];
        let op = Blit::same_place(Rect::sized(2, 1))
            .alpha(AlphaSource::SeparateUnpacked(AlphaPlane::new(&plane, 2)));
        indexed_to_direct(&src, &palette(), &mut dst, &argb, &op).unwrap();
        assert_eq!(dst.data(), &[0, 0, 0, 0, 0xFF, 0xFF, 0, 0]);
    }

    #[test]
    fn channel_alpha_needs_direct_source() {
        let src = PixelBuffer::from_vec(1, 1, 8, 1, vec![0]).unwrap();
        let mut dst = PixelBuffer::new(1, 1, 24, 1).unwrap();
        let op = Blit::same_place(Rect::sized(1, 1)).alpha(AlphaSource::ChannelEmbedded);
        assert_eq!(
            indexed_to_direct(&src, &palette(), &mut dst, &RGB24, &op),
            Err(BlitError::InvalidArgument(ArgumentError::NoAlphaChannel))
        );
    }
}
