use alloc::vec::Vec;

use log::{debug, trace};

use super::quantize::{SourceColors, quantize};
use super::{Blit, Plan, plan};
use crate::alpha::{Coverage, SourceKind};
use crate::buffer::PixelBuffer;
use crate::error::BlitError;
use crate::format::PixelFormat;
use crate::model::Palette;

/// Source index to destination index, for every value the source depth can hold.
struct PaletteMapping {
    table: Vec<u32>,
    inexact: Vec<bool>,
    identity: bool,
}

impl PaletteMapping {
    fn new(src: &Palette, src_depth: u8, dst: &Palette, dst_depth: u8) -> Self {
        let entries = 1usize << src_depth;
        if src == dst {
            let keep = (1u32 << dst_depth) - 1;
            let table: Vec<u32> = (0..entries as u32).map(|i| i & keep).collect();
            return Self {
                identity: src_depth <= dst_depth,
                inexact: alloc::vec![false; entries],
                table,
            };
        }
        let limit = dst.len().min(1 << dst_depth);
        let (table, inexact) = (0..entries as u32)
            .map(|i| {
                let c = src.color(i);
                let (index, distance) = dst.nearest([c.r as i32, c.g as i32, c.b as i32], limit);
                (index, distance != 0)
            })
            .unzip();
        Self {
            table,
            inexact,
            identity: false,
        }
    }

    fn is_exact(&self) -> bool {
        !self.inexact.contains(&true)
    }

    /// Whether any sampled source pixel lands on an entry without an exact match.
    fn hits_inexact(&self, src: &PixelBuffer, format: PixelFormat, plan: &Plan<'_>) -> bool {
        let read = format.reader();
        plan.grid.rows.iter().any(|row| {
            let s_row = row.src * src.stride();
            plan.grid
                .cols
                .iter()
                .any(|tap| self.inexact[read(src.data(), s_row, tap.src) as usize])
        })
    }

    #[inline]
    fn get(&self, index: u32) -> u32 {
        self.table[index as usize]
    }
}

fn map_bytes(src: &PixelBuffer, dst: &mut PixelBuffer, plan: &Plan<'_>, mapping: &PaletteMapping) {
    let grid = &plan.grid;
    let run = grid.cols.len();
    let (sx, dx) = (grid.cols[0].src, grid.cols[0].dst);
    let (src_data, src_stride) = (src.data(), src.stride());
    let dst_stride = dst.stride();
    let dst_data = dst.data_mut();
    for row in &grid.rows {
        let s = &src_data[row.src * src_stride + sx..][..run];
        let d = &mut dst_data[row.dst * dst_stride + dx..][..run];
        if mapping.identity {
            d.copy_from_slice(s);
        } else {
            for (d, &s) in d.iter_mut().zip(s) {
                *d = mapping.get(s as u32) as u8;
            }
        }
    }
}

/// Blit between two indexed buffers.
///
/// Every source index is matched to a destination index once, up front. When
/// the two palettes are equal indices carry over unchanged, truncated to the
/// destination depth if it is shallower. If some source color has no exact
/// match and dithering is on, pixels are quantized one by one with error
/// diffusion instead. Partial alpha also goes pixel by pixel, blending the
/// two palette colors.
///
/// # Errors
///
/// See [`blit`](super::blit).
pub fn indexed_to_indexed(
    src: &PixelBuffer,
    src_palette: &Palette,
    dst: &mut PixelBuffer,
    dst_palette: &Palette,
    op: &Blit<'_>,
) -> Result<(), BlitError> {
    let src_format = PixelFormat::indexed(src.depth(), src.byte_order())?;
    let dst_format = PixelFormat::indexed(dst.depth(), dst.byte_order())?;
    let Some(plan) = plan(src, dst, op, SourceKind::Indexed)? else {
        return Ok(());
    };

    if plan.alpha.is_all_or_nothing() {
        let mapping = PaletteMapping::new(src_palette, src.depth(), dst_palette, dst.depth());
        trace!(
            "palette mapping: identity={}, exact={}",
            mapping.identity,
            mapping.is_exact()
        );
        if mapping.is_exact() || !op.dither || !mapping.hits_inexact(src, src_format, &plan) {
            map_indices(src, src_format, src_palette, dst, dst_format, &plan, &mapping);
            return Ok(());
        }
    }
    debug!(
        "indexed blit {src_format:?} -> {dst_format:?}: per-pixel quantize, dither={}",
        op.dither
    );
    quantize(
        src,
        src_format,
        SourceColors::Palette(src_palette),
        dst,
        dst_format,
        dst_palette,
        &plan,
        op.dither,
    );
    Ok(())
}

fn map_indices(
    src: &PixelBuffer,
    src_format: PixelFormat,
    src_palette: &Palette,
    dst: &mut PixelBuffer,
    dst_format: PixelFormat,
    plan: &Plan<'_>,
    mapping: &PaletteMapping,
) {
    if plan.alpha.is_opaque()
        && plan.grid.contiguous_x
        && src_format == PixelFormat::Indexed8
        && dst_format == PixelFormat::Indexed8
    {
        debug!("indexed blit: byte rows, identity={}", mapping.identity);
        map_bytes(src, dst, plan, mapping);
        return;
    }
    debug!("indexed blit {src_format:?} -> {dst_format:?}: mapped pixels");
    let read = src_format.reader();
    let write = dst_format.writer();
    let (src_data, src_stride) = (src.data(), src.stride());
    let dst_stride = dst.stride();
    let dst_data = dst.data_mut();
    for row in &plan.grid.rows {
        let s_row = row.src * src_stride;
        let d_row = row.dst * dst_stride;
        for tap in &plan.grid.cols {
            let raw = read(src_data, s_row, tap.src);
            let c = src_palette.color(raw);
            let rgba = [c.r as i32, c.g as i32, c.b as i32, 0xFF];
            if plan.alpha.coverage(tap.src, row.src, raw, rgba) == Coverage::Skip {
                continue;
            }
            write(dst_data, d_row, tap.dst, mapping.get(raw));
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use crate::alpha::{AlphaPlane, AlphaSource};
    use crate::buffer::Rect;
    use alloc::vec;
    use rgb::RGB8;

    const BLACK: RGB8 = RGB8::new(0, 0, 0);
    const GRAY: RGB8 = RGB8::new(128, 128, 128);
    const WHITE: RGB8 = RGB8::new(255, 255, 255);

    fn row8(values: &[u8]) -> PixelBuffer {
        PixelBuffer::from_vec(values.len(), 1, 8, values.len(), values.to_vec()).unwrap()
    }

    #[test]
    fn same_palette_copies_indices() {
        let palette = Palette::new(vec![BLACK, GRAY, WHITE]).unwrap();
        let src = row8(&[2, 0, 1, 1, 2]);
        let mut dst = PixelBuffer::new(5, 1, 8, 1).unwrap();
        let op = Blit::same_place(Rect::sized(5, 1));
        indexed_to_indexed(&src, &palette, &mut dst, &palette, &op).unwrap();
        assert_eq!(dst.data(), src.data());

        let mut flipped = PixelBuffer::new(5, 1, 8, 1).unwrap();
        indexed_to_indexed(&src, &palette, &mut flipped, &palette, &op.flip_x(true)).unwrap();
        assert_eq!(flipped.data(), &[2, 1, 1, 0, 2]);
    }

    #[test]
    fn same_palette_truncates_to_shallower_depth() {
        let palette = Palette::new(vec![BLACK, GRAY, WHITE, WHITE]).unwrap();
        let src = row8(&[0, 1, 2, 3]);
        let mut dst = PixelBuffer::new(4, 1, 1, 1).unwrap();
        let op = Blit::same_place(Rect::sized(4, 1));
        indexed_to_indexed(&src, &palette, &mut dst, &palette, &op).unwrap();
        assert_eq!(dst.data(), &[0b0101_0000]);
    }

    #[test]
    fn remaps_through_nearest_colors() {
        let src_palette = Palette::new(vec![WHITE, BLACK, RGB8::new(250, 250, 250)]).unwrap();
        let src = row8(&[0, 1, 2]);
        let mut dst = PixelBuffer::new(3, 1, 4, 1).unwrap();
        let op = Blit::same_place(Rect::sized(3, 1));
        indexed_to_indexed(&src, &src_palette, &mut dst, &Palette::black_and_white(), &op)
            .unwrap();
        let mut out = [0u32; 3];
        dst.pixels(0, 0, &mut out).unwrap();
        assert_eq!(out, [1, 0, 1]);
    }

    #[test]
    fn index_mask_leaves_destination() {
        let palette = Palette::new(vec![BLACK, GRAY, WHITE]).unwrap();
        let src = row8(&[0, 1, 2, 1]);
        let mut dst = row8(&[9, 9, 9, 9]);
        let op = Blit::same_place(Rect::sized(4, 1)).alpha(AlphaSource::MaskByIndex(&[1]));
        indexed_to_indexed(&src, &palette, &mut dst, &palette, &op).unwrap();
        assert_eq!(dst.data(), &[0, 9, 2, 9]);
    }

    #[test]
    fn color_keys_match_source_palette_colors() {
        let palette = Palette::black_and_white();
        let src = row8(&[0, 1]);
        let op = Blit::same_place(Rect::sized(2, 1));

        let mut dst = row8(&[7, 7]);
        let white = [WHITE];
        let keyed = op.alpha(AlphaSource::MaskByRgb(&white));
        indexed_to_indexed(&src, &palette, &mut dst, &palette, &keyed).unwrap();
        assert_eq!(dst.data(), &[0, 7]);

        let mut dst = row8(&[7, 7]);
        let black = [BLACK];
        let keyed = op.alpha(AlphaSource::MaskByRgb(&black));
        indexed_to_indexed(&src, &palette, &mut dst, &palette, &keyed).unwrap();
        assert_eq!(dst.data(), &[7, 1]);
    }

    #[test]
    fn packed_plane_masks_pixels() {
        let palette = Palette::new(vec![BLACK, WHITE]).unwrap();
        let src = row8(&[1, 1, 1, 1]);
        let mut dst = row8(&[0, 0, 0, 0]);
        let bits = [0b1010_0000];
        let op = Blit::same_place(Rect::sized(4, 1))
            .alpha(AlphaSource::SeparatePacked(AlphaPlane::new(&bits, 1)));
        indexed_to_indexed(&src, &palette, &mut dst, &palette, &op).unwrap();
        assert_eq!(dst.data(), &[1, 0, 1, 0]);
    }

    #[test]
    fn dither_only_when_inexact_colors_are_used() {
        let src_palette = Palette::new(vec![BLACK, GRAY, WHITE]).unwrap();
        let bw = Palette::black_and_white();

        let exact_only = row8(&[0, 2, 0, 2, 0, 2, 0, 2]);
        let mut dst = PixelBuffer::new(8, 1, 8, 1).unwrap();
        let op = Blit::same_place(Rect::sized(8, 1)).dither(true);
        indexed_to_indexed(&exact_only, &src_palette, &mut dst, &bw, &op).unwrap();
        assert_eq!(dst.data(), &[0, 1, 0, 1, 0, 1, 0, 1]);

        let grays = row8(&[1; 8]);
        let mut plain = PixelBuffer::new(8, 1, 8, 1).unwrap();
        indexed_to_indexed(&grays, &src_palette, &mut plain, &bw, &op.dither(false)).unwrap();
        assert_eq!(plain.data(), &[1; 8]);

        let mut dithered = PixelBuffer::new(8, 1, 8, 1).unwrap();
        indexed_to_indexed(&grays, &src_palette, &mut dithered, &bw, &op).unwrap();
        assert_eq!(dithered.data(), &[1, 0, 1, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn constant_alpha_blends_palette_colors() {
        let src_palette = Palette::new(vec![WHITE]).unwrap();
        let dst_palette = Palette::new(vec![BLACK, RGB8::new(127, 127, 127), WHITE]).unwrap();
        let src = row8(&[0, 0]);
        let mut dst = row8(&[0, 2]);
        let op = Blit::same_place(Rect::sized(2, 1)).alpha(AlphaSource::Constant(128));
        indexed_to_indexed(&src, &src_palette, &mut dst, &dst_palette, &op).unwrap();
        assert_eq!(dst.data(), &[1, 2]);
    }
}
