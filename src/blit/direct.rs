use log::debug;

use super::{Blit, plan};
use crate::alpha::{Coverage, SourceKind, blend};
use crate::buffer::PixelBuffer;
use crate::error::BlitError;
use crate::format::PixelFormat;
use crate::model::DirectModel;
use crate::rows;
use crate::scale::Grid;

/// Opaque conversions that reduce to moving bytes around.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ByteKernel {
    /// Identical layouts: copy `n` bytes per pixel.
    Copy(usize),
    /// 32-bit pixels whose bytes come out reversed.
    Reverse4,
    /// 16-bit pixels whose bytes come out swapped.
    Swap2,
    /// 24-bit `[b, g, r]` into 32-bit `[0, r, g, b]`.
    BgrTo0rgb,
}

const BGR24: DirectModel = DirectModel::rgb(0xFF, 0xFF00, 0xFF_0000);
const XRGB32: DirectModel = DirectModel::rgb(0xFF_0000, 0xFF00, 0xFF);

impl ByteKernel {
    fn select(
        src_format: PixelFormat,
        src_model: &DirectModel,
        dst_format: PixelFormat,
        dst_model: &DirectModel,
    ) -> Option<Self> {
        use PixelFormat::*;
        if src_format == dst_format && src_model == dst_model {
            return src_format.bytes_per_pixel().map(Self::Copy);
        }
        match (src_format, dst_format) {
            (Direct32 { order: so }, Direct32 { order: dor }) => {
                let reversed = (so != dor && src_model == dst_model)
                    || (so == dor && src_model.swap_bytes() == *dst_model);
                reversed.then_some(Self::Reverse4)
            }
            (Direct16 { order: so }, Direct16 { order: dor }) => {
                (so != dor && src_model == dst_model).then_some(Self::Swap2)
            }
            (Direct24, Direct32 { order: crate::format::ByteOrder::MsbFirst }) => {
                (*src_model == BGR24 && *dst_model == XRGB32).then_some(Self::BgrTo0rgb)
            }
            _ => None,
        }
    }

    fn bytes(self) -> (usize, usize) {
        match self {
            Self::Copy(n) => (n, n),
            Self::Reverse4 => (4, 4),
            Self::Swap2 => (2, 2),
            Self::BgrTo0rgb => (3, 4),
        }
    }

    #[inline]
    fn run(self, s: &[u8], d: &mut [u8]) {
        match self {
            Self::Copy(_) => d.copy_from_slice(s),
            Self::Reverse4 => rows::reverse_4bpp(s, d),
            Self::Swap2 => rows::swap_2bpp(s, d),
            Self::BgrTo0rgb => rows::bgr_to_0rgb(s, d),
        }
    }

    #[inline]
    fn pixel(self, s: &[u8], d: &mut [u8]) {
        match self {
            Self::Copy(_) => d.copy_from_slice(s),
            Self::Reverse4 => rows::reverse_4bpp_px(s, d),
            Self::Swap2 => rows::swap_2bpp_px(s, d),
            Self::BgrTo0rgb => rows::bgr_to_0rgb_px(s, d),
        }
    }
}

fn move_bytes(src: &PixelBuffer, dst: &mut PixelBuffer, grid: &Grid, kernel: ByteKernel) {
    let (sb, db) = kernel.bytes();
    let (src_data, src_stride) = (src.data(), src.stride());
    let dst_stride = dst.stride();
    let dst_data = dst.data_mut();
    let run = grid.cols.len();
    for row in &grid.rows {
        let s_row = row.src * src_stride;
        let d_row = row.dst * dst_stride;
        if grid.contiguous_x {
            let (sx, dx) = (grid.cols[0].src, grid.cols[0].dst);
            let s = &src_data[s_row + sx * sb..s_row + (sx + run) * sb];
            let d = &mut dst_data[d_row + dx * db..d_row + (dx + run) * db];
            kernel.run(s, d);
        } else {
            for tap in &grid.cols {
                let s = &src_data[s_row + tap.src * sb..][..sb];
                let d = &mut dst_data[d_row + tap.dst * db..][..db];
                kernel.pixel(s, d);
            }
        }
    }
}

/// Blit between two direct-color buffers.
///
/// Opaque copies between identical layouts move whole pixels without
/// decoding them, and a few byte-reordering pairs are handled by SIMD row
/// kernels. Everything else decodes each channel to 8 bits, blends, and
/// re-encodes for the destination masks.
///
/// # Errors
///
/// See [`blit`](super::blit).
pub fn direct_to_direct(
    src: &PixelBuffer,
    src_model: &DirectModel,
    dst: &mut PixelBuffer,
    dst_model: &DirectModel,
    op: &Blit<'_>,
) -> Result<(), BlitError> {
    let src_format = PixelFormat::direct(src.depth(), src.byte_order())?;
    let dst_format = PixelFormat::direct(dst.depth(), dst.byte_order())?;
    src_model.validate(src.depth())?;
    dst_model.validate(dst.depth())?;
    let src_codec = src_model.codec();
    let dst_codec = dst_model.codec();
    let kind = SourceKind::Direct {
        alpha: src_codec.alpha,
    };
    let Some(plan) = plan(src, dst, op, kind)? else {
        return Ok(());
    };

    if plan.alpha.is_opaque()
        && let Some(kernel) = ByteKernel::select(src_format, src_model, dst_format, dst_model)
    {
        debug!(
            "direct blit {:?} -> {:?}: byte path {kernel:?}, contiguous={}",
            src_format, dst_format, plan.grid.contiguous_x
        );
        move_bytes(src, dst, &plan.grid, kernel);
        return Ok(());
    }
    debug!("direct blit {src_format:?} -> {dst_format:?}: channel path");

    let read = src_format.reader();
    let read_dst = dst_format.reader();
    let write = dst_format.writer();
    let (src_data, src_stride) = (src.data(), src.stride());
    let dst_stride = dst.stride();
    let dst_data = dst.data_mut();
    for row in &plan.grid.rows {
        let s_row = row.src * src_stride;
        let d_row = row.dst * dst_stride;
        for tap in &plan.grid.cols {
            let raw = read(src_data, s_row, tap.src);
            let mut rgba = src_codec.decode(raw);
            match plan.alpha.coverage(tap.src, row.src, raw, rgba) {
                Coverage::Skip => continue,
                Coverage::Full => {}
                Coverage::Partial(alpha) => {
                    let under = dst_codec.decode(read_dst(dst_data, d_row, tap.dst));
                    for (v, q) in rgba.iter_mut().zip(under) {
                        *v = blend(q, *v, alpha);
                    }
                }
            }
            write(dst_data, d_row, tap.dst, dst_codec.encode(rgba));
        }
    }
    Ok(())
}
