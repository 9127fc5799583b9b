//! # tailor
//!
//! *Alter your pixels to fit.*
//!
//! Copies rectangular regions between raster buffers whose pixels may be
//! laid out differently: palette indices of 1, 2, 4 or 8 bits, or packed
//! direct color of 8, 16, 24 or 32 bits described by channel masks. A blit
//! stretches or shrinks with nearest-neighbor sampling, mirrors on either
//! axis, applies one of several alpha sources, and can dither when an
//! indexed destination cannot hold the source colors exactly.
//!
//! ```rust
//! use tailor::{Blit, ColorModel, DirectModel, Palette, PixelBuffer, Rect, blit};
//!
//! // A 2-bit indexed source, scaled 2x into 24-bit RGB.
//! let palette = Palette::from_rgb_bytes(&[0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255]).unwrap();
//! let src = PixelBuffer::from_vec(4, 1, 2, 1, vec![0b00_01_10_11]).unwrap();
//! let mut dst = PixelBuffer::new(8, 2, 24, 4).unwrap();
//! let rgb = DirectModel::rgb(0xFF_0000, 0xFF00, 0xFF);
//!
//! let op = Blit::new(Rect::sized(4, 1), Rect::sized(8, 2));
//! blit(&src, &ColorModel::Indexed(palette), &mut dst, &ColorModel::Direct(rgb), &op).unwrap();
//! assert_eq!(&dst.row(1).unwrap()[6..9], &[255, 0, 0]);
//! ```
//!
//! Same-layout copies and a few byte-reordering conversions run through
//! SIMD row kernels on x86-64 AVX2, with a scalar fallback everywhere else.
//!
//! ## Feature flags
//!
//! - **`std`** (default): runtime CPU feature detection.
//! - **`imgref`**: [`img`] hand-off to and from `ImgVec<RGBA8>`.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod alpha;
pub mod blit;
mod buffer;
pub mod channel;
pub mod dither;
mod error;
pub mod format;
pub mod gradient;
mod model;
mod resize;
mod rows;
pub mod scale;
mod transparency;

#[cfg(feature = "imgref")]
pub mod img;

pub use alpha::{AlphaPlane, AlphaSource};
pub use blit::{
    Blit, blit, direct_to_direct, direct_to_indexed, indexed_to_direct, indexed_to_indexed,
};
pub use buffer::{PixelBuffer, Rect, padded_stride};
pub use dither::{DITHER_MATRIX, ErrorDiffusion};
pub use error::{ArgumentError, BlitError};
pub use format::{ByteOrder, PixelFormat};
pub use gradient::{GradientBand, fill_gradient, gradient_band};
pub use model::{ColorModel, DirectModel, Palette};
pub use rgb::RGB8;
pub use scale::{ScaleStep, Scaler};
pub use transparency::TransparencyKey;
