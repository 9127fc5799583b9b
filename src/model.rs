//! Color models: what a raw pixel value means.

use alloc::vec::Vec;

use rgb::RGB8;

use crate::buffer::PixelBuffer;
use crate::channel::Channel;
use crate::error::{ArgumentError, BlitError};
use crate::format::PixelFormat;

/// Bit masks locating each channel inside a direct-color pixel.
///
/// Masks are expected not to overlap. An `alpha_mask` of 0 means the layout
/// has no alpha channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct DirectModel {
    pub red_mask: u32,
    pub green_mask: u32,
    pub blue_mask: u32,
    pub alpha_mask: u32,
}

impl DirectModel {
    pub const fn rgb(red_mask: u32, green_mask: u32, blue_mask: u32) -> Self {
        Self {
            red_mask,
            green_mask,
            blue_mask,
            alpha_mask: 0,
        }
    }

    pub const fn with_alpha(mut self, alpha_mask: u32) -> Self {
        self.alpha_mask = alpha_mask;
        self
    }

    /// The same layout with each mask's bytes reversed.
    pub const fn swap_bytes(self) -> Self {
        Self {
            red_mask: self.red_mask.swap_bytes(),
            green_mask: self.green_mask.swap_bytes(),
            blue_mask: self.blue_mask.swap_bytes(),
            alpha_mask: self.alpha_mask.swap_bytes(),
        }
    }

    pub const fn has_alpha(&self) -> bool {
        self.alpha_mask != 0
    }

    pub(crate) fn validate(&self, depth: u8) -> Result<(), BlitError> {
        let limit = if depth >= 32 {
            u32::MAX
        } else {
            (1u32 << depth) - 1
        };
        let color = [self.red_mask, self.green_mask, self.blue_mask];
        if color.contains(&0) {
            return Err(ArgumentError::InvalidMask.into());
        }
        if color
            .iter()
            .chain(core::iter::once(&self.alpha_mask))
            .any(|&m| m & !limit != 0)
        {
            return Err(ArgumentError::InvalidMask.into());
        }
        Ok(())
    }

    pub(crate) fn codec(&self) -> DirectCodec {
        DirectCodec {
            red: Channel::from_mask(self.red_mask),
            green: Channel::from_mask(self.green_mask),
            blue: Channel::from_mask(self.blue_mask),
            alpha: Channel::from_mask(self.alpha_mask),
        }
    }

    /// Pack a color into this layout. The alpha channel, if any, is left at 0.
    pub fn pixel(&self, color: RGB8) -> u32 {
        let c = self.codec();
        c.red.place(color.r) | c.green.place(color.g) | c.blue.place(color.b)
    }

    /// Unpack the color channels of a pixel in this layout.
    pub fn color(&self, pixel: u32) -> RGB8 {
        let c = self.codec();
        RGB8::new(c.red.extract(pixel), c.green.extract(pixel), c.blue.extract(pixel))
    }
}

/// Decoded channels of a [`DirectModel`], built once per blit.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DirectCodec {
    pub red: Channel,
    pub green: Channel,
    pub blue: Channel,
    pub alpha: Channel,
}

impl DirectCodec {
    /// Channels widened to 8 bits as `[r, g, b, a]`. A missing alpha reads as 255.
    #[inline]
    pub fn decode(&self, pixel: u32) -> [i32; 4] {
        let a = if self.alpha.is_present() {
            self.alpha.extract(pixel)
        } else {
            0xFF
        };
        [
            self.red.extract(pixel) as i32,
            self.green.extract(pixel) as i32,
            self.blue.extract(pixel) as i32,
            a as i32,
        ]
    }

    #[inline]
    pub fn encode(&self, [r, g, b, a]: [i32; 4]) -> u32 {
        self.red.place(r as u8)
            | self.green.place(g as u8)
            | self.blue.place(b as u8)
            | self.alpha.place(a as u8)
    }
}

/// An ordered, non-empty list of colors. A pixel value is an index into it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Palette {
    colors: Vec<RGB8>,
}

impl Palette {
    /// # Errors
    ///
    /// [`ArgumentError::EmptyPalette`] if `colors` is empty.
    pub fn new(colors: impl Into<Vec<RGB8>>) -> Result<Self, BlitError> {
        let colors = colors.into();
        if colors.is_empty() {
            return Err(ArgumentError::EmptyPalette.into());
        }
        Ok(Self { colors })
    }

    /// Build a palette from packed `r, g, b` byte triples. A trailing partial
    /// triple is ignored.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::EmptyPalette`] if there is no complete triple.
    pub fn from_rgb_bytes(bytes: &[u8]) -> Result<Self, BlitError> {
        let whole = bytes.len() - bytes.len() % 3;
        Self::new(bytemuck::cast_slice::<u8, RGB8>(&bytes[..whole]).to_vec())
    }

    /// Two entries: black then white.
    pub fn black_and_white() -> Self {
        Self {
            colors: alloc::vec![RGB8::new(0, 0, 0), RGB8::new(0xFF, 0xFF, 0xFF)],
        }
    }

    pub fn colors(&self) -> &[RGB8] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The palette as packed `r, g, b` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Entry at `index`; indices past the end read as black.
    #[inline]
    pub fn color(&self, index: u32) -> RGB8 {
        self.colors
            .get(index as usize)
            .copied()
            .unwrap_or_default()
    }

    /// Index of the first entry equal to `color`.
    pub fn index_of(&self, color: RGB8) -> Option<usize> {
        self.colors.iter().position(|&c| c == color)
    }

    /// Nearest entry among the first `limit` by squared RGB distance.
    ///
    /// Ties go to the lowest index; an exact match ends the search early.
    /// Returns the index and its squared distance.
    pub fn nearest(&self, [r, g, b]: [i32; 3], limit: usize) -> (u32, i32) {
        let mut best = 0;
        let mut min_distance = i32::MAX;
        for (j, c) in self.colors.iter().take(limit).enumerate() {
            let dr = c.r as i32 - r;
            let dg = c.g as i32 - g;
            let db = c.b as i32 - b;
            let distance = dr * dr + dg * dg + db * db;
            if distance < min_distance {
                best = j;
                min_distance = distance;
                if distance == 0 {
                    break;
                }
            }
        }
        (best as u32, min_distance)
    }
}

/// How raw pixel values map to color.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColorModel {
    /// Channels packed into the pixel bits.
    Direct(DirectModel),
    /// Pixel values index a palette.
    Indexed(Palette),
}

impl ColorModel {
    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Direct(_))
    }

    /// Resolve the storage layout of `buffer` under this model.
    ///
    /// # Errors
    ///
    /// - [`BlitError::UnsupportedDepth`] if the depth does not suit the model.
    /// - [`ArgumentError::InvalidMask`] for a direct model whose masks do not fit.
    pub fn format_of(&self, buffer: &PixelBuffer) -> Result<PixelFormat, BlitError> {
        match self {
            Self::Direct(direct) => {
                let format = PixelFormat::direct(buffer.depth(), buffer.byte_order())?;
                direct.validate(buffer.depth())?;
                Ok(format)
            }
            Self::Indexed(_) => PixelFormat::indexed(buffer.depth(), buffer.byte_order()),
        }
    }

    /// Color of a raw pixel value.
    pub fn color(&self, pixel: u32) -> RGB8 {
        match self {
            Self::Direct(direct) => direct.color(pixel),
            Self::Indexed(palette) => palette.color(pixel),
        }
    }

    /// Raw pixel value closest to `color` for a buffer of `depth` bits.
    ///
    /// Direct models pack the channels. Indexed models search the first
    /// `2^depth` palette entries.
    pub fn closest_pixel(&self, color: RGB8, depth: u8) -> u32 {
        match self {
            Self::Direct(direct) => direct.pixel(color),
            Self::Indexed(palette) => {
                let limit = 1usize << depth.min(8);
                let (index, _) = palette.nearest(
                    [color.r as i32, color.g as i32, color.b as i32],
                    limit,
                );
                index
            }
        }
    }
}
