//! Pixel storage layouts and their raw accessors.
//!
//! Every layout gets one read function and one write function. A blit picks
//! the pair once and calls through the function pointers, so the hot loop
//! never branches on depth. Accessors address pixels as `(row_offset, x)`,
//! where `row_offset` is the byte offset of the scanline and `x` is a pixel
//! column; packed layouts find the bit position from `x` themselves.
//!
//! All indexing is slice-checked. Callers validate regions up front so the
//! checks never fire.

use crate::error::BlitError;

/// Byte order of multi-byte pixels, or bit order of 1-bit pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// Most significant byte (or bit) first.
    #[default]
    MsbFirst,
    /// Least significant byte (or bit) first.
    LsbFirst,
}

impl ByteOrder {
    /// Conventional order for a depth: LSB-first for 16-bit, MSB-first otherwise.
    pub const fn default_for_depth(depth: u8) -> Self {
        if depth == 16 {
            Self::LsbFirst
        } else {
            Self::MsbFirst
        }
    }
}

/// Storage layout of one pixel, resolved from a depth, a byte order, and
/// whether the pixel is a palette index or a direct color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Indexed1 { order: ByteOrder },
    Indexed2,
    Indexed4,
    Indexed8,
    Direct8,
    Direct16 { order: ByteOrder },
    Direct24,
    Direct32 { order: ByteOrder },
}

pub(crate) type ReadFn = fn(&[u8], usize, usize) -> u32;
pub(crate) type WriteFn = fn(&mut [u8], usize, usize, u32);

impl PixelFormat {
    /// Layout for palette indices of `depth` bits.
    ///
    /// # Errors
    ///
    /// [`BlitError::UnsupportedDepth`] unless `depth` is 1, 2, 4 or 8.
    pub const fn indexed(depth: u8, order: ByteOrder) -> Result<Self, BlitError> {
        Ok(match depth {
            1 => Self::Indexed1 { order },
            2 => Self::Indexed2,
            4 => Self::Indexed4,
            8 => Self::Indexed8,
            _ => return Err(BlitError::UnsupportedDepth(depth)),
        })
    }

    /// Layout for direct colors of `depth` bits.
    ///
    /// # Errors
    ///
    /// [`BlitError::UnsupportedDepth`] unless `depth` is 8, 16, 24 or 32.
    pub const fn direct(depth: u8, order: ByteOrder) -> Result<Self, BlitError> {
        Ok(match depth {
            8 => Self::Direct8,
            16 => Self::Direct16 { order },
            24 => Self::Direct24,
            32 => Self::Direct32 { order },
            _ => return Err(BlitError::UnsupportedDepth(depth)),
        })
    }

    /// Layout used for kind-agnostic raw access: packed for sub-byte depths,
    /// direct otherwise.
    pub(crate) const fn raw(depth: u8, order: ByteOrder) -> Result<Self, BlitError> {
        if depth < 8 {
            Self::indexed(depth, order)
        } else {
            Self::direct(depth, order)
        }
    }

    pub const fn depth(self) -> u8 {
        match self {
            Self::Indexed1 { .. } => 1,
            Self::Indexed2 => 2,
            Self::Indexed4 => 4,
            Self::Indexed8 | Self::Direct8 => 8,
            Self::Direct16 { .. } => 16,
            Self::Direct24 => 24,
            Self::Direct32 { .. } => 32,
        }
    }

    /// Whole bytes per pixel, or `None` for layouts packing several pixels per byte.
    pub const fn bytes_per_pixel(self) -> Option<usize> {
        match self.depth() {
            d @ (8 | 16 | 24 | 32) => Some(d as usize / 8),
            _ => None,
        }
    }

    pub(crate) fn reader(self) -> ReadFn {
        match self {
            Self::Indexed1 { order: ByteOrder::MsbFirst } => read_1_msb,
            Self::Indexed1 { order: ByteOrder::LsbFirst } => read_1_lsb,
            Self::Indexed2 => read_2,
            Self::Indexed4 => read_4,
            Self::Indexed8 | Self::Direct8 => read_8,
            Self::Direct16 { order: ByteOrder::MsbFirst } => read_16_msb,
            Self::Direct16 { order: ByteOrder::LsbFirst } => read_16_lsb,
            Self::Direct24 => read_24,
            Self::Direct32 { order: ByteOrder::MsbFirst } => read_32_msb,
            Self::Direct32 { order: ByteOrder::LsbFirst } => read_32_lsb,
        }
    }

    pub(crate) fn writer(self) -> WriteFn {
        match self {
            Self::Indexed1 { order: ByteOrder::MsbFirst } => write_1_msb,
            Self::Indexed1 { order: ByteOrder::LsbFirst } => write_1_lsb,
            Self::Indexed2 => write_2,
            Self::Indexed4 => write_4,
            Self::Indexed8 | Self::Direct8 => write_8,
            Self::Direct16 { order: ByteOrder::MsbFirst } => write_16_msb,
            Self::Direct16 { order: ByteOrder::LsbFirst } => write_16_lsb,
            Self::Direct24 => write_24,
            Self::Direct32 { order: ByteOrder::MsbFirst } => write_32_msb,
            Self::Direct32 { order: ByteOrder::LsbFirst } => write_32_lsb,
        }
    }
}

// ===========================================================================
// Readers
// ===========================================================================

fn read_1_msb(data: &[u8], row: usize, x: usize) -> u32 {
    ((data[row + (x >> 3)] >> (7 - (x & 7))) & 1) as u32
}

fn read_1_lsb(data: &[u8], row: usize, x: usize) -> u32 {
    ((data[row + (x >> 3)] >> (x & 7)) & 1) as u32
}

fn read_2(data: &[u8], row: usize, x: usize) -> u32 {
    ((data[row + (x >> 2)] >> (6 - (x & 3) * 2)) & 0x03) as u32
}

fn read_4(data: &[u8], row: usize, x: usize) -> u32 {
    let b = data[row + (x >> 1)];
    if x & 1 != 0 {
        (b & 0x0F) as u32
    } else {
        (b >> 4) as u32
    }
}

fn read_8(data: &[u8], row: usize, x: usize) -> u32 {
    data[row + x] as u32
}

fn read_16_msb(data: &[u8], row: usize, x: usize) -> u32 {
    let o = row + x * 2;
    u16::from_be_bytes([data[o], data[o + 1]]) as u32
}

fn read_16_lsb(data: &[u8], row: usize, x: usize) -> u32 {
    let o = row + x * 2;
    u16::from_le_bytes([data[o], data[o + 1]]) as u32
}

// 24-bit pixels are always assembled MSB-first.
fn read_24(data: &[u8], row: usize, x: usize) -> u32 {
    let o = row + x * 3;
    ((data[o] as u32) << 16) | ((data[o + 1] as u32) << 8) | data[o + 2] as u32
}

fn read_32_msb(data: &[u8], row: usize, x: usize) -> u32 {
    let o = row + x * 4;
    u32::from_be_bytes([data[o], data[o + 1], data[o + 2], data[o + 3]])
}

fn read_32_lsb(data: &[u8], row: usize, x: usize) -> u32 {
    let o = row + x * 4;
    u32::from_le_bytes([data[o], data[o + 1], data[o + 2], data[o + 3]])
}

// ===========================================================================
// Writers
// ===========================================================================

fn write_1_msb(data: &mut [u8], row: usize, x: usize, v: u32) {
    let shift = 7 - (x & 7);
    let b = &mut data[row + (x >> 3)];
    *b = (*b & !(1 << shift)) | (((v & 1) as u8) << shift);
}

fn write_1_lsb(data: &mut [u8], row: usize, x: usize, v: u32) {
    let shift = x & 7;
    let b = &mut data[row + (x >> 3)];
    *b = (*b & !(1 << shift)) | (((v & 1) as u8) << shift);
}

fn write_2(data: &mut [u8], row: usize, x: usize, v: u32) {
    let shift = 6 - (x & 3) * 2;
    let b = &mut data[row + (x >> 2)];
    *b = (*b & !(0x03 << shift)) | (((v & 0x03) as u8) << shift);
}

fn write_4(data: &mut [u8], row: usize, x: usize, v: u32) {
    let b = &mut data[row + (x >> 1)];
    let v = (v & 0x0F) as u8;
    if x & 1 != 0 {
        *b = (*b & 0xF0) | v;
    } else {
        *b = (*b & 0x0F) | (v << 4);
    }
}

fn write_8(data: &mut [u8], row: usize, x: usize, v: u32) {
    data[row + x] = v as u8;
}

fn write_16_msb(data: &mut [u8], row: usize, x: usize, v: u32) {
    let o = row + x * 2;
    data[o..o + 2].copy_from_slice(&(v as u16).to_be_bytes());
}

fn write_16_lsb(data: &mut [u8], row: usize, x: usize, v: u32) {
    let o = row + x * 2;
    data[o..o + 2].copy_from_slice(&(v as u16).to_le_bytes());
}

fn write_24(data: &mut [u8], row: usize, x: usize, v: u32) {
    let o = row + x * 3;
    data[o] = (v >> 16) as u8;
    data[o + 1] = (v >> 8) as u8;
    data[o + 2] = v as u8;
}

fn write_32_msb(data: &mut [u8], row: usize, x: usize, v: u32) {
    let o = row + x * 4;
    data[o..o + 4].copy_from_slice(&v.to_be_bytes());
}

fn write_32_lsb(data: &mut [u8], row: usize, x: usize, v: u32) {
    let o = row + x * 4;
    data[o..o + 4].copy_from_slice(&v.to_le_bytes());
}
