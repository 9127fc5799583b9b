//! Channel mask decoding and bit-depth expansion tables.
//!
//! A direct-color channel is described by a mask. The mask's lowest set bit is
//! the channel's shift, and the run of set bits above it is its width. Raw
//! channel values of up to 8 bits are widened to 8 bits through
//! [`ANY_TO_EIGHT`], which replicates the bit pattern across the byte
//! (`0b101` at width 3 becomes `0b1011_0110`).

/// Expansion tables for channel widths 0 through 8.
///
/// Row `w` holds `2^w` meaningful entries; the rest are zero. Width 0 maps
/// everything to 0.
pub const ANY_TO_EIGHT: [[u8; 256]; 9] = build_any_to_eight();

const fn build_any_to_eight() -> [[u8; 256]; 9] {
    let mut tables = [[0u8; 256]; 9];
    let mut width = 1;
    while width <= 8 {
        let mut inc: u32 = 0;
        let mut bit: u32 = 0x10000 >> width;
        while bit != 0 {
            inc |= bit;
            bit >>= width;
        }
        let mut v: u32 = 0;
        let mut p = 0;
        while v < 0x10000 && p < 256 {
            tables[width][p] = (v >> 8) as u8;
            v += inc;
            p += 1;
        }
        width += 1;
    }
    tables
}

/// Bit position of the lowest set bit of `mask`, or 0 for an empty mask.
#[inline]
pub const fn shift(mask: u32) -> u32 {
    if mask == 0 { 0 } else { mask.trailing_zeros() }
}

/// Number of contiguous set bits in `mask` starting at `shift`.
#[inline]
pub const fn width(mask: u32, shift: u32) -> u32 {
    if shift >= 32 {
        return 0;
    }
    (mask >> shift).trailing_ones()
}

/// Table widening a `width`-bit value to 8 bits. Widths above 8 clamp to 8.
#[inline]
pub fn expand_to_eight(width: u32) -> &'static [u8] {
    let w = width.min(8) as usize;
    &ANY_TO_EIGHT[w][..1 << w]
}

/// Narrow an 8-bit value to `width` bits (`width` in `1..=8`).
#[inline]
pub const fn compress_from_eight(value: u8, width: u32) -> u32 {
    (value as u32) >> (8 - width)
}

/// One decoded channel of a direct pixel layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Channel {
    mask: u32,
    shift: u32,
    width: u32,
}

impl Channel {
    pub const fn from_mask(mask: u32) -> Self {
        let shift = shift(mask);
        Self {
            mask,
            shift,
            width: width(mask, shift),
        }
    }

    #[inline]
    pub const fn mask(self) -> u32 {
        self.mask
    }

    #[inline]
    pub const fn shift(self) -> u32 {
        self.shift
    }

    #[inline]
    pub const fn width(self) -> u32 {
        self.width
    }

    #[inline]
    pub const fn is_present(self) -> bool {
        self.width != 0
    }

    /// Read this channel from a raw pixel and widen it to 8 bits.
    ///
    /// Channels wider than 8 bits keep their top 8 bits.
    #[inline]
    pub fn extract(self, pixel: u32) -> u8 {
        match self.width {
            0 => 0,
            w @ 1..=8 => {
                let raw = ((pixel & self.mask) >> self.shift) & ((1 << w) - 1);
                ANY_TO_EIGHT[w as usize][raw as usize]
            }
            w => (((pixel & self.mask) >> self.shift) >> (w - 8)) as u8,
        }
    }

    /// Narrow an 8-bit value to this channel and shift it into position.
    ///
    /// Channels wider than 8 bits replicate the byte into the low bits.
    #[inline]
    pub fn place(self, value: u8) -> u32 {
        let raw = match self.width {
            0 => return 0,
            w @ 1..=8 => compress_from_eight(value, w),
            w => {
                let v = value as u32;
                let mut out = 0u32;
                let mut left = w;
                while left >= 8 {
                    out = (out << 8) | v;
                    left -= 8;
                }
                if left > 0 {
                    out = (out << left) | (v >> (8 - left));
                }
                out
            }
        };
        (raw << self.shift) & self.mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_and_width() {
        assert_eq!(shift(0), 0);
        assert_eq!(shift(0xFF0000), 16);
        assert_eq!(width(0xFF0000, 16), 8);
        assert_eq!(shift(0x7C00), 10);
        assert_eq!(width(0x7C00, 10), 5);
        assert_eq!(width(0, 0), 0);
        assert_eq!(width(0xFFFF_FFFF, 0), 32);
    }

    #[test]
    fn tables_replicate_bits() {
        assert_eq!(expand_to_eight(0), &[0]);
        assert_eq!(expand_to_eight(1), &[0, 255]);
        assert_eq!(expand_to_eight(2), &[0x00, 0x55, 0xAA, 0xFF]);
        let five = expand_to_eight(5);
        assert_eq!(five.len(), 32);
        assert_eq!(five[0], 0);
        assert_eq!(five[31], 0xFF);
        assert_eq!(five[16], 0x84);
        let eight = expand_to_eight(8);
        assert!(eight.iter().enumerate().all(|(i, &v)| v as usize == i));
    }

    #[test]
    fn extract_and_place_565() {
        let red = Channel::from_mask(0xF800);
        let green = Channel::from_mask(0x07E0);
        let blue = Channel::from_mask(0x001F);
        let px = 0xF800 | 0x0400 | 0x0001;
        assert_eq!(red.extract(px), 0xFF);
        assert_eq!(green.extract(px), 0x82);
        assert_eq!(blue.extract(px), 0x08);
        assert_eq!(red.place(0xFF), 0xF800);
        assert_eq!(green.place(0x82), 0x0400);
        assert_eq!(blue.place(0x08), 0x0001);
    }

    #[test]
    fn absent_channel_is_inert() {
        let none = Channel::from_mask(0);
        assert!(!none.is_present());
        assert_eq!(none.extract(0xFFFF_FFFF), 0);
        assert_eq!(none.place(0xFF), 0);
    }

    #[test]
    fn wide_channel_round_trips_top_bits() {
        let ten = Channel::from_mask(0x3FF << 20);
        assert_eq!(ten.width(), 10);
        assert_eq!(ten.extract(0x3FF << 20), 0xFF);
        assert_eq!(ten.extract(0x200 << 20), 0x80);
        assert_eq!(ten.place(0xFF), 0x3FF << 20);
        assert_eq!(ten.place(0x00), 0);
    }
}
