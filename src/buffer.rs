use alloc::vec::Vec;

use crate::error::{ArgumentError, BlitError};
use crate::format::{ByteOrder, PixelFormat};

const DEPTHS: [u8; 7] = [1, 2, 4, 8, 16, 24, 32];

/// A rectangle of pixels, in pixel units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle at the origin.
    pub const fn sized(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn fits_within(&self, width: usize, height: usize) -> bool {
        matches!(self.x.checked_add(self.width), Some(r) if r <= width)
            && matches!(self.y.checked_add(self.height), Some(b) if b <= height)
    }
}

/// An owned raster: packed rows of `depth`-bit pixels.
///
/// Rows start every `stride` bytes. Pixels narrower than a byte are packed
/// most-significant-first, except 1-bit pixels with
/// [`ByteOrder::LsbFirst`]. The byte order also decides how 16- and 32-bit
/// pixels are assembled; 24-bit pixels are always MSB-first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    depth: u8,
    stride: usize,
    scanline_pad: usize,
    byte_order: ByteOrder,
    data: Vec<u8>,
}

// ===========================================================================
// Validation helpers
// ===========================================================================

#[inline]
fn check_depth(depth: u8) -> Result<(), BlitError> {
    if DEPTHS.contains(&depth) {
        Ok(())
    } else {
        Err(BlitError::UnsupportedDepth(depth))
    }
}

#[inline]
fn min_row_bytes(width: usize, depth: u8) -> Result<usize, BlitError> {
    width
        .checked_mul(depth as usize)
        .and_then(|bits| bits.checked_add(7))
        .map(|bits| bits / 8)
        .ok_or(ArgumentError::StrideTooSmall.into())
}

#[inline]
fn check_strided(
    len: usize,
    width: usize,
    height: usize,
    stride: usize,
    depth: u8,
) -> Result<(), BlitError> {
    if width == 0 || height == 0 {
        return Err(ArgumentError::ZeroDimensions.into());
    }
    if min_row_bytes(width, depth)? > stride {
        return Err(ArgumentError::StrideTooSmall.into());
    }
    let total = stride
        .checked_mul(height)
        .ok_or(ArgumentError::BufferTooSmall)?;
    if len < total {
        return Err(ArgumentError::BufferTooSmall.into());
    }
    Ok(())
}

/// Zeroed pixel storage, failing instead of aborting when memory runs out.
fn zeroed(stride: usize, height: usize) -> Result<Vec<u8>, BlitError> {
    let len = stride
        .checked_mul(height)
        .ok_or(ArgumentError::TooLarge)?;
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| ArgumentError::TooLarge)?;
    data.resize(len, 0);
    Ok(data)
}

/// Bytes per scanline for `width` pixels of `depth` bits, rounded up to a
/// multiple of `pad` bytes.
///
/// # Errors
///
/// [`ArgumentError::ZeroScanlinePad`] for a zero pad.
pub fn padded_stride(width: usize, depth: u8, pad: usize) -> Result<usize, BlitError> {
    if pad == 0 {
        return Err(ArgumentError::ZeroScanlinePad.into());
    }
    let row = min_row_bytes(width, depth)?;
    row.div_ceil(pad)
        .checked_mul(pad)
        .ok_or(ArgumentError::StrideTooSmall.into())
}

impl PixelBuffer {
    /// Allocate a zeroed buffer whose scanlines are padded to `scanline_pad` bytes.
    ///
    /// The byte order defaults to [`ByteOrder::default_for_depth`].
    ///
    /// # Errors
    ///
    /// - [`BlitError::UnsupportedDepth`] for a depth outside 1, 2, 4, 8, 16, 24, 32.
    /// - [`ArgumentError::ZeroDimensions`] or [`ArgumentError::ZeroScanlinePad`].
    /// - [`ArgumentError::TooLarge`] if the pixels cannot be allocated.
    pub fn new(
        width: usize,
        height: usize,
        depth: u8,
        scanline_pad: usize,
    ) -> Result<Self, BlitError> {
        check_depth(depth)?;
        if width == 0 || height == 0 {
            return Err(ArgumentError::ZeroDimensions.into());
        }
        let stride = padded_stride(width, depth, scanline_pad)?;
        let data = zeroed(stride, height)?;
        Ok(Self {
            width,
            height,
            depth,
            stride,
            scanline_pad,
            byte_order: ByteOrder::default_for_depth(depth),
            data,
        })
    }

    /// Wrap existing pixel bytes. The scanline pad is recorded as 1.
    ///
    /// # Errors
    ///
    /// - [`BlitError::UnsupportedDepth`] for a depth outside 1, 2, 4, 8, 16, 24, 32.
    /// - [`ArgumentError::StrideTooSmall`] if a row does not fit in `stride`.
    /// - [`ArgumentError::BufferTooSmall`] if `data` is shorter than `stride * height`.
    pub fn from_vec(
        width: usize,
        height: usize,
        depth: u8,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self, BlitError> {
        check_depth(depth)?;
        check_strided(data.len(), width, height, stride, depth)?;
        Ok(Self {
            width,
            height,
            depth,
            stride,
            scanline_pad: 1,
            byte_order: ByteOrder::default_for_depth(depth),
            data,
        })
    }

    /// Replace the byte order.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Bytes per scanline.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Row alignment in bytes used by [`new`](Self::new), [`repadded`](Self::repadded)
    /// and scaled copies.
    pub fn scanline_pad(&self) -> usize {
        self.scanline_pad
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// The whole buffer as a rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::sized(self.width, self.height)
    }

    /// Bytes of one scanline, excluding padding.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        let start = y.checked_mul(self.stride)?;
        let len = min_row_bytes(self.width, self.depth).ok()?;
        self.data.get(start..start + len)
    }

    pub(crate) fn check_rect(&self, rect: &Rect) -> Result<(), BlitError> {
        if rect.fits_within(self.width, self.height) {
            Ok(())
        } else {
            Err(ArgumentError::RegionOutOfBounds.into())
        }
    }

    fn raw_format(&self) -> Result<PixelFormat, BlitError> {
        PixelFormat::raw(self.depth, self.byte_order)
    }

    /// Raw pixel value at `(x, y)`: a palette index or packed direct bits.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::RegionOutOfBounds`] outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Result<u32, BlitError> {
        self.check_rect(&Rect::new(x, y, 1, 1))?;
        let read = self.raw_format()?.reader();
        Ok(read(&self.data, y * self.stride, x))
    }

    /// Store a raw pixel value at `(x, y)`. Bits above the depth are dropped.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::RegionOutOfBounds`] outside the buffer.
    pub fn set_pixel(&mut self, x: usize, y: usize, value: u32) -> Result<(), BlitError> {
        self.check_rect(&Rect::new(x, y, 1, 1))?;
        let write = self.raw_format()?.writer();
        write(&mut self.data, y * self.stride, x, value);
        Ok(())
    }

    /// Read `out.len()` consecutive pixels of row `y`, starting at column `x`.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::RegionOutOfBounds`] if the run leaves the buffer.
    pub fn pixels(&self, x: usize, y: usize, out: &mut [u32]) -> Result<(), BlitError> {
        self.check_rect(&Rect::new(x, y, out.len(), 1))?;
        let read = self.raw_format()?.reader();
        let row = y * self.stride;
        for (i, v) in out.iter_mut().enumerate() {
            *v = read(&self.data, row, x + i);
        }
        Ok(())
    }

    /// Write consecutive pixels of row `y`, starting at column `x`.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::RegionOutOfBounds`] if the run leaves the buffer.
    pub fn set_pixels(&mut self, x: usize, y: usize, values: &[u32]) -> Result<(), BlitError> {
        self.check_rect(&Rect::new(x, y, values.len(), 1))?;
        let write = self.raw_format()?.writer();
        let row = y * self.stride;
        for (i, &v) in values.iter().enumerate() {
            write(&mut self.data, row, x + i, v);
        }
        Ok(())
    }

    /// Copy into a new buffer whose scanlines are padded to `scanline_pad` bytes.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::ZeroScanlinePad`] for a zero pad.
    pub fn repadded(&self, scanline_pad: usize) -> Result<Self, BlitError> {
        let stride = padded_stride(self.width, self.depth, scanline_pad)?;
        if stride == self.stride {
            return Ok(Self {
                scanline_pad,
                ..self.clone()
            });
        }
        let row_bytes = min_row_bytes(self.width, self.depth)?;
        let mut data = zeroed(stride, self.height)?;
        for (dst, src) in data
            .chunks_exact_mut(stride)
            .zip(self.data.chunks(self.stride))
        {
            dst[..row_bytes].copy_from_slice(&src[..row_bytes]);
        }
        Ok(Self {
            stride,
            scanline_pad,
            data,
            ..*self
        })
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use alloc::vec;

    #[test]
    fn stride_padding() {
        assert_eq!(padded_stride(3, 1, 1), Ok(1));
        assert_eq!(padded_stride(9, 1, 1), Ok(2));
        assert_eq!(padded_stride(9, 1, 4), Ok(4));
        assert_eq!(padded_stride(5, 24, 4), Ok(16));
        assert_eq!(padded_stride(3, 4, 2), Ok(2));
        assert_eq!(
            padded_stride(3, 8, 0),
            Err(BlitError::InvalidArgument(ArgumentError::ZeroScanlinePad))
        );
    }

    #[test]
    fn new_validates() {
        assert_eq!(
            PixelBuffer::new(4, 4, 3, 1),
            Err(BlitError::UnsupportedDepth(3))
        );
        assert_eq!(
            PixelBuffer::new(0, 4, 8, 1),
            Err(BlitError::InvalidArgument(ArgumentError::ZeroDimensions))
        );
        let buf = PixelBuffer::new(5, 2, 24, 4).unwrap();
        assert_eq!(buf.stride(), 16);
        assert_eq!(buf.data().len(), 32);
        assert_eq!(buf.byte_order(), ByteOrder::MsbFirst);
        let buf16 = PixelBuffer::new(5, 2, 16, 4).unwrap();
        assert_eq!(buf16.byte_order(), ByteOrder::LsbFirst);
    }

    #[test]
    fn from_vec_validates() {
        assert_eq!(
            PixelBuffer::from_vec(4, 2, 8, 3, vec![0; 8]),
            Err(BlitError::InvalidArgument(ArgumentError::StrideTooSmall))
        );
        assert_eq!(
            PixelBuffer::from_vec(4, 2, 8, 4, vec![0; 7]),
            Err(BlitError::InvalidArgument(ArgumentError::BufferTooSmall))
        );
        assert!(PixelBuffer::from_vec(4, 2, 8, 4, vec![0; 8]).is_ok());
    }

    #[test]
    fn pixel_access() {
        let mut buf = PixelBuffer::new(10, 2, 4, 1).unwrap();
        buf.set_pixel(3, 1, 0xA).unwrap();
        buf.set_pixel(4, 1, 0x1F).unwrap();
        assert_eq!(buf.pixel(3, 1), Ok(0xA));
        assert_eq!(buf.pixel(4, 1), Ok(0xF));
        assert_eq!(buf.data()[5 + 1], 0x0A);
        assert_eq!(buf.data()[5 + 2], 0xF0);
        assert_eq!(
            buf.pixel(10, 0),
            Err(BlitError::InvalidArgument(ArgumentError::RegionOutOfBounds))
        );

        let mut run = [0u32; 3];
        buf.pixels(2, 1, &mut run).unwrap();
        assert_eq!(run, [0, 0xA, 0xF]);
        buf.set_pixels(0, 0, &[1, 2, 3]).unwrap();
        assert_eq!(&buf.data()[..2], &[0x12, 0x30]);
    }

    #[test]
    fn repad_keeps_rows() {
        let buf = PixelBuffer::from_vec(3, 2, 8, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let wide = buf.repadded(4).unwrap();
        assert_eq!(wide.stride(), 4);
        assert_eq!(wide.scanline_pad(), 4);
        assert_eq!(wide.data(), &[1, 2, 3, 0, 4, 5, 6, 0]);
        assert_eq!(wide.row(1), Some(&[4u8, 5, 6][..]));
    }
}
