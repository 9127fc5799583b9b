use core::fmt;

/// Errors returned by buffer construction and blits.
///
/// Every check runs before the destination is touched, so an `Err` means the
/// destination bytes are unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum BlitError {
    /// The bit depth is not valid for the pixel kind it was paired with.
    ///
    /// Buffers accept 1, 2, 4, 8, 16, 24 and 32. Indexed models accept
    /// 1, 2, 4 and 8; direct models accept 8, 16, 24 and 32.
    UnsupportedDepth(u8),
    /// A structural input is missing, empty, or out of range.
    InvalidArgument(ArgumentError),
}

/// The specific structural fault behind [`BlitError::InvalidArgument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArgumentError {
    /// Width or height is zero.
    ZeroDimensions,
    /// Scanline padding must be at least one byte.
    ZeroScanlinePad,
    /// Stride is smaller than one packed row.
    StrideTooSmall,
    /// The byte buffer is shorter than `stride * height`.
    BufferTooSmall,
    /// An indexed model has no palette entries.
    EmptyPalette,
    /// A direct model has an empty color mask or a mask wider than the depth.
    InvalidMask,
    /// A source or destination rectangle extends past its buffer.
    RegionOutOfBounds,
    /// A source rectangle has a zero extent while the destination does not.
    EmptySourceRegion,
    /// An alpha plane does not cover the source region.
    AlphaPlaneTooSmall,
    /// Embedded alpha was requested from a source with no alpha channel.
    NoAlphaChannel,
    /// The alpha source cannot apply to this kind of source pixel.
    AlphaModeMismatch,
    /// A scale factor is NaN, infinite, or rounds to an empty image.
    NonFiniteScale,
    /// The pixel data would not fit in memory.
    TooLarge,
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ZeroDimensions => "width and height must be non-zero",
            Self::ZeroScanlinePad => "scanline pad must be non-zero",
            Self::StrideTooSmall => "stride is smaller than one row of pixels",
            Self::BufferTooSmall => "buffer is smaller than stride * height",
            Self::EmptyPalette => "palette has no entries",
            Self::InvalidMask => "color mask is empty or exceeds the pixel depth",
            Self::RegionOutOfBounds => "region extends past the buffer",
            Self::EmptySourceRegion => "source region is empty",
            Self::AlphaPlaneTooSmall => "alpha plane does not cover the source region",
            Self::NoAlphaChannel => "source has no alpha channel",
            Self::AlphaModeMismatch => "alpha source does not apply to this pixel kind",
            Self::NonFiniteScale => "scale factor is not a finite positive size",
            Self::TooLarge => "pixel data does not fit in memory",
        })
    }
}

impl fmt::Display for BlitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedDepth(depth) => write!(f, "unsupported bit depth: {depth}"),
            Self::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
        }
    }
}

impl core::error::Error for BlitError {}

impl From<ArgumentError> for BlitError {
    fn from(reason: ArgumentError) -> Self {
        Self::InvalidArgument(reason)
    }
}
