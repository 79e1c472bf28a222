use crate::foundation::error::{PixmapError, PixmapResult};

/// Row stride of every raster is a multiple of this many bytes.
pub const ROW_ALIGN: usize = 16;

/// Zero-filled slack appended to coded buffers so decoders may overread.
pub const CODED_PAD: usize = 32;

/// Extra bytes allocated past the last raster row for scalers that write ahead.
pub const SCALER_SLACK: usize = 8;

/// Initial slot capacity of a vector canvas.
pub const VECTOR_INITIAL_CAPACITY: usize = 256;

/// In-memory layout of a raster image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    /// 1 byte: intensity.
    I,
    /// 2 bytes: intensity, alpha.
    Ia,
    /// 3 bytes: R, G, B. No alpha.
    Rgb24,
    /// 4 bytes: the value `A<<24 | B<<16 | G<<8 | R` stored little-endian,
    /// i.e. bytes R, G, B, A.
    Bgr32,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::I => 1,
            Self::Ia => 2,
            Self::Rgb24 => 3,
            Self::Bgr32 => 4,
        }
    }

    /// Byte offset of the alpha channel inside one pixel.
    pub const fn alpha_offset(self) -> Option<usize> {
        match self {
            Self::Ia => Some(1),
            Self::Bgr32 => Some(3),
            Self::I | Self::Rgb24 => None,
        }
    }
}

/// Encoding of a coded (not yet decoded) image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CodedFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Webp,
    /// Vector image; decoded by the vector rasterizer, not the bitmap decoder.
    Svg,
}

impl CodedFormat {
    pub const fn is_vector(self) -> bool {
        matches!(self, Self::Svg)
    }
}

/// EXIF-style orientation, numbered from 0.
///
/// Codes at or above [`Orientation::Transpose`] exchange width and height when
/// interpreting the aspect ratio.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 0,
    MirrorX = 1,
    Rotate180 = 2,
    MirrorY = 3,
    Transpose = 4,
    Rotate90 = 5,
    Transverse = 6,
    Rotate270 = 7,
}

impl Orientation {
    /// Build from the 0-based code. Out-of-range values are rejected.
    pub fn from_code(code: u8) -> PixmapResult<Self> {
        Ok(match code {
            0 => Self::Normal,
            1 => Self::MirrorX,
            2 => Self::Rotate180,
            3 => Self::MirrorY,
            4 => Self::Transpose,
            5 => Self::Rotate90,
            6 => Self::Transverse,
            7 => Self::Rotate270,
            _ => {
                return Err(PixmapError::validation(format!(
                    "orientation code out of range: {code}"
                )));
            }
        })
    }

    /// Build from the EXIF tag value (1-8). Unknown values map to `Normal`.
    pub fn from_exif(value: u16) -> Self {
        match value {
            1..=8 => Self::from_code((value - 1) as u8).unwrap_or_default(),
            _ => Self::Normal,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn swaps_dimensions(self) -> bool {
        self >= Self::Transpose
    }

    /// Aspect ratio of a `width` x `height` picture as displayed with this orientation.
    pub fn aspect(self, width: u32, height: u32) -> f32 {
        let (w, h) = if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        };
        if h == 0 {
            return 0.0;
        }
        w as f32 / h as f32
    }
}

bitflags::bitflags! {
    /// Per-image flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
    pub struct PixmapFlags: u8 {
        /// A colour-setting opcode was emitted into the vector stream.
        const COLORIZED = 1 << 0;
        /// The raster was produced by the thumbnail sizing rule.
        const THUMBNAIL = 1 << 1;
    }
}

bitflags::bitflags! {
    /// Which corners the rounded-corner masker cuts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
    pub struct Corners: u8 {
        const TOP_LEFT = 1 << 0;
        const TOP_RIGHT = 1 << 1;
        const BOTTOM_LEFT = 1 << 2;
        const BOTTOM_RIGHT = 1 << 3;
        const ALL = Self::TOP_LEFT.bits()
            | Self::TOP_RIGHT.bits()
            | Self::BOTTOM_LEFT.bits()
            | Self::BOTTOM_RIGHT.bits();
    }
}

/// Straight (non-premultiplied) RGBA8 colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack `A<<24 | B<<16 | G<<8 | R`.
    pub const fn from_packed(v: u32) -> Self {
        Self {
            r: v as u8,
            g: (v >> 8) as u8,
            b: (v >> 16) as u8,
            a: (v >> 24) as u8,
        }
    }

    pub const fn to_packed(self) -> u32 {
        (self.a as u32) << 24 | (self.b as u32) << 16 | (self.g as u32) << 8 | self.r as u32
    }

    /// True when the RGB channels are not all equal.
    pub fn is_not_gray(self) -> bool {
        self.r != self.g || self.g != self.b
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
