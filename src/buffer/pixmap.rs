use std::ops::Deref;
use std::sync::{Arc, Weak};

use crate::buffer::vector::VectorCanvas;
use crate::foundation::core::{
    CODED_PAD, CodedFormat, Orientation, PixelFormat, PixmapFlags, ROW_ALIGN, SCALER_SLACK,
};
use crate::foundation::error::{PixmapError, PixmapResult};
use crate::foundation::math::{checked_area, round_up, try_alloc};

/// An image still in encoded form. Dimensions are unknown until decoded.
#[derive(Clone, Debug)]
pub struct CodedImage {
    data: Vec<u8>,
    size: usize,
    format: CodedFormat,
    orientation: Orientation,
    flags: PixmapFlags,
}

impl CodedImage {
    /// Copy `bytes` into a new buffer followed by [`CODED_PAD`] zero bytes.
    pub fn alloc(bytes: &[u8], format: CodedFormat) -> PixmapResult<Self> {
        let mut data = try_alloc::<u8>(bytes.len() + CODED_PAD)?;
        data[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            data,
            size: bytes.len(),
            format,
            orientation: Orientation::Normal,
            flags: PixmapFlags::empty(),
        })
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// The encoded bytes, without padding.
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.size]
    }

    /// The encoded bytes followed by the zeroed pad region.
    pub fn padded_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn format(&self) -> CodedFormat {
        self.format
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn flags(&self) -> PixmapFlags {
        self.flags
    }

    /// Width sentinel: always -1 for an undecoded image.
    pub fn width(&self) -> i32 {
        -1
    }

    /// Height sentinel: always -1 for an undecoded image.
    pub fn height(&self) -> i32 {
        -1
    }
}

/// A decoded image in one of the fixed [`PixelFormat`] layouts.
///
/// `width`/`height` describe the visible area; `margin` pixels are reserved on
/// every edge. Row `y` of the full buffer starts at `y * linesize`.
#[derive(Clone, Debug)]
pub struct Raster {
    format: PixelFormat,
    width: u32,
    height: u32,
    margin: u32,
    linesize: usize,
    data: Vec<u8>,
    aspect: f32,
    orientation: Orientation,
    flags: PixmapFlags,
    char_positions: Vec<i32>,
}

impl Raster {
    /// Allocate a zero-filled raster of `width` x `height` plus `margin` on each edge.
    pub fn new(width: u32, height: u32, format: PixelFormat, margin: u32) -> PixmapResult<Self> {
        let full_w = width as usize + 2 * margin as usize;
        let full_h = height as usize + 2 * margin as usize;
        let linesize = round_up(
            checked_area(full_w, format.bytes_per_pixel())?,
            ROW_ALIGN,
        );
        let len = checked_area(linesize, full_h)?
            .checked_add(SCALER_SLACK)
            .ok_or_else(|| PixmapError::out_of_memory("raster size overflow"))?;
        let data = try_alloc::<u8>(len)?;

        Ok(Self {
            format,
            width,
            height,
            margin,
            linesize,
            data,
            aspect: Orientation::Normal.aspect(width, height),
            orientation: Orientation::Normal,
            flags: PixmapFlags::empty(),
            char_positions: Vec::new(),
        })
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Visible width, excluding margins.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Visible height, excluding margins.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    /// Width including both margins.
    pub fn full_width(&self) -> usize {
        self.width as usize + 2 * self.margin as usize
    }

    /// Height including both margins.
    pub fn full_height(&self) -> usize {
        self.height as usize + 2 * self.margin as usize
    }

    /// Row stride in bytes, a multiple of [`ROW_ALIGN`].
    pub fn linesize(&self) -> usize {
        self.linesize
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Pixel rows including margins, without the trailing scaler slack.
    pub fn data(&self) -> &[u8] {
        &self.data[..self.linesize * self.full_height()]
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        let len = self.linesize * self.full_height();
        &mut self.data[..len]
    }

    /// Row `y` of the full buffer (margin rows included), `linesize` bytes long.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.linesize;
        &self.data[start..start + self.linesize]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.linesize;
        &mut self.data[start..start + self.linesize]
    }

    /// Byte offset of visible pixel `(x, y)`, i.e. measured inside the margin.
    pub fn pixel_offset(&self, x: usize, y: usize) -> usize {
        let m = self.margin as usize;
        (y + m) * self.linesize + (x + m) * self.bytes_per_pixel()
    }

    /// Bytes of visible pixel `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let off = self.pixel_offset(x, y);
        &self.data[off..off + self.bytes_per_pixel()]
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn flags(&self) -> PixmapFlags {
        self.flags
    }

    pub fn insert_flags(&mut self, flags: PixmapFlags) {
        self.flags.insert(flags);
    }

    /// Glyph x positions recorded by a text renderer, if any.
    pub fn char_positions(&self) -> &[i32] {
        &self.char_positions
    }

    pub fn set_char_positions(&mut self, positions: Vec<i32>) {
        self.char_positions = positions;
    }

    /// Copy `rows` rows of `row_bytes` bytes from `src` (stride `src_stride`)
    /// into the visible area, honouring both strides.
    pub(crate) fn copy_rows_from(
        &mut self,
        src: &[u8],
        src_stride: usize,
        rows: usize,
        row_bytes: usize,
    ) {
        let origin = self.pixel_offset(0, 0);
        let len = self.linesize * rows;
        if self.margin == 0 && src_stride == self.linesize && src.len() >= len {
            self.data[..len].copy_from_slice(&src[..len]);
            return;
        }
        for y in 0..rows {
            let s = &src[y * src_stride..y * src_stride + row_bytes];
            let d = origin + y * self.linesize;
            self.data[d..d + row_bytes].copy_from_slice(s);
        }
    }
}

/// The image entity in one of its three mutually exclusive representations.
#[derive(Clone, Debug)]
pub enum Pixmap {
    Coded(CodedImage),
    Raster(Raster),
    Vector(VectorCanvas),
}

impl Pixmap {
    /// Visible dimensions; `None` while the image is still coded.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Self::Coded(_) => None,
            Self::Raster(r) => Some((r.width(), r.height())),
            Self::Vector(v) => Some((v.width(), v.height())),
        }
    }

    pub fn as_raster(&self) -> Option<&Raster> {
        match self {
            Self::Raster(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_raster_mut(&mut self) -> Option<&mut Raster> {
        match self {
            Self::Raster(r) => Some(r),
            _ => None,
        }
    }

    /// Glyph positions of a raster or vector image; coded images have none.
    pub fn char_positions(&self) -> &[i32] {
        match self {
            Self::Coded(_) => &[],
            Self::Raster(r) => r.char_positions(),
            Self::Vector(v) => v.char_positions(),
        }
    }

    pub fn flags(&self) -> PixmapFlags {
        match self {
            Self::Coded(c) => c.flags(),
            Self::Raster(r) => r.flags(),
            Self::Vector(v) => v.flags(),
        }
    }
}

impl From<CodedImage> for Pixmap {
    fn from(v: CodedImage) -> Self {
        Self::Coded(v)
    }
}

impl From<Raster> for Pixmap {
    fn from(v: Raster) -> Self {
        Self::Raster(v)
    }
}

impl From<VectorCanvas> for Pixmap {
    fn from(v: VectorCanvas) -> Self {
        Self::Vector(v)
    }
}

/// Reference-counted handle to a [`Pixmap`].
///
/// [`duplicate`](Self::duplicate) hands out the same instance; the backing store is
/// released when the last handle is [`release`](Self::release)d. Shared handles only
/// give read access: mutation first requires [`try_into_exclusive`](Self::try_into_exclusive).
#[derive(Debug)]
pub struct SharedPixmap(Arc<Pixmap>);

impl SharedPixmap {
    pub fn new(pixmap: impl Into<Pixmap>) -> Self {
        Self(Arc::new(pixmap.into()))
    }

    /// Take another reference to the same image.
    pub fn duplicate(&self) -> Self {
        Self(Arc::clone(&self.0))
    }

    /// Drop this reference; the image is freed with the last one.
    pub fn release(self) {
        drop(self);
    }

    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// Non-owning observer, mainly for checking when the image has been freed.
    pub fn downgrade(&self) -> Weak<Pixmap> {
        Arc::downgrade(&self.0)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Recover sole ownership, or get the handle back if other references exist.
    pub fn try_into_exclusive(self) -> Result<Pixmap, Self> {
        Arc::try_unwrap(self.0).map_err(Self)
    }
}

impl Deref for SharedPixmap {
    type Target = Pixmap;

    fn deref(&self) -> &Pixmap {
        &self.0
    }
}

impl From<Pixmap> for SharedPixmap {
    fn from(v: Pixmap) -> Self {
        Self(Arc::new(v))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/pixmap.rs"]
mod tests;
