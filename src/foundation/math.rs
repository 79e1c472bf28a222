use crate::foundation::error::{PixmapError, PixmapResult};

/// Fixed-point `x / 255`, exact for `x <= 255 * 255`.
///
/// Folds the `(x + 255) >> 8` correction back into `x` before the final shift.
#[inline]
pub(crate) fn div255(x: u32) -> u32 {
    (((x + 255) >> 8) + x) >> 8
}

/// Round `v` up to the next multiple of `align` (a power of two).
pub(crate) fn round_up(v: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    (v + align - 1) & !(align - 1)
}

/// Allocate `len` default-filled elements, reporting failure instead of aborting.
pub(crate) fn try_alloc<T: Clone + Default>(len: usize) -> PixmapResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|e| PixmapError::out_of_memory(format!("{len} elements: {e}")))?;
    v.resize(len, T::default());
    Ok(v)
}

/// Checked `a * b`, mapped to an out-of-memory error on overflow.
pub(crate) fn checked_area(a: usize, b: usize) -> PixmapResult<usize> {
    a.checked_mul(b)
        .ok_or_else(|| PixmapError::out_of_memory(format!("buffer size overflow: {a} x {b}")))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
