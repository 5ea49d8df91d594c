//! CPU side of the presentation bridge.
//!
//! Row copies are expressed over slices with explicit strides. Every row is
//! sliced with checked ranges, so a stride or length disagreement can only
//! shorten the copy, never push it past either buffer.

use std::borrow::Cow;

/// Row geometry of one side of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    /// Bytes from the start of one row to the start of the next
    pub stride: usize,
    pub bytes_per_pixel: usize,
}

impl RowLayout {
    pub fn new(stride: usize, bytes_per_pixel: usize) -> Self {
        Self { stride, bytes_per_pixel }
    }

    /// Number of rows of `row_bytes` that fit in a buffer of `len` bytes
    fn rows_in(&self, len: usize, row_bytes: usize) -> usize {
        if self.stride == 0 || len < row_bytes {
            return 0;
        }
        (len - row_bytes) / self.stride + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BytesPerPixelMismatch { source: usize, destination: usize },
    EmptyRows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied { rows: usize, row_bytes: usize },
    Skipped(SkipReason),
}

/// Copy `height` rows from `src` into `dst`.
///
/// Each row moves `min(src.stride, dst.stride)` bytes. With `flip` set,
/// destination row `y` receives source row `height - 1 - y`. Rows missing
/// from either buffer are left alone.
pub fn copy_rows(
    src: &[u8],
    src_layout: RowLayout,
    dst: &mut [u8],
    dst_layout: RowLayout,
    height: usize,
    flip: bool,
) -> CopyOutcome {
    if src_layout.bytes_per_pixel != dst_layout.bytes_per_pixel {
        return CopyOutcome::Skipped(SkipReason::BytesPerPixelMismatch {
            source: src_layout.bytes_per_pixel,
            destination: dst_layout.bytes_per_pixel,
        });
    }

    let row_bytes = src_layout.stride.min(dst_layout.stride);
    if row_bytes == 0 || height == 0 {
        return CopyOutcome::Skipped(SkipReason::EmptyRows);
    }

    let src_rows = src_layout.rows_in(src.len(), row_bytes);
    let dst_rows = dst_layout.rows_in(dst.len(), row_bytes);

    let mut rows = 0;
    for y in 0..height.min(dst_rows) {
        let source_row = if flip { height - 1 - y } else { y };
        if source_row >= src_rows {
            continue;
        }
        let s = source_row * src_layout.stride;
        let d = y * dst_layout.stride;
        dst[d..d + row_bytes].copy_from_slice(&src[s..s + row_bytes]);
        rows += 1;
    }

    CopyOutcome::Copied { rows, row_bytes }
}

/// Tightly pack rows for upload, borrowing when they already are packed
pub fn pack_rows(pixels: &[u8], stride: usize, row_bytes: usize, height: usize) -> Cow<'_, [u8]> {
    if stride == row_bytes && pixels.len() >= row_bytes * height {
        return Cow::Borrowed(&pixels[..row_bytes * height]);
    }

    let mut packed = Vec::with_capacity(row_bytes * height);
    for row in pixels.chunks(stride.max(1)).take(height) {
        let take = row.len().min(row_bytes);
        packed.extend_from_slice(&row[..take]);
        packed.resize(packed.len() + row_bytes - take, 0);
    }
    packed.resize(row_bytes * height, 0);
    Cow::Owned(packed)
}
