use glam::Vec2;

use super::color::{Color, RowOrder};
use super::surface_info::SurfaceInfo;

/// Axis-aligned rectangle in pixel coordinates, stored as edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Same rectangle with left <= right and top <= bottom
    pub fn normalized(&self) -> Self {
        Self {
            left: self.left.min(self.right),
            top: self.top.min(self.bottom),
            right: self.left.max(self.right),
            bottom: self.top.max(self.bottom),
        }
    }

    pub fn is_empty(&self) -> bool {
        let r = self.normalized();
        r.left == r.right || r.top == r.bottom
    }
}

/// One drawing operation for a single frame
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Replace every pixel with the color
    Clear(Color),

    /// Stroke a straight segment with butt caps
    StrokeLine {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },

    /// Fill a rectangle
    FillRect { rect: Rect, color: Color },
}

/// Anything that accepts draw commands
pub trait DrawTarget {
    fn execute(&mut self, command: &DrawCommand);
}

/// CPU pixel buffer with an aliased rasterizer.
///
/// Pixels are sampled at their centers, so a command covers pixel (x, y)
/// when the point (x + 0.5, y + 0.5) lies inside the shape. Edges are
/// half-open: a rect spanning [100, 300) covers columns 100..=299.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: Vec<u8>,
    info: SurfaceInfo,
}

impl Canvas {
    /// Allocate a transparent canvas
    pub fn new(info: SurfaceInfo) -> Self {
        Self {
            pixels: vec![0; info.byte_len()],
            info,
        }
    }

    pub fn info(&self) -> SurfaceInfo {
        self.info
    }

    /// Raw pixel bytes in the canvas' format and row order
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.info.width, self.info.height)
    }

    /// Read back a pixel as straight-alpha color
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let idx = self.index(x, y)?;
        let bytes = [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ];
        Some(Color::from_premultiplied(self.info.format.decode(bytes)))
    }

    /// Byte offset of pixel (x, y), honoring row order
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.info.width || y >= self.info.height {
            return None;
        }
        let row = match self.info.row_order {
            RowOrder::TopDown => y,
            RowOrder::BottomUp => self.info.height - 1 - y,
        };
        Some(row as usize * self.info.stride() + x as usize * self.info.format.bytes_per_pixel())
    }

    fn clear(&mut self, color: Color) {
        let encoded = self.info.format.encode(color.premultiplied());
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&encoded);
        }
    }

    /// Source-over blend of a premultiplied color onto one pixel
    fn blend_pixel(&mut self, x: u32, y: u32, src: [u8; 4]) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let format = self.info.format;

        if src[3] == 255 {
            self.pixels[idx..idx + 4].copy_from_slice(&format.encode(src));
            return;
        }

        let dst = format.decode([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]);
        let inv = 255 - src[3] as u32;
        let mut out = [0u8; 4];
        for i in 0..4 {
            out[i] = (src[i] as u32 + (dst[i] as u32 * inv + 127) / 255).min(255) as u8;
        }
        self.pixels[idx..idx + 4].copy_from_slice(&format.encode(out));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let r = rect.normalized();
        let (x0, x1) = self.span(r.left, r.right, self.info.width);
        let (y0, y1) = self.span(r.top, r.bottom, self.info.height);
        let src = color.premultiplied();

        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(x, y, src);
            }
        }
    }

    /// Pixel indices whose centers fall in [start, end), clamped to `limit`
    fn span(&self, start: f32, end: f32, limit: u32) -> (u32, u32) {
        let first = (start - 0.5).ceil().clamp(0.0, limit as f32) as u32;
        let last = (end - 0.5).ceil().clamp(0.0, limit as f32) as u32;
        (first, last.max(first))
    }

    /// Thick segment: covers centers whose projection falls in [0, 1) along
    /// the segment and whose signed distance from it lies in [-w/2, w/2).
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        let dir = to - from;
        let len_sq = dir.length_squared();
        if len_sq == 0.0 {
            return;
        }
        // Zero width is a hairline, one pixel wide
        let half = width.max(1.0) * 0.5;
        let unit = dir / len_sq.sqrt();
        let src = color.premultiplied();

        let min = from.min(to) - Vec2::splat(half);
        let max = from.max(to) + Vec2::splat(half);
        let (x0, x1) = self.span(min.x, max.x + 1.0, self.info.width);
        let (y0, y1) = self.span(min.y, max.y + 1.0, self.info.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let rel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - from;
                let t = rel.dot(dir) / len_sq;
                if !(0.0..1.0).contains(&t) {
                    continue;
                }
                let offset = unit.perp_dot(rel);
                if offset >= -half && offset < half {
                    self.blend_pixel(x, y, src);
                }
            }
        }
    }
}

impl DrawTarget for Canvas {
    fn execute(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Clear(color) => self.clear(*color),
            DrawCommand::StrokeLine { from, to, width, color } => {
                self.stroke_line(*from, *to, *width, *color)
            }
            DrawCommand::FillRect { rect, color } => self.fill_rect(*rect, *color),
        }
    }
}
