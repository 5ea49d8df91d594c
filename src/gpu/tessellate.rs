use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::core::{Color, DrawCommand, Rect};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShapeVertex {
    /// Normalized device coordinates
    pub position: [f32; 2],
    /// Premultiplied color
    pub color: [f32; 4],
}

impl ShapeVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Triangles for one frame, plus the color the pass should clear to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeBatch {
    pub clear: Option<Color>,
    pub vertices: Vec<ShapeVertex>,
}

/// Turn a frame's commands into a triangle list for a `width` x `height`
/// target. A clear discards everything recorded before it.
pub fn tessellate(commands: &[DrawCommand], width: u32, height: u32) -> ShapeBatch {
    let size = Vec2::new(width.max(1) as f32, height.max(1) as f32);
    let mut batch = ShapeBatch::default();

    for command in commands {
        match command {
            DrawCommand::Clear(color) => {
                batch.clear = Some(*color);
                batch.vertices.clear();
            }
            DrawCommand::StrokeLine { from, to, width, color } => {
                let dir = *to - *from;
                if dir.length_squared() == 0.0 {
                    continue;
                }
                let offset = dir.normalize().perp() * (width.max(1.0) * 0.5);
                let corners = [*from - offset, *from + offset, *to + offset, *to - offset];
                push_quad(&mut batch.vertices, corners, *color, size);
            }
            DrawCommand::FillRect { rect, color } => {
                let Rect { left, top, right, bottom } = rect.normalized();
                if rect.is_empty() {
                    continue;
                }
                let corners = [
                    Vec2::new(left, top),
                    Vec2::new(left, bottom),
                    Vec2::new(right, bottom),
                    Vec2::new(right, top),
                ];
                push_quad(&mut batch.vertices, corners, *color, size);
            }
        }
    }

    batch
}

fn push_quad(out: &mut Vec<ShapeVertex>, corners: [Vec2; 4], color: Color, size: Vec2) {
    let color = color.to_premultiplied_f32();
    let [a, b, c, d] = corners.map(|p| to_ndc(p, size));
    for position in [a, b, c, a, c, d] {
        out.push(ShapeVertex { position, color });
    }
}

/// Pixel coordinates (origin top-left, y down) to NDC (y up)
fn to_ndc(p: Vec2, size: Vec2) -> [f32; 2] {
    [p.x / size.x * 2.0 - 1.0, 1.0 - p.y / size.y * 2.0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Scene;

    #[test]
    fn vertex_layout_matches_struct() {
        let layout = ShapeVertex::layout();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[1].offset, 8);
    }

    #[test]
    fn corners_map_to_ndc() {
        let size = Vec2::new(800.0, 600.0);
        assert_eq!(to_ndc(Vec2::ZERO, size), [-1.0, 1.0]);
        assert_eq!(to_ndc(Vec2::new(800.0, 600.0), size), [1.0, -1.0]);
        assert_eq!(to_ndc(Vec2::new(400.0, 300.0), size), [0.0, 0.0]);
    }

    #[test]
    fn rect_becomes_two_triangles() {
        let batch = tessellate(&Scene::BlueRect.commands(), 800, 600);
        assert_eq!(batch.clear, Some(Color::WHITE));
        assert_eq!(batch.vertices.len(), 6);
        assert!(batch.vertices.iter().all(|v| v.color == [0.0, 0.0, 1.0, 1.0]));
    }

    #[test]
    fn line_quad_is_stroke_width_wide() {
        let commands = [DrawCommand::StrokeLine {
            from: Vec2::new(100.0, 100.0),
            to: Vec2::new(100.0, 500.0),
            width: 3.0,
            color: Color::RED,
        }];
        let batch = tessellate(&commands, 800, 600);
        assert_eq!(batch.vertices.len(), 6);

        let xs: Vec<f32> = batch.vertices.iter().map(|v| (v.position[0] + 1.0) * 400.0).collect();
        let min = xs.iter().cloned().fold(f32::MAX, f32::min);
        let max = xs.iter().cloned().fold(f32::MIN, f32::max);
        assert!((min - 98.5).abs() < 1e-3);
        assert!((max - 101.5).abs() < 1e-3);
    }

    #[test]
    fn clear_discards_earlier_shapes() {
        let commands = [
            DrawCommand::FillRect {
                rect: Rect::from_ltrb(0.0, 0.0, 10.0, 10.0),
                color: Color::BLUE,
            },
            DrawCommand::Clear(Color::BLACK),
        ];
        let batch = tessellate(&commands, 100, 100);
        assert!(batch.vertices.is_empty());
        assert_eq!(batch.clear, Some(Color::BLACK));
    }

    #[test]
    fn degenerate_shapes_are_dropped() {
        let commands = [
            DrawCommand::StrokeLine {
                from: Vec2::new(5.0, 5.0),
                to: Vec2::new(5.0, 5.0),
                width: 3.0,
                color: Color::RED,
            },
            DrawCommand::FillRect {
                rect: Rect::from_ltrb(5.0, 5.0, 5.0, 50.0),
                color: Color::BLUE,
            },
        ];
        assert!(tessellate(&commands, 100, 100).vertices.is_empty());
    }
}
