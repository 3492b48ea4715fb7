//! Flatten a [`Scene`] into triangles for the GPU.

use crate::scene::{DrawCommand, Scene};
use glam::Vec2;

/// Marks vertices that are filled flat instead of rounded as a disc.
pub const FLAT: f32 = -1.0;

/// Edge fade floor in pixels, so small discs stay antialiased.
const MIN_EDGE_PX: f32 = 1.0;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Screen pixels, origin at the top-left.
    pub position: [f32; 2],
    /// Disc-local coordinates in `[-1, 1]`; unused for flat fills.
    pub uv: [f32; 2],
    pub color: [f32; 4],
    /// Fraction of the disc radius over which the edge fades, or [`FLAT`].
    pub softness: f32,
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4, 3 => Float32];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn flat(position: Vec2, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            uv: [0.0, 0.0],
            color,
            softness: FLAT,
        }
    }
}

/// Append the triangles for `scene` to `out`, shifted by the scene offset.
/// Returns the number of vertices written.
pub fn tessellate(scene: &Scene, out: &mut Vec<Vertex>) -> usize {
    let start = out.len();
    for command in &scene.commands {
        match command {
            DrawCommand::Band { left, right, color } => {
                band(out, left, right, scene.offset, color.to_array());
            }
            DrawCommand::Circle {
                center,
                radius,
                color,
                softness,
            } => {
                circle(out, *center + scene.offset, *radius, *softness, color.to_array());
            }
            DrawCommand::Polyline {
                points,
                width,
                color,
            } => {
                polyline(out, points, *width, scene.offset, color.to_array());
            }
        }
    }
    out.len() - start
}

fn quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], color: [f32; 4]) {
    let [a, b, c, d] = corners.map(|p| Vertex::flat(p, color));
    out.extend_from_slice(&[a, b, c, a, c, d]);
}

fn band(out: &mut Vec<Vertex>, left: &[Vec2], right: &[Vec2], offset: Vec2, color: [f32; 4]) {
    let rows = left.len().min(right.len());
    for i in 1..rows {
        quad(
            out,
            [
                left[i - 1] + offset,
                right[i - 1] + offset,
                right[i] + offset,
                left[i] + offset,
            ],
            color,
        );
    }
}

fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, softness: f32, color: [f32; 4]) {
    if radius <= 0.0 || !radius.is_finite() {
        return;
    }
    let softness = softness.max(MIN_EDGE_PX / radius).min(1.0);
    let corners = [
        Vec2::new(-1.0, -1.0),
        Vec2::new(1.0, -1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(-1.0, 1.0),
    ]
    .map(|uv| Vertex {
        position: (center + uv * radius).to_array(),
        uv: uv.to_array(),
        color,
        softness,
    });
    let [a, b, c, d] = corners;
    out.extend_from_slice(&[a, b, c, a, c, d]);
}

fn polyline(out: &mut Vec<Vertex>, points: &[Vec2], width: f32, offset: Vec2, color: [f32; 4]) {
    let half = width * 0.5;
    for pair in points.windows(2) {
        let (a, b) = (pair[0] + offset, pair[1] + offset);
        let Some(dir) = (b - a).try_normalize() else {
            continue;
        };
        let n = dir.perp() * half;
        quad(out, [a + n, b + n, b - n, a - n], color);
    }
}
