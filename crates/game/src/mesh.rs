//! Mesh building utilities for procedural level and player geometry.
//!
//! Meshes are the flat interchange layout handed to the renderer: three
//! floats per vertex position, one RGBA color per quad face, and triangle
//! indices into the position list. Every face owns four consecutive
//! vertices, so the face count is both `positions.len() / 12` and
//! `colors.len() / 4`.

use glam::Vec3;
use runner_physics::Aabb;
use serde::{Deserialize, Serialize};

/// Linear RGBA color, components in `0.0..=1.0`.
pub type Rgba = [f32; 4];

/// Per-face brightness so box edges read without lighting.
const SHADE_TOP: f32 = 1.0;
const SHADE_SIDE_Z: f32 = 0.85;
const SHADE_SIDE_X: f32 = 0.7;
const SHADE_BOTTOM: f32 = 0.5;

/// Flat mesh buffers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub indices: Vec<u32>,
}

impl Mesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.colors.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append another mesh, rebasing its indices after ours.
    pub fn append(&mut self, other: &Mesh) {
        let base = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.colors.extend_from_slice(&other.colors);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

fn shade(color: Rgba, factor: f32) -> Rgba {
    [color[0] * factor, color[1] * factor, color[2] * factor, color[3]]
}

/// Fluent mesh builder for procedural geometry.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    mesh: Mesh,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a quad (two triangles) with one color.
    ///
    /// Vertices in order 1, 2, 3, 4 around the face.
    pub fn add_quad(&mut self, p1: Vec3, p2: Vec3, p3: Vec3, p4: Vec3, color: Rgba) -> &mut Self {
        let base = self.mesh.vertex_count() as u32;
        for p in [p1, p2, p3, p4] {
            self.mesh.positions.extend_from_slice(&p.to_array());
        }
        self.mesh.colors.extend_from_slice(&color);
        self.mesh
            .indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        self
    }

    /// Add an axis-aligned box, each face shaded a little differently.
    pub fn add_box(&mut self, bounds: &Aabb, color: Rgba) -> &mut Self {
        let (lo, hi) = (bounds.min, bounds.max);
        let corner = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);

        // Front face (Z+)
        self.add_quad(
            corner(lo.x, lo.y, hi.z),
            corner(hi.x, lo.y, hi.z),
            corner(hi.x, hi.y, hi.z),
            corner(lo.x, hi.y, hi.z),
            shade(color, SHADE_SIDE_Z),
        );
        // Back face (Z-)
        self.add_quad(
            corner(hi.x, lo.y, lo.z),
            corner(lo.x, lo.y, lo.z),
            corner(lo.x, hi.y, lo.z),
            corner(hi.x, hi.y, lo.z),
            shade(color, SHADE_SIDE_Z),
        );
        // Top face (Y+)
        self.add_quad(
            corner(lo.x, hi.y, hi.z),
            corner(hi.x, hi.y, hi.z),
            corner(hi.x, hi.y, lo.z),
            corner(lo.x, hi.y, lo.z),
            shade(color, SHADE_TOP),
        );
        // Bottom face (Y-)
        self.add_quad(
            corner(lo.x, lo.y, lo.z),
            corner(hi.x, lo.y, lo.z),
            corner(hi.x, lo.y, hi.z),
            corner(lo.x, lo.y, hi.z),
            shade(color, SHADE_BOTTOM),
        );
        // Right face (X+)
        self.add_quad(
            corner(hi.x, lo.y, hi.z),
            corner(hi.x, lo.y, lo.z),
            corner(hi.x, hi.y, lo.z),
            corner(hi.x, hi.y, hi.z),
            shade(color, SHADE_SIDE_X),
        );
        // Left face (X-)
        self.add_quad(
            corner(lo.x, lo.y, lo.z),
            corner(lo.x, lo.y, hi.z),
            corner(lo.x, hi.y, hi.z),
            corner(lo.x, hi.y, lo.z),
            shade(color, SHADE_SIDE_X),
        );

        self
    }

    /// Add a cube centered on a point.
    pub fn add_cube(&mut self, center: Vec3, size: f32, color: Rgba) -> &mut Self {
        self.add_box(&Aabb::from_center_half_extents(center, Vec3::splat(size * 0.5)), color)
    }

    /// Add a thin square beam from `from` to `to`.
    ///
    /// Degenerate beams (zero length or non-finite ends) add nothing.
    pub fn add_beam(&mut self, from: Vec3, to: Vec3, thickness: f32, color: Rgba) -> &mut Self {
        let axis = to - from;
        if !axis.is_finite() || axis.length_squared() < 1e-8 {
            return self;
        }

        let dir = axis.normalize();
        let half = thickness * 0.5;
        let u = dir.any_orthonormal_vector() * half;
        let v = dir.cross(u).normalize_or_zero() * half;

        let ring = [u + v, u - v, -u - v, -u + v];
        for i in 0..4 {
            let (a, b) = (ring[i], ring[(i + 1) % 4]);
            self.add_quad(from + a, from + b, to + b, to + a, color);
        }
        self
    }

    pub fn build(self) -> Mesh {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];

    #[test]
    fn test_box_layout() {
        let mut builder = MeshBuilder::new();
        builder.add_box(&Aabb::new(Vec3::ZERO, Vec3::ONE), WHITE);
        let mesh = builder.build();

        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.indices.len(), 36);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn test_append_rebases_indices() {
        let mut a = MeshBuilder::new();
        a.add_cube(Vec3::ZERO, 1.0, WHITE);
        let mut a = a.build();

        let mut b = MeshBuilder::new();
        b.add_cube(Vec3::X * 3.0, 1.0, WHITE);
        let b = b.build();

        a.append(&b);

        assert_eq!(a.vertex_count(), 48);
        assert_eq!(a.indices[36], 24);
        assert_eq!(*a.indices.iter().max().unwrap_or(&0), 47);
    }

    #[test]
    fn test_degenerate_beam_is_skipped() {
        let mut builder = MeshBuilder::new();
        builder.add_beam(Vec3::ONE, Vec3::ONE, 0.05, WHITE);
        builder.add_beam(Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0), 0.05, WHITE);
        assert!(builder.build().is_empty());

        let mut builder = MeshBuilder::new();
        builder.add_beam(Vec3::ZERO, Vec3::Y * 4.0, 0.05, WHITE);
        assert_eq!(builder.build().face_count(), 4);
    }
}
