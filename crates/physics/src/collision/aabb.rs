//! Axis-aligned boxes used for platforms, player bodies and goal volumes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned box described by its minimum and maximum corners.
///
/// Overlap tests are strict: boxes that only share a face do not overlap.
/// A player standing exactly on a platform therefore never counts as
/// penetrating it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Build a box from its minimum corner and its size along each axis.
    ///
    /// This is the layout used by level block data.
    pub fn from_origin_dims(origin: Vec3, dims: Vec3) -> Self {
        Self {
            min: origin,
            max: origin + dims,
        }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// A box is valid when every coordinate is finite and no extent is negative.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.max.cmpge(self.min).all()
    }

    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Strict overlap of the horizontal footprints only.
    #[inline]
    pub fn overlaps_xz(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.max.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}
