//! Collision world containing the static platforms and hook anchors.
//!
//! The world is built once per level and never mutates afterwards, so
//! every query borrows it immutably and platform/anchor ids stay valid for
//! the lifetime of the world.

use glam::Vec3;
use parry3d::bounding_volume::Aabb as ParryAabb;
use parry3d::math::{Point, Vector};
use parry3d::query::Ray;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::flags::ContentFlags;
use super::trace::TraceResult;

/// Distance short of the target at which a blocking hit is ignored by
/// [`CollisionWorld::line_of_sight`].
const SIGHT_EPSILON: f32 = 0.05;

/// Index of a platform within its [`CollisionWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformId(pub usize);

/// Index of a hook anchor within its [`CollisionWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorId(pub usize);

/// A box volume in the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub bounds: Aabb,
    pub contents: ContentFlags,
}

impl Platform {
    /// Malformed boxes are kept so ids stay stable, but no query sees them.
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.bounds.is_valid()
    }
}

/// A fixed point a grappling hook can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub position: Vec3,
}

/// The collision world containing all static geometry.
#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    platforms: Vec<Platform>,
    anchors: Vec<Anchor>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a box volume to the world.
    ///
    /// Boxes with non-finite coordinates or negative extents are recorded
    /// but ignored by every query.
    pub fn add_platform(&mut self, bounds: Aabb, contents: ContentFlags) -> PlatformId {
        let id = PlatformId(self.platforms.len());
        if !bounds.is_valid() {
            log::warn!("platform {} has malformed bounds {:?}, it will be ignored", id.0, bounds);
        }
        self.platforms.push(Platform { bounds, contents });
        id
    }

    /// Add a hook anchor. Non-finite positions are dropped.
    pub fn add_anchor(&mut self, position: Vec3) -> Option<AnchorId> {
        if !position.is_finite() {
            log::warn!("dropping anchor with non-finite position {:?}", position);
            return None;
        }
        let id = AnchorId(self.anchors.len());
        self.anchors.push(Anchor { position });
        Some(id)
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn platform(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms.get(id.0)
    }

    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(id.0)
    }

    fn usable(&self, mask: ContentFlags) -> impl Iterator<Item = (PlatformId, &Platform)> {
        self.platforms
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.is_usable() && mask.intersects(p.contents))
            .map(|(i, p)| (PlatformId(i), p))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Cast a ray through the world.
    ///
    /// # Arguments
    ///
    /// * `origin` - Ray starting position
    /// * `direction` - Ray direction (will be normalized)
    /// * `max_distance` - Maximum trace distance
    /// * `mask` - Content flags to collide with
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: ContentFlags,
    ) -> TraceResult {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || !origin.is_finite() || max_distance <= 0.0 {
            return TraceResult::no_hit(origin);
        }

        let ray = Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(dir.x, dir.y, dir.z),
        );

        let mut closest: Option<(f32, PlatformId, &Platform)> = None;
        for (id, platform) in self.usable(mask) {
            let b = platform.bounds;
            let aabb = ParryAabb::new(
                Point::new(b.min.x, b.min.y, b.min.z),
                Point::new(b.max.x, b.max.y, b.max.z),
            );
            let toi = aabb
                .clip_ray_parameters(&ray)
                .filter(|(t_min, t_max)| *t_min <= max_distance && *t_max >= 0.0)
                .map(|(t_min, _)| t_min.max(0.0));

            if let Some(toi) = toi {
                if closest.map_or(true, |(best, _, _)| toi < best) {
                    closest = Some((toi, id, platform));
                }
            }
        }

        match closest {
            Some((distance, id, platform)) => {
                let end_position = origin + dir * distance;
                TraceResult {
                    fraction: distance / max_distance,
                    end_position,
                    hit_normal: Some(face_normal(&platform.bounds, end_position)),
                    platform: Some(id),
                }
            }
            None => TraceResult::no_hit(origin + dir * max_distance),
        }
    }

    /// True when no solid platform lies on the segment between two points.
    pub fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        let delta = to - from;
        let distance = delta.length();
        if distance <= SIGHT_EPSILON {
            return true;
        }
        let trace = self.raycast(from, delta, distance, ContentFlags::MASK_SIGHT);
        !trace.hit_something() || trace.fraction * distance >= distance - SIGHT_EPSILON
    }

    /// Highest solid top surface supporting a footprint.
    ///
    /// A platform supports the body when their horizontal footprints overlap
    /// and its top is within `tolerance` of the body's feet. Returns `None`
    /// when nothing qualifies.
    pub fn support_height(&self, body: &Aabb, tolerance: f32) -> Option<f32> {
        if !body.is_valid() {
            return None;
        }
        let feet = body.bottom();
        self.usable(ContentFlags::MASK_PLAYER_SOLID)
            .filter(|(_, p)| p.bounds.overlaps_xz(body))
            .map(|(_, p)| p.bounds.top())
            .filter(|top| (feet - top).abs() <= tolerance)
            .reduce(f32::max)
    }

    /// Ids of all usable platforms whose contents match `mask` and which
    /// overlap `bounds`.
    pub fn overlapping(&self, bounds: &Aabb, mask: ContentFlags) -> Vec<PlatformId> {
        self.usable(mask)
            .filter(|(_, p)| p.bounds.overlaps(bounds))
            .map(|(id, _)| id)
            .collect()
    }

    /// Best anchor for a cast from `origin` along `direction`.
    ///
    /// Candidates must lie within `range`, within `max_angle` radians of the
    /// direction and in line of sight. The smallest angular error wins, ties
    /// going to the nearer anchor. Returns the anchor and its distance.
    pub fn find_anchor(
        &self,
        origin: Vec3,
        direction: Vec3,
        range: f32,
        max_angle: f32,
    ) -> Option<(AnchorId, f32)> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || !origin.is_finite() {
            return None;
        }

        let mut best: Option<(AnchorId, f32, f32)> = None;
        for (i, anchor) in self.anchors.iter().enumerate() {
            let to_anchor = anchor.position - origin;
            let distance = to_anchor.length();
            if distance > range || distance <= f32::EPSILON {
                continue;
            }
            let angle = dir.angle_between(to_anchor);
            if angle > max_angle {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, best_angle, best_distance)) => {
                    angle < best_angle || (angle == best_angle && distance < best_distance)
                }
            };
            if better && self.line_of_sight(origin, anchor.position) {
                best = Some((AnchorId(i), angle, distance));
            }
        }

        best.map(|(id, _, distance)| (id, distance))
    }
}

/// Outward normal of the box face closest to a point on its surface.
fn face_normal(bounds: &Aabb, point: Vec3) -> Vec3 {
    let candidates = [
        ((point.x - bounds.min.x).abs(), Vec3::NEG_X),
        ((point.x - bounds.max.x).abs(), Vec3::X),
        ((point.y - bounds.min.y).abs(), Vec3::NEG_Y),
        ((point.y - bounds.max.y).abs(), Vec3::Y),
        ((point.z - bounds.min.z).abs(), Vec3::NEG_Z),
        ((point.z - bounds.max.z).abs(), Vec3::Z),
    ];
    candidates
        .iter()
        .fold((f32::INFINITY, Vec3::Y), |acc, &(d, n)| if d < acc.0 { (d, n) } else { acc })
        .1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor with its top at y=0
        world.add_platform(
            Aabb::new(Vec3::new(-50.0, -1.0, -50.0), Vec3::new(50.0, 0.0, 50.0)),
            ContentFlags::SOLID,
        );

        // Wall spanning x=9.5..10.5
        world.add_platform(
            Aabb::new(Vec3::new(9.5, 0.0, -10.0), Vec3::new(10.5, 5.0, 10.0)),
            ContentFlags::SOLID,
        );

        world.add_anchor(Vec3::new(0.0, 3.0, 8.0));
        world.add_anchor(Vec3::new(20.0, 3.0, 0.0));

        world
    }

    #[test]
    fn test_raycast_hit() {
        let world = create_test_world();

        let result = world.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 100.0, ContentFlags::SOLID);

        assert!(result.hit_something());
        assert!(result.fraction < 1.0);
        assert!((result.end_position.x - 9.5).abs() < 0.01);
        assert_eq!(result.hit_normal, Some(Vec3::NEG_X));
    }

    #[test]
    fn test_raycast_miss() {
        let world = create_test_world();

        let result = world.raycast(Vec3::new(0.0, 1.0, 0.0), -Vec3::X, 30.0, ContentFlags::SOLID);

        assert!(!result.hit_something());
        assert_eq!(result.fraction, 1.0);
    }

    #[test]
    fn test_raycast_zero_direction() {
        let world = create_test_world();
        let result = world.raycast(Vec3::ONE, Vec3::ZERO, 10.0, ContentFlags::SOLID);
        assert!(!result.hit_something());
    }

    #[test]
    fn test_support_height() {
        let world = create_test_world();
        let body = Aabb::from_origin_dims(Vec3::new(-0.25, 0.02, -0.25), Vec3::new(0.5, 1.6, 0.5));

        assert_eq!(world.support_height(&body, 0.05), Some(0.0));
        assert_eq!(world.support_height(&body.translated(Vec3::Y), 0.05), None);
    }

    #[test]
    fn test_malformed_platform_is_ignored() {
        let mut world = CollisionWorld::new();
        world.add_platform(
            Aabb::new(Vec3::new(1.0, 0.0, 1.0), Vec3::new(-1.0, -1.0, -1.0)),
            ContentFlags::SOLID,
        );
        let body = Aabb::from_origin_dims(Vec3::new(-0.25, 0.0, -0.25), Vec3::new(0.5, 1.6, 0.5));

        assert_eq!(world.support_height(&body, 0.05), None);
        assert!(!world.raycast(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, 10.0, ContentFlags::SOLID).hit_something());
    }

    #[test]
    fn test_line_of_sight_blocked_by_wall() {
        let world = create_test_world();
        assert!(world.line_of_sight(Vec3::new(0.0, 1.0, 0.0), Vec3::new(5.0, 1.0, 0.0)));
        assert!(!world.line_of_sight(Vec3::new(0.0, 1.0, 0.0), Vec3::new(20.0, 1.0, 0.0)));
    }

    #[test]
    fn test_find_anchor() {
        let world = create_test_world();
        let eye = Vec3::new(0.0, 1.5, 0.0);
        let aim = Vec3::new(0.0, 3.0, 8.0) - eye;

        let found = world.find_anchor(eye, aim, 20.0, 0.1);
        assert_eq!(found.map(|(id, _)| id), Some(AnchorId(0)));

        // Out of range
        assert!(world.find_anchor(eye, aim, 5.0, 0.1).is_none());
        // Outside the angle tolerance
        assert!(world.find_anchor(eye, Vec3::NEG_Z, 20.0, 0.1).is_none());
        // Behind the wall
        let behind = Vec3::new(20.0, 3.0, 0.0) - eye;
        assert!(world.find_anchor(eye, behind, 30.0, 0.1).is_none());
        // Degenerate direction
        assert!(world.find_anchor(eye, Vec3::ZERO, 20.0, 0.1).is_none());
    }
}
