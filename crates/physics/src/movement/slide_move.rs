//! Box-versus-box collision response.
//!
//! Moves are resolved one axis at a time, vertical first, then X, then Z.
//! Each axis sweeps the body box along the displacement and stops at the
//! first solid face it would cross. Platforms the body already overlaps
//! before the sweep never block it, so a body that ends up embedded can
//! always walk out.

use glam::Vec3;

use crate::collision::{Aabb, CollisionWorld, ContentFlags};

use super::config::MovementConfig;

/// Gap left between a body and a wall or ceiling it was stopped against.
const SKIN: f32 = 1e-4;

/// What the body touched during a move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveContacts {
    /// Stopped on top of a platform while moving down.
    pub landed: bool,
    /// Stopped below a platform while moving up.
    pub hit_ceiling: bool,
    /// Stopped against a platform side on X or Z.
    pub hit_wall: bool,
}

impl MoveContacts {
    pub fn any(&self) -> bool {
        self.landed || self.hit_ceiling || self.hit_wall
    }
}

/// Platforms crossed by sweeping `body` by `delta` along `axis`.
///
/// Returns the faces that would stop the sweep: the minimum face coordinate
/// ahead of the body when moving positively, the maximum when moving
/// negatively.
fn first_blocking_face(world: &CollisionWorld, body: &Aabb, axis: usize, delta: f32) -> Option<f32> {
    let mut swept = *body;
    if delta > 0.0 {
        swept.max[axis] += delta;
    } else {
        swept.min[axis] += delta;
    }

    world
        .platforms()
        .iter()
        .filter(|p| p.is_usable() && ContentFlags::MASK_PLAYER_SOLID.intersects(p.contents))
        .filter(|p| p.bounds.overlaps(&swept) && !p.bounds.overlaps(body))
        .map(|p| if delta > 0.0 { p.bounds.min[axis] } else { p.bounds.max[axis] })
        .reduce(|a, b| if delta > 0.0 { a.min(b) } else { a.max(b) })
}

/// Move a player body through the world by `displacement`.
///
/// `position` is the feet position. Velocity components pointing into a
/// face that stopped the body are zeroed. Landing places the feet exactly
/// on the platform top.
pub fn slide_move(
    world: &CollisionWorld,
    position: &mut Vec3,
    velocity: &mut Vec3,
    displacement: Vec3,
    config: &MovementConfig,
) -> MoveContacts {
    let mut contacts = MoveContacts::default();
    if !displacement.is_finite() {
        return contacts;
    }

    let half = config.half_width;
    let height = config.height;
    let body_at = |p: Vec3| {
        Aabb::new(
            p - Vec3::new(half, 0.0, half),
            p + Vec3::new(half, height, half),
        )
    };

    // Vertical
    let dy = displacement.y;
    if dy != 0.0 {
        let body = body_at(*position);
        match first_blocking_face(world, &body, 1, dy) {
            Some(top) if dy < 0.0 => {
                position.y = top;
                velocity.y = velocity.y.max(0.0);
                contacts.landed = true;
            }
            Some(bottom) => {
                position.y += (bottom - body.max.y - SKIN).clamp(0.0, dy);
                velocity.y = velocity.y.min(0.0);
                contacts.hit_ceiling = true;
            }
            None => position.y += dy,
        }
    }

    // Horizontal, X then Z
    for axis in [0usize, 2] {
        let delta = displacement[axis];
        if delta == 0.0 {
            continue;
        }
        let body = body_at(*position);
        match first_blocking_face(world, &body, axis, delta) {
            Some(face) => {
                let allowed = if delta > 0.0 {
                    (face - body.max[axis] - SKIN).clamp(0.0, delta)
                } else {
                    (face - body.min[axis] + SKIN).clamp(delta, 0.0)
                };
                position[axis] += allowed;
                if velocity[axis] * delta > 0.0 {
                    velocity[axis] = 0.0;
                }
                contacts.hit_wall = true;
            }
            None => position[axis] += delta,
        }
    }

    contacts
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

        // Wall starting at x=5
        world.add_platform(
            Aabb::new(Vec3::new(5.0, 0.0, -10.0), Vec3::new(6.0, 4.0, 10.0)),
            ContentFlags::SOLID,
        );

        // Low ceiling slab over z=20..30
        world.add_platform(
            Aabb::new(Vec3::new(-5.0, 2.0, 20.0), Vec3::new(5.0, 2.5, 30.0)),
            ContentFlags::SOLID,
        );

        world
    }

    #[test]
    fn test_slide_move_no_collision() {
        let world = CollisionWorld::new();
        let config = MovementConfig::default();

        let mut position = Vec3::ZERO;
        let mut velocity = Vec3::new(5.0, 0.0, 0.0);

        let contacts = slide_move(&world, &mut position, &mut velocity, Vec3::new(5.0, 0.0, 0.0), &config);

        assert!(!contacts.any());
        assert!((position.x - 5.0).abs() < 1e-5);
        assert_eq!(velocity.x, 5.0);
    }

    #[test]
    fn test_landing_snaps_to_top() {
        let world = create_test_world();
        let config = MovementConfig::default();

        let mut position = Vec3::new(0.0, 0.3, 0.0);
        let mut velocity = Vec3::new(0.0, -10.0, 0.0);

        let contacts = slide_move(&world, &mut position, &mut velocity, Vec3::new(0.0, -0.5, 0.0), &config);

        assert!(contacts.landed, "Should land on the floor");
        assert_eq!(position.y, 0.0);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn test_fast_fall_does_not_tunnel() {
        let mut world = CollisionWorld::new();
        world.add_platform(
            Aabb::new(Vec3::new(-2.0, 4.0, -2.0), Vec3::new(2.0, 4.3, 2.0)),
            ContentFlags::SOLID,
        );
        let config = MovementConfig::default();

        let mut position = Vec3::new(0.0, 5.0, 0.0);
        let mut velocity = Vec3::new(0.0, -60.0, 0.0);

        let contacts = slide_move(&world, &mut position, &mut velocity, Vec3::new(0.0, -3.0, 0.0), &config);

        assert!(contacts.landed);
        assert!((position.y - 4.3).abs() < 1e-6);
    }

    #[test]
    fn test_wall_stops_horizontal_move() {
        let world = create_test_world();
        let config = MovementConfig::default();

        let mut position = Vec3::new(4.0, 0.0, 0.0);
        let mut velocity = Vec3::new(20.0, 0.0, 3.0);

        let contacts = slide_move(&world, &mut position, &mut velocity, Vec3::new(2.0, 0.0, 1.0), &config);

        assert!(contacts.hit_wall);
        assert!(position.x + config.half_width <= 5.0, "Should stop at the wall face");
        assert!((position.z - 1.0).abs() < 1e-5, "Z should slide freely");
        assert_eq!(velocity.x, 0.0);
        assert_eq!(velocity.z, 3.0);
    }

    #[test]
    fn test_ceiling_stops_rise() {
        let world = create_test_world();
        let config = MovementConfig::default();

        let mut position = Vec3::new(0.0, 0.0, 25.0);
        let mut velocity = Vec3::new(0.0, 15.0, 0.0);

        let contacts = slide_move(&world, &mut position, &mut velocity, Vec3::new(0.0, 1.0, 0.0), &config);

        assert!(contacts.hit_ceiling);
        assert!(position.y + config.height <= 2.0);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn test_embedded_body_can_walk_out() {
        let world = create_test_world();
        let config = MovementConfig::default();

        // Inside the wall
        let mut position = Vec3::new(5.5, 0.0, 0.0);
        let mut velocity = Vec3::ZERO;

        slide_move(&world, &mut position, &mut velocity, Vec3::new(1.0, 0.0, 0.0), &config);

        assert!((position.x - 6.5).abs() < 1e-5);
    }
}
