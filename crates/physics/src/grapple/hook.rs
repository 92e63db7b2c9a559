//! Grappling hook state machine.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{AnchorId, CollisionWorld};

use super::config::HookConfig;

/// Where a hook is in its cycle.
///
/// `Casting` exists only while a cast is being resolved: a cast always
/// leaves the hook `Attached` or `Idle` before returning.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum HookState {
    #[default]
    Idle,
    Casting,
    /// Hooked onto an anchor with a rope of fixed length.
    Attached { anchor: AnchorId, rope_length: f32 },
    /// Reeling in toward the anchor.
    Pulling {
        anchor: AnchorId,
        /// Eye-to-anchor distance at the end of the last step.
        distance: f32,
        /// Total distance reeled in so far.
        pulled_distance: f32,
        /// Seconds spent pulling.
        pull_time: f32,
    },
}

impl HookState {
    pub fn anchor(&self) -> Option<AnchorId> {
        match *self {
            HookState::Attached { anchor, .. } | HookState::Pulling { anchor, .. } => Some(anchor),
            HookState::Idle | HookState::Casting => None,
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, HookState::Idle)
    }

    #[inline]
    pub fn is_pulling(&self) -> bool {
        matches!(self, HookState::Pulling { .. })
    }
}

/// Result of a cast request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOutcome {
    Attached(AnchorId),
    /// Nothing castable; the hook is back to `Idle`.
    Missed,
    /// The hook was already in use.
    Ignored,
}

/// What the hook asks of the movement integrator for one step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HookConstraint {
    #[default]
    Free,
    /// Keep the eye within `length` of `anchor`.
    Rope { anchor: Vec3, length: f32 },
    /// Replace gravity and locomotion with a reel toward `anchor`.
    Reel {
        anchor: Vec3,
        rate: f32,
        min_distance: f32,
        max_speed: f32,
    },
}

/// A player's grappling hook.
///
/// The hook only ever refers to anchors by id. The anchor set of a world is
/// fixed, so an id taken from a world stays valid for that world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grapple {
    state: HookState,
}

impl Grapple {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HookState {
        self.state
    }

    pub fn anchor(&self) -> Option<AnchorId> {
        self.state.anchor()
    }

    /// Throw the hook from `origin` along `direction`.
    ///
    /// Only an idle hook can be cast. The cast resolves immediately: the hook
    /// attaches to the best anchor in reach or falls back to `Idle`.
    pub fn cast(
        &mut self,
        origin: Vec3,
        direction: Vec3,
        world: &CollisionWorld,
        config: &HookConfig,
    ) -> CastOutcome {
        if !self.state.is_idle() {
            log::trace!("cast ignored, hook is {:?}", self.state);
            return CastOutcome::Ignored;
        }

        self.state = HookState::Casting;

        match world.find_anchor(origin, direction, config.cast_range, config.cast_angle_tolerance) {
            Some((anchor, distance)) => {
                log::debug!("hook attached to anchor {} at {:.2}m", anchor.0, distance);
                self.state = HookState::Attached {
                    anchor,
                    rope_length: distance,
                };
                CastOutcome::Attached(anchor)
            }
            None => {
                log::debug!("hook cast missed");
                self.state = HookState::Idle;
                CastOutcome::Missed
            }
        }
    }

    /// Start reeling in. Only an attached hook can start pulling.
    pub fn pull(&mut self) -> bool {
        match self.state {
            HookState::Attached { anchor, rope_length } => {
                log::debug!("hook pulling toward anchor {}", anchor.0);
                self.state = HookState::Pulling {
                    anchor,
                    distance: rope_length,
                    pulled_distance: 0.0,
                    pull_time: 0.0,
                };
                true
            }
            _ => false,
        }
    }

    /// Detach. Safe from any state; velocity is left to the player.
    pub fn release(&mut self) {
        if !self.state.is_idle() {
            log::debug!("hook released from {:?}", self.state);
        }
        self.state = HookState::Idle;
    }

    /// Constraint for the next integration step.
    pub fn constraint(&self, world: &CollisionWorld, config: &HookConfig) -> HookConstraint {
        let anchor_position = |id: AnchorId| world.anchor(id).map(|a| a.position);
        match self.state {
            HookState::Attached { anchor, rope_length } => match anchor_position(anchor) {
                Some(anchor) => HookConstraint::Rope {
                    anchor,
                    length: rope_length,
                },
                None => HookConstraint::Free,
            },
            HookState::Pulling { anchor, .. } => match anchor_position(anchor) {
                Some(anchor) => HookConstraint::Reel {
                    anchor,
                    rate: config.pull_rate,
                    min_distance: config.min_distance,
                    max_speed: config.max_pull_speed,
                },
                None => HookConstraint::Free,
            },
            HookState::Idle | HookState::Casting => HookConstraint::Free,
        }
    }

    /// Bookkeeping after the owning player has been integrated.
    ///
    /// Updates pull progress and detaches when the anchor is gone or further
    /// than the break distance. Returns `true` if the hook detached.
    pub fn end_of_tick(
        &mut self,
        eye: Vec3,
        dt: f32,
        world: &CollisionWorld,
        config: &HookConfig,
    ) -> bool {
        let Some(id) = self.state.anchor() else {
            return false;
        };
        let distance = match world.anchor(id) {
            Some(anchor) => eye.distance(anchor.position),
            None => {
                log::debug!("anchor {} no longer exists, detaching", id.0);
                self.release();
                return true;
            }
        };

        if !distance.is_finite() || distance > config.break_distance {
            log::debug!("hook snapped at {:.2}m", distance);
            self.release();
            return true;
        }

        if let HookState::Pulling {
            distance: ref mut last,
            ref mut pulled_distance,
            ref mut pull_time,
            ..
        } = self.state
        {
            *pulled_distance += (*last - distance).max(0.0);
            *pull_time += dt.max(0.0);
            *last = distance;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Aabb, ContentFlags};

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_platform(
            Aabb::new(Vec3::new(-20.0, -1.0, -20.0), Vec3::new(20.0, 0.0, 20.0)),
            ContentFlags::SOLID,
        );
        world.add_anchor(Vec3::new(0.0, 1.4, 5.0));
        world
    }

    #[test]
    fn test_cast_attaches() {
        let world = create_test_world();
        let config = HookConfig::default();
        let mut hook = Grapple::new();

        let outcome = hook.cast(Vec3::new(0.0, 1.4, 0.0), Vec3::Z, &world, &config);

        assert_eq!(outcome, CastOutcome::Attached(AnchorId(0)));
        match hook.state() {
            HookState::Attached { anchor, rope_length } => {
                assert_eq!(anchor, AnchorId(0));
                assert!((rope_length - 5.0).abs() < 1e-5);
            }
            other => panic!("Expected Attached, got {:?}", other),
        }
    }

    #[test]
    fn test_cast_miss_returns_to_idle() {
        let world = create_test_world();
        let config = HookConfig::default();
        let mut hook = Grapple::new();

        let outcome = hook.cast(Vec3::new(0.0, 1.4, 0.0), Vec3::NEG_Z, &world, &config);

        assert_eq!(outcome, CastOutcome::Missed);
        assert_eq!(hook.state(), HookState::Idle);
    }

    #[test]
    fn test_cast_zero_direction_misses() {
        let world = create_test_world();
        let mut hook = Grapple::new();
        let outcome = hook.cast(Vec3::new(0.0, 1.4, 0.0), Vec3::ZERO, &world, &HookConfig::default());
        assert_eq!(outcome, CastOutcome::Missed);
        assert!(hook.state().is_idle());
    }

    #[test]
    fn test_recast_ignored_while_attached() {
        let world = create_test_world();
        let config = HookConfig::default();
        let mut hook = Grapple::new();
        hook.cast(Vec3::new(0.0, 1.4, 0.0), Vec3::Z, &world, &config);
        let before = hook.state();

        let outcome = hook.cast(Vec3::new(0.0, 1.4, 0.0), Vec3::Z, &world, &config);

        assert_eq!(outcome, CastOutcome::Ignored);
        assert_eq!(hook.state(), before);
    }

    #[test]
    fn test_pull_requires_attachment() {
        let world = create_test_world();
        let config = HookConfig::default();
        let mut hook = Grapple::new();

        assert!(!hook.pull(), "Idle hook should not pull");
        assert!(hook.state().is_idle());

        hook.cast(Vec3::new(0.0, 1.4, 0.0), Vec3::Z, &world, &config);
        assert!(hook.pull());
        assert!(hook.state().is_pulling());
        assert!(matches!(hook.constraint(&world, &config), HookConstraint::Reel { .. }));
    }

    #[test]
    fn test_release_from_any_state() {
        let world = create_test_world();
        let config = HookConfig::default();
        let mut hook = Grapple::new();

        hook.release();
        assert!(hook.state().is_idle());

        hook.cast(Vec3::new(0.0, 1.4, 0.0), Vec3::Z, &world, &config);
        hook.release();
        assert!(hook.state().is_idle());

        hook.cast(Vec3::new(0.0, 1.4, 0.0), Vec3::Z, &world, &config);
        hook.pull();
        hook.release();
        assert!(hook.state().is_idle());
        assert_eq!(hook.constraint(&world, &config), HookConstraint::Free);
    }

    #[test]
    fn test_end_of_tick_tracks_pull_and_breaks() {
        let world = create_test_world();
        let config = HookConfig::default();
        let mut hook = Grapple::new();
        hook.cast(Vec3::new(0.0, 1.4, 0.0), Vec3::Z, &world, &config);
        hook.pull();

        assert!(!hook.end_of_tick(Vec3::new(0.0, 1.4, 2.0), 0.1, &world, &config));
        match hook.state() {
            HookState::Pulling { distance, pulled_distance, pull_time, .. } => {
                assert!((distance - 3.0).abs() < 1e-5);
                assert!((pulled_distance - 2.0).abs() < 1e-5);
                assert!((pull_time - 0.1).abs() < 1e-6);
            }
            other => panic!("Expected Pulling, got {:?}", other),
        }

        let far = Vec3::new(0.0, 1.4, 5.0 - config.break_distance - 1.0);
        assert!(hook.end_of_tick(far, 0.1, &world, &config));
        assert!(hook.state().is_idle());
    }

    #[test]
    fn test_missing_anchor_detaches() {
        let world = create_test_world();
        let config = HookConfig::default();
        let mut hook = Grapple::new();
        hook.cast(Vec3::new(0.0, 1.4, 0.0), Vec3::Z, &world, &config);

        let empty = CollisionWorld::new();
        assert_eq!(hook.constraint(&empty, &config), HookConstraint::Free);
        assert!(hook.end_of_tick(Vec3::ZERO, 0.1, &empty, &config));
        assert!(hook.state().is_idle());
    }
}
