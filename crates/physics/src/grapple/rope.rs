//! Rope and reel constraint math.
//!
//! These are pure functions of positions and time so the controller can
//! apply them without knowing about hook state.

use glam::Vec3;

/// Velocity that reels the eye toward `anchor` for one step.
///
/// The eye-to-anchor distance decays exponentially at `pull_rate` and never
/// drops below `min_distance`. The resulting speed is capped at `max_speed`.
/// Returns zero once the eye is within `min_distance`.
pub fn reel_velocity(
    eye: Vec3,
    anchor: Vec3,
    pull_rate: f32,
    min_distance: f32,
    max_speed: f32,
    dt: f32,
) -> Vec3 {
    let to_anchor = anchor - eye;
    let distance = to_anchor.length();
    if !(dt > 0.0) || !distance.is_finite() || distance <= min_distance || distance <= f32::EPSILON {
        return Vec3::ZERO;
    }

    let target = (distance * (-pull_rate.max(0.0) * dt).exp()).max(min_distance);
    let speed = ((distance - target) / dt).min(max_speed.max(0.0));
    to_anchor / distance * speed
}

/// Offset that brings the eye back onto a rope of `length` around `anchor`.
///
/// `None` while the rope is slack.
pub fn rope_correction(eye: Vec3, anchor: Vec3, length: f32) -> Option<Vec3> {
    let from_anchor = eye - anchor;
    let distance = from_anchor.length();
    if distance <= length || distance <= f32::EPSILON {
        return None;
    }
    let on_rope = anchor + from_anchor / distance * length;
    Some(on_rope - eye)
}

/// Remove the velocity component carrying the eye away from the anchor.
pub fn remove_outward_velocity(velocity: Vec3, eye: Vec3, anchor: Vec3) -> Vec3 {
    let outward = (eye - anchor).normalize_or_zero();
    let radial = velocity.dot(outward);
    if radial > 0.0 {
        velocity - outward * radial
    } else {
        velocity
    }
}
