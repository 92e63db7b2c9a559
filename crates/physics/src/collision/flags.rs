//! Content flags for collision filtering.

use serde::{Deserialize, Serialize};

/// Content flags describe what a volume is made of.
///
/// Queries take a mask and only consider volumes whose contents intersect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// Empty space.
    pub const EMPTY: Self = Self(0);

    /// Blocks movement and line of sight.
    pub const SOLID: Self = Self(1 << 0);

    /// Level exit volume. Does not block anything.
    pub const GOAL: Self = Self(1 << 1);

    /// Everything a player body collides with.
    pub const MASK_PLAYER_SOLID: Self = Self::SOLID;

    /// Everything that blocks a grappling line.
    pub const MASK_SIGHT: Self = Self::SOLID;

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
