#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawn placement solver that scatters mushrooms across a tile.
//!
//! Candidate points are drawn uniformly from the tile footprint shrunk by the
//! type's padding and accepted only when they keep the type's minimum spacing
//! from every mushroom already placed during the run. Running out of attempts
//! is a soft failure: the slot is skipped.

use glam::Vec3;
use rand::Rng;
use shroom_sniff_core::{MushroomType, Tile, TypeFloatTable};

/// Spacing rules applied to a single placement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpawnConstraint {
    minimum_spacing: f32,
    padding: f32,
}

impl SpawnConstraint {
    /// Creates a constraint; negative values are clamped to zero.
    #[must_use]
    pub fn new(minimum_spacing: f32, padding: f32) -> Self {
        Self {
            minimum_spacing: minimum_spacing.max(0.0),
            padding: padding.max(0.0),
        }
    }

    /// Looks up the constraint for `kind`; absent entries resolve to zero.
    #[must_use]
    pub fn for_type(kind: MushroomType, spacing: &TypeFloatTable, padding: &TypeFloatTable) -> Self {
        let lookup = |table: &TypeFloatTable| table.get(&kind).copied().unwrap_or(0.0);
        Self::new(lookup(spacing), lookup(padding))
    }

    /// Minimum distance to every other placement.
    #[must_use]
    pub const fn minimum_spacing(&self) -> f32 {
        self.minimum_spacing
    }

    /// Inset from the tile edge.
    #[must_use]
    pub const fn padding(&self) -> f32 {
        self.padding
    }
}

/// Finds a position on `tile` that satisfies `constraint` against `placed`.
///
/// Makes up to `max_attempts` draws (at least one) and returns `None` when
/// none of them keeps the required spacing.
pub fn solve<R: Rng + ?Sized>(
    tile: &Tile,
    constraint: SpawnConstraint,
    placed: &[Vec3],
    max_attempts: u32,
    rng: &mut R,
) -> Option<Vec3> {
    for _ in 0..max_attempts.max(1) {
        let candidate = sample_point(tile, constraint.padding, rng);
        if is_spaced(candidate, constraint.minimum_spacing, placed) {
            return Some(candidate);
        }
    }
    None
}

fn sample_point<R: Rng + ?Sized>(tile: &Tile, padding: f32, rng: &mut R) -> Vec3 {
    let (half_x, half_z) = tile.half_extents();
    let half_x = usable_half_extent(half_x, padding);
    let half_z = usable_half_extent(half_z, padding);
    let center = tile.center();
    Vec3::new(
        center.x + rng.gen_range(-half_x..=half_x),
        center.y,
        center.z + rng.gen_range(-half_z..=half_z),
    )
}

/// Half extent left after padding; non-finite extents collapse to the centre.
fn usable_half_extent(half_extent: f32, padding: f32) -> f32 {
    let usable = half_extent - padding;
    if usable.is_finite() {
        usable.max(0.0)
    } else {
        0.0
    }
}

fn is_spaced(candidate: Vec3, minimum_spacing: f32, placed: &[Vec3]) -> bool {
    if minimum_spacing <= 0.0 {
        return true;
    }
    let required = minimum_spacing * minimum_spacing;
    placed
        .iter()
        .all(|position| position.distance_squared(candidate) >= required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use shroom_sniff_core::TileId;

    #[test]
    fn padding_larger_than_tile_collapses_to_center() {
        let tile = Tile::new(TileId::new(0), Vec3::new(3.0, 1.0, -2.0), Vec3::splat(1.0));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let point = sample_point(&tile, 5.0, &mut rng);
        assert_eq!(point, Vec3::new(3.0, 1.0, -2.0));
    }

    #[test]
    fn spacing_uses_squared_distance() {
        let placed = [Vec3::ZERO];
        assert!(is_spaced(Vec3::new(1.0, 0.0, 0.0), 1.0, &placed));
        assert!(!is_spaced(Vec3::new(0.5, 0.0, 0.5), 1.0, &placed));
        assert!(is_spaced(Vec3::ZERO, 0.0, &placed));
    }

    #[test]
    fn negative_constraints_clamp_to_zero() {
        let constraint = SpawnConstraint::new(-1.0, -0.5);
        assert_eq!(constraint.minimum_spacing(), 0.0);
        assert_eq!(constraint.padding(), 0.0);
    }
}
