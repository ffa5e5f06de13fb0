use std::time::Duration;

use glam::Vec3;
use shroom_sniff_core::{MushroomId, PointerState};
use shroom_sniff_world::{query, World};

/// Scripted stand-in for a human player.
///
/// Sweeps a cursor across the ground plane towards the nearest interactive
/// mushroom and holds the button once the cursor is over it.
#[derive(Debug)]
pub(crate) struct ScriptedPlayer {
    cursor: Vec3,
    speed: f32,
    reach: f32,
    target: Option<MushroomId>,
    holding: bool,
}

impl ScriptedPlayer {
    /// Creates a player whose cursor travels `speed` units per second.
    pub(crate) fn new(speed: f32, reach: f32) -> Self {
        Self {
            cursor: Vec3::ZERO,
            speed: speed.max(0.0),
            reach: reach.max(0.0),
            target: None,
            holding: false,
        }
    }

    /// Moves the cursor for one frame and samples the resulting pointer.
    pub(crate) fn sample(&mut self, world: &World, dt: Duration) -> PointerState {
        let Some((id, goal)) = self.pick_target(world) else {
            self.target = None;
            self.holding = false;
            return PointerState {
                ground_point: Some(self.cursor),
                ..PointerState::default()
            };
        };
        if self.target != Some(id) {
            self.target = Some(id);
            self.holding = false;
        }

        let step = self.speed * dt.as_secs_f32();
        let offset = (goal - self.cursor) * Vec3::new(1.0, 0.0, 1.0);
        if offset.length() <= step {
            self.cursor += offset;
        } else {
            self.cursor += offset.normalize_or_zero() * step;
        }

        let hovered = query::mushroom_at(world, self.cursor, self.reach);
        let over_target = hovered == self.target;
        let pressed = over_target && !self.holding;
        self.holding = over_target;

        PointerState {
            pressed,
            held: self.holding,
            hovered,
            ground_point: Some(self.cursor),
        }
    }

    fn pick_target(&self, world: &World) -> Option<(MushroomId, Vec3)> {
        if let Some(current) = self
            .target
            .and_then(|id| query::mushroom(world, id))
            .filter(|mushroom| mushroom.is_interactive())
        {
            return Some((current.id(), current.resting_transform().position));
        }

        query::mushrooms(world)
            .iter()
            .filter(|mushroom| mushroom.is_interactive())
            .map(|mushroom| {
                let position = mushroom.resting_transform().position;
                (mushroom.id(), position, position.distance_squared(self.cursor))
            })
            .min_by(|left, right| left.2.total_cmp(&right.2))
            .map(|(id, position, _)| (id, position))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use shroom_sniff_core::{
        Command, EventBus, MushroomCategory, MushroomType, PullCurve, RuntimeSettings,
        TypeFloatTable,
    };
    use shroom_sniff_world as world;

    #[test]
    fn walks_to_the_nearest_mushroom_and_presses_once() {
        let mut world = World::new();
        let mut bus = EventBus::new();
        world::apply(
            &mut world,
            Command::RegisterPrefabs {
                categories: vec![MushroomCategory::P1],
            },
            &mut bus,
        );
        spawn(&mut world, &mut bus, Vec3::new(2.0, 0.0, 0.0));
        spawn(&mut world, &mut bus, Vec3::new(-5.0, 0.0, 0.0));

        let mut player = ScriptedPlayer::new(1.0, 0.25);
        let first = player.sample(&world, Duration::from_secs(1));
        assert!(!first.pressed, "still out of reach");
        assert_eq!(first.ground_point, Some(Vec3::new(1.0, 0.0, 0.0)));

        let second = player.sample(&world, Duration::from_secs(1));
        assert!(second.pressed && second.held);
        assert_eq!(second.hovered, Some(MushroomId::new(0)));

        let third = player.sample(&world, Duration::from_secs(1));
        assert!(!third.pressed && third.held, "the press is held, not repeated");
    }

    #[test]
    fn idles_when_nothing_is_left() {
        let world = World::new();
        let mut player = ScriptedPlayer::new(1.0, 0.25);

        let pointer = player.sample(&world, Duration::from_secs(1));

        assert_eq!(
            pointer,
            PointerState {
                ground_point: Some(Vec3::ZERO),
                ..PointerState::default()
            }
        );
    }

    fn spawn(world: &mut World, bus: &mut EventBus, position: Vec3) {
        world::apply(
            world,
            Command::SpawnMushroom {
                category: MushroomCategory::P1,
                kind: MushroomType::Medium,
                position,
                settings: Rc::new(RuntimeSettings {
                    hold_to_collect_duration: 1.0,
                    pull_curve: PullCurve::Linear,
                    pull_position_offset: Vec3::ZERO,
                    pull_rotation_offset: Vec3::ZERO,
                    pull_rotation_speed: 1.0,
                    pull_scale_multiplier: Vec3::splat(0.7),
                    size_multipliers: TypeFloatTable::default(),
                }),
            },
            bus,
        );
    }
}
