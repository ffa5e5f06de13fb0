#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-mushroom charge, pull and collect lifecycle.
//!
//! A mushroom becomes targeted when the pointer is pressed over it and
//! charges for as long as the button stays held. The normalized charge drives
//! the pull animation toward the pointer's ground point. Reaching full charge
//! publishes [`Event::MushroomPulled`]; releasing early or being disabled
//! snaps the mushroom back and republishes zero progress.

use std::rc::Rc;

use glam::{EulerRot, Quat, Vec3};
use shroom_sniff_core::{
    Event, EventBus, MushroomCategory, MushroomId, MushroomType, PointerState, RuntimeSettings,
    Transform,
};

const FALLBACK_SHRINK: f32 = 0.6;
const MIN_SHRINK: f32 = 0.05;

/// Lifecycle stage of a mushroom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectionState {
    /// Waiting for the pointer.
    Idle,
    /// Pressed on but not yet charging.
    Targeted,
    /// Being held; the charge timer is advancing.
    Charging,
    /// Fully charged and pulled; terminal until respawned.
    Collected,
    /// Ignoring input until re-enabled.
    Disabled,
}

/// Mushroom entity running its own collection state machine.
#[derive(Clone, Debug)]
pub struct Mushroom {
    id: MushroomId,
    category: MushroomCategory,
    kind: MushroomType,
    settings: Rc<RuntimeSettings>,
    state: CollectionState,
    charge_timer: f32,
    initial: Transform,
    transform: Transform,
}

impl Mushroom {
    /// Creates a mushroom resting at `position`, scaled by its type's size multiplier.
    #[must_use]
    pub fn spawn(
        id: MushroomId,
        category: MushroomCategory,
        kind: MushroomType,
        position: Vec3,
        settings: Rc<RuntimeSettings>,
    ) -> Self {
        let initial = resting_transform(position, kind, &settings);
        Self {
            id,
            category,
            kind,
            settings,
            state: CollectionState::Idle,
            charge_timer: 0.0,
            initial,
            transform: initial,
        }
    }

    /// Reinitializes a pooled mushroom of the same category for a new spawn.
    pub fn respawn(
        &mut self,
        id: MushroomId,
        kind: MushroomType,
        position: Vec3,
        settings: Rc<RuntimeSettings>,
    ) {
        *self = Self::spawn(id, self.category, kind, position, settings);
    }

    /// Advances the state machine by `dt` seconds using the sampled pointer.
    pub fn tick(&mut self, dt: f32, pointer: &PointerState, bus: &mut EventBus) {
        if matches!(
            self.state,
            CollectionState::Collected | CollectionState::Disabled
        ) {
            return;
        }

        if pointer.pressed && pointer.hovered == Some(self.id) && self.state == CollectionState::Idle
        {
            self.state = CollectionState::Targeted;
        }

        let targeted = matches!(
            self.state,
            CollectionState::Targeted | CollectionState::Charging
        );
        if targeted && pointer.held {
            self.state = CollectionState::Charging;
            self.advance_charge(dt, pointer.ground_point, bus);
        } else if targeted || self.charge_timer > 0.0 {
            self.reset_charge(bus);
        }
    }

    /// Enables or disables pointer interaction.
    ///
    /// Disabling mid-charge resets the charge without pulling the mushroom.
    pub fn set_enabled(&mut self, enabled: bool, bus: &mut EventBus) {
        match (enabled, self.state) {
            (_, CollectionState::Collected) => {}
            (true, CollectionState::Disabled) => self.state = CollectionState::Idle,
            (true, _) | (false, CollectionState::Disabled) => {}
            (false, state) => {
                if state == CollectionState::Charging || self.charge_timer > 0.0 {
                    self.reset_charge(bus);
                }
                self.state = CollectionState::Disabled;
            }
        }
    }

    /// Identifier assigned by the world.
    #[must_use]
    pub const fn id(&self) -> MushroomId {
        self.id
    }

    /// Visual family.
    #[must_use]
    pub const fn category(&self) -> MushroomCategory {
        self.category
    }

    /// Fine-grained type.
    #[must_use]
    pub const fn kind(&self) -> MushroomType {
        self.kind
    }

    /// Current lifecycle stage.
    #[must_use]
    pub const fn state(&self) -> CollectionState {
        self.state
    }

    /// Normalized charge in `[0, 1]`.
    #[must_use]
    pub fn charge_progress(&self) -> f32 {
        (self.charge_timer / self.settings.effective_hold_duration()).clamp(0.0, 1.0)
    }

    /// Current animated transform.
    #[must_use]
    pub const fn transform(&self) -> Transform {
        self.transform
    }

    /// Transform the mushroom spawned with.
    #[must_use]
    pub const fn resting_transform(&self) -> Transform {
        self.initial
    }

    /// Reports whether the mushroom still accepts input.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        !matches!(
            self.state,
            CollectionState::Collected | CollectionState::Disabled
        )
    }

    fn advance_charge(&mut self, dt: f32, ground_point: Option<Vec3>, bus: &mut EventBus) {
        let duration = self.settings.effective_hold_duration();
        self.charge_timer = (self.charge_timer + dt.max(0.0)).min(duration);
        let progress = self.charge_progress();
        self.transform = pull_transform(&self.initial, &self.settings, progress, ground_point);
        bus.publish(Event::ChargeProgressChanged {
            id: self.id,
            progress,
        });

        if self.charge_timer >= duration {
            self.state = CollectionState::Collected;
            bus.publish(Event::MushroomPulled {
                id: self.id,
                category: self.category,
                kind: self.kind,
            });
            bus.publish(Event::ChargeProgressChanged {
                id: self.id,
                progress: 0.0,
            });
        }
    }

    fn reset_charge(&mut self, bus: &mut EventBus) {
        self.charge_timer = 0.0;
        self.transform = self.initial;
        self.state = CollectionState::Idle;
        bus.publish(Event::ChargeProgressChanged {
            id: self.id,
            progress: 0.0,
        });
    }
}

/// Transform of a mushroom pulled to `progress` toward `ground_point`.
///
/// Without a ground point the mushroom keeps its resting position but still
/// rotates and shrinks.
#[must_use]
pub fn pull_transform(
    resting: &Transform,
    settings: &RuntimeSettings,
    progress: f32,
    ground_point: Option<Vec3>,
) -> Transform {
    let t = settings
        .pull_curve
        .evaluate(progress.clamp(0.0, 1.0))
        .clamp(0.0, 1.0);

    let position = match ground_point {
        Some(point) => resting
            .position
            .lerp(point + settings.pull_position_offset, t),
        None => resting.position,
    };
    let spin = settings.pull_rotation_offset * (t * settings.pull_rotation_speed.max(0.0));
    let rotation = resting.rotation * euler_degrees(spin);
    let scale = resting.scale * Vec3::ONE.lerp(shrink_target(settings.pull_scale_multiplier), t);

    Transform {
        position,
        rotation,
        scale,
    }
}

fn resting_transform(position: Vec3, kind: MushroomType, settings: &RuntimeSettings) -> Transform {
    let size = settings
        .size_multiplier(kind)
        .map_or(1.0, |multiplier| multiplier.max(0.0));
    Transform::at(position, size)
}

fn shrink_target(multiplier: Vec3) -> Vec3 {
    if multiplier == Vec3::ZERO || multiplier.cmpge(Vec3::ONE).all() {
        return Vec3::splat(FALLBACK_SHRINK);
    }
    multiplier.clamp(Vec3::splat(MIN_SHRINK), Vec3::ONE)
}

/// Rotation from Euler angles in degrees, applied roll first, then pitch, then yaw.
fn euler_degrees(angles: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        angles.y.to_radians(),
        angles.x.to_radians(),
        angles.z.to_radians(),
    )
}
