use std::{
    collections::{BTreeMap, VecDeque},
    rc::Rc,
};

use glam::Vec3;
use log::warn;
use shroom_sniff_core::{MushroomCategory, MushroomId, MushroomType, RuntimeSettings};
use shroom_sniff_system_collection::Mushroom;

/// Retired mushrooms kept per category for reuse.
#[derive(Debug, Default)]
pub(crate) struct MushroomPool {
    idle: BTreeMap<MushroomCategory, VecDeque<Mushroom>>,
}

impl MushroomPool {
    /// Replaces the registered categories, dropping every idle mushroom.
    pub(crate) fn register(&mut self, categories: &[MushroomCategory]) {
        self.idle.clear();
        for category in categories {
            let _ = self.idle.entry(*category).or_default();
        }
    }

    /// Reuses an idle mushroom of `category` or creates a new one.
    pub(crate) fn acquire(
        &mut self,
        id: MushroomId,
        category: MushroomCategory,
        kind: MushroomType,
        position: Vec3,
        settings: Rc<RuntimeSettings>,
    ) -> Option<Mushroom> {
        let Some(idle) = self.idle.get_mut(&category) else {
            warn!("no pool registered for {category:?} mushrooms");
            return None;
        };

        let mushroom = match idle.pop_front() {
            Some(mut reused) => {
                reused.respawn(id, kind, position, settings);
                reused
            }
            None => Mushroom::spawn(id, category, kind, position, settings),
        };
        Some(mushroom)
    }

    /// Returns a mushroom for later reuse.
    pub(crate) fn release(&mut self, mushroom: Mushroom) {
        if let Some(idle) = self.idle.get_mut(&mushroom.category()) {
            idle.push_back(mushroom);
        }
    }

    /// Number of idle mushrooms in `category`.
    pub(crate) fn idle_count(&self, category: MushroomCategory) -> usize {
        self.idle.get(&category).map_or(0, VecDeque::len)
    }
}
