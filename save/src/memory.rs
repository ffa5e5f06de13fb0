use shroom_sniff_core::GameConfig;

use crate::{ProgressStore, SaveData, SaveError};

/// Progress store that keeps the record in memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: SaveData,
    revision: u64,
}

impl MemoryStore {
    /// Wraps an existing record.
    #[must_use]
    pub fn new(data: SaveData) -> Self {
        Self { data, revision: 0 }
    }

    /// Starts from the defaults derived from `config`.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(SaveData::from_config(config))
    }
}

impl ProgressStore for MemoryStore {
    fn data(&self) -> &SaveData {
        &self.data
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn replace(&mut self, data: SaveData) -> Result<(), SaveError> {
        self.data = data;
        self.revision += 1;
        Ok(())
    }
}
