use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{info, warn};
use shroom_sniff_core::GameConfig;

use crate::{ProgressStore, SaveData, SaveError};

/// Progress store backed by a JSON file that is rewritten on every mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: SaveData,
    revision: u64,
}

impl FileStore {
    /// File name used when the caller does not choose one.
    pub const DEFAULT_FILE_NAME: &'static str = "app-save.json";

    /// Loads the record at `path`.
    ///
    /// A missing or unreadable file is not an error: the record is rebuilt
    /// from `config` and written on the first mutation.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>, config: &GameConfig) -> Self {
        let path = path.into();
        let data = match load(&path) {
            Ok(Some(data)) => data,
            Ok(None) => {
                info!(
                    "no save found at {}; starting from defaults",
                    path.display()
                );
                SaveData::from_config(config)
            }
            Err(error) => {
                warn!("{error}; rebuilding save from defaults");
                SaveData::from_config(config)
            }
        };

        Self {
            path,
            data,
            revision: 0,
        }
    }

    /// Location of the save file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for FileStore {
    fn data(&self) -> &SaveData {
        &self.data
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn replace(&mut self, data: SaveData) -> Result<(), SaveError> {
        self.data = data;
        self.revision += 1;
        write(&self.path, &self.data)
    }
}

fn load(path: &Path) -> Result<Option<SaveData>, SaveError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SaveError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| SaveError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn write(path: &Path, data: &SaveData) -> Result<(), SaveError> {
    let encoded = serde_json::to_vec_pretty(data).map_err(SaveError::Encode)?;
    let io_error = |source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    // Whole-file replace through a staging file.
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, encoded).map_err(io_error)?;
    fs::rename(&staging, path).map_err(io_error)
}
