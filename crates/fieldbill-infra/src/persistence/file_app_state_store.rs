//! File-based implementation of AppStateStore

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use fieldbill_domain::model::AppState;
use fieldbill_domain::repository::AppStateStore;
use fieldbill_types::Result;

const STATE_FILE: &str = "app_state.json";

/// Stores the application state as a JSON document on disk
pub struct FileAppStateStore {
    path: PathBuf,
}

impl FileAppStateStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            path: data_dir.join(STATE_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AppStateStore for FileAppStateStore {
    fn load(&self) -> Result<Option<AppState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&self.path)?);
        match serde_json::from_reader(reader) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(path = %self.path.display(), "ignoring unreadable app state: {}", e);
                Ok(None)
            }
        }
    }

    fn save(&self, state: &AppState) -> Result<()> {
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(writer, state)?;
        debug!(path = %self.path.display(), "app state saved");
        Ok(())
    }
}
