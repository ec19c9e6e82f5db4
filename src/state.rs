//! Shared application state.

use std::io;
use std::path::PathBuf;

use rusqlite::Connection;
use tracing::info;

use crate::config::Settings;
use crate::db::{self, DatabaseError};
use crate::gateway::Gateway;
use crate::media::MediaStore;

/// Long-lived state shared by every request handler. Database connections
/// are opened per use; SQLite in WAL mode handles the concurrency.
pub struct AppState {
    pub settings: Settings,
    pub gateway: Gateway,
}

impl AppState {
    pub fn new(settings: Settings) -> io::Result<Self> {
        std::fs::create_dir_all(&settings.data_dir)?;
        let gateway = Gateway::from_settings(&settings);
        info!(
            data_dir = %settings.data_dir.display(),
            simulation = settings.simulation_mode(),
            "Application state initialized"
        );
        Ok(Self { settings, gateway })
    }

    pub fn database_path(&self) -> PathBuf {
        self.settings.data_dir.join("neuroscan.db")
    }

    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::open_database(&self.database_path())
    }

    pub fn media(&self) -> io::Result<MediaStore> {
        MediaStore::new(self.settings.data_dir.join("media"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    pub(crate) fn test_settings(dir: &std::path::Path) -> Settings {
        Settings {
            port: 0,
            data_dir: dir.to_path_buf(),
            model_url: None,
            model_name: "medgemma:latest".into(),
            api_key: None,
            simulated_delay: Duration::ZERO,
        }
    }

    #[test]
    fn state_creates_data_dir_and_opens_db() {
        let tmp = tempfile::tempdir().unwrap();
        let state = AppState::new(test_settings(&tmp.path().join("nested"))).unwrap();
        assert!(state.settings.data_dir.exists());

        let conn = state.open_db().unwrap();
        assert_eq!(crate::db::sqlite::get_current_version(&conn), 1);
    }
}
