// Application state module
// Holds the loaded configuration and the stores rooted at the data directory

use std::path::{Path, PathBuf};

use super::types::Config;
use crate::storage::{QuoteStore, SubmissionStore};

/// Shared, read-only application state
pub struct AppState {
    pub config: Config,
    pub data_root: PathBuf,
    /// `<data_root>/leads`: bookings (partitioned), leads (flat) and the lead log
    pub leads: SubmissionStore,
    /// `<data_root>/partners`: doctor partnership applications
    pub partners: SubmissionStore,
    /// `<data_root>/quotes`
    pub quotes: QuoteStore,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let data_root = PathBuf::from(&config.storage.data_root);
        Self {
            config: config.clone(),
            leads: SubmissionStore::new(data_root.join("leads")),
            partners: SubmissionStore::new(data_root.join("partners")),
            quotes: QuoteStore::new(data_root.join("quotes")),
            data_root,
        }
    }

    /// Path reported back to clients, relative to the data root
    pub fn display_path(&self, path: &Path) -> String {
        SubmissionStore::relative_to(path, &self.data_root)
    }
}
