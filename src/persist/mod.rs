pub mod csv;
pub mod remote;

use crate::models::ProfileRecord;
use remote::RemoteTable;
use std::path::PathBuf;
use tracing::{error, info};

/// Where the deduplicated records end up.
pub struct Persistence {
    csv_path: Option<PathBuf>,
    remote: Option<Box<dyn RemoteTable>>,
}

/// What a save actually managed to write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    pub csv_path: Option<PathBuf>,
    pub remote_saved: Option<usize>,
}

impl Persistence {
    pub fn new(csv_path: Option<PathBuf>, remote: Option<Box<dyn RemoteTable>>) -> Self {
        Self { csv_path, remote }
    }

    /// Writes the flat file, then replaces the remote table. A failure in one
    /// does not stop the other.
    pub async fn save(&self, records: &[ProfileRecord]) -> SaveOutcome {
        let mut outcome = SaveOutcome::default();

        if let Some(path) = &self.csv_path {
            match csv::write_csv(path, records) {
                Ok(()) => {
                    info!(path = %path.display(), count = records.len(), "saved unique profiles");
                    outcome.csv_path = Some(path.clone());
                }
                Err(e) => error!(path = %path.display(), error = %e, "could not write csv"),
            }
        }

        if let Some(table) = &self.remote {
            outcome.remote_saved = Some(remote::replace_all(table.as_ref(), records).await);
        }

        outcome
    }
}
