/// Knowledge-base reload support.
///
/// The SHA-256 of the KB file contents serves as the change fingerprint.
/// When it differs from the fingerprint of the collection currently being
/// served, the file is re-parsed into a fresh engine which the server swaps
/// in atomically under its write lock; concurrent readers never observe a
/// partially loaded collection.
use sha2::{Digest, Sha256};
use tracing::info;

use roadwise_core::engine::RetrievalEngine;
use roadwise_core::loader;
use roadwise_core::scoring::ScoringConfig;

use crate::config::Config;
use crate::error::AppError;

pub struct ReloadService {
    config: Config,
}

impl ReloadService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Hex SHA-256 of the knowledge-base file contents.
    pub fn file_fingerprint(&self) -> Result<String, AppError> {
        let path = self.config.kb_file_path();
        let bytes = std::fs::read(&path).map_err(|source| AppError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Parse the knowledge-base file into a fresh engine.
    ///
    /// Construction validation (empty file, duplicate ids, keyword-less
    /// records) happens here, so a broken file is rejected before anything
    /// replaces the collection being served.
    pub fn rebuild(&self) -> Result<(RetrievalEngine, String), AppError> {
        let fingerprint = self.file_fingerprint()?;
        let kb = loader::load_from_path(&self.config.kb_file_path())?;
        info!(
            records = kb.len(),
            fingerprint = %fingerprint,
            "knowledge base parsed"
        );
        let engine = RetrievalEngine::new(kb, ScoringConfig::default());
        Ok((engine, fingerprint))
    }
}
