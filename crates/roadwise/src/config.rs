use crate::error::AppError;

/// Application configuration loaded explicitly from environment variables.
///
/// No default path is assumed for the knowledge base; the caller must provide
/// it. Redis URL is optional; if absent, the server runs without caching.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL (e.g. "redis://127.0.0.1:6379"). `None` disables caching.
    pub redis_url: Option<String>,
    /// Filesystem path to the knowledge-base JSON file.
    pub kb_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `ROADWISE_KB_PATH`: path to the intervention knowledge-base JSON file
    ///
    /// Optional:
    /// - `REDIS_URL`: Redis connection string (omit to disable caching)
    pub fn from_env() -> Result<Self, AppError> {
        let kb_path = std::env::var("ROADWISE_KB_PATH").map_err(|_| {
            AppError::Config("ROADWISE_KB_PATH environment variable is required".to_string())
        })?;

        if !std::path::Path::new(&kb_path).exists() {
            return Err(AppError::Config(format!(
                "knowledge base file not found at {kb_path}"
            )));
        }

        let redis_url = std::env::var("REDIS_URL").ok();

        Ok(Self { redis_url, kb_path })
    }

    pub fn kb_file_path(&self) -> std::path::PathBuf {
        std::path::PathBuf::from(&self.kb_path)
    }
}
