use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tactcore::StoreConfig;

/// Ten mebibytes, the dashboard's upload limit.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub backend_url: String,
    pub backend_timeout_secs: u64,
    pub max_upload_bytes: usize,
    /// Serve generated detections when the backend is unreachable.
    pub mock_fallback: bool,
    pub mock_seed: u64,
    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
            backend_url: "http://localhost:8000".into(),
            backend_timeout_secs: 30,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            mock_fallback: true,
            mock_seed: 0,
            store: StoreConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading server config {}", path_ref.display()))?;
        let config: ServerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing server config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_dashboard_limits() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.max_upload_bytes, 10_485_760);
        assert_eq!(cfg.store.max_detections, 1000);
        assert!(cfg.mock_fallback);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"bind: 0.0.0.0:8080\nbackend_url: http://detector:8000\nstore:\n  max_detections: 250\n  placeholders: []\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = ServerConfig::load(&path).unwrap();
        assert_eq!(cfg.bind.port(), 8080);
        assert_eq!(cfg.backend_url, "http://detector:8000");
        assert_eq!(cfg.store.max_detections, 250);
        assert!(cfg.store.placeholders.is_empty());
        assert_eq!(cfg.store.high_confidence_threshold, 0.8);
        assert_eq!(cfg.backend_timeout_secs, 30);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ServerConfig::load("/nonexistent/tactmap.yaml").unwrap_err();
        assert!(format!("{err}").contains("/nonexistent/tactmap.yaml"));
    }
}
