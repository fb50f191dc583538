use anyhow::Context;
use missioncore::mission::params::{DEFAULT_ALTITUDE_M, DEFAULT_HOVER_TIME_S};
use missioncore::MissionParameters;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Boundary-layer settings; every field may be omitted from the YAML file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    pub altitude_m: f64,
    pub hover_time_s: f64,
    pub bind: SocketAddr,
    pub download_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub retention_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            altitude_m: DEFAULT_ALTITUDE_M,
            hover_time_s: DEFAULT_HOVER_TIME_S,
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            download_dir: PathBuf::from("downloads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            retention_secs: 3600,
            sweep_interval_secs: 60,
        }
    }
}

impl AdapterConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading adapter config {}", path_ref.display()))?;
        let config: AdapterConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing adapter config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Command-line values win over whatever the file said.
    pub fn with_overrides(
        mut self,
        altitude_m: Option<f64>,
        hover_time_s: Option<f64>,
        bind: Option<SocketAddr>,
        download_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(altitude_m) = altitude_m {
            self.altitude_m = altitude_m;
        }
        if let Some(hover_time_s) = hover_time_s {
            self.hover_time_s = hover_time_s;
        }
        if let Some(bind) = bind {
            self.bind = bind;
        }
        if let Some(download_dir) = download_dir {
            self.download_dir = download_dir;
        }
        self
    }

    /// Parameters used when a caller leaves a field out. Not validated here.
    pub fn default_parameters(&self) -> MissionParameters {
        MissionParameters {
            altitude_m: self.altitude_m,
            hover_time_s: self.hover_time_s,
        }
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AdapterConfig::default();
        let params = cfg.default_parameters();
        assert_eq!(params.altitude_m, 60.0);
        assert_eq!(params.hover_time_s, 120.0);
        assert_eq!(cfg.bind.port(), 8000);
    }

    #[test]
    fn config_load_reads_partial_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"altitude_m: 45.5\nbind: \"0.0.0.0:9000\"\nretention_secs: 30\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = AdapterConfig::load(&path).unwrap();
        assert_eq!(cfg.altitude_m, 45.5);
        assert_eq!(cfg.hover_time_s, 120.0);
        assert_eq!(cfg.bind.port(), 9000);
        assert_eq!(cfg.retention(), Duration::from_secs(30));
    }

    #[test]
    fn config_load_reports_bad_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"altitude_m: [not, a, number]\n").unwrap();
        let path = temp.into_temp_path();
        let err = AdapterConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("parsing adapter config"));
    }

    #[test]
    fn overrides_replace_file_values() {
        let cfg = AdapterConfig::default().with_overrides(Some(30.0), None, None, None);
        assert_eq!(cfg.altitude_m, 30.0);
        assert_eq!(cfg.hover_time_s, 120.0);
    }

    #[test]
    fn sweep_interval_never_zero() {
        let cfg = AdapterConfig {
            sweep_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(cfg.sweep_interval(), Duration::from_secs(1));
    }
}
