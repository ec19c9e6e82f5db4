use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "NeuroScan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

/// Runtime settings, read once at process start and injected everywhere.
///
/// No module-level singletons: the generative client is constructed from
/// these settings at startup and passed by handle to request handlers.
#[derive(Debug, Clone)]
pub struct Settings {
    /// HTTP listen port.
    pub port: u16,
    /// Data directory holding the database and uploaded media.
    pub data_dir: PathBuf,
    /// Base URL of the generative model endpoint. `None` selects
    /// simulation mode (canned responses, no external calls).
    pub model_url: Option<String>,
    /// Model identifier sent to the generate endpoint.
    pub model_name: String,
    /// Optional bearer key for hosted model endpoints.
    pub api_key: Option<String>,
    /// Artificial delay applied by the simulated backend.
    pub simulated_delay: Duration,
}

impl Settings {
    /// Read settings from the environment. Called once, in `main`.
    pub fn from_env() -> Self {
        let port = std::env::var("NEUROSCAN_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3001);

        let data_dir = std::env::var("NEUROSCAN_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let model_url = std::env::var("NEUROSCAN_MODEL_URL")
            .ok()
            .filter(|u| !u.trim().is_empty());

        let model_name = std::env::var("NEUROSCAN_MODEL")
            .unwrap_or_else(|_| "medgemma:latest".to_string());

        let api_key = std::env::var("NEUROSCAN_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let simulated_delay = std::env::var("NEUROSCAN_SIM_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(800));

        Self {
            port,
            data_dir,
            model_url,
            model_name,
            api_key,
            simulated_delay,
        }
    }

    /// Is the gateway running against canned responses?
    pub fn simulation_mode(&self) -> bool {
        self.model_url.is_none()
    }
}

/// ~/NeuroScan/ on all platforms (user-visible data directory).
pub fn default_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("NeuroScan")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_data_dir_under_home() {
        let dir = default_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("NeuroScan"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }

    #[test]
    fn simulation_mode_tracks_model_url() {
        let mut settings = Settings {
            port: 0,
            data_dir: PathBuf::new(),
            model_url: None,
            model_name: "medgemma:latest".into(),
            api_key: None,
            simulated_delay: Duration::ZERO,
        };
        assert!(settings.simulation_mode());

        settings.model_url = Some("http://localhost:11434".into());
        assert!(!settings.simulation_mode());
    }
}
