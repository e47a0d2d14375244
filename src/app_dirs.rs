use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "keydrill";
const BEST_SCORES_FILE: &str = "typing_best_v1.json";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("keydrill_config.json"))
    }

    pub fn best_scores_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.data_local_dir().join(BEST_SCORES_FILE))
            .unwrap_or_else(|| PathBuf::from(BEST_SCORES_FILE))
    }

    /// Where the log file goes; the terminal itself is owned by the UI
    pub fn log_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
        } else {
            Self::project()
                .map(|pd| pd.data_local_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }
}
