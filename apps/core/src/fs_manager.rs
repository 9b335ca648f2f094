use std::fs;
use std::path::PathBuf;
use tracing::{error, info};

/// Environment variable overriding the application root
pub const HOME_ENV: &str = "VIBECURATOR_HOME";

pub struct PortablePathManager;

impl PortablePathManager {
    /// Application root: `VIBECURATOR_HOME` if set, else the executable's directory.
    pub fn root_dir() -> PathBuf {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(home);
        }

        match std::env::current_exe() {
            Ok(mut path) => {
                path.pop(); // exe name

                #[cfg(debug_assertions)]
                {
                    // target/debug at the workspace root → apps/core
                    if let Some(workspace) = path.parent().and_then(|p| p.parent()) {
                        let core_path = workspace.join("apps").join("core");
                        if core_path.exists() {
                            return core_path;
                        }
                    }
                }

                path
            }
            Err(e) => {
                error!(
                    "Failed to get current exe path: {}. Falling back to current_dir.",
                    e
                );
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            }
        }
    }

    /// Main data directory (./data).
    pub fn data_dir() -> PathBuf {
        Self::root_dir().join("data")
    }

    /// Model artifacts (./data/models).
    pub fn models_dir() -> PathBuf {
        Self::data_dir().join("models")
    }

    /// Default location of the vibe model artifact.
    pub fn default_model_path() -> PathBuf {
        Self::models_dir().join("vibe_model.json")
    }

    /// Create the data and models directories if missing.
    pub fn init() -> Result<(), std::io::Error> {
        for dir in [Self::data_dir(), Self::models_dir()] {
            if !dir.exists() {
                info!("Creating directory: {:?}", dir);
                fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_override_and_init() {
        let dir = tempfile::tempdir().unwrap();
        temp_env::with_var(HOME_ENV, Some(dir.path()), || {
            assert_eq!(PortablePathManager::root_dir(), dir.path());
            assert_eq!(
                PortablePathManager::default_model_path(),
                dir.path().join("data").join("models").join("vibe_model.json")
            );

            PortablePathManager::init().unwrap();
            assert!(PortablePathManager::models_dir().is_dir());
        });
    }
}
