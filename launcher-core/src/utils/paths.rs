//! Application-specific path resolution.
//!
//! Paths follow the XDG Base Directory layout on Linux and the platform
//! conventions elsewhere, via `directories-next`. Every function returns
//! [`ConfigError::DirectoryUnavailable`] when no home directory can be found.

use crate::error::{ConfigError, CoreError};
use directories_next::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "Minimalist";
const APPLICATION: &str = "Launcher";

fn project_dirs(dir_type: &str) -> Result<ProjectDirs, CoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
        CoreError::Config(ConfigError::DirectoryUnavailable {
            dir_type: dir_type.to_string(),
        })
    })
}

/// Returns `$XDG_STATE_HOME` (or `~/.local/state`) on Linux, the local data
/// directory elsewhere.
fn get_state_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| {
            #[cfg(target_os = "linux")]
            {
                match std::env::var("XDG_STATE_HOME") {
                    Ok(state_home) if !state_home.is_empty() => PathBuf::from(state_home),
                    _ => dirs.home_dir().join(".local/state"),
                }
            }
            #[cfg(not(target_os = "linux"))]
            {
                dirs.data_local_dir().to_path_buf()
            }
        })
        .ok_or_else(|| {
            CoreError::Config(ConfigError::DirectoryUnavailable {
                dir_type: "State Base".to_string(),
            })
        })
}

/// Directory holding `config.toml`, e.g. `~/.config/launcher`.
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    project_dirs("App Config").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default directory for persisted favorites, settings and usage data.
pub fn get_app_data_dir() -> Result<PathBuf, CoreError> {
    project_dirs("App Data").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Directory for log files.
pub fn get_app_state_dir() -> Result<PathBuf, CoreError> {
    get_state_base_dir().map(|base_state| base_state.join(ORGANIZATION).join(APPLICATION))
}

#[cfg(test)]
mod tests {
    use super::*;

    // CI machines without a HOME may legitimately report DirectoryUnavailable.
    fn assert_is_valid_path(res: Result<PathBuf, CoreError>, dir_type: &str) {
        match res {
            Ok(path) => {
                assert!(path.is_absolute(), "Path for {} is not absolute: {:?}", dir_type, path);
            }
            Err(CoreError::Config(ConfigError::DirectoryUnavailable { .. })) => {}
            Err(e) => panic!("Expected Ok or DirectoryUnavailable for {}, got {:?}", dir_type, e),
        }
    }

    #[test]
    fn test_get_state_base_dir() {
        assert_is_valid_path(get_state_base_dir(), "State Base");
    }

    #[test]
    fn test_get_app_config_dir() {
        assert_is_valid_path(get_app_config_dir(), "App Config");
    }

    #[test]
    fn test_get_app_data_dir() {
        assert_is_valid_path(get_app_data_dir(), "App Data");
    }

    #[test]
    fn test_get_app_state_dir_ends_with_application() {
        if let Ok(path) = get_app_state_dir() {
            assert!(path.ends_with(PathBuf::from(ORGANIZATION).join(APPLICATION)));
        }
    }
}
