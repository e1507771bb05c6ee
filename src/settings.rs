use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    controls::ControlMap,
    error::SettingsError,
    generators::{MAX_MAZE_DIM, MIN_DIM},
    navigator::{DEFAULT_MINIMAP_RADIUS, MAX_MINIMAP_RADIUS},
};

pub const SETTINGS_ENV: &str = "MAZEWALK_SETTINGS";
pub const DEFAULT_SETTINGS_FILE: &str = "mazewalk.json";
/// Deepest corridor view the renderer projects.
pub const MAX_VIEW_DEPTH: usize = 16;

/// User preferences persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub maze_dim: u16,
    /// Number of cells drawn down the corridor before fog.
    pub view_depth: usize,
    pub minimap_radius: usize,
    pub controls: ControlMap,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            maze_dim: 51,
            view_depth: 5,
            minimap_radius: DEFAULT_MINIMAP_RADIUS,
            controls: ControlMap::default(),
        }
    }
}

impl Settings {
    /// `$MAZEWALK_SETTINGS` if set, otherwise `mazewalk.json` in the working directory.
    pub fn default_path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    pub fn load(path: &Path) -> Result<Settings, SettingsError> {
        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings, falling back to defaults when the file is missing,
    /// malformed or holds invalid values.
    pub fn load_or_default(path: &Path) -> Settings {
        match Settings::load(path) {
            Ok(settings) => {
                tracing::info!("[settings] loaded from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("[settings] {} not found, using defaults", path.display());
                Settings::default()
            }
            Err(e) => {
                tracing::warn!(
                    "[settings] could not load {}: {}, using defaults",
                    path.display(),
                    e
                );
                Settings::default()
            }
        }
    }

    /// Writes the settings as pretty JSON. The file is written next to its
    /// final location and renamed over it, so a crash never leaves half a file.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        self.validate()?;
        let content = serde_json::to_string_pretty(self)?;
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, path)?;
        tracing::debug!("[settings] saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |reason: String| Err(SettingsError::Invalid { reason });
        if self.maze_dim % 2 == 0 || !(MIN_DIM..=MAX_MAZE_DIM).contains(&self.maze_dim) {
            return invalid(format!(
                "maze_dim must be odd and between {} and {}, got {}",
                MIN_DIM, MAX_MAZE_DIM, self.maze_dim
            ));
        }
        if !(1..=MAX_VIEW_DEPTH).contains(&self.view_depth) {
            return invalid(format!(
                "view_depth must be between 1 and {}, got {}",
                MAX_VIEW_DEPTH, self.view_depth
            ));
        }
        if !(1..=MAX_MINIMAP_RADIUS).contains(&self.minimap_radius) {
            return invalid(format!(
                "minimap_radius must be between 1 and {}, got {}",
                MAX_MINIMAP_RADIUS, self.minimap_radius
            ));
        }
        if !self.controls.is_consistent() {
            return invalid("controls bind a key twice or use an unbindable key".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{Action, Key};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mazewalk-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.maze_dim, 51);
        assert_eq!(settings.view_depth, 5);
        assert_eq!(settings.minimap_radius, 2);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("save-load");
        let mut settings = Settings {
            maze_dim: 21,
            view_depth: 7,
            ..Settings::default()
        };
        settings.controls.remap(Action::Forward, Key::Up).unwrap();
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let path = temp_path("partial");
        fs::write(&path, r#"{ "maze_dim": 15 }"#).unwrap();
        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.maze_dim, 15);
        assert_eq!(loaded.view_depth, 5);
        assert_eq!(loaded.controls, ControlMap::default());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let missing = temp_path("missing");
        assert_eq!(Settings::load_or_default(&missing), Settings::default());

        let garbage = temp_path("garbage");
        fs::write(&garbage, "not json").unwrap();
        assert!(matches!(
            Settings::load(&garbage),
            Err(SettingsError::Json(_))
        ));
        assert_eq!(Settings::load_or_default(&garbage), Settings::default());
        fs::remove_file(&garbage).unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        for settings in [
            Settings {
                maze_dim: 20,
                ..Settings::default()
            },
            Settings {
                maze_dim: 3,
                ..Settings::default()
            },
            Settings {
                view_depth: 0,
                ..Settings::default()
            },
            Settings {
                minimap_radius: 0,
                ..Settings::default()
            },
            Settings {
                maze_dim: 257,
                ..Settings::default()
            },
            Settings {
                view_depth: MAX_VIEW_DEPTH + 1,
                ..Settings::default()
            },
            Settings {
                minimap_radius: MAX_MINIMAP_RADIUS + 1,
                ..Settings::default()
            },
        ] {
            assert!(matches!(
                settings.validate(),
                Err(SettingsError::Invalid { .. })
            ));
        }
    }

    #[test]
    fn test_invalid_file_is_not_loaded() {
        let path = temp_path("invalid");
        fs::write(&path, r#"{ "maze_dim": 8 }"#).unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::Invalid { .. })
        ));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_out_of_range_file_is_not_loaded() {
        let path = temp_path("oversized");
        fs::write(&path, r#"{ "maze_dim": 65535, "minimap_radius": 40000 }"#).unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::Invalid { .. })
        ));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_largest_values_are_valid() {
        let settings = Settings {
            maze_dim: MAX_MAZE_DIM,
            view_depth: MAX_VIEW_DEPTH,
            minimap_radius: MAX_MINIMAP_RADIUS,
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
    }
}
