use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::strip::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_DPI, PAGE_SCROLL_FRACTION, SCROLL_STEP, ViewerConfig, ZOOM_STEP,
};
use crate::theme::ThemeId;

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "pagestrip";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub theme: ThemeId,

    /// Pixels moved per arrow key or wheel notch
    #[serde(default = "default_scroll_step")]
    pub scroll_step: f32,

    /// Share of the viewport height moved by PageUp/PageDown
    #[serde(default = "default_page_scroll_fraction")]
    pub page_scroll_fraction: f32,

    #[serde(default = "default_zoom_step")]
    pub zoom_step: f32,

    #[serde(default = "default_dpi")]
    pub dpi: f32,

    /// Virtual pixels covered by one terminal cell
    #[serde(default = "default_cell_width")]
    pub cell_width_px: u32,

    #[serde(default = "default_cell_height")]
    pub cell_height_px: u32,

    #[serde(default)]
    pub show_outline: bool,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_scroll_step() -> f32 {
    SCROLL_STEP
}

fn default_page_scroll_fraction() -> f32 {
    PAGE_SCROLL_FRACTION
}

fn default_zoom_step() -> f32 {
    ZOOM_STEP
}

fn default_dpi() -> f32 {
    DEFAULT_DPI
}

fn default_cell_width() -> u32 {
    8
}

fn default_cell_height() -> u32 {
    16
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            theme: ThemeId::default(),
            scroll_step: default_scroll_step(),
            page_scroll_fraction: default_page_scroll_fraction(),
            zoom_step: default_zoom_step(),
            dpi: default_dpi(),
            cell_width_px: default_cell_width(),
            cell_height_px: default_cell_height(),
            show_outline: false,
        }
    }
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
    }

    /// Load settings from `path` (or the default location), creating the
    /// file with defaults when it does not exist. Errors are logged and
    /// defaults used.
    pub fn load_or_create(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => {
                warn!("Could not determine config directory, using default settings");
                return Self::default();
            }
        };

        if !path.exists() {
            info!("Settings file not found, creating with defaults at {path:?}");
            let settings = Self::default();
            if let Err(e) = settings.save_to(&path) {
                error!("{e}");
            }
            return settings;
        }

        match Self::load_from_path(&path) {
            Ok(settings) => settings,
            Err(e) => {
                error!("{e}");
                Self::default()
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings =
            serde_yaml::from_str::<Settings>(&content).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Loaded settings from {path:?}");

        if settings.version < CURRENT_VERSION {
            migrate_settings(&mut settings);
            if let Err(e) = settings.save_to(path) {
                error!("{e}");
            }
        }
        settings.sanitize();
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let write_error = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(write_error)?;
            }
        }
        fs::write(path, generate_settings_yaml(self)).map_err(write_error)?;
        debug!("Saved settings to {path:?}");
        Ok(())
    }

    /// Replace out-of-range values with defaults
    pub fn sanitize(&mut self) {
        fn positive(value: &mut f32, default: f32, name: &str) {
            if !value.is_finite() || *value <= 0.0 {
                warn!("Invalid {name} {value}, using {default}");
                *value = default;
            }
        }

        positive(&mut self.scroll_step, default_scroll_step(), "scroll_step");
        positive(&mut self.zoom_step, default_zoom_step(), "zoom_step");
        positive(&mut self.dpi, default_dpi(), "dpi");
        positive(
            &mut self.page_scroll_fraction,
            default_page_scroll_fraction(),
            "page_scroll_fraction",
        );
        if self.page_scroll_fraction > 1.0 {
            warn!("page_scroll_fraction above 1.0, clamping");
            self.page_scroll_fraction = 1.0;
        }
        if self.cell_width_px == 0 {
            self.cell_width_px = default_cell_width();
        }
        if self.cell_height_px < 2 {
            self.cell_height_px = default_cell_height();
        }
    }

    pub fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            scroll_step: self.scroll_step,
            page_scroll_fraction: self.page_scroll_fraction,
            zoom_step: self.zoom_step,
            dpi: self.dpi,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );

    // Future migrations go here:
    // if settings.version < 2 {
    //     migrate_v1_to_v2(settings);
    // }

    settings.version = CURRENT_VERSION;
}

fn generate_settings_yaml(settings: &Settings) -> String {
    let theme = serde_yaml::to_string(&settings.theme).unwrap_or_default();

    let mut content = String::new();
    content.push_str(SETTINGS_HEADER);
    content.push_str(&format!("version: {}\n", settings.version));
    content.push_str(&format!("theme: {}\n", theme.trim()));
    content.push_str(&format!("scroll_step: {}\n", settings.scroll_step));
    content.push_str(&format!(
        "page_scroll_fraction: {}\n",
        settings.page_scroll_fraction
    ));
    content.push_str(&format!("zoom_step: {}\n", settings.zoom_step));
    content.push_str(&format!("dpi: {}\n", settings.dpi));
    content.push_str(&format!("cell_width_px: {}\n", settings.cell_width_px));
    content.push_str(&format!("cell_height_px: {}\n", settings.cell_height_px));
    content.push_str(&format!("show_outline: {}\n", settings.show_outline));
    content
}

const SETTINGS_HEADER: &str = r#"# ============================================================================
# pagestrip settings
# ============================================================================
# theme:                oceanic-next | catppuccin-mocha
# scroll_step:          pixels per arrow key / wheel notch
# page_scroll_fraction: share of the screen moved by PageUp/PageDown (0..1]
# zoom_step:            scale change per zoom key
# dpi:                  render resolution at 100% zoom
# cell_width_px, cell_height_px: pixels represented by one terminal cell

"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let settings = Settings::load_or_create(Some(&path));

        assert_eq!(settings, Settings::default());
        assert!(path.exists());
        assert_eq!(Settings::load_from_path(&path).unwrap(), Settings::default());
    }

    #[test]
    fn custom_values_survive_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let settings = Settings {
            theme: ThemeId::CatppuccinMocha,
            scroll_step: 40.0,
            zoom_step: 0.25,
            cell_width_px: 10,
            show_outline: true,
            ..Settings::default()
        };

        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from_path(&path).unwrap();

        assert_eq!(loaded, settings);
        assert_eq!(loaded.viewer_config().scroll_step, 40.0);
    }

    #[test]
    fn partial_file_uses_defaults_for_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "dpi: 120\n").unwrap();

        let loaded = Settings::load_from_path(&path).unwrap();

        assert_eq!(loaded.dpi, 120.0);
        assert_eq!(loaded.scroll_step, SCROLL_STEP);
        assert_eq!(loaded.version, CURRENT_VERSION);
    }

    #[test]
    fn invalid_values_are_sanitized() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "scroll_step: -5\nzoom_step: 0\npage_scroll_fraction: 3\ncell_height_px: 1\n",
        )
        .unwrap();

        let loaded = Settings::load_from_path(&path).unwrap();

        assert_eq!(loaded.scroll_step, SCROLL_STEP);
        assert_eq!(loaded.zoom_step, ZOOM_STEP);
        assert_eq!(loaded.page_scroll_fraction, 1.0);
        assert_eq!(loaded.cell_height_px, 16);
    }

    #[test]
    fn broken_yaml_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "scroll_step: [not, a, number\n").unwrap();

        assert!(matches!(
            Settings::load_from_path(&path),
            Err(SettingsError::Parse { .. })
        ));
        assert_eq!(Settings::load_or_create(Some(&path)), Settings::default());
    }

    #[test]
    fn old_version_is_migrated_and_rewritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "version: 0\nscroll_step: 60\n").unwrap();

        let loaded = Settings::load_from_path(&path).unwrap();
        assert_eq!(loaded.version, CURRENT_VERSION);

        let on_disk = fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains(&format!("version: {CURRENT_VERSION}")));
        assert!(on_disk.contains("scroll_step: 60"));
    }
}
