//! Centralized viewer options with TOML preset support.
//!
//! Display, camera, scene, debug and keybinding settings are consolidated
//! here. Options serialize to/from TOML; every section is
//! `#[serde(default)]`, so a preset only needs the fields it overrides.

mod camera;
mod debug;
mod display;
mod scene;

use std::path::Path;

pub use camera::CameraOptions;
pub use debug::{DebugOptions, DepthOverlayMode};
pub use display::{DisplayOptions, PresentModeOption};
pub use scene::SceneOptions;
use serde::{Deserialize, Serialize};

use crate::error::CanopyError;
use crate::input::KeyBindings;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Surface and background settings.
    pub display: DisplayOptions,
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Instance grid and rotation.
    pub scene: SceneOptions,
    /// Debug visualization options.
    pub debug: DebugOptions,
    /// Keyboard binding options.
    pub keybindings: KeyBindings,
}

impl Options {
    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError::OptionsParse`] on malformed TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, CanopyError> {
        toml::from_str(content)
            .map_err(|e| CanopyError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError::Io`] if the file cannot be read and
    /// [`CanopyError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, CanopyError> {
        let content = std::fs::read_to_string(path)?;
        let options = Self::from_toml_str(&content)?;
        log::info!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError::OptionsParse`] if serialization fails and
    /// [`CanopyError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), CanopyError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CanopyError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::engine::ViewerCommand;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("canopy-options-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[scene]
rows = 2

[debug]
depth_overlay = "sampled"
"#;
        let opts = Options::from_toml_str(toml_str).unwrap();
        assert_eq!(opts.scene.rows, 2);
        assert_eq!(opts.scene.cols, SceneOptions::default().cols);
        assert_eq!(opts.debug.depth_overlay, DepthOverlayMode::Sampled);
        assert_eq!(opts.camera, CameraOptions::default());
        assert_eq!(opts.display.present_mode, PresentModeOption::Fifo);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Options::from_toml_str("[scene\nrows = ").unwrap_err();
        assert!(matches!(err, CanopyError::OptionsParse(_)));
        let err = Options::from_toml_str("[debug]\ndepth_overlay = \"sideways\"\n")
            .unwrap_err();
        assert!(matches!(err, CanopyError::OptionsParse(_)));
    }

    #[test]
    fn texture_path_parses() {
        let opts = Options::from_toml_str(
            "[display]\ntexture_path = \"assets/happy-tree.png\"\n",
        )
        .unwrap();
        assert_eq!(
            opts.display.texture_path.as_deref(),
            Some(Path::new("assets/happy-tree.png"))
        );
    }

    #[test]
    fn default_grid_has_twenty_instances() {
        assert_eq!(SceneOptions::default().instance_count(), 20);
    }

    #[test]
    fn overlay_mode_cycles_through_all_three() {
        let start = DepthOverlayMode::Off;
        assert_eq!(start.next(), DepthOverlayMode::Sampled);
        assert_eq!(start.next().next(), DepthOverlayMode::Constant);
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("KeyD"),
            Some(ViewerCommand::CycleDepthOverlay)
        );
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = scratch_dir("presets");
        let mut opts = Options::default();
        opts.scene.spacing = 3.5;
        opts.save(&dir.join("wide.toml")).unwrap();
        Options::default().save(&dir.join("default.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        assert_eq!(Options::list_presets(&dir), vec!["default", "wide"]);
        let loaded = Options::load(&dir.join("wide.toml")).unwrap();
        assert_eq!(loaded, opts);

        let missing = Options::load(&dir.join("absent.toml")).unwrap_err();
        assert!(matches!(missing, CanopyError::Io(_)));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
