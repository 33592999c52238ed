//! Options methods for `SceneRenderEngine`.

use std::path::Path;

use super::{load_diffuse, SceneRenderEngine};
use crate::options::Options;
use crate::renderer::mesh::material_bind_group;

impl SceneRenderEngine {
    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace options and push every change to the subsystems.
    pub fn set_options(&mut self, new: Options) {
        let previous = std::mem::replace(&mut self.options, new);
        self.apply_options(&previous);
    }

    /// Push option values that differ from `previous`.
    fn apply_options(&mut self, previous: &Options) {
        self.camera_controller.apply_options(&self.options.camera);
        self.apply_scene(previous);
        self.apply_display(previous);
        self.depth_overlay.set_mode(self.options.debug.depth_overlay);
        self.frame_timing.set_log_fps(self.options.debug.log_fps);
        self.input.set_key_bindings(self.options.keybindings.clone());
    }

    fn apply_scene(&mut self, previous: &Options) {
        let scene = &self.options.scene;
        self.rotator.set_step(scene.rotation_step_degrees);
        self.rotator.set_paused(!scene.auto_rotate);

        let grid_changed = scene.rows != previous.scene.rows
            || scene.cols != previous.scene.cols
            || scene.spacing != previous.scene.spacing;
        if grid_changed {
            self.instances.set_grid(
                &self.context.device,
                &self.context.queue,
                &self.layouts.instances,
                scene,
            );
            self.draw_count = self.instances.count();
            log::info!("instance grid: {} transforms", self.draw_count);
        }
    }

    fn apply_display(&mut self, previous: &Options) {
        let display = &self.options.display;
        self.frame_timing.set_target_fps(display.target_fps);

        if display.present_mode != previous.display.present_mode {
            self.context.config.present_mode = display.present_mode.into();
            self.context.reconfigure();
        }

        if display.texture_path != previous.display.texture_path {
            self.texture = load_diffuse(&self.context, display);
            self.material_bind_group = material_bind_group(
                &self.context.device,
                &self.layouts,
                &self.texture,
            );
        }
    }

    /// Load a named preset from `presets_dir`. Returns true on success.
    pub fn load_preset(&mut self, name: &str, presets_dir: &Path) -> bool {
        let path = presets_dir.join(format!("{name}.toml"));
        match Options::load(&path) {
            Ok(opts) => {
                self.set_options(opts);
                true
            }
            Err(e) => {
                log::error!("failed to load preset '{name}': {e}");
                false
            }
        }
    }

    /// Save the current options as a named preset. Returns true on success.
    pub fn save_preset(&self, name: &str, presets_dir: &Path) -> bool {
        let path = presets_dir.join(format!("{name}.toml"));
        match self.options.save(&path) {
            Ok(()) => {
                log::info!("saved preset '{name}'");
                true
            }
            Err(e) => {
                log::error!("failed to save preset '{name}': {e}");
                false
            }
        }
    }
}
