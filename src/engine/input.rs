//! Input and command dispatch for `SceneRenderEngine`.

use super::{SceneRenderEngine, ViewerCommand};
use crate::input::InputEvent;

impl SceneRenderEngine {
    /// Process a platform-agnostic input event.
    ///
    /// The [`InputProcessor`](crate::input::InputProcessor) tracks cursor
    /// and modifier state; any command it produces is executed. Returns
    /// `true` if a command ran.
    ///
    /// ```ignore
    /// engine.handle_input(InputEvent::CursorMoved { x, y });
    /// engine.handle_input(InputEvent::Scroll { delta: 1.0 });
    /// ```
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        match self.input.handle_event(event) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    /// Run the command bound to a physical key string (`"KeyD"`,
    /// `"Space"`, ...). Returns `true` if the key was bound.
    pub fn handle_key_press(&mut self, key: &str) -> bool {
        match self.input.handle_key_press(key) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    /// Apply a single command.
    pub fn execute(&mut self, command: ViewerCommand) {
        match command {
            ViewerCommand::RotateCamera { delta } => {
                self.camera_controller.rotate(delta);
            }
            ViewerCommand::PanCamera { delta } => {
                self.camera_controller.pan(delta);
            }
            ViewerCommand::Zoom { delta } => {
                self.camera_controller.zoom(delta);
            }
            ViewerCommand::ResetCamera => self.camera_controller.reset(),
            ViewerCommand::CycleDepthOverlay => {
                self.options.debug.depth_overlay = self.depth_overlay.cycle();
            }
            ViewerCommand::SetDepthOverlay(mode) => {
                self.depth_overlay.set_mode(mode);
                self.options.debug.depth_overlay = mode;
            }
            ViewerCommand::ToggleRotation => {
                let paused = !self.rotator.is_paused();
                self.rotator.set_paused(paused);
                log::info!("rotation {}", if paused { "paused" } else { "resumed" });
            }
        }
    }
}
