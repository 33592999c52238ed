//! Converts raw platform events into viewer commands.
//!
//! The `InputProcessor` owns all transient input state (cursor position,
//! drag tracking, modifier keys) and the key-binding map. It is the only
//! thing that sits between raw window events and
//! [`SceneRenderEngine::execute`](crate::engine::SceneRenderEngine::execute).

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Deserializer, Serialize};

use super::event::{InputEvent, MouseButton};
use crate::engine::ViewerCommand;

/// Maps physical key strings to [`ViewerCommand`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"KeyD"`, `"Space"`, `"Escape"`, etc.
///
/// Only discrete commands make sense as key bindings; parameterized
/// commands like `RotateCamera` come from mouse gestures.
///
/// Deserialized entries are layered over the defaults, so a preset that
/// binds one key keeps the rest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → command tag.
    #[serde(deserialize_with = "merge_over_defaults")]
    bindings: HashMap<String, KeyCommandTag>,
}

fn merge_over_defaults<'de, D>(
    deserializer: D,
) -> Result<HashMap<String, KeyCommandTag>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = HashMap::<String, KeyCommandTag>::deserialize(deserializer)?;
    let mut bindings = KeyBindings::default().bindings;
    bindings.extend(overrides);
    Ok(bindings)
}

/// Serializable tag for the subset of [`ViewerCommand`] that can be
/// key-bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Step the depth overlay `Off → Sampled → Constant → Off`.
    CycleDepthOverlay,
    /// Pause or resume the per-frame rotation.
    ToggleRotation,
    /// Return the camera to its initial orbit.
    ResetCamera,
}

impl KeyCommandTag {
    /// Convert to the corresponding parameterless [`ViewerCommand`].
    fn to_command(self) -> ViewerCommand {
        match self {
            Self::CycleDepthOverlay => ViewerCommand::CycleDepthOverlay,
            Self::ToggleRotation => ViewerCommand::ToggleRotation,
            Self::ResetCamera => ViewerCommand::ResetCamera,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("KeyD".into(), KeyCommandTag::CycleDepthOverlay),
            ("Space".into(), KeyCommandTag::ToggleRotation),
            ("KeyR".into(), KeyCommandTag::ResetCamera),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<ViewerCommand> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind `key` to `tag`, replacing any previous binding of that key.
    pub fn bind(&mut self, key: impl Into<String>, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.into(), tag);
    }
}

/// Converts raw window events into [`ViewerCommand`]s.
///
/// ```ignore
/// if let Some(cmd) = input_processor.handle_event(event) {
///     engine.execute(cmd);
/// }
/// ```
pub struct InputProcessor {
    /// Last cursor position, `None` until the first move.
    mouse_pos: Option<Vec2>,
    /// Whether the primary mouse button is currently held.
    mouse_pressed: bool,
    /// Whether the shift modifier is currently held.
    shift_pressed: bool,
    /// Key string → command mapping.
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_key_bindings(KeyBindings::default())
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            mouse_pos: None,
            mouse_pressed: false,
            shift_pressed: false,
            key_bindings,
        }
    }

    /// Current cursor position in physical pixels (origin until the first
    /// move).
    #[must_use]
    pub fn mouse_pos(&self) -> (f32, f32) {
        self.mouse_pos.map_or((0.0, 0.0), |p| (p.x, p.y))
    }

    /// Whether the primary mouse button is pressed.
    #[must_use]
    pub fn mouse_pressed(&self) -> bool {
        self.mouse_pressed
    }

    /// Whether the shift modifier is held.
    #[must_use]
    pub fn shift_pressed(&self) -> bool {
        self.shift_pressed
    }

    /// Replace the key bindings.
    pub fn set_key_bindings(&mut self, key_bindings: KeyBindings) {
        self.key_bindings = key_bindings;
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<ViewerCommand> {
        self.key_bindings.lookup(key)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<ViewerCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.handle_cursor_moved(Vec2::new(x, y))
            }
            InputEvent::MouseButton { button, pressed } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = pressed;
                }
                None
            }
            InputEvent::Scroll { delta } => Some(ViewerCommand::Zoom { delta }),
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
        }
    }

    /// Cursor moved: compute delta, rotate or pan while dragging.
    fn handle_cursor_moved(&mut self, pos: Vec2) -> Option<ViewerCommand> {
        let previous = self.mouse_pos.replace(pos)?;
        if !self.mouse_pressed {
            return None;
        }
        let delta = pos - previous;
        if self.shift_pressed {
            Some(ViewerCommand::PanCamera { delta })
        } else {
            Some(ViewerCommand::RotateCamera { delta })
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_bindings_keep_defaults() {
        let toml_str = r#"
            [bindings]
            KeyT = "toggle_rotation"
            KeyR = "cycle_depth_overlay"
        "#;
        let bindings: KeyBindings = toml::from_str(toml_str).unwrap();
        assert_eq!(bindings.lookup("KeyT"), Some(ViewerCommand::ToggleRotation));
        assert_eq!(bindings.lookup("KeyR"), Some(ViewerCommand::CycleDepthOverlay));
        assert_eq!(bindings.lookup("KeyD"), Some(ViewerCommand::CycleDepthOverlay));
        assert_eq!(bindings.lookup("Space"), Some(ViewerCommand::ToggleRotation));
    }

    #[test]
    fn missing_table_is_default() {
        let bindings: KeyBindings = toml::from_str("").unwrap();
        assert_eq!(bindings, KeyBindings::default());
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::CursorMoved { x, y }
    }

    fn left(pressed: bool) -> InputEvent {
        InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed,
        }
    }

    #[test]
    fn hover_produces_no_command_but_tracks_position() {
        let mut p = InputProcessor::new();
        assert_eq!(p.handle_event(moved(10.0, 20.0)), None);
        assert_eq!(p.handle_event(moved(15.0, 25.0)), None);
        assert_eq!(p.mouse_pos(), (15.0, 25.0));
    }

    #[test]
    fn drag_rotates_and_shift_drag_pans() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(moved(100.0, 100.0));
        let _ = p.handle_event(left(true));
        assert_eq!(
            p.handle_event(moved(104.0, 97.0)),
            Some(ViewerCommand::RotateCamera {
                delta: Vec2::new(4.0, -3.0)
            })
        );
        let _ = p.handle_event(InputEvent::ModifiersChanged { shift: true });
        assert_eq!(
            p.handle_event(moved(106.0, 97.0)),
            Some(ViewerCommand::PanCamera {
                delta: Vec2::new(2.0, 0.0)
            })
        );
        let _ = p.handle_event(left(false));
        assert_eq!(p.handle_event(moved(0.0, 0.0)), None);
    }

    #[test]
    fn first_move_while_pressed_has_no_delta() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(left(true));
        assert_eq!(p.handle_event(moved(500.0, 400.0)), None);
    }

    #[test]
    fn right_button_does_not_drag() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(moved(0.0, 0.0));
        let _ = p.handle_event(InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: true,
        });
        assert!(!p.mouse_pressed());
        assert_eq!(p.handle_event(moved(5.0, 5.0)), None);
    }

    #[test]
    fn scroll_zooms() {
        let mut p = InputProcessor::new();
        assert_eq!(
            p.handle_event(InputEvent::Scroll { delta: 1.5 }),
            Some(ViewerCommand::Zoom { delta: 1.5 })
        );
    }

    #[test]
    fn key_bindings_resolve_and_rebind() {
        let mut bindings = KeyBindings::default();
        assert_eq!(bindings.lookup("Space"), Some(ViewerCommand::ToggleRotation));
        bindings.bind("KeyO", KeyCommandTag::CycleDepthOverlay);
        let p = InputProcessor::with_key_bindings(bindings);
        assert_eq!(
            p.handle_key_press("KeyO"),
            Some(ViewerCommand::CycleDepthOverlay)
        );
        assert_eq!(p.handle_key_press("KeyX"), None);
    }
}
