//! Window-system independent input events.

/// Scroll lines per physical pixel of a touchpad-style pixel delta.
pub const PIXELS_PER_SCROLL_LINE: f32 = 100.0;

/// A raw input event, fed to an [`InputProcessor`](super::InputProcessor)
/// which turns drags, scrolls and modifier changes into
/// [`ViewerCommand`](crate::engine::ViewerCommand)s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to an absolute window position.
    CursorMoved {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Scroll in lines; positive zooms in.
    Scroll {
        /// Scroll amount in lines.
        delta: f32,
    },
    /// Modifier key state changed.
    ModifiersChanged {
        /// Whether the shift key is held.
        shift: bool,
    },
}

impl InputEvent {
    /// Scroll event from a vertical pixel delta.
    #[must_use]
    pub fn scroll_pixels(dy: f32) -> Self {
        Self::Scroll {
            delta: dy / PIXELS_PER_SCROLL_LINE,
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button; the only one that drags the camera.
    Left,
    /// Secondary button.
    Right,
    /// Wheel click.
    Middle,
}

#[cfg(feature = "viewer")]
mod winit_events {
    use winit::event::{ElementState, MouseScrollDelta, WindowEvent};

    use super::{InputEvent, MouseButton};

    impl From<winit::event::MouseButton> for MouseButton {
        fn from(button: winit::event::MouseButton) -> Self {
            match button {
                winit::event::MouseButton::Right => Self::Right,
                winit::event::MouseButton::Middle => Self::Middle,
                _ => Self::Left,
            }
        }
    }

    impl InputEvent {
        /// Translate a pointer or modifier window event; `None` for
        /// everything else (keys, resize, redraw).
        #[must_use]
        #[allow(clippy::cast_possible_truncation)]
        pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
            match event {
                WindowEvent::CursorMoved { position, .. } => {
                    Some(Self::CursorMoved {
                        x: position.x as f32,
                        y: position.y as f32,
                    })
                }
                WindowEvent::MouseInput { button, state, .. } => {
                    Some(Self::MouseButton {
                        button: MouseButton::from(*button),
                        pressed: *state == ElementState::Pressed,
                    })
                }
                WindowEvent::MouseWheel { delta, .. } => Some(match delta {
                    MouseScrollDelta::LineDelta(_, y) => Self::Scroll { delta: *y },
                    MouseScrollDelta::PixelDelta(pos) => {
                        Self::scroll_pixels(pos.y as f32)
                    }
                }),
                WindowEvent::ModifiersChanged(modifiers) => {
                    Some(Self::ModifiersChanged {
                        shift: modifiers.state().shift_key(),
                    })
                }
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_scroll_converts_to_lines() {
        assert_eq!(
            InputEvent::scroll_pixels(250.0),
            InputEvent::Scroll { delta: 2.5 }
        );
        assert_eq!(
            InputEvent::scroll_pixels(-100.0),
            InputEvent::Scroll { delta: -1.0 }
        );
    }
}
