use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Swapchain presentation mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PresentModeOption {
    /// VSync, always supported.
    #[default]
    Fifo,
    /// Low-latency VSync where available.
    Mailbox,
    /// No VSync; may tear.
    Immediate,
}

impl From<PresentModeOption> for wgpu::PresentMode {
    fn from(mode: PresentModeOption) -> Self {
        match mode {
            PresentModeOption::Fifo => Self::Fifo,
            PresentModeOption::Mailbox => Self::Mailbox,
            PresentModeOption::Immediate => Self::Immediate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Window surface and background settings.
pub struct DisplayOptions {
    /// Background color of the mesh pass (linear RGB).
    pub clear_color: [f32; 3],
    /// Derive the background color from the cursor position instead of
    /// `clear_color`.
    pub cursor_background: bool,
    /// Diffuse texture file; the bundled tree image is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture_path: Option<PathBuf>,
    /// Swapchain presentation mode.
    pub present_mode: PresentModeOption,
    /// Frame cap (0 = unlimited).
    pub target_fps: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            clear_color: [0.1, 0.2, 0.3],
            cursor_background: true,
            texture_path: None,
            present_mode: PresentModeOption::Fifo,
            target_fps: 0,
        }
    }
}
