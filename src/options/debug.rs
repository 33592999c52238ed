use serde::{Deserialize, Serialize};

/// Which depth overlay, if any, is drawn over the mesh pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DepthOverlayMode {
    /// No overlay.
    #[default]
    Off,
    /// Green tint whose alpha is the sampled depth.
    Sampled,
    /// Green tint at fixed half alpha.
    Constant,
}

impl DepthOverlayMode {
    /// The mode after this one in the `Off → Sampled → Constant` cycle.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::Sampled,
            Self::Sampled => Self::Constant,
            Self::Constant => Self::Off,
        }
    }
}

/// Debug visualization toggles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DebugOptions {
    /// Depth overlay drawn after the mesh pass.
    pub depth_overlay: DepthOverlayMode,
    /// Log smoothed FPS at debug level every two seconds.
    pub log_fps: bool,
}
