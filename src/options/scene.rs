use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Instance grid and per-object rotation.
pub struct SceneOptions {
    /// Grid rows (along y).
    pub rows: u32,
    /// Grid columns (along x).
    pub cols: u32,
    /// Distance between neighbouring instances.
    pub spacing: f32,
    /// Per-frame rotation step in degrees about x, then y.
    pub rotation_step_degrees: [f32; 2],
    /// Whether the rotation advances each frame.
    pub auto_rotate: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 4,
            spacing: 2.0,
            rotation_step_degrees: [1.0, 0.8],
            auto_rotate: true,
        }
    }
}

impl SceneOptions {
    /// Number of instances the grid produces.
    #[must_use]
    pub fn instance_count(&self) -> u32 {
        self.rows.saturating_mul(self.cols)
    }
}
