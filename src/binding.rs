//! Resource-binding contract shared by the Rust host code and the WGSL
//! shaders.
//!
//! Every group/binding/location number used by the two pipelines is defined
//! here exactly once. Bind group layouts, `set_bind_group` calls, and the
//! `#{...}` shader defs substituted into the WGSL sources are all derived
//! from [`MESH_BINDINGS`] and [`DEPTH_VIEW_BINDINGS`].
//!
//! Instanced mesh pipeline:
//!
//! | Group | Binding | Resource | Update frequency |
//! |---|---|---|---|
//! | 0 | 0 | Diffuse texture (2D) | per material |
//! | 0 | 1 | Sampler for binding 0 | per material |
//! | 1 | 0 | Camera uniform (view-projection) | per frame |
//! | 2 | 0 | Rotation uniform | per object |
//! | 3 | 0 | Instance transforms (read-only storage) | per draw call |
//!
//! The sampler's address mode decides what out-of-range texture coordinates
//! resolve to; the shaders never clamp coordinates themselves.

use std::collections::HashMap;

use naga_oil::compose::ShaderDefValue;

/// A `@group(g) @binding(b)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingSlot {
    /// Bind group index passed to `set_bind_group`.
    pub group: u32,
    /// Binding index inside the group.
    pub binding: u32,
}

impl BindingSlot {
    /// Slot at the given group and binding.
    #[must_use]
    pub const fn new(group: u32, binding: u32) -> Self {
        Self { group, binding }
    }
}

/// How often the host rewrites a bound resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateFrequency {
    /// Changes when the material (texture) changes.
    PerMaterial,
    /// Rewritten once per frame.
    PerFrame,
    /// Rewritten whenever the drawn object changes.
    PerObject,
    /// Rewritten before each draw call.
    PerDraw,
}

/// Slot assignments of the instanced mesh pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshBindings {
    /// Diffuse texture view.
    pub diffuse_texture: BindingSlot,
    /// Sampler used with [`diffuse_texture`](Self::diffuse_texture).
    pub diffuse_sampler: BindingSlot,
    /// Camera view-projection uniform.
    pub camera: BindingSlot,
    /// Per-object rotation uniform.
    pub rotation: BindingSlot,
    /// Read-only storage array of per-instance transforms.
    pub instances: BindingSlot,
    /// Vertex attribute location of the local position.
    pub position_location: u32,
    /// Vertex attribute location of the texture coordinate.
    pub tex_coords_location: u32,
}

/// The binding contract of the instanced mesh pipeline.
pub const MESH_BINDINGS: MeshBindings = MeshBindings {
    diffuse_texture: BindingSlot::new(0, 0),
    diffuse_sampler: BindingSlot::new(0, 1),
    camera: BindingSlot::new(1, 0),
    rotation: BindingSlot::new(2, 0),
    instances: BindingSlot::new(3, 0),
    position_location: 0,
    tex_coords_location: 1,
};

impl MeshBindings {
    /// Number of bind groups the pipeline layout must contain.
    pub const GROUP_COUNT: usize = 4;

    /// The material group index (texture and sampler share it).
    #[must_use]
    pub const fn material_group(&self) -> u32 {
        self.diffuse_texture.group
    }

    /// Every bound resource with its slot and update frequency.
    #[must_use]
    pub fn resources(&self) -> [(&'static str, BindingSlot, UpdateFrequency); 5] {
        [
            ("diffuse_texture", self.diffuse_texture, UpdateFrequency::PerMaterial),
            ("diffuse_sampler", self.diffuse_sampler, UpdateFrequency::PerMaterial),
            ("camera", self.camera, UpdateFrequency::PerFrame),
            ("rotation", self.rotation, UpdateFrequency::PerObject),
            ("instances", self.instances, UpdateFrequency::PerDraw),
        ]
    }

    /// Shader defs substituted into `instanced_mesh.wgsl`.
    #[must_use]
    pub fn shader_defs(&self) -> HashMap<String, ShaderDefValue> {
        let mut defs = HashMap::new();
        insert_slot(&mut defs, "TEXTURE", self.diffuse_texture);
        insert_slot(&mut defs, "SAMPLER", self.diffuse_sampler);
        insert_slot(&mut defs, "CAMERA", self.camera);
        insert_slot(&mut defs, "ROTATION", self.rotation);
        insert_slot(&mut defs, "INSTANCES", self.instances);
        let _ = defs.insert(
            "POSITION_LOCATION".to_owned(),
            ShaderDefValue::UInt(self.position_location),
        );
        let _ = defs.insert(
            "TEX_COORDS_LOCATION".to_owned(),
            ShaderDefValue::UInt(self.tex_coords_location),
        );
        defs
    }
}

/// Slot assignments of the depth-visualization pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthViewBindings {
    /// Depth attachment sampled as a texture.
    pub depth_texture: BindingSlot,
    /// Sampler used with [`depth_texture`](Self::depth_texture).
    pub depth_sampler: BindingSlot,
}

/// The binding contract of the depth-visualization pipeline.
pub const DEPTH_VIEW_BINDINGS: DepthViewBindings = DepthViewBindings {
    depth_texture: BindingSlot::new(0, 0),
    depth_sampler: BindingSlot::new(0, 1),
};

impl DepthViewBindings {
    /// Shader defs substituted into the depth-view shaders.
    #[must_use]
    pub fn shader_defs(&self) -> HashMap<String, ShaderDefValue> {
        let mut defs = HashMap::new();
        insert_slot(&mut defs, "DEPTH_TEXTURE", self.depth_texture);
        insert_slot(&mut defs, "DEPTH_SAMPLER", self.depth_sampler);
        defs
    }
}

fn insert_slot(
    defs: &mut HashMap<String, ShaderDefValue>,
    name: &str,
    slot: BindingSlot,
) {
    let _ = defs.insert(format!("{name}_GROUP"), ShaderDefValue::UInt(slot.group));
    let _ = defs.insert(
        format!("{name}_BINDING"),
        ShaderDefValue::UInt(slot.binding),
    );
}
