//! The instanced textured-mesh pipeline.
//!
//! Four bind groups, each rewritten at its own rate: material (texture +
//! sampler), camera, rotation and instance transforms. The pipeline layout
//! lists them in group order as declared by [`MESH_BINDINGS`].

use wgpu::util::DeviceExt;

use crate::binding::{MeshBindings, MESH_BINDINGS};
use crate::error::CanopyError;
use crate::gpu::pipeline_helpers::{
    depth_stencil_state, filtering_sampler, single_entry_layout,
    storage_buffer_read_only, texture_2d, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::gpu::texture::{DiffuseTexture, DEPTH_FORMAT};

/// One mesh vertex: local position and texture coordinate.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-local position.
    pub position: [f32; 3],
    /// Texture coordinate.
    pub tex_coords: [f32; 2],
}

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: MESH_BINDINGS.position_location,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        shader_location: MESH_BINDINGS.tex_coords_location,
        format: wgpu::VertexFormat::Float32x2,
    },
];

impl Vertex {
    /// Vertex buffer layout with locations from [`MESH_BINDINGS`].
    #[must_use]
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRIBUTES,
        }
    }
}

/// Unit cube centred on the origin.
pub const CUBE_VERTICES: [Vertex; 8] = [
    Vertex { position: [-0.5, -0.5, -0.5], tex_coords: [0.0, 0.0] },
    Vertex { position: [0.5, -0.5, -0.5], tex_coords: [1.0, 0.0] },
    Vertex { position: [0.5, 0.5, -0.5], tex_coords: [1.0, 1.0] },
    Vertex { position: [-0.5, 0.5, -0.5], tex_coords: [0.0, 1.0] },
    Vertex { position: [-0.5, -0.5, 0.5], tex_coords: [0.0, 0.0] },
    Vertex { position: [0.5, -0.5, 0.5], tex_coords: [1.0, 0.0] },
    Vertex { position: [0.5, 0.5, 0.5], tex_coords: [1.0, 1.0] },
    Vertex { position: [-0.5, 0.5, 0.5], tex_coords: [0.0, 1.0] },
];

/// Two counter-clockwise, outward-facing triangles per cube face.
pub const CUBE_INDICES: [u16; 36] = [
    0, 2, 1, 0, 3, 2, // -z
    1, 2, 6, 6, 5, 1, // +x
    4, 5, 6, 6, 7, 4, // +z
    2, 3, 6, 6, 3, 7, // +y
    0, 7, 3, 0, 4, 7, // -x
    0, 1, 5, 0, 5, 4, // -y
];

/// Vertex and index buffers of an indexed mesh.
pub struct Mesh {
    /// Vertex buffer.
    pub vertex_buffer: wgpu::Buffer,
    /// `u16` index buffer.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices to draw.
    pub index_count: u32,
}

impl Mesh {
    /// Upload vertices and indices.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        vertices: &[Vertex],
        indices: &[u16],
    ) -> Self {
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertex Buffer")),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Index Buffer")),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// The unit cube.
    #[must_use]
    pub fn cube(device: &wgpu::Device) -> Self {
        Self::new(device, "Cube", &CUBE_VERTICES, &CUBE_INDICES)
    }
}

/// The four resource groups of the mesh pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshGroup {
    /// Diffuse texture and sampler.
    Material,
    /// Camera uniform.
    Camera,
    /// Rotation uniform.
    Rotation,
    /// Instance transform storage.
    Instances,
}

impl MeshGroup {
    fn group_index(self, bindings: &MeshBindings) -> u32 {
        match self {
            Self::Material => bindings.material_group(),
            Self::Camera => bindings.camera.group,
            Self::Rotation => bindings.rotation.group,
            Self::Instances => bindings.instances.group,
        }
    }
}

/// Resource groups listed by bind group index.
#[must_use]
pub fn group_order(
    bindings: &MeshBindings,
) -> [MeshGroup; MeshBindings::GROUP_COUNT] {
    let mut order = [MeshGroup::Material; MeshBindings::GROUP_COUNT];
    for group in [
        MeshGroup::Material,
        MeshGroup::Camera,
        MeshGroup::Rotation,
        MeshGroup::Instances,
    ] {
        order[group.group_index(bindings) as usize] = group;
    }
    order
}

/// Bind group layouts of the mesh pipeline, one per group.
pub struct MeshLayouts {
    /// Group holding the diffuse texture and its sampler.
    pub material: wgpu::BindGroupLayout,
    /// Group holding the camera uniform.
    pub camera: wgpu::BindGroupLayout,
    /// Group holding the rotation uniform.
    pub rotation: wgpu::BindGroupLayout,
    /// Group holding the instance transform storage array.
    pub instances: wgpu::BindGroupLayout,
}

impl MeshLayouts {
    /// Create all four layouts from [`MESH_BINDINGS`].
    #[must_use]
    pub fn new(device: &wgpu::Device) -> Self {
        let b = MESH_BINDINGS;
        let material =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Material Layout"),
                entries: &[
                    texture_2d(
                        b.diffuse_texture.binding,
                        wgpu::ShaderStages::FRAGMENT,
                    ),
                    filtering_sampler(b.diffuse_sampler.binding),
                ],
            });
        let camera = single_entry_layout(
            device,
            "Camera Layout",
            uniform_buffer(b.camera.binding, wgpu::ShaderStages::VERTEX),
        );
        let rotation = single_entry_layout(
            device,
            "Rotation Layout",
            uniform_buffer(b.rotation.binding, wgpu::ShaderStages::VERTEX),
        );
        let instances = single_entry_layout(
            device,
            "Instances Layout",
            storage_buffer_read_only(
                b.instances.binding,
                wgpu::ShaderStages::VERTEX,
            ),
        );
        Self {
            material,
            camera,
            rotation,
            instances,
        }
    }

    fn get(&self, group: MeshGroup) -> &wgpu::BindGroupLayout {
        match group {
            MeshGroup::Material => &self.material,
            MeshGroup::Camera => &self.camera,
            MeshGroup::Rotation => &self.rotation,
            MeshGroup::Instances => &self.instances,
        }
    }

    /// Layouts in bind group index order, for the pipeline layout.
    #[must_use]
    pub fn ordered(&self) -> [&wgpu::BindGroupLayout; MeshBindings::GROUP_COUNT] {
        group_order(&MESH_BINDINGS).map(|group| self.get(group))
    }
}

/// Bind groups for one instanced draw.
pub struct MeshDrawBindings<'a> {
    /// Material group (texture + sampler).
    pub material: &'a wgpu::BindGroup,
    /// Camera group.
    pub camera: &'a wgpu::BindGroup,
    /// Rotation group.
    pub rotation: &'a wgpu::BindGroup,
    /// Instance transforms group.
    pub instances: &'a wgpu::BindGroup,
}

impl MeshDrawBindings<'_> {
    fn get(&self, group: MeshGroup) -> &wgpu::BindGroup {
        match group {
            MeshGroup::Material => self.material,
            MeshGroup::Camera => self.camera,
            MeshGroup::Rotation => self.rotation,
            MeshGroup::Instances => self.instances,
        }
    }
}

/// Render pipeline for instanced textured meshes.
pub struct InstancedMeshPipeline {
    pipeline: wgpu::RenderPipeline,
}

impl InstancedMeshPipeline {
    /// Compose the mesh shader and build the pipeline for the surface
    /// format with a `Less` depth test.
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError::ShaderCompose`] if the shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        layouts: &MeshLayouts,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, CanopyError> {
        let device = &context.device;
        let shader = shader_composer.compose(
            device,
            "Instanced Mesh Shader",
            Shader::InstancedMesh,
        )?;

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Instanced Mesh Pipeline Layout"),
                bind_group_layouts: &layouts.ordered(),
                push_constant_ranges: &[],
            });

        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Instanced Mesh Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex::desc()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: context.format(),
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(depth_stencil_state(DEPTH_FORMAT)),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        log::debug!("created instanced mesh pipeline ({:?})", context.format());
        Ok(Self { pipeline })
    }

    /// Record an indexed draw of `mesh` for instances `0..instance_count`.
    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        mesh: &Mesh,
        bindings: &MeshDrawBindings<'_>,
        instance_count: u32,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        for (index, group) in group_order(&MESH_BINDINGS).into_iter().enumerate() {
            render_pass.set_bind_group(index as u32, bindings.get(group), &[]);
        }
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass
            .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..mesh.index_count, 0, 0..instance_count);
    }
}

/// Material bind group for a diffuse texture.
#[must_use]
pub fn material_bind_group(
    device: &wgpu::Device,
    layouts: &MeshLayouts,
    texture: &DiffuseTexture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Material Bind Group"),
        layout: &layouts.material,
        entries: &[
            wgpu::BindGroupEntry {
                binding: MESH_BINDINGS.diffuse_texture.binding,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: MESH_BINDINGS.diffuse_sampler.binding,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn vertex_layout_matches_contract() {
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride, 20);
        assert_eq!(desc.attributes[0].shader_location, 0);
        assert_eq!(desc.attributes[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(desc.attributes[1].shader_location, 1);
        assert_eq!(desc.attributes[1].offset, 12);
        assert_eq!(desc.attributes[1].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn groups_are_ordered_by_index() {
        assert_eq!(
            group_order(&MESH_BINDINGS),
            [
                MeshGroup::Material,
                MeshGroup::Camera,
                MeshGroup::Rotation,
                MeshGroup::Instances
            ]
        );
    }

    #[test]
    fn cube_indices_are_in_range() {
        assert!(CUBE_INDICES
            .iter()
            .all(|&i| (i as usize) < CUBE_VERTICES.len()));
    }

    #[test]
    fn cube_triangles_face_outward() {
        let p = |i: u16| Vec3::from_array(CUBE_VERTICES[i as usize].position);
        for tri in CUBE_INDICES.chunks(3) {
            let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "triangle {tri:?} faces inward");
        }
    }

    #[test]
    fn every_cube_face_is_covered_twice() {
        // Each of the 6 axis-aligned faces gets exactly 2 triangles.
        let p = |i: u16| Vec3::from_array(CUBE_VERTICES[i as usize].position);
        let mut counts = std::collections::HashMap::new();
        for tri in CUBE_INDICES.chunks(3) {
            let n = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0])).normalize();
            let key = (n.x.round() as i32, n.y.round() as i32, n.z.round() as i32);
            *counts.entry(key).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 6);
        assert!(counts.values().all(|&c| c == 2));
    }
}
