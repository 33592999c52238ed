//! Per-draw instance transforms and the per-object rotation.

use std::ops::Range;

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::binding::MESH_BINDINGS;
use crate::error::CanopyError;
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::pipeline_helpers::buffer_bind_group;
use crate::options::SceneOptions;

/// Column-major matrix as stored in the GPU buffers.
pub type GpuMat4 = [[f32; 4]; 4];

/// Translations of a `rows × cols` grid in the z = 0 plane, centred on the
/// origin. Row-major, bottom row first.
#[must_use]
pub fn grid_transforms(rows: u32, cols: u32, spacing: f32) -> Vec<Mat4> {
    let x0 = (cols as f32 - 1.0) * 0.5;
    let y0 = (rows as f32 - 1.0) * 0.5;
    (0..rows)
        .flat_map(|row| {
            (0..cols).map(move |col| {
                Mat4::from_translation(Vec3::new(
                    (col as f32 - x0) * spacing,
                    (row as f32 - y0) * spacing,
                    0.0,
                ))
            })
        })
        .collect()
}

/// Validate a draw's instance range against the uploaded transform count.
///
/// # Errors
///
/// Returns [`CanopyError::InstanceRange`] when `requested` exceeds
/// `available`, since the vertex stage would read past the array.
pub fn instance_range(
    requested: u32,
    available: u32,
) -> Result<Range<u32>, CanopyError> {
    if requested > available {
        return Err(CanopyError::InstanceRange {
            requested,
            available,
        });
    }
    Ok(0..requested)
}

/// Instance transform storage buffer and its bind group.
pub struct InstanceTransforms {
    transforms: Vec<Mat4>,
    buffer: TypedBuffer<GpuMat4>,
    bind_group: wgpu::BindGroup,
}

impl InstanceTransforms {
    /// Upload the grid described by `scene`.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        scene: &SceneOptions,
    ) -> Self {
        let transforms = grid_transforms(scene.rows, scene.cols, scene.spacing);
        let data = to_gpu(&transforms);
        let buffer = TypedBuffer::new_with_data(
            device,
            "Instances Buffer",
            &data,
            wgpu::BufferUsages::STORAGE,
        );
        let bind_group = Self::create_bind_group(device, layout, &buffer);
        log::debug!("uploaded {} instance transforms", transforms.len());
        Self {
            transforms,
            buffer,
            bind_group,
        }
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        buffer: &TypedBuffer<GpuMat4>,
    ) -> wgpu::BindGroup {
        buffer_bind_group(
            device,
            "Instances Bind Group",
            layout,
            MESH_BINDINGS.instances,
            buffer.buffer(),
        )
    }

    /// Replace the transforms; the bind group is rebuilt only when the
    /// buffer had to grow.
    pub fn set_transforms(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        transforms: Vec<Mat4>,
    ) {
        let data = to_gpu(&transforms);
        if self.buffer.write(device, queue, &data) {
            self.bind_group = Self::create_bind_group(device, layout, &self.buffer);
        }
        self.transforms = transforms;
    }

    /// Replace the transforms with the grid described by `scene`.
    pub fn set_grid(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        scene: &SceneOptions,
    ) {
        let transforms = grid_transforms(scene.rows, scene.cols, scene.spacing);
        self.set_transforms(device, queue, layout, transforms);
    }

    /// Number of transforms bound.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.buffer.count() as u32
    }

    /// CPU copy of the uploaded transforms.
    #[must_use]
    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms
    }

    /// Bind group for [`MESH_BINDINGS.instances`](MESH_BINDINGS).
    #[must_use]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Instance range for drawing every bound transform.
    #[must_use]
    pub fn full_range(&self) -> Range<u32> {
        0..self.count()
    }
}

fn to_gpu(transforms: &[Mat4]) -> Vec<GpuMat4> {
    transforms.iter().map(Mat4::to_cols_array_2d).collect()
}

/// Rotation shared by every instance, advanced by a fixed step per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotator {
    step: Mat4,
    rotation: Mat4,
    paused: bool,
}

impl Rotator {
    /// Rotator stepping by `rot_x(degrees[0]) * rot_y(degrees[1])`.
    #[must_use]
    pub fn new(step_degrees: [f32; 2]) -> Self {
        Self {
            step: rotation_step(step_degrees),
            rotation: Mat4::IDENTITY,
            paused: false,
        }
    }

    /// Replace the step without resetting the accumulated rotation.
    pub fn set_step(&mut self, step_degrees: [f32; 2]) {
        self.step = rotation_step(step_degrees);
    }

    /// Advance by one step unless paused.
    pub fn advance(&mut self) {
        if !self.paused {
            self.rotation *= self.step;
        }
    }

    /// Pause or resume.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Whether advancing is suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The accumulated rotation.
    #[must_use]
    pub fn rotation(&self) -> Mat4 {
        self.rotation
    }
}

fn rotation_step(degrees: [f32; 2]) -> Mat4 {
    Mat4::from_rotation_x(degrees[0].to_radians())
        * Mat4::from_rotation_y(degrees[1].to_radians())
}

/// Rotation uniform buffer and its bind group.
pub struct RotationBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl RotationBinding {
    /// Create the uniform holding `rotation`.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        rotation: Mat4,
    ) -> Self {
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Rotation Buffer"),
                contents: bytemuck::cast_slice(&[rotation.to_cols_array_2d()]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = buffer_bind_group(
            device,
            "Rotation Bind Group",
            layout,
            MESH_BINDINGS.rotation,
            &buffer,
        );
        Self { buffer, bind_group }
    }

    /// Write a new rotation; per object, between frames.
    pub fn write(&self, queue: &wgpu::Queue, rotation: Mat4) {
        queue.write_buffer(
            &self.buffer,
            0,
            bytemuck::cast_slice(&[rotation.to_cols_array_2d()]),
        );
    }

    /// Bind group for [`MESH_BINDINGS.rotation`](MESH_BINDINGS).
    #[must_use]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translation(m: &Mat4) -> Vec3 {
        m.w_axis.truncate()
    }

    #[test]
    fn grid_has_rows_times_cols_centred_transforms() {
        let grid = grid_transforms(5, 4, 2.0);
        assert_eq!(grid.len(), 20);
        let sum: Vec3 = grid.iter().map(translation).sum();
        assert!(sum.abs_diff_eq(Vec3::ZERO, 1e-5));
        assert_eq!(translation(&grid[0]), Vec3::new(-3.0, -4.0, 0.0));
        assert_eq!(translation(&grid[19]), Vec3::new(3.0, 4.0, 0.0));
        assert!(grid.iter().all(|m| translation(m).z == 0.0));
    }

    #[test]
    fn neighbours_are_spacing_apart() {
        let grid = grid_transforms(2, 3, 1.5);
        let d = translation(&grid[1]) - translation(&grid[0]);
        assert_eq!(d, Vec3::new(1.5, 0.0, 0.0));
        let d = translation(&grid[3]) - translation(&grid[0]);
        assert_eq!(d, Vec3::new(0.0, 1.5, 0.0));
    }

    #[test]
    fn empty_grid() {
        assert!(grid_transforms(0, 7, 1.0).is_empty());
    }

    #[test]
    fn range_guard_rejects_overrun() {
        assert_eq!(instance_range(20, 20).unwrap(), 0..20);
        assert_eq!(instance_range(0, 0).unwrap(), 0..0);
        assert!(matches!(
            instance_range(21, 20),
            Err(CanopyError::InstanceRange {
                requested: 21,
                available: 20
            })
        ));
    }

    #[test]
    fn gpu_layout_is_column_major() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let gpu = to_gpu(&[m]);
        assert_eq!(gpu[0][3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn rotator_accumulates_step_on_the_right() {
        let mut r = Rotator::new([1.0, 0.8]);
        let step = Mat4::from_rotation_x(1f32.to_radians())
            * Mat4::from_rotation_y(0.8f32.to_radians());
        r.advance();
        r.advance();
        assert!(r.rotation().abs_diff_eq(step * step, 1e-6));
    }

    #[test]
    fn paused_rotator_holds() {
        let mut r = Rotator::new([10.0, 0.0]);
        r.advance();
        let held = r.rotation();
        r.set_paused(true);
        r.advance();
        assert_eq!(r.rotation(), held);
        r.set_paused(false);
        r.advance();
        assert_ne!(r.rotation(), held);
    }
}
