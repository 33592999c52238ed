use glam::{Quat, Vec2, Vec3};
use wgpu::util::DeviceExt;

use crate::binding::MESH_BINDINGS;
use crate::camera::core::{Camera, CameraUniform};
use crate::gpu::pipeline_helpers::buffer_bind_group;
use crate::options::CameraOptions;

/// Radians of orbit per pixel of drag at `rotate_speed = 1`.
const ROTATE_RADIANS_PER_PIXEL: f32 = 0.01;
/// World units of pan per pixel per unit of orbit distance at
/// `pan_speed = 1`.
const PAN_PER_PIXEL: f32 = 0.002;
/// Allowed orbit distance.
const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 500.0;

/// Orbital camera: the eye sits on a sphere of radius `distance` around
/// `focus_point`, oriented by `orientation`.
#[derive(Debug, Clone)]
pub struct CameraController {
    orientation: Quat,
    distance: f32,
    focus_point: Vec3,
    home_distance: f32,

    /// The camera derived from the orbit state.
    pub camera: Camera,

    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
}

impl CameraController {
    /// Controller looking at the origin from `options.distance` along +Z.
    #[must_use]
    pub fn new(options: &CameraOptions, width: u32, height: u32) -> Self {
        let distance = options.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        let camera = Camera {
            eye: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: aspect_ratio(width, height),
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        };

        let mut controller = Self {
            orientation: Quat::IDENTITY,
            distance,
            focus_point: Vec3::ZERO,
            home_distance: distance,
            camera,
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            zoom_speed: options.zoom_speed,
        };
        controller.update_camera_pos();
        controller
    }

    /// Apply new projection and speed settings without moving the eye.
    pub fn apply_options(&mut self, options: &CameraOptions) {
        self.camera.fovy = options.fovy;
        self.camera.znear = options.znear;
        self.camera.zfar = options.zfar;
        self.rotate_speed = options.rotate_speed;
        self.pan_speed = options.pan_speed;
        self.zoom_speed = options.zoom_speed;
        self.home_distance = options.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    fn update_camera_pos(&mut self) {
        let dir = self.orientation * Vec3::Z;

        self.camera.eye = self.focus_point + (dir * self.distance);
        self.camera.target = self.focus_point;
        self.camera.up = self.orientation * Vec3::Y;
    }

    /// Update the aspect ratio for a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.aspect = aspect_ratio(width, height);
    }

    /// Orbit by a screen-space drag delta (pixels).
    pub fn rotate(&mut self, delta: Vec2) {
        let speed = ROTATE_RADIANS_PER_PIXEL * self.rotate_speed;

        // Horizontal rotation around camera's up vector
        let up = self.orientation * Vec3::Y;
        let horizontal = Quat::from_axis_angle(up, -delta.x * speed);
        self.orientation = horizontal * self.orientation;

        // Vertical rotation around camera's right vector (after horizontal
        // rotation)
        let right = self.orientation * Vec3::X;
        let vertical = Quat::from_axis_angle(right, -delta.y * speed);
        self.orientation = (vertical * self.orientation).normalize();

        self.update_camera_pos();
    }

    /// Slide the focus point in the view plane by a drag delta (pixels).
    pub fn pan(&mut self, delta: Vec2) {
        let right = self.orientation * Vec3::X;
        let up = self.orientation * Vec3::Y;
        let scale = PAN_PER_PIXEL * self.pan_speed * self.distance;

        self.focus_point += right * (-delta.x * scale) + up * (delta.y * scale);
        self.update_camera_pos();
    }

    /// Move toward (positive) or away from (negative) the focus point.
    pub fn zoom(&mut self, delta: f32) {
        self.distance *= 1.0 - delta * self.zoom_speed;
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.update_camera_pos();
    }

    /// Return to the initial orbit around the origin.
    pub fn reset(&mut self) {
        self.orientation = Quat::IDENTITY;
        self.focus_point = Vec3::ZERO;
        self.distance = self.home_distance;
        self.update_camera_pos();
    }

    /// Current orbit distance.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Current focus point.
    #[must_use]
    pub fn focus_point(&self) -> Vec3 {
        self.focus_point
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// Camera uniform buffer and its bind group at the camera slot.
pub struct CameraBinding {
    /// CPU copy of the uniform.
    pub uniform: CameraUniform,
    /// GPU uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group for [`MESH_BINDINGS.camera`](MESH_BINDINGS).
    pub bind_group: wgpu::BindGroup,
}

impl CameraBinding {
    /// Create the buffer and bind group against the camera group layout.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        camera: &Camera,
    ) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(camera);

        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = buffer_bind_group(
            device,
            "Camera Bind Group",
            layout,
            MESH_BINDINGS.camera,
            &buffer,
        );

        Self {
            uniform,
            buffer,
            bind_group,
        }
    }

    /// Write the camera's view-projection; once per frame.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue, camera: &Camera) {
        self.uniform.update_view_proj(camera);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> CameraController {
        CameraController::new(&CameraOptions::default(), 800, 600)
    }

    #[test]
    fn starts_on_positive_z_looking_at_origin() {
        let c = controller();
        let d = CameraOptions::default().distance;
        assert!(c.camera.eye.abs_diff_eq(Vec3::new(0.0, 0.0, d), 1e-5));
        assert_eq!(c.camera.target, Vec3::ZERO);
        assert!((c.camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn rotate_keeps_distance() {
        let mut c = controller();
        c.rotate(Vec2::new(40.0, -25.0));
        let dist = (c.camera.eye - c.camera.target).length();
        assert!((dist - c.distance()).abs() < 1e-4);
        assert!(!c.camera.eye.abs_diff_eq(Vec3::new(0.0, 0.0, c.distance()), 1e-3));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut c = controller();
        for _ in 0..200 {
            c.zoom(5.0);
        }
        assert_eq!(c.distance(), MIN_DISTANCE);
        for _ in 0..200 {
            c.zoom(-5.0);
        }
        assert_eq!(c.distance(), MAX_DISTANCE);
    }

    #[test]
    fn pan_moves_focus_and_reset_restores() {
        let mut c = controller();
        c.pan(Vec2::new(10.0, 0.0));
        assert!(c.focus_point().x < 0.0);
        assert_eq!(c.camera.target, c.focus_point());

        c.rotate(Vec2::new(5.0, 5.0));
        c.zoom(1.0);
        c.reset();
        assert_eq!(c.focus_point(), Vec3::ZERO);
        assert_eq!(c.distance(), CameraOptions::default().distance);
        assert!(c.camera.up.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn zero_height_does_not_divide_by_zero() {
        let mut c = controller();
        c.resize(640, 0);
        assert!(c.camera.aspect.is_finite());
    }
}
