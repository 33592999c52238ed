mod command;
mod input;
mod options;

use std::f64::consts::PI;

pub use self::command::ViewerCommand;
use crate::camera::{CameraBinding, CameraController};
use crate::error::CanopyError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::{DepthTexture, DiffuseTexture};
use crate::input::InputProcessor;
use crate::options::{DisplayOptions, Options};
use crate::renderer::depth_view::DepthOverlay;
use crate::renderer::instances::{
    instance_range, InstanceTransforms, RotationBinding, Rotator,
};
use crate::renderer::mesh::{
    material_bind_group, InstancedMeshPipeline, Mesh, MeshDrawBindings,
    MeshLayouts,
};
use crate::util::frame_timing::FrameTiming;

/// Background colour for a cursor position in physical pixels.
///
/// Each channel is a phase-shifted cosine/sine of the position, so the
/// colour cycles smoothly as the cursor moves across the window.
#[must_use]
pub fn cursor_color(x: f64, y: f64) -> wgpu::Color {
    wgpu::Color {
        r: ((x * PI / 128.0).cos() + 1.0) * 0.5,
        g: ((y * PI / 128.0).sin() + 1.0) * 0.5,
        b: (((x + y) * PI / 256.0).cos() + 1.0) * 0.5,
        a: 1.0,
    }
}

fn clear_color(display: &DisplayOptions) -> wgpu::Color {
    let [r, g, b] = display.clear_color;
    wgpu::Color {
        r: f64::from(r),
        g: f64::from(g),
        b: f64::from(b),
        a: 1.0,
    }
}

/// Load the configured diffuse texture, falling back to the bundled image
/// when none is set or it cannot be loaded.
fn load_diffuse(context: &RenderContext, display: &DisplayOptions) -> DiffuseTexture {
    let Some(path) = display.texture_path.as_deref() else {
        return default_diffuse(context);
    };
    match DiffuseTexture::from_path(&context.device, &context.queue, path) {
        Ok(texture) => {
            log::info!(
                "loaded texture {} ({}x{})",
                path.display(),
                texture.size.0,
                texture.size.1
            );
            texture
        }
        Err(e) => {
            log::warn!(
                "failed to load texture {}: {e}; using the bundled one",
                path.display()
            );
            default_diffuse(context)
        }
    }
}

/// The bundled texture, or a checkerboard if it fails to decode.
fn default_diffuse(context: &RenderContext) -> DiffuseTexture {
    DiffuseTexture::bundled(&context.device, &context.queue).unwrap_or_else(|e| {
        log::warn!("bundled texture unusable: {e}; using checkerboard");
        DiffuseTexture::checkerboard(&context.device, &context.queue)
    })
}

/// Renders a grid of textured, rotating mesh instances with an optional
/// depth-buffer overlay.
///
/// # Frame loop
///
/// Each frame, call [`render`](Self::render) to advance the rotation, draw
/// and present. Call [`resize`](Self::resize) when the window size changes.
/// Input is forwarded via [`handle_input`](Self::handle_input) and
/// [`handle_key_press`](Self::handle_key_press), or issued directly with
/// [`execute`](Self::execute).
///
/// # Resources
///
/// The four mesh bind groups are owned separately and written at their own
/// frequencies: the material when the texture changes, the camera every
/// frame, the rotation every frame while unpaused, and the instance
/// transforms only when the grid changes.
pub struct SceneRenderEngine {
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
    _shader_composer: ShaderComposer,

    layouts: MeshLayouts,
    mesh: Mesh,
    mesh_pipeline: InstancedMeshPipeline,
    texture: DiffuseTexture,
    material_bind_group: wgpu::BindGroup,

    /// Orbital camera controller.
    pub camera_controller: CameraController,
    camera_binding: CameraBinding,

    rotator: Rotator,
    rotation_binding: RotationBinding,
    instances: InstanceTransforms,
    /// Instances drawn per frame, `<= instances.count()`.
    draw_count: u32,

    depth: DepthTexture,
    depth_overlay: DepthOverlay,

    /// Raw input to command translation.
    pub input: InputProcessor,
    options: Options,
    frame_timing: FrameTiming,
}

impl SceneRenderEngine {
    /// Engine rendering to a window surface.
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError`] if GPU initialization or shader composition
    /// fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: Options,
    ) -> Result<Self, CanopyError> {
        let context = RenderContext::new(
            window,
            size,
            options.display.present_mode.into(),
        )
        .await?;
        Self::new_from_context(context, options)
    }

    /// Engine from a pre-built [`RenderContext`] (headless or embedded).
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError`] if shader composition fails.
    pub fn new_from_context(
        context: RenderContext,
        options: Options,
    ) -> Result<Self, CanopyError> {
        let mut shader_composer = ShaderComposer::new()?;
        let device = &context.device;
        let (width, height) = context.size();

        let layouts = MeshLayouts::new(device);
        let mesh = Mesh::cube(device);
        let mesh_pipeline =
            InstancedMeshPipeline::new(&context, &layouts, &mut shader_composer)?;

        let texture = load_diffuse(&context, &options.display);
        let material_bind_group = material_bind_group(device, &layouts, &texture);

        let camera_controller =
            CameraController::new(&options.camera, width, height);
        let camera_binding =
            CameraBinding::new(device, &layouts.camera, &camera_controller.camera);

        let mut rotator = Rotator::new(options.scene.rotation_step_degrees);
        rotator.set_paused(!options.scene.auto_rotate);
        let rotation_binding =
            RotationBinding::new(device, &layouts.rotation, rotator.rotation());
        let instances =
            InstanceTransforms::new(device, &layouts.instances, &options.scene);
        let draw_count = instances.count();

        let depth = DepthTexture::new(device, width, height);
        let depth_overlay = DepthOverlay::new(
            device,
            context.format(),
            &depth,
            &mut shader_composer,
            options.debug.depth_overlay,
        )?;

        log::info!(
            "engine ready: {width}x{height}, {} instances, format {:?}",
            draw_count,
            context.format()
        );

        let mut frame_timing = FrameTiming::new(options.display.target_fps);
        frame_timing.set_log_fps(options.debug.log_fps);

        Ok(Self {
            input: InputProcessor::with_key_bindings(options.keybindings.clone()),
            frame_timing,
            context,
            _shader_composer: shader_composer,
            layouts,
            mesh,
            mesh_pipeline,
            texture,
            material_bind_group,
            camera_controller,
            camera_binding,
            rotator,
            rotation_binding,
            instances,
            draw_count,
            depth,
            depth_overlay,
            options,
        })
    }

    /// Per-frame updates: advance the rotation and write the rotation and
    /// camera uniforms.
    pub fn update(&mut self) {
        self.rotator.advance();
        self.rotation_binding
            .write(&self.context.queue, self.rotator.rotation());
        self.camera_binding
            .update_gpu(&self.context.queue, &self.camera_controller.camera);
    }

    /// Clear colour for the mesh pass.
    #[must_use]
    pub fn background_color(&self) -> wgpu::Color {
        if self.options.display.cursor_background {
            let (x, y) = self.input.mouse_pos();
            cursor_color(f64::from(x), f64::from(y))
        } else {
            clear_color(&self.options.display)
        }
    }

    /// Encode the instanced mesh pass, clearing colour and depth.
    fn encode_mesh_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        let mut render_pass =
            encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mesh Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background_color()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    },
                ),
                ..Default::default()
            });

        let bindings = MeshDrawBindings {
            material: &self.material_bind_group,
            camera: &self.camera_binding.bind_group,
            rotation: self.rotation_binding.bind_group(),
            instances: self.instances.bind_group(),
        };
        self.mesh_pipeline.draw(
            &mut render_pass,
            &self.mesh,
            &bindings,
            self.draw_count,
        );
    }

    /// Mesh pass followed by the depth overlay, targeting `view`.
    fn render_to_view(&self, view: &wgpu::TextureView) -> wgpu::CommandEncoder {
        let mut encoder = self.context.create_encoder();
        self.encode_mesh_pass(&mut encoder, view);
        self.depth_overlay.render(&mut encoder, view);
        encoder
    }

    /// Execute one frame: update uniforms, draw the mesh, draw the overlay,
    /// and present.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.frame_timing.should_render() {
            return Ok(());
        }

        self.update();

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self.render_to_view(&view);
        self.context.submit(encoder);
        frame.present();

        self.frame_timing.end_frame();
        Ok(())
    }

    /// Render into a caller-owned texture view; nothing is presented.
    pub fn render_to_texture(&mut self, view: &wgpu::TextureView) {
        self.update();
        let encoder = self.render_to_view(view);
        self.context.submit(encoder);
        self.frame_timing.end_frame();
    }

    /// Resize the surface, the camera projection and the depth texture.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.context.resize(width, height) {
            return;
        }
        self.camera_controller.resize(width, height);
        self.depth = DepthTexture::new(&self.context.device, width, height);
        self.depth_overlay
            .set_depth_texture(&self.context.device, &self.depth);
        log::debug!("resized to {width}x{height}");
    }

    /// Reapply the surface configuration after it was lost or outdated.
    pub fn reconfigure(&self) {
        self.context.reconfigure();
    }

    /// Limit the draw to the first `count` instances.
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError::InstanceRange`] if `count` exceeds the
    /// number of uploaded transforms; the current count is kept.
    pub fn set_draw_count(&mut self, count: u32) -> Result<(), CanopyError> {
        let range = instance_range(count, self.instances.count())?;
        self.draw_count = range.end;
        Ok(())
    }

    /// Instances drawn per frame.
    #[must_use]
    pub fn draw_count(&self) -> u32 {
        self.draw_count
    }

    /// Current per-object rotation state.
    #[must_use]
    pub fn rotator(&self) -> &Rotator {
        &self.rotator
    }

    /// The active diffuse texture.
    #[must_use]
    pub fn texture(&self) -> &DiffuseTexture {
        &self.texture
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn cursor_color_at_origin() {
        let c = cursor_color(0.0, 0.0);
        assert!(approx(c.r, 1.0));
        assert!(approx(c.g, 0.5));
        assert!(approx(c.b, 1.0));
        assert!(approx(c.a, 1.0));
    }

    #[test]
    fn cursor_color_cycles() {
        let c = cursor_color(128.0, 64.0);
        assert!(approx(c.r, 0.0));
        assert!(approx(c.g, 1.0));
        assert!(approx(c.b, ((192.0 * PI / 256.0).cos() + 1.0) * 0.5));
        let a = cursor_color(10.0, 20.0);
        let b = cursor_color(10.0 + 256.0, 20.0 + 256.0);
        assert!(approx(a.r, b.r) && approx(a.g, b.g));
    }

    #[test]
    fn cursor_color_stays_in_unit_range() {
        for i in 0..50 {
            let c = cursor_color(f64::from(i) * 37.0, f64::from(i) * 11.0);
            for v in [c.r, c.g, c.b] {
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn configured_clear_color_is_opaque() {
        let display = DisplayOptions {
            clear_color: [0.25, 0.5, 0.75],
            ..DisplayOptions::default()
        };
        let c = clear_color(&display);
        assert!(approx(c.r, 0.25) && approx(c.g, 0.5) && approx(c.b, 0.75));
        assert!(approx(c.a, 1.0));
    }
}
