//! Depth-buffer visualization drawn over the finished mesh pass.
//!
//! A full-screen quad is generated from the vertex index alone (see
//! [`fullscreen`](super::fullscreen)); no vertex buffer is bound and
//! exactly [`QUAD_VERTEX_COUNT`] vertices are drawn. Output blends over
//! the existing frame with standard alpha blending.

use crate::binding::DEPTH_VIEW_BINDINGS;
use crate::error::CanopyError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, depth_texture_2d, nearest_sampler,
    non_filtering_sampler,
};
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::gpu::texture::DepthTexture;
use crate::options::DepthOverlayMode;
use crate::renderer::fullscreen::QUAD_VERTEX_COUNT;

/// Shader drawn for an overlay mode; `None` when nothing is drawn.
#[must_use]
pub fn overlay_shader(mode: DepthOverlayMode) -> Option<Shader> {
    match mode {
        DepthOverlayMode::Off => None,
        DepthOverlayMode::Sampled => Some(Shader::DepthView),
        DepthOverlayMode::Constant => Some(Shader::DepthViewConstant),
    }
}

/// Depth overlay pass: both pipeline variants, the depth binding and the
/// active mode.
pub struct DepthOverlay {
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    bind_group: wgpu::BindGroup,
    sampled_pipeline: wgpu::RenderPipeline,
    constant_pipeline: wgpu::RenderPipeline,
    mode: DepthOverlayMode,
}

impl DepthOverlay {
    /// Build both variants against `format`, reading from `depth`.
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError::ShaderCompose`] if either shader fails to
    /// compose.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        depth: &DepthTexture,
        shader_composer: &mut ShaderComposer,
        mode: DepthOverlayMode,
    ) -> Result<Self, CanopyError> {
        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Depth View Layout"),
                entries: &[
                    depth_texture_2d(DEPTH_VIEW_BINDINGS.depth_texture.binding),
                    non_filtering_sampler(
                        DEPTH_VIEW_BINDINGS.depth_sampler.binding,
                    ),
                ],
            });
        let sampler = nearest_sampler(device, "Depth View Sampler");
        let bind_group = Self::create_bind_group(device, &layout, &sampler, depth);

        let blend = Some(wgpu::BlendState::ALPHA_BLENDING);
        let sampled_shader = shader_composer.compose(
            device,
            "Depth View Shader",
            Shader::DepthView,
        )?;
        let sampled_pipeline = create_screen_space_pipeline(
            device,
            "Depth View",
            &sampled_shader,
            format,
            blend,
            &[&layout],
        );
        let constant_shader = shader_composer.compose(
            device,
            "Depth View Constant Shader",
            Shader::DepthViewConstant,
        )?;
        let constant_pipeline = create_screen_space_pipeline(
            device,
            "Depth View Constant",
            &constant_shader,
            format,
            blend,
            &[&layout],
        );

        Ok(Self {
            layout,
            sampler,
            bind_group,
            sampled_pipeline,
            constant_pipeline,
            mode,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        depth: &DepthTexture,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Depth View Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: DEPTH_VIEW_BINDINGS.depth_texture.binding,
                    resource: wgpu::BindingResource::TextureView(&depth.view),
                },
                wgpu::BindGroupEntry {
                    binding: DEPTH_VIEW_BINDINGS.depth_sampler.binding,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    /// Rebind after the depth texture was recreated (resize).
    pub fn set_depth_texture(&mut self, device: &wgpu::Device, depth: &DepthTexture) {
        self.bind_group =
            Self::create_bind_group(device, &self.layout, &self.sampler, depth);
    }

    /// The active mode.
    #[must_use]
    pub fn mode(&self) -> DepthOverlayMode {
        self.mode
    }

    /// Select a mode.
    pub fn set_mode(&mut self, mode: DepthOverlayMode) {
        if mode != self.mode {
            log::info!("depth overlay: {mode:?}");
        }
        self.mode = mode;
    }

    /// Step to the next mode and return it.
    pub fn cycle(&mut self) -> DepthOverlayMode {
        self.set_mode(self.mode.next());
        self.mode
    }

    /// Record the overlay pass onto `target`, loading its contents. Does
    /// nothing when the mode is [`DepthOverlayMode::Off`].
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let Some(shader) = overlay_shader(self.mode) else {
            return;
        };
        let pipeline = match shader {
            Shader::DepthViewConstant => &self.constant_pipeline,
            _ => &self.sampled_pipeline,
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Depth View Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(
            DEPTH_VIEW_BINDINGS.depth_texture.group,
            &self.bind_group,
            &[],
        );
        render_pass.draw(0..QUAD_VERTEX_COUNT, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_mode_selects_its_variant() {
        assert_eq!(overlay_shader(DepthOverlayMode::Off), None);
        assert_eq!(
            overlay_shader(DepthOverlayMode::Sampled),
            Some(Shader::DepthView)
        );
        assert_eq!(
            overlay_shader(DepthOverlayMode::Constant),
            Some(Shader::DepthViewConstant)
        );
    }

    #[test]
    fn draws_exactly_one_quad() {
        assert_eq!(QUAD_VERTEX_COUNT, 6);
    }
}
