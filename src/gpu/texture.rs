//! Diffuse and depth textures.
//!
//! The diffuse texture is the material half of the mesh pipeline's group 0;
//! the depth texture is written by the mesh pass and read back by the depth
//! overlay.

use std::path::Path;

use image::GenericImageView;

use crate::error::CanopyError;

/// Depth attachment format shared by the mesh pipeline and the overlay.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// PNG shipped with the crate and used when no texture file is configured.
pub const DEFAULT_TEXTURE_PNG: &[u8] = include_bytes!("../../assets/textures/tree.png");

/// A sampled color texture with its view and sampler.
pub struct DiffuseTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
    /// Sampler bound next to the view.
    pub sampler: wgpu::Sampler,
    /// `(width, height)` in texels.
    pub size: (u32, u32),
}

impl DiffuseTexture {
    /// Decode an encoded image (PNG/JPEG) and upload it.
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError::Texture`] if the bytes cannot be decoded.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
    ) -> Result<Self, CanopyError> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_image(device, queue, &img, label))
    }

    /// Read and decode an image file, then upload it.
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError::Io`] if the file cannot be read and
    /// [`CanopyError::Texture`] if it cannot be decoded.
    pub fn from_path(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Result<Self, CanopyError> {
        let bytes = std::fs::read(path)?;
        let label = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("diffuse");
        Self::from_bytes(device, queue, &bytes, label)
    }

    /// Upload an already-decoded image.
    #[must_use]
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: &str,
    ) -> Self {
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();
        Self::from_rgba8(device, queue, &rgba, width, height, label)
    }

    /// Decode and upload the bundled [`DEFAULT_TEXTURE_PNG`].
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError::Texture`] if the bundled image fails to decode.
    pub fn bundled(device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Self, CanopyError> {
        Self::from_bytes(device, queue, DEFAULT_TEXTURE_PNG, "tree.png")
    }

    /// Procedural checkerboard, the last resort when no image decodes.
    #[must_use]
    pub fn checkerboard(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let (size, rgba) = checkerboard_rgba(64, 8, [46, 125, 50, 255], [200, 230, 201, 255]);
        Self::from_rgba8(device, queue, &rgba, size, size, "checkerboard")
    }

    /// Upload tightly-packed sRGB RGBA8 texels.
    #[must_use]
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{label} Sampler")),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        log::debug!("uploaded texture '{label}' ({width}x{height})");
        Self {
            texture,
            view,
            sampler,
            size: (width, height),
        }
    }
}

/// Depth attachment that is also bindable as a sampled texture.
pub struct DepthTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// View used both as attachment and as binding.
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    /// Create a depth texture matching the given size.
    #[must_use]
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// RGBA8 checkerboard of `size`×`size` texels with `cell`-sized squares.
fn checkerboard_rgba(
    size: u32,
    cell: u32,
    a: [u8; 4],
    b: [u8; 4],
) -> (u32, Vec<u8>) {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let color = if ((x / cell) + (y / cell)) % 2 == 0 { a } else { b };
            data.extend_from_slice(&color);
        }
    }
    (size, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates_cells() {
        let a = [1, 2, 3, 255];
        let b = [9, 8, 7, 255];
        let (size, data) = checkerboard_rgba(4, 2, a, b);
        assert_eq!(size, 4);
        assert_eq!(data.len(), 4 * 4 * 4);
        let px = |x: usize, y: usize| &data[(y * 4 + x) * 4..(y * 4 + x) * 4 + 4];
        assert_eq!(px(0, 0), &a);
        assert_eq!(px(1, 1), &a);
        assert_eq!(px(2, 0), &b);
        assert_eq!(px(0, 2), &b);
        assert_eq!(px(3, 3), &a);
    }

    #[test]
    fn bundled_texture_decodes() {
        let img = image::load_from_memory(DEFAULT_TEXTURE_PNG).unwrap();
        assert_eq!((img.width(), img.height()), (128, 128));
        assert_eq!(img.to_rgba8().len(), 128 * 128 * 4);
    }

    #[test]
    fn depth_format_is_sampleable_depth() {
        assert!(DEPTH_FORMAT.has_depth_aspect());
        assert!(!DEPTH_FORMAT.has_stencil_aspect());
    }
}
