use glam::{Vec2, Vec4};

/// A 2D grid of RGBA texels in linear float form, row-major from the top
/// row.
#[derive(Debug, Clone, PartialEq)]
pub struct TexelImage {
    width: u32,
    height: u32,
    texels: Vec<Vec4>,
}

impl TexelImage {
    /// Image from explicit texels. Returns `None` when the dimensions are
    /// zero or do not match `texels.len()`.
    #[must_use]
    pub fn new(width: u32, height: u32, texels: Vec<Vec4>) -> Option<Self> {
        let expected = width as usize * height as usize;
        if expected == 0 || texels.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            texels,
        })
    }

    /// 1×1 image of a single color.
    #[must_use]
    pub fn solid(color: Vec4) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![color],
        }
    }

    /// Image from 8-bit RGBA data, normalized to `[0, 1]` without any
    /// color-space conversion.
    #[must_use]
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> Option<Self> {
        let texels = rgba
            .chunks_exact(4)
            .map(|px| {
                Vec4::new(
                    f32::from(px[0]),
                    f32::from(px[1]),
                    f32::from(px[2]),
                    f32::from(px[3]),
                ) / 255.0
            })
            .collect();
        Self::new(width, height, texels)
    }

    /// Single-channel depth image; each value lands in the red channel, as a
    /// depth texture is read through its first component.
    #[must_use]
    pub fn from_depth(width: u32, height: u32, depth: &[f32]) -> Option<Self> {
        let texels = depth
            .iter()
            .map(|&d| Vec4::new(d, 0.0, 0.0, 1.0))
            .collect();
        Self::new(width, height, texels)
    }

    /// Width in texels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    fn texel(&self, x: u32, y: u32) -> Vec4 {
        self.texels[y as usize * self.width as usize + x as usize]
    }
}

/// Filtering and addressing configuration of a sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerState {
    /// Addressing along u.
    pub address_u: wgpu::AddressMode,
    /// Addressing along v.
    pub address_v: wgpu::AddressMode,
    /// Magnification and minification filter.
    pub filter: wgpu::FilterMode,
}

impl SamplerState {
    /// Clamp-to-edge nearest sampler (the depth-overlay sampler).
    pub const NEAREST_CLAMP: Self = Self {
        address_u: wgpu::AddressMode::ClampToEdge,
        address_v: wgpu::AddressMode::ClampToEdge,
        filter: wgpu::FilterMode::Nearest,
    };

    /// Clamp-to-edge linear sampler (the diffuse-texture sampler).
    pub const LINEAR_CLAMP: Self = Self {
        address_u: wgpu::AddressMode::ClampToEdge,
        address_v: wgpu::AddressMode::ClampToEdge,
        filter: wgpu::FilterMode::Linear,
    };

    /// Same filter, repeating in both directions.
    #[must_use]
    pub fn repeating(self) -> Self {
        Self {
            address_u: wgpu::AddressMode::Repeat,
            address_v: wgpu::AddressMode::Repeat,
            ..self
        }
    }

    /// Sample `image` at normalized coordinate `uv`.
    ///
    /// Texel centers sit at `(i + 0.5) / size`. Coordinates outside `[0, 1]`
    /// are resolved by the address modes; `ClampToBorder` reads transparent
    /// black.
    #[must_use]
    pub fn sample(&self, image: &TexelImage, uv: Vec2) -> Vec4 {
        let scaled = uv * Vec2::new(image.width as f32, image.height as f32);
        match self.filter {
            wgpu::FilterMode::Nearest => {
                let x = scaled.x.floor() as i64;
                let y = scaled.y.floor() as i64;
                self.fetch(image, x, y)
            }
            wgpu::FilterMode::Linear => {
                let p = scaled - Vec2::splat(0.5);
                let base = p.floor();
                let frac = p - base;
                // Float-to-int casts saturate, so the neighbour must too.
                let (x0, y0) = (base.x as i64, base.y as i64);
                let (x1, y1) = (x0.saturating_add(1), y0.saturating_add(1));
                let top = self
                    .fetch(image, x0, y0)
                    .lerp(self.fetch(image, x1, y0), frac.x);
                let bottom = self
                    .fetch(image, x0, y1)
                    .lerp(self.fetch(image, x1, y1), frac.x);
                top.lerp(bottom, frac.y)
            }
        }
    }

    fn fetch(&self, image: &TexelImage, x: i64, y: i64) -> Vec4 {
        match (
            address(x, image.width, self.address_u),
            address(y, image.height, self.address_v),
        ) {
            (Some(x), Some(y)) => image.texel(x, y),
            _ => Vec4::ZERO,
        }
    }
}

/// Resolve a texel index along one axis; `None` means "border".
fn address(index: i64, size: u32, mode: wgpu::AddressMode) -> Option<u32> {
    let n = i64::from(size);
    match mode {
        wgpu::AddressMode::ClampToEdge => Some(index.clamp(0, n - 1) as u32),
        wgpu::AddressMode::Repeat => Some(index.rem_euclid(n) as u32),
        wgpu::AddressMode::MirrorRepeat => {
            let m = index.rem_euclid(2 * n);
            let mirrored = if m < n { m } else { 2 * n - 1 - m };
            Some(mirrored as u32)
        }
        wgpu::AddressMode::ClampToBorder => {
            (0..n).contains(&index).then_some(index as u32)
        }
    }
}
