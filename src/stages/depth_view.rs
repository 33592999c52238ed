use glam::{Vec2, Vec3, Vec4};

use super::sampler::{SamplerState, TexelImage};
use crate::renderer::fullscreen::{
    ndc_to_uv, CONSTANT_OVERLAY_ALPHA, FULLSCREEN_QUAD, OVERLAY_TINT,
};

/// Output of the sampling quad vertex stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadVertexOutput {
    /// Clip-space corner (`z = 0`, `w = 1`).
    pub clip_position: Vec4,
    /// The same corner, forwarded in `[-1, 1]` for the fragment stage.
    pub ndc: Vec2,
}

fn corner(vertex_index: u32) -> Option<Vec2> {
    FULLSCREEN_QUAD
        .get(vertex_index as usize)
        .map(|&c| Vec2::from_array(c))
}

/// Quad vertex stage that forwards its corner as a sampling coordinate.
///
/// `None` for indices outside `0..6`, which the host never issues.
#[must_use]
pub fn quad_vertex(vertex_index: u32) -> Option<QuadVertexOutput> {
    corner(vertex_index).map(|ndc| QuadVertexOutput {
        clip_position: ndc.extend(0.0).extend(1.0),
        ndc,
    })
}

/// Quad vertex stage of the constant overlay: position only.
#[must_use]
pub fn quad_position(vertex_index: u32) -> Option<Vec4> {
    corner(vertex_index).map(|ndc| ndc.extend(0.0).extend(1.0))
}

/// Sampling overlay: green tint whose alpha is the depth read from the
/// first channel, without remapping.
#[must_use]
pub fn sampled_fragment(
    ndc: Vec2,
    depth: &TexelImage,
    sampler: &SamplerState,
) -> Vec4 {
    let uv = Vec2::from_array(ndc_to_uv(ndc.to_array()));
    let d = sampler.sample(depth, uv).x;
    Vec3::from_array(OVERLAY_TINT).extend(d)
}

/// Constant overlay: green at half alpha, whatever the input.
#[must_use]
pub fn constant_fragment() -> Vec4 {
    Vec3::from_array(OVERLAY_TINT).extend(CONSTANT_OVERLAY_ALPHA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_vertices_follow_table() {
        let expected = [
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ];
        for (i, corner) in expected.iter().enumerate() {
            let out = quad_vertex(i as u32).unwrap();
            assert_eq!(out.ndc, *corner);
            assert_eq!(out.clip_position, Vec4::new(corner.x, corner.y, 0.0, 1.0));
            assert_eq!(quad_position(i as u32), Some(out.clip_position));
        }
        assert!(quad_vertex(6).is_none());
        assert!(quad_position(u32::MAX).is_none());
    }

    #[test]
    fn sampled_alpha_equals_depth() {
        for d in [0.0, 0.125, 0.5, 0.987_654_3, 1.0] {
            let depth = TexelImage::from_depth(1, 1, &[d]).unwrap();
            for ndc in [Vec2::ZERO, Vec2::new(-1.0, 1.0), Vec2::new(0.7, -0.3)] {
                let c = sampled_fragment(ndc, &depth, &SamplerState::NEAREST_CLAMP);
                assert_eq!(c, Vec4::new(0.0, 1.0, 0.0, d));
            }
        }
    }

    #[test]
    fn sampled_reads_texel_under_fragment() {
        // 2×2 depth: top row 0.1 0.2, bottom row 0.3 0.4.
        let depth = TexelImage::from_depth(2, 2, &[0.1, 0.2, 0.3, 0.4]).unwrap();
        let s = SamplerState::NEAREST_CLAMP;
        // NDC y up: the top-left quadrant of the screen reads the top-left texel.
        assert_eq!(sampled_fragment(Vec2::new(-0.5, 0.5), &depth, &s).w, 0.1);
        assert_eq!(sampled_fragment(Vec2::new(0.5, 0.5), &depth, &s).w, 0.2);
        assert_eq!(sampled_fragment(Vec2::new(-0.5, -0.5), &depth, &s).w, 0.3);
        assert_eq!(sampled_fragment(Vec2::new(0.5, -0.5), &depth, &s).w, 0.4);
    }

    #[test]
    fn constant_overlay_is_fixed() {
        assert_eq!(constant_fragment(), Vec4::new(0.0, 1.0, 0.0, 0.5));
    }
}
