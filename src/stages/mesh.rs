use glam::{Mat4, Vec2, Vec3, Vec4};

use super::sampler::{SamplerState, TexelImage};

/// The three transform resources bound for one instanced draw.
#[derive(Debug, Clone, Copy)]
pub struct TransformBindings<'a> {
    /// Camera view-projection (group 1).
    pub camera_view_proj: Mat4,
    /// Per-object rotation (group 2).
    pub rotation: Mat4,
    /// Per-instance transforms (group 3), indexed by instance index.
    pub instances: &'a [Mat4],
}

/// One vertex invocation's inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertexInput {
    /// Object-local position (location 0).
    pub position: Vec3,
    /// Texture coordinate (location 1).
    pub tex_coords: Vec2,
    /// `@builtin(instance_index)` supplied by the draw call.
    pub instance_index: u32,
}

/// One vertex invocation's outputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertexOutput {
    /// Clip-space position handed to the rasterizer.
    pub clip_position: Vec4,
    /// Texture coordinate, unchanged.
    pub tex_coords: Vec2,
}

/// `camera * (instance * rotation) * vec4(local, 1)`.
#[must_use]
pub fn clip_position(
    camera_view_proj: Mat4,
    instance: Mat4,
    rotation: Mat4,
    local: Vec3,
) -> Vec4 {
    let world = instance * rotation;
    camera_view_proj * world * local.extend(1.0)
}

/// Vertex stage of the instanced mesh pipeline.
///
/// Returns `None` for an instance index past the end of the transform
/// array, which on the GPU is a host contract violation.
#[must_use]
pub fn vertex(
    input: &MeshVertexInput,
    bindings: &TransformBindings<'_>,
) -> Option<MeshVertexOutput> {
    let instance = bindings.instances.get(input.instance_index as usize)?;
    Some(MeshVertexOutput {
        clip_position: clip_position(
            bindings.camera_view_proj,
            *instance,
            bindings.rotation,
            input.position,
        ),
        tex_coords: input.tex_coords,
    })
}

/// Fragment stage of the instanced mesh pipeline: the sampled texel,
/// unmodified.
#[must_use]
pub fn fragment(
    tex_coords: Vec2,
    texture: &TexelImage,
    sampler: &SamplerState,
) -> Vec4 {
    sampler.sample(texture, tex_coords)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn assert_close(a: Vec4, b: Vec4) {
        assert!(a.abs_diff_eq(b, 1e-5), "{a:?} != {b:?}");
    }

    #[test]
    fn identity_bindings_pass_position_through() {
        let instances = [Mat4::IDENTITY];
        let bindings = TransformBindings {
            camera_view_proj: Mat4::IDENTITY,
            rotation: Mat4::IDENTITY,
            instances: &instances,
        };
        let input = MeshVertexInput {
            position: Vec3::new(0.25, -3.0, 7.5),
            tex_coords: Vec2::new(0.1, 0.9),
            instance_index: 0,
        };
        let out = vertex(&input, &bindings).unwrap();
        assert_eq!(out.clip_position, Vec4::new(0.25, -3.0, 7.5, 1.0));
        assert_eq!(out.tex_coords, input.tex_coords);
    }

    #[test]
    fn composes_camera_instance_rotation_in_order() {
        let camera = Mat4::perspective_rh(0.8, 1.5, 0.1, 100.0)
            * Mat4::look_at_rh(Vec3::new(0.0, 2.0, 10.0), Vec3::ZERO, Vec3::Y);
        let rotation = Mat4::from_rotation_x(0.3) * Mat4::from_rotation_y(0.7);
        let instances = [
            Mat4::from_translation(Vec3::new(-2.0, 0.0, 0.0)),
            Mat4::from_translation(Vec3::new(4.0, 2.0, 0.0)),
        ];
        let bindings = TransformBindings {
            camera_view_proj: camera,
            rotation,
            instances: &instances,
        };
        let local = Vec3::new(0.5, -0.5, 0.5);
        for (i, instance) in instances.iter().enumerate() {
            let input = MeshVertexInput {
                position: local,
                tex_coords: Vec2::ZERO,
                instance_index: i as u32,
            };
            let out = vertex(&input, &bindings).unwrap();
            let expected = camera * *instance * rotation * Vec4::new(0.5, -0.5, 0.5, 1.0);
            assert_close(out.clip_position, expected);
        }
    }

    #[test]
    fn out_of_range_instance_yields_nothing() {
        let instances = [Mat4::IDENTITY; 3];
        let bindings = TransformBindings {
            camera_view_proj: Mat4::IDENTITY,
            rotation: Mat4::IDENTITY,
            instances: &instances,
        };
        let input = MeshVertexInput {
            position: Vec3::ONE,
            tex_coords: Vec2::ZERO,
            instance_index: 3,
        };
        assert!(vertex(&input, &bindings).is_none());
    }

    #[test]
    fn swapping_rotation_and_instance_changes_result() {
        let rotation = Mat4::from_rotation_z(FRAC_PI_2);
        let instance = Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0));
        let local = Vec3::X;

        let ordered = clip_position(Mat4::IDENTITY, instance, rotation, local);
        let swapped = Mat4::IDENTITY * (rotation * instance) * local.extend(1.0);

        // Rotate in object space first, then translate into place.
        assert_close(ordered, Vec4::new(2.0, 1.0, 0.0, 1.0));
        assert_close(swapped, Vec4::new(0.0, 3.0, 0.0, 1.0));
        assert!(!ordered.abs_diff_eq(swapped, 1e-3));
    }

    #[test]
    fn rotation_change_only_affects_object_space() {
        let camera = Mat4::from_scale(Vec3::new(0.5, 0.5, 1.0));
        let instance = Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0));
        let local = Vec3::new(1.0, 0.0, 0.0);

        let a = clip_position(camera, instance, Mat4::IDENTITY, local);
        let b = clip_position(camera, instance, Mat4::from_rotation_z(FRAC_PI_2), local);

        // Instance translation and camera scale are applied identically in
        // both draws; only the local offset turned.
        assert_close(a, Vec4::new(2.0, 0.0, 0.0, 1.0));
        assert_close(b, Vec4::new(1.5, 0.5, 0.0, 1.0));
    }

    #[test]
    fn one_texel_texture_samples_everywhere() {
        let color = Vec4::new(0.2, 0.4, 0.6, 0.8);
        let texture = TexelImage::solid(color);
        let coords = [
            Vec2::ZERO,
            Vec2::ONE,
            Vec2::new(0.5, 0.5),
            Vec2::new(-3.2, 7.9),
            Vec2::new(100.0, -0.01),
            // Beyond i64 range once scaled to texels.
            Vec2::new(1e20, 0.5),
            Vec2::new(-1e20, 1e20),
        ];
        for sampler in [
            SamplerState::LINEAR_CLAMP,
            SamplerState::NEAREST_CLAMP,
            SamplerState::LINEAR_CLAMP.repeating(),
        ] {
            for uv in coords {
                assert_eq!(fragment(uv, &texture, &sampler), color);
            }
        }
    }
}
