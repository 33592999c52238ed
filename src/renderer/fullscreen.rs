//! Full-screen quad table and the `canopy::fullscreen` WGSL module generated
//! from it.
//!
//! The quad is two counter-clockwise triangles covering `[-1, 1]²` in NDC,
//! emitted from a constant table indexed by `@builtin(vertex_index)`; no
//! vertex buffer is bound. The WGSL module text is produced from the Rust
//! constants below so the shader and the host can never disagree.

use std::fmt::Write as _;

/// Number of vertices the host must draw (non-instanced) for the quad.
pub const QUAD_VERTEX_COUNT: u32 = 6;

/// Corner table: `(-1,-1)` and `(1,1)` are shared by both triangles.
pub const FULLSCREEN_QUAD: [[f32; 2]; QUAD_VERTEX_COUNT as usize] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

/// Scale of the NDC → texture-coordinate mapping.
///
/// NDC y points up while texture v points down, hence the negative y.
pub const NDC_TO_UV_SCALE: [f32; 2] = [0.5, -0.5];

/// Offset of the NDC → texture-coordinate mapping.
pub const NDC_TO_UV_OFFSET: [f32; 2] = [0.5, 0.5];

/// RGB tint of the depth overlay.
pub const OVERLAY_TINT: [f32; 3] = [0.0, 1.0, 0.0];

/// Alpha of the constant (non-sampling) depth overlay.
pub const CONSTANT_OVERLAY_ALPHA: f32 = 0.5;

/// Import path of the generated module.
pub const FULLSCREEN_IMPORT_PATH: &str = "canopy::fullscreen";

/// Virtual file path reported in composition errors.
pub const FULLSCREEN_FILE_PATH: &str = "modules/fullscreen.wgsl";

/// Map a `[-1, 1]` quad coordinate to a `[0, 1]` texture coordinate.
#[must_use]
pub fn ndc_to_uv(ndc: [f32; 2]) -> [f32; 2] {
    [
        ndc[0] * NDC_TO_UV_SCALE[0] + NDC_TO_UV_OFFSET[0],
        ndc[1] * NDC_TO_UV_SCALE[1] + NDC_TO_UV_OFFSET[1],
    ]
}

/// Source of the `canopy::fullscreen` WGSL module.
#[must_use]
pub fn fullscreen_module_source() -> String {
    let mut src = String::new();
    let _ = writeln!(src, "#define_import_path {FULLSCREEN_IMPORT_PATH}");
    src.push('\n');
    let _ = writeln!(
        src,
        "const NDC_TO_UV_SCALE: vec2<f32> = {};",
        wgsl_vec2(NDC_TO_UV_SCALE)
    );
    let _ = writeln!(
        src,
        "const NDC_TO_UV_OFFSET: vec2<f32> = {};",
        wgsl_vec2(NDC_TO_UV_OFFSET)
    );
    let _ = writeln!(
        src,
        "const OVERLAY_TINT: vec3<f32> = vec3<f32>({:?}, {:?}, {:?});",
        OVERLAY_TINT[0], OVERLAY_TINT[1], OVERLAY_TINT[2]
    );
    let _ = writeln!(
        src,
        "const CONSTANT_OVERLAY_ALPHA: f32 = {CONSTANT_OVERLAY_ALPHA:?};"
    );
    src.push('\n');
    src.push_str("fn quad_corner(vertex_index: u32) -> vec2<f32> {\n");
    let _ = writeln!(
        src,
        "    var corners = array<vec2<f32>, {QUAD_VERTEX_COUNT}>("
    );
    for corner in FULLSCREEN_QUAD {
        let _ = writeln!(src, "        {},", wgsl_vec2(corner));
    }
    src.push_str("    );\n");
    src.push_str("    return corners[vertex_index];\n");
    src.push_str("}\n\n");
    src.push_str("fn ndc_to_uv(ndc: vec2<f32>) -> vec2<f32> {\n");
    src.push_str("    return ndc * NDC_TO_UV_SCALE + NDC_TO_UV_OFFSET;\n");
    src.push_str("}\n\n");
    src.push_str("fn overlay_color(alpha: f32) -> vec4<f32> {\n");
    src.push_str("    return vec4<f32>(OVERLAY_TINT, alpha);\n");
    src.push_str("}\n\n");
    src.push_str("fn constant_overlay_color() -> vec4<f32> {\n");
    src.push_str("    return overlay_color(CONSTANT_OVERLAY_ALPHA);\n");
    src.push_str("}\n");
    src
}

fn wgsl_vec2(v: [f32; 2]) -> String {
    format!("vec2<f32>({:?}, {:?})", v[0], v[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_covers_ndc_square() {
        let mut min = [f32::MAX; 2];
        let mut max = [f32::MIN; 2];
        for [x, y] in FULLSCREEN_QUAD {
            min = [min[0].min(x), min[1].min(y)];
            max = [max[0].max(x), max[1].max(y)];
        }
        assert_eq!(min, [-1.0, -1.0]);
        assert_eq!(max, [1.0, 1.0]);
    }

    #[test]
    fn only_diagonal_corners_repeat() {
        let mut repeated = Vec::new();
        for i in 0..FULLSCREEN_QUAD.len() {
            for j in (i + 1)..FULLSCREEN_QUAD.len() {
                if FULLSCREEN_QUAD[i] == FULLSCREEN_QUAD[j] {
                    repeated.push(FULLSCREEN_QUAD[i]);
                }
            }
        }
        repeated.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert_eq!(repeated, vec![[-1.0, -1.0], [1.0, 1.0]]);
    }

    #[test]
    fn triangles_wind_counter_clockwise() {
        for tri in FULLSCREEN_QUAD.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]];
            let cross =
                (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            assert!(cross > 0.0, "triangle {tri:?} is not CCW");
        }
    }

    #[test]
    fn triangles_cover_full_area() {
        let area: f32 = FULLSCREEN_QUAD
            .chunks(3)
            .map(|t| {
                0.5 * ((t[1][0] - t[0][0]) * (t[2][1] - t[0][1])
                    - (t[1][1] - t[0][1]) * (t[2][0] - t[0][0]))
                    .abs()
            })
            .sum();
        assert_eq!(area, 4.0);
    }

    #[test]
    fn ndc_corners_map_to_texture_corners() {
        assert_eq!(ndc_to_uv([-1.0, 1.0]), [0.0, 0.0]);
        assert_eq!(ndc_to_uv([1.0, 1.0]), [1.0, 0.0]);
        assert_eq!(ndc_to_uv([-1.0, -1.0]), [0.0, 1.0]);
        assert_eq!(ndc_to_uv([1.0, -1.0]), [1.0, 1.0]);
        assert_eq!(ndc_to_uv([0.0, 0.0]), [0.5, 0.5]);
    }

    #[test]
    fn generated_module_embeds_table() {
        let src = fullscreen_module_source();
        assert!(src.starts_with("#define_import_path canopy::fullscreen"));
        assert!(src.contains("array<vec2<f32>, 6>("));
        assert!(src.contains("vec2<f32>(-1.0, 1.0),"));
        assert!(src.contains("const NDC_TO_UV_SCALE: vec2<f32> = vec2<f32>(0.5, -0.5);"));
        assert!(src.contains("const CONSTANT_OVERLAY_ALPHA: f32 = 0.5;"));
        assert!(src.contains("fn constant_overlay_color() -> vec4<f32>"));
    }
}
