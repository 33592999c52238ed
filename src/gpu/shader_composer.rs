use std::borrow::Cow;
use std::collections::HashMap;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderDefValue,
    ShaderLanguage, ShaderType,
};

use crate::binding::{DEPTH_VIEW_BINDINGS, MESH_BINDINGS};
use crate::error::CanopyError;
use crate::renderer::fullscreen::{
    fullscreen_module_source, FULLSCREEN_FILE_PATH,
};

/// The shaders the crate builds pipelines from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shader {
    /// Instanced textured mesh (`vs_main` / `fs_main`).
    InstancedMesh,
    /// Depth overlay that samples the depth texture.
    DepthView,
    /// Depth overlay with a fixed half-alpha output.
    DepthViewConstant,
}

impl Shader {
    /// Every shader, for bulk composition.
    pub const ALL: [Self; 3] =
        [Self::InstancedMesh, Self::DepthView, Self::DepthViewConstant];

    /// WGSL source text.
    #[must_use]
    pub fn source(self) -> &'static str {
        match self {
            Self::InstancedMesh => {
                include_str!("../../assets/shaders/raster/instanced_mesh.wgsl")
            }
            Self::DepthView => {
                include_str!("../../assets/shaders/screen/depth_view.wgsl")
            }
            Self::DepthViewConstant => include_str!(
                "../../assets/shaders/screen/depth_view_constant.wgsl"
            ),
        }
    }

    /// Path used in diagnostics.
    #[must_use]
    pub fn file_path(self) -> &'static str {
        match self {
            Self::InstancedMesh => "raster/instanced_mesh.wgsl",
            Self::DepthView => "screen/depth_view.wgsl",
            Self::DepthViewConstant => "screen/depth_view_constant.wgsl",
        }
    }

    /// Binding-slot defs substituted into the source.
    #[must_use]
    pub fn shader_defs(self) -> HashMap<String, ShaderDefValue> {
        match self {
            Self::InstancedMesh => MESH_BINDINGS.shader_defs(),
            Self::DepthView | Self::DepthViewConstant => {
                DEPTH_VIEW_BINDINGS.shader_defs()
            }
        }
    }
}

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Shared modules are registered at construction time. Consuming shaders use
/// `#import canopy::module_name` to pull in shared code; binding slots arrive
/// as `#{NAME}` shader defs. The composer produces `naga::Module` IR
/// directly, skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Composer with the `canopy::transforms` and `canopy::fullscreen`
    /// modules registered.
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError::ShaderCompose`] if a shared module fails to
    /// parse.
    pub fn new() -> Result<Self, CanopyError> {
        let mut composer = Composer::default();

        let fullscreen = fullscreen_module_source();
        let modules: [(&str, &str); 2] = [
            (
                include_str!("../../assets/shaders/modules/transforms.wgsl"),
                "modules/transforms.wgsl",
            ),
            (&fullscreen, FULLSCREEN_FILE_PATH),
        ];

        for (source, file_path) in modules {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source,
                    file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| CanopyError::ShaderCompose {
                    file_path: file_path.to_owned(),
                    source: Box::new(e),
                })?;
            log::debug!("registered shader module {file_path}");
        }

        Ok(Self { composer })
    }

    /// Compose one of the crate's shaders into a `wgpu::ShaderModule`.
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError::ShaderCompose`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        shader: Shader,
    ) -> Result<wgpu::ShaderModule, CanopyError> {
        let naga_module = self.compose_naga(shader)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader into a `naga::Module` without creating a wgpu shader
    /// module. Useful for checking composition without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError::ShaderCompose`] if composition fails.
    pub fn compose_naga(
        &mut self,
        shader: Shader,
    ) -> Result<naga::Module, CanopyError> {
        self.compose_source(shader.source(), shader.file_path(), shader.shader_defs())
    }

    /// Compose arbitrary WGSL against the registered modules.
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError::ShaderCompose`] if composition fails.
    pub fn compose_source(
        &mut self,
        source: &str,
        file_path: &str,
        shader_defs: HashMap<String, ShaderDefValue>,
    ) -> Result<naga::Module, CanopyError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                shader_defs,
                ..Default::default()
            })
            .map_err(|e| CanopyError::ShaderCompose {
                file_path: file_path.to_owned(),
                source: Box::new(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use naga::valid::{Capabilities, ValidationFlags, Validator};

    use super::*;
    use crate::binding::BindingSlot;

    fn compose(shader: Shader) -> naga::Module {
        let mut composer = ShaderComposer::new().unwrap();
        composer
            .compose_naga(shader)
            .unwrap_or_else(|e| panic!("{} failed to compose: {e}", shader.file_path()))
    }

    fn bound_slots(module: &naga::Module) -> BTreeSet<BindingSlot> {
        module
            .global_variables
            .iter()
            .filter_map(|(_, var)| var.binding.as_ref())
            .map(|rb| BindingSlot::new(rb.group, rb.binding))
            .collect()
    }

    fn slot_in_space(
        module: &naga::Module,
        pred: impl Fn(naga::AddressSpace) -> bool,
    ) -> Vec<BindingSlot> {
        let mut slots: Vec<BindingSlot> = module
            .global_variables
            .iter()
            .filter(|(_, var)| pred(var.space))
            .filter_map(|(_, var)| var.binding.as_ref())
            .map(|rb| BindingSlot::new(rb.group, rb.binding))
            .collect();
        slots.sort();
        slots
    }

    fn entry_points(module: &naga::Module) -> Vec<(String, naga::ShaderStage)> {
        module
            .entry_points
            .iter()
            .map(|ep| (ep.name.clone(), ep.stage))
            .collect()
    }

    #[test]
    fn all_shaders_compose_and_validate() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in Shader::ALL {
            let module = composer
                .compose_naga(shader)
                .unwrap_or_else(|e| panic!("{} failed to compose: {e}", shader.file_path()));
            let _ = Validator::new(ValidationFlags::all(), Capabilities::all())
                .validate(&module)
                .unwrap_or_else(|e| {
                    panic!("{} failed validation: {e:?}", shader.file_path())
                });
            let eps = entry_points(&module);
            assert!(eps.contains(&("vs_main".to_owned(), naga::ShaderStage::Vertex)));
            assert!(eps.contains(&("fs_main".to_owned(), naga::ShaderStage::Fragment)));
        }
    }

    #[test]
    fn mesh_shader_binds_contract_slots() {
        let module = compose(Shader::InstancedMesh);
        let expected: BTreeSet<BindingSlot> = MESH_BINDINGS
            .resources()
            .iter()
            .map(|(_, slot, _)| *slot)
            .collect();
        assert_eq!(bound_slots(&module), expected);

        let storage = slot_in_space(&module, |s| {
            matches!(s, naga::AddressSpace::Storage { .. })
        });
        assert_eq!(storage, vec![MESH_BINDINGS.instances]);

        let uniforms =
            slot_in_space(&module, |s| s == naga::AddressSpace::Uniform);
        assert_eq!(uniforms, vec![MESH_BINDINGS.camera, MESH_BINDINGS.rotation]);
    }

    #[test]
    fn mesh_vertex_inputs_use_contract_locations() {
        let module = compose(Shader::InstancedMesh);
        let vs = module
            .entry_points
            .iter()
            .find(|ep| ep.name == "vs_main")
            .unwrap();
        let mut locations = Vec::new();
        for arg in &vs.function.arguments {
            if let naga::TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
                for member in members {
                    if let Some(naga::Binding::Location { location, .. }) = member.binding {
                        locations.push(location);
                    }
                }
            }
        }
        locations.sort_unstable();
        assert_eq!(
            locations,
            vec![MESH_BINDINGS.position_location, MESH_BINDINGS.tex_coords_location]
        );
    }

    #[test]
    fn depth_view_binds_texture_and_sampler() {
        let module = compose(Shader::DepthView);
        let expected: BTreeSet<BindingSlot> =
            [DEPTH_VIEW_BINDINGS.depth_texture, DEPTH_VIEW_BINDINGS.depth_sampler]
                .into_iter()
                .collect();
        assert_eq!(bound_slots(&module), expected);
    }

    #[test]
    fn constant_variant_binds_nothing() {
        let module = compose(Shader::DepthViewConstant);
        assert!(bound_slots(&module).is_empty());
    }

    #[test]
    fn unresolved_import_reports_file_path() {
        let mut composer = ShaderComposer::new().unwrap();
        let err = composer
            .compose_source(
                "#import canopy::missing::{thing}\n\
                 @fragment fn fs_main() -> @location(0) vec4<f32> {\n\
                 return thing();\n\
                 }\n",
                "broken.wgsl",
                HashMap::new(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CanopyError::ShaderCompose { ref file_path, .. } if file_path == "broken.wgsl"
        ));
    }
}
