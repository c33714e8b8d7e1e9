//! WGSL shader composition with `#import` support via naga-oil.

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage, ShaderType,
};
use std::borrow::Cow;

use crate::error::CometError;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Pre-loads the shared WGSL modules at construction time. Consuming shaders
/// use `#import comet::module_name` to pull in shared code. The composer
/// produces `naga::Module` IR directly, skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: source + the path used in diagnostics.
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

impl ShaderComposer {
    /// A composer with the crate's shared modules registered.
    ///
    /// # Errors
    ///
    /// [`CometError::ShaderCompose`] if a bundled module fails to parse —
    /// only possible when the crate's own WGSL assets are broken.
    pub fn new() -> Result<Self, CometError> {
        let mut composer = Composer::default();

        // Register shared modules in dependency order.
        let modules: &[ModuleDef] = &[ModuleDef {
            source: include_str!("../../assets/shaders/modules/coverage.wgsl"),
            file_path: "modules/coverage.wgsl",
        }];

        for module in modules {
            let _ = composer.add_composable_module(ComposableModuleDescriptor {
                source: module.source,
                file_path: module.file_path,
                language: ShaderLanguage::Wgsl,
                ..Default::default()
            })?;
        }

        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// [`CometError::ShaderCompose`] on unresolved imports or WGSL errors.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, CometError> {
        let naga_module = self.compose_naga(source, file_path)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a wgpu
    /// shader module. Useful for testing shader composition without a GPU
    /// device.
    ///
    /// # Errors
    ///
    /// [`CometError::ShaderCompose`] on unresolved imports or WGSL errors.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, CometError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(CometError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::pipeline::TRAIL_SHADER;

    #[test]
    fn test_trail_shader_composes() {
        let mut composer = ShaderComposer::new().unwrap();
        let module = composer
            .compose_naga(TRAIL_SHADER, "raster/trail.wgsl")
            .unwrap();
        let entry_points: Vec<&str> = module
            .entry_points
            .iter()
            .map(|ep| ep.name.as_str())
            .collect();
        assert!(entry_points.contains(&"vs_main"));
        assert!(entry_points.contains(&"fs_main"));
    }

    #[test]
    fn test_unknown_import_is_an_error() {
        let mut composer = ShaderComposer::new().unwrap();
        let result = composer.compose_naga(
            "#import comet::no_such_module::{thing}\n@fragment fn fs_main() {}",
            "broken.wgsl",
        );
        assert!(result.is_err());
    }
}
