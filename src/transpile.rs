//! The shader cross-compiler bridge (§4.1, §6, §9).
//!
//! Shader cross-compilation itself is an external collaborator — this module only defines the
//! seam: a pure function from one create-info to another, invoked by [`crate::device::Device`]
//! when a shader declares SPIR-V but the active backend isn't Vulkan-family. Keeping it behind a
//! trait lets a host disable or swap the cross-compiler at link time without this crate knowing
//! which one it got (§9 "Shader transpile bridge").

use crate::error::{Error, Result};
use crate::shader::{ShaderCreateInfo, ShaderFormat};

/// Which source language a non-Vulkan-family backend expects.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TargetLanguage {
    Hlsl,
    Msl,
}

impl TargetLanguage {
    pub fn target_format(self) -> ShaderFormat {
        match self {
            TargetLanguage::Hlsl => ShaderFormat::Hlsl,
            TargetLanguage::Msl => ShaderFormat::Msl,
        }
    }
}

/// `compile_from_spirv` from §6: reads `code`, `entry_point`, `format` off the create-info and
/// returns one with translated code, a possibly-renamed entry point (Metal renames `main`), and
/// the realized format.
pub trait CrossCompiler: Send + Sync {
    fn compile_from_spirv(
        &self,
        create_info: &ShaderCreateInfo,
        target: TargetLanguage,
    ) -> Result<ShaderCreateInfo>;
}

/// Rewrites `create_info` in place if it needs transpilation for `target`, otherwise returns it
/// unchanged. Failure propagates as an error, which the caller turns into a null handle (§4.1:
/// "Failure propagates as null").
pub fn maybe_transpile(
    compiler: &dyn CrossCompiler,
    create_info: ShaderCreateInfo,
    backend_is_vulkan_family: bool,
    target: TargetLanguage,
) -> Result<ShaderCreateInfo> {
    if !create_info.needs_transpile(backend_is_vulkan_family) {
        return Ok(create_info);
    }
    compiler
        .compile_from_spirv(&create_info, target)
        .map_err(|e| Error::TranspileFailed(e.to_string()))
}

/// A compiler that refuses every request. The default when a host links no cross-compiler;
/// SPIR-V shaders simply fail to create on non-Vulkan-family backends rather than silently
/// passing SPIR-V bytecode through.
pub struct NoCrossCompiler;

impl CrossCompiler for NoCrossCompiler {
    fn compile_from_spirv(
        &self,
        _create_info: &ShaderCreateInfo,
        _target: TargetLanguage,
    ) -> Result<ShaderCreateInfo> {
        Err(Error::TranspileFailed(
            "no cross-compiler configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::ShaderStage;

    fn spirv_info() -> ShaderCreateInfo {
        ShaderCreateInfo {
            stage: ShaderStage::Fragment,
            format: ShaderFormat::SpirV,
            code: vec![0x03, 0x02, 0x23, 0x07],
            entry_point: "main".to_string(),
            sampler_count: 0,
            storage_texture_count: 0,
            storage_buffer_count: 0,
            uniform_buffer_count: 1,
        }
    }

    #[test]
    fn vulkan_family_needs_no_transpile() {
        let info = spirv_info();
        let result = maybe_transpile(&NoCrossCompiler, info, true, TargetLanguage::Hlsl).unwrap();
        assert_eq!(result.format, ShaderFormat::SpirV);
    }

    #[test]
    fn no_cross_compiler_fails_on_non_vulkan() {
        let info = spirv_info();
        let result = maybe_transpile(&NoCrossCompiler, info, false, TargetLanguage::Msl);
        assert!(result.is_err());
    }
}
