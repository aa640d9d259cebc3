//! Shader stages, wire formats, and the declared-resource-count create-info (§3).

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

/// The wire format a shader's bytecode/source is expressed in. `SpirV` is the only format the
/// frontend ever transpiles away from (see [`crate::transpile`]); the rest pass straight through
/// to whichever backend declares support for them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ShaderFormat {
    SpirV,
    Hlsl,
    Dxbc,
    Dxil,
    Msl,
    MetalLib,
    OpaqueSecret,
}

#[derive(Clone, Debug)]
pub struct ShaderCreateInfo {
    pub stage: ShaderStage,
    pub format: ShaderFormat,
    pub code: Vec<u8>,
    pub entry_point: String,
    pub sampler_count: u32,
    pub storage_texture_count: u32,
    pub storage_buffer_count: u32,
    pub uniform_buffer_count: u32,
}

impl ShaderCreateInfo {
    pub fn is_valid(&self) -> bool {
        !self.code.is_empty() && !self.entry_point.is_empty()
    }

    pub fn needs_transpile(&self, backend_is_vulkan_family: bool) -> bool {
        self.format == ShaderFormat::SpirV && !backend_is_vulkan_family
    }
}
