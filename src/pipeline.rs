//! Baked graphics/compute pipeline state (§3, §4.3): immutable once created, consulted by the
//! command-buffer state machine only to set/clear the pipeline-bound flags.

use crate::format::{SampleCount, TextureFormat};
use crate::handle::{ComputePipelineHandle, GraphicsPipelineHandle, ShaderHandle};
use crate::primitive::PrimitiveType;
use crate::sampler::CompareOp;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FillMode {
    Fill,
    Line,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CullMode {
    None,
    Front,
    Back,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FrontFace {
    CounterClockwise,
    Clockwise,
}

#[derive(Copy, Clone, Debug)]
pub struct RasterizerState {
    pub fill_mode: FillMode,
    pub cull_mode: CullMode,
    pub front_face: FrontFace,
    pub depth_bias_constant_factor: f32,
    pub depth_bias_clamp: f32,
    pub depth_bias_slope_factor: f32,
    pub enable_depth_bias: bool,
    pub enable_depth_clip: bool,
}

#[derive(Copy, Clone, Debug)]
pub struct MultisampleState {
    pub sample_count: SampleCount,
    pub sample_mask: u32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
    IncrementAndClamp,
    DecrementAndClamp,
    Invert,
    IncrementAndWrap,
    DecrementAndWrap,
}

#[derive(Copy, Clone, Debug)]
pub struct StencilOpState {
    pub fail_op: StencilOp,
    pub pass_op: StencilOp,
    pub depth_fail_op: StencilOp,
    pub compare_op: CompareOp,
}

#[derive(Copy, Clone, Debug)]
pub struct DepthStencilState {
    pub enable_depth_test: bool,
    pub enable_depth_write: bool,
    pub compare_op: CompareOp,
    pub enable_stencil_test: bool,
    pub front_stencil: StencilOpState,
    pub back_stencil: StencilOpState,
    pub compare_mask: u8,
    pub write_mask: u8,
    pub reference: u8,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    SrcAlphaSaturate,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BlendOp {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

bitflags::bitflags! {
    pub struct ColorComponentFlags: u32 {
        const R = 0x1;
        const G = 0x2;
        const B = 0x4;
        const A = 0x8;
    }
}

#[derive(Copy, Clone, Debug)]
pub struct ColorAttachmentBlendState {
    pub enable_blend: bool,
    pub src_color_blend_factor: BlendFactor,
    pub dst_color_blend_factor: BlendFactor,
    pub color_blend_op: BlendOp,
    pub src_alpha_blend_factor: BlendFactor,
    pub dst_alpha_blend_factor: BlendFactor,
    pub alpha_blend_op: BlendOp,
    pub color_write_mask: ColorComponentFlags,
}

#[derive(Copy, Clone, Debug)]
pub struct ColorAttachmentDescription {
    pub format: TextureFormat,
    pub blend_state: ColorAttachmentBlendState,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VertexElementFormat {
    Uint, Uint2, Uint3, Uint4,
    Int, Int2, Int3, Int4,
    Float, Float2, Float3, Float4,
    Byte4Norm, UByte4Norm, Short2Norm, Short4Norm,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VertexInputRate {
    Vertex,
    Instance,
}

#[derive(Copy, Clone, Debug)]
pub struct VertexBinding {
    pub binding: u32,
    pub stride: u32,
    pub input_rate: VertexInputRate,
}

#[derive(Copy, Clone, Debug)]
pub struct VertexAttribute {
    pub location: u32,
    pub binding: u32,
    pub format: VertexElementFormat,
    pub offset: u32,
}

#[derive(Clone, Debug, Default)]
pub struct VertexInputState {
    pub bindings: Vec<VertexBinding>,
    pub attributes: Vec<VertexAttribute>,
}

#[derive(Clone, Debug)]
pub struct GraphicsPipelineAttachmentInfo {
    pub color_attachments: Vec<ColorAttachmentDescription>,
    pub depth_stencil_format: Option<TextureFormat>,
    pub has_depth_stencil_attachment: bool,
}

#[derive(Clone, Debug)]
pub struct GraphicsPipelineCreateInfo {
    pub vertex_shader: ShaderHandle,
    pub fragment_shader: ShaderHandle,
    pub vertex_input_state: VertexInputState,
    pub primitive_type: PrimitiveType,
    pub rasterizer_state: RasterizerState,
    pub multisample_state: MultisampleState,
    pub depth_stencil_state: DepthStencilState,
    pub attachment_info: GraphicsPipelineAttachmentInfo,
    pub blend_constants: [f32; 4],
}

#[derive(Clone, Debug)]
pub struct ComputePipelineCreateInfo {
    pub compute_shader: ShaderHandle,
    pub readonly_storage_texture_count: u32,
    pub readonly_storage_buffer_count: u32,
    pub readwrite_storage_texture_count: u32,
    pub readwrite_storage_buffer_count: u32,
    pub uniform_buffer_count: u32,
    pub threadgroup_size: (u32, u32, u32),
}

/// Returned from pipeline creation: the pipeline handle plus, when the requested depth-stencil
/// format wasn't supported by the active backend, the format that was actually realized (§4.1,
/// §7 `backend-substitute`).
#[derive(Copy, Clone, Debug)]
pub struct GraphicsPipelineCreationResult {
    pub handle: GraphicsPipelineHandle,
    pub realized_depth_stencil_format: Option<TextureFormat>,
}

#[derive(Copy, Clone, Debug)]
pub struct ComputePipelineCreationResult {
    pub handle: ComputePipelineHandle,
}
