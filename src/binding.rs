//! The binding and attachment structs passed to pass-begin and bind-* calls (§4.2, §4.3, §4.4).

use crate::handle::{BufferHandle, SamplerHandle, TextureHandle, TextureSlice};
use crate::sampler::Filter;
use crate::texture::{Color, DepthStencilValue};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum IndexFormat {
    Uint16,
    Uint32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LoadOp {
    Load,
    Clear,
    DontCare,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StoreOp {
    Store,
    DontCare,
}

#[derive(Copy, Clone, Debug)]
pub struct ColorAttachmentInfo {
    pub texture_slice: TextureSlice,
    pub clear_color: Color,
    pub load_op: LoadOp,
    pub store_op: StoreOp,
    pub cycle: bool,
}

#[derive(Copy, Clone, Debug)]
pub struct DepthStencilAttachmentInfo {
    pub texture_slice: TextureSlice,
    pub clear_value: DepthStencilValue,
    pub depth_load_op: LoadOp,
    pub depth_store_op: StoreOp,
    pub stencil_load_op: LoadOp,
    pub stencil_store_op: StoreOp,
    pub cycle: bool,
}

#[derive(Copy, Clone, Debug)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

#[derive(Copy, Clone, Debug)]
pub struct ScissorRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Copy, Clone, Debug)]
pub struct VertexBufferBinding {
    pub buffer: BufferHandle,
    pub offset: u32,
}

#[derive(Copy, Clone, Debug)]
pub struct TextureSamplerBinding {
    pub texture_slice: TextureSlice,
    pub sampler: SamplerHandle,
}

#[derive(Copy, Clone, Debug)]
pub struct StorageTextureReadWriteBinding {
    pub texture_slice: TextureSlice,
    pub cycle: bool,
}

#[derive(Copy, Clone, Debug)]
pub struct StorageBufferReadWriteBinding {
    pub buffer: BufferHandle,
    pub cycle: bool,
}

#[derive(Copy, Clone, Debug)]
pub struct BlitRegion {
    pub texture_slice: TextureSlice,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BlitFilter {
    Nearest,
    Linear,
}

impl From<BlitFilter> for Filter {
    fn from(f: BlitFilter) -> Filter {
        match f {
            BlitFilter::Nearest => Filter::Nearest,
            BlitFilter::Linear => Filter::Linear,
        }
    }
}
