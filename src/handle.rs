//! Opaque identifiers for every resource kind the device can create.
//!
//! Unlike the borrowed-reference resources of earlier iterations of this renderer, handles here
//! are `Copy`, carry no lifetime, and are stable across cycling: a handle always names the same
//! logical resource, even as its backing storage rotates underneath it (see [`crate::cycle`]).
//!
//! Each handle is a generational key from a [`slotmap::SlotMap`], so a stale handle (one whose
//! resource has been released and its slot reused) is rejected rather than silently aliasing a
//! new resource.

use slotmap::new_key_type;

new_key_type! {
    pub struct BufferHandle;
    pub struct TransferBufferHandle;
    pub struct TextureHandle;
    pub struct SamplerHandle;
    pub struct ShaderHandle;
    pub struct GraphicsPipelineHandle;
    pub struct ComputePipelineHandle;
    pub struct FenceHandle;
}

/// A `(texture, layer, mip-level)` triple: the unit of attachment, cycling and barrier tracking
/// for textures.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TextureSlice {
    pub texture: TextureHandle,
    pub layer: u32,
    pub mip_level: u32,
}

impl TextureSlice {
    pub fn base(texture: TextureHandle) -> TextureSlice {
        TextureSlice {
            texture,
            layer: 0,
            mip_level: 0,
        }
    }
}

/// Opaque handle to a window claimed for presentation. The core never looks inside it; it is
/// whatever the host windowing integration hands back from its own handle type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct WindowId(pub u64);
