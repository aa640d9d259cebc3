//! A cross-platform, hardware-accelerated graphics abstraction: an explicit, modern GPU API —
//! command buffers, render/compute/copy passes, bindless-style resource binding, and per-window
//! swapchains — over heterogeneous native backends.
//!
//! This crate is the frontend core: the device-agnostic command-buffer state machine, the
//! resource-lifetime and cycling discipline, the pass/binding contract, the uniform-push model,
//! and the submission/fence protocol every backend driver implements. It does not itself talk to
//! Vulkan, D3D11 or Metal — [`backend::Backend`] is the seam a driver crate plugs into.

pub mod backend;
pub mod binding;
pub mod buffer;
pub mod command_buffer;
pub mod config;
pub mod cycle;
pub mod device;
pub mod error;
pub mod fence;
pub mod format;
pub mod handle;
pub mod pass;
pub mod pipeline;
pub mod primitive;
pub mod sampler;
pub mod shader;
pub mod swapchain;
pub mod texture;
pub mod transpile;
pub mod usage;

pub mod testing;

pub use backend::{BackendFlags, Driver};
pub use command_buffer::CommandBuffer;
pub use device::{Device, DeviceCreateOptions};
pub use error::{Error, Result};
pub use handle::{
    BufferHandle, ComputePipelineHandle, FenceHandle, GraphicsPipelineHandle, SamplerHandle,
    ShaderHandle, TextureHandle, TextureSlice, TransferBufferHandle, WindowId,
};
