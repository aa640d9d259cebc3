//! The fixed capability interface every backend driver implements (§6 "To backend drivers",
//! §9 "Opaque pointer + function table").
//!
//! The frontend never calls into a driver except through this trait; the driver's own command
//! buffer storage, GPU memory allocator, descriptor pooling and so on are all out of scope here
//! (§1 Non-goals) — `Backend` only exposes the raw primitives the frontend needs to realize a
//! validated, cycled, pass-sequenced recording onto a concrete GPU queue.

use bitflags::bitflags;

use crate::buffer::{BufferCreateInfo, TransferBufferCreateInfo};
use crate::command_buffer::RecordedCommandBuffer;
use crate::error::Result;
use crate::format::{SampleCount, TextureFormat, TextureType};
use crate::handle::{BufferHandle, TextureSlice, TransferBufferHandle, WindowId};
use crate::pipeline::{ComputePipelineCreateInfo, GraphicsPipelineCreateInfo};
use crate::sampler::SamplerCreateInfo;
use crate::shader::ShaderCreateInfo;
use crate::swapchain::{PresentMode, SwapchainComposition};
use crate::usage::TextureUsageFlags;

bitflags! {
    /// One bit per backend family, used both for `preferred_backends_mask` at device creation
    /// and for a driver's own registration flag (§4.1 backend selection algorithm).
    pub struct BackendFlags: u32 {
        const VULKAN = 0x1;
        const D3D11 = 0x2;
        const METAL = 0x4;
    }
}

/// An opaque identifier a backend assigns to a physical resource it created. The frontend never
/// interprets this value; it only ever hands it back to the same backend.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BackingId(pub u64);

/// An opaque identifier for the backend's own fence/timeline primitive, wrapped by
/// [`crate::fence`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BackendFenceId(pub u64);

/// A monotonically increasing submission index, used by [`crate::cycle`]'s deferred-destruction
/// queue (§9 "Manual atomic reference counts on resources"). Assigned by the device dispatcher,
/// not the backend, so the same timeline is shared by cycling, disposal and fence bookkeeping.
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct SubmissionId(pub u64);

/// Lets a backend resolve the frontend handles a [`RecordedCommandBuffer`] carries, and move
/// bytes through a transfer buffer's host-visible mirror, during `submit` — without the backend
/// ever holding a resource table of its own keyed by frontend handle (§6: the frontend is the only
/// thing that knows a handle's current backing).
pub trait ResourceResolver {
    fn buffer_backing(&self, buffer: BufferHandle) -> Option<BackingId>;
    fn texture_slice_backing(&self, slice: TextureSlice) -> Option<BackingId>;
    fn read_transfer_buffer(&self, buffer: TransferBufferHandle, offset: u32, len: u32) -> Option<Vec<u8>>;
    fn write_transfer_buffer(&self, buffer: TransferBufferHandle, offset: u32, data: &[u8]) -> Option<()>;
}

pub trait Backend: Send + Sync {
    fn flag(&self) -> BackendFlags;
    fn is_vulkan_family(&self) -> bool {
        self.flag() == BackendFlags::VULKAN
    }

    fn create_buffer(&self, info: &BufferCreateInfo) -> Result<BackingId>;
    fn create_transfer_buffer(&self, info: &TransferBufferCreateInfo) -> Result<BackingId>;
    fn create_texture(&self, info: &TextureCreateInfoRef) -> Result<BackingId>;
    fn create_sampler(&self, info: &SamplerCreateInfo) -> Result<BackingId>;
    fn create_shader(&self, info: &ShaderCreateInfo) -> Result<BackingId>;
    fn create_graphics_pipeline(&self, info: &GraphicsPipelineCreateInfo) -> Result<BackingId>;
    fn create_compute_pipeline(&self, info: &ComputePipelineCreateInfo) -> Result<BackingId>;

    fn destroy_backing(&self, id: BackingId);

    fn set_name(&self, id: BackingId, name: &str);

    fn is_texture_format_supported(
        &self,
        format: TextureFormat,
        ty: TextureType,
        usage: TextureUsageFlags,
    ) -> bool;
    fn best_sample_count(&self, format: TextureFormat, desired: SampleCount) -> SampleCount;

    /// Records and submits to the GPU queue under the given `submission` id (assigned by
    /// [`crate::device::Device`]), resolving the recording's frontend handles through `resolver`
    /// to move copy-pass bytes. Returns a backend fence if one was requested.
    fn submit(
        &self,
        recorded: &RecordedCommandBuffer,
        submission: SubmissionId,
        resolver: &dyn ResourceResolver,
        acquire_fence: bool,
    ) -> Result<Option<BackendFenceId>>;

    fn wait_idle(&self);
    fn wait_for_fences(&self, fences: &[BackendFenceId], wait_all: bool);
    fn query_fence(&self, fence: BackendFenceId) -> bool;
    fn release_fence(&self, fence: BackendFenceId);
    /// Highest submission index known to have completed on the GPU.
    fn last_completed_submission(&self) -> SubmissionId;

    fn claim_window(
        &self,
        window: WindowId,
        composition: SwapchainComposition,
        present_mode: PresentMode,
    ) -> bool;
    fn unclaim_window(&self, window: WindowId);
    fn set_swapchain_parameters(
        &self,
        window: WindowId,
        composition: SwapchainComposition,
        present_mode: PresentMode,
    ) -> bool;
    fn supports_swapchain_composition(
        &self,
        window: WindowId,
        composition: SwapchainComposition,
    ) -> bool;
    fn supports_present_mode(&self, window: WindowId, present_mode: PresentMode) -> bool;
    fn swapchain_texture_format(&self, window: WindowId) -> TextureFormat;
    /// Returns the realized backing plus width/height, or `None` on transient loss (§4.7).
    fn acquire_swapchain_texture(&self, window: WindowId) -> Option<(BackingId, u32, u32)>;
}

/// Forwarded through to backends as a plain struct rather than the richer
/// [`crate::texture::TextureCreateInfo`] so that depth-format substitution (already applied by
/// the device dispatcher, §4.1) is visible to the backend as the realized format, not the one the
/// caller originally asked for.
#[derive(Clone, Debug)]
pub struct TextureCreateInfoRef {
    pub ty: TextureType,
    pub format: TextureFormat,
    pub usage: TextureUsageFlags,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub layer_count: u32,
    pub level_count: u32,
    pub sample_count: SampleCount,
}

/// What a backend crate registers with the device dispatcher at `create_device` time (§6).
pub struct Driver {
    pub name: &'static str,
    pub flag: BackendFlags,
    pub prepare: fn() -> bool,
    pub create_backend: fn(debug_mode: bool) -> Option<Box<dyn Backend>>,
}
