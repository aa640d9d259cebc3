//! An in-process reference backend used only by this crate's own test suite.
//!
//! This is not a real GPU driver — it performs no rendering, just enough bookkeeping to let
//! [`crate::device::Device`] be exercised end to end without linking Vulkan/D3D11/Metal, mirroring
//! the role the teacher's own fixture crate plays for its `RendererBackend` trait.

use std::sync::atomic::{AtomicU64, Ordering};

use fxhash::FxHashMap;
use parking_lot::Mutex;

use crate::backend::{
    Backend, BackendFenceId, BackendFlags, BackingId, ResourceResolver, SubmissionId,
    TextureCreateInfoRef,
};
use crate::buffer::{BufferCreateInfo, TransferBufferCreateInfo};
use crate::command_buffer::{RecordedCommand, RecordedCommandBuffer};
use crate::error::Result;
use crate::format::{SampleCount, TextureFormat, TextureType};
use crate::handle::WindowId;
use crate::pipeline::{ComputePipelineCreateInfo, GraphicsPipelineCreateInfo};
use crate::sampler::SamplerCreateInfo;
use crate::shader::ShaderCreateInfo;
use crate::swapchain::{PresentMode, SwapchainComposition};
use crate::usage::TextureUsageFlags;

/// Every format this backend claims to support, for [`TestBackend::is_texture_format_supported`].
/// `D24_UNORM`-family formats are deliberately left unsupported so pipeline/texture creation
/// exercises the depth-fallback path (§8 scenario 6) by default; call
/// [`TestBackend::support_all_depth_formats`] to opt back in.
///
/// `buffer_bytes`/`texture_bytes` are this backend's stand-in for device-local memory: real
/// drivers would move bytes through an actual GPU allocation, so `submit` walks the recorded
/// copy-pass commands and mirrors their effect here, keyed by the same `BackingId` a real backend
/// would use.
pub struct TestBackend {
    next_backing: AtomicU64,
    last_completed: AtomicU64,
    unsupported_depth: Mutex<Vec<TextureFormat>>,
    minimized_windows: Mutex<Vec<WindowId>>,
    frames_in_flight_limit: u32,
    in_flight: Mutex<u32>,
    buffer_bytes: Mutex<FxHashMap<BackingId, Vec<u8>>>,
    texture_bytes: Mutex<FxHashMap<BackingId, Vec<u8>>>,
}

impl TestBackend {
    pub fn new() -> TestBackend {
        TestBackend {
            next_backing: AtomicU64::new(1),
            last_completed: AtomicU64::new(0),
            unsupported_depth: Mutex::new(vec![TextureFormat::D24Unorm, TextureFormat::D24UnormS8Uint]),
            minimized_windows: Mutex::new(Vec::new()),
            frames_in_flight_limit: 2,
            in_flight: Mutex::new(0),
            buffer_bytes: Mutex::new(FxHashMap::default()),
            texture_bytes: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn support_all_depth_formats(&self) {
        self.unsupported_depth.lock().clear();
    }

    pub fn minimize(&self, window: WindowId) {
        self.minimized_windows.lock().push(window);
    }

    fn fresh_backing(&self) -> BackingId {
        BackingId(self.next_backing.fetch_add(1, Ordering::SeqCst))
    }

    fn texture_byte_size(info: &TextureCreateInfoRef) -> usize {
        info.width as usize
            * info.height as usize
            * info.depth as usize
            * info.layer_count as usize
            * info.level_count as usize
            * info.format.texel_block_size() as usize
    }

    /// Copies `len` bytes out of `src` at `src_offset` into `dst` at `dst_offset`, clamping to
    /// both buffers' bounds rather than panicking on a malformed region.
    fn copy_clamped(dst: &mut [u8], dst_offset: u32, src: &[u8], src_offset: u32, len: u32) {
        let dst_start = dst_offset as usize;
        let src_start = src_offset as usize;
        let len = (len as usize)
            .min(dst.len().saturating_sub(dst_start))
            .min(src.len().saturating_sub(src_start));
        if len == 0 {
            return;
        }
        dst[dst_start..dst_start + len].copy_from_slice(&src[src_start..src_start + len]);
    }

    /// Interprets the copy-pass portion of a recorded command stream against this backend's own
    /// byte stores, resolving frontend handles through `resolver`. Every other command (draws,
    /// dispatches, pass markers, debug labels) has no observable effect on this reference backend.
    fn execute_copies(&self, recorded: &RecordedCommandBuffer, resolver: &dyn ResourceResolver) {
        for cmd in &recorded.commands {
            match cmd {
                RecordedCommand::UploadToBuffer { src, dst, .. } => {
                    let bytes = resolver.read_transfer_buffer(src.transfer_buffer, src.offset, src.size);
                    let backing = resolver.buffer_backing(dst.buffer);
                    if let (Some(bytes), Some(backing)) = (bytes, backing) {
                        let mut store = self.buffer_bytes.lock();
                        if let Some(buf) = store.get_mut(&backing) {
                            Self::copy_clamped(buf, dst.offset, &bytes, 0, bytes.len() as u32);
                        }
                    }
                }
                RecordedCommand::DownloadFromBuffer { src, dst } => {
                    let backing = resolver.buffer_backing(src.buffer);
                    let bytes = backing.and_then(|backing| {
                        let store = self.buffer_bytes.lock();
                        store.get(&backing).map(|buf| {
                            let start = (src.offset as usize).min(buf.len());
                            let end = (start + src.size as usize).min(buf.len());
                            buf[start..end].to_vec()
                        })
                    });
                    if let Some(bytes) = bytes {
                        resolver.write_transfer_buffer(dst.transfer_buffer, dst.offset, &bytes);
                    }
                }
                RecordedCommand::CopyBufferToBuffer { src, dst } => {
                    let src_backing = resolver.buffer_backing(src.buffer);
                    let dst_backing = resolver.buffer_backing(dst.buffer);
                    if let (Some(src_backing), Some(dst_backing)) = (src_backing, dst_backing) {
                        let mut store = self.buffer_bytes.lock();
                        let staged = store.get(&src_backing).map(|buf| {
                            let start = (src.offset as usize).min(buf.len());
                            let end = (start + src.size as usize).min(buf.len());
                            buf[start..end].to_vec()
                        });
                        if let Some(staged) = staged {
                            if let Some(buf) = store.get_mut(&dst_backing) {
                                Self::copy_clamped(buf, dst.offset, &staged, 0, staged.len() as u32);
                            }
                        }
                    }
                }
                RecordedCommand::UploadToTexture { src, dst, .. } => {
                    let len = (dst.width * dst.height * dst.depth) as usize;
                    let bytes = resolver.read_transfer_buffer(src.transfer_buffer, src.offset, len as u32);
                    let backing = resolver.texture_slice_backing(dst.slice);
                    if let (Some(bytes), Some(backing)) = (bytes, backing) {
                        let mut store = self.texture_bytes.lock();
                        if let Some(buf) = store.get_mut(&backing) {
                            Self::copy_clamped(buf, 0, &bytes, 0, bytes.len() as u32);
                        }
                    }
                }
                RecordedCommand::DownloadFromTexture { src, dst } => {
                    let backing = resolver.texture_slice_backing(src.slice);
                    let len = src.width * src.height * src.depth;
                    let bytes = backing.and_then(|backing| {
                        let store = self.texture_bytes.lock();
                        store.get(&backing).map(|buf| {
                            let end = (len as usize).min(buf.len());
                            buf[..end].to_vec()
                        })
                    });
                    if let Some(bytes) = bytes {
                        resolver.write_transfer_buffer(dst.transfer_buffer, dst.offset, &bytes);
                    }
                }
                RecordedCommand::CopyTextureToTexture { src, dst } => {
                    let src_backing = resolver.texture_slice_backing(src.slice);
                    let dst_backing = resolver.texture_slice_backing(dst.slice);
                    if let (Some(src_backing), Some(dst_backing)) = (src_backing, dst_backing) {
                        let mut store = self.texture_bytes.lock();
                        let staged = store.get(&src_backing).cloned();
                        if let Some(staged) = staged {
                            if let Some(buf) = store.get_mut(&dst_backing) {
                                Self::copy_clamped(buf, 0, &staged, 0, staged.len() as u32);
                            }
                        }
                    }
                }
                // Mip generation would read level 0 and synthesize coarser levels; this reference
                // backend has no sampling/filtering to do that with, so it's a recognized no-op.
                RecordedCommand::GenerateMipmaps(_) => {}
                _ => {}
            }
        }
    }
}

impl Default for TestBackend {
    fn default() -> Self {
        TestBackend::new()
    }
}

impl Backend for TestBackend {
    fn flag(&self) -> BackendFlags {
        BackendFlags::VULKAN
    }

    fn create_buffer(&self, info: &BufferCreateInfo) -> Result<BackingId> {
        let backing = self.fresh_backing();
        self.buffer_bytes.lock().insert(backing, vec![0u8; info.size as usize]);
        Ok(backing)
    }

    fn create_transfer_buffer(&self, _info: &TransferBufferCreateInfo) -> Result<BackingId> {
        Ok(self.fresh_backing())
    }

    fn create_texture(&self, info: &TextureCreateInfoRef) -> Result<BackingId> {
        let backing = self.fresh_backing();
        self.texture_bytes
            .lock()
            .insert(backing, vec![0u8; Self::texture_byte_size(info)]);
        Ok(backing)
    }

    fn create_sampler(&self, _info: &SamplerCreateInfo) -> Result<BackingId> {
        Ok(self.fresh_backing())
    }

    fn create_shader(&self, _info: &ShaderCreateInfo) -> Result<BackingId> {
        Ok(self.fresh_backing())
    }

    fn create_graphics_pipeline(&self, _info: &GraphicsPipelineCreateInfo) -> Result<BackingId> {
        Ok(self.fresh_backing())
    }

    fn create_compute_pipeline(&self, _info: &ComputePipelineCreateInfo) -> Result<BackingId> {
        Ok(self.fresh_backing())
    }

    fn destroy_backing(&self, id: BackingId) {
        self.buffer_bytes.lock().remove(&id);
        self.texture_bytes.lock().remove(&id);
    }

    fn set_name(&self, _id: BackingId, _name: &str) {}

    fn is_texture_format_supported(&self, format: TextureFormat, _ty: TextureType, _usage: TextureUsageFlags) -> bool {
        if format.is_depth() {
            !self.unsupported_depth.lock().contains(&format)
        } else {
            true
        }
    }

    fn best_sample_count(&self, _format: TextureFormat, desired: SampleCount) -> SampleCount {
        desired
    }

    fn submit(
        &self,
        recorded: &RecordedCommandBuffer,
        submission: SubmissionId,
        resolver: &dyn ResourceResolver,
        acquire_fence: bool,
    ) -> Result<Option<BackendFenceId>> {
        self.execute_copies(recorded, resolver);
        // This reference backend has no queue to wait on: the submission is "complete" the moment
        // its bytes have moved, so last_completed tracks it immediately.
        self.last_completed.fetch_max(submission.0, Ordering::SeqCst);
        let fence = if acquire_fence {
            Some(BackendFenceId(submission.0))
        } else {
            None
        };
        Ok(fence)
    }

    fn wait_idle(&self) {}

    fn wait_for_fences(&self, _fences: &[BackendFenceId], _wait_all: bool) {}

    fn query_fence(&self, _fence: BackendFenceId) -> bool {
        // This reference backend executes synchronously: by the time anyone queries a fence, the
        // submission it watches has already "completed".
        true
    }

    fn release_fence(&self, _fence: BackendFenceId) {}

    fn last_completed_submission(&self) -> SubmissionId {
        SubmissionId(self.last_completed.load(Ordering::SeqCst))
    }

    fn claim_window(&self, _window: WindowId, _composition: SwapchainComposition, _present_mode: PresentMode) -> bool {
        true
    }

    fn unclaim_window(&self, _window: WindowId) {}

    fn set_swapchain_parameters(&self, _window: WindowId, _composition: SwapchainComposition, _present_mode: PresentMode) -> bool {
        true
    }

    fn supports_swapchain_composition(&self, _window: WindowId, _composition: SwapchainComposition) -> bool {
        true
    }

    fn supports_present_mode(&self, _window: WindowId, _present_mode: PresentMode) -> bool {
        true
    }

    fn swapchain_texture_format(&self, _window: WindowId) -> TextureFormat {
        TextureFormat::B8G8R8A8
    }

    fn acquire_swapchain_texture(&self, window: WindowId) -> Option<(BackingId, u32, u32)> {
        if self.minimized_windows.lock().contains(&window) {
            return None;
        }
        let mut in_flight = self.in_flight.lock();
        if *in_flight >= self.frames_in_flight_limit {
            return None;
        }
        *in_flight += 1;
        Some((self.fresh_backing(), 1920, 1080))
    }
}
