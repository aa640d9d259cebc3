//! The device dispatcher (§4.1): owns the selected backend, runs every precondition check §7
//! assigns to the frontend, and routes what survives validation through [`crate::backend::Backend`].

use std::sync::atomic::{AtomicU64, Ordering};

use fxhash::FxHashMap;
use parking_lot::RwLock;
use slotmap::SlotMap;

use crate::backend::{
    BackendFenceId, BackendFlags, Backend, BackingId, Driver, ResourceResolver, SubmissionId,
    TextureCreateInfoRef,
};
use crate::binding::{ColorAttachmentInfo, DepthStencilAttachmentInfo, StorageBufferReadWriteBinding, StorageTextureReadWriteBinding};
use crate::buffer::{BufferCreateInfo, TransferBufferCreateInfo};
use crate::command_buffer::{CommandBuffer, RecordedCommand, RecordedCommandBuffer};
use crate::cycle::{DisposalQueue, Ring};
use crate::error::{Error, Result};
use crate::fence::FenceEntry;
use crate::format::{depth_format_fallback, SampleCount, TextureFormat, TextureType, ULTIMATE_DEPTH_FALLBACK};
use crate::handle::{
    BufferHandle, ComputePipelineHandle, FenceHandle, GraphicsPipelineHandle, SamplerHandle,
    ShaderHandle, TextureHandle, TextureSlice, TransferBufferHandle, WindowId,
};
use crate::pass::{compute as pass_compute, copy as pass_copy, render as pass_render};
use crate::pipeline::{
    ComputePipelineCreateInfo, ComputePipelineCreationResult, GraphicsPipelineCreateInfo,
    GraphicsPipelineCreationResult,
};
use crate::sampler::SamplerCreateInfo;
use crate::shader::ShaderCreateInfo;
use crate::swapchain::{ClaimedWindow, PresentMode, SwapchainComposition};
use crate::texture::{TextureRegion, TextureTransferInfo};
use crate::transpile::{maybe_transpile, CrossCompiler, NoCrossCompiler, TargetLanguage};
use crate::usage::{BufferUsageFlags, TextureUsageFlags};

struct BufferEntry {
    ring: Ring,
    usage: BufferUsageFlags,
    size: u32,
}

struct TransferBufferEntry {
    ring: Ring,
    usage: crate::usage::TransferBufferUsage,
    size: u32,
    /// The host-visible mirror of the staging buffer's contents. Real backends keep this as
    /// genuinely mapped GPU-visible memory; the frontend models it as plain bytes so `map` /
    /// `set_transfer_data` / `get_transfer_data` (§4.6) stay safe Rust without a borrow tied to a
    /// lock guard's lifetime.
    data: Vec<u8>,
}

struct TextureEntry {
    create_info: TextureCreateInfoRef,
    /// One ring per `(layer, mip_level)` slice; cycling operates at slice granularity (§4.5).
    slices: FxHashMap<(u32, u32), Ring>,
}

struct GraphicsPipelineEntry {
    backing: BackingId,
    realized_depth_stencil_format: Option<TextureFormat>,
}

/// Options accepted by [`Device::create`], mirroring `create_device(preferred_backends_mask,
/// debug_mode)` from §4.1.
pub struct DeviceCreateOptions {
    pub preferred_backends: BackendFlags,
    pub debug_mode: bool,
}

pub struct Device {
    backend: Box<dyn Backend>,
    backend_name: &'static str,
    cross_compiler: Box<dyn CrossCompiler>,

    buffers: RwLock<SlotMap<BufferHandle, BufferEntry>>,
    transfer_buffers: RwLock<SlotMap<TransferBufferHandle, TransferBufferEntry>>,
    textures: RwLock<SlotMap<TextureHandle, TextureEntry>>,
    samplers: RwLock<SlotMap<SamplerHandle, BackingId>>,
    shaders: RwLock<SlotMap<ShaderHandle, BackingId>>,
    graphics_pipelines: RwLock<SlotMap<GraphicsPipelineHandle, GraphicsPipelineEntry>>,
    compute_pipelines: RwLock<SlotMap<ComputePipelineHandle, BackingId>>,
    fences: RwLock<SlotMap<FenceHandle, FenceEntry>>,
    claimed_windows: RwLock<FxHashMap<WindowId, ClaimedWindow>>,

    disposal: DisposalQueue,
    submission_counter: AtomicU64,
}

impl Device {
    /// Backend selection algorithm (§4.1):
    /// 1. `REFRESH_HINT_BACKEND` names a driver whose `prepare` succeeds: select it; a hint
    ///    naming no available driver is a hard failure.
    /// 2. Otherwise the first driver in `drivers` whose flag is in `preferred_backends_mask` and
    ///    whose `prepare` succeeds.
    /// 3. Otherwise the first driver whose `prepare` succeeds.
    /// 4. If none succeeds, fail.
    pub fn create(drivers: &[Driver], options: DeviceCreateOptions) -> Result<Device> {
        let selected = Self::select_driver(drivers, options.preferred_backends)?;
        let backend = (selected.create_backend)(options.debug_mode).ok_or(Error::NoBackendAvailable)?;
        Ok(Device {
            backend,
            backend_name: selected.name,
            cross_compiler: Box::new(NoCrossCompiler),
            buffers: RwLock::new(SlotMap::with_key()),
            transfer_buffers: RwLock::new(SlotMap::with_key()),
            textures: RwLock::new(SlotMap::with_key()),
            samplers: RwLock::new(SlotMap::with_key()),
            shaders: RwLock::new(SlotMap::with_key()),
            graphics_pipelines: RwLock::new(SlotMap::with_key()),
            compute_pipelines: RwLock::new(SlotMap::with_key()),
            fences: RwLock::new(SlotMap::with_key()),
            claimed_windows: RwLock::new(FxHashMap::default()),
            disposal: DisposalQueue::new(),
            submission_counter: AtomicU64::new(0),
        })
    }

    /// Swaps in a cross-compiler for SPIR-V transpilation (§9: kept behind a trait so it can be
    /// disabled or swapped without this crate knowing which one it linked).
    pub fn with_cross_compiler(mut self, compiler: Box<dyn CrossCompiler>) -> Device {
        self.cross_compiler = compiler;
        self
    }

    fn select_driver<'a>(drivers: &'a [Driver], preferred: BackendFlags) -> Result<&'a Driver> {
        if let Some(hint) = crate::config::hint_backend_from_env() {
            return drivers
                .iter()
                .find(|d| d.name.eq_ignore_ascii_case(&hint) && (d.prepare)())
                .ok_or(Error::BackendHintUnavailable(hint));
        }
        if !preferred.is_empty() {
            if let Some(driver) = drivers
                .iter()
                .find(|d| preferred.contains(d.flag) && (d.prepare)())
            {
                return Ok(driver);
            }
        }
        drivers
            .iter()
            .find(|d| (d.prepare)())
            .ok_or(Error::NoBackendAvailable)
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend_name
    }

    pub fn backend_flag(&self) -> BackendFlags {
        self.backend.flag()
    }

    fn next_submission(&self) -> SubmissionId {
        SubmissionId(self.submission_counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn last_completed(&self) -> SubmissionId {
        self.backend.last_completed_submission()
    }

    // ---- creation -----------------------------------------------------------------------------

    pub fn create_buffer(&self, info: BufferCreateInfo) -> Option<BufferHandle> {
        if !info.is_valid() {
            log::error!("refresh: invalid buffer create-info (size={})", info.size);
            return None;
        }
        let backing = match self.backend.create_buffer(&info) {
            Ok(b) => b,
            Err(e) => {
                log::error!("refresh: backend failed to create buffer: {}", e);
                return None;
            }
        };
        if let Some(name) = &info.name {
            self.backend.set_name(backing, name);
        }
        let entry = BufferEntry {
            ring: Ring::new(backing),
            usage: info.usage,
            size: info.size,
        };
        Some(self.buffers.write().insert(entry))
    }

    pub fn create_transfer_buffer(&self, info: TransferBufferCreateInfo) -> Option<TransferBufferHandle> {
        if !info.is_valid() {
            log::error!("refresh: invalid transfer buffer create-info");
            return None;
        }
        let backing = self.backend.create_transfer_buffer(&info).ok()?;
        let entry = TransferBufferEntry {
            ring: Ring::new(backing),
            usage: info.usage,
            size: info.size,
            data: vec![0u8; info.size as usize],
        };
        Some(self.transfer_buffers.write().insert(entry))
    }

    /// Allocates a fresh backend backing for a transfer buffer being cycled, matching the
    /// original create-info's usage and size (§4.5's "newly allocated" rotation case).
    fn fresh_transfer_backing(&self, usage: crate::usage::TransferBufferUsage, size: u32) -> BackingId {
        self.backend
            .create_transfer_buffer(&TransferBufferCreateInfo { usage, size })
            .unwrap_or(BackingId(0))
    }

    /// `map(transfer_buffer, cycle) -> host_ptr` (§4.6), modeled as a safe owned copy rather than
    /// a raw pointer: callers mutate the returned buffer and hand it back via
    /// [`Device::unmap_transfer_buffer`].
    pub fn map_transfer_buffer(&self, buffer: TransferBufferHandle, cycle: bool) -> Option<Vec<u8>> {
        let mut buffers = self.transfer_buffers.write();
        let entry = buffers.get_mut(buffer)?;
        let (usage, size) = (entry.usage, entry.size);
        entry.ring.resolve_write(cycle, || self.fresh_transfer_backing(usage, size));
        Some(entry.data.clone())
    }

    pub fn unmap_transfer_buffer(&self, buffer: TransferBufferHandle, data: Vec<u8>) -> Option<()> {
        let mut buffers = self.transfer_buffers.write();
        let entry = buffers.get_mut(buffer)?;
        entry.data = data;
        Some(())
    }

    /// `set_transfer_data(src_ptr, {transfer_buffer, offset, size}, cycle)` — an immediate host
    /// copy into the staging buffer (§4.6).
    pub fn set_transfer_data(
        &self,
        buffer: TransferBufferHandle,
        offset: u32,
        src: &[u8],
        cycle: bool,
    ) -> Option<()> {
        let mut buffers = self.transfer_buffers.write();
        let entry = buffers.get_mut(buffer)?;
        let (usage, size) = (entry.usage, entry.size);
        entry.ring.resolve_write(cycle, || self.fresh_transfer_backing(usage, size));
        let start = offset as usize;
        let end = start + src.len();
        if end > entry.data.len() {
            log::error!("refresh: set_transfer_data out of bounds");
            return None;
        }
        entry.data[start..end].copy_from_slice(src);
        Some(())
    }

    /// `get_transfer_data({transfer_buffer, offset, size}, dst_ptr)` — an immediate host copy of
    /// already-downloaded data (§4.6).
    pub fn get_transfer_data(&self, buffer: TransferBufferHandle, offset: u32, dst: &mut [u8]) -> Option<()> {
        let buffers = self.transfer_buffers.read();
        let entry = buffers.get(buffer)?;
        let start = offset as usize;
        let end = start + dst.len();
        if end > entry.data.len() {
            log::error!("refresh: get_transfer_data out of bounds");
            return None;
        }
        dst.copy_from_slice(&entry.data[start..end]);
        Some(())
    }

    /// Applies the depth-format substitution table before dispatching to the backend (§4.1,
    /// §7 `backend-substitute`): silent substitution, creation still succeeds, a warning logged.
    fn realize_texture_format(&self, requested: TextureFormat, ty: TextureType, usage: TextureUsageFlags) -> TextureFormat {
        if self.backend.is_texture_format_supported(requested, ty, usage) {
            return requested;
        }
        if let Some(substitute) = depth_format_fallback(requested) {
            if self.backend.is_texture_format_supported(substitute, ty, usage) {
                log::warn!(
                    "refresh: backend does not support {:?}; substituting {:?}",
                    requested,
                    substitute
                );
                return substitute;
            }
        }
        if requested.is_depth() {
            log::warn!(
                "refresh: backend does not support {:?}; falling back to {:?}",
                requested,
                ULTIMATE_DEPTH_FALLBACK
            );
            return ULTIMATE_DEPTH_FALLBACK;
        }
        requested
    }

    pub fn create_texture(&self, mut info: crate::texture::TextureCreateInfo) -> Option<TextureHandle> {
        if !info.is_valid() {
            log::error!("refresh: invalid texture create-info");
            return None;
        }
        info.format = self.realize_texture_format(info.format, info.ty, info.usage);
        let info_ref = TextureCreateInfoRef {
            ty: info.ty,
            format: info.format,
            usage: info.usage,
            width: info.width,
            height: info.height,
            depth: info.depth,
            layer_count: info.layer_count,
            level_count: info.level_count,
            sample_count: info.sample_count,
        };
        let backing = match self.backend.create_texture(&info_ref) {
            Ok(b) => b,
            Err(e) => {
                log::error!("refresh: backend failed to create texture: {}", e);
                return None;
            }
        };
        if let Some(name) = &info.name {
            self.backend.set_name(backing, name);
        }
        let mut slices = FxHashMap::default();
        slices.insert((0, 0), Ring::new(backing));
        let entry = TextureEntry {
            create_info: info_ref,
            slices,
        };
        Some(self.textures.write().insert(entry))
    }

    pub fn create_sampler(&self, info: SamplerCreateInfo) -> Option<SamplerHandle> {
        let backing = self.backend.create_sampler(&info).ok()?;
        Some(self.samplers.write().insert(backing))
    }

    /// Runs the shader transpile bridge (§4.1, §6) before dispatching to the backend.
    pub fn create_shader(&self, info: ShaderCreateInfo) -> Option<ShaderHandle> {
        if !info.is_valid() {
            log::error!("refresh: invalid shader create-info");
            return None;
        }
        let target = if self.backend.flag() == BackendFlags::METAL {
            TargetLanguage::Msl
        } else {
            TargetLanguage::Hlsl
        };
        let info = match maybe_transpile(&*self.cross_compiler, info, self.backend.is_vulkan_family(), target) {
            Ok(info) => info,
            Err(e) => {
                log::error!("refresh: shader transpile failed: {}", e);
                return None;
            }
        };
        let backing = self.backend.create_shader(&info).ok()?;
        Some(self.shaders.write().insert(backing))
    }

    pub fn create_graphics_pipeline(&self, mut info: GraphicsPipelineCreateInfo) -> Option<GraphicsPipelineCreationResult> {
        let mut realized = None;
        if let Some(requested) = info.attachment_info.depth_stencil_format {
            let realized_format = self.realize_texture_format(
                requested,
                TextureType::Tex2D,
                TextureUsageFlags::DEPTH_STENCIL_TARGET,
            );
            if realized_format != requested {
                realized = Some(realized_format);
                info.attachment_info.depth_stencil_format = Some(realized_format);
            }
        }
        let backing = match self.backend.create_graphics_pipeline(&info) {
            Ok(b) => b,
            Err(e) => {
                log::error!("refresh: backend failed to create graphics pipeline: {}", e);
                return None;
            }
        };
        let handle = self.graphics_pipelines.write().insert(GraphicsPipelineEntry {
            backing,
            realized_depth_stencil_format: realized,
        });
        Some(GraphicsPipelineCreationResult {
            handle,
            realized_depth_stencil_format: realized,
        })
    }

    pub fn create_compute_pipeline(&self, info: ComputePipelineCreateInfo) -> Option<ComputePipelineCreationResult> {
        let backing = self.backend.create_compute_pipeline(&info).ok()?;
        let handle = self.compute_pipelines.write().insert(backing);
        Some(ComputePipelineCreationResult { handle })
    }

    // ---- debug naming ---------------------------------------------------------------------------

    pub fn set_buffer_name(&self, buffer: BufferHandle, name: &str) {
        if let Some(entry) = self.buffers.read().get(buffer) {
            self.backend.set_name(entry.ring.current(), name);
        }
    }

    pub fn set_texture_name(&self, texture: TextureHandle, name: &str) {
        if let Some(entry) = self.textures.read().get(texture) {
            if let Some(ring) = entry.slices.get(&(0, 0)) {
                self.backend.set_name(ring.current(), name);
            }
        }
    }

    // ---- disposal (idempotent on an already-released/null handle) ------------------------------

    pub fn release_buffer(&self, buffer: BufferHandle) {
        let mut buffers = self.buffers.write();
        if let Some(entry) = buffers.remove(buffer) {
            self.disposal.enqueue(entry.ring.current(), self.next_submission());
        }
    }

    pub fn release_transfer_buffer(&self, buffer: TransferBufferHandle) {
        let mut buffers = self.transfer_buffers.write();
        if let Some(entry) = buffers.remove(buffer) {
            self.disposal.enqueue(entry.ring.current(), self.next_submission());
        }
    }

    pub fn release_texture(&self, texture: TextureHandle) {
        let mut textures = self.textures.write();
        if let Some(entry) = textures.remove(texture) {
            for ring in entry.slices.into_values() {
                self.disposal.enqueue(ring.current(), self.next_submission());
            }
        }
    }

    pub fn release_sampler(&self, sampler: SamplerHandle) {
        if let Some(backing) = self.samplers.write().remove(sampler) {
            self.disposal.enqueue(backing, self.next_submission());
        }
    }

    pub fn release_shader(&self, shader: ShaderHandle) {
        if let Some(backing) = self.shaders.write().remove(shader) {
            self.disposal.enqueue(backing, self.next_submission());
        }
    }

    pub fn release_graphics_pipeline(&self, pipeline: GraphicsPipelineHandle) {
        if let Some(entry) = self.graphics_pipelines.write().remove(pipeline) {
            self.disposal.enqueue(entry.backing, self.next_submission());
        }
    }

    pub fn release_compute_pipeline(&self, pipeline: ComputePipelineHandle) {
        if let Some(backing) = self.compute_pipelines.write().remove(pipeline) {
            self.disposal.enqueue(backing, self.next_submission());
        }
    }

    /// Sweeps the deferred-destruction queue against the backend's latest completed submission
    /// (§9), and retires every resource ring's completed-submission markers, reclaiming whatever
    /// backings that leaves with no remaining reference (§4.5). Called opportunistically from
    /// `submit` and `wait`.
    fn reclaim(&self) {
        let last_completed = self.last_completed();
        self.disposal.reclaim(last_completed, |backing| {
            self.backend.destroy_backing(backing);
        });
        let mut buffers = self.buffers.write();
        for entry in buffers.values_mut() {
            entry.ring.retire_completed(last_completed);
            entry.ring.drain_retired(|b| self.backend.destroy_backing(b));
        }
        drop(buffers);
        let mut transfer_buffers = self.transfer_buffers.write();
        for entry in transfer_buffers.values_mut() {
            entry.ring.retire_completed(last_completed);
            entry.ring.drain_retired(|b| self.backend.destroy_backing(b));
        }
        drop(transfer_buffers);
        let mut textures = self.textures.write();
        for entry in textures.values_mut() {
            for ring in entry.slices.values_mut() {
                ring.retire_completed(last_completed);
                ring.drain_retired(|b| self.backend.destroy_backing(b));
            }
        }
    }

    // ---- resource cycling (§4.5) ----------------------------------------------------------------
    //
    // These run over a recorded command buffer's commands before it reaches the backend: they
    // resolve every write's `cycle` flag against the referenced resource's ring (rotating to a
    // fresh backing if the resource is bound and the caller asked to cycle), and mark every
    // resource the recording touches as bound to this submission, so a later write-while-bound
    // sees the correct state and `reclaim` knows not to free a backing still in flight.

    fn resolve_buffer_write(&self, buffer: BufferHandle, cycle: bool, submission: SubmissionId) {
        let mut buffers = self.buffers.write();
        if let Some(entry) = buffers.get_mut(buffer) {
            let (usage, size) = (entry.usage, entry.size);
            entry.ring.resolve_write(cycle, || {
                self.backend
                    .create_buffer(&BufferCreateInfo { usage, size, name: None })
                    .unwrap_or(BackingId(0))
            });
            entry.ring.mark_bound(submission);
        }
    }

    fn mark_buffer_bound(&self, buffer: BufferHandle, submission: SubmissionId) {
        if let Some(entry) = self.buffers.write().get_mut(buffer) {
            entry.ring.mark_bound(submission);
        }
    }

    fn resolve_texture_slice_write(&self, slice: TextureSlice, cycle: bool, submission: SubmissionId) {
        let mut textures = self.textures.write();
        if let Some(entry) = textures.get_mut(slice.texture) {
            let base_backing = entry.slices.get(&(0, 0)).map(|r| r.current());
            let Some(base_backing) = base_backing else { return };
            let info = entry.create_info.clone();
            let ring = entry
                .slices
                .entry((slice.layer, slice.mip_level))
                .or_insert_with(|| Ring::new(base_backing));
            ring.resolve_write(cycle, || self.backend.create_texture(&info).unwrap_or(BackingId(0)));
            ring.mark_bound(submission);
        }
    }

    fn mark_texture_slice_bound(&self, slice: TextureSlice, submission: SubmissionId) {
        let mut textures = self.textures.write();
        if let Some(entry) = textures.get_mut(slice.texture) {
            let base_backing = entry.slices.get(&(0, 0)).map(|r| r.current());
            let Some(base_backing) = base_backing else { return };
            let ring = entry
                .slices
                .entry((slice.layer, slice.mip_level))
                .or_insert_with(|| Ring::new(base_backing));
            ring.mark_bound(submission);
        }
    }

    /// Walks a finalized recording, resolving cycling and marking bound state for every resource
    /// it references, before the backend ever sees the commands (§4.5, §8 scenario 3).
    fn wire_cycling(&self, commands: &[RecordedCommand], submission: SubmissionId) {
        for cmd in commands {
            match cmd {
                RecordedCommand::UploadToBuffer { dst, cycle, .. } => {
                    self.resolve_buffer_write(dst.buffer, *cycle, submission);
                }
                RecordedCommand::DownloadFromBuffer { src, .. } => {
                    self.mark_buffer_bound(src.buffer, submission);
                }
                RecordedCommand::CopyBufferToBuffer { src, dst } => {
                    self.mark_buffer_bound(src.buffer, submission);
                    self.mark_buffer_bound(dst.buffer, submission);
                }
                RecordedCommand::UploadToTexture { dst, cycle, .. } => {
                    self.resolve_texture_slice_write(dst.slice, *cycle, submission);
                }
                RecordedCommand::DownloadFromTexture { src, .. } => {
                    self.mark_texture_slice_bound(src.slice, submission);
                }
                RecordedCommand::CopyTextureToTexture { src, dst } => {
                    self.mark_texture_slice_bound(src.slice, submission);
                    self.mark_texture_slice_bound(dst.slice, submission);
                }
                RecordedCommand::GenerateMipmaps(texture) => {
                    self.mark_texture_slice_bound(TextureSlice::base(*texture), submission);
                }
                RecordedCommand::Blit { src, dst, cycle, .. } => {
                    self.mark_texture_slice_bound(src.texture_slice, submission);
                    self.resolve_texture_slice_write(dst.texture_slice, *cycle, submission);
                }
                RecordedCommand::BeginRenderPass {
                    color_attachments,
                    depth_stencil_attachment,
                } => {
                    for attachment in color_attachments {
                        self.resolve_texture_slice_write(attachment.texture_slice, attachment.cycle, submission);
                    }
                    if let Some(ds) = depth_stencil_attachment {
                        self.resolve_texture_slice_write(ds.texture_slice, ds.cycle, submission);
                    }
                }
                RecordedCommand::BeginComputePass {
                    storage_texture_bindings,
                    storage_buffer_bindings,
                } => {
                    for binding in storage_texture_bindings {
                        self.resolve_texture_slice_write(binding.texture_slice, binding.cycle, submission);
                    }
                    for binding in storage_buffer_bindings {
                        self.resolve_buffer_write(binding.buffer, binding.cycle, submission);
                    }
                }
                _ => {}
            }
        }
    }

    // ---- command buffers ------------------------------------------------------------------------

    pub fn acquire_command_buffer(&self) -> CommandBuffer {
        CommandBuffer::new()
    }

    pub fn submit(&self, cmd: CommandBuffer) -> Option<()> {
        let recorded = cmd.finish_for_submit()?;
        self.dispatch_submit(recorded, false).map(|_| ())
    }

    pub fn submit_and_acquire_fence(&self, cmd: CommandBuffer) -> Option<FenceHandle> {
        let recorded = cmd.finish_for_submit()?;
        let (submission, backend_fence) = self.dispatch_submit(recorded, true)?;
        let backend_fence = backend_fence?;
        Some(self.fences.write().insert(FenceEntry {
            backend_fence,
            submission,
        }))
    }

    fn dispatch_submit(
        &self,
        recorded: RecordedCommandBuffer,
        acquire_fence: bool,
    ) -> Option<(SubmissionId, Option<BackendFenceId>)> {
        let submission = self.next_submission();
        self.wire_cycling(&recorded.commands, submission);
        let resolver = DeviceResolver { device: self };
        match self.backend.submit(&recorded, submission, &resolver, acquire_fence) {
            Ok(fence) => {
                self.reclaim();
                Some((submission, fence))
            }
            Err(e) => {
                log::error!("refresh: submission failed: {}", e);
                None
            }
        }
    }

    pub fn wait(&self) {
        self.backend.wait_idle();
        self.reclaim();
    }

    pub fn wait_for_fences(&self, wait_all: bool, fences: &[FenceHandle]) {
        let backend_fences: Vec<BackendFenceId> = {
            let table = self.fences.read();
            fences
                .iter()
                .filter_map(|f| table.get(*f).map(|e| e.backend_fence))
                .collect()
        };
        self.backend.wait_for_fences(&backend_fences, wait_all);
        self.reclaim();
    }

    pub fn query_fence(&self, fence: FenceHandle) -> bool {
        match self.fences.read().get(fence) {
            Some(entry) => self.backend.query_fence(entry.backend_fence),
            None => false,
        }
    }

    /// `release_*` on a null/unknown handle is a no-op (§8 round-trip law).
    pub fn release_fence(&self, fence: FenceHandle) {
        if let Some(entry) = self.fences.write().remove(fence) {
            self.backend.release_fence(entry.backend_fence);
        }
    }

    // ---- queries --------------------------------------------------------------------------------

    pub fn is_texture_format_supported(&self, format: TextureFormat, ty: TextureType, usage: TextureUsageFlags) -> bool {
        self.backend.is_texture_format_supported(format, ty, usage)
    }

    pub fn get_best_sample_count(&self, format: TextureFormat, desired: SampleCount) -> SampleCount {
        self.backend.best_sample_count(format, desired)
    }

    pub fn texture_format_texel_block_size(&self, format: TextureFormat) -> u32 {
        format.texel_block_size()
    }

    // ---- swapchain ------------------------------------------------------------------------------

    pub fn supports_swapchain_composition(&self, window: WindowId, composition: SwapchainComposition) -> bool {
        composition.always_supported() || self.backend.supports_swapchain_composition(window, composition)
    }

    pub fn supports_present_mode(&self, window: WindowId, present_mode: PresentMode) -> bool {
        present_mode.always_supported() || self.backend.supports_present_mode(window, present_mode)
    }

    pub fn claim_window(&self, window: WindowId) -> bool {
        let ok = self.backend.claim_window(window, SwapchainComposition::Sdr, PresentMode::Vsync);
        if ok {
            self.claimed_windows.write().insert(window, ClaimedWindow::new(window));
        }
        ok
    }

    pub fn unclaim_window(&self, window: WindowId) {
        self.claimed_windows.write().remove(&window);
        self.backend.unclaim_window(window);
    }

    pub fn set_swapchain_parameters(
        &self,
        window: WindowId,
        composition: SwapchainComposition,
        present_mode: PresentMode,
    ) -> bool {
        if !self.supports_swapchain_composition(window, composition)
            || !self.supports_present_mode(window, present_mode)
        {
            return false;
        }
        let ok = self.backend.set_swapchain_parameters(window, composition, present_mode);
        if ok {
            if let Some(claimed) = self.claimed_windows.write().get_mut(&window) {
                claimed.composition = composition;
                claimed.present_mode = present_mode;
            }
        }
        ok
    }

    pub fn get_swapchain_texture_format(&self, window: WindowId) -> TextureFormat {
        self.backend.swapchain_texture_format(window)
    }

    /// Returns `None` on transient loss — too many frames in flight, minimized window (§4.7, §7
    /// `transient-swapchain`). Not an error; the caller should skip the frame.
    pub fn acquire_swapchain_texture(
        &self,
        cmd: &mut CommandBuffer,
        window: WindowId,
    ) -> Option<(TextureHandle, u32, u32)> {
        let (backing, width, height) = self.backend.acquire_swapchain_texture(window)?;
        let mut slices = FxHashMap::default();
        slices.insert((0, 0), Ring::new(backing));
        let handle = self.textures.write().insert(TextureEntry {
            create_info: TextureCreateInfoRef {
                ty: TextureType::Tex2D,
                format: self.get_swapchain_texture_format(window),
                usage: TextureUsageFlags::COLOR_TARGET,
                width,
                height,
                depth: 1,
                layer_count: 1,
                level_count: 1,
                sample_count: SampleCount::Sample1,
            },
            slices,
        });
        cmd.record_swapchain_acquire(window, Some((handle, width, height)));
        Some((handle, width, height))
    }

    pub fn present(&self, cmd: &mut CommandBuffer, window: WindowId, texture: TextureHandle) {
        cmd.record_present(window, texture);
    }

    /// Current slice backing, consulted by validation code elsewhere in the crate (e.g. render
    /// pass attachment usage checks) that needs to know what a handle currently resolves to.
    pub(crate) fn texture_usage(&self, texture: TextureHandle) -> Option<TextureUsageFlags> {
        self.textures.read().get(texture).map(|e| e.create_info.usage)
    }

    pub(crate) fn buffer_usage(&self, buffer: BufferHandle) -> Option<BufferUsageFlags> {
        self.buffers.read().get(buffer).map(|e| e.usage)
    }

    fn texture_format_of(&self, texture: TextureHandle) -> Option<TextureFormat> {
        self.textures.read().get(texture).map(|e| e.create_info.format)
    }

    // ---- pass-begin / copy validation wrappers (§4.3, §4.4, §4.6) -------------------------------
    //
    // `CommandBuffer` deliberately holds no reference back to `Device` (§5), so the usage
    // validators in `crate::pass` can only run here, where the resource tables actually live.

    pub fn begin_render_pass(
        &self,
        cmd: &mut CommandBuffer,
        color_attachments: Vec<ColorAttachmentInfo>,
        depth_stencil_attachment: Option<DepthStencilAttachmentInfo>,
    ) -> Option<()> {
        for attachment in &color_attachments {
            match self.texture_usage(attachment.texture_slice.texture) {
                Some(usage) if pass_render::validate_color_attachment_usage(usage) => {}
                _ => {
                    log::error!("refresh: color attachment texture lacks COLOR_TARGET usage");
                    return None;
                }
            }
        }
        if let Some(ds) = &depth_stencil_attachment {
            match self.texture_usage(ds.texture_slice.texture) {
                Some(usage) if pass_render::validate_depth_stencil_attachment_usage(usage) => {}
                _ => {
                    log::error!("refresh: depth-stencil attachment texture lacks DEPTH_STENCIL_TARGET usage");
                    return None;
                }
            }
        }
        cmd.begin_render_pass(color_attachments, depth_stencil_attachment)
    }

    pub fn begin_compute_pass(
        &self,
        cmd: &mut CommandBuffer,
        storage_texture_bindings: Vec<StorageTextureReadWriteBinding>,
        storage_buffer_bindings: Vec<StorageBufferReadWriteBinding>,
    ) -> Option<()> {
        for binding in &storage_texture_bindings {
            match self.texture_usage(binding.texture_slice.texture) {
                Some(usage) if pass_compute::validate_storage_texture_readwrite_usage(usage, false) => {}
                _ => {
                    log::error!("refresh: storage texture binding lacks COMPUTE_STORAGE_WRITE usage");
                    return None;
                }
            }
        }
        for binding in &storage_buffer_bindings {
            match self.buffer_usage(binding.buffer) {
                Some(usage) if pass_compute::validate_storage_buffer_readwrite_usage(usage, false) => {}
                _ => {
                    log::error!("refresh: storage buffer binding lacks COMPUTE_STORAGE_WRITE usage");
                    return None;
                }
            }
        }
        cmd.begin_compute_pass(storage_texture_bindings, storage_buffer_bindings)
    }

    pub fn upload_to_texture(
        &self,
        cmd: &mut CommandBuffer,
        src: TextureTransferInfo,
        dst: TextureRegion,
        cycle: bool,
    ) -> Option<()> {
        let format = self.texture_format_of(dst.slice.texture)?;
        if !pass_copy::validate_upload_alignment(&src, format) {
            log::error!("refresh: transfer offset is not aligned to the destination format's texel block size");
            return None;
        }
        cmd.upload_to_texture(src, dst, cycle)
    }

    pub fn download_from_texture(
        &self,
        cmd: &mut CommandBuffer,
        src: TextureRegion,
        dst: TextureTransferInfo,
    ) -> Option<()> {
        let format = self.texture_format_of(src.slice.texture)?;
        if !pass_copy::validate_upload_alignment(&dst, format) {
            log::error!("refresh: transfer offset is not aligned to the source format's texel block size");
            return None;
        }
        cmd.download_from_texture(src, dst)
    }
}

/// Resolves the frontend handles in a recording against `Device`'s own resource tables, for
/// [`crate::backend::Backend::submit`] (§6). Constructed fresh per submission, after cycling has
/// already been resolved, so it always reports each handle's post-rotation current backing.
struct DeviceResolver<'a> {
    device: &'a Device,
}

impl<'a> ResourceResolver for DeviceResolver<'a> {
    fn buffer_backing(&self, buffer: BufferHandle) -> Option<BackingId> {
        self.device.buffers.read().get(buffer).map(|e| e.ring.current())
    }

    fn texture_slice_backing(&self, slice: TextureSlice) -> Option<BackingId> {
        let textures = self.device.textures.read();
        let entry = textures.get(slice.texture)?;
        entry
            .slices
            .get(&(slice.layer, slice.mip_level))
            .or_else(|| entry.slices.get(&(0, 0)))
            .map(|r| r.current())
    }

    fn read_transfer_buffer(&self, buffer: TransferBufferHandle, offset: u32, len: u32) -> Option<Vec<u8>> {
        let buffers = self.device.transfer_buffers.read();
        let entry = buffers.get(buffer)?;
        let start = (offset as usize).min(entry.data.len());
        let end = (start + len as usize).min(entry.data.len());
        Some(entry.data[start..end].to_vec())
    }

    fn write_transfer_buffer(&self, buffer: TransferBufferHandle, offset: u32, data: &[u8]) -> Option<()> {
        let mut buffers = self.device.transfer_buffers.write();
        let entry = buffers.get_mut(buffer)?;
        let start = (offset as usize).min(entry.data.len());
        let n = data.len().min(entry.data.len().saturating_sub(start));
        entry.data[start..start + n].copy_from_slice(&data[..n]);
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestBackend;

    fn test_drivers() -> Vec<Driver> {
        vec![Driver {
            name: "test",
            flag: BackendFlags::VULKAN,
            prepare: || true,
            create_backend: |_debug| Some(Box::new(TestBackend::new())),
        }]
    }

    #[test]
    fn device_creation_selects_the_only_driver() {
        let device = Device::create(
            &test_drivers(),
            DeviceCreateOptions {
                preferred_backends: BackendFlags::empty(),
                debug_mode: false,
            },
        )
        .unwrap();
        assert_eq!(device.backend_name(), "test");
    }

    #[test]
    fn zero_size_buffer_creation_fails() {
        let device = Device::create(
            &test_drivers(),
            DeviceCreateOptions {
                preferred_backends: BackendFlags::empty(),
                debug_mode: false,
            },
        )
        .unwrap();
        let handle = device.create_buffer(BufferCreateInfo {
            usage: BufferUsageFlags::VERTEX,
            size: 0,
            name: None,
        });
        assert!(handle.is_none());
    }

    #[test]
    fn release_fence_on_unknown_handle_is_a_no_op() {
        let device = Device::create(
            &test_drivers(),
            DeviceCreateOptions {
                preferred_backends: BackendFlags::empty(),
                debug_mode: false,
            },
        )
        .unwrap();
        device.release_fence(FenceHandle::default());
    }
}
