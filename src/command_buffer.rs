//! The command-buffer state machine (§3 `CommandBufferCommonHeader`, §4.2).
//!
//! Every command buffer carries this same header regardless of backend, so the frontend can
//! enforce §3's six invariants without ever looking at backend-private state (§9 "Pass state
//! embedded in command buffer" — encoded here as a sum type rather than three separate flags,
//! since a command buffer is never in more than one pass at a time anyway).

use smallvec::SmallVec;

use crate::binding::{
    ColorAttachmentInfo, DepthStencilAttachmentInfo, IndexFormat, ScissorRect,
    StorageBufferReadWriteBinding, StorageTextureReadWriteBinding, TextureSamplerBinding,
    VertexBufferBinding, Viewport,
};
use crate::buffer::{BufferRegion, IndexedIndirectDrawCommand, IndirectDrawCommand, TransferBufferRegion};
use crate::handle::{
    BufferHandle, ComputePipelineHandle, FenceHandle, GraphicsPipelineHandle, TextureHandle,
    TextureSlice, WindowId,
};
use crate::primitive::PrimitiveType;
use crate::shader::ShaderStage;
use crate::texture::{TextureRegion, TextureTransferInfo};
use crate::binding::BlitFilter;

/// Which sub-state a command buffer's recording is currently in. At most one pass is ever active
/// (§3 invariant 1); `None` is the state outside any pass, where out-of-band operations (`blit`,
/// debug labels, uniform pushes) are legal (§9).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PassState {
    None,
    Render,
    Compute,
    Copy,
}

/// A state-machine violation of the kind §7 classifies as `state-violation`: logged, and the
/// triggering call no-ops rather than touching the backend.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StateViolation {
    PassInProgress,
    NotInRenderPass,
    NotInComputePass,
    NotInCopyPass,
    NoPipelineBound,
    AlreadySubmitted,
    NoAttachments,
}

impl std::fmt::Display for StateViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            StateViolation::PassInProgress => "a pass is already in progress on this command buffer",
            StateViolation::NotInRenderPass => "not in a render pass",
            StateViolation::NotInComputePass => "not in a compute pass",
            StateViolation::NotInCopyPass => "not in a copy pass",
            StateViolation::NoPipelineBound => "no pipeline bound",
            StateViolation::AlreadySubmitted => "command buffer already submitted",
            StateViolation::NoAttachments => "render pass has no attachments",
        };
        f.write_str(msg)
    }
}

/// Every stage exposes this many uniform push slots (§4.2); a slot outside this range is an
/// invalid-argument boundary case (§7) rather than a panic.
pub const UNIFORM_SLOT_COUNT: u32 = 4;

/// Draws are parameterized by complete primitive count, matching `Refresh_DrawPrimitives`'s
/// `(vertexStart, primitiveCount)` shape — not raw vertex count, which would let a caller request
/// a partial/degenerate primitive.
#[derive(Copy, Clone, Debug)]
pub struct DrawParams {
    pub primitive_count: u32,
    pub instance_count: u32,
    pub first_vertex: u32,
    pub first_instance: u32,
}

#[derive(Copy, Clone, Debug)]
pub struct DrawIndexedParams {
    pub index_count: u32,
    pub instance_count: u32,
    pub first_index: u32,
    pub vertex_offset: i32,
    pub first_instance: u32,
}

/// One fully-resolved operation, ready to hand to [`crate::backend::Backend::submit`]. Recording
/// order is preserved exactly (§8 invariant 8) — this is a flat `Vec`, never reordered or sorted.
#[derive(Clone, Debug)]
pub enum RecordedCommand {
    BeginRenderPass {
        color_attachments: Vec<ColorAttachmentInfo>,
        depth_stencil_attachment: Option<DepthStencilAttachmentInfo>,
    },
    SetViewport(Viewport),
    SetScissor(ScissorRect),
    BindGraphicsPipeline(GraphicsPipelineHandle),
    BindVertexBuffers {
        first_binding: u32,
        bindings: SmallVec<[VertexBufferBinding; 4]>,
    },
    BindIndexBuffer {
        buffer: BufferHandle,
        offset: u32,
        format: IndexFormat,
    },
    BindVertexSamplers {
        first_slot: u32,
        bindings: SmallVec<[TextureSamplerBinding; 4]>,
    },
    BindFragmentSamplers {
        first_slot: u32,
        bindings: SmallVec<[TextureSamplerBinding; 4]>,
    },
    PushVertexUniformData {
        slot: u32,
        data: Vec<u8>,
    },
    PushFragmentUniformData {
        slot: u32,
        data: Vec<u8>,
    },
    PushComputeUniformData {
        slot: u32,
        data: Vec<u8>,
    },
    Draw {
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    },
    DrawIndexed(DrawIndexedParams),
    DrawIndirect {
        buffer: BufferHandle,
        offset: u32,
        draws: Vec<IndirectDrawCommand>,
    },
    DrawIndexedIndirect {
        buffer: BufferHandle,
        offset: u32,
        draws: Vec<IndexedIndirectDrawCommand>,
    },
    EndRenderPass,

    BeginComputePass {
        storage_texture_bindings: Vec<StorageTextureReadWriteBinding>,
        storage_buffer_bindings: Vec<StorageBufferReadWriteBinding>,
    },
    BindComputePipeline(ComputePipelineHandle),
    BindComputeStorageTextures {
        first_slot: u32,
        bindings: SmallVec<[TextureSlice; 4]>,
    },
    BindComputeStorageBuffers {
        first_slot: u32,
        bindings: SmallVec<[BufferHandle; 4]>,
    },
    Dispatch {
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    },
    EndComputePass,

    BeginCopyPass,
    UploadToBuffer {
        src: TransferBufferRegion,
        dst: BufferRegion,
        cycle: bool,
    },
    UploadToTexture {
        src: TextureTransferInfo,
        dst: TextureRegion,
        cycle: bool,
    },
    CopyBufferToBuffer {
        src: BufferRegion,
        dst: BufferRegion,
    },
    CopyTextureToTexture {
        src: TextureRegion,
        dst: TextureRegion,
    },
    DownloadFromBuffer {
        src: BufferRegion,
        dst: TransferBufferRegion,
    },
    DownloadFromTexture {
        src: TextureRegion,
        dst: TextureTransferInfo,
    },
    GenerateMipmaps(TextureHandle),
    EndCopyPass,

    Blit {
        src: crate::binding::BlitRegion,
        dst: crate::binding::BlitRegion,
        filter: BlitFilter,
        cycle: bool,
    },

    InsertDebugLabel(String),
    PushDebugGroup(String),
    PopDebugGroup,

    AcquireSwapchainTexture {
        window: WindowId,
        acquired: Option<(TextureHandle, u32, u32)>,
    },
    Present {
        window: WindowId,
        texture: TextureHandle,
    },
}

/// The finalized, backend-ready recording for one command buffer: everything the backend needs
/// to translate into native calls, in recording order.
#[derive(Clone, Debug, Default)]
pub struct RecordedCommandBuffer {
    pub commands: Vec<RecordedCommand>,
}

/// A command buffer being recorded (§3). Thread-affine by construction: it holds no `Send`/`Sync`
/// bound and is expected to live entirely on the thread that acquired it (§5).
pub struct CommandBuffer {
    pass: PassState,
    graphics_pipeline_bound: bool,
    compute_pipeline_bound: bool,
    submitted: bool,
    recorded: RecordedCommandBuffer,
}

impl CommandBuffer {
    pub(crate) fn new() -> CommandBuffer {
        CommandBuffer {
            pass: PassState::None,
            graphics_pipeline_bound: false,
            compute_pipeline_bound: false,
            submitted: false,
            recorded: RecordedCommandBuffer::default(),
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    fn reject(&self, violation: StateViolation) -> Option<()> {
        log::error!("refresh: {}", violation);
        None
    }

    fn guard_recording(&self) -> Option<()> {
        if self.submitted {
            return self.reject(StateViolation::AlreadySubmitted);
        }
        Some(())
    }

    fn push(&mut self, cmd: RecordedCommand) {
        self.recorded.commands.push(cmd);
    }

    // ---- render pass -------------------------------------------------------------------------

    pub fn begin_render_pass(
        &mut self,
        color_attachments: Vec<ColorAttachmentInfo>,
        depth_stencil_attachment: Option<DepthStencilAttachmentInfo>,
    ) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::None {
            return self.reject(StateViolation::PassInProgress);
        }
        if color_attachments.is_empty() && depth_stencil_attachment.is_none() {
            return self.reject(StateViolation::NoAttachments);
        }
        self.pass = PassState::Render;
        self.push(RecordedCommand::BeginRenderPass {
            color_attachments,
            depth_stencil_attachment,
        });
        Some(())
    }

    pub fn bind_graphics_pipeline(&mut self, pipeline: GraphicsPipelineHandle) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Render {
            return self.reject(StateViolation::NotInRenderPass);
        }
        self.graphics_pipeline_bound = true;
        self.push(RecordedCommand::BindGraphicsPipeline(pipeline));
        Some(())
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Render {
            return self.reject(StateViolation::NotInRenderPass);
        }
        self.push(RecordedCommand::SetViewport(viewport));
        Some(())
    }

    pub fn set_scissor(&mut self, scissor: ScissorRect) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Render {
            return self.reject(StateViolation::NotInRenderPass);
        }
        self.push(RecordedCommand::SetScissor(scissor));
        Some(())
    }

    pub fn bind_vertex_buffers(
        &mut self,
        first_binding: u32,
        bindings: SmallVec<[VertexBufferBinding; 4]>,
    ) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Render {
            return self.reject(StateViolation::NotInRenderPass);
        }
        self.push(RecordedCommand::BindVertexBuffers {
            first_binding,
            bindings,
        });
        Some(())
    }

    pub fn bind_index_buffer(
        &mut self,
        buffer: BufferHandle,
        offset: u32,
        format: IndexFormat,
    ) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Render {
            return self.reject(StateViolation::NotInRenderPass);
        }
        self.push(RecordedCommand::BindIndexBuffer {
            buffer,
            offset,
            format,
        });
        Some(())
    }

    pub fn bind_samplers(
        &mut self,
        stage: ShaderStage,
        first_slot: u32,
        bindings: SmallVec<[TextureSamplerBinding; 4]>,
    ) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Render {
            return self.reject(StateViolation::NotInRenderPass);
        }
        self.push(match stage {
            ShaderStage::Vertex => RecordedCommand::BindVertexSamplers {
                first_slot,
                bindings,
            },
            ShaderStage::Fragment => RecordedCommand::BindFragmentSamplers {
                first_slot,
                bindings,
            },
            ShaderStage::Compute => unreachable!("compute samplers go through bind_compute_*"),
        });
        Some(())
    }

    fn guard_uniform_slot(&self, slot: u32) -> Option<()> {
        if slot >= UNIFORM_SLOT_COUNT {
            log::error!(
                "refresh: uniform slot {} is out of range (stage exposes {} slots)",
                slot,
                UNIFORM_SLOT_COUNT
            );
            return None;
        }
        Some(())
    }

    /// Each stage exposes [`UNIFORM_SLOT_COUNT`] uniform slots (§4.2); an out-of-range slot is
    /// logged and no-ops rather than recording (§7 `invalid-argument`). Valid at any point during
    /// recording, including outside a pass.
    pub fn push_vertex_uniform_data(&mut self, slot: u32, data: Vec<u8>) -> Option<()> {
        self.guard_recording()?;
        self.guard_uniform_slot(slot)?;
        self.push(RecordedCommand::PushVertexUniformData { slot, data });
        Some(())
    }

    pub fn push_fragment_uniform_data(&mut self, slot: u32, data: Vec<u8>) -> Option<()> {
        self.guard_recording()?;
        self.guard_uniform_slot(slot)?;
        self.push(RecordedCommand::PushFragmentUniformData { slot, data });
        Some(())
    }

    pub fn push_compute_uniform_data(&mut self, slot: u32, data: Vec<u8>) -> Option<()> {
        self.guard_recording()?;
        self.guard_uniform_slot(slot)?;
        self.push(RecordedCommand::PushComputeUniformData { slot, data });
        Some(())
    }

    /// Issues `primitive.primitive_verts(params.primitive_count)` vertices (§8 invariant 6).
    pub fn draw(&mut self, primitive: PrimitiveType, params: DrawParams) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Render || !self.graphics_pipeline_bound {
            return self.reject(StateViolation::NoPipelineBound);
        }
        let vertex_count = primitive.primitive_verts(params.primitive_count);
        self.push(RecordedCommand::Draw {
            vertex_count,
            instance_count: params.instance_count,
            first_vertex: params.first_vertex,
            first_instance: params.first_instance,
        });
        Some(())
    }

    pub fn draw_indexed(&mut self, params: DrawIndexedParams) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Render || !self.graphics_pipeline_bound {
            return self.reject(StateViolation::NoPipelineBound);
        }
        self.push(RecordedCommand::DrawIndexed(params));
        Some(())
    }

    pub fn end_render_pass(&mut self) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Render {
            return self.reject(StateViolation::NotInRenderPass);
        }
        self.pass = PassState::None;
        self.graphics_pipeline_bound = false;
        self.push(RecordedCommand::EndRenderPass);
        Some(())
    }

    // ---- compute pass -------------------------------------------------------------------------

    pub fn begin_compute_pass(
        &mut self,
        storage_texture_bindings: Vec<StorageTextureReadWriteBinding>,
        storage_buffer_bindings: Vec<StorageBufferReadWriteBinding>,
    ) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::None {
            return self.reject(StateViolation::PassInProgress);
        }
        self.pass = PassState::Compute;
        self.push(RecordedCommand::BeginComputePass {
            storage_texture_bindings,
            storage_buffer_bindings,
        });
        Some(())
    }

    pub fn bind_compute_pipeline(&mut self, pipeline: ComputePipelineHandle) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Compute {
            return self.reject(StateViolation::NotInComputePass);
        }
        self.compute_pipeline_bound = true;
        self.push(RecordedCommand::BindComputePipeline(pipeline));
        Some(())
    }

    pub fn bind_compute_storage_textures(
        &mut self,
        first_slot: u32,
        bindings: SmallVec<[TextureSlice; 4]>,
    ) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Compute {
            return self.reject(StateViolation::NotInComputePass);
        }
        self.push(RecordedCommand::BindComputeStorageTextures {
            first_slot,
            bindings,
        });
        Some(())
    }

    pub fn bind_compute_storage_buffers(
        &mut self,
        first_slot: u32,
        bindings: SmallVec<[BufferHandle; 4]>,
    ) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Compute {
            return self.reject(StateViolation::NotInComputePass);
        }
        self.push(RecordedCommand::BindComputeStorageBuffers {
            first_slot,
            bindings,
        });
        Some(())
    }

    pub fn dispatch(&mut self, x: u32, y: u32, z: u32) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Compute || !self.compute_pipeline_bound {
            return self.reject(StateViolation::NoPipelineBound);
        }
        self.push(RecordedCommand::Dispatch {
            group_count_x: x,
            group_count_y: y,
            group_count_z: z,
        });
        Some(())
    }

    pub fn end_compute_pass(&mut self) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Compute {
            return self.reject(StateViolation::NotInComputePass);
        }
        self.pass = PassState::None;
        self.compute_pipeline_bound = false;
        self.push(RecordedCommand::EndComputePass);
        Some(())
    }

    // ---- copy pass ----------------------------------------------------------------------------

    pub fn begin_copy_pass(&mut self) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::None {
            return self.reject(StateViolation::PassInProgress);
        }
        self.pass = PassState::Copy;
        self.push(RecordedCommand::BeginCopyPass);
        Some(())
    }

    pub fn upload_to_buffer(
        &mut self,
        src: TransferBufferRegion,
        dst: BufferRegion,
        cycle: bool,
    ) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Copy {
            return self.reject(StateViolation::NotInCopyPass);
        }
        self.push(RecordedCommand::UploadToBuffer { src, dst, cycle });
        Some(())
    }

    pub fn upload_to_texture(
        &mut self,
        src: TextureTransferInfo,
        dst: TextureRegion,
        cycle: bool,
    ) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Copy {
            return self.reject(StateViolation::NotInCopyPass);
        }
        self.push(RecordedCommand::UploadToTexture { src, dst, cycle });
        Some(())
    }

    pub fn copy_buffer_to_buffer(&mut self, src: BufferRegion, dst: BufferRegion) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Copy {
            return self.reject(StateViolation::NotInCopyPass);
        }
        self.push(RecordedCommand::CopyBufferToBuffer { src, dst });
        Some(())
    }

    pub fn copy_texture_to_texture(
        &mut self,
        src: TextureRegion,
        dst: TextureRegion,
    ) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Copy {
            return self.reject(StateViolation::NotInCopyPass);
        }
        self.push(RecordedCommand::CopyTextureToTexture { src, dst });
        Some(())
    }

    pub fn download_from_buffer(
        &mut self,
        src: BufferRegion,
        dst: TransferBufferRegion,
    ) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Copy {
            return self.reject(StateViolation::NotInCopyPass);
        }
        self.push(RecordedCommand::DownloadFromBuffer { src, dst });
        Some(())
    }

    pub fn download_from_texture(
        &mut self,
        src: TextureRegion,
        dst: TextureTransferInfo,
    ) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Copy {
            return self.reject(StateViolation::NotInCopyPass);
        }
        self.push(RecordedCommand::DownloadFromTexture { src, dst });
        Some(())
    }

    pub fn generate_mipmaps(&mut self, texture: TextureHandle) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Copy {
            return self.reject(StateViolation::NotInCopyPass);
        }
        self.push(RecordedCommand::GenerateMipmaps(texture));
        Some(())
    }

    pub fn end_copy_pass(&mut self) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::Copy {
            return self.reject(StateViolation::NotInCopyPass);
        }
        self.pass = PassState::None;
        self.push(RecordedCommand::EndCopyPass);
        Some(())
    }

    // ---- out-of-band: legal in any pass state, including `None` (§9) ------------------------

    pub fn blit(
        &mut self,
        src: crate::binding::BlitRegion,
        dst: crate::binding::BlitRegion,
        filter: BlitFilter,
        cycle: bool,
    ) -> Option<()> {
        self.guard_recording()?;
        if self.pass != PassState::None {
            return self.reject(StateViolation::PassInProgress);
        }
        self.push(RecordedCommand::Blit {
            src,
            dst,
            filter,
            cycle,
        });
        Some(())
    }

    pub fn insert_debug_label(&mut self, label: impl Into<String>) -> Option<()> {
        self.guard_recording()?;
        self.push(RecordedCommand::InsertDebugLabel(label.into()));
        Some(())
    }

    pub fn push_debug_group(&mut self, name: impl Into<String>) -> Option<()> {
        self.guard_recording()?;
        self.push(RecordedCommand::PushDebugGroup(name.into()));
        Some(())
    }

    pub fn pop_debug_group(&mut self) -> Option<()> {
        self.guard_recording()?;
        self.push(RecordedCommand::PopDebugGroup);
        Some(())
    }

    pub(crate) fn record_present(&mut self, window: WindowId, texture: TextureHandle) {
        self.push(RecordedCommand::Present { window, texture });
    }

    pub(crate) fn record_swapchain_acquire(
        &mut self,
        window: WindowId,
        acquired: Option<(TextureHandle, u32, u32)>,
    ) {
        self.push(RecordedCommand::AcquireSwapchainTexture { window, acquired });
    }

    /// Validates `submit`'s precondition (pass=`none`) and finalizes the recording. Called by
    /// [`crate::device::Device::submit`]; marks `submitted` so any further recording call on this
    /// (now-owned-elsewhere) command buffer is rejected (§3 invariant 4, §8 invariant 3).
    pub(crate) fn finish_for_submit(mut self) -> Option<RecordedCommandBuffer> {
        if self.pass != PassState::None {
            self.reject(StateViolation::PassInProgress);
            return None;
        }
        self.submitted = true;
        Some(self.recorded)
    }
}

/// Returned by `submit_and_acquire_fence`; carries no methods of its own beyond the handle — the
/// caller queries/waits/releases it through [`crate::device::Device`] (§3 invariant 5).
#[derive(Copy, Clone, Debug)]
pub struct SubmitResult {
    pub fence: Option<FenceHandle>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{LoadOp, StoreOp};
    use crate::handle::TextureHandle;
    use crate::texture::Color;
    use slotmap::SlotMap;

    fn dummy_texture_slice() -> TextureSlice {
        let mut sm: SlotMap<TextureHandle, ()> = SlotMap::with_key();
        let h = sm.insert(());
        TextureSlice::base(h)
    }

    fn attachment() -> ColorAttachmentInfo {
        ColorAttachmentInfo {
            texture_slice: dummy_texture_slice(),
            clear_color: Color {
                r: 0.1,
                g: 0.2,
                b: 0.3,
                a: 1.0,
            },
            load_op: LoadOp::Clear,
            store_op: StoreOp::Store,
            cycle: false,
        }
    }

    #[test]
    fn draw_before_pipeline_bound_is_rejected() {
        let mut cb = CommandBuffer::new();
        cb.begin_render_pass(vec![attachment()], None).unwrap();
        let result = cb.draw(
            PrimitiveType::TriangleList,
            DrawParams {
                primitive_count: 1,
                instance_count: 1,
                first_vertex: 0,
                first_instance: 0,
            },
        );
        assert!(result.is_none());
    }

    #[test]
    fn begin_render_pass_with_no_attachments_fails() {
        let mut cb = CommandBuffer::new();
        assert!(cb.begin_render_pass(vec![], None).is_none());
    }

    #[test]
    fn compute_pass_while_render_pass_active_is_rejected() {
        let mut cb = CommandBuffer::new();
        cb.begin_render_pass(vec![attachment()], None).unwrap();
        assert!(cb.begin_compute_pass(vec![], vec![]).is_none());
        assert_eq!(cb.pass, PassState::Render);
    }

    #[test]
    fn recording_after_submit_is_rejected() {
        let mut cb = CommandBuffer::new();
        cb.push_vertex_uniform_data(0, vec![1, 2, 3]).unwrap();
        let recorded = cb.finish_for_submit().unwrap();
        assert_eq!(recorded.commands.len(), 1);
    }

    #[test]
    fn full_triangle_recording_sequence() {
        let mut cb = CommandBuffer::new();
        cb.begin_render_pass(vec![attachment()], None).unwrap();
        cb.bind_graphics_pipeline(GraphicsPipelineHandle::default())
            .unwrap();
        cb.draw(
            PrimitiveType::TriangleList,
            DrawParams {
                primitive_count: 1,
                instance_count: 1,
                first_vertex: 0,
                first_instance: 0,
            },
        )
        .unwrap();
        cb.end_render_pass().unwrap();
        let recorded = cb.finish_for_submit().unwrap();
        assert_eq!(recorded.commands.len(), 4);
        match &recorded.commands[2] {
            RecordedCommand::Draw { vertex_count, .. } => assert_eq!(*vertex_count, 3),
            other => panic!("expected Draw, got {:?}", other),
        }
    }

    #[test]
    fn uniform_push_rejects_out_of_range_slot() {
        let mut cb = CommandBuffer::new();
        assert!(cb.push_vertex_uniform_data(UNIFORM_SLOT_COUNT, vec![1]).is_none());
        assert!(cb.push_vertex_uniform_data(UNIFORM_SLOT_COUNT - 1, vec![1]).is_some());
    }
}
