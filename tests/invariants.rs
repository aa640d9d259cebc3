//! §8 universal invariants, exercised against the in-process reference backend.

use refresh::backend::{BackendFlags, Driver};
use refresh::binding::{ColorAttachmentInfo, LoadOp, StoreOp};
use refresh::command_buffer::{DrawParams, PassState};
use refresh::device::{Device, DeviceCreateOptions};
use refresh::handle::TextureSlice;
use refresh::primitive::PrimitiveType;
use refresh::testing::TestBackend;
use refresh::texture::{Color, TextureCreateInfo};
use refresh::usage::TextureUsageFlags;

fn test_drivers() -> Vec<Driver> {
    vec![Driver {
        name: "test",
        flag: BackendFlags::VULKAN,
        prepare: || true,
        create_backend: |_debug| Some(Box::new(TestBackend::new())),
    }]
}

fn make_device() -> Device {
    Device::create(
        &test_drivers(),
        DeviceCreateOptions {
            preferred_backends: BackendFlags::empty(),
            debug_mode: false,
        },
    )
    .unwrap()
}

fn color_target(device: &Device) -> TextureSlice {
    let handle = device
        .create_texture(TextureCreateInfo {
            ty: refresh::format::TextureType::Tex2D,
            format: refresh::format::TextureFormat::R8G8B8A8,
            usage: TextureUsageFlags::COLOR_TARGET,
            width: 256,
            height: 256,
            depth: 1,
            layer_count: 1,
            level_count: 1,
            sample_count: refresh::format::SampleCount::Sample1,
            name: None,
        })
        .unwrap();
    TextureSlice::base(handle)
}

fn attachment(slice: TextureSlice) -> ColorAttachmentInfo {
    ColorAttachmentInfo {
        texture_slice: slice,
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
fn invariant_1_at_most_one_pass_in_progress() {
    let device = make_device();
    let slice = color_target(&device);
    let mut cmd = device.acquire_command_buffer();
    cmd.begin_render_pass(vec![attachment(slice)], None).unwrap();
    // Attempting a second pass type must fail and leave the first pass active.
    assert!(cmd.begin_compute_pass(vec![], vec![]).is_none());
    assert!(cmd.begin_copy_pass().is_none());
}

#[test]
fn invariant_3_no_recording_after_submit() {
    let device = make_device();
    let mut cmd = device.acquire_command_buffer();
    cmd.push_vertex_uniform_data(0, vec![1, 2, 3, 4]).unwrap();
    device.submit(cmd).unwrap();
    // The command buffer was consumed by `submit`; there is no way to record on it again — the
    // type system itself enforces invariant 3 here rather than a runtime flag check.
}

#[test]
fn invariant_6_draw_count_matches_primitive_formula() {
    let device = make_device();
    let slice = color_target(&device);
    let mut cmd = device.acquire_command_buffer();
    cmd.begin_render_pass(vec![attachment(slice)], None).unwrap();
    let pipeline = device
        .create_graphics_pipeline(sample_pipeline(&device))
        .unwrap();
    cmd.bind_graphics_pipeline(pipeline.handle).unwrap();
    // `draw` takes a primitive count and derives the vertex count itself (Refresh_DrawPrimitives'
    // shape), so there is no longer an invalid-vertex-count shape to reject here; any primitive
    // count is accepted once a pipeline is bound.
    assert_eq!(PrimitiveType::TriangleList.primitive_verts(1), 3);
    assert!(cmd
        .draw(
            PrimitiveType::TriangleList,
            DrawParams {
                primitive_count: 1,
                instance_count: 1,
                first_vertex: 0,
                first_instance: 0,
            },
        )
        .is_some());
    assert!(cmd
        .draw(
            PrimitiveType::TriangleList,
            DrawParams {
                primitive_count: 4,
                instance_count: 2,
                first_vertex: 0,
                first_instance: 0,
            },
        )
        .is_some());
}

fn sample_pipeline(device: &Device) -> refresh::pipeline::GraphicsPipelineCreateInfo {
    use refresh::pipeline::*;
    use refresh::shader::*;

    let vs = device
        .create_shader(ShaderCreateInfo {
            stage: ShaderStage::Vertex,
            format: ShaderFormat::SpirV,
            code: vec![0x03, 0x02, 0x23, 0x07],
            entry_point: "main".to_string(),
            sampler_count: 0,
            storage_texture_count: 0,
            storage_buffer_count: 0,
            uniform_buffer_count: 1,
        })
        .unwrap();
    let fs = device
        .create_shader(ShaderCreateInfo {
            stage: ShaderStage::Fragment,
            format: ShaderFormat::SpirV,
            code: vec![0x03, 0x02, 0x23, 0x07],
            entry_point: "main".to_string(),
            sampler_count: 0,
            storage_texture_count: 0,
            storage_buffer_count: 0,
            uniform_buffer_count: 0,
        })
        .unwrap();

    GraphicsPipelineCreateInfo {
        vertex_shader: vs,
        fragment_shader: fs,
        vertex_input_state: VertexInputState::default(),
        primitive_type: PrimitiveType::TriangleList,
        rasterizer_state: RasterizerState {
            fill_mode: FillMode::Fill,
            cull_mode: CullMode::None,
            front_face: FrontFace::CounterClockwise,
            depth_bias_constant_factor: 0.0,
            depth_bias_clamp: 0.0,
            depth_bias_slope_factor: 0.0,
            enable_depth_bias: false,
            enable_depth_clip: true,
        },
        multisample_state: MultisampleState {
            sample_count: refresh::format::SampleCount::Sample1,
            sample_mask: 0xFFFF_FFFF,
        },
        depth_stencil_state: DepthStencilState {
            enable_depth_test: false,
            enable_depth_write: false,
            compare_op: refresh::sampler::CompareOp::Always,
            enable_stencil_test: false,
            front_stencil: StencilOpState {
                fail_op: StencilOp::Keep,
                pass_op: StencilOp::Keep,
                depth_fail_op: StencilOp::Keep,
                compare_op: refresh::sampler::CompareOp::Always,
            },
            back_stencil: StencilOpState {
                fail_op: StencilOp::Keep,
                pass_op: StencilOp::Keep,
                depth_fail_op: StencilOp::Keep,
                compare_op: refresh::sampler::CompareOp::Always,
            },
            compare_mask: 0xFF,
            write_mask: 0xFF,
            reference: 0,
        },
        attachment_info: GraphicsPipelineAttachmentInfo {
            color_attachments: vec![ColorAttachmentDescription {
                format: refresh::format::TextureFormat::R8G8B8A8,
                blend_state: ColorAttachmentBlendState {
                    enable_blend: false,
                    src_color_blend_factor: BlendFactor::One,
                    dst_color_blend_factor: BlendFactor::Zero,
                    color_blend_op: BlendOp::Add,
                    src_alpha_blend_factor: BlendFactor::One,
                    dst_alpha_blend_factor: BlendFactor::Zero,
                    alpha_blend_op: BlendOp::Add,
                    color_write_mask: ColorComponentFlags::all(),
                },
            }],
            depth_stencil_format: None,
            has_depth_stencil_attachment: false,
        },
        blend_constants: [0.0, 0.0, 0.0, 0.0],
    }
}

#[test]
fn pass_state_starts_at_none() {
    let device = make_device();
    let cmd = device.acquire_command_buffer();
    assert!(!cmd.is_submitted());
    let _ = PassState::None;
}
