use std::path::Path;

use d3d12_hello_framework::assets::exe_dir;
use d3d12_hello_framework::assets::resolve_asset_path;
use d3d12_hello_framework::config::SampleConfig;
use d3d12_hello_framework::d3d12::buffer::create_default_buffer;
use d3d12_hello_framework::d3d12::buffer::index_buffer_view;
use d3d12_hello_framework::d3d12::buffer::vertex_buffer_view;
use d3d12_hello_framework::d3d12::descriptor_heap::DescriptorHeap;
use d3d12_hello_framework::d3d12::device::DeviceContext;
use d3d12_hello_framework::d3d12::pipeline::color_vertex_layout;
use d3d12_hello_framework::d3d12::pipeline::create_pipeline_state;
use d3d12_hello_framework::d3d12::pipeline::PipelineDesc;
use d3d12_hello_framework::d3d12::render_context::RenderContext;
use d3d12_hello_framework::d3d12::render_context::RenderContextDesc;
use d3d12_hello_framework::d3d12::render_context::SyncMode;
use d3d12_hello_framework::d3d12::root_signature::create_root_signature;
use d3d12_hello_framework::d3d12::root_signature::RootLayout;
use d3d12_hello_framework::d3d12::shader::compile_shader;
use d3d12_hello_framework::d3d12::upload_buffer::UploadBuffer;
use d3d12_hello_framework::geometry::box_mesh;
use d3d12_hello_framework::geometry::SubmeshGeometry;
use d3d12_hello_framework::hello_error::HelloResult;
use eyre::eyre;
use tracing::info;
use windows::core::*;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Direct3D12::*;

use crate::sample::ObjectConstants;

pub struct Resources {
    pub render: RenderContext,
    pub cbv_heap: DescriptorHeap,
    pub object_constants: UploadBuffer<ObjectConstants>,
    pub root_signature: ID3D12RootSignature,
    pub pso: ID3D12PipelineState,
    pub vertex_buffer: ID3D12Resource,
    pub index_buffer: ID3D12Resource,
    pub vbv: D3D12_VERTEX_BUFFER_VIEW,
    pub ibv: D3D12_INDEX_BUFFER_VIEW,
    pub box_draw: SubmeshGeometry,
}

pub fn create_resources(device: &DeviceContext, config: &SampleConfig, hwnd: HWND) -> HelloResult<Resources> {
    let mut render = RenderContext::new(
        device,
        hwnd,
        &RenderContextDesc {
            width: config.width,
            height: config.height,
            sync_mode: SyncMode::Flush,
            depth_buffer: true,
            sync_interval: config.sync_interval(),
        },
    )?;
    let d3d = render.device().clone();

    // One constant buffer, viewed through a shader visible CBV heap.
    let cbv_heap = DescriptorHeap::new(device, D3D12_DESCRIPTOR_HEAP_TYPE_CBV_SRV_UAV, 1, true)?;
    let object_constants = UploadBuffer::<ObjectConstants>::new(&d3d, 1, true)?;
    let cbv_desc = D3D12_CONSTANT_BUFFER_VIEW_DESC {
        BufferLocation: object_constants.gpu_address(0),
        SizeInBytes: object_constants.element_byte_size(),
    };
    unsafe { d3d.CreateConstantBufferView(Some(&cbv_desc), cbv_heap.cpu_handle(0)) };

    let root_signature = create_root_signature(&d3d, RootLayout::ConstantBufferTable)?;

    let shaders_hlsl = resolve_asset_path(
        "shaders.hlsl",
        exe_dir().as_deref(),
        &Path::new(env!("CARGO_MANIFEST_DIR")).join("src"),
    )?;
    let vertex_shader = compile_shader(&shaders_hlsl, s!("VSMain"), s!("vs_5_0"))?;
    let pixel_shader = compile_shader(&shaders_hlsl, s!("PSMain"), s!("ps_5_0"))?;
    let input_layout = color_vertex_layout();
    let pso = create_pipeline_state(
        &d3d,
        &PipelineDesc {
            root_signature: &root_signature,
            vertex_shader: &vertex_shader,
            pixel_shader: &pixel_shader,
            input_layout: &input_layout,
            depth_enabled: true,
        },
    )?;

    // Geometry goes to the default heap through staging buffers that must
    // live until the setup commands have executed.
    let mesh = box_mesh();
    let box_draw = *mesh
        .submesh("box")
        .ok_or_else(|| eyre!("{} has no box submesh", mesh.name))?;
    let command_list = render.begin_setup()?.clone();
    let vertices = create_default_buffer(&d3d, &command_list, &mesh.vertex_bytes, &HSTRING::from("BoxVertexBuffer"))?;
    let indices = create_default_buffer(&d3d, &command_list, &mesh.index_bytes, &HSTRING::from("BoxIndexBuffer"))?;
    render.finish_setup()?;

    let vbv = vertex_buffer_view(&vertices.buffer, mesh.vertex_byte_stride, mesh.vertex_buffer_byte_size());
    let ibv = index_buffer_view(&indices.buffer, mesh.index_format, mesh.index_buffer_byte_size());
    info!(
        vertices = mesh.vertex_count(),
        indices = mesh.index_count(),
        "box geometry uploaded"
    );

    Ok(Resources {
        render,
        cbv_heap,
        object_constants,
        root_signature,
        pso,
        vertex_buffer: vertices.buffer,
        index_buffer: indices.buffer,
        vbv,
        ibv,
        box_draw,
    })
}
