use std::path::Path;

use d3d12_hello_framework::assets::exe_dir;
use d3d12_hello_framework::assets::resolve_asset_path;
use d3d12_hello_framework::config::SampleConfig;
use d3d12_hello_framework::d3d12::buffer::create_upload_buffer;
use d3d12_hello_framework::d3d12::buffer::index_buffer_view;
use d3d12_hello_framework::d3d12::buffer::vertex_buffer_view;
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
use d3d12_hello_framework::geometry::square_mesh;
use d3d12_hello_framework::geometry::SubmeshGeometry;
use d3d12_hello_framework::hello_error::HelloResult;
use eyre::eyre;
use windows::core::*;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Direct3D12::*;

pub struct Resources {
    pub render: RenderContext,
    pub root_signature: ID3D12RootSignature,
    pub pso: ID3D12PipelineState,
    pub vertex_buffer: ID3D12Resource,
    pub index_buffer: ID3D12Resource,
    pub vbv: D3D12_VERTEX_BUFFER_VIEW,
    pub ibv: D3D12_INDEX_BUFFER_VIEW,
    pub square_draw: SubmeshGeometry,
}

pub fn create_resources(device: &DeviceContext, config: &SampleConfig, hwnd: HWND) -> HelloResult<Resources> {
    let render = RenderContext::new(
        device,
        hwnd,
        &RenderContextDesc {
            width: config.width,
            height: config.height,
            sync_mode: SyncMode::FrameBuffered,
            depth_buffer: false,
            sync_interval: config.sync_interval(),
        },
    )?;
    let d3d = render.device();

    let root_signature = create_root_signature(d3d, RootLayout::Empty)?;

    let shaders_hlsl = resolve_asset_path(
        "shaders.hlsl",
        exe_dir().as_deref(),
        &Path::new(env!("CARGO_MANIFEST_DIR")).join("src"),
    )?;
    let vertex_shader = compile_shader(&shaders_hlsl, s!("VSMain"), s!("vs_5_0"))?;
    let pixel_shader = compile_shader(&shaders_hlsl, s!("PSMain"), s!("ps_5_0"))?;
    let input_layout = color_vertex_layout();
    let pso = create_pipeline_state(
        d3d,
        &PipelineDesc {
            root_signature: &root_signature,
            vertex_shader: &vertex_shader,
            pixel_shader: &pixel_shader,
            input_layout: &input_layout,
            depth_enabled: false,
        },
    )?;

    // Small enough to read straight from the upload heap every frame.
    let mesh = square_mesh(config.aspect_ratio());
    let square_draw = *mesh
        .submesh("square")
        .ok_or_else(|| eyre!("{} has no square submesh", mesh.name))?;
    let vertex_buffer = create_upload_buffer(d3d, &mesh.vertex_bytes, &HSTRING::from("SquareVertexBuffer"))?;
    let index_buffer = create_upload_buffer(d3d, &mesh.index_bytes, &HSTRING::from("SquareIndexBuffer"))?;
    let vbv = vertex_buffer_view(&vertex_buffer, mesh.vertex_byte_stride, mesh.vertex_buffer_byte_size());
    let ibv = index_buffer_view(&index_buffer, mesh.index_format, mesh.index_buffer_byte_size());

    Ok(Resources {
        render,
        root_signature,
        pso,
        vertex_buffer,
        index_buffer,
        vbv,
        ibv,
        square_draw,
    })
}
