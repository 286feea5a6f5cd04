use std::path::Path;

use d3d12_hello_framework::assets::exe_dir;
use d3d12_hello_framework::assets::resolve_asset_path;
use d3d12_hello_framework::config::SampleConfig;
use d3d12_hello_framework::d3d12::buffer::create_upload_buffer;
use d3d12_hello_framework::d3d12::buffer::vertex_buffer_view;
use d3d12_hello_framework::d3d12::descriptor_heap::DescriptorHeap;
use d3d12_hello_framework::d3d12::device::DeviceContext;
use d3d12_hello_framework::d3d12::pipeline::create_pipeline_state;
use d3d12_hello_framework::d3d12::pipeline::textured_vertex_layout;
use d3d12_hello_framework::d3d12::pipeline::PipelineDesc;
use d3d12_hello_framework::d3d12::render_context::RenderContext;
use d3d12_hello_framework::d3d12::render_context::RenderContextDesc;
use d3d12_hello_framework::d3d12::render_context::SyncMode;
use d3d12_hello_framework::d3d12::root_signature::create_root_signature;
use d3d12_hello_framework::d3d12::root_signature::RootLayout;
use d3d12_hello_framework::d3d12::shader::compile_shader;
use d3d12_hello_framework::d3d12::texture_upload::create_texture_srv;
use d3d12_hello_framework::d3d12::texture_upload::upload_texture_2d;
use d3d12_hello_framework::geometry::textured_triangle;
use d3d12_hello_framework::geometry::TexturedVertex;
use d3d12_hello_framework::hello_error::HelloResult;
use d3d12_hello_framework::texture::checkerboard;
use d3d12_hello_framework::texture::TEXTURE_HEIGHT;
use d3d12_hello_framework::texture::TEXTURE_PIXEL_SIZE;
use d3d12_hello_framework::texture::TEXTURE_WIDTH;
use tracing::info;
use windows::core::*;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Direct3D12::*;

pub struct Resources {
    pub render: RenderContext,
    pub srv_heap: DescriptorHeap,
    pub root_signature: ID3D12RootSignature,
    pub pso: ID3D12PipelineState,
    pub vertex_buffer: ID3D12Resource,
    pub vbv: D3D12_VERTEX_BUFFER_VIEW,
    pub texture: ID3D12Resource,
}

pub fn create_resources(device: &DeviceContext, config: &SampleConfig, hwnd: HWND) -> HelloResult<Resources> {
    let mut render = RenderContext::new(
        device,
        hwnd,
        &RenderContextDesc {
            width: config.width,
            height: config.height,
            sync_mode: SyncMode::Flush,
            depth_buffer: false,
            sync_interval: config.sync_interval(),
        },
    )?;
    let d3d = render.device().clone();

    let srv_heap = DescriptorHeap::new(device, D3D12_DESCRIPTOR_HEAP_TYPE_CBV_SRV_UAV, 1, true)?;
    let root_signature = create_root_signature(&d3d, RootLayout::TextureTable)?;

    let shaders_hlsl = resolve_asset_path(
        "shaders.hlsl",
        exe_dir().as_deref(),
        &Path::new(env!("CARGO_MANIFEST_DIR")).join("src"),
    )?;
    let vertex_shader = compile_shader(&shaders_hlsl, s!("VSMain"), s!("vs_5_0"))?;
    let pixel_shader = compile_shader(&shaders_hlsl, s!("PSMain"), s!("ps_5_0"))?;
    let input_layout = textured_vertex_layout();
    let pso = create_pipeline_state(
        &d3d,
        &PipelineDesc {
            root_signature: &root_signature,
            vertex_shader: &vertex_shader,
            pixel_shader: &pixel_shader,
            input_layout: &input_layout,
            depth_enabled: false,
        },
    )?;

    let vertices = textured_triangle(config.aspect_ratio());
    let vertex_bytes: &[u8] = bytemuck::cast_slice(&vertices);
    let vertex_buffer = create_upload_buffer(&d3d, vertex_bytes, &HSTRING::from("TriangleVertexBuffer"))?;
    let vbv = vertex_buffer_view(
        &vertex_buffer,
        std::mem::size_of::<TexturedVertex>() as u32,
        vertex_bytes.len() as u32,
    );

    // The staging buffer has to outlive the copy, so wait for the GPU
    // before it goes out of scope.
    let texture_data = checkerboard(TEXTURE_WIDTH, TEXTURE_HEIGHT, TEXTURE_PIXEL_SIZE)?;
    let command_list = render.begin_setup()?.clone();
    let texture = upload_texture_2d(&d3d, &command_list, &texture_data, &HSTRING::from("CheckerboardTexture"))?;
    render.finish_setup()?;
    create_texture_srv(&d3d, &texture, srv_heap.cpu_handle(0));
    info!(
        width = texture_data.width,
        height = texture_data.height,
        "checkerboard texture uploaded"
    );

    Ok(Resources {
        render,
        srv_heap,
        root_signature,
        pso,
        vertex_buffer,
        vbv,
        texture: texture.texture,
    })
}
