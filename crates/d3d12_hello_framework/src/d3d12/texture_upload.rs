use tracing::debug;
use windows::core::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;

use super::barrier::transition_barrier;
use super::buffer::create_buffer;
use super::buffer::write_upload_resource;
use super::required;
use crate::hello_error::HelloResult;
use crate::texture::pitch_rows;
use crate::texture::TextureData;

/// A default-heap 2D texture and the staging buffer that feeds it.
///
/// As with [`super::buffer::DefaultBuffer`], `staging` must outlive the
/// recorded copy.
pub struct UploadedTexture {
    pub texture: ID3D12Resource,
    pub staging: ID3D12Resource,
    pub format: DXGI_FORMAT,
}

/// Records the upload of `data` as an RGBA8 texture and leaves it in the
/// pixel shader resource state.
pub fn upload_texture_2d(
    device: &ID3D12Device,
    command_list: &ID3D12GraphicsCommandList,
    data: &TextureData,
    name: &HSTRING,
) -> HelloResult<UploadedTexture> {
    let format = DXGI_FORMAT_R8G8B8A8_UNORM;
    let texture_desc = D3D12_RESOURCE_DESC {
        Dimension: D3D12_RESOURCE_DIMENSION_TEXTURE2D,
        Alignment: 0,
        Width: u64::from(data.width),
        Height: data.height,
        DepthOrArraySize: 1,
        MipLevels: 1,
        Format: format,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        Layout: D3D12_TEXTURE_LAYOUT_UNKNOWN,
        Flags: D3D12_RESOURCE_FLAG_NONE,
    };

    let mut texture: Option<ID3D12Resource> = None;
    unsafe {
        device.CreateCommittedResource(
            &D3D12_HEAP_PROPERTIES {
                Type: D3D12_HEAP_TYPE_DEFAULT,
                ..Default::default()
            },
            D3D12_HEAP_FLAG_NONE,
            &texture_desc,
            D3D12_RESOURCE_STATE_COPY_DEST,
            None,
            &mut texture,
        )?
    };
    let texture = required(texture, "CreateCommittedResource")?;
    unsafe { texture.SetName(name)? };

    let mut layout = D3D12_PLACED_SUBRESOURCE_FOOTPRINT::default();
    let mut num_rows = 0u32;
    let mut row_size = 0u64;
    let mut total_bytes = 0u64;
    unsafe {
        device.GetCopyableFootprints(
            &texture_desc,
            0,
            1,
            0,
            Some(&mut layout),
            Some(&mut num_rows),
            Some(&mut row_size),
            Some(&mut total_bytes),
        )
    };
    debug!(
        row_pitch = layout.Footprint.RowPitch,
        num_rows, row_size, total_bytes, "texture upload footprint"
    );

    let staging = create_buffer(
        device,
        D3D12_HEAP_TYPE_UPLOAD,
        total_bytes,
        D3D12_RESOURCE_STATE_GENERIC_READ,
    )?;
    let mut staged = vec![0u8; layout.Offset as usize];
    staged.extend(pitch_rows(
        &data.bytes,
        data.row_bytes(),
        layout.Footprint.RowPitch as usize,
        num_rows as usize,
    )?);
    write_upload_resource(&staging, &staged)?;

    // Copy locations borrow their resources without an AddRef.
    let dst = D3D12_TEXTURE_COPY_LOCATION {
        pResource: unsafe { std::mem::transmute_copy(&texture) },
        Type: D3D12_TEXTURE_COPY_TYPE_SUBRESOURCE_INDEX,
        Anonymous: D3D12_TEXTURE_COPY_LOCATION_0 { SubresourceIndex: 0 },
    };
    let src = D3D12_TEXTURE_COPY_LOCATION {
        pResource: unsafe { std::mem::transmute_copy(&staging) },
        Type: D3D12_TEXTURE_COPY_TYPE_PLACED_FOOTPRINT,
        Anonymous: D3D12_TEXTURE_COPY_LOCATION_0 { PlacedFootprint: layout },
    };
    unsafe {
        command_list.CopyTextureRegion(&dst, 0, 0, 0, &src, None);
        command_list.ResourceBarrier(&[transition_barrier(
            &texture,
            D3D12_RESOURCE_STATE_COPY_DEST,
            D3D12_RESOURCE_STATE_PIXEL_SHADER_RESOURCE,
        )]);
    }

    Ok(UploadedTexture {
        texture,
        staging,
        format,
    })
}

pub fn create_texture_srv(
    device: &ID3D12Device,
    texture: &UploadedTexture,
    destination: D3D12_CPU_DESCRIPTOR_HANDLE,
) {
    let srv_desc = D3D12_SHADER_RESOURCE_VIEW_DESC {
        Format: texture.format,
        ViewDimension: D3D12_SRV_DIMENSION_TEXTURE2D,
        Shader4ComponentMapping: D3D12_DEFAULT_SHADER_4_COMPONENT_MAPPING,
        Anonymous: D3D12_SHADER_RESOURCE_VIEW_DESC_0 {
            Texture2D: D3D12_TEX2D_SRV {
                MostDetailedMip: 0,
                MipLevels: 1,
                PlaneSlice: 0,
                ResourceMinLODClamp: 0.0,
            },
        },
    };
    unsafe { device.CreateShaderResourceView(&texture.texture, Some(&srv_desc), destination) };
}
