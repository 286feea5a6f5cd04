use windows::core::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;

use super::barrier::transition_barrier;
use super::required;
use crate::alignment::check_write_size;
use crate::geometry::IndexFormat;
use crate::hello_error::HelloResult;

pub fn heap_properties(heap_type: D3D12_HEAP_TYPE) -> D3D12_HEAP_PROPERTIES {
    D3D12_HEAP_PROPERTIES {
        Type: heap_type,
        ..Default::default()
    }
}

pub fn buffer_desc(byte_size: u64) -> D3D12_RESOURCE_DESC {
    D3D12_RESOURCE_DESC {
        Dimension: D3D12_RESOURCE_DIMENSION_BUFFER,
        Alignment: 0,
        Width: byte_size,
        Height: 1,
        DepthOrArraySize: 1,
        MipLevels: 1,
        Format: DXGI_FORMAT_UNKNOWN,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        Layout: D3D12_TEXTURE_LAYOUT_ROW_MAJOR,
        Flags: D3D12_RESOURCE_FLAG_NONE,
    }
}

pub fn create_buffer(
    device: &ID3D12Device,
    heap_type: D3D12_HEAP_TYPE,
    byte_size: u64,
    initial_state: D3D12_RESOURCE_STATES,
) -> HelloResult<ID3D12Resource> {
    let mut buffer: Option<ID3D12Resource> = None;
    unsafe {
        device.CreateCommittedResource(
            &heap_properties(heap_type),
            D3D12_HEAP_FLAG_NONE,
            &buffer_desc(byte_size),
            initial_state,
            None,
            &mut buffer,
        )?
    };
    required(buffer, "CreateCommittedResource")
}

/// Copies `bytes` into the start of an upload-heap resource. Fails if they do
/// not fit.
pub fn write_upload_resource(resource: &ID3D12Resource, bytes: &[u8]) -> HelloResult<()> {
    let capacity = unsafe { resource.GetDesc() }.Width;
    check_write_size(bytes.len(), capacity)?;
    unsafe {
        let mut data = std::ptr::null_mut();
        // We do not intend to read from this resource on the CPU.
        let read_range = D3D12_RANGE { Begin: 0, End: 0 };
        resource.Map(0, Some(&read_range), Some(&mut data))?;
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), data as *mut u8, bytes.len());
        resource.Unmap(0, None);
    }
    Ok(())
}

/// A buffer in the upload heap filled with `bytes`.
///
/// The GPU reads it across the bus every time it is used; fine for data that
/// is tiny or rewritten every frame.
pub fn create_upload_buffer(device: &ID3D12Device, bytes: &[u8], name: &HSTRING) -> HelloResult<ID3D12Resource> {
    let buffer = create_buffer(
        device,
        D3D12_HEAP_TYPE_UPLOAD,
        bytes.len() as u64,
        D3D12_RESOURCE_STATE_GENERIC_READ,
    )?;
    unsafe { buffer.SetName(name)? };
    write_upload_resource(&buffer, bytes)?;
    Ok(buffer)
}

/// A default-heap buffer and the staging buffer that feeds it.
///
/// The copy is only recorded on `command_list`; the staging buffer must be
/// kept alive until the list has finished executing on the GPU.
pub struct DefaultBuffer {
    pub buffer: ID3D12Resource,
    pub staging: ID3D12Resource,
}

pub fn create_default_buffer(
    device: &ID3D12Device,
    command_list: &ID3D12GraphicsCommandList,
    bytes: &[u8],
    name: &HSTRING,
) -> HelloResult<DefaultBuffer> {
    let byte_size = bytes.len() as u64;
    let buffer = create_buffer(device, D3D12_HEAP_TYPE_DEFAULT, byte_size, D3D12_RESOURCE_STATE_COMMON)?;
    unsafe { buffer.SetName(name)? };
    let staging = create_buffer(
        device,
        D3D12_HEAP_TYPE_UPLOAD,
        byte_size,
        D3D12_RESOURCE_STATE_GENERIC_READ,
    )?;
    write_upload_resource(&staging, bytes)?;

    unsafe {
        command_list.ResourceBarrier(&[transition_barrier(
            &buffer,
            D3D12_RESOURCE_STATE_COMMON,
            D3D12_RESOURCE_STATE_COPY_DEST,
        )]);
        command_list.CopyBufferRegion(&buffer, 0, &staging, 0, byte_size);
        command_list.ResourceBarrier(&[transition_barrier(
            &buffer,
            D3D12_RESOURCE_STATE_COPY_DEST,
            D3D12_RESOURCE_STATE_GENERIC_READ,
        )]);
    }

    Ok(DefaultBuffer { buffer, staging })
}

pub fn vertex_buffer_view(buffer: &ID3D12Resource, stride: u32, byte_size: u32) -> D3D12_VERTEX_BUFFER_VIEW {
    D3D12_VERTEX_BUFFER_VIEW {
        BufferLocation: unsafe { buffer.GetGPUVirtualAddress() },
        StrideInBytes: stride,
        SizeInBytes: byte_size,
    }
}

pub fn index_buffer_view(buffer: &ID3D12Resource, format: IndexFormat, byte_size: u32) -> D3D12_INDEX_BUFFER_VIEW {
    D3D12_INDEX_BUFFER_VIEW {
        BufferLocation: unsafe { buffer.GetGPUVirtualAddress() },
        SizeInBytes: byte_size,
        Format: match format {
            IndexFormat::U16 => DXGI_FORMAT_R16_UINT,
            IndexFormat::U32 => DXGI_FORMAT_R32_UINT,
        },
    }
}
