use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;

use super::descriptor_heap::DescriptorHeap;
use super::device::DeviceContext;
use super::required;
use crate::hello_error::HelloResult;

pub const DEPTH_STENCIL_FORMAT: DXGI_FORMAT = DXGI_FORMAT_D24_UNORM_S8_UINT;

/// Depth-stencil buffer sized to the back buffers, with its one-entry DSV heap.
pub struct DepthStencil {
    heap: DescriptorHeap,
    buffer: Option<ID3D12Resource>,
}

impl DepthStencil {
    pub fn new(context: &DeviceContext, width: u32, height: u32) -> HelloResult<Self> {
        let heap = DescriptorHeap::new(context, D3D12_DESCRIPTOR_HEAP_TYPE_DSV, 1, false)?;
        let mut depth_stencil = Self { heap, buffer: None };
        depth_stencil.resize(&context.device, width, height)?;
        Ok(depth_stencil)
    }

    pub fn dsv(&self) -> D3D12_CPU_DESCRIPTOR_HANDLE {
        self.heap.cpu_handle(0)
    }

    /// Releases the old buffer and creates one of the new size. The GPU must
    /// be idle. Nothing happens when the size is unchanged.
    pub fn resize(&mut self, device: &ID3D12Device, width: u32, height: u32) -> HelloResult<()> {
        if let Some(buffer) = &self.buffer {
            let current = unsafe { buffer.GetDesc() };
            if current.Width == u64::from(width) && current.Height == height {
                return Ok(());
            }
        }
        self.buffer = None;

        let desc = D3D12_RESOURCE_DESC {
            Dimension: D3D12_RESOURCE_DIMENSION_TEXTURE2D,
            Alignment: 0,
            Width: u64::from(width),
            Height: height,
            DepthOrArraySize: 1,
            MipLevels: 1,
            Format: DEPTH_STENCIL_FORMAT,
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            Layout: D3D12_TEXTURE_LAYOUT_UNKNOWN,
            Flags: D3D12_RESOURCE_FLAG_ALLOW_DEPTH_STENCIL,
        };
        let clear_value = D3D12_CLEAR_VALUE {
            Format: DEPTH_STENCIL_FORMAT,
            Anonymous: D3D12_CLEAR_VALUE_0 {
                DepthStencil: D3D12_DEPTH_STENCIL_VALUE {
                    Depth: 1.0,
                    Stencil: 0,
                },
            },
        };

        let mut buffer: Option<ID3D12Resource> = None;
        unsafe {
            device.CreateCommittedResource(
                &D3D12_HEAP_PROPERTIES {
                    Type: D3D12_HEAP_TYPE_DEFAULT,
                    ..Default::default()
                },
                D3D12_HEAP_FLAG_NONE,
                &desc,
                D3D12_RESOURCE_STATE_DEPTH_WRITE,
                Some(&clear_value),
                &mut buffer,
            )?
        };
        let buffer = required(buffer, "CreateCommittedResource")?;
        unsafe { device.CreateDepthStencilView(&buffer, None, self.dsv()) };
        self.buffer = Some(buffer);
        Ok(())
    }
}
