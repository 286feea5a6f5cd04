use windows::Win32::Graphics::Direct3D12::*;

use super::device::DeviceContext;
use crate::alignment::descriptor_offset;
use crate::hello_error::HelloResult;

/// A descriptor heap together with its handle increment size.
pub struct DescriptorHeap {
    pub heap: ID3D12DescriptorHeap,
    pub increment_size: u32,
    pub len: u32,
}

impl DescriptorHeap {
    pub fn new(
        context: &DeviceContext,
        heap_type: D3D12_DESCRIPTOR_HEAP_TYPE,
        len: u32,
        shader_visible: bool,
    ) -> HelloResult<Self> {
        let heap: ID3D12DescriptorHeap = unsafe {
            context.device.CreateDescriptorHeap(&D3D12_DESCRIPTOR_HEAP_DESC {
                Type: heap_type,
                NumDescriptors: len,
                Flags: if shader_visible {
                    D3D12_DESCRIPTOR_HEAP_FLAG_SHADER_VISIBLE
                } else {
                    D3D12_DESCRIPTOR_HEAP_FLAG_NONE
                },
                NodeMask: 0,
            })?
        };
        let increment_size = context.descriptor_sizes.for_heap(heap_type)?;
        Ok(Self {
            heap,
            increment_size,
            len,
        })
    }

    pub fn cpu_handle(&self, index: u32) -> D3D12_CPU_DESCRIPTOR_HANDLE {
        debug_assert!(index < self.len);
        let start = unsafe { self.heap.GetCPUDescriptorHandleForHeapStart() };
        D3D12_CPU_DESCRIPTOR_HANDLE {
            ptr: descriptor_offset(start.ptr, index, self.increment_size),
        }
    }

    pub fn gpu_handle(&self, index: u32) -> D3D12_GPU_DESCRIPTOR_HANDLE {
        debug_assert!(index < self.len);
        let start = unsafe { self.heap.GetGPUDescriptorHandleForHeapStart() };
        D3D12_GPU_DESCRIPTOR_HANDLE {
            ptr: start.ptr + u64::from(index) * u64::from(self.increment_size),
        }
    }
}
