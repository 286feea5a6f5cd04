use std::marker::PhantomData;

use bytemuck::Pod;
use eyre::eyre;
use windows::Win32::Graphics::Direct3D12::*;

use super::buffer::create_buffer;
use crate::alignment::constant_buffer_byte_size;
use crate::hello_error::HelloResult;

/// An upload-heap buffer of `len` elements that stays mapped for its whole
/// life. Constant buffer elements are padded to 256 bytes.
pub struct UploadBuffer<T: Pod> {
    resource: ID3D12Resource,
    mapped: *mut u8,
    element_byte_size: u32,
    len: u32,
    _element: PhantomData<T>,
}

impl<T: Pod> UploadBuffer<T> {
    pub fn new(device: &ID3D12Device, len: u32, is_constant_buffer: bool) -> HelloResult<Self> {
        let raw_size = std::mem::size_of::<T>() as u32;
        let element_byte_size = if is_constant_buffer {
            constant_buffer_byte_size(raw_size)
        } else {
            raw_size
        };
        let resource = create_buffer(
            device,
            D3D12_HEAP_TYPE_UPLOAD,
            u64::from(element_byte_size) * u64::from(len),
            D3D12_RESOURCE_STATE_GENERIC_READ,
        )?;

        let mut mapped = std::ptr::null_mut();
        unsafe { resource.Map(0, None, Some(&mut mapped))? };
        if mapped.is_null() {
            return Err(eyre!("mapping the upload buffer returned a null pointer").into());
        }

        Ok(Self {
            resource,
            mapped: mapped as *mut u8,
            element_byte_size,
            len,
            _element: PhantomData,
        })
    }

    pub fn element_byte_size(&self) -> u32 {
        self.element_byte_size
    }

    pub fn gpu_address(&self, index: u32) -> u64 {
        unsafe { self.resource.GetGPUVirtualAddress() } + u64::from(index) * u64::from(self.element_byte_size)
    }

    pub fn copy_data(&mut self, index: u32, data: &T) -> HelloResult<()> {
        if index >= self.len {
            return Err(eyre!("upload buffer index {index} out of range (len {})", self.len).into());
        }
        let bytes = bytemuck::bytes_of(data);
        unsafe {
            let dst = self.mapped.add((index * self.element_byte_size) as usize);
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), dst, bytes.len());
        }
        Ok(())
    }
}

impl<T: Pod> Drop for UploadBuffer<T> {
    fn drop(&mut self) {
        unsafe { self.resource.Unmap(0, None) };
    }
}
