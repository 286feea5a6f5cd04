use tracing::info;
use windows::core::*;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;

use super::descriptor_heap::DescriptorHeap;
use super::device::DeviceContext;
use super::FRAME_COUNT;
use crate::hello_error::HelloResult;

pub const BACK_BUFFER_FORMAT: DXGI_FORMAT = DXGI_FORMAT_R8G8B8A8_UNORM;

/// The swap chain, its back buffers and one RTV per back buffer.
pub struct SwapChain {
    swap_chain: IDXGISwapChain3,
    rtv_heap: DescriptorHeap,
    render_targets: Option<[ID3D12Resource; FRAME_COUNT]>,
}

impl SwapChain {
    pub fn new(
        context: &DeviceContext,
        queue: &ID3D12CommandQueue,
        hwnd: HWND,
        width: u32,
        height: u32,
    ) -> HelloResult<Self> {
        let desc = DXGI_SWAP_CHAIN_DESC1 {
            BufferCount: FRAME_COUNT as u32,
            Width: width,
            Height: height,
            Format: BACK_BUFFER_FORMAT,
            BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
            SwapEffect: DXGI_SWAP_EFFECT_FLIP_DISCARD,
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                ..Default::default()
            },
            ..Default::default()
        };

        let swap_chain: IDXGISwapChain1 =
            unsafe { context.factory.CreateSwapChainForHwnd(queue, hwnd, &desc, None, None)? };
        let swap_chain: IDXGISwapChain3 = swap_chain.cast()?;

        // No fullscreen transitions.
        unsafe { context.factory.MakeWindowAssociation(hwnd, DXGI_MWA_NO_ALT_ENTER)? };

        let rtv_heap = DescriptorHeap::new(context, D3D12_DESCRIPTOR_HEAP_TYPE_RTV, FRAME_COUNT as u32, false)?;
        let mut swap_chain = Self {
            swap_chain,
            rtv_heap,
            render_targets: None,
        };
        swap_chain.create_render_targets(&context.device)?;
        info!(width, height, frames = FRAME_COUNT, "swap chain created");
        Ok(swap_chain)
    }

    fn create_render_targets(&mut self, device: &ID3D12Device) -> HelloResult<()> {
        let render_targets = array_init::try_array_init(|i| -> HelloResult<ID3D12Resource> {
            let resource: ID3D12Resource = unsafe { self.swap_chain.GetBuffer(i as u32)? };
            unsafe { device.CreateRenderTargetView(&resource, None, self.rtv_heap.cpu_handle(i as u32)) };
            Ok(resource)
        })?;
        self.render_targets = Some(render_targets);
        Ok(())
    }

    pub fn current_back_buffer_index(&self) -> usize {
        unsafe { self.swap_chain.GetCurrentBackBufferIndex() as usize }
    }

    pub fn render_target(&self, index: usize) -> Option<&ID3D12Resource> {
        self.render_targets.as_ref().and_then(|targets| targets.get(index))
    }

    pub fn rtv(&self, index: usize) -> D3D12_CPU_DESCRIPTOR_HANDLE {
        self.rtv_heap.cpu_handle(index as u32)
    }

    pub fn present(&self, sync_interval: u32) -> HelloResult<()> {
        unsafe { self.swap_chain.Present(sync_interval, DXGI_PRESENT(0)).ok()? };
        Ok(())
    }

    /// Resizes the back buffers and recreates their views. The GPU must be
    /// idle: every reference to the old buffers is released first.
    pub fn resize(&mut self, device: &ID3D12Device, width: u32, height: u32) -> HelloResult<()> {
        self.render_targets = None;
        unsafe {
            self.swap_chain.ResizeBuffers(
                FRAME_COUNT as u32,
                width,
                height,
                BACK_BUFFER_FORMAT,
                DXGI_SWAP_CHAIN_FLAG(0),
            )?
        };
        self.create_render_targets(device)?;
        info!(width, height, "swap chain resized");
        Ok(())
    }
}
