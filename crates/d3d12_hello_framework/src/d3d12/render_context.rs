use tracing::debug;
use tracing::info;
use windows::core::*;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Direct3D12::*;

use super::barrier::transition_barrier;
use super::depth_stencil::DepthStencil;
use super::device::DeviceContext;
use super::fence::D3d12Timeline;
use super::required;
use super::swap_chain::SwapChain;
use super::FRAME_COUNT;
use crate::frame_sync::FenceCounter;
use crate::frame_sync::FrameFences;
use crate::hello_error::HelloResult;

/// How the CPU keeps in step with the GPU after each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Wait for the GPU to finish every frame before recording the next.
    Flush,
    /// One fence value per back buffer; wait only when reusing a busy allocator.
    FrameBuffered,
}

enum FrameSync {
    Flush(FenceCounter),
    FrameBuffered(FrameFences),
}

pub struct RenderContextDesc {
    pub width: u32,
    pub height: u32,
    pub sync_mode: SyncMode,
    pub depth_buffer: bool,
    pub sync_interval: u32,
}

/// Queue, swap chain, allocators, command list and fence of one window.
pub struct RenderContext {
    device: ID3D12Device,
    queue: ID3D12CommandQueue,
    swap_chain: SwapChain,
    command_allocators: [ID3D12CommandAllocator; FRAME_COUNT],
    command_list: ID3D12GraphicsCommandList,
    timeline: D3d12Timeline,
    sync: FrameSync,
    depth_stencil: Option<DepthStencil>,
    viewport: D3D12_VIEWPORT,
    scissor_rect: RECT,
    sync_interval: u32,
    width: u32,
    height: u32,
}

fn viewport_for(width: u32, height: u32) -> (D3D12_VIEWPORT, RECT) {
    (
        D3D12_VIEWPORT {
            TopLeftX: 0.0,
            TopLeftY: 0.0,
            Width: width as f32,
            Height: height as f32,
            MinDepth: D3D12_MIN_DEPTH,
            MaxDepth: D3D12_MAX_DEPTH,
        },
        RECT {
            left: 0,
            top: 0,
            right: width as i32,
            bottom: height as i32,
        },
    )
}

impl RenderContext {
    pub fn new(context: &DeviceContext, hwnd: HWND, desc: &RenderContextDesc) -> HelloResult<Self> {
        let device = context.device.clone();
        let queue: ID3D12CommandQueue = unsafe {
            device.CreateCommandQueue(&D3D12_COMMAND_QUEUE_DESC {
                Type: D3D12_COMMAND_LIST_TYPE_DIRECT,
                ..Default::default()
            })?
        };

        let swap_chain = SwapChain::new(context, &queue, hwnd, desc.width, desc.height)?;

        let command_allocators = array_init::try_array_init(|_| -> HelloResult<ID3D12CommandAllocator> {
            Ok(unsafe { device.CreateCommandAllocator(D3D12_COMMAND_LIST_TYPE_DIRECT)? })
        })?;

        let frame_index = swap_chain.current_back_buffer_index();
        let command_list: ID3D12GraphicsCommandList = unsafe {
            device.CreateCommandList(
                0,
                D3D12_COMMAND_LIST_TYPE_DIRECT,
                &command_allocators[frame_index],
                None,
            )?
        };
        // Created in the recording state; the frame loop expects it closed.
        unsafe { command_list.Close()? };

        let timeline = D3d12Timeline::new(&device, &queue)?;
        let sync = match desc.sync_mode {
            SyncMode::Flush => FrameSync::Flush(FenceCounter::new()),
            SyncMode::FrameBuffered => FrameSync::FrameBuffered(FrameFences::new(FRAME_COUNT, frame_index)?),
        };

        let depth_stencil = if desc.depth_buffer {
            Some(DepthStencil::new(context, desc.width, desc.height)?)
        } else {
            None
        };

        let (viewport, scissor_rect) = viewport_for(desc.width, desc.height);
        info!(sync_mode = ?desc.sync_mode, depth = desc.depth_buffer, "render context created");

        Ok(Self {
            device,
            queue,
            swap_chain,
            command_allocators,
            command_list,
            timeline,
            sync,
            depth_stencil,
            viewport,
            scissor_rect,
            sync_interval: desc.sync_interval,
            width: desc.width,
            height: desc.height,
        })
    }

    pub fn device(&self) -> &ID3D12Device {
        &self.device
    }

    pub fn command_list(&self) -> &ID3D12GraphicsCommandList {
        &self.command_list
    }

    pub fn frame_index(&self) -> usize {
        match &self.sync {
            FrameSync::FrameBuffered(fences) => fences.frame_index(),
            FrameSync::Flush(_) => self.swap_chain.current_back_buffer_index(),
        }
    }

    /// Fence value tracked for the current frame, for logging.
    pub fn fence_value(&self) -> u64 {
        match &self.sync {
            FrameSync::Flush(counter) => counter.next_value(),
            FrameSync::FrameBuffered(fences) => fences.values()[fences.frame_index()],
        }
    }

    fn reset_command_list(&self, pso: Option<&ID3D12PipelineState>) -> HelloResult<()> {
        let allocator = &self.command_allocators[self.frame_index()];
        unsafe {
            allocator.Reset()?;
            self.command_list.Reset(allocator, pso)?;
        }
        Ok(())
    }

    /// Opens the command list for one-off initialization work such as buffer
    /// and texture uploads.
    pub fn begin_setup(&mut self) -> HelloResult<&ID3D12GraphicsCommandList> {
        self.reset_command_list(None)?;
        Ok(&self.command_list)
    }

    /// Submits the setup commands and waits for them, so staging resources
    /// may be dropped afterwards.
    pub fn finish_setup(&mut self) -> HelloResult<()> {
        self.execute()?;
        self.wait_for_gpu()
    }

    /// Resets this frame's allocator and the command list, then binds the
    /// viewport, scissor and the back buffer (plus depth, if any) as render
    /// target.
    pub fn begin_frame(&mut self, pso: &ID3D12PipelineState, root_signature: &ID3D12RootSignature) -> HelloResult<()> {
        self.reset_command_list(Some(pso))?;

        let frame_index = self.frame_index();
        let back_buffer = required(self.swap_chain.render_target(frame_index).cloned(), "back buffer")?;
        let rtv = self.swap_chain.rtv(frame_index);
        let dsv = self.depth_stencil.as_ref().map(DepthStencil::dsv);

        unsafe {
            self.command_list.SetGraphicsRootSignature(root_signature);
            self.command_list.RSSetViewports(&[self.viewport]);
            self.command_list.RSSetScissorRects(&[self.scissor_rect]);
            self.command_list.ResourceBarrier(&[transition_barrier(
                &back_buffer,
                D3D12_RESOURCE_STATE_PRESENT,
                D3D12_RESOURCE_STATE_RENDER_TARGET,
            )]);
            self.command_list
                .OMSetRenderTargets(1, Some(&rtv), false, dsv.as_ref().map(|dsv| dsv as *const _));
        }
        Ok(())
    }

    pub fn clear(&self, color: &[f32; 4]) {
        let rtv = self.swap_chain.rtv(self.frame_index());
        unsafe {
            self.command_list.ClearRenderTargetView(rtv, color, None);
            if let Some(depth_stencil) = &self.depth_stencil {
                self.command_list.ClearDepthStencilView(
                    depth_stencil.dsv(),
                    D3D12_CLEAR_FLAG_DEPTH | D3D12_CLEAR_FLAG_STENCIL,
                    1.0,
                    0,
                    &[],
                );
            }
        }
    }

    fn execute(&self) -> HelloResult<()> {
        unsafe { self.command_list.Close()? };
        let command_lists = [Some(self.command_list.cast::<ID3D12CommandList>()?)];
        unsafe { self.queue.ExecuteCommandLists(&command_lists) };
        Ok(())
    }

    /// Transitions the back buffer for presentation, submits, presents and
    /// synchronizes with the GPU.
    pub fn end_frame(&mut self) -> HelloResult<()> {
        let frame_index = self.frame_index();
        let back_buffer = required(self.swap_chain.render_target(frame_index).cloned(), "back buffer")?;
        unsafe {
            self.command_list.ResourceBarrier(&[transition_barrier(
                &back_buffer,
                D3D12_RESOURCE_STATE_RENDER_TARGET,
                D3D12_RESOURCE_STATE_PRESENT,
            )]);
        }
        self.execute()?;
        self.swap_chain.present(self.sync_interval)?;

        match &mut self.sync {
            FrameSync::Flush(counter) => {
                counter.signal_and_wait(&mut self.timeline)?;
            }
            FrameSync::FrameBuffered(fences) => {
                let next_index = self.swap_chain.current_back_buffer_index();
                fences.move_to_next_frame(&mut self.timeline, next_index)?;
            }
        }
        Ok(())
    }

    /// Blocks until the GPU has finished everything submitted so far.
    pub fn wait_for_gpu(&mut self) -> HelloResult<()> {
        match &mut self.sync {
            FrameSync::Flush(counter) => {
                counter.signal_and_wait(&mut self.timeline)?;
            }
            FrameSync::FrameBuffered(fences) => fences.wait_for_gpu(&mut self.timeline)?,
        }
        debug!(fence = self.fence_value(), "gpu idle");
        Ok(())
    }

    /// Recreates the size-dependent resources. Zero sizes and the current
    /// size are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> HelloResult<()> {
        if width == 0 || height == 0 || (width, height) == (self.width, self.height) {
            return Ok(());
        }
        self.wait_for_gpu()?;

        self.swap_chain.resize(&self.device, width, height)?;
        if let Some(depth_stencil) = &mut self.depth_stencil {
            depth_stencil.resize(&self.device, width, height)?;
        }
        if let FrameSync::FrameBuffered(fences) = &mut self.sync {
            fences.rebase_after_resize(self.swap_chain.current_back_buffer_index())?;
        }

        (self.viewport, self.scissor_rect) = viewport_for(width, height);
        self.width = width;
        self.height = height;
        Ok(())
    }
}
