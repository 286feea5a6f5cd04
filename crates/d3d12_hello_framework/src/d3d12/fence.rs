use tracing::warn;
use windows::core::Error;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::System::Threading::*;

use crate::frame_sync::GpuTimeline;
use crate::hello_error::HelloResult;

/// An `ID3D12Fence` signalled from a command queue, with the event the CPU
/// blocks on.
pub struct D3d12Timeline {
    queue: ID3D12CommandQueue,
    fence: ID3D12Fence,
    event: HANDLE,
}

impl D3d12Timeline {
    pub fn new(device: &ID3D12Device, queue: &ID3D12CommandQueue) -> HelloResult<Self> {
        let fence: ID3D12Fence = unsafe { device.CreateFence(0, D3D12_FENCE_FLAG_NONE)? };
        let event = unsafe { CreateEventA(None, false, false, None)? };
        if event.is_invalid() {
            return Err(Error::from_win32().into());
        }
        Ok(Self {
            queue: queue.clone(),
            fence,
            event,
        })
    }
}

impl GpuTimeline for D3d12Timeline {
    fn signal(&mut self, value: u64) -> HelloResult<()> {
        unsafe { self.queue.Signal(&self.fence, value)? };
        Ok(())
    }

    fn completed_value(&self) -> u64 {
        unsafe { self.fence.GetCompletedValue() }
    }

    fn wait_for(&mut self, value: u64) -> HelloResult<()> {
        unsafe {
            self.fence.SetEventOnCompletion(value, self.event)?;
            if WaitForSingleObjectEx(self.event, INFINITE, false) == WAIT_FAILED {
                return Err(Error::from_win32().into());
            }
        }
        Ok(())
    }
}

impl Drop for D3d12Timeline {
    fn drop(&mut self) {
        if self.event.is_invalid() {
            return;
        }
        if let Err(e) = unsafe { CloseHandle(self.event) } {
            warn!("failed to close fence event: {e}");
        }
    }
}
