use tracing::debug;
use tracing::info;
use windows::core::*;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D12::D3D12CreateDevice;
use windows::Win32::Graphics::Direct3D12::ID3D12Device;
use windows::Win32::Graphics::Dxgi::*;

use crate::hello_error::HelloResult;

/// Minimum feature level every sample asks for.
pub const MINIMUM_FEATURE_LEVEL: D3D_FEATURE_LEVEL = D3D_FEATURE_LEVEL_11_0;

/// First hardware adapter that can create a Direct3D 12 device.
///
/// Software adapters (the Basic Render Driver) are skipped; pass `-warp`
/// to get a software device instead.
pub fn get_hardware_adapter(factory: &IDXGIFactory4) -> HelloResult<IDXGIAdapter1> {
    for i in 0.. {
        let adapter = match unsafe { factory.EnumAdapters1(i) } {
            Ok(adapter) => adapter,
            Err(e) if e.code() == DXGI_ERROR_NOT_FOUND => break,
            Err(e) => return Err(e.into()),
        };

        let desc = unsafe { adapter.GetDesc1()? };
        let name = adapter_name(&desc.Description);

        if (DXGI_ADAPTER_FLAG(desc.Flags as i32) & DXGI_ADAPTER_FLAG_SOFTWARE)
            != DXGI_ADAPTER_FLAG_NONE
        {
            debug!(index = i, %name, "skipping software adapter");
            continue;
        }

        // Check for support without creating the device yet.
        let supported = unsafe {
            D3D12CreateDevice(
                &adapter,
                MINIMUM_FEATURE_LEVEL,
                std::ptr::null_mut::<Option<ID3D12Device>>(),
            )
        }
        .is_ok();

        if supported {
            info!(index = i, %name, "using hardware adapter");
            return Ok(adapter);
        }
        debug!(index = i, %name, "adapter does not support feature level 11_0");
    }

    Err(Error::new(DXGI_ERROR_NOT_FOUND, "No suitable D3D12 hardware adapter found.").into())
}

fn adapter_name(description: &[u16]) -> String {
    let len = description
        .iter()
        .position(|c| *c == 0)
        .unwrap_or(description.len());
    String::from_utf16_lossy(&description[..len])
}
