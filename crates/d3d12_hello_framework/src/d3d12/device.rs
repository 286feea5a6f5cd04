use eyre::eyre;
use tracing::info;
use tracing::warn;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::*;

use super::adapter::get_hardware_adapter;
use super::adapter::MINIMUM_FEATURE_LEVEL;
use super::required;
use crate::hello_error::HelloResult;

/// Descriptor handle increment sizes for the heap types the samples use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorSizes {
    pub rtv: u32,
    pub dsv: u32,
    pub cbv_srv_uav: u32,
}

impl DescriptorSizes {
    pub fn for_heap(&self, heap_type: D3D12_DESCRIPTOR_HEAP_TYPE) -> HelloResult<u32> {
        match heap_type {
            D3D12_DESCRIPTOR_HEAP_TYPE_RTV => Ok(self.rtv),
            D3D12_DESCRIPTOR_HEAP_TYPE_DSV => Ok(self.dsv),
            D3D12_DESCRIPTOR_HEAP_TYPE_CBV_SRV_UAV => Ok(self.cbv_srv_uav),
            other => Err(eyre!("no descriptor size recorded for heap type {}", other.0).into()),
        }
    }
}

/// Factory, device and the debug info queue shared by every sample.
pub struct DeviceContext {
    pub factory: IDXGIFactory4,
    pub device: ID3D12Device,
    pub info_queue: Option<IDXGIInfoQueue>,
    pub descriptor_sizes: DescriptorSizes,
}

impl DeviceContext {
    pub fn create(use_warp_device: bool) -> HelloResult<Self> {
        let mut factory_flags = DXGI_CREATE_FACTORY_FLAGS(0);
        let mut info_queue = None;

        // Enabling the debug layer after device creation invalidates the device.
        if cfg!(debug_assertions) && enable_debug_layer() {
            factory_flags |= DXGI_CREATE_FACTORY_DEBUG;
            match unsafe { DXGIGetDebugInterface1::<IDXGIInfoQueue>(0) } {
                Ok(queue) => {
                    info!("DXGI info queue obtained");
                    info_queue = Some(queue);
                }
                Err(e) => warn!("failed to get DXGI info queue: {e}"),
            }
        }

        let factory: IDXGIFactory4 = unsafe { CreateDXGIFactory2(factory_flags) }?;

        let mut device: Option<ID3D12Device> = None;
        if use_warp_device {
            info!("using WARP adapter");
            let adapter: IDXGIAdapter = unsafe { factory.EnumWarpAdapter()? };
            unsafe { D3D12CreateDevice(&adapter, MINIMUM_FEATURE_LEVEL, &mut device) }?;
        } else {
            let adapter = get_hardware_adapter(&factory)?;
            unsafe { D3D12CreateDevice(&adapter, MINIMUM_FEATURE_LEVEL, &mut device) }?;
        }
        let device = required(device, "D3D12CreateDevice")?;

        let descriptor_sizes = unsafe {
            DescriptorSizes {
                rtv: device.GetDescriptorHandleIncrementSize(D3D12_DESCRIPTOR_HEAP_TYPE_RTV),
                dsv: device.GetDescriptorHandleIncrementSize(D3D12_DESCRIPTOR_HEAP_TYPE_DSV),
                cbv_srv_uav: device
                    .GetDescriptorHandleIncrementSize(D3D12_DESCRIPTOR_HEAP_TYPE_CBV_SRV_UAV),
            }
        };

        info!(?descriptor_sizes, "device created");

        Ok(Self {
            factory,
            device,
            info_queue,
            descriptor_sizes,
        })
    }
}

fn enable_debug_layer() -> bool {
    unsafe {
        let mut debug1: Option<ID3D12Debug1> = None;
        if D3D12GetDebugInterface(&mut debug1).is_ok() {
            if let Some(debug1) = debug1 {
                debug1.EnableDebugLayer();
                debug1.SetEnableGPUBasedValidation(true);
                info!("D3D12 debug layer enabled with GPU based validation");
                return true;
            }
        }

        let mut debug: Option<ID3D12Debug> = None;
        if D3D12GetDebugInterface(&mut debug).is_ok() {
            if let Some(debug) = debug {
                debug.EnableDebugLayer();
                info!("D3D12 debug layer enabled");
                return true;
            }
        }
    }
    warn!("D3D12 debug layer unavailable");
    false
}
