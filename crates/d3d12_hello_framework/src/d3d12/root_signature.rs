use eyre::eyre;
use tracing::error;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D12::*;

use super::blob_bytes;
use super::required;
use crate::hello_error::HelloResult;
use crate::hello_error::WrappedWindowsError;

/// Root signature layouts used by the samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootLayout {
    /// Input assembler only.
    Empty,
    /// One descriptor table with a single CBV at `b0`, visible to all stages.
    ConstantBufferTable,
    /// One pixel-shader descriptor table with a single SRV at `t0` and a
    /// static point sampler at `s0`.
    TextureTable,
}

pub fn create_root_signature(device: &ID3D12Device, layout: RootLayout) -> HelloResult<ID3D12RootSignature> {
    let cbv_range = [D3D12_DESCRIPTOR_RANGE {
        RangeType: D3D12_DESCRIPTOR_RANGE_TYPE_CBV,
        NumDescriptors: 1,
        BaseShaderRegister: 0,
        RegisterSpace: 0,
        OffsetInDescriptorsFromTableStart: D3D12_DESCRIPTOR_RANGE_OFFSET_APPEND,
    }];
    let srv_range = [D3D12_DESCRIPTOR_RANGE {
        RangeType: D3D12_DESCRIPTOR_RANGE_TYPE_SRV,
        ..cbv_range[0]
    }];

    let table = |ranges: &[D3D12_DESCRIPTOR_RANGE], visibility| D3D12_ROOT_PARAMETER {
        ParameterType: D3D12_ROOT_PARAMETER_TYPE_DESCRIPTOR_TABLE,
        Anonymous: D3D12_ROOT_PARAMETER_0 {
            DescriptorTable: D3D12_ROOT_DESCRIPTOR_TABLE {
                NumDescriptorRanges: ranges.len() as u32,
                pDescriptorRanges: ranges.as_ptr(),
            },
        },
        ShaderVisibility: visibility,
    };

    let point_sampler = [D3D12_STATIC_SAMPLER_DESC {
        Filter: D3D12_FILTER_MIN_MAG_MIP_POINT,
        AddressU: D3D12_TEXTURE_ADDRESS_MODE_BORDER,
        AddressV: D3D12_TEXTURE_ADDRESS_MODE_BORDER,
        AddressW: D3D12_TEXTURE_ADDRESS_MODE_BORDER,
        MipLODBias: 0.0,
        MaxAnisotropy: 0,
        ComparisonFunc: D3D12_COMPARISON_FUNC_NEVER,
        BorderColor: D3D12_STATIC_BORDER_COLOR_TRANSPARENT_BLACK,
        MinLOD: 0.0,
        MaxLOD: D3D12_FLOAT32_MAX,
        ShaderRegister: 0,
        RegisterSpace: 0,
        ShaderVisibility: D3D12_SHADER_VISIBILITY_PIXEL,
    }];

    let parameters: Vec<D3D12_ROOT_PARAMETER> = match layout {
        RootLayout::Empty => Vec::new(),
        RootLayout::ConstantBufferTable => vec![table(&cbv_range, D3D12_SHADER_VISIBILITY_ALL)],
        RootLayout::TextureTable => vec![table(&srv_range, D3D12_SHADER_VISIBILITY_PIXEL)],
    };
    let samplers: &[D3D12_STATIC_SAMPLER_DESC] = match layout {
        RootLayout::TextureTable => &point_sampler,
        _ => &[],
    };

    let desc = D3D12_ROOT_SIGNATURE_DESC {
        NumParameters: parameters.len() as u32,
        pParameters: if parameters.is_empty() { std::ptr::null() } else { parameters.as_ptr() },
        NumStaticSamplers: samplers.len() as u32,
        pStaticSamplers: if samplers.is_empty() { std::ptr::null() } else { samplers.as_ptr() },
        Flags: D3D12_ROOT_SIGNATURE_FLAG_ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT,
    };

    let mut signature_blob = None;
    let mut error_blob = None;
    let serialized = unsafe {
        D3D12SerializeRootSignature(
            &desc,
            D3D_ROOT_SIGNATURE_VERSION_1,
            &mut signature_blob,
            Some(&mut error_blob),
        )
    };

    if let Err(e) = serialized {
        let message = error_blob
            .as_ref()
            .map(|blob| String::from_utf8_lossy(unsafe { blob_bytes(blob) }).into_owned())
            .unwrap_or_default();
        error!(?layout, "root signature serialization error: {message}");
        return Err(eyre::Report::new(WrappedWindowsError::from(e))
            .wrap_err(eyre!("failed to serialize {layout:?} root signature: {message}"))
            .into());
    }

    let signature_blob = required(signature_blob, "D3D12SerializeRootSignature")?;
    let root_signature = unsafe { device.CreateRootSignature(0, blob_bytes(&signature_blob))? };
    Ok(root_signature)
}
