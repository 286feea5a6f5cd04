use std::path::Path;

use eyre::eyre;
use tracing::debug;
use tracing::error;
use windows::core::*;
use windows::Win32::Graphics::Direct3D::Fxc::*;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D12::D3D12_SHADER_BYTECODE;

use super::blob_bytes;
use super::required;
use crate::hello_error::HelloResult;

/// Debug builds keep symbols and skip optimization for graphics debuggers.
pub fn compile_flags() -> u32 {
    if cfg!(debug_assertions) {
        D3DCOMPILE_DEBUG | D3DCOMPILE_SKIP_OPTIMIZATION
    } else {
        0
    }
}

pub fn compile_shader(hlsl_path: &Path, entry_point: PCSTR, target: PCSTR) -> HelloResult<ID3DBlob> {
    let path_text = hlsl_path
        .to_str()
        .ok_or_else(|| eyre!("shader path {} is not valid unicode", hlsl_path.display()))?;
    let hlsl_path_w = HSTRING::from(path_text);
    let entry = unsafe { entry_point.to_string() }.unwrap_or_default();
    let profile = unsafe { target.to_string() }.unwrap_or_default();
    debug!(path = path_text, %entry, %profile, "compiling shader");

    let mut shader_blob = None;
    let mut error_blob = None;
    let result = unsafe {
        D3DCompileFromFile(
            &hlsl_path_w,
            None,
            None,
            entry_point,
            target,
            compile_flags(),
            0,
            &mut shader_blob,
            Some(&mut error_blob),
        )
    };

    if let Err(e) = result {
        let message = error_blob
            .as_ref()
            .map(|blob| String::from_utf8_lossy(unsafe { blob_bytes(blob) }).into_owned())
            .unwrap_or_default();
        error!(%entry, %profile, "shader compile error: {message}");
        return Err(eyre::Report::new(crate::hello_error::WrappedWindowsError::from(e))
            .wrap_err(format!("failed to compile {entry} ({profile}) from {path_text}: {message}"))
            .into());
    }

    required(shader_blob, "D3DCompileFromFile")
}

/// Bytecode view of a compiled blob; the blob must outlive the returned struct.
pub fn bytecode(blob: &ID3DBlob) -> D3D12_SHADER_BYTECODE {
    unsafe {
        D3D12_SHADER_BYTECODE {
            pShaderBytecode: blob.GetBufferPointer(),
            BytecodeLength: blob.GetBufferSize(),
        }
    }
}
