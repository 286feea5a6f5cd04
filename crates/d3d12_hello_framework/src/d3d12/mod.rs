pub mod adapter;
pub mod barrier;
pub mod buffer;
pub mod debug_messages;
pub mod depth_stencil;
pub mod descriptor_heap;
pub mod device;
pub mod fence;
pub mod pipeline;
pub mod render_context;
pub mod root_signature;
pub mod shader;
pub mod swap_chain;
pub mod texture_upload;
pub mod upload_buffer;

use eyre::eyre;
use windows::Win32::Graphics::Direct3D::ID3DBlob;

use crate::hello_error::HelloResult;

/// Number of swap chain back buffers.
pub const FRAME_COUNT: usize = 2;

/// COM out-parameters come back as `Option`; a `None` after a successful
/// call is still an error.
pub(crate) fn required<T>(value: Option<T>, what: &str) -> HelloResult<T> {
    value.ok_or_else(|| eyre!("{what} succeeded but returned no object").into())
}

/// Contents of a blob as bytes. The slice borrows `blob`.
pub(crate) unsafe fn blob_bytes(blob: &ID3DBlob) -> &[u8] {
    std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize())
}
