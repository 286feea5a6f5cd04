use d3d12_hello_framework::hello_error::HelloResult;
use windows::Win32::Graphics::Direct3D::*;

use crate::resources::Resources;

pub fn populate_command_list(resources: &mut Resources, clear_color: &[f32; 4]) -> HelloResult<()> {
    resources.render.begin_frame(&resources.pso, &resources.root_signature)?;

    let command_list = resources.render.command_list();
    unsafe {
        command_list.SetDescriptorHeaps(&[Some(resources.srv_heap.heap.clone())]);
        command_list.SetGraphicsRootDescriptorTable(0, resources.srv_heap.gpu_handle(0));
    }
    resources.render.clear(clear_color);

    let command_list = resources.render.command_list();
    unsafe {
        command_list.IASetPrimitiveTopology(D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
        command_list.IASetVertexBuffers(0, Some(&[resources.vbv]));
        command_list.DrawInstanced(3, 1, 0, 0);
    }
    Ok(())
}
