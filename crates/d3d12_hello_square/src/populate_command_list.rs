use d3d12_hello_framework::hello_error::HelloResult;
use windows::Win32::Graphics::Direct3D::*;

use crate::resources::Resources;

pub fn populate_command_list(resources: &mut Resources, clear_color: &[f32; 4]) -> HelloResult<()> {
    resources.render.begin_frame(&resources.pso, &resources.root_signature)?;
    resources.render.clear(clear_color);

    let command_list = resources.render.command_list();
    let draw = resources.square_draw;
    unsafe {
        command_list.IASetPrimitiveTopology(D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
        command_list.IASetVertexBuffers(0, Some(&[resources.vbv]));
        command_list.IASetIndexBuffer(Some(&resources.ibv));
        command_list.DrawIndexedInstanced(
            draw.index_count,
            1,
            draw.start_index_location,
            draw.base_vertex_location,
            0,
        );
    }
    Ok(())
}
