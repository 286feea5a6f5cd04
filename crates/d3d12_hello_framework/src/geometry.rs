use std::collections::HashMap;

use bytemuck::Pod;
use bytemuck::Zeroable;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

pub mod colors {
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const GREEN: [f32; 4] = [0.0, 0.501_960_8, 0.0, 1.0];
    pub const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const CYAN: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const MAGENTA: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
    pub const LIGHT_STEEL_BLUE: [f32; 4] = [0.690_196_1, 0.768_627_5, 0.870_588_3, 1.0];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    U16,
    U32,
}

impl IndexFormat {
    pub fn byte_size(self) -> u32 {
        match self {
            IndexFormat::U16 => 2,
            IndexFormat::U32 => 4,
        }
    }
}

/// Draw arguments for one piece of a [`MeshGeometry`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmeshGeometry {
    pub index_count: u32,
    pub start_index_location: u32,
    pub base_vertex_location: i32,
}

/// CPU-side copy of a mesh: raw vertex and index bytes plus named submeshes.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGeometry {
    pub name: String,
    pub vertex_bytes: Vec<u8>,
    pub index_bytes: Vec<u8>,
    pub vertex_byte_stride: u32,
    pub index_format: IndexFormat,
    pub draw_args: HashMap<String, SubmeshGeometry>,
}

impl MeshGeometry {
    pub fn new<V: Pod>(name: &str, vertices: &[V], indices: &[u16]) -> Self {
        Self {
            name: name.to_string(),
            vertex_bytes: bytemuck::cast_slice(vertices).to_vec(),
            index_bytes: bytemuck::cast_slice(indices).to_vec(),
            vertex_byte_stride: std::mem::size_of::<V>() as u32,
            index_format: IndexFormat::U16,
            draw_args: HashMap::new(),
        }
    }

    /// Register a submesh that covers every index of the mesh.
    pub fn with_whole_mesh_submesh(mut self, name: &str) -> Self {
        let submesh = SubmeshGeometry {
            index_count: self.index_count(),
            start_index_location: 0,
            base_vertex_location: 0,
        };
        self.draw_args.insert(name.to_string(), submesh);
        self
    }

    pub fn vertex_buffer_byte_size(&self) -> u32 {
        self.vertex_bytes.len() as u32
    }

    pub fn index_buffer_byte_size(&self) -> u32 {
        self.index_bytes.len() as u32
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_buffer_byte_size() / self.vertex_byte_stride
    }

    pub fn index_count(&self) -> u32 {
        self.index_buffer_byte_size() / self.index_format.byte_size()
    }

    pub fn submesh(&self, name: &str) -> Option<&SubmeshGeometry> {
        self.draw_args.get(name)
    }
}

/// Unit cube with a different color at every corner.
pub fn box_mesh() -> MeshGeometry {
    let corner = |position: [f32; 3], color: [f32; 4]| ColorVertex { position, color };
    let vertices = [
        corner([-1.0, -1.0, -1.0], colors::WHITE),
        corner([-1.0, 1.0, -1.0], colors::BLACK),
        corner([1.0, 1.0, -1.0], colors::RED),
        corner([1.0, -1.0, -1.0], colors::GREEN),
        corner([-1.0, -1.0, 1.0], colors::BLUE),
        corner([-1.0, 1.0, 1.0], colors::YELLOW),
        corner([1.0, 1.0, 1.0], colors::CYAN),
        corner([1.0, -1.0, 1.0], colors::MAGENTA),
    ];
    #[rustfmt::skip]
    let indices: [u16; 36] = [
        // front
        0, 1, 2,
        0, 2, 3,
        // back
        4, 6, 5,
        4, 7, 6,
        // left
        4, 5, 1,
        4, 1, 0,
        // right
        3, 2, 6,
        3, 6, 7,
        // top
        1, 5, 6,
        1, 6, 2,
        // bottom
        4, 0, 3,
        4, 3, 7,
    ];
    MeshGeometry::new("boxGeo", &vertices, &indices).with_whole_mesh_submesh("box")
}

/// Screen-space square; `aspect_ratio` keeps it square on wide windows.
pub fn square_mesh(aspect_ratio: f32) -> MeshGeometry {
    let half = 0.25;
    let vertices = [
        ColorVertex { position: [-half, half * aspect_ratio, 0.0], color: colors::RED },
        ColorVertex { position: [half, half * aspect_ratio, 0.0], color: colors::GREEN },
        ColorVertex { position: [half, -half * aspect_ratio, 0.0], color: colors::BLUE },
        ColorVertex { position: [-half, -half * aspect_ratio, 0.0], color: colors::YELLOW },
    ];
    let indices: [u16; 6] = [0, 1, 2, 0, 2, 3];
    MeshGeometry::new("squareGeo", &vertices, &indices).with_whole_mesh_submesh("square")
}

pub fn textured_triangle(aspect_ratio: f32) -> [TexturedVertex; 3] {
    [
        TexturedVertex { position: [0.0, 0.25 * aspect_ratio, 0.0], uv: [0.5, 0.0] },
        TexturedVertex { position: [0.25, -0.25 * aspect_ratio, 0.0], uv: [1.0, 1.0] },
        TexturedVertex { position: [-0.25, -0.25 * aspect_ratio, 0.0], uv: [0.0, 1.0] },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices_of(mesh: &MeshGeometry) -> Vec<u16> {
        mesh.index_bytes
            .chunks_exact(2)
            .map(|bytes| u16::from_ne_bytes([bytes[0], bytes[1]]))
            .collect()
    }

    fn vertices_of(mesh: &MeshGeometry) -> Vec<ColorVertex> {
        mesh.vertex_bytes
            .chunks_exact(std::mem::size_of::<ColorVertex>())
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }

    #[test]
    fn vertex_layouts_match_the_input_layouts() {
        // POSITION at 0, COLOR/TEXCOORD right after
        assert_eq!(std::mem::size_of::<ColorVertex>(), 28);
        assert_eq!(std::mem::size_of::<TexturedVertex>(), 20);
    }

    #[test]
    fn box_mesh_has_twelve_triangles_over_eight_corners() {
        let mesh = box_mesh();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.index_count(), 36);
        assert_eq!(mesh.vertex_buffer_byte_size(), 8 * 28);
        assert_eq!(mesh.index_buffer_byte_size(), 72);
        assert!(indices_of(&mesh).iter().all(|index| *index < 8));

        let submesh = mesh.submesh("box").expect("box draw args");
        assert_eq!(submesh.index_count, 36);
        assert_eq!(submesh.start_index_location, 0);
    }

    #[test]
    fn box_front_face_winds_clockwise_seen_from_the_front() {
        let mesh = box_mesh();
        let vertices = vertices_of(&mesh);
        let indices = indices_of(&mesh);
        let [a, b, c] = [0, 1, 2].map(|i| vertices[indices[i] as usize].position);
        let ab = [b[0] - a[0], b[1] - a[1]];
        let ac = [c[0] - a[0], c[1] - a[1]];
        let cross_z = ab[0] * ac[1] - ab[1] * ac[0];
        assert!(cross_z < 0.0);
    }

    #[test]
    fn square_is_two_triangles_scaled_by_aspect() {
        let mesh = square_mesh(2.0);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(indices_of(&mesh), vec![0, 1, 2, 0, 2, 3]);
        let top_left = vertices_of(&mesh)[0];
        assert_eq!(top_left.position, [-0.25, 0.5, 0.0]);
    }

    #[test]
    fn textured_triangle_spans_the_whole_texture() {
        let triangle = textured_triangle(1.0);
        let uvs: Vec<[f32; 2]> = triangle.iter().map(|vertex| vertex.uv).collect();
        assert_eq!(uvs, vec![[0.5, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    }
}
