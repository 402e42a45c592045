use bytemuck::{Pod, Zeroable};
use gridwalk_common::Rect;
use gridwalk_render::{AtlasTile, Billboard, MapMesh};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_right: [f32; 4],
    pub camera_up: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    /// 1.0 on upward faces, which sample the instance's top tile.
    pub top: f32,
}

/// One map cube or quad: cell center plus the atlas tiles it samples.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct MapInstance {
    pub offset: [f32; 3],
    pub side_uv: [f32; 4],
    pub top_uv: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct BillboardVertex {
    pub corner: [f32; 2],
    pub uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct BillboardInstance {
    pub center: [f32; 3],
    pub size: f32,
}

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

fn face(normal: [f32; 3], corners: [[f32; 3]; 4], top: f32) -> [Vertex; 4] {
    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
    std::array::from_fn(|i| Vertex {
        position: corners[i],
        normal,
        uv: uvs[i],
        top,
    })
}

/// Unit cube centered on the origin, 24 vertices so each face has its own UVs.
pub(crate) fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let faces = [
        face([0.0, 0.0, 1.0], [[-p, -p, p], [p, -p, p], [p, p, p], [-p, p, p]], 0.0),
        face([0.0, 0.0, -1.0], [[p, -p, -p], [-p, -p, -p], [-p, p, -p], [p, p, -p]], 0.0),
        face([1.0, 0.0, 0.0], [[p, -p, p], [p, -p, -p], [p, p, -p], [p, p, p]], 0.0),
        face([-1.0, 0.0, 0.0], [[-p, -p, -p], [-p, -p, p], [-p, p, p], [-p, p, -p]], 0.0),
        face([0.0, 1.0, 0.0], [[-p, p, p], [p, p, p], [p, p, -p], [-p, p, -p]], 1.0),
        face([0.0, -1.0, 0.0], [[-p, -p, -p], [p, -p, -p], [p, -p, p], [-p, -p, p]], 0.0),
    ];
    let vertices = faces.concat();
    let indices = (0..6u16)
        .flat_map(|f| QUAD_INDICES.map(|i| f * 4 + i))
        .collect();
    (vertices, indices)
}

/// Horizontal unit quad at local `y = 0`, sampling the top tile.
pub(crate) fn flat_quad_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    let vertices = face(
        [0.0, 1.0, 0.0],
        [[-p, 0.0, p], [p, 0.0, p], [p, 0.0, -p], [-p, 0.0, -p]],
        1.0,
    );
    (vertices.to_vec(), QUAD_INDICES.to_vec())
}

pub(crate) fn billboard_quad() -> (Vec<BillboardVertex>, Vec<u16>) {
    let vertices = vec![
        BillboardVertex { corner: [-0.5, -0.5], uv: [0.0, 1.0] },
        BillboardVertex { corner: [0.5, -0.5], uv: [1.0, 1.0] },
        BillboardVertex { corner: [0.5, 0.5], uv: [1.0, 0.0] },
        BillboardVertex { corner: [-0.5, 0.5], uv: [0.0, 0.0] },
    ];
    (vertices, QUAD_INDICES.to_vec())
}

fn uv(tile: AtlasTile) -> [f32; 4] {
    let Rect {
        x,
        y,
        width,
        height,
    } = tile.uv_rect();
    [x, y, width, height]
}

/// Wall cube instances followed by floor and ceiling quad instances. Returns
/// the instances and the number of walls at the front.
pub(crate) fn map_instances(mesh: &MapMesh) -> (Vec<MapInstance>, u32) {
    let walls = mesh.walls.iter().map(|p| MapInstance {
        offset: p.to_array(),
        side_uv: uv(AtlasTile::Wall),
        top_uv: uv(AtlasTile::Top),
    });
    let floor = mesh.floor.iter().map(|p| MapInstance {
        offset: p.to_array(),
        side_uv: uv(AtlasTile::Floor),
        top_uv: uv(AtlasTile::Floor),
    });
    let ceiling = mesh.ceiling.iter().map(|p| MapInstance {
        offset: p.to_array(),
        side_uv: uv(AtlasTile::Ceiling),
        top_uv: uv(AtlasTile::Ceiling),
    });
    let instances = walls.chain(floor).chain(ceiling).collect();
    (instances, mesh.walls.len() as u32)
}

pub(crate) fn billboard_instance(b: &Billboard) -> BillboardInstance {
    BillboardInstance {
        center: b.position.to_array(),
        size: b.size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn cube_has_one_top_face() {
        let (verts, indices) = cube_mesh();
        assert_eq!(verts.len(), 24);
        assert_eq!(indices.len(), 36);
        assert_eq!(verts.iter().filter(|v| v.top == 1.0).count(), 4);
        assert!(verts.iter().filter(|v| v.top == 1.0).all(|v| v.position[1] == 0.5));
        assert_eq!(*indices.iter().max().unwrap(), 23);
    }

    #[test]
    fn map_instances_put_walls_first() {
        let mesh = MapMesh {
            walls: vec![Vec3::new(0.0, 0.5, 0.0)],
            floor: vec![Vec3::new(1.0, 0.0, 0.0)],
            ceiling: vec![Vec3::new(1.0, 1.0, 0.0)],
        };
        let (instances, walls) = map_instances(&mesh);
        assert_eq!(walls, 1);
        assert_eq!(instances.len(), 3);
        assert_eq!(instances[0].side_uv, [0.0, 0.0, 0.5, 0.5]);
        assert_eq!(instances[0].top_uv, [0.5, 0.0, 0.5, 0.5]);
        assert_eq!(instances[1].top_uv, [0.0, 0.5, 0.5, 0.5]);
        assert_eq!(instances[2].top_uv, [0.5, 0.5, 0.5, 0.5]);
    }

    #[test]
    fn uniforms_are_std140_sized() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 96);
        assert_eq!(std::mem::size_of::<MapInstance>(), 44);
    }
}
