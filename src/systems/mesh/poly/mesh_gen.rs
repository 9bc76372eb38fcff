use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use crate::systems::mesh::Polygon;
use super::utils::{polygon_area, polygon_centroid};

// polygons live on the layout plane, meshes on the ground plane
// (x, y) -> (x, elevation, y)

#[derive(Default)]
struct MeshBuffers {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl MeshBuffers {
    fn vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let idx = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        idx
    }

    // fan around a center vertex, `up` picks the facing
    fn cap(&mut self, polygon: &Polygon, elevation: f32, up: bool) {
        let centroid = polygon_centroid(polygon, polygon_area(polygon));
        let normal = if up { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };

        let (min, max) = polygon
            .iter()
            .fold((Vec2::INFINITY, Vec2::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        let size = (max - min).max(Vec2::splat(f32::EPSILON));
        let uv = |p: Vec2| {
            let t = (p - min) / size;
            [t.x, t.y]
        };

        let center = self.vertex([centroid.x, elevation, centroid.y], normal, uv(centroid));
        let first = self.positions.len() as u32;
        for vertex in polygon {
            self.vertex([vertex.x, elevation, vertex.y], normal, uv(*vertex));
        }

        let n = polygon.len() as u32;
        for i in 0..n {
            let a = first + i;
            let b = first + (i + 1) % n;
            // ccw on the layout plane faces down once y becomes z
            if up {
                self.indices.extend([center, b, a]);
            } else {
                self.indices.extend([center, a, b]);
            }
        }
    }

    fn into_mesh(self) -> Mesh {
        let mut mesh = empty_mesh();
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs);
        mesh.insert_indices(Indices::U32(self.indices));
        mesh
    }
}

fn empty_mesh() -> Mesh {
    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
}

// flat footprint, used for street panels and 2D building plots
pub fn polygon_to_flat(polygon: &Polygon, elevation: f32) -> Mesh {
    if polygon.len() < 3 {
        return empty_mesh();
    }

    let mut buffers = MeshBuffers::default();
    buffers.cap(polygon, elevation, true);
    buffers.into_mesh()
}

// extruded prism from `base` to `base + height`
pub fn polygon_to_building(polygon: &Polygon, base: f32, height: f32) -> Mesh {
    if polygon.len() < 3 {
        return empty_mesh();
    }

    let mut buffers = MeshBuffers::default();
    let top = base + height;

    // walls
    for i in 0..polygon.len() {
        let v1 = polygon[i];
        let v2 = polygon[(i + 1) % polygon.len()];
        let edge = v2 - v1;
        let normal = Vec2::new(edge.y, -edge.x).normalize_or_zero();
        let normal = [normal.x, 0.0, normal.y];
        let edge_length = edge.length();

        let a = buffers.vertex([v1.x, base, v1.y], normal, [0.0, 0.0]);
        let b = buffers.vertex([v2.x, base, v2.y], normal, [edge_length, 0.0]);
        let c = buffers.vertex([v1.x, top, v1.y], normal, [0.0, height]);
        let d = buffers.vertex([v2.x, top, v2.y], normal, [edge_length, height]);

        buffers.indices.extend([a, c, b]);
        buffers.indices.extend([b, c, d]);
    }

    buffers.cap(polygon, base, false);
    buffers.cap(polygon, top, true);
    buffers.into_mesh()
}

// flat ring road between two radii, centred on the origin
pub fn annulus(inner_radius: f32, outer_radius: f32, segments: usize, elevation: f32) -> Mesh {
    let segments = segments.max(3);
    let inner_radius = inner_radius.max(0.0);
    let mut buffers = MeshBuffers::default();

    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let angle = t * std::f32::consts::TAU;
        let (sin, cos) = angle.sin_cos();
        buffers.vertex([cos * inner_radius, elevation, sin * inner_radius], [0.0, 1.0, 0.0], [t, 0.0]);
        buffers.vertex([cos * outer_radius, elevation, sin * outer_radius], [0.0, 1.0, 0.0], [t, 1.0]);
    }

    for i in 0..segments as u32 {
        let inner = i * 2;
        let outer = inner + 1;
        let next_inner = inner + 2;
        let next_outer = inner + 3;
        buffers.indices.extend([inner, next_inner, outer]);
        buffers.indices.extend([outer, next_inner, next_outer]);
    }

    buffers.into_mesh()
}

#[cfg(test)]
mod tests {
    use bevy::render::mesh::VertexAttributeValues;

    use super::*;
    use crate::systems::mesh::poly::utils::square_lot;

    fn vertex_count(mesh: &Mesh) -> usize {
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(values)) => values.len(),
            _ => 0,
        }
    }

    #[test]
    fn building_has_walls_and_caps() {
        let lot = square_lot(Vec2::ZERO, 4.0);
        let mesh = polygon_to_building(&lot, 1.0, 6.0);
        // 4 walls * 4 + 2 caps * (4 + 1)
        assert_eq!(vertex_count(&mesh), 26);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(4 * 6 + 2 * 4 * 3));
    }

    #[test]
    fn degenerate_polygons_give_empty_meshes() {
        let line = vec![Vec2::ZERO, Vec2::X];
        assert_eq!(vertex_count(&polygon_to_flat(&line, 0.0)), 0);
        assert_eq!(vertex_count(&polygon_to_building(&line, 0.0, 3.0)), 0);
    }

    #[test]
    fn annulus_resolution() {
        let mesh = annulus(48.0, 52.0, 32, 0.0);
        assert_eq!(vertex_count(&mesh), 66);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(32 * 6));
    }
}
