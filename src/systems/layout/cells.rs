use bevy::prelude::*;

use super::{Cell, CellColor, Division, LayoutConfig, LayoutRng, Ring};

/// Read-only exclusion test over finished rings and divisions.
pub struct CellExclusion<'a> {
    rings: &'a [Ring],
    half_dim: f32,
    ring_tolerance: f32,
    division_tolerance: f32,
    border_margin: f32,
}

impl<'a> CellExclusion<'a> {
    pub fn new(rings: &'a [Ring], config: &LayoutConfig) -> Self {
        Self {
            rings,
            half_dim: config.site().half_dim(),
            ring_tolerance: config.ring_tolerance(),
            division_tolerance: config.division_tolerance,
            border_margin: config.border_margin,
        }
    }

    /// within one tolerance band of any ring road
    pub fn near_ring(&self, point: Vec3) -> bool {
        let distance = point.length();
        self.rings
            .iter()
            .any(|ring| (distance - ring.radius).abs() < self.ring_tolerance)
    }

    pub fn near_division(&self, point: Vec3) -> bool {
        self.rings
            .iter()
            .flat_map(|ring| ring.divisions.iter())
            .any(|division| division_slack(point, division) < self.division_tolerance)
    }

    pub fn near_border(&self, point: Vec3) -> bool {
        self.half_dim - point.x.abs() < self.border_margin
            || self.half_dim - point.y.abs() < self.border_margin
    }

    pub fn rejects(&self, point: Vec3) -> bool {
        self.near_border(point) || self.near_ring(point) || self.near_division(point)
    }
}

/// How much longer the detour through `point` is than the division itself.
/// Zero on the segment, growing as the point moves away from it.
pub fn division_slack(point: Vec3, division: &Division) -> f32 {
    point.distance(division.point_a) + point.distance(division.point_b)
        - division.point_a.distance(division.point_b)
}

/// Lattice coordinates in `[-half, half)` with the given step.
pub fn lattice_coordinates(half: f32, step: f32) -> Vec<f32> {
    if !(step > 0.0) || !(half > 0.0) {
        return Vec::new();
    }

    let count = (2.0 * half / step).ceil() as usize;
    (0..count)
        .map(|i| -half + i as f32 * step)
        .take_while(|v| *v < half)
        .collect()
}

/// Scans the lattice (x outer, y inner) and keeps the cells that clear every exclusion test.
/// One color draw is made per accepted cell, rejected candidates draw nothing.
pub fn generate_cells<R: LayoutRng + ?Sized>(
    rings: &[Ring],
    config: &LayoutConfig,
    rng: &mut R,
) -> Vec<Cell> {
    let site = config.site();
    let exclusion = CellExclusion::new(rings, config);
    let axis = lattice_coordinates(site.half_dim(), config.cell_dim);

    let mut cells = Vec::new();
    for &x in &axis {
        for &y in &axis {
            let position = Vec3::new(x, y, 0.0);
            if exclusion.rejects(position) {
                continue;
            }

            cells.push(Cell {
                position,
                density: site.density_at(position),
                color: CellColor::from_flag(rng.rand_int(0, 1)),
            });
        }
    }

    cells
}
