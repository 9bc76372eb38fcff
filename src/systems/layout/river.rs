use bevy::prelude::*;

use super::curve::catmull_rom_points;
use super::{LayoutRng, RiverPath, Site};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderEdge {
    Left,
    Right,
    Bottom,
    Top,
}

impl BorderEdge {
    pub fn from_index(index: i32) -> Self {
        match index {
            0 => BorderEdge::Left,
            1 => BorderEdge::Right,
            2 => BorderEdge::Bottom,
            _ => BorderEdge::Top,
        }
    }

    /// places a point on this edge, `along` is the coordinate parallel to the edge
    pub fn point(self, site: &Site, along: f32) -> Vec3 {
        let half = site.half_dim();
        match self {
            BorderEdge::Left => Vec3::new(-half, along, 0.0),
            BorderEdge::Right => Vec3::new(half, along, 0.0),
            BorderEdge::Bottom => Vec3::new(along, -half, 0.0),
            BorderEdge::Top => Vec3::new(along, half, 0.0),
        }
    }
}

fn border_point<R: LayoutRng + ?Sized>(site: &Site, rng: &mut R) -> Vec3 {
    let edge = BorderEdge::from_index(rng.rand_int(0, 3));
    let along = rng.rand_spread(site.base_dim());
    edge.point(site, along)
}

/// `n` random points on the site border, each on a uniformly chosen edge.
pub fn generate_border_points<R: LayoutRng + ?Sized>(n: usize, site: &Site, rng: &mut R) -> Vec<Vec3> {
    (0..n).map(|_| border_point(site, rng)).collect()
}

/// Border point, interior point, border point.
/// Both border points are drawn before the interior one.
pub fn generate_river_control_points<R: LayoutRng + ?Sized>(site: &Site, rng: &mut R) -> [Vec3; 3] {
    let start = border_point(site, rng);
    let end = border_point(site, rng);

    let x = rng.rand_spread(site.base_dim());
    let y = rng.rand_spread(site.base_dim());

    [start, Vec3::new(x, y, 0.0), end]
}

pub fn generate_river<R: LayoutRng + ?Sized>(site: &Site, sample_count: usize, rng: &mut R) -> RiverPath {
    let control_points = generate_river_control_points(site, rng);
    let samples = catmull_rom_points(&control_points, sample_count);

    RiverPath { control_points, samples }
}
