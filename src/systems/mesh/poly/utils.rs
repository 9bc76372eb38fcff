// UTILS

use bevy::prelude::*;
use crate::systems::layout::Division;
use crate::systems::mesh::Polygon;

/// find the intersection between two line segments, lookup Cramer's rule
/// https://cp-algorithms.com/geometry/lines-intersection.html
/// # Returns `Some(Vec2)` if the segments intersect, 'None' otherwise
pub fn line_segment_intersection(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> Option<Vec2> {
    let s1 = p2 - p1;
    let s2 = p4 - p3;

    let denom = s1.perp_dot(s2);

    // parallel lines
    if denom.abs() < 1e-6 {
        return None;
    }

    let offset = p1 - p3;
    let s = s1.perp_dot(offset) / denom;
    let t = s2.perp_dot(offset) / denom;

    if (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t) {
        Some(p1 + t * s1)
    } else {
        None
    }
}

/// Computes the signed area of a polygon, positive for counter-clockwise winding
/// # Returns 0.0 for polygons with fewer than 3 vertices.
pub fn polygon_area(polygon: &Polygon) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }

    let n = polygon.len();
    let twice_area: f32 = (0..n)
        .map(|i| polygon[i].perp_dot(polygon[(i + 1) % n]))
        .sum();

    twice_area / 2.0
}

/// Calculates the centroid of a polygon
/// Falls back to the vertex average for degenerate polygons.
pub fn polygon_centroid(polygon: &Polygon, area: f32) -> Vec2 {
    if polygon.is_empty() {
        return Vec2::ZERO;
    }
    if polygon.len() < 3 || area.abs() < f32::EPSILON {
        return polygon.iter().copied().sum::<Vec2>() / polygon.len() as f32;
    }

    let n = polygon.len();
    let mut centroid = Vec2::ZERO;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        centroid += (a + b) * a.perp_dot(b);
    }

    centroid / (6.0 * area)
}

/// Axis-aligned square lot centred on `center`, counter-clockwise.
pub fn square_lot(center: Vec2, side: f32) -> Polygon {
    let h = side / 2.0;
    vec![
        center + Vec2::new(-h, -h),
        center + Vec2::new(h, -h),
        center + Vec2::new(h, h),
        center + Vec2::new(-h, h),
    ]
}

/// Moves every vertex `distance` towards the centroid.
/// # Returns `None` once the polygon would collapse or flip.
pub fn inset_polygon(polygon: &Polygon, distance: f32) -> Option<Polygon> {
    let area = polygon_area(polygon);
    if polygon.len() < 3 || area <= 0.0 {
        return None;
    }

    let centroid = polygon_centroid(polygon, area);
    let mut inset = Vec::with_capacity(polygon.len());
    for vertex in polygon {
        let to_center = centroid - *vertex;
        let length = to_center.length();
        if length <= distance {
            return None;
        }
        inset.push(*vertex + to_center / length * distance);
    }

    (polygon_area(&inset) > 0.0).then_some(inset)
}

/// Street panel under a division: a `width` x `length` rectangle centred on the
/// division midpoint, its long side rotated to the division angle.
/// Vertices are on the layout plane.
pub fn division_panel(division: &Division, width: f32, length: f32) -> Polygon {
    let center = division.midpoint().truncate();
    let rotation = Vec2::from_angle(division.angle);
    let (hw, hl) = (width / 2.0, length / 2.0);

    [
        Vec2::new(-hw, -hl),
        Vec2::new(hw, -hl),
        Vec2::new(hw, hl),
        Vec2::new(-hw, hl),
    ]
    .into_iter()
    .map(|corner| center + rotation.rotate(corner))
    .collect()
}

/// layout plane (x, y) onto the ground plane (x, height, y)
pub fn to_world(point: Vec3, height: f32) -> Vec3 {
    Vec3::new(point.x, height, point.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_square_area_and_centroid() {
        let square = square_lot(Vec2::new(3.0, -1.0), 2.0);
        let area = polygon_area(&square);
        assert!((area - 4.0).abs() < 1e-5);
        assert!(polygon_centroid(&square, area).distance(Vec2::new(3.0, -1.0)) < 1e-5);
    }

    #[test]
    fn inset_shrinks_until_collapse() {
        let square = square_lot(Vec2::ZERO, 4.0);
        let inset = inset_polygon(&square, 0.5).expect("still a polygon");
        assert!(polygon_area(&inset) < polygon_area(&square));
        assert!(inset_polygon(&square, 10.0).is_none());
    }

    #[test]
    fn panel_follows_division_direction() {
        let angle = std::f32::consts::FRAC_PI_2;
        let direction = Vec3::new(-angle.sin(), angle.cos(), 0.0);
        let division = Division {
            ring_id: 0,
            slot: 3,
            point_a: direction * 100.0,
            point_b: direction * 75.0,
            angle,
        };
        let panel = division_panel(&division, 4.0, 28.0);
        let area = polygon_area(&panel);
        assert!((area - 4.0 * 28.0).abs() < 1e-2);

        // long side lies along the spoke (here the x axis)
        let long_edge = panel[2] - panel[1];
        assert!(long_edge.y.abs() < 1e-3);
        assert!((long_edge.length() - 28.0).abs() < 1e-3);
        assert!(polygon_centroid(&panel, area).distance(Vec2::new(-87.5, 0.0)) < 1e-3);
    }

    #[test]
    fn crossing_segments_intersect() {
        let hit = line_segment_intersection(
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(0.0, 1.0),
        );
        assert!(hit.is_some_and(|p| p.length() < 1e-6));
        assert!(line_segment_intersection(Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::ONE).is_none());
    }
}
