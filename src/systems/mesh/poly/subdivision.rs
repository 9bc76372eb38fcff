use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::prelude::*;

use crate::systems::mesh::Polygon;
use super::utils::{polygon_area, line_segment_intersection};

/// Controls for the lot splitting rule of the shape grammar
#[derive(Debug, Clone, Copy)]
pub struct SplitRules {
    pub min_area: f32,
    pub chaos: f32,
    pub empty_prob: f32,
    pub max_depth: usize,
}

/// Recursively splits a lot across its longest edge into building plots
///
/// # Returns
/// The plots that survived, possibly empty if every plot was left vacant
pub fn split_lot(
    polygon: &Polygon,
    rules: &SplitRules,
    depth: usize,
    rng: &mut StdRng,
) -> Vec<Polygon> {
    let area = polygon_area(polygon);

    // too deep or too small to cut again
    if depth >= rules.max_depth || area < rules.min_area * 2.0 {
        return keep_or_vacate(polygon, rules, rng);
    }

    let Some(longest_idx) = longest_edge(polygon) else {
        return keep_or_vacate(polygon, rules, rng);
    };

    // cut somewhere around the middle, chaos widens the window
    let spread = 0.8 * rules.chaos;
    let ratio = (1.0 - spread) / 2.0 + rng.random::<f32>() * spread;
    let angle_offset = (rng.random::<f32>() - 0.5) * std::f32::consts::FRAC_PI_6 * rules.chaos;

    let halves = bisect_poly(polygon, longest_idx, ratio, angle_offset);
    if halves.len() < 2 {
        // split failed, treat as final
        return keep_or_vacate(polygon, rules, rng);
    }

    halves
        .iter()
        .flat_map(|half| split_lot(half, rules, depth + 1, rng))
        .collect()
}

fn keep_or_vacate(polygon: &Polygon, rules: &SplitRules, rng: &mut StdRng) -> Vec<Polygon> {
    if rng.random::<f32>() < rules.empty_prob {
        Vec::new()
    } else {
        vec![polygon.clone()]
    }
}

/// index of the vertex that starts the longest edge
pub fn longest_edge(polygon: &Polygon) -> Option<usize> {
    if polygon.len() < 2 {
        return None;
    }

    (0..polygon.len())
        .map(|i| (i, polygon[i].distance(polygon[(i + 1) % polygon.len()])))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Cuts a polygon with a line through a point on one of its edges
/// the line is perpendicular to that edge, tilted by `angle_offset`
///
/// # Returns
/// Two polygons on success, the original polygon otherwise
pub fn bisect_poly(
    polygon: &Polygon,
    start_idx: usize,
    ratio: f32,
    angle_offset: f32,
) -> Vec<Polygon> {
    if polygon.len() < 3 || start_idx >= polygon.len() {
        return vec![polygon.clone()];
    }

    let start_v = polygon[start_idx];
    let next_v = polygon[(start_idx + 1) % polygon.len()];
    let edge_dir = next_v - start_v;
    let cut_point = start_v + edge_dir * ratio;

    let perp = edge_dir.perp().normalize_or_zero();
    if perp == Vec2::ZERO {
        return vec![polygon.clone()];
    }
    let cut_dir = Vec2::from_angle(angle_offset).rotate(perp);

    // long enough to cross the whole polygon
    let (min, max) = polygon
        .iter()
        .fold((Vec2::INFINITY, Vec2::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let extent = (max - min).length();
    let line_start = cut_point - cut_dir * extent;
    let line_end = cut_point + cut_dir * extent;

    let mut intersections: Vec<(usize, Vec2)> = (0..polygon.len())
        .filter_map(|i| {
            let j = (i + 1) % polygon.len();
            line_segment_intersection(line_start, line_end, polygon[i], polygon[j]).map(|p| (i, p))
        })
        .collect();

    // clean split needs exactly 2 crossings
    if intersections.len() != 2 {
        return vec![polygon.clone()];
    }
    intersections.sort_by_key(|&(idx, _)| idx);

    let (idx1, int1) = intersections[0];
    let (idx2, int2) = intersections[1];

    let mut first = vec![int1];
    first.extend_from_slice(&polygon[idx1 + 1..=idx2]);
    first.push(int2);

    let mut second = vec![int2];
    second.extend_from_slice(&polygon[idx2 + 1..]);
    second.extend_from_slice(&polygon[..=idx1]);
    second.push(int1);

    let result: Vec<Polygon> = [first, second]
        .into_iter()
        .filter(|half| half.len() >= 3 && polygon_area(half) > 0.1)
        .collect();

    if result.len() == 2 { result } else { vec![polygon.clone()] }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::systems::mesh::poly::utils::square_lot;

    #[test]
    fn bisect_preserves_area() {
        let lot = square_lot(Vec2::ZERO, 6.0);
        let halves = bisect_poly(&lot, 0, 0.5, 0.0);
        assert_eq!(halves.len(), 2);
        let total: f32 = halves.iter().map(polygon_area).sum();
        assert!((total - 36.0).abs() < 1e-3);
    }

    #[test]
    fn split_respects_min_area() {
        let rules = SplitRules { min_area: 4.0, chaos: 0.3, empty_prob: 0.0, max_depth: 6 };
        let lot = square_lot(Vec2::new(10.0, 10.0), 6.0);
        let mut rng = StdRng::seed_from_u64(8);
        let plots = split_lot(&lot, &rules, 0, &mut rng);

        assert!(plots.len() > 1);
        let total: f32 = plots.iter().map(polygon_area).sum();
        assert!((total - 36.0).abs() < 1e-2);
    }

    #[test]
    fn everything_vacant_when_empty_prob_is_one() {
        let rules = SplitRules { min_area: 4.0, chaos: 0.0, empty_prob: 1.0, max_depth: 3 };
        let lot = square_lot(Vec2::ZERO, 6.0);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(split_lot(&lot, &rules, 0, &mut rng).is_empty());
    }
}
