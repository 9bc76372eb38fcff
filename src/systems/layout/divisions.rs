use std::f32::consts::TAU;

use bevy::prelude::*;

use super::{BoundingBox, Division, LayoutConfig, LayoutRng, Ring, Segment, Site};

/// Adds radial divisions to the rings.
///
/// Each of the `num_divisions` angular slots draws a spoke depth in `[0, num_rings]`
/// and lays one division on each of the outermost `depth` rings. The spoke
/// direction starts straight up and is rotated by one slot angle after every slot.
///
/// # Returns
/// New rings carrying their divisions and the derived segment boxes.
pub fn generate_divisions<R: LayoutRng + ?Sized>(
    rings: &[Ring],
    config: &LayoutConfig,
    rng: &mut R,
) -> Vec<Ring> {
    let spokes = generate_spokes(&config.site(), rings.len(), config.num_divisions, rng);

    rings
        .iter()
        .map(|ring| {
            let divisions: Vec<Division> = spokes
                .iter()
                .filter(|division| division.ring_id == ring.id)
                .cloned()
                .collect();
            let segments = compute_segments(&divisions);

            Ring {
                id: ring.id,
                radius: ring.radius,
                outline: ring.outline.clone(),
                divisions,
                segments,
            }
        })
        .collect()
}

fn generate_spokes<R: LayoutRng + ?Sized>(
    site: &Site,
    num_rings: usize,
    num_divisions: usize,
    rng: &mut R,
) -> Vec<Division> {
    if num_rings == 0 || num_divisions == 0 {
        return Vec::new();
    }

    let theta = TAU / num_divisions as f32;
    let step = Quat::from_rotation_z(theta);
    let ring_count = num_rings as f32;

    let mut direction = Vec3::new(0.0, site.half_dim(), 0.0);
    let mut divisions = Vec::new();

    for slot in 0..num_divisions {
        let depth = rng.rand_int(0, num_rings as i32).max(0) as usize;

        for ring_id in 0..depth.min(num_rings) {
            divisions.push(Division {
                ring_id,
                slot,
                point_a: direction * (1.0 - ring_id as f32 / ring_count),
                point_b: direction * (1.0 - (ring_id + 1) as f32 / ring_count),
                angle: theta * slot as f32,
            });
        }

        direction = step * direction;
    }

    divisions
}

/// Pairs every division with its cyclic successor and boxes the four endpoints.
/// An empty list gives no segments, a single division is paired with itself.
pub fn compute_segments(divisions: &[Division]) -> Vec<Segment> {
    let count = divisions.len();

    (0..count)
        .filter_map(|k| {
            let a = &divisions[k];
            let b = &divisions[(k + 1) % count];
            let corners = [a.point_a, a.point_b, b.point_a, b.point_b].map(|p| p.truncate());
            BoundingBox::from_points(&corners).map(|bounding_box| Segment { bounding_box })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::systems::layout::generate_rings;
    use crate::systems::layout::random::scripted::ScriptedRng;

    fn config() -> LayoutConfig {
        LayoutConfig { base_dim: 200.0, num_rings: 4, num_divisions: 12, ..default() }
    }

    #[test]
    fn division_endpoints_scale_with_ring_index() {
        let config = config();
        let rings = generate_rings(&config);
        let mut rng = StdRng::seed_from_u64(42);
        let rings = generate_divisions(&rings, &config, &mut rng);

        for ring in &rings {
            for division in &ring.divisions {
                assert_eq!(division.ring_id, ring.id);
                let j = ring.id as f32;
                let expected_a = 100.0 * (1.0 - j / 4.0);
                let expected_b = 100.0 * (1.0 - (j + 1.0) / 4.0);
                assert!((division.point_a.length() - expected_a).abs() < 1e-3);
                assert!((division.point_b.length() - expected_b).abs() < 1e-3);
                assert!(division.point_a.length() >= division.point_b.length());
            }
        }
    }

    #[test]
    fn spokes_are_contiguous_from_the_outer_ring() {
        let config = config();
        let rings = generate_rings(&config);
        let mut rng = ScriptedRng::new(&[4, 0, 2, 1], &[]);
        let rings = generate_divisions(&rings, &config, &mut rng);

        let slots_on = |ring: usize| -> Vec<usize> {
            rings[ring].divisions.iter().map(|d| d.slot).collect()
        };
        assert_eq!(slots_on(0), vec![0, 2, 3]);
        assert_eq!(slots_on(1), vec![0, 2]);
        assert_eq!(slots_on(2), vec![0]);
        assert_eq!(slots_on(3), vec![0]);
    }

    #[test]
    fn slot_angles_and_directions_follow_rotation() {
        let config = config();
        let rings = generate_rings(&config);
        let mut rng = ScriptedRng::new(&[1; 12], &[]);
        let rings = generate_divisions(&rings, &config, &mut rng);

        let outer = &rings[0].divisions;
        assert_eq!(outer.len(), 12);
        let theta = TAU / 12.0;
        for division in outer {
            assert!((division.angle - theta * division.slot as f32).abs() < 1e-5);
            // spoke at angle a points at (-sin a, cos a)
            let expected = Vec3::new(-division.angle.sin(), division.angle.cos(), 0.0) * 100.0;
            assert!(division.point_a.distance(expected) < 1e-2);
        }
    }

    #[test]
    fn zero_depth_slots_contribute_nothing() {
        let config = config();
        let rings = generate_rings(&config);
        let mut rng = ScriptedRng::new(&[0; 12], &[]);
        let rings = generate_divisions(&rings, &config, &mut rng);

        assert!(rings.iter().all(|r| r.divisions.is_empty()));
        assert!(rings.iter().all(|r| r.segments.is_empty()));
    }

    #[test]
    fn single_division_forms_its_own_segment() {
        let config = config();
        let rings = generate_rings(&config);
        let mut draws = vec![0; 12];
        draws[3] = 1;
        let mut rng = ScriptedRng::new(&draws, &[]);
        let rings = generate_divisions(&rings, &config, &mut rng);

        let ring = &rings[0];
        assert_eq!(ring.divisions.len(), 1);
        assert_eq!(ring.segments.len(), 1);
        let division = &ring.divisions[0];
        let bbox = ring.segments[0].bounding_box;
        assert!(bbox.contains(division.point_a.truncate()));
        assert!(bbox.contains(division.point_b.truncate()));
    }

    #[test]
    fn segments_wrap_around_cyclically() {
        let config = config();
        let rings = generate_rings(&config);
        let mut rng = StdRng::seed_from_u64(9);
        let rings = generate_divisions(&rings, &config, &mut rng);

        for ring in &rings {
            let n = ring.divisions.len();
            assert_eq!(ring.segments.len(), n);
            for (k, segment) in ring.segments.iter().enumerate() {
                let a = &ring.divisions[k];
                let b = &ring.divisions[(k + 1) % n];
                for p in [a.point_a, a.point_b, b.point_a, b.point_b] {
                    assert!(segment.bounding_box.contains(p.truncate()));
                }
            }
        }
    }

    #[test]
    fn no_draws_without_slots() {
        let config = LayoutConfig { num_divisions: 0, ..config() };
        let rings = generate_rings(&config);
        let mut rng = ScriptedRng::new(&[4], &[]);
        let rings = generate_divisions(&rings, &config, &mut rng);

        assert!(rings.iter().all(|r| r.divisions.is_empty()));
        assert_eq!(rng.ints.len(), 1);
    }

    #[test]
    fn compute_segments_on_empty_list() {
        assert!(compute_segments(&[]).is_empty());
    }
}
