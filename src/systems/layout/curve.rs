// curve sampling for ring outlines and the river

use std::f32::consts::TAU;

use bevy::prelude::*;

/// Samples a full circle of `radius` around the origin on the layout plane.
/// # Returns `divisions + 1` points, the last one repeats the first to close the loop.
pub fn ring_outline(radius: f32, divisions: usize) -> Vec<Vec3> {
    let divisions = divisions.max(1);
    let mut points: Vec<Vec3> = (0..divisions)
        .map(|i| {
            let angle = i as f32 / divisions as f32 * TAU;
            Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0)
        })
        .collect();
    points.push(points[0]);
    points
}

/// Samples a Catmull-Rom curve through every control point.
/// The end tangents are extrapolated by mirroring the neighbouring point.
/// # Returns `divisions + 1` points evenly spaced in curve parameter.
pub fn catmull_rom_points(points: &[Vec3], divisions: usize) -> Vec<Vec3> {
    let divisions = divisions.max(1);
    match points {
        [] => return Vec::new(),
        [single] => return vec![*single; divisions + 1],
        _ => {}
    }

    let last = points.len() - 1;
    (0..=divisions)
        .map(|i| {
            let t = i as f32 / divisions as f32;
            let scaled = t * last as f32;
            let mut segment = scaled.floor() as usize;
            let mut weight = scaled - segment as f32;
            if segment >= last {
                segment = last - 1;
                weight = 1.0;
            }

            let p1 = points[segment];
            let p2 = points[segment + 1];
            let p0 = if segment > 0 { points[segment - 1] } else { 2.0 * p1 - p2 };
            let p3 = if segment + 2 <= last { points[segment + 2] } else { 2.0 * p2 - p1 };

            catmull_rom(p0, p1, p2, p3, weight)
        })
        .collect()
}

fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;

    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_is_closed_and_on_the_circle() {
        let points = ring_outline(50.0, 32);
        assert_eq!(points.len(), 33);
        assert_eq!(points.first(), points.last());
        for p in &points {
            assert!((p.length() - 50.0).abs() < 1e-3);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn curve_passes_through_control_points() {
        let control = [
            Vec3::new(-100.0, 20.0, 0.0),
            Vec3::new(5.0, -30.0, 0.0),
            Vec3::new(40.0, 100.0, 0.0),
        ];
        let samples = catmull_rom_points(&control, 32);
        assert_eq!(samples.len(), 33);
        assert!(samples[0].distance(control[0]) < 1e-3);
        assert!(samples[16].distance(control[1]) < 1e-3);
        assert!(samples[32].distance(control[2]) < 1e-3);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(catmull_rom_points(&[], 8).is_empty());
        let single = catmull_rom_points(&[Vec3::ONE], 4);
        assert_eq!(single, vec![Vec3::ONE; 5]);
    }
}
