use super::curve::ring_outline;
use super::{LayoutConfig, Ring};

/// Concentric rings from the site edge inward, evenly spaced.
/// Ring 0 sits on the half-dimension, each following ring one step closer to the center.
pub fn generate_rings(config: &LayoutConfig) -> Vec<Ring> {
    if config.num_rings == 0 {
        return Vec::new();
    }

    let outer = config.site().half_dim();
    let delta = config.ring_spacing();

    (0..config.num_rings)
        .map(|id| {
            let radius = outer - id as f32 * delta;
            Ring {
                id,
                radius,
                outline: ring_outline(radius, config.ring_points),
                divisions: Vec::new(),
                segments: Vec::new(),
            }
        })
        .collect()
}
