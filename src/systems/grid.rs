use bevy::prelude::*;
use bevy::render::camera::Camera;
use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};

use crate::systems::layout::cells::lattice_coordinates;
use crate::systems::mesh::{CityLayoutData, CityParams};
use crate::systems::mesh::poly::utils::to_world;
use crate::systems::ui::LayerVisibility;

// reference grid around the camera, plus the site border and cell lattice overlay
pub struct GridPlugin;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct GridGizmoGroup;

impl Plugin for GridPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(GridConfig::default())
            .init_gizmo_group::<GridGizmoGroup>()
            .add_systems(Startup, setup_gizmos)
            .add_systems(Update, (draw_grid, draw_site));
    }
}

// setting theese parameters as a resource allows for runtime modifications
#[derive(Resource)]
pub struct GridConfig {
    pub spacing: f32,
    pub color: Color,
    pub border_color: Color,
    pub candidate_color: Color,
    pub cell_color: Color,
    pub grid_size: f32,
    pub enabled: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spacing: 10.0,
            color: Color::srgba(0.5, 0.5, 0.5, 0.12),
            border_color: Color::srgba(0.9, 0.9, 0.9, 0.6),
            candidate_color: Color::srgba(0.6, 0.2, 0.2, 0.5),
            cell_color: Color::srgba(0.9, 0.9, 0.3, 0.8),
            grid_size: 400.0,
            enabled: true,
        }
    }
}

fn setup_gizmos(
    mut config_store: ResMut<GizmoConfigStore>
) {
    let (config, _) = config_store.config_mut::<GridGizmoGroup>();
    config.depth_bias = 0.1; // render depth
}

/// Positions of the grid lines covering `[min, max]`, snapped to multiples of `spacing`.
pub fn grid_lines(min: f32, max: f32, spacing: f32) -> Vec<f32> {
    if !(spacing > 0.0) || max < min {
        return Vec::new();
    }

    let first = (min / spacing).floor() as i64;
    let last = (max / spacing).floor() as i64;
    (first..=last).map(|i| i as f32 * spacing).collect()
}

fn draw_grid(
    mut gizmos: Gizmos<GridGizmoGroup>,
    config: Res<GridConfig>,
    camera_query: Query<&Transform, With<Camera>>,
) {
    if !config.enabled {
        return;
    }

    let Ok(camera_transform) = camera_query.single() else {
        return;
    };

    // grid bounds follow the camera
    let center = camera_transform.translation;
    let min_x = center.x - config.grid_size;
    let max_x = center.x + config.grid_size;
    let min_z = center.z - config.grid_size;
    let max_z = center.z + config.grid_size;

    for x in grid_lines(min_x, max_x, config.spacing) {
        gizmos.line(Vec3::new(x, -0.2, min_z), Vec3::new(x, -0.2, max_z), config.color);
    }
    for z in grid_lines(min_z, max_z, config.spacing) {
        gizmos.line(Vec3::new(min_x, -0.2, z), Vec3::new(max_x, -0.2, z), config.color);
    }
}

fn square_outline(center: Vec3, half: f32) -> [Vec3; 5] {
    [
        center + Vec3::new(-half, -half, 0.0),
        center + Vec3::new(half, -half, 0.0),
        center + Vec3::new(half, half, 0.0),
        center + Vec3::new(-half, half, 0.0),
        center + Vec3::new(-half, -half, 0.0),
    ]
}

// site border always, candidate lattice and accepted cells on demand
fn draw_site(
    mut gizmos: Gizmos<GridGizmoGroup>,
    config: Res<GridConfig>,
    params: Res<CityParams>,
    data: Res<CityLayoutData>,
    layers: Res<LayerVisibility>,
) {
    let Some(layout) = &data.layout else {
        return;
    };

    let half = layout.site.half_dim();
    gizmos.linestrip(
        square_outline(Vec3::ZERO, half).into_iter().map(|p| to_world(p, 0.04)),
        config.border_color,
    );

    if !layers.lattice {
        return;
    }

    // every candidate, accepted or not
    let coords = lattice_coordinates(half, params.layout.cell_dim);
    let mark = params.layout.cell_dim * 0.1;
    for &x in &coords {
        for &y in &coords {
            let p = to_world(Vec3::new(x, y, 0.0), 0.04);
            gizmos.line(p - Vec3::X * mark, p + Vec3::X * mark, config.candidate_color);
            gizmos.line(p - Vec3::Z * mark, p + Vec3::Z * mark, config.candidate_color);
        }
    }

    let cell_half = params.layout.cell_dim * 0.4;
    for cell in &layout.cells {
        gizmos.linestrip(
            square_outline(cell.position, cell_half).into_iter().map(|p| to_world(p, 0.05)),
            config.cell_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_lines_snap_to_spacing() {
        assert_eq!(grid_lines(-15.0, 12.0, 10.0), vec![-20.0, -10.0, 0.0, 10.0]);
    }

    #[test]
    fn grid_lines_reject_bad_input() {
        assert!(grid_lines(0.0, 10.0, 0.0).is_empty());
        assert!(grid_lines(10.0, 0.0, 1.0).is_empty());
    }

    #[test]
    fn square_outline_is_closed() {
        let outline = square_outline(Vec3::new(3.0, 4.0, 0.0), 1.0);
        assert_eq!(outline[0], outline[4]);
        assert_eq!(outline[2], Vec3::new(4.0, 5.0, 0.0));
    }
}
