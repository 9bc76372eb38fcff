use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::*;
use crate::systems::layout::{self, CellColor, CityLayout, LayoutError};
use crate::systems::ui::{Is3D, LayerVisibility};
use super::buildings::ShapeGrammar;
use super::poly::{mesh_gen, utils};
use super::*;

// entity hierarchy components
#[derive(Component)]
pub struct City {
    pub seed: u64,
}

#[derive(Component)]
pub struct RingRoad {
    pub ring_id: usize,
}

#[derive(Component)]
pub struct DivisionPanel {
    pub ring_id: usize,
    pub slot: usize,
}

#[derive(Component)]
pub struct Building {
    pub id: u32,
    pub cell_index: usize,
}

fn srgb(color: [f32; 3]) -> Color {
    Color::srgb(color[0], color[1], color[2])
}

// flat city surfaces are visible from both sides
fn flat_material(color: [f32; 3]) -> StandardMaterial {
    StandardMaterial {
        base_color: srgb(color),
        perceptual_roughness: 0.95,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}

pub fn build_layout(seed: u64, params: &CityParams) -> Result<CityLayout, LayoutError> {
    layout::generate_seeded(&params.layout, seed)
}

/// Spawns the render entities for a finished layout under one `City` root.
///
/// # Returns
/// The number of buildings placed
pub fn spawn_city(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    seed: u64,
    params: &CityParams,
    city_layout: &CityLayout,
    layers: &LayerVisibility,
    is_3d: bool,
) -> usize {
    let city_entity = commands.spawn((
        City { seed },
        Transform::default(),
        Visibility::default(),
    )).id();

    let mut children = Vec::new();

    // ground plane, slightly below the streets
    let dim = city_layout.site.base_dim();
    children.push(commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(dim, dim))),
        MeshMaterial3d(materials.add(flat_material(BASE_COLOR))),
        Transform::from_xyz(0.0, -0.1, 0.0),
    )).id());

    let street_material = materials.add(flat_material(STREET_COLOR));

    if layers.ring_roads {
        let half_width = params.layout.ring_width / 2.0;
        for ring in &city_layout.rings {
            let mesh = mesh_gen::annulus(
                ring.radius - half_width,
                ring.radius + half_width,
                params.layout.ring_points,
                0.0,
            );
            children.push(commands.spawn((
                RingRoad { ring_id: ring.id },
                Mesh3d(meshes.add(mesh)),
                MeshMaterial3d(street_material.clone()),
                Transform::from_xyz(0.0, 0.01, 0.0),
            )).id());
        }
    }

    if layers.division_panels {
        // spans one ring gap plus the road width on each end, minus a hair
        let length = params.layout.ring_spacing() + params.layout.division_width - 1.0;
        for division in city_layout.divisions() {
            let panel = utils::division_panel(division, params.layout.division_width, length);
            children.push(commands.spawn((
                DivisionPanel { ring_id: division.ring_id, slot: division.slot },
                Mesh3d(meshes.add(mesh_gen::polygon_to_flat(&panel, 0.0))),
                MeshMaterial3d(street_material.clone()),
                Transform::from_xyz(0.0, 0.02, 0.0),
            )).id());
        }
    }

    let building_count = if layers.buildings {
        let buildings = spawn_buildings(commands, meshes, materials, seed, params, city_layout, is_3d);
        let count = buildings.len();
        children.extend(buildings);
        count
    } else {
        0
    };

    commands.entity(city_entity).add_children(&children);

    building_count
}

// hands every other accepted cell to the shape grammar
fn spawn_buildings(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    seed: u64,
    params: &CityParams,
    city_layout: &CityLayout,
    is_3d: bool,
) -> Vec<Entity> {
    let light = materials.add(flat_material(LIGHT_BUILDING_COLOR));
    let dark = materials.add(flat_material(DARK_BUILDING_COLOR));

    let mut grammar = ShapeGrammar::new(params.buildings, params.layout.cell_dim);
    let mut building_entities = Vec::new();
    let mut building_id = 0;

    for (cell_index, cell) in city_layout.cells.iter().enumerate() {
        if cell_index % 2 == 0 {
            continue;
        }

        // per-cell rng so one building never shifts another
        let mut cell_rng = StdRng::seed_from_u64(seed.wrapping_add(cell_index as u64));
        grammar.set_state(cell);
        let parts = grammar.generate(&mut cell_rng);
        if parts.is_empty() {
            continue;
        }

        let material = match cell.color {
            CellColor::Light => light.clone(),
            CellColor::Dark => dark.clone(),
        };

        let mut part_entities = Vec::new();
        for part in &parts {
            let mesh = if is_3d {
                mesh_gen::polygon_to_building(&part.footprint, part.base, part.height)
            } else if part.base == 0.0 {
                mesh_gen::polygon_to_flat(&part.footprint, 0.03)
            } else {
                // upper tiers would only overdraw the footprint in 2D
                continue;
            };

            part_entities.push(commands.spawn((
                Mesh3d(meshes.add(mesh)),
                MeshMaterial3d(material.clone()),
                Transform::default(),
            )).id());
        }

        let building_entity = commands.spawn((
            Building { id: building_id, cell_index },
            Transform::default(),
            Visibility::default(),
        )).id();
        commands.entity(building_entity).add_children(&part_entities);

        building_entities.push(building_entity);
        building_id += 1;
    }

    building_entities
}

pub fn handle_regeneration(
    mut commands: Commands,
    mut events: EventReader<RegenerateEvent>,
    mut generated: EventWriter<CityGeneratedEvent>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut seed: ResMut<Seed>,
    params: Res<CityParams>,
    mut data: ResMut<CityLayoutData>,
    layers: Res<LayerVisibility>,
    is_3d: Res<Is3D>,
    query: Query<Entity, With<City>>,
) {
    // several slider changes in one frame collapse into a single rebuild
    let Some(event_seed) = events.read().last().map(|event| event.seed) else {
        return;
    };
    seed.0 = event_seed;

    let city_layout = match build_layout(event_seed, &params) {
        Ok(city_layout) => city_layout,
        Err(err) => {
            // keep the previous city on screen
            warn!("city generation failed for seed {}: {}", event_seed, err);
            data.last_error = Some(err);
            return;
        }
    };

    // cleanup existing city, children are also handled automatically
    for entity in query.iter() {
        commands.entity(entity).try_despawn();
    }

    let building_count = spawn_city(
        &mut commands,
        &mut meshes,
        &mut materials,
        event_seed,
        &params,
        &city_layout,
        &layers,
        is_3d.0,
    );

    let summary = CityGeneratedEvent {
        seed: event_seed,
        rings: city_layout.rings.len(),
        divisions: city_layout.division_count(),
        cells: city_layout.cells.len(),
        buildings: building_count,
    };
    info!(
        "city generated (seed {}): {} rings, {} divisions, {} segments, {} cells, {} buildings",
        summary.seed,
        summary.rings,
        summary.divisions,
        city_layout.segment_count(),
        summary.cells,
        summary.buildings
    );

    data.layout = Some(city_layout);
    data.last_error = None;
    data.building_count = building_count;
    generated.write(summary);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_layout() {
        let params = CityParams::default();
        let a = build_layout(99, &params).expect("default params are valid");
        let b = build_layout(99, &params).expect("default params are valid");
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_params_surface_the_error() {
        let mut params = CityParams::default();
        params.layout.cell_dim = 0.0;
        assert_eq!(build_layout(1, &params), Err(LayoutError::NonPositiveCellDim(0.0)));
    }
}
