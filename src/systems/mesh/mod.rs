// this is the entry point for the city generation plugin
use bevy::prelude::*;

use crate::config::*;
use crate::systems::layout::{CityLayout, LayoutConfig, LayoutError};
use crate::systems::ui::{GizmosVisible, LayerVisibility};

pub mod buildings;
pub mod city;
pub mod poly;

use poly::utils::to_world;

// resources
#[derive(Resource)]
pub struct Seed(pub u64);

// Event for regeneration
#[derive(Event)]
pub struct RegenerateEvent {
    pub seed: u64,
}

// fired once a city has been rebuilt, drives the UI toast
#[derive(Event, Clone, Copy, Debug)]
pub struct CityGeneratedEvent {
    pub seed: u64,
    pub rings: usize,
    pub divisions: usize,
    pub cells: usize,
    pub buildings: usize,
}

// my 2d polygon datatype, on the layout plane
pub type Polygon = Vec<Vec2>;

// shape grammar parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingParams {
    pub lot_inset: f32,
    pub min_plot_area: f32,
    pub split_chaos: f32,
    pub empty_prob: f32,
    pub max_split_depth: usize,
    pub min_height: f32,
    pub max_height: f32,
    pub height_jitter: f32,
    pub tier_setback: f32,
}

impl Default for BuildingParams {
    fn default() -> Self {
        Self {
            lot_inset: LOT_INSET,
            min_plot_area: MIN_PLOT_AREA,
            split_chaos: SPLIT_CHAOS,
            empty_prob: EMPTY_PROB,
            max_split_depth: MAX_SPLIT_DEPTH,
            min_height: MIN_BUILDING_HEIGHT,
            max_height: MAX_BUILDING_HEIGHT,
            height_jitter: HEIGHT_JITTER,
            tier_setback: TIER_SETBACK,
        }
    }
}

// city generation parameters, edited live from the UI
#[derive(Resource, Default, Clone)]
pub struct CityParams {
    pub layout: LayoutConfig,
    pub buildings: BuildingParams,
}

// the last successful layout plus the last failure, if any
#[derive(Resource, Default)]
pub struct CityLayoutData {
    pub layout: Option<CityLayout>,
    pub last_error: Option<LayoutError>,
    pub building_count: usize,
}

// main plugin for generation
pub struct CityGenerationPlugin;

impl Plugin for CityGenerationPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(Seed(INITIAL_SEED))
            .insert_resource(CityParams::default())
            .insert_resource(CityLayoutData::default())

            .add_event::<RegenerateEvent>()
            .add_event::<CityGeneratedEvent>()

            // initial city on start, same path as every regeneration
            .add_systems(Startup, |seed: Res<Seed>, mut events: EventWriter<RegenerateEvent>| {
                events.write(RegenerateEvent { seed: seed.0 });
            })
            .add_systems(Update, (layout_gizmos, city::handle_regeneration));
    }
}

// line work for rings, spokes and the river
fn layout_gizmos(
    mut gizmos: Gizmos,
    data: Res<CityLayoutData>,
    layers: Res<LayerVisibility>,
    debug_visible: Res<GizmosVisible>,
) {
    let Some(layout) = &data.layout else {
        return;
    };

    // a shade above the street meshes so the lines read on top
    let street = Color::srgb(0.12, 0.32, 0.40);

    if layers.ring_lines {
        for ring in &layout.rings {
            gizmos.linestrip(ring.outline.iter().map(|p| to_world(*p, 0.05)), street);
        }
    }

    if layers.division_lines {
        for division in layout.divisions() {
            gizmos.line(to_world(division.point_a, 0.06), to_world(division.point_b, 0.06), street);
        }
    }

    if layers.river {
        let river = Color::srgb(RIVER_COLOR[0], RIVER_COLOR[1], RIVER_COLOR[2]);
        // thick line effect with multiple parallel lines
        for offset in [-0.3, 0.0, 0.3] {
            gizmos.linestrip(
                layout.river.samples.iter().map(|p| to_world(*p, 0.08) + Vec3::new(offset, 0.0, offset)),
                river,
            );
        }
        for point in &layout.river.control_points {
            gizmos.sphere(to_world(*point, 0.1), 1.2, river);
        }
    }

    // segment bounding boxes, debug only
    if debug_visible.0 {
        let colors = [
            Color::srgba(1.0, 0.5, 0.0, 0.7),
            Color::srgba(1.0, 1.0, 0.0, 0.7),
            Color::srgba(0.53, 0.18, 0.85, 0.7),
            Color::srgba(0.0, 1.0, 0.0, 0.7),
        ];
        for ring in &layout.rings {
            let color = colors[ring.id % colors.len()];
            for segment in &ring.segments {
                let bbox = segment.bounding_box;
                let corners = [
                    Vec3::new(bbox.min.x, bbox.min.y, 0.0),
                    Vec3::new(bbox.max.x, bbox.min.y, 0.0),
                    Vec3::new(bbox.max.x, bbox.max.y, 0.0),
                    Vec3::new(bbox.min.x, bbox.max.y, 0.0),
                    Vec3::new(bbox.min.x, bbox.min.y, 0.0),
                ];
                gizmos.linestrip(corners.iter().map(|p| to_world(*p, 0.12)), color);
            }
        }
    }
}
