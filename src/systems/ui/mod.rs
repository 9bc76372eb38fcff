use bevy::prelude::*;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin}; // fps
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};
use crate::systems::mesh::{Seed, CityParams, CityLayoutData, RegenerateEvent};

pub mod indicator;

pub use indicator::{GenerationToast, update_generation_toast, render_generation_toast};

// segment bounding boxes, the debug overlay
#[derive(Resource)]
pub struct GizmosVisible(pub bool);

#[derive(Resource)]
pub struct Is3D(pub bool);

// which parts of the city are drawn
// mesh layers need a rebuild when toggled, gizmo layers don't
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct LayerVisibility {
    pub ring_roads: bool,
    pub ring_lines: bool,
    pub division_panels: bool,
    pub division_lines: bool,
    pub river: bool,
    pub buildings: bool,
    pub lattice: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            ring_roads: true,
            ring_lines: true,
            division_panels: true,
            division_lines: true,
            river: true,
            buildings: true,
            lattice: false,
        }
    }
}

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        assert!(app.is_plugin_added::<EguiPlugin>());
        app
            .insert_resource(GizmosVisible(false))
            .insert_resource(Is3D(true))
            .insert_resource(LayerVisibility::default())
            .insert_resource(GenerationToast::default())
            .add_systems(Update, (key_input, update_generation_toast))
            .add_systems(EguiPrimaryContextPass, (ui_main, fps, render_generation_toast)); // UI rendering here
    }
}

fn key_input(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut gizmos_visible: ResMut<GizmosVisible>,
    current_seed: Res<Seed>,
    mut regen_events: EventWriter<RegenerateEvent>,
) {
    if keyboard_input.just_pressed(KeyCode::Tab) {
        gizmos_visible.0 = !gizmos_visible.0;
    }

    if keyboard_input.just_pressed(KeyCode::KeyR) {
        regen_events.write(RegenerateEvent { seed: current_seed.0 });
    }
}

fn ui_main(
    mut contexts: EguiContexts,
    current_seed: Res<Seed>,
    mut params: ResMut<CityParams>,
    mut regen_events: EventWriter<RegenerateEvent>,
    mut is_3d: ResMut<Is3D>,
    mut layers: ResMut<LayerVisibility>,
    mut gizmos_visible: ResMut<GizmosVisible>,
    layout_data: Res<CityLayoutData>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::SidePanel::left("config_panel")
            .default_width(200.0)
            .min_width(250.0)
            .max_width(400.0)
            .resizable(true)
            .show(ctx, |ui| {
                let mut regenerate = false;

                // camera
                ui.label("Camera: ");
                ui.label("WASD - Move");
                ui.label("Scroll - Zoom");
                ui.label("MMB - Rotate");

                ui.separator();

                // layer toggles
                ui.label("Layer Visibility:");
                regenerate |= ui.checkbox(&mut is_3d.0, "3D")
                    .on_hover_text("Toggle between 2D footprint view and 3D buildings")
                    .changed();
                ui.horizontal(|ui| {
                    regenerate |= ui.checkbox(&mut layers.ring_roads, "Ring roads").changed();
                    ui.checkbox(&mut layers.ring_lines, "Ring lines");
                });
                ui.horizontal(|ui| {
                    regenerate |= ui.checkbox(&mut layers.division_panels, "Spoke roads").changed();
                    ui.checkbox(&mut layers.division_lines, "Spoke lines");
                });
                ui.horizontal(|ui| {
                    regenerate |= ui.checkbox(&mut layers.buildings, "Buildings").changed();
                    ui.checkbox(&mut layers.river, "River");
                });
                ui.horizontal(|ui| {
                    ui.checkbox(&mut layers.lattice, "Cell lattice");
                    ui.checkbox(&mut gizmos_visible.0, "Segments (TAB)");
                });

                ui.separator();

                ui.label("Generation Parameters:");

                // seed
                egui::CollapsingHeader::new("Seed")
                    .default_open(true)
                    .show(ui, |ui| {
                    ui.label(format!("Current: {}", current_seed.0));
                    ui.horizontal(|ui| {
                        if ui.button("Regenerate").clicked() {
                            let new_seed = rand::random();
                            regen_events.write(RegenerateEvent { seed: new_seed });
                        }
                        if ui.button("Rebuild (R)")
                            .on_hover_text("Rebuild with the current seed")
                            .clicked() {
                            regenerate = true;
                        }
                    });
                });

                // site and rings
                egui::CollapsingHeader::new("Rings")
                    .default_open(true)
                    .show(ui, |ui| {
                    let layout = &mut params.layout;
                    regenerate |= ui.add(egui::Slider::new(&mut layout.base_dim, 60.0..=400.0)
                        .text("Site Size"))
                        .on_hover_text("Side length of the square site.")
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut layout.num_rings, 1..=8)
                        .text("Ring Count"))
                        .on_hover_text("Number of concentric ring roads.")
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut layout.ring_points, 8..=96)
                        .text("Ring Resolution"))
                        .on_hover_text("Points per ring outline.")
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut layout.ring_width, 1.0..=10.0)
                        .text("Ring Width"))
                        .changed();
                });

                // spokes
                egui::CollapsingHeader::new("Divisions")
                    .default_open(true)
                    .show(ui, |ui| {
                    let layout = &mut params.layout;
                    regenerate |= ui.add(egui::Slider::new(&mut layout.num_divisions, 0..=24)
                        .text("Spoke Slots"))
                        .on_hover_text("Angular slots around the center. Each slot draws its own depth.")
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut layout.division_width, 1.0..=10.0)
                        .text("Spoke Width"))
                        .changed();
                });

                // cells
                egui::CollapsingHeader::new("Cells")
                    .default_open(true)
                    .show(ui, |ui| {
                    let layout = &mut params.layout;
                    regenerate |= ui.add(egui::Slider::new(&mut layout.cell_dim, 3.0..=20.0)
                        .text("Cell Size"))
                        .on_hover_text("Lattice step between building cells.")
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut layout.border_margin, 0.0..=20.0)
                        .text("Border Margin"))
                        .on_hover_text("No cells this close to the site edge.")
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut layout.division_tolerance, 0.0..=5.0)
                        .text("Spoke Clearance"))
                        .on_hover_text("Slack used when rejecting cells on a spoke.")
                        .changed();

                    let mut custom_ring_tolerance = layout.ring_tolerance.is_some();
                    if ui.checkbox(&mut custom_ring_tolerance, "Custom ring clearance")
                        .on_hover_text("Defaults to the cell size.")
                        .changed() {
                        layout.ring_tolerance = custom_ring_tolerance.then_some(layout.cell_dim);
                        regenerate = true;
                    }
                    if let Some(tolerance) = layout.ring_tolerance.as_mut() {
                        regenerate |= ui.add(egui::Slider::new(tolerance, 0.0..=20.0)
                            .text("Ring Clearance"))
                            .changed();
                    }
                });

                // river
                egui::CollapsingHeader::new("River")
                    .default_open(false)
                    .show(ui, |ui| {
                    regenerate |= ui.add(egui::Slider::new(&mut params.layout.river_points, 2..=96)
                        .text("Curve Resolution"))
                        .changed();
                });

                // buildings
                egui::CollapsingHeader::new("Buildings")
                    .default_open(false)
                    .show(ui, |ui| {
                    const MARGIN: f32 = 1.0;
                    let buildings = &mut params.buildings;

                    regenerate |= ui.add(egui::Slider::new(&mut buildings.min_plot_area, 2.0..=20.0)
                        .text("Min Plot Area"))
                        .on_hover_text("Plots smaller than twice this are not split again.")
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut buildings.split_chaos, 0.0..=1.0)
                        .text("Split Irregularity"))
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut buildings.empty_prob, 0.0..=0.6)
                        .text("Empty Plot Probability"))
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut buildings.max_split_depth, 0..=6)
                        .text("Max Split Depth"))
                        .changed();

                    let max_limit = (buildings.max_height - MARGIN).max(1.0);
                    regenerate |= ui.add(egui::Slider::new(&mut buildings.min_height, 1.0..=max_limit)
                        .text("Min Height"))
                        .changed();
                    let min_limit = (buildings.min_height + MARGIN).min(60.0);
                    regenerate |= ui.add(egui::Slider::new(&mut buildings.max_height, min_limit..=60.0)
                        .text("Max Height"))
                        .on_hover_text("Height reached at the dense center.")
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut buildings.height_jitter, 0.0..=0.5)
                        .text("Height Noise"))
                        .changed();
                });

                ui.separator();

                // stats of the last successful build
                if let Some(layout) = &layout_data.layout {
                    egui::Grid::new("city_stats").num_columns(2).show(ui, |ui| {
                        ui.label("Rings:");
                        ui.label(layout.rings.len().to_string());
                        ui.end_row();
                        ui.label("Divisions:");
                        ui.label(layout.division_count().to_string());
                        ui.end_row();
                        ui.label("Segments:");
                        ui.label(layout.segment_count().to_string());
                        ui.end_row();
                        ui.label("Cells:");
                        ui.label(layout.cells.len().to_string());
                        ui.end_row();
                        ui.label("Buildings:");
                        ui.label(layout_data.building_count.to_string());
                        ui.end_row();
                    });
                }

                if let Some(err) = &layout_data.last_error {
                    ui.label(egui::RichText::new(format!("Invalid parameters: {}", err))
                        .color(egui::Color32::from_rgb(178, 34, 34)));
                }

                ui.separator();
                ui.label("ESC - Exit");

                // triggere regeneration on any parameter change
                if regenerate {
                    regen_events.write(RegenerateEvent { seed: current_seed.0 });
                }
            });
    }
}

fn fps(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Area::new(egui::Id::new("fps_counter"))
            .anchor(egui::Align2::RIGHT_TOP, egui::Vec2::new(-10.0, 10.0))
            .show(ctx, |ui| {
                ui.with_layout(egui::Layout::top_down(egui::Align::RIGHT), |ui| {
                    if let Some(fps_diagnostic) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
                        if let Some(fps) = fps_diagnostic.smoothed() {
                            ui.label(egui::RichText::new(format!("{:.0}", fps))
                                .size(26.0)
                                .color(egui::Color32::WHITE));
                        }
                    }
                });
            });
    }
}
