use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use crate::systems::mesh::CityGeneratedEvent;

// fading summary shown after each rebuild
#[derive(Resource)]
pub struct GenerationToast {
    pub summary: Option<CityGeneratedEvent>,
    pub timer: f32,
    pub duration: f32,
}

impl Default for GenerationToast {
    fn default() -> Self {
        Self {
            summary: None,
            timer: 0.0,
            duration: 2.0,
        }
    }
}

impl GenerationToast {
    pub fn show(&mut self, summary: CityGeneratedEvent) {
        self.summary = Some(summary);
        self.timer = self.duration;
    }

    pub fn tick(&mut self, delta: f32) {
        self.timer = (self.timer - delta).max(0.0);
    }

    pub fn alpha(&self) -> f32 {
        (self.timer / self.duration).clamp(0.0, 1.0)
    }
}

pub fn update_generation_toast(
    mut toast: ResMut<GenerationToast>,
    mut events: EventReader<CityGeneratedEvent>,
    time: Res<Time>,
) {
    for event in events.read() {
        toast.show(*event);
    }

    if toast.timer > 0.0 {
        toast.tick(time.delta_secs());
    }
}

pub fn render_generation_toast(
    toast: Res<GenerationToast>,
    mut contexts: EguiContexts,
) {
    if toast.timer <= 0.0 {
        return;
    }
    let Some(summary) = toast.summary else {
        return;
    };

    if let Ok(ctx) = contexts.ctx_mut() {
        let alpha = toast.alpha();
        let bg_color = egui::Color32::from_rgb(45, 72, 116);

        egui::Area::new(egui::Id::new("generation_toast"))
            .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 60.0))
            .show(ctx, |ui| {
                let frame = egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(
                        bg_color.r(), bg_color.g(), bg_color.b(),
                        (200.0 * alpha) as u8
                    ))
                    .stroke(egui::Stroke::new(
                        1.5,
                        egui::Color32::from_rgba_unmultiplied(255, 255, 255, (180.0 * alpha) as u8)
                    ))
                    .inner_margin(egui::Margin::symmetric(12, 6))
                    .corner_radius(egui::CornerRadius::same(6));

                let text_color = egui::Color32::from_rgba_unmultiplied(255, 255, 255, (255.0 * alpha) as u8);
                frame.show(ui, |ui| {
                    ui.label(egui::RichText::new(format!("SEED {}", summary.seed))
                        .size(14.0)
                        .color(text_color)
                        .strong());
                    ui.label(egui::RichText::new(format!(
                        "{} rings · {} divisions · {} cells · {} buildings",
                        summary.rings, summary.divisions, summary.cells, summary.buildings
                    ))
                        .size(12.0)
                        .color(text_color));
                });
            });
    }
}
