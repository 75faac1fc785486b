// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe list panel.
//!
//! Rendering never mutates the store. User input is returned as
//! [`PanelAction`]s, which the owner applies (see
//! `PlaybackCoordinator::apply_panel_action`).

use crate::keyframe::CameraKeyframe;
use crate::store::KeyframeStore;
use egui::{Color32, Key, RichText};
use std::ops::RangeInclusive;

const LIST_MAX_HEIGHT: f32 = 240.0;
const SELECTED_COLOR: Color32 = Color32::from_rgb(255, 200, 100);

/// Something the user asked for in the panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelAction {
    /// Snapshot the live camera
    AddKeyframe,
    /// Remove every keyframe
    Clear,
    /// Play the camera timeline
    Play,
    /// Play the camera timeline and the model clips together
    PlayWithModel,
    /// Stop camera and model
    Stop,
    /// Restore the keyframe at this index
    Jump(usize),
    /// Swap with the previous keyframe
    MoveUp(usize),
    /// Swap with the next keyframe
    MoveDown(usize),
    /// Delete the keyframe
    Delete(usize),
    /// Edit the incoming transition duration (ms)
    SetDuration(usize, u32),
    /// Keyboard: select and jump to the next keyframe
    SelectNext,
    /// Keyboard: select and jump to the previous keyframe
    SelectPrevious,
    /// Scrub all model clips to this time (s)
    SeekModel(f32),
}

/// Read-only state the panel displays
#[derive(Debug, Clone, PartialEq)]
pub struct PanelStatus {
    /// Camera timeline running
    pub playing: bool,
    /// A model with a mixer is attached
    pub model_loaded: bool,
    /// Current model playback head (s)
    pub model_time: f32,
    /// Longest clip (s)
    pub model_duration: f32,
    /// Allowed transition durations (ms)
    pub duration_range: RangeInclusive<u32>,
}

impl Default for PanelStatus {
    fn default() -> Self {
        Self {
            playing: false,
            model_loaded: false,
            model_time: 0.0,
            model_duration: 0.0,
            duration_range: 100..=10_000,
        }
    }
}

/// Camera animation panel
#[derive(Debug, Clone)]
pub struct KeyframePanel {
    /// Arrow keys move the selection
    pub keyboard_navigation: bool,
    /// Model scrubber position while dragging
    scrub_time: f32,
    scrubbing: bool,
}

impl Default for KeyframePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyframePanel {
    /// Create the panel
    pub fn new() -> Self {
        Self {
            keyboard_navigation: true,
            scrub_time: 0.0,
            scrubbing: false,
        }
    }

    /// Render the panel and collect user actions
    pub fn show(&mut self, ui: &mut egui::Ui, store: &KeyframeStore, status: &PanelStatus) -> Vec<PanelAction> {
        let mut actions = Vec::new();

        ui.heading("Camera Animation");
        self.toolbar(ui, store, status, &mut actions);

        if status.model_loaded {
            self.model_scrubber(ui, status, &mut actions);
        }

        ui.separator();

        egui::ScrollArea::vertical()
            .max_height(LIST_MAX_HEIGHT)
            .show(ui, |ui| {
                if store.is_empty() {
                    ui.weak("No keyframes yet.");
                    return;
                }
                let last = store.len() - 1;
                for (index, keyframe) in store.iter().enumerate() {
                    ui.push_id(keyframe.id, |ui| {
                        keyframe_row(ui, index, last, keyframe, store.selected() == Some(index), status, &mut actions);
                    });
                    ui.separator();
                }
            });

        if self.keyboard_navigation && !store.is_empty() {
            let (down, up) = ui.input(|i| (i.key_pressed(Key::ArrowDown), i.key_pressed(Key::ArrowUp)));
            if down {
                actions.push(PanelAction::SelectNext);
            } else if up {
                actions.push(PanelAction::SelectPrevious);
            }
        }

        actions
    }

    fn toolbar(&self, ui: &mut egui::Ui, store: &KeyframeStore, status: &PanelStatus, actions: &mut Vec<PanelAction>) {
        ui.horizontal(|ui| {
            if ui.button("Add Keyframe").clicked() {
                actions.push(PanelAction::AddKeyframe);
            }

            let can_play = store.is_playable() && !status.playing;
            if ui
                .add_enabled(can_play, egui::Button::new("▶ Play"))
                .on_disabled_hover_text("Needs at least two keyframes")
                .clicked()
            {
                actions.push(PanelAction::Play);
            }
            if ui
                .add_enabled(can_play && status.model_loaded, egui::Button::new("▶ Play + Model"))
                .clicked()
            {
                actions.push(PanelAction::PlayWithModel);
            }
            if ui.button("⏹ Stop").clicked() {
                actions.push(PanelAction::Stop);
            }
            if ui.add_enabled(!store.is_empty(), egui::Button::new("Clear Keyframes")).clicked() {
                actions.push(PanelAction::Clear);
            }
        });

        ui.label(format!(
            "{} keyframes | {:.2}s total",
            store.len(),
            store.total_duration_ms() as f32 / 1000.0
        ));
    }

    fn model_scrubber(&mut self, ui: &mut egui::Ui, status: &PanelStatus, actions: &mut Vec<PanelAction>) {
        if !self.scrubbing {
            self.scrub_time = status.model_time;
        }
        ui.horizontal(|ui| {
            ui.label("Model time");
            let response = ui.add(
                egui::Slider::new(&mut self.scrub_time, 0.0..=status.model_duration)
                    .suffix("s")
                    .fixed_decimals(2),
            );
            self.scrubbing = response.dragged();
            if response.changed() {
                actions.push(PanelAction::SeekModel(self.scrub_time));
            }
        });
    }
}

fn keyframe_row(
    ui: &mut egui::Ui,
    index: usize,
    last: usize,
    keyframe: &CameraKeyframe,
    selected: bool,
    status: &PanelStatus,
    actions: &mut Vec<PanelAction>,
) {
    ui.horizontal(|ui| {
        let title = RichText::new(format!("#{}", index + 1)).strong();
        let title = if selected { title.color(SELECTED_COLOR) } else { title };
        if ui.selectable_label(selected, title).on_hover_text("Go to keyframe").clicked() {
            actions.push(PanelAction::Jump(index));
        }
        if ui.add_enabled(index > 0, egui::Button::new("↑")).on_hover_text("Move Up").clicked() {
            actions.push(PanelAction::MoveUp(index));
        }
        if ui.add_enabled(index < last, egui::Button::new("↓")).on_hover_text("Move Down").clicked() {
            actions.push(PanelAction::MoveDown(index));
        }
        if ui.button("✕").on_hover_text("Delete").clicked() {
            actions.push(PanelAction::Delete(index));
        }
    });

    let [px, py, pz] = keyframe.position;
    let [tx, ty, tz] = keyframe.target;
    let [qx, qy, qz, qw] = keyframe.orientation;
    ui.small(format!("Pos: [{px:.2}, {py:.2}, {pz:.2}]  Target: [{tx:.2}, {ty:.2}, {tz:.2}]"));
    ui.small(format!(
        "Zoom: {:.2}  FOV: {:.2}  Near: {:.2}  Far: {:.2}",
        keyframe.zoom, keyframe.fov, keyframe.near, keyframe.far
    ));
    ui.small(format!("Rot: [{qx:.2}, {qy:.2}, {qz:.2}, {qw:.2}]  Model: {:.2}s", keyframe.model_anim_time));

    // The first keyframe is the start pose; it has no incoming transition
    if index > 0 {
        let mut duration = keyframe.duration_ms();
        let response = ui.add(
            egui::Slider::new(&mut duration, status.duration_range.clone())
                .text("transition")
                .suffix(" ms"),
        );
        if response.changed() {
            actions.push(PanelAction::SetDuration(index, duration));
        }
    }
}
