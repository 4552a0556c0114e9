//! Settings view - Application configuration

use egui::RichText;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::shared::SharedAppState;
use crate::ui::state::{SettingsSection, SettingsViewState};
use crate::ui::theme::ThemeColors;

/// Render the settings view
pub fn render_settings_view(
    ui: &mut egui::Ui,
    view_state: &mut SettingsViewState,
    shared_state: &Arc<RwLock<SharedAppState>>,
) {
    ui.heading(RichText::new("Settings").size(22.0).strong());
    ui.add_space(6.0);
    ui.label(
        RichText::new("Configure statement execution and result display")
            .size(13.0)
            .color(ThemeColors::TEXT_SECONDARY),
    );
    ui.add_space(20.0);

    let mut changed = false;

    egui::ScrollArea::vertical().show(ui, |ui| {
        // Query settings
        let expanded = view_state.expanded_section == Some(SettingsSection::Query);
        egui::Frame::none()
            .fill(ThemeColors::BG_MEDIUM)
            .rounding(egui::Rounding::same(6.0))
            .inner_margin(14.0)
            .show(ui, |ui| {
                if section_header(ui, "Query", expanded) {
                    view_state.expanded_section = if expanded {
                        None
                    } else {
                        Some(SettingsSection::Query)
                    };
                }

                if expanded {
                    ui.add_space(12.0);
                    ui.separator();
                    ui.add_space(10.0);

                    let mut state = shared_state.write();

                    ui.horizontal(|ui| {
                        ui.label("Busy timeout:");
                        ui.add_space(8.0);
                        let mut secs = state.config.query.busy_timeout_secs as f64;
                        if ui
                            .add(egui::Slider::new(&mut secs, 1.0..=300.0).suffix(" s"))
                            .changed()
                        {
                            state.config.query.busy_timeout_secs = secs as u64;
                            changed = true;
                        }
                    });
                    ui.label(
                        RichText::new("How long a statement waits on a locked database")
                            .size(11.0)
                            .color(ThemeColors::TEXT_MUTED),
                    );
                }
            });

        ui.add_space(14.0);

        // Display settings
        let expanded = view_state.expanded_section == Some(SettingsSection::Display);
        egui::Frame::none()
            .fill(ThemeColors::BG_MEDIUM)
            .rounding(egui::Rounding::same(6.0))
            .inner_margin(14.0)
            .show(ui, |ui| {
                if section_header(ui, "Display", expanded) {
                    view_state.expanded_section = if expanded {
                        None
                    } else {
                        Some(SettingsSection::Display)
                    };
                }

                if expanded {
                    ui.add_space(12.0);
                    ui.separator();
                    ui.add_space(10.0);

                    let mut state = shared_state.write();

                    ui.horizontal(|ui| {
                        ui.label("Max result rows:");
                        ui.add_space(8.0);
                        if ui
                            .add(
                                egui::DragValue::new(&mut state.config.display.max_result_rows)
                                    .range(100..=1_000_000),
                            )
                            .changed()
                        {
                            changed = true;
                        }
                    });

                    ui.horizontal(|ui| {
                        ui.label("Window size:");
                        ui.add_space(8.0);
                        if ui
                            .add(
                                egui::DragValue::new(&mut state.config.display.window_width)
                                    .range(600.0..=4000.0),
                            )
                            .changed()
                        {
                            changed = true;
                        }
                        ui.label("x");
                        if ui
                            .add(
                                egui::DragValue::new(&mut state.config.display.window_height)
                                    .range(400.0..=3000.0),
                            )
                            .changed()
                        {
                            changed = true;
                        }
                    });
                    ui.label(
                        RichText::new("Window size is applied at the next launch")
                            .size(11.0)
                            .color(ThemeColors::TEXT_MUTED),
                    );
                }
            });

        ui.add_space(20.0);

        ui.horizontal(|ui| {
            if ui
                .add(egui::Button::new("Reset to Defaults").min_size(egui::vec2(120.0, 32.0)))
                .clicked()
            {
                shared_state.write().config = crate::config::AppConfig::default();
                changed = true;
            }

            ui.add_space(12.0);
            ui.label(
                RichText::new("Settings are saved automatically")
                    .size(12.0)
                    .color(ThemeColors::TEXT_MUTED),
            );
        });

        let last_error = shared_state.read().runtime.last_error.clone();
        if let Some(error) = last_error {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(error)
                        .size(12.0)
                        .color(ThemeColors::ACCENT_ERROR),
                );
                if ui.small_button("Dismiss").clicked() {
                    shared_state.write().runtime.clear_error();
                }
            });
        }
    });

    if changed {
        view_state.has_unsaved_changes = true;
    }
}

/// Collapsible section header; returns true when toggled.
fn section_header(ui: &mut egui::Ui, title: &str, expanded: bool) -> bool {
    let response = ui
        .horizontal(|ui| {
            let arrow = if expanded { "v" } else { ">" };
            ui.label(
                RichText::new(arrow)
                    .size(12.0)
                    .color(ThemeColors::TEXT_MUTED),
            );
            ui.add_space(8.0);
            ui.heading(RichText::new(title).size(16.0));
        })
        .response;
    response.interact(egui::Sense::click()).clicked()
}
