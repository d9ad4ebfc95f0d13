//! Itinerary view: day-by-day activities with an add form.

use egui::{self, RichText, ScrollArea};

use trip_types::travel::NewActivity;

use crate::state::UiState;
use crate::theme::{palette, PANEL_PADDING, PANEL_ROUNDING};

pub enum ItineraryAction {
    Add(NewActivity),
    Delete(u64),
}

pub fn itinerary_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<ItineraryAction> {
    let p = palette(state.theme);
    let mut action = None;

    egui::Frame::default()
        .fill(p.bg_primary)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Itinerary").color(p.text_primary).strong());
            ui.separator();

            // Add form
            egui::Frame::default()
                .fill(p.bg_secondary)
                .corner_radius(PANEL_ROUNDING)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("Day").color(p.text_secondary).small());
                        ui.add(egui::DragValue::new(&mut state.activity_form.day).range(1..=60));
                        ui.label(RichText::new("Time").color(p.text_secondary).small());
                        ui.add(
                            egui::TextEdit::singleline(&mut state.activity_form.time)
                                .hint_text("09:00")
                                .desired_width(60.0),
                        );
                        ui.add(
                            egui::TextEdit::singleline(&mut state.activity_form.title)
                                .hint_text("What are you doing?")
                                .desired_width(160.0),
                        );
                    });
                    ui.horizontal(|ui| {
                        ui.add(
                            egui::TextEdit::singleline(&mut state.activity_form.location)
                                .hint_text("Where")
                                .desired_width(140.0),
                        );
                        ui.add(
                            egui::TextEdit::singleline(&mut state.activity_form.notes)
                                .hint_text("Notes")
                                .desired_width(180.0),
                        );
                        if ui
                            .add_enabled(
                                state.activity_form.is_valid(),
                                egui::Button::new(RichText::new("Add").color(p.text_primary))
                                    .fill(p.accent)
                                    .corner_radius(PANEL_ROUNDING),
                            )
                            .clicked()
                        {
                            action = Some(ItineraryAction::Add(NewActivity {
                                day: state.activity_form.day,
                                time: state.activity_form.time.trim().to_string(),
                                title: state.activity_form.title.trim().to_string(),
                                notes: state.activity_form.notes.trim().to_string(),
                                location: state.activity_form.location.trim().to_string(),
                            }));
                            state.activity_form = Default::default();
                        }
                    });
                });

            ui.add_space(8.0);

            // Day-grouped list; the fetch returns activities in
            // arbitrary order, so group locally.
            let mut days: Vec<u32> = state.itinerary.iter().map(|a| a.day).collect();
            days.sort_unstable();
            days.dedup();

            ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                for day in days {
                    ui.label(
                        RichText::new(format!("Day {}", day))
                            .color(p.accent)
                            .strong(),
                    );
                    let mut activities: Vec<_> =
                        state.itinerary.iter().filter(|a| a.day == day).collect();
                    activities.sort_by(|a, b| a.time.cmp(&b.time));
                    for activity in activities {
                        egui::Frame::default()
                            .fill(p.bg_secondary)
                            .corner_radius(PANEL_ROUNDING)
                            .inner_margin(8.0)
                            .show(ui, |ui| {
                                ui.horizontal(|ui| {
                                    ui.label(
                                        RichText::new(&activity.time)
                                            .color(p.text_secondary)
                                            .small(),
                                    );
                                    ui.label(
                                        RichText::new(&activity.title).color(p.text_primary),
                                    );
                                    if !activity.location.is_empty() {
                                        ui.label(
                                            RichText::new(format!("@ {}", activity.location))
                                                .color(p.text_secondary)
                                                .small(),
                                        );
                                    }
                                    ui.with_layout(
                                        egui::Layout::right_to_left(egui::Align::Center),
                                        |ui| {
                                            if ui
                                                .small_button(RichText::new("✕").color(p.error))
                                                .clicked()
                                            {
                                                action =
                                                    Some(ItineraryAction::Delete(activity.id));
                                            }
                                        },
                                    );
                                });
                                if !activity.notes.is_empty() {
                                    ui.label(
                                        RichText::new(&activity.notes)
                                            .color(p.text_secondary)
                                            .small(),
                                    );
                                }
                            });
                        ui.add_space(4.0);
                    }
                }
            });
        });

    action
}
