//! Recent trips: the signed-in user's confirmed bookings.

use egui::{self, RichText, ScrollArea};

use crate::state::UiState;
use crate::theme::{palette, PANEL_PADDING, PANEL_ROUNDING};

pub fn trips_panel(ui: &mut egui::Ui, state: &UiState) {
    let p = palette(state.theme);

    egui::Frame::default()
        .fill(p.bg_primary)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Recent trips").color(p.text_primary).strong());
            ui.separator();

            if state.bookings.is_empty() {
                ui.label(RichText::new("No bookings yet.").color(p.text_secondary));
                return;
            }

            ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                for booking in &state.bookings {
                    let status_color = match booking.status.as_str() {
                        "CONFIRMED" => p.success,
                        "PENDING" => p.warning,
                        _ => p.text_secondary,
                    };
                    egui::Frame::default()
                        .fill(p.bg_secondary)
                        .corner_radius(PANEL_ROUNDING)
                        .inner_margin(8.0)
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.vertical(|ui| {
                                    ui.label(
                                        RichText::new(
                                            booking.hotel_name.as_deref().unwrap_or("Trip"),
                                        )
                                        .color(p.text_primary)
                                        .strong(),
                                    );
                                    ui.label(
                                        RichText::new(&booking.created_at)
                                            .color(p.text_secondary)
                                            .small(),
                                    );
                                });
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        ui.label(
                                            RichText::new(format!(
                                                "${:.2}",
                                                booking.total_amount
                                            ))
                                            .color(p.accent)
                                            .strong(),
                                        );
                                        ui.label(
                                            RichText::new(&booking.status)
                                                .color(status_color)
                                                .small(),
                                        );
                                    },
                                );
                            });
                        });
                    ui.add_space(4.0);
                }
            });
        });
}
