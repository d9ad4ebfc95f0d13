//! Wishlist view: saved stays with remove and view-details.

use egui::{self, RichText, ScrollArea};

use crate::state::UiState;
use crate::theme::{palette, PANEL_PADDING, PANEL_ROUNDING};

pub enum WishlistAction {
    OpenDetails(u64),
    Remove(u64),
}

pub fn wishlist_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<WishlistAction> {
    let p = palette(state.theme);
    let mut action = None;

    egui::Frame::default()
        .fill(p.bg_primary)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Wishlist").color(p.text_primary).strong());
            ui.separator();

            if state.wishlist.is_empty() {
                ui.label(
                    RichText::new("Nothing saved yet. Tap the heart on a stay to keep it here.")
                        .color(p.text_secondary),
                );
                return;
            }

            ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                for item in &state.wishlist {
                    egui::Frame::default()
                        .fill(p.bg_secondary)
                        .corner_radius(PANEL_ROUNDING)
                        .inner_margin(8.0)
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.vertical(|ui| {
                                    ui.label(
                                        RichText::new(&item.hotel.name)
                                            .color(p.text_primary)
                                            .strong(),
                                    );
                                    ui.label(
                                        RichText::new(&item.hotel.location)
                                            .color(p.text_secondary)
                                            .small(),
                                    );
                                });
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        if ui
                                            .small_button(RichText::new("Remove").color(p.error))
                                            .clicked()
                                        {
                                            action = Some(WishlistAction::Remove(item.hotel.id));
                                        }
                                        if ui
                                            .small_button(
                                                RichText::new("View").color(p.text_primary),
                                            )
                                            .clicked()
                                        {
                                            action =
                                                Some(WishlistAction::OpenDetails(item.hotel.id));
                                        }
                                        ui.label(
                                            RichText::new(format!(
                                                "${:.0}/night",
                                                item.hotel.price
                                            ))
                                            .color(p.accent),
                                        );
                                    },
                                );
                            });
                        });
                    ui.add_space(4.0);
                }
            });
        });

    action
}
