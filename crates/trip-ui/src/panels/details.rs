//! Hotel details view: description, reviews, wishlist toggle, booking.

use egui::{self, RichText, ScrollArea, Vec2};

use crate::state::UiState;
use crate::theme::{palette, PANEL_PADDING, PANEL_ROUNDING};

pub enum DetailsAction {
    Back,
    ToggleWishlist(u64),
    StartCheckout,
    SubmitReview { hotel_id: u64, rating: u8, comment: String },
    DeleteReview(u64),
}

pub fn details_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<DetailsAction> {
    let p = palette(state.theme);
    let mut action = None;

    let Some(hotel) = state.selected_hotel.clone() else {
        ui.label(RichText::new("No stay selected.").color(p.text_secondary));
        if ui.button("Back").clicked() {
            action = Some(DetailsAction::Back);
        }
        return action;
    };

    egui::Frame::default()
        .fill(p.bg_primary)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add(
                        egui::Button::new(RichText::new("← Back").color(p.text_secondary))
                            .fill(p.bg_surface)
                            .corner_radius(PANEL_ROUNDING),
                    )
                    .clicked()
                {
                    action = Some(DetailsAction::Back);
                }
                ui.heading(RichText::new(&hotel.name).color(p.text_primary).strong());
            });
            ui.label(RichText::new(&hotel.location).color(p.text_secondary));
            ui.label(
                RichText::new(format!(
                    "★ {:.1} · {} reviews · ${:.0}/night",
                    hotel.rating, hotel.review_count, hotel.price
                ))
                .color(p.warning),
            );

            if !hotel.images.is_empty() {
                ui.label(
                    RichText::new(format!("{} photos", hotel.images.len()))
                        .color(p.text_secondary)
                        .small(),
                );
            }

            if let Some(description) = &hotel.description {
                ui.add_space(6.0);
                ui.label(RichText::new(description).color(p.text_primary));
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let heart = if state.is_wishlisted(hotel.id) {
                    "♥ Saved"
                } else {
                    "♡ Save"
                };
                if ui
                    .add(
                        egui::Button::new(RichText::new(heart).color(p.error))
                            .fill(p.bg_surface)
                            .corner_radius(PANEL_ROUNDING),
                    )
                    .clicked()
                {
                    action = Some(DetailsAction::ToggleWishlist(hotel.id));
                }
                if ui
                    .add(
                        egui::Button::new(
                            RichText::new("Book now").color(p.text_primary).strong(),
                        )
                        .fill(p.accent)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(100.0, 28.0)),
                    )
                    .clicked()
                {
                    action = Some(DetailsAction::StartCheckout);
                }
            });

            ui.separator();
            ui.label(RichText::new("Reviews").color(p.accent).strong());

            ScrollArea::vertical()
                .max_height(ui.available_height() - 90.0)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if state.reviews.is_empty() {
                        ui.label(
                            RichText::new("No reviews yet. Be the first.")
                                .color(p.text_secondary)
                                .small(),
                        );
                    }
                    for review in &state.reviews {
                        egui::Frame::default()
                            .fill(p.bg_secondary)
                            .corner_radius(PANEL_ROUNDING)
                            .inner_margin(8.0)
                            .show(ui, |ui| {
                                ui.horizontal(|ui| {
                                    ui.label(
                                        RichText::new(
                                            review.author.as_deref().unwrap_or("Traveller"),
                                        )
                                        .color(p.text_primary)
                                        .strong()
                                        .small(),
                                    );
                                    ui.label(
                                        RichText::new("★".repeat(review.rating as usize))
                                            .color(p.warning)
                                            .small(),
                                    );
                                    ui.with_layout(
                                        egui::Layout::right_to_left(egui::Align::Center),
                                        |ui| {
                                            if ui
                                                .small_button(RichText::new("✕").color(p.error))
                                                .clicked()
                                            {
                                                action =
                                                    Some(DetailsAction::DeleteReview(review.id));
                                            }
                                        },
                                    );
                                });
                                ui.label(RichText::new(&review.comment).color(p.text_primary));
                            });
                        ui.add_space(4.0);
                    }
                });

            // Review composer
            ui.horizontal(|ui| {
                ui.label(RichText::new("Rating").color(p.text_secondary).small());
                ui.add(egui::Slider::new(&mut state.review_form.rating, 1..=5));
                ui.add(
                    egui::TextEdit::singleline(&mut state.review_form.comment)
                        .hint_text("Share your experience...")
                        .desired_width(ui.available_width() - 80.0),
                );
                let can_post =
                    state.review_form.rating >= 1 && !state.review_form.comment.trim().is_empty();
                if ui
                    .add_enabled(
                        can_post,
                        egui::Button::new(RichText::new("Post").color(p.text_primary))
                            .fill(p.accent)
                            .corner_radius(PANEL_ROUNDING),
                    )
                    .clicked()
                {
                    action = Some(DetailsAction::SubmitReview {
                        hotel_id: hotel.id,
                        rating: state.review_form.rating,
                        comment: state.review_form.comment.trim().to_string(),
                    });
                    state.review_form.comment.clear();
                }
            });
        });

    action
}
