//! Payments view: locally stored payment-method labels.
//!
//! These never leave the browser; actual charging happens on the
//! hosted checkout page the booking flow redirects to.

use egui::{self, RichText, Vec2};

use trip_types::travel::PaymentMethod;

use crate::state::UiState;
use crate::theme::{palette, PANEL_PADDING, PANEL_ROUNDING};

pub enum PaymentsAction {
    Add(PaymentMethod),
    Remove(String),
    PayBooking { booking_id: u64, amount: f64 },
}

pub fn payments_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<PaymentsAction> {
    let p = palette(state.theme);
    let mut action = None;

    egui::Frame::default()
        .fill(p.bg_primary)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Payment methods").color(p.text_primary).strong());
            ui.label(
                RichText::new("Stored on this device only.")
                    .color(p.text_secondary)
                    .small(),
            );
            ui.separator();

            if let Some(booking) = state.bookings.first() {
                ui.label(RichText::new("Latest booking").color(p.accent).strong());
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
                                    RichText::new(format!(
                                        "${:.2} · {}",
                                        booking.total_amount, booking.status
                                    ))
                                    .color(p.text_secondary)
                                    .small(),
                                );
                            });
                            if booking.status == "PENDING" {
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        if ui
                                            .add(
                                                egui::Button::new(
                                                    RichText::new("Pay now")
                                                        .color(p.text_primary),
                                                )
                                                .fill(p.accent)
                                                .corner_radius(PANEL_ROUNDING),
                                            )
                                            .clicked()
                                        {
                                            action = Some(PaymentsAction::PayBooking {
                                                booking_id: booking.id,
                                                amount: booking.total_amount,
                                            });
                                        }
                                    },
                                );
                            }
                        });
                    });
                ui.add_space(8.0);
                ui.separator();
            }

            for method in &state.payment_methods {
                egui::Frame::default()
                    .fill(p.bg_secondary)
                    .corner_radius(PANEL_ROUNDING)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(method.label()).color(p.text_primary));
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui
                                        .small_button(RichText::new("Remove").color(p.error))
                                        .clicked()
                                    {
                                        action = Some(PaymentsAction::Remove(
                                            method.id().to_string(),
                                        ));
                                    }
                                },
                            );
                        });
                    });
                ui.add_space(4.0);
            }

            ui.add_space(8.0);
            ui.label(RichText::new("Add a card").color(p.accent).strong());
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut state.new_card_number)
                        .hint_text("Card number")
                        .desired_width(180.0),
                );
                let digits: String = state
                    .new_card_number
                    .chars()
                    .filter(|c| c.is_ascii_digit())
                    .collect();
                let can_add = digits.len() >= 12;
                if ui
                    .add_enabled(
                        can_add,
                        egui::Button::new(RichText::new("Add").color(p.text_primary))
                            .fill(p.accent)
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    )
                    .clicked()
                {
                    let last4 = digits[digits.len() - 4..].to_string();
                    action = Some(PaymentsAction::Add(PaymentMethod::new_card(last4)));
                    state.new_card_number.clear();
                }
            });

            ui.label(RichText::new("Add a UPI id").color(p.accent).strong());
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut state.new_upi_id)
                        .hint_text("name@bank")
                        .desired_width(180.0),
                );
                let can_add = state.new_upi_id.contains('@');
                if ui
                    .add_enabled(
                        can_add,
                        egui::Button::new(RichText::new("Add").color(p.text_primary))
                            .fill(p.accent)
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    )
                    .clicked()
                {
                    action = Some(PaymentsAction::Add(PaymentMethod::new_upi(
                        state.new_upi_id.trim().to_string(),
                    )));
                    state.new_upi_id.clear();
                }
            });
        });

    action
}
