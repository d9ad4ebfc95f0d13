//! Booking wizard sheet: details → guests → payment.
//!
//! Overlays whichever view launched it. Confirming hands a validated
//! booking payload to the app layer, which inits the booking and
//! redirects to the hosted checkout page.

use egui::{self, RichText, Vec2};

use trip_types::travel::{BookingDraft, Guest};

use crate::state::{CheckoutState, CheckoutStep, CheckoutTarget, UiState};
use crate::theme::{palette, Palette, PANEL_ROUNDING};

pub enum CheckoutAction {
    Close,
    Confirm(BookingDraft),
}

pub fn checkout_sheet(ctx: &egui::Context, state: &mut UiState) -> Option<CheckoutAction> {
    let p = palette(state.theme);
    let mut action = None;
    let user_id = match state.current_user.as_ref() {
        Some(user) => user.id,
        None => return None,
    };
    let payment_labels: Vec<String> = state
        .payment_methods
        .iter()
        .map(|m| m.label())
        .collect();

    let Some(checkout) = state.checkout.as_mut() else {
        return None;
    };

    let mut open = true;
    egui::Window::new(RichText::new(checkout.title().to_string()).strong())
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            step_header(ui, p, checkout.step);
            ui.separator();

            match checkout.step {
                CheckoutStep::Details => details_step(ui, p, checkout),
                CheckoutStep::Guests => guests_step(ui, p, checkout),
                CheckoutStep::Payment => payment_step(ui, p, checkout, &payment_labels),
            }

            ui.separator();
            ui.label(
                RichText::new(format!("Total: ${:.2}", checkout.total()))
                    .color(p.accent)
                    .strong(),
            );

            ui.horizontal(|ui| {
                if checkout.step != CheckoutStep::Details
                    && ui
                        .add(
                            egui::Button::new(RichText::new("Back").color(p.text_secondary))
                                .fill(p.bg_surface)
                                .corner_radius(PANEL_ROUNDING),
                        )
                        .clicked()
                {
                    checkout.step = match checkout.step {
                        CheckoutStep::Payment => CheckoutStep::Guests,
                        _ => CheckoutStep::Details,
                    };
                }

                let forward_label = match checkout.step {
                    CheckoutStep::Payment if checkout.processing => "Processing…",
                    CheckoutStep::Payment => "Pay now",
                    _ => "Continue",
                };
                let forward = ui.add_enabled(
                    checkout.step_complete() && !checkout.processing,
                    egui::Button::new(
                        RichText::new(forward_label).color(p.text_primary).strong(),
                    )
                    .fill(p.accent)
                    .corner_radius(PANEL_ROUNDING)
                    .min_size(Vec2::new(100.0, 26.0)),
                );
                if forward.clicked() {
                    match checkout.step {
                        CheckoutStep::Details => checkout.step = CheckoutStep::Guests,
                        CheckoutStep::Guests => checkout.step = CheckoutStep::Payment,
                        CheckoutStep::Payment => {
                            if let Some(draft) = checkout.draft(user_id) {
                                action = Some(CheckoutAction::Confirm(draft));
                            }
                        }
                    }
                }
            });
        });

    if !open {
        action = Some(CheckoutAction::Close);
    }
    action
}

fn step_header(ui: &mut egui::Ui, p: &Palette, step: CheckoutStep) {
    ui.horizontal(|ui| {
        for (s, label) in [
            (CheckoutStep::Details, "1. Details"),
            (CheckoutStep::Guests, "2. Travellers"),
            (CheckoutStep::Payment, "3. Payment"),
        ] {
            let color = if s == step { p.accent } else { p.text_secondary };
            ui.label(RichText::new(label).color(color).small());
        }
    });
}

fn details_step(ui: &mut egui::Ui, p: &Palette, checkout: &mut CheckoutState) {
    match &checkout.target {
        CheckoutTarget::Hotel(_) => {
            ui.label(RichText::new("Check-in").color(p.text_secondary).small());
            ui.add(
                egui::TextEdit::singleline(&mut checkout.check_in).hint_text("2026-09-01"),
            );
            ui.label(RichText::new("Check-out").color(p.text_secondary).small());
            ui.add(
                egui::TextEdit::singleline(&mut checkout.check_out).hint_text("2026-09-04"),
            );
            ui.horizontal(|ui| {
                ui.label(RichText::new("Nights").color(p.text_secondary).small());
                ui.add(egui::DragValue::new(&mut checkout.nights).range(1..=30));
                ui.label(RichText::new("Rooms").color(p.text_secondary).small());
                ui.add(egui::DragValue::new(&mut checkout.rooms).range(1..=6));
            });
            ui.checkbox(&mut checkout.include_breakfast, "Include breakfast");
            ui.checkbox(&mut checkout.include_late_checkout, "Late checkout");
        }
        _ => {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Travellers").color(p.text_secondary).small());
                if ui
                    .add(egui::DragValue::new(&mut checkout.passenger_count).range(1..=9))
                    .changed()
                {
                    checkout
                        .guests
                        .resize_with(checkout.passenger_count as usize, Guest::default);
                }
            });
        }
    }
}

fn guests_step(ui: &mut egui::Ui, p: &Palette, checkout: &mut CheckoutState) {
    if matches!(checkout.target, CheckoutTarget::Flight(_)) {
        ui.label(
            RichText::new("Traveller names are collected at the airline counter.")
                .color(p.text_secondary)
                .small(),
        );
        return;
    }

    let guest_count = checkout.guests.len();
    for (index, guest) in checkout.guests.iter_mut().enumerate() {
        ui.label(
            RichText::new(format!("Traveller {}", index + 1))
                .color(p.accent)
                .small(),
        );
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut guest.full_name)
                    .hint_text("Full name")
                    .desired_width(140.0),
            );
            ui.add(
                egui::TextEdit::singleline(&mut guest.age)
                    .hint_text("Age")
                    .desired_width(40.0),
            );
            ui.add(
                egui::TextEdit::singleline(&mut guest.gender)
                    .hint_text("Gender")
                    .desired_width(70.0),
            );
        });
    }
    ui.horizontal(|ui| {
        if ui.small_button("+ Add traveller").clicked() {
            checkout.guests.push(Guest::default());
        }
        if guest_count > 1 && ui.small_button("- Remove last").clicked() {
            checkout.guests.pop();
        }
    });
}

fn payment_step(
    ui: &mut egui::Ui,
    p: &Palette,
    checkout: &mut CheckoutState,
    payment_labels: &[String],
) {
    ui.label(
        RichText::new("How would you like to pay?")
            .color(p.text_secondary)
            .small(),
    );
    for label in payment_labels {
        ui.radio_value(&mut checkout.payment_method, label.clone(), label);
    }
    ui.radio_value(&mut checkout.payment_method, "card".to_string(), "New card");
    ui.radio_value(&mut checkout.payment_method, "upi".to_string(), "UPI");
    ui.label(
        RichText::new("You will be redirected to a secure checkout page.")
            .color(p.text_secondary)
            .small(),
    );
}
