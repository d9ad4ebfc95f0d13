//! Login / registration panel.

use egui::{self, RichText, Vec2};

use crate::state::{AuthMode, UiState};
use crate::theme::{palette, PANEL_PADDING, PANEL_ROUNDING};

pub enum LoginAction {
    SignIn { email: String, password: String },
    SignUp {
        name: String,
        email: String,
        password: String,
    },
}

/// Render the auth panel. Returns an action when the form submits.
pub fn login_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<LoginAction> {
    let p = palette(state.theme);
    let mut action = None;

    egui::Frame::default()
        .fill(p.bg_secondary)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new("Tripverse").color(p.accent).strong());
                ui.label(
                    RichText::new(match state.login.mode {
                        AuthMode::SignIn => "Welcome back",
                        AuthMode::SignUp => "Create your account",
                    })
                    .color(p.text_secondary),
                );
            });

            ui.add_space(12.0);

            if state.login.mode == AuthMode::SignUp {
                ui.label(RichText::new("Name").color(p.text_secondary).small());
                ui.text_edit_singleline(&mut state.login.name);
                ui.add_space(4.0);
            }

            ui.label(RichText::new("Email").color(p.text_secondary).small());
            ui.text_edit_singleline(&mut state.login.email);
            ui.add_space(4.0);

            ui.label(RichText::new("Password").color(p.text_secondary).small());
            ui.add(egui::TextEdit::singleline(&mut state.login.password).password(true));

            ui.add_space(12.0);

            let can_submit = !state.login.busy
                && !state.login.email.trim().is_empty()
                && !state.login.password.is_empty()
                && (state.login.mode == AuthMode::SignIn
                    || !state.login.name.trim().is_empty());

            let label = match state.login.mode {
                AuthMode::SignIn => "Sign in",
                AuthMode::SignUp => "Sign up",
            };
            let button = ui.add_enabled(
                can_submit,
                egui::Button::new(RichText::new(label).color(p.text_primary).strong())
                    .fill(p.accent)
                    .corner_radius(PANEL_ROUNDING)
                    .min_size(Vec2::new(120.0, 28.0)),
            );
            if button.clicked() {
                state.login.busy = true;
                action = Some(match state.login.mode {
                    AuthMode::SignIn => LoginAction::SignIn {
                        email: state.login.email.trim().to_string(),
                        password: state.login.password.clone(),
                    },
                    AuthMode::SignUp => LoginAction::SignUp {
                        name: state.login.name.trim().to_string(),
                        email: state.login.email.trim().to_string(),
                        password: state.login.password.clone(),
                    },
                });
            }

            ui.add_space(8.0);
            let toggle_label = match state.login.mode {
                AuthMode::SignIn => "Need an account? Sign up",
                AuthMode::SignUp => "Have an account? Sign in",
            };
            if ui
                .link(RichText::new(toggle_label).color(p.text_secondary).small())
                .clicked()
            {
                state.login.mode = match state.login.mode {
                    AuthMode::SignIn => AuthMode::SignUp,
                    AuthMode::SignUp => AuthMode::SignIn,
                };
            }
        });

    action
}
