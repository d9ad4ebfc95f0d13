//! Profile view: account details, avatar, password change, a small
//! offline currency converter, theme toggle, logout.

use egui::{self, RichText, Vec2};

use crate::state::{Currency, UiState};
use crate::theme::{palette, PANEL_PADDING, PANEL_ROUNDING};

pub enum ProfileAction {
    SaveProfile { name: String, email: String },
    UploadAvatar(String),
    ChangePassword {
        old_password: String,
        new_password: String,
    },
    ToggleTheme,
    Logout,
}

pub fn profile_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<ProfileAction> {
    let p = palette(state.theme);
    let mut action = None;

    egui::Frame::default()
        .fill(p.bg_primary)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Profile").color(p.text_primary).strong());
            if let Some(user) = &state.current_user {
                ui.label(RichText::new(&user.email).color(p.text_secondary).small());
            }
            ui.separator();

            ui.label(RichText::new("Account").color(p.accent).strong());
            ui.label(RichText::new("Name").color(p.text_secondary).small());
            ui.text_edit_singleline(&mut state.profile_form.name);
            ui.label(RichText::new("Email").color(p.text_secondary).small());
            ui.text_edit_singleline(&mut state.profile_form.email);

            let can_save = !state.profile_form.name.trim().is_empty()
                && !state.profile_form.email.trim().is_empty();
            if ui
                .add_enabled(
                    can_save,
                    egui::Button::new(RichText::new("Save changes").color(p.text_primary))
                        .fill(p.accent)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(110.0, 26.0)),
                )
                .clicked()
            {
                action = Some(ProfileAction::SaveProfile {
                    name: state.profile_form.name.trim().to_string(),
                    email: state.profile_form.email.trim().to_string(),
                });
            }

            ui.add_space(10.0);
            ui.separator();
            ui.label(RichText::new("Avatar").color(p.accent).strong());
            ui.label(
                RichText::new("Paste an image data URL")
                    .color(p.text_secondary)
                    .small(),
            );
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut state.profile_form.avatar_data)
                        .hint_text("data:image/png;base64,...")
                        .desired_width(220.0),
                );
                let can_upload = state.profile_form.avatar_data.trim().starts_with("data:image/");
                if ui
                    .add_enabled(
                        can_upload,
                        egui::Button::new(RichText::new("Upload").color(p.text_primary))
                            .fill(p.accent)
                            .corner_radius(PANEL_ROUNDING),
                    )
                    .clicked()
                {
                    action = Some(ProfileAction::UploadAvatar(
                        state.profile_form.avatar_data.trim().to_string(),
                    ));
                    state.profile_form.avatar_data.clear();
                }
            });

            ui.add_space(10.0);
            ui.separator();
            ui.label(RichText::new("Password").color(p.accent).strong());
            ui.label(RichText::new("Current password").color(p.text_secondary).small());
            ui.add(
                egui::TextEdit::singleline(&mut state.password_form.old_password).password(true),
            );
            ui.label(RichText::new("New password").color(p.text_secondary).small());
            ui.add(
                egui::TextEdit::singleline(&mut state.password_form.new_password).password(true),
            );
            ui.label(RichText::new("Confirm new password").color(p.text_secondary).small());
            ui.add(
                egui::TextEdit::singleline(&mut state.password_form.confirm_password)
                    .password(true),
            );

            if ui
                .add_enabled(
                    state.password_form.is_valid(),
                    egui::Button::new(RichText::new("Change password").color(p.text_primary))
                        .fill(p.accent)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(130.0, 26.0)),
                )
                .clicked()
            {
                action = Some(ProfileAction::ChangePassword {
                    old_password: state.password_form.old_password.clone(),
                    new_password: state.password_form.new_password.clone(),
                });
                state.password_form = Default::default();
            }

            ui.add_space(10.0);
            ui.separator();
            ui.label(RichText::new("Currency converter").color(p.accent).strong());
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut state.converter.amount)
                        .hint_text("Amount")
                        .desired_width(80.0),
                );
                egui::ComboBox::from_id_salt("converter_from")
                    .selected_text(state.converter.from.code())
                    .show_ui(ui, |ui| {
                        for currency in Currency::ALL {
                            ui.selectable_value(
                                &mut state.converter.from,
                                currency,
                                currency.code(),
                            );
                        }
                    });
                ui.label(RichText::new("→").color(p.text_secondary));
                egui::ComboBox::from_id_salt("converter_to")
                    .selected_text(state.converter.to.code())
                    .show_ui(ui, |ui| {
                        for currency in Currency::ALL {
                            ui.selectable_value(
                                &mut state.converter.to,
                                currency,
                                currency.code(),
                            );
                        }
                    });
                if let Some(result) = state.converter.result() {
                    ui.label(
                        RichText::new(format!(
                            "= {:.2} {}",
                            result,
                            state.converter.to.code()
                        ))
                        .color(p.text_primary)
                        .strong(),
                    );
                }
            });

            ui.add_space(10.0);
            ui.separator();
            ui.horizontal(|ui| {
                if ui
                    .add(
                        egui::Button::new(
                            RichText::new(format!("Theme: {}", state.theme.label()))
                                .color(p.text_primary),
                        )
                        .fill(p.bg_surface)
                        .corner_radius(PANEL_ROUNDING),
                    )
                    .clicked()
                {
                    action = Some(ProfileAction::ToggleTheme);
                }
                if ui
                    .add(
                        egui::Button::new(RichText::new("Log out").color(p.text_primary))
                            .fill(p.error)
                            .corner_radius(PANEL_ROUNDING),
                    )
                    .clicked()
                {
                    action = Some(ProfileAction::Logout);
                }
            });
        });

    action
}
