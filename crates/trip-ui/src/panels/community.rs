//! Community view: conversation list, live thread, composer.
//!
//! The thread renders the core's merged message list verbatim; this
//! panel never reorders or filters it. The composer only clears once a
//! send succeeds, so nothing typed is ever lost.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};

use trip_types::chat::ChatMessage;

use crate::state::{ChatFilter, ChatStatus, UiState};
use crate::theme::{palette, Palette, PANEL_PADDING, PANEL_ROUNDING};

pub enum CommunityAction {
    OpenConversation(String),
    Send {
        conversation_id: String,
        content: String,
    },
    OpenDm(u64),
    CreateGroup { name: String, member_ids: Vec<u64> },
    DeleteGroup(String),
    ToggleFavourite(String),
    AddMember {
        conversation_id: String,
        user_id: u64,
    },
    RemoveMember {
        conversation_id: String,
        user_id: u64,
    },
}

pub fn community_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<CommunityAction> {
    let p = palette(state.theme);
    let mut action = None;

    egui::Frame::default()
        .fill(p.bg_primary)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            connection_banner(ui, state, p);

            ui.columns(2, |columns| {
                sidebar(&mut columns[0], state, p, &mut action);
                thread_view(&mut columns[1], state, p, &mut action);
            });
        });

    action
}

fn connection_banner(ui: &mut egui::Ui, state: &UiState, p: &Palette) {
    let (text, color) = match state.chat_status {
        ChatStatus::Connected => return,
        ChatStatus::Connecting => ("Connecting...", p.warning),
        ChatStatus::Disconnected => ("Reconnecting...", p.warning),
        ChatStatus::Offline => ("You are offline. Still retrying in the background.", p.error),
    };
    egui::Frame::default()
        .fill(p.bg_surface)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(6.0)
        .show(ui, |ui| {
            ui.label(RichText::new(text).color(color).small());
        });
    ui.add_space(4.0);
}

fn sidebar(
    ui: &mut egui::Ui,
    state: &mut UiState,
    p: &Palette,
    action: &mut Option<CommunityAction>,
) {
    ui.label(RichText::new("Conversations").color(p.accent).strong());

    ui.horizontal(|ui| {
        for (filter, label) in [
            (ChatFilter::All, "All"),
            (ChatFilter::Favourites, "★"),
            (ChatFilter::Groups, "Groups"),
            (ChatFilter::People, "People"),
        ] {
            if ui
                .selectable_label(state.chat_filter == filter, RichText::new(label).small())
                .clicked()
            {
                state.chat_filter = filter;
            }
        }
    });
    ui.add(
        egui::TextEdit::singleline(&mut state.chat_search)
            .hint_text("Search")
            .desired_width(f32::INFINITY),
    );

    if ui
        .add(
            egui::Button::new(RichText::new("+ New group").color(p.text_primary))
                .fill(p.bg_surface)
                .corner_radius(PANEL_ROUNDING),
        )
        .clicked()
    {
        state.group_form.open = !state.group_form.open;
    }

    if state.group_form.open {
        group_composer(ui, state, p, action);
    }

    ui.add_space(4.0);

    ScrollArea::vertical()
        .id_salt("conversation_list")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let active = state.active_conversation.clone();
            let needle = state.chat_search.trim().to_lowercase();
            let show_conversations = state.chat_filter != ChatFilter::People;
            let show_people = matches!(state.chat_filter, ChatFilter::All | ChatFilter::People);

            if show_conversations {
                for conversation in &state.conversations {
                    match state.chat_filter {
                        ChatFilter::Favourites if !state.is_favourite(&conversation.id) => {
                            continue
                        }
                        ChatFilter::Groups if !conversation.is_group() => continue,
                        _ => {}
                    }
                    if !needle.is_empty()
                        && !conversation.name.to_lowercase().contains(&needle)
                    {
                        continue;
                    }

                    let selected = active.as_deref() == Some(conversation.id.as_str());
                    let marker = if conversation.is_group() { "👥" } else { "👤" };
                    let label = RichText::new(format!("{} {}", marker, conversation.name))
                        .color(if selected { p.text_primary } else { p.text_secondary });
                    ui.horizontal(|ui| {
                        if ui
                            .add(
                                egui::Button::new(label)
                                    .fill(if selected { p.accent } else { p.bg_secondary })
                                    .corner_radius(PANEL_ROUNDING)
                                    .min_size(Vec2::new(ui.available_width() - 60.0, 0.0)),
                            )
                            .clicked()
                            && !selected
                        {
                            *action =
                                Some(CommunityAction::OpenConversation(conversation.id.clone()));
                        }
                        let star = if state.is_favourite(&conversation.id) {
                            "★"
                        } else {
                            "☆"
                        };
                        if ui.small_button(RichText::new(star).color(p.warning)).clicked() {
                            *action =
                                Some(CommunityAction::ToggleFavourite(conversation.id.clone()));
                        }
                        if conversation.is_group()
                            && ui.small_button(RichText::new("✕").color(p.error)).clicked()
                        {
                            *action = Some(CommunityAction::DeleteGroup(conversation.id.clone()));
                        }
                    });
                }
            }

            if show_people {
                ui.add_space(8.0);
                ui.label(RichText::new("People").color(p.accent).strong());
                let my_id = state.current_user.as_ref().map(|u| u.id);
                for user in &state.users {
                    if Some(user.id) == my_id {
                        continue;
                    }
                    if !needle.is_empty() && !user.name.to_lowercase().contains(&needle) {
                        continue;
                    }
                    if ui
                        .add(
                            egui::Button::new(
                                RichText::new(format!("👤 {}", user.name))
                                    .color(p.text_secondary),
                            )
                            .fill(p.bg_secondary)
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(ui.available_width(), 0.0)),
                        )
                        .clicked()
                    {
                        *action = Some(CommunityAction::OpenDm(user.id));
                    }
                }
            }
        });
}

fn group_composer(
    ui: &mut egui::Ui,
    state: &mut UiState,
    p: &Palette,
    action: &mut Option<CommunityAction>,
) {
    egui::Frame::default()
        .fill(p.bg_secondary)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(6.0)
        .show(ui, |ui| {
            ui.add(
                egui::TextEdit::singleline(&mut state.group_form.name).hint_text("Group name"),
            );
            let my_id = state.current_user.as_ref().map(|u| u.id);
            for user in &state.users {
                if Some(user.id) == my_id {
                    continue;
                }
                let mut checked = state.group_form.selected.contains(&user.id);
                if ui.checkbox(&mut checked, &user.name).changed() {
                    if checked {
                        state.group_form.selected.push(user.id);
                    } else {
                        state.group_form.selected.retain(|id| *id != user.id);
                    }
                }
            }
            let can_create = !state.group_form.name.trim().is_empty()
                && !state.group_form.selected.is_empty();
            if ui
                .add_enabled(
                    can_create,
                    egui::Button::new(RichText::new("Create").color(p.text_primary))
                        .fill(p.accent)
                        .corner_radius(PANEL_ROUNDING),
                )
                .clicked()
            {
                *action = Some(CommunityAction::CreateGroup {
                    name: state.group_form.name.trim().to_string(),
                    member_ids: state.group_form.selected.clone(),
                });
                state.group_form = Default::default();
            }
        });
}

fn thread_view(
    ui: &mut egui::Ui,
    state: &mut UiState,
    p: &Palette,
    action: &mut Option<CommunityAction>,
) {
    let Some(conversation_id) = state.active_conversation.clone() else {
        ui.centered_and_justified(|ui| {
            ui.label(
                RichText::new("Select a conversation or open a DM").color(p.text_secondary),
            );
        });
        return;
    };

    let group = state
        .conversations
        .iter()
        .find(|c| c.id == conversation_id && c.is_group())
        .cloned();
    if let Some(group) = group {
        member_strip(ui, state, p, &conversation_id, &group, action);
    }

    let available_height = ui.available_height() - 50.0;
    ScrollArea::vertical()
        .id_salt("thread")
        .max_height(available_height)
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if state.history_loading && state.messages.is_empty() {
                ui.label(RichText::new("Loading messages...").color(p.text_secondary).small());
            }
            for message in &state.messages {
                message_bubble(ui, p, message);
                ui.add_space(4.0);
            }
        });

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        let input = egui::TextEdit::singleline(&mut state.composer)
            .hint_text("Write a message...")
            .desired_width(ui.available_width() - 70.0);
        let response = ui.add(input);

        let can_send = !state.composer.trim().is_empty();
        let send = ui.add_enabled(
            can_send,
            egui::Button::new(RichText::new("Send").color(p.text_primary))
                .fill(if can_send { p.accent } else { p.bg_surface })
                .corner_radius(PANEL_ROUNDING)
                .min_size(Vec2::new(60.0, 0.0)),
        );

        let submitted = (response.lost_focus()
            && ui.input(|i| i.key_pressed(egui::Key::Enter))
            && can_send)
            || send.clicked();
        if submitted {
            // The app clears the input once the POST succeeds; on
            // failure it stays put.
            *action = Some(CommunityAction::Send {
                conversation_id,
                content: state.composer.trim().to_string(),
            });
            response.request_focus();
        }
    });
}

fn member_strip(
    ui: &mut egui::Ui,
    state: &UiState,
    p: &Palette,
    conversation_id: &str,
    group: &trip_types::chat::Conversation,
    action: &mut Option<CommunityAction>,
) {
    let my_id = state.current_user.as_ref().map(|u| u.id);
    egui::CollapsingHeader::new(
        RichText::new(format!("{} · {} members", group.name, group.members.len())).small(),
    )
    .id_salt("member_strip")
    .show(ui, |ui| {
        for member in &group.members {
            ui.horizontal(|ui| {
                ui.label(RichText::new(&member.name).color(p.text_secondary).small());
                if Some(member.id) != my_id
                    && ui.small_button(RichText::new("✕").color(p.error)).clicked()
                {
                    *action = Some(CommunityAction::RemoveMember {
                        conversation_id: conversation_id.to_string(),
                        user_id: member.id,
                    });
                }
            });
        }

        let candidates: Vec<_> = state
            .users
            .iter()
            .filter(|user| {
                Some(user.id) != my_id && !group.members.iter().any(|m| m.id == user.id)
            })
            .collect();
        if !candidates.is_empty() {
            ui.label(RichText::new("Add").color(p.accent).small());
            ui.horizontal_wrapped(|ui| {
                for user in candidates {
                    if ui
                        .small_button(RichText::new(format!("+ {}", user.name)).color(p.accent))
                        .clicked()
                    {
                        *action = Some(CommunityAction::AddMember {
                            conversation_id: conversation_id.to_string(),
                            user_id: user.id,
                        });
                    }
                }
            });
        }
    });
}

fn message_bubble(ui: &mut egui::Ui, p: &Palette, message: &ChatMessage) {
    let layout = if message.is_own {
        Layout::right_to_left(Align::Min)
    } else {
        Layout::left_to_right(Align::Min)
    };
    ui.with_layout(layout, |ui| {
        egui::Frame::default()
            .fill(if message.is_own { p.accent } else { p.bg_secondary })
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    if !message.is_own {
                        ui.label(
                            RichText::new(&message.sender_name)
                                .color(p.text_secondary)
                                .small(),
                        );
                    }
                    ui.label(RichText::new(&message.content).color(p.text_primary));
                    ui.label(
                        RichText::new(message.created_at.format("%H:%M").to_string())
                            .color(p.text_secondary)
                            .small(),
                    );
                });
            });
    });
}
