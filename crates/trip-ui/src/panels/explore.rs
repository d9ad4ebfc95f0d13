//! Explore view: hotel listings plus flight/train search tabs.

use egui::{self, RichText, ScrollArea, Vec2};

use trip_types::travel::{Flight, Hotel, Train};

use crate::state::{HotelSort, TravelTab, UiState};
use crate::theme::{palette, Palette, PANEL_PADDING, PANEL_ROUNDING};

pub enum ExploreAction {
    OpenDetails(u64),
    ToggleWishlist(u64),
    SearchFlights { from: String, to: String },
    SearchTrains { from: String, to: String },
    BookFlight(Flight),
    BookTrain(Train),
}

pub fn explore_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<ExploreAction> {
    let p = palette(state.theme);
    let mut action = None;

    egui::Frame::default()
        .fill(p.bg_primary)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                for (tab, label) in [
                    (TravelTab::Hotels, "Hotels"),
                    (TravelTab::Flights, "Flights"),
                    (TravelTab::Trains, "Trains"),
                ] {
                    let selected = state.search.tab == tab;
                    let button = egui::Button::new(
                        RichText::new(label)
                            .color(if selected { p.text_primary } else { p.text_secondary }),
                    )
                    .fill(if selected { p.accent } else { p.bg_surface })
                    .corner_radius(PANEL_ROUNDING);
                    if ui.add(button).clicked() {
                        state.search.tab = tab;
                    }
                }
            });

            ui.separator();

            match state.search.tab {
                TravelTab::Hotels => hotel_list(ui, state, p, &mut action),
                TravelTab::Flights | TravelTab::Trains => search_view(ui, state, p, &mut action),
            }
        });

    action
}

fn hotel_list(
    ui: &mut egui::Ui,
    state: &mut UiState,
    p: &Palette,
    action: &mut Option<ExploreAction>,
) {
    if state.hotels.is_empty() {
        ui.label(RichText::new("No stays found yet.").color(p.text_secondary));
        return;
    }

    ui.horizontal(|ui| {
        ui.label(RichText::new("Sort").color(p.text_secondary).small());
        for (sort, label) in [
            (HotelSort::Featured, "Featured"),
            (HotelSort::PriceAsc, "Price"),
            (HotelSort::RatingDesc, "Rating"),
        ] {
            let selected = state.search.hotel_sort == sort;
            if ui
                .selectable_label(selected, RichText::new(label).small())
                .clicked()
            {
                state.search.hotel_sort = sort;
            }
        }
    });
    ui.add_space(4.0);

    let state = &*state;
    let mut hotels: Vec<&Hotel> = state.hotels.iter().collect();
    match state.search.hotel_sort {
        HotelSort::Featured => {}
        HotelSort::PriceAsc => hotels.sort_by(|a, b| a.price.total_cmp(&b.price)),
        HotelSort::RatingDesc => hotels.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }

    ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        for hotel in hotels {
            hotel_card(ui, state, p, hotel, action);
            ui.add_space(6.0);
        }
    });
}

fn hotel_card(
    ui: &mut egui::Ui,
    state: &UiState,
    p: &Palette,
    hotel: &Hotel,
    action: &mut Option<ExploreAction>,
) {
    egui::Frame::default()
        .fill(p.bg_secondary)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(&hotel.name).color(p.text_primary).strong());
                    ui.label(RichText::new(&hotel.location).color(p.text_secondary).small());
                    ui.label(
                        RichText::new(format!(
                            "★ {:.1} ({} reviews)",
                            hotel.rating, hotel.review_count
                        ))
                        .color(p.warning)
                        .small(),
                    );
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(format!("${:.0}/night", hotel.price))
                            .color(p.accent)
                            .strong(),
                    );
                    if ui
                        .add(
                            egui::Button::new(RichText::new("View").color(p.text_primary))
                                .fill(p.bg_surface)
                                .corner_radius(PANEL_ROUNDING),
                        )
                        .clicked()
                    {
                        *action = Some(ExploreAction::OpenDetails(hotel.id));
                    }
                    let heart = if state.is_wishlisted(hotel.id) { "♥" } else { "♡" };
                    if ui
                        .add(
                            egui::Button::new(RichText::new(heart).color(p.error))
                                .fill(p.bg_surface)
                                .corner_radius(PANEL_ROUNDING),
                        )
                        .clicked()
                    {
                        *action = Some(ExploreAction::ToggleWishlist(hotel.id));
                    }
                });
            });
        });
}

fn search_view(
    ui: &mut egui::Ui,
    state: &mut UiState,
    p: &Palette,
    action: &mut Option<ExploreAction>,
) {
    ui.horizontal(|ui| {
        ui.label(RichText::new("From").color(p.text_secondary).small());
        ui.add(egui::TextEdit::singleline(&mut state.search.from).desired_width(120.0));
        ui.label(RichText::new("To").color(p.text_secondary).small());
        ui.add(egui::TextEdit::singleline(&mut state.search.to).desired_width(120.0));

        let can_search = !state.search.busy
            && !state.search.from.trim().is_empty()
            && !state.search.to.trim().is_empty();
        let button = ui.add_enabled(
            can_search,
            egui::Button::new(RichText::new("Search").color(p.text_primary))
                .fill(p.accent)
                .corner_radius(PANEL_ROUNDING)
                .min_size(Vec2::new(70.0, 0.0)),
        );
        if button.clicked() {
            state.search.busy = true;
            let from = state.search.from.trim().to_string();
            let to = state.search.to.trim().to_string();
            *action = Some(match state.search.tab {
                TravelTab::Trains => ExploreAction::SearchTrains { from, to },
                _ => ExploreAction::SearchFlights { from, to },
            });
        }
    });

    ui.add_space(8.0);

    ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        match state.search.tab {
            TravelTab::Flights => {
                for flight in &state.flights {
                    result_row(
                        ui,
                        p,
                        &flight.airline,
                        &format!("{} → {}", flight.departure_city, flight.arrival_city),
                        &format!("{} · {}", flight.duration, flight.seat_class),
                        flight.price,
                        || ExploreAction::BookFlight(flight.clone()),
                        action,
                    );
                }
            }
            TravelTab::Trains => {
                for train in &state.trains {
                    result_row(
                        ui,
                        p,
                        &train.train_name,
                        &format!("{} → {}", train.departure_city, train.arrival_city),
                        &format!("{} · {}", train.duration, train.train_class),
                        train.price,
                        || ExploreAction::BookTrain(train.clone()),
                        action,
                    );
                }
            }
            TravelTab::Hotels => {}
        }
    });
}

#[allow(clippy::too_many_arguments)]
fn result_row(
    ui: &mut egui::Ui,
    p: &Palette,
    title: &str,
    route: &str,
    detail: &str,
    price: f64,
    make_action: impl FnOnce() -> ExploreAction,
    action: &mut Option<ExploreAction>,
) {
    egui::Frame::default()
        .fill(p.bg_secondary)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(title).color(p.text_primary).strong());
                    ui.label(RichText::new(route).color(p.text_secondary).small());
                    ui.label(RichText::new(detail).color(p.text_secondary).small());
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add(
                            egui::Button::new(RichText::new("Book").color(p.text_primary))
                                .fill(p.accent)
                                .corner_radius(PANEL_ROUNDING),
                        )
                        .clicked()
                    {
                        *action = Some(make_action());
                    }
                    ui.label(
                        RichText::new(format!("${:.0}", price))
                            .color(p.accent)
                            .strong(),
                    );
                });
            });
        });
    ui.add_space(6.0);
}
