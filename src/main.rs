//! Character Explorer
//! Desktop browser for the Rick and Morty character API

// Hide console window on Windows release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Use mimalloc for faster memory allocation (Linux, macOS)
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

mod api;
mod config;
mod controller;
mod favorites;
mod models;
mod query;

use api::*;
use config::*;
use controller::*;
use favorites::{FavoritesRepository, FileFavorites, MemoryFavorites};
use models::*;

const CARD_WIDTH: f32 = 190.0;
const CARD_PORTRAIT: f32 = 150.0;
const DETAIL_PORTRAIT: f32 = 220.0;
const CONSOLE_LIMIT: usize = 500;

/// Get current local time as HH:MM:SS
fn timestamp_now() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Window icon: a green portal swirl on a dark rounded square
fn load_icon() -> egui::IconData {
    let size: usize = 64;
    let mut rgba = vec![0u8; size * size * 4];

    for y in 0..size {
        for x in 0..size {
            let idx = (y * size + x) * 4;
            let nx = x as f32 / size as f32 - 0.5;
            let ny = y as f32 / size as f32 - 0.5;
            let r = (nx * nx + ny * ny).sqrt();

            let pixel: [u8; 4] = if r < 0.12 {
                [200, 255, 120, 255]
            } else if r < 0.42 {
                // Rings alternate with angle to fake a swirl
                let angle = ny.atan2(nx);
                let band = ((r * 30.0 + angle * 1.5).sin() + 1.0) * 0.5;
                let g = (170.0 + 85.0 * band) as u8;
                [(60.0 * band) as u8, g, (40.0 + 40.0 * band) as u8, 255]
            } else if nx.abs() < 0.47 && ny.abs() < 0.47 {
                [26, 26, 46, 255]
            } else {
                [0, 0, 0, 0]
            };

            rgba[idx..idx + 4].copy_from_slice(&pixel);
        }
    }

    egui::IconData {
        rgba,
        width: size as u32,
        height: size as u32,
    }
}

/// Background task messages
enum TaskResult {
    PageLoaded {
        seq: u64,
        result: Result<ApiResponse, ApiError>,
    },
    CharacterLoaded {
        seq: u64,
        result: Result<Character, ApiError>,
    },
}

/// Things the user did this frame, applied after drawing
enum UiAction {
    Search,
    ApplyFilters,
    ClearFilters,
    ChangePage(u32),
    ResetPages,
    FavoritesOnly(bool),
    ToggleFavorite(Character),
    RemoveFavorite(i64),
    ClearFavorites,
    Select(Character),
    CloseDetail,
    RefreshDetail,
    DarkMode(bool),
}

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let icon = load_icon();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([640.0, 480.0])
            .with_icon(icon),
        vsync: true,
        ..Default::default()
    };

    eframe::run_native(
        "Rick and Morty Explorer",
        options,
        Box::new(|cc| {
            // Portraits are remote JPEGs
            egui_extras::install_image_loaders(&cc.egui_ctx);
            let app = ExplorerApp::new(cc.egui_ctx.clone());
            cc.egui_ctx.set_visuals(if app.config.dark_mode {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            Ok(Box::new(app))
        }),
    )
}

struct ExplorerApp {
    config: AppConfig,
    client: Arc<CharacterClient>,
    list: ListController,

    current_tab: Tab,
    status_message: String,

    // Background task channel
    task_receiver: Receiver<TaskResult>,
    task_sender: Sender<TaskResult>,
    egui_ctx: egui::Context,

    console_log: Vec<String>,
}

impl ExplorerApp {
    fn new(egui_ctx: egui::Context) -> Self {
        let config = AppConfig::load();
        let (task_sender, task_receiver) = channel();

        let store: Box<dyn FavoritesRepository> = match app_dir() {
            Some(dir) => Box::new(FileFavorites::new(&dir)),
            None => {
                log::warn!("No config directory available, favorites will not persist");
                Box::new(MemoryFavorites::new())
            }
        };

        let client = CharacterClient::new(&config.base_url).with_user_agent(&config.user_agent);
        let list = ListController::new(client.base_url(), config.page_count, store);

        let mut app = Self {
            config,
            client: Arc::new(client),
            list,
            current_tab: Tab::Characters,
            status_message: "Ready".to_string(),
            task_receiver,
            task_sender,
            egui_ctx,
            console_log: Vec::new(),
        };

        app.log("[INFO] Character Explorer started");
        let ticket = app.list.mount();
        app.log(&format!("[INFO] Loaded {} favorites", app.list.favorites().len()));
        app.spawn_fetch(ticket);
        app
    }

    fn log(&mut self, message: &str) {
        self.console_log.push(format!("[{}] {}", timestamp_now(), message));
        if self.console_log.len() > CONSOLE_LIMIT {
            self.console_log.remove(0);
        }
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket) {
        self.status_message = "Loading characters...".to_string();
        self.log(&format!("[INFO] #{} GET {}", ticket.seq, ticket.url));

        let client = Arc::clone(&self.client);
        let sender = self.task_sender.clone();
        let ctx = self.egui_ctx.clone();

        thread::spawn(move || {
            let result = client.fetch_page(&ticket.url);
            let _ = sender.send(TaskResult::PageLoaded { seq: ticket.seq, result });
            ctx.request_repaint();
        });
    }

    fn spawn_detail_fetch(&mut self, ticket: DetailTicket) {
        self.log(&format!("[INFO] #{} Refreshing character {}", ticket.seq, ticket.id));

        let client = Arc::clone(&self.client);
        let sender = self.task_sender.clone();
        let ctx = self.egui_ctx.clone();

        thread::spawn(move || {
            let result = client.fetch_character(ticket.id);
            let _ = sender.send(TaskResult::CharacterLoaded { seq: ticket.seq, result });
            ctx.request_repaint();
        });
    }

    fn process_tasks(&mut self) {
        while let Ok(result) = self.task_receiver.try_recv() {
            match result {
                TaskResult::PageLoaded { seq, result } => {
                    if !self.list.complete(seq, result) {
                        self.log(&format!("[WARN] #{} Ignored out-of-date response", seq));
                        continue;
                    }
                    match self.list.state() {
                        ListState::Loaded => {
                            let shown = self.list.characters().len();
                            let total = self.list.info().map(|i| i.count).unwrap_or_default();
                            self.status_message = format!("Showing {} of {} characters", shown, total);
                            self.log(&format!("[INFO] #{} Loaded {} characters", seq, shown));
                        }
                        ListState::Empty => {
                            self.status_message = NO_RESULTS_MESSAGE.to_string();
                            self.log(&format!("[INFO] #{} {}", seq, NO_RESULTS_MESSAGE));
                        }
                        ListState::Errored => {
                            let msg = self.list.message().unwrap_or_default().to_string();
                            self.status_message = format!("Error: {}", msg);
                            self.log(&format!("[ERROR] #{} {}", seq, msg));
                        }
                        ListState::Idle | ListState::Loading => {}
                    }
                }
                TaskResult::CharacterLoaded { seq, result } => match self.list.complete_detail(seq, result) {
                    Ok(true) => self.log(&format!("[INFO] #{} Character refreshed", seq)),
                    Ok(false) => self.log(&format!("[WARN] #{} Ignored out-of-date character", seq)),
                    Err(e) => {
                        self.status_message = format!("Error: {}", e);
                        self.log(&format!("[ERROR] #{} {}", seq, e));
                    }
                },
            }
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Search => {
                self.log(&format!("[INFO] Searching for '{}'", self.list.search().trim()));
                let ticket = self.list.submit_search();
                self.spawn_fetch(ticket);
            }
            UiAction::ApplyFilters => {
                let ticket = self.list.submit_filters();
                self.spawn_fetch(ticket);
            }
            UiAction::ClearFilters => {
                self.list.clear_filters();
                let ticket = self.list.submit_filters();
                self.spawn_fetch(ticket);
            }
            UiAction::ChangePage(page) => {
                let ticket = self.list.change_page(page);
                self.spawn_fetch(ticket);
            }
            UiAction::ResetPages => self.list.reset_pagination(),
            UiAction::FavoritesOnly(enabled) => {
                if let Some(ticket) = self.list.set_favorites_only(enabled) {
                    self.spawn_fetch(ticket);
                } else {
                    self.status_message = format!("Showing {} favorites", self.list.displayed().len());
                }
            }
            UiAction::ToggleFavorite(character) => {
                if self.list.toggle_favorite(&character) {
                    self.status_message = format!("Added '{}' to favorites", character.name);
                } else {
                    self.status_message = format!("Removed '{}' from favorites", character.name);
                }
            }
            UiAction::RemoveFavorite(id) => {
                self.list.remove_favorite(id);
                self.status_message = "Removed from favorites".to_string();
            }
            UiAction::ClearFavorites => {
                self.list.clear_favorites();
                self.status_message = "Favorites cleared".to_string();
                self.log("[INFO] Favorites cleared");
            }
            UiAction::Select(character) => self.list.select(character),
            UiAction::CloseDetail => self.list.deselect(),
            UiAction::RefreshDetail => {
                if let Some(ticket) = self.list.refresh_detail() {
                    self.spawn_detail_fetch(ticket);
                }
            }
            UiAction::DarkMode(dark) => {
                self.config.dark_mode = dark;
                self.config.save();
                self.egui_ctx.set_visuals(if dark {
                    egui::Visuals::dark()
                } else {
                    egui::Visuals::light()
                });
            }
        }
    }

    fn show_header(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.heading("Rick and Morty Explorer");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let mut dark = self.config.dark_mode;
                if ui.checkbox(&mut dark, "🌙 Dark").changed() {
                    actions.push(UiAction::DarkMode(dark));
                }
            });
        });
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.current_tab, Tab::Characters, "👥 Characters");
            let fav_label = format!("★ Favorites ({})", self.list.favorites().len());
            ui.selectable_value(&mut self.current_tab, Tab::Favorites, fav_label);
            ui.selectable_value(&mut self.current_tab, Tab::Console, "🖥 Console");
        });
        ui.add_space(2.0);
    }

    fn show_characters_tab(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        // Search
        ui.horizontal(|ui| {
            ui.label("🔍");
            let response = ui.add(
                egui::TextEdit::singleline(self.list.search_mut())
                    .hint_text("Search by name")
                    .desired_width(240.0),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Search").clicked() || submitted {
                actions.push(UiAction::Search);
            }
        });

        // Filters
        ui.horizontal(|ui| {
            let filters = self.list.filters_mut();
            filter_combo(ui, "status_filter", "Status", &mut filters.status, STATUS_OPTIONS);
            filter_combo(ui, "gender_filter", "Gender", &mut filters.gender, GENDER_OPTIONS);
            filter_combo(ui, "species_filter", "Species", &mut filters.species, SPECIES_OPTIONS);

            if ui.button("Apply filters").clicked() {
                actions.push(UiAction::ApplyFilters);
            }
            if ui.add_enabled(!filters.is_empty(), egui::Button::new("Clear")).clicked() {
                actions.push(UiAction::ClearFilters);
            }

            ui.separator();

            let mut favorites_only = self.list.favorites_only();
            if ui.checkbox(&mut favorites_only, "★ Favorites only").changed() {
                actions.push(UiAction::FavoritesOnly(favorites_only));
            }
        });

        // Pagination
        ui.horizontal(|ui| {
            ui.label("Page:");
            for page in self.list.pages() {
                if ui.add(egui::Button::new(page.number.to_string()).selected(page.is_selected)).clicked() {
                    actions.push(UiAction::ChangePage(page.number));
                }
            }
            if ui.button("↺ Reset").on_hover_text("Clear the page selection").clicked() {
                actions.push(UiAction::ResetPages);
            }
            if let Some(info) = self.list.info() {
                ui.label(
                    egui::RichText::new(format!("{} characters · {} pages", info.count, info.pages))
                        .color(egui::Color32::GRAY),
                );
            }
        });

        ui.separator();

        if let Some(kind) = self.list.pending() {
            let text = match kind {
                FetchKind::Initial => "Loading characters...".to_string(),
                FetchKind::Search => format!("Searching for '{}'...", self.list.search().trim()),
                FetchKind::Filter => "Applying filters...".to_string(),
                FetchKind::Page(page) => format!("Loading page {}...", page),
            };
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(text);
            });
        }

        if let Some(message) = self.list.message() {
            let color = if self.list.state() == ListState::Errored {
                egui::Color32::from_rgb(230, 80, 80)
            } else {
                egui::Color32::from_rgb(230, 190, 80)
            };
            let text = if self.list.state() == ListState::Errored {
                format!("Error: {}", message)
            } else {
                message.to_string()
            };
            ui.label(egui::RichText::new(text).color(color).strong());
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for character in self.list.displayed() {
                        let is_fav = self.list.is_favorite(character.id);
                        character_card(ui, character, is_fav, actions);
                    }
                });
            });
    }

    fn show_favorites_tab(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.horizontal(|ui| {
            ui.heading("Favorites");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let enabled = !self.list.favorites().is_empty();
                if ui.add_enabled(enabled, egui::Button::new("🗑 Clear all")).clicked() {
                    actions.push(UiAction::ClearFavorites);
                }
            });
        });
        ui.separator();

        if self.list.favorites().is_empty() {
            ui.label(egui::RichText::new("No favorites yet. Use ☆ on a character card.").color(egui::Color32::GRAY));
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for character in self.list.favorites() {
                    ui.horizontal(|ui| {
                        if ui
                            .button(egui::RichText::new("★").size(18.0).color(egui::Color32::GOLD))
                            .on_hover_text("Remove from favorites")
                            .clicked()
                        {
                            actions.push(UiAction::RemoveFavorite(character.id));
                        }
                        if ui.link(egui::RichText::new(&character.name).strong()).clicked() {
                            actions.push(UiAction::Select(character.clone()));
                        }
                        ui.label(
                            egui::RichText::new(format!("{} | {}", character.status_badge(), character.species))
                                .color(egui::Color32::GRAY),
                        );
                    });
                }
            });
    }

    fn show_console_tab(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Console Log");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🗑 Clear").clicked() {
                    self.console_log.clear();
                    self.console_log.push(format!("[{}] Console cleared", timestamp_now()));
                }
            });
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in &self.console_log {
                    let color = if line.contains("[ERROR]") {
                        egui::Color32::RED
                    } else if line.contains("[WARN]") {
                        egui::Color32::YELLOW
                    } else if line.contains("[INFO]") {
                        egui::Color32::LIGHT_BLUE
                    } else {
                        egui::Color32::GRAY
                    };
                    ui.label(egui::RichText::new(line).monospace().color(color));
                }
            });
    }

    fn show_detail_window(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let Some(character) = self.list.selected() else {
            return;
        };
        let is_fav = self.list.is_favorite(character.id);
        let mut open = true;

        egui::Window::new(character.name.clone())
            .id(egui::Id::new("character_detail"))
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .default_width(420.0)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| portrait(ui, &character.image, DETAIL_PORTRAIT));
                ui.add_space(6.0);
                egui::Grid::new("detail_grid").num_columns(2).striped(true).show(ui, |ui| {
                    detail_row(ui, "Status", &character.status_badge());
                    detail_row(ui, "Species", &character.species);
                    if !character.kind.is_empty() {
                        detail_row(ui, "Type", &character.kind);
                    }
                    detail_row(ui, "Gender", &character.gender);
                    detail_row(ui, "Origin", &character.origin.name);
                    detail_row(ui, "Location", &character.location.name);
                    detail_row(ui, "Created", &character.created_display());
                });

                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if !character.image.is_empty() {
                        ui.hyperlink_to("🖼 Full size", &character.image);
                    }
                    if !character.url.is_empty() {
                        ui.hyperlink_to("🔗 API record", &character.url);
                    }
                });

                ui.add_space(6.0);
                ui.label(egui::RichText::new(format!("Episodes ({})", character.episode.len())).strong());
                egui::ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                    for episode in &character.episode {
                        ui.hyperlink_to(episode_label(episode), episode);
                    }
                });

                ui.separator();
                ui.horizontal(|ui| {
                    let fav_text = if is_fav { "★ Unfavorite" } else { "☆ Favorite" };
                    if ui.button(fav_text).clicked() {
                        actions.push(UiAction::ToggleFavorite(character.clone()));
                    }
                    if ui.button("⟳ Refresh").on_hover_text("Fetch the latest record").clicked() {
                        actions.push(UiAction::RefreshDetail);
                    }
                });
            });

        if !open {
            actions.push(UiAction::CloseDetail);
        }
    }
}

fn filter_combo(
    ui: &mut egui::Ui,
    id: &str,
    label: &str,
    value: &mut Option<String>,
    options: &[(&str, &str)],
) {
    let selected_text = value
        .as_deref()
        .and_then(|v| options.iter().find(|(_, q)| q.eq_ignore_ascii_case(v)))
        .map(|(l, _)| format!("{}: {}", label, l))
        .unwrap_or_else(|| format!("{}: Any", label));

    egui::ComboBox::from_id_salt(id)
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            ui.selectable_value(value, None, "Any");
            for (option_label, query_value) in options {
                ui.selectable_value(value, Some(query_value.to_string()), *option_label);
            }
        });
}

fn detail_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.label(egui::RichText::new(label).strong());
    ui.label(value);
    ui.end_row();
}

/// Square character portrait, loaded from its URL by the installed image loaders
fn portrait_image(url: &str, size: f32) -> Option<egui::Image<'_>> {
    if url.trim().is_empty() {
        return None;
    }
    Some(
        egui::Image::new(url)
            .fit_to_exact_size(egui::vec2(size, size))
            .corner_radius(6.0)
            .show_loading_spinner(true),
    )
}

fn portrait(ui: &mut egui::Ui, url: &str, size: f32) {
    if let Some(image) = portrait_image(url, size) {
        ui.add(image);
    }
}

fn character_card(ui: &mut egui::Ui, character: &Character, is_fav: bool, actions: &mut Vec<UiAction>) {
    ui.group(|ui| {
        ui.set_width(CARD_WIDTH);
        ui.vertical_centered(|ui| {
            portrait(ui, &character.image, CARD_PORTRAIT);
            ui.label(egui::RichText::new(&character.name).strong().size(15.0));
            ui.label(egui::RichText::new(format!("{} | {}", character.status_badge(), character.species)).size(12.0));
            ui.label(egui::RichText::new(format!("📍 Location: {}", character.location.name)).size(10.0));

            ui.horizontal(|ui| {
                let fav_text = if is_fav {
                    egui::RichText::new("★").size(18.0).color(egui::Color32::GOLD)
                } else {
                    egui::RichText::new("☆").size(18.0).color(egui::Color32::GRAY)
                };
                if ui
                    .button(fav_text)
                    .on_hover_text(if is_fav { "Remove from favorites" } else { "Add to favorites" })
                    .clicked()
                {
                    actions.push(UiAction::ToggleFavorite(character.clone()));
                }
                if ui.button("Details").clicked() {
                    actions.push(UiAction::Select(character.clone()));
                }
            });
        });
    });
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Process background task results (non-blocking)
        self.process_tasks();

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.show_header(ui, &mut actions);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.list.is_loading() {
                    ui.spinner();
                }
                ui.label(&self.status_message);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.current_tab {
            Tab::Characters => self.show_characters_tab(ui, &mut actions),
            Tab::Favorites => self.show_favorites_tab(ui, &mut actions),
            Tab::Console => self.show_console_tab(ui),
        });

        self.show_detail_window(ctx, &mut actions);

        for action in actions {
            self.apply(action);
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
