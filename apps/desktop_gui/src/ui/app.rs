use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossbeam_channel::{Receiver, Sender};
use directory_client::{DEFAULT_ENDPOINT, DEFAULT_RESULT_COUNT};
use directory_core::{CollationError, DirectorySession, SortKey, UserRecord};
use eframe::egui;
use egui::TextureHandle;
use image::GenericImageView;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{
    classify_fetch_failure, err_label, UiErrorContext, UiEvent,
};
use crate::controller::orchestration::dispatch_backend_command;

/// Decode edge for avatar thumbnails, twice the display size.
const AVATAR_DECODE_EDGE: u32 = 96;
const AVATAR_DISPLAY_SIZE: f32 = 40.0;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub endpoint: String,
    pub result_count: u32,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            result_count: DEFAULT_RESULT_COUNT,
        }
    }
}

impl StartupConfig {
    /// Defaults, overridden by environment, overridden by CLI flags.
    pub fn load(endpoint: Option<String>, results: Option<u32>) -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var("DIRECTORY_ENDPOINT") {
            if !value.trim().is_empty() {
                config.endpoint = value;
            }
        }
        if let Ok(value) = std::env::var("DIRECTORY_RESULTS") {
            match value.parse::<u32>() {
                Ok(parsed) => config.result_count = parsed,
                Err(_) => tracing::warn!(value, "ignoring unparseable DIRECTORY_RESULTS"),
            }
        }
        if let Some(endpoint) = endpoint {
            config.endpoint = endpoint;
        }
        if let Some(results) = results {
            config.result_count = results;
        }
        config
    }
}

/// RGBA pixels decoded off the UI thread; the texture is uploaded lazily on
/// first render.
#[derive(Debug, Clone)]
pub struct AvatarImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

enum AvatarState {
    NotRequested,
    Loading,
    Ready {
        image: AvatarImage,
        texture: Option<TextureHandle>,
    },
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirectoryFetchStatus {
    Pending,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

pub struct DirectoryGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    config: StartupConfig,
    session: DirectorySession,
    filter_input: String,

    avatars: HashMap<String, AvatarState>,
    fetch_status: DirectoryFetchStatus,
    loaded_at: Option<DateTime<Local>>,

    status: String,
    status_banner: Option<StatusBanner>,
}

impl DirectoryGuiApp {
    pub fn new(
        config: StartupConfig,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Result<Self, CollationError> {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            config,
            session: DirectorySession::new()?,
            filter_input: String::new(),
            avatars: HashMap::new(),
            fetch_status: DirectoryFetchStatus::Pending,
            loaded_at: None,
            status: "Fetching user directory...".to_string(),
            status_banner: None,
        };
        dispatch_backend_command(&app.cmd_tx, BackendCommand::FetchUsers, &mut app.status);
        Ok(app)
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::UsersLoaded { records } => {
                    let count = records.len();
                    // A stray second batch is dropped by the session; only an
                    // accepted load may touch the status line and timestamp.
                    if self.session.load_users(records) {
                        self.fetch_status = DirectoryFetchStatus::Loaded;
                        self.loaded_at = Some(Local::now());
                        self.status = format!("Loaded {count} users");
                        self.status_banner = None;
                    } else {
                        tracing::warn!(count, "dropping unexpected user batch");
                    }
                }
                UiEvent::Error(error) => {
                    tracing::error!(context = ?error.context(), "worker error: {}", error.message());
                    if matches!(
                        error.context(),
                        UiErrorContext::WorkerStartup | UiErrorContext::DirectoryFetch
                    ) && self.fetch_status != DirectoryFetchStatus::Loaded
                    {
                        self.fetch_status = DirectoryFetchStatus::Failed;
                    }
                    self.status = format!("{} error", err_label(error.category()));
                    self.status_banner = Some(StatusBanner {
                        severity: StatusBannerSeverity::Error,
                        message: classify_fetch_failure(&error),
                    });
                }
                UiEvent::AvatarLoaded { email, image } => {
                    self.avatars.insert(
                        email,
                        AvatarState::Ready {
                            image,
                            texture: None,
                        },
                    );
                }
                UiEvent::AvatarFailed { email, reason } => {
                    tracing::debug!(email, "avatar unavailable: {reason}");
                    self.avatars.insert(email, AvatarState::Failed);
                }
            }
        }
    }

    fn has_work_in_flight(&self) -> bool {
        self.fetch_status == DirectoryFetchStatus::Pending
            || self
                .avatars
                .values()
                .any(|state| matches!(state, AvatarState::Loading))
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.heading("User Directory");
            ui.separator();

            let color_rows = self.session.ui().color_rows;
            if ui.selectable_label(color_rows, "Color rows").clicked() {
                self.session.toggle_color_rows();
            }

            let country_toggle_label = if self.session.ui().sort_key == SortKey::Country {
                "Do not sort countries"
            } else {
                "Sort countries"
            };
            if ui.button(country_toggle_label).clicked() {
                self.session.toggle_country_sort();
            }

            if ui.button("Reset users").clicked() && self.session.reset_users() {
                self.status = "Restored the originally fetched users".to_string();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let filter_edit = egui::TextEdit::singleline(&mut self.filter_input)
                    .id_salt("country_filter")
                    .hint_text("Filter by country")
                    .desired_width(220.0);
                if ui.add(filter_edit).changed() {
                    self.session
                        .set_filter_text(Some(self.filter_input.clone()));
                }
            });
        });
        ui.add_space(6.0);
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(6.0);
        }
    }

    fn show_directory_table(&mut self, ui: &mut egui::Ui) {
        match self.fetch_status {
            DirectoryFetchStatus::Pending => {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.spinner();
                    ui.label("Loading users...");
                });
                return;
            }
            DirectoryFetchStatus::Failed => {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.colored_label(
                        ui.visuals().error_fg_color,
                        "The user directory could not be loaded.",
                    );
                    ui.add_space(8.0);
                    if ui.button("Retry").clicked() {
                        self.fetch_status = DirectoryFetchStatus::Pending;
                        self.status = "Retrying user directory fetch...".to_string();
                        dispatch_backend_command(
                            &self.cmd_tx,
                            BackendCommand::FetchUsers,
                            &mut self.status,
                        );
                    }
                });
                return;
            }
            DirectoryFetchStatus::Loaded => {}
        }

        let rows = self.session.visible_users().to_vec();
        let color_rows = self.session.ui().color_rows;
        let sort_key = self.session.ui().sort_key;

        if rows.is_empty() {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                if self.session.users().is_empty() {
                    ui.label("No users in the list. Reset users restores the fetched batch.");
                } else {
                    ui.label("No users match the current filter.");
                }
            });
            return;
        }

        let mut deleted: Option<String> = None;
        egui::ScrollArea::vertical()
            .id_salt("directory_rows")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Grid::new("directory_grid")
                    .striped(color_rows)
                    .num_columns(5)
                    .spacing([16.0, 8.0])
                    .show(ui, |ui| {
                        self.show_table_header(ui, sort_key);
                        for record in &rows {
                            self.show_avatar_cell(ui, record);
                            ui.label(&record.name.first);
                            ui.label(&record.name.last);
                            ui.label(&record.location.country);
                            if ui.button("Delete").clicked() {
                                deleted = Some(record.email.clone());
                            }
                            ui.end_row();
                        }
                    });
            });

        if let Some(email) = deleted {
            if self.session.delete_user(&email) {
                self.status = format!("Deleted {email}");
            }
        }
    }

    fn show_table_header(&mut self, ui: &mut egui::Ui, active: SortKey) {
        ui.label(egui::RichText::new("Photo").strong());
        self.sortable_header(ui, "First name", SortKey::FirstName, active);
        self.sortable_header(ui, "Last name", SortKey::LastName, active);
        self.sortable_header(ui, "Country", SortKey::Country, active);
        ui.label(egui::RichText::new("Actions").strong());
        ui.end_row();
    }

    /// Clickable column header. Clicking always selects that column's key;
    /// only the dedicated toggle button returns the table to unsorted.
    fn sortable_header(&mut self, ui: &mut egui::Ui, label: &str, key: SortKey, active: SortKey) {
        let text = egui::RichText::new(label).strong();
        if ui
            .selectable_label(active == key, text)
            .on_hover_text("Sort by this column")
            .clicked()
        {
            self.session.set_sort_key(key);
        }
    }

    fn show_avatar_cell(&mut self, ui: &mut egui::Ui, record: &UserRecord) {
        let state = self
            .avatars
            .entry(record.email.clone())
            .or_insert(AvatarState::NotRequested);

        if matches!(state, AvatarState::NotRequested) {
            *state = AvatarState::Loading;
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::FetchAvatar {
                    email: record.email.clone(),
                    url: record.picture.thumbnail.clone(),
                },
                &mut self.status,
            );
        }

        match state {
            AvatarState::NotRequested | AvatarState::Loading => {
                ui.add(egui::Spinner::new().size(AVATAR_DISPLAY_SIZE * 0.5));
            }
            AvatarState::Failed => {
                ui.label(egui::RichText::new("n/a").weak());
            }
            AvatarState::Ready { image, texture } => {
                if texture.is_none() {
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [image.width, image.height],
                        &image.rgba,
                    );
                    *texture = Some(ui.ctx().load_texture(
                        format!("avatar_{}", record.email),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ));
                }
                if let Some(texture) = texture.as_ref() {
                    ui.add(
                        egui::Image::new(texture)
                            .fit_to_exact_size(egui::vec2(AVATAR_DISPLAY_SIZE, AVATAR_DISPLAY_SIZE)),
                    );
                }
            }
        }
    }

    fn show_status_bar(&mut self, ui: &mut egui::Ui) {
        let shown = self.session.visible_users().len();
        let total = self.session.users().len();

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label(&self.status);
            ui.separator();
            match self.loaded_at {
                Some(at) => {
                    ui.label(format!(
                        "{shown} of {total} users shown, loaded at {}",
                        at.format("%H:%M:%S")
                    ));
                }
                None => {
                    ui.label("No users loaded");
                }
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(self.config.endpoint.as_str()).weak());
            });
        });
        ui.add_space(4.0);
    }
}

impl eframe::App for DirectoryGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("directory_header").show(ctx, |ui| self.show_header(ui));
        egui::TopBottomPanel::bottom("directory_status_bar")
            .show(ctx, |ui| self.show_status_bar(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            self.show_directory_table(ui);
        });

        // Worker completions arrive over the channel; poll for them even
        // when the user is idle.
        if self.has_work_in_flight() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }
}

/// Decodes into RGBA and scales down to the decode edge. Images already
/// within the edge are kept at their native size.
pub(crate) fn decode_avatar_image(bytes: &[u8]) -> Result<AvatarImage, String> {
    let decoded = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let (orig_w, orig_h) = decoded.dimensions();
    let resized = if orig_w > AVATAR_DECODE_EDGE || orig_h > AVATAR_DECODE_EDGE {
        decoded.thumbnail(AVATAR_DECODE_EDGE, AVATAR_DECODE_EDGE)
    } else {
        decoded
    };
    let rgba = resized.to_rgba8();
    let width = rgba.width() as usize;
    let height = rgba.height() as usize;
    Ok(AvatarImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}
