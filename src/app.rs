use eframe::egui::{self, RichText};
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::compositor;
use crate::config::AppConfig;
use crate::exporter::{self, ExportError, ExportRequest, EXPORT_FILE_NAME};
use crate::loader::{self, LoadError, LoadedPhoto};
use crate::toast::Toasts;
use crate::transform::{Transform, TransformLimits};
use crate::ui_theme::StudioTheme;

const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Completion events delivered by background jobs. Exactly one event per
/// spawned job.
enum StudioEvent {
    PhotoDecoded {
        generation: u64,
        result: Result<LoadedPhoto, LoadError>,
    },
    OverlayLoaded(Result<Arc<RgbaImage>, LoadError>),
    ExportFinished(Result<PathBuf, ExportError>),
}

enum OverlayState {
    Loading,
    Ready(Arc<RgbaImage>),
    /// Asset missing or corrupt; rendering proceeds without the frame layer.
    Missing,
}

impl OverlayState {
    fn image(&self) -> Option<&Arc<RgbaImage>> {
        match self {
            OverlayState::Ready(image) => Some(image),
            _ => None,
        }
    }
}

pub struct FrameStudioApp {
    config: AppConfig,
    limits: TransformLimits,
    theme: StudioTheme,
    toasts: Toasts,

    // Document state — only ever touched from `update`
    source: Option<LoadedPhoto>,
    overlay: OverlayState,
    transform: Transform,

    // Preview
    preview_texture: Option<egui::TextureHandle>,
    preview_dirty: bool,

    // In-flight jobs
    decode_generation: u64,
    decoding: bool,
    exporting: bool,

    // Runtime + completion channel
    runtime: tokio::runtime::Runtime,
    event_sender: mpsc::UnboundedSender<StudioEvent>,
    event_receiver: mpsc::UnboundedReceiver<StudioEvent>,
}

impl FrameStudioApp {
    pub fn new() -> Self {
        let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
        let (event_sender, event_receiver) = mpsc::unbounded_channel::<StudioEvent>();

        let config = AppConfig::load();
        let limits = config.transform_limits();

        let mut app = Self {
            config,
            limits,
            theme: StudioTheme::default(),
            toasts: Toasts::default(),
            source: None,
            overlay: OverlayState::Loading,
            transform: Transform::default(),
            preview_texture: None,
            preview_dirty: false,
            decode_generation: 0,
            decoding: false,
            exporting: false,
            runtime,
            event_sender,
            event_receiver,
        };
        app.begin_overlay_load();
        app
    }

    fn begin_overlay_load(&mut self) {
        let path = self.config.frame_path.clone();
        let sender = self.event_sender.clone();
        self.runtime.spawn(async move {
            let result = loader::load_overlay(path).await;
            let _ = sender.send(StudioEvent::OverlayLoaded(result));
        });
    }

    /// Kick off a decode for a newly selected photo. Each request bumps the
    /// generation counter; a slower, superseded decode that resolves later is
    /// discarded when its event arrives.
    fn begin_decode(&mut self, path: PathBuf) {
        self.decode_generation += 1;
        self.decoding = true;

        let generation = self.decode_generation;
        let sender = self.event_sender.clone();
        self.runtime.spawn(async move {
            let result = loader::load_photo(path).await;
            let _ = sender.send(StudioEvent::PhotoDecoded { generation, result });
        });
    }

    fn pick_photo(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", ACCEPTED_EXTENSIONS)
            .pick_file()
        {
            self.begin_decode(path);
        }
    }

    /// OS drag-and-drop onto the window. A dropped file may carry an explicit
    /// MIME string; otherwise its extension declares the type.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<egui::DroppedFile> = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            let Some(path) = file.path else { continue };
            let declared = if file.mime.is_empty() {
                loader::declared_mime(&path).unwrap_or("application/octet-stream")
            } else {
                file.mime.as_str()
            };
            match loader::validate_mime(declared) {
                Ok(()) => {
                    self.begin_decode(path);
                    // Single-document app: only the first valid drop counts.
                    break;
                }
                Err(e) => self.toasts.error(e.to_string()),
            }
        }
    }

    fn begin_export(&mut self) {
        let Some(source) = &self.source else {
            self.toasts.error("No photo to export");
            return;
        };

        let destination = match &self.config.export_dir {
            Some(dir) => dir.join(EXPORT_FILE_NAME),
            None => {
                let picked = rfd::FileDialog::new()
                    .add_filter("PNG image", &["png"])
                    .set_file_name(EXPORT_FILE_NAME)
                    .save_file();
                match picked {
                    Some(path) => path,
                    None => return, // user cancelled
                }
            }
        };

        let request = ExportRequest {
            source: source.image.clone(),
            overlay: self.overlay.image().cloned(),
            transform: self.transform,
            preview_size: self.config.preview_size,
            export_size: self.config.export_size,
            destination,
        };

        self.exporting = true;
        let sender = self.event_sender.clone();
        self.runtime.spawn(async move {
            let result = exporter::run(request).await;
            let _ = sender.send(StudioEvent::ExportFinished(result));
        });
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            match event {
                StudioEvent::PhotoDecoded { generation, result } => {
                    if generation != self.decode_generation {
                        log::debug!("discarding stale decode (generation {})", generation);
                        continue;
                    }
                    self.decoding = false;
                    match result {
                        Ok(photo) => {
                            log::info!(
                                "photo ready: {} ({}x{})",
                                photo.file_name,
                                photo.width(),
                                photo.height()
                            );
                            self.toasts.success(format!("Loaded {}", photo.file_name));
                            self.source = Some(photo);
                            self.transform.reset();
                            self.preview_dirty = true;
                        }
                        // Previous photo (if any) stays untouched.
                        Err(e) => self.toasts.error(e.to_string()),
                    }
                }
                StudioEvent::OverlayLoaded(result) => match result {
                    Ok(image) => {
                        self.overlay = OverlayState::Ready(image);
                        self.preview_dirty = true;
                    }
                    Err(e) => {
                        log::warn!("frame overlay unavailable: {}", e);
                        self.overlay = OverlayState::Missing;
                        self.toasts
                            .error("Frame overlay could not be loaded — composing without it");
                    }
                },
                StudioEvent::ExportFinished(result) => {
                    self.exporting = false;
                    match result {
                        Ok(path) => self
                            .toasts
                            .success(format!("Exported {}", path.display())),
                        Err(e) => self.toasts.error(e.to_string()),
                    }
                }
            }
        }
    }

    /// Re-render the composite into the preview texture. The composite is a
    /// pure function of (source, overlay, transform), recomputed from scratch
    /// whenever any of them changed.
    fn refresh_preview(&mut self, ctx: &egui::Context) {
        let Some(source) = &self.source else {
            self.preview_texture = None;
            self.preview_dirty = false;
            return;
        };

        let composite = compositor::render_composite(
            &source.image,
            self.overlay.image().map(Arc::as_ref),
            &self.transform,
            self.config.preview_size,
        );
        let size = [composite.width() as usize, composite.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, composite.as_raw());

        match &mut self.preview_texture {
            Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
            None => {
                self.preview_texture =
                    Some(ctx.load_texture("preview", color_image, egui::TextureOptions::LINEAR));
            }
        }
        self.preview_dirty = false;
    }
}

impl eframe::App for FrameStudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.theme.apply_to_ctx(ctx);

        self.drain_events();
        self.handle_dropped_files(ctx);

        if self.preview_dirty {
            self.refresh_preview(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(self.theme.spacing_medium);
            ui.horizontal(|ui| {
                ui.heading(
                    RichText::new("Frame Studio")
                        .color(self.theme.text_primary)
                        .strong(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.decoding {
                        ui.spinner();
                        ui.label(
                            RichText::new("Loading photo…").color(self.theme.text_muted),
                        );
                    }
                });
            });
            ui.add_space(self.theme.spacing_medium);

            if self.source.is_none() {
                self.show_upload_panel(ui, ctx);
            } else {
                ui.horizontal_top(|ui| {
                    self.show_preview_panel(ui);
                    ui.add_space(self.theme.spacing_large);
                    self.show_control_panel(ui);
                });
            }
        });

        self.toasts.show(ctx, &self.theme);

        if self.decoding || self.exporting {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

impl FrameStudioApp {
    fn show_upload_panel(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let drag_hover = ctx.input(|i| !i.raw.hovered_files.is_empty());

        let frame = egui::Frame {
            inner_margin: egui::Margin::symmetric(24.0, 48.0),
            rounding: self.theme.radius_large,
            fill: self.theme.card,
            stroke: self.theme.drop_zone_stroke(drag_hover),
            ..Default::default()
        };

        frame.show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new("🖼 Add your photo")
                        .size(18.0)
                        .strong()
                        .color(self.theme.text_primary),
                );
                ui.add_space(self.theme.spacing_small);
                ui.label(
                    RichText::new("Drag & drop an image here, or")
                        .color(self.theme.text_secondary),
                );
                ui.add_space(self.theme.spacing_medium);
                if ui
                    .button(RichText::new("Choose a photo…").size(14.0))
                    .clicked()
                {
                    self.pick_photo();
                }
                ui.add_space(self.theme.spacing_medium);
                ui.label(
                    RichText::new("JPG, PNG, GIF or WebP")
                        .size(12.0)
                        .color(self.theme.text_muted),
                );
            });
        });
    }

    fn show_preview_panel(&mut self, ui: &mut egui::Ui) {
        let edge = self.config.preview_size as f32;
        self.theme.card_frame().show(ui, |ui| {
            match &self.preview_texture {
                Some(texture) => {
                    ui.add(
                        egui::Image::new(texture)
                            .fit_to_exact_size(egui::vec2(edge, edge))
                            .rounding(self.theme.radius_small),
                    );
                }
                None => {
                    // Texture lags one frame behind the first decode
                    ui.allocate_space(egui::vec2(edge, edge));
                }
            }
        });
    }

    fn show_control_panel(&mut self, ui: &mut egui::Ui) {
        self.theme.card_frame().show(ui, |ui| {
            ui.set_width(260.0);
            ui.vertical(|ui| {
                ui.label(
                    RichText::new("Adjust")
                        .size(16.0)
                        .strong()
                        .color(self.theme.text_primary),
                );
                if let Some(source) = &self.source {
                    ui.label(
                        RichText::new(&source.file_name)
                            .size(12.0)
                            .color(self.theme.text_muted),
                    );
                }
                ui.add_space(self.theme.spacing_medium);

                let mut changed = false;

                ui.label(RichText::new("Scale").color(self.theme.text_secondary));
                changed |= ui
                    .add(
                        egui::Slider::new(
                            &mut self.transform.scale,
                            self.limits.scale_min..=self.limits.scale_max,
                        )
                        .step_by(self.limits.scale_step as f64)
                        .fixed_decimals(1),
                    )
                    .changed();
                ui.add_space(self.theme.spacing_small);

                ui.label(RichText::new("Position X").color(self.theme.text_secondary));
                changed |= ui
                    .add(egui::Slider::new(
                        &mut self.transform.offset_x,
                        -self.limits.offset_range..=self.limits.offset_range,
                    ))
                    .changed();
                ui.add_space(self.theme.spacing_small);

                ui.label(RichText::new("Position Y").color(self.theme.text_secondary));
                changed |= ui
                    .add(egui::Slider::new(
                        &mut self.transform.offset_y,
                        -self.limits.offset_range..=self.limits.offset_range,
                    ))
                    .changed();

                if changed {
                    self.transform.clamp_to(&self.limits);
                    self.preview_dirty = true;
                }

                ui.add_space(self.theme.spacing_large);

                ui.horizontal(|ui| {
                    if ui.button("Reset").clicked() {
                        self.transform.reset();
                        self.preview_dirty = true;
                    }
                    if ui.button("Replace photo…").clicked() {
                        self.pick_photo();
                    }
                });

                ui.add_space(self.theme.spacing_medium);
                ui.separator();
                ui.add_space(self.theme.spacing_medium);

                ui.horizontal(|ui| {
                    let export_button = egui::Button::new(
                        RichText::new("⬇ Download framed photo")
                            .color(egui::Color32::WHITE)
                            .strong(),
                    )
                    .fill(self.theme.accent.linear_multiply(0.9))
                    .rounding(self.theme.radius_medium);

                    if ui.add_enabled(!self.exporting, export_button).clicked() {
                        self.begin_export();
                    }
                    if self.exporting {
                        ui.spinner();
                    }
                });

                if matches!(self.overlay, OverlayState::Missing) {
                    ui.add_space(self.theme.spacing_small);
                    ui.label(
                        RichText::new("⚠ frame graphic unavailable")
                            .size(12.0)
                            .color(self.theme.warning),
                    );
                }
            });
        });
    }
}
