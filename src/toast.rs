//! Transient user-facing notifications, stacked in the top-right corner and
//! expired by age.

use eframe::egui::{self, Align2, Color32, RichText};
use std::time::{Duration, Instant};

use crate::ui_theme::StudioTheme;

const TOAST_LIFETIME: Duration = Duration::from_secs(4);
const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    created: Instant,
}

#[derive(Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.items.push(Toast {
            message: message.into(),
            kind,
            created: Instant::now(),
        });
        // Drop the oldest rather than stacking indefinitely.
        if self.items.len() > MAX_VISIBLE {
            let excess = self.items.len() - MAX_VISIBLE;
            self.items.drain(0..excess);
        }
    }

    /// Draw live toasts and drop expired ones. Requests a repaint while any
    /// toast is visible so expiry happens even when the user is idle.
    pub fn show(&mut self, ctx: &egui::Context, theme: &StudioTheme) {
        self.items
            .retain(|toast| toast.created.elapsed() < TOAST_LIFETIME);
        if self.items.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toast_stack"))
            .anchor(Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
            .interactable(false)
            .show(ctx, |ui| {
                for toast in &self.items {
                    let fill = match toast.kind {
                        ToastKind::Info => theme.surface,
                        ToastKind::Success => theme.success,
                        ToastKind::Error => theme.error,
                    };
                    egui::Frame {
                        inner_margin: egui::Margin::symmetric(12.0, 8.0),
                        rounding: theme.radius_medium,
                        shadow: theme.shadow_medium,
                        fill,
                        ..Default::default()
                    }
                    .show(ui, |ui| {
                        ui.set_max_width(300.0);
                        ui.label(
                            RichText::new(&toast.message)
                                .size(13.0)
                                .color(Color32::WHITE),
                        );
                    });
                    ui.add_space(theme.spacing_small);
                }
            });

        ctx.request_repaint_after(Duration::from_millis(250));
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.items.len()
    }
}
