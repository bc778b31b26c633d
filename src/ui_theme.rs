use eframe::egui::{self, Color32, FontFamily, FontId, Rounding, Shadow, Stroke, Vec2};

/// Visual constants for the whole app, applied to the egui context once per
/// frame. Maroon-and-gold school palette on a dark neutral base.
pub struct StudioTheme {
    // Colors
    pub background: Color32,
    pub card: Color32,
    pub surface: Color32,
    pub surface_hover: Color32,
    pub border: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,

    // Spacing
    pub spacing_small: f32,
    pub spacing_medium: f32,
    pub spacing_large: f32,
    pub padding_medium: f32,

    // Border radius
    pub radius_small: Rounding,
    pub radius_medium: Rounding,
    pub radius_large: Rounding,

    // Shadows
    pub shadow_medium: Shadow,

    // Typography
    pub font_small: FontId,
    pub font_medium: FontId,
    pub font_title: FontId,
}

impl Default for StudioTheme {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(26, 24, 24),
            card: Color32::from_rgb(36, 33, 33),
            surface: Color32::from_rgb(48, 44, 44),
            surface_hover: Color32::from_rgb(60, 54, 54),
            border: Color32::from_rgb(78, 70, 70),
            text_primary: Color32::from_rgb(245, 240, 235),
            text_secondary: Color32::from_rgb(200, 193, 186),
            text_muted: Color32::from_rgb(145, 138, 132),
            accent: Color32::from_rgb(212, 175, 55), // gold
            success: Color32::from_rgb(82, 186, 110),
            warning: Color32::from_rgb(235, 160, 50),
            error: Color32::from_rgb(214, 69, 65),

            spacing_small: 4.0,
            spacing_medium: 8.0,
            spacing_large: 14.0,
            padding_medium: 10.0,

            radius_small: Rounding::same(4.0),
            radius_medium: Rounding::same(8.0),
            radius_large: Rounding::same(14.0),

            shadow_medium: Shadow {
                offset: Vec2::new(0.0, 2.0),
                blur: 8.0,
                spread: 0.0,
                color: Color32::from_black_alpha(40),
            },

            font_small: FontId::new(12.0, FontFamily::Proportional),
            font_medium: FontId::new(14.0, FontFamily::Proportional),
            font_title: FontId::new(20.0, FontFamily::Proportional),
        }
    }
}

impl StudioTheme {
    pub fn apply_to_ctx(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        style.visuals.panel_fill = self.background;
        style.visuals.window_fill = self.background;
        style.visuals.window_shadow = self.shadow_medium;
        style.visuals.window_rounding = self.radius_large;
        style.visuals.window_stroke = Stroke::new(1.0, self.background);

        style.visuals.button_frame = true;
        style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);
        style.visuals.widgets.inactive.bg_fill = self.surface;
        style.visuals.widgets.inactive.rounding = self.radius_medium;
        style.visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.border);

        style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);
        style.visuals.widgets.hovered.bg_fill = self.surface_hover;
        style.visuals.widgets.hovered.rounding = self.radius_medium;
        style.visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent);

        style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);
        style.visuals.widgets.active.bg_fill = self.surface_hover;
        style.visuals.widgets.active.rounding = self.radius_medium;
        style.visuals.widgets.active.bg_stroke = Stroke::new(1.0, self.accent);

        style.visuals.slider_trailing_fill = true;
        style.visuals.selection.bg_fill = self.accent.linear_multiply(0.4);
        style.visuals.selection.stroke = Stroke::new(1.0, self.accent);
        style.visuals.hyperlink_color = self.accent;

        style.text_styles = [
            (egui::TextStyle::Heading, self.font_title.clone()),
            (egui::TextStyle::Body, self.font_medium.clone()),
            (
                egui::TextStyle::Monospace,
                FontId::new(13.0, FontFamily::Monospace),
            ),
            (egui::TextStyle::Button, self.font_medium.clone()),
            (egui::TextStyle::Small, self.font_small.clone()),
        ]
        .into();

        ctx.set_style(style);
    }

    pub fn card_frame(&self) -> egui::Frame {
        egui::Frame {
            inner_margin: egui::Margin::symmetric(self.padding_medium, self.padding_medium),
            rounding: self.radius_large,
            shadow: self.shadow_medium,
            fill: self.card,
            ..Default::default()
        }
    }

    /// Border for the upload drop zone; highlighted while a drag hovers.
    pub fn drop_zone_stroke(&self, hovered: bool) -> Stroke {
        if hovered {
            Stroke::new(2.0, self.accent)
        } else {
            Stroke::new(1.0, self.border)
        }
    }
}
