use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, Stroke, TextStyle};

#[derive(Debug, Clone)]
pub struct Theme {
    pub surface_0: Color32,
    pub surface_1: Color32,
    pub surface_2: Color32,
    pub accent_primary: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub danger: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub text_on_accent: Color32,
    pub border_subtle: Color32,
    pub spacing_4: f32,
    pub spacing_8: f32,
    pub spacing_12: f32,
    pub spacing_16: f32,
    pub radius_8: u8,
    pub radius_12: u8,
    pub button_height: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface_0: Color32::from_rgb(0xFF, 0xFF, 0xFF),
            surface_1: Color32::from_rgb(0xF7, 0xF8, 0xFA),
            surface_2: Color32::from_rgb(0xEC, 0xEE, 0xF2),
            accent_primary: Color32::from_rgb(0xFF, 0x4B, 0x4B),
            success: Color32::from_rgb(0x21, 0xC3, 0x54),
            warning: Color32::from_rgb(0xB8, 0x86, 0x0B),
            danger: Color32::from_rgb(0xD3, 0x2F, 0x2F),
            text_primary: Color32::from_rgb(0x26, 0x27, 0x30),
            text_muted: Color32::from_rgb(0x6B, 0x6F, 0x7B),
            text_on_accent: Color32::WHITE,
            border_subtle: Color32::from_rgba_premultiplied(0, 0, 0, 20),
            spacing_4: 4.0,
            spacing_8: Self::P8,
            spacing_12: Self::P12,
            spacing_16: Self::P16,
            radius_8: Self::R8,
            radius_12: Self::R12,
            button_height: 35.0,
        }
    }
}

impl Theme {
    pub const R8: u8 = 8;
    pub const R12: u8 = 12;
    pub const P8: f32 = 8.0;
    pub const P12: f32 = 12.0;
    pub const P16: f32 = 16.0;

    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::light();
        visuals.panel_fill = self.surface_1;
        visuals.override_text_color = Some(self.text_primary);
        visuals.widgets.noninteractive.bg_fill = self.surface_0;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border_subtle);
        visuals.widgets.inactive.bg_fill = self.surface_2;
        visuals.widgets.inactive.weak_bg_fill = self.surface_2;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent_primary);
        visuals.selection.bg_fill = self.accent_primary;
        visuals.extreme_bg_color = self.surface_0;
        visuals.window_fill = self.surface_1;
        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(10.0, 10.0);
        style.spacing.button_padding = egui::vec2(12.0, 8.0);
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(17.0));
        style.text_styles.insert(TextStyle::Body, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Monospace, FontId::monospace(13.0));
        style.text_styles.insert(TextStyle::Small, FontId::proportional(12.0));
        ctx.set_style(style);
    }

    pub fn panel_frame(&self, fill: Color32, inner_padding: i8) -> Frame {
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::same(inner_padding))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::new(1.0, self.border_subtle))
    }

    pub fn card_frame(&self) -> Frame {
        self.panel_frame(self.surface_0, self.spacing_12 as i8)
    }

    pub fn canvas_frame(&self, background: Color32) -> Frame {
        Frame::new()
            .fill(background)
            .inner_margin(Margin::same(self.spacing_16 as i8))
    }
}

const NAMED_COLORS: [(&str, [u8; 3]); 24] = [
    ("black", [0x00, 0x00, 0x00]),
    ("white", [0xFF, 0xFF, 0xFF]),
    ("red", [0xFF, 0x00, 0x00]),
    ("green", [0x00, 0x80, 0x00]),
    ("lime", [0x00, 0xFF, 0x00]),
    ("blue", [0x00, 0x00, 0xFF]),
    ("yellow", [0xFF, 0xFF, 0x00]),
    ("orange", [0xFF, 0xA5, 0x00]),
    ("purple", [0x80, 0x00, 0x80]),
    ("violet", [0xEE, 0x82, 0xEE]),
    ("pink", [0xFF, 0xC0, 0xCB]),
    ("brown", [0xA5, 0x2A, 0x2A]),
    ("gray", [0x80, 0x80, 0x80]),
    ("grey", [0x80, 0x80, 0x80]),
    ("lightgray", [0xD3, 0xD3, 0xD3]),
    ("darkgray", [0xA9, 0xA9, 0xA9]),
    ("cyan", [0x00, 0xFF, 0xFF]),
    ("magenta", [0xFF, 0x00, 0xFF]),
    ("navy", [0x00, 0x00, 0x80]),
    ("teal", [0x00, 0x80, 0x80]),
    ("maroon", [0x80, 0x00, 0x00]),
    ("olive", [0x80, 0x80, 0x00]),
    ("gold", [0xFF, 0xD7, 0x00]),
    ("lightblue", [0xAD, 0xD8, 0xE6]),
];

fn hex_channel(hex: &str, range: std::ops::Range<usize>) -> Option<u8> {
    u8::from_str_radix(hex.get(range)?, 16).ok()
}

/// Parses `#rgb`, `#rrggbb` or a common CSS color name.
pub fn parse_color(raw: &str) -> Option<Color32> {
    let value = raw.trim().to_ascii_lowercase();
    if let Some(hex) = value.strip_prefix('#') {
        if !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return None;
        }
        return match hex.len() {
            3 => {
                let r = hex_channel(hex, 0..1)?;
                let g = hex_channel(hex, 1..2)?;
                let b = hex_channel(hex, 2..3)?;
                Some(Color32::from_rgb(r * 17, g * 17, b * 17))
            }
            6 => Some(Color32::from_rgb(
                hex_channel(hex, 0..2)?,
                hex_channel(hex, 2..4)?,
                hex_channel(hex, 4..6)?,
            )),
            _ => None,
        };
    }

    let name: String = value.chars().filter(|ch| !ch.is_whitespace()).collect();
    NAMED_COLORS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, [r, g, b])| Color32::from_rgb(*r, *g, *b))
}

pub fn color_or(raw: &str, fallback: &str) -> Color32 {
    parse_color(raw)
        .or_else(|| parse_color(fallback))
        .unwrap_or(Color32::GRAY)
}

#[cfg(test)]
mod tests {
    use super::{color_or, parse_color};
    use eframe::egui::Color32;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_color("#262730"), Some(Color32::from_rgb(0x26, 0x27, 0x30)));
        assert_eq!(parse_color(" #F0F2F6 "), Some(Color32::from_rgb(0xF0, 0xF2, 0xF6)));
        assert_eq!(parse_color("#f00"), Some(Color32::from_rgb(0xFF, 0x00, 0x00)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#gggggg"), None);
        assert_eq!(parse_color("#+f+f+f"), None);
        assert_eq!(parse_color("#+ff+ff"), None);
    }

    #[test]
    fn parses_named_colors() {
        assert_eq!(parse_color("Red"), Some(Color32::from_rgb(0xFF, 0x00, 0x00)));
        assert_eq!(parse_color("light blue"), Some(Color32::from_rgb(0xAD, 0xD8, 0xE6)));
        assert_eq!(parse_color("sparkly"), None);
    }

    #[test]
    fn unparseable_color_uses_fallback() {
        assert_eq!(color_or("sparkly", "blue"), Color32::from_rgb(0x00, 0x00, 0xFF));
        assert_eq!(color_or("sparkly", "nope"), Color32::GRAY);
    }
}
