use crate::session::{StateKey, UiState};
use crate::theme::{color_or, Theme};
use eframe::egui::{self, RichText};

pub const SLIDER_RANGE: std::ops::RangeInclusive<i64> = 0..=100;

/// Widget-local values for the text area and slider. They start from session
/// state and are re-seeded after every applied batch; user edits stay here.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasWidgets {
    text_area: String,
    slider: i64,
}

impl CanvasWidgets {
    pub fn from_state(state: &UiState) -> Self {
        Self {
            text_area: state.text(StateKey::TextAreaContent),
            slider: clamp_slider(state.integer(StateKey::SliderValue)),
        }
    }

    pub fn sync_from(&mut self, state: &UiState) {
        *self = Self::from_state(state);
    }
}

fn clamp_slider(value: i64) -> i64 {
    value.clamp(*SLIDER_RANGE.start(), *SLIDER_RANGE.end())
}

pub fn render_canvas(
    ui: &mut egui::Ui,
    state: &UiState,
    widgets: &mut CanvasWidgets,
    theme: &Theme,
) {
    let background = color_or(
        &state.text(StateKey::BackgroundColor),
        &StateKey::BackgroundColor.default_value().display_value(),
    );
    theme.canvas_frame(background).show(ui, |ui| {
        ui.set_min_width(ui.available_width());

        let title_color = color_or(
            &state.text(StateKey::TitleColor),
            &StateKey::TitleColor.default_value().display_value(),
        );
        ui.label(
            RichText::new(state.text(StateKey::TitleText))
                .color(title_color)
                .size(30.0)
                .strong(),
        );
        ui.add_space(theme.spacing_16);

        if state.flag(StateKey::ButtonVisible) {
            let fill = color_or(
                &state.text(StateKey::ButtonColor),
                &StateKey::ButtonColor.default_value().display_value(),
            );
            let button = egui::Button::new(
                RichText::new(state.text(StateKey::ButtonLabel)).color(theme.text_on_accent),
            )
            .fill(fill)
            .corner_radius(egui::CornerRadius::same(theme.radius_8))
            .min_size(egui::vec2(0.0, theme.button_height));
            if ui.add(button).clicked() {
                tracing::debug!("canvas button clicked");
            }
            ui.add_space(theme.spacing_8);
        }

        if state.flag(StateKey::TextAreaVisible) {
            ui.label(RichText::new("Dynamic Text Area").color(theme.text_muted));
            ui.add(
                egui::TextEdit::multiline(&mut widgets.text_area)
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(theme.spacing_8);
        }

        if state.flag(StateKey::SliderVisible) {
            ui.label(RichText::new("Adjust Value").color(theme.text_muted));
            ui.add(egui::Slider::new(&mut widgets.slider, SLIDER_RANGE));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::CanvasWidgets;
    use crate::session::{StateKey, StateValue, UiState};

    #[test]
    fn widgets_follow_state_after_sync() {
        let mut state = UiState::new();
        let mut widgets = CanvasWidgets::from_state(&state);
        assert_eq!(widgets.slider, 50);
        assert_eq!(widgets.text_area, "This is a dynamic text area.");

        widgets.text_area.push_str(" edited");
        state.set(StateKey::TextAreaContent, StateValue::text("Fresh"));
        state.set(StateKey::SliderValue, StateValue::Integer(250));
        widgets.sync_from(&state);

        assert_eq!(widgets.text_area, "Fresh");
        assert_eq!(widgets.slider, 100);
    }

    #[test]
    fn user_edits_do_not_touch_state() {
        let state = UiState::new();
        let mut widgets = CanvasWidgets::from_state(&state);
        widgets.slider = 3;
        assert_eq!(state.integer(StateKey::SliderValue), 50);
    }
}
