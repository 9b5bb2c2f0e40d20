use crate::config::AppConfig;
use crate::event::AppEvent;
use crate::gemini::GeminiClient;
use crate::session::UiState;
use crate::theme::Theme;
use crate::ui::apply::{apply_batch, ApplyPolicy};
use crate::ui::canvas::{render_canvas, CanvasWidgets};
use eframe::egui::{self, Color32, RichText, ScrollArea};
use serde_json::Value;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

const SUCCESS_BANNER: Duration = Duration::from_secs(3);
const MAX_DIAGNOSTICS: usize = 500;
const MISSING_API_KEY: &str = "Please enter your Gemini API key.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Notice {
    Warning(String),
    Error(String),
}

/// Checks the submit preconditions. Returns the trimmed `(feedback, api_key)`
/// pair to send, `None` when there is nothing to send, or the notice to show.
fn feedback_request(api_key: &str, feedback: &str) -> Result<Option<(String, String)>, Notice> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(Notice::Warning(MISSING_API_KEY.to_string()));
    }

    let feedback = feedback.trim();
    if feedback.is_empty() {
        return Ok(None);
    }

    Ok(Some((feedback.to_string(), api_key.to_string())))
}

fn push_diagnostic(log: &mut Vec<String>, entry: String) {
    log.push(entry);
    if log.len() > MAX_DIAGNOSTICS {
        let overflow = log.len() - MAX_DIAGNOSTICS;
        log.drain(..overflow);
    }
}

pub struct GeminiUiApp {
    rx: Receiver<AppEvent>,
    gemini: GeminiClient,
    policy: ApplyPolicy,
    theme: Theme,
    state: UiState,
    widgets: CanvasWidgets,
    api_key: String,
    feedback_buffer: String,
    last_output: Option<Vec<Value>>,
    notice: Option<Notice>,
    success_until: Option<Instant>,
    is_fetching: bool,
    diagnostics_log: Vec<String>,
}

impl GeminiUiApp {
    pub fn new(rx: Receiver<AppEvent>, gemini: GeminiClient, config: AppConfig) -> Self {
        let state = UiState::new();
        let widgets = CanvasWidgets::from_state(&state);
        Self {
            rx,
            gemini,
            policy: config.policy,
            theme: Theme::default(),
            state,
            widgets,
            api_key: config.api_key,
            feedback_buffer: String::new(),
            last_output: None,
            notice: None,
            success_until: None,
            is_fetching: false,
            diagnostics_log: Vec::new(),
        }
    }

    pub fn install_theme(&self, ctx: &egui::Context) {
        self.theme.apply_visuals(ctx);
    }

    fn timestamp() -> String {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs().to_string(),
            Err(_) => "0".to_string(),
        }
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        let entry = format!("[{}] {}", Self::timestamp(), message.into());
        push_diagnostic(&mut self.diagnostics_log, entry);
    }

    fn submit_feedback(&mut self, ctx: &egui::Context) {
        let (feedback, api_key) = match feedback_request(&self.api_key, &self.feedback_buffer) {
            Ok(Some(request)) => request,
            Ok(None) => return,
            Err(notice) => {
                self.notice = Some(notice);
                return;
            }
        };

        self.notice = None;
        self.is_fetching = true;
        self.log_diagnostic(format!("feedback sent: {feedback}"));
        self.gemini.send(feedback, api_key);
        ctx.request_repaint();
    }

    fn reset_ui(&mut self) {
        self.state.reset();
        self.widgets.sync_from(&self.state);
        self.notice = None;
        self.success_until = None;
        self.log_diagnostic("ui state reset to defaults");
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event, ctx),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent, ctx: &egui::Context) {
        match event {
            AppEvent::InstructionsReceived { feedback, items } => {
                self.is_fetching = false;
                self.log_diagnostic(format!(
                    "gemini returned {} item(s) for: {feedback}",
                    items.len()
                ));

                let result = apply_batch(&mut self.state, &items, &self.policy, ctx);
                self.last_output = Some(items);
                match result {
                    Ok(report) => {
                        for warning in &report.warnings {
                            self.log_diagnostic(format!("instruction skipped: {warning}"));
                        }
                        if let Some(warning) = report.warnings.last() {
                            self.notice = Some(Notice::Warning(warning.clone()));
                        }
                        self.log_diagnostic(format!(
                            "applied {} update(s), skipped {}, ignored {} non-instruction item(s)",
                            report.updated.len(),
                            report.skipped,
                            report.non_instructions
                        ));
                    }
                    Err(err) => {
                        self.log_diagnostic(format!("request failed: {err}"));
                        self.notice = Some(Notice::Error(err.to_string()));
                    }
                }
                self.widgets.sync_from(&self.state);
            }
            AppEvent::FetchFailed(message) => {
                self.is_fetching = false;
                self.log_diagnostic(format!("gemini error: {message}"));
                self.notice = Some(Notice::Error(message));
                ctx.request_repaint();
            }
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let (status_label, status_color) = if self.is_fetching {
            ("Waiting for Gemini...", self.theme.warning)
        } else {
            ("Idle", self.theme.text_muted)
        };
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Gemini UI Demo");
                ui.separator();
                ui.label(RichText::new(status_label).color(status_color));
                ui.separator();
                ui.label(RichText::new(self.gemini.model()).color(self.theme.text_muted));
            });
        });
    }

    fn render_left_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("settings_panel")
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("Settings");
                ui.separator();
                ui.label("Gemini API Key");
                ui.add(
                    egui::TextEdit::singleline(&mut self.api_key)
                        .password(true)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(self.theme.spacing_8);
                if ui.button("Reset UI").clicked() {
                    self.reset_ui();
                }

                ui.separator();
                egui::CollapsingHeader::new("Session State")
                    .default_open(false)
                    .show(ui, |ui| {
                        let snapshot = serde_json::to_string_pretty(&self.state.snapshot())
                            .unwrap_or_default();
                        ui.label(RichText::new(snapshot).monospace());
                    });
            });
    }

    fn render_right_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("output_panel")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.heading("Gemini JSON Output:");
                ui.separator();
                ScrollArea::vertical()
                    .id_salt("gemini_output")
                    .max_height(ui.available_height() * 0.6)
                    .show(ui, |ui| match &self.last_output {
                        Some(items) => {
                            let pretty = serde_json::to_string_pretty(items).unwrap_or_default();
                            self.theme.card_frame().show(ui, |ui| {
                                ui.label(RichText::new(pretty).monospace());
                            });
                        }
                        None => {
                            ui.label(RichText::new("No feedback applied yet").color(self.theme.text_muted));
                        }
                    });

                ui.separator();
                egui::CollapsingHeader::new("Diagnostics")
                    .default_open(false)
                    .show(ui, |ui| {
                        ScrollArea::vertical()
                            .id_salt("diagnostics_log")
                            .max_height(160.0)
                            .stick_to_bottom(true)
                            .show(ui, |ui| {
                                for entry in &self.diagnostics_log {
                                    ui.label(RichText::new(entry).size(12.0));
                                }
                            });
                    });
            });
    }

    fn render_feedback_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("feedback_panel").show(ctx, |ui| {
            ui.add_space(self.theme.spacing_8);
            ui.label("Enter UI command:");
            ui.add_enabled(
                !self.is_fetching,
                egui::TextEdit::multiline(&mut self.feedback_buffer)
                    .desired_rows(2)
                    .desired_width(f32::INFINITY)
                    .hint_text("make the button red"),
            );

            let mut submit = false;
            ui.horizontal(|ui| {
                submit = ui
                    .add_enabled(!self.is_fetching, egui::Button::new("Apply Feedback"))
                    .clicked();
                if self.is_fetching {
                    ui.spinner();
                }
            });
            if submit {
                self.submit_feedback(ctx);
            }

            match &self.notice {
                Some(Notice::Warning(message)) => {
                    ui.label(RichText::new(message).color(self.theme.warning));
                }
                Some(Notice::Error(message)) => {
                    ui.label(RichText::new(message).color(self.theme.danger));
                }
                None => {}
            }
            ui.add_space(self.theme.spacing_4);
        });
    }

    fn render_center_panel(&mut self, ctx: &egui::Context) {
        if self.state.take_success() {
            self.success_until = Some(Instant::now() + SUCCESS_BANNER);
            ctx.request_repaint_after(SUCCESS_BANNER);
        }
        let show_success = self
            .success_until
            .is_some_and(|until| Instant::now() < until);
        if !show_success {
            self.success_until = None;
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(self.theme.surface_1))
            .show(ctx, |ui| {
                if show_success {
                    self.theme
                        .panel_frame(Color32::from_rgb(0xE8, 0xF9, 0xEE), self.theme.spacing_8 as i8)
                        .show(ui, |ui| {
                            ui.set_min_width(ui.available_width());
                            ui.label(RichText::new("UI updated!").color(self.theme.success));
                        });
                }
                ScrollArea::vertical()
                    .id_salt("canvas")
                    .show(ui, |ui| {
                        render_canvas(ui, &self.state, &mut self.widgets, &self.theme);
                    });
            });
    }
}

impl eframe::App for GeminiUiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);
        if self.is_fetching {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
        self.render_top_bar(ctx);
        self.render_left_panel(ctx);
        self.render_right_panel(ctx);
        self.render_feedback_panel(ctx);
        self.render_center_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::{feedback_request, push_diagnostic, Notice, MAX_DIAGNOSTICS};

    #[test]
    fn missing_api_key_warns_and_sends_nothing() {
        let expected = Err(Notice::Warning(
            "Please enter your Gemini API key.".to_string(),
        ));
        assert_eq!(feedback_request("", "make the button red"), expected);
        assert_eq!(feedback_request("   \t", "make the button red"), expected);
    }

    #[test]
    fn blank_feedback_sends_nothing() {
        assert_eq!(feedback_request("key-123", ""), Ok(None));
        assert_eq!(feedback_request("key-123", "  \n "), Ok(None));
    }

    #[test]
    fn valid_request_is_trimmed() {
        assert_eq!(
            feedback_request(" key-123 ", "  hide the slider\n"),
            Ok(Some(("hide the slider".to_string(), "key-123".to_string())))
        );
    }

    #[test]
    fn diagnostics_log_drops_oldest_entries() {
        let mut log = Vec::new();
        for index in 0..MAX_DIAGNOSTICS + 3 {
            push_diagnostic(&mut log, format!("entry {index}"));
        }
        assert_eq!(log.len(), MAX_DIAGNOSTICS);
        assert_eq!(log.first().map(String::as_str), Some("entry 3"));
        assert_eq!(
            log.last().map(String::as_str),
            Some(format!("entry {}", MAX_DIAGNOSTICS + 2).as_str())
        );
    }
}
