use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Keys of the per-session UI state. The set is closed; instructions can only
/// reach these through the mapping table in `ui::apply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateKey {
    ButtonColor,
    ButtonLabel,
    ButtonVisible,
    TitleText,
    TitleColor,
    BackgroundColor,
    TextAreaContent,
    TextAreaVisible,
    SliderValue,
    SliderVisible,
}

impl StateKey {
    pub const ALL: [StateKey; 10] = [
        Self::ButtonColor,
        Self::ButtonLabel,
        Self::ButtonVisible,
        Self::TitleText,
        Self::TitleColor,
        Self::BackgroundColor,
        Self::TextAreaContent,
        Self::TextAreaVisible,
        Self::SliderValue,
        Self::SliderVisible,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ButtonColor => "button_color",
            Self::ButtonLabel => "button_label",
            Self::ButtonVisible => "button_visible",
            Self::TitleText => "title_text",
            Self::TitleColor => "title_color",
            Self::BackgroundColor => "background_color",
            Self::TextAreaContent => "text_area_content",
            Self::TextAreaVisible => "text_area_visible",
            Self::SliderValue => "slider_value",
            Self::SliderVisible => "slider_visible",
        }
    }

    pub fn default_value(self) -> StateValue {
        match self {
            Self::ButtonColor => StateValue::text("blue"),
            Self::ButtonLabel => StateValue::text("Click Me!"),
            Self::ButtonVisible => StateValue::Flag(true),
            Self::TitleText => StateValue::text("Dynamic UI with Gemini"),
            Self::TitleColor => StateValue::text("#262730"),
            Self::BackgroundColor => StateValue::text("#f0f2f6"),
            Self::TextAreaContent => StateValue::text("This is a dynamic text area."),
            Self::TextAreaVisible => StateValue::Flag(true),
            Self::SliderValue => StateValue::Integer(50),
            Self::SliderVisible => StateValue::Flag(true),
        }
    }
}

impl Serialize for StateKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StateValue {
    Text(String),
    Flag(bool),
    Integer(i64),
}

impl StateValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn display_value(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Flag(value) => value.to_string(),
            Self::Integer(value) => value.to_string(),
        }
    }
}

/// UI state of one app session. Seeded with defaults on creation and dropped
/// with the app; only the instruction applier writes to it.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    values: BTreeMap<StateKey, StateValue>,
    show_success: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        let mut state = Self {
            values: BTreeMap::new(),
            show_success: false,
        };
        state.seed_defaults();
        state
    }

    fn seed_defaults(&mut self) {
        for key in StateKey::ALL {
            self.values
                .entry(key)
                .or_insert_with(|| key.default_value());
        }
    }

    pub fn reset(&mut self) {
        self.values.clear();
        self.show_success = false;
        self.seed_defaults();
    }

    pub fn get(&self, key: StateKey) -> Option<&StateValue> {
        self.values.get(&key)
    }

    pub fn set(&mut self, key: StateKey, value: StateValue) {
        self.values.insert(key, value);
    }

    pub fn text(&self, key: StateKey) -> String {
        match self.get(key) {
            Some(value) => value.display_value(),
            None => key.default_value().display_value(),
        }
    }

    pub fn flag(&self, key: StateKey) -> bool {
        match self.values.get(&key) {
            Some(StateValue::Flag(value)) => *value,
            _ => matches!(key.default_value(), StateValue::Flag(true)),
        }
    }

    pub fn integer(&self, key: StateKey) -> i64 {
        match self.values.get(&key) {
            Some(StateValue::Integer(value)) => *value,
            _ => match key.default_value() {
                StateValue::Integer(value) => value,
                _ => 0,
            },
        }
    }

    pub fn mark_success(&mut self) {
        self.show_success = true;
    }

    /// Returns the pending success flag and clears it.
    pub fn take_success(&mut self) -> bool {
        std::mem::take(&mut self.show_success)
    }

    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(&self.values).unwrap_or(serde_json::Value::Null)
    }
}
