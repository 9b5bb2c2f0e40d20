use crate::session::{StateKey, StateValue, UiState};
use crate::ui::instruction::{Instruction, InstructionValue};
use crate::ui::normalize::{normalize_component, normalize_property};
use serde_json::Value;
use thiserror::Error;

/// How the applier reacts to an instruction it cannot apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Severity {
    /// Drop the instruction without a trace beyond debug logs.
    Ignore,
    /// Drop the instruction, log a warning and report it.
    Warn,
    /// Fail the request; the rest of the batch is not applied.
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyPolicy {
    pub unrecognized: Severity,
    pub coercion_failure: Severity,
}

impl Default for ApplyPolicy {
    fn default() -> Self {
        Self {
            unrecognized: Severity::Ignore,
            coercion_failure: Severity::Fail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    Text,
    Boolean,
    Integer,
}

impl Coercion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
        }
    }

    pub fn coerce(self, value: &InstructionValue) -> Option<StateValue> {
        match self {
            Self::Text => Some(StateValue::Text(value.display_value())),
            Self::Boolean => coerce_bool(value).map(StateValue::Flag),
            Self::Integer => coerce_integer(value).map(StateValue::Integer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingRule {
    pub component: &'static str,
    pub property: &'static str,
    pub key: StateKey,
    pub coercion: Coercion,
}

const fn rule(
    component: &'static str,
    property: &'static str,
    key: StateKey,
    coercion: Coercion,
) -> MappingRule {
    MappingRule {
        component,
        property,
        key,
        coercion,
    }
}

pub const MAPPING_TABLE: [MappingRule; 10] = [
    rule("button", "color", StateKey::ButtonColor, Coercion::Text),
    rule("button", "text", StateKey::ButtonLabel, Coercion::Text),
    rule("button", "visibility", StateKey::ButtonVisible, Coercion::Boolean),
    rule("title", "text", StateKey::TitleText, Coercion::Text),
    rule("title", "color", StateKey::TitleColor, Coercion::Text),
    rule("background", "color", StateKey::BackgroundColor, Coercion::Text),
    rule("text_area", "content", StateKey::TextAreaContent, Coercion::Text),
    rule("text_area", "visibility", StateKey::TextAreaVisible, Coercion::Boolean),
    rule("slider", "value", StateKey::SliderValue, Coercion::Integer),
    rule("slider", "visibility", StateKey::SliderVisible, Coercion::Boolean),
];

pub fn lookup_rule(component: &str, property: &str) -> Option<MappingRule> {
    MAPPING_TABLE
        .iter()
        .find(|rule| rule.component == component && rule.property == property)
        .copied()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("no state mapping for component `{component}` property `{property}`")]
    Unrecognized { component: String, property: String },
    #[error("cannot coerce {kind} value `{value}` to {expected} for `{key}`")]
    Coercion {
        key: &'static str,
        expected: &'static str,
        kind: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Updated { key: StateKey, value: StateValue },
    Skipped { warning: Option<String> },
}

/// Presentation hook fired after the last instruction of a batch wrote state.
pub trait RefreshSignal {
    fn request_refresh(&self);
}

impl RefreshSignal for eframe::egui::Context {
    fn request_refresh(&self) {
        self.request_repaint();
    }
}

fn skip_or_fail(severity: Severity, error: ApplyError) -> Result<ApplyOutcome, ApplyError> {
    match severity {
        Severity::Ignore => {
            tracing::debug!("instruction dropped: {error}");
            Ok(ApplyOutcome::Skipped { warning: None })
        }
        Severity::Warn => {
            tracing::warn!("instruction dropped: {error}");
            Ok(ApplyOutcome::Skipped {
                warning: Some(error.to_string()),
            })
        }
        Severity::Fail => {
            tracing::error!("instruction rejected: {error}");
            Err(error)
        }
    }
}

pub fn apply_instruction(
    state: &mut UiState,
    instruction: &Instruction,
    rerun: bool,
    policy: &ApplyPolicy,
    refresh: &dyn RefreshSignal,
) -> Result<ApplyOutcome, ApplyError> {
    let component = normalize_component(&instruction.component);
    let property = normalize_property(&instruction.property);
    tracing::debug!(
        raw = %instruction.to_log_line(),
        %component,
        %property,
        "applying instruction"
    );

    let Some(rule) = lookup_rule(component.as_str(), property.as_str()) else {
        return skip_or_fail(
            policy.unrecognized,
            ApplyError::Unrecognized {
                component: component.to_string(),
                property: property.to_string(),
            },
        );
    };

    let Some(value) = rule.coercion.coerce(&instruction.value) else {
        return skip_or_fail(
            policy.coercion_failure,
            ApplyError::Coercion {
                key: rule.key.as_str(),
                expected: rule.coercion.as_str(),
                kind: instruction.value.kind(),
                value: instruction.value.display_value(),
            },
        );
    };

    tracing::info!(
        key = rule.key.as_str(),
        value = %value.display_value(),
        "ui state updated"
    );
    state.set(rule.key, value.clone());

    if rerun {
        state.mark_success();
        refresh.request_refresh();
    }

    Ok(ApplyOutcome::Updated {
        key: rule.key,
        value,
    })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub updated: Vec<StateKey>,
    pub skipped: usize,
    pub non_instructions: usize,
    pub warnings: Vec<String>,
}

/// Applies a fetched batch in order. Only the element at the last index may
/// refresh the presentation, so intermediate writes never redraw.
pub fn apply_batch(
    state: &mut UiState,
    items: &[Value],
    policy: &ApplyPolicy,
    refresh: &dyn RefreshSignal,
) -> Result<BatchReport, ApplyError> {
    let mut report = BatchReport::default();
    let last_index = items.len().saturating_sub(1);

    for (index, item) in items.iter().enumerate() {
        let Some(instruction) = Instruction::from_json(item) else {
            tracing::debug!(index, "skipping non-object batch element");
            report.non_instructions += 1;
            continue;
        };

        match apply_instruction(state, &instruction, index == last_index, policy, refresh)? {
            ApplyOutcome::Updated { key, .. } => report.updated.push(key),
            ApplyOutcome::Skipped { warning } => {
                report.skipped += 1;
                report.warnings.extend(warning);
            }
        }
    }

    Ok(report)
}

fn coerce_bool(value: &InstructionValue) -> Option<bool> {
    match value {
        InstructionValue::Flag(flag) => Some(*flag),
        InstructionValue::Integer(integer) => Some(*integer != 0),
        InstructionValue::Number(number) => Some(*number != 0.0),
        InstructionValue::Missing => Some(false),
        InstructionValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" | "show" | "shown" | "visible" => Some(true),
            "false" | "no" | "off" | "0" | "hide" | "hidden" | "invisible" | "" => Some(false),
            _ => None,
        },
        InstructionValue::Unknown(_) => None,
    }
}

fn coerce_integer(value: &InstructionValue) -> Option<i64> {
    match value {
        InstructionValue::Integer(integer) => Some(*integer),
        InstructionValue::Number(number) if number.is_finite() => Some(number.trunc() as i64),
        InstructionValue::Flag(flag) => Some(i64::from(*flag)),
        InstructionValue::Text(text) => text.trim().parse().ok(),
        _ => None,
    }
}
