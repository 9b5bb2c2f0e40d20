use serde_json::{Map, Value};

/// Untyped instruction value as the model produced it; it only gets a concrete
/// type once the target state key is known.
#[derive(Debug, Clone, PartialEq)]
pub enum InstructionValue {
    Text(String),
    Flag(bool),
    Integer(i64),
    Number(f64),
    Missing,
    Unknown(Value),
}

impl InstructionValue {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Missing,
            Value::Bool(flag) => Self::Flag(*flag),
            Value::String(text) => Self::Text(text.clone()),
            Value::Number(number) => match number.as_i64() {
                Some(integer) => Self::Integer(integer),
                None => number.as_f64().map_or_else(|| Self::Unknown(value.clone()), Self::Number),
            },
            Value::Array(_) | Value::Object(_) => Self::Unknown(value.clone()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Flag(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::Missing => "missing",
            Self::Unknown(_) => "unknown",
        }
    }

    pub fn display_value(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Flag(value) => value.to_string(),
            Self::Integer(value) => value.to_string(),
            Self::Number(value) => value.to_string(),
            Self::Missing => String::new(),
            Self::Unknown(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub component: String,
    pub property: String,
    pub value: InstructionValue,
}

impl Instruction {
    pub fn new(
        component: impl Into<String>,
        property: impl Into<String>,
        value: InstructionValue,
    ) -> Self {
        Self {
            component: component.into(),
            property: property.into(),
            value,
        }
    }

    /// Builds an instruction from one element of a fetched batch. Elements that
    /// are not JSON objects are not instructions.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self::new(
            field_text(object, "component"),
            field_text(object, "property"),
            object
                .get("value")
                .map_or(InstructionValue::Missing, InstructionValue::from_json),
        ))
    }

    pub fn to_log_line(&self) -> String {
        format!(
            "component={} property={} value={} ({})",
            self.component,
            self.property,
            self.value.display_value(),
            self.value.kind()
        )
    }
}

fn field_text(object: &Map<String, Value>, field: &str) -> String {
    match object.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Instruction, InstructionValue};
    use serde_json::json;

    #[test]
    fn object_elements_become_instructions() {
        let instruction =
            Instruction::from_json(&json!({"component": "button", "property": "color", "value": "red"}))
                .expect("object element should convert");
        assert_eq!(
            instruction,
            Instruction::new("button", "color", InstructionValue::Text("red".to_string()))
        );
    }

    #[test]
    fn non_object_elements_are_rejected() {
        assert!(Instruction::from_json(&json!("make the button red")).is_none());
        assert!(Instruction::from_json(&json!(42)).is_none());
        assert!(Instruction::from_json(&json!(["button", "color", "red"])).is_none());
        assert!(Instruction::from_json(&json!(null)).is_none());
    }

    #[test]
    fn missing_fields_default_to_empty_and_missing() {
        let instruction = Instruction::from_json(&json!({})).expect("empty object converts");
        assert_eq!(instruction.component, "");
        assert_eq!(instruction.property, "");
        assert_eq!(instruction.value, InstructionValue::Missing);

        let instruction = Instruction::from_json(&json!({"component": null, "property": 7}))
            .expect("object converts");
        assert_eq!(instruction.component, "");
        assert_eq!(instruction.property, "7");
    }

    #[test]
    fn values_keep_their_json_shape() {
        assert_eq!(InstructionValue::from_json(&json!(true)), InstructionValue::Flag(true));
        assert_eq!(InstructionValue::from_json(&json!(42)), InstructionValue::Integer(42));
        assert_eq!(InstructionValue::from_json(&json!(4.5)), InstructionValue::Number(4.5));
        assert_eq!(InstructionValue::from_json(&json!(null)), InstructionValue::Missing);
        assert_eq!(
            InstructionValue::from_json(&json!({"r": 255})),
            InstructionValue::Unknown(json!({"r": 255}))
        );
    }
}
