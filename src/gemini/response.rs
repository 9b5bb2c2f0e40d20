use crate::gemini::FetchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The triple shape the response schema asks the model for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInstruction {
    pub component: String,
    pub property: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize)]
struct InstructionEnvelope {
    instructions: Vec<RawInstruction>,
}

type ParseStrategy = fn(&str) -> Option<Vec<Value>>;

// Tried in order; the first strategy that yields a list wins.
const PARSE_STRATEGIES: [(&str, ParseStrategy); 4] = [
    ("structured_list", structured_list),
    ("structured_envelope", structured_envelope),
    ("json_list", json_list),
    ("fenced_json_list", fenced_json_list),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInstructions {
    pub strategy: &'static str,
    pub items: Vec<Value>,
}

fn to_plain(instructions: Vec<RawInstruction>) -> Vec<Value> {
    instructions
        .into_iter()
        .filter_map(|instruction| serde_json::to_value(instruction).ok())
        .collect()
}

fn structured_list(text: &str) -> Option<Vec<Value>> {
    serde_json::from_str::<Vec<RawInstruction>>(text)
        .ok()
        .map(to_plain)
}

fn structured_envelope(text: &str) -> Option<Vec<Value>> {
    serde_json::from_str::<InstructionEnvelope>(text)
        .ok()
        .map(|envelope| to_plain(envelope.instructions))
}

fn json_list(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

fn fenced_json_list(text: &str) -> Option<Vec<Value>> {
    let start = text.find("```")?;
    let after = &text[start + 3..];
    let after = after.strip_prefix("json").unwrap_or(after);
    let end = after.find("```")?;
    json_list(after[..end].trim())
}

/// Runs the parse strategies over the model text. When none of them yields a
/// list, the raw text comes back as the only element.
pub fn parse_instruction_text(text: &str) -> ParsedInstructions {
    let trimmed = text.trim();
    for (strategy, parse) in PARSE_STRATEGIES {
        if let Some(items) = parse(trimmed) {
            return ParsedInstructions { strategy, items };
        }
    }

    ParsedInstructions {
        strategy: "raw_text",
        items: vec![Value::String(text.to_string())],
    }
}

/// Joins the text parts of the first candidate of a `generateContent` body.
pub fn extract_text(body: &Value) -> Result<String, FetchError> {
    if let Some(error) = body.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(FetchError::Api(message));
    }

    let Some(parts) = body
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
    else {
        let keys = body
            .as_object()
            .map(|object| object.keys().cloned().collect::<Vec<_>>().join(","))
            .unwrap_or_else(|| "<non-object>".to_string());
        return Err(FetchError::NoText { keys });
    };

    // A candidate with blank text still goes through the raw-text fallback.
    let mut text = String::new();
    for part in parts {
        if let Some(chunk) = part.get("text").and_then(Value::as_str) {
            text.push_str(chunk);
        }
    }

    Ok(text)
}

pub fn instructions_from_response(body: &Value) -> Result<Vec<Value>, FetchError> {
    let text = extract_text(body)?;
    let parsed = parse_instruction_text(&text);
    tracing::info!(
        strategy = parsed.strategy,
        count = parsed.items.len(),
        "parsed gemini response"
    );
    Ok(parsed.items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_list_normalizes_triples_to_plain_mappings() {
        let parsed = parse_instruction_text(
            r#"[{"component":"button","property":"color","value":"red"},{"component":"slider","property":"value"}]"#,
        );
        assert_eq!(parsed.strategy, "structured_list");
        assert_eq!(
            parsed.items,
            vec![
                json!({"component": "button", "property": "color", "value": "red"}),
                json!({"component": "slider", "property": "value", "value": null}),
            ]
        );
    }

    #[test]
    fn envelope_object_yields_its_instruction_list() {
        let parsed = parse_instruction_text(
            r#"{"instructions":[{"component":"title","property":"text","value":"Hi"}]}"#,
        );
        assert_eq!(parsed.strategy, "structured_envelope");
        assert_eq!(
            parsed.items,
            vec![json!({"component": "title", "property": "text", "value": "Hi"})]
        );
    }

    #[test]
    fn loose_json_list_is_returned_as_is() {
        let parsed = parse_instruction_text(r#"[{"widget":"button"}, "note", 3]"#);
        assert_eq!(parsed.strategy, "json_list");
        assert_eq!(parsed.items, vec![json!({"widget": "button"}), json!("note"), json!(3)]);
    }

    #[test]
    fn fenced_json_list_is_unwrapped() {
        let text = "Here you go:\n```json\n[{\"component\":\"app\",\"property\":\"color\",\"value\":\"#000\"}]\n```";
        let parsed = parse_instruction_text(text);
        assert_eq!(parsed.strategy, "fenced_json_list");
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0]["component"], "app");
    }

    #[test]
    fn unparseable_text_falls_back_to_raw_string() {
        let parsed = parse_instruction_text("I can't do that.");
        assert_eq!(parsed.strategy, "raw_text");
        assert_eq!(parsed.items, vec![json!("I can't do that.")]);

        let parsed = parse_instruction_text(r#"{"component":"button"}"#);
        assert_eq!(parsed.strategy, "raw_text");
    }

    #[test]
    fn extract_text_joins_candidate_parts() {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": "[{\"component\":"}, {"text": "\"button\",\"property\":\"color\",\"value\":\"red\"}]"}]}}]
        });
        let items = instructions_from_response(&body).expect("text should be extracted");
        assert_eq!(
            items,
            vec![json!({"component": "button", "property": "color", "value": "red"})]
        );
    }

    #[test]
    fn extract_text_reports_api_errors_and_empty_bodies() {
        let error = extract_text(&json!({"error": {"code": 400, "message": "API key not valid"}}))
            .expect_err("api error payload should fail");
        assert!(matches!(error, FetchError::Api(ref message) if message == "API key not valid"));

        let error = extract_text(&json!({"candidates": [], "promptFeedback": {}}))
            .expect_err("missing text should fail");
        assert!(matches!(error, FetchError::NoText { ref keys } if keys.contains("promptFeedback")));
    }

    #[test]
    fn blank_candidate_text_falls_back_to_raw_string() {
        let body = json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]});
        let items = instructions_from_response(&body).expect("blank text is still a response");
        assert_eq!(items, vec![Value::String(String::new())]);
    }
}
