use serde_json::Value;

#[derive(Debug, Clone)]
pub enum AppEvent {
    InstructionsReceived { feedback: String, items: Vec<Value> },
    FetchFailed(String),
}
