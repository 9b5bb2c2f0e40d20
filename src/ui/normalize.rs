use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Component {
    Button,
    Title,
    Background,
    TextArea,
    Slider,
    Other(String),
}

impl Component {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Button => "button",
            Self::Title => "title",
            Self::Background => "background",
            Self::TextArea => "text_area",
            Self::Slider => "slider",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Property {
    Text,
    Color,
    Content,
    Visibility,
    Value,
    Other(String),
}

impl Property {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Color => "color",
            Self::Content => "content",
            Self::Visibility => "visibility",
            Self::Value => "value",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Rule order decides ties: the first pattern found anywhere in the input wins,
// regardless of how specific a later pattern would be.
const COMPONENT_PATTERNS: [(&str, Component); 5] = [
    ("button|btn", Component::Button),
    ("title|header", Component::Title),
    ("background|app", Component::Background),
    ("text[_ ]?area|textarea", Component::TextArea),
    ("slider", Component::Slider),
];

const PROPERTY_PATTERNS: [(&str, Property); 5] = [
    ("label|text|name", Property::Text),
    ("color|colour|background[_ ]?color", Property::Color),
    ("content", Property::Content),
    ("visible|visibility|show|hide", Property::Visibility),
    ("value", Property::Value),
];

static COMPONENT_RULES: LazyLock<Vec<(Regex, Component)>> =
    LazyLock::new(|| compile_rules(COMPONENT_PATTERNS));

static PROPERTY_RULES: LazyLock<Vec<(Regex, Property)>> =
    LazyLock::new(|| compile_rules(PROPERTY_PATTERNS));

fn compile_rules<T, const N: usize>(patterns: [(&str, T); N]) -> Vec<(Regex, T)> {
    patterns
        .into_iter()
        .map(|(pattern, canonical)| {
            let regex = Regex::new(pattern).expect("normalization patterns are fixed literals");
            (regex, canonical)
        })
        .collect()
}

fn first_match<T: Clone>(rules: &[(Regex, T)], lowered: &str) -> Option<T> {
    rules
        .iter()
        .find(|(regex, _)| regex.is_match(lowered))
        .map(|(_, canonical)| canonical.clone())
}

pub fn normalize_component(raw: &str) -> Component {
    let lowered = raw.to_lowercase();
    first_match(&COMPONENT_RULES, &lowered).unwrap_or(Component::Other(lowered))
}

pub fn normalize_property(raw: &str) -> Property {
    let lowered = raw.to_lowercase();
    first_match(&PROPERTY_RULES, &lowered).unwrap_or(Property::Other(lowered))
}

#[cfg(test)]
mod tests {
    use super::{normalize_component, normalize_property, Component, Property};

    #[test]
    fn button_aliases_in_any_case_map_to_button() {
        for raw in ["button", "BUTTON", "Btn", "submit_btn", "The Big Button", "btnPrimary"] {
            assert_eq!(normalize_component(raw), Component::Button, "input {raw:?}");
        }
    }

    #[test]
    fn component_aliases_map_to_canonical_names() {
        assert_eq!(normalize_component("Header"), Component::Title);
        assert_eq!(normalize_component("page title"), Component::Title);
        assert_eq!(normalize_component("App"), Component::Background);
        assert_eq!(normalize_component("background"), Component::Background);
        assert_eq!(normalize_component("Text Area"), Component::TextArea);
        assert_eq!(normalize_component("text_area"), Component::TextArea);
        assert_eq!(normalize_component("textarea"), Component::TextArea);
        assert_eq!(normalize_component("volume slider"), Component::Slider);
    }

    #[test]
    fn component_rule_order_breaks_ties() {
        // "header" is tested before "app", "button" before "title".
        assert_eq!(normalize_component("app header"), Component::Title);
        assert_eq!(normalize_component("title button"), Component::Button);
    }

    #[test]
    fn colour_spellings_map_to_color() {
        for raw in ["color", "COLOUR", "Colour", "fill_color", "background_color", "bgcolor"] {
            assert_eq!(normalize_property(raw), Property::Color, "input {raw:?}");
        }
    }

    #[test]
    fn property_aliases_map_to_canonical_names() {
        assert_eq!(normalize_property("Label"), Property::Text);
        assert_eq!(normalize_property("name"), Property::Text);
        assert_eq!(normalize_property("content"), Property::Content);
        assert_eq!(normalize_property("Visible"), Property::Visibility);
        assert_eq!(normalize_property("hide"), Property::Visibility);
        assert_eq!(normalize_property("show"), Property::Visibility);
        assert_eq!(normalize_property("value"), Property::Value);
    }

    #[test]
    fn property_rule_order_breaks_ties() {
        // "text" is tested before "color" and "content".
        assert_eq!(normalize_property("text_color"), Property::Text);
        assert_eq!(normalize_property("text content"), Property::Text);
        assert_eq!(normalize_property("color value"), Property::Color);
    }

    #[test]
    fn unmatched_input_passes_through_lowercased() {
        assert_eq!(
            normalize_component("Chart"),
            Component::Other("chart".to_string())
        );
        assert_eq!(normalize_property("SIZE"), Property::Other("size".to_string()));
        assert_eq!(normalize_component(""), Component::Other(String::new()));
        assert_eq!(normalize_component("Chart").as_str(), "chart");
    }

    #[test]
    fn normalization_is_deterministic() {
        for raw in ["Btn", "chart", "Background Colour", "", "TEXTAREA", "opacity"] {
            assert_eq!(normalize_component(raw), normalize_component(raw));
            assert_eq!(normalize_property(raw), normalize_property(raw));
        }
    }
}
