use crate::gemini::{GeminiConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::ui::apply::{ApplyPolicy, Severity};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "gemini-ui")]
#[command(about = "Restyle a small widget panel from free-text feedback via Gemini", long_about = None)]
pub struct Cli {
    /// Gemini API key used to prefill the sidebar field
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model identifier
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the Gemini REST API
    #[arg(long, env = "GEMINI_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// What to do with instructions that match no known widget property
    #[arg(long, value_enum, default_value = "ignore")]
    pub on_unrecognized: Severity,

    /// What to do when a value cannot be converted to the widget property's type
    #[arg(long, value_enum, default_value = "fail")]
    pub on_coercion_failure: Severity,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub gemini: GeminiConfig,
    pub policy: ApplyPolicy,
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        Self {
            api_key: cli.api_key.unwrap_or_default(),
            gemini: GeminiConfig {
                model: cli.model,
                endpoint: cli.endpoint,
            },
            policy: ApplyPolicy {
                unrecognized: cli.on_unrecognized,
                coercion_failure: cli.on_coercion_failure,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "gemini-ui",
            "--api-key",
            "secret",
            "--model",
            "gemini-2.5-pro",
            "--endpoint",
            "http://localhost:9000/v1beta",
            "--on-unrecognized",
            "warn",
            "--on-coercion-failure",
            "ignore",
        ])
        .expect("flags should parse");
        let config = AppConfig::from(cli);

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.gemini.endpoint, "http://localhost:9000/v1beta");
        assert_eq!(config.policy.unrecognized, Severity::Warn);
        assert_eq!(config.policy.coercion_failure, Severity::Ignore);
    }

    #[test]
    fn severity_defaults_match_apply_policy_default() {
        let cli = Cli::try_parse_from(["gemini-ui"]).expect("no flags should parse");
        assert_eq!(AppConfig::from(cli).policy, ApplyPolicy::default());
    }

    #[test]
    fn unknown_severity_is_rejected() {
        assert!(Cli::try_parse_from(["gemini-ui", "--on-unrecognized", "panic"]).is_err());
    }
}
