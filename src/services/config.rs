//! Shared configuration loading for the AI service.
//!
//! Secrets stay inside the crate; `AiPublicConfig` is the only shape safe
//! to hand to a frontend.

use serde::Serialize;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// AI configuration for the Gemini endpoint.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Ordered key pool for rotation; may be empty.
    pub api_keys: Vec<String>,
    pub base_url: String,
}

/// Splits a delimiter-separated credential string into trimmed,
/// non-empty entries, preserving order.
pub fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Load AI configuration from `.env`/environment.
///
/// Reads:
/// - `GEMINI_API_KEY` (fallback: `API_KEY`): one or more comma-separated keys
/// - `GEMINI_BASE_URL`: endpoint override, mainly for tests
pub fn load_ai_config() -> AiConfig {
    let _ = dotenvy::dotenv();

    let raw_keys = std::env::var("GEMINI_API_KEY")
        .or_else(|_| std::env::var("API_KEY"))
        .unwrap_or_default();

    let base_url = std::env::var("GEMINI_BASE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    AiConfig {
        api_keys: parse_key_list(&raw_keys),
        base_url: normalize_base_url(&base_url),
    }
}

/// Public AI configuration returned to the frontend (secrets omitted).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiPublicConfig {
    pub base_url: String,
    pub key_count: usize,
    pub has_api_key: bool,
}

impl AiConfig {
    pub fn public(&self) -> AiPublicConfig {
        AiPublicConfig {
            base_url: self.base_url.clone(),
            key_count: self.api_keys.len(),
            has_api_key: !self.api_keys.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_list() {
        assert_eq!(parse_key_list("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_key_list(" a , ,b,,  "), vec!["a", "b"]);
        assert_eq!(parse_key_list("solo"), vec!["solo"]);
        assert!(parse_key_list("").is_empty());
        assert!(parse_key_list(" , ,").is_empty());
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://generativelanguage.googleapis.com/v1beta/models/"),
            "https://generativelanguage.googleapis.com/v1beta/models"
        );
        assert_eq!(
            normalize_base_url("  http://localhost:9090  "),
            "http://localhost:9090"
        );
    }

    #[test]
    fn test_public_config_hides_keys() {
        let config = AiConfig {
            api_keys: vec!["secret".to_string()],
            base_url: DEFAULT_BASE_URL.to_string(),
        };
        let public = config.public();
        assert!(public.has_api_key);
        assert_eq!(public.key_count, 1);
        assert!(!serde_json::to_string(&public).unwrap().contains("secret"));
    }
}
