//! Secret redaction for provider error bodies

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const MAX_ERROR_TEXT_CHARS: usize = 1_024;
const REDACTED: &str = "[REDACTED]";

static BEARER_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bBearer\s+[A-Za-z0-9._\-+/=]{8,}").expect("valid bearer token regex")
});

static ANTHROPIC_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bsk-ant-[A-Za-z0-9_\-]{6,}").expect("valid anthropic key regex"));

static KEY_VALUE_SECRET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(api[_-]?key|x-api-key|authorization|secret|password)\b\s*[:=]\s*["']?[^"',\s}]+"#,
    )
    .expect("valid key/value secret regex")
});

/// Redact credentials from a provider error body and cap its length.
///
/// JSON bodies are redacted field by field; anything else is scrubbed as
/// plain text.
pub fn sanitize_provider_error_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "<empty error response body>".to_string();
    }

    let cleaned = match serde_json::from_str::<Value>(trimmed) {
        Ok(mut json) => {
            scrub_value(&mut json);
            json.to_string()
        }
        Err(_) => scrub_text(trimmed),
    };
    truncate(cleaned)
}

fn scrub_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if is_sensitive_key(key) {
                    *val = Value::String(REDACTED.to_string());
                } else {
                    scrub_value(val);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(scrub_value),
        Value::String(s) => *s = scrub_text(s),
        _ => {}
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.to_ascii_lowercase().replace('-', "_");
    ["api_key", "token", "secret", "password", "authorization"]
        .iter()
        .any(|needle| normalized.contains(needle))
}

fn scrub_text(input: &str) -> String {
    let text = BEARER_TOKEN_RE.replace_all(input, "Bearer [REDACTED]");
    let text = ANTHROPIC_KEY_RE.replace_all(&text, REDACTED);
    KEY_VALUE_SECRET_RE
        .replace_all(&text, "$1=[REDACTED]")
        .into_owned()
}

fn truncate(input: String) -> String {
    let char_count = input.chars().count();
    if char_count <= MAX_ERROR_TEXT_CHARS {
        return input;
    }
    let kept: String = input.chars().take(MAX_ERROR_TEXT_CHARS).collect();
    format!(
        "{}... [truncated {} chars]",
        kept,
        char_count - MAX_ERROR_TEXT_CHARS
    )
}
