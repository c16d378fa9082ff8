use base64::Engine;
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use serde_json::Value;

/// Standard alphabet that tolerates non-zero trailing bits in the last symbol.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

const DEFAULT_USERNAME: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub is_admin: bool,
}

/// Decodes the payload segment of a JWT without verifying it.
///
/// Only used for display decisions; the server remains the authority.
pub fn decode_jwt(token: &str) -> Option<Value> {
    let part = token.split('.').nth(1)?;
    let padding = (4 - part.len() % 4) % 4;
    let padded = format!("{}{}", part, "=".repeat(padding))
        .replace('-', "+")
        .replace('_', "/");
    let bytes = match PAYLOAD_ENGINE.decode(padded) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!("Failed to decode JWT: {}", err);
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(payload) => Some(payload),
        Err(err) => {
            tracing::warn!("Failed to decode JWT: {}", err);
            None
        }
    }
}

pub fn derive_identity(token: Option<&str>) -> Option<Identity> {
    let payload = decode_jwt(token?)?;
    if !is_truthy(&payload) {
        return None;
    }
    let username = claim_text(payload.get("username"))
        .or_else(|| claim_text(payload.get("sub")))
        .unwrap_or_else(|| DEFAULT_USERNAME.to_string());
    Some(Identity {
        username,
        is_admin: has_admin_claim(&payload),
    })
}

/// Any of `role`, `roles[]` or `authorities`/`auth` mentioning ADMIN, case-insensitively.
pub fn has_admin_claim(payload: &Value) -> bool {
    if let Some(role) = payload.get("role").filter(|role| is_truthy(role)) {
        if mentions_admin(&stringify(role)) {
            return true;
        }
    }
    if let Some(Value::Array(roles)) = payload.get("roles") {
        if roles.iter().any(|role| mentions_admin(&stringify(role))) {
            return true;
        }
    }
    let authorities = payload
        .get("authorities")
        .filter(|value| is_truthy(value))
        .or_else(|| payload.get("auth").filter(|value| is_truthy(value)));
    authorities.is_some_and(|value| mentions_admin(&stringify(value)))
}

fn mentions_admin(text: &str) -> bool {
    text.to_uppercase().contains("ADMIN")
}

fn claim_text(value: Option<&Value>) -> Option<String> {
    value.filter(|value| is_truthy(value)).map(stringify)
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Null => String::new(),
        Value::Object(_) => String::new(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
