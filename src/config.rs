// Values come from the optional CONFIG_FILE first, then the process environment.
use std::collections::HashMap;
use std::env;
use std::fs;

use crate::clients::api_client::DEFAULT_API_BASE;

pub const DEFAULT_TOKEN_FILE: &str = "./data/session.json";

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    pub fn lookup(&self, key: &str) -> Option<String> {
        self.get(key)
            .or_else(|| env::var(key).ok())
            .filter(|value| !value.is_empty())
    }

    pub fn api_base(&self) -> String {
        self.lookup("API_BASE")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }

    pub fn token_file(&self) -> String {
        self.lookup("TOKEN_FILE")
            .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_string())
    }

    pub fn log_filter(&self) -> Option<String> {
        self.lookup("RUST_LOG")
    }
}
