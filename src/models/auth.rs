use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub mobile: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
