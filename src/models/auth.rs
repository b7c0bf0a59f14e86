use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AuthUser {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SignupResponse {
    pub message: String,
}

/// The client-side session. Created at login, destroyed at logout; persisted
/// by `repositories::session::SessionStore` and passed around explicitly.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
}
