use crate::models::auth::{AuthResponse, LoginRequest, SignupRequest, SignupResponse};

use super::{Api, ApiError};

#[derive(Clone)]
pub struct AuthRepository {
    api: Api,
}

impl AuthRepository {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let request = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        self.api.post("/api/auth/login", &request).await
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SignupResponse, ApiError> {
        let request = SignupRequest {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        };
        self.api.post("/api/auth/signup", &request).await
    }
}
