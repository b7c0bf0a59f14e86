use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::auth::Session;
use crate::repositories::auth::AuthRepository;
use crate::repositories::session::SessionStore;
use crate::repositories::Api;

pub enum AuthRequest {
    Login {
        email: String,
        password: String,
        response: oneshot::Sender<Result<Session, ServiceError>>,
    },
    Signup {
        name: String,
        email: String,
        password: String,
        response: oneshot::Sender<Result<String, ServiceError>>,
    },
    Logout {
        response: oneshot::Sender<Result<(), ServiceError>>,
    },
}

#[derive(Clone)]
pub struct AuthRequestHandler {
    repository: AuthRepository,
    sessions: SessionStore,
}

impl AuthRequestHandler {
    pub fn new(api: Api, sessions: SessionStore) -> Self {
        Self {
            repository: AuthRepository::new(api),
            sessions,
        }
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, ServiceError> {
        let auth = self.repository.login(email, password).await?;
        let session = Session {
            token: auth.token,
            user_id: auth.user.id,
            user_name: auth.user.name,
            user_email: auth.user.email,
        };
        self.sessions
            .save(&session)
            .map_err(|e| ServiceError::Session(e.to_string()))?;
        log::info!("Logged in as {}.", session.user_email);
        Ok(session)
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<String, ServiceError> {
        let response = self.repository.signup(name, email, password).await?;
        Ok(response.message)
    }

    fn logout(&self) -> Result<(), ServiceError> {
        self.sessions
            .clear()
            .map_err(|e| ServiceError::Session(e.to_string()))
    }
}

#[async_trait]
impl RequestHandler<AuthRequest> for AuthRequestHandler {
    async fn handle_request(&self, request: AuthRequest) {
        match request {
            AuthRequest::Login {
                email,
                password,
                response,
            } => {
                let session = self.login(&email, &password).await;
                let _ = response.send(session);
            }
            AuthRequest::Signup {
                name,
                email,
                password,
                response,
            } => {
                let result = self.signup(&name, &email, &password).await;
                let _ = response.send(result);
            }
            AuthRequest::Logout { response } => {
                let _ = response.send(self.logout());
            }
        }
    }
}

pub struct AuthService;

impl AuthService {
    pub fn new() -> Self {
        AuthService {}
    }
}

#[async_trait]
impl Service<AuthRequest, AuthRequestHandler> for AuthService {}
