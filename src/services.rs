use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::repositories::session::SessionStore;
use crate::repositories::{self, Api};
use crate::settings::Settings;

pub mod aggregation;
pub mod auth;
pub mod dashboard;
pub mod ledger;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Api(#[from] repositories::ApiError),
    #[error("{0}")]
    Aggregation(#[from] aggregation::AggregationError),
    #[error("session error: {0}")]
    Session(String),
    #[error("skipped: {0} fetch failed")]
    Dependency(&'static str),
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

/// Senders for every running service; the UI keeps one of these.
#[derive(Clone)]
pub struct ServiceChannels {
    pub auth: mpsc::Sender<auth::AuthRequest>,
    pub ledger: mpsc::Sender<ledger::LedgerRequest>,
    pub dashboard: mpsc::Sender<dashboard::DashboardRequest>,
}

pub fn start_services(settings: &Settings, sessions: SessionStore) -> ServiceChannels {
    let api = Api::new(settings.backend.url.clone());

    let (auth_tx, mut auth_rx) = mpsc::channel(64);
    let (ledger_tx, mut ledger_rx) = mpsc::channel(64);
    let (dashboard_tx, mut dashboard_rx) = mpsc::channel(64);

    log::info!("Starting auth service.");
    let auth_api = api.clone();
    tokio::spawn(async move {
        let mut service = auth::AuthService::new();
        service
            .run(auth::AuthRequestHandler::new(auth_api, sessions), &mut auth_rx)
            .await;
    });

    log::info!("Starting ledger service.");
    let ledger_api = api.clone();
    tokio::spawn(async move {
        let mut service = ledger::LedgerService::new();
        service
            .run(ledger::LedgerRequestHandler::new(ledger_api), &mut ledger_rx)
            .await;
    });

    log::info!("Starting dashboard service.");
    tokio::spawn(async move {
        let mut service = dashboard::DashboardService::new();
        service
            .run(dashboard::DashboardRequestHandler::new(api), &mut dashboard_rx)
            .await;
    });

    ServiceChannels {
        auth: auth_tx,
        ledger: ledger_tx,
        dashboard: dashboard_tx,
    }
}
