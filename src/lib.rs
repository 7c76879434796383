pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod notify;
pub mod router;
pub mod session;
pub mod storage;
pub mod store;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use api::ApiClient;
use config::Config;
use notify::Notifier;
use router::Router;
use session::{SessionContext, SessionStore};
use storage::Storage;
use store::{BusinessStore, ClientStore};

/// Wired application core.
///
/// Session context, router, API client, and the stores share one storage
/// backend and one notification sink; the router doubles as the navigation
/// sink the HTTP layer uses on session invalidation.
pub struct AppState {
    pub config: Config,
    pub session: Arc<SessionContext>,
    pub router: Arc<Router>,
    pub api: Arc<ApiClient>,
    pub users: SessionStore,
    pub business: BusinessStore,
    pub client: ClientStore,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>, notifier: Arc<dyn Notifier>) -> Self {
        let session = Arc::new(SessionContext::load(storage.clone()));
        let router = Arc::new(Router::new(session.clone()));
        let api = Arc::new(ApiClient::new(
            config.api.base_url.clone(),
            session.clone(),
            router.clone(),
        ));

        let users = SessionStore::new(api.clone(), session.clone(), notifier.clone());
        let business = BusinessStore::load(
            api.clone(),
            notifier.clone(),
            storage.clone(),
            config.app.origin.clone(),
        );
        let client = ClientStore::new(api.clone(), notifier);

        Self {
            config,
            session,
            router,
            api,
            users,
            business,
            client,
        }
    }
}
