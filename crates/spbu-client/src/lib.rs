//! SPBU Client — typed access to the SPBU monitoring API.
//!
//! The session lives in an explicit [`AuthContext`] shared by every
//! client built from it. Mutations are gated locally with
//! `spbu_core::permission` before a request is issued, invalidate the
//! affected [`QueryCache`] entries on success and report their outcome
//! to a [`Notifier`].

pub mod cache;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod notify;
pub mod resources;
pub mod session;
pub mod workflow;

use std::sync::Arc;

use spbu_core::workflow::{Adjustments, Deliveries, Deposits};

pub use cache::QueryCache;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use guard::{RouteDecision, guard_route};
pub use http::ApiClient;
pub use notify::{Notifier, RecordingNotifier, Toast, ToastLevel, TracingNotifier};
pub use resources::ResourceClient;
pub use session::{AuthContext, Session};
pub use workflow::ApprovalClient;

/// Every client of the API wired to one session, cache and notifier.
#[derive(Clone)]
pub struct SpbuClient {
    pub api: ApiClient,
    pub adjustments: ApprovalClient<Adjustments>,
    pub deposits: ApprovalClient<Deposits>,
    pub deliveries: ApprovalClient<Deliveries>,
    pub resources: ResourceClient,
}

impl SpbuClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Self::with_notifier(config, Arc::new(TracingNotifier))
    }

    pub fn with_notifier(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> ClientResult<Self> {
        let api = ApiClient::new(config, AuthContext::new())?;
        let cache = api.cache().clone();
        Ok(Self {
            adjustments: ApprovalClient::new(api.clone(), cache.clone(), notifier.clone()),
            deposits: ApprovalClient::new(api.clone(), cache.clone(), notifier.clone()),
            deliveries: ApprovalClient::new(api.clone(), cache.clone(), notifier),
            resources: ResourceClient::new(api.clone(), cache),
            api,
        })
    }

    pub fn auth(&self) -> &AuthContext {
        self.api.auth()
    }
}
