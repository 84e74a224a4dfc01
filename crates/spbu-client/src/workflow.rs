//! Approval workflow client for adjustments, deposits and deliveries.
//!
//! Each call is checked against the permission evaluator and the payload
//! validated before any request is made. Successful mutations invalidate
//! the kind's cached lists and emit a success toast; every failure emits
//! an error toast carrying the server message or a local one.

use std::marker::PhantomData;
use std::sync::Arc;

use spbu_core::models::Validate;
use spbu_core::models::delivery::Delivery;
use spbu_core::permission::{self, AccessLevel};
use spbu_core::workflow::{self, ApprovalKind, ApprovalStatus, Deliveries};
use tracing::warn;

use crate::cache::QueryCache;
use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;
use crate::notify::{Notifier, Toast};

pub struct ApprovalClient<K> {
    api: ApiClient,
    cache: QueryCache,
    notifier: Arc<dyn Notifier>,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for ApprovalClient<K> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            cache: self.cache.clone(),
            notifier: self.notifier.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: ApprovalKind> ApprovalClient<K> {
    pub fn new(api: ApiClient, cache: QueryCache, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            cache,
            notifier,
            _kind: PhantomData,
        }
    }

    /// Whether the signed-in user may create records of this kind.
    pub fn can_create(&self) -> bool {
        workflow::can_create::<K>(self.api.auth().current_user().as_ref())
    }

    /// Whether the signed-in user may approve or reject records of this kind.
    pub fn can_decide(&self) -> bool {
        workflow::can_decide::<K>(self.api.auth().current_user().as_ref())
    }

    pub async fn list(&self, status: Option<ApprovalStatus>) -> ClientResult<Vec<K::Entity>> {
        let result = self.fetch_list(status).await;
        self.report_failure(&result, "load");
        result
    }

    pub async fn create(&self, input: K::Create) -> ClientResult<K::Entity> {
        let result = self.submit(input).await;
        self.finish(result, "created", "create")
    }

    pub async fn approve(&self, id: i64) -> ClientResult<K::Entity> {
        let result = self.decide(id, K::APPROVE_ACTION).await;
        let verb = if K::APPROVE_ACTION == "confirm" { "confirmed" } else { "approved" };
        self.finish(result, verb, K::APPROVE_ACTION)
    }

    pub async fn reject(&self, id: i64) -> ClientResult<K::Entity> {
        let result = self.decide(id, K::REJECT_ACTION).await;
        self.finish(result, "rejected", K::REJECT_ACTION)
    }

    fn require_read(&self) -> ClientResult<()> {
        let user = self.api.auth().current_user().ok_or(ClientError::NotSignedIn)?;
        if !permission::allows(Some(&user), K::RESOURCE, AccessLevel::ReadOnly) {
            return Err(ClientError::Forbidden(format!(
                "You do not have access to {}",
                K::RESOURCE
            )));
        }
        Ok(())
    }

    async fn fetch_list(&self, status: Option<ApprovalStatus>) -> ClientResult<Vec<K::Entity>> {
        self.require_read()?;
        let path = match status {
            Some(status) => format!("/api/{}?status={}", K::PATH, status.as_str()),
            None => format!("/api/{}", K::PATH),
        };
        self.cache
            .get_or_fetch(&cache_key(&path), || self.api.get(&path))
            .await
    }

    async fn submit(&self, input: K::Create) -> ClientResult<K::Entity> {
        let user = self.api.auth().current_user().ok_or(ClientError::NotSignedIn)?;
        workflow::authorize_create::<K>(&user)?;
        input.validate()?;
        self.api.post(&format!("/api/{}", K::PATH), &input).await
    }

    async fn decide(&self, id: i64, action: &str) -> ClientResult<K::Entity> {
        let user = self.api.auth().current_user().ok_or(ClientError::NotSignedIn)?;
        if !workflow::can_decide::<K>(Some(&user)) {
            return Err(ClientError::Forbidden(format!(
                "You are not allowed to {action} {} records",
                K::NAME
            )));
        }
        self.api
            .put(&format!("/api/{}/{id}/{action}", K::PATH))
            .await
    }

    fn finish(
        &self,
        result: ClientResult<K::Entity>,
        done: &str,
        attempted: &str,
    ) -> ClientResult<K::Entity> {
        if result.is_ok() {
            self.cache.invalidate(&format!("api/{}", K::PATH));
            // Decisions move tank stock and report totals.
            self.cache.invalidate("api/tanks");
            self.cache.invalidate("api/reports");
            self.notifier.notify(Toast::success(
                "Success",
                format!("{} {done}", capitalized(K::NAME)),
            ));
        }
        self.report_failure(&result, attempted);
        result
    }

    fn report_failure<T>(&self, result: &ClientResult<T>, attempted: &str) {
        if let Err(err) = result {
            warn!(kind = K::NAME, action = attempted, error = %err, "Workflow call failed");
            self.notifier.notify(Toast::error(
                format!("Failed to {attempted} {}", K::NAME),
                err.to_string(),
            ));
        }
    }
}

impl ApprovalClient<Deliveries> {
    /// Pending deliveries awaiting confirmation.
    pub async fn ready_for_confirmation(&self) -> ClientResult<Vec<Delivery>> {
        let path = "/api/deliveries/ready-for-confirmation";
        let result = self.fetch_ready(path).await;
        self.report_failure(&result, "load");
        result
    }

    async fn fetch_ready(&self, path: &str) -> ClientResult<Vec<Delivery>> {
        self.require_read()?;
        self.cache
            .get_or_fetch(&cache_key(path), || self.api.get(path))
            .await
    }
}

/// Cache keys drop the leading slash so `api/{path}` prefixes them.
fn cache_key(path: &str) -> String {
    path.trim_start_matches('/').to_string()
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
