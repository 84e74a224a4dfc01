//! Read access to stations, tanks, prices and reports, and sale recording.

use spbu_core::models::Validate;
use spbu_core::models::price::Price;
use spbu_core::models::report::ReportSummary;
use spbu_core::models::sale::{CreateSale, Sale};
use spbu_core::models::station::Spbu;
use spbu_core::models::tank::Tank;
use spbu_core::permission::{self, AccessLevel, ResourceKey};

use crate::cache::QueryCache;
use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;

#[derive(Clone)]
pub struct ResourceClient {
    api: ApiClient,
    cache: QueryCache,
}

impl ResourceClient {
    pub fn new(api: ApiClient, cache: QueryCache) -> Self {
        Self { api, cache }
    }

    pub async fn stations(&self) -> ClientResult<Vec<Spbu>> {
        self.cached(ResourceKey::Spbu, "api/spbu".into()).await
    }

    pub async fn tanks(&self) -> ClientResult<Vec<Tank>> {
        self.cached(ResourceKey::Tanks, "api/tanks".into()).await
    }

    pub async fn prices(&self) -> ClientResult<Vec<Price>> {
        self.cached(ResourceKey::Prices, "api/prices".into()).await
    }

    pub async fn current_price(&self, fuel_type: &str) -> ClientResult<Price> {
        self.require(ResourceKey::Prices, AccessLevel::ReadOnly)?;
        self.api
            .get_with_query("/api/prices/current", &[("fuelType", fuel_type)])
            .await
    }

    pub async fn sales(&self) -> ClientResult<Vec<Sale>> {
        self.cached(ResourceKey::Sales, "api/sales".into()).await
    }

    /// Record a sale. Stock and report views are refetched afterwards.
    pub async fn record_sale(&self, input: CreateSale) -> ClientResult<Sale> {
        self.require(ResourceKey::Sales, AccessLevel::Limited)?;
        input.validate()?;
        let sale = self.api.post("/api/sales", &input).await?;
        for prefix in ["api/sales", "api/tanks", "api/reports"] {
            self.cache.invalidate(prefix);
        }
        Ok(sale)
    }

    pub async fn report_summary(&self, spbu_id: Option<i64>) -> ClientResult<ReportSummary> {
        let key = match spbu_id {
            Some(id) => format!("api/reports/summary?spbuId={id}"),
            None => "api/reports/summary".into(),
        };
        self.cached(ResourceKey::Reports, key).await
    }

    async fn cached<T>(&self, resource: ResourceKey, key: String) -> ClientResult<T>
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
    {
        self.require(resource, AccessLevel::ReadOnly)?;
        let path = format!("/{key}");
        self.cache.get_or_fetch(&key, || self.api.get(&path)).await
    }

    fn require(&self, resource: ResourceKey, level: AccessLevel) -> ClientResult<()> {
        let user = self.api.auth().current_user().ok_or(ClientError::NotSignedIn)?;
        permission::require(&user, resource, level)?;
        Ok(())
    }
}
