//! Backend health and telemetry

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use vox_core::{HealthCheck, HealthReport, Result};

use crate::store::VectorStore;

/// Snapshot of the backend's reachability plus basic stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreHealth {
    pub reachable: bool,
    pub collections: usize,
    pub detail: Option<String>,
}

impl VectorStore {
    /// Composite health over the four operation families: collections,
    /// points, search, monitoring. Healthy only when every probe answers;
    /// a degraded report names the failing family.
    pub async fn health_check(&self) -> HealthReport {
        let mut checks = Vec::new();

        match self.list_collections().await {
            Ok(_) => checks.push(HealthCheck::healthy("vector-collections")),
            Err(e) => checks.push(HealthCheck::unhealthy("vector-collections", e.to_string())),
        }

        let collection = self.default_collection.clone();
        match self.count_points(&collection).await {
            Ok(_) => checks.push(HealthCheck::healthy("vector-points")),
            Err(e) => checks.push(HealthCheck::unhealthy("vector-points", e.to_string())),
        }

        let probe = self.placeholder_vector();
        match self
            .search_by_vector(&collection, &probe, 1, None, None)
            .await
        {
            Ok(_) => checks.push(HealthCheck::healthy("vector-search")),
            Err(e) => checks.push(HealthCheck::unhealthy("vector-search", e.to_string())),
        }

        match self.cluster_info().await {
            Ok(_) => checks.push(HealthCheck::healthy("vector-cluster")),
            Err(e) => checks.push(HealthCheck::unhealthy("vector-cluster", e.to_string())),
        }

        HealthReport::aggregate(checks)
    }

    /// Quick reachability snapshot for status endpoints.
    pub async fn store_health(&self) -> StoreHealth {
        match self.list_collections().await {
            Ok(names) => StoreHealth {
                reachable: true,
                collections: names.len(),
                detail: None,
            },
            Err(e) => StoreHealth {
                reachable: false,
                collections: 0,
                detail: Some(e.to_string()),
            },
        }
    }

    /// Raw cluster status from the backend.
    pub async fn cluster_info(&self) -> Result<Value> {
        let response = self.transport.request(Method::GET, "/cluster", None).await?;
        Ok(response["result"].clone())
    }

    /// Raw telemetry payload from the backend.
    pub async fn telemetry(&self) -> Result<Value> {
        let response = self
            .transport
            .request(Method::GET, "/telemetry", None)
            .await?;
        Ok(response["result"].clone())
    }
}
