//! Collection lifecycle operations

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use vox_core::{Error, Result};

use crate::store::{Distance, VectorStore};
use crate::validate;

/// Summary of one collection as reported by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionDescription {
    pub name: String,
    pub points_count: u64,
    pub vectors_dimension: usize,
    pub status: String,
}

impl VectorStore {
    /// Create a collection with the given dimension and distance metric.
    /// Creating a collection that already exists is a conflict, surfaced
    /// distinctly so callers can treat it as idempotent success if they want.
    pub async fn create_collection(
        &self,
        name: &str,
        dimension: usize,
        distance: Distance,
    ) -> Result<()> {
        validate::collection_name(name)?;
        validate::dimension(dimension)?;
        let body = json!({
            "vectors": {
                "size": dimension,
                "distance": distance.as_wire(),
            }
        });
        self.transport
            .request(Method::PUT, &format!("/collections/{name}"), Some(body))
            .await?;
        tracing::info!(collection = name, dimension, "created collection");
        Ok(())
    }

    /// Existence probe. Not-found maps to `Ok(false)`; every other failure
    /// propagates.
    pub async fn collection_exists(&self, name: &str) -> Result<bool> {
        validate::collection_name(name)?;
        match self
            .transport
            .request(Method::GET, &format!("/collections/{name}"), None)
            .await
        {
            Ok(_) => Ok(true),
            Err(Error::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Delete a collection and all its points.
    pub async fn delete_collection(&self, name: &str) -> Result<()> {
        validate::collection_name(name)?;
        self.transport
            .request(Method::DELETE, &format!("/collections/{name}"), None)
            .await?;
        tracing::info!(collection = name, "deleted collection");
        Ok(())
    }

    /// Names of all collections on the backend.
    pub async fn list_collections(&self) -> Result<Vec<String>> {
        let response = self
            .transport
            .request(Method::GET, "/collections", None)
            .await?;
        let names = response["result"]["collections"]
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|c| c["name"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();
        Ok(names)
    }

    /// Metadata for one collection: point count, dimension, status.
    pub async fn collection_info(&self, name: &str) -> Result<CollectionDescription> {
        validate::collection_name(name)?;
        let response = self
            .transport
            .request(Method::GET, &format!("/collections/{name}"), None)
            .await?;
        let result = &response["result"];
        Ok(CollectionDescription {
            name: name.to_string(),
            points_count: result["points_count"].as_u64().unwrap_or(0),
            vectors_dimension: result["config"]["params"]["vectors"]["size"]
                .as_u64()
                .unwrap_or(0) as usize,
            status: result["status"].as_str().unwrap_or("unknown").to_string(),
        })
    }
}
