//! Wire models exchanged with the `/resources` API.

use resman_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// A resource as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: DbId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /resources`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewResource {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `PUT /resources/{id}`. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourcePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
