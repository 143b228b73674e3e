//! Resource entity model and DTOs.

use resman_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `resources` table.
///
/// Serialized with camelCase keys (`createdAt`, `updatedAt`) to match the
/// public wire format.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a resource.
///
/// `name` is optional at the serde level so a missing name surfaces as a
/// validation error (400) rather than a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateResource {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// DTO for updating a resource. All fields are optional.
///
/// `description` distinguishes an absent key (`None`, keep) from an explicit
/// `null` (`Some(None)`, clear).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateResource {
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
}

impl UpdateResource {
    /// Borrowed view of `description` for the repository layer.
    pub fn description(&self) -> Option<Option<&str>> {
        self.description.as_ref().map(|d| d.as_deref())
    }
}
