//! Handlers for the `/resources` collection.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use resman_core::error::CoreError;
use resman_core::resource::{self, ResourceFilter, ENTITY};
use resman_core::types::DbId;
use resman_db::models::resource::{CreateResource, Resource, UpdateResource};
use resman_db::repositories::ResourceRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

/// POST /resources
///
/// A body that is not usable JSON is treated as carrying no name.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<AppJson<CreateResource>, AppError>,
) -> AppResult<(StatusCode, Json<Resource>)> {
    let input = match payload {
        Ok(AppJson(input)) => input,
        Err(e) => {
            tracing::debug!(error = %e, "Unreadable create body");
            CreateResource::default()
        }
    };
    let name = resource::validate_name(input.name.as_deref())?;
    let created = ResourceRepo::create(&state.pool, &name, input.description.as_deref()).await?;

    tracing::info!(resource_id = created.id, "Resource created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /resources?name=&description=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ResourceFilter>,
) -> AppResult<Json<Vec<Resource>>> {
    let resources = ResourceRepo::list(&state.pool, &filter).await?;
    Ok(Json(resources))
}

/// GET /resources/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Resource>> {
    let found = ResourceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(found))
}

/// PUT /resources/{id}
///
/// Applies only the supplied fields; an empty body is rejected.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateResource>,
) -> AppResult<Json<Resource>> {
    let name = resource::validate_update(input.name.as_deref(), input.description())?;
    let updated = ResourceRepo::update(&state.pool, id, name.as_deref(), input.description())
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(resource_id = id, "Resource updated");

    Ok(Json(updated))
}

/// DELETE /resources/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if !ResourceRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(resource_id = id, "Resource deleted");

    Ok(StatusCode::NO_CONTENT)
}
