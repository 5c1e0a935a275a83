//! Resource catalog handlers: search, CRUD, upload, and download.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use uuid::Uuid;
use validator::Validate;

use studyhub_core::error::AppError;
use studyhub_database::repositories::ResourceFilter;
use studyhub_service::catalog::{NewResource, ResourceDetail, ResourcePatch, UploadParams};

use crate::dto::request::{CreateResourceRequest, ResourceListParams, UpdateResourceRequest};
use crate::dto::response::ResourceListResponse;
use crate::error::{ApiError, validation_error};
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/resources
///
/// Full catalog search: text query, category/tag filters, and type filter,
/// paginated newest-first.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<ResourceListParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ResourceListResponse>, ApiError> {
    let filter = ResourceFilter {
        query: params.query,
        category_ids: params
            .category_ids
            .as_deref()
            .map(|raw| parse_id_list(raw, "category_ids"))
            .transpose()?,
        tag_ids: params
            .tag_ids
            .as_deref()
            .map(|raw| parse_id_list(raw, "tag_ids"))
            .transpose()?,
        resource_type: params.resource_type,
    };

    let page = pagination.into_page_request();
    let resources = state.catalog_service.list(&filter, &page).await?;

    Ok(Json(ResourceListResponse::from(resources)))
}

/// POST /api/resources
///
/// Registers a LINK resource. File resources go through /resources/upload.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateResourceRequest>,
) -> Result<Json<ResourceDetail>, ApiError> {
    payload.validate().map_err(validation_error)?;

    let resource = state
        .catalog_service
        .create_link(
            auth.context(),
            NewResource {
                title: payload.title,
                description: payload.description,
                resource_type: payload.resource_type,
                url: payload.url,
                category_ids: payload.category_ids,
                tag_names: payload.tag_names,
            },
        )
        .await?;

    Ok(Json(resource))
}

/// GET /api/resources/{id}
pub async fn get(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResourceDetail>, ApiError> {
    let resource = state.catalog_service.get(id).await?;
    Ok(Json(resource))
}

/// PUT /api/resources/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateResourceRequest>,
) -> Result<Json<ResourceDetail>, ApiError> {
    payload.validate().map_err(validation_error)?;

    let resource = state
        .catalog_service
        .update(
            auth.context(),
            id,
            ResourcePatch {
                title: payload.title,
                description: payload.description,
                category_ids: payload.category_ids,
                tag_names: payload.tag_names,
            },
        )
        .await?;

    Ok(Json(resource))
}

/// DELETE /api/resources/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.catalog_service.delete(auth.context(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/resources/upload
///
/// Multipart upload. Expects a `file` part plus `title` and optional
/// `description`, `category_ids`, and `tag_names` parts; the last two are
/// JSON-encoded arrays.
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ResourceDetail>, ApiError> {
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut category_ids: Vec<Uuid> = Vec::new();
    let mut tag_names: Vec<String> = Vec::new();
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
    {
        match field.name() {
            Some("file") => {
                filename = field.file_name().map(str::to_string);
                content_type = field.content_type().map(str::to_string);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Failed to read file: {e}")))?,
                );
            }
            Some("title") => {
                title = Some(read_text_field(field).await?);
            }
            Some("description") => {
                description = Some(read_text_field(field).await?);
            }
            Some("category_ids") => {
                category_ids = parse_json_field(&read_text_field(field).await?)?;
            }
            Some("tag_names") => {
                tag_names = parse_json_field(&read_text_field(field).await?)?;
            }
            _ => {}
        }
    }

    let title = title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::validation("Title is required"))?;
    let data = data.ok_or_else(|| AppError::validation("No file provided"))?;

    let resource = state
        .upload_service
        .upload(
            auth.context(),
            UploadParams {
                title,
                description,
                category_ids,
                tag_names,
                filename,
                content_type,
                data,
            },
        )
        .await?;

    Ok(Json(resource))
}

/// GET /api/resources/{id}/download
///
/// Streams the stored bytes of a FILE resource as an attachment.
pub async fn download(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let download = state.download_service.download(id).await?;

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, download.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download.filename),
        );
    if let Some(size) = download.size_bytes {
        builder = builder.header(header::CONTENT_LENGTH, size);
    }

    let response = builder
        .body(Body::from_stream(download.stream))
        .map_err(|e| AppError::internal(format!("Failed to build download response: {e}")))?;

    Ok(response)
}

/// Reads a multipart field as UTF-8 text.
async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart field: {e}")))
}

/// Parses a JSON-encoded array carried inside a multipart text field.
fn parse_json_field<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, AppError> {
    serde_json::from_str(raw)
        .map_err(|_| AppError::validation("Invalid JSON format for category_ids or tag_names"))
}

/// Splits a comma-separated id list, rejecting malformed entries.
fn parse_id_list(raw: &str, param: &str) -> Result<Vec<Uuid>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            Uuid::parse_str(part)
                .map_err(|_| AppError::validation(format!("Invalid UUID in {param}: {part}")))
        })
        .collect()
}
