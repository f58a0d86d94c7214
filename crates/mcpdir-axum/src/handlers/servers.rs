//! Catalog query handlers.
//!
//! Every read goes to the live store first. A missing store, or a store
//! error other than `NotFound`, answers from the mock catalog instead.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use mcpdir_core::{
    CatalogQuery, CatalogReader, ChangelogEntry, CompatibilityEntry, HealthEntry,
    RECENT_HEALTH_LIMIT, RepositoryError, SearchParams, Server, ServerDetail, ServerId, Tool,
};
use tracing::warn;

use crate::bootstrap::AxumContext;
use crate::dto::{DetailResponse, ListResponse, SearchResponse};
use crate::error::HttpError;
use crate::state::AppState;

/// A read against one catalog, keyed by server id or slug.
type Read<T> =
    for<'a> fn(&'a dyn CatalogReader, &'a str) -> BoxFuture<'a, Result<T, RepositoryError>>;

/// Run `read` against the store, then the mock catalog.
///
/// Returns the value and whether it came from the mock catalog.
async fn with_fallback<T>(
    ctx: &AxumContext,
    id_or_slug: &str,
    read: Read<T>,
) -> Result<(T, bool), HttpError> {
    if let Some(store) = &ctx.store {
        match read(store.as_ref(), id_or_slug).await {
            Ok(value) => return Ok((value, false)),
            Err(RepositoryError::NotFound(msg)) => return Err(HttpError::NotFound(msg)),
            Err(e) => warn!(id = id_or_slug, error = %e, "Catalog store failed, serving mock data"),
        }
    }
    let value = read(&*ctx.mock, id_or_slug).await?;
    Ok((value, true))
}

async fn resolve(catalog: &dyn CatalogReader, id_or_slug: &str) -> Result<Server, RepositoryError> {
    catalog.server(id_or_slug).await
}

fn read_detail<'a>(
    catalog: &'a dyn CatalogReader,
    id_or_slug: &'a str,
) -> BoxFuture<'a, Result<ServerDetail, RepositoryError>> {
    Box::pin(async move {
        let server = resolve(catalog, id_or_slug).await?;
        let (tools, health, changelog, compatibility) = tokio::join!(
            catalog.tools(server.id),
            catalog.health(server.id, RECENT_HEALTH_LIMIT),
            catalog.changelog(server.id),
            catalog.compatibility(server.id),
        );
        Ok(ServerDetail {
            server,
            tools: tools?,
            health: health?,
            changelog: changelog?,
            compatibility: compatibility?,
        })
    })
}

fn read_tools<'a>(
    catalog: &'a dyn CatalogReader,
    id_or_slug: &'a str,
) -> BoxFuture<'a, Result<(ServerId, Vec<Tool>), RepositoryError>> {
    Box::pin(async move {
        let id = resolve(catalog, id_or_slug).await?.id;
        Ok((id, catalog.tools(id).await?))
    })
}

fn read_health<'a>(
    catalog: &'a dyn CatalogReader,
    id_or_slug: &'a str,
) -> BoxFuture<'a, Result<(ServerId, Vec<HealthEntry>), RepositoryError>> {
    Box::pin(async move {
        let id = resolve(catalog, id_or_slug).await?.id;
        Ok((id, catalog.health(id, RECENT_HEALTH_LIMIT).await?))
    })
}

fn read_changelog<'a>(
    catalog: &'a dyn CatalogReader,
    id_or_slug: &'a str,
) -> BoxFuture<'a, Result<(ServerId, Vec<ChangelogEntry>), RepositoryError>> {
    Box::pin(async move {
        let id = resolve(catalog, id_or_slug).await?.id;
        Ok((id, catalog.changelog(id).await?))
    })
}

fn read_compatibility<'a>(
    catalog: &'a dyn CatalogReader,
    id_or_slug: &'a str,
) -> BoxFuture<'a, Result<(ServerId, Vec<CompatibilityEntry>), RepositoryError>> {
    Box::pin(async move {
        let id = resolve(catalog, id_or_slug).await?.id;
        Ok((id, catalog.compatibility(id).await?))
    })
}

async fn list<T>(
    state: &AppState,
    id_or_slug: &str,
    read: Read<(ServerId, Vec<T>)>,
) -> Result<Json<ListResponse<T>>, HttpError> {
    let ((server_id, items), is_mock_data) = with_fallback(state, id_or_slug, read).await?;
    Ok(Json(ListResponse {
        server_id,
        items,
        is_mock_data,
    }))
}

/// `GET /api/servers/search`
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = match CatalogQuery::from_params(&params) {
        Ok(query) => query,
        Err(e) => {
            let body = SearchResponse::rejected(e.to_string(), state.store.is_none());
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    if let Some(store) = &state.store {
        match store.search(&query).await {
            Ok(page) => return Json(SearchResponse::page(page, &query, false)).into_response(),
            Err(e) => warn!(error = %e, "Catalog search failed, serving mock data"),
        }
    }
    let page = state.mock.search_servers(&query);
    Json(SearchResponse::page(page, &query, true)).into_response()
}

/// `GET /api/servers/{id}`
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DetailResponse>, HttpError> {
    let (detail, is_mock_data) = with_fallback(&state, &id, read_detail).await?;
    Ok(Json(DetailResponse {
        detail,
        is_mock_data,
    }))
}

/// `GET /api/servers/{id}/tools`
pub async fn tools(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ListResponse<Tool>>, HttpError> {
    list(&state, &id, read_tools).await
}

/// `GET /api/servers/{id}/health`, newest first.
pub async fn health(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ListResponse<HealthEntry>>, HttpError> {
    list(&state, &id, read_health).await
}

/// `GET /api/servers/{id}/changelog`
pub async fn changelog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ListResponse<ChangelogEntry>>, HttpError> {
    list(&state, &id, read_changelog).await
}

/// `GET /api/servers/{id}/compatibility`
pub async fn compatibility(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ListResponse<CompatibilityEntry>>, HttpError> {
    list(&state, &id, read_compatibility).await
}
