use axum::{
    body::{to_bytes, Body},
    extract::{Query, Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::gate::{evaluate, RoutePolicy};
use crate::shared::{AppError, AppState};

/// Header carrying the calling application's key
pub const APP_KEY_HEADER: &str = "x-app-key";

/// Largest request body buffered while looking for an `app_key` field
pub const BODY_LIMIT: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
pub struct AppKeyQuery {
    pub app_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AppKeyBody {
    app_key: Option<String>,
}

/// Resolves the calling application and runs the access gate for the route.
///
/// The key is read from the `X-App-Key` header, then the `app_key` query
/// parameter, then the `app_key` field of a POST JSON body. A query string
/// that cannot be decoded is treated as carrying no key.
#[instrument(skip_all, fields(uri = %req.uri()))]
pub async fn application_gate(
    State((state, policy)): State<(AppState, RoutePolicy)>,
    query: Option<Query<AppKeyQuery>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let app_key = req
        .headers()
        .get(APP_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| query.and_then(|Query(query)| query.app_key))
        .filter(|key| !key.is_empty());

    let (app_key, mut req) = match app_key {
        Some(key) => (Some(key), req),
        None if *req.method() == Method::POST => app_key_from_body(req).await?,
        None => (None, req),
    };

    let application = match app_key {
        Some(key) => Some(
            state
                .application_repository
                .find_application_by_key(&key)
                .await?
                .ok_or_else(|| {
                    warn!("Unknown application key");
                    AppError::ApplicationNotFound
                })?,
        ),
        None if policy.requires_application() => {
            warn!("Missing application key");
            return Err(AppError::MissingParameter("app_key"));
        }
        None => None,
    };

    if let Err(e) = evaluate(application.as_ref(), policy) {
        warn!(?policy, "Application rejected by access gate");
        return Err(e);
    }

    if let Some(application) = application {
        info!(application = %application.name, "Application authorized");
        req.extensions_mut().insert(application);
    }

    Ok(next.run(req).await)
}

/// Buffers the body, reads `app_key` from it if it is a JSON object, and
/// hands back a request carrying the same bytes.
async fn app_key_from_body(req: Request) -> Result<(Option<String>, Request), AppError> {
    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, BODY_LIMIT).await.map_err(|e| {
        warn!("Could not buffer request body: {}", e);
        AppError::PayloadTooLarge(BODY_LIMIT)
    })?;

    // Malformed JSON is left for the handler's extractor to reject
    let app_key = serde_json::from_slice::<AppKeyBody>(&bytes)
        .ok()
        .and_then(|body| body.app_key)
        .filter(|key| !key.is_empty());

    Ok((app_key, Request::from_parts(parts, Body::from(bytes))))
}
