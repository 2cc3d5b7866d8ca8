use std::convert::Infallible;
use std::sync::Arc;
use hyper::StatusCode;
use warp::{Filter, Rejection, Reply};
use crate::config::DEFAULT_WEBSITE_ALIAS;
use crate::errors::ProxyError;
use crate::middleware::{access_log, cors_headers, preflight};
use crate::models::{AppState, ErrorBody, VisitorsQuery};


/// All routes of one proxy instance, with CORS and access logging applied.
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    let health_check = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| "OK");

    let visitors = warp::path!("api" / "visitors")
        .and(warp::get())
        .and(warp::query::<VisitorsQuery>())
        .and(state_filter)
        .and_then(get_visitors);

    health_check
        .or(visitors)
        .or(preflight())
        .recover(handle_rejection)
        .with(warp::reply::with::headers(cors_headers()))
        .with(access_log())
}

pub async fn get_visitors(
    query: VisitorsQuery,
    state: Arc<AppState>,
) -> Result<impl Reply, Rejection> {
    let alias = query.website.as_deref().unwrap_or(DEFAULT_WEBSITE_ALIAS);

    let website_id = match state.aliases.get(alias) {
        Some(id) => *id,
        None => {
            tracing::debug!(alias, "unknown website alias");
            return Err(warp::reject::custom(ProxyError::InvalidWebsite));
        }
    };

    match state.session.get_visitor_data(website_id).await {
        Ok(payload) => Ok(warp::reply::json(&payload)),
        Err(e) => {
            tracing::error!(alias, website_id, error = %e, "failed to fetch visitor data");
            Err(warp::reject::custom(ProxyError::FetchFailed))
        }
    }
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if let Some(e) = err.find::<ProxyError>() {
        match e {
            ProxyError::InvalidWebsite => (StatusCode::BAD_REQUEST, e.to_string()),
            ProxyError::FetchFailed => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, ProxyError::InvalidWebsite.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed".to_string())
    } else {
        tracing::error!(?err, "unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorBody::new(message)),
        code,
    ))
}
