use hyper::{HeaderMap, Method, header::{HeaderName, HeaderValue}};
use warp::Filter;

#[cfg(test)]
mod tests;

pub fn add_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static("Content-Type, Authorization"),
    );
}

pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    add_cors_headers(&mut headers);
    headers
}

/// Answers CORS preflight requests on any path.
///
/// Other methods reject as not found, so unknown paths still end in a 404.
pub fn preflight() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::method()
        .and_then(|method: Method| async move {
            if method == Method::OPTIONS {
                Ok(())
            } else {
                Err(warp::reject::not_found())
            }
        })
        .untuple_one()
        .map(|| warp::reply::with_status(warp::reply(), hyper::StatusCode::NO_CONTENT))
}

/// One access log line per request.
pub fn access_log() -> warp::log::Log<impl Fn(warp::log::Info<'_>) + Clone + Send + Sync + 'static> {
    warp::log::custom(|info| {
        tracing::info!(
            target: "analytics_proxy::access",
            method = %info.method(),
            path = info.path(),
            status = info.status().as_u16(),
            elapsed_ms = info.elapsed().as_millis() as u64,
            "request"
        );
    })
}
