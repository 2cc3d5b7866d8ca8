#[cfg(test)]
mod tests {
    use hyper::{HeaderMap, StatusCode};
    use crate::middleware::{add_cors_headers, cors_headers, preflight};

    #[test]
    fn test_add_cors_headers() {
        let mut headers = HeaderMap::new();
        add_cors_headers(&mut headers);

        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "*"
        );
        assert_eq!(
            headers.get("access-control-allow-methods").unwrap(),
            "GET, OPTIONS"
        );
        assert_eq!(
            headers.get("access-control-allow-headers").unwrap(),
            "Content-Type, Authorization"
        );
    }

    #[test]
    fn test_cors_headers_map() {
        assert_eq!(cors_headers().len(), 3);
    }

    #[tokio::test]
    async fn test_preflight_returns_no_content() {
        let resp = warp::test::request()
            .method("OPTIONS")
            .path("/api/visitors")
            .reply(&preflight())
            .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_preflight_ignores_other_methods() {
        let matched = warp::test::request()
            .method("GET")
            .path("/missing")
            .matches(&preflight())
            .await;
        assert!(!matched);

        let rejection = warp::test::request()
            .method("GET")
            .path("/missing")
            .filter(&preflight())
            .await
            .err()
            .unwrap();
        assert!(rejection.is_not_found());
    }
}
