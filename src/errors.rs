use thiserror::Error;

/// Failures while talking to the analytics backend.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("authentication failed: {0}")]
    AuthenticationFailure(String),

    #[error("no valid authentication token could be obtained")]
    TokenUnavailable,

    #[error("upstream responded with status {status}")]
    Upstream { status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid upstream response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for AnalyticsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("--port can only be used together with a single --instance")]
    PortWithAll,
}

/// Rejections raised by the visitor route.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Invalid website parameter")]
    InvalidWebsite,

    #[error("Failed to fetch analytics data")]
    FetchFailed,
}

impl warp::reject::Reject for ProxyError {}
