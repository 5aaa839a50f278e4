//! Translation of Octocrab failures into [`GitHubError`].

use http::StatusCode;

use crate::github::error::GitHubError;

/// Maps an Octocrab error raised during `operation`.
///
/// GitHub signals an exhausted quota with 403 or 429 and a message or
/// documentation link mentioning the rate limit; those become
/// [`GitHubError::RateLimitExceeded`] so the scheduler's next tick can retry.
/// Other 401/403 responses mean the token is bad.
pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> GitHubError {
    match error {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code;
            let reason = &source.message;
            match status {
                StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
                    if mentions_rate_limit(source) =>
                {
                    GitHubError::RateLimitExceeded {
                        message: format!("{operation}: {reason}"),
                    }
                }
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GitHubError::Authentication {
                    message: format!("{operation} returned {status}: {reason}"),
                },
                _ => GitHubError::Api {
                    message: format!("{operation} returned {status}: {reason}"),
                },
            }
        }
        octocrab::Error::Http { .. }
        | octocrab::Error::Hyper { .. }
        | octocrab::Error::Service { .. } => GitHubError::Network {
            message: format!("{operation} could not reach GitHub: {error}"),
        },
        _ => GitHubError::Api {
            message: format!("{operation} failed: {error}"),
        },
    }
}

fn mentions_rate_limit(source: &octocrab::GitHubError) -> bool {
    source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"))
}
