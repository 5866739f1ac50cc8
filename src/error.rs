//! Error types for every layer, plus the mapping from failures to the text
//! shown to the user.

use std::fmt;
use std::time::Duration;

/// Failure reported by the network port.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpError {
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unreadable body: {0}")]
    Body(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("no record found")]
    NotFound,
    #[error("request failed with status {0}")]
    RequestFailed(u16),
    #[error("network error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<HttpError> for FetchError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Status(404) => FetchError::NotFound,
            HttpError::Status(code) => FetchError::RequestFailed(code),
            HttpError::Transport(msg) => FetchError::Transport(msg),
            HttpError::Body(msg) => FetchError::MalformedResponse(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("empty query")]
    EmptyQuery,
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Why a single image candidate could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageLoadError {
    #[error("image request failed: {0}")]
    Http(#[from] HttpError),
    #[error("image could not be decoded: {0}")]
    Decode(String),
    #[error("image did not load within {0:?}")]
    TimedOut(Duration),
}

/// Every image candidate was absent or failed to load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no image available for {name} (ID: {id})")]
pub struct ImageUnavailable {
    pub name: String,
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {field}: {reason}")]
    InvalidUrl { field: &'static str, reason: String },
    #[error("max random id must be at least 1")]
    EmptyRandomRange,
    #[error("image timeout must be greater than zero")]
    ZeroImageTimeout,
}

/// User-facing message categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserMessage {
    EmptyQuery,
    NotFound { query: String },
    Network,
    Generic,
    RandomUnavailable,
}

impl UserMessage {
    /// Classify a failed lookup for `query`.
    pub fn for_search(err: &SearchError, query: &str) -> Self {
        match err {
            SearchError::EmptyQuery => UserMessage::EmptyQuery,
            SearchError::Fetch(FetchError::NotFound) => UserMessage::NotFound {
                query: query.to_string(),
            },
            SearchError::Fetch(FetchError::Transport(_)) => UserMessage::Network,
            SearchError::Fetch(_) => UserMessage::Generic,
        }
    }

    /// A random id is always well formed, so any failure is reported the same way.
    pub fn for_random(_err: &SearchError) -> Self {
        UserMessage::RandomUnavailable
    }
}

impl fmt::Display for UserMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserMessage::EmptyQuery => write!(f, "Please enter a name or ID number."),
            UserMessage::NotFound { query } => write!(
                f,
                "Pokémon \"{}\" not found. Please check the spelling or try a different name/ID.",
                query
            ),
            UserMessage::Network => write!(
                f,
                "Network error. Please check your internet connection and try again."
            ),
            UserMessage::Generic => write!(
                f,
                "An error occurred while fetching Pokémon data. Please try again."
            ),
            UserMessage::RandomUnavailable => {
                write!(f, "Unable to fetch random Pokémon. Please try again.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_maps_to_fetch_error() {
        assert_eq!(FetchError::from(HttpError::Status(404)), FetchError::NotFound);
        assert_eq!(
            FetchError::from(HttpError::Status(503)),
            FetchError::RequestFailed(503)
        );
        assert_eq!(
            FetchError::from(HttpError::Body("eof".into())),
            FetchError::MalformedResponse("eof".into())
        );
    }

    #[test]
    fn not_found_message_names_the_query() {
        let err = SearchError::Fetch(FetchError::NotFound);
        let msg = UserMessage::for_search(&err, "missingno").to_string();
        assert!(msg.contains("missingno"));
    }

    #[test]
    fn transport_failures_ignore_query_content() {
        let err = SearchError::Fetch(FetchError::Transport("dns".into()));
        assert_eq!(UserMessage::for_search(&err, "pikachu"), UserMessage::Network);
        assert_eq!(UserMessage::for_search(&err, "404"), UserMessage::Network);
        assert!(UserMessage::Network.to_string().starts_with("Network error"));
    }

    #[test]
    fn other_failures_are_generic() {
        for err in [
            FetchError::RequestFailed(500),
            FetchError::MalformedResponse("bad".into()),
        ] {
            assert_eq!(
                UserMessage::for_search(&SearchError::Fetch(err), "eevee"),
                UserMessage::Generic
            );
        }
    }

    #[test]
    fn empty_query_prompt() {
        let msg = UserMessage::for_search(&SearchError::EmptyQuery, "").to_string();
        assert!(msg.contains("enter a name or ID"));
    }

    #[test]
    fn random_failures_never_report_not_found() {
        let err = SearchError::Fetch(FetchError::NotFound);
        assert_eq!(UserMessage::for_random(&err), UserMessage::RandomUnavailable);
    }
}
