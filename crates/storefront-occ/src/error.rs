//! Error types for OCC adapters
//!
//! Transport, decoding and conversion failures all surface as [`OccError`]
//! and are returned to the caller unchanged: adapters never retry.

/// Main OCC adapter error type
#[derive(Debug, thiserror::Error)]
pub enum OccError {
    /// Request could not be sent or the body could not be read
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("{url} responded with status {status}")]
    Status { status: u16, url: String },

    /// Body is not the expected JSON shape
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Endpoint URL could not be built
    #[error("endpoint error: {0}")]
    Endpoint(#[from] EndpointError),

    /// Response could not be normalized
    #[error("conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// User id source went away before yielding an id
    #[error("user id unavailable")]
    UserIdUnavailable,

    /// A logged-in user was required
    #[error("user is not logged in")]
    NotLoggedIn,
}

impl OccError {
    /// HTTP status of the failure, if the backend answered
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// URL building errors
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// No template configured under this name
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// Template placeholder without a value
    #[error("endpoint {endpoint} is missing url param {param}")]
    UnresolvedParam { endpoint: String, param: String },

    /// Base URL does not parse
    #[error("invalid base url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Base URL cannot carry a path (e.g. `mailto:`)
    #[error("base url {0} cannot be a base")]
    CannotBeABase(String),
}

/// Converter pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Nothing registered under the key
    #[error("no converter registered for {0}")]
    NoConverter(&'static str),

    /// Registered converter has different source/target types than the key
    #[error("converter registered for {0} has mismatched types")]
    TypeMismatch(&'static str),

    /// A converter stage rejected its input
    #[error("{converter}: {message}")]
    Failed {
        converter: &'static str,
        message: String,
    },
}

impl ConversionError {
    /// Stage failure
    #[inline]
    pub fn failed(converter: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            converter,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occ_error_display() {
        let err = OccError::Status {
            status: 404,
            url: "https://localhost/occ/v2/site/cms/pages".to_string(),
        };
        assert!(err.to_string().contains("404"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn conversion_error_wraps() {
        let err: OccError = ConversionError::NoConverter("CmsPageNormalizer").into();
        assert!(err.to_string().contains("CmsPageNormalizer"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn endpoint_error_display() {
        let err = EndpointError::UnresolvedParam {
            endpoint: "page".to_string(),
            param: "id".to_string(),
        };
        assert_eq!(err.to_string(), "endpoint page is missing url param id");
    }
}
